//! 硬件 SPS/PPS 参数包.
//!
//! 硬件按 PPS id 在参数包表中取 32 字节的记录 (基址 + id × 32),
//! 因此每帧把当前 SPS/PPS 打包到对应 id 的记录中. 记录先整体清零再写入,
//! 其他 id 的记录保持不变.

use rkvdec_core::{BitField, write_field};

use super::controls::{DpbEntry, H264_DPB_SIZE, Pps, PpsFlags, Sps, SpsFlags};
use super::priv_table::{H264PrivTable, PARAM_SET_RECORD_SIZE};

/// 参数包内的字段位置
pub mod field {
    use rkvdec_core::BitField;

    pub const SEQ_PARAMETER_SET_ID: BitField = BitField::new(0, 4);
    pub const PROFILE_IDC: BitField = BitField::new(4, 8);
    pub const CONSTRAINT_SET3_FLAG: BitField = BitField::new(12, 1);
    pub const CHROMA_FORMAT_IDC: BitField = BitField::new(13, 2);
    pub const BIT_DEPTH_LUMA: BitField = BitField::new(15, 3);
    pub const BIT_DEPTH_CHROMA: BitField = BitField::new(18, 3);
    pub const QPPRIME_Y_ZERO_TRANSFORM_BYPASS_FLAG: BitField = BitField::new(21, 1);
    pub const LOG2_MAX_FRAME_NUM_MINUS4: BitField = BitField::new(22, 4);
    pub const MAX_NUM_REF_FRAMES: BitField = BitField::new(26, 5);
    pub const PIC_ORDER_CNT_TYPE: BitField = BitField::new(31, 2);
    pub const LOG2_MAX_PIC_ORDER_CNT_LSB_MINUS4: BitField = BitField::new(33, 4);
    pub const DELTA_PIC_ORDER_ALWAYS_ZERO_FLAG: BitField = BitField::new(37, 1);
    pub const PIC_WIDTH_IN_MBS: BitField = BitField::new(38, 9);
    pub const PIC_HEIGHT_IN_MBS: BitField = BitField::new(47, 9);
    pub const FRAME_MBS_ONLY_FLAG: BitField = BitField::new(56, 1);
    pub const MB_ADAPTIVE_FRAME_FIELD_FLAG: BitField = BitField::new(57, 1);
    pub const DIRECT_8X8_INFERENCE_FLAG: BitField = BitField::new(58, 1);

    pub const PIC_PARAMETER_SET_ID: BitField = BitField::new(128, 8);
    pub const PPS_SEQ_PARAMETER_SET_ID: BitField = BitField::new(136, 5);
    pub const ENTROPY_CODING_MODE_FLAG: BitField = BitField::new(141, 1);
    pub const BOTTOM_FIELD_PIC_ORDER_IN_FRAME_PRESENT_FLAG: BitField = BitField::new(142, 1);
    pub const NUM_REF_IDX_L0_DEFAULT_ACTIVE_MINUS1: BitField = BitField::new(143, 5);
    pub const NUM_REF_IDX_L1_DEFAULT_ACTIVE_MINUS1: BitField = BitField::new(148, 5);
    pub const WEIGHTED_PRED_FLAG: BitField = BitField::new(153, 1);
    pub const WEIGHTED_BIPRED_IDC: BitField = BitField::new(154, 2);
    pub const PIC_INIT_QP_MINUS26: BitField = BitField::new(156, 7);
    pub const PIC_INIT_QS_MINUS26: BitField = BitField::new(163, 6);
    pub const CHROMA_QP_INDEX_OFFSET: BitField = BitField::new(169, 5);
    pub const DEBLOCKING_FILTER_CONTROL_PRESENT_FLAG: BitField = BitField::new(174, 1);
    pub const CONSTRAINED_INTRA_PRED_FLAG: BitField = BitField::new(175, 1);
    pub const REDUNDANT_PIC_CNT_PRESENT: BitField = BitField::new(176, 1);
    pub const TRANSFORM_8X8_MODE_FLAG: BitField = BitField::new(177, 1);
    pub const SECOND_CHROMA_QP_INDEX_OFFSET: BitField = BitField::new(178, 5);
    pub const SCALING_LIST_ENABLE_FLAG: BitField = BitField::new(183, 1);
    pub const SCALING_LIST_ADDRESS: BitField = BitField::new(184, 32);

    /// 第 `i` 个 DPB 条目的长期参考标志
    pub const fn is_long_term(i: usize) -> BitField {
        BitField::new(216 + i as u32, 1)
    }
}

const RECORD_WORDS: usize = PARAM_SET_RECORD_SIZE / 4;

fn flag<F: bitflags::Flags>(flags: F, bit: F) -> u32 {
    u32::from(flags.contains(bit))
}

/// 打包一条参数包记录
pub fn pack_hw_pps(
    sps: &Sps,
    pps: &Pps,
    dpb: &[DpbEntry; H264_DPB_SIZE],
    scaling_list_addr: u32,
) -> [u32; RECORD_WORDS] {
    let mut rec = [0u32; RECORD_WORDS];
    let mut put = |f: BitField, value: u32| write_field(&mut rec, f, value);

    // SPS
    put(field::CHROMA_FORMAT_IDC, u32::from(sps.chroma_format_idc));
    // 位深字段存放 depth - 8
    put(field::BIT_DEPTH_LUMA, u32::from(sps.bit_depth_luma_minus8));
    put(field::BIT_DEPTH_CHROMA, u32::from(sps.bit_depth_chroma_minus8));
    put(field::QPPRIME_Y_ZERO_TRANSFORM_BYPASS_FLAG, 0);
    put(
        field::LOG2_MAX_FRAME_NUM_MINUS4,
        u32::from(sps.log2_max_frame_num_minus4),
    );
    put(field::MAX_NUM_REF_FRAMES, u32::from(sps.max_num_ref_frames));
    put(field::PIC_ORDER_CNT_TYPE, u32::from(sps.pic_order_cnt_type));
    put(
        field::LOG2_MAX_PIC_ORDER_CNT_LSB_MINUS4,
        u32::from(sps.log2_max_pic_order_cnt_lsb_minus4),
    );
    put(
        field::DELTA_PIC_ORDER_ALWAYS_ZERO_FLAG,
        flag(sps.flags, SpsFlags::DELTA_PIC_ORDER_ALWAYS_ZERO),
    );
    put(field::PIC_WIDTH_IN_MBS, sps.width_in_mbs());
    put(field::PIC_HEIGHT_IN_MBS, sps.height_in_map_units());
    put(
        field::FRAME_MBS_ONLY_FLAG,
        flag(sps.flags, SpsFlags::FRAME_MBS_ONLY),
    );
    put(
        field::MB_ADAPTIVE_FRAME_FIELD_FLAG,
        flag(sps.flags, SpsFlags::MB_ADAPTIVE_FRAME_FIELD),
    );
    put(
        field::DIRECT_8X8_INFERENCE_FLAG,
        flag(sps.flags, SpsFlags::DIRECT_8X8_INFERENCE),
    );

    // PPS
    put(
        field::ENTROPY_CODING_MODE_FLAG,
        flag(pps.flags, PpsFlags::ENTROPY_CODING_MODE),
    );
    put(
        field::BOTTOM_FIELD_PIC_ORDER_IN_FRAME_PRESENT_FLAG,
        flag(pps.flags, PpsFlags::BOTTOM_FIELD_PIC_ORDER_IN_FRAME_PRESENT),
    );
    put(
        field::NUM_REF_IDX_L0_DEFAULT_ACTIVE_MINUS1,
        u32::from(pps.num_ref_idx_l0_default_active_minus1),
    );
    put(
        field::NUM_REF_IDX_L1_DEFAULT_ACTIVE_MINUS1,
        u32::from(pps.num_ref_idx_l1_default_active_minus1),
    );
    put(
        field::WEIGHTED_PRED_FLAG,
        flag(pps.flags, PpsFlags::WEIGHTED_PRED),
    );
    put(field::WEIGHTED_BIPRED_IDC, u32::from(pps.weighted_bipred_idc));
    // 有符号字段按补码截断
    put(field::PIC_INIT_QP_MINUS26, pps.pic_init_qp_minus26 as u32);
    put(field::PIC_INIT_QS_MINUS26, pps.pic_init_qs_minus26 as u32);
    put(field::CHROMA_QP_INDEX_OFFSET, pps.chroma_qp_index_offset as u32);
    put(
        field::DEBLOCKING_FILTER_CONTROL_PRESENT_FLAG,
        flag(pps.flags, PpsFlags::DEBLOCKING_FILTER_CONTROL_PRESENT),
    );
    put(
        field::CONSTRAINED_INTRA_PRED_FLAG,
        flag(pps.flags, PpsFlags::CONSTRAINED_INTRA_PRED),
    );
    put(
        field::REDUNDANT_PIC_CNT_PRESENT,
        flag(pps.flags, PpsFlags::REDUNDANT_PIC_CNT_PRESENT),
    );
    put(
        field::TRANSFORM_8X8_MODE_FLAG,
        flag(pps.flags, PpsFlags::TRANSFORM_8X8_MODE),
    );
    put(
        field::SECOND_CHROMA_QP_INDEX_OFFSET,
        pps.second_chroma_qp_index_offset as u32,
    );

    // 总是使用随帧提供的量化矩阵
    put(field::SCALING_LIST_ENABLE_FLAG, 1);
    put(field::SCALING_LIST_ADDRESS, scaling_list_addr);

    for (i, entry) in dpb.iter().enumerate() {
        put(field::is_long_term(i), u32::from(entry.is_long_term()));
    }

    rec
}

/// 把当前 SPS/PPS 写入辅助缓冲区中 `pps.pic_parameter_set_id` 对应的记录
pub fn assemble_hw_pps(
    table: &mut H264PrivTable,
    sps: &Sps,
    pps: &Pps,
    dpb: &[DpbEntry; H264_DPB_SIZE],
) {
    let rec = pack_hw_pps(sps, pps, dpb, table.scaling_list_dma());
    table.store_param_set(pps.pic_parameter_set_id, &rec);
}
