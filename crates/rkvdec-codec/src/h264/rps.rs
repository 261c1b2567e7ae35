//! 硬件参考图像集 (RPS) 表.
//!
//! 前 16 个 16 位字是各 DPB 条目的 pic_num, 其后是 P0/B0/B1 三个参考列表,
//! 每个位置 5 位: 低 4 位为 DPB 索引, 第 4 位为该条目是否激活.

use rkvdec_core::{BitField, write_field};

use super::controls::{DecodeParams, H264_DPB_SIZE, SliceParams};
use super::priv_table::{H264PrivTable, RPS_SIZE};

/// 非激活 DPB 条目使用的 pic_num. 写 0 会被硬件当作 pic_num 为 0 的真实参考帧.
pub const RPS_INVALID_PIC_NUM: u16 = 0xff;

const RPS_WORDS: usize = RPS_SIZE / 4;

/// 第 `slot` 个 DPB 条目的 pic_num 字段
pub const fn pic_num_field(slot: usize) -> BitField {
    BitField::new(slot as u32 * 16, 16)
}

/// 第 `list` 个参考列表第 `pos` 个位置的字段
pub const fn dpb_info_field(pos: usize, list: usize) -> BitField {
    BitField::new(288 + (list as u32) * 32 * 7 + (pos as u32) * 7, 5)
}

/// RPS 打包结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpsTable {
    pub words: [u32; RPS_WORDS],
    /// 写入的参考列表条目数, 依次为 P0, B0, B1
    pub list_writes: [usize; 3],
}

/// 打包 RPS 表. 参考列表中 >= 16 的索引被跳过.
pub fn pack_hw_rps(decode_params: &DecodeParams, _slice_params: &SliceParams) -> RpsTable {
    let dpb = &decode_params.dpb;
    let mut words = [0u32; RPS_WORDS];
    let mut list_writes = [0usize; 3];

    for (slot, entry) in dpb.iter().enumerate() {
        let pic_num = if entry.is_active() {
            entry.pic_num
        } else {
            RPS_INVALID_PIC_NUM
        };
        write_field(&mut words, pic_num_field(slot), u32::from(pic_num));
    }

    for (list, refs) in decode_params.ref_lists().into_iter().enumerate() {
        for (pos, &idx) in refs.iter().enumerate() {
            let idx = usize::from(idx);
            if idx >= H264_DPB_SIZE {
                continue;
            }
            let valid = u32::from(dpb[idx].is_active());
            write_field(&mut words, dpb_info_field(pos, list), idx as u32 | valid << 4);
            list_writes[list] += 1;
        }
    }

    RpsTable { words, list_writes }
}

/// 把 RPS 表写入辅助缓冲区, 返回各参考列表写入的条目数
pub fn assemble_hw_rps(
    table: &mut H264PrivTable,
    decode_params: &DecodeParams,
    slice_params: &SliceParams,
) -> [usize; 3] {
    let rps = pack_hw_rps(decode_params, slice_params);
    table.store_rps(&rps.words);
    rps.list_writes
}
