//! H.264 无状态解码控制结构.
//!
//! 码流解析在外部完成, 每帧通过这些结构把参数集, DPB, 参考列表和量化矩阵
//! 交给解码器配置核心. 字段布局与 V4L2 无状态 H.264 接口一致.

use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use rkvdec_core::{VpuError, VpuResult};

/// DPB 容量
pub const H264_DPB_SIZE: usize = 16;
/// 单个参考列表的长度
pub const H264_REF_LIST_LEN: usize = 32;
/// 参考列表中表示 "无条目" 的索引
pub const H264_REF_LIST_END: u8 = 0xff;
/// SPS id 上限 (含)
pub const H264_MAX_SPS_ID: u8 = 31;

bitflags! {
    /// SPS 标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SpsFlags: u32 {
        const SEPARATE_COLOUR_PLANE = 0x01;
        const QPPRIME_Y_ZERO_TRANSFORM_BYPASS = 0x02;
        const DELTA_PIC_ORDER_ALWAYS_ZERO = 0x04;
        const GAPS_IN_FRAME_NUM_VALUE_ALLOWED = 0x08;
        const FRAME_MBS_ONLY = 0x10;
        const MB_ADAPTIVE_FRAME_FIELD = 0x20;
        const DIRECT_8X8_INFERENCE = 0x40;
    }
}

bitflags! {
    /// PPS 标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PpsFlags: u16 {
        const ENTROPY_CODING_MODE = 0x01;
        const BOTTOM_FIELD_PIC_ORDER_IN_FRAME_PRESENT = 0x02;
        const WEIGHTED_PRED = 0x04;
        const DEBLOCKING_FILTER_CONTROL_PRESENT = 0x08;
        const CONSTRAINED_INTRA_PRED = 0x10;
        const REDUNDANT_PIC_CNT_PRESENT = 0x20;
        const TRANSFORM_8X8_MODE = 0x40;
        const PIC_SCALING_MATRIX_PRESENT = 0x80;
    }
}

bitflags! {
    /// DPB 条目标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DpbEntryFlags: u32 {
        /// 条目含有效图像
        const VALID = 0x01;
        /// 当前帧可作为参考
        const ACTIVE = 0x02;
        /// 长期参考
        const LONG_TERM = 0x04;
    }
}

bitflags! {
    /// 解码参数标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DecodeParamsFlags: u32 {
        const IDR_PIC = 0x01;
    }
}

// 控制结构中的标志以原始位值表示, 未知位被丢弃
macro_rules! impl_flags_serde {
    ($($name:ident: $bits:ty),* $(,)?) => {$(
        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.bits().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                <$bits>::deserialize(deserializer).map(Self::from_bits_truncate)
            }
        }
    )*};
}

impl_flags_serde!(
    SpsFlags: u32,
    PpsFlags: u16,
    DpbEntryFlags: u32,
    DecodeParamsFlags: u32,
);

/// 序列参数集
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sps {
    pub profile_idc: u8,
    pub constraint_set_flags: u8,
    pub level_idc: u8,
    pub seq_parameter_set_id: u8,
    /// 色度格式 (0=单色, 1=4:2:0, 2=4:2:2, 3=4:4:4)
    pub chroma_format_idc: u8,
    pub bit_depth_luma_minus8: u8,
    pub bit_depth_chroma_minus8: u8,
    pub log2_max_frame_num_minus4: u8,
    pub pic_order_cnt_type: u8,
    pub log2_max_pic_order_cnt_lsb_minus4: u8,
    pub max_num_ref_frames: u8,
    pub num_ref_frames_in_pic_order_cnt_cycle: u8,
    pub offset_for_ref_frame: Vec<i32>,
    pub offset_for_non_ref_pic: i32,
    pub offset_for_top_to_bottom_field: i32,
    pub pic_width_in_mbs_minus1: u16,
    pub pic_height_in_map_units_minus1: u16,
    pub flags: SpsFlags,
}

impl Sps {
    /// 亮度位深
    pub fn bit_depth_luma(&self) -> u32 {
        u32::from(self.bit_depth_luma_minus8) + 8
    }

    /// 色度位深
    pub fn bit_depth_chroma(&self) -> u32 {
        u32::from(self.bit_depth_chroma_minus8) + 8
    }

    /// 宽度 (宏块)
    pub fn width_in_mbs(&self) -> u32 {
        u32::from(self.pic_width_in_mbs_minus1) + 1
    }

    /// 高度 (map unit, 仅帧编码时等于宏块行数)
    pub fn height_in_map_units(&self) -> u32 {
        u32::from(self.pic_height_in_map_units_minus1) + 1
    }
}

/// 图像参数集
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Pps {
    pub pic_parameter_set_id: u8,
    pub seq_parameter_set_id: u8,
    pub num_slice_groups_minus1: u8,
    pub num_ref_idx_l0_default_active_minus1: u8,
    pub num_ref_idx_l1_default_active_minus1: u8,
    pub weighted_bipred_idc: u8,
    pub pic_init_qp_minus26: i8,
    pub pic_init_qs_minus26: i8,
    pub chroma_qp_index_offset: i8,
    pub second_chroma_qp_index_offset: i8,
    pub flags: PpsFlags,
}

/// 量化矩阵, 每个列表均为 zig-zag 扫描顺序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingMatrix {
    pub scaling_list_4x4: [[u8; 16]; 6],
    #[serde(with = "matrix_8x8")]
    pub scaling_list_8x8: [[u8; 64]; 6],
}

impl Default for ScalingMatrix {
    /// Flat_4x4_16 / Flat_8x8_16
    fn default() -> Self {
        Self {
            scaling_list_4x4: [[16; 16]; 6],
            scaling_list_8x8: [[16; 64]; 6],
        }
    }
}

/// DPB 条目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DpbEntry {
    /// 参考图像对应的缓冲区时间戳
    pub reference_ts: u64,
    pub frame_num: u16,
    pub pic_num: u16,
    pub top_field_order_cnt: i32,
    pub bottom_field_order_cnt: i32,
    pub flags: DpbEntryFlags,
}

impl DpbEntry {
    pub fn is_valid(&self) -> bool {
        self.flags.contains(DpbEntryFlags::VALID)
    }

    pub fn is_active(&self) -> bool {
        self.flags.contains(DpbEntryFlags::ACTIVE)
    }

    pub fn is_long_term(&self) -> bool {
        self.flags.contains(DpbEntryFlags::LONG_TERM)
    }
}

fn empty_ref_list() -> [u8; H264_REF_LIST_LEN] {
    [H264_REF_LIST_END; H264_REF_LIST_LEN]
}

/// 每帧解码参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeParams {
    pub num_slices: u32,
    pub nal_ref_idc: u16,
    /// P 片参考列表 (DPB 索引)
    #[serde(default = "empty_ref_list")]
    pub ref_pic_list_p0: [u8; H264_REF_LIST_LEN],
    /// B 片前向参考列表
    #[serde(default = "empty_ref_list")]
    pub ref_pic_list_b0: [u8; H264_REF_LIST_LEN],
    /// B 片后向参考列表
    #[serde(default = "empty_ref_list")]
    pub ref_pic_list_b1: [u8; H264_REF_LIST_LEN],
    pub top_field_order_cnt: i32,
    pub bottom_field_order_cnt: i32,
    pub flags: DecodeParamsFlags,
    #[serde(with = "fixed_array")]
    pub dpb: [DpbEntry; H264_DPB_SIZE],
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            num_slices: 0,
            nal_ref_idc: 0,
            ref_pic_list_p0: empty_ref_list(),
            ref_pic_list_b0: empty_ref_list(),
            ref_pic_list_b1: empty_ref_list(),
            top_field_order_cnt: 0,
            bottom_field_order_cnt: 0,
            flags: DecodeParamsFlags::empty(),
            dpb: [DpbEntry::default(); H264_DPB_SIZE],
        }
    }
}

impl DecodeParams {
    /// 按硬件扫描顺序排列的三个参考列表: P0, B0, B1
    pub fn ref_lists(&self) -> [&[u8; H264_REF_LIST_LEN]; 3] {
        [
            &self.ref_pic_list_p0,
            &self.ref_pic_list_b0,
            &self.ref_pic_list_b1,
        ]
    }

    pub fn is_idr(&self) -> bool {
        self.flags.contains(DecodeParamsFlags::IDR_PIC)
    }
}

/// 片类型 (slice_type % 5)
pub mod slice_type {
    pub const P: u8 = 0;
    pub const B: u8 = 1;
    pub const I: u8 = 2;
    pub const SP: u8 = 3;
    pub const SI: u8 = 4;

    /// 片类型名称
    pub fn name(slice_type: u8) -> &'static str {
        match slice_type % 5 {
            P => "P",
            B => "B",
            I => "I",
            SP => "SP",
            _ => "SI",
        }
    }
}

/// 片参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceParams {
    /// 片数据字节数
    pub size: u32,
    pub header_bit_size: u32,
    pub first_mb_in_slice: u16,
    pub slice_type: u8,
    pub pic_parameter_set_id: u8,
    pub colour_plane_id: u8,
    pub redundant_pic_cnt: u8,
    pub frame_num: u16,
    pub idr_pic_id: u16,
    pub pic_order_cnt_lsb: u16,
    pub delta_pic_order_cnt_bottom: i32,
    pub delta_pic_order_cnt0: i32,
    pub delta_pic_order_cnt1: i32,
    pub dec_ref_pic_marking_bit_size: u32,
    pub pic_order_cnt_bit_size: u32,
    pub cabac_init_idc: u8,
    pub slice_qp_delta: i8,
    pub slice_qs_delta: i8,
    pub disable_deblocking_filter_idc: u8,
    pub slice_alpha_c0_offset_div2: i8,
    pub slice_beta_offset_div2: i8,
    pub num_ref_idx_l0_active_minus1: u8,
    pub num_ref_idx_l1_active_minus1: u8,
}

/// 参数集仓库, 按 id 保存最近收到的 SPS/PPS
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSets {
    sps: BTreeMap<u8, Sps>,
    pps: BTreeMap<u8, Pps>,
}

impl ParameterSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存 SPS, 同 id 覆盖
    pub fn store_sps(&mut self, sps: Sps) -> VpuResult<()> {
        if sps.seq_parameter_set_id > H264_MAX_SPS_ID {
            return Err(VpuError::InvalidControl(format!(
                "H264: sps_id 超出范围, sps_id={}",
                sps.seq_parameter_set_id
            )));
        }
        self.sps.insert(sps.seq_parameter_set_id, sps);
        Ok(())
    }

    /// 保存 PPS, 同 id 覆盖
    pub fn store_pps(&mut self, pps: Pps) -> VpuResult<()> {
        if pps.seq_parameter_set_id > H264_MAX_SPS_ID {
            return Err(VpuError::InvalidControl(format!(
                "H264: PPS 引用的 sps_id 超出范围, pps_id={}, sps_id={}",
                pps.pic_parameter_set_id, pps.seq_parameter_set_id
            )));
        }
        self.pps.insert(pps.pic_parameter_set_id, pps);
        Ok(())
    }

    pub fn sps(&self, id: u8) -> Option<&Sps> {
        self.sps.get(&id)
    }

    pub fn pps(&self, id: u8) -> Option<&Pps> {
        self.pps.get(&id)
    }

    /// 按 PPS id 取出当前激活的 SPS/PPS 对
    pub fn active(&self, pps_id: u8) -> VpuResult<(&Sps, &Pps)> {
        let pps = self.pps(pps_id).ok_or(VpuError::MissingControl("H264 PPS"))?;
        let sps = self
            .sps(pps.seq_parameter_set_id)
            .ok_or(VpuError::MissingControl("H264 SPS"))?;
        Ok((sps, pps))
    }
}

/// 当前请求暂存的全部 H.264 控制结构
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSet {
    pub parameter_sets: ParameterSets,
    pub decode_params: Option<DecodeParams>,
    pub slice_params: Option<SliceParams>,
    pub scaling_matrix: Option<ScalingMatrix>,
}

/// 一帧解码所需的全部控制结构 (已通过前置检查)
#[derive(Debug, Clone, Copy)]
pub struct FrameControls<'a> {
    pub sps: &'a Sps,
    pub pps: &'a Pps,
    pub decode_params: &'a DecodeParams,
    pub slice_params: &'a SliceParams,
    pub scaling_matrix: &'a ScalingMatrix,
}

impl ControlSet {
    /// 取出本帧控制结构. 任一缺失都视为前置条件错误.
    pub fn frame(&self) -> VpuResult<FrameControls<'_>> {
        let scaling_matrix = self
            .scaling_matrix
            .as_ref()
            .ok_or(VpuError::MissingControl("H264 SCALING_MATRIX"))?;
        let decode_params = self
            .decode_params
            .as_ref()
            .ok_or(VpuError::MissingControl("H264 DECODE_PARAMS"))?;
        let slice_params = self
            .slice_params
            .as_ref()
            .ok_or(VpuError::MissingControl("H264 SLICE_PARAMS"))?;
        let (sps, pps) = self
            .parameter_sets
            .active(slice_params.pic_parameter_set_id)?;
        Ok(FrameControls {
            sps,
            pps,
            decode_params,
            slice_params,
            scaling_matrix,
        })
    }
}

/// 定长数组以序列形式 (反) 序列化
mod fixed_array {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T, const N: usize>(arr: &[T; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        serializer.collect_seq(arr.iter())
    }

    pub fn deserialize<'de, D, T, const N: usize>(deserializer: D) -> Result<[T; N], D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        let items = Vec::<T>::deserialize(deserializer)?;
        let len = items.len();
        let expected = format!("{} 个元素", N);
        items
            .try_into()
            .map_err(|_| D::Error::invalid_length(len, &expected.as_str()))
    }
}

/// 6 个 8x8 量化列表
mod matrix_8x8 {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(lists: &[[u8; 64]; 6], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(lists.iter().map(|list| list.as_slice()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[[u8; 64]; 6], D::Error> {
        let lists = Vec::<Vec<u8>>::deserialize(deserializer)?;
        if lists.len() != 6 {
            return Err(D::Error::invalid_length(lists.len(), &"6 个 8x8 列表"));
        }
        let mut out = [[0u8; 64]; 6];
        for (dst, src) in out.iter_mut().zip(&lists) {
            if src.len() != 64 {
                return Err(D::Error::invalid_length(src.len(), &"64 个系数"));
            }
            dst.copy_from_slice(src);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sps(id: u8) -> Sps {
        Sps {
            seq_parameter_set_id: id,
            chroma_format_idc: 1,
            ..Default::default()
        }
    }

    fn pps(id: u8, sps_id: u8) -> Pps {
        Pps {
            pic_parameter_set_id: id,
            seq_parameter_set_id: sps_id,
            ..Default::default()
        }
    }

    #[test]
    fn test_parameter_sets_active_lookup() {
        let mut sets = ParameterSets::new();
        sets.store_sps(sps(1)).unwrap();
        sets.store_pps(pps(5, 1)).unwrap();

        let (s, p) = sets.active(5).unwrap();
        assert_eq!(s.seq_parameter_set_id, 1);
        assert_eq!(p.pic_parameter_set_id, 5);

        assert!(matches!(
            sets.active(6),
            Err(VpuError::MissingControl("H264 PPS"))
        ));
    }

    #[test]
    fn test_parameter_sets_missing_sps() {
        let mut sets = ParameterSets::new();
        sets.store_pps(pps(0, 3)).unwrap();
        assert!(matches!(
            sets.active(0),
            Err(VpuError::MissingControl("H264 SPS"))
        ));
    }

    #[test]
    fn test_parameter_sets_reject_bad_sps_id() {
        let mut sets = ParameterSets::new();
        assert!(sets.store_sps(sps(32)).is_err());
        assert!(sets.store_pps(pps(0, 40)).is_err());
    }

    #[test]
    fn test_frame_requires_all_controls() {
        let mut controls = ControlSet::default();
        assert!(matches!(
            controls.frame(),
            Err(VpuError::MissingControl("H264 SCALING_MATRIX"))
        ));
        controls.scaling_matrix = Some(ScalingMatrix::default());
        controls.decode_params = Some(DecodeParams::default());
        assert!(matches!(
            controls.frame(),
            Err(VpuError::MissingControl("H264 SLICE_PARAMS"))
        ));
        controls.slice_params = Some(SliceParams::default());
        controls.parameter_sets.store_sps(sps(0)).unwrap();
        controls.parameter_sets.store_pps(pps(0, 0)).unwrap();
        assert!(controls.frame().is_ok());
    }

    #[test]
    fn test_decode_params_default_lists_are_empty() {
        let params = DecodeParams::default();
        for list in params.ref_lists() {
            assert!(list.iter().all(|&idx| idx == H264_REF_LIST_END));
        }
    }

    #[test]
    fn test_decode_params_json_fills_defaults() {
        let json = r#"{
            "top_field_order_cnt": 4,
            "ref_pic_list_p0": [0, 255, 255, 255, 255, 255, 255, 255,
                                255, 255, 255, 255, 255, 255, 255, 255,
                                255, 255, 255, 255, 255, 255, 255, 255,
                                255, 255, 255, 255, 255, 255, 255, 255],
            "dpb": [
                { "reference_ts": 1000, "pic_num": 3, "flags": 3 },
                {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}
            ]
        }"#;
        let params: DecodeParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.top_field_order_cnt, 4);
        assert_eq!(params.ref_pic_list_p0[0], 0);
        assert_eq!(params.ref_pic_list_b0[0], H264_REF_LIST_END);
        assert!(params.dpb[0].is_active());
        assert!(params.dpb[0].is_valid());
        assert!(!params.dpb[1].is_active());
    }

    #[test]
    fn test_dpb_length_is_checked() {
        let json = r#"{ "dpb": [{}, {}] }"#;
        assert!(serde_json::from_str::<DecodeParams>(json).is_err());
    }

    #[test]
    fn test_scaling_matrix_json_roundtrip_shape() {
        let matrix = ScalingMatrix::default();
        let json = serde_json::to_string(&matrix).unwrap();
        let back: ScalingMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, matrix);
    }
}
