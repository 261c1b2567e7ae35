//! 每帧寄存器配置.
//!
//! 根据当前 SPS, 解码参数和输入/输出缓冲区生成一组按顺序写入的寄存器.
//! 寄存器配置不保存跨帧状态.

use log::warn;

use rkvdec_core::{DmaAddr, PictureStore, RegisterIo};

use super::controls::{DecodeParams, H264_DPB_SIZE, Sps};
use super::priv_table::H264PrivTable;
use crate::codec_ops::FrameBuffer;
use crate::regs::*;

/// 顶场 POC 寄存器, 按 DPB 位置排列
const POC_REG_TOP_FIELD: [u32; H264_DPB_SIZE] = [
    rkvdec_reg_h264_poc_refer0(0),
    rkvdec_reg_h264_poc_refer0(2),
    rkvdec_reg_h264_poc_refer0(4),
    rkvdec_reg_h264_poc_refer0(6),
    rkvdec_reg_h264_poc_refer0(8),
    rkvdec_reg_h264_poc_refer0(10),
    rkvdec_reg_h264_poc_refer0(12),
    rkvdec_reg_h264_poc_refer0(14),
    rkvdec_reg_h264_poc_refer1(1),
    rkvdec_reg_h264_poc_refer1(3),
    rkvdec_reg_h264_poc_refer1(5),
    rkvdec_reg_h264_poc_refer1(7),
    rkvdec_reg_h264_poc_refer1(9),
    rkvdec_reg_h264_poc_refer1(11),
    rkvdec_reg_h264_poc_refer1(13),
    rkvdec_reg_h264_poc_refer2(0),
];

/// 底场 POC 寄存器, 按 DPB 位置排列
const POC_REG_BOTTOM_FIELD: [u32; H264_DPB_SIZE] = [
    rkvdec_reg_h264_poc_refer0(1),
    rkvdec_reg_h264_poc_refer0(3),
    rkvdec_reg_h264_poc_refer0(5),
    rkvdec_reg_h264_poc_refer0(7),
    rkvdec_reg_h264_poc_refer0(9),
    rkvdec_reg_h264_poc_refer0(11),
    rkvdec_reg_h264_poc_refer0(13),
    rkvdec_reg_h264_poc_refer1(0),
    rkvdec_reg_h264_poc_refer1(2),
    rkvdec_reg_h264_poc_refer1(4),
    rkvdec_reg_h264_poc_refer1(6),
    rkvdec_reg_h264_poc_refer1(8),
    rkvdec_reg_h264_poc_refer1(10),
    rkvdec_reg_h264_poc_refer1(12),
    rkvdec_reg_h264_poc_refer1(14),
    rkvdec_reg_h264_poc_refer2(1),
];

/// 第 `slot` 个参考帧的基址寄存器
pub const fn base_refer_reg(slot: usize) -> u32 {
    if slot < 15 {
        rkvdec_reg_h264_base_refer(slot as u32)
    } else {
        RKVDEC_REG_H264_BASE_REFER15
    }
}

/// 输出缓冲区的虚拟步长 (字节)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirStrides {
    /// 每行字节数
    pub hor: u32,
    /// 行数, 16 对齐
    pub ver: u32,
    /// 亮度平面
    pub y: u32,
    /// 整帧, 4:4:4 时为 0
    pub yuv: u32,
}

impl VirStrides {
    pub fn compute(bit_depth_luma: u32, chroma_format_idc: u8, width: u32, height: u32) -> Self {
        let hor = bit_depth_luma * width / 8;
        let ver = height.next_multiple_of(16);
        let y = hor * ver;
        let yuv = match chroma_format_idc {
            0 => y,
            1 => y + y / 2,
            2 => 2 * y,
            _ => 0,
        };
        Self { hor, ver, y, yuv }
    }
}

/// 按写入顺序排列的寄存器配置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterMap {
    writes: Vec<(u32, u32)>,
}

impl RegisterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reg: u32, value: u32) {
        self.writes.push((reg, value));
    }

    /// 最后一次写入 `reg` 的值
    pub fn get(&self, reg: u32) -> Option<u32> {
        self.writes
            .iter()
            .rev()
            .find(|(r, _)| *r == reg)
            .map(|&(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(u32, u32)> {
        self.writes.iter()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// 以 relaxed 写入依次写到硬件
    pub fn apply(&self, regs: &mut dyn RegisterIo) {
        for &(reg, value) in &self.writes {
            regs.write_relaxed(reg, value);
        }
    }
}

/// 输出图像尺寸 (像素)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
}

/// 生成一帧的寄存器配置
pub fn build_registers(
    table: &H264PrivTable,
    decode_params: &DecodeParams,
    sps: &Sps,
    src: &FrameBuffer,
    dst: &FrameBuffer,
    dst_size: OutputSize,
    pictures: &dyn PictureStore,
) -> RegisterMap {
    let mut map = RegisterMap::new();

    map.push(RKVDEC_REG_SYSCTRL, rkvdec_mode(RKVDEC_MODE_H264));

    let strides = VirStrides::compute(
        sps.bit_depth_luma(),
        sps.chroma_format_idc,
        dst_size.width,
        dst_size.height,
    );

    map.push(
        RKVDEC_REG_PICPAR,
        rkvdec_y_hor_virstride(strides.hor / 16)
            | rkvdec_uv_hor_virstride(strides.hor / 16)
            | RKVDEC_SLICE_NUM_HIGHBIT
            | rkvdec_slice_num_lowbits(0x7ff),
    );

    map.push(RKVDEC_REG_STRM_RLC_BASE, src.dma);
    map.push(RKVDEC_REG_STRM_LEN, rkvdec_strm_len(src.size));
    map.push(RKVDEC_REG_CABACTBL_PROB_BASE, table.cabac_dma());
    map.push(RKVDEC_REG_DECOUT_BASE, dst.dma);
    map.push(RKVDEC_REG_Y_VIRSTRIDE, rkvdec_y_virstride(strides.y / 16));
    map.push(RKVDEC_REG_YUV_VIRSTRIDE, rkvdec_yuv_virstride(strides.yuv / 16));

    for (slot, entry) in decode_params.dpb.iter().enumerate() {
        let refer_addr = resolve_reference(entry.is_active(), entry.reference_ts, dst, pictures)
            | RKVDEC_COLMV_USED_FLAG_REF
            | RKVDEC_TOPFIELD_USED_REF
            | RKVDEC_BOTFIELD_USED_REF;

        map.push(POC_REG_TOP_FIELD[slot], entry.top_field_order_cnt as u32);
        map.push(POC_REG_BOTTOM_FIELD[slot], entry.bottom_field_order_cnt as u32);
        map.push(base_refer_reg(slot), refer_addr);
    }

    // 仅支持帧编码, 顶/底场 POC 相同
    map.push(
        RKVDEC_REG_CUR_POC0,
        rkvdec_cur_poc(decode_params.top_field_order_cnt),
    );
    map.push(
        RKVDEC_REG_CUR_POC1,
        rkvdec_cur_poc(decode_params.bottom_field_order_cnt),
    );

    map.push(RKVDEC_REG_PPS_BASE, table.param_set_dma());
    map.push(RKVDEC_REG_RPS_BASE, table.rps_dma());
    map.push(RKVDEC_REG_AXI_DDR_RDATA, 0);
    map.push(RKVDEC_REG_AXI_DDR_WDATA, 0);
    map.push(RKVDEC_REG_H264_ERRINFO_BASE, table.error_info_dma());

    map
}

/// 参考帧地址. 未激活或查找不到时使用当前输出缓冲区.
fn resolve_reference(
    active: bool,
    reference_ts: u64,
    dst: &FrameBuffer,
    pictures: &dyn PictureStore,
) -> DmaAddr {
    if !active {
        return dst.dma;
    }
    match pictures.lookup(reference_ts) {
        Some(addr) if addr != 0 => addr,
        _ => {
            warn!("H264: 找不到参考帧地址, ts={}", reference_ts);
            dst.dma
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::h264::controls::DpbEntryFlags;
    use rkvdec_core::{LinearDmaAllocator, RecordingRegisters, WriteKind};
    use std::collections::HashMap;

    fn sps_8bit_420() -> Sps {
        Sps {
            chroma_format_idc: 1,
            pic_width_in_mbs_minus1: 119,
            pic_height_in_map_units_minus1: 67,
            ..Default::default()
        }
    }

    fn buffers() -> (FrameBuffer, FrameBuffer) {
        let src = FrameBuffer {
            dma: 0x2000_0000,
            size: 0x10_0000,
            timestamp: 1000,
        };
        let dst = FrameBuffer {
            dma: 0x3000_0000,
            size: 1920 * 1088 * 3 / 2,
            timestamp: 0,
        };
        (src, dst)
    }

    #[test]
    fn test_strides_1080p_420() {
        let s = VirStrides::compute(8, 1, 1920, 1080);
        assert_eq!(s.hor, 1920);
        assert_eq!(s.ver, 1088, "高度按 16 对齐");
        assert_eq!(s.y, 1920 * 1088);
        assert_eq!(s.yuv, s.y * 3 / 2);
        assert_eq!(s.yuv, 3_133_440);
    }

    #[test]
    fn test_strides_aligned_height() {
        let s = VirStrides::compute(8, 1, 1920, 1088);
        assert_eq!(s.ver, 1088);
        assert_eq!(s.y, 2_088_960);
    }

    #[test]
    fn test_strides_chroma_formats() {
        assert_eq!(VirStrides::compute(8, 0, 64, 64).yuv, 4096);
        assert_eq!(VirStrides::compute(8, 2, 64, 64).yuv, 8192);
        assert_eq!(VirStrides::compute(8, 3, 64, 64).yuv, 0);
        // 10 位: 每行字节数按位深放大
        assert_eq!(VirStrides::compute(10, 1, 64, 64).hor, 80);
    }

    #[test]
    fn test_build_registers_basic_fields() {
        let mut alloc = LinearDmaAllocator::default();
        let table = H264PrivTable::alloc(&mut alloc).unwrap();
        let (src, dst) = buffers();
        let pictures: HashMap<u64, DmaAddr> = HashMap::new();
        let params = DecodeParams::default();

        let map = build_registers(
            &table,
            &params,
            &sps_8bit_420(),
            &src,
            &dst,
            OutputSize {
                width: 1920,
                height: 1080,
            },
            &pictures,
        );

        assert_eq!(map.iter().next(), Some(&(RKVDEC_REG_SYSCTRL, 0x0010_0000)));
        assert_eq!(
            map.get(RKVDEC_REG_PICPAR),
            Some(120 | 120 << 12 | RKVDEC_SLICE_NUM_HIGHBIT | 0x7ff << 21)
        );
        assert_eq!(map.get(RKVDEC_REG_STRM_RLC_BASE), Some(0x2000_0000));
        assert_eq!(map.get(RKVDEC_REG_STRM_LEN), Some(0x10_0000));
        assert_eq!(map.get(RKVDEC_REG_CABACTBL_PROB_BASE), Some(table.cabac_dma()));
        assert_eq!(map.get(RKVDEC_REG_DECOUT_BASE), Some(0x3000_0000));
        assert_eq!(map.get(RKVDEC_REG_Y_VIRSTRIDE), Some(1920 * 1088 / 16));
        assert_eq!(map.get(RKVDEC_REG_YUV_VIRSTRIDE), Some(3_133_440 / 16));
        assert_eq!(map.get(RKVDEC_REG_PPS_BASE), Some(table.param_set_dma()));
        assert_eq!(map.get(RKVDEC_REG_RPS_BASE), Some(table.rps_dma()));
        assert_eq!(map.get(RKVDEC_REG_H264_ERRINFO_BASE), Some(table.error_info_dma()));
        assert_eq!(map.get(RKVDEC_REG_INTERRUPT), None, "启动位不属于配置阶段");
        // 8 个固定寄存器 + 16 × 3 + 2 POC + 5 个表/AXI 寄存器
        assert_eq!(map.len(), 8 + 48 + 2 + 5);
    }

    #[test]
    fn test_reference_fallback_to_destination() {
        let mut alloc = LinearDmaAllocator::default();
        let table = H264PrivTable::alloc(&mut alloc).unwrap();
        let (src, dst) = buffers();
        let mut pictures: HashMap<u64, DmaAddr> = HashMap::new();
        pictures.insert(500, 0x4000_0000);

        let mut params = DecodeParams::default();
        let active = DpbEntryFlags::VALID | DpbEntryFlags::ACTIVE;
        params.dpb[0].reference_ts = 500;
        params.dpb[0].flags = active;
        params.dpb[0].top_field_order_cnt = 4;
        params.dpb[0].bottom_field_order_cnt = 5;
        // 激活但找不到
        params.dpb[1].reference_ts = 600;
        params.dpb[1].flags = active;
        // 未激活但时间戳可查: 仍使用输出缓冲区
        params.dpb[2].reference_ts = 500;
        params.dpb[15].top_field_order_cnt = -1;

        let map = build_registers(
            &table,
            &params,
            &sps_8bit_420(),
            &src,
            &dst,
            OutputSize {
                width: 1920,
                height: 1080,
            },
            &pictures,
        );

        let flags = RKVDEC_COLMV_USED_FLAG_REF | RKVDEC_TOPFIELD_USED_REF | RKVDEC_BOTFIELD_USED_REF;
        assert_eq!(map.get(base_refer_reg(0)), Some(0x4000_0000 | flags));
        assert_eq!(map.get(base_refer_reg(1)), Some(0x3000_0000 | flags));
        assert_eq!(map.get(base_refer_reg(2)), Some(0x3000_0000 | flags));
        assert_eq!(map.get(RKVDEC_REG_H264_BASE_REFER15), Some(0x3000_0000 | flags));

        assert_eq!(map.get(rkvdec_reg_h264_poc_refer0(0)), Some(4));
        assert_eq!(map.get(rkvdec_reg_h264_poc_refer0(1)), Some(5));
        assert_eq!(map.get(rkvdec_reg_h264_poc_refer2(0)), Some(0xffff_ffff));
    }

    #[test]
    fn test_apply_uses_relaxed_writes() {
        let mut map = RegisterMap::new();
        map.push(RKVDEC_REG_SYSCTRL, 1);
        map.push(RKVDEC_REG_PICPAR, 2);
        let mut regs = RecordingRegisters::new();
        map.apply(&mut regs);
        assert!(regs.writes().iter().all(|w| w.kind == WriteKind::Relaxed));
        assert_eq!(regs.value(RKVDEC_REG_PICPAR), Some(2));
    }

    #[test]
    fn test_poc_register_tables_are_disjoint() {
        let mut all: Vec<u32> = POC_REG_TOP_FIELD
            .iter()
            .chain(POC_REG_BOTTOM_FIELD.iter())
            .copied()
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 2 * H264_DPB_SIZE);
    }
}
