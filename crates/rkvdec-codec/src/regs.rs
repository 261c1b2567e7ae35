//! RK3399 视频解码器 (rkvdec) 寄存器定义.
//!
//! 偏移均为字节偏移.

/// 中断与启动控制
pub const RKVDEC_REG_INTERRUPT: u32 = 0x004;
pub const RKVDEC_INTERRUPT_DEC_E: u32 = 1 << 0;
pub const RKVDEC_CONFIG_DEC_CLK_GATE_E: u32 = 1 << 1;
pub const RKVDEC_IRQ_DIS: u32 = 1 << 4;
pub const RKVDEC_IRQ: u32 = 1 << 8;
pub const RKVDEC_RDY_STA: u32 = 1 << 12;
pub const RKVDEC_BUS_STA: u32 = 1 << 13;
pub const RKVDEC_ERR_STA: u32 = 1 << 14;
pub const RKVDEC_TIMEOUT_STA: u32 = 1 << 15;
pub const RKVDEC_BUF_EMPTY_STA: u32 = 1 << 16;
pub const RKVDEC_COLMV_REF_ERR_STA: u32 = 1 << 17;

/// 系统控制 (解码模式)
pub const RKVDEC_REG_SYSCTRL: u32 = 0x008;
pub const RKVDEC_MODE_H264: u32 = 1;

pub const fn rkvdec_mode(mode: u32) -> u32 {
    (mode & 0x3) << 20
}

/// 图像参数 (水平虚拟步长, 片数量)
pub const RKVDEC_REG_PICPAR: u32 = 0x00c;
pub const RKVDEC_SLICE_NUM_HIGHBIT: u32 = 1 << 11;

pub const fn rkvdec_y_hor_virstride(x: u32) -> u32 {
    x & 0x1ff
}

pub const fn rkvdec_uv_hor_virstride(x: u32) -> u32 {
    (x & 0x1ff) << 12
}

pub const fn rkvdec_slice_num_lowbits(x: u32) -> u32 {
    (x & 0x7ff) << 21
}

/// 码流基址与长度
pub const RKVDEC_REG_STRM_RLC_BASE: u32 = 0x010;
pub const RKVDEC_REG_STRM_LEN: u32 = 0x014;

pub const fn rkvdec_strm_len(x: u32) -> u32 {
    x & 0x7ff_ffff
}

/// CABAC 表基址
pub const RKVDEC_REG_CABACTBL_PROB_BASE: u32 = 0x018;
/// 输出缓冲区基址
pub const RKVDEC_REG_DECOUT_BASE: u32 = 0x01c;

/// 亮度平面虚拟大小
pub const RKVDEC_REG_Y_VIRSTRIDE: u32 = 0x020;

pub const fn rkvdec_y_virstride(x: u32) -> u32 {
    x & 0xf_ffff
}

/// 整帧虚拟大小
pub const RKVDEC_REG_YUV_VIRSTRIDE: u32 = 0x024;

pub const fn rkvdec_yuv_virstride(x: u32) -> u32 {
    x & 0x1f_ffff
}

/// 参考帧基址 0..=14
pub const fn rkvdec_reg_h264_base_refer(i: u32) -> u32 {
    0x028 + i * 4
}

/// 第 15 个参考帧基址不与前 15 个连续
pub const RKVDEC_REG_H264_BASE_REFER15: u32 = 0x0c0;

/// 参考帧基址低位标志
pub const RKVDEC_FIELD_REF: u32 = 1 << 0;
pub const RKVDEC_TOPFIELD_USED_REF: u32 = 1 << 1;
pub const RKVDEC_BOTFIELD_USED_REF: u32 = 1 << 2;
pub const RKVDEC_COLMV_USED_FLAG_REF: u32 = 1 << 3;

/// 参考帧 POC, 三组不连续的寄存器
pub const fn rkvdec_reg_h264_poc_refer0(i: u32) -> u32 {
    0x064 + i * 4
}

pub const fn rkvdec_reg_h264_poc_refer1(i: u32) -> u32 {
    0x0c4 + i * 4
}

pub const fn rkvdec_reg_h264_poc_refer2(i: u32) -> u32 {
    0x120 + i * 4
}

/// 当前帧 POC
pub const RKVDEC_REG_CUR_POC0: u32 = 0x0a0;
pub const RKVDEC_REG_CUR_POC1: u32 = 0x0a4;

pub const fn rkvdec_cur_poc(x: i32) -> u32 {
    x as u32
}

/// 参数包表与 RPS 表基址
pub const RKVDEC_REG_PPS_BASE: u32 = 0x0ac;
pub const RKVDEC_REG_RPS_BASE: u32 = 0x0b0;

/// AXI 读写数据控制
pub const RKVDEC_REG_AXI_DDR_RDATA: u32 = 0x108;
pub const RKVDEC_REG_AXI_DDR_WDATA: u32 = 0x10c;

/// 错误信息缓冲区基址
pub const RKVDEC_REG_H264_ERRINFO_BASE: u32 = 0x12c;

/// 寄存器名称, 用于日志和离线转储
pub fn reg_name(reg: u32) -> Option<&'static str> {
    let name = match reg {
        RKVDEC_REG_INTERRUPT => "INTERRUPT",
        RKVDEC_REG_SYSCTRL => "SYSCTRL",
        RKVDEC_REG_PICPAR => "PICPAR",
        RKVDEC_REG_STRM_RLC_BASE => "STRM_RLC_BASE",
        RKVDEC_REG_STRM_LEN => "STRM_LEN",
        RKVDEC_REG_CABACTBL_PROB_BASE => "CABACTBL_PROB_BASE",
        RKVDEC_REG_DECOUT_BASE => "DECOUT_BASE",
        RKVDEC_REG_Y_VIRSTRIDE => "Y_VIRSTRIDE",
        RKVDEC_REG_YUV_VIRSTRIDE => "YUV_VIRSTRIDE",
        0x028..=0x060 => "H264_BASE_REFER",
        0x064..=0x09c => "H264_POC_REFER0",
        RKVDEC_REG_CUR_POC0 => "CUR_POC0",
        RKVDEC_REG_CUR_POC1 => "CUR_POC1",
        RKVDEC_REG_PPS_BASE => "PPS_BASE",
        RKVDEC_REG_RPS_BASE => "RPS_BASE",
        RKVDEC_REG_H264_BASE_REFER15 => "H264_BASE_REFER15",
        0x0c4..=0x0fc => "H264_POC_REFER1",
        RKVDEC_REG_AXI_DDR_RDATA => "AXI_DDR_RDATA",
        RKVDEC_REG_AXI_DDR_WDATA => "AXI_DDR_WDATA",
        0x120..=0x124 => "H264_POC_REFER2",
        RKVDEC_REG_H264_ERRINFO_BASE => "H264_ERRINFO_BASE",
        _ => return None,
    };
    Some(name)
}
