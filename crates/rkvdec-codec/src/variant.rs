//! 硬件变体描述.
//!
//! 变体给出格式表, 时钟, 中断状态解析, 以及各模式对应的 codec 实现.

use serde::Serialize;

use crate::codec_mode::CodecMode;
use crate::format::{RK3399_VDEC_FORMATS, VpuFormat};
use crate::regs::{RKVDEC_REG_INTERRUPT, RKVDEC_RDY_STA};

/// 硬件任务结束状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BufState {
    Done,
    Error,
}

/// 硬件变体
#[derive(Debug, Serialize)]
pub struct VpuVariant {
    pub name: &'static str,
    /// 解码寄存器相对设备寄存器基址的偏移
    pub dec_offset: u32,
    pub dec_fmts: &'static [VpuFormat],
    /// 提供的 codec 模式
    pub modes: &'static [CodecMode],
    pub clk_names: &'static [&'static str],
    /// 初始化时把 aclk 提到的频率
    pub aclk_max_freq: u64,
    /// 中断状态寄存器
    pub irq_status_reg: u32,
}

impl VpuVariant {
    /// 解析中断状态
    pub fn irq_state(&self, status: u32) -> BufState {
        if status & RKVDEC_RDY_STA != 0 {
            BufState::Done
        } else {
            BufState::Error
        }
    }

    pub fn supports(&self, mode: CodecMode) -> bool {
        self.modes.contains(&mode)
    }
}

/// RK3399 视频解码器
pub static RK3399_VDEC_VARIANT: VpuVariant = VpuVariant {
    name: "rk3399-vdec",
    dec_offset: 0x0,
    dec_fmts: &RK3399_VDEC_FORMATS,
    modes: &[CodecMode::H264Dec],
    clk_names: &["aclk", "hclk", "sclk_cabac", "sclk_core"],
    aclk_max_freq: 500 * 1000 * 1000,
    irq_status_reg: RKVDEC_REG_INTERRUPT,
};

static VARIANTS: [&VpuVariant; 1] = [&RK3399_VDEC_VARIANT];

/// 按名称查找变体
pub fn find_variant(name: &str) -> Option<&'static VpuVariant> {
    VARIANTS.iter().copied().find(|v| v.name == name)
}
