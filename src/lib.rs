//! # rkvdec
//!
//! Rockchip RK3399 视频解码器 (rkvdec) 的无状态 H.264 配置核心.
//!
//! 每帧把 SPS/PPS, 解码参数, 片参数和量化矩阵转换为硬件读取的辅助表和
//! 寄存器配置, 然后启动硬件; 中断或看门狗超时结束任务.
//!
//! # 快速开始
//!
//! ```rust
//! use rkvdec::codec::CodecMode;
//!
//! let registry = rkvdec::default_codec_registry();
//! let ops = registry.create(CodecMode::H264Dec).unwrap();
//! assert_eq!(ops.name(), "rk3399-vdec-h264");
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `rkvdec-core` | 错误, 位域写入, DMA 缓冲区, 硬件访问接口 |
//! | `rkvdec-codec` | H.264 控制结构, 辅助表, 寄存器配置, 格式表 |
//! | `rkvdec-m2m` | 上下文, 任务调度, 中断与看门狗 |

pub mod logging;

/// 核心类型与硬件访问接口
pub use rkvdec_core as core;

/// codec 配置核心
pub use rkvdec_codec as codec;

/// mem2mem 设备模型
pub use rkvdec_m2m as m2m;

/// 获取版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// 创建已注册 RK3399 全部 codec 实现的注册表
pub fn default_codec_registry() -> rkvdec_codec::CodecOpsRegistry {
    let mut registry = rkvdec_codec::CodecOpsRegistry::new();
    rkvdec_codec::register_variant(&mut registry, &rkvdec_codec::RK3399_VDEC_VARIANT);
    registry
}
