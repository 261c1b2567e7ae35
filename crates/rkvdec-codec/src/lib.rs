//! # rkvdec-codec
//!
//! RK3399 视频解码器的 codec 配置核心: 把无状态 H.264 控制结构转换为
//! 硬件辅助表 (CABAC, 量化矩阵, SPS/PPS 参数包, RPS) 和寄存器配置.
//!
//! ## 使用示例
//!
//! ```rust
//! use rkvdec_codec::{CodecMode, CodecOpsRegistry, RK3399_VDEC_VARIANT};
//!
//! let mut reg = CodecOpsRegistry::new();
//! rkvdec_codec::register_variant(&mut reg, &RK3399_VDEC_VARIANT);
//!
//! let ops = reg.create(CodecMode::H264Dec).unwrap();
//! assert_eq!(ops.mode(), CodecMode::H264Dec);
//! ```

pub mod codec_mode;
pub mod codec_ops;
pub mod format;
pub mod h264;
pub mod regs;
pub mod registry;
pub mod variant;

// 重导出常用类型
pub use codec_mode::CodecMode;
pub use codec_ops::{CodecOps, FrameBuffer, RunContext};
pub use format::{
    Fourcc, FormatState, FrameSizeRange, PixFormat, RK3399_VDEC_FORMATS, VpuFormat,
    default_format, enum_framesizes, find_format, reset_formats, try_fmt,
};
pub use h264::H264Decoder;
pub use h264::controls::ControlSet;
pub use registry::{CodecOpsRegistry, register_variant};
pub use variant::{BufState, RK3399_VDEC_VARIANT, VpuVariant, find_variant};
