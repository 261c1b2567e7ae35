//! # rkvdec-core
//!
//! rkvdec 核心库, 提供解码器配置核心依赖的基础设施:
//!
//! - 统一错误类型
//! - 硬件位域写入 (小端 32 位字流)
//! - 设备可见的连续缓冲区与分配器
//! - 寄存器读写, 参考帧查找, 看门狗等外部能力的 trait 抽象
//! - 运行配置 (调试位, 超时)

pub mod bitfield;
pub mod config;
pub mod dma;
pub mod error;
pub mod picture;
pub mod regio;
pub mod watchdog;

// 重导出常用类型
pub use bitfield::{BitField, read_field, write_field};
pub use config::{DebugFlags, VpuConfig};
pub use dma::{DmaAddr, DmaAllocator, DmaBuffer, LinearDmaAllocator};
pub use error::{VpuError, VpuResult};
pub use picture::PictureStore;
pub use regio::{RecordingRegisters, RegWrite, RegisterIo, TracedRegisters, WriteKind};
pub use watchdog::{ArmState, ManualWatchdog, Watchdog};
