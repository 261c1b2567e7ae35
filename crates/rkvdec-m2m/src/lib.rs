//! # rkvdec-m2m
//!
//! RK3399 视频解码器的 mem2mem 设备模型.
//!
//! - 上下文: 每个流的格式, 缓冲区队列, 暂存控制结构和 codec 实现
//! - 设备: 单任务调度, 中断完成与看门狗超时的竞争结束
//! - tokio 看门狗
//! - CAPTURE 队列的已解码图像索引

pub mod buffer;
pub mod context;
pub mod device;
pub mod job;
pub mod latch;
pub mod picture_store;
pub mod watchdog;

// 重导出常用类型
pub use buffer::VideoBuffer;
pub use context::{CodecContext, VpuContext};
pub use device::VpuDevice;
pub use job::{JobResult, JobSink};
pub use latch::{FinishLatch, JobState};
pub use picture_store::CapturePictureStore;
pub use watchdog::{TimeoutHandler, TokioWatchdog};
