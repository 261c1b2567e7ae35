//! 每种编解码模式的硬件操作 trait.
//!
//! 上下文创建时调用 `init()`, 销毁时调用 `exit()`. 每次调度一个任务调用
//! `run()`, 看门狗超时后调用 `reset()`.
//!
//! `run()` 的顺序固定: 前置检查 → 准备辅助表 → 配置寄存器 → 武装看门狗 →
//! 有序写入启动位. 返回错误时硬件未被启动, 调用方负责立即结束任务.

use rkvdec_core::{
    DmaAddr, DmaAllocator, PictureStore, RegisterIo, VpuConfig, VpuResult, Watchdog,
};

use crate::codec_mode::CodecMode;
use crate::format::PixFormat;
use crate::h264::controls::ControlSet;

/// 任务使用的单平面缓冲区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameBuffer {
    /// 平面 0 的设备地址
    pub dma: DmaAddr,
    /// 平面 0 的字节数
    pub size: u32,
    /// 缓冲区时间戳, 参考帧通过它查找
    pub timestamp: u64,
}

/// 一次 `run()` 所需的全部输入与外部能力
pub struct RunContext<'a> {
    pub config: &'a VpuConfig,
    /// 当前请求暂存的控制结构
    pub controls: &'a ControlSet,
    /// 码流缓冲区
    pub src: &'a FrameBuffer,
    /// 输出缓冲区
    pub dst: &'a FrameBuffer,
    /// 输出格式
    pub dst_fmt: &'a PixFormat,
    /// 已解码图像 (只读)
    pub pictures: &'a dyn PictureStore,
    pub regs: &'a mut dyn RegisterIo,
    pub watchdog: &'a dyn Watchdog,
}

/// 编解码硬件操作
pub trait CodecOps: Send {
    /// 对应的模式
    fn mode(&self) -> CodecMode;

    /// 实现名称
    fn name(&self) -> &str;

    /// 上下文初始化, 分配辅助缓冲区
    fn init(&mut self, allocator: &mut dyn DmaAllocator) -> VpuResult<()>;

    /// 上下文销毁, 归还辅助缓冲区
    fn exit(&mut self, allocator: &mut dyn DmaAllocator);

    /// 配置并启动一次硬件任务
    fn run(&mut self, job: RunContext<'_>) -> VpuResult<()>;

    /// 超时后复位硬件
    fn reset(&mut self, regs: &mut dyn RegisterIo);
}
