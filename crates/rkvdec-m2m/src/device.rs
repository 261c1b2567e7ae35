//! 解码设备.
//!
//! 设备同一时刻只运行一个任务. 任务由 `device_run()` 启动, 由中断完成
//! (`handle_irq()` / `irq_done()`) 或看门狗超时 (`watchdog_timeout()`)
//! 结束. 两条结束路径通过 [`FinishLatch`] 竞争, 只有一方执行结束流程.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use log::{debug, error, trace, warn};
use tokio::runtime::Handle;

use rkvdec_codec::{
    BufState, CodecMode, CodecOpsRegistry, ControlSet, FrameBuffer, RunContext, VpuVariant,
    find_variant, register_variant,
};
use rkvdec_core::{
    DebugFlags, DmaAllocator, RegisterIo, TracedRegisters, VpuConfig, VpuError, VpuResult,
    Watchdog,
};

use crate::buffer::VideoBuffer;
use crate::context::{CodecContext, VpuContext};
use crate::job::{JobResult, JobSink};
use crate::latch::{FinishLatch, JobState};
use crate::watchdog::TokioWatchdog;

/// 受设备锁保护的状态
struct DeviceInner<R> {
    regs: TracedRegisters<R>,
    allocator: Box<dyn DmaAllocator>,
    contexts: HashMap<u32, VpuContext>,
    /// 正在运行任务的上下文
    current: Option<u32>,
    next_id: u32,
}

/// 解码设备
pub struct VpuDevice<R> {
    config: VpuConfig,
    variant: &'static VpuVariant,
    registry: CodecOpsRegistry,
    inner: Mutex<DeviceInner<R>>,
    latch: FinishLatch,
    watchdog: Arc<dyn Watchdog>,
    sink: Arc<dyn JobSink>,
}

impl<R: RegisterIo> VpuDevice<R> {
    /// 创建设备, 使用调用方提供的看门狗
    pub fn new(
        regs: R,
        allocator: Box<dyn DmaAllocator>,
        config: VpuConfig,
        watchdog: Arc<dyn Watchdog>,
        sink: Arc<dyn JobSink>,
    ) -> VpuResult<Self> {
        let variant = lookup_variant(&config)?;
        Ok(Self::with_variant(
            variant, regs, allocator, config, watchdog, sink,
        ))
    }

    fn with_variant(
        variant: &'static VpuVariant,
        regs: R,
        allocator: Box<dyn DmaAllocator>,
        config: VpuConfig,
        watchdog: Arc<dyn Watchdog>,
        sink: Arc<dyn JobSink>,
    ) -> Self {
        let mut registry = CodecOpsRegistry::new();
        register_variant(&mut registry, variant);
        if config.debug_enabled(DebugFlags::GLOBAL) {
            debug!(
                "设备 {}: 模式 {:?}, 看门狗 {:?}",
                variant.name,
                registry.list(),
                config.watchdog_timeout()
            );
        }
        let traced = TracedRegisters::new(regs, config.debug_enabled(DebugFlags::REGS));
        Self {
            config,
            variant,
            registry,
            inner: Mutex::new(DeviceInner {
                regs: traced,
                allocator,
                contexts: HashMap::new(),
                current: None,
                next_id: 1,
            }),
            latch: FinishLatch::new(),
            watchdog,
            sink,
        }
    }

    pub fn config(&self) -> &VpuConfig {
        &self.config
    }

    pub fn variant(&self) -> &'static VpuVariant {
        self.variant
    }

    /// 当前任务状态
    pub fn job_state(&self) -> JobState {
        self.latch.state()
    }

    fn lock(&self) -> MutexGuard<'_, DeviceInner<R>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// 打开一个上下文, 返回上下文 id
    pub fn open_context(&self, mode: CodecMode) -> VpuResult<u32> {
        if !self.variant.supports(mode) {
            return Err(VpuError::Unsupported(format!(
                "{} 不支持 {} 模式",
                self.variant.name, mode
            )));
        }
        if mode.is_encoder() {
            return Err(VpuError::Unsupported(format!(
                "{} 没有编码中转缓冲区",
                self.variant.name
            )));
        }
        let ops = self.registry.create(mode)?;

        let mut guard = self.lock();
        let inner = &mut *guard;
        let id = inner.next_id;
        let ctx = VpuContext::new(
            id,
            CodecContext::Decoder { ops },
            self.variant.dec_fmts,
            inner.allocator.as_mut(),
        )?;
        inner.next_id += 1;
        inner.contexts.insert(id, ctx);
        Ok(id)
    }

    /// 关闭上下文. 上下文的任务仍在运行时返回 `Busy`.
    pub fn close_context(&self, ctx_id: u32) -> VpuResult<()> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if inner.current == Some(ctx_id) {
            return Err(VpuError::Busy(format!("上下文 {} 的任务仍在运行", ctx_id)));
        }
        let ctx = inner
            .contexts
            .remove(&ctx_id)
            .ok_or_else(|| unknown_context(ctx_id))?;
        ctx.release(inner.allocator.as_mut());
        Ok(())
    }

    /// 访问上下文
    pub fn with_context<T>(
        &self,
        ctx_id: u32,
        f: impl FnOnce(&mut VpuContext) -> T,
    ) -> VpuResult<T> {
        let mut guard = self.lock();
        let ctx = guard
            .contexts
            .get_mut(&ctx_id)
            .ok_or_else(|| unknown_context(ctx_id))?;
        Ok(f(ctx))
    }

    /// 设置下一帧的控制结构
    pub fn set_controls(&self, ctx_id: u32, controls: ControlSet) -> VpuResult<()> {
        self.with_context(ctx_id, |ctx| ctx.controls = controls)
    }

    /// 码流缓冲区入队
    pub fn queue_src(&self, ctx_id: u32, mut buf: VideoBuffer) -> VpuResult<()> {
        self.with_context(ctx_id, |ctx| {
            if self.config.debug_enabled(DebugFlags::FMT) {
                debug!(
                    "上下文 {}: OUTPUT 入队 #{} ts={} {} 字节",
                    ctx.id, buf.index, buf.timestamp, buf.bytesused
                );
            }
            buf.sequence = 0;
            ctx.src_queue.push_back(buf);
        })
    }

    /// 图像缓冲区入队, 缓冲区内旧的已解码图像随之失效
    pub fn queue_dst(&self, ctx_id: u32, mut buf: VideoBuffer) -> VpuResult<()> {
        self.with_context(ctx_id, |ctx| {
            if self.config.debug_enabled(DebugFlags::FMT) {
                debug!("上下文 {}: CAPTURE 入队 #{}", ctx.id, buf.index);
            }
            ctx.pictures.forget_buffer(buf.plane.dma());
            buf.bytesused = 0;
            buf.sequence = 0;
            ctx.dst_queue.push_back(buf);
        })
    }

    /// 为上下文启动一个任务, 使用两个队列头部的缓冲区.
    ///
    /// codec 配置失败时硬件未被启动, 任务立即以错误状态结束, 错误同时返回
    /// 给调用方.
    pub fn device_run(&self, ctx_id: u32) -> VpuResult<()> {
        if self.config.debug_enabled(DebugFlags::TRACE) {
            trace!("device_run: 上下文 {}", ctx_id);
        }
        if !self.latch.start() {
            return Err(VpuError::Busy("设备已有运行中的任务".into()));
        }

        let mut guard = self.lock();
        let inner = &mut *guard;
        let Some(ctx) = inner.contexts.get_mut(&ctx_id) else {
            self.latch.release();
            return Err(unknown_context(ctx_id));
        };
        let (Some(src), Some(dst)) = (ctx.src_queue.front(), ctx.dst_queue.front()) else {
            self.latch.release();
            return Err(VpuError::InvalidArgument(format!(
                "上下文 {}: 队列中缺少缓冲区",
                ctx_id
            )));
        };
        let src = src.frame();
        let dst = FrameBuffer {
            timestamp: src.timestamp,
            ..dst.frame()
        };

        let VpuContext {
            codec,
            controls,
            formats,
            pictures,
            ..
        } = ctx;
        let result = codec.ops_mut().run(RunContext {
            config: &self.config,
            controls,
            src: &src,
            dst: &dst,
            dst_fmt: &formats.dst_fmt,
            pictures: &*pictures,
            regs: &mut inner.regs,
            watchdog: self.watchdog.as_ref(),
        });
        inner.current = Some(ctx_id);

        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("上下文 {}: 任务启动失败: {}", ctx_id, e);
                let finished = self.job_finish(inner, BufState::Error);
                drop(guard);
                self.complete(finished);
                Err(e)
            }
        }
    }

    /// 中断处理: 读取并清除状态, 然后尝试结束任务
    pub fn handle_irq(&self) -> BufState {
        let state = {
            let mut guard = self.lock();
            let reg = self.variant.irq_status_reg;
            let status = guard.regs.read(reg);
            guard.regs.write(reg, 0);
            self.variant.irq_state(status)
        };
        self.irq_done(state);
        state
    }

    /// 硬件完成. 看门狗已触发时什么也不做, 由超时路径结束任务.
    pub fn irq_done(&self, state: BufState) {
        if !self.watchdog.cancel() {
            debug!("中断晚于看门狗, 忽略");
            return;
        }
        if !self.latch.try_complete() {
            return;
        }
        let finished = {
            let mut guard = self.lock();
            self.job_finish(&mut guard, state)
        };
        self.complete(finished);
    }

    /// 看门狗超时: 复位硬件, 以错误状态结束任务.
    ///
    /// 由本次调用结束任务时返回 `VpuError::Timeout`; 任务已被中断结束时返回 `Ok`.
    pub fn watchdog_timeout(&self) -> VpuResult<()> {
        if !self.latch.try_time_out() {
            return Ok(());
        }
        let finished = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            if let Some(ctx) = inner.current.and_then(|id| inner.contexts.get_mut(&id)) {
                ctx.codec.ops_mut().reset(&mut inner.regs);
            }
            self.job_finish(inner, BufState::Error)
        };
        self.complete(finished);
        Err(VpuError::Timeout)
    }

    /// 取出结束的缓冲区并填写元数据, 已解码图像登记到图像索引
    fn job_finish(&self, inner: &mut DeviceInner<R>, mut state: BufState) -> Option<JobResult> {
        let ctx_id = inner.current.take()?;
        if self.config.debug_enabled(DebugFlags::TRACE) {
            trace!("job_finish: 上下文 {}, {:?}", ctx_id, state);
        }
        let ctx = inner.contexts.get_mut(&ctx_id)?;
        let (Some(mut src), Some(mut dst)) = (ctx.src_queue.pop_front(), ctx.dst_queue.pop_front())
        else {
            warn!("上下文 {}: 结束任务时队列为空", ctx_id);
            return None;
        };

        src.sequence = ctx.sequence_out;
        ctx.sequence_out = ctx.sequence_out.wrapping_add(1);
        dst.sequence = ctx.sequence_cap;
        ctx.sequence_cap = ctx.sequence_cap.wrapping_add(1);
        dst.timestamp = src.timestamp;

        if let Err(e) = ctx.buf_finish(&mut dst, 0) {
            warn!("上下文 {}: 填写输出缓冲区失败: {}", ctx_id, e);
            state = BufState::Error;
        }
        ctx.pictures.insert(dst.timestamp, dst.plane.dma());

        if self.config.debug_enabled(DebugFlags::RUN) {
            debug!(
                "上下文 {}: 任务结束 {:?}, seq={}, ts={}",
                ctx_id, state, dst.sequence, dst.timestamp
            );
        }
        Some(JobResult {
            ctx_id,
            src,
            dst,
            state,
        })
    }

    /// 闩锁回到空闲并发出通知. 在设备锁之外调用.
    fn complete(&self, finished: Option<JobResult>) {
        self.latch.release();
        if let Some(result) = finished {
            self.sink.job_done(result);
        }
    }

    /// 访问底层寄存器
    pub fn with_regs<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        let mut guard = self.lock();
        f(guard.regs.inner_mut())
    }
}

impl<R: RegisterIo + 'static> VpuDevice<R> {
    /// 创建设备, 看门狗在 `handle` 所属的 tokio 运行时上计时
    pub fn spawn_on(
        handle: Handle,
        regs: R,
        allocator: Box<dyn DmaAllocator>,
        config: VpuConfig,
        sink: Arc<dyn JobSink>,
    ) -> VpuResult<Arc<Self>> {
        let variant = lookup_variant(&config)?;
        Ok(Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let watchdog = TokioWatchdog::new(
                handle,
                Arc::new(move || {
                    if let Some(device) = weak.upgrade() {
                        if let Err(err) = device.watchdog_timeout() {
                            error!("{}, 已复位硬件", err);
                        }
                    }
                }),
            );
            Self::with_variant(variant, regs, allocator, config, Arc::new(watchdog), sink)
        }))
    }
}

impl<R> Drop for VpuDevice<R> {
    fn drop(&mut self) {
        let inner = match self.inner.get_mut() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        for (_, ctx) in inner.contexts.drain() {
            ctx.release(inner.allocator.as_mut());
        }
    }
}

fn lookup_variant(config: &VpuConfig) -> VpuResult<&'static VpuVariant> {
    find_variant(&config.variant)
        .ok_or_else(|| VpuError::Unsupported(format!("未知硬件变体: {}", config.variant)))
}

fn unknown_context(ctx_id: u32) -> VpuError {
    VpuError::InvalidArgument(format!("上下文 {} 不存在", ctx_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rkvdec_codec::h264::{DecodeParams, Pps, ScalingMatrix, SliceParams, Sps, SpsFlags};
    use rkvdec_codec::regs::{
        RKVDEC_CONFIG_DEC_CLK_GATE_E, RKVDEC_INTERRUPT_DEC_E, RKVDEC_IRQ, RKVDEC_IRQ_DIS,
        RKVDEC_RDY_STA, RKVDEC_REG_INTERRUPT, RKVDEC_REG_SYSCTRL,
    };
    use rkvdec_core::{DmaBuffer, LinearDmaAllocator, ManualWatchdog, RecordingRegisters};

    struct Harness {
        device: VpuDevice<RecordingRegisters>,
        watchdog: Arc<ManualWatchdog>,
        results: Arc<Mutex<Vec<JobResult>>>,
    }

    impl Harness {
        fn new() -> Self {
            let watchdog = Arc::new(ManualWatchdog::new());
            let results = Arc::new(Mutex::new(Vec::<JobResult>::new()));
            let device = VpuDevice::new(
                RecordingRegisters::new(),
                Box::new(LinearDmaAllocator::default()),
                VpuConfig::default(),
                watchdog.clone(),
                results.clone(),
            )
            .unwrap();
            Self {
                device,
                watchdog,
                results,
            }
        }

        fn results(&self) -> Vec<JobResult> {
            self.results.lock().unwrap().clone()
        }

        fn open_with_frame(&self, controls: ControlSet) -> u32 {
            let id = self.device.open_context(CodecMode::H264Dec).unwrap();
            self.device.set_controls(id, controls).unwrap();
            let mut src = VideoBuffer::new(0, DmaBuffer::new(0x0100_0000, 4096), 42);
            src.bytesused = 1024;
            self.device.queue_src(id, src).unwrap();
            self.device
                .queue_dst(id, VideoBuffer::new(0, DmaBuffer::new(0x0200_0000, 8192), 0))
                .unwrap();
            id
        }
    }

    fn frame_controls() -> ControlSet {
        let mut set = ControlSet::default();
        set.parameter_sets
            .store_sps(Sps {
                chroma_format_idc: 1,
                pic_width_in_mbs_minus1: 2,
                pic_height_in_map_units_minus1: 2,
                flags: SpsFlags::FRAME_MBS_ONLY,
                ..Default::default()
            })
            .unwrap();
        set.parameter_sets.store_pps(Pps::default()).unwrap();
        set.scaling_matrix = Some(ScalingMatrix::default());
        set.decode_params = Some(DecodeParams::default());
        set.slice_params = Some(SliceParams::default());
        set
    }

    #[test]
    fn test_irq_completes_job() {
        let h = Harness::new();
        let id = h.open_with_frame(frame_controls());
        h.device.device_run(id).unwrap();
        assert_eq!(h.device.job_state(), JobState::Running);
        assert!(h.watchdog.is_pending());
        let trigger = h.device.with_regs(|r| r.writes().last().copied()).unwrap();
        assert_eq!(trigger.reg, RKVDEC_REG_INTERRUPT);
        assert_eq!(
            trigger.value,
            RKVDEC_INTERRUPT_DEC_E | RKVDEC_CONFIG_DEC_CLK_GATE_E
        );

        h.device
            .with_regs(|r| r.preset(RKVDEC_REG_INTERRUPT, RKVDEC_IRQ | RKVDEC_RDY_STA));
        assert_eq!(h.device.handle_irq(), BufState::Done);
        assert_eq!(h.device.with_regs(|r| r.value(RKVDEC_REG_INTERRUPT)), Some(0));

        let results = h.results();
        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert_eq!(r.state, BufState::Done);
        assert_eq!(r.dst.timestamp, 42, "输出缓冲区继承码流时间戳");
        assert_eq!(r.dst.bytesused, 48 * 48 * 3 / 2);
        assert_eq!(r.src.sequence, 0);
        assert_eq!(h.device.job_state(), JobState::Idle);
        assert!(!h.watchdog.is_pending());

        let registered = h
            .device
            .with_context(id, |ctx| ctx.pictures.len())
            .unwrap();
        assert_eq!(registered, 1);
    }

    #[test]
    fn test_watchdog_timeout_resets_and_fails_job() {
        let h = Harness::new();
        let id = h.open_with_frame(frame_controls());
        h.device.device_run(id).unwrap();
        h.device.with_regs(|r| {
            r.take_writes();
        });

        assert!(h.watchdog.fire());
        assert!(matches!(h.device.watchdog_timeout(), Err(VpuError::Timeout)));

        let writes: Vec<_> = h
            .device
            .with_regs(|r| r.writes().iter().map(|w| (w.reg, w.value)).collect());
        assert_eq!(
            writes,
            vec![
                (RKVDEC_REG_INTERRUPT, RKVDEC_IRQ_DIS),
                (RKVDEC_REG_SYSCTRL, 0)
            ]
        );
        let results = h.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].state, BufState::Error);

        // 迟到的中断不再结束任务
        h.device.irq_done(BufState::Done);
        assert_eq!(h.results().len(), 1);
    }

    #[test]
    fn test_watchdog_timeout_after_irq_is_noop() {
        let h = Harness::new();
        let id = h.open_with_frame(frame_controls());
        h.device.device_run(id).unwrap();
        h.device.irq_done(BufState::Done);

        // 任务已由中断结束, 超时路径不报错也不复位
        h.device.with_regs(|r| {
            r.take_writes();
        });
        assert!(h.device.watchdog_timeout().is_ok());
        assert!(h.device.with_regs(|r| r.writes().is_empty()));
        assert_eq!(h.results().len(), 1);
        assert_eq!(h.results()[0].state, BufState::Done);
    }

    #[test]
    fn test_missing_controls_finish_with_error() {
        let h = Harness::new();
        let mut controls = frame_controls();
        controls.slice_params = None;
        let id = h.open_with_frame(controls);

        let err = h.device.device_run(id).unwrap_err();
        assert!(matches!(err, VpuError::MissingControl(_)));
        assert!(h.device.with_regs(|r| r.writes().is_empty()));
        assert!(!h.watchdog.is_pending());

        let results = h.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].state, BufState::Error);
        assert_eq!(h.device.job_state(), JobState::Idle);
    }

    #[test]
    fn test_second_run_is_busy() {
        let h = Harness::new();
        let id = h.open_with_frame(frame_controls());
        h.device.device_run(id).unwrap();
        assert!(matches!(h.device.device_run(id), Err(VpuError::Busy(_))));
        assert!(matches!(h.device.close_context(id), Err(VpuError::Busy(_))));
    }

    #[test]
    fn test_run_without_buffers_keeps_device_idle() {
        let h = Harness::new();
        let id = h.device.open_context(CodecMode::H264Dec).unwrap();
        assert!(h.device.device_run(id).is_err());
        assert_eq!(h.device.job_state(), JobState::Idle);
        assert!(h.results().is_empty());
    }

    #[test]
    fn test_encoder_mode_is_unsupported() {
        let h = Harness::new();
        assert!(matches!(
            h.device.open_context(CodecMode::JpegEnc),
            Err(VpuError::Unsupported(_))
        ));
    }

    #[test]
    fn test_unknown_variant() {
        let config = VpuConfig {
            variant: "rk3288-vpu".into(),
            ..Default::default()
        };
        let result = VpuDevice::new(
            RecordingRegisters::new(),
            Box::new(LinearDmaAllocator::default()),
            config,
            Arc::new(ManualWatchdog::new()),
            Arc::new(Mutex::new(Vec::<JobResult>::new())),
        );
        assert!(matches!(result, Err(VpuError::Unsupported(_))));
    }
}
