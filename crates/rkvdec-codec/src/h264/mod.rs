//! RK3399 H.264 无状态解码.
//!
//! 每帧流程:
//! 1. 检查本帧控制结构是否齐全
//! 2. 量化矩阵重排到辅助缓冲区
//! 3. 打包 SPS/PPS 参数包
//! 4. 打包 RPS 表
//! 5. 生成并写入寄存器配置
//! 6. 武装看门狗, 有序写入启动位

mod cabac_table;
pub mod config_regs;
pub mod controls;
pub mod param_set;
pub mod priv_table;
pub mod rps;
pub mod scaling_list;

use log::{debug, warn};

use rkvdec_core::{DebugFlags, DmaAllocator, RegisterIo, VpuError, VpuResult};

use crate::codec_mode::CodecMode;
use crate::codec_ops::{CodecOps, RunContext};
use crate::regs::{
    RKVDEC_CONFIG_DEC_CLK_GATE_E, RKVDEC_INTERRUPT_DEC_E, RKVDEC_IRQ_DIS, RKVDEC_REG_INTERRUPT,
    RKVDEC_REG_SYSCTRL,
};

pub use config_regs::{OutputSize, RegisterMap, VirStrides, build_registers};
pub use controls::{
    ControlSet, DecodeParams, DecodeParamsFlags, DpbEntry, DpbEntryFlags, FrameControls,
    ParameterSets, Pps, PpsFlags, ScalingMatrix, SliceParams, Sps, SpsFlags,
};
pub use priv_table::H264PrivTable;

/// H.264 解码器的硬件操作
#[derive(Debug, Default)]
pub struct H264Decoder {
    table: Option<H264PrivTable>,
    /// 最近一帧的寄存器配置
    last_regs: Option<RegisterMap>,
}

impl H264Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 辅助缓冲区, `init()` 之前为 None
    pub fn priv_table(&self) -> Option<&H264PrivTable> {
        self.table.as_ref()
    }

    /// 最近一次 `run()` 写入的寄存器配置
    pub fn last_registers(&self) -> Option<&RegisterMap> {
        self.last_regs.as_ref()
    }

    /// 准备辅助表并生成寄存器配置, 不访问硬件
    pub fn prepare(&mut self, job: &RunContext<'_>) -> VpuResult<RegisterMap> {
        let frame = job.controls.frame().inspect_err(|e| {
            warn!("H264: 控制结构不完整, 放弃本帧: {}", e);
        })?;
        let table = self
            .table
            .as_mut()
            .ok_or_else(|| VpuError::Internal("H264: 辅助缓冲区未初始化".into()))?;

        if job.config.debug_enabled(DebugFlags::BIG_CTRLS) {
            dump_params(frame.decode_params);
        }
        if job.config.debug_enabled(DebugFlags::SMALL_CTRLS) {
            debug!(
                "H264: sps_id={}, pps_id={}, 片类型={}, {}x{} 宏块",
                frame.sps.seq_parameter_set_id,
                frame.pps.pic_parameter_set_id,
                controls::slice_type::name(frame.slice_params.slice_type),
                frame.sps.width_in_mbs(),
                frame.sps.height_in_map_units(),
            );
        }

        scaling_list::reorder(frame.scaling_matrix, table.scaling_list_mut());
        param_set::assemble_hw_pps(table, frame.sps, frame.pps, &frame.decode_params.dpb);
        rps::assemble_hw_rps(table, frame.decode_params, frame.slice_params);

        Ok(build_registers(
            table,
            frame.decode_params,
            frame.sps,
            job.src,
            job.dst,
            OutputSize {
                width: job.dst_fmt.width,
                height: job.dst_fmt.height,
            },
            job.pictures,
        ))
    }
}

impl CodecOps for H264Decoder {
    fn mode(&self) -> CodecMode {
        CodecMode::H264Dec
    }

    fn name(&self) -> &str {
        "rk3399-vdec-h264"
    }

    fn init(&mut self, allocator: &mut dyn DmaAllocator) -> VpuResult<()> {
        if let Some(old) = self.table.take() {
            old.free(allocator);
        }
        self.table = Some(H264PrivTable::alloc(allocator)?);
        Ok(())
    }

    fn exit(&mut self, allocator: &mut dyn DmaAllocator) {
        if let Some(table) = self.table.take() {
            table.free(allocator);
        }
        self.last_regs = None;
    }

    fn run(&mut self, mut job: RunContext<'_>) -> VpuResult<()> {
        let map = self.prepare(&job)?;
        map.apply(&mut *job.regs);

        job.watchdog.arm(job.config.watchdog_timeout());
        job.regs.write(
            RKVDEC_REG_INTERRUPT,
            RKVDEC_INTERRUPT_DEC_E | RKVDEC_CONFIG_DEC_CLK_GATE_E,
        );

        if job.config.debug_enabled(DebugFlags::RUN) {
            debug!(
                "H264: 启动解码, src=0x{:08x}, dst=0x{:08x}, 寄存器 {} 个",
                job.src.dma,
                job.dst.dma,
                map.len()
            );
        }
        self.last_regs = Some(map);
        Ok(())
    }

    fn reset(&mut self, regs: &mut dyn RegisterIo) {
        regs.write(RKVDEC_REG_INTERRUPT, RKVDEC_IRQ_DIS);
        regs.write(RKVDEC_REG_SYSCTRL, 0);
    }
}

/// DPB 和参考列表
fn dump_params(params: &DecodeParams) {
    debug!("DPB:");
    for (i, entry) in params.dpb.iter().enumerate() {
        debug!(
            "{}: ts {} frame {} {}:{}:{}",
            i,
            entry.reference_ts,
            entry.frame_num,
            if entry.is_valid() { "valid" } else { "" },
            if entry.is_active() { "active" } else { "" },
            if entry.is_long_term() { "long" } else { "" },
        );
    }
    let names = ["ref_pic_list_p0", "ref_pic_list_b0", "ref_pic_list_b1"];
    for (name, list) in names.iter().zip(params.ref_lists()) {
        let items: Vec<String> = list
            .iter()
            .take_while(|&&idx| idx != controls::H264_REF_LIST_END)
            .map(|idx| format!("{:3}", idx))
            .collect();
        debug!("{}: {}", name, items.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec_ops::FrameBuffer;
    use crate::format::{FOURCC_NV12, PixFormat};
    use rkvdec_core::{
        DmaAddr, LinearDmaAllocator, ManualWatchdog, RecordingRegisters, VpuConfig, WriteKind,
    };
    use std::collections::HashMap;
    use std::time::Duration;

    fn controls() -> ControlSet {
        let mut set = ControlSet::default();
        set.parameter_sets
            .store_sps(Sps {
                chroma_format_idc: 1,
                pic_width_in_mbs_minus1: 3,
                pic_height_in_map_units_minus1: 3,
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

    struct Fixture {
        alloc: LinearDmaAllocator,
        regs: RecordingRegisters,
        watchdog: ManualWatchdog,
        pictures: HashMap<u64, DmaAddr>,
        config: VpuConfig,
        src: FrameBuffer,
        dst: FrameBuffer,
        dst_fmt: PixFormat,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                alloc: LinearDmaAllocator::default(),
                regs: RecordingRegisters::new(),
                watchdog: ManualWatchdog::new(),
                pictures: HashMap::new(),
                config: VpuConfig {
                    debug: DebugFlags::all(),
                    ..Default::default()
                },
                src: FrameBuffer {
                    dma: 0x0100_0000,
                    size: 4096,
                    timestamp: 1,
                },
                dst: FrameBuffer {
                    dma: 0x0200_0000,
                    size: 64 * 64 * 3 / 2,
                    timestamp: 1,
                },
                dst_fmt: PixFormat::new(FOURCC_NV12, 64, 64),
            }
        }

        fn run(&mut self, dec: &mut H264Decoder, controls: &ControlSet) -> VpuResult<()> {
            dec.run(RunContext {
                config: &self.config,
                controls,
                src: &self.src,
                dst: &self.dst,
                dst_fmt: &self.dst_fmt,
                pictures: &self.pictures,
                regs: &mut self.regs,
                watchdog: &self.watchdog,
            })
        }
    }

    #[test]
    fn test_run_triggers_last_with_ordered_write() {
        let mut fx = Fixture::new();
        let mut dec = H264Decoder::new();
        dec.init(&mut fx.alloc).unwrap();

        fx.run(&mut dec, &controls()).unwrap();

        let writes = fx.regs.writes();
        let last = writes.last().unwrap();
        assert_eq!(last.reg, RKVDEC_REG_INTERRUPT);
        assert_eq!(last.value, RKVDEC_INTERRUPT_DEC_E | RKVDEC_CONFIG_DEC_CLK_GATE_E);
        assert_eq!(last.kind, WriteKind::Ordered);
        assert!(
            writes[..writes.len() - 1]
                .iter()
                .all(|w| w.kind == WriteKind::Relaxed),
            "配置阶段只允许 relaxed 写入"
        );
        assert!(fx.watchdog.is_pending());
        assert_eq!(fx.watchdog.armed_timeout(), Some(Duration::from_millis(2000)));
        assert_eq!(dec.last_registers().map(|m| m.len()), Some(writes.len() - 1));
    }

    #[test]
    fn test_missing_control_aborts_before_register_writes() {
        let mut fx = Fixture::new();
        let mut dec = H264Decoder::new();
        dec.init(&mut fx.alloc).unwrap();

        let mut set = controls();
        set.decode_params = None;
        let err = fx.run(&mut dec, &set).unwrap_err();
        assert!(matches!(err, VpuError::MissingControl(_)));
        assert!(fx.regs.writes().is_empty());
        assert!(!fx.watchdog.is_pending(), "失败时不应武装看门狗");
    }

    #[test]
    fn test_run_without_init_fails() {
        let mut fx = Fixture::new();
        let mut dec = H264Decoder::new();
        assert!(matches!(
            fx.run(&mut dec, &controls()),
            Err(VpuError::Internal(_))
        ));
        assert!(fx.regs.writes().is_empty());
    }

    #[test]
    fn test_reset_disables_irq_and_mode() {
        let mut dec = H264Decoder::new();
        let mut regs = RecordingRegisters::new();
        dec.reset(&mut regs);
        let writes: Vec<_> = regs.writes().iter().map(|w| (w.reg, w.value)).collect();
        assert_eq!(
            writes,
            vec![
                (RKVDEC_REG_INTERRUPT, RKVDEC_IRQ_DIS),
                (RKVDEC_REG_SYSCTRL, 0)
            ]
        );
    }

    #[test]
    fn test_exit_returns_aux_buffer() {
        let mut fx = Fixture::new();
        let mut dec = H264Decoder::new();
        dec.init(&mut fx.alloc).unwrap();
        assert!(fx.alloc.in_use() > 0);
        dec.exit(&mut fx.alloc);
        assert_eq!(fx.alloc.in_use(), 0);
        assert!(dec.priv_table().is_none());
    }
}
