//! 中断完成与看门狗超时的竞争.
//!
//! 两条路径并发结束同一个任务时, 结束流程必须恰好执行一次.

use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

use rkvdec::codec::format::FOURCC_H264_SLICE;
use rkvdec::codec::h264::{DecodeParams, Pps, ScalingMatrix, SliceParams, Sps, SpsFlags};
use rkvdec::codec::regs::{
    RKVDEC_IRQ, RKVDEC_IRQ_DIS, RKVDEC_RDY_STA, RKVDEC_REG_INTERRUPT, RKVDEC_REG_SYSCTRL,
};
use rkvdec::codec::{BufState, CodecMode, ControlSet, PixFormat, RK3399_VDEC_FORMATS};
use rkvdec::core::{
    DmaBuffer, LinearDmaAllocator, ManualWatchdog, RecordingRegisters, VpuConfig,
};
use rkvdec::m2m::{JobResult, JobState, VideoBuffer, VpuDevice};

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

fn open(device: &VpuDevice<RecordingRegisters>) -> u32 {
    let ctx = device.open_context(CodecMode::H264Dec).unwrap();
    device
        .with_context(ctx, |c| {
            let mut pix = PixFormat::new(FOURCC_H264_SLICE, 64, 64);
            c.set_coded_format(&RK3399_VDEC_FORMATS, &mut pix)
        })
        .unwrap()
        .unwrap();
    device.set_controls(ctx, controls()).unwrap();
    ctx
}

fn queue(device: &VpuDevice<RecordingRegisters>, ctx: u32, ts: u64) {
    device
        .queue_src(ctx, VideoBuffer::new(0, DmaBuffer::new(0x1000_0000, 4096), ts))
        .unwrap();
    device
        .queue_dst(ctx, VideoBuffer::new(0, DmaBuffer::new(0x2000_0000, 8192), 0))
        .unwrap();
}

#[test]
fn test_irq_and_watchdog_finish_exactly_once() {
    let watchdog = Arc::new(ManualWatchdog::new());
    let results = Arc::new(Mutex::new(Vec::<JobResult>::new()));
    let device = Arc::new(
        VpuDevice::new(
            RecordingRegisters::new(),
            Box::new(LinearDmaAllocator::default()),
            VpuConfig::default(),
            watchdog.clone(),
            results.clone(),
        )
        .unwrap(),
    );
    let ctx = open(&device);

    const ROUNDS: usize = 200;
    for round in 0..ROUNDS {
        queue(&device, ctx, round as u64);
        device.device_run(ctx).unwrap();

        let barrier = Arc::new(Barrier::new(2));
        let timeout = {
            let device = Arc::clone(&device);
            let watchdog = Arc::clone(&watchdog);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                if watchdog.fire() {
                    let _ = device.watchdog_timeout();
                }
            })
        };

        barrier.wait();
        device.irq_done(BufState::Done);
        timeout.join().unwrap();

        assert_eq!(
            results.lock().unwrap().len(),
            round + 1,
            "第 {} 轮: 结束流程必须恰好执行一次",
            round
        );
        assert_eq!(device.job_state(), JobState::Idle);
    }

    let results = results.lock().unwrap();
    let sequences: Vec<u32> = results.iter().map(|r| r.dst.sequence).collect();
    assert_eq!(sequences, (0..ROUNDS as u32).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn test_tokio_watchdog_times_out_hung_job() {
    let results = Arc::new(Mutex::new(Vec::<JobResult>::new()));
    let device = VpuDevice::spawn_on(
        tokio::runtime::Handle::current(),
        RecordingRegisters::new(),
        Box::new(LinearDmaAllocator::default()),
        VpuConfig::default(),
        results.clone(),
    )
    .unwrap();
    let ctx = open(&device);
    queue(&device, ctx, 7);
    device.device_run(ctx).unwrap();
    device.with_regs(|r| {
        r.take_writes();
    });

    tokio::time::sleep(Duration::from_millis(1900)).await;
    assert!(results.lock().unwrap().is_empty(), "超时前任务仍在运行");
    assert_eq!(device.job_state(), JobState::Running);

    tokio::time::sleep(Duration::from_millis(200)).await;
    {
        let results = results.lock().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].state, BufState::Error);
        assert_eq!(results[0].dst.timestamp, 7);
    }
    let writes: Vec<_> = device.with_regs(|r| r.writes().iter().map(|w| (w.reg, w.value)).collect());
    assert_eq!(
        writes,
        vec![(RKVDEC_REG_INTERRUPT, RKVDEC_IRQ_DIS), (RKVDEC_REG_SYSCTRL, 0)],
        "超时后复位硬件"
    );
    assert_eq!(device.job_state(), JobState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_tokio_watchdog_cancelled_by_irq() {
    let results = Arc::new(Mutex::new(Vec::<JobResult>::new()));
    let device = VpuDevice::spawn_on(
        tokio::runtime::Handle::current(),
        RecordingRegisters::new(),
        Box::new(LinearDmaAllocator::default()),
        VpuConfig::default(),
        results.clone(),
    )
    .unwrap();
    let ctx = open(&device);
    queue(&device, ctx, 9);
    device.device_run(ctx).unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;
    device.with_regs(|r| r.preset(RKVDEC_REG_INTERRUPT, RKVDEC_IRQ | RKVDEC_RDY_STA));
    assert_eq!(device.handle_irq(), BufState::Done);

    tokio::time::sleep(Duration::from_secs(5)).await;
    let results = results.lock().unwrap();
    assert_eq!(results.len(), 1, "取消后看门狗不应再结束任务");
    assert_eq!(results[0].state, BufState::Done);
}
