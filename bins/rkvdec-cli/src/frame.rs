//! 帧描述文件与离线配置生成.
//!
//! 帧描述是 JSON: 一帧的 SPS/PPS, 解码参数, 片参数, 可选的量化矩阵,
//! 以及参考帧时间戳到设备地址的映射. 生成过程不接触硬件, 寄存器写入
//! 记录在内存寄存器文件中.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use rkvdec::codec::format::{FOURCC_H264_SLICE, FOURCC_NV12};
use rkvdec::codec::h264::{DecodeParams, Pps, ScalingMatrix, SliceParams, Sps, SpsFlags};
use rkvdec::codec::regs::reg_name;
use rkvdec::codec::{
    CodecOps, ControlSet, FrameBuffer, H264Decoder, PixFormat, RK3399_VDEC_FORMATS, RunContext,
    find_format, try_fmt,
};
use rkvdec::core::{
    DmaAddr, LinearDmaAllocator, ManualWatchdog, RecordingRegisters, VpuConfig, WriteKind,
};

/// 缓冲区描述
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferDesc {
    pub dma: DmaAddr,
    pub size: u32,
}

/// 已解码参考帧
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePicture {
    pub timestamp: u64,
    pub dma: DmaAddr,
}

/// 一帧的描述
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameFile {
    pub sps: Sps,
    pub pps: Pps,
    #[serde(default)]
    pub scaling_matrix: ScalingMatrix,
    #[serde(default)]
    pub decode_params: DecodeParams,
    #[serde(default)]
    pub slice_params: SliceParams,
    #[serde(default)]
    pub references: Vec<ReferencePicture>,
    #[serde(default = "default_src")]
    pub src: BufferDesc,
    #[serde(default = "default_dst")]
    pub dst: BufferDesc,
    /// 当前帧时间戳
    #[serde(default)]
    pub timestamp: u64,
}

fn default_src() -> BufferDesc {
    BufferDesc {
        dma: 0x1000_0000,
        size: 0x0010_0000,
    }
}

fn default_dst() -> BufferDesc {
    BufferDesc {
        dma: 0x2000_0000,
        size: 0x0100_0000,
    }
}

impl FrameFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("读取帧描述失败, path={}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("解析帧描述失败, path={}", path.display()))
    }

    /// SPS 给出的图像尺寸 (像素)
    pub fn coded_size(&self) -> (u32, u32) {
        let field_factor = if self.sps.flags.contains(SpsFlags::FRAME_MBS_ONLY) {
            1
        } else {
            2
        };
        (
            self.sps.width_in_mbs() * 16,
            self.sps.height_in_map_units() * field_factor * 16,
        )
    }

    fn controls(&self) -> Result<ControlSet> {
        let mut set = ControlSet::default();
        set.parameter_sets.store_sps(self.sps.clone())?;
        set.parameter_sets.store_pps(self.pps)?;
        set.scaling_matrix = Some(self.scaling_matrix.clone());
        set.decode_params = Some(self.decode_params.clone());
        set.slice_params = Some(self.slice_params);
        Ok(set)
    }
}

/// 一次寄存器写入
#[derive(Debug, Clone, Serialize)]
pub struct RegisterEntry {
    pub offset: u32,
    pub name: Option<&'static str>,
    pub value: u32,
    pub ordered: bool,
}

/// 生成结果
#[derive(Debug, Clone, Serialize)]
pub struct DumpReport {
    pub width: u32,
    pub height: u32,
    pub pps_id: u8,
    pub registers: Vec<RegisterEntry>,
    /// 当前 PPS id 的 SPS/PPS 参数包
    pub pps_record: Vec<u32>,
    /// RPS 表
    pub rps: Vec<u32>,
}

/// 生成一帧的寄存器配置和辅助表
pub fn run_frame(
    frame: &FrameFile,
    config: &VpuConfig,
    size: Option<(u32, u32)>,
) -> Result<DumpReport> {
    let controls = frame.controls()?;
    let (width, height) = size.unwrap_or_else(|| frame.coded_size());

    let coded_fmt = find_format(&RK3399_VDEC_FORMATS, FOURCC_H264_SLICE)
        .context("格式表缺少 H.264 码流格式")?;
    let mut dst_fmt = PixFormat::new(FOURCC_NV12, width, height);
    try_fmt(&RK3399_VDEC_FORMATS, &mut dst_fmt, false, coded_fmt)?;
    info!(
        "输出格式 {} {}x{}, {} 字节",
        dst_fmt.pixelformat, dst_fmt.width, dst_fmt.height, dst_fmt.sizeimage
    );

    let pictures: HashMap<u64, DmaAddr> = frame
        .references
        .iter()
        .map(|r| (r.timestamp, r.dma))
        .collect();
    let src = FrameBuffer {
        dma: frame.src.dma,
        size: frame.src.size,
        timestamp: frame.timestamp,
    };
    let dst = FrameBuffer {
        dma: frame.dst.dma,
        size: frame.dst.size,
        timestamp: frame.timestamp,
    };

    let mut allocator = LinearDmaAllocator::default();
    let mut regs = RecordingRegisters::new();
    let watchdog = ManualWatchdog::new();
    let mut decoder = H264Decoder::new();
    decoder.init(&mut allocator)?;

    let result = decoder.run(RunContext {
        config,
        controls: &controls,
        src: &src,
        dst: &dst,
        dst_fmt: &dst_fmt,
        pictures: &pictures,
        regs: &mut regs,
        watchdog: &watchdog,
    });
    let report = result.map_err(anyhow::Error::from).and_then(|()| {
        let table = decoder.priv_table().context("辅助缓冲区未初始化")?;
        let pps_id = frame.slice_params.pic_parameter_set_id;
        Ok(DumpReport {
            width: dst_fmt.width,
            height: dst_fmt.height,
            pps_id,
            registers: regs
                .writes()
                .iter()
                .map(|w| RegisterEntry {
                    offset: w.reg,
                    name: reg_name(w.reg),
                    value: w.value,
                    ordered: w.kind == WriteKind::Ordered,
                })
                .collect(),
            pps_record: table.param_set(pps_id).to_vec(),
            rps: table.rps_words().to_vec(),
        })
    });
    decoder.exit(&mut allocator);
    report
}
