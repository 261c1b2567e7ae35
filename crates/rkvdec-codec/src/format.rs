//! 格式表与格式协商.
//!
//! 解码器的 OUTPUT 队列 (码流) 使用编码格式, CAPTURE 队列 (解码图像) 使用原始格式.
//! 原始格式的尺寸范围跟随当前编码格式.

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use rkvdec_core::{VpuError, VpuResult};

use crate::codec_mode::CodecMode;

/// 宏块边长
pub const H264_MB_DIM: u32 = 16;

/// 四字符格式码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fourcc(pub u32);

impl Fourcc {
    pub const fn new(code: &[u8; 4]) -> Self {
        Self(
            code[0] as u32
                | (code[1] as u32) << 8
                | (code[2] as u32) << 16
                | (code[3] as u32) << 24,
        )
    }

    pub const fn bytes(&self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for Fourcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.bytes() {
            write!(f, "{}", char::from(b & 0x7f))?;
        }
        Ok(())
    }
}

impl FromStr for Fourcc {
    type Err = VpuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| VpuError::InvalidArgument(format!("fourcc 必须为 4 个字符: {:?}", s)))?;
        Ok(Self::new(&code))
    }
}

impl Serialize for Fourcc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fourcc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// NV12: 亮度平面后接交错的 CbCr 平面
pub const FOURCC_NV12: Fourcc = Fourcc::new(b"NV12");
/// H.264 片数据 (Annex B)
pub const FOURCC_H264_SLICE: Fourcc = Fourcc::new(b"S264");

/// 分步帧尺寸范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSizeRange {
    pub min_width: u32,
    pub max_width: u32,
    pub step_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    pub step_height: u32,
}

/// 硬件支持的格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VpuFormat {
    pub fourcc: Fourcc,
    pub codec_mode: CodecMode,
    /// 码流最大深度, 用于估算默认缓冲区大小
    pub max_depth: u32,
    /// 编码输出头部大小
    pub header_size: u32,
    /// 仅编码格式有尺寸范围
    pub frmsize: Option<FrameSizeRange>,
}

impl VpuFormat {
    /// 是否为编码 (码流) 格式
    pub fn is_coded(&self) -> bool {
        self.codec_mode != CodecMode::None
    }
}

/// RK3399 视频解码器支持的格式
pub static RK3399_VDEC_FORMATS: [VpuFormat; 2] = [
    VpuFormat {
        fourcc: FOURCC_NV12,
        codec_mode: CodecMode::None,
        max_depth: 0,
        header_size: 0,
        frmsize: None,
    },
    VpuFormat {
        fourcc: FOURCC_H264_SLICE,
        codec_mode: CodecMode::H264Dec,
        max_depth: 2,
        header_size: 0,
        frmsize: Some(FrameSizeRange {
            min_width: 48,
            max_width: 3840,
            step_width: H264_MB_DIM,
            min_height: 48,
            max_height: 2160,
            step_height: H264_MB_DIM,
        }),
    },
];

/// 单平面图像格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixFormat {
    pub pixelformat: Fourcc,
    pub width: u32,
    pub height: u32,
    pub num_planes: u32,
    pub bytesperline: u32,
    pub sizeimage: u32,
}

impl PixFormat {
    /// 指定格式和尺寸, 其余字段为 0
    pub fn new(pixelformat: Fourcc, width: u32, height: u32) -> Self {
        Self {
            pixelformat,
            width,
            height,
            num_planes: 1,
            bytesperline: 0,
            sizeimage: 0,
        }
    }
}

/// 按 fourcc 查找格式
pub fn find_format(formats: &'static [VpuFormat], fourcc: Fourcc) -> Option<&'static VpuFormat> {
    formats.iter().find(|f| f.fourcc == fourcc)
}

/// 第一个编码 (`bitstream = true`) 或原始格式
pub fn default_format(formats: &'static [VpuFormat], bitstream: bool) -> Option<&'static VpuFormat> {
    formats.iter().find(|f| f.is_coded() == bitstream)
}

/// 编码格式的帧尺寸范围. 只有一个分步范围, `index` 必须为 0.
pub fn enum_framesizes(
    formats: &'static [VpuFormat],
    index: u32,
    fourcc: Fourcc,
) -> VpuResult<FrameSizeRange> {
    if index != 0 {
        return Err(VpuError::InvalidArgument(format!(
            "帧尺寸索引必须为 0, 实际为 {}",
            index
        )));
    }
    let fmt = find_format(formats, fourcc)
        .ok_or_else(|| VpuError::InvalidArgument(format!("不支持的码流格式: {}", fourcc)))?;
    fmt.frmsize
        .ok_or_else(|| VpuError::InvalidArgument(format!("原始格式没有帧尺寸范围: {}", fourcc)))
}

/// 按原始格式填写平面布局
pub fn fill_pixfmt(pix: &mut PixFormat, fourcc: Fourcc, width: u32, height: u32) -> VpuResult<()> {
    if fourcc != FOURCC_NV12 {
        return Err(VpuError::Unsupported(format!("无法计算平面布局: {}", fourcc)));
    }
    pix.pixelformat = fourcc;
    pix.width = width;
    pix.height = height;
    pix.num_planes = 1;
    pix.bytesperline = width;
    pix.sizeimage = width * height * 3 / 2;
    Ok(())
}

/// 调整 `pix` 为硬件可接受的格式, 返回选中的格式条目.
///
/// `coded` 表示 `pix` 是编码格式一侧. 原始格式一侧的尺寸范围来自 `coded_fmt`.
/// 未知 fourcc 替换为该侧的默认格式.
pub fn try_fmt(
    formats: &'static [VpuFormat],
    pix: &mut PixFormat,
    coded: bool,
    coded_fmt: &VpuFormat,
) -> VpuResult<&'static VpuFormat> {
    debug!("尝试格式 {}", pix.pixelformat);

    let fmt = match find_format(formats, pix.pixelformat) {
        Some(fmt) => fmt,
        None => {
            let fmt = default_format(formats, coded)
                .ok_or_else(|| VpuError::Internal("格式表缺少默认格式".into()))?;
            pix.pixelformat = fmt.fourcc;
            fmt
        }
    };

    let range_fmt = if coded {
        pix.num_planes = 1;
        fmt
    } else {
        coded_fmt
    };
    let range = range_fmt.frmsize.ok_or_else(|| {
        VpuError::InvalidArgument(format!("格式 {} 没有帧尺寸范围", range_fmt.fourcc))
    })?;

    let width = pix
        .width
        .clamp(range.min_width, range.max_width)
        .next_multiple_of(range.step_width);
    let height = pix
        .height
        .clamp(range.min_height, range.max_height)
        .next_multiple_of(range.step_height);
    pix.width = width;
    pix.height = height;

    if !coded {
        fill_pixfmt(pix, fmt.fourcc, width, height)?;
    } else if pix.sizeimage == 0 {
        pix.sizeimage = fmt.header_size + width * height * fmt.max_depth;
    }

    Ok(fmt)
}

/// 上下文的一对格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatState {
    pub src_fmt: PixFormat,
    pub vpu_src_fmt: &'static VpuFormat,
    pub dst_fmt: PixFormat,
    pub vpu_dst_fmt: &'static VpuFormat,
}

/// 恢复默认格式: 编码格式取最小尺寸, 原始格式由其推导
pub fn reset_formats(formats: &'static [VpuFormat], encoder: bool) -> VpuResult<FormatState> {
    let coded = default_format(formats, true)
        .ok_or_else(|| VpuError::Internal("格式表缺少编码格式".into()))?;
    let raw = default_format(formats, false)
        .ok_or_else(|| VpuError::Internal("格式表缺少原始格式".into()))?;
    let range = coded
        .frmsize
        .ok_or_else(|| VpuError::Internal(format!("编码格式 {} 没有帧尺寸范围", coded.fourcc)))?;

    let mut coded_pix = PixFormat::new(coded.fourcc, range.min_width, range.min_height);
    coded_pix.sizeimage = coded.header_size + range.min_width * range.min_height * coded.max_depth;

    let mut raw_pix = PixFormat::new(raw.fourcc, 0, 0);
    fill_pixfmt(&mut raw_pix, raw.fourcc, range.min_width, range.min_height)?;

    Ok(if encoder {
        FormatState {
            src_fmt: raw_pix,
            vpu_src_fmt: raw,
            dst_fmt: coded_pix,
            vpu_dst_fmt: coded,
        }
    } else {
        FormatState {
            src_fmt: coded_pix,
            vpu_src_fmt: coded,
            dst_fmt: raw_pix,
            vpu_dst_fmt: raw,
        }
    })
}
