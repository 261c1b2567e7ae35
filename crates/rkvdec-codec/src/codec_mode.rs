//! 编解码模式.
//!
//! 每个格式条目对应一种模式, 编码格式决定上下文运行哪个 codec 实现.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 编解码模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecMode {
    /// 原始图像格式, 不对应任何 codec
    #[default]
    None,
    /// H.264 片解码
    H264Dec,
    /// JPEG 编码
    JpegEnc,
}

impl CodecMode {
    /// 模式名称
    pub const fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::H264Dec => "h264_dec",
            Self::JpegEnc => "jpeg_enc",
        }
    }

    /// 是否为编码模式
    pub const fn is_encoder(&self) -> bool {
        matches!(self, Self::JpegEnc)
    }
}

impl fmt::Display for CodecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
