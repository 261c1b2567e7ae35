//! 队列缓冲区.

use rkvdec_codec::FrameBuffer;
use rkvdec_core::DmaBuffer;

/// 排队到 OUTPUT (码流) 或 CAPTURE (图像) 队列的单平面缓冲区
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoBuffer {
    /// 队列内索引
    pub index: u32,
    /// 平面 0
    pub plane: DmaBuffer,
    /// 平面 0 有效字节数
    pub bytesused: u32,
    pub timestamp: u64,
    pub sequence: u32,
}

impl VideoBuffer {
    pub fn new(index: u32, plane: DmaBuffer, timestamp: u64) -> Self {
        Self {
            index,
            plane,
            bytesused: 0,
            timestamp,
            sequence: 0,
        }
    }

    /// 平面 0 的容量
    pub fn plane_size(&self) -> u32 {
        self.plane.size() as u32
    }

    /// 交给硬件的描述
    pub fn frame(&self) -> FrameBuffer {
        FrameBuffer {
            dma: self.plane.dma(),
            size: self.plane_size(),
            timestamp: self.timestamp,
        }
    }
}
