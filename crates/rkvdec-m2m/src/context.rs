//! 编解码上下文.
//!
//! 每个打开的流一个上下文: 格式, 队列, 暂存的控制结构, 以及按模式区分的
//! codec 私有数据. 解码上下文只持有 codec 实现; 编码上下文额外持有硬件输出的
//! 中转缓冲区, 结束时复制到 CAPTURE 缓冲区头部之后.

use std::collections::VecDeque;

use log::debug;

use rkvdec_codec::{
    CodecOps, ControlSet, FormatState, PixFormat, VpuFormat, reset_formats, try_fmt,
};
use rkvdec_core::{DmaAllocator, DmaBuffer, VpuError, VpuResult};

use crate::buffer::VideoBuffer;
use crate::picture_store::CapturePictureStore;

/// 按模式区分的上下文数据
pub enum CodecContext {
    Decoder {
        ops: Box<dyn CodecOps>,
    },
    /// 只用于带编码器的硬件变体. RK3399 解码器不注册编码器,
    /// `VpuDevice::open_context` 不会创建此类上下文.
    Encoder {
        ops: Box<dyn CodecOps>,
        /// 硬件写入编码数据的中转缓冲区
        bounce_buffer: DmaBuffer,
    },
}

impl CodecContext {
    pub fn ops(&self) -> &dyn CodecOps {
        match self {
            Self::Decoder { ops } | Self::Encoder { ops, .. } => ops.as_ref(),
        }
    }

    pub fn ops_mut(&mut self) -> &mut dyn CodecOps {
        match self {
            Self::Decoder { ops } | Self::Encoder { ops, .. } => ops.as_mut(),
        }
    }

    pub fn is_encoder(&self) -> bool {
        matches!(self, Self::Encoder { .. })
    }
}

/// 一个流的上下文
pub struct VpuContext {
    pub id: u32,
    pub codec: CodecContext,
    pub formats: FormatState,
    /// 已结束的 OUTPUT 缓冲区计数
    pub sequence_out: u32,
    /// 已结束的 CAPTURE 缓冲区计数
    pub sequence_cap: u32,
    /// 当前请求的控制结构
    pub controls: ControlSet,
    pub src_queue: VecDeque<VideoBuffer>,
    pub dst_queue: VecDeque<VideoBuffer>,
    /// CAPTURE 缓冲区中的已解码图像
    pub pictures: CapturePictureStore,
}

impl VpuContext {
    /// 创建上下文, 格式恢复为默认值并初始化 codec
    pub fn new(
        id: u32,
        mut codec: CodecContext,
        formats: &'static [VpuFormat],
        allocator: &mut dyn DmaAllocator,
    ) -> VpuResult<Self> {
        let fmts = reset_formats(formats, codec.is_encoder())?;
        codec.ops_mut().init(allocator)?;
        debug!(
            "上下文 {} 创建: {} ({})",
            id,
            codec.ops().name(),
            codec.ops().mode()
        );
        Ok(Self {
            id,
            codec,
            formats: fmts,
            sequence_out: 0,
            sequence_cap: 0,
            controls: ControlSet::default(),
            src_queue: VecDeque::new(),
            dst_queue: VecDeque::new(),
            pictures: CapturePictureStore::new(),
        })
    }

    pub fn is_encoder(&self) -> bool {
        self.codec.is_encoder()
    }

    /// 设置码流一侧格式. 解码上下文的图像格式随之重置.
    pub fn set_coded_format(
        &mut self,
        formats: &'static [VpuFormat],
        pix: &mut PixFormat,
    ) -> VpuResult<()> {
        if !self.src_queue.is_empty() || !self.dst_queue.is_empty() {
            return Err(VpuError::Busy("队列中仍有缓冲区".into()));
        }
        let fmt = try_fmt(formats, pix, true, self.coded_vpu_fmt())?;
        if self.is_encoder() {
            self.formats.dst_fmt = *pix;
            self.formats.vpu_dst_fmt = fmt;
        } else {
            self.formats.src_fmt = *pix;
            self.formats.vpu_src_fmt = fmt;
            let mut raw = self.formats.dst_fmt;
            raw.width = pix.width;
            raw.height = pix.height;
            try_fmt(formats, &mut raw, false, fmt)?;
            self.formats.dst_fmt = raw;
        }
        debug!(
            "上下文 {}: 码流格式 {} {}x{}",
            self.id, pix.pixelformat, pix.width, pix.height
        );
        Ok(())
    }

    /// 设置图像一侧格式
    pub fn set_raw_format(
        &mut self,
        formats: &'static [VpuFormat],
        pix: &mut PixFormat,
    ) -> VpuResult<()> {
        if !self.src_queue.is_empty() || !self.dst_queue.is_empty() {
            return Err(VpuError::Busy("队列中仍有缓冲区".into()));
        }
        let fmt = try_fmt(formats, pix, false, self.coded_vpu_fmt())?;
        if self.is_encoder() {
            self.formats.src_fmt = *pix;
            self.formats.vpu_src_fmt = fmt;
        } else {
            self.formats.dst_fmt = *pix;
            self.formats.vpu_dst_fmt = fmt;
        }
        Ok(())
    }

    fn coded_vpu_fmt(&self) -> &'static VpuFormat {
        if self.is_encoder() {
            self.formats.vpu_dst_fmt
        } else {
            self.formats.vpu_src_fmt
        }
    }

    /// 填写结束的 CAPTURE 缓冲区.
    ///
    /// 解码: bytesused 为输出图像大小. 编码: 从中转缓冲区复制 `bytesused`
    /// 字节到头部之后, 超出缓冲区容量时返回错误.
    pub fn buf_finish(&self, buf: &mut VideoBuffer, bytesused: u32) -> VpuResult<()> {
        match &self.codec {
            CodecContext::Decoder { .. } => {
                buf.bytesused = self.formats.dst_fmt.sizeimage;
                Ok(())
            }
            CodecContext::Encoder { bounce_buffer, .. } => {
                let header_size = self.formats.vpu_dst_fmt.header_size;
                let avail = buf.plane_size().saturating_sub(header_size);
                if bytesused > avail {
                    return Err(VpuError::InvalidArgument(format!(
                        "编码数据超出缓冲区: bytesused={}, 可用={}",
                        bytesused, avail
                    )));
                }
                let start = header_size as usize;
                let len = bytesused as usize;
                if len > bounce_buffer.size() {
                    return Err(VpuError::InvalidArgument(format!(
                        "编码数据超出中转缓冲区: bytesused={}, 中转={}",
                        bytesused,
                        bounce_buffer.size()
                    )));
                }
                buf.plane.as_mut_slice()[start..start + len]
                    .copy_from_slice(&bounce_buffer.as_slice()[..len]);
                buf.bytesused = header_size + bytesused;
                Ok(())
            }
        }
    }

    /// 销毁上下文, 归还 codec 和中转缓冲区占用的内存
    pub fn release(mut self, allocator: &mut dyn DmaAllocator) {
        self.codec.ops_mut().exit(allocator);
        if let CodecContext::Encoder { bounce_buffer, .. } = self.codec {
            allocator.free_coherent(bounce_buffer);
        }
        debug!("上下文 {} 销毁", self.id);
    }
}
