//! CAPTURE 队列的已解码图像索引.

use std::collections::HashMap;

use rkvdec_core::{DmaAddr, PictureStore};

/// 时间戳 → 已解码缓冲区设备地址
///
/// 每个任务结束后登记输出缓冲区; 缓冲区被重新排队时其旧时间戳失效.
#[derive(Debug, Default, Clone)]
pub struct CapturePictureStore {
    pictures: HashMap<u64, DmaAddr>,
}

impl CapturePictureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一帧已解码图像
    pub fn insert(&mut self, timestamp: u64, addr: DmaAddr) {
        // 同一缓冲区只保留最新的时间戳
        self.pictures.retain(|_, a| *a != addr);
        self.pictures.insert(timestamp, addr);
    }

    /// 缓冲区重新排队, 移除它的旧登记
    pub fn forget_buffer(&mut self, addr: DmaAddr) {
        self.pictures.retain(|_, a| *a != addr);
    }

    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }

    pub fn clear(&mut self) {
        self.pictures.clear();
    }
}

impl PictureStore for CapturePictureStore {
    fn lookup(&self, timestamp: u64) -> Option<DmaAddr> {
        self.pictures.get(&timestamp).copied()
    }
}
