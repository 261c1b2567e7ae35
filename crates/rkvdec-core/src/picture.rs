//! 已解码图像查找.
//!
//! DPB 条目通过不透明的参考时间戳指向之前解码输出的缓冲区,
//! 寄存器构建阶段只读查询该映射.

use std::collections::HashMap;

use crate::dma::DmaAddr;

/// 已解码图像存储
pub trait PictureStore {
    /// 按参考时间戳查找已解码缓冲区的设备地址. 未找到是正常结果.
    fn lookup(&self, timestamp: u64) -> Option<DmaAddr>;
}

impl PictureStore for HashMap<u64, DmaAddr> {
    fn lookup(&self, timestamp: u64) -> Option<DmaAddr> {
        self.get(&timestamp).copied()
    }
}

impl<T: PictureStore + ?Sized> PictureStore for &T {
    fn lookup(&self, timestamp: u64) -> Option<DmaAddr> {
        (**self).lookup(timestamp)
    }
}
