//! 设备可见的连续缓冲区.
//!
//! 每个缓冲区同时有 CPU 可访问的内容和硬件使用的设备地址,
//! 两者在缓冲区生命周期内保持有效. 硬件表以 32 位小端字存放.

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::error::{VpuError, VpuResult};

/// 设备 (DMA) 地址. 解码器寄存器为 32 位宽.
pub type DmaAddr = u32;

/// 连续的设备缓冲区
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmaBuffer {
    /// CPU 侧内容
    cpu: Vec<u8>,
    /// 设备地址
    dma: DmaAddr,
}

impl DmaBuffer {
    /// 在设备地址 `dma` 处创建 `size` 字节的清零缓冲区
    pub fn new(dma: DmaAddr, size: usize) -> Self {
        Self {
            cpu: vec![0; size],
            dma,
        }
    }

    /// 缓冲区起始设备地址
    pub fn dma(&self) -> DmaAddr {
        self.dma
    }

    /// 缓冲区内 `offset` 处的设备地址
    pub fn dma_at(&self, offset: usize) -> DmaAddr {
        self.dma.wrapping_add(offset as u32)
    }

    /// 缓冲区字节数
    pub fn size(&self) -> usize {
        self.cpu.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cpu
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.cpu
    }

    /// 把 32 位字按小端序写入 `offset` 处
    pub fn write_words(&mut self, offset: usize, words: &[u32]) {
        let end = offset + words.len() * 4;
        LittleEndian::write_u32_into(words, &mut self.cpu[offset..end]);
    }

    /// 从 `offset` 处按小端序读取 32 位字
    pub fn read_words(&self, offset: usize, words: &mut [u32]) {
        let end = offset + words.len() * 4;
        LittleEndian::read_u32_into(&self.cpu[offset..end], words);
    }

    /// 读取 `offset` 处的 16 位小端值
    pub fn read_u16(&self, offset: usize) -> u16 {
        LittleEndian::read_u16(&self.cpu[offset..offset + 2])
    }
}

/// DMA 一致性内存分配器
pub trait DmaAllocator: Send {
    /// 分配 `size` 字节清零的连续缓冲区
    fn alloc_coherent(&mut self, size: usize) -> VpuResult<DmaBuffer>;

    /// 释放缓冲区
    fn free_coherent(&mut self, buf: DmaBuffer);
}

/// 线性地址分配器
///
/// 在固定的设备地址窗口内顺序分配, 每次分配按页对齐. 释放只回收统计量,
/// 地址不复用.
#[derive(Debug)]
pub struct LinearDmaAllocator {
    next: u64,
    end: u64,
    align: u64,
    in_use: usize,
}

impl LinearDmaAllocator {
    /// 默认页大小
    pub const PAGE_SIZE: u64 = 4096;

    /// 在 `[base, base + size)` 窗口内分配
    pub fn new(base: DmaAddr, size: u64) -> Self {
        Self {
            next: u64::from(base),
            end: u64::from(base) + size,
            align: Self::PAGE_SIZE,
            in_use: 0,
        }
    }

    /// 当前未释放的字节数
    pub fn in_use(&self) -> usize {
        self.in_use
    }
}

impl Default for LinearDmaAllocator {
    fn default() -> Self {
        Self::new(0x1000_0000, 0x1000_0000)
    }
}

impl DmaAllocator for LinearDmaAllocator {
    fn alloc_coherent(&mut self, size: usize) -> VpuResult<DmaBuffer> {
        let start = self.next.div_ceil(self.align) * self.align;
        let end = start + size as u64;
        if end > self.end || end > u64::from(DmaAddr::MAX) + 1 {
            return Err(VpuError::OutOfMemory(format!(
                "DMA 窗口不足, size={}, start=0x{:x}, end=0x{:x}",
                size, start, self.end
            )));
        }
        self.next = end;
        self.in_use += size;
        debug!("DMA 分配: addr=0x{:08x}, size={}", start, size);
        Ok(DmaBuffer::new(start as DmaAddr, size))
    }

    fn free_coherent(&mut self, buf: DmaBuffer) {
        debug!("DMA 释放: addr=0x{:08x}, size={}", buf.dma(), buf.size());
        self.in_use = self.in_use.saturating_sub(buf.size());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_are_little_endian() {
        let mut buf = DmaBuffer::new(0x1000, 8);
        buf.write_words(0, &[0x0403_0201, 0x0807_0605]);
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4, 5, 6, 7, 8]);

        let mut words = [0u32; 2];
        buf.read_words(0, &mut words);
        assert_eq!(words, [0x0403_0201, 0x0807_0605]);
        assert_eq!(buf.read_u16(2), 0x0403);
    }

    #[test]
    fn test_linear_allocator_page_aligns() {
        let mut alloc = LinearDmaAllocator::new(0x2000_0000, 0x10_0000);
        let a = alloc.alloc_coherent(100).unwrap();
        let b = alloc.alloc_coherent(100).unwrap();
        assert_eq!(a.dma(), 0x2000_0000);
        assert_eq!(b.dma(), 0x2000_1000);
        assert!(b.as_slice().iter().all(|&v| v == 0));
        assert_eq!(alloc.in_use(), 200);

        alloc.free_coherent(a);
        assert_eq!(alloc.in_use(), 100);
    }

    #[test]
    fn test_linear_allocator_exhaustion() {
        let mut alloc = LinearDmaAllocator::new(0x1000, 0x2000);
        assert!(alloc.alloc_coherent(0x1800).is_ok());
        match alloc.alloc_coherent(0x1000) {
            Err(VpuError::OutOfMemory(_)) => {}
            other => panic!("期望 OutOfMemory, 实际 {:?}", other),
        }
    }

    #[test]
    fn test_dma_at_offset() {
        let buf = DmaBuffer::new(0x3000_0000, 64);
        assert_eq!(buf.dma_at(0x20), 0x3000_0020);
    }
}
