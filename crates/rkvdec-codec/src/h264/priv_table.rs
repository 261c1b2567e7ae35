//! H.264 辅助缓冲区.
//!
//! 每个解码上下文独占一块设备可见的缓冲区, 按固定偏移划分为五个区域:
//!
//! | 区域 | 偏移 | 大小 (字节) |
//! |------|------|-------------|
//! | CABAC 初始化表 | 0 | 3808 |
//! | 量化矩阵 | 3808 | 608 |
//! | RPS | 4416 | 256 |
//! | PPS/SPS 参数包 (256 × 32) | 4672 | 8192 |
//! | 错误信息 | 12864 | 147456 |

use log::debug;

use rkvdec_core::{DmaAddr, DmaAllocator, DmaBuffer, VpuResult};

use super::cabac_table::H264_CABAC_TABLE;
use super::scaling_list::SCALING_LIST_BYTES;

/// CABAC 区域字节数
pub const CABAC_TABLE_SIZE: usize = 3680 + 128;
/// 量化矩阵区域字节数
pub const SCALING_LIST_SIZE: usize = 6 * 16 + 6 * 64 + 128;
/// RPS 区域字节数
pub const RPS_SIZE: usize = 128 + 128;
/// 单个参数包字节数
pub const PARAM_SET_RECORD_SIZE: usize = 32;
/// 参数包个数, 按 PPS id 索引
pub const PARAM_SET_COUNT: usize = 256;
/// 错误信息区域字节数
pub const ERROR_INFO_SIZE: usize = 256 * 144 * 4;

pub const CABAC_TABLE_OFFSET: usize = 0;
pub const SCALING_LIST_OFFSET: usize = CABAC_TABLE_OFFSET + CABAC_TABLE_SIZE;
pub const RPS_OFFSET: usize = SCALING_LIST_OFFSET + SCALING_LIST_SIZE;
pub const PARAM_SET_OFFSET: usize = RPS_OFFSET + RPS_SIZE;
pub const ERROR_INFO_OFFSET: usize = PARAM_SET_OFFSET + PARAM_SET_COUNT * PARAM_SET_RECORD_SIZE;
/// 辅助缓冲区总字节数
pub const PRIV_TABLE_SIZE: usize = ERROR_INFO_OFFSET + ERROR_INFO_SIZE;

const _: () = assert!(H264_CABAC_TABLE.len() * 4 <= CABAC_TABLE_SIZE);
const _: () = assert!(SCALING_LIST_BYTES <= SCALING_LIST_SIZE);
const _: () = assert!(PRIV_TABLE_SIZE == 160_320);

/// 一个解码上下文的辅助缓冲区
#[derive(Debug)]
pub struct H264PrivTable {
    buf: DmaBuffer,
}

impl H264PrivTable {
    /// 分配缓冲区并写入 CABAC 表
    pub fn alloc(allocator: &mut dyn DmaAllocator) -> VpuResult<Self> {
        let mut buf = allocator.alloc_coherent(PRIV_TABLE_SIZE)?;
        buf.write_words(CABAC_TABLE_OFFSET, &H264_CABAC_TABLE);
        debug!(
            "H264 辅助缓冲区: dma=0x{:08x}, size={}",
            buf.dma(),
            buf.size()
        );
        Ok(Self { buf })
    }

    /// 归还缓冲区
    pub fn free(self, allocator: &mut dyn DmaAllocator) {
        allocator.free_coherent(self.buf);
    }

    pub fn dma(&self) -> DmaAddr {
        self.buf.dma()
    }

    pub fn cabac_dma(&self) -> DmaAddr {
        self.buf.dma_at(CABAC_TABLE_OFFSET)
    }

    pub fn scaling_list_dma(&self) -> DmaAddr {
        self.buf.dma_at(SCALING_LIST_OFFSET)
    }

    pub fn rps_dma(&self) -> DmaAddr {
        self.buf.dma_at(RPS_OFFSET)
    }

    pub fn param_set_dma(&self) -> DmaAddr {
        self.buf.dma_at(PARAM_SET_OFFSET)
    }

    pub fn error_info_dma(&self) -> DmaAddr {
        self.buf.dma_at(ERROR_INFO_OFFSET)
    }

    /// CABAC 区域
    pub fn cabac(&self) -> &[u8] {
        &self.buf.as_slice()[CABAC_TABLE_OFFSET..SCALING_LIST_OFFSET]
    }

    pub fn scaling_list(&self) -> &[u8] {
        &self.buf.as_slice()[SCALING_LIST_OFFSET..RPS_OFFSET]
    }

    pub fn scaling_list_mut(&mut self) -> &mut [u8] {
        &mut self.buf.as_mut_slice()[SCALING_LIST_OFFSET..RPS_OFFSET]
    }

    /// RPS 区域的 32 位字视图
    pub fn rps_words(&self) -> [u32; RPS_SIZE / 4] {
        let mut words = [0u32; RPS_SIZE / 4];
        self.buf.read_words(RPS_OFFSET, &mut words);
        words
    }

    /// 覆盖整个 RPS 区域
    pub fn store_rps(&mut self, words: &[u32; RPS_SIZE / 4]) {
        self.buf.write_words(RPS_OFFSET, words);
    }

    /// RPS 表中第 `slot` 个 DPB 条目的 pic_num
    pub fn rps_pic_num(&self, slot: usize) -> u16 {
        self.buf.read_u16(RPS_OFFSET + slot * 2)
    }

    /// 第 `id` 个参数包
    pub fn param_set(&self, id: u8) -> [u32; PARAM_SET_RECORD_SIZE / 4] {
        let mut words = [0u32; PARAM_SET_RECORD_SIZE / 4];
        self.buf.read_words(param_set_offset(id), &mut words);
        words
    }

    /// 覆盖第 `id` 个参数包, 其他参数包不受影响
    pub fn store_param_set(&mut self, id: u8, words: &[u32; PARAM_SET_RECORD_SIZE / 4]) {
        self.buf.write_words(param_set_offset(id), words);
    }

    /// 整块缓冲区内容
    pub fn as_slice(&self) -> &[u8] {
        self.buf.as_slice()
    }
}

fn param_set_offset(id: u8) -> usize {
    PARAM_SET_OFFSET + usize::from(id) * PARAM_SET_RECORD_SIZE
}
