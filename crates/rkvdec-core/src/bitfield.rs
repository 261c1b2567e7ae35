//! 硬件位域写入.
//!
//! 把一段 32 位字视为连续的小端位流 (第 n 位位于第 n/32 个字的第 n%32 位),
//! 按 (偏移, 长度) 写入子字段. 硬件参数包中的字段会跨越字边界,
//! 跨界字段拆分为两次带掩码的写入.
//!
//! 这是构造硬件表的底层原语, 不做越界校验: 调用方保证缓冲区足够大,
//! 且字段长度在 1..=32 之间.
//!
//! # 示例
//! ```
//! use rkvdec_core::bitfield::{BitField, read_field, write_field};
//!
//! let mut words = [0u32; 2];
//! // 偏移 28, 长度 8: 低 4 位落在字 0 高端, 高 4 位落在字 1 低端
//! write_field(&mut words, BitField::new(28, 8), 0xab);
//! assert_eq!(words, [0xb000_0000, 0x0000_000a]);
//! assert_eq!(read_field(&words, BitField::new(28, 8)), 0xab);
//! ```

/// 位域描述: 起始位偏移与位长度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitField {
    /// 起始位偏移 (相对缓冲区起点)
    pub offset: u32,
    /// 位长度 (1..=32)
    pub len: u32,
}

impl BitField {
    /// 创建位域
    pub const fn new(offset: u32, len: u32) -> Self {
        Self { offset, len }
    }

    /// 第 `word` 个字中从第 `bit` 位开始的位域
    pub const fn at(word: u32, bit: u32, len: u32) -> Self {
        Self::new(32 * word + bit, len)
    }

    /// 字段结束位置 (不含)
    pub const fn end(&self) -> u32 {
        self.offset + self.len
    }

    /// 字段是否跨越 32 位字边界
    pub const fn straddles_word(&self) -> bool {
        self.offset % 32 + self.len > 32
    }
}

/// 低 `len` 位全 1 的掩码, len=32 时为全 1
const fn low_mask(len: u32) -> u32 {
    if len >= 32 { u32::MAX } else { (1u32 << len) - 1 }
}

/// 把 `value` 的低 `field.len` 位写入 `words` 的 `field` 位置.
///
/// 字段之外的位保持不变.
pub fn write_field(words: &mut [u32], field: BitField, value: u32) {
    debug_assert!(
        (1..=32).contains(&field.len),
        "write_field: len={} 超出 1..=32",
        field.len
    );

    let word = (field.offset / 32) as usize;
    let bit = field.offset % 32;
    let value = value & low_mask(field.len);

    if field.straddles_word() {
        let len1 = 32 - bit;
        let len2 = field.len - len1;

        words[word] &= !(low_mask(len1) << bit);
        words[word] |= value << bit;

        words[word + 1] &= !low_mask(len2);
        words[word + 1] |= value >> len1;
    } else {
        words[word] &= !(low_mask(field.len) << bit);
        words[word] |= value << bit;
    }
}

/// 读取 `field` 位置的字段值.
pub fn read_field(words: &[u32], field: BitField) -> u32 {
    let word = (field.offset / 32) as usize;
    let bit = field.offset % 32;

    if field.straddles_word() {
        let len1 = 32 - bit;
        let len2 = field.len - len1;
        let low = (words[word] >> bit) & low_mask(len1);
        let high = words[word + 1] & low_mask(len2);
        low | (high << len1)
    } else {
        (words[word] >> bit) & low_mask(field.len)
    }
}
