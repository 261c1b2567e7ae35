//! 寄存器读写接口.
//!
//! 配置阶段的寄存器使用 relaxed (posted) 写入, 启动硬件的最后一次写入
//! 必须是有序写入: 硬件看到启动位时, 之前所有 relaxed 写入都已可见.

use std::collections::BTreeMap;

use log::trace;

/// 寄存器读写能力
pub trait RegisterIo: Send {
    /// relaxed 写入, 不保证与其他写入的顺序
    fn write_relaxed(&mut self, reg: u32, value: u32);

    /// 有序写入, 之前的所有写入先于本次写入对硬件可见
    fn write(&mut self, reg: u32, value: u32);

    /// 读取寄存器
    fn read(&mut self, reg: u32) -> u32;
}

/// 写入类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Relaxed,
    Ordered,
}

/// 一次寄存器写入记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegWrite {
    /// 寄存器字节偏移
    pub reg: u32,
    pub value: u32,
    pub kind: WriteKind,
}

/// 记录所有写入的寄存器文件
///
/// 用于离线生成寄存器配置和测试. 读取返回最近写入 (或预置) 的值, 未写过的寄存器读为 0.
#[derive(Debug, Default, Clone)]
pub struct RecordingRegisters {
    file: BTreeMap<u32, u32>,
    log: Vec<RegWrite>,
}

impl RecordingRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置寄存器值 (模拟硬件状态), 不计入写入记录
    pub fn preset(&mut self, reg: u32, value: u32) {
        self.file.insert(reg, value);
    }

    /// 寄存器当前值
    pub fn value(&self, reg: u32) -> Option<u32> {
        self.file.get(&reg).copied()
    }

    /// 按发生顺序排列的写入记录
    pub fn writes(&self) -> &[RegWrite] {
        &self.log
    }

    /// 取出并清空写入记录
    pub fn take_writes(&mut self) -> Vec<RegWrite> {
        std::mem::take(&mut self.log)
    }

    fn record(&mut self, reg: u32, value: u32, kind: WriteKind) {
        self.file.insert(reg, value);
        self.log.push(RegWrite { reg, value, kind });
    }
}

impl RegisterIo for RecordingRegisters {
    fn write_relaxed(&mut self, reg: u32, value: u32) {
        self.record(reg, value, WriteKind::Relaxed);
    }

    fn write(&mut self, reg: u32, value: u32) {
        self.record(reg, value, WriteKind::Ordered);
    }

    fn read(&mut self, reg: u32) -> u32 {
        self.value(reg).unwrap_or(0)
    }
}

/// 带追踪日志的寄存器访问包装
///
/// 打开时以 `字序号 = 值` 的形式记录每次读写.
#[derive(Debug)]
pub struct TracedRegisters<R> {
    inner: R,
    enabled: bool,
}

impl<R: RegisterIo> TracedRegisters<R> {
    pub fn new(inner: R, enabled: bool) -> Self {
        Self { inner, enabled }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: RegisterIo> RegisterIo for TracedRegisters<R> {
    fn write_relaxed(&mut self, reg: u32, value: u32) {
        if self.enabled {
            trace!("0x{:04x} = 0x{:08x}", reg / 4, value);
        }
        self.inner.write_relaxed(reg, value);
    }

    fn write(&mut self, reg: u32, value: u32) {
        if self.enabled {
            trace!("0x{:04x} = 0x{:08x}", reg / 4, value);
        }
        self.inner.write(reg, value);
    }

    fn read(&mut self, reg: u32) -> u32 {
        let value = self.inner.read(reg);
        if self.enabled {
            trace!("0x{:04x} = 0x{:08x}", reg / 4, value);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_keeps_order_and_kind() {
        let mut regs = RecordingRegisters::new();
        regs.write_relaxed(0x08, 1);
        regs.write_relaxed(0x0c, 2);
        regs.write(0x04, 3);

        let kinds: Vec<_> = regs.writes().iter().map(|w| (w.reg, w.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (0x08, WriteKind::Relaxed),
                (0x0c, WriteKind::Relaxed),
                (0x04, WriteKind::Ordered),
            ]
        );
        assert_eq!(regs.read(0x0c), 2);
        assert_eq!(regs.read(0x10), 0);
    }

    #[test]
    fn test_preset_is_not_logged() {
        let mut regs = RecordingRegisters::new();
        regs.preset(0x04, 0x1000);
        assert!(regs.writes().is_empty());
        assert_eq!(regs.read(0x04), 0x1000);
    }

    #[test]
    fn test_traced_registers_forward() {
        let mut regs = TracedRegisters::new(RecordingRegisters::new(), true);
        regs.write_relaxed(0x20, 0xabcd);
        regs.write(0x04, 1);
        assert_eq!(regs.read(0x20), 0xabcd);
        assert_eq!(regs.into_inner().take_writes().len(), 2);
    }
}
