//! 硬件看门狗接口.
//!
//! 每次启动硬件前武装一次看门狗. 中断完成路径调用 `cancel()`, 返回 false
//! 表示看门狗已经触发 (或未武装), 完成工作由超时路径负责.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// 看门狗能力
pub trait Watchdog: Send + Sync {
    /// 武装看门狗, `timeout` 后触发超时处理
    fn arm(&self, timeout: Duration);

    /// 取消看门狗. 返回 false 表示已经触发或未武装, 为时已晚.
    fn cancel(&self) -> bool;
}

const STATE_IDLE: u64 = 0;
const STATE_PENDING: u64 = 1;
const STATE_CANCELLED: u64 = 2;
const STATE_FIRED: u64 = 3;
const STATE_MASK: u64 = 0b11;

/// 单次武装的状态
///
/// 低 2 位为状态, 其余位为武装代数. 取消和触发都是对同一代 PENDING 状态的
/// compare-and-swap, 两者之中只有一个成功; 旧代的触发不会影响新一代武装.
#[derive(Debug, Default)]
pub struct ArmState {
    word: AtomicU64,
}

impl ArmState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 进入新一代 PENDING 状态, 返回代数
    pub fn arm(&self) -> u64 {
        let prev = self.word.load(Ordering::Acquire);
        let generation = (prev >> 2) + 1;
        self.word
            .store((generation << 2) | STATE_PENDING, Ordering::Release);
        generation
    }

    /// 当前代 PENDING → CANCELLED
    pub fn cancel(&self) -> bool {
        let current = self.word.load(Ordering::Acquire);
        if current & STATE_MASK != STATE_PENDING {
            return false;
        }
        let cancelled = (current & !STATE_MASK) | STATE_CANCELLED;
        self.word
            .compare_exchange(current, cancelled, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// 第 `generation` 代 PENDING → FIRED
    pub fn try_fire(&self, generation: u64) -> bool {
        let pending = (generation << 2) | STATE_PENDING;
        let fired = (generation << 2) | STATE_FIRED;
        self.word
            .compare_exchange(pending, fired, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// 当前代数
    pub fn generation(&self) -> u64 {
        self.word.load(Ordering::Acquire) >> 2
    }

    /// 是否处于等待触发状态
    pub fn is_pending(&self) -> bool {
        self.word.load(Ordering::Acquire) & STATE_MASK == STATE_PENDING
    }

    /// 最近一次武装是否以触发告终
    pub fn has_fired(&self) -> bool {
        self.word.load(Ordering::Acquire) & STATE_MASK == STATE_FIRED
    }

    /// 是否从未武装
    pub fn is_idle(&self) -> bool {
        self.word.load(Ordering::Acquire) & STATE_MASK == STATE_IDLE
    }
}

/// 手动触发的看门狗
///
/// 不计时, 由调用方显式调用 `fire()` 模拟超时. 离线工具和测试使用.
#[derive(Debug, Default)]
pub struct ManualWatchdog {
    state: ArmState,
    timeout_ms: AtomicU64,
}

impl ManualWatchdog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟超时. 返回 true 表示本次触发生效 (未被取消).
    pub fn fire(&self) -> bool {
        self.state.try_fire(self.state.generation())
    }

    /// 最近一次武装的超时时间
    pub fn armed_timeout(&self) -> Option<Duration> {
        if self.state.is_idle() {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms.load(Ordering::Acquire)))
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// 已武装的次数
    pub fn arm_count(&self) -> u64 {
        self.state.generation()
    }
}

impl Watchdog for ManualWatchdog {
    fn arm(&self, timeout: Duration) {
        self.timeout_ms
            .store(timeout.as_millis() as u64, Ordering::Release);
        self.state.arm();
    }

    fn cancel(&self) -> bool {
        self.state.cancel()
    }
}
