//! 任务结束闩锁.
//!
//! 中断完成和看门狗超时并发竞争结束同一个任务. 两条路径都通过
//! compare-and-swap 把 RUNNING 换成各自的终态, 只有成功的一方执行结束流程.
//!
//! 状态转换: `IDLE → RUNNING → {COMPLETED | TIMED_OUT} → IDLE`

use std::sync::atomic::{AtomicU8, Ordering};

/// 闩锁状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running,
    Completed,
    TimedOut,
}

impl JobState {
    const fn to_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Running => 1,
            Self::Completed => 2,
            Self::TimedOut => 3,
        }
    }

    const fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Running,
            2 => Self::Completed,
            3 => Self::TimedOut,
            _ => Self::Idle,
        }
    }
}

/// 单次赋值的任务结束闩锁
#[derive(Debug, Default)]
pub struct FinishLatch {
    state: AtomicU8,
}

impl FinishLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> JobState {
        JobState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn transition(&self, from: JobState, to: JobState) -> bool {
        self.state
            .compare_exchange(from.to_u8(), to.to_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// IDLE → RUNNING. 已有任务时返回 false.
    pub fn start(&self) -> bool {
        self.transition(JobState::Idle, JobState::Running)
    }

    /// RUNNING → COMPLETED
    pub fn try_complete(&self) -> bool {
        self.transition(JobState::Running, JobState::Completed)
    }

    /// RUNNING → TIMED_OUT
    pub fn try_time_out(&self) -> bool {
        self.transition(JobState::Running, JobState::TimedOut)
    }

    /// 结束流程完成后回到 IDLE
    pub fn release(&self) {
        self.state.store(JobState::Idle.to_u8(), Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_state_transitions() {
        let latch = FinishLatch::new();
        assert_eq!(latch.state(), JobState::Idle);
        assert!(!latch.try_complete(), "空闲时不能完成");
        assert!(latch.start());
        assert!(!latch.start(), "同时只能有一个任务");
        assert!(latch.try_complete());
        assert!(!latch.try_time_out());
        assert_eq!(latch.state(), JobState::Completed);
        latch.release();
        assert!(latch.start());
        assert!(latch.try_time_out());
        assert_eq!(latch.state(), JobState::TimedOut);
    }

    #[test]
    fn test_concurrent_finish_single_winner() {
        for _ in 0..200 {
            let latch = Arc::new(FinishLatch::new());
            assert!(latch.start());
            let barrier = Arc::new(Barrier::new(2));

            let l = Arc::clone(&latch);
            let b = Arc::clone(&barrier);
            let timeout = thread::spawn(move || {
                b.wait();
                l.try_time_out()
            });

            barrier.wait();
            let completed = latch.try_complete();
            let timed_out = timeout.join().unwrap();
            assert!(completed ^ timed_out, "完成与超时必须恰好一个成功");
        }
    }
}
