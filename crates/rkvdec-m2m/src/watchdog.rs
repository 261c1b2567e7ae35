//! 基于 tokio 的硬件看门狗.
//!
//! 每次武装在运行时上派生一个休眠任务. 休眠结束后任务尝试把本代武装从
//! PENDING 换成 FIRED, 成功才调用超时处理; 取消路径对同一状态做 CAS,
//! 两者只有一个成功.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::trace;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use rkvdec_core::{ArmState, Watchdog};

/// 超时处理函数
pub type TimeoutHandler = Arc<dyn Fn() + Send + Sync>;

/// tokio 看门狗
pub struct TokioWatchdog {
    handle: Handle,
    state: Arc<ArmState>,
    on_fire: TimeoutHandler,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl TokioWatchdog {
    /// 在 `handle` 所属运行时上计时, 超时后调用 `on_fire`
    pub fn new(handle: Handle, on_fire: TimeoutHandler) -> Self {
        Self {
            handle,
            state: Arc::new(ArmState::new()),
            on_fire,
            task: Mutex::new(None),
        }
    }

    /// 是否有等待触发的武装
    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// 最近一次武装是否以超时告终
    pub fn has_fired(&self) -> bool {
        self.state.has_fired()
    }

    fn replace_task(&self, task: Option<JoinHandle<()>>) {
        let mut slot = match self.task.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(old) = std::mem::replace(&mut *slot, task) {
            old.abort();
        }
    }
}

impl Watchdog for TokioWatchdog {
    fn arm(&self, timeout: Duration) {
        let generation = self.state.arm();
        let state = Arc::clone(&self.state);
        let on_fire = Arc::clone(&self.on_fire);
        trace!("看门狗武装: 第 {} 代, {:?}", generation, timeout);

        let task = self.handle.spawn(async move {
            tokio::time::sleep(timeout).await;
            if state.try_fire(generation) {
                on_fire();
            }
        });
        self.replace_task(Some(task));
    }

    fn cancel(&self) -> bool {
        if !self.state.cancel() {
            return false;
        }
        self.replace_task(None);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_watchdog() -> (TokioWatchdog, Arc<AtomicUsize>) {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let wd = TokioWatchdog::new(
            Handle::current(),
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (wd, fired)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_timeout() {
        let (wd, fired) = counting_watchdog();
        wd.arm(Duration::from_millis(2000));

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0, "超时前不应触发");

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(wd.has_fired());
        assert!(!wd.cancel(), "触发后取消应返回 false");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let (wd, fired) = counting_watchdog();
        wd.arm(Duration::from_millis(2000));
        assert!(wd.is_pending());
        assert!(wd.cancel());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_discards_previous_timer() {
        let (wd, fired) = counting_watchdog();
        wd.arm(Duration::from_millis(100));
        wd.arm(Duration::from_millis(1000));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0, "旧一代武装不应触发");

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
