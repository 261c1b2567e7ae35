//! 任务结果与完成通知.

use std::sync::Mutex;
use std::sync::mpsc::Sender;

use log::warn;

use rkvdec_codec::BufState;

use crate::buffer::VideoBuffer;

/// 一个结束的任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub ctx_id: u32,
    pub src: VideoBuffer,
    pub dst: VideoBuffer,
    pub state: BufState,
}

/// 任务完成通知
pub trait JobSink: Send + Sync {
    fn job_done(&self, result: JobResult);
}

impl JobSink for Sender<JobResult> {
    fn job_done(&self, result: JobResult) {
        if self.send(result).is_err() {
            warn!("任务结果接收端已关闭");
        }
    }
}

/// 收集全部结果, 离线工具和测试使用
impl JobSink for Mutex<Vec<JobResult>> {
    fn job_done(&self, result: JobResult) {
        match self.lock() {
            Ok(mut results) => results.push(result),
            Err(poisoned) => poisoned.into_inner().push(result),
        }
    }
}
