//! 统一错误类型定义.
//!
//! 所有 rkvdec crate 共用的错误类型, 支持跨模块传播.

use thiserror::Error;

/// rkvdec 统一错误类型
#[derive(Debug, Error)]
pub enum VpuError {
    /// 无效参数
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 当前请求缺少必需的控制结构
    #[error("缺少控制结构: {0}")]
    MissingControl(&'static str),

    /// 控制结构内容非法 (参数集 id 越界等)
    #[error("非法控制结构: {0}")]
    InvalidControl(String),

    /// 不支持的操作
    #[error("不支持的操作: {0}")]
    Unsupported(String),

    /// DMA 内存分配失败
    #[error("内存分配失败: {0}")]
    OutOfMemory(String),

    /// 设备已有任务在运行
    #[error("设备忙: {0}")]
    Busy(String),

    /// 硬件处理超时
    #[error("硬件处理超时")]
    Timeout,

    /// 内部错误 (不应发生)
    #[error("内部错误: {0}")]
    Internal(String),
}

/// rkvdec 统一 Result 类型
pub type VpuResult<T> = Result<T, VpuError>;
