//! # 批处理状态事件
//!
//! 工作线程发给表现层的状态快照，不可变，发送端从不阻塞。
//!
//! ## 依赖关系
//! - 由 `batch/controller.rs` 发出
//! - 被 `commands/runner.rs` 消费渲染

use crate::process::ProgressSample;

/// 批处理的终态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// 所有文件处理成功
    Completed,
    /// 自然结束但存在失败文件，或派生进程失败
    Failed,
    /// 用户请求停止
    Stopped,
    /// 外部工具报告密钥文件缺失，需要用户重新提供密钥
    KeysError,
}

/// 发往表现层的状态事件
///
/// `current` 为展示用的 1 起始序号。
#[derive(Debug, Clone)]
pub enum StatusEvent {
    /// 批开始
    BatchStarted { total: usize },
    /// 开始处理一个文件
    FileStarted {
        current: usize,
        total: usize,
        name: String,
    },
    /// 当前文件的进度采样
    Progress {
        current: usize,
        total: usize,
        sample: ProgressSample,
    },
    /// 一条普通日志行
    Log { line: String },
    /// 一个文件处理完毕
    FileFinished {
        current: usize,
        total: usize,
        name: String,
        success: bool,
    },
    /// 批结束
    BatchFinished {
        outcome: BatchOutcome,
        succeeded: usize,
        total: usize,
    },
}
