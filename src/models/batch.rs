//! # 批处理运行状态模型
//!
//! 一次批处理运行期间的聚合状态，批开始时创建，批结束时丢弃。
//!
//! ## 功能
//! - 有序的文件任务队列与各自状态
//! - 成功计数、当前下标、密钥错误标记
//! - 单调取消标记（只能 false -> true，运行中不复位）
//!
//! ## 依赖关系
//! - 被 `batch/controller.rs` 独占持有与修改
//! - 其他线程仅可通过取消标记请求停止

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 单个文件任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// 单个文件任务
#[derive(Debug, Clone)]
pub struct FileTask {
    /// 绝对路径
    pub path: PathBuf,
    /// 批内序号（从 0 开始）
    pub index: usize,
    /// 当前状态
    pub status: TaskStatus,
}

/// 一次批处理运行的聚合状态
///
/// 仅由工作线程持有和修改；取消标记是唯一允许其他线程写入的字段。
pub struct BatchState {
    tasks: Vec<FileTask>,
    current: usize,
    succeeded: usize,
    keys_error: bool,
    cancelled: Arc<AtomicBool>,
}

impl BatchState {
    /// 从文件列表创建新的批状态
    pub fn new(files: Vec<PathBuf>, cancelled: Arc<AtomicBool>) -> Self {
        let tasks = files
            .into_iter()
            .enumerate()
            .map(|(index, path)| FileTask {
                path,
                index,
                status: TaskStatus::Pending,
            })
            .collect();

        Self {
            tasks,
            current: 0,
            succeeded: 0,
            keys_error: false,
            cancelled,
        }
    }

    /// 总文件数
    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    /// 成功文件数
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// 当前处理的任务下标
    pub fn current(&self) -> usize {
        self.current
    }

    /// 按下标访问任务
    pub fn task(&self, index: usize) -> &FileTask {
        &self.tasks[index]
    }

    /// 标记一个任务开始运行
    pub fn begin(&mut self, index: usize) {
        self.current = index;
        self.tasks[index].status = TaskStatus::Running;
    }

    /// 记录一个任务的结果
    pub fn finish(&mut self, index: usize, success: bool) {
        self.tasks[index].status = if success {
            self.succeeded += 1;
            TaskStatus::Succeeded
        } else {
            TaskStatus::Failed
        };
    }

    /// 标记遇到密钥错误
    pub fn mark_keys_error(&mut self) {
        self.keys_error = true;
    }

    /// 是否遇到过密钥错误
    pub fn has_keys_error(&self) -> bool {
        self.keys_error
    }

    /// 是否已请求取消
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// 全部任务都成功
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.tasks.len()
    }
}
