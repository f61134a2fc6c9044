//! # 数据模型模块
//!
//! 定义任务配置与批处理运行状态的数据模型。
//!
//! ## 依赖关系
//! - 被 `batch/` 和 `commands/` 使用
//! - 子模块: job, batch

pub mod batch;
pub mod job;

pub use batch::{BatchState, FileTask, TaskStatus};
pub use job::{ContainerMode, JobConfig, JobMode};
