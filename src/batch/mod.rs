//! # 批处理模块
//!
//! 文件发现、命令构造与顺序批处理状态机。
//!
//! ## 功能
//! - 深度受限的文件扫描
//! - 任务配置到 nsz 参数向量的纯映射
//! - 带协作取消与密钥错误硬终止的批控制器
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `process/` 驱动外部进程
//! - 子模块: scanner, command, controller, events

pub mod command;
pub mod controller;
pub mod events;
pub mod scanner;

pub use command::build_command;
pub use controller::{BatchController, StopHandle};
pub use events::{BatchOutcome, StatusEvent};
