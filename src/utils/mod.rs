//! # 工具函数模块
//!
//! 提供美化输出、进度条、密钥检查等工具。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 子模块: output, progress, keys

pub mod keys;
pub mod output;
pub mod progress;
