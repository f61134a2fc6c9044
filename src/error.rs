//! # 统一错误处理模块
//!
//! 定义 nszbatch 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// nszbatch 统一错误类型
#[derive(Error, Debug)]
pub enum NszbatchError {
    // ─────────────────────────────────────────────────────────────
    // 输入错误
    // ─────────────────────────────────────────────────────────────
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("No compatible files found under '{path}' (looking for {extensions})")]
    NoFilesFound { path: String, extensions: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 密钥错误
    // ─────────────────────────────────────────────────────────────
    #[error(
        "prod.keys not found at {path}\n\
         This file contains the console keys required to process encrypted archives.\n\
         Dump it with Lockpick_RCM and place it at that path."
    )]
    KeysMissing { path: String },

    #[error(
        "Invalid or missing prod.keys reported by the external tool.\n\
         Install a valid keys file and run the batch again."
    )]
    KeysInvalid,

    // ─────────────────────────────────────────────────────────────
    // 外部进程错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found or not executable")]
    CommandNotFound { command: String },

    #[error("Failed to set up pseudo-terminal: {reason}")]
    PtyError { reason: String },

    // ─────────────────────────────────────────────────────────────
    // 批处理结果
    // ─────────────────────────────────────────────────────────────
    #[error("Batch finished with failures: {succeeded}/{total} file(s) succeeded")]
    BatchFailed { succeeded: usize, total: usize },

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, NszbatchError>;
