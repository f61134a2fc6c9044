//! # 进程编排模块
//!
//! 外部进程的 PTY 会话、输出行切分与行分类。
//!
//! ## 依赖关系
//! - 被 `batch/controller.rs` 使用
//! - 子模块: session, splitter, classifier

pub mod classifier;
pub mod session;
pub mod splitter;

pub use classifier::{classify, LineClass, ProgressSample};
pub use session::{ProcessSession, SessionStatus};
pub use splitter::{OutputLine, OutputLineSplitter, Terminator};
