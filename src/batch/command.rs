//! # 命令构造器
//!
//! 由任务配置和文件路径构造 nsz 命令行参数向量。
//!
//! ## 功能
//! - 压缩: `-C -l <n> [-S|-B] [-t <n>] [-V] [--rm-source]`
//! - 解压: `-D [-V] [--rm-source]`
//! - 删除源文件时强制加入 `-V`
//!
//! ## 依赖关系
//! - 被 `batch/controller.rs` 调用
//! - 使用 `models/job.rs`
//! - 纯函数，无副作用

use crate::models::{JobConfig, JobMode};
use std::path::Path;

/// 构造处理单个文件的 nsz 参数向量（不含程序名）
pub fn build_command(config: &JobConfig, path: &Path) -> Vec<String> {
    let mut args = vec![config.mode.flag().to_string()];

    if config.mode == JobMode::Compress {
        args.push("-l".to_string());
        args.push(config.level.to_string());
        args.push(config.container.flag().to_string());
        if config.threads > 0 {
            args.push("-t".to_string());
            args.push(config.threads.to_string());
        }
    }

    // 删除源文件必须先校验输出
    if config.effective_verify() {
        args.push("-V".to_string());
    }
    if config.delete_source {
        args.push("--rm-source".to_string());
    }

    args.push(path.display().to_string());
    args
}
