//! # compress 命令实现
//!
//! 由 CLI 参数组装压缩任务配置并交给批处理运行器。
//!
//! ## 依赖关系
//! - 使用 `cli/compress.rs` 定义的参数
//! - 使用 `commands/runner.rs` 执行批处理

use crate::cli::compress::CompressArgs;
use crate::commands::runner;
use crate::error::Result;
use crate::models::{ContainerMode, JobConfig, JobMode};

/// 执行 compress 命令
pub fn execute(args: CompressArgs) -> Result<()> {
    let config = JobConfig {
        mode: JobMode::Compress,
        level: args.level,
        container: if args.block {
            ContainerMode::Block
        } else {
            ContainerMode::Solid
        },
        threads: args.threads,
        verify: args.verify,
        delete_source: args.rm_source,
        scan_depth: args.depth,
    };
    config.validate()?;

    runner::run_batch(config, &args.input, &args.tool)
}
