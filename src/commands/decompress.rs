//! # decompress 命令实现
//!
//! 由 CLI 参数组装解压任务配置并交给批处理运行器。
//!
//! ## 依赖关系
//! - 使用 `cli/decompress.rs` 定义的参数
//! - 使用 `commands/runner.rs` 执行批处理

use crate::cli::decompress::DecompressArgs;
use crate::commands::runner;
use crate::error::Result;
use crate::models::job::DEFAULT_COMPRESSION_LEVEL;
use crate::models::{ContainerMode, JobConfig, JobMode};

/// 执行 decompress 命令
pub fn execute(args: DecompressArgs) -> Result<()> {
    // 等级与容器模式仅压缩模式有效，这里填默认值占位
    let config = JobConfig {
        mode: JobMode::Decompress,
        level: DEFAULT_COMPRESSION_LEVEL,
        container: ContainerMode::Solid,
        threads: 0,
        verify: args.verify,
        delete_source: args.rm_source,
        scan_depth: args.depth,
    };
    config.validate()?;

    runner::run_batch(config, &args.input, &args.tool)
}
