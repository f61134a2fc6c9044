//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `models/`, `utils/`
//! - 子模块: compress, decompress, scan, runner

pub mod compress;
pub mod decompress;
mod runner;
pub mod scan;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Compress(args) => compress::execute(args),
        Commands::Decompress(args) => decompress::execute(args),
        Commands::Scan(args) => scan::execute(args),
    }
}
