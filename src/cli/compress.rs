//! # compress 子命令 CLI 定义
//!
//! 批量压缩 .nsp/.xci 为 .nsz/.xcz
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/compress.rs`

use clap::Args;
use std::path::PathBuf;

/// compress 子命令参数
#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Folder containing .nsp/.xci files
    pub input: PathBuf,

    /// Compression level (<=10 fast, <=18 balanced, >18 maximum)
    #[arg(short, long, default_value_t = 18)]
    pub level: u8,

    /// Use block container mode (random access) instead of solid (better ratio)
    #[arg(short, long, default_value_t = false)]
    pub block: bool,

    /// Worker threads for the external tool (0 = auto-detect)
    #[arg(short, long, default_value_t = 0)]
    pub threads: u32,

    /// Verify output integrity after compression
    #[arg(short = 'V', long, default_value_t = false)]
    pub verify: bool,

    /// Delete source files after successful conversion (implies --verify)
    #[arg(long = "rm-source", default_value_t = false)]
    pub rm_source: bool,

    /// Folder scan depth (0 = selected folder only, up to 10)
    #[arg(short, long, default_value_t = 0)]
    pub depth: usize,

    /// Path to the nsz executable
    #[arg(long, default_value = "nsz", env = "NSZBATCH_TOOL")]
    pub tool: PathBuf,
}
