//! # decompress 子命令 CLI 定义
//!
//! 批量解压 .nsz/.xcz/.ncz 为 .nsp/.xci
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/decompress.rs`

use clap::Args;
use std::path::PathBuf;

/// decompress 子命令参数
#[derive(Args, Debug)]
pub struct DecompressArgs {
    /// Folder containing .nsz/.xcz/.ncz files
    pub input: PathBuf,

    /// Verify output integrity after decompression
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
