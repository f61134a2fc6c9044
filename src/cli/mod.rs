//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `compress`: 批量压缩 .nsp/.xci 为 .nsz/.xcz
//! - `decompress`: 批量解压 .nsz/.xcz/.ncz 为 .nsp/.xci
//! - `scan`: 预览扫描结果（不执行转换）
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: compress, decompress, scan

pub mod compress;
pub mod decompress;
pub mod scan;

use clap::{Parser, Subcommand};

/// nszbatch - Switch ROM 批量压缩工具
#[derive(Parser)]
#[command(name = "nszbatch")]
#[command(author = "tsutsen")]
#[command(version)]
#[command(about = "Batch compress and decompress Switch ROM archives with nsz", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Compress .nsp/.xci files to .nsz/.xcz
    Compress(compress::CompressArgs),

    /// Decompress .nsz/.xcz/.ncz files back to .nsp/.xci
    Decompress(decompress::DecompressArgs),

    /// List the files a batch would process, without converting
    Scan(scan::ScanArgs),
}
