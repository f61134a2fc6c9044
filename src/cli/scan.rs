//! # scan 子命令 CLI 定义
//!
//! 预览批处理将要处理的文件列表
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/scan.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::models::JobMode;

/// 扫描针对的转换方向（决定匹配的扩展名集合）
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ScanMode {
    /// Match compressible inputs (.nsp/.xci)
    Compress,
    /// Match decompressible inputs (.nsz/.xcz/.ncz)
    Decompress,
}

impl From<ScanMode> for JobMode {
    fn from(mode: ScanMode) -> Self {
        match mode {
            ScanMode::Compress => JobMode::Compress,
            ScanMode::Decompress => JobMode::Decompress,
        }
    }
}

/// scan 子命令参数
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Folder to scan
    pub input: PathBuf,

    /// Which conversion the scan is for
    #[arg(short, long, value_enum, default_value_t = ScanMode::Compress)]
    pub mode: ScanMode,

    /// Folder scan depth (0 = selected folder only, up to 10)
    #[arg(short, long, default_value_t = 0)]
    pub depth: usize,
}
