//! # 任务配置模型
//!
//! 定义一次批处理任务的完整配置。
//!
//! ## 功能
//! - 压缩/解压模式与各自的输入扩展名
//! - 压缩等级、容器模式、线程数等参数
//! - 配置合法性校验（删除源文件强制校验输出）
//!
//! ## 依赖关系
//! - 被 `batch/`, `commands/` 模块使用
//! - 使用 `error.rs`

use crate::error::{NszbatchError, Result};

/// 默认压缩等级
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 18;
/// 最低压缩等级
pub const MIN_COMPRESSION_LEVEL: u8 = 1;
/// 最高压缩等级
pub const MAX_COMPRESSION_LEVEL: u8 = 22;
/// 最大目录扫描深度
pub const MAX_SCAN_DEPTH: usize = 10;
/// 最大线程数
pub const MAX_THREADS: u32 = 32;

/// 转换方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobMode {
    /// .nsp/.xci -> .nsz/.xcz
    Compress,
    /// .nsz/.xcz/.ncz -> .nsp/.xci
    Decompress,
}

impl JobMode {
    /// 模式对应的 nsz 命令行旗标
    pub fn flag(self) -> &'static str {
        match self {
            JobMode::Compress => "-C",
            JobMode::Decompress => "-D",
        }
    }

    /// 该模式接受的输入文件扩展名（小写，不含点）
    pub fn input_extensions(self) -> &'static [&'static str] {
        match self {
            JobMode::Compress => &["nsp", "xci"],
            JobMode::Decompress => &["nsz", "xcz", "ncz"],
        }
    }
}

/// 输出容器打包模式
///
/// Solid 压缩率更高，Block 支持随机访问。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerMode {
    Solid,
    Block,
}

impl ContainerMode {
    /// 容器模式对应的 nsz 命令行旗标
    pub fn flag(self) -> &'static str {
        match self {
            ContainerMode::Solid => "-S",
            ContainerMode::Block => "-B",
        }
    }
}

/// 一次批处理任务的完整配置
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// 转换方向
    pub mode: JobMode,
    /// 压缩等级 (1..=22)，仅压缩模式有效
    pub level: u8,
    /// 容器模式，仅压缩模式有效
    pub container: ContainerMode,
    /// 线程数 (0 = 自动检测)
    pub threads: u32,
    /// 转换后校验输出
    pub verify: bool,
    /// 转换成功后删除源文件（隐含校验）
    pub delete_source: bool,
    /// 目录扫描深度 (0 = 仅当前目录)
    pub scan_depth: usize,
}

impl JobConfig {
    /// 校验配置取值范围
    pub fn validate(&self) -> Result<()> {
        if !(MIN_COMPRESSION_LEVEL..=MAX_COMPRESSION_LEVEL).contains(&self.level) {
            return Err(NszbatchError::InvalidArgument(format!(
                "compression level must be between {} and {}, got {}",
                MIN_COMPRESSION_LEVEL, MAX_COMPRESSION_LEVEL, self.level
            )));
        }
        if self.scan_depth > MAX_SCAN_DEPTH {
            return Err(NszbatchError::InvalidArgument(format!(
                "scan depth must be at most {}, got {}",
                MAX_SCAN_DEPTH, self.scan_depth
            )));
        }
        if self.threads > MAX_THREADS {
            return Err(NszbatchError::InvalidArgument(format!(
                "thread count must be at most {}, got {}",
                MAX_THREADS, self.threads
            )));
        }
        Ok(())
    }

    /// 是否需要校验输出（删除源文件时强制开启）
    pub fn effective_verify(&self) -> bool {
        self.verify || self.delete_source
    }
}
