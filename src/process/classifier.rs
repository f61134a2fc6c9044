//! # 输出行分类器
//!
//! 将切分出的输出行分类为密钥错误 / 进度 / 普通日志 / 忽略。
//!
//! ## 功能
//! - 识别 prod.keys / keys.txt 缺失报错（整批终止条件）
//! - 从进度帧提取百分比、速率与剩余时间
//! - 丢弃非进度的瞬态帧（光标控制噪声）
//!
//! ## 依赖关系
//! - 被 `batch/controller.rs` 调用
//! - 使用 `process/splitter.rs` 的行类型
//! - 使用 `regex` 提取进度字段

use crate::process::splitter::{OutputLine, Terminator};
use regex::Regex;
use std::sync::OnceLock;

/// 进度采样值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSample {
    /// 完成百分比 (0..=100)
    pub percent: u8,
    /// 传输速率，如 "253.83 MiB/s"
    pub rate: Option<String>,
    /// 预计剩余时间，如 "00:02"
    pub eta: Option<String>,
}

/// 行分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// 外部工具报告密钥文件缺失，整批终止
    CredentialError,
    /// 进度帧
    Progress(ProgressSample),
    /// 普通日志行
    PlainLog,
    /// 应被丢弃的行
    Ignored,
}

/// 进度行必须包含的速率/大小标记之一
const PROGRESS_INDICATORS: &[&str] = &["|", "MiB", "MB", "KB", "B/s"];

fn percent_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)%").unwrap())
}

fn eta_rate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // [已耗时<剩余时间, 速率] 形如 [00:02<00:02, 253.83 MiB/s]
    RE.get_or_init(|| Regex::new(r"\[[\d:]+<([\d:]+),\s*([\d.]+\s*\w+/s)\]").unwrap())
}

/// 按优先级分类一条输出行
pub fn classify(line: &OutputLine) -> LineClass {
    if line.text.is_empty() {
        return LineClass::Ignored;
    }

    let lower = line.text.to_lowercase();
    if (lower.contains("prod.keys") || lower.contains("keys.txt"))
        && lower.contains("not found")
    {
        return LineClass::CredentialError;
    }

    if line.text.contains('%')
        && PROGRESS_INDICATORS.iter().any(|ind| line.text.contains(ind))
    {
        return match extract_progress(&line.text) {
            Some(sample) => LineClass::Progress(sample),
            // 百分数缺失或越界的帧不值得上报
            None => LineClass::Ignored,
        };
    }

    if line.terminator == Terminator::Transient {
        return LineClass::Ignored;
    }

    LineClass::PlainLog
}

/// 从进度帧文本提取采样值；数值非法或越界时返回 None
fn extract_progress(text: &str) -> Option<ProgressSample> {
    let captures = percent_re().captures(text)?;
    let percent: u8 = captures[1].parse().ok().filter(|p| *p <= 100)?;

    let (eta, rate) = match eta_rate_re().captures(text) {
        Some(info) => (Some(info[1].to_string()), Some(info[2].to_string())),
        None => (None, None),
    };

    Some(ProgressSample { percent, rate, eta })
}
