//! # 输出行切分器
//!
//! 将外部进程的原始字节流增量切分为离散的行。
//!
//! ## 功能
//! - 换行符 (LF) 与回车符 (CR) 均作为行终止符，取缓冲区中先出现者
//! - LF 结尾的行标记为 `Final`，CR 结尾的行标记为 `Transient`
//!   （后者通常是即将被覆盖的原地进度刷新帧）
//! - 无效字节序列以替换字符解码，绝不报错
//! - 流结束时冲刷未终止的残余内容
//!
//! ## 依赖关系
//! - 被 `batch/controller.rs` 调用
//! - 输出交给 `process/classifier.rs` 分类

/// 行终止方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// LF 结尾，永久日志行
    Final,
    /// CR 结尾，原地进度刷新帧
    Transient,
}

/// 一条切分出的输出行（已去除首尾空白）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub text: String,
    pub terminator: Terminator,
}

/// 增量行切分器
#[derive(Debug, Default)]
pub struct OutputLineSplitter {
    buffer: Vec<u8>,
}

impl OutputLineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一段原始字节，返回本次新切分出的所有行
    pub fn push(&mut self, bytes: &[u8]) -> Vec<OutputLine> {
        self.buffer.extend_from_slice(bytes);

        let mut lines = Vec::new();
        loop {
            let lf = self.buffer.iter().position(|&b| b == b'\n');
            let cr = self.buffer.iter().position(|&b| b == b'\r');

            let (split, terminator) = match (lf, cr) {
                (None, None) => break,
                (Some(n), None) => (n, Terminator::Final),
                (None, Some(c)) => (c, Terminator::Transient),
                (Some(n), Some(c)) => {
                    if c < n {
                        (c, Terminator::Transient)
                    } else {
                        (n, Terminator::Final)
                    }
                }
            };

            let text = String::from_utf8_lossy(&self.buffer[..split])
                .trim()
                .to_string();
            self.buffer.drain(..=split);
            lines.push(OutputLine { text, terminator });
        }
        lines
    }

    /// 流结束，冲刷未终止的残余内容为一条 `Final` 行
    pub fn finish(&mut self) -> Option<OutputLine> {
        if self.buffer.is_empty() {
            return None;
        }
        let text = String::from_utf8_lossy(&self.buffer).trim().to_string();
        self.buffer.clear();
        if text.is_empty() {
            None
        } else {
            Some(OutputLine {
                text,
                terminator: Terminator::Final,
            })
        }
    }
}
