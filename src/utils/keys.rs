//! # 密钥文件检查
//!
//! 检查用户目录下的 prod.keys 是否存在。密钥的安装不在本工具范围内，
//! 这里只做批开始前的存在性预检；运行中由外部工具报告的缺失
//! 走 `LineClass::CredentialError` 路径。
//!
//! ## 依赖关系
//! - 被 `commands/runner.rs` 使用
//! - 使用 `dirs` 解析用户主目录

use std::path::PathBuf;

/// prod.keys 的固定用户级路径 `~/.switch/prod.keys`
pub fn prod_keys_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".switch").join("prod.keys"))
}

/// 密钥文件是否已安装
pub fn prod_keys_installed() -> bool {
    prod_keys_path().map(|p| p.is_file()).unwrap_or(false)
}

/// 展示用的密钥路径字符串
pub fn prod_keys_display() -> String {
    prod_keys_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.switch/prod.keys".to_string())
}
