//! # nszbatch - Switch ROM 批量压缩工具
//!
//! 用 nsz 外部工具批量压缩/解压 Switch ROM 归档，通过伪终端
//! 捕获实时进度，支持中途取消。
//!
//! ## 子命令
//! - `compress` - 批量压缩 .nsp/.xci 为 .nsz/.xcz
//! - `decompress` - 批量解压 .nsz/.xcz/.ncz 为 .nsp/.xci
//! - `scan` - 预览扫描结果
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/       (命令行参数定义)
//!   ├── commands/  (命令执行逻辑与事件渲染)
//!   ├── batch/     (扫描、命令构造、批控制器)
//!   ├── process/   (PTY 会话、行切分、行分类)
//!   ├── models/    (任务配置与批状态)
//!   ├── utils/     (输出、进度条、密钥检查)
//!   └── error.rs   (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod process;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
