//! # scan 命令实现
//!
//! 预览扫描结果：列出批处理将要处理的文件，不执行转换。
//!
//! ## 依赖关系
//! - 使用 `cli/scan.rs` 定义的参数
//! - 使用 `batch/scanner.rs`
//! - 使用 `utils/output.rs`

use crate::batch::scanner;
use crate::cli::scan::ScanArgs;
use crate::error::{NszbatchError, Result};
use crate::models::JobMode;
use crate::utils::output;

/// 执行 scan 命令
pub fn execute(args: ScanArgs) -> Result<()> {
    if !args.input.is_dir() {
        return Err(NszbatchError::DirectoryNotFound {
            path: args.input.display().to_string(),
        });
    }

    let mode: JobMode = args.mode.into();
    let files = scanner::scan(&args.input, args.depth, mode.input_extensions());

    if files.is_empty() {
        output::print_warning("No compatible files found");
        return Ok(());
    }

    for file in &files {
        println!("{}", file.display());
    }
    output::print_info(&format!(
        "Found {} file{} ready to process",
        files.len(),
        if files.len() != 1 { "s" } else { "" }
    ));

    Ok(())
}
