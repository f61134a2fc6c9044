//! # 批处理运行器（表现层）
//!
//! 在调用线程上消费工作线程发来的状态事件并渲染到终端。
//!
//! ## 功能
//! - 批前预检：prod.keys 存在性、目录存在性、文件发现
//! - 在独立工作线程上运行 `BatchController`，保持前台响应
//! - Ctrl-C 通过停止句柄请求协作取消
//! - 进度条 + 日志渲染
//!
//! ## 依赖关系
//! - 被 `commands/compress.rs`, `commands/decompress.rs` 调用
//! - 使用 `batch/`, `utils/`
//! - 使用 `ctrlc` 安装中断处理器

use crate::batch::{BatchController, BatchOutcome, StatusEvent};
use crate::batch::scanner;
use crate::error::{NszbatchError, Result};
use crate::models::JobConfig;
use crate::utils::{keys, output, progress};
use std::path::Path;
use std::sync::mpsc;
use std::thread;

/// 执行一次完整的批处理并渲染进度
pub fn run_batch(config: JobConfig, root: &Path, tool: &Path) -> Result<()> {
    if !keys::prod_keys_installed() {
        return Err(NszbatchError::KeysMissing {
            path: keys::prod_keys_display(),
        });
    }
    if !root.is_dir() {
        return Err(NszbatchError::DirectoryNotFound {
            path: root.display().to_string(),
        });
    }

    let extensions = config.mode.input_extensions();
    let files = scanner::scan(root, config.scan_depth, extensions);
    if files.is_empty() {
        return Err(NszbatchError::NoFilesFound {
            path: root.display().to_string(),
            extensions: format!(".{}", extensions.join("/.")),
        });
    }
    output::print_info(&format!("Found {} file(s) to process", files.len()));

    let (tx, rx) = mpsc::channel();
    let controller = BatchController::new(config, tool.to_path_buf(), tx);
    let stop = controller.stop_handle();
    let pb = progress::create_percent_bar();

    // Ctrl-C 只置取消标记；真正的终止由工作线程按宽限期执行。
    // 提示经由进度条打印，不与渲染交错
    let notice_bar = pb.clone();
    ctrlc::set_handler(move || {
        if !stop.is_stop_requested() {
            notice_bar.println("Stopping, waiting for the current file to shut down...");
        }
        stop.request_stop();
    })
    .map_err(|e| NszbatchError::Other(format!("failed to install Ctrl-C handler: {}", e)))?;

    let worker = thread::spawn(move || controller.run(files));

    let mut summary = None;

    // 事件通道随工作线程结束自动关闭，循环随之退出
    for event in rx {
        match event {
            StatusEvent::BatchStarted { .. } => {}
            StatusEvent::FileStarted {
                current,
                total,
                name,
            } => {
                pb.suspend(|| output::print_file_header(current, total, &name));
                pb.set_position(0);
                pb.set_message(format!("({}/{})", current, total));
            }
            StatusEvent::Progress { sample, .. } => {
                pb.set_position(sample.percent as u64);
                if let (Some(rate), Some(eta)) = (&sample.rate, &sample.eta) {
                    pb.set_message(format!("{} • {} remaining", rate, eta));
                }
            }
            StatusEvent::Log { line } => {
                pb.suspend(|| println!("{}", line));
            }
            StatusEvent::FileFinished { name, success, .. } => {
                if success {
                    pb.suspend(|| {
                        output::print_success(&format!("Successfully processed {}", name))
                    });
                } else {
                    pb.suspend(|| output::print_failure(&format!("Failed to process {}", name)));
                }
            }
            StatusEvent::BatchFinished {
                outcome,
                succeeded,
                total,
            } => {
                summary = Some((outcome, succeeded, total));
            }
        }
    }
    pb.finish_and_clear();

    let outcome = worker
        .join()
        .map_err(|_| NszbatchError::Other("batch worker thread panicked".to_string()))?;
    let (_, succeeded, total) = summary.unwrap_or((outcome, 0, 0));

    match outcome {
        BatchOutcome::Completed => {
            output::print_done(&format!(
                "Successfully processed {} file{}",
                total,
                if total != 1 { "s" } else { "" }
            ));
            Ok(())
        }
        BatchOutcome::Stopped => {
            output::print_warning("Process stopped by user");
            Ok(())
        }
        BatchOutcome::KeysError => Err(NszbatchError::KeysInvalid),
        BatchOutcome::Failed => Err(NszbatchError::BatchFailed { succeeded, total }),
    }
}
