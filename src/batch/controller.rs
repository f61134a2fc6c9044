//! # 批处理控制器
//!
//! 顺序处理文件列表的状态机，持有取消标记与聚合状态。
//!
//! ## 功能
//! - 严格顺序执行：任意时刻至多一个外部进程存活
//!   （并行度由 nsz 自身的线程参数承担）
//! - 每个文件前及每次读取超时时复查取消标记
//! - 密钥错误立即终止整批，区别于普通失败
//! - 单文件失败记录后继续下一个文件，不自动重试
//!
//! ## 依赖关系
//! - 运行在独立工作线程上，被 `commands/runner.rs` 驱动
//! - 使用 `batch/command.rs`, `batch/events.rs`
//! - 使用 `process/` 的会话、切分器与分类器
//! - 使用 `models/batch.rs` 的批状态

use crate::batch::command::build_command;
use crate::batch::events::{BatchOutcome, StatusEvent};
use crate::error::Result;
use crate::models::{BatchState, JobConfig};
use crate::process::session::POLL_INTERVAL;
use crate::process::{
    classify, LineClass, OutputLine, OutputLineSplitter, ProcessSession, SessionStatus,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

/// 跨线程的停止句柄
///
/// 取消标记只能从 false 置为 true，重复请求幂等。
#[derive(Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// 请求停止当前批处理
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// 是否已请求停止
    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// 单个文件的处理结局
enum FileOutcome {
    Succeeded,
    Failed,
    Stopped,
    KeysError,
}

/// 批处理控制器
pub struct BatchController {
    config: JobConfig,
    tool: PathBuf,
    events: Sender<StatusEvent>,
    cancelled: Arc<AtomicBool>,
}

impl BatchController {
    /// 创建新的控制器
    pub fn new(config: JobConfig, tool: PathBuf, events: Sender<StatusEvent>) -> Self {
        Self {
            config,
            tool,
            events,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 取得可跨线程使用的停止句柄
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            flag: self.cancelled.clone(),
        }
    }

    /// 顺序处理整个文件列表，返回批的终态
    ///
    /// 消费 self：一个控制器只跑一批，批状态随运行结束丢弃。
    pub fn run(self, files: Vec<PathBuf>) -> BatchOutcome {
        let mut state = BatchState::new(files, self.cancelled.clone());
        let total = state.total();
        self.emit(StatusEvent::BatchStarted { total });

        for index in 0..total {
            // 文件之间复查取消标记，不再派生新进程
            if state.is_cancelled() {
                return self.finish(&state, BatchOutcome::Stopped);
            }

            state.begin(index);
            let current = state.current() + 1;
            let name = display_name(&state.task(index).path);
            self.emit(StatusEvent::FileStarted {
                current,
                total,
                name: name.clone(),
            });

            match self.run_file(&mut state, index) {
                Ok(FileOutcome::Succeeded) => {
                    state.finish(index, true);
                    self.emit(StatusEvent::FileFinished {
                        current,
                        total,
                        name,
                        success: true,
                    });
                }
                Ok(FileOutcome::Failed) => {
                    state.finish(index, false);
                    self.emit(StatusEvent::FileFinished {
                        current,
                        total,
                        name,
                        success: false,
                    });
                }
                Ok(FileOutcome::Stopped) => {
                    return self.finish(&state, BatchOutcome::Stopped);
                }
                Ok(FileOutcome::KeysError) => {
                    return self.finish(&state, BatchOutcome::KeysError);
                }
                Err(e) => {
                    // 派生失败对整批是致命的，只报告一次
                    self.emit(StatusEvent::Log {
                        line: e.to_string(),
                    });
                    return self.finish(&state, BatchOutcome::Failed);
                }
            }
        }

        let outcome = if state.all_succeeded() {
            BatchOutcome::Completed
        } else {
            BatchOutcome::Failed
        };
        self.finish(&state, outcome)
    }

    /// 处理单个文件：派生进程并泵送输出直到退出或取消
    fn run_file(&self, state: &mut BatchState, index: usize) -> Result<FileOutcome> {
        let path = state.task(index).path.clone();
        let args = build_command(&self.config, &path);
        let mut session = ProcessSession::spawn(&self.tool, &args)?;
        let mut splitter = OutputLineSplitter::new();
        let current = index + 1;
        let total = state.total();

        loop {
            if state.is_cancelled() {
                session.terminate();
                return Ok(FileOutcome::Stopped);
            }

            match session.read_chunk(POLL_INTERVAL) {
                Some(chunk) => {
                    self.pump_chunk(&chunk, &mut splitter, current, total, state);
                    if state.has_keys_error() {
                        session.terminate();
                        return Ok(FileOutcome::KeysError);
                    }
                }
                None => {
                    // 先取完成标记再排空：读取线程可能在超时与检查之间
                    // 送出最后一块，顺序反了会把它留在通道里
                    let done = session.output_done();
                    while let Some(chunk) = session.try_read_chunk() {
                        self.pump_chunk(&chunk, &mut splitter, current, total, state);
                    }
                    if state.has_keys_error() {
                        session.terminate();
                        return Ok(FileOutcome::KeysError);
                    }
                    if done {
                        break;
                    }
                    if let SessionStatus::Exited(_) = session.poll() {
                        // 进程已退出，排空读取线程尚未送达的尾部输出
                        while let Some(chunk) = session.read_chunk(POLL_INTERVAL) {
                            self.pump_chunk(&chunk, &mut splitter, current, total, state);
                        }
                        while let Some(chunk) = session.try_read_chunk() {
                            self.pump_chunk(&chunk, &mut splitter, current, total, state);
                        }
                        break;
                    }
                }
            }
        }

        if let Some(line) = splitter.finish() {
            self.handle_line(&line, current, total, state);
        }
        if state.has_keys_error() {
            session.terminate();
            return Ok(FileOutcome::KeysError);
        }

        // 输出流结束不代表进程退出；按读取节奏等待回收，
        // 让关闭了终端却不退出的子进程仍能响应取消
        loop {
            if let SessionStatus::Exited(_) = session.poll() {
                break;
            }
            if state.is_cancelled() {
                session.terminate();
                return Ok(FileOutcome::Stopped);
            }
            thread::sleep(POLL_INTERVAL);
        }

        let code = session.wait();
        Ok(if code == 0 {
            FileOutcome::Succeeded
        } else {
            FileOutcome::Failed
        })
    }

    /// 切分一块原始输出并逐行处理
    fn pump_chunk(
        &self,
        chunk: &[u8],
        splitter: &mut OutputLineSplitter,
        current: usize,
        total: usize,
        state: &mut BatchState,
    ) {
        for line in splitter.push(chunk) {
            self.handle_line(&line, current, total, state);
        }
    }

    /// 分类一行输出，更新批状态并转成状态事件
    fn handle_line(&self, line: &OutputLine, current: usize, total: usize, state: &mut BatchState) {
        match classify(line) {
            LineClass::CredentialError => {
                state.mark_keys_error();
                self.emit(StatusEvent::Log {
                    line: format!("ERROR: {}", line.text),
                });
            }
            LineClass::Progress(sample) => {
                self.emit(StatusEvent::Progress {
                    current,
                    total,
                    sample,
                });
            }
            LineClass::PlainLog => {
                self.emit(StatusEvent::Log {
                    line: line.text.clone(),
                });
            }
            LineClass::Ignored => {}
        }
    }

    fn finish(&self, state: &BatchState, outcome: BatchOutcome) -> BatchOutcome {
        self.emit(StatusEvent::BatchFinished {
            outcome,
            succeeded: state.succeeded(),
            total: state.total(),
        });
        outcome
    }

    /// 发送事件；接收端断开时静默丢弃，从不阻塞工作线程
    fn emit(&self, event: StatusEvent) {
        let _ = self.events.send(event);
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::models::job::DEFAULT_COMPRESSION_LEVEL;
    use crate::models::{ContainerMode, JobMode};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::TempDir;

    /// 假 nsz：按最后一个参数（文件路径）决定行为
    const STUB_TOOL: &str = r#"#!/bin/sh
for a in "$@"; do last="$a"; done
case "$last" in
  *keyserr*)  echo "prod.keys not found"; exit 1 ;;
  *latekeys*) sleep 1; echo "prod.keys not found"; exit 1 ;;
  *fail*)     echo "conversion error";    exit 2 ;;
  *slow*)     exec sleep 30 ;;
  *mute*)     exec sleep 30 0<&- 1>&- 2>&- ;;
  *)         printf '50%%|#####     | [00:02<00:02, 253.83 MiB/s]\r'
             echo "Done"
             exit 0 ;;
esac
"#;

    fn stub_tool(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("nsz-stub");
        fs::write(&path, STUB_TOOL).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn config() -> JobConfig {
        JobConfig {
            mode: JobMode::Decompress,
            level: DEFAULT_COMPRESSION_LEVEL,
            container: ContainerMode::Solid,
            threads: 0,
            verify: false,
            delete_source: false,
            scan_depth: 0,
        }
    }

    fn batch_files(names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|n| PathBuf::from(format!("/roms/{}.nsz", n)))
            .collect()
    }

    fn run_batch(
        tool: PathBuf,
        files: Vec<PathBuf>,
    ) -> (BatchOutcome, Vec<StatusEvent>) {
        let (tx, rx) = mpsc::channel();
        let controller = BatchController::new(config(), tool, tx);
        let outcome = controller.run(files);
        let events: Vec<StatusEvent> = rx.try_iter().collect();
        (outcome, events)
    }

    fn started_count(events: &[StatusEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, StatusEvent::FileStarted { .. }))
            .count()
    }

    #[test]
    fn test_all_files_succeed() {
        let dir = TempDir::new().unwrap();
        let (outcome, events) = run_batch(stub_tool(&dir), batch_files(&["a", "b", "c"]));

        assert_eq!(outcome, BatchOutcome::Completed);
        assert_eq!(started_count(&events), 3);
        assert!(events.iter().any(|e| matches!(
            e,
            StatusEvent::BatchFinished {
                succeeded: 3,
                total: 3,
                ..
            }
        )));
    }

    #[test]
    fn test_failed_file_does_not_abort_batch() {
        let dir = TempDir::new().unwrap();
        let (outcome, events) = run_batch(stub_tool(&dir), batch_files(&["a", "fail-b", "c"]));

        assert_eq!(outcome, BatchOutcome::Failed);
        // 失败后继续处理剩余文件
        assert_eq!(started_count(&events), 3);
        assert!(events.iter().any(|e| matches!(
            e,
            StatusEvent::BatchFinished {
                succeeded: 2,
                total: 3,
                ..
            }
        )));
    }

    #[test]
    fn test_keys_error_aborts_remaining_files() {
        let dir = TempDir::new().unwrap();
        let (outcome, events) = run_batch(
            stub_tool(&dir),
            batch_files(&["a", "b", "keyserr-c", "d", "e"]),
        );

        assert_eq!(outcome, BatchOutcome::KeysError);
        // 文件 4、5 从未开始
        assert_eq!(started_count(&events), 3);
        assert!(events.iter().any(|e| matches!(
            e,
            StatusEvent::BatchFinished {
                succeeded: 2,
                total: 5,
                ..
            }
        )));
    }

    #[test]
    fn test_progress_events_are_emitted() {
        let dir = TempDir::new().unwrap();
        let (_, events) = run_batch(stub_tool(&dir), batch_files(&["a"]));

        let sample = events.iter().find_map(|e| match e {
            StatusEvent::Progress { sample, .. } => Some(sample.clone()),
            _ => None,
        });
        let sample = sample.expect("no progress event seen");
        assert_eq!(sample.percent, 50);
        assert_eq!(sample.rate.as_deref(), Some("253.83 MiB/s"));
        assert_eq!(sample.eta.as_deref(), Some("00:02"));
    }

    #[test]
    fn test_stop_before_start_attempts_nothing() {
        let dir = TempDir::new().unwrap();
        let (tx, rx) = mpsc::channel();
        let controller = BatchController::new(config(), stub_tool(&dir), tx);
        let stop = controller.stop_handle();

        // 重复请求与单次请求效果一致
        stop.request_stop();
        stop.request_stop();

        let outcome = controller.run(batch_files(&["a", "b"]));
        assert_eq!(outcome, BatchOutcome::Stopped);

        let events: Vec<StatusEvent> = rx.try_iter().collect();
        assert_eq!(started_count(&events), 0);
    }

    #[test]
    fn test_stop_terminates_active_process() {
        let dir = TempDir::new().unwrap();
        let (tx, _rx) = mpsc::channel();
        let controller = BatchController::new(config(), stub_tool(&dir), tx);
        let stop = controller.stop_handle();

        let worker = std::thread::spawn(move || controller.run(batch_files(&["slow-a", "b"])));
        std::thread::sleep(Duration::from_millis(300));
        stop.request_stop();

        let started = std::time::Instant::now();
        let outcome = worker.join().unwrap();
        assert_eq!(outcome, BatchOutcome::Stopped);
        // 停止在宽限期的量级内生效，远小于脚本的 30 秒睡眠
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_keys_error_after_silence_is_not_lost() {
        let dir = TempDir::new().unwrap();
        // 工具沉默一秒后才报告密钥缺失并立即退出；
        // 最后一行不得因排空顺序丢失而把批降级成普通失败
        let (outcome, events) = run_batch(stub_tool(&dir), batch_files(&["latekeys-a", "b"]));

        assert_eq!(outcome, BatchOutcome::KeysError);
        assert_eq!(started_count(&events), 1);
    }

    #[test]
    fn test_stop_reaches_child_after_output_stream_closes() {
        let dir = TempDir::new().unwrap();
        let (tx, _rx) = mpsc::channel();
        let controller = BatchController::new(config(), stub_tool(&dir), tx);
        let stop = controller.stop_handle();

        // 子进程关闭了自己的终端（输出流提前到 EOF）但不退出
        let worker = std::thread::spawn(move || controller.run(batch_files(&["mute-a"])));
        std::thread::sleep(Duration::from_millis(300));
        stop.request_stop();

        let started = std::time::Instant::now();
        assert_eq!(worker.join().unwrap(), BatchOutcome::Stopped);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_missing_tool_fails_batch_once() {
        let (outcome, events) = run_batch(
            PathBuf::from("/nonexistent/nsz-missing"),
            batch_files(&["a", "b"]),
        );

        assert_eq!(outcome, BatchOutcome::Failed);
        // 派生失败后不再尝试后续文件
        assert_eq!(started_count(&events), 1);
    }

    #[test]
    fn test_disconnected_receiver_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let controller = BatchController::new(config(), stub_tool(&dir), tx);
        let outcome = controller.run(batch_files(&["a"]));
        assert_eq!(outcome, BatchOutcome::Completed);
    }
}
