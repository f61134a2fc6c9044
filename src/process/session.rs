//! # 外部进程会话
//!
//! 持有单个外部进程的生命周期及其实时输出流。
//!
//! ## 功能
//! - 通过伪终端 (PTY) 捕获输出：nsz 只在认为自己连着交互终端时
//!   才会高频发出回车驱动的进度帧，普通管道只能拿到零星快照
//! - 读取线程把 PTY 输出按块送入通道，消费侧有界等待读取，
//!   从不阻塞，以便按固定节奏复查取消标记
//! - 优雅终止：先请求退出，1 秒宽限期后强制杀死并回收
//!
//! ## 依赖关系
//! - 被 `batch/controller.rs` 独占持有
//! - 使用 `portable-pty` 分配伪终端并派生子进程

use crate::error::{NszbatchError, Result};
use portable_pty::{native_pty_system, Child, ChildKiller, CommandBuilder, MasterPty, PtySize};
use std::io::Read;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// 单次读取的最大字节数
pub const READ_BUFFER_SIZE: usize = 4096;
/// 有界等待读取的间隔，同时是取消标记的复查节奏
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// 优雅终止的宽限期，超过后强制杀死
pub const TERMINATE_GRACE: Duration = Duration::from_secs(1);

/// 宽限期内等待退出的轮询间隔
const REAP_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// `poll()` 的非阻塞结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Exited(u32),
}

/// 进程生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Spawned,
    Running,
    Exited(u32),
    Terminated,
    Killed,
}

/// 单个外部进程会话
///
/// 会话销毁时进程必定已被回收（必要时走终止流程）。
pub struct ProcessSession {
    child: Box<dyn Child + Send + Sync>,
    killer: Box<dyn ChildKiller + Send + Sync>,
    output_rx: Receiver<Vec<u8>>,
    reader: Option<JoinHandle<()>>,
    lifecycle: Lifecycle,
    // master 在会话存续期间必须保持打开，否则子进程会收到 SIGHUP
    _master: Box<dyn MasterPty + Send>,
}

impl ProcessSession {
    /// 在 PTY 下派生外部进程
    ///
    /// 派生失败（二进制缺失或不可执行）立即报错，不重试。
    pub fn spawn(program: &Path, args: &[String]) -> Result<Self> {
        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: 24,
                cols: 80,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| NszbatchError::PtyError {
                reason: e.to_string(),
            })?;

        let mut cmd = CommandBuilder::new(program);
        for arg in args {
            cmd.arg(arg);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|_| NszbatchError::CommandNotFound {
                command: program.display().to_string(),
            })?;
        // 子进程持有自己的 slave 端；父进程这份必须关掉，
        // 否则子进程退出后 master 永远读不到 EOF
        drop(pair.slave);

        let killer = child.clone_killer();
        let mut reader =
            pair.master
                .try_clone_reader()
                .map_err(|e| NszbatchError::PtyError {
                    reason: e.to_string(),
                })?;

        let (tx, output_rx) = mpsc::channel();
        let reader_thread = thread::spawn(move || {
            let mut buf = [0u8; READ_BUFFER_SIZE];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    // Linux 上子进程退出后读 master 返回 EIO，等同 EOF
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            child,
            killer,
            output_rx,
            reader: Some(reader_thread),
            lifecycle: Lifecycle::Spawned,
            _master: pair.master,
        })
    }

    /// 有界等待地读取一块输出
    ///
    /// 最多等待 `timeout`；无数据或流已结束时返回 `None`，绝不无限阻塞。
    pub fn read_chunk(&self, timeout: Duration) -> Option<Vec<u8>> {
        match self.output_rx.recv_timeout(timeout) {
            Ok(chunk) => Some(chunk),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// 非阻塞取走一块已送达但尚未消费的输出
    ///
    /// 读取线程结束后通道里可能仍残留最后一块，排空时使用。
    pub fn try_read_chunk(&self) -> Option<Vec<u8>> {
        self.output_rx.try_recv().ok()
    }

    /// 输出流是否已经结束（读取线程退出且通道排空）
    pub fn output_done(&self) -> bool {
        match &self.reader {
            Some(handle) => handle.is_finished(),
            None => true,
        }
    }

    /// 非阻塞查询进程状态
    pub fn poll(&mut self) -> SessionStatus {
        if let Lifecycle::Exited(code) = self.lifecycle {
            return SessionStatus::Exited(code);
        }
        match self.child.try_wait() {
            Ok(Some(status)) => {
                let code = status.exit_code();
                self.lifecycle = Lifecycle::Exited(code);
                SessionStatus::Exited(code)
            }
            Ok(None) => {
                self.lifecycle = Lifecycle::Running;
                SessionStatus::Running
            }
            // 已被回收的竞态按失败退出处理
            Err(_) => {
                self.lifecycle = Lifecycle::Exited(1);
                SessionStatus::Exited(1)
            }
        }
    }

    /// 阻塞回收进程，返回退出码
    pub fn wait(&mut self) -> u32 {
        if let Lifecycle::Exited(code) = self.lifecycle {
            return code;
        }
        match self.child.wait() {
            Ok(status) => {
                let code = status.exit_code();
                self.lifecycle = Lifecycle::Exited(code);
                code
            }
            Err(_) => {
                self.lifecycle = Lifecycle::Exited(1);
                1
            }
        }
    }

    /// 请求进程终止
    ///
    /// 先发出优雅退出请求；宽限期内未退出则强制杀死并回收。
    /// 幂等，对已死进程的操作错误全部吞掉。
    pub fn terminate(&mut self) {
        if matches!(self.lifecycle, Lifecycle::Exited(_) | Lifecycle::Killed) {
            return;
        }
        if let Ok(Some(status)) = self.child.try_wait() {
            self.lifecycle = Lifecycle::Exited(status.exit_code());
            return;
        }

        self.request_graceful_exit();
        self.lifecycle = Lifecycle::Terminated;

        let deadline = Instant::now() + TERMINATE_GRACE;
        while Instant::now() < deadline {
            if let Ok(Some(status)) = self.child.try_wait() {
                self.lifecycle = Lifecycle::Exited(status.exit_code());
                return;
            }
            thread::sleep(REAP_POLL_INTERVAL);
        }

        let _ = self.killer.kill();
        let _ = self.child.wait();
        self.lifecycle = Lifecycle::Killed;
    }

    #[cfg(unix)]
    fn request_graceful_exit(&mut self) {
        match self.child.process_id() {
            Some(pid) => {
                // 对已退出进程发信号失败是可接受的竞态
                unsafe {
                    libc::kill(pid as libc::pid_t, libc::SIGTERM);
                }
            }
            None => {
                let _ = self.killer.kill();
            }
        }
    }

    #[cfg(not(unix))]
    fn request_graceful_exit(&mut self) {
        let _ = self.killer.kill();
    }
}

impl Drop for ProcessSession {
    fn drop(&mut self) {
        // 清理路径与用户取消共用同一套终止流程
        self.terminate();
        // 子进程的孤儿后代可能仍握着 PTY slave 端，此时读取线程
        // 收不到 EOF；只回收已结束的线程，其余分离，绝不挂起
        if let Some(handle) = self.reader.take() {
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sh() -> PathBuf {
        PathBuf::from("/bin/sh")
    }

    fn args(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    fn collect_output(session: &mut ProcessSession) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            match session.read_chunk(POLL_INTERVAL) {
                Some(chunk) => out.extend_from_slice(&chunk),
                None => {
                    if session.output_done() {
                        break;
                    }
                    if let SessionStatus::Exited(_) = session.poll() {
                        // 进程已退出，再排空读取线程尚未送达的尾部输出
                        while let Some(chunk) = session.read_chunk(POLL_INTERVAL) {
                            out.extend_from_slice(&chunk);
                        }
                        break;
                    }
                }
            }
        }
        out
    }

    #[test]
    fn test_spawn_missing_binary_reports_immediately() {
        let result = ProcessSession::spawn(
            &PathBuf::from("/nonexistent/nszbatch-no-such-tool"),
            &[],
        );
        assert!(matches!(
            result,
            Err(crate::error::NszbatchError::CommandNotFound { .. })
        ));
    }

    #[test]
    fn test_captures_output_and_exit_code() {
        let mut session = ProcessSession::spawn(&sh(), &args("echo hello; exit 7")).unwrap();
        let out = collect_output(&mut session);
        assert!(String::from_utf8_lossy(&out).contains("hello"));
        assert_eq!(session.wait(), 7);
    }

    #[test]
    fn test_chunks_remain_readable_after_reader_finishes() {
        let mut session = ProcessSession::spawn(&sh(), &args("echo tail; exit 0")).unwrap();
        assert_eq!(session.wait(), 0);
        // 等读取线程收到 EOF 结束，此时最后一块仍可能停留在通道里
        while !session.output_done() {
            std::thread::sleep(Duration::from_millis(10));
        }
        let mut out = Vec::new();
        while let Some(chunk) = session.try_read_chunk() {
            out.extend_from_slice(&chunk);
        }
        assert!(String::from_utf8_lossy(&out).contains("tail"));
    }

    #[test]
    fn test_read_chunk_times_out_on_silent_process() {
        let mut session = ProcessSession::spawn(&sh(), &args("sleep 2")).unwrap();
        let started = Instant::now();
        let chunk = session.read_chunk(POLL_INTERVAL);
        assert!(chunk.is_none());
        assert!(started.elapsed() < Duration::from_secs(1));
        session.terminate();
    }

    #[test]
    fn test_terminate_is_idempotent() {
        let mut session = ProcessSession::spawn(&sh(), &args("sleep 30")).unwrap();
        let started = Instant::now();
        session.terminate();
        session.terminate();
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_terminate_after_natural_exit_is_noop() {
        let mut session = ProcessSession::spawn(&sh(), &args("exit 0")).unwrap();
        assert_eq!(session.wait(), 0);
        session.terminate();
        assert_eq!(session.wait(), 0);
    }
}
