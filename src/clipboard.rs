//! Clipboard
//!
//! Write-only text clipboard. Copies happen on a background thread, one
//! attempt each; when a clear timeout is set the clipboard is wiped
//! afterwards unless something newer was copied in the meantime.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use zeroize::Zeroize;

/// A text clipboard the UI can write to
pub trait Clipboard {
    /// Fire-and-forget copy; failures are logged by the implementation
    fn copy_text(&self, text: &str);
}

/// The platform mechanism that actually holds clipboard contents
pub trait ClipboardTool: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), String>;

    fn clear(&self) -> Result<(), String>;
}

/// wl-copy or xclip on Linux, arboard elsewhere
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopTool;

/// The desktop clipboard
#[derive(Clone)]
pub struct SystemClipboard {
    tool: Arc<dyn ClipboardTool>,
    clear_after: Option<Duration>,
    copy_id: Arc<AtomicU64>,
    /// Set while copied text is waiting for its timed clear
    pending_clear: Arc<AtomicBool>,
    /// Held around every write and clear so they never interleave
    busy: Arc<Mutex<()>>,
}

impl SystemClipboard {
    pub fn new(clear_after: Option<Duration>) -> Self {
        Self::with_tool(Arc::new(DesktopTool), clear_after)
    }

    pub fn with_tool(tool: Arc<dyn ClipboardTool>, clear_after: Option<Duration>) -> Self {
        Self {
            tool,
            clear_after,
            copy_id: Arc::new(AtomicU64::new(0)),
            pending_clear: Arc::new(AtomicBool::new(false)),
            busy: Arc::new(Mutex::new(())),
        }
    }

    pub fn clear_after(&self) -> Option<Duration> {
        self.clear_after
    }

    /// Start a copy and return the worker handle, for callers that must
    /// outlive the clear timeout (the CLI exits right after copying)
    pub fn spawn_copy(&self, text: &str) -> JoinHandle<()> {
        let copy_id = self.copy_id.fetch_add(1, Ordering::SeqCst) + 1;
        let clipboard = self.clone();
        let mut text = text.to_string();

        std::thread::spawn(move || {
            clipboard.copy_thread(&mut text, copy_id);
        })
    }

    /// Wipe the clipboard now if a timed clear is still outstanding.
    /// Returns true when a clear was performed.
    pub fn clear_pending(&self) -> bool {
        // Sleeping copy threads see a newer id and skip their own clear
        self.copy_id.fetch_add(1, Ordering::SeqCst);

        let _busy = self.busy.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.pending_clear.swap(false, Ordering::SeqCst) {
            return false;
        }
        self.clear_now();
        true
    }

    fn is_latest(&self, copy_id: u64) -> bool {
        self.copy_id.load(Ordering::SeqCst) == copy_id
    }

    fn copy_thread(&self, text: &mut String, copy_id: u64) {
        let written = {
            let _busy = self.busy.lock().unwrap_or_else(PoisonError::into_inner);
            let result = if self.is_latest(copy_id) {
                self.tool.set_text(text.as_str()).map(|()| true)
            } else {
                Ok(false)
            };
            text.zeroize();

            match result {
                Ok(true) => {
                    log::debug!("Copied text to clipboard");
                    self.pending_clear.store(self.clear_after.is_some(), Ordering::SeqCst);
                    true
                }
                Ok(false) => false,
                Err(e) => {
                    log::warn!("Clipboard write failed: {}", e);
                    false
                }
            }
        };

        let Some(timeout) = self.clear_after.filter(|_| written) else { return };
        std::thread::sleep(timeout);

        let _busy = self.busy.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_latest(copy_id) && self.pending_clear.swap(false, Ordering::SeqCst) {
            self.clear_now();
        }
    }

    fn clear_now(&self) {
        match self.tool.clear() {
            Ok(()) => log::debug!("Cleared clipboard"),
            Err(e) => log::warn!("Could not clear clipboard: {}", e),
        }
    }
}

impl Clipboard for SystemClipboard {
    fn copy_text(&self, text: &str) {
        drop(self.spawn_copy(text));
    }
}

#[cfg(target_os = "linux")]
impl ClipboardTool for DesktopTool {
    fn set_text(&self, text: &str) -> Result<(), String> {
        run_tool(desktop_command(false), text.as_bytes())
    }

    fn clear(&self) -> Result<(), String> {
        run_tool(desktop_command(true), b"")
    }
}

#[cfg(target_os = "linux")]
fn desktop_command(clear: bool) -> std::process::Command {
    use std::process::Command;

    if std::env::var("WAYLAND_DISPLAY").is_ok() {
        let mut cmd = Command::new("wl-copy");
        if clear {
            cmd.arg("--clear");
        }
        cmd
    } else {
        // Empty input replaces the selection, which is how xclip clears
        let mut cmd = Command::new("xclip");
        cmd.args(["-selection", "clipboard"]);
        cmd
    }
}

/// Feed `input` to a clipboard command and reap it. Output goes nowhere so
/// the selection server the tool forks off cannot hold us on a pipe.
#[cfg(target_os = "linux")]
fn run_tool(mut cmd: std::process::Command, input: &[u8]) -> Result<(), String> {
    use std::io::Write;
    use std::process::Stdio;

    let program = cmd.get_program().to_string_lossy().into_owned();
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("could not run {} ({})", program, e))?;

    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(input),
        None => Ok(()),
    };
    let status = child
        .wait()
        .map_err(|e| format!("{} did not finish: {}", program, e))?;

    written.map_err(|e| format!("could not write to {}: {}", program, e))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("{} exited with {}", program, status))
    }
}

#[cfg(not(target_os = "linux"))]
impl ClipboardTool for DesktopTool {
    fn set_text(&self, text: &str) -> Result<(), String> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
        clipboard.set_text(text).map_err(|e| e.to_string())
    }

    fn clear(&self) -> Result<(), String> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
        clipboard.clear().map_err(|e| e.to_string())
    }
}

/// Records every copy, for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryClipboard {
    pub copies: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl Clipboard for MemoryClipboard {
    fn copy_text(&self, text: &str) {
        self.copies.lock().unwrap().push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    /// Logs every operation as `set:<text>` or `clear`
    #[derive(Default)]
    struct RecordingTool {
        ops: Mutex<Vec<String>>,
    }

    impl RecordingTool {
        fn ops(&self) -> Vec<String> {
            self.ops.lock().unwrap().clone()
        }
    }

    impl ClipboardTool for RecordingTool {
        fn set_text(&self, text: &str) -> Result<(), String> {
            self.ops.lock().unwrap().push(format!("set:{}", text));
            Ok(())
        }

        fn clear(&self) -> Result<(), String> {
            self.ops.lock().unwrap().push("clear".to_string());
            Ok(())
        }
    }

    fn wait_for(tool: &RecordingTool, count: usize) {
        let start = Instant::now();
        while tool.ops().len() < count && start.elapsed() < Duration::from_secs(5) {
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_copy_ids_advance() {
        let clipboard = SystemClipboard::new(Some(Duration::from_secs(30)));
        assert_eq!(clipboard.clear_after(), Some(Duration::from_secs(30)));

        let clone = clipboard.clone();
        assert_eq!(clipboard.copy_id.fetch_add(1, Ordering::SeqCst), 0);
        assert_eq!(clone.copy_id.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_memory_clipboard_records_copies() {
        let clipboard = MemoryClipboard::default();
        clipboard.copy_text("one");
        clipboard.copy_text("two");

        assert_eq!(*clipboard.copies.lock().unwrap(), ["one", "two"]);
    }

    #[test]
    fn test_clears_after_timeout() {
        let tool = Arc::new(RecordingTool::default());
        let clipboard = SystemClipboard::with_tool(tool.clone(), Some(Duration::from_millis(20)));

        clipboard.spawn_copy("hunter2").join().unwrap();

        assert_eq!(tool.ops(), ["set:hunter2", "clear"]);
        assert!(!clipboard.clear_pending());
    }

    #[test]
    fn test_no_clear_without_timeout() {
        let tool = Arc::new(RecordingTool::default());
        let clipboard = SystemClipboard::with_tool(tool.clone(), None);

        clipboard.spawn_copy("hunter2").join().unwrap();

        assert_eq!(tool.ops(), ["set:hunter2"]);
        assert!(!clipboard.clear_pending());
    }

    #[test]
    fn test_clear_pending_wipes_before_timeout() {
        let tool = Arc::new(RecordingTool::default());
        let clipboard = SystemClipboard::with_tool(tool.clone(), Some(Duration::from_secs(60)));

        clipboard.copy_text("hunter2");
        wait_for(&tool, 1);

        assert!(clipboard.clear_pending());
        assert_eq!(tool.ops(), ["set:hunter2", "clear"]);
        assert!(!clipboard.clear_pending());
    }

    #[test]
    fn test_newer_copy_supersedes_older_clear() {
        let tool = Arc::new(RecordingTool::default());
        let clipboard = SystemClipboard::with_tool(tool.clone(), Some(Duration::from_millis(50)));

        let first = clipboard.spawn_copy("one");
        wait_for(&tool, 1);
        let second = clipboard.spawn_copy("two");
        first.join().unwrap();
        second.join().unwrap();

        assert_eq!(tool.ops(), ["set:one", "set:two", "clear"]);
    }

    #[cfg(target_os = "linux")]
    fn stub_tool(dir: &tempfile::TempDir, body: &str) -> std::process::Command {
        let script = dir.path().join("xclip");
        std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut cmd = std::process::Command::new("sh");
        cmd.arg(script);
        cmd
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_run_tool_does_not_wait_for_forked_server() {
        let dir = tempfile::TempDir::new().unwrap();
        let cmd = stub_tool(&dir, "cat > /dev/null\nsleep 20 &\nexit 0");

        let start = Instant::now();
        run_tool(cmd, b"").unwrap();

        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_run_tool_writes_input_and_reports_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("out");
        let cmd = stub_tool(&dir, &format!("cat > '{}'", out.display()));

        run_tool(cmd, b"hunter2").unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "hunter2");

        let failing = stub_tool(&dir, "cat > /dev/null\nexit 3");
        assert!(run_tool(failing, b"x").is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_run_tool_missing_program() {
        let cmd = std::process::Command::new("/nonexistent/clipboard-tool");
        assert!(run_tool(cmd, b"x").unwrap_err().contains("could not run"));
    }
}
