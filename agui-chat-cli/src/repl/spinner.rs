//! Animated waiting indicator

use std::io::{stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

const FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const FRAME_DURATION: Duration = Duration::from_millis(80);

/// Text of one frame: glyph, message and elapsed seconds once past one.
pub fn format_frame(tick: usize, message: &str, elapsed: Duration) -> String {
    let glyph = FRAMES[tick % FRAMES.len()];
    let secs = elapsed.as_secs();
    if secs == 0 {
        format!("{} {}", glyph, message)
    } else {
        format!("{} {} ({}s)", glyph, message, secs)
    }
}

/// A spinner animated by a background task until stopped or dropped.
///
/// Stopping is synchronous so it can happen from inside a
/// [`TurnObserver`](agui_chat_core::TurnObserver) callback.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    /// Start a new spinner with the given message
    pub fn new(message: &str) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = Arc::clone(&running);
        let message = message.to_string();

        let handle = tokio::spawn(async move {
            let started = Instant::now();
            let mut tick = 0;
            while running_clone.load(Ordering::Relaxed) {
                print!(
                    "\r\x1b[2m{}\x1b[0m",
                    format_frame(tick, &message, started.elapsed())
                );
                let _ = stdout().flush();
                tick += 1;
                tokio::time::sleep(FRAME_DURATION).await;
            }
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stop the spinner and clear its line
    pub fn stop(mut self) {
        self.halt();
        print!("\r\x1b[2K");
        let _ = stdout().flush();
    }

    fn halt(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.halt();
    }
}
