#[cfg(test)]
#[path = "progress_indicator_test.rs"]
mod tests;

use std::io;
use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

pub const PROGRESS_TICK: Duration = Duration::from_millis(100);
const FRAMES: [char; 4] = ['|', '/', '-', '\\'];

/// Rotating cue drawn on its own task while a request is outstanding.
pub struct ProgressIndicator {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl ProgressIndicator {
    pub fn start(mut writer: Box<dyn io::Write + Send>, label: &str) -> ProgressIndicator {
        let stop = Arc::new(AtomicBool::new(false));
        let task_stop = stop.clone();
        let label = label.to_string();

        let handle = tokio::spawn(async move {
            let mut frame = 0;
            while !task_stop.load(Ordering::SeqCst) {
                let _ = write!(writer, "\r{label}{}", FRAMES[frame % FRAMES.len()]);
                let _ = writer.flush();
                frame += 1;
                tokio::time::sleep(PROGRESS_TICK).await;
            }

            let blank = " ".repeat(label.chars().count() + 1);
            let _ = write!(writer, "\r{blank}\r");
            let _ = writer.flush();
        });

        return ProgressIndicator { stop, handle };
    }

    /// Returns once the cue has been erased.
    pub async fn stop(self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Err(err) = self.handle.await {
            tracing::error!(error = ?err, "Progress indicator task failed");
        }
    }
}
