use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use windows::Win32::Foundation::HWND;

use crate::automation::actions::ActionExecutor;
use crate::automation::evaluator::evaluate_task;
use crate::automation::interaction::{delay_ms, SystemPointer};
use crate::automation::matcher::ImageMatcher;
use crate::config::ProcessProfile;
use crate::core::capture::capture_window;
use crate::core::window::{get_window_rect, is_window_valid};
use crate::core::worker::Worker;

/// Idle sleep between capture cycles, bounding CPU when nothing changes.
const CYCLE_IDLE_MS: u64 = 10;

/// Owns the background task loop for one profile session.
pub struct AutomationEngine {
    worker: Worker,
}

impl Default for AutomationEngine {
    fn default() -> Self {
        Self {
            worker: Worker::new(),
        }
    }
}

impl AutomationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the task loop. The caller has already located and activated
    /// the target window; a running engine ignores further start requests.
    pub fn start(&self, profile: ProcessProfile, resource_root: PathBuf, hwnd: HWND) -> bool {
        if self.worker.is_running() {
            log::warn!("Automation is already running");
            return false;
        }
        self.worker.start(move |running, status| {
            run_task_loop(profile, resource_root, hwnd, running, status);
        });
        true
    }

    pub fn stop(&self) {
        self.worker.stop();
    }

    /// Stop and wait for the current iteration to finish, at most `timeout`.
    pub fn stop_and_wait(&self, timeout: Duration) -> bool {
        self.worker.stop_and_wait(timeout)
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_running()
    }

    pub fn status(&self) -> String {
        self.worker.get_status()
    }

    pub fn set_status(&self, text: &str) {
        self.worker.set_status(text);
    }
}

fn run_task_loop(
    profile: ProcessProfile,
    resource_root: PathBuf,
    hwnd: HWND,
    running: Arc<AtomicBool>,
    status: Arc<Mutex<String>>,
) {
    let pointer = match SystemPointer::new() {
        Ok(pointer) => pointer,
        Err(e) => {
            log::error!("{}", e);
            *status.lock().unwrap() = format!("Error: {}", e);
            return;
        }
    };
    let mut matcher = ImageMatcher::new(profile.match_threshold);
    let mut executor = ActionExecutor::new(pointer);

    log::info!(
        "Task loop started for '{}' ({} tasks, threshold {})",
        profile.process_name,
        profile.tasks.len(),
        profile.match_threshold
    );
    *status.lock().unwrap() = "Running".to_string();

    while running.load(Ordering::SeqCst) {
        if !is_window_valid(hwnd) {
            log::error!("Target window is gone, stopping task loop");
            *status.lock().unwrap() = "Error: target window is gone".to_string();
            return;
        }

        // One capture per cycle; every task this cycle sees the same frame.
        let Some(window_rect) = get_window_rect(hwnd) else {
            log::warn!("Failed to get window rect, skipping cycle");
            delay_ms(CYCLE_IDLE_MS);
            continue;
        };
        let capture = match capture_window(hwnd) {
            Ok(capture) => capture,
            Err(e) => {
                log::warn!("Capture failed, skipping cycle: {}", e);
                delay_ms(CYCLE_IDLE_MS);
                continue;
            }
        };
        let capture_gray = image::imageops::grayscale(&capture);

        for task in &profile.tasks {
            if !running.load(Ordering::SeqCst) {
                break;
            }
            evaluate_task(
                &mut matcher,
                &mut executor,
                task,
                &capture_gray,
                window_rect,
                &resource_root,
            );
            delay_ms(task.delay_ms);
        }

        // Small pause between cycles to avoid pegging a core
        delay_ms(CYCLE_IDLE_MS);
    }

    *status.lock().unwrap() = "Stopped".to_string();
    log::info!("Task loop stopped");
}
