use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Clears the run flag when the worker closure returns or unwinds, so a
/// panicking task is still observable as "not running".
struct RunGuard(Arc<AtomicBool>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A cancellable background worker: one thread, an atomic run flag and a
/// status line for the UI. The flag is the only shared mutable state; the
/// task polls it cooperatively.
pub struct Worker {
    running: Arc<AtomicBool>,
    status: Arc<Mutex<String>>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Default for Worker {
    fn default() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            status: Arc::new(Mutex::new("Ready".to_string())),
            handle: Mutex::new(None),
        }
    }
}

impl Worker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start<F>(&self, task: F)
    where
        F: FnOnce(Arc<AtomicBool>, Arc<Mutex<String>>) + Send + 'static,
    {
        if self.is_running() {
            log::warn!("Worker is already running");
            return;
        }
        self.running.store(true, Ordering::SeqCst);

        // Clones for the thread
        let running = Arc::clone(&self.running);
        let status = Arc::clone(&self.status);
        let guard = RunGuard(Arc::clone(&self.running));

        let handle = thread::spawn(move || {
            let _guard = guard;
            task(running, status);
        });
        *self.handle.lock().unwrap() = Some(handle);
    }

    /// Request a cooperative stop. The task observes the flag at its next
    /// checkpoint; use `stop_and_wait` to also join the thread.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Stop and wait for the current iteration to finish, at most `timeout`.
    /// Returns false if the thread had to be abandoned.
    pub fn stop_and_wait(&self, timeout: Duration) -> bool {
        self.stop();
        self.wait(timeout)
    }

    /// Join the worker thread with a bounded timeout. On timeout the thread
    /// is abandoned and the worker is still reported as stopped.
    pub fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let finished = self
                .handle
                .lock()
                .unwrap()
                .as_ref()
                .map_or(true, |h| h.is_finished());
            if finished {
                break;
            }
            if Instant::now() >= deadline {
                log::warn!("Worker did not finish within {:?}, abandoning thread", timeout);
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
        if let Some(handle) = self.handle.lock().unwrap().take() {
            let _ = handle.join();
        }
        true
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn get_status(&self) -> String {
        self.status.lock().unwrap().clone()
    }

    pub fn set_status(&self, text: &str) {
        *self.status.lock().unwrap() = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_joins_within_timeout() {
        let worker = Worker::new();
        worker.start(|running, status| {
            *status.lock().unwrap() = "Running".to_string();
            while running.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(5));
            }
        });
        assert!(worker.is_running());
        assert!(worker.stop_and_wait(Duration::from_secs(2)));
        assert!(!worker.is_running());
        assert_eq!(worker.get_status(), "Running");
    }

    #[test]
    fn finished_task_clears_the_flag() {
        let worker = Worker::new();
        worker.start(|_running, _status| {});
        assert!(worker.wait(Duration::from_secs(2)));
        assert!(!worker.is_running());
    }

    #[test]
    fn panicking_task_clears_the_flag() {
        let worker = Worker::new();
        worker.start(|_running, _status| panic!("worker died"));
        assert!(worker.wait(Duration::from_secs(2)));
        assert!(!worker.is_running());
    }

    #[test]
    fn wait_without_start_returns_immediately() {
        let worker = Worker::new();
        assert!(worker.wait(Duration::from_millis(50)));
        assert!(!worker.is_running());
    }
}
