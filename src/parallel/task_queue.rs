use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use crossbeam::channel::{unbounded, Receiver, Sender};
use parking_lot::{Condvar, Mutex};
use crate::core::config::DEFAULT_THREADS;
use crate::core::error::{Error, Result};

/// A unit of work. Failures are reported by the worker that ran it.
pub type Task = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

/// Fixed-size pool of long-lived worker threads.
///
/// Tasks are pulled from a shared channel, so there is no ordering between workers.
/// `await_idle` must not be called from inside a task: the calling task counts as
/// pending and the barrier would never open.
pub struct TaskQueue {
    sender: Mutex<Option<Sender<Task>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    pending: Arc<Pending>,
    size: usize,
}

/// Submitted-but-not-finished counter plus the condition idle waiters sleep on.
struct Pending {
    count: AtomicUsize,
    lock: Mutex<()>,
    idle: Condvar,
}

impl Pending {
    fn increment(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        let _guard = self.lock.lock();
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_all();
        }
    }

    fn wait_for_zero(&self) {
        let mut guard = self.lock.lock();
        while self.count.load(Ordering::SeqCst) > 0 {
            self.idle.wait(&mut guard);
        }
    }
}

impl TaskQueue {
    /// Starts `size` workers; zero falls back to the default pool size.
    pub fn new(size: usize) -> Self {
        let size = if size < 1 { DEFAULT_THREADS } else { size };
        let (sender, receiver) = unbounded::<Task>();
        let pending = Arc::new(Pending {
            count: AtomicUsize::new(0),
            lock: Mutex::new(()),
            idle: Condvar::new(),
        });

        let workers = (0..size)
            .map(|id| {
                let receiver = receiver.clone();
                let pending = Arc::clone(&pending);
                thread::Builder::new()
                    .name(format!("webdex-worker-{}", id))
                    .spawn(move || Self::worker_loop(id, receiver, pending))
                    .map_err(Error::from)
            })
            .filter_map(|spawned| match spawned {
                Ok(handle) => Some(handle),
                Err(e) => {
                    tracing::error!("Failed to spawn worker: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Task queue started with {} workers", size);

        TaskQueue {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
            pending,
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Tasks submitted and not yet finished.
    pub fn pending(&self) -> usize {
        self.pending.count.load(Ordering::SeqCst)
    }

    /// Queues `task` for exactly one worker. Fails once the queue is shut down.
    pub fn submit<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let sender = self.sender.lock();
        let sender = sender
            .as_ref()
            .ok_or_else(|| Error::invalid_state("Task submitted after shutdown"))?;

        self.pending.increment();
        if sender.send(Box::new(task)).is_err() {
            self.pending.decrement();
            return Err(Error::invalid_state("All workers have exited"));
        }
        Ok(())
    }

    /// Blocks until every submitted task has completed.
    pub fn await_idle(&self) {
        self.pending.wait_for_zero();
    }

    /// Stops accepting work, lets workers drain what is queued, and joins them.
    pub fn shutdown(&self) {
        // Dropping the only sender disconnects the channel once it is drained.
        drop(self.sender.lock().take());

        let workers: Vec<_> = self.workers.lock().drain(..).collect();
        for handle in workers {
            if handle.join().is_err() {
                tracing::error!("Worker thread terminated abnormally");
            }
        }
    }

    fn worker_loop(id: usize, receiver: Receiver<Task>, pending: Arc<Pending>) {
        while let Ok(task) = receiver.recv() {
            match panic::catch_unwind(AssertUnwindSafe(task)) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!(worker = id, "Task failed: {}", e),
                Err(payload) => {
                    let message = payload
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    tracing::error!(worker = id, "{}", Error::task(message));
                }
            }
            pending.decrement();
        }
        tracing::debug!(worker = id, "Worker exiting");
    }
}

impl Drop for TaskQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}
