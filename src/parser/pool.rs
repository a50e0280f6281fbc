//! Bounded worker pool for parallel parsing.
//!
//! Tree-sitter parsers are stateful and not `Sync`, so each worker thread
//! owns its parser and query caches outright and shares nothing. The
//! coordinator feeds one sub-batch at a time per worker and waits for that
//! worker's ack before sending the next, which bounds per-worker memory and
//! lets the worker accumulate results until a single flush.
//!
//! Message shapes are typed pairs: `SubBatch -> SubBatchDone`,
//! `Flush -> Result`; progress arrives on the shared event channel.
//! Cancellation is channel disconnect, not a message.

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};

use super::{FileParser, FileRecord, ParseOutput};

/// Default per-task timeout. A worker that does not ack a sub-batch within
/// this window is abandoned and replaced.
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(30);

/// Progress is streamed after every this many files.
const PROGRESS_INTERVAL: usize = 100;

enum WorkerRequest {
    SubBatch(Vec<FileRecord>),
    Flush,
}

enum WorkerEvent {
    SubBatchDone {
        worker: usize,
        epoch: u64,
    },
    Progress {
        worker: usize,
        epoch: u64,
        /// Cumulative files parsed by this worker.
        files: usize,
    },
    Result {
        worker: usize,
        epoch: u64,
        output: Box<ParseOutput>,
    },
}

struct WorkerHandle {
    request_tx: Sender<WorkerRequest>,
    /// Bumped on replacement so events from an abandoned thread are ignored.
    epoch: u64,
    _join: JoinHandle<()>,
}

/// Fixed-size pool of parse workers.
pub struct WorkerPool {
    workers: Vec<WorkerHandle>,
    event_tx: Sender<WorkerEvent>,
    event_rx: Receiver<WorkerEvent>,
    task_timeout: Duration,
    shut_down: bool,
}

impl WorkerPool {
    /// The default worker count: hardware concurrency, clamped to at least 2.
    pub fn default_workers() -> usize {
        thread::available_parallelism()
            .map(|n| n.get().max(2))
            .unwrap_or(2)
    }

    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        let (event_tx, event_rx) = channel();
        let handles = (0..workers)
            .map(|id| spawn_worker(id, 0, event_tx.clone()))
            .collect();
        Self {
            workers: handles,
            event_tx,
            event_rx,
            task_timeout: DEFAULT_TASK_TIMEOUT,
            shut_down: false,
        }
    }

    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = timeout;
        self
    }

    /// Parse `files` across the pool and return the merged output.
    ///
    /// Files are split into one contiguous slice per worker, preserving
    /// submitted order within each worker; there are no cross-worker ordering
    /// guarantees. `progress` receives the cumulative file count.
    pub fn parse_files(
        &mut self,
        files: Vec<FileRecord>,
        sub_batch_size: usize,
        mut progress: impl FnMut(usize),
    ) -> Result<ParseOutput> {
        if self.shut_down {
            bail!("worker pool is shut down; task rejected");
        }
        let sub_batch_size = sub_batch_size.max(1);
        let mut merged = ParseOutput::default();
        if files.is_empty() {
            return Ok(merged);
        }

        // Partition into one slice per worker, then chunk each slice.
        let per_worker = files.len().div_ceil(self.workers.len());
        let mut queues: HashMap<usize, Vec<Vec<FileRecord>>> = HashMap::new();
        for (worker_id, slice) in files.chunks(per_worker).enumerate() {
            let batches: Vec<Vec<FileRecord>> = slice
                .chunks(sub_batch_size)
                .map(|c| c.to_vec())
                .collect();
            queues.insert(worker_id, batches);
        }
        // Reverse so pop() yields sub-batches in submitted order.
        for batches in queues.values_mut() {
            batches.reverse();
        }

        let mut deadlines: HashMap<usize, Instant> = HashMap::new();
        let mut per_worker_files: HashMap<usize, usize> = HashMap::new();
        let mut pending_results = 0usize;

        for (&worker_id, batches) in queues.iter_mut() {
            if let Some(batch) = batches.pop() {
                self.send(worker_id, WorkerRequest::SubBatch(batch))?;
                deadlines.insert(worker_id, Instant::now() + self.task_timeout);
                pending_results += 1;
            }
        }

        while pending_results > 0 {
            let wait = deadlines
                .values()
                .min()
                .map(|d| d.saturating_duration_since(Instant::now()))
                .unwrap_or(self.task_timeout);

            match self.event_rx.recv_timeout(wait.max(Duration::from_millis(10))) {
                Ok(event) => match event {
                    WorkerEvent::SubBatchDone { worker, epoch } => {
                        if !self.is_current(worker, epoch) {
                            continue;
                        }
                        match queues.get_mut(&worker).and_then(|q| q.pop()) {
                            Some(batch) => {
                                self.send(worker, WorkerRequest::SubBatch(batch))?;
                                deadlines.insert(worker, Instant::now() + self.task_timeout);
                            }
                            None => {
                                self.send(worker, WorkerRequest::Flush)?;
                                deadlines.insert(worker, Instant::now() + self.task_timeout);
                            }
                        }
                    }
                    WorkerEvent::Progress {
                        worker,
                        epoch,
                        files,
                    } => {
                        if !self.is_current(worker, epoch) {
                            continue;
                        }
                        // A progress report proves the worker is alive mid
                        // sub-batch; push its deadline out.
                        if deadlines.contains_key(&worker) {
                            deadlines.insert(worker, Instant::now() + self.task_timeout);
                        }
                        per_worker_files.insert(worker, files);
                        progress(per_worker_files.values().sum());
                    }
                    WorkerEvent::Result {
                        worker,
                        epoch,
                        output,
                    } => {
                        if !self.is_current(worker, epoch) {
                            continue;
                        }
                        merged.merge(*output);
                        deadlines.remove(&worker);
                        pending_results -= 1;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Replace every overdue worker; its in-flight sub-batch
                    // (and any unflushed accumulation) is dropped.
                    let now = Instant::now();
                    let overdue: Vec<usize> = deadlines
                        .iter()
                        .filter(|(_, d)| **d <= now)
                        .map(|(w, _)| *w)
                        .collect();
                    for worker in overdue {
                        eprintln!(
                            "warning: parse worker {worker} timed out; replacing and dropping its in-flight batch"
                        );
                        self.replace_worker(worker);
                        match queues.get_mut(&worker).and_then(|q| q.pop()) {
                            Some(batch) => {
                                self.send(worker, WorkerRequest::SubBatch(batch))?;
                                deadlines.insert(worker, Instant::now() + self.task_timeout);
                            }
                            None => {
                                self.send(worker, WorkerRequest::Flush)?;
                                deadlines.insert(worker, Instant::now() + self.task_timeout);
                            }
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    bail!("all parse workers disconnected");
                }
            }
        }

        Ok(merged)
    }

    /// Shut the pool down. Workers exit at their next receive; tasks
    /// submitted afterwards are rejected.
    pub fn shutdown(&mut self) {
        self.shut_down = true;
        for worker in &mut self.workers {
            // Replace the live sender with a dead one so the thread's receive
            // loop sees a disconnect.
            let (dead_tx, _) = channel();
            worker.request_tx = dead_tx;
        }
    }

    fn is_current(&self, worker: usize, epoch: u64) -> bool {
        self.workers
            .get(worker)
            .map(|w| w.epoch == epoch)
            .unwrap_or(false)
    }

    fn send(&self, worker: usize, request: WorkerRequest) -> Result<()> {
        if self.workers[worker].request_tx.send(request).is_err() {
            bail!("parse worker {worker} is gone");
        }
        Ok(())
    }

    fn replace_worker(&mut self, worker: usize) {
        let epoch = self.workers[worker].epoch + 1;
        self.workers[worker] = spawn_worker(worker, epoch, self.event_tx.clone());
    }
}

fn spawn_worker(id: usize, epoch: u64, events: Sender<WorkerEvent>) -> WorkerHandle {
    let (request_tx, request_rx) = channel::<WorkerRequest>();
    let join = thread::spawn(move || worker_loop(id, epoch, request_rx, events));
    WorkerHandle {
        request_tx,
        epoch,
        _join: join,
    }
}

fn worker_loop(id: usize, epoch: u64, requests: Receiver<WorkerRequest>, events: Sender<WorkerEvent>) {
    let mut parser = FileParser::new();
    let mut accumulated = ParseOutput::default();
    let mut files_done = 0usize;

    while let Ok(request) = requests.recv() {
        match request {
            WorkerRequest::SubBatch(files) => {
                for file in &files {
                    parser.parse_into(file, &mut accumulated);
                    files_done += 1;
                    if files_done % PROGRESS_INTERVAL == 0
                        && events
                            .send(WorkerEvent::Progress {
                                worker: id,
                                epoch,
                                files: files_done,
                            })
                            .is_err()
                    {
                        return;
                    }
                }
                if events
                    .send(WorkerEvent::SubBatchDone { worker: id, epoch })
                    .is_err()
                {
                    return;
                }
            }
            WorkerRequest::Flush => {
                // Final progress so the coordinator's total lands exactly.
                let _ = events.send(WorkerEvent::Progress {
                    worker: id,
                    epoch,
                    files: files_done,
                });
                let output = std::mem::take(&mut accumulated);
                if events
                    .send(WorkerEvent::Result {
                        worker: id,
                        epoch,
                        output: Box::new(output),
                    })
                    .is_err()
                {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, content: &str) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_pool_parses_across_workers() {
        let mut pool = WorkerPool::new(2);
        let files = vec![
            record("a.ts", "export function fa() {}"),
            record("b.ts", "export function fb() {}"),
            record("c.py", "def fc():\n    pass\n"),
            record("d.go", "package d\nfunc Fd() {}\n"),
        ];
        let out = pool.parse_files(files, 2, |_| {}).unwrap();
        assert_eq!(out.file_count, 4);
        let names: Vec<&str> = out.symbols.iter().map(|s| s.name.as_str()).collect();
        for expected in ["fa", "fb", "fc", "Fd"] {
            assert!(names.contains(&expected), "missing {expected} in {names:?}");
        }
    }

    #[test]
    fn test_pool_empty_input() {
        let mut pool = WorkerPool::new(2);
        let out = pool.parse_files(vec![], 10, |_| {}).unwrap();
        assert_eq!(out.file_count, 0);
    }

    #[test]
    fn test_pool_rejects_after_shutdown() {
        let mut pool = WorkerPool::new(1);
        pool.shutdown();
        let result = pool.parse_files(vec![record("a.ts", "let x = 1;")], 10, |_| {});
        assert!(result.is_err());
    }

    #[test]
    fn test_sub_batches_preserve_worker_order() {
        // One worker, tiny sub-batches: all files must still be processed.
        let mut pool = WorkerPool::new(1);
        let files: Vec<FileRecord> = (0..25)
            .map(|i| record(&format!("f{i}.ts"), &format!("export function f{i}() {{}}")))
            .collect();
        let out = pool.parse_files(files, 3, |_| {}).unwrap();
        assert_eq!(out.file_count, 25);
        assert_eq!(out.symbols.len(), 25);
    }
}
