use anyhow::Result;
use crossbeam::channel::{Receiver, Sender, bounded};

/// Channel capacity per worker
const BUFFER_PER_WORKER: usize = 2;

/// Context for worker threads to avoid too many function parameters
struct WorkerContext<'a, T, R, F> {
    worker_id: usize,
    work_rx: Receiver<T>,
    result_tx: Sender<R>,
    processor: &'a F,
}

/// Execution strategy enum for choosing between parallel and sequential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStrategy {
    Sequential,
    Parallel { workers: usize },
}

impl ExecutionStrategy {
    /// Calculate maximum workers from available cores and configuration.
    ///
    /// `max_threads` of 0 means no explicit cap. Always at least 1.
    pub fn calculate_optimal_workers(max_threads: usize, thread_percentage: u8) -> usize {
        let cpu_cores = num_cpus::get();
        let percentage = usize::from(thread_percentage.clamp(1, 100));

        let max_by_percentage = std::cmp::max(1, (cpu_cores * percentage) / 100);

        if max_threads > 0 {
            std::cmp::min(max_threads, max_by_percentage)
        } else {
            max_by_percentage
        }
    }

    /// Pick a strategy for `item_count` items, never spawning idle workers
    pub fn for_workload(item_count: usize, max_workers: usize) -> Self {
        let workers = std::cmp::min(max_workers, item_count).max(1);
        if workers == 1 {
            ExecutionStrategy::Sequential
        } else {
            ExecutionStrategy::Parallel { workers }
        }
    }

    pub fn workers(&self) -> usize {
        match self {
            ExecutionStrategy::Sequential => 1,
            ExecutionStrategy::Parallel { workers } => *workers,
        }
    }

    /// Run `processor` over every item and hand each result to `consumer`
    /// as soon as it is available.
    ///
    /// `consumer` runs on the calling thread only. Completion order is not
    /// the input order when running in parallel.
    pub fn execute<T, R, F, C>(&self, work_items: Vec<T>, processor: F, consumer: C) -> Result<()>
    where
        T: Send,
        R: Send,
        F: Fn(&T, usize) -> R + Sync,
        C: FnMut(R),
    {
        match self {
            ExecutionStrategy::Sequential => {
                execute_sequential(work_items, processor, consumer);
                Ok(())
            }
            ExecutionStrategy::Parallel { workers } => {
                execute_parallel(*workers, work_items, processor, consumer)
            }
        }
    }
}

fn execute_sequential<T, R, F, C>(work_items: Vec<T>, processor: F, mut consumer: C)
where
    F: Fn(&T, usize) -> R,
    C: FnMut(R),
{
    for work_item in &work_items {
        consumer(processor(work_item, 0));
    }
}

fn execute_parallel<T, R, F, C>(workers: usize, work_items: Vec<T>, processor: F, mut consumer: C) -> Result<()>
where
    T: Send,
    R: Send,
    F: Fn(&T, usize) -> R + Sync,
    C: FnMut(R),
{
    if work_items.is_empty() {
        return Ok(());
    }

    let actual_workers = std::cmp::min(workers.max(1), work_items.len());
    let buffer_size = actual_workers * BUFFER_PER_WORKER;
    let (work_tx, work_rx): (Sender<T>, Receiver<T>) = bounded(buffer_size);
    let (result_tx, result_rx): (Sender<R>, Receiver<R>) = bounded(buffer_size);
    let processor = &processor;

    crossbeam::thread::scope(|s| {
        for worker_id in 0..actual_workers {
            let ctx = WorkerContext {
                worker_id,
                work_rx: work_rx.clone(),
                result_tx: result_tx.clone(),
                processor,
            };
            s.spawn(move |_| worker_thread(ctx));
        }

        // Producer thread: send work to workers
        s.spawn(move |_| {
            for work_item in work_items {
                if work_tx.send(work_item).is_err() {
                    break; // Workers dropped
                }
            }
        });

        // Drop our copies so the result channel closes once every worker exits
        drop(work_rx);
        drop(result_tx);

        // Collector: the only place results are consumed
        for result in result_rx.iter() {
            consumer(result);
        }
    })
    .map_err(|_| anyhow::anyhow!("Thread panic occurred during parallel execution"))
}

fn worker_thread<T, R, F>(ctx: WorkerContext<'_, T, R, F>)
where
    F: Fn(&T, usize) -> R,
{
    while let Ok(work_item) = ctx.work_rx.recv() {
        let result = (ctx.processor)(&work_item, ctx.worker_id);
        if ctx.result_tx.send(result).is_err() {
            break; // Receiver dropped
        }
    }
}
