use anyhow::Result;
use crossbeam::channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Configuration for parallel processing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Maximum number of worker threads (0 = auto-detect)
    pub max_threads: usize,
    /// Percentage of CPU cores to use (1-100)
    pub thread_percentage: u8,
    /// Channel buffer size multiplier (buffer = workers * multiplier)
    pub channel_buffer_multiplier: usize,
    /// Progress update frequency (every N items)
    pub progress_update_frequency: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            max_threads: 0,
            thread_percentage: 75,
            channel_buffer_multiplier: 2,
            progress_update_frequency: 5,
        }
    }
}

/// Result from processing a work item
type WorkResult<R> = std::result::Result<R, String>;

/// Generic parallel processor for work distribution
pub struct ParallelProcessor {
    config: ParallelConfig,
}

impl ParallelProcessor {
    pub fn new(config: ParallelConfig) -> Self {
        Self { config }
    }

    /// Calculate optimal number of worker threads
    pub fn calculate_optimal_workers(&self, work_count: usize) -> usize {
        let cpu_cores = num_cpus::get();

        // Apply thread percentage from config
        let max_by_percentage =
            std::cmp::max(1, (cpu_cores * self.config.thread_percentage as usize) / 100);

        // Apply max_threads limit if specified (0 means use percentage calculation)
        let max_workers = if self.config.max_threads > 0 {
            std::cmp::min(self.config.max_threads, max_by_percentage)
        } else {
            max_by_percentage
        };

        // Don't create more workers than work items
        std::cmp::min(max_workers, work_count.max(1))
    }

    /// Process work items in parallel using a worker function
    ///
    /// # Arguments
    /// * `work_items` - Items to process
    /// * `worker_fn` - Function that processes each work item
    /// * `progress_label` - Label for progress logging
    ///
    /// # Returns
    /// Vector of successful results in original order. Failed items are
    /// logged and left out.
    pub fn process<T, R, F>(
        &self,
        work_items: Vec<T>,
        worker_fn: F,
        progress_label: &str,
    ) -> Result<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> Result<R> + Sync,
    {
        let work_count = work_items.len();
        if work_count == 0 {
            return Ok(Vec::new());
        }

        let optimal_workers = self.calculate_optimal_workers(work_count);
        let buffer = optimal_workers * self.config.channel_buffer_multiplier.max(1);
        tracing::debug!("{}: {} items on {} workers", progress_label, work_count, optimal_workers);

        // Create bounded channels
        let (work_tx, work_rx): (Sender<(usize, T)>, Receiver<(usize, T)>) = bounded(buffer);
        let (result_tx, result_rx): (
            Sender<(usize, WorkResult<R>)>,
            Receiver<(usize, WorkResult<R>)>,
        ) = bounded(buffer * 2);

        // Shared progress counter
        let progress_counter = AtomicUsize::new(0);
        let worker_fn = &worker_fn;
        let progress_counter = &progress_counter;

        // Use crossbeam::thread::scope for safe borrowing
        let indexed_results = crossbeam::thread::scope(|s| {
            // Spawn worker threads
            for worker_id in 0..optimal_workers {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();

                s.spawn(move |_| {
                    while let Ok((index, work_item)) = work_rx.recv() {
                        let work_result = worker_fn(work_item).map_err(|e| format!("{e:#}"));

                        // Send result
                        if result_tx.send((index, work_result)).is_err() {
                            break; // Receiver dropped
                        }

                        // Update progress
                        let current = progress_counter.fetch_add(1, Ordering::Relaxed) + 1;
                        let frequency = self.config.progress_update_frequency.max(1);
                        if current % frequency == 0 || current == work_count {
                            tracing::debug!(
                                "{}: {}/{} items ({:.1}%) [worker-{}]",
                                progress_label,
                                current,
                                work_count,
                                (current as f64 / work_count as f64 * 100.0),
                                worker_id
                            );
                        }
                    }
                });
            }

            // Producer thread: send work to workers
            s.spawn(move |_| {
                for (index, work_item) in work_items.into_iter().enumerate() {
                    if work_tx.send((index, work_item)).is_err() {
                        break; // Workers dropped
                    }
                }
            });

            // Drop the original sender so the collector knows when work is done
            drop(result_tx);

            // Collector: gather results
            Self::collect_results(result_rx, work_count)
        })
        .map_err(|_| anyhow::anyhow!("Thread panic occurred during parallel processing"))?;

        // Sort results by original index and extract successful ones
        let mut sorted_results = indexed_results;
        sorted_results.sort_by_key(|(index, _)| *index);

        let successful_results: Vec<R> = sorted_results
            .into_iter()
            .filter_map(|(index, work_result)| match work_result {
                Ok(result) => Some(result),
                Err(error) => {
                    tracing::warn!("{}: item {} failed: {}", progress_label, index, error);
                    None
                }
            })
            .collect();

        Ok(successful_results)
    }

    /// Collect results from workers
    fn collect_results<R>(
        result_rx: Receiver<(usize, WorkResult<R>)>,
        total_work: usize,
    ) -> Vec<(usize, WorkResult<R>)> {
        let mut results = Vec::with_capacity(total_work);

        while let Ok(result) = result_rx.recv() {
            results.push(result);

            // Break when all work is processed
            if results.len() >= total_work {
                break;
            }
        }

        results
    }
}
