//! Scheduler for bounding concurrent page work
//!
//! Tasks are started in submission order, each as soon as one of the
//! `max_concurrency` slots is free. Completion order is unconstrained.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle};

/// Runs batches of deferred tasks with at most `max_concurrency` in flight
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Global semaphore for limiting concurrent tasks
    semaphore: Arc<Semaphore>,

    max_concurrency: usize,
}

impl Scheduler {
    /// Creates a new scheduler; a limit of zero is raised to one
    pub fn new(max_concurrency: usize) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Runs every task and waits for the whole batch
    ///
    /// Results are returned in submission order. A task that panics yields an
    /// `Err(JoinError)` in its slot without affecting its siblings.
    ///
    /// # Example
    ///
    /// ```
    /// use docsmith::crawler::Scheduler;
    ///
    /// # async fn example() {
    /// let scheduler = Scheduler::new(2);
    /// let tasks: Vec<_> = (0..5).map(|i| move || async move { i * 2 }).collect();
    /// let results = scheduler.run_all(tasks).await;
    /// assert_eq!(results.len(), 5);
    /// # }
    /// ```
    pub async fn run_all<T, F, Fut>(&self, tasks: Vec<F>) -> Vec<Result<T, JoinError>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let total = tasks.len();
        let mut handles: Vec<JoinHandle<T>> = Vec::with_capacity(total);

        for (index, task) in tasks.into_iter().enumerate() {
            // Waiting here keeps start order equal to submission order
            let permit = match self.semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::error!("Scheduler semaphore closed, dropping remaining tasks");
                    break;
                }
            };

            let future = task();
            handles.push(tokio::spawn(async move {
                let output = future.await;
                drop(permit);
                output
            }));
            tracing::trace!("Started task {}/{}", index + 1, total);
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let joined = handle.await;
            if let Err(error) = &joined {
                tracing::error!("Task failed to complete: {}", error);
            }
            results.push(joined);
        }

        results
    }
}
