use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during batch execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The chunk size must be valid.
    #[error("chunk size must be > 0, got {0}")]
    InvalidChunkSize(usize),

    /// Input and output sizes do not match.
    #[error("source ({0}) and destination ({1}) slices must have the same length")]
    SizeMismatch(usize, usize),
}

/// Controls how a batch of points is mapped.
///
/// Every strategy produces the same output for the same input, points never
/// depend on each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process every point in parallel.
    #[default]
    ParallelElements,

    /// Use the global Rayon thread pool to process chunks of `n` points in parallel.
    ///
    /// Cheaper than [`ExecutionStrategy::ParallelElements`] for very large batches.
    Chunks(usize),

    /// Run sequentially on the current thread.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call.
    Fixed(usize),
}

/// Extension trait to map a source slice into a destination slice.
pub trait ExecuteExt<T> {
    /// Apply `op` to every `(src, dst)` pair using the given strategy.
    fn execute_with<U, F>(
        &self,
        strategy: ExecutionStrategy,
        dst: &mut [U],
        op: F,
    ) -> Result<(), ParallelError>
    where
        U: Send,
        F: Fn((&T, &mut U)) + Sync + Send;
}

impl<T: Sync> ExecuteExt<T> for &[T] {
    fn execute_with<U, F>(
        &self,
        strategy: ExecutionStrategy,
        dst: &mut [U],
        op: F,
    ) -> Result<(), ParallelError>
    where
        U: Send,
        F: Fn((&T, &mut U)) + Sync + Send,
    {
        if self.len() != dst.len() {
            return Err(ParallelError::SizeMismatch(self.len(), dst.len()));
        }

        match strategy {
            ExecutionStrategy::Serial => {
                self.iter().zip(dst.iter_mut()).for_each(op);
            }
            ExecutionStrategy::ParallelElements => {
                self.par_iter().zip(dst.par_iter_mut()).for_each(op);
            }
            ExecutionStrategy::Chunks(n) => {
                if n == 0 {
                    return Err(ParallelError::InvalidChunkSize(n));
                }
                self.par_chunks(n)
                    .zip(dst.par_chunks_mut(n))
                    .for_each(|(src_chunk, dst_chunk)| {
                        src_chunk.iter().zip(dst_chunk.iter_mut()).for_each(&op);
                    });
            }
            ExecutionStrategy::Fixed(n) => {
                if n == 0 {
                    return Err(ParallelError::InvalidThreadCount(n));
                }
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| ParallelError::BuildError(e.to_string()))?;

                pool.install(|| {
                    self.par_iter().zip(dst.par_iter_mut()).for_each(op);
                });
            }
        }
        Ok(())
    }
}
