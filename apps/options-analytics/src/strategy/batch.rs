//! Parallel curve evaluation using Rayon.
//!
//! Curves are independent, so a batch fans out across a thread pool once it
//! is large enough to pay for the scheduling. Results always come back in
//! input order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::AnalyticsResult;

use super::payoff::{PayoffParams, PayoffPoint, curve};
use super::request::{AnalysisRequest, AnalysisResponse, run};

/// Configuration for batch evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Maximum number of threads to use (0 = use the global pool).
    pub max_threads: usize,

    /// Minimum parallelization threshold (batches below this run sequentially).
    pub min_parallel_jobs: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            max_threads: 0,
            min_parallel_jobs: 4,
        }
    }
}

/// Evaluates many payoff curves at once.
pub struct CurveBatch {
    config: ParallelConfig,
    pool: Option<rayon::ThreadPool>,
}

impl CurveBatch {
    /// Create a batch evaluator.
    ///
    /// A dedicated pool is built when `max_threads > 0`; if that fails the
    /// global pool is used.
    #[must_use]
    pub fn new(config: ParallelConfig) -> Self {
        let pool = if config.max_threads > 0 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(config.max_threads)
                .build()
            {
                Ok(pool) => Some(pool),
                Err(e) => {
                    debug!("Falling back to global rayon pool: {e}");
                    None
                }
            }
        } else {
            None
        };

        Self { config, pool }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ParallelConfig {
        &self.config
    }

    /// Get effective thread count.
    #[must_use]
    pub fn effective_thread_count(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, rayon::ThreadPool::current_num_threads)
    }

    /// Evaluate every strategy's expiry curve.
    ///
    /// Each element carries its own result; one invalid strategy does not
    /// fail the batch.
    #[must_use]
    pub fn evaluate(&self, batch: &[PayoffParams]) -> Vec<AnalyticsResult<Vec<PayoffPoint>>> {
        self.fan_out(batch, curve)
    }

    /// Run every analysis request, results in input order.
    #[must_use]
    pub fn run_requests(
        &self,
        requests: &[AnalysisRequest],
        config: &Config,
    ) -> Vec<AnalyticsResult<AnalysisResponse>> {
        self.fan_out(requests, |request| run(request, config))
    }

    fn fan_out<T, R, F>(&self, items: &[T], job: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        if items.len() < self.config.min_parallel_jobs.max(1) {
            debug!("Running {} jobs sequentially", items.len());
            return items.iter().map(job).collect();
        }

        debug!(
            "Running {} jobs on {} threads",
            items.len(),
            self.effective_thread_count()
        );
        let parallel = || -> Vec<R> { items.par_iter().map(&job).collect() };
        match &self.pool {
            Some(pool) => pool.install(parallel),
            None => parallel(),
        }
    }
}

impl Default for CurveBatch {
    fn default() -> Self {
        Self::new(ParallelConfig::default())
    }
}

impl std::fmt::Debug for CurveBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurveBatch")
            .field("config", &self.config)
            .field("dedicated_pool", &self.pool.is_some())
            .finish()
    }
}
