//! Batch submission: flatten, execute, recombine.

use declist_types::{DecisionList, SymbolTable};
use tracing::{debug, info, warn};

use crate::batch::Batch;
use crate::config::DispatchConfig;
use crate::error::{DispatchError, DispatchResult};
use crate::executor::Executor;

/// Submits decision lists to an [`Executor`] as one batch.
pub struct Dispatcher<E> {
    executor: E,
    config: DispatchConfig,
}

impl<E: Executor> Dispatcher<E> {
    /// A dispatcher over `executor` with the default configuration.
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, DispatchConfig::default())
    }

    /// A dispatcher over `executor` with an explicit configuration.
    pub fn with_config(executor: E, config: DispatchConfig) -> Self {
        Self { executor, config }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// The executor batches are submitted to.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Flatten `lists` into a batch, enforcing the configured size limit.
    pub fn flatten(&self, lists: &[DecisionList], symbols: &SymbolTable) -> DispatchResult<Batch> {
        let batch = Batch::flatten(lists, symbols, self.config.flatten_workers)?;
        if let Some(limit) = self.config.max_batch_nodes {
            if batch.len() > limit {
                return Err(DispatchError::BatchTooLarge {
                    nodes: batch.len(),
                    limit,
                });
            }
        }
        debug!(
            lists = batch.list_count(),
            nodes = batch.len(),
            fingerprint = %batch.fingerprint(),
            "flattened batch"
        );
        Ok(batch)
    }

    /// Evaluate every list through the executor.
    ///
    /// Returns exactly one outcome per list in input order, or fails for
    /// the whole batch.
    pub fn submit_batch(
        &self,
        lists: &[DecisionList],
        symbols: &SymbolTable,
    ) -> DispatchResult<Vec<bool>> {
        let batch = self.flatten(lists, symbols)?;
        self.submit(&batch)
    }

    /// Execute an already flattened batch and recombine its codes.
    pub fn submit(&self, batch: &Batch) -> DispatchResult<Vec<bool>> {
        info!(
            lists = batch.list_count(),
            nodes = batch.len(),
            "submitting batch"
        );
        let codes = self.executor.execute(batch.nodes())?;
        debug!(codes = codes.len(), "executor returned");

        batch.recombine(&codes).map_err(|err| {
            warn!(error = %err, category = %err.category(), "batch recombination failed");
            err
        })
    }
}
