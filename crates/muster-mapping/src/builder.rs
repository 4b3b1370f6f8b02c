// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Mapping Construction
//!
//! `FunctionalityMappingBuilder` enumerates the sub-pools of a resource
//! pool, capped by the saturation bound, and asks the support oracle which
//! functionalities each sub-pool supports.
//!
//! Combinations are drawn in batches. Within a batch every
//! `(combination, functionality)` pair that the `SupportCache` cannot answer
//! is checked, in parallel on a `rayon` pool unless the builder is
//! sequential. Between batches the caller's monitor and the configured
//! limits are consulted; a termination request fails the whole build with
//! `MappingError::Incomplete`, so a partial mapping is never returned.
//!
//! ```rust
//! use muster_mapping::builder::FunctionalityMappingBuilder;
//! use muster_model::{loading::TaxonomyLoader, pool::ModelPool, resource::ResourceModel};
//!
//! let taxonomy = TaxonomyLoader::new()
//!     .from_str("functionality F\nrestriction F A 1 1\n")
//!     .unwrap();
//! let pool = ModelPool::from_iter([("A".into(), 2), ("B".into(), 1)]);
//! let f = ResourceModel::new("F");
//!
//! let mapping = FunctionalityMappingBuilder::new()
//!     .threads(1)
//!     .build(&taxonomy, &pool, &[f.clone()])
//!     .unwrap();
//! assert!(mapping.get_model_pools(&f).unwrap().contains(&ModelPool::from_iter([("A".into(), 1)])));
//! ```

use crate::{
    cache::SupportCache,
    error::MappingError,
    mapping::FunctionalityMapping,
    oracle::SupportOracle,
    saturation,
    stats::MappingStatistics,
};
use muster_model::{
    combination::ModelPoolCombinations,
    pool::ModelPool,
    resource::Functionality,
    taxonomy::Taxonomy,
};
use muster_search::monitor::{
    composite::CompositeMonitor,
    interrupt::InterruptMonitor,
    no_op::NoOpMonitor,
    search_monitor::{SearchCommand, SearchMonitor},
    time_limit::TimeLimitMonitor,
};
use rayon::prelude::*;
use std::{
    sync::atomic::AtomicBool,
    time::{Duration, Instant},
};
use tracing::{debug, info};

/// Where support checks run.
enum Workers {
    Sequential,
    Global,
    Pool(rayon::ThreadPool),
}

impl Workers {
    fn num_threads(&self) -> usize {
        match self {
            Workers::Sequential => 1,
            Workers::Global => rayon::current_num_threads(),
            Workers::Pool(pool) => pool.current_num_threads(),
        }
    }

    /// Runs every job and returns the verdicts in job order.
    fn check_all<T>(
        &self,
        oracle: &SupportOracle<'_, T>,
        batch: &[ModelPool],
        jobs: &[(usize, &Functionality)],
    ) -> Vec<Result<bool, MappingError>>
    where
        T: Taxonomy + ?Sized,
    {
        let check = |&(index, functionality): &(usize, &Functionality)| {
            oracle.check(&batch[index], functionality)
        };
        match self {
            Workers::Sequential => jobs.iter().map(check).collect(),
            Workers::Global => jobs.par_iter().map(check).collect(),
            Workers::Pool(pool) => pool.install(|| jobs.par_iter().map(check).collect()),
        }
    }
}

/// Configures and runs the construction of a `FunctionalityMapping`.
#[derive(Debug, Clone)]
pub struct FunctionalityMappingBuilder<'a> {
    step: u32,
    threads: usize,
    batch_size: usize,
    time_limit: Option<Duration>,
    interrupt: Option<&'a AtomicBool>,
    saturation_bound: Option<ModelPool>,
}

impl Default for FunctionalityMappingBuilder<'_> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FunctionalityMappingBuilder<'a> {
    const DEFAULT_BATCH_SIZE: usize = 256;

    #[inline]
    pub fn new() -> Self {
        Self {
            step: 1,
            threads: 0,
            batch_size: Self::DEFAULT_BATCH_SIZE,
            time_limit: None,
            interrupt: None,
            saturation_bound: None,
        }
    }

    /// Sets the enumeration step. Zero is treated as one.
    #[inline]
    pub fn step(mut self, step: u32) -> Self {
        self.step = step.max(1);
        self
    }

    /// Sets the number of worker threads.
    ///
    /// `0` uses the global `rayon` pool, `1` checks sequentially on the
    /// calling thread, anything else builds a dedicated pool of that size.
    #[inline]
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Sets how many combinations are drawn between two monitor checks.
    #[inline]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    #[inline]
    pub fn time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Stops construction once `flag` is raised.
    #[inline]
    pub fn interrupt(mut self, flag: &'a AtomicBool) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Uses `bound` instead of computing the saturation bound.
    ///
    /// The bound is clipped to the pool; naming a model the pool does not
    /// hold fails the build with `MappingError::UnknownModel`.
    #[inline]
    pub fn saturation_bound(mut self, bound: ModelPool) -> Self {
        self.saturation_bound = Some(bound);
        self
    }

    /// Builds the mapping of `pool` for `functionalities`.
    pub fn build<T>(
        &self,
        taxonomy: &T,
        pool: &ModelPool,
        functionalities: &[Functionality],
    ) -> Result<FunctionalityMapping, MappingError>
    where
        T: Taxonomy + ?Sized,
    {
        let mut monitor = NoOpMonitor::new();
        let mut cache = SupportCache::new();
        self.build_with_monitor(taxonomy, pool, functionalities, &mut monitor, &mut cache)
            .map(|(mapping, _)| mapping)
    }

    /// Builds the mapping while reporting to `monitor` and memoizing
    /// decisions in `cache`.
    ///
    /// `cache` must only hold decisions made against `taxonomy`.
    pub fn build_with_monitor<T>(
        &self,
        taxonomy: &T,
        pool: &ModelPool,
        functionalities: &[Functionality],
        monitor: &mut dyn SearchMonitor,
        cache: &mut SupportCache,
    ) -> Result<(FunctionalityMapping, MappingStatistics), MappingError>
    where
        T: Taxonomy + ?Sized,
    {
        let start_time = Instant::now();
        let workers = self.workers()?;

        let mut oracle = SupportOracle::new(taxonomy, functionalities)?;
        let mut limits = CompositeMonitor::with_capacity(2);
        if let Some(limit) = self.time_limit {
            oracle = oracle.with_deadline(start_time, limit);
            limits.add_monitor(TimeLimitMonitor::starting_at(start_time, limit));
        }
        if let Some(flag) = self.interrupt {
            oracle = oracle.with_interrupt(flag);
            limits.add_monitor(InterruptMonitor::new(flag));
        }

        let pool = pool.compacted();
        let saturation_bound = self.resolve_saturation_bound(&oracle, &pool)?;
        let functionalities: Vec<Functionality> =
            oracle.requirements().map(|(f, _)| f.clone()).collect();
        let mut mapping = FunctionalityMapping::new(
            pool.clone(),
            functionalities.iter().cloned(),
            saturation_bound.clone(),
        );
        let mut stats = MappingStatistics {
            threads_used: workers.num_threads(),
            ..MappingStatistics::default()
        };

        let combinations = ModelPoolCombinations::with_step(&saturation_bound, self.step);
        info!(
            pool = %pool,
            saturation_bound = %saturation_bound,
            functionalities = functionalities.len(),
            combinations = ?combinations.total(),
            threads = stats.threads_used,
            "building functionality mapping"
        );

        monitor.on_enter_search();
        limits.on_enter_search();
        let run = self.enumerate(
            &oracle,
            &workers,
            combinations,
            &functionalities,
            &mut mapping,
            &mut stats,
            monitor,
            &mut limits,
            cache,
        );
        limits.on_exit_search();
        monitor.on_exit_search();
        stats.set_total_time(start_time.elapsed());

        match run {
            Ok(()) => {
                info!(
                    combinations = stats.combinations_enumerated,
                    checks = stats.support_checks,
                    cache_hits = stats.cache_hits,
                    supports = stats.supports_found,
                    elapsed = ?stats.time_total,
                    "functionality mapping complete"
                );
                Ok((mapping, stats))
            }
            Err(e) => {
                info!(error = %e, elapsed = ?stats.time_total, "functionality mapping aborted");
                Err(e)
            }
        }
    }

    fn workers(&self) -> Result<Workers, MappingError> {
        match self.threads {
            0 => Ok(Workers::Global),
            1 => Ok(Workers::Sequential),
            n => rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map(Workers::Pool)
                .map_err(|e| MappingError::ThreadPool(e.to_string())),
        }
    }

    fn resolve_saturation_bound<T>(
        &self,
        oracle: &SupportOracle<'_, T>,
        pool: &ModelPool,
    ) -> Result<ModelPool, MappingError>
    where
        T: Taxonomy + ?Sized,
    {
        match &self.saturation_bound {
            Some(bound) => {
                let bound = bound.compacted();
                if let Some(model) = bound.models().find(|model| !pool.contains(model)) {
                    return Err(MappingError::UnknownModel(model.clone()));
                }
                Ok(pool.bounded_by(&bound))
            }
            None => Ok(saturation::saturation_bound(
                oracle.taxonomy(),
                oracle.requirements().map(|(_, required)| required),
                pool,
            )),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn enumerate<T>(
        &self,
        oracle: &SupportOracle<'_, T>,
        workers: &Workers,
        mut combinations: ModelPoolCombinations,
        functionalities: &[Functionality],
        mapping: &mut FunctionalityMapping,
        stats: &mut MappingStatistics,
        monitor: &mut dyn SearchMonitor,
        limits: &mut CompositeMonitor<'_>,
        cache: &mut SupportCache,
    ) -> Result<(), MappingError>
    where
        T: Taxonomy + ?Sized,
    {
        loop {
            let batch: Vec<ModelPool> = combinations.by_ref().take(self.batch_size).collect();
            if batch.is_empty() {
                return Ok(());
            }
            for _ in &batch {
                monitor.on_step();
                limits.on_step();
            }
            stats.on_combinations(batch.len() as u64);

            let mut jobs = Vec::with_capacity(batch.len() * functionalities.len());
            let mut supported = Vec::new();
            for (index, combination) in batch.iter().enumerate() {
                for functionality in functionalities {
                    match cache.lookup(combination, functionality) {
                        Some(verdict) => {
                            stats.on_cache_hit();
                            if verdict {
                                supported.push((index, functionality));
                            }
                        }
                        None => jobs.push((index, functionality)),
                    }
                }
            }

            stats.on_support_checks(jobs.len() as u64);
            let verdicts = workers.check_all(oracle, &batch, &jobs);
            for (&(index, functionality), verdict) in jobs.iter().zip(verdicts) {
                let verdict = verdict?;
                cache.insert(batch[index].clone(), functionality.clone(), verdict);
                if verdict {
                    supported.push((index, functionality));
                }
            }

            for (index, functionality) in supported {
                mapping.add(functionality.clone(), batch[index].clone())?;
                stats.on_support_found();
                monitor.on_support_found(functionality, &batch[index]);
            }

            debug!(
                batch = batch.len(),
                checks = jobs.len(),
                combinations = stats.combinations_enumerated,
                supports = stats.supports_found,
                "batch done"
            );

            if let SearchCommand::Terminate(reason) = monitor.search_command() {
                return Err(MappingError::Incomplete(reason));
            }
            if let SearchCommand::Terminate(reason) = limits.search_command() {
                return Err(MappingError::Incomplete(reason));
            }
        }
    }
}
