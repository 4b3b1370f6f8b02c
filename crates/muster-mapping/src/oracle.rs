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

//! Support decisions for single `(pool, functionality)` pairs.
//!
//! The oracle resolves each functionality's requirement once, then answers
//! support questions by matching the requirement against the availability
//! of a pool. Every check runs under its own monitor stack built from the
//! shared deadline and interrupt flag, so an oracle can be queried from
//! several worker threads at once.

use crate::{
    error::MappingError,
    requirements::{available_bounds, required_bounds},
};
use muster_match::{
    monitor::wrapper::WrapperMonitor, resource_match::ResourceMatch, result::MatchResult,
};
use muster_model::{bound::ModelBound, pool::ModelPool, resource::Functionality, taxonomy::Taxonomy};
use muster_search::monitor::{
    composite::CompositeMonitor, interrupt::InterruptMonitor, time_limit::TimeLimitMonitor,
};
use std::{
    collections::BTreeMap,
    sync::atomic::AtomicBool,
    time::{Duration, Instant},
};

pub struct SupportOracle<'t, T: ?Sized> {
    matcher: ResourceMatch<'t, T>,
    requirements: BTreeMap<Functionality, Vec<ModelBound>>,
    deadline: Option<(Instant, Duration)>,
    interrupt: Option<&'t AtomicBool>,
}

impl<T: ?Sized> std::fmt::Debug for SupportOracle<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupportOracle")
            .field("requirements", &self.requirements)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl<'t, T> SupportOracle<'t, T>
where
    T: Taxonomy + ?Sized,
{
    /// Resolves the requirement of every functionality in `functionalities`.
    pub fn new<'f, I>(taxonomy: &'t T, functionalities: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = &'f Functionality>,
    {
        let requirements = functionalities
            .into_iter()
            .map(|f| Ok((f.clone(), required_bounds(taxonomy, f)?)))
            .collect::<Result<BTreeMap<_, _>, MappingError>>()?;
        Ok(Self {
            matcher: ResourceMatch::new(taxonomy),
            requirements,
            deadline: None,
            interrupt: None,
        })
    }

    /// Aborts checks once `limit` has passed since `start`.
    #[inline]
    pub fn with_deadline(mut self, start: Instant, limit: Duration) -> Self {
        self.deadline = Some((start, limit));
        self
    }

    /// Aborts checks once `flag` is raised.
    #[inline]
    pub fn with_interrupt(mut self, flag: &'t AtomicBool) -> Self {
        self.interrupt = Some(flag);
        self
    }

    #[inline]
    pub fn taxonomy(&self) -> &'t T {
        self.matcher.taxonomy()
    }

    #[inline]
    pub fn requirement(&self, functionality: &Functionality) -> Option<&[ModelBound]> {
        self.requirements.get(functionality).map(Vec::as_slice)
    }

    /// Iterates over the functionalities and their requirements, sorted.
    #[inline]
    pub fn requirements(&self) -> impl Iterator<Item = (&Functionality, &[ModelBound])> {
        self.requirements.iter().map(|(f, r)| (f, r.as_slice()))
    }

    /// Decides whether `pool` supports `functionality`.
    ///
    /// # Errors
    ///
    /// * `UnknownFunctionality` if the oracle was not built for `functionality`.
    /// * `Incomplete` if the deadline passed or the interrupt flag was raised
    ///   before the search reached a verdict.
    pub fn check(&self, pool: &ModelPool, functionality: &Functionality) -> Result<bool, MappingError> {
        let required = self
            .requirement(functionality)
            .ok_or_else(|| MappingError::UnknownFunctionality(functionality.clone()))?;
        let available = available_bounds(self.taxonomy(), pool);

        let mut limits = CompositeMonitor::with_capacity(2);
        if let Some((start, limit)) = self.deadline {
            limits.add_monitor(TimeLimitMonitor::starting_at(start, limit));
        }
        if let Some(flag) = self.interrupt {
            limits.add_monitor(InterruptMonitor::new(flag));
        }

        let outcome = self
            .matcher
            .search(required, &available, WrapperMonitor::new(&mut limits));
        match outcome.result() {
            MatchResult::Feasible(_) => Ok(true),
            MatchResult::Infeasible => Ok(false),
            MatchResult::Unknown => Err(MappingError::Incomplete(
                outcome.termination_reason().to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muster_model::{
        resource::{CardinalityRestriction, ResourceModel},
        taxonomy::TaxonomyBuilder,
    };
    use std::sync::atomic::Ordering;

    fn m(id: &str) -> ResourceModel {
        ResourceModel::new(id)
    }

    fn camera_taxonomy() -> muster_model::taxonomy::InMemoryTaxonomy {
        let mut b = TaxonomyBuilder::new();
        b.add_subtype(m("StereoCamera"), m("Camera"))
            .add_functionality(m("Vision"))
            .add_restriction(m("Vision"), CardinalityRestriction::new(m("Camera"), 2, Some(2)));
        b.build()
    }

    #[test]
    fn test_check_answers_support() {
        let t = camera_taxonomy();
        let oracle = SupportOracle::new(&t, [&m("Vision")]).unwrap();
        let enough = ModelPool::from_iter([(m("StereoCamera"), 2)]);
        let short = ModelPool::from_iter([(m("StereoCamera"), 1)]);
        assert_eq!(oracle.check(&enough, &m("Vision")), Ok(true));
        assert_eq!(oracle.check(&short, &m("Vision")), Ok(false));
    }

    #[test]
    fn test_unknown_functionality() {
        let t = camera_taxonomy();
        let oracle = SupportOracle::new(&t, [&m("Vision")]).unwrap();
        let pool = ModelPool::from_iter([(m("Camera"), 2)]);
        assert_eq!(
            oracle.check(&pool, &m("Flight")),
            Err(MappingError::UnknownFunctionality(m("Flight")))
        );
    }

    #[test]
    fn test_raised_interrupt_makes_check_incomplete() {
        let t = camera_taxonomy();
        let flag = AtomicBool::new(false);
        let oracle = SupportOracle::new(&t, [&m("Vision")])
            .unwrap()
            .with_interrupt(&flag);
        flag.store(true, Ordering::Relaxed);
        // two candidate columns, so the root needs a decision
        let pool = ModelPool::from_iter([(m("Camera"), 2), (m("StereoCamera"), 2)]);
        assert!(matches!(
            oracle.check(&pool, &m("Vision")),
            Err(MappingError::Incomplete(_))
        ));
    }

    #[test]
    fn test_contradictory_restrictions_fail_construction() {
        let mut b = TaxonomyBuilder::new();
        b.add_functionality(m("F"))
            .add_restriction(m("F"), CardinalityRestriction::new(m("A"), 3, None))
            .add_restriction(m("F"), CardinalityRestriction::new(m("A"), 0, Some(1)));
        let t = b.build();
        assert!(matches!(
            SupportOracle::new(&t, [&m("F")]),
            Err(MappingError::Bound(_))
        ));
    }
}
