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

use muster_core::num::saturating::SaturatingAddVal;
use std::time::Duration;

/// Counters collected while building a `FunctionalityMapping`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingStatistics {
    /// Combinations drawn from the enumerator.
    pub combinations_enumerated: u64,
    /// `(combination, functionality)` pairs decided by the matcher.
    pub support_checks: u64,
    /// Pairs answered by the support cache.
    pub cache_hits: u64,
    /// Pairs found to be supporting.
    pub supports_found: u64,
    /// Worker threads used; `1` for sequential construction.
    pub threads_used: usize,
    pub time_total: Duration,
}

impl MappingStatistics {
    #[inline]
    pub fn on_combinations(&mut self, count: u64) {
        self.combinations_enumerated = self.combinations_enumerated.saturating_add_val(count);
    }

    #[inline]
    pub fn on_support_checks(&mut self, count: u64) {
        self.support_checks = self.support_checks.saturating_add_val(count);
    }

    #[inline]
    pub fn on_cache_hit(&mut self) {
        self.cache_hits = self.cache_hits.saturating_add_val(1);
    }

    #[inline]
    pub fn on_support_found(&mut self) {
        self.supports_found = self.supports_found.saturating_add_val(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for MappingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Functionality Mapping Statistics:")?;
        writeln!(f, "  Combinations:         {}", self.combinations_enumerated)?;
        writeln!(f, "  Support checks:       {}", self.support_checks)?;
        writeln!(f, "  Cache hits:           {}", self.cache_hits)?;
        writeln!(f, "  Supports found:       {}", self.supports_found)?;
        writeln!(f, "  Threads used:         {}", self.threads_used)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}
