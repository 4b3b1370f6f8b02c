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

//! Bounds propagation over row and column sums.
//!
//! Two rules are applied until nothing changes:
//!
//! * **Row cover**: if `Σ hi < min` the row is infeasible; otherwise every
//!   cell's lower bound rises to `min - (Σ hi - hi)`.
//! * **Column capacity**: if `Σ lo > max` the column is infeasible; otherwise
//!   every cell's upper bound drops to `max - (Σ lo - lo)`.
//!
//! Both rules only narrow domains, so the fixpoint is reached in finitely
//! many rounds. The round count is still capped; a state that is not at its
//! fixpoint is checked exactly before it is accepted as a solution.

use crate::{
    index::{ColumnIndex, RowIndex},
    problem::MatchProblem,
    state::SearchState,
    trail::SearchTrail,
};

/// The most propagation rounds run per node.
pub const MAX_PROPAGATION_ROUNDS: usize = 64;

/// Why propagation proved a node infeasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conflict {
    /// The row cannot reach its minimum with the remaining upper bounds.
    RowDeficit(RowIndex),
    /// The column's lower bounds already exceed its maximum.
    ColumnExcess(ColumnIndex),
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Conflict::RowDeficit(row) => write!(f, "row deficit at {}", row),
            Conflict::ColumnExcess(col) => write!(f, "column excess at {}", col),
        }
    }
}

/// Propagates both rules and returns the number of narrowed domains.
pub fn propagate(
    problem: &MatchProblem,
    state: &mut SearchState,
    trail: &mut SearchTrail,
) -> Result<u64, Conflict> {
    let mut narrowings = 0u64;
    for _ in 0..MAX_PROPAGATION_ROUNDS {
        let changed = propagate_rows(problem, state, trail)? + propagate_cols(problem, state, trail)?;
        narrowings += changed;
        if changed == 0 {
            break;
        }
    }
    Ok(narrowings)
}

fn propagate_rows(
    problem: &MatchProblem,
    state: &mut SearchState,
    trail: &mut SearchTrail,
) -> Result<u64, Conflict> {
    let mut changed = 0;
    for row in RowIndex::range(problem.num_rows()) {
        let min = problem.row_min(row) as u64;
        let hi_sum = state.row_hi_sum(row);
        if hi_sum < min {
            return Err(Conflict::RowDeficit(row));
        }
        if min == 0 || state.row_lo_sum(row) >= min {
            continue;
        }
        for cell in problem.allowed_in_row(row) {
            let domain = state.domain(cell);
            let others = hi_sum - domain.hi() as u64;
            if min <= others {
                continue;
            }
            // `hi_sum >= min` keeps `need` within the domain.
            let need = (min - others) as u32;
            if need > domain.lo() {
                if let Some(narrowed) = domain.at_least(need) {
                    trail.set_domain(state, cell, narrowed);
                    changed += 1;
                }
            }
        }
    }
    Ok(changed)
}

fn propagate_cols(
    problem: &MatchProblem,
    state: &mut SearchState,
    trail: &mut SearchTrail,
) -> Result<u64, Conflict> {
    let mut changed = 0;
    for col in ColumnIndex::range(problem.num_cols()) {
        let max = problem.col_max(col) as u64;
        let lo_sum = state.col_lo_sum(col);
        if lo_sum > max {
            return Err(Conflict::ColumnExcess(col));
        }
        for cell in problem.allowed_in_col(col) {
            let domain = state.domain(cell);
            let others = lo_sum - domain.lo() as u64;
            // `lo_sum <= max` keeps the cap at or above `lo`.
            let cap = max - others;
            if (domain.hi() as u64) > cap {
                if let Some(narrowed) = domain.at_most(cap as u32) {
                    trail.set_domain(state, cell, narrowed);
                    changed += 1;
                }
            }
        }
    }
    Ok(changed)
}
