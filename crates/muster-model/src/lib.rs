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

//! # Muster Model
//!
//! **The domain model of the muster resource-matching engine.**
//!
//! This crate defines what is being matched: resource models and the pools
//! that count them, the cardinality bounds functionalities place on models,
//! and the taxonomy that says which models may stand in for which.
//!
//! ## Architecture
//!
//! * **`resource`**: `ResourceModel` identifiers, concrete `ResourceInstance`s and
//!   the `CardinalityRestriction`s a taxonomy declares.
//! * **`pool`**: `ModelPool` (unsigned multiset) and `ModelPoolDelta` (signed difference).
//! * **`algebra`**: Sum, subtraction, pointwise join and meet, and merging of pools.
//! * **`bound`**: `ModelBound`, a `[min, max]` cardinality interval for one model.
//! * **`taxonomy`**: The narrow `Taxonomy` interface plus an in-memory implementation
//!   built through `TaxonomyBuilder`.
//! * **`loading`**: A line-oriented text loader producing an `InMemoryTaxonomy`.
//! * **`combination`**: Lazy, restartable enumeration of the sub-pools of a pool.
//!
//! ## Design Philosophy
//!
//! 1.  **Value Semantics**: Pools and bounds are plain values with a total order, so they
//!     can be stored in ordered sets and compared structurally.
//! 2.  **Read-Only Taxonomy**: Once built, a taxonomy is immutable and `Sync`; the
//!     subsumption closure is computed up front.
//! 3.  **Fail-Fast**: Bound arithmetic reports errors immediately instead of clamping
//!     silently.

pub mod algebra;
pub mod bound;
pub mod combination;
pub mod loading;
pub mod pool;
pub mod resource;
pub mod taxonomy;
