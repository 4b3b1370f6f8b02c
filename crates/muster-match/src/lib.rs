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

//! # Muster Match
//!
//! **A first-solution constraint search that assigns available resources to
//! cardinality requirements.**
//!
//! The search works on a matrix of integer variables `x[row][col]`: one row per
//! required `ModelBound`, one column per available bound (or per concrete
//! instance). A cell may only be non-zero when the column's model is the
//! row's model or one of its subtypes. Every row must be covered at least to
//! its minimum and no column may be committed beyond its maximum.
//!
//! ## Architecture
//!
//! * **`problem`**: The immutable `MatchProblem` (row minima, column maxima, allowed cells).
//! * **`state`**, **`trail`**, **`stack`**: The mutable search state, its undo log, and the
//!   frame-structured decision stack.
//! * **`propagation`**: Bounds propagation over row and column sums.
//! * **`branching`**: `DecisionBuilder`s that split a cell domain at its midpoint.
//! * **`engine`**: `MatchSolver`, the depth-first search loop.
//! * **`monitor`**: `TreeSearchMonitor`s for logging, composition and external limits.
//! * **`resource_match`**, **`instance_match`**: The public entry points working on
//!   model bounds and concrete instances.
//!
//! ## Example
//!
//! ```rust
//! use muster_match::resource_match::ResourceMatch;
//! use muster_model::{bound::ModelBound, resource::ResourceModel, taxonomy::TaxonomyBuilder};
//!
//! let camera = ResourceModel::new("Camera");
//! let stereo = ResourceModel::new("StereoCamera");
//! let mut builder = TaxonomyBuilder::new();
//! builder.add_subtype(stereo.clone(), camera.clone());
//! let taxonomy = builder.build();
//!
//! let required = [ModelBound::new(camera, 2, 2).unwrap()];
//! let available = [ModelBound::new(stereo, 0, 3).unwrap()];
//! assert!(ResourceMatch::new(&taxonomy).is_supporting(&required, &available));
//! ```

pub mod branching;
pub mod engine;
pub mod error;
pub mod index;
pub mod instance_match;
pub mod monitor;
pub mod problem;
pub mod propagation;
pub mod resource_match;
pub mod result;
pub mod solution;
pub mod stack;
pub mod state;
pub mod stats;
pub mod trail;
