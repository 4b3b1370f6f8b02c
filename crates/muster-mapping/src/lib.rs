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

//! # Muster Mapping
//!
//! **Which sub-pools of a resource pool support which functionalities.**
//!
//! Given a taxonomy, a pool of resource models and a list of
//! functionalities, this crate enumerates every sub-pool below the
//! saturation bound and records, in both directions, the sub-pools that
//! can satisfy each functionality's cardinality requirement.
//!
//! ## Architecture
//!
//! * **`requirements`**: Requirement and availability bounds from the taxonomy.
//! * **`saturation`**: Per-model counts beyond which extra units never matter.
//! * **`oracle`**: Single support decisions through `muster_match`.
//! * **`cache`**: Memoized decisions owned by the caller.
//! * **`builder`**: Batched, optionally parallel construction.
//! * **`mapping`**: The resulting `FunctionalityMapping`.
//! * **`io`**: The text file format.

pub mod builder;
pub mod cache;
pub mod error;
pub mod io;
pub mod mapping;
pub mod oracle;
pub mod requirements;
pub mod saturation;
pub mod stats;
