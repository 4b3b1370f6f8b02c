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

use muster_model::{
    bound::BoundError,
    resource::{Functionality, ResourceModel},
};

/// Errors raised while building or querying a `FunctionalityMapping`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// The functionality is not part of the mapping.
    UnknownFunctionality(Functionality),
    /// A supplied saturation bound names a model that the pool does not hold.
    UnknownModel(ResourceModel),
    /// A cardinality restriction could not be turned into a valid bound.
    Bound(BoundError),
    /// Construction was stopped by a time limit, an interrupt or a monitor.
    Incomplete(String),
    /// The worker pool could not be created.
    ThreadPool(String),
}

impl std::fmt::Display for MappingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingError::UnknownFunctionality(id) => write!(f, "unknown functionality: {}", id),
            MappingError::UnknownModel(id) => write!(f, "unknown resource model: {}", id),
            MappingError::Bound(e) => write!(f, "invalid cardinality bound: {}", e),
            MappingError::Incomplete(reason) => {
                write!(f, "mapping construction incomplete: {}", reason)
            }
            MappingError::ThreadPool(reason) => {
                write!(f, "failed to create worker pool: {}", reason)
            }
        }
    }
}

impl std::error::Error for MappingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MappingError::Bound(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BoundError> for MappingError {
    fn from(e: BoundError) -> Self {
        MappingError::Bound(e)
    }
}
