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

//! Identifiers for resource models and functionalities.
//!
//! A `ResourceModel` is an opaque, totally ordered name (usually an IRI such
//! as `http://www.rock-robotics.org/2014/01/om-schema#Sherpa`). Cloning is a
//! reference-count increment. Functionalities are named with the same type,
//! since the taxonomy answers restriction queries for both.

use std::{fmt, sync::Arc};

/// An opaque, immutable identifier of a resource model.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceModel(Arc<str>);

/// Functionalities share the identifier space of resource models.
pub type Functionality = ResourceModel;

impl ResourceModel {
    /// Creates a new identifier.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use muster_model::resource::ResourceModel;
    ///
    /// let m = ResourceModel::new("Camera");
    /// assert_eq!(m.as_str(), "Camera");
    /// ```
    #[inline]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Returns the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the identifier contains whitespace and can therefore
    /// not be written to a whitespace-delimited text format.
    #[inline]
    pub fn contains_whitespace(&self) -> bool {
        self.0.chars().any(char::is_whitespace)
    }
}

impl fmt::Debug for ResourceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceModel({})", self.0)
    }
}

impl fmt::Display for ResourceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceModel {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ResourceModel {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl AsRef<str> for ResourceModel {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// One concrete unit of a resource model.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceInstance {
    model: ResourceModel,
    id: u32,
}

impl ResourceInstance {
    #[inline]
    pub fn new(model: ResourceModel, id: u32) -> Self {
        Self { model, id }
    }

    #[inline]
    pub fn model(&self) -> &ResourceModel {
        &self.model
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl fmt::Display for ResourceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.model, self.id)
    }
}

/// A declared cardinality restriction: the owner (a model or a functionality)
/// requires or offers between `min` and `max` units of `model`.
///
/// A `max` of `None` means unbounded.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CardinalityRestriction {
    pub model: ResourceModel,
    pub min: u32,
    pub max: Option<u32>,
}

impl CardinalityRestriction {
    #[inline]
    pub fn new(model: ResourceModel, min: u32, max: Option<u32>) -> Self {
        Self { model, min, max }
    }
}

impl fmt::Display for CardinalityRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{} [{}, {}]", self.model, self.min, max),
            None => write!(f, "{} [{}, *]", self.model, self.min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_are_ordered_by_name() {
        let a = ResourceModel::new("A");
        let b = ResourceModel::from("B");
        assert!(a < b);
        assert_eq!(a, ResourceModel::from(String::from("A")));
    }

    #[test]
    fn test_display_and_debug() {
        let m = ResourceModel::new("Sherpa");
        assert_eq!(m.to_string(), "Sherpa");
        assert_eq!(format!("{:?}", m), "ResourceModel(Sherpa)");
        assert_eq!(ResourceInstance::new(m, 3).to_string(), "Sherpa#3");
    }

    #[test]
    fn test_whitespace_detection() {
        assert!(ResourceModel::new("Stereo Camera").contains_whitespace());
        assert!(!ResourceModel::new("StereoCamera").contains_whitespace());
    }

    #[test]
    fn test_restriction_display() {
        let r = CardinalityRestriction::new(ResourceModel::new("Camera"), 1, None);
        assert_eq!(r.to_string(), "Camera [1, *]");
        let r = CardinalityRestriction::new(ResourceModel::new("Camera"), 1, Some(2));
        assert_eq!(r.to_string(), "Camera [1, 2]");
    }
}
