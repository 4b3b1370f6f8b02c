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

//! Cardinality bounds.
//!
//! A `ModelBound` is the interval `[min, max]` of units of one resource model
//! that a requirement asks for or a resource offers. `max` is clamped to
//! `ModelBound::MAX_THRESHOLD` so that solver domains stay finite.

use crate::{
    pool::ModelPool,
    resource::{CardinalityRestriction, ResourceModel},
};
use muster_core::num::saturating::SaturatingAddVal;
use std::{collections::BTreeMap, fmt};

/// The error type for bound construction and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundError {
    /// Two bounds of different models were combined.
    ModelMismatch {
        expected: ResourceModel,
        found: ResourceModel,
    },
    /// A bound list has no entry for the model.
    ModelNotFound(ResourceModel),
    /// Subtracting would consume more than `available` units of `model`.
    InsufficientBound {
        model: ResourceModel,
        available: u32,
        requested: u32,
    },
    /// Decrementing a `[0, 0]` bound.
    Underflow(ResourceModel),
    /// `min > max` after clamping.
    InvalidBound {
        model: ResourceModel,
        min: u32,
        max: u32,
    },
}

impl fmt::Display for BoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelMismatch { expected, found } => write!(
                f,
                "Model mismatch: expected bound for {}, found {}",
                expected, found
            ),
            Self::ModelNotFound(model) => write!(f, "No bound for model {}", model),
            Self::InsufficientBound {
                model,
                available,
                requested,
            } => write!(
                f,
                "Insufficient bound for {}: at most {} available, {} requested",
                model, available, requested
            ),
            Self::Underflow(model) => {
                write!(f, "Cannot decrement bound of {}: already [0, 0]", model)
            }
            Self::InvalidBound { model, min, max } => write!(
                f,
                "Invalid bound for {}: min {} exceeds max {}",
                model, min, max
            ),
        }
    }
}

impl std::error::Error for BoundError {}

/// A cardinality interval `[min, max]` for one resource model.
///
/// # Invariants
/// `min <= max <= MAX_THRESHOLD`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ModelBound {
    model: ResourceModel,
    min: u32,
    max: u32,
}

impl ModelBound {
    /// The ceiling for every `max`; unbounded restrictions map to it.
    pub const MAX_THRESHOLD: u32 = 2_147_483_646;

    /// Creates a new bound, clamping `max` to `MAX_THRESHOLD`.
    ///
    /// # Errors
    ///
    /// Returns `BoundError::InvalidBound` if `min` exceeds the clamped `max`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use muster_model::{bound::ModelBound, resource::ResourceModel};
    ///
    /// let b = ModelBound::new(ResourceModel::new("A"), 1, u32::MAX).unwrap();
    /// assert_eq!(b.max(), ModelBound::MAX_THRESHOLD);
    /// assert!(ModelBound::new(ResourceModel::new("A"), 3, 2).is_err());
    /// ```
    pub fn new(model: ResourceModel, min: u32, max: u32) -> Result<Self, BoundError> {
        let max = max.min(Self::MAX_THRESHOLD);
        if min > max {
            return Err(BoundError::InvalidBound { model, min, max });
        }
        Ok(Self { model, min, max })
    }

    /// Creates `[0, MAX_THRESHOLD]`.
    #[inline]
    pub fn unbounded(model: ResourceModel) -> Self {
        Self {
            model,
            min: 0,
            max: Self::MAX_THRESHOLD,
        }
    }

    /// Creates a bound from a taxonomy restriction; an absent `max` becomes
    /// `MAX_THRESHOLD`.
    pub fn from_restriction(restriction: &CardinalityRestriction) -> Result<Self, BoundError> {
        Self::new(
            restriction.model.clone(),
            restriction.min,
            restriction.max.unwrap_or(Self::MAX_THRESHOLD),
        )
    }

    #[inline]
    pub fn model(&self) -> &ResourceModel {
        &self.model
    }

    #[inline]
    pub fn min(&self) -> u32 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Consumes `other.min` units from this bound.
    ///
    /// The result is `[max(0, min - other.min), max(0, max - other.min)]`.
    ///
    /// # Errors
    ///
    /// * `BoundError::ModelMismatch` if the models differ.
    /// * `BoundError::InsufficientBound` if `self.max < other.min`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use muster_model::{bound::ModelBound, resource::ResourceModel};
    ///
    /// let m = ResourceModel::new("M");
    /// let a = ModelBound::new(m.clone(), 5, 10).unwrap();
    /// let b = ModelBound::new(m.clone(), 3, 3).unwrap();
    /// assert_eq!(a.substract_min(&b).unwrap(), ModelBound::new(m, 2, 7).unwrap());
    /// ```
    pub fn substract_min(&self, other: &ModelBound) -> Result<ModelBound, BoundError> {
        if self.model != other.model {
            return Err(BoundError::ModelMismatch {
                expected: self.model.clone(),
                found: other.model.clone(),
            });
        }
        if self.max < other.min {
            return Err(BoundError::InsufficientBound {
                model: self.model.clone(),
                available: self.max,
                requested: other.min,
            });
        }
        Ok(ModelBound {
            model: self.model.clone(),
            min: self.min.saturating_sub(other.min),
            max: self.max - other.min,
        })
    }

    /// Subtracts every bound of `b` from the same-model bound of `a`.
    ///
    /// Entries of `a` that `b` does not reference are passed through. With
    /// `remove_negative`, an entry whose subtraction fails is dropped instead
    /// of failing the whole operation.
    ///
    /// # Errors
    ///
    /// * `BoundError::ModelNotFound` if `b` references a model absent from `a`.
    /// * Any error of `substract_min` unless `remove_negative` is set.
    pub fn substract_min_lists(
        a: &[ModelBound],
        b: &[ModelBound],
        remove_negative: bool,
    ) -> Result<Vec<ModelBound>, BoundError> {
        if let Some(missing) = b.iter().find(|sb| !a.iter().any(|sa| sa.model == sb.model)) {
            return Err(BoundError::ModelNotFound(missing.model.clone()));
        }

        let mut result = Vec::with_capacity(a.len());
        'entries: for bound in a {
            let mut current = bound.clone();
            for consumed in b.iter().filter(|sb| sb.model == bound.model) {
                match current.substract_min(consumed) {
                    Ok(next) => current = next,
                    Err(_) if remove_negative => continue 'entries,
                    Err(e) => return Err(e),
                }
            }
            result.push(current);
        }
        Ok(result)
    }

    /// Decrements `max` and, when non-zero, `min`.
    ///
    /// # Errors
    ///
    /// Returns `BoundError::Underflow` if the bound is already `[0, 0]`.
    pub fn decrement(&mut self) -> Result<(), BoundError> {
        if self.min == 0 && self.max == 0 {
            return Err(BoundError::Underflow(self.model.clone()));
        }
        self.max -= 1;
        if self.min > 0 {
            self.min -= 1;
        }
        Ok(())
    }

    /// Returns `true` if `value` lies within `[min, max]`.
    #[inline]
    pub fn admits(&self, value: u32) -> bool {
        self.min <= value && value <= self.max
    }

    /// Collects the `max` of every bound into a pool; repeated models accumulate.
    pub fn upper_bounds(bounds: &[ModelBound]) -> ModelPool {
        bounds.iter().map(|b| (b.model.clone(), b.max)).collect()
    }

    /// Collects the `min` of every bound into a pool; repeated models accumulate.
    pub fn lower_bounds(bounds: &[ModelBound]) -> ModelPool {
        bounds.iter().map(|b| (b.model.clone(), b.min)).collect()
    }

    /// Merges bounds of the same model conjunctively: the largest `min` and
    /// the smallest `max` win. The result is ordered by model.
    ///
    /// # Errors
    ///
    /// Returns `BoundError::InvalidBound` if the merged interval is empty.
    pub fn intersect_by_model<I>(bounds: I) -> Result<Vec<ModelBound>, BoundError>
    where
        I: IntoIterator<Item = ModelBound>,
    {
        let mut merged: BTreeMap<ResourceModel, (u32, u32)> = BTreeMap::new();
        for bound in bounds {
            merged
                .entry(bound.model)
                .and_modify(|(min, max)| {
                    *min = (*min).max(bound.min);
                    *max = (*max).min(bound.max);
                })
                .or_insert((bound.min, bound.max));
        }
        merged
            .into_iter()
            .map(|(model, (min, max))| ModelBound::new(model, min, max))
            .collect()
    }

    /// Merges bounds of the same model additively, clamping at
    /// `MAX_THRESHOLD`. The result is ordered by model.
    pub fn accumulate_by_model<I>(bounds: I) -> Vec<ModelBound>
    where
        I: IntoIterator<Item = ModelBound>,
    {
        let mut merged: BTreeMap<ResourceModel, (u32, u32)> = BTreeMap::new();
        for bound in bounds {
            let entry = merged.entry(bound.model).or_insert((0, 0));
            entry.0 = entry.0.saturating_add_val(bound.min).min(Self::MAX_THRESHOLD);
            entry.1 = entry.1.saturating_add_val(bound.max).min(Self::MAX_THRESHOLD);
        }
        merged
            .into_iter()
            .map(|(model, (min, max))| ModelBound { model, min, max })
            .collect()
    }
}

impl fmt::Debug for ModelBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelBound({})", self)
    }
}

impl fmt::Display for ModelBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{},{}]", self.model, self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound(id: &str, min: u32, max: u32) -> ModelBound {
        ModelBound::new(ResourceModel::new(id), min, max).unwrap()
    }

    #[test]
    fn test_new_clamps_max() {
        let b = bound("M", 0, u32::MAX);
        assert_eq!(b.max(), ModelBound::MAX_THRESHOLD);
        assert_eq!(ModelBound::unbounded(ResourceModel::new("M")), b);
    }

    #[test]
    fn test_getters_through_references() {
        let bounds = vec![bound("A", 0, 2), bound("B", 3, 5)];
        let positive: Vec<&ModelBound> = bounds.iter().filter(|b| b.min() > 0).collect();
        assert_eq!(positive.len(), 1);
        assert_eq!(positive.iter().map(|b| b.max()).sum::<u32>(), 5);
        let owned = bound("C", 1, 4);
        assert_eq!((owned.min(), owned.max()), (1, 4));
    }

    #[test]
    fn test_new_rejects_inverted_interval() {
        let err = ModelBound::new(ResourceModel::new("M"), 4, 2).unwrap_err();
        assert!(matches!(err, BoundError::InvalidBound { min: 4, max: 2, .. }));
    }

    #[test]
    fn test_from_restriction_maps_unbounded_to_threshold() {
        let r = CardinalityRestriction::new(ResourceModel::new("M"), 2, None);
        assert_eq!(
            ModelBound::from_restriction(&r).unwrap(),
            bound("M", 2, ModelBound::MAX_THRESHOLD)
        );
    }

    #[test]
    fn test_substract_min() {
        assert_eq!(
            bound("M", 5, 10).substract_min(&bound("M", 3, 3)).unwrap(),
            bound("M", 2, 7)
        );
        assert_eq!(
            bound("M", 1, 10).substract_min(&bound("M", 3, 3)).unwrap(),
            bound("M", 0, 7)
        );
    }

    #[test]
    fn test_substract_min_insufficient() {
        let err = bound("M", 2, 4).substract_min(&bound("M", 5, 5)).unwrap_err();
        assert_eq!(
            err,
            BoundError::InsufficientBound {
                model: ResourceModel::new("M"),
                available: 4,
                requested: 5
            }
        );
    }

    #[test]
    fn test_substract_min_mismatch() {
        let err = bound("M", 2, 4).substract_min(&bound("N", 1, 1)).unwrap_err();
        assert!(matches!(err, BoundError::ModelMismatch { .. }));
    }

    #[test]
    fn test_substract_min_lists_passes_through_unreferenced() {
        let a = [bound("A", 2, 5), bound("B", 1, 1)];
        let b = [bound("A", 1, 1)];
        let result = ModelBound::substract_min_lists(&a, &b, false).unwrap();
        assert_eq!(result, vec![bound("A", 1, 4), bound("B", 1, 1)]);
    }

    #[test]
    fn test_substract_min_lists_model_not_found() {
        let a = [bound("A", 2, 5)];
        let b = [bound("C", 1, 1)];
        assert_eq!(
            ModelBound::substract_min_lists(&a, &b, true),
            Err(BoundError::ModelNotFound(ResourceModel::new("C")))
        );
    }

    #[test]
    fn test_substract_min_lists_remove_negative() {
        let a = [bound("A", 0, 1), bound("B", 1, 3)];
        let b = [bound("A", 2, 2), bound("B", 1, 1)];
        assert!(matches!(
            ModelBound::substract_min_lists(&a, &b, false),
            Err(BoundError::InsufficientBound { .. })
        ));
        assert_eq!(
            ModelBound::substract_min_lists(&a, &b, true).unwrap(),
            vec![bound("B", 0, 2)]
        );
    }

    #[test]
    fn test_decrement() {
        let mut b = bound("M", 1, 2);
        b.decrement().unwrap();
        assert_eq!(b, bound("M", 0, 1));
        b.decrement().unwrap();
        assert_eq!(b, bound("M", 0, 0));
        assert_eq!(
            b.decrement(),
            Err(BoundError::Underflow(ResourceModel::new("M")))
        );
    }

    #[test]
    fn test_upper_and_lower_bounds() {
        let bounds = [bound("A", 1, 3), bound("B", 0, 2), bound("A", 1, 1)];
        assert_eq!(
            ModelBound::upper_bounds(&bounds),
            ModelPool::from_iter([(ResourceModel::new("A"), 4), (ResourceModel::new("B"), 2)])
        );
        assert_eq!(
            ModelBound::lower_bounds(&bounds),
            ModelPool::from_iter([(ResourceModel::new("A"), 2), (ResourceModel::new("B"), 0)])
        );
    }

    #[test]
    fn test_intersect_by_model() {
        let merged =
            ModelBound::intersect_by_model([bound("A", 1, 5), bound("B", 0, 1), bound("A", 2, 4)])
                .unwrap();
        assert_eq!(merged, vec![bound("A", 2, 4), bound("B", 0, 1)]);

        assert!(ModelBound::intersect_by_model([bound("A", 3, 5), bound("A", 0, 2)]).is_err());
    }

    #[test]
    fn test_accumulate_by_model_clamps() {
        let merged = ModelBound::accumulate_by_model([
            bound("A", 1, ModelBound::MAX_THRESHOLD),
            bound("A", 2, 3),
        ]);
        assert_eq!(merged, vec![bound("A", 3, ModelBound::MAX_THRESHOLD)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(bound("Camera", 1, 2).to_string(), "Camera[1,2]");
    }
}
