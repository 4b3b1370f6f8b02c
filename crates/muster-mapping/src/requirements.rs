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

//! Turning taxonomy restrictions into matching input.
//!
//! * A functionality's **requirement** is one `ModelBound` per model its
//!   restrictions name. Several restrictions on the same model are merged
//!   conjunctively: the largest minimum and the smallest maximum.
//! * A pool's **availability** is one bound `(M, 0, count)` per model, plus
//!   the sub-resources each model declares, scaled by the model's count.

use muster_core::num::saturating::scale_clamped;
use muster_model::{
    bound::{BoundError, ModelBound},
    pool::ModelPool,
    resource::Functionality,
    taxonomy::Taxonomy,
};

/// Returns the requirement of `functionality`, sorted by model.
pub fn required_bounds<T>(
    taxonomy: &T,
    functionality: &Functionality,
) -> Result<Vec<ModelBound>, BoundError>
where
    T: Taxonomy + ?Sized,
{
    let bounds = taxonomy
        .cardinality_restrictions(functionality)
        .iter()
        .map(ModelBound::from_restriction)
        .collect::<Result<Vec<_>, _>>()?;
    ModelBound::intersect_by_model(bounds)
}

/// Returns what `pool` offers, sorted by model.
///
/// Every model contributes `(M, 0, count)`. A sub-resource `S` declared by
/// `M` with maximum `n` contributes `(S, 0, count * n)`, clamped to
/// `ModelBound::MAX_THRESHOLD`.
pub fn available_bounds<T>(taxonomy: &T, pool: &ModelPool) -> Vec<ModelBound>
where
    T: Taxonomy + ?Sized,
{
    let mut offers = Vec::with_capacity(pool.len());
    for (model, count) in pool.iter().filter(|&(_, count)| count > 0) {
        offers.push((model.clone(), count));
        for restriction in taxonomy.cardinality_restrictions(model) {
            let per_unit = restriction.max.unwrap_or(ModelBound::MAX_THRESHOLD);
            let offered = scale_clamped(per_unit, count, ModelBound::MAX_THRESHOLD);
            if offered > 0 {
                offers.push((restriction.model, offered));
            }
        }
    }
    ModelBound::accumulate_by_model(
        offers
            .into_iter()
            .filter_map(|(model, max)| ModelBound::new(model, 0, max).ok()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use muster_model::{
        resource::{CardinalityRestriction, ResourceModel},
        taxonomy::TaxonomyBuilder,
    };

    fn m(id: &str) -> ResourceModel {
        ResourceModel::new(id)
    }

    fn bound(id: &str, min: u32, max: u32) -> ModelBound {
        ModelBound::new(m(id), min, max).unwrap()
    }

    #[test]
    fn test_duplicate_restrictions_are_intersected() {
        let mut b = TaxonomyBuilder::new();
        b.add_functionality(m("Inspect"))
            .add_restriction(m("Inspect"), CardinalityRestriction::new(m("Camera"), 1, Some(4)))
            .add_restriction(m("Inspect"), CardinalityRestriction::new(m("Camera"), 2, None))
            .add_restriction(m("Inspect"), CardinalityRestriction::new(m("Arm"), 0, Some(1)));
        let t = b.build();
        let required = required_bounds(&t, &m("Inspect")).unwrap();
        assert_eq!(required, vec![bound("Arm", 0, 1), bound("Camera", 2, 4)]);
    }

    #[test]
    fn test_contradicting_restrictions_fail() {
        let mut b = TaxonomyBuilder::new();
        b.add_restriction(m("F"), CardinalityRestriction::new(m("A"), 3, None))
            .add_restriction(m("F"), CardinalityRestriction::new(m("A"), 0, Some(2)));
        let t = b.build();
        assert!(matches!(
            required_bounds(&t, &m("F")),
            Err(BoundError::InvalidBound { .. })
        ));
    }

    #[test]
    fn test_availability_includes_sub_resources() {
        let mut b = TaxonomyBuilder::new();
        b.add_restriction(m("Rover"), CardinalityRestriction::new(m("Camera"), 1, Some(2)));
        let t = b.build();
        let pool = ModelPool::from_iter([(m("Rover"), 3), (m("Camera"), 1)]);
        let available = available_bounds(&t, &pool);
        assert_eq!(available, vec![bound("Camera", 0, 7), bound("Rover", 0, 3)]);
    }
}
