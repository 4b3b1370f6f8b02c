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

//! Saturation bounds.
//!
//! For a functionality `F` and a pool model `M`, the functional saturation
//! bound is a count of `M` beyond which additional units cannot change
//! whether `F` is supported. One unit of `M` offers itself and every
//! sub-resource `M` declares (with its per-unit maximum). For each required
//! row `R` with `R.min > 0`, let `c_R` be what one unit offers to `R` through
//! offers that are `R.model` or a subtype of it. Then
//!
//! ```text
//! bound(F, M) = Σ over R with c_R > 0 of ceil(R.min / c_R)
//! ```
//!
//! With that many units `M` can cover every row it is able to serve on its
//! own, so further units never matter. The mapping's saturation bound is
//! the pool clipped to the pointwise maximum over all functionalities.

use muster_core::num::saturating::saturating_sum;
use muster_model::{
    algebra,
    bound::ModelBound,
    pool::ModelPool,
    resource::ResourceModel,
    taxonomy::Taxonomy,
};

/// Returns the per-unit offers of `model`: itself once, and each declared
/// sub-resource with its maximum.
fn unit_offers<T>(taxonomy: &T, model: &ResourceModel) -> Vec<(ResourceModel, u32)>
where
    T: Taxonomy + ?Sized,
{
    std::iter::once((model.clone(), 1))
        .chain(
            taxonomy
                .cardinality_restrictions(model)
                .into_iter()
                .map(|r| (r.model, r.max.unwrap_or(ModelBound::MAX_THRESHOLD))),
        )
        .filter(|&(_, n)| n > 0)
        .collect()
}

#[inline]
fn substitutes<T>(taxonomy: &T, offered: &ResourceModel, required: &ResourceModel) -> bool
where
    T: Taxonomy + ?Sized,
{
    offered == required || taxonomy.is_subtype_of(offered, required)
}

/// Returns the saturation bound of one functionality, given its requirement.
///
/// Models of `pool` that serve no row are omitted, which reads as zero.
/// A requirement without a positive minimum is met by any single unit, so
/// every model held by `pool` gets a bound of one.
pub fn functional_saturation_bound<T>(
    taxonomy: &T,
    required: &[ModelBound],
    pool: &ModelPool,
) -> ModelPool
where
    T: Taxonomy + ?Sized,
{
    let rows: Vec<&ModelBound> = required.iter().filter(|row| row.min() > 0).collect();
    if rows.is_empty() {
        return pool
            .iter()
            .filter(|&(_, count)| count > 0)
            .map(|(model, _)| (model.clone(), 1))
            .collect();
    }
    pool.models()
        .map(|model| {
            let offers = unit_offers(taxonomy, model);
            let needed = saturating_sum(rows.iter().map(|row| {
                let per_unit = saturating_sum(
                    offers
                        .iter()
                        .filter(|(offer, _)| substitutes(taxonomy, offer, row.model()))
                        .map(|&(_, n)| n),
                );
                if per_unit == 0 {
                    0
                } else {
                    row.min().div_ceil(per_unit)
                }
            }));
            (model.clone(), needed.min(ModelBound::MAX_THRESHOLD))
        })
        .filter(|&(_, needed)| needed > 0)
        .collect()
}

/// Returns `pool` clipped to the pointwise maximum of the functional bounds
/// of every requirement in `requirements`.
pub fn saturation_bound<'r, T, I>(taxonomy: &T, requirements: I, pool: &ModelPool) -> ModelPool
where
    T: Taxonomy + ?Sized,
    I: IntoIterator<Item = &'r [ModelBound]>,
{
    let ceiling = requirements
        .into_iter()
        .map(|required| functional_saturation_bound(taxonomy, required, pool))
        .fold(ModelPool::new(), |acc, bound| algebra::max(&acc, &bound));
    pool.bounded_by(&ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use muster_model::{resource::CardinalityRestriction, taxonomy::TaxonomyBuilder};

    fn m(id: &str) -> ResourceModel {
        ResourceModel::new(id)
    }

    fn bound(id: &str, min: u32, max: u32) -> ModelBound {
        ModelBound::new(m(id), min, max).unwrap()
    }

    #[test]
    fn test_direct_requirement() {
        let t = TaxonomyBuilder::new().build();
        let pool = ModelPool::from_iter([(m("A"), 5), (m("B"), 2)]);
        let sat = functional_saturation_bound(&t, &[bound("A", 3, 3)], &pool);
        assert_eq!(sat, ModelPool::from_iter([(m("A"), 3)]));
    }

    #[test]
    fn test_sub_resources_reduce_units_needed() {
        let mut b = TaxonomyBuilder::new();
        b.add_restriction(m("Rover"), CardinalityRestriction::new(m("Camera"), 0, Some(2)))
            .add_subtype(m("StereoCamera"), m("Camera"));
        let t = b.build();
        let pool = ModelPool::from_iter([(m("Rover"), 9), (m("StereoCamera"), 9)]);
        let sat = functional_saturation_bound(&t, &[bound("Camera", 5, 5)], &pool);
        // a rover carries two cameras, a stereo camera is one
        assert_eq!(sat, ModelPool::from_iter([(m("Rover"), 3), (m("StereoCamera"), 5)]));
    }

    #[test]
    fn test_rows_served_by_one_model_add_up() {
        let mut b = TaxonomyBuilder::new();
        b.add_subtype(m("StereoCamera"), m("Camera"))
            .add_subtype(m("Camera"), m("Sensor"));
        let t = b.build();
        let pool = ModelPool::from_iter([(m("StereoCamera"), 10)]);
        let required = [bound("Camera", 2, 2), bound("Sensor", 3, 3), bound("Arm", 0, 1)];
        let sat = functional_saturation_bound(&t, &required, &pool);
        assert_eq!(sat.count(&m("StereoCamera")), 5);
    }

    #[test]
    fn test_requirement_without_positive_minimum_allows_single_units() {
        let t = TaxonomyBuilder::new().build();
        let pool = ModelPool::from_iter([(m("A"), 2), (m("B"), 0), (m("C"), 3)]);
        let sat = functional_saturation_bound(&t, &[bound("A", 0, 2)], &pool);
        assert_eq!(sat, ModelPool::from_iter([(m("A"), 1), (m("C"), 1)]));
        let sat = functional_saturation_bound(&t, &[], &pool);
        assert_eq!(sat, ModelPool::from_iter([(m("A"), 1), (m("C"), 1)]));
    }

    #[test]
    fn test_pool_level_bound_takes_max_and_clips() {
        let t = TaxonomyBuilder::new().build();
        let pool = ModelPool::from_iter([(m("A"), 2), (m("B"), 1), (m("C"), 4)]);
        let f = vec![bound("A", 1, 1)];
        let g = vec![bound("A", 3, 3), bound("B", 1, 2)];
        let sat = saturation_bound(&t, [f.as_slice(), g.as_slice()], &pool);
        assert_eq!(sat, ModelPool::from_iter([(m("A"), 2), (m("B"), 1)]));
    }
}
