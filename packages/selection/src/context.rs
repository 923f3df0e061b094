//! Loaded boundaries plus the per-tier indexes and density model a
//! selection is computed against.

use std::collections::BTreeMap;

use selectie_density::{DensityModel, HashJitter, Jitter};
use selectie_geography_models::{BoundarySet, LatLng, Tier};
use selectie_spatial::RegionIndex;

use crate::{SelectedRegion, Selection, palette};

/// Everything needed to turn a `(point, radius, tier)` triple into a
/// [`Selection`].
pub struct SelectionContext<'a, J = HashJitter> {
    boundaries: &'a BoundarySet,
    indexes: BTreeMap<Tier, RegionIndex<'a>>,
    density: &'a DensityModel<J>,
}

impl<J> std::fmt::Debug for SelectionContext<'_, J> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionContext")
            .field("indexes", &self.indexes)
            .finish_non_exhaustive()
    }
}

impl<'a, J: Jitter> SelectionContext<'a, J> {
    /// Indexes every tier of `boundaries`.
    #[must_use]
    pub fn new(boundaries: &'a BoundarySet, density: &'a DensityModel<J>) -> Self {
        let indexes = Tier::ALL
            .iter()
            .map(|tier| (*tier, RegionIndex::build(boundaries.regions(*tier))))
            .collect();

        Self {
            boundaries,
            indexes,
            density,
        }
    }

    /// The boundaries this context was built over.
    #[must_use]
    pub const fn boundaries(&self) -> &'a BoundarySet {
        self.boundaries
    }

    /// Computes the selection for one triple.
    ///
    /// An invalid point or radius yields an empty selection. The company
    /// count is only set when at least one region matched.
    #[must_use]
    pub fn compute(&self, point: LatLng, radius_km: f64, tier: Tier) -> Selection {
        let regions = self.boundaries.regions(tier);
        let indices = self
            .indexes
            .get(&tier)
            .map_or_else(|| Ok(Vec::new()), |index| index.select_indices(point, radius_km))
            .unwrap_or_else(|e| {
                log::warn!("Selection failed for {tier} at ({}, {}): {e}", point.lat, point.lng);
                Vec::new()
            });

        let selected: Vec<SelectedRegion> = indices
            .iter()
            .enumerate()
            .map(|(position, &index)| {
                let region = &regions[index];
                SelectedRegion {
                    index,
                    id: region.id.clone(),
                    name: region.display_name().to_string(),
                    color: palette::color_for(position),
                }
            })
            .collect();

        let company_count = (!selected.is_empty())
            .then(|| self.density.estimate_count(indices.iter().map(|&i| &regions[i])));

        log::debug!(
            "Selected {} {tier} region(s) within {radius_km} km of ({}, {})",
            selected.len(),
            point.lat,
            point.lng
        );

        Selection {
            point,
            radius_km,
            tier,
            regions: selected,
            company_count,
        }
    }
}
