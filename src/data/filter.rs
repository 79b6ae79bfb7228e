use std::collections::BTreeSet;

use super::model::HealthDataset;

// ---------------------------------------------------------------------------
// Filter predicate: selected countries + inclusive year range
// ---------------------------------------------------------------------------

/// Current filter selection.
///
/// An empty country set means "no restriction" (show every country); the
/// year range is inclusive at both ends and bounded by the dataset's own
/// min/max years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub countries: BTreeSet<String>,
    pub year_range: (i32, i32),
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            countries: BTreeSet::new(),
            year_range: (0, 0),
        }
    }
}

/// Initialise a [`FilterState`] that shows everything in the dataset.
pub fn init_filter_state(dataset: &HealthDataset) -> FilterState {
    FilterState {
        countries: BTreeSet::new(),
        year_range: (dataset.year_min, dataset.year_max),
    }
}

/// Return indices of observations that pass the current filters.
///
/// An observation passes when:
/// * the country set is empty, or contains the observation's country, and
/// * `year_range.0 <= year <= year_range.1`.
///
/// An empty result is not an error; aggregations over it yield NaN.
pub fn filtered_indices(dataset: &HealthDataset, filters: &FilterState) -> Vec<usize> {
    let (lo, hi) = filters.year_range;
    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, obs)| {
            if !filters.countries.is_empty() && !filters.countries.contains(&obs.country) {
                return false;
            }
            lo <= obs.year && obs.year <= hi
        })
        .map(|(i, _)| i)
        .collect()
}

/// Restrict a filtered view to a single country for the raw table tab.
///
/// `None` keeps the full view ("All"); `Some(c)` keeps only rows whose
/// country matches `c` exactly.
pub fn table_filter(dataset: &HealthDataset, view: &[usize], country: Option<&str>) -> Vec<usize> {
    match country {
        None => view.to_vec(),
        Some(c) => view
            .iter()
            .copied()
            .filter(|&i| dataset.rows[i].country == c)
            .collect(),
    }
}
