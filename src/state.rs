use crate::color::SeriesColors;
use crate::data::aggregate::{Summary, summarize};
use crate::data::filter::{FilterState, filtered_indices, init_filter_state};
use crate::data::model::HealthDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The content tabs of the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Health,
    EducationEconomy,
    Table,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Health, Tab::EducationEconomy, Tab::Table];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Health => "Health indicators",
            Tab::EducationEconomy => "Education & economy",
            Tab::Table => "Data table",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<HealthDataset>,

    /// Country / year-range selections.
    pub filters: FilterState,

    /// Indices of observations passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Headline means over the visible rows (cached; NaN fields when empty).
    pub summary: Summary,

    /// Single-country restriction for the raw table tab (None = "All").
    pub table_country: Option<String>,

    /// Currently shown content tab.
    pub active_tab: Tab,

    /// Stable per-series chart colours.
    pub series_colors: SeriesColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            summary: Summary {
                life_expectancy: f64::NAN,
                population: f64::NAN,
                schooling: f64::NAN,
                gdp: f64::NAN,
            },
            table_country: None,
            active_tab: Tab::Overview,
            series_colors: SeriesColors::default(),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset, reset filters and the table selector.
    pub fn set_dataset(&mut self, dataset: HealthDataset) {
        self.filters = init_filter_state(&dataset);
        self.table_country = None;
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
        self.refilter();
    }

    /// Recompute the visible indices and the cached summary after any
    /// filter change. One synchronous pass over the whole dataset.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filters);
            self.summary = summarize(ds, &self.visible_indices);
        }
    }

    /// Toggle one country in the selection.
    pub fn toggle_country(&mut self, country: &str) {
        if !self.filters.countries.remove(country) {
            self.filters.countries.insert(country.to_string());
        }
        self.refilter();
    }

    /// Select every country (equivalent to no restriction, shown checked).
    pub fn select_all_countries(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.countries = ds.countries.iter().cloned().collect();
            self.refilter();
        }
    }

    /// Clear the country selection: no restriction, every country shown.
    pub fn select_no_countries(&mut self) {
        self.filters.countries.clear();
        self.refilter();
    }

    /// Set the inclusive year range, clamped to the dataset bounds and kept
    /// ordered (lo <= hi).
    pub fn set_year_range(&mut self, lo: i32, hi: i32) {
        if let Some(ds) = &self.dataset {
            let lo = lo.clamp(ds.year_min, ds.year_max);
            let hi = hi.clamp(ds.year_min, ds.year_max);
            self.filters.year_range = (lo.min(hi), lo.max(hi));
            self.refilter();
        }
    }

    /// Set the table tab's single-country selector (None = "All").
    pub fn set_table_country(&mut self, country: Option<String>) {
        self.table_country = country;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Observation;

    fn obs(country: &str, year: i32, life_expectancy: f64) -> Observation {
        Observation {
            country: country.to_string(),
            year,
            life_expectancy,
            population: 1.0e6,
            schooling: 10.0,
            gdp: 4000.0,
            measles: 10.0,
            hepatitis_b: 90.0,
            polio: 90.0,
            hiv_aids: 0.2,
            income_composition: 0.6,
        }
    }

    fn dataset() -> HealthDataset {
        HealthDataset::from_rows(vec![
            obs("Angola", 2000, 50.0),
            obs("Brasil", 2000, 70.0),
            obs("Brasil", 2010, 74.0),
        ])
    }

    #[test]
    fn set_dataset_shows_everything() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.filters.year_range, (2000, 2010));
        assert!(state.filters.countries.is_empty());
        assert_eq!(state.summary.life_expectancy, (50.0 + 70.0 + 74.0) / 3.0);
    }

    #[test]
    fn toggle_country_refilters_and_updates_summary() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.toggle_country("Brasil");
        assert_eq!(state.visible_indices, vec![1, 2]);
        assert_eq!(state.summary.life_expectancy, 72.0);

        state.toggle_country("Brasil");
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn year_range_is_clamped_and_ordered() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.set_year_range(2050, 1990);
        assert_eq!(state.filters.year_range, (2000, 2010));

        state.set_year_range(2010, 2005);
        assert_eq!(state.filters.year_range, (2005, 2010));
        assert_eq!(state.visible_indices, vec![2]);
    }

    #[test]
    fn empty_view_summary_is_nan_not_a_crash() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.set_year_range(2001, 2005);
        assert!(state.visible_indices.is_empty());
        assert!(state.summary.life_expectancy.is_nan());
        assert!(state.summary.gdp.is_nan());
    }

    #[test]
    fn reload_resets_the_table_selector() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.set_table_country(Some("Brasil".to_string()));
        state.set_dataset(dataset());
        assert_eq!(state.table_country, None);
    }
}
