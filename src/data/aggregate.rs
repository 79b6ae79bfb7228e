use std::collections::BTreeMap;

use super::model::{HealthDataset, Indicator};

// ---------------------------------------------------------------------------
// Aggregations over a filtered view
// ---------------------------------------------------------------------------

/// How to combine an indicator column within a year group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Mean,
    Sum,
}

/// The four headline means shown above the charts.
///
/// Every field is NaN when the view is empty (or when every cell of the
/// column is missing); the UI renders a placeholder for NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub life_expectancy: f64,
    pub population: f64,
    pub schooling: f64,
    pub gdp: f64,
}

/// Mean of one indicator over the view, skipping NaN cells.
///
/// NaN when the view holds no finite value for the column, mirroring what
/// a spreadsheet mean over an empty selection produces.
pub fn column_mean(dataset: &HealthDataset, view: &[usize], indicator: Indicator) -> f64 {
    let (sum, count) = view
        .iter()
        .map(|&i| indicator.value(&dataset.rows[i]))
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0_usize), |(s, n), v| (s + v, n + 1));

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Compute the four headline means over a filtered view.
pub fn summarize(dataset: &HealthDataset, view: &[usize]) -> Summary {
    Summary {
        life_expectancy: column_mean(dataset, view, Indicator::LifeExpectancy),
        population: column_mean(dataset, view, Indicator::Population),
        schooling: column_mean(dataset, view, Indicator::Schooling),
        gdp: column_mean(dataset, view, Indicator::Gdp),
    }
}

/// Aggregate one indicator per distinct year in the view.
///
/// Returns `(year, value)` pairs ordered by year, one entry per year that
/// actually occurs in the view; years with no rows are simply absent.
/// NaN cells are skipped: a year whose cells are all missing aggregates to
/// NaN for [`Aggregate::Mean`] and 0.0 for [`Aggregate::Sum`].
pub fn group_by_year(
    dataset: &HealthDataset,
    view: &[usize],
    indicator: Indicator,
    agg: Aggregate,
) -> Vec<(i32, f64)> {
    let mut groups: BTreeMap<i32, (f64, usize)> = BTreeMap::new();

    for &i in view {
        let obs = &dataset.rows[i];
        let entry = groups.entry(obs.year).or_insert((0.0, 0));
        let v = indicator.value(obs);
        if v.is_finite() {
            entry.0 += v;
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(year, (sum, count))| {
            let value = match agg {
                Aggregate::Sum => sum,
                Aggregate::Mean => {
                    if count == 0 {
                        f64::NAN
                    } else {
                        sum / count as f64
                    }
                }
            };
            (year, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filtered_indices, init_filter_state};
    use crate::data::model::Observation;

    fn obs(country: &str, year: i32, life_expectancy: f64) -> Observation {
        Observation {
            country: country.to_string(),
            year,
            life_expectancy,
            population: 2.0e6,
            schooling: 12.0,
            gdp: 8000.0,
            measles: 50.0,
            hepatitis_b: 85.0,
            polio: 88.0,
            hiv_aids: 0.3,
            income_composition: 0.65,
        }
    }

    #[test]
    fn summarize_single_row_returns_its_own_values() {
        let ds = HealthDataset::from_rows(vec![obs("Angola", 2000, 52.5)]);
        let summary = summarize(&ds, &[0]);
        assert_eq!(summary.life_expectancy, 52.5);
        assert_eq!(summary.population, 2.0e6);
        assert_eq!(summary.schooling, 12.0);
        assert_eq!(summary.gdp, 8000.0);
    }

    #[test]
    fn two_country_scenario_means() {
        let ds = HealthDataset::from_rows(vec![obs("A", 2000, 70.0), obs("B", 2000, 80.0)]);

        // No country restriction, full year range: both rows, mean 75.0.
        let mut filters = init_filter_state(&ds);
        filters.year_range = (2000, 2000);
        let view = filtered_indices(&ds, &filters);
        assert_eq!(view.len(), 2);
        assert_eq!(summarize(&ds, &view).life_expectancy, 75.0);

        // Only country A: one row, mean 70.0.
        filters.countries.insert("A".to_string());
        let view = filtered_indices(&ds, &filters);
        assert_eq!(view.len(), 1);
        assert_eq!(summarize(&ds, &view).life_expectancy, 70.0);

        // Unknown country C: empty view, NaN mean, no panic.
        filters.countries.clear();
        filters.countries.insert("C".to_string());
        let view = filtered_indices(&ds, &filters);
        assert!(view.is_empty());
        assert!(summarize(&ds, &view).life_expectancy.is_nan());
    }

    #[test]
    fn group_by_year_one_entry_per_distinct_year() {
        let ds = HealthDataset::from_rows(vec![
            obs("A", 2000, 70.0),
            obs("B", 2000, 80.0),
            obs("A", 2001, 71.0),
            obs("A", 2003, 72.0),
        ]);
        let view: Vec<usize> = (0..ds.len()).collect();
        let series = group_by_year(&ds, &view, Indicator::LifeExpectancy, Aggregate::Mean);

        let years: Vec<i32> = series.iter().map(|&(y, _)| y).collect();
        assert_eq!(years, vec![2000, 2001, 2003]); // 2002 absent, not zero-filled
        assert_eq!(series[0].1, 75.0);
        assert_eq!(series[1].1, 71.0);
    }

    #[test]
    fn group_sizes_sum_to_view_size() {
        let ds = HealthDataset::from_rows(vec![
            obs("A", 2000, 70.0),
            obs("B", 2000, 80.0),
            obs("A", 2001, 71.0),
        ]);
        let view: Vec<usize> = (0..ds.len()).collect();

        let mut counted = 0usize;
        let series = group_by_year(&ds, &view, Indicator::LifeExpectancy, Aggregate::Mean);
        for &(year, _) in &series {
            counted += view.iter().filter(|&&i| ds.rows[i].year == year).count();
        }
        assert_eq!(counted, view.len());
    }

    #[test]
    fn sum_aggregates_within_year() {
        let ds = HealthDataset::from_rows(vec![obs("A", 2000, 70.0), obs("B", 2000, 80.0)]);
        let view = vec![0, 1];
        let series = group_by_year(&ds, &view, Indicator::Measles, Aggregate::Sum);
        assert_eq!(series, vec![(2000, 100.0)]);
    }

    #[test]
    fn nan_cells_are_skipped() {
        let mut with_gap = obs("A", 2000, f64::NAN);
        with_gap.measles = f64::NAN;
        let ds = HealthDataset::from_rows(vec![with_gap, obs("B", 2000, 80.0)]);
        let view = vec![0, 1];

        // Mean over one finite value.
        let series = group_by_year(&ds, &view, Indicator::LifeExpectancy, Aggregate::Mean);
        assert_eq!(series, vec![(2000, 80.0)]);

        // Sum skips the NaN cell too.
        let series = group_by_year(&ds, &view, Indicator::Measles, Aggregate::Sum);
        assert_eq!(series, vec![(2000, 50.0)]);
    }

    #[test]
    fn all_nan_year_is_nan_mean_and_zero_sum() {
        let gap = obs("A", 2000, f64::NAN);
        let ds = HealthDataset::from_rows(vec![gap]);
        let view = vec![0];

        let mean = group_by_year(&ds, &view, Indicator::LifeExpectancy, Aggregate::Mean);
        assert_eq!(mean.len(), 1);
        assert!(mean[0].1.is_nan());

        let sum = group_by_year(&ds, &view, Indicator::LifeExpectancy, Aggregate::Sum);
        assert_eq!(sum, vec![(2000, 0.0)]);
    }

    #[test]
    fn empty_view_yields_no_groups() {
        let ds = HealthDataset::from_rows(vec![obs("A", 2000, 70.0)]);
        let series = group_by_year(&ds, &[], Indicator::Gdp, Aggregate::Mean);
        assert!(series.is_empty());
    }

    #[test]
    fn duplicate_country_year_rows_aggregate_together() {
        let ds = HealthDataset::from_rows(vec![obs("A", 2000, 60.0), obs("A", 2000, 70.0)]);
        let view = vec![0, 1];
        let series = group_by_year(&ds, &view, Indicator::LifeExpectancy, Aggregate::Mean);
        assert_eq!(series, vec![(2000, 65.0)]);
    }
}
