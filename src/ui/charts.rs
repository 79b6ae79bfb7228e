use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::data::aggregate::{Aggregate, group_by_year};
use crate::data::model::Indicator;
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Overview tab – headline metrics + life expectancy over the years
// ---------------------------------------------------------------------------

pub fn overview_tab(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    ui.columns(4, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Mean life expectancy", years_fmt(state.summary.life_expectancy));
        metric(&mut cols[1], "Mean population", thousands_fmt(state.summary.population));
        metric(&mut cols[2], "Mean schooling", years_fmt(state.summary.schooling));
        metric(&mut cols[3], "Mean GDP", usd_fmt(state.summary.gdp));
    });
    ui.separator();

    ui.heading("Life expectancy over the years");
    let series = group_by_year(
        dataset,
        &state.visible_indices,
        Indicator::LifeExpectancy,
        Aggregate::Mean,
    );
    line_chart(ui, "life_expectancy", &series, state, Indicator::LifeExpectancy);
    ui.small("Year-to-year movement in the mean hints at public health gains or setbacks.");
}

// ---------------------------------------------------------------------------
// Health indicators tab – measles, hepatitis B, polio + HIV/AIDS
// ---------------------------------------------------------------------------

pub fn health_tab(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let view = &state.visible_indices;

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Measles cases");
        let measles = group_by_year(dataset, view, Indicator::Measles, Aggregate::Sum);
        bar_chart(&mut cols[0], "measles", &measles, state, Indicator::Measles);

        cols[1].strong("Hepatitis B vaccination");
        let hep_b = group_by_year(dataset, view, Indicator::HepatitisB, Aggregate::Mean);
        line_chart(&mut cols[1], "hepatitis_b", &hep_b, state, Indicator::HepatitisB);
    });

    ui.separator();
    ui.strong("Polio and HIV/AIDS");
    let polio = group_by_year(dataset, view, Indicator::Polio, Aggregate::Mean);
    let hiv = group_by_year(dataset, view, Indicator::HivAids, Aggregate::Mean);

    Plot::new("polio_hiv")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Mean")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(series_points(&polio))
                    .name(Indicator::Polio.label())
                    .color(state.series_colors.color_for(Indicator::Polio))
                    .width(2.0),
            );
            plot_ui.line(
                Line::new(series_points(&hiv))
                    .name(Indicator::HivAids.label())
                    .color(state.series_colors.color_for(Indicator::HivAids))
                    .width(2.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Education & economy tab – schooling, GDP, income composition
// ---------------------------------------------------------------------------

pub fn education_economy_tab(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let view = &state.visible_indices;

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Mean schooling by year");
        let schooling = group_by_year(dataset, view, Indicator::Schooling, Aggregate::Mean);
        bar_chart(&mut cols[0], "schooling", &schooling, state, Indicator::Schooling);

        cols[1].strong("Mean GDP by year");
        let gdp = group_by_year(dataset, view, Indicator::Gdp, Aggregate::Mean);
        line_chart(&mut cols[1], "gdp", &gdp, state, Indicator::Gdp);
    });

    ui.separator();
    ui.strong("Mean income composition");
    let income = group_by_year(dataset, view, Indicator::IncomeComposition, Aggregate::Mean);
    line_chart(ui, "income_composition", &income, state, Indicator::IncomeComposition);
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

/// One headline metric: small label over a large value.
fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.small(label);
        ui.label(RichText::new(value).size(22.0).color(Color32::LIGHT_GRAY));
    });
}

fn line_chart(ui: &mut Ui, id: &str, series: &[(i32, f64)], state: &AppState, indicator: Indicator) {
    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label(indicator.label())
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(series_points(series))
                    .name(indicator.label())
                    .color(state.series_colors.color_for(indicator))
                    .width(2.0),
            );
        });
}

fn bar_chart(ui: &mut Ui, id: &str, series: &[(i32, f64)], state: &AppState, indicator: Indicator) {
    let bars: Vec<Bar> = series
        .iter()
        .filter(|(_, v)| v.is_finite())
        .map(|&(year, v)| Bar::new(year as f64, v).width(0.7))
        .collect();

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label(indicator.label())
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name(indicator.label())
                    .color(state.series_colors.color_for(indicator)),
            );
        });
}

/// Drop NaN entries (all-gap years) so they don't break the polyline.
fn series_points(series: &[(i32, f64)]) -> PlotPoints {
    series
        .iter()
        .filter(|(_, v)| v.is_finite())
        .map(|&(year, v)| [year as f64, v])
        .collect()
}

// ---------------------------------------------------------------------------
// Metric formatting (NaN renders as a placeholder, never panics)
// ---------------------------------------------------------------------------

fn years_fmt(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.1} years")
    } else {
        "–".to_string()
    }
}

fn usd_fmt(v: f64) -> String {
    if v.is_finite() {
        format!("US$ {v:.2}")
    } else {
        "–".to_string()
    }
}

/// Round to a whole number and insert thousands separators.
fn thousands_fmt(v: f64) -> String {
    if !v.is_finite() {
        return "–".to_string();
    }
    let n = v.round() as i64;
    let digits = n.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        format!("-{out}")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_formatting() {
        assert_eq!(thousands_fmt(195713635.4), "195,713,635");
        assert_eq!(thousands_fmt(999.0), "999");
        assert_eq!(thousands_fmt(1000.0), "1,000");
        assert_eq!(thousands_fmt(-12345.0), "-12,345");
        assert_eq!(thousands_fmt(f64::NAN), "–");
    }

    #[test]
    fn metric_formats_handle_nan() {
        assert_eq!(years_fmt(f64::NAN), "–");
        assert_eq!(usd_fmt(f64::NAN), "–");
        assert_eq!(years_fmt(70.25), "70.2 years");
        assert_eq!(usd_fmt(11286.243), "US$ 11286.24");
    }
}
