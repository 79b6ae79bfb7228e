use std::collections::BTreeSet;

use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::table_filter;
use crate::data::model::{COUNTRY_COLUMN, Indicator, YEAR_COLUMN};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Raw data tab – country selector + table of the filtered rows
// ---------------------------------------------------------------------------

pub fn table_tab(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    // Countries actually present in the current filtered view.
    let view_countries: BTreeSet<&str> = state
        .visible_indices
        .iter()
        .map(|&i| dataset.rows[i].country.as_str())
        .collect();

    // Stale selector (country filtered away since last interaction) falls
    // back to "All".
    let stale = state
        .table_country
        .as_deref()
        .is_some_and(|c| !view_countries.contains(c));
    if stale {
        state.table_country = None;
    }

    let mut next_selection: Option<Option<String>> = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Filter by country");
        let current = state.table_country.as_deref().unwrap_or("All");
        egui::ComboBox::from_id_salt("table_country")
            .selected_text(current)
            .show_ui(ui, |ui: &mut Ui| {
                if ui
                    .selectable_label(state.table_country.is_none(), "All")
                    .clicked()
                {
                    next_selection = Some(None);
                }
                for country in &view_countries {
                    let selected = state.table_country.as_deref() == Some(*country);
                    if ui.selectable_label(selected, *country).clicked() {
                        next_selection = Some(Some((*country).to_string()));
                    }
                }
            });
    });
    if let Some(selection) = next_selection {
        state.set_table_country(selection);
    }
    ui.separator();

    let Some(dataset) = &state.dataset else {
        return;
    };
    let rows = table_filter(
        dataset,
        &state.visible_indices,
        state.table_country.as_deref(),
    );

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(120.0)) // country
        .column(Column::auto().at_least(50.0)) // year
        .columns(Column::remainder().at_least(70.0), Indicator::ALL.len())
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong(COUNTRY_COLUMN);
            });
            header.col(|ui: &mut Ui| {
                ui.strong(YEAR_COLUMN);
            });
            for ind in Indicator::ALL {
                header.col(|ui: &mut Ui| {
                    ui.strong(ind.source_column());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let obs = &dataset.rows[rows[row.index()]];
                row.col(|ui: &mut Ui| {
                    ui.label(&obs.country);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(obs.year.to_string());
                });
                for ind in Indicator::ALL {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell_fmt(ind.value(obs)));
                    });
                }
            });
        });
}

fn cell_fmt(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.2}")
    } else {
        "–".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_formatting_handles_gaps() {
        assert_eq!(cell_fmt(0.726), "0.73");
        assert_eq!(cell_fmt(f64::NAN), "–");
    }
}
