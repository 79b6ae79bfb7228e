use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: country multi-select and year range.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let countries = dataset.countries.clone();
    let (year_min, year_max) = (dataset.year_min, dataset.year_max);

    // ---- Year range (inclusive, clamped to the dataset bounds) ----
    ui.strong("Years");
    let (mut lo, mut hi) = state.filters.year_range;
    let mut changed = false;
    changed |= ui
        .add(Slider::new(&mut lo, year_min..=year_max).text("From"))
        .changed();
    changed |= ui
        .add(Slider::new(&mut hi, year_min..=year_max).text("To"))
        .changed();
    if changed {
        state.set_year_range(lo, hi);
    }
    ui.separator();

    // ---- Country multi-select ----
    let n_selected = state.filters.countries.len();
    ui.strong(format!("Countries  ({n_selected}/{})", countries.len()));
    if n_selected == 0 {
        ui.small("No selection: all countries shown.");
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_countries();
        }
        if ui.small_button("None").clicked() {
            state.select_no_countries();
        }
    });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for country in &countries {
                let mut checked = state.filters.countries.contains(country);
                if ui.checkbox(&mut checked, country).changed() {
                    state.toggle_country(country);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} observations loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open health indicator data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} observations, {} countries, years {}..={}",
                    dataset.len(),
                    dataset.countries.len(),
                    dataset.year_min,
                    dataset.year_max
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
