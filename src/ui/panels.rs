use std::path::Path;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::loader;
use crate::data::pipeline::{self, GovernedField};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – governed-field filters
// ---------------------------------------------------------------------------

/// Render the sidebar: one multi-select per governed field.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for field in GovernedField::ALL {
                // Clone the full value set so we can mutate state in the loop.
                let all_values: Vec<String> = state
                    .dataset
                    .distinct
                    .get(&field.categorical())
                    .map(|set| set.iter().cloned().collect())
                    .unwrap_or_default();

                let n_selected = state.selection.set(field).len();
                let header = format!("{}  ({n_selected}/{})", field.label(), all_values.len());

                egui::CollapsingHeader::new(RichText::new(header).strong())
                    .id_salt(field.label())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(field);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(field);
                            }
                        });

                        for value in &all_values {
                            let mut checked = state.selection.set(field).contains(value);
                            if ui.checkbox(&mut checked, value.as_str()).changed() {
                                state.toggle_filter_value(field, value);
                            }
                        }
                    });
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

        ui.label(format!(
            "{} employees loaded, {} matching filters",
            state.dataset.len(),
            state.visible_indices.len()
        ));

        ui.separator();

        if ui.button("Download Filtered Data").clicked() {
            save_filtered(state);
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

/// Load a different CSV. A failure keeps the current dataset and surfaces
/// the error in the status label.
fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open employee data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match loader::load(&path) {
            Ok(dataset) => {
                log::info!("Loaded {} employees from {}", dataset.len(), path.display());
                state.replace_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

/// Export the filtered rows through a save dialog.
fn save_filtered(state: &mut AppState) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save filtered data")
        .set_file_name("filtered_data.csv")
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };

    match write_export(state, &path) {
        Ok(rows) => {
            log::info!("Exported {rows} rows to {}", path.display());
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn write_export(state: &AppState, path: &Path) -> anyhow::Result<usize> {
    let view = state.view();
    let bytes = pipeline::export_csv(&view)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(view.len())
}
