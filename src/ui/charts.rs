use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot, PlotPoints, Points};

use crate::color::correlation_color;
use crate::data::model::{CategoricalField, NumericField, Record};
use crate::data::pipeline::{self, FilteredView};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart catalogue – one descriptor per dashboard view
// ---------------------------------------------------------------------------

/// What a view renders and which pipeline aggregate feeds it.
pub enum ChartKind {
    /// Grouped bar counts of a categorical field, split by Attrition.
    CategoricalHistogram(CategoricalField),
    /// Grouped bar counts over a numeric x axis, split by Attrition.
    NumericHistogram(NumericField),
    /// Box plot of a numeric field, one box per Attrition value.
    BoxByAttrition(NumericField),
    /// Pearson heatmap over the full dataset (ignores the filters).
    CorrelationHeatmap,
    /// One point per filtered record.
    Scatter {
        x: NumericField,
        y: NumericField,
        color: CategoricalField,
    },
    /// The filtered rows as a striped table.
    Table,
}

pub struct ChartSpec {
    pub title: &'static str,
    pub kind: ChartKind,
}

/// The dashboard's 20 views, rendered by one generic loop instead of one
/// hand-wired call per field.
pub const CHARTS: [ChartSpec; 20] = [
    ChartSpec {
        title: "1. Attrition by Age",
        kind: ChartKind::NumericHistogram(NumericField::Age),
    },
    ChartSpec {
        title: "2. Gender Distribution and Attrition",
        kind: ChartKind::CategoricalHistogram(CategoricalField::Gender),
    },
    ChartSpec {
        title: "3. Department vs Attrition",
        kind: ChartKind::CategoricalHistogram(CategoricalField::Department),
    },
    ChartSpec {
        title: "4. Monthly Income Distribution",
        kind: ChartKind::BoxByAttrition(NumericField::MonthlyIncome),
    },
    ChartSpec {
        title: "5. Attrition by Marital Status",
        kind: ChartKind::CategoricalHistogram(CategoricalField::MaritalStatus),
    },
    ChartSpec {
        title: "6. Job Role vs Attrition",
        kind: ChartKind::CategoricalHistogram(CategoricalField::JobRole),
    },
    ChartSpec {
        title: "7. Overtime Impact on Attrition",
        kind: ChartKind::CategoricalHistogram(CategoricalField::OverTime),
    },
    ChartSpec {
        title: "8. Performance Rating vs Attrition",
        kind: ChartKind::CategoricalHistogram(CategoricalField::PerformanceRating),
    },
    ChartSpec {
        title: "9. Attrition by Work-Life Balance",
        kind: ChartKind::CategoricalHistogram(CategoricalField::WorkLifeBalance),
    },
    ChartSpec {
        title: "10. Years at Company vs Attrition",
        kind: ChartKind::BoxByAttrition(NumericField::YearsAtCompany),
    },
    ChartSpec {
        title: "11. Education Field vs Attrition",
        kind: ChartKind::CategoricalHistogram(CategoricalField::EducationField),
    },
    ChartSpec {
        title: "12. Environment Satisfaction vs Attrition",
        kind: ChartKind::CategoricalHistogram(CategoricalField::EnvironmentSatisfaction),
    },
    ChartSpec {
        title: "13. Attrition by Job Involvement",
        kind: ChartKind::CategoricalHistogram(CategoricalField::JobInvolvement),
    },
    ChartSpec {
        title: "14. Job Level vs Attrition",
        kind: ChartKind::CategoricalHistogram(CategoricalField::JobLevel),
    },
    ChartSpec {
        title: "15. Training Times Last Year",
        kind: ChartKind::NumericHistogram(NumericField::TrainingTimesLastYear),
    },
    ChartSpec {
        title: "16. Correlation Heatmap",
        kind: ChartKind::CorrelationHeatmap,
    },
    ChartSpec {
        title: "17. Age vs Monthly Income Scatterplot",
        kind: ChartKind::Scatter {
            x: NumericField::Age,
            y: NumericField::MonthlyIncome,
            color: CategoricalField::Attrition,
        },
    },
    ChartSpec {
        title: "18. Years with Current Manager vs Attrition",
        kind: ChartKind::BoxByAttrition(NumericField::YearsWithCurrManager),
    },
    ChartSpec {
        title: "19. Total Working Years vs Attrition",
        kind: ChartKind::BoxByAttrition(NumericField::TotalWorkingYears),
    },
    ChartSpec {
        title: "20. Interactive Table View",
        kind: ChartKind::Table,
    },
];

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Generic render loop
// ---------------------------------------------------------------------------

/// Render every catalogue entry against the current filtered view.
pub fn chart_catalogue(ui: &mut Ui, state: &AppState) {
    let view = state.view();
    for spec in &CHARTS {
        ui.heading(spec.title);
        ui.add_space(4.0);
        render_chart(ui, state, &view, spec);
        ui.add_space(16.0);
    }
}

fn render_chart(ui: &mut Ui, state: &AppState, view: &FilteredView<'_>, spec: &ChartSpec) {
    // The heatmap reads the full dataset, so it survives an empty selection.
    if view.is_empty() && !matches!(spec.kind, ChartKind::CorrelationHeatmap) {
        ui.weak("No rows match the current filters.");
        return;
    }

    match spec.kind {
        ChartKind::CategoricalHistogram(field) => {
            categorical_histogram(ui, state, view, field, spec.title)
        }
        ChartKind::NumericHistogram(field) => {
            numeric_histogram(ui, state, view, field, spec.title)
        }
        ChartKind::BoxByAttrition(field) => box_by_attrition(ui, state, view, field, spec.title),
        ChartKind::CorrelationHeatmap => correlation_heatmap(ui, state),
        ChartKind::Scatter { x, y, color } => scatter(ui, state, view, x, y, color, spec.title),
        ChartKind::Table => table_view(ui, view),
    }
}

/// Attrition values present in the full dataset, in sorted order.
fn attrition_values(state: &AppState) -> Vec<String> {
    state
        .dataset
        .distinct
        .get(&CategoricalField::Attrition)
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Grouped bar charts
// ---------------------------------------------------------------------------

fn categorical_histogram(
    ui: &mut Ui,
    state: &AppState,
    view: &FilteredView<'_>,
    field: CategoricalField,
    id: &str,
) {
    let counts = pipeline::grouped_count(view, field, CategoricalField::Attrition);
    let categories: Vec<String> = state
        .dataset
        .distinct
        .get(&field)
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default();
    let splits = attrition_values(state);

    let group_width = 0.8;
    let bar_width = group_width / splits.len().max(1) as f64;
    let mut bar_charts = Vec::new();
    for (si, split) in splits.iter().enumerate() {
        let bars: Vec<Bar> = categories
            .iter()
            .enumerate()
            .map(|(ci, category)| {
                let count = counts
                    .get(&(category.clone(), split.clone()))
                    .copied()
                    .unwrap_or(0);
                let x = ci as f64 - group_width / 2.0 + (si as f64 + 0.5) * bar_width;
                Bar::new(x, count as f64).width(bar_width * 0.9)
            })
            .collect();
        bar_charts.push(
            BarChart::new(bars)
                .name(split)
                .color(state.attrition_colors.color_for(split)),
        );
    }

    let tick_labels = categories.clone();
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(field.name())
        .y_axis_label("count")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_tick(&tick_labels, mark.value)
        })
        .show(ui, |plot_ui| {
            for chart in bar_charts {
                plot_ui.bar_chart(chart);
            }
        });
}

fn numeric_histogram(
    ui: &mut Ui,
    state: &AppState,
    view: &FilteredView<'_>,
    field: NumericField,
    id: &str,
) {
    let counts = pipeline::numeric_grouped_count(view, field, CategoricalField::Attrition);
    let splits = attrition_values(state);
    let bar_width = 0.8 / splits.len().max(1) as f64;

    let mut bar_charts = Vec::new();
    for (si, split) in splits.iter().enumerate() {
        let bars: Vec<Bar> = counts
            .iter()
            .filter(|((_, s), _)| s == split)
            .map(|(&(value, _), &count)| {
                let x = value as f64 - 0.4 + (si as f64 + 0.5) * bar_width;
                Bar::new(x, count as f64).width(bar_width * 0.9)
            })
            .collect();
        bar_charts.push(
            BarChart::new(bars)
                .name(split)
                .color(state.attrition_colors.color_for(split)),
        );
    }

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(field.name())
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            for chart in bar_charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Label integer grid marks with the category at that index.
fn category_tick(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-3 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Box plots
// ---------------------------------------------------------------------------

fn box_by_attrition(
    ui: &mut Ui,
    state: &AppState,
    view: &FilteredView<'_>,
    field: NumericField,
    id: &str,
) {
    let summaries = pipeline::grouped_numeric_summary(view, field, CategoricalField::Attrition);
    let splits: Vec<String> = summaries.keys().cloned().collect();

    let mut box_plots = Vec::new();
    for (i, split) in splits.iter().enumerate() {
        let s = &summaries[split];
        let elem = BoxElem::new(i as f64, BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max))
            .box_width(0.5);
        box_plots.push(
            BoxPlot::new(vec![elem])
                .name(split)
                .color(state.attrition_colors.color_for(split)),
        );
    }

    let tick_labels = splits.clone();
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Attrition")
        .y_axis_label(field.name())
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_tick(&tick_labels, mark.value)
        })
        .show(ui, |plot_ui| {
            for plot in box_plots {
                plot_ui.box_plot(plot);
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

fn correlation_heatmap(ui: &mut Ui, state: &AppState) {
    let matrix = &state.correlation;
    ui.weak("Computed from the full dataset; sidebar filters do not apply.");
    ui.add_space(4.0);

    egui::Grid::new("correlation_heatmap")
        .spacing([2.0, 2.0])
        .show(ui, |ui| {
            ui.label("");
            for label in &matrix.labels {
                ui.label(RichText::new(*label).small());
            }
            ui.end_row();

            for i in 0..matrix.len() {
                ui.label(RichText::new(matrix.labels[i]).small());
                for j in 0..matrix.len() {
                    let r = matrix.get(i, j);
                    let text = if r.is_nan() {
                        "NaN".to_string()
                    } else {
                        format!("{r:.1}")
                    };
                    heatmap_cell(ui, correlation_color(r), &text);
                }
                ui.end_row();
            }
        });
}

fn heatmap_cell(ui: &mut Ui, fill: Color32, text: &str) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(46.0, 22.0), Sense::hover());
    ui.painter()
        .rect_filled(rect, egui::CornerRadius::same(2), fill);
    let luminance = fill.r() as u16 + fill.g() as u16 + fill.b() as u16;
    let text_color = if luminance > 380 {
        Color32::BLACK
    } else {
        Color32::WHITE
    };
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        text,
        FontId::proportional(10.0),
        text_color,
    );
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

fn scatter(
    ui: &mut Ui,
    state: &AppState,
    view: &FilteredView<'_>,
    x: NumericField,
    y: NumericField,
    color: CategoricalField,
    id: &str,
) {
    let pairs = pipeline::pair_extract(view, x, y, color);
    let mut by_category: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for (px, py, category) in pairs {
        by_category.entry(category).or_default().push([px, py]);
    }

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x.name())
        .y_axis_label(y.name())
        .show(ui, |plot_ui| {
            for (category, points) in by_category {
                let color = state.attrition_colors.color_for(&category);
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(&category)
                        .color(color)
                        .radius(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Filtered-row table
// ---------------------------------------------------------------------------

fn table_view(ui: &mut Ui, view: &FilteredView<'_>) {
    let columns = &view.dataset().columns;
    let records: Vec<&Record> = view.records().collect();

    ui.allocate_ui(egui::vec2(ui.available_width(), 340.0), |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(true)
            .columns(Column::auto().resizable(true), columns.len())
            .header(20.0, |mut header| {
                for field in columns {
                    header.col(|ui| {
                        ui.strong(field.name());
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, records.len(), |mut row| {
                    let record = records[row.index()];
                    for &field in columns {
                        row.col(|ui| {
                            ui.label(record.cell(field));
                        });
                    }
                });
            });
    });
}
