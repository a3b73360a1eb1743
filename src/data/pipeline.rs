use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};

use super::model::{CategoricalField, Dataset, NumericField, Record, CORRELATION_COLUMNS};

// ---------------------------------------------------------------------------
// Filter selection over the governed fields
// ---------------------------------------------------------------------------

/// The three categorical fields exposed as sidebar filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GovernedField {
    Department,
    Gender,
    OverTime,
}

impl GovernedField {
    pub const ALL: [GovernedField; 3] = [
        GovernedField::Department,
        GovernedField::Gender,
        GovernedField::OverTime,
    ];

    pub fn categorical(self) -> CategoricalField {
        match self {
            GovernedField::Department => CategoricalField::Department,
            GovernedField::Gender => CategoricalField::Gender,
            GovernedField::OverTime => CategoricalField::OverTime,
        }
    }

    /// Sidebar widget label.
    pub fn label(self) -> &'static str {
        match self {
            GovernedField::Department => "Select Department:",
            GovernedField::Gender => "Select Gender:",
            GovernedField::OverTime => "OverTime Status:",
        }
    }
}

/// Per-field allowed-value sets. A record passes only if its value for
/// every governed field is in the corresponding set, so an empty set
/// excludes all records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub department: BTreeSet<String>,
    pub gender: BTreeSet<String>,
    pub overtime: BTreeSet<String>,
}

impl FilterSelection {
    /// Every distinct value selected for every governed field (the default
    /// state: nothing filtered out).
    pub fn all(dataset: &Dataset) -> Self {
        let full = |field: GovernedField| {
            dataset
                .distinct
                .get(&field.categorical())
                .cloned()
                .unwrap_or_default()
        };
        FilterSelection {
            department: full(GovernedField::Department),
            gender: full(GovernedField::Gender),
            overtime: full(GovernedField::OverTime),
        }
    }

    pub fn set(&self, field: GovernedField) -> &BTreeSet<String> {
        match field {
            GovernedField::Department => &self.department,
            GovernedField::Gender => &self.gender,
            GovernedField::OverTime => &self.overtime,
        }
    }

    pub fn set_mut(&mut self, field: GovernedField) -> &mut BTreeSet<String> {
        match field {
            GovernedField::Department => &mut self.department,
            GovernedField::Gender => &mut self.gender,
            GovernedField::OverTime => &mut self.overtime,
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of records passing all three governed-field filters,
/// in dataset order. A value absent from the dataset simply never matches.
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            GovernedField::ALL.iter().all(|&field| {
                selection
                    .set(field)
                    .contains(record.categorical(field.categorical()).as_ref())
            })
        })
        .map(|(i, _)| i)
        .collect()
}

/// A stable, order-preserving subsequence of the dataset. Borrowed and
/// rebuilt per render pass; never mutated in place.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: &'a [usize],
}

impl<'a> FilteredView<'a> {
    pub fn new(dataset: &'a Dataset, indices: &'a [usize]) -> Self {
        FilteredView { dataset, indices }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.indices.iter().map(|&i| &self.dataset.records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Grouped counts (histogram views)
// ---------------------------------------------------------------------------

/// Count records per (group value, split value) pair. Sparse: a pair that
/// never occurs has no key, and readers treat a missing key as zero.
pub fn grouped_count(
    view: &FilteredView<'_>,
    group: CategoricalField,
    split: CategoricalField,
) -> BTreeMap<(String, String), usize> {
    let mut counts = BTreeMap::new();
    for record in view.records() {
        let key = (
            record.categorical(group).into_owned(),
            record.categorical(split).into_owned(),
        );
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Numeric-x variant for the histogram views whose x axis is a numeric
/// field (Age, TrainingTimesLastYear). Keys are the rounded integer value,
/// which for this all-integer dataset is the value itself.
pub fn numeric_grouped_count(
    view: &FilteredView<'_>,
    field: NumericField,
    split: CategoricalField,
) -> BTreeMap<(i64, String), usize> {
    let mut counts = BTreeMap::new();
    for record in view.records() {
        let key = (
            record.numeric(field).round() as i64,
            record.categorical(split).into_owned(),
        );
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Grouped five-number summaries (box views)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Five-number summary of a numeric field per split-group. Quantiles use
/// linear (type-7) interpolation throughout; a single-record group yields
/// five equal statistics.
pub fn grouped_numeric_summary(
    view: &FilteredView<'_>,
    field: NumericField,
    split: CategoricalField,
) -> BTreeMap<String, FiveNumberSummary> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in view.records() {
        groups
            .entry(record.categorical(split).into_owned())
            .or_default()
            .push(record.numeric(field));
    }

    groups
        .into_iter()
        .map(|(split_value, mut values)| {
            values.sort_by(f64::total_cmp);
            let summary = FiveNumberSummary {
                min: values[0],
                q1: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                q3: quantile(&values, 0.75),
                max: values[values.len() - 1],
            };
            (split_value, summary)
        })
        .collect()
}

/// Linear-interpolation quantile of an ascending-sorted, non-empty slice.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

// ---------------------------------------------------------------------------
// Correlation matrix (heatmap view)
// ---------------------------------------------------------------------------

/// Pearson correlations over the correlation columns of the full dataset.
/// Symmetric, diagonal 1.0, NaN where a column has zero variance.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub labels: Vec<&'static str>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Compute the correlation matrix from the *unfiltered* dataset. The
/// heatmap deliberately ignores the sidebar filters, matching the
/// reference dashboard; its input never changes, so the caller computes
/// this once per session.
pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let columns: Vec<Vec<f64>> = CORRELATION_COLUMNS
        .iter()
        .map(|(_, extract)| dataset.records.iter().map(|r| extract(r)).collect())
        .collect();
    let labels: Vec<&'static str> = CORRELATION_COLUMNS.iter().map(|(name, _)| *name).collect();

    let n = columns.len();
    let mut values = vec![vec![0.0; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&columns[i], &columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix { labels, values }
}

/// Pearson correlation coefficient. NaN for empty input or when either
/// column has zero variance; otherwise clamped against float drift.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    if x.is_empty() {
        return f64::NAN;
    }
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        f64::NAN
    } else {
        (cov / denominator).clamp(-1.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Pair extraction (scatter view)
// ---------------------------------------------------------------------------

/// Project each record to (x, y, color category), in view order. Pure
/// passthrough, no aggregation.
pub fn pair_extract(
    view: &FilteredView<'_>,
    x: NumericField,
    y: NumericField,
    color: CategoricalField,
) -> Vec<(f64, f64, String)> {
    view.records()
        .map(|record| {
            (
                record.numeric(x),
                record.numeric(y),
                record.categorical(color).into_owned(),
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV export (download view)
// ---------------------------------------------------------------------------

/// Serialize the view to CSV bytes, header in the source column order.
/// Output parses back through the loader to the same records.
pub fn export_csv(view: &FilteredView<'_>) -> Result<Vec<u8>> {
    let columns = &view.dataset().columns;
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(columns.iter().map(|f| f.name()))
        .context("writing CSV header")?;
    for record in view.records() {
        writer
            .write_record(columns.iter().map(|&f| record.cell(f)))
            .context("writing CSV row")?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("finalizing CSV: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    const HEADER: &str = "Age,Attrition,Department,EducationField,EnvironmentSatisfaction,\
Gender,JobInvolvement,JobLevel,JobRole,MaritalStatus,MonthlyIncome,OverTime,\
PerformanceRating,TotalWorkingYears,TrainingTimesLastYear,WorkLifeBalance,\
YearsAtCompany,YearsWithCurrManager";

    /// Three records: Sales/M/Yes leaver, Sales/F/No stayer, R&D/M/No stayer.
    fn tiny_dataset() -> Dataset {
        let csv = format!(
            "{HEADER}\n\
             30,Yes,Sales,Marketing,2,Male,3,1,Sales Executive,Single,4500,Yes,3,5,2,1,2,1\n\
             35,No,Sales,Marketing,3,Female,2,2,Sales Executive,Married,5200,No,3,8,2,3,4,2\n\
             40,No,Research & Development,Life Sciences,4,Male,3,3,Research Scientist,Married,7100,No,4,12,2,2,9,5\n"
        );
        read_csv(csv.as_bytes()).unwrap()
    }

    fn select(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn full_selection_is_identity() {
        let ds = tiny_dataset();
        let indices = filtered_indices(&ds, &FilterSelection::all(&ds));
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn filter_is_a_stable_subsequence() {
        let ds = tiny_dataset();
        let mut selection = FilterSelection::all(&ds);
        selection.gender = select(&["Male"]);
        let indices = filtered_indices(&ds, &selection);
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn empty_component_excludes_everything() {
        let ds = tiny_dataset();
        let mut selection = FilterSelection::all(&ds);
        selection.overtime = BTreeSet::new();
        assert!(filtered_indices(&ds, &selection).is_empty());
    }

    #[test]
    fn unknown_values_never_match() {
        let ds = tiny_dataset();
        let mut selection = FilterSelection::all(&ds);
        selection.department = select(&["Quality Assurance"]);
        assert!(filtered_indices(&ds, &selection).is_empty());
    }

    #[test]
    fn grouped_count_matches_department_split() {
        let ds = tiny_dataset();
        let mut selection = FilterSelection::all(&ds);
        selection.department = select(&["Sales"]);
        let indices = filtered_indices(&ds, &selection);
        let view = FilteredView::new(&ds, &indices);

        let counts = grouped_count(&view, CategoricalField::Department, CategoricalField::Attrition);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&("Sales".to_string(), "Yes".to_string())], 1);
        assert_eq!(counts[&("Sales".to_string(), "No".to_string())], 1);
    }

    #[test]
    fn grouped_counts_sum_to_view_len() {
        let ds = tiny_dataset();
        let indices = filtered_indices(&ds, &FilterSelection::all(&ds));
        let view = FilteredView::new(&ds, &indices);
        for group in CategoricalField::ALL {
            let counts = grouped_count(&view, group, CategoricalField::Attrition);
            assert_eq!(counts.values().sum::<usize>(), view.len());
        }
    }

    #[test]
    fn numeric_grouped_count_keys_by_value() {
        let ds = tiny_dataset();
        let indices = filtered_indices(&ds, &FilterSelection::all(&ds));
        let view = FilteredView::new(&ds, &indices);
        let counts = numeric_grouped_count(&view, NumericField::Age, CategoricalField::Attrition);
        assert_eq!(counts[&(30, "Yes".to_string())], 1);
        assert_eq!(counts[&(40, "No".to_string())], 1);
    }

    #[test]
    fn single_record_group_degenerates_to_one_value() {
        let ds = tiny_dataset();
        let indices = filtered_indices(&ds, &FilterSelection::all(&ds));
        let view = FilteredView::new(&ds, &indices);
        let summaries =
            grouped_numeric_summary(&view, NumericField::MonthlyIncome, CategoricalField::Attrition);
        let yes = &summaries["Yes"];
        assert_eq!(yes.min, 4500.0);
        assert_eq!(yes.q1, 4500.0);
        assert_eq!(yes.median, 4500.0);
        assert_eq!(yes.q3, 4500.0);
        assert_eq!(yes.max, 4500.0);
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.25), 1.75);
        assert_eq!(quantile(&sorted, 0.5), 2.5);
        assert_eq!(quantile(&sorted, 0.75), 3.25);
    }

    #[test]
    fn empty_view_yields_empty_aggregates() {
        let ds = tiny_dataset();
        let indices: Vec<usize> = Vec::new();
        let view = FilteredView::new(&ds, &indices);
        assert!(grouped_count(&view, CategoricalField::Gender, CategoricalField::Attrition).is_empty());
        assert!(
            grouped_numeric_summary(&view, NumericField::Age, CategoricalField::Attrition).is_empty()
        );
        assert!(pair_extract(
            &view,
            NumericField::Age,
            NumericField::MonthlyIncome,
            CategoricalField::Attrition
        )
        .is_empty());
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let ds = tiny_dataset();
        let matrix = correlation_matrix(&ds);
        assert_eq!(matrix.len(), CORRELATION_COLUMNS.len());
        for i in 0..matrix.len() {
            assert_eq!(matrix.get(i, i), 1.0);
            for j in 0..matrix.len() {
                let r = matrix.get(i, j);
                assert_eq!(r.is_nan(), matrix.get(j, i).is_nan());
                if !r.is_nan() {
                    assert_eq!(r, matrix.get(j, i));
                    assert!((-1.0..=1.0).contains(&r));
                }
            }
        }
    }

    #[test]
    fn zero_variance_column_correlates_as_nan() {
        // TrainingTimesLastYear is constant in the tiny dataset.
        let ds = tiny_dataset();
        let matrix = correlation_matrix(&ds);
        let idx = matrix
            .labels
            .iter()
            .position(|&l| l == "TrainingTimesLastYear")
            .unwrap();
        assert_eq!(matrix.get(idx, idx), 1.0);
        assert!(matrix.get(idx, 0).is_nan());
    }

    #[test]
    fn pair_extract_preserves_view_order() {
        let ds = tiny_dataset();
        let indices = filtered_indices(&ds, &FilterSelection::all(&ds));
        let view = FilteredView::new(&ds, &indices);
        let pairs = pair_extract(
            &view,
            NumericField::Age,
            NumericField::MonthlyIncome,
            CategoricalField::Attrition,
        );
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], (30.0, 4500.0, "Yes".to_string()));
        assert_eq!(pairs[2], (40.0, 7100.0, "No".to_string()));
    }

    #[test]
    fn export_round_trips_through_the_loader() {
        let ds = tiny_dataset();
        let mut selection = FilterSelection::all(&ds);
        selection.department = select(&["Sales"]);
        let indices = filtered_indices(&ds, &selection);
        let view = FilteredView::new(&ds, &indices);

        let bytes = export_csv(&view).unwrap();
        let reloaded = read_csv(bytes.as_slice()).unwrap();

        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.columns, ds.columns);
        let expected: Vec<_> = view.records().cloned().collect();
        assert_eq!(reloaded.records, expected);
    }
}
