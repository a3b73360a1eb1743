use std::collections::BTreeSet;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::model::{CategoricalField, Dataset};
use crate::data::pipeline::{
    self, CorrelationMatrix, FilterSelection, FilteredView, GovernedField,
};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// One interactive session, independent of rendering. The dataset handle is
/// constructed in `main` and injected; the selection and the cached visible
/// indices are session-local.
pub struct AppState {
    /// Loaded dataset, shared read-only.
    pub dataset: Arc<Dataset>,

    /// Allowed values per governed field.
    pub selection: FilterSelection,

    /// Indices of records passing the current selection (cached).
    pub visible_indices: Vec<usize>,

    /// Computed once per dataset; the heatmap ignores the filters, so its
    /// input never changes within a session.
    pub correlation: CorrelationMatrix,

    /// Attrition value → colour, shared by every split view.
    pub attrition_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Start a session over a freshly loaded dataset: everything selected,
    /// all rows visible.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let selection = FilterSelection::all(&dataset);
        let visible_indices = (0..dataset.len()).collect();
        let correlation = pipeline::correlation_matrix(&dataset);
        let empty = BTreeSet::new();
        let attrition_colors = ColorMap::new(
            dataset
                .distinct
                .get(&CategoricalField::Attrition)
                .unwrap_or(&empty),
        );
        AppState {
            dataset,
            selection,
            visible_indices,
            correlation,
            attrition_colors,
            status_message: None,
        }
    }

    /// Swap in a different dataset (File → Open…), resetting the session.
    pub fn replace_dataset(&mut self, dataset: Dataset) {
        *self = AppState::new(Arc::new(dataset));
    }

    /// The current filtered view, borrowing the cached indices.
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::new(&self.dataset, &self.visible_indices)
    }

    /// Recompute `visible_indices` after a selection change.
    pub fn refilter(&mut self) {
        self.visible_indices = pipeline::filtered_indices(&self.dataset, &self.selection);
    }

    /// Toggle a single value in a governed field's selection.
    pub fn toggle_filter_value(&mut self, field: GovernedField, value: &str) {
        let selected = self.selection.set_mut(field);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select every distinct value of a governed field.
    pub fn select_all(&mut self, field: GovernedField) {
        *self.selection.set_mut(field) = self
            .dataset
            .distinct
            .get(&field.categorical())
            .cloned()
            .unwrap_or_default();
        self.refilter();
    }

    /// Clear a governed field's selection (hides every row).
    pub fn select_none(&mut self, field: GovernedField) {
        self.selection.set_mut(field).clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    fn session() -> AppState {
        let csv = "Age,Attrition,Department,EducationField,EnvironmentSatisfaction,\
Gender,JobInvolvement,JobLevel,JobRole,MaritalStatus,MonthlyIncome,OverTime,\
PerformanceRating,TotalWorkingYears,TrainingTimesLastYear,WorkLifeBalance,\
YearsAtCompany,YearsWithCurrManager\n\
30,Yes,Sales,Marketing,2,Male,3,1,Sales Executive,Single,4500,Yes,3,5,2,1,2,1\n\
35,No,Sales,Marketing,3,Female,2,2,Sales Executive,Married,5200,No,3,8,2,3,4,2\n";
        AppState::new(Arc::new(read_csv(csv.as_bytes()).unwrap()))
    }

    #[test]
    fn new_session_shows_everything() {
        let state = session();
        assert_eq!(state.visible_indices, vec![0, 1]);
        assert_eq!(state.selection.gender.len(), 2);
    }

    #[test]
    fn toggling_a_value_refilters() {
        let mut state = session();
        state.toggle_filter_value(GovernedField::Gender, "Male");
        assert_eq!(state.visible_indices, vec![1]);
        state.toggle_filter_value(GovernedField::Gender, "Male");
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn select_none_then_all_round_trips() {
        let mut state = session();
        state.select_none(GovernedField::Department);
        assert!(state.visible_indices.is_empty());
        assert!(state.view().is_empty());
        state.select_all(GovernedField::Department);
        assert_eq!(state.visible_indices, vec![0, 1]);
    }
}
