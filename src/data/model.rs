use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Schema – the fixed column set of the employee dataset
// ---------------------------------------------------------------------------

/// Categorical attributes. The five survey scales (1..=5 integers in the
/// source file) group like categories but also feed the correlation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoricalField {
    Department,
    Gender,
    OverTime,
    MaritalStatus,
    JobRole,
    EducationField,
    PerformanceRating,
    WorkLifeBalance,
    EnvironmentSatisfaction,
    JobInvolvement,
    JobLevel,
    Attrition,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 12] = [
        CategoricalField::Department,
        CategoricalField::Gender,
        CategoricalField::OverTime,
        CategoricalField::MaritalStatus,
        CategoricalField::JobRole,
        CategoricalField::EducationField,
        CategoricalField::PerformanceRating,
        CategoricalField::WorkLifeBalance,
        CategoricalField::EnvironmentSatisfaction,
        CategoricalField::JobInvolvement,
        CategoricalField::JobLevel,
        CategoricalField::Attrition,
    ];

    /// Column name as it appears in the CSV header.
    pub fn name(self) -> &'static str {
        match self {
            CategoricalField::Department => "Department",
            CategoricalField::Gender => "Gender",
            CategoricalField::OverTime => "OverTime",
            CategoricalField::MaritalStatus => "MaritalStatus",
            CategoricalField::JobRole => "JobRole",
            CategoricalField::EducationField => "EducationField",
            CategoricalField::PerformanceRating => "PerformanceRating",
            CategoricalField::WorkLifeBalance => "WorkLifeBalance",
            CategoricalField::EnvironmentSatisfaction => "EnvironmentSatisfaction",
            CategoricalField::JobInvolvement => "JobInvolvement",
            CategoricalField::JobLevel => "JobLevel",
            CategoricalField::Attrition => "Attrition",
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericField {
    Age,
    MonthlyIncome,
    YearsAtCompany,
    YearsWithCurrManager,
    TotalWorkingYears,
    TrainingTimesLastYear,
}

impl NumericField {
    pub const ALL: [NumericField; 6] = [
        NumericField::Age,
        NumericField::MonthlyIncome,
        NumericField::YearsAtCompany,
        NumericField::YearsWithCurrManager,
        NumericField::TotalWorkingYears,
        NumericField::TrainingTimesLastYear,
    ];

    /// Column name as it appears in the CSV header.
    pub fn name(self) -> &'static str {
        match self {
            NumericField::Age => "Age",
            NumericField::MonthlyIncome => "MonthlyIncome",
            NumericField::YearsAtCompany => "YearsAtCompany",
            NumericField::YearsWithCurrManager => "YearsWithCurrManager",
            NumericField::TotalWorkingYears => "TotalWorkingYears",
            NumericField::TrainingTimesLastYear => "TrainingTimesLastYear",
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Any schema column, tagged by semantic class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Categorical(CategoricalField),
    Numeric(NumericField),
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Categorical(c) => c.name(),
            Field::Numeric(n) => n.name(),
        }
    }

    /// Resolve a CSV header name to a schema column, if it is one.
    pub fn from_name(name: &str) -> Option<Field> {
        CategoricalField::ALL
            .into_iter()
            .map(Field::Categorical)
            .chain(NumericField::ALL.into_iter().map(Field::Numeric))
            .find(|f| f.name() == name)
    }
}

// ---------------------------------------------------------------------------
// Record – one employee (one CSV row)
// ---------------------------------------------------------------------------

/// A single employee row. Free-text categoricals are `String`s, the survey
/// scales small integers, numerics `f64` (the source holds both ints and
/// floats). Rows carry no identifier; they are positionally distinct.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub department: String,
    pub gender: String,
    pub over_time: String,
    pub marital_status: String,
    pub job_role: String,
    pub education_field: String,
    pub attrition: String,
    pub performance_rating: u8,
    pub work_life_balance: u8,
    pub environment_satisfaction: u8,
    pub job_involvement: u8,
    pub job_level: u8,
    pub age: f64,
    pub monthly_income: f64,
    pub years_at_company: f64,
    pub years_with_curr_manager: f64,
    pub total_working_years: f64,
    pub training_times_last_year: f64,
}

impl Record {
    /// Categorical cell value. Survey scales render as their integer token,
    /// so grouping and filtering see the same text the CSV holds.
    pub fn categorical(&self, field: CategoricalField) -> Cow<'_, str> {
        match field {
            CategoricalField::Department => Cow::Borrowed(self.department.as_str()),
            CategoricalField::Gender => Cow::Borrowed(self.gender.as_str()),
            CategoricalField::OverTime => Cow::Borrowed(self.over_time.as_str()),
            CategoricalField::MaritalStatus => Cow::Borrowed(self.marital_status.as_str()),
            CategoricalField::JobRole => Cow::Borrowed(self.job_role.as_str()),
            CategoricalField::EducationField => Cow::Borrowed(self.education_field.as_str()),
            CategoricalField::Attrition => Cow::Borrowed(self.attrition.as_str()),
            CategoricalField::PerformanceRating => Cow::Owned(self.performance_rating.to_string()),
            CategoricalField::WorkLifeBalance => Cow::Owned(self.work_life_balance.to_string()),
            CategoricalField::EnvironmentSatisfaction => {
                Cow::Owned(self.environment_satisfaction.to_string())
            }
            CategoricalField::JobInvolvement => Cow::Owned(self.job_involvement.to_string()),
            CategoricalField::JobLevel => Cow::Owned(self.job_level.to_string()),
        }
    }

    /// Numeric cell value.
    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Age => self.age,
            NumericField::MonthlyIncome => self.monthly_income,
            NumericField::YearsAtCompany => self.years_at_company,
            NumericField::YearsWithCurrManager => self.years_with_curr_manager,
            NumericField::TotalWorkingYears => self.total_working_years,
            NumericField::TrainingTimesLastYear => self.training_times_last_year,
        }
    }

    /// Cell rendered back to CSV text.
    pub fn cell(&self, field: Field) -> String {
        match field {
            Field::Categorical(c) => self.categorical(c).into_owned(),
            Field::Numeric(n) => format_number(self.numeric(n)),
        }
    }
}

/// Format a numeric cell the way the source file writes it: integer-valued
/// floats lose the trailing `.0` so an export parses back to the same record.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

/// Columns feeding the correlation heatmap: the numeric attributes plus the
/// integer survey scales (what `corr(numeric_only=True)` saw upstream).
pub const CORRELATION_COLUMNS: [(&str, fn(&Record) -> f64); 11] = [
    ("Age", |r: &Record| r.age),
    ("MonthlyIncome", |r: &Record| r.monthly_income),
    ("YearsAtCompany", |r: &Record| r.years_at_company),
    ("YearsWithCurrManager", |r: &Record| r.years_with_curr_manager),
    ("TotalWorkingYears", |r: &Record| r.total_working_years),
    ("TrainingTimesLastYear", |r: &Record| r.training_times_last_year),
    ("PerformanceRating", |r: &Record| r.performance_rating as f64),
    ("WorkLifeBalance", |r: &Record| r.work_life_balance as f64),
    ("EnvironmentSatisfaction", |r: &Record| {
        r.environment_satisfaction as f64
    }),
    ("JobInvolvement", |r: &Record| r.job_involvement as f64),
    ("JobLevel", |r: &Record| r.job_level as f64),
];

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable after load; shared read-only with the
/// session state and the pipeline.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All rows, in source order.
    pub records: Vec<Record>,
    /// Schema columns in their source-file order (drives CSV export).
    pub columns: Vec<Field>,
    /// Sorted distinct values per categorical field.
    pub distinct: BTreeMap<CategoricalField, BTreeSet<String>>,
}

impl Dataset {
    /// Build the distinct-value index from the loaded rows.
    pub fn from_records(records: Vec<Record>, columns: Vec<Field>) -> Self {
        let mut distinct: BTreeMap<CategoricalField, BTreeSet<String>> = BTreeMap::new();
        for field in CategoricalField::ALL {
            let values = records
                .iter()
                .map(|r| r.categorical(field).into_owned())
                .collect();
            distinct.insert(field, values);
        }
        Dataset {
            records,
            columns,
            distinct,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Record {
        Record {
            department: "Sales".into(),
            gender: "Female".into(),
            over_time: "Yes".into(),
            marital_status: "Single".into(),
            job_role: "Sales Executive".into(),
            education_field: "Marketing".into(),
            attrition: "No".into(),
            performance_rating: 3,
            work_life_balance: 2,
            environment_satisfaction: 4,
            job_involvement: 3,
            job_level: 2,
            age: 34.0,
            monthly_income: 5200.0,
            years_at_company: 6.0,
            years_with_curr_manager: 3.0,
            total_working_years: 9.0,
            training_times_last_year: 2.0,
        }
    }

    #[test]
    fn field_names_round_trip() {
        for field in CategoricalField::ALL.into_iter().map(Field::Categorical) {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        for field in NumericField::ALL.into_iter().map(Field::Numeric) {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert_eq!(Field::from_name("EmployeeNumber"), None);
    }

    #[test]
    fn survey_scales_group_as_text() {
        let r = sample_record();
        assert_eq!(r.categorical(CategoricalField::WorkLifeBalance), "2");
        assert_eq!(r.categorical(CategoricalField::Department), "Sales");
    }

    #[test]
    fn integer_valued_cells_lose_trailing_zero() {
        let r = sample_record();
        assert_eq!(r.cell(Field::Numeric(NumericField::MonthlyIncome)), "5200");
        assert_eq!(format_number(3.5), "3.5");
    }

    #[test]
    fn distinct_index_covers_all_categoricals() {
        let ds = Dataset::from_records(vec![sample_record()], Vec::new());
        assert_eq!(ds.len(), 1);
        assert!(ds.distinct[&CategoricalField::Department].contains("Sales"));
        assert!(ds.distinct[&CategoricalField::JobLevel].contains("2"));
    }
}
