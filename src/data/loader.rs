use std::io;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use thiserror::Error;

use super::model::{Dataset, Field, Record};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Loader failure. Fatal to the session: there is no partial dashboard.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("opening {path}: {source}")]
    Open {
        path: PathBuf,
        source: io::Error,
    },
    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing expected column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}, column '{column}': '{value}' is not a valid {expected}")]
    BadCell {
        row: usize,
        column: &'static str,
        value: String,
        expected: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the employee dataset from a CSV file.
///
/// Read-only and idempotent with respect to the source. The caller loads
/// once per process (see `main`) and shares the `Dataset` read-only; there
/// is no hidden global cache.
pub fn load(path: &Path) -> Result<Dataset, DataSourceError> {
    let file = std::fs::File::open(path).map_err(|source| DataSourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file)
}

/// Parse a CSV byte stream into a [`Dataset`].
///
/// Expects one header row naming every schema column. Columns outside the
/// schema are ignored; a missing schema column or a non-numeric token in a
/// numeric column is a [`DataSourceError`].
pub fn read_csv<R: io::Read>(input: R) -> Result<Dataset, DataSourceError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    // Schema columns in their source order, for export later.
    let columns: Vec<Field> = headers.iter().filter_map(|h| Field::from_name(h)).collect();
    let index = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        records.push(index.parse_row(&record, row)?);
    }

    Ok(Dataset::from_records(records, columns))
}

// ---------------------------------------------------------------------------
// Column resolution and row parsing
// ---------------------------------------------------------------------------

/// Header position of every schema column.
struct ColumnIndex {
    department: usize,
    gender: usize,
    over_time: usize,
    marital_status: usize,
    job_role: usize,
    education_field: usize,
    attrition: usize,
    performance_rating: usize,
    work_life_balance: usize,
    environment_satisfaction: usize,
    job_involvement: usize,
    job_level: usize,
    age: usize,
    monthly_income: usize,
    years_at_company: usize,
    years_with_curr_manager: usize,
    total_working_years: usize,
    training_times_last_year: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self, DataSourceError> {
        let position = |name: &'static str| -> Result<usize, DataSourceError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(DataSourceError::MissingColumn(name))
        };
        Ok(ColumnIndex {
            department: position("Department")?,
            gender: position("Gender")?,
            over_time: position("OverTime")?,
            marital_status: position("MaritalStatus")?,
            job_role: position("JobRole")?,
            education_field: position("EducationField")?,
            attrition: position("Attrition")?,
            performance_rating: position("PerformanceRating")?,
            work_life_balance: position("WorkLifeBalance")?,
            environment_satisfaction: position("EnvironmentSatisfaction")?,
            job_involvement: position("JobInvolvement")?,
            job_level: position("JobLevel")?,
            age: position("Age")?,
            monthly_income: position("MonthlyIncome")?,
            years_at_company: position("YearsAtCompany")?,
            years_with_curr_manager: position("YearsWithCurrManager")?,
            total_working_years: position("TotalWorkingYears")?,
            training_times_last_year: position("TrainingTimesLastYear")?,
        })
    }

    fn parse_row(&self, record: &StringRecord, row: usize) -> Result<Record, DataSourceError> {
        let text = |pos: usize| record.get(pos).unwrap_or("").trim().to_string();
        Ok(Record {
            department: text(self.department),
            gender: text(self.gender),
            over_time: text(self.over_time),
            marital_status: text(self.marital_status),
            job_role: text(self.job_role),
            education_field: text(self.education_field),
            attrition: text(self.attrition),
            performance_rating: parse_scale(record, self.performance_rating, "PerformanceRating", row)?,
            work_life_balance: parse_scale(record, self.work_life_balance, "WorkLifeBalance", row)?,
            environment_satisfaction: parse_scale(
                record,
                self.environment_satisfaction,
                "EnvironmentSatisfaction",
                row,
            )?,
            job_involvement: parse_scale(record, self.job_involvement, "JobInvolvement", row)?,
            job_level: parse_scale(record, self.job_level, "JobLevel", row)?,
            age: parse_number(record, self.age, "Age", row)?,
            monthly_income: parse_number(record, self.monthly_income, "MonthlyIncome", row)?,
            years_at_company: parse_number(record, self.years_at_company, "YearsAtCompany", row)?,
            years_with_curr_manager: parse_number(
                record,
                self.years_with_curr_manager,
                "YearsWithCurrManager",
                row,
            )?,
            total_working_years: parse_number(
                record,
                self.total_working_years,
                "TotalWorkingYears",
                row,
            )?,
            training_times_last_year: parse_number(
                record,
                self.training_times_last_year,
                "TrainingTimesLastYear",
                row,
            )?,
        })
    }
}

fn parse_number(
    record: &StringRecord,
    pos: usize,
    column: &'static str,
    row: usize,
) -> Result<f64, DataSourceError> {
    let raw = record.get(pos).unwrap_or("").trim();
    raw.parse::<f64>().map_err(|_| DataSourceError::BadCell {
        row,
        column,
        value: raw.to_string(),
        expected: "number",
    })
}

fn parse_scale(
    record: &StringRecord,
    pos: usize,
    column: &'static str,
    row: usize,
) -> Result<u8, DataSourceError> {
    let raw = record.get(pos).unwrap_or("").trim();
    raw.parse::<u8>().map_err(|_| DataSourceError::BadCell {
        row,
        column,
        value: raw.to_string(),
        expected: "integer",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CategoricalField, NumericField};

    const HEADER: &str = "Age,Attrition,Department,EducationField,EnvironmentSatisfaction,\
Gender,JobInvolvement,JobLevel,JobRole,MaritalStatus,MonthlyIncome,OverTime,\
PerformanceRating,TotalWorkingYears,TrainingTimesLastYear,WorkLifeBalance,\
YearsAtCompany,YearsWithCurrManager";

    fn sample_csv() -> String {
        format!(
            "{HEADER}\n\
             41,Yes,Sales,Life Sciences,2,Female,3,2,Sales Executive,Single,5993,Yes,3,8,0,1,6,5\n\
             49,No,Research & Development,Life Sciences,3,Male,2,2,Research Scientist,Married,5130,No,4,10,3,3,10,7\n"
        )
    }

    #[test]
    fn loads_well_formed_csv() {
        let ds = read_csv(sample_csv().as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].department, "Sales");
        assert_eq!(ds.records[1].numeric(NumericField::MonthlyIncome), 5130.0);
        assert_eq!(ds.records[0].performance_rating, 3);
        // Column order follows the file header.
        assert_eq!(ds.columns.len(), 18);
        assert_eq!(ds.columns[0].name(), "Age");
        assert_eq!(ds.columns[1].name(), "Attrition");
        let genders = &ds.distinct[&CategoricalField::Gender];
        assert_eq!(genders.len(), 2);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = format!(
            "EmployeeNumber,{HEADER}\n\
             1,41,Yes,Sales,Life Sciences,2,Female,3,2,Sales Executive,Single,5993,Yes,3,8,0,1,6,5\n"
        );
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.columns.len(), 18);
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "Age,Gender\n41,Female\n";
        match read_csv(csv.as_bytes()) {
            Err(DataSourceError::MissingColumn(name)) => assert_eq!(name, "Department"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_cell_is_an_error() {
        let csv = sample_csv().replace("5993", "lots");
        match read_csv(csv.as_bytes()) {
            Err(DataSourceError::BadCell { row, column, value, .. }) => {
                assert_eq!(row, 0);
                assert_eq!(column, "MonthlyIncome");
                assert_eq!(value, "lots");
            }
            other => panic!("expected BadCell, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load(Path::new("/nonexistent/EA.csv")).unwrap_err();
        assert!(matches!(err, DataSourceError::Open { .. }));
    }
}
