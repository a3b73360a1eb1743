//! Generate a synthetic employee dataset so the dashboard can be exercised
//! without the proprietary source file.
//!
//! Usage: `generate_sample [path] [rows]` (defaults: `EA.csv`, 1470 rows).

use std::process::ExitCode;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Pick an index with the given relative weights.
    fn weighted(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let mut roll = self.next_f64() * total;
        for (i, w) in weights.iter().enumerate() {
            if roll < *w {
                return i;
            }
            roll -= w;
        }
        weights.len() - 1
    }

    /// Integer in 1..=max.
    fn scale(&mut self, max: u64) -> u64 {
        1 + self.next_u64() % max
    }
}

const DEPARTMENTS: [&str; 3] = ["Human Resources", "Research & Development", "Sales"];

fn job_roles(department: &str) -> &'static [&'static str] {
    match department {
        "Sales" => &["Manager", "Sales Executive", "Sales Representative"],
        "Human Resources" => &["Human Resources", "Manager"],
        _ => &[
            "Healthcare Representative",
            "Laboratory Technician",
            "Manager",
            "Manufacturing Director",
            "Research Director",
            "Research Scientist",
        ],
    }
}

fn education_field(rng: &mut SimpleRng) -> &'static str {
    let fields = [
        "Human Resources",
        "Life Sciences",
        "Marketing",
        "Medical",
        "Other",
        "Technical Degree",
    ];
    fields[rng.weighted(&[1.0, 6.0, 2.0, 4.5, 1.0, 1.5])]
}

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "EA.csv".to_string());
    let rows: usize = match args.next().as_deref().unwrap_or("1470").parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("Usage: generate_sample [path] [rows]");
            return ExitCode::FAILURE;
        }
    };

    let mut rng = SimpleRng::new(42);
    let mut writer = match csv::Writer::from_path(&path) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: cannot create {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let header = [
        "Age",
        "Attrition",
        "Department",
        "EducationField",
        "EnvironmentSatisfaction",
        "Gender",
        "JobInvolvement",
        "JobLevel",
        "JobRole",
        "MaritalStatus",
        "MonthlyIncome",
        "OverTime",
        "PerformanceRating",
        "TotalWorkingYears",
        "TrainingTimesLastYear",
        "WorkLifeBalance",
        "YearsAtCompany",
        "YearsWithCurrManager",
    ];
    if let Err(e) = writer.write_record(header) {
        eprintln!("Error: writing header: {e}");
        return ExitCode::FAILURE;
    }

    for _ in 0..rows {
        let age = rng.gauss(37.0, 9.0).clamp(18.0, 60.0).round();
        let department = DEPARTMENTS[rng.weighted(&[1.0, 6.5, 3.0])];
        let roles = job_roles(department);
        let job_role = roles[rng.weighted(&vec![1.0; roles.len()])];
        let gender = if rng.next_f64() < 0.6 { "Male" } else { "Female" };
        let marital_status =
            ["Divorced", "Married", "Single"][rng.weighted(&[2.2, 4.6, 3.2])];
        let over_time = if rng.next_f64() < 0.28 { "Yes" } else { "No" };

        let job_level = rng.weighted(&[5.4, 5.3, 2.2, 1.1, 0.7]) + 1;
        let monthly_income =
            (rng.gauss(2000.0 + 3800.0 * job_level as f64, 900.0)).clamp(1000.0, 20000.0).round();
        let total_working_years = ((age - 18.0) * rng.next_f64()).round().max(0.0);
        let years_at_company = (total_working_years * rng.next_f64()).round();
        let years_with_curr_manager = (years_at_company * rng.next_f64()).round();

        let environment_satisfaction = rng.scale(4);
        let job_involvement = rng.scale(4);
        let work_life_balance = rng.scale(4);
        let training_times = rng.next_u64() % 7;
        // PerformanceRating in the reference data only takes 3 or 4.
        let performance_rating = if rng.next_f64() < 0.85 { 3 } else { 4 };

        let mut attrition_prob = 0.10;
        if over_time == "Yes" {
            attrition_prob += 0.18;
        }
        if marital_status == "Single" {
            attrition_prob += 0.08;
        }
        if age < 30.0 {
            attrition_prob += 0.07;
        }
        if work_life_balance == 1 {
            attrition_prob += 0.06;
        }
        let attrition = if rng.next_f64() < attrition_prob {
            "Yes"
        } else {
            "No"
        };

        let row = [
            format!("{age}"),
            attrition.to_string(),
            department.to_string(),
            education_field(&mut rng).to_string(),
            format!("{environment_satisfaction}"),
            gender.to_string(),
            format!("{job_involvement}"),
            format!("{job_level}"),
            job_role.to_string(),
            marital_status.to_string(),
            format!("{monthly_income}"),
            over_time.to_string(),
            format!("{performance_rating}"),
            format!("{total_working_years}"),
            format!("{training_times}"),
            format!("{work_life_balance}"),
            format!("{years_at_company}"),
            format!("{years_with_curr_manager}"),
        ];
        if let Err(e) = writer.write_record(&row) {
            eprintln!("Error: writing row: {e}");
            return ExitCode::FAILURE;
        }
    }

    if let Err(e) = writer.flush() {
        eprintln!("Error: flushing {path}: {e}");
        return ExitCode::FAILURE;
    }
    println!("Wrote {rows} rows to {path}");
    ExitCode::SUCCESS
}
