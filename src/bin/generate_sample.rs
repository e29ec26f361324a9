use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

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

    /// Non-negative whole number drawn around `mean`.
    fn minutes(&mut self, mean: f64, std_dev: f64) -> f64 {
        self.gauss(mean, std_dev).max(0.0).round()
    }
}

/// One day of tracker activity, in export column order.
struct Day {
    id: i64,
    date: NaiveDate,
    steps: f64,
    distance: f64,
    very: f64,
    fairly: f64,
    lightly: f64,
    sedentary: f64,
    calories: f64,
}

const COLUMNS: [&str; 9] = [
    "Id",
    "ActivityDate",
    "TotalSteps",
    "TotalDistance",
    "VeryActiveMinutes",
    "FairlyActiveMinutes",
    "LightlyActiveMinutes",
    "SedentaryMinutes",
    "Calories",
];

const PEERS: usize = 30;
const DAYS: i64 = 31;

fn simulate(rng: &mut SimpleRng) -> Vec<Day> {
    let mut days = Vec::new();

    // Personal tracker first (January), then the survey cohort (April–May 2016).
    let personal_start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let survey_start = NaiveDate::from_ymd_opt(2016, 4, 12).unwrap_or_default();

    let mut users: Vec<(i64, NaiveDate, f64)> = vec![(1, personal_start, 3500.0)];
    for i in 0..PEERS {
        let id = 1_503_960_366 + (i as i64) * 97_113_417;
        let base_steps = 2000.0 + rng.next_f64() * 9000.0;
        users.push((id, survey_start, base_steps));
    }

    for (id, start, base_steps) in users {
        for d in 0..DAYS {
            let steps = rng.gauss(base_steps, base_steps * 0.3).max(0.0).round();
            let stride_miles = rng.gauss(0.00047, 0.00003);
            let very = rng.minutes(steps / 500.0, 8.0);
            let fairly = rng.minutes(steps / 900.0, 5.0);
            let lightly = rng.minutes(120.0 + steps / 60.0, 40.0);
            days.push(Day {
                id,
                date: start + Duration::days(d),
                steps,
                distance: (steps * stride_miles * 100.0).round() / 100.0,
                very,
                fairly,
                lightly,
                sedentary: (1440.0 - 420.0 - very - fairly - lightly).max(0.0),
                calories: rng.gauss(1600.0 + steps * 0.05, 150.0).round(),
            });
        }
    }
    days
}

fn write_csv(path: &str, days: &[Day]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(COLUMNS)?;
    for d in days {
        writer.write_record([
            d.id.to_string(),
            d.date.format("%-m/%-d/%Y").to_string(),
            d.steps.to_string(),
            d.distance.to_string(),
            d.very.to_string(),
            d.fairly.to_string(),
            d.lightly.to_string(),
            d.sedentary.to_string(),
            d.calories.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, days: &[Day]) -> Result<()> {
    let floats = |f: fn(&Day) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(days.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new(COLUMNS[0], DataType::Int64, false),
        Field::new(COLUMNS[1], DataType::Utf8, false),
        Field::new(COLUMNS[2], DataType::Float64, false),
        Field::new(COLUMNS[3], DataType::Float64, false),
        Field::new(COLUMNS[4], DataType::Float64, false),
        Field::new(COLUMNS[5], DataType::Float64, false),
        Field::new(COLUMNS[6], DataType::Float64, false),
        Field::new(COLUMNS[7], DataType::Float64, false),
        Field::new(COLUMNS[8], DataType::Float64, false),
    ]));

    let dates: Vec<String> = days
        .iter()
        .map(|d| d.date.format("%Y-%m-%d").to_string())
        .collect();

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(days.iter().map(|d| d.id).collect::<Vec<_>>())),
            Arc::new(StringArray::from(dates)),
            floats(|d| d.steps),
            floats(|d| d.distance),
            floats(|d| d.very),
            floats(|d| d.fairly),
            floats(|d| d.lightly),
            floats(|d| d.sedentary),
            floats(|d| d.calories),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let days = simulate(&mut rng);

    write_csv("data.csv", &days)?;
    write_parquet("data.parquet", &days)?;

    println!(
        "Wrote {} daily records for {} identifiers to data.csv and data.parquet",
        days.len(),
        PEERS + 1
    );
    Ok(())
}
