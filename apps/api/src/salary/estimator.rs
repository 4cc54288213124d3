//! Projected salary from a job's band, the user's key stat and years on the job.
//!
//! Growth is logarithmic (fast early, flattening later). The key stat adds
//! 10만원 per point above 50. The result never leaves `[base, cap]`.

use serde::{Deserialize, Serialize};

use crate::catalog::models::{Job, Stat, StatVector};

const GROWTH_SPREAD_DIVISOR: f64 = 20_000.0;
const MIN_GROWTH_RATE: f64 = 0.1;
const MAX_GROWTH_RATE: f64 = 0.3;
const GROWTH_MULTIPLIER: f64 = 4.0;
const STAT_BONUS_PIVOT: f64 = 50.0;
const STAT_BONUS_PER_POINT: f64 = 10.0;

pub const DEFAULT_PROJECTION_YEARS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryParameters {
    pub base: i64,
    pub cap: i64,
    pub growth_rate: f64,
    pub key_stat: Stat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GrowthPoint {
    pub year: u32,
    pub salary: i64,
}

/// Base and cap come straight from the salary band. The key stat is the job's
/// highest requirement; on ties the earliest stat in canonical order wins.
pub fn derive_salary_parameters(job: &Job) -> SalaryParameters {
    let mut key_stat = Stat::ALL[0];
    let mut best = job.required_stats.get(key_stat);
    for (stat, value) in job.required_stats.iter() {
        if value > best {
            best = value;
            key_stat = stat;
        }
    }

    let spread = (job.salary_range.max - job.salary_range.min) as f64;
    let growth_rate = (spread / GROWTH_SPREAD_DIVISOR).clamp(MIN_GROWTH_RATE, MAX_GROWTH_RATE);

    SalaryParameters {
        base: job.salary_range.min,
        cap: job.salary_range.max,
        growth_rate,
        key_stat,
    }
}

pub fn estimate_salary(params: &SalaryParameters, stats: &StatVector, years: u32) -> i64 {
    let base = params.base as f64;
    let exp_factor = (f64::from(years) + 1.0).ln() * params.growth_rate * GROWTH_MULTIPLIER;
    let key_value = f64::from(stats.get(params.key_stat));
    let stat_bonus = ((key_value - STAT_BONUS_PIVOT) * STAT_BONUS_PER_POINT).max(0.0);

    let total = base + base * exp_factor + stat_bonus;
    total.min(params.cap as f64).round() as i64
}

/// Year-by-year estimate for `0..=max_years`.
pub fn project_salary_growth(
    params: &SalaryParameters,
    stats: &StatVector,
    max_years: u32,
) -> Vec<GrowthPoint> {
    (0..=max_years)
        .map(|year| GrowthPoint {
            year,
            salary: estimate_salary(params, stats, year),
        })
        .collect()
}
