//! Market distribution model for a salary band.
//!
//! The band is treated as a normal distribution with mean at the midpoint and
//! ±3σ spanning `[min, max]`.

use std::f64::consts::PI;

use serde::Serialize;

use crate::salary::SalaryError;

pub const DISTRIBUTION_SAMPLES: usize = 31;
const RANGE_LOW_FACTOR: f64 = 0.8;
const RANGE_HIGH_FACTOR: f64 = 1.2;
const DENSITY_SCALE: f64 = 10_000.0;

// Abramowitz & Stegun 26.2.17
const AS_P: f64 = 0.231_641_9;
const AS_D: f64 = 0.398_942_3;
const AS_B: [f64; 5] = [0.319_381_5, -0.356_563_8, 1.781_478, -1.821_256, 1.330_274];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionPoint {
    pub x: i64,
    pub density: f64,
    /// Equal to `density` on the bucket(s) nearest the user's salary, else 0.
    pub is_user_bucket: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SalaryTier {
    pub label: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

struct Band {
    mean: f64,
    std_dev: f64,
}

impl Band {
    fn new(min: i64, max: i64) -> Result<Self, SalaryError> {
        if max <= min {
            return Err(SalaryError::InvalidRange { min, max });
        }
        Ok(Self {
            mean: (min + max) as f64 / 2.0,
            std_dev: (max - min) as f64 / 6.0,
        })
    }

    fn z(&self, x: f64) -> f64 {
        (x - self.mean) / self.std_dev
    }

    fn pdf(&self, x: f64) -> f64 {
        let exponent = -0.5 * self.z(x).powi(2);
        exponent.exp() / (self.std_dev * (2.0 * PI).sqrt())
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Samples the band's density at 31 evenly spaced points over
/// `[0.8·min, 1.2·max]` for charting.
pub fn build_distribution(
    min: i64,
    max: i64,
    user_salary: i64,
) -> Result<Vec<DistributionPoint>, SalaryError> {
    let band = Band::new(min, max)?;
    let range_min = min as f64 * RANGE_LOW_FACTOR;
    let range_max = max as f64 * RANGE_HIGH_FACTOR;
    let step = (range_max - range_min) / (DISTRIBUTION_SAMPLES - 1) as f64;

    Ok((0..DISTRIBUTION_SAMPLES)
        .map(|i| {
            let x = (range_min + step * i as f64).round();
            let density = band.pdf(x) * DENSITY_SCALE;
            let is_user = (x - user_salary as f64).abs() < step;
            DistributionPoint {
                x: x as i64,
                density: round2(density),
                is_user_bucket: if is_user { round2(density) } else { 0.0 },
                label: format!("{}만원", x as i64),
            }
        })
        .collect())
}

/// Share of the band at or below `user_salary`, as a whole percentage.
pub fn percentile_rank(user_salary: i64, min: i64, max: i64) -> Result<u8, SalaryError> {
    let band = Band::new(min, max)?;
    let z = band.z(user_salary as f64);

    // Upper-tail probability Q(|z|).
    let t = 1.0 / (1.0 + AS_P * z.abs());
    let d = AS_D * (-z * z / 2.0).exp();
    let poly = AS_B.iter().rev().fold(0.0, |acc, b| b + t * acc);
    let tail = d * t * poly;

    let percentile = if z > 0.0 { (1.0 - tail) * 100.0 } else { tail * 100.0 };
    Ok(percentile.round().clamp(0.0, 100.0) as u8)
}

pub fn salary_tier(percentile: u8) -> SalaryTier {
    match percentile {
        90.. => SalaryTier {
            label: "TOP 10%",
            color: "#f59e0b",
            description: "시장 최상위",
        },
        75..=89 => SalaryTier {
            label: "TOP 25%",
            color: "#22c55e",
            description: "상위권",
        },
        50..=74 => SalaryTier {
            label: "TOP 50%",
            color: "#3b82f6",
            description: "평균 이상",
        },
        25..=49 => SalaryTier {
            label: "BOTTOM 50%",
            color: "#f97316",
            description: "평균 이하",
        },
        _ => SalaryTier {
            label: "BOTTOM 25%",
            color: "#ef4444",
            description: "입문 단계",
        },
    }
}
