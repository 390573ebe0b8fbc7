//! Totals, percentage and pass/fail classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marking scheme applied to every subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingPolicy {
    /// Minimum mark every subject must reach for a PASS (default: 35)
    #[serde(default = "default_pass_mark")]
    pub pass_mark: u32,
    /// Maximum mark obtainable in one subject (default: 100)
    #[serde(default = "default_max_mark")]
    pub max_mark: u32,
}

fn default_pass_mark() -> u32 {
    35
}

fn default_max_mark() -> u32 {
    100
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self {
            pass_mark: default_pass_mark(),
            max_mark: default_max_mark(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultClass {
    Pass,
    Fail,
}

impl fmt::Display for ResultClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultClass::Pass => f.write_str("PASS"),
            ResultClass::Fail => f.write_str("FAIL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub total: u64,
    /// Share of the maximum possible total, rounded to one decimal
    pub percentage: f64,
    pub result: ResultClass,
}

impl ScoreSummary {
    pub fn percentage_label(&self) -> String {
        format_percentage(self.percentage)
    }
}

pub fn summarize(marks: &[u32], policy: &GradingPolicy) -> ScoreSummary {
    let total: u64 = marks.iter().map(|&m| u64::from(m)).sum();

    let max_total = marks.len() as f64 * policy.max_mark as f64;
    let percentage = if max_total > 0.0 {
        round_one_decimal(total as f64 / max_total * 100.0)
    } else {
        0.0
    };

    // Each subject has to clear the pass mark on its own
    let result = if marks.iter().all(|&m| m >= policy.pass_mark) {
        ResultClass::Pass
    } else {
        ResultClass::Fail
    };

    ScoreSummary {
        total,
        percentage,
        result,
    }
}

pub fn round_one_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// `65.0` becomes `"65.0%"`
pub fn format_percentage(percentage: f64) -> String {
    format!("{:.1}%", percentage)
}
