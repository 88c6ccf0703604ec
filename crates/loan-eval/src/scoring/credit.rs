use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::outcome::{read_number, Assessed, FallbackReason};
use crate::intake::domain::Application;

pub const MIN_CREDIT_SCORE: u16 = 300;
pub const MAX_CREDIT_SCORE: u16 = 850;
/// Base score assumed when the applicant reports none, and the score used when
/// the credit section cannot be read.
pub const DEFAULT_CREDIT_SCORE: u16 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditGrade {
    Exceptional,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Fair,
    Poor,
    Unknown,
}

impl CreditGrade {
    pub fn from_score(score: u16) -> Self {
        match score {
            800..=850 => CreditGrade::Exceptional,
            740..=799 => CreditGrade::VeryGood,
            670..=739 => CreditGrade::Good,
            580..=669 => CreditGrade::Fair,
            300..=579 => CreditGrade::Poor,
            _ => CreditGrade::Unknown,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CreditGrade::Exceptional => "Exceptional",
            CreditGrade::VeryGood => "Very Good",
            CreditGrade::Good => "Good",
            CreditGrade::Fair => "Fair",
            CreditGrade::Poor => "Poor",
            CreditGrade::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditAnalysis {
    pub score: u16,
    pub grade: CreditGrade,
    pub factors: BTreeMap<String, f64>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

struct CreditInputs {
    base_score: f64,
    previous_defaults: f64,
    history_years: f64,
}

impl CreditInputs {
    fn read(application: &Application) -> Result<Self, FallbackReason> {
        let credit = application.credit.as_ref();
        Ok(Self {
            base_score: read_number(
                credit.and_then(|section| section.credit_score.as_ref()),
                "credit.credit_score",
                f64::from(DEFAULT_CREDIT_SCORE),
            )?,
            previous_defaults: read_number(
                credit.and_then(|section| section.previous_defaults.as_ref()),
                "credit.previous_defaults",
                0.0,
            )?,
            history_years: read_number(
                credit.and_then(|section| section.credit_history_length.as_ref()),
                "credit.credit_history_length",
                0.0,
            )?,
        })
    }

    fn has_defaults(&self) -> bool {
        self.previous_defaults != 0.0
    }

    fn adjusted_score(&self) -> u16 {
        let mut adjustment = if self.has_defaults() {
            -30.0 * self.previous_defaults
        } else {
            20.0
        };

        if self.history_years >= 10.0 {
            adjustment += 15.0;
        } else if self.history_years >= 5.0 {
            adjustment += 10.0;
        }

        (self.base_score + adjustment)
            .trunc()
            .clamp(f64::from(MIN_CREDIT_SCORE), f64::from(MAX_CREDIT_SCORE)) as u16
    }

    /// `current_loans` only feeds its own factor; an unreadable count drops
    /// that entry and leaves the score untouched.
    fn factors(&self, application: &Application) -> BTreeMap<String, f64> {
        let mut factors = BTreeMap::from([
            (
                "payment_history".to_string(),
                if self.has_defaults() { 0.5 } else { 1.0 },
            ),
            (
                "credit_history".to_string(),
                (self.history_years / 10.0).min(1.0),
            ),
        ]);

        let current_loans = read_number(
            application
                .credit
                .as_ref()
                .and_then(|section| section.current_loans.as_ref()),
            "credit.current_loans",
            0.0,
        );
        match current_loans {
            Ok(count) => {
                factors.insert(
                    "current_loans".to_string(),
                    if count <= 3.0 { 0.8 } else { 0.5 },
                );
            }
            Err(reason) => tracing::warn!(%reason, "current loans factor omitted"),
        }

        factors
    }
}

/// Reported score adjusted for defaults and history length, in `[300, 850]`.
pub fn calculate_credit_score(application: &Application) -> Assessed<u16> {
    match CreditInputs::read(application) {
        Ok(inputs) => Assessed::computed(inputs.adjusted_score()),
        Err(reason) => {
            tracing::warn!(%reason, "credit scoring fell back to default score");
            Assessed::fallback(DEFAULT_CREDIT_SCORE, reason)
        }
    }
}

pub fn analyze_creditworthiness(application: &Application) -> Assessed<CreditAnalysis> {
    let inputs = match CreditInputs::read(application) {
        Ok(inputs) => inputs,
        Err(reason) => {
            tracing::warn!(%reason, "credit analysis fell back to default score");
            let score = DEFAULT_CREDIT_SCORE;
            return Assessed::fallback(
                CreditAnalysis {
                    score,
                    grade: CreditGrade::from_score(score),
                    factors: BTreeMap::new(),
                    strengths: Vec::new(),
                    weaknesses: score_weaknesses(score),
                    recommendations: recommendations(score),
                },
                reason,
            );
        }
    };

    let score = inputs.adjusted_score();

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    if inputs.has_defaults() {
        weaknesses.push("History of payment defaults".to_string());
    } else {
        strengths.push("No payment defaults".to_string());
    }
    if score >= 700 {
        strengths.push("Good credit score".to_string());
    }
    weaknesses.extend(score_weaknesses(score));

    Assessed::computed(CreditAnalysis {
        score,
        grade: CreditGrade::from_score(score),
        factors: inputs.factors(application),
        strengths,
        weaknesses,
        recommendations: recommendations(score),
    })
}

fn score_weaknesses(score: u16) -> Vec<String> {
    if score < 600 {
        vec!["Low credit score".to_string()]
    } else {
        Vec::new()
    }
}

fn recommendations(score: u16) -> Vec<String> {
    if score < 670 {
        vec![
            "Work on improving credit score".to_string(),
            "Make all payments on time".to_string(),
        ]
    } else {
        vec!["Maintain good credit practices".to_string()]
    }
}
