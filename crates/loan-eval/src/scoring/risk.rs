use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::outcome::{read_number, Assessed, FallbackReason};
use crate::intake::domain::Application;

/// Risk score used when the application cannot be scored.
pub const DEFAULT_RISK_SCORE: f64 = 0.5;

const ASSESSMENT_CONFIDENCE: f64 = 0.85;
const NO_INCOME_RISK: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    pub fn from_score(risk_score: f64) -> Self {
        if risk_score < 0.3 {
            RiskCategory::Low
        } else if risk_score < 0.6 {
            RiskCategory::Medium
        } else {
            RiskCategory::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskCategory::Low => "LOW",
            RiskCategory::Medium => "MEDIUM",
            RiskCategory::High => "HIGH",
        }
    }

    pub const fn ordered() -> [RiskCategory; 3] {
        [RiskCategory::Low, RiskCategory::Medium, RiskCategory::High]
    }

    const fn recommendation(self) -> &'static str {
        match self {
            RiskCategory::Low => "Low risk applicant. Recommend approval with standard terms.",
            RiskCategory::Medium => "Moderate risk. Consider approval with adjusted terms.",
            RiskCategory::High => "High risk applicant. Recommend additional review or rejection.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub contributing_factors: BTreeMap<String, f64>,
    pub confidence: f64,
    pub recommendation: String,
}

/// Mean of the financial, credit and employment sub-risks, in `[0, 1]`.
pub fn calculate_risk_score(application: &Application) -> Assessed<f64> {
    match sub_risks(application) {
        Ok(factors) => {
            let mean = factors.iter().sum::<f64>() / factors.len() as f64;
            Assessed::computed(mean.clamp(0.0, 1.0))
        }
        Err(reason) => {
            tracing::warn!(%reason, "risk analysis fell back to default score");
            Assessed::fallback(DEFAULT_RISK_SCORE, reason)
        }
    }
}

pub fn assess_comprehensive_risk(application: &Application) -> Assessed<RiskAssessment> {
    calculate_risk_score(application).map(|risk_score| {
        let risk_category = RiskCategory::from_score(risk_score);

        let contributing_factors = BTreeMap::from([
            ("financial_risk".to_string(), risk_score * 0.4),
            ("credit_risk".to_string(), risk_score * 0.35),
            ("employment_risk".to_string(), risk_score * 0.25),
        ]);

        RiskAssessment {
            risk_score,
            risk_category,
            contributing_factors,
            confidence: ASSESSMENT_CONFIDENCE,
            recommendation: risk_category.recommendation().to_string(),
        }
    })
}

fn sub_risks(application: &Application) -> Result<[f64; 3], FallbackReason> {
    let financial = application.financial.as_ref();
    let annual_income = read_number(
        financial.and_then(|section| section.annual_income.as_ref()),
        "financial.annual_income",
        0.0,
    )?;
    // Debts are only read when there is income to divide them by.
    let financial_risk = if annual_income <= 0.0 {
        NO_INCOME_RISK
    } else {
        let existing_debts = read_number(
            financial.and_then(|section| section.existing_debts.as_ref()),
            "financial.existing_debts",
            0.0,
        )?;
        debt_ratio_risk(existing_debts / annual_income)
    };

    let credit_score = read_number(
        application
            .credit
            .as_ref()
            .and_then(|section| section.credit_score.as_ref()),
        "credit.credit_score",
        600.0,
    )?;

    let employment_status = application
        .personal
        .as_ref()
        .and_then(|section| section.employment_status.as_deref())
        .unwrap_or_default();

    Ok([
        financial_risk,
        credit_risk(credit_score),
        employment_risk(employment_status),
    ])
}

fn debt_ratio_risk(debt_ratio: f64) -> f64 {
    if debt_ratio > 0.5 {
        0.4
    } else if debt_ratio > 0.3 {
        0.25
    } else {
        0.1
    }
}

fn credit_risk(credit_score: f64) -> f64 {
    if credit_score < 500.0 {
        0.5
    } else if credit_score < 650.0 {
        0.35
    } else if credit_score < 750.0 {
        0.2
    } else {
        0.1
    }
}

fn employment_risk(employment_status: &str) -> f64 {
    match employment_status {
        "Unemployed" => 0.6,
        "Self-Employed" => 0.3,
        _ => 0.1,
    }
}
