use serde::{Deserialize, Serialize};

use super::config::EvaluationConfig;
use super::outcome::{read_number, Assessed, FallbackReason};
use crate::intake::domain::Application;

const DEFAULT_REQUESTED_AMOUNT: f64 = 25_000.0;
const INCOME_MULTIPLE: f64 = 3.0;
const MAX_INTEREST_RATE: f64 = 0.30;
const SHORT_TERM_MONTHS: u32 = 36;
const MAX_ALTERNATIVES: usize = 2;

/// Credit band after discounting the reported score by the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditTier {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl CreditTier {
    pub fn determine(credit_score: f64, risk_score: f64) -> Self {
        let adjusted = credit_score * (1.0 - risk_score * 0.2);
        if adjusted >= 750.0 {
            CreditTier::Excellent
        } else if adjusted >= 700.0 {
            CreditTier::VeryGood
        } else if adjusted >= 650.0 {
            CreditTier::Good
        } else if adjusted >= 600.0 {
            CreditTier::Fair
        } else {
            CreditTier::Poor
        }
    }

    pub const fn base_rate(self) -> f64 {
        match self {
            CreditTier::Excellent => 0.045,
            CreditTier::VeryGood => 0.065,
            CreditTier::Good => 0.085,
            CreditTier::Fair => 0.105,
            CreditTier::Poor => 0.150,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CreditTier::Excellent => "excellent",
            CreditTier::VeryGood => "very_good",
            CreditTier::Good => "good",
            CreditTier::Fair => "fair",
            CreditTier::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferKind {
    LowerAmount,
    ShorterTerm,
}

impl OfferKind {
    pub const fn label(self) -> &'static str {
        match self {
            OfferKind::LowerAmount => "Lower Amount",
            OfferKind::ShorterTerm => "Shorter Term",
        }
    }

    const fn description(self) -> &'static str {
        match self {
            OfferKind::LowerAmount => "Reduced amount for easier approval",
            OfferKind::ShorterTerm => "Pay off faster, save on interest",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOffer {
    pub option: OfferKind,
    pub amount: f64,
    pub term_months: u32,
    pub rate: f64,
    pub monthly_payment: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecommendation {
    pub recommended_amount: f64,
    pub recommended_term: u32,
    pub interest_rate: f64,
    pub monthly_payment: f64,
    pub total_cost: f64,
    pub approval_probability: f64,
    pub alternative_options: Vec<LoanOffer>,
    pub reasoning: Vec<String>,
    pub conditions: Vec<String>,
}

impl LoanRecommendation {
    /// Canned offer returned whenever the application cannot be priced.
    pub fn fallback_default() -> Self {
        let recommended_amount = 10_000.0;
        let recommended_term = 60;
        let interest_rate = 0.10;
        let monthly_payment = monthly_payment(recommended_amount, interest_rate, recommended_term);

        Self {
            recommended_amount,
            recommended_term,
            interest_rate,
            monthly_payment,
            total_cost: monthly_payment * f64::from(recommended_term),
            approval_probability: 0.5,
            alternative_options: Vec::new(),
            reasoning: vec!["Default recommendation due to processing error".to_string()],
            conditions: vec!["Complete application review required".to_string()],
        }
    }
}

/// Annual rate for a tier, loaded by risk and capped at 30%.
pub fn interest_rate(tier: CreditTier, risk_score: f64) -> f64 {
    (tier.base_rate() + risk_score * 0.05).min(MAX_INTEREST_RATE)
}

/// Level payment that amortises `principal` over `term_months` at `annual_rate`.
pub fn monthly_payment(principal: f64, annual_rate: f64, term_months: u32) -> f64 {
    if term_months == 0 {
        return 0.0;
    }

    let periods = f64::from(term_months);
    if annual_rate <= 0.0 {
        return principal / periods;
    }

    let monthly_rate = annual_rate / 12.0;
    let growth = (1.0 + monthly_rate).powf(periods);
    principal * monthly_rate * growth / (growth - 1.0)
}

/// Blend of inverse risk (60%) and normalised credit score (40%), in `[0, 1]`.
pub fn approval_probability(risk_score: f64, credit_score: f64) -> f64 {
    let risk_component = 1.0 - risk_score;
    let credit_component = (credit_score - 300.0) / 550.0;
    (risk_component * 0.6 + credit_component * 0.4).clamp(0.0, 1.0)
}

/// A 75% amount offer, plus a 36-month offer when the term is longer than that.
pub fn alternatives(amount: f64, term_months: u32, rate: f64) -> Vec<LoanOffer> {
    let mut offers = Vec::with_capacity(MAX_ALTERNATIVES);

    let lower_amount = amount * 0.75;
    offers.push(LoanOffer {
        option: OfferKind::LowerAmount,
        amount: lower_amount,
        term_months,
        rate,
        monthly_payment: monthly_payment(lower_amount, rate, term_months),
        description: OfferKind::LowerAmount.description().to_string(),
    });

    if term_months > SHORT_TERM_MONTHS {
        offers.push(LoanOffer {
            option: OfferKind::ShorterTerm,
            amount,
            term_months: SHORT_TERM_MONTHS,
            rate,
            monthly_payment: monthly_payment(amount, rate, SHORT_TERM_MONTHS),
            description: OfferKind::ShorterTerm.description().to_string(),
        });
    }

    offers.truncate(MAX_ALTERNATIVES);
    offers
}

pub fn recommend_loan_terms(
    application: &Application,
    risk_score: f64,
    config: &EvaluationConfig,
) -> Assessed<LoanRecommendation> {
    match price(application, risk_score, config) {
        Ok(recommendation) => Assessed::computed(recommendation),
        Err(reason) => {
            tracing::warn!(%reason, "loan recommendation fell back to default offer");
            Assessed::fallback(LoanRecommendation::fallback_default(), reason)
        }
    }
}

fn price(
    application: &Application,
    risk_score: f64,
    config: &EvaluationConfig,
) -> Result<LoanRecommendation, FallbackReason> {
    let annual_income = read_number(
        application
            .financial
            .as_ref()
            .and_then(|section| section.annual_income.as_ref()),
        "financial.annual_income",
        0.0,
    )?;
    let requested_amount = read_number(
        application
            .loan
            .as_ref()
            .and_then(|section| section.loan_amount.as_ref()),
        "loan.loan_amount",
        DEFAULT_REQUESTED_AMOUNT,
    )?;
    let credit_score = read_number(
        application
            .credit
            .as_ref()
            .and_then(|section| section.credit_score.as_ref()),
        "credit.credit_score",
        600.0,
    )?;

    if requested_amount <= 0.0 {
        return Err(FallbackReason::NonPositiveRequestedAmount {
            amount: requested_amount,
        });
    }

    let credit_tier = CreditTier::determine(credit_score, risk_score);

    let max_affordable = if annual_income > 0.0 {
        annual_income * INCOME_MULTIPLE
    } else {
        requested_amount
    };
    let recommended_amount = requested_amount
        .min(max_affordable)
        .min(config.max_loan_amount);
    let recommended_term = config.term_months;

    let interest_rate = interest_rate(credit_tier, risk_score);
    let monthly_payment = monthly_payment(recommended_amount, interest_rate, recommended_term);
    let total_cost = monthly_payment * f64::from(recommended_term);

    let reasoning = vec![
        format!("Credit tier: {}", credit_tier.label()),
        format!("Risk score: {risk_score:.2}"),
        format!(
            "Recommended amount is {:.0}% of requested",
            recommended_amount / requested_amount * 100.0
        ),
    ];

    let mut conditions = vec![
        "Employment verification required".to_string(),
        "Income documentation required".to_string(),
    ];
    if risk_score > 0.6 {
        conditions.push("Additional collateral may be required".to_string());
    }

    Ok(LoanRecommendation {
        recommended_amount,
        recommended_term,
        interest_rate,
        monthly_payment,
        total_cost,
        approval_probability: approval_probability(risk_score, credit_score),
        alternative_options: alternatives(recommended_amount, recommended_term, interest_rate),
        reasoning,
        conditions,
    })
}
