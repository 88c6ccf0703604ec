use std::fmt;

use serde::Serialize;

use crate::evaluations::EvaluationRecord;

/// `$12,345.67`, with a leading minus for negative amounts. Non-finite
/// values render as `$0.00`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0.00".to_string();
    }

    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// Fraction rendered as a percentage with one decimal, `0.125` -> `12.5%`.
pub fn format_percent(fraction: f64) -> String {
    if !fraction.is_finite() {
        return "0.0%".to_string();
    }
    format!("{:.1}%", fraction * 100.0)
}

#[derive(Debug, Clone, Serialize)]
pub struct OfferView {
    pub label: &'static str,
    pub amount: String,
    pub term_months: u32,
    pub interest_rate: String,
    pub monthly_payment: String,
    pub description: String,
}

/// Presentation-ready rendering of one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub evaluation_id: String,
    pub banner: &'static str,
    pub approved: bool,
    pub risk_level: &'static str,
    pub risk_score: String,
    pub credit_score: u16,
    pub credit_grade: &'static str,
    pub location_risk: String,
    pub recommended_amount: String,
    pub recommended_term: u32,
    pub interest_rate: String,
    pub monthly_payment: String,
    pub total_cost: String,
    pub approval_probability: String,
    pub alternatives: Vec<OfferView>,
    pub reasoning: Vec<String>,
    pub conditions: Vec<String>,
    /// Validation warnings and scoring fallbacks.
    pub notices: Vec<String>,
}

impl ResultView {
    pub fn from_record(record: &EvaluationRecord) -> Self {
        let result = &record.result;
        let risk = &result.risk.value;
        let credit = &result.credit.value;
        let recommendation = &result.recommendation.value;

        let alternatives = recommendation
            .alternative_options
            .iter()
            .map(|offer| OfferView {
                label: offer.option.label(),
                amount: format_currency(offer.amount),
                term_months: offer.term_months,
                interest_rate: format_percent(offer.rate),
                monthly_payment: format_currency(offer.monthly_payment),
                description: offer.description.clone(),
            })
            .collect();

        let notices = record
            .validation
            .warnings
            .iter()
            .cloned()
            .chain(result.fallbacks().into_iter().map(|reason| reason.to_string()))
            .collect();

        Self {
            evaluation_id: record.id.0.clone(),
            banner: if result.approved {
                "LOAN APPROVED"
            } else {
                "LOAN REJECTED"
            },
            approved: result.approved,
            risk_level: risk.risk_category.label(),
            risk_score: format_percent(risk.risk_score),
            credit_score: credit.score,
            credit_grade: credit.grade.label(),
            location_risk: format_percent(result.location.value.overall_risk),
            recommended_amount: format_currency(recommendation.recommended_amount),
            recommended_term: recommendation.recommended_term,
            interest_rate: format_percent(recommendation.interest_rate),
            monthly_payment: format_currency(recommendation.monthly_payment),
            total_cost: format_currency(recommendation.total_cost),
            approval_probability: format_percent(recommendation.approval_probability),
            alternatives,
            reasoning: recommendation.reasoning.clone(),
            conditions: recommendation.conditions.clone(),
            notices,
        }
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ({}) ==", self.banner, self.evaluation_id)?;
        writeln!(f, "Risk level:           {} ({})", self.risk_level, self.risk_score)?;
        writeln!(f, "Credit score:         {} ({})", self.credit_score, self.credit_grade)?;
        writeln!(f, "Location risk:        {}", self.location_risk)?;
        writeln!(
            f,
            "Recommended loan:     {} over {} months at {}",
            self.recommended_amount, self.recommended_term, self.interest_rate
        )?;
        writeln!(f, "Monthly payment:      {}", self.monthly_payment)?;
        writeln!(f, "Total cost:           {}", self.total_cost)?;
        writeln!(f, "Approval probability: {}", self.approval_probability)?;

        for offer in &self.alternatives {
            writeln!(
                f,
                "  - {}: {} over {} months, {} per month ({})",
                offer.label,
                offer.amount,
                offer.term_months,
                offer.monthly_payment,
                offer.description
            )?;
        }
        for line in &self.reasoning {
            writeln!(f, "  * {line}")?;
        }
        for condition in &self.conditions {
            writeln!(f, "  condition: {condition}")?;
        }
        for notice in &self.notices {
            writeln!(f, "  note: {notice}")?;
        }
        Ok(())
    }
}
