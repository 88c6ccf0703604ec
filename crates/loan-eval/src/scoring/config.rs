use serde::{Deserialize, Serialize};

/// Lending policy knobs shared by the recommender and the decision step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Applications at or above this risk score are rejected.
    pub approval_max_risk: f64,
    /// Applications at or below this adjusted credit score are rejected.
    pub approval_min_credit: u16,
    pub max_loan_amount: f64,
    pub term_months: u32,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            approval_max_risk: 0.6,
            approval_min_credit: 600,
            max_loan_amount: 500_000.0,
            term_months: 60,
        }
    }
}
