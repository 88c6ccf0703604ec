use super::config::EvaluationConfig;

/// Approve when risk is under the ceiling and the adjusted credit score clears
/// the floor. Both bounds are exclusive.
pub fn is_approved(risk_score: f64, credit_score: u16, config: &EvaluationConfig) -> bool {
    risk_score < config.approval_max_risk && credit_score > config.approval_min_credit
}
