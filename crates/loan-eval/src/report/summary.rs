use serde::Serialize;

use crate::evaluations::LedgerEntry;
use crate::scoring::RiskCategory;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskBucket {
    pub category: RiskCategory,
    pub label: &'static str,
    pub count: usize,
}

/// Session analytics over the evaluation ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_applications: usize,
    pub approved: usize,
    pub approval_rate: f64,
    pub average_risk_score: f64,
    pub average_credit_score: f64,
    pub average_loan_amount: f64,
    pub risk_distribution: Vec<RiskBucket>,
}

impl DashboardSummary {
    /// Averages are zero for an empty ledger. The loan amount average only
    /// counts entries whose requested amount was numeric.
    pub fn from_entries(entries: &[LedgerEntry]) -> Self {
        let total_applications = entries.len();
        let approved = entries.iter().filter(|entry| entry.approved).count();

        let requested: Vec<f64> = entries
            .iter()
            .filter_map(|entry| entry.requested_amount)
            .collect();

        let risk_distribution = RiskCategory::ordered()
            .into_iter()
            .map(|category| RiskBucket {
                category,
                label: category.label(),
                count: entries
                    .iter()
                    .filter(|entry| entry.risk_category == category)
                    .count(),
            })
            .collect();

        Self {
            total_applications,
            approved,
            approval_rate: ratio(approved as f64, total_applications),
            average_risk_score: mean(entries.iter().map(|entry| entry.risk_score)),
            average_credit_score: mean(entries.iter().map(|entry| f64::from(entry.credit_score))),
            average_loan_amount: mean(requested.into_iter()),
            risk_distribution,
        }
    }

    pub fn rejected(&self) -> usize {
        self.total_applications - self.approved
    }
}

fn ratio(numerator: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        numerator / count as f64
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| {
        (sum + value, count + 1)
    });
    ratio(sum, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluations::EvaluationId;
    use chrono::{TimeZone, Utc};

    fn entry(id: &str, risk_score: f64, credit_score: u16, approved: bool) -> LedgerEntry {
        LedgerEntry {
            id: EvaluationId(id.to_string()),
            submitted_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
            requested_amount: Some(20_000.0),
            risk_score,
            risk_category: RiskCategory::from_score(risk_score),
            credit_score,
            approved,
            recommended_amount: 20_000.0,
        }
    }

    #[test]
    fn empty_ledger_reports_zeroes() {
        let summary = DashboardSummary::from_entries(&[]);
        assert_eq!(summary.total_applications, 0);
        assert_eq!(summary.approval_rate, 0.0);
        assert_eq!(summary.average_credit_score, 0.0);
        assert!(summary
            .risk_distribution
            .iter()
            .all(|bucket| bucket.count == 0));
    }

    #[test]
    fn aggregates_counts_and_averages() {
        let mut unscored_amount = entry("eval-000003", 0.7, 496, false);
        unscored_amount.requested_amount = None;
        let entries = vec![
            entry("eval-000001", 0.1, 740, true),
            entry("eval-000002", 0.4, 660, false),
            unscored_amount,
        ];

        let summary = DashboardSummary::from_entries(&entries);
        assert_eq!(summary.total_applications, 3);
        assert_eq!(summary.approved, 1);
        assert_eq!(summary.rejected(), 2);
        assert!((summary.approval_rate - 1.0 / 3.0).abs() < 1e-12);
        assert!((summary.average_risk_score - 0.4).abs() < 1e-12);
        assert_eq!(summary.average_credit_score, 632.0);
        assert_eq!(summary.average_loan_amount, 20_000.0);

        let counts: Vec<usize> = summary
            .risk_distribution
            .iter()
            .map(|bucket| bucket.count)
            .collect();
        assert_eq!(counts, vec![1, 1, 1]);
    }
}
