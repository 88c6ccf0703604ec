//! Heuristic scoring models and the engine that chains them into a decision.
//!
//! Every model is a small pure function. Failures never propagate: each model
//! returns an [`Assessed`] value that records when a conservative default was
//! substituted.

mod config;
pub mod credit;
mod decision;
pub mod geolocation;
pub(crate) mod outcome;
pub mod recommendation;
pub mod risk;

pub use config::EvaluationConfig;
pub use credit::{analyze_creditworthiness, calculate_credit_score, CreditAnalysis, CreditGrade};
pub use decision::is_approved;
pub use geolocation::{
    assess_location_risk, comprehensive_location_analysis, LocationRisk, RegionProfile,
};
pub use outcome::{Assessed, FallbackReason};
pub use recommendation::{
    recommend_loan_terms, CreditTier, LoanOffer, LoanRecommendation, OfferKind,
};
pub use risk::{assess_comprehensive_risk, calculate_risk_score, RiskAssessment, RiskCategory};

use serde::{Deserialize, Serialize};

use crate::intake::{DerivedMetrics, ProcessedApplication};

/// Stateless evaluator that runs the scoring models over a processed application.
#[derive(Debug, Clone, Default)]
pub struct EvaluationEngine {
    config: EvaluationConfig,
}

impl EvaluationEngine {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn evaluate(&self, processed: &ProcessedApplication) -> EvaluationResult {
        let application = &processed.application;

        let risk = assess_comprehensive_risk(application);
        let credit = analyze_creditworthiness(application);
        let location = comprehensive_location_analysis(application.geolocation.as_ref());
        let recommendation =
            recommend_loan_terms(application, risk.value.risk_score, &self.config);

        let approved = is_approved(risk.value.risk_score, credit.value.score, &self.config);

        EvaluationResult {
            derived_metrics: processed.derived.clone(),
            risk,
            credit,
            location,
            recommendation,
            approved,
        }
    }
}

/// Everything the presentation layer needs to render one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub derived_metrics: Assessed<DerivedMetrics>,
    pub risk: Assessed<RiskAssessment>,
    pub credit: Assessed<CreditAnalysis>,
    pub location: Assessed<LocationRisk>,
    pub recommendation: Assessed<LoanRecommendation>,
    pub approved: bool,
}

impl EvaluationResult {
    pub fn risk_score(&self) -> f64 {
        self.risk.value.risk_score
    }

    pub fn credit_score(&self) -> u16 {
        self.credit.value.score
    }

    /// Fallback reasons from every component, in pipeline order.
    pub fn fallbacks(&self) -> Vec<&FallbackReason> {
        [
            self.derived_metrics.fallback.as_ref(),
            self.risk.fallback.as_ref(),
            self.credit.fallback.as_ref(),
            self.location.fallback.as_ref(),
            self.recommendation.fallback.as_ref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
