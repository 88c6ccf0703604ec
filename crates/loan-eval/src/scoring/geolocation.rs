use serde::{Deserialize, Serialize};

use super::outcome::{Assessed, FallbackReason};
use crate::intake::domain::GeolocationSection;

/// Location risk used when no location was supplied.
pub const DEFAULT_LOCATION_RISK: f64 = 0.3;

/// Economic proxies for a region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionProfile {
    pub unemployment_pct: f64,
    pub median_income: f64,
    pub crime_rate: f64,
}

const DEFAULT_REGION: RegionProfile = RegionProfile {
    unemployment_pct: 5.0,
    median_income: 60_000.0,
    crime_rate: 400.0,
};

const STATE_PROFILES: [(&str, RegionProfile); 4] = [
    (
        "CALIFORNIA",
        RegionProfile {
            unemployment_pct: 4.2,
            median_income: 80_000.0,
            crime_rate: 400.0,
        },
    ),
    (
        "NEW YORK",
        RegionProfile {
            unemployment_pct: 4.1,
            median_income: 71_000.0,
            crime_rate: 500.0,
        },
    ),
    (
        "TEXAS",
        RegionProfile {
            unemployment_pct: 3.6,
            median_income: 64_000.0,
            crime_rate: 450.0,
        },
    ),
    (
        "FLORIDA",
        RegionProfile {
            unemployment_pct: 3.8,
            median_income: 55_000.0,
            crime_rate: 480.0,
        },
    ),
];

impl RegionProfile {
    /// Profile for a state name, matched case-insensitively. Unknown states get
    /// the national default.
    pub fn for_state(state: &str) -> Self {
        let key = state.trim().to_uppercase();
        STATE_PROFILES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, profile)| *profile)
            .unwrap_or(DEFAULT_REGION)
    }

    pub fn overall_risk(&self) -> f64 {
        let unemployment_risk = (self.unemployment_pct / 10.0).min(1.0);
        let income_risk = (1.0 - self.median_income / 100_000.0).max(0.0);
        let crime_risk = (self.crime_rate / 1000.0).min(1.0);

        (unemployment_risk * 0.4 + income_risk * 0.3 + crime_risk * 0.3).min(1.0)
    }
}

/// Overall location risk split into presentation components. The components are
/// fixed shares of `overall_risk`, not independent estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRisk {
    pub overall_risk: f64,
    pub economic_risk: f64,
    pub demographic_risk: f64,
    pub environmental_risk: f64,
    pub crime_risk: f64,
    pub risk_factors: Vec<String>,
    pub risk_mitigation: Vec<String>,
}

pub fn assess_location_risk(location: Option<&GeolocationSection>) -> Assessed<f64> {
    match location {
        Some(section) => {
            let state = section.state.as_deref().unwrap_or_default();
            Assessed::computed(RegionProfile::for_state(state).overall_risk())
        }
        None => {
            let reason = FallbackReason::MissingSection {
                section: "geolocation".to_string(),
            };
            tracing::warn!(%reason, "location analysis fell back to default risk");
            Assessed::fallback(DEFAULT_LOCATION_RISK, reason)
        }
    }
}

pub fn comprehensive_location_analysis(
    location: Option<&GeolocationSection>,
) -> Assessed<LocationRisk> {
    assess_location_risk(location).map(|overall_risk| {
        let economic_risk = overall_risk * 0.4;

        let mut risk_factors = Vec::new();
        if overall_risk > 0.6 {
            risk_factors.push("High geographic risk area".to_string());
        }
        if economic_risk > 0.3 {
            risk_factors.push("Economic instability in region".to_string());
        }

        let risk_mitigation = if overall_risk > 0.5 {
            vec![
                "Consider additional collateral requirements".to_string(),
                "Verify local employment stability".to_string(),
            ]
        } else {
            vec!["Standard loan terms appropriate".to_string()]
        };

        LocationRisk {
            overall_risk,
            economic_risk,
            demographic_risk: overall_risk * 0.25,
            environmental_risk: overall_risk * 0.2,
            crime_risk: overall_risk * 0.15,
            risk_factors,
            risk_mitigation,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn located(state: &str) -> GeolocationSection {
        GeolocationSection {
            state: Some(state.to_string()),
            city: Some("Springfield".to_string()),
            zip: None,
        }
    }

    #[test]
    fn known_states_match_case_insensitively() {
        let texas = assess_location_risk(Some(&located("Texas"))).value;
        let expected = 0.36 * 0.4 + 0.36 * 0.3 + 0.45 * 0.3;
        assert!((texas - expected).abs() < 1e-9);
        assert_eq!(RegionProfile::for_state("new york").median_income, 71_000.0);
    }

    #[test]
    fn unknown_states_use_default_profile() {
        let risk = assess_location_risk(Some(&located("Atlantis"))).value;
        let expected = 0.5 * 0.4 + 0.4 * 0.3 + 0.4 * 0.3;
        assert!((risk - expected).abs() < 1e-9);
    }

    #[test]
    fn missing_section_falls_back() {
        let assessed = assess_location_risk(None);
        assert_eq!(assessed.value, DEFAULT_LOCATION_RISK);
        assert!(assessed.is_fallback());
    }

    #[test]
    fn comprehensive_analysis_apportions_overall_risk() {
        let analysis = comprehensive_location_analysis(Some(&located("Florida"))).value;
        let total = analysis.economic_risk
            + analysis.demographic_risk
            + analysis.environmental_risk
            + analysis.crime_risk;
        assert!((total - analysis.overall_risk).abs() < 1e-12);
        assert!(analysis.risk_factors.is_empty());
        assert_eq!(
            analysis.risk_mitigation,
            vec!["Standard loan terms appropriate"]
        );
    }
}
