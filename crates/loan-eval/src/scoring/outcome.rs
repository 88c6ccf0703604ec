use std::fmt;

use serde::{Deserialize, Serialize};

use crate::intake::domain::FieldValue;

/// A scored value together with the reason a conservative default was used in
/// place of a computed one, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessed<T> {
    pub value: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackReason>,
}

impl<T> Assessed<T> {
    pub fn computed(value: T) -> Self {
        Self {
            value,
            fallback: None,
        }
    }

    pub fn fallback(value: T, reason: FallbackReason) -> Self {
        Self {
            value,
            fallback: Some(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Assessed<U> {
        Assessed {
            value: f(self.value),
            fallback: self.fallback,
        }
    }
}

/// Why a scorer substituted its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    NonNumericField { field: String, raw: String },
    NonFiniteField { field: String },
    NonPositiveRequestedAmount { amount: f64 },
    MissingSection { section: String },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NonNumericField { field, raw } => {
                write!(f, "{field} is not numeric ('{raw}')")
            }
            FallbackReason::NonFiniteField { field } => write!(f, "{field} is not a finite number"),
            FallbackReason::NonPositiveRequestedAmount { amount } => {
                write!(f, "requested loan amount {amount} must be positive")
            }
            FallbackReason::MissingSection { section } => {
                write!(f, "application has no {section} section")
            }
        }
    }
}

/// Read a numeric field, substituting `default` when it is absent.
pub(crate) fn read_number(
    value: Option<&FieldValue>,
    field: &str,
    default: f64,
) -> Result<f64, FallbackReason> {
    match value {
        None => Ok(default),
        Some(FieldValue::Number(number)) if number.is_finite() => Ok(*number),
        Some(FieldValue::Number(_)) => Err(FallbackReason::NonFiniteField {
            field: field.to_string(),
        }),
        Some(FieldValue::Text(raw)) => Err(FallbackReason::NonNumericField {
            field: field.to_string(),
            raw: raw.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_number_uses_default_for_missing_fields() {
        assert_eq!(read_number(None, "credit.credit_score", 600.0), Ok(600.0));
    }

    #[test]
    fn read_number_rejects_text_and_nan() {
        let text = FieldValue::from("n/a");
        assert!(matches!(
            read_number(Some(&text), "financial.annual_income", 0.0),
            Err(FallbackReason::NonNumericField { .. })
        ));

        let nan = FieldValue::Number(f64::NAN);
        assert!(matches!(
            read_number(Some(&nan), "financial.annual_income", 0.0),
            Err(FallbackReason::NonFiniteField { .. })
        ));
    }

    #[test]
    fn map_preserves_fallback_reason() {
        let reason = FallbackReason::MissingSection {
            section: "geolocation".to_string(),
        };
        let assessed = Assessed::fallback(0.3_f64, reason.clone()).map(|risk| risk * 2.0);
        assert_eq!(assessed.value, 0.6);
        assert_eq!(assessed.fallback, Some(reason));
    }
}
