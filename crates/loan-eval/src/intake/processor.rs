use serde::{Deserialize, Serialize};

use super::domain::{Application, CreditSection, FieldValue, FinancialSection, LoanSection};
use crate::scoring::outcome::{read_number, Assessed, FallbackReason};

/// Income ratios derived once per application from the financial section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub monthly_income: f64,
    pub debt_to_income: f64,
    pub expense_ratio: f64,
}

impl DerivedMetrics {
    /// All ratios are zero when there is no positive income to divide by.
    pub fn from_financial(financial: Option<&FinancialSection>) -> Result<Self, FallbackReason> {
        let Some(financial) = financial else {
            return Ok(Self::default());
        };

        let annual_income = read_number(
            financial.annual_income.as_ref(),
            "financial.annual_income",
            0.0,
        )?;
        if annual_income <= 0.0 {
            return Ok(Self::default());
        }

        let monthly_expenses = read_number(
            financial.monthly_expenses.as_ref(),
            "financial.monthly_expenses",
            0.0,
        )?;
        let existing_debts = read_number(
            financial.existing_debts.as_ref(),
            "financial.existing_debts",
            0.0,
        )?;

        Ok(Self {
            monthly_income: annual_income / 12.0,
            debt_to_income: (existing_debts / annual_income).max(0.0),
            expense_ratio: (monthly_expenses * 12.0 / annual_income).max(0.0),
        })
    }
}

/// Application with numeric text normalised, plus its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedApplication {
    pub application: Application,
    pub derived: Assessed<DerivedMetrics>,
}

/// Normalises stringly-typed form input before scoring.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataProcessor;

impl DataProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, application: Application) -> ProcessedApplication {
        let application = normalize(application);

        for (field, value) in application.numeric_fields() {
            if let FieldValue::Text(raw) = value {
                tracing::debug!(field, raw = raw.as_str(), "numeric field left as text");
            }
        }

        let derived = match DerivedMetrics::from_financial(application.financial.as_ref()) {
            Ok(metrics) => Assessed::computed(metrics),
            Err(reason) => {
                tracing::warn!(%reason, "derived metrics unavailable");
                Assessed::fallback(DerivedMetrics::default(), reason)
            }
        };

        ProcessedApplication {
            application,
            derived,
        }
    }
}

fn coerce(value: Option<FieldValue>) -> Option<FieldValue> {
    value.map(FieldValue::coerce)
}

fn normalize(application: Application) -> Application {
    let Application {
        personal,
        financial,
        loan,
        credit,
        geolocation,
    } = application;

    Application {
        personal: personal.map(|mut personal| {
            personal.age = coerce(personal.age);
            personal
        }),
        financial: financial.map(|financial| FinancialSection {
            annual_income: coerce(financial.annual_income),
            monthly_expenses: coerce(financial.monthly_expenses),
            existing_debts: coerce(financial.existing_debts),
        }),
        loan: loan.map(|loan| LoanSection {
            loan_amount: coerce(loan.loan_amount),
            loan_purpose: loan.loan_purpose,
            loan_term: coerce(loan.loan_term),
            collateral_value: coerce(loan.collateral_value),
        }),
        credit: credit.map(|credit| CreditSection {
            credit_score: coerce(credit.credit_score),
            credit_history_length: coerce(credit.credit_history_length),
            previous_defaults: coerce(credit.previous_defaults),
            current_loans: coerce(credit.current_loans),
        }),
        geolocation,
    }
}
