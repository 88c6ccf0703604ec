use serde::{Deserialize, Serialize};

use super::domain::{Application, FieldValue, SectionKind};

const MIN_AGE: f64 = 18.0;
const MAX_AGE: f64 = 100.0;
const MIN_CREDIT_SCORE: f64 = 300.0;
const MAX_CREDIT_SCORE: f64 = 850.0;
const MIN_LOAN_AMOUNT: f64 = 1_000.0;
const MAX_LOAN_AMOUNT: f64 = 500_000.0;
const MIN_LOAN_TERM: f64 = 12.0;
const MAX_LOAN_TERM: f64 = 360.0;

const REQUIRED_FIELDS: [(SectionKind, &[&str]); 5] = [
    (SectionKind::Personal, &["age", "employment_status"]),
    (SectionKind::Financial, &["annual_income"]),
    (SectionKind::Loan, &["loan_amount", "loan_purpose"]),
    (SectionKind::Credit, &["credit_score"]),
    (SectionKind::Geolocation, &["state", "city"]),
];

/// Outcome of validating an application. `score` is 1.0 when valid and 0.0
/// otherwise; it is not a graded confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub score: f64,
}

impl ValidationReport {
    fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        let is_valid = errors.is_empty();
        Self {
            is_valid,
            errors,
            warnings,
            score: if is_valid { 1.0 } else { 0.0 },
        }
    }
}

/// Required-field and range checks. Errors make the report invalid; warnings
/// are informational.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, application: &Application) -> ValidationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for section in SectionKind::ordered() {
            if !application.has_section(section) {
                errors.push(format!("Missing required section: {}", section.label()));
            }
        }

        for (section, fields) in REQUIRED_FIELDS {
            if !application.has_section(section) {
                continue;
            }
            for field in fields {
                if !has_field(application, section, field) {
                    errors.push(format!(
                        "Missing required field: {}.{}",
                        section.label(),
                        field
                    ));
                }
            }
        }

        let age = application
            .personal
            .as_ref()
            .and_then(|personal| personal.age.as_ref())
            .and_then(FieldValue::as_number);
        if let Some(age) = age {
            if !(MIN_AGE..=MAX_AGE).contains(&age) {
                errors.push("Age must be between 18 and 100".to_string());
            }
        }

        let credit_score = application
            .credit
            .as_ref()
            .and_then(|credit| credit.credit_score.as_ref())
            .and_then(FieldValue::as_number);
        if let Some(score) = credit_score {
            if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&score) {
                errors.push("Credit score must be between 300 and 850".to_string());
            }
        }

        for (field, value) in application.numeric_fields() {
            if let FieldValue::Text(raw) = value {
                warnings.push(format!("{field} is not numeric: '{raw}'"));
            }
        }

        if let Some(amount) = application.requested_amount() {
            if !(MIN_LOAN_AMOUNT..=MAX_LOAN_AMOUNT).contains(&amount) {
                warnings.push(format!(
                    "Loan amount {amount:.2} is outside the offered range of {MIN_LOAN_AMOUNT:.0} to {MAX_LOAN_AMOUNT:.0}"
                ));
            }
        }

        let term = application
            .loan
            .as_ref()
            .and_then(|loan| loan.loan_term.as_ref())
            .and_then(FieldValue::as_number);
        if let Some(term) = term {
            if !(MIN_LOAN_TERM..=MAX_LOAN_TERM).contains(&term) {
                warnings.push(format!(
                    "Loan term of {term} months is outside the offered range of {MIN_LOAN_TERM} to {MAX_LOAN_TERM}"
                ));
            }
        }

        ValidationReport::from_findings(errors, warnings)
    }
}

fn has_field(application: &Application, section: SectionKind, field: &str) -> bool {
    match section {
        SectionKind::Personal => application.personal.as_ref().is_some_and(|personal| match field {
            "age" => personal.age.is_some(),
            "employment_status" => personal.employment_status.is_some(),
            "education" => personal.education.is_some(),
            "marital_status" => personal.marital_status.is_some(),
            _ => false,
        }),
        SectionKind::Financial => application.financial.as_ref().is_some_and(|financial| {
            match field {
                "annual_income" => financial.annual_income.is_some(),
                "monthly_expenses" => financial.monthly_expenses.is_some(),
                "existing_debts" => financial.existing_debts.is_some(),
                _ => false,
            }
        }),
        SectionKind::Loan => application.loan.as_ref().is_some_and(|loan| match field {
            "loan_amount" => loan.loan_amount.is_some(),
            "loan_purpose" => loan.loan_purpose.is_some(),
            "loan_term" => loan.loan_term.is_some(),
            "collateral_value" => loan.collateral_value.is_some(),
            _ => false,
        }),
        SectionKind::Credit => application.credit.as_ref().is_some_and(|credit| match field {
            "credit_score" => credit.credit_score.is_some(),
            "credit_history_length" => credit.credit_history_length.is_some(),
            "previous_defaults" => credit.previous_defaults.is_some(),
            "current_loans" => credit.current_loans.is_some(),
            _ => false,
        }),
        SectionKind::Geolocation => application.geolocation.as_ref().is_some_and(|geo| {
            match field {
                "state" => geo.state.is_some(),
                "city" => geo.city.is_some(),
                "zip" => geo.zip.is_some(),
                _ => false,
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::domain::{
        CreditSection, FinancialSection, GeolocationSection, LoanSection, PersonalSection,
    };

    fn complete() -> Application {
        Application {
            personal: Some(PersonalSection {
                age: Some(FieldValue::from(35.0)),
                employment_status: Some("Employed".to_string()),
                ..PersonalSection::default()
            }),
            financial: Some(FinancialSection {
                annual_income: Some(FieldValue::from(75_000.0)),
                ..FinancialSection::default()
            }),
            loan: Some(LoanSection {
                loan_amount: Some(FieldValue::from(25_000.0)),
                loan_purpose: Some("Auto Loan".to_string()),
                ..LoanSection::default()
            }),
            credit: Some(CreditSection {
                credit_score: Some(FieldValue::from(720.0)),
                ..CreditSection::default()
            }),
            geolocation: Some(GeolocationSection {
                state: Some("Texas".to_string()),
                city: Some("Austin".to_string()),
                zip: None,
            }),
        }
    }

    #[test]
    fn complete_application_passes() {
        let report = Validator::new().validate(&complete());
        assert!(report.is_valid);
        assert_eq!(report.score, 1.0);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn reports_missing_sections_and_fields() {
        let mut application = complete();
        application.geolocation = None;
        if let Some(loan) = application.loan.as_mut() {
            loan.loan_purpose = None;
        }

        let report = Validator::new().validate(&application);
        assert!(!report.is_valid);
        assert_eq!(report.score, 0.0);
        assert_eq!(
            report.errors,
            vec![
                "Missing required section: geolocation".to_string(),
                "Missing required field: loan.loan_purpose".to_string(),
            ]
        );
    }

    #[test]
    fn flags_out_of_range_age_and_credit_score() {
        let mut application = complete();
        if let Some(personal) = application.personal.as_mut() {
            personal.age = Some(FieldValue::from(17.0));
        }
        if let Some(credit) = application.credit.as_mut() {
            credit.credit_score = Some(FieldValue::from(900.0));
        }

        let report = Validator::new().validate(&application);
        assert!(report
            .errors
            .contains(&"Age must be between 18 and 100".to_string()));
        assert!(report
            .errors
            .contains(&"Credit score must be between 300 and 850".to_string()));
    }

    #[test]
    fn warnings_do_not_invalidate() {
        let mut application = complete();
        if let Some(loan) = application.loan.as_mut() {
            loan.loan_amount = Some(FieldValue::from(750_000.0));
            loan.loan_term = Some(FieldValue::from(480.0));
        }
        if let Some(financial) = application.financial.as_mut() {
            financial.existing_debts = Some(FieldValue::from("some"));
        }

        let report = Validator::new().validate(&application);
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 3);
        assert!(report.warnings[0].contains("financial.existing_debts"));
    }
}
