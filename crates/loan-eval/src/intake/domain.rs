use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric form input as it arrives from the client: either already a number or
/// free text such as `"$75,000"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Normalise text that spells a number, dropping `,` and `$`. Text that still
    /// fails to parse is returned unchanged.
    pub fn coerce(self) -> Self {
        match self {
            FieldValue::Text(raw) => {
                let cleaned: String = raw.chars().filter(|c| !matches!(c, ',' | '$')).collect();
                match cleaned.trim().parse::<f64>() {
                    Ok(number) => FieldValue::Number(number),
                    Err(_) => FieldValue::Text(raw),
                }
            }
            number => number,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(number) => Some(*number),
            FieldValue::Text(_) => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(number) => write!(f, "{number}"),
            FieldValue::Text(text) => f.write_str(text),
        }
    }
}

/// Loan application as submitted from the intake form. Every section and field
/// is optional so that validation can report what is missing instead of the
/// payload being rejected outright.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub personal: Option<PersonalSection>,
    pub financial: Option<FinancialSection>,
    pub loan: Option<LoanSection>,
    pub credit: Option<CreditSection>,
    pub geolocation: Option<GeolocationSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalSection {
    pub age: Option<FieldValue>,
    pub employment_status: Option<String>,
    pub education: Option<String>,
    pub marital_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSection {
    pub annual_income: Option<FieldValue>,
    pub monthly_expenses: Option<FieldValue>,
    pub existing_debts: Option<FieldValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanSection {
    pub loan_amount: Option<FieldValue>,
    pub loan_purpose: Option<String>,
    pub loan_term: Option<FieldValue>,
    pub collateral_value: Option<FieldValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditSection {
    pub credit_score: Option<FieldValue>,
    pub credit_history_length: Option<FieldValue>,
    pub previous_defaults: Option<FieldValue>,
    pub current_loans: Option<FieldValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeolocationSection {
    pub state: Option<String>,
    pub city: Option<String>,
    #[serde(alias = "zip_code")]
    pub zip: Option<String>,
}

/// Application sections in the order the form presents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Personal,
    Financial,
    Loan,
    Credit,
    Geolocation,
}

impl SectionKind {
    pub const fn ordered() -> [SectionKind; 5] {
        [
            SectionKind::Personal,
            SectionKind::Financial,
            SectionKind::Loan,
            SectionKind::Credit,
            SectionKind::Geolocation,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            SectionKind::Personal => "personal",
            SectionKind::Financial => "financial",
            SectionKind::Loan => "loan",
            SectionKind::Credit => "credit",
            SectionKind::Geolocation => "geolocation",
        }
    }
}

impl Application {
    pub fn has_section(&self, section: SectionKind) -> bool {
        match section {
            SectionKind::Personal => self.personal.is_some(),
            SectionKind::Financial => self.financial.is_some(),
            SectionKind::Loan => self.loan.is_some(),
            SectionKind::Credit => self.credit.is_some(),
            SectionKind::Geolocation => self.geolocation.is_some(),
        }
    }

    pub fn requested_amount(&self) -> Option<f64> {
        self.loan
            .as_ref()
            .and_then(|loan| loan.loan_amount.as_ref())
            .and_then(FieldValue::as_number)
    }

    /// Every numeric field that is present, keyed by its dotted path.
    pub fn numeric_fields(&self) -> Vec<(&'static str, &FieldValue)> {
        let mut candidates: Vec<(&'static str, Option<&FieldValue>)> = Vec::new();

        if let Some(personal) = &self.personal {
            candidates.push(("personal.age", personal.age.as_ref()));
        }
        if let Some(financial) = &self.financial {
            candidates.push(("financial.annual_income", financial.annual_income.as_ref()));
            candidates.push((
                "financial.monthly_expenses",
                financial.monthly_expenses.as_ref(),
            ));
            candidates.push(("financial.existing_debts", financial.existing_debts.as_ref()));
        }
        if let Some(loan) = &self.loan {
            candidates.push(("loan.loan_amount", loan.loan_amount.as_ref()));
            candidates.push(("loan.loan_term", loan.loan_term.as_ref()));
            candidates.push(("loan.collateral_value", loan.collateral_value.as_ref()));
        }
        if let Some(credit) = &self.credit {
            candidates.push(("credit.credit_score", credit.credit_score.as_ref()));
            candidates.push((
                "credit.credit_history_length",
                credit.credit_history_length.as_ref(),
            ));
            candidates.push(("credit.previous_defaults", credit.previous_defaults.as_ref()));
            candidates.push(("credit.current_loans", credit.current_loans.as_ref()));
        }

        candidates
            .into_iter()
            .filter_map(|(path, value)| value.map(|value| (path, value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_strips_currency_and_separators() {
        assert_eq!(
            FieldValue::from("$75,000").coerce(),
            FieldValue::Number(75000.0)
        );
        assert_eq!(FieldValue::from(" 720 ").coerce(), FieldValue::Number(720.0));
    }

    #[test]
    fn coerce_passes_malformed_text_through() {
        assert_eq!(
            FieldValue::from("seventy").coerce(),
            FieldValue::Text("seventy".to_string())
        );
    }

    #[test]
    fn deserializes_numbers_and_text_side_by_side() {
        let application: Application = serde_json::from_value(serde_json::json!({
            "financial": { "annual_income": "75,000", "existing_debts": 15000 },
            "geolocation": { "state": "Texas", "zip_code": "73301" }
        }))
        .expect("payload parses");

        let financial = application.financial.expect("financial section");
        assert_eq!(
            financial.annual_income,
            Some(FieldValue::Text("75,000".to_string()))
        );
        assert_eq!(financial.existing_debts, Some(FieldValue::Number(15000.0)));
        assert!(application.personal.is_none());
        assert_eq!(
            application.geolocation.and_then(|geo| geo.zip),
            Some("73301".to_string())
        );
    }
}
