use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::evaluations::ledger::{EvaluationLedger, LedgerEntry, LedgerError};
use crate::evaluations::{evaluation_router, LoanEvaluationService};
use crate::intake::{
    Application, CreditSection, FieldValue, FinancialSection, GeolocationSection, LoanSection,
    PersonalSection,
};
use crate::scoring::EvaluationConfig;

pub(super) fn approved_application() -> Application {
    Application {
        personal: Some(PersonalSection {
            age: Some(FieldValue::from(34.0)),
            employment_status: Some("Employed".to_string()),
            education: Some("Bachelor's".to_string()),
            marital_status: Some("Married".to_string()),
        }),
        financial: Some(FinancialSection {
            annual_income: Some(FieldValue::from("75,000")),
            monthly_expenses: Some(FieldValue::from(2_500.0)),
            existing_debts: Some(FieldValue::from("$15,000")),
        }),
        loan: Some(LoanSection {
            loan_amount: Some(FieldValue::from(25_000.0)),
            loan_purpose: Some("Auto Loan".to_string()),
            loan_term: Some(FieldValue::from(60.0)),
            collateral_value: None,
        }),
        credit: Some(CreditSection {
            credit_score: Some(FieldValue::from(720.0)),
            credit_history_length: Some(FieldValue::from(3.0)),
            previous_defaults: Some(FieldValue::from(0.0)),
            current_loans: Some(FieldValue::from(1.0)),
        }),
        geolocation: Some(GeolocationSection {
            state: Some("TEXAS".to_string()),
            city: Some("Austin".to_string()),
            zip: Some("78701".to_string()),
        }),
    }
}

pub(super) fn rejected_application() -> Application {
    let mut application = approved_application();
    if let Some(personal) = application.personal.as_mut() {
        personal.employment_status = Some("Unemployed".to_string());
    }
    if let Some(financial) = application.financial.as_mut() {
        financial.annual_income = Some(FieldValue::from(0.0));
        financial.existing_debts = Some(FieldValue::from(0.0));
    }
    if let Some(credit) = application.credit.as_mut() {
        credit.credit_score = Some(FieldValue::from(400.0));
    }
    if let Some(loan) = application.loan.as_mut() {
        loan.loan_amount = Some(FieldValue::from(15_000.0));
    }
    application
}

pub(super) fn incomplete_application() -> Application {
    let mut application = approved_application();
    application.credit = None;
    application
}

pub(super) fn build_service() -> (LoanEvaluationService<MemoryLedger>, Arc<MemoryLedger>) {
    let ledger = Arc::new(MemoryLedger::default());
    let service = LoanEvaluationService::new(ledger.clone(), EvaluationConfig::default());
    (service, ledger)
}

#[derive(Default, Clone)]
pub(super) struct MemoryLedger {
    entries: Arc<Mutex<Vec<LedgerEntry>>>,
}

impl MemoryLedger {
    pub(super) fn len(&self) -> usize {
        self.entries.lock().expect("ledger mutex poisoned").len()
    }
}

impl EvaluationLedger for MemoryLedger {
    fn append(&self, entry: LedgerEntry) -> Result<(), LedgerError> {
        self.entries
            .lock()
            .expect("ledger mutex poisoned")
            .push(entry);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.entries.lock().expect("ledger mutex poisoned").clone())
    }
}

pub(super) struct UnavailableLedger;

impl EvaluationLedger for UnavailableLedger {
    fn append(&self, _entry: LedgerEntry) -> Result<(), LedgerError> {
        Err(LedgerError::Unavailable("session store offline".to_string()))
    }

    fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        Err(LedgerError::Unavailable("session store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf8 body")
}

pub(super) fn evaluation_router_with_service(
    service: LoanEvaluationService<MemoryLedger>,
) -> axum::Router {
    evaluation_router(Arc::new(service))
}
