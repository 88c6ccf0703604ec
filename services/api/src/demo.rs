use crate::infra::{load_application, InMemoryEvaluationLedger};
use chrono::Local;
use clap::Args;
use loan_eval::config::AppConfig;
use loan_eval::error::AppError;
use loan_eval::evaluations::{EvaluationLedger, EvaluationServiceError, LoanEvaluationService};
use loan_eval::intake::{
    Application, CreditSection, FieldValue, FinancialSection, GeolocationSection, LoanSection,
    PersonalSection,
};
use loan_eval::report::{format_currency, format_percent, DashboardSummary, ResultView};
use loan_eval::telemetry;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Application JSON file (numeric fields may be strings such as "$75,000")
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print the full evaluation record as JSON instead of the summary view
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Leave out the sample applicant that is expected to be rejected.
    #[arg(long)]
    pub(crate) skip_rejected: bool,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs { input, json } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let application = load_application(&input)?;
    let service = LoanEvaluationService::new(
        Arc::new(InMemoryEvaluationLedger::default()),
        config.evaluation,
    );

    match service.evaluate(application) {
        Ok(record) if json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Ok(record) => {
            print!("{}", ResultView::from_record(&record));
            Ok(())
        }
        Err(EvaluationServiceError::Invalid(report)) => {
            println!("Application failed validation:");
            for error in &report.errors {
                println!("  - {error}");
            }
            Err(EvaluationServiceError::Invalid(report).into())
        }
        Err(other) => Err(other.into()),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let service = LoanEvaluationService::new(
        Arc::new(InMemoryEvaluationLedger::default()),
        config.evaluation,
    );
    let summary = evaluate_samples(&service, args.skip_rejected)?;

    println!(
        "Loan evaluation demo ({})",
        Local::now().format("%Y-%m-%d %H:%M")
    );
    render_dashboard(&summary);
    Ok(())
}

fn evaluate_samples<L>(
    service: &LoanEvaluationService<L>,
    skip_rejected: bool,
) -> Result<DashboardSummary, AppError>
where
    L: EvaluationLedger + 'static,
{
    for applicant in sample_applicants() {
        if skip_rejected && applicant.expect_rejection {
            continue;
        }

        println!("\n{}", applicant.label);
        let record = service.evaluate(applicant.application)?;
        print!("{}", ResultView::from_record(&record));
    }

    Ok(service.dashboard()?)
}

pub(crate) fn render_dashboard(summary: &DashboardSummary) {
    println!("\nSession dashboard");
    println!(
        "- {} applications | {} approved | {} rejected | {} approval rate",
        summary.total_applications,
        summary.approved,
        summary.rejected(),
        format_percent(summary.approval_rate)
    );
    println!(
        "- average risk {} | average credit score {:.0} | average request {}",
        format_percent(summary.average_risk_score),
        summary.average_credit_score,
        format_currency(summary.average_loan_amount)
    );
    println!("Risk distribution:");
    for bucket in &summary.risk_distribution {
        println!("  - {}: {}", bucket.label, bucket.count);
    }
}

struct SampleApplicant {
    label: &'static str,
    application: Application,
    expect_rejection: bool,
}

fn sample_applicants() -> Vec<SampleApplicant> {
    vec![
        SampleApplicant {
            label: "Salaried applicant, auto loan in Texas",
            application: applicant(
                ("34", "Employed"),
                ("$75,000", "2,000", "$15,000"),
                ("25,000", "Auto Loan"),
                ("720", "4", "0"),
                ("TEXAS", "Austin"),
            ),
            expect_rejection: false,
        },
        SampleApplicant {
            label: "Self-employed applicant, home improvement in California",
            application: applicant(
                ("45", "Self-Employed"),
                ("120000", "4500", "42000"),
                ("60000", "Home Improvement"),
                ("780", "12", "0"),
                ("California", "San Diego"),
            ),
            expect_rejection: false,
        },
        SampleApplicant {
            label: "Unemployed applicant with thin credit in Florida",
            application: applicant(
                ("29", "Unemployed"),
                ("0", "900", "0"),
                ("12,000", "Debt Consolidation"),
                ("400", "2", "0"),
                ("Florida", "Tampa"),
            ),
            expect_rejection: true,
        },
    ]
}

fn applicant(
    personal: (&str, &str),
    financial: (&str, &str, &str),
    loan: (&str, &str),
    credit: (&str, &str, &str),
    location: (&str, &str),
) -> Application {
    let (age, employment_status) = personal;
    let (annual_income, monthly_expenses, existing_debts) = financial;
    let (loan_amount, loan_purpose) = loan;
    let (credit_score, credit_history_length, previous_defaults) = credit;
    let (state, city) = location;

    Application {
        personal: Some(PersonalSection {
            age: Some(FieldValue::from(age)),
            employment_status: Some(employment_status.to_string()),
            education: None,
            marital_status: None,
        }),
        financial: Some(FinancialSection {
            annual_income: Some(FieldValue::from(annual_income)),
            monthly_expenses: Some(FieldValue::from(monthly_expenses)),
            existing_debts: Some(FieldValue::from(existing_debts)),
        }),
        loan: Some(LoanSection {
            loan_amount: Some(FieldValue::from(loan_amount)),
            loan_purpose: Some(loan_purpose.to_string()),
            loan_term: Some(FieldValue::from(60.0)),
            collateral_value: None,
        }),
        credit: Some(CreditSection {
            credit_score: Some(FieldValue::from(credit_score)),
            credit_history_length: Some(FieldValue::from(credit_history_length)),
            previous_defaults: Some(FieldValue::from(previous_defaults)),
            current_loans: None,
        }),
        geolocation: Some(GeolocationSection {
            state: Some(state.to_string()),
            city: Some(city.to_string()),
            zip: None,
        }),
    }
}
