//! Application intake: the raw form model, normalisation and validation.

pub mod domain;
pub mod processor;
pub mod validation;

pub use domain::{
    Application, CreditSection, FieldValue, FinancialSection, GeolocationSection, LoanSection,
    PersonalSection, SectionKind,
};
pub use processor::{DataProcessor, DerivedMetrics, ProcessedApplication};
pub use validation::{ValidationReport, Validator};
