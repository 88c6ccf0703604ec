mod export;
mod summary;
pub mod views;

pub use export::write_ledger_csv;
pub use summary::{DashboardSummary, RiskBucket};
pub use views::{format_currency, format_percent, OfferView, ResultView};
