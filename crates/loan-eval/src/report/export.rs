use std::io::Write;

use serde::Serialize;

use crate::evaluations::LedgerEntry;

#[derive(Serialize)]
struct LedgerRow<'a> {
    id: &'a str,
    submitted_at: String,
    requested_amount: Option<f64>,
    risk_score: f64,
    risk_category: &'static str,
    credit_score: u16,
    approved: bool,
    recommended_amount: f64,
}

impl<'a> From<&'a LedgerEntry> for LedgerRow<'a> {
    fn from(entry: &'a LedgerEntry) -> Self {
        Self {
            id: &entry.id.0,
            submitted_at: entry.submitted_at.to_rfc3339(),
            requested_amount: entry.requested_amount,
            risk_score: entry.risk_score,
            risk_category: entry.risk_category.label(),
            credit_score: entry.credit_score,
            approved: entry.approved,
            recommended_amount: entry.recommended_amount,
        }
    }
}

/// Write the ledger as CSV with a header row, oldest entry first. A missing
/// requested amount is an empty cell.
pub fn write_ledger_csv<W: Write>(writer: W, entries: &[LedgerEntry]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if entries.is_empty() {
        csv_writer.write_record([
            "id",
            "submitted_at",
            "requested_amount",
            "risk_score",
            "risk_category",
            "credit_score",
            "approved",
            "recommended_amount",
        ])?;
    }
    for entry in entries {
        csv_writer.serialize(LedgerRow::from(entry))?;
    }
    csv_writer.flush()?;
    Ok(())
}
