use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::{Transaction, TransactionFilter};
use crate::error::AppError;
use crate::ports::TransactionRepository;
use crate::services::csv_export::{write_csv, CsvExportError, CsvTimeZone};
use crate::utils::pagination::{paginate, Page, PageRequest};

pub const TRANSACTION_CSV_HEADER: [&str; 7] = [
    "id",
    "reference",
    "datetime",
    "type",
    "amount",
    "currency",
    "status",
];

/// Raw query parameters shared by the listing and export endpoints.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TransactionQueryParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Inclusive lower bound: RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` or `YYYY-MM-DD`
    pub from: Option<String>,
    /// Inclusive upper bound; a bare date covers the whole day
    pub to: Option<String>,
    pub q: Option<String>,
}

impl TransactionQueryParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref(), self.limit.as_deref())
    }

    pub fn filter(&self) -> Result<TransactionFilter, AppError> {
        let from = parse_bound("from", self.from.as_deref(), DateBound::Start)?;
        let to = parse_bound("to", self.to.as_deref(), DateBound::End)?;
        Ok(TransactionFilter::new(from, to, self.q.as_deref()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateBound {
    Start,
    End,
}

/// Parse date string to DateTime<Utc>. Blank input means "no bound".
///
/// Offset-less timestamps are read as UTC, not server-local time. A date-only
/// `to` is deliberately widened to the last instant of that day, so
/// `from=D&to=D` selects all of day D rather than only its first instant.
fn parse_bound(
    field: &str,
    raw: Option<&str>,
    bound: DateBound,
) -> Result<Option<DateTime<Utc>>, AppError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(DateTime::from_naive_utc_and_offset(naive, Utc)));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let naive = match bound {
            DateBound::Start => date.and_hms_opt(0, 0, 0),
            DateBound::End => date.and_hms_nano_opt(23, 59, 59, 999_999_999),
        };
        if let Some(naive) = naive {
            return Ok(Some(DateTime::from_naive_utc_and_offset(naive, Utc)));
        }
    }

    Err(AppError::BadRequest(format!(
        "Invalid '{}' date: {}",
        field, raw
    )))
}

/// Renders transactions as CSV, one row per item in the given order.
pub fn transactions_to_csv(
    items: &[Transaction],
    zone: CsvTimeZone,
) -> Result<String, CsvExportError> {
    let rows = items.iter().map(|tx| {
        vec![
            tx.id.clone(),
            tx.reference.clone(),
            zone.format_minutes(&tx.timestamp),
            tx.kind.to_string(),
            tx.amount_fixed(),
            tx.currency.clone(),
            tx.status.to_string(),
        ]
    });

    write_csv(&TRANSACTION_CSV_HEADER, rows)
}

/// Filter, paginate and export over the transaction store.
#[derive(Clone)]
pub struct TransactionQueryService {
    repo: Arc<dyn TransactionRepository>,
    csv_zone: CsvTimeZone,
}

impl TransactionQueryService {
    pub fn new(repo: Arc<dyn TransactionRepository>, csv_zone: CsvTimeZone) -> Self {
        Self { repo, csv_zone }
    }

    pub async fn query(&self, params: &TransactionQueryParams) -> Result<Page<Transaction>, AppError> {
        let filter = params.filter()?;
        let matching = self.repo.find(&filter).await?;
        Ok(paginate(matching, params.page_request()))
    }

    /// CSV of the requested page.
    pub async fn export_csv(&self, params: &TransactionQueryParams) -> Result<String, AppError> {
        let page = self.query(params).await?;
        tracing::debug!(
            rows = page.items.len(),
            total = page.total,
            "Exporting transactions page"
        );
        Ok(transactions_to_csv(&page.items, self.csv_zone)?)
    }

    pub async fn count(&self) -> Result<usize, AppError> {
        Ok(self.repo.count().await?)
    }
}
