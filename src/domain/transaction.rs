//! Transaction domain entity.
//! Read-only financial events used for reporting and export.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Purchase,
    Refund,
    Transfer,
}

impl TransactionType {
    pub const ALL: [TransactionType; 3] = [
        TransactionType::Purchase,
        TransactionType::Refund,
        TransactionType::Transfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "purchase",
            TransactionType::Refund => "refund",
            TransactionType::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 3] = [
        TransactionStatus::Completed,
        TransactionStatus::Pending,
        TransactionStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain entity representing a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub reference: String,
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(with = "super::money")]
    pub amount: BigDecimal,
    pub currency: String,
    pub status: TransactionStatus,
}

impl Transaction {
    /// Amount rendered with exactly two decimal places.
    pub fn amount_fixed(&self) -> String {
        self.amount.round(2).with_scale(2).to_string()
    }

    /// Shortest decimal form of the amount, e.g. `-20` or `12.5`. Free-text
    /// search matches against this, so `20.00` does not hit an amount of `-20`.
    pub fn amount_text(&self) -> String {
        let fixed = self.amount_fixed();
        match fixed.split_once('.') {
            Some((whole, frac)) => {
                let frac = frac.trim_end_matches('0');
                if frac.is_empty() {
                    whole.to_string()
                } else {
                    format!("{}.{}", whole, frac)
                }
            }
            None => fixed,
        }
    }
}

/// Criteria a transaction must satisfy to appear in a query result.
///
/// Both date bounds are inclusive. The free-text needle is stored trimmed and
/// lowercased; an empty needle matches everything.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    needle: Option<String>,
}

impl TransactionFilter {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>, q: Option<&str>) -> Self {
        let needle = q
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());
        Self { from, to, needle }
    }

    pub fn needle(&self) -> Option<&str> {
        self.needle.as_deref()
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(from) = self.from {
            if tx.timestamp < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if tx.timestamp > to {
                return false;
            }
        }
        match &self.needle {
            None => true,
            Some(q) => {
                tx.id.to_lowercase().contains(q)
                    || tx.reference.to_lowercase().contains(q)
                    || tx.amount_text().contains(q.as_str())
            }
        }
    }
}
