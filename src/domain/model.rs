use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::error::{ImportError, Result};

/// Positional fields per feed line: due date, payment date, amount,
/// description, status.
pub const FIELDS_PER_LINE: usize = 5;

const FIELD_DELIMITER: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "PAID")]
    Paid,
    #[serde(rename = "CANCELED")]
    Canceled,
}

impl AccountStatus {
    /// Exact, case-sensitive match on the feed's status tokens.
    pub fn from_token(token: &str) -> Option<AccountStatus> {
        match token {
            "PENDING" => Some(AccountStatus::Pending),
            "PAID" => Some(AccountStatus::Paid),
            "CANCELED" => Some(AccountStatus::Canceled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "PENDING",
            AccountStatus::Paid => "PAID",
            AccountStatus::Canceled => "CANCELED",
        }
    }
}

/// A payable account entry parsed from one feed line. Never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub amount: Decimal,
    pub description: String,
    pub status: AccountStatus,
}

impl AccountRecord {
    /// Parses one data line: five comma-separated positional fields, no
    /// quoting or escaping of embedded delimiters.
    pub fn parse_line(line: &str) -> Result<AccountRecord> {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if fields.len() != FIELDS_PER_LINE {
            return Err(parse_error(
                line,
                format!(
                    "expected {} fields, found {}",
                    FIELDS_PER_LINE,
                    fields.len()
                ),
            ));
        }

        let due_date = fields[0]
            .parse::<NaiveDate>()
            .map_err(|e| parse_error(line, format!("invalid due date {:?}: {}", fields[0], e)))?;

        let payment_date = if fields[1].is_empty() {
            None
        } else {
            Some(fields[1].parse::<NaiveDate>().map_err(|e| {
                parse_error(line, format!("invalid payment date {:?}: {}", fields[1], e))
            })?)
        };

        let amount = fields[2]
            .parse::<Decimal>()
            .map_err(|e| parse_error(line, format!("invalid amount {:?}: {}", fields[2], e)))?;

        let status = AccountStatus::from_token(fields[4])
            .ok_or_else(|| parse_error(line, format!("unknown status token {:?}", fields[4])))?;

        Ok(AccountRecord {
            due_date,
            payment_date,
            amount,
            description: fields[3].to_string(),
            status,
        })
    }
}

fn parse_error(line: &str, reason: String) -> ImportError {
    ImportError::Parse {
        line: line.to_string(),
        reason,
    }
}

/// Terminal result of exactly one batch.
#[derive(Debug)]
pub enum BatchOutcome {
    Committed(usize),
    Failed(ImportError),
}

/// Aggregate of a fully successful import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub records_committed: usize,
    pub batches_committed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_line() {
        let record =
            AccountRecord::parse_line("2024-03-01,2024-03-05,199.90,office supplies,PAID")
                .unwrap();

        assert_eq!(
            record.due_date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(
            record.payment_date,
            Some(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
        );
        assert_eq!(record.amount, "199.90".parse::<Decimal>().unwrap());
        assert_eq!(record.description, "office supplies");
        assert_eq!(record.status, AccountStatus::Paid);
    }

    #[test]
    fn empty_payment_date_is_absent() {
        let record = AccountRecord::parse_line("2024-03-01,,50.00,rent,PENDING").unwrap();
        assert_eq!(record.payment_date, None);
        assert_eq!(record.status, AccountStatus::Pending);
    }

    #[test]
    fn rejects_non_numeric_amount() {
        let err = AccountRecord::parse_line("2024-03-01,,abc,rent,PENDING").unwrap_err();
        match err {
            ImportError::Parse { reason, .. } => assert!(reason.contains("invalid amount")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_status_token() {
        let err = AccountRecord::parse_line("2024-03-01,,10.00,rent,OVERDUE").unwrap_err();
        match err {
            ImportError::Parse { reason, .. } => {
                assert!(reason.contains("unknown status token"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn status_tokens_are_case_sensitive() {
        assert!(AccountRecord::parse_line("2024-03-01,,10.00,rent,paid").is_err());
        assert_eq!(AccountStatus::from_token("Paid"), None);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(AccountRecord::parse_line("2024-03-01,,10.00,rent").is_err());
        // An embedded comma in the description shifts the field count; there
        // is no quoting to protect it.
        assert!(
            AccountRecord::parse_line("2024-03-01,,10.00,rent, march,PENDING").is_err()
        );
    }

    #[test]
    fn rejects_malformed_due_date() {
        let err = AccountRecord::parse_line("2024-13-99,,10.00,rent,PENDING").unwrap_err();
        assert!(matches!(err, ImportError::Parse { .. }));
    }
}
