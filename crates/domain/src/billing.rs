//! Invoice value types.

use std::str::FromStr;

use chrono::NaiveDate;
use eleads_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Being prepared; not yet sent to the client.
    #[default]
    Draft,
    /// Sent and awaiting payment.
    Sent,
    /// Settled.
    Paid,
    /// Past its due date without payment.
    Overdue,
    /// Voided.
    Cancelled,
}

impl InvoiceStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Sent => "SENT",
            Self::Paid => "PAID",
            Self::Overdue => "OVERDUE",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns whether an invoice may move from this status to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Sent | Self::Cancelled)
                | (Self::Sent, Self::Paid | Self::Overdue | Self::Cancelled)
                | (Self::Overdue, Self::Paid | Self::Cancelled)
        )
    }

    /// Returns whether the invoice content is frozen in this status.
    #[must_use]
    pub fn is_final(self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }
}

impl FromStr for InvoiceStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "DRAFT" => Ok(Self::Draft),
            "SENT" => Ok(Self::Sent),
            "PAID" => Ok(Self::Paid),
            "OVERDUE" => Ok(Self::Overdue),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(AppError::Validation(format!(
                "unknown invoice status '{value}'"
            ))),
        }
    }
}

/// Editable invoice content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDetails {
    number: NonEmptyString,
    amount_cents: i64,
    currency: String,
    due_date: Option<NaiveDate>,
}

impl InvoiceDetails {
    /// Creates validated invoice content.
    pub fn new(
        number: impl Into<String>,
        amount_cents: i64,
        currency: &str,
        due_date: Option<NaiveDate>,
    ) -> AppResult<Self> {
        if amount_cents < 0 {
            return Err(AppError::Validation(
                "invoice amount must not be negative".to_owned(),
            ));
        }

        let currency = currency.trim().to_ascii_uppercase();
        if currency.len() != 3 || !currency.chars().all(|value| value.is_ascii_alphabetic()) {
            return Err(AppError::Validation(format!(
                "currency '{currency}' must be a three-letter ISO code"
            )));
        }

        Ok(Self {
            number: NonEmptyString::for_field("invoice number", number)?,
            amount_cents,
            currency,
            due_date,
        })
    }

    /// Returns the invoice number, unique per workspace.
    #[must_use]
    pub fn number(&self) -> &str {
        self.number.as_str()
    }

    /// Returns the amount in minor currency units.
    #[must_use]
    pub fn amount_cents(&self) -> i64 {
        self.amount_cents
    }

    /// Returns the upper-cased ISO currency code.
    #[must_use]
    pub fn currency(&self) -> &str {
        self.currency.as_str()
    }

    /// Returns the due date, if any.
    #[must_use]
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }
}
