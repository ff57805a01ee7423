//! Lead and client value types.

use std::str::FromStr;

use eleads_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::EmailAddress;

/// Contact information shared by leads and clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    name: NonEmptyString,
    email: Option<EmailAddress>,
    phone: Option<String>,
    company: Option<String>,
}

impl ContactDetails {
    /// Creates validated contact details. Blank optional values are dropped.
    pub fn new(
        name: impl Into<String>,
        email: Option<String>,
        phone: Option<String>,
        company: Option<String>,
    ) -> AppResult<Self> {
        let email = optional_text(email).map(EmailAddress::new).transpose()?;
        let phone = optional_text(phone);
        if let Some(phone) = phone.as_deref()
            && !phone
                .chars()
                .all(|character| character.is_ascii_digit() || "+-() .".contains(character))
        {
            return Err(AppError::Validation(format!(
                "phone '{phone}' contains invalid characters"
            )));
        }

        Ok(Self {
            name: NonEmptyString::for_field("name", name)?,
            email,
            phone,
            company: optional_text(company),
        })
    }

    /// Returns the contact name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the normalized email, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_ref().map(EmailAddress::as_str)
    }

    /// Returns the phone number, if any.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Returns the company name, if any.
    #[must_use]
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }
}

/// Pipeline stage of a lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    /// Freshly captured.
    #[default]
    New,
    /// First contact made.
    Contacted,
    /// Qualified opportunity.
    Qualified,
    /// Converted into business.
    Won,
    /// Dropped.
    Lost,
}

impl LeadStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Contacted => "CONTACTED",
            Self::Qualified => "QUALIFIED",
            Self::Won => "WON",
            Self::Lost => "LOST",
        }
    }
}

impl FromStr for LeadStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "NEW" => Ok(Self::New),
            "CONTACTED" => Ok(Self::Contacted),
            "QUALIFIED" => Ok(Self::Qualified),
            "WON" => Ok(Self::Won),
            "LOST" => Ok(Self::Lost),
            _ => Err(AppError::Validation(format!(
                "unknown lead status '{value}'"
            ))),
        }
    }
}

/// Editable lead content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadDetails {
    contact: ContactDetails,
    status: LeadStatus,
    notes: Option<String>,
}

impl LeadDetails {
    /// Creates lead details from validated contact data.
    #[must_use]
    pub fn new(contact: ContactDetails, status: LeadStatus, notes: Option<String>) -> Self {
        Self {
            contact,
            status,
            notes: optional_text(notes),
        }
    }

    /// Returns the contact data.
    #[must_use]
    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    /// Returns the pipeline status.
    #[must_use]
    pub fn status(&self) -> LeadStatus {
        self.status
    }

    /// Returns free-form notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optionals_are_dropped() {
        let details = ContactDetails::new("Ada", Some("  ".to_owned()), Some(String::new()), None);
        let Ok(details) = details else {
            panic!("contact details should be valid");
        };

        assert_eq!(details.email(), None);
        assert_eq!(details.phone(), None);
    }

    #[test]
    fn contact_email_is_validated() {
        assert!(ContactDetails::new("Ada", Some("nope".to_owned()), None, None).is_err());
    }

    #[test]
    fn phone_rejects_letters() {
        assert!(ContactDetails::new("Ada", None, Some("call me".to_owned()), None).is_err());
        assert!(
            ContactDetails::new("Ada", None, Some("+1 (555) 010-2000".to_owned()), None).is_ok()
        );
    }

    #[test]
    fn lead_status_parses_storage_values() {
        assert_eq!(LeadStatus::from_str("QUALIFIED").ok(), Some(LeadStatus::Qualified));
        assert!(LeadStatus::from_str("qualified").is_err());
    }
}
