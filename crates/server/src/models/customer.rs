//! Customer record and forms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storeroom_core::{CustomerId, Email};
use storeroom_storage::TableRecord;

use crate::services::ServiceError;

/// Maximum length for customer name fields.
const MAX_NAME_LENGTH: usize = 50;

/// A retail customer.
///
/// Identity (names) is immutable once created; contact fields are mutable
/// via [`UpdateCustomer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    /// File-share path of the uploaded ID image, if any.
    pub id_image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Partition label for customer records.
    pub const PARTITION: &'static str = "customers";

    /// Derived display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl TableRecord for Customer {
    fn partition_key(&self) -> &'static str {
        Self::PARTITION
    }

    fn row_key(&self) -> String {
        self.id.to_string()
    }
}

/// Form input for registering a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl NewCustomer {
    /// Validate the form and build a fresh [`Customer`].
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] describing the first offending
    /// field.
    pub fn into_customer(self) -> Result<Customer, ServiceError> {
        let first_name = required_name(&self.first_name, "first name")?;
        let last_name = required_name(&self.last_name, "last name")?;
        let email = Email::parse(&self.email)
            .map_err(|e| ServiceError::Validation(format!("email: {e}")))?;
        let phone = validate_phone(&self.phone)?;

        Ok(Customer {
            id: CustomerId::new(),
            first_name,
            last_name,
            email,
            phone,
            id_image_path: None,
            created_at: Utc::now(),
        })
    }
}

/// Mutable contact fields of a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCustomer {
    pub email: String,
    pub phone: String,
}

impl UpdateCustomer {
    /// Apply the contact fields to an existing record after validation.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] if a field is malformed.
    pub fn apply(self, customer: &mut Customer) -> Result<(), ServiceError> {
        customer.email = Email::parse(&self.email)
            .map_err(|e| ServiceError::Validation(format!("email: {e}")))?;
        customer.phone = validate_phone(&self.phone)?;
        Ok(())
    }
}

fn required_name(value: &str, field: &str) -> Result<String, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    if value.len() > MAX_NAME_LENGTH {
        return Err(ServiceError::Validation(format!(
            "{field} cannot exceed {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(value.to_owned())
}

fn validate_phone(value: &str) -> Result<String, ServiceError> {
    let value = value.trim();
    let digits = value.chars().filter(char::is_ascii_digit).count();
    if digits < 7
        || !value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
    {
        return Err(ServiceError::Validation("invalid phone format".to_owned()));
    }
    Ok(value.to_owned())
}
