//! Customer details entered on the order form.
//!
//! Ephemeral data: validated synchronously before the WhatsApp handoff and
//! never stored anywhere.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why the order form was rejected.
///
/// Checks run in field order and short-circuit on the first failure; the
/// `Display` form is the user-facing message naming the offending field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CustomerInfoError {
    #[error("please enter your full name")]
    MissingName,
    #[error("please enter your email address")]
    MissingEmail,
    #[error("email must end with .com")]
    InvalidEmail,
    #[error("please enter your phone number")]
    MissingPhone,
    #[error("phone number must be a 10-digit number")]
    InvalidPhone,
    #[error("please enter your delivery address")]
    MissingAddress,
    #[error("PIN code must be a 6-digit number")]
    InvalidPostalCode,
}

/// Name and delivery details for an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
}

impl CustomerInfo {
    /// Build customer details from raw form fields, trimming whitespace.
    #[must_use]
    pub fn from_form(
        name: &str,
        phone: &str,
        email: &str,
        address: &str,
        city: &str,
        pincode: &str,
    ) -> Self {
        Self {
            name: name.trim().to_owned(),
            phone: phone.trim().to_owned(),
            email: email.trim().to_owned(),
            address: address.trim().to_owned(),
            city: city.trim().to_owned(),
            pincode: pincode.trim().to_owned(),
        }
    }

    /// Validate the form field by field.
    ///
    /// Name, email, phone, and address are required; city is free-form and
    /// the PIN code is optional but must be 6 digits when given.
    ///
    /// # Errors
    ///
    /// The first failing check, as a [`CustomerInfoError`].
    pub fn validate(&self) -> Result<(), CustomerInfoError> {
        if self.name.is_empty() {
            return Err(CustomerInfoError::MissingName);
        }

        if self.email.is_empty() {
            return Err(CustomerInfoError::MissingEmail);
        }
        if !self.email.to_lowercase().ends_with(".com") {
            return Err(CustomerInfoError::InvalidEmail);
        }

        if self.phone.is_empty() {
            return Err(CustomerInfoError::MissingPhone);
        }
        if !is_digits(&self.phone, 10) {
            return Err(CustomerInfoError::InvalidPhone);
        }

        if self.address.is_empty() {
            return Err(CustomerInfoError::MissingAddress);
        }

        if !self.pincode.is_empty() && !is_digits(&self.pincode, 6) {
            return Err(CustomerInfoError::InvalidPostalCode);
        }

        Ok(())
    }

    /// True when any field was filled in (used to decide whether the order
    /// message carries a customer block).
    #[must_use]
    pub fn is_any_field_set(&self) -> bool {
        [
            &self.name,
            &self.phone,
            &self.email,
            &self.address,
            &self.city,
            &self.pincode,
        ]
        .iter()
        .any(|field| !field.is_empty())
    }
}

/// Exactly `len` ASCII digits.
fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid() -> CustomerInfo {
        CustomerInfo::from_form(
            "Meera Nair",
            "9876543210",
            "meera@example.com",
            "14 Hillside Lane",
            "Kochi",
            "682001",
        )
    }

    #[test]
    fn test_valid_form() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_optional_fields_may_be_empty() {
        let mut info = valid();
        info.city = String::new();
        info.pincode = String::new();
        assert!(info.validate().is_ok());
    }

    #[test]
    fn test_missing_name() {
        let mut info = valid();
        info.name = String::new();
        assert_eq!(info.validate(), Err(CustomerInfoError::MissingName));
    }

    #[test]
    fn test_email_must_end_with_dot_com() {
        let mut info = valid();
        info.email = "meera@example.org".to_owned();
        assert_eq!(info.validate(), Err(CustomerInfoError::InvalidEmail));

        info.email = "MEERA@EXAMPLE.COM".to_owned();
        assert!(info.validate().is_ok());
    }

    #[test]
    fn test_phone_rejects_short_number() {
        let mut info = valid();
        info.phone = "12345".to_owned();
        assert_eq!(info.validate(), Err(CustomerInfoError::InvalidPhone));
    }

    #[test]
    fn test_phone_accepts_ten_digits() {
        let mut info = valid();
        info.phone = "9876543210".to_owned();
        assert!(info.validate().is_ok());
    }

    #[test]
    fn test_phone_rejects_non_digits() {
        let mut info = valid();
        info.phone = "98765abc10".to_owned();
        assert_eq!(info.validate(), Err(CustomerInfoError::InvalidPhone));
    }

    #[test]
    fn test_pincode_must_be_six_digits_when_given() {
        let mut info = valid();
        info.pincode = "6820".to_owned();
        assert_eq!(info.validate(), Err(CustomerInfoError::InvalidPostalCode));
    }

    #[test]
    fn test_checks_short_circuit_in_field_order() {
        let info = CustomerInfo::default();
        assert_eq!(info.validate(), Err(CustomerInfoError::MissingName));
    }

    #[test]
    fn test_from_form_trims_whitespace() {
        let info = CustomerInfo::from_form(
            "  Meera Nair  ",
            " 9876543210 ",
            " meera@example.com ",
            " 14 Hillside Lane ",
            " Kochi ",
            " 682001 ",
        );
        assert_eq!(info.name, "Meera Nair");
        assert_eq!(info.phone, "9876543210");
        assert!(info.validate().is_ok());
    }

    #[test]
    fn test_is_any_field_set() {
        assert!(!CustomerInfo::default().is_any_field_set());
        let mut info = CustomerInfo::default();
        info.city = "Kochi".to_owned();
        assert!(info.is_any_field_set());
    }
}
