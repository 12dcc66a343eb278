//! Payment method accepted for a sale.

use serde::{Deserialize, Serialize};

/// How the buyer paid. Defaults to cash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash in hand.
    #[default]
    Cash,
    /// Google Pay UPI transfer.
    Gpay,
    /// PhonePe UPI transfer.
    Phonepe,
    /// Any other UPI app.
    UpiOther,
}

impl PaymentMethod {
    /// Stable string form used for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Gpay => "gpay",
            PaymentMethod::Phonepe => "phonepe",
            PaymentMethod::UpiOther => "upi_other",
        }
    }

    /// Parse the stored string form; unknown values fall back to cash.
    pub fn from_stored(s: &str) -> Self {
        match s {
            "gpay" => PaymentMethod::Gpay,
            "phonepe" => PaymentMethod::Phonepe,
            "upi_other" => PaymentMethod::UpiOther,
            _ => PaymentMethod::Cash,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_serialization() {
        let json = serde_json::to_string(&PaymentMethod::UpiOther).unwrap();
        assert_eq!(json, "\"upi_other\"");

        let parsed: PaymentMethod = serde_json::from_str("\"gpay\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Gpay);
    }

    #[test]
    fn test_payment_method_default_is_cash() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
    }

    #[test]
    fn test_payment_method_stored_roundtrip() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::Gpay,
            PaymentMethod::Phonepe,
            PaymentMethod::UpiOther,
        ] {
            assert_eq!(PaymentMethod::from_stored(method.as_str()), method);
        }
    }

    #[test]
    fn test_payment_method_unknown_falls_back_to_cash() {
        assert_eq!(PaymentMethod::from_stored("cheque"), PaymentMethod::Cash);
    }
}
