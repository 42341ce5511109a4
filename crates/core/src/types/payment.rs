//! Payment method selection.

use serde::{Deserialize, Serialize};

/// Code of the always-available pay-at-counter method.
pub const CASH_CODE: &str = "CASH";

/// The payment method chosen at checkout.
///
/// Cash is paid at the counter; every other method is a channel offered by
/// the payment provider and identified by its code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Channel(String),
}

impl PaymentMethod {
    /// Build a method from a channel code. `CASH` in any case is cash.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        if code.eq_ignore_ascii_case(CASH_CODE) {
            Self::Cash
        } else {
            Self::Channel(code.to_owned())
        }
    }

    /// Code as the order endpoint expects it: `CASH` verbatim, channel codes
    /// lower-cased.
    #[must_use]
    pub fn wire_code(&self) -> String {
        match self {
            Self::Cash => CASH_CODE.to_owned(),
            Self::Channel(code) => code.to_lowercase(),
        }
    }

    /// Returns true for pay-at-counter.
    #[must_use]
    pub const fn is_cash(&self) -> bool {
        matches!(self, Self::Cash)
    }
}

impl From<String> for PaymentMethod {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        method.wire_code()
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => f.write_str(CASH_CODE),
            Self::Channel(code) => f.write_str(code),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cash_wire_code_is_verbatim() {
        assert_eq!(PaymentMethod::Cash.wire_code(), "CASH");
        assert_eq!(PaymentMethod::from_code("cash").wire_code(), "CASH");
    }

    #[test]
    fn test_channel_wire_code_is_lowercased() {
        assert_eq!(PaymentMethod::from_code("QRIS").wire_code(), "qris");
        assert_eq!(PaymentMethod::from_code("BRIVA").wire_code(), "briva");
    }

    #[test]
    fn test_serialize_uses_wire_code() {
        let json = serde_json::to_string(&PaymentMethod::from_code("OVO")).unwrap();
        assert_eq!(json, "\"ovo\"");
    }

    #[test]
    fn test_default_is_cash() {
        assert!(PaymentMethod::default().is_cash());
    }
}
