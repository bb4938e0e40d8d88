//! Retail barcode check-digit validation (EAN-13 and UPC-A).
//!
//! Length decides the symbology: 12 digits are only ever checked as UPC-A and
//! 13 digits only as EAN-13. Anything else is rejected before any arithmetic.

use serde::{Deserialize, Serialize};

use zaiko_core::{DomainError, DomainResult};

/// Barcode standard a numeric string conforms to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbology {
    #[serde(rename = "EAN-13")]
    Ean13,
    #[serde(rename = "UPC-A")]
    UpcA,
}

impl Symbology {
    /// Total number of digits, check digit included.
    pub const fn digit_count(self) -> usize {
        match self {
            Symbology::Ean13 => 13,
            Symbology::UpcA => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Symbology::Ean13 => "EAN-13",
            Symbology::UpcA => "UPC-A",
        }
    }

    fn for_len(len: usize) -> Option<Self> {
        match len {
            13 => Some(Symbology::Ean13),
            12 => Some(Symbology::UpcA),
            _ => None,
        }
    }
}

impl core::fmt::Display for Symbology {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`classify`].
///
/// `symbology` and `normalized_code` are only populated for valid codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeResult {
    pub valid: bool,
    pub symbology: Option<Symbology>,
    pub normalized_code: Option<String>,
}

impl BarcodeResult {
    fn invalid() -> Self {
        Self {
            valid: false,
            symbology: None,
            normalized_code: None,
        }
    }
}

/// Check whether `code` is a valid EAN-13 or UPC-A barcode.
///
/// Never fails: malformed input yields an invalid result.
pub fn classify(code: &str) -> BarcodeResult {
    let Some(digits) = ascii_digits(code) else {
        return BarcodeResult::invalid();
    };
    let Some(symbology) = Symbology::for_len(digits.len()) else {
        return BarcodeResult::invalid();
    };

    let (payload, check) = digits.split_at(digits.len() - 1);
    if expected_check_digit(symbology, payload) != check[0] {
        return BarcodeResult::invalid();
    }

    BarcodeResult {
        valid: true,
        symbology: Some(symbology),
        normalized_code: Some(code.to_string()),
    }
}

/// Expected check digit for a barcode payload (every digit but the last).
///
/// The payload must be 12 digits for EAN-13 and 11 digits for UPC-A.
pub fn check_digit(symbology: Symbology, payload: &str) -> Option<u8> {
    let digits = ascii_digits(payload)?;
    if digits.len() != symbology.digit_count() - 1 {
        return None;
    }
    Some(expected_check_digit(symbology, &digits))
}

fn ascii_digits(code: &str) -> Option<Vec<u8>> {
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(code.bytes().map(|b| b - b'0').collect())
}

/// Positions are 1-indexed in both standards. EAN-13 weights even positions
/// by 3, UPC-A weights odd positions by 3.
fn expected_check_digit(symbology: Symbology, payload: &[u8]) -> u8 {
    let (odd, even) = payload.iter().enumerate().fold((0u32, 0u32), |(odd, even), (i, &d)| {
        if (i + 1) % 2 == 1 {
            (odd + u32::from(d), even)
        } else {
            (odd, even + u32::from(d))
        }
    });

    let total = match symbology {
        Symbology::Ean13 => odd + even * 3,
        Symbology::UpcA => odd * 3 + even,
    };

    ((10 - total % 10) % 10) as u8
}

/// A retail barcode that passed [`classify`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Barcode {
    code: String,
    symbology: Symbology,
}

impl Barcode {
    pub fn parse(code: &str) -> DomainResult<Self> {
        let result = classify(code);
        match (result.symbology, result.normalized_code) {
            (Some(symbology), Some(code)) if result.valid => Ok(Self { code, symbology }),
            _ => Err(DomainError::validation(format!(
                "barcode {code:?} is not a valid EAN-13 or UPC-A code"
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn symbology(&self) -> Symbology {
        self.symbology
    }
}

impl TryFrom<String> for Barcode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Barcode> for String {
    fn from(value: Barcode) -> Self {
        value.code
    }
}

impl core::fmt::Display for Barcode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EAN: &str = "4006381333931";
    const UPC: &str = "036000291452";

    #[test]
    fn accepts_known_ean13() {
        let result = classify(EAN);
        assert!(result.valid);
        assert_eq!(result.symbology, Some(Symbology::Ean13));
        assert_eq!(result.normalized_code.as_deref(), Some(EAN));
    }

    #[test]
    fn accepts_known_upca() {
        let result = classify(UPC);
        assert!(result.valid);
        assert_eq!(result.symbology, Some(Symbology::UpcA));
        assert_eq!(result.normalized_code.as_deref(), Some(UPC));
    }

    #[test]
    fn any_other_check_digit_is_rejected() {
        for code in [EAN, UPC] {
            let (payload, check) = code.split_at(code.len() - 1);
            for d in (0..10).map(|d| d.to_string()).filter(|d| d != check) {
                let mutated = format!("{payload}{d}");
                let result = classify(&mutated);
                assert!(!result.valid, "{mutated} should be invalid");
                assert_eq!(result.symbology, None);
                assert_eq!(result.normalized_code, None);
            }
        }
    }

    #[test]
    fn rejects_wrong_lengths_and_non_digits() {
        for code in [
            "",
            "12345",
            "40063813339310",
            "03600029145",
            "40063813339a1",
            " 036000291452",
            "036000291452 ",
            "-36000291452",
            // fullwidth digits are not ASCII digits
            "０３６０００２９１４５２",
        ] {
            assert_eq!(classify(code), BarcodeResult::invalid(), "{code:?}");
        }
    }

    #[test]
    fn length_alone_selects_the_algorithm() {
        // A valid UPC-A with a leading zero prepended is also a valid EAN-13,
        // but the 12-digit form is never checked as EAN-13.
        let as_ean = format!("0{UPC}");
        assert_eq!(classify(&as_ean).symbology, Some(Symbology::Ean13));
        assert_eq!(classify(UPC).symbology, Some(Symbology::UpcA));
    }

    #[test]
    fn check_digit_matches_known_codes() {
        assert_eq!(check_digit(Symbology::Ean13, &EAN[..12]), Some(1));
        assert_eq!(check_digit(Symbology::UpcA, &UPC[..11]), Some(2));
        assert_eq!(check_digit(Symbology::UpcA, &EAN[..12]), None);
        assert_eq!(check_digit(Symbology::Ean13, "40063813339x"), None);
    }

    #[test]
    fn zero_remainder_gives_zero_check_digit() {
        assert!(classify("0000000000000").valid);
        assert!(classify("000000000000").valid);
    }

    #[test]
    fn barcode_parse_keeps_symbology() {
        let barcode = Barcode::parse(UPC).unwrap();
        assert_eq!(barcode.symbology(), Symbology::UpcA);
        assert_eq!(barcode.as_str(), UPC);

        match Barcode::parse("4006381333930").unwrap_err() {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn symbology_serializes_with_dashed_names() {
        let result = classify(EAN);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "valid": true,
                "symbology": "EAN-13",
                "normalizedCode": EAN,
            })
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: strings whose length is neither 12 nor 13 are invalid.
            #[test]
            fn wrong_length_is_invalid(code in "[0-9]{0,11}|[0-9]{14,20}") {
                prop_assert_eq!(classify(&code), BarcodeResult::invalid());
            }

            /// Property: a single non-digit anywhere makes the code invalid.
            #[test]
            fn non_digit_is_invalid(
                prefix in "[0-9]{0,12}",
                bad in "[^0-9]",
                suffix in "[0-9]{0,12}",
            ) {
                let code = format!("{prefix}{bad}{suffix}");
                prop_assert_eq!(classify(&code), BarcodeResult::invalid());
            }

            /// Property: appending the computed check digit always yields a valid code.
            #[test]
            fn computed_check_digit_is_accepted(payload in "[0-9]{12}") {
                let d = check_digit(Symbology::Ean13, &payload).unwrap();
                let result = classify(&format!("{payload}{d}"));
                prop_assert!(result.valid);
                prop_assert_eq!(result.symbology, Some(Symbology::Ean13));

                let upc_payload = &payload[..11];
                let d = check_digit(Symbology::UpcA, upc_payload).unwrap();
                let result = classify(&format!("{upc_payload}{d}"));
                prop_assert!(result.valid);
                prop_assert_eq!(result.symbology, Some(Symbology::UpcA));
            }
        }
    }
}
