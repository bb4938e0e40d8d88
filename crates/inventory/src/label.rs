//! Printable barcode labels.
//!
//! An item can be labelled with its retail barcode (EAN-13 or UPC-A) or with
//! its internal code, which is printed as Code 128 since it is not numeric.

use barcoders::generators::image::Image;
use barcoders::sym::code128::Code128;
use barcoders::sym::ean13::EAN13;
use serde::{Deserialize, Serialize};

use zaiko_core::{DomainError, DomainResult};

use crate::barcode::{Barcode, Symbology};
use crate::internal_code::is_internal_code;
use crate::model::InventoryItem;

/// Bar height of exported label images, in pixels.
pub const LABEL_HEIGHT: u32 = 200;

/// Code 128 start character selecting code set B (printable ASCII).
const CODE_SET_B: char = 'Ɓ';

/// Which of an item's codes to put on the label.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSource {
    /// The retail barcode.
    Retail,
    /// The `ZAIKO-ITEM` code.
    Internal,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelFormat {
    #[serde(rename = "EAN-13")]
    Ean13,
    #[serde(rename = "UPC-A")]
    UpcA,
    #[serde(rename = "CODE128")]
    Code128,
}

/// An encoded barcode: one entry per module, `1` for a bar and `0` for a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeLabel {
    format: LabelFormat,
    text: String,
    modules: Vec<u8>,
}

impl BarcodeLabel {
    /// Encode a retail barcode.
    ///
    /// UPC-A is encoded as the equivalent EAN-13 with a leading zero; the
    /// bars are identical.
    pub fn retail(code: &str) -> DomainResult<Self> {
        let barcode = Barcode::parse(code)?;
        let digits = barcode.as_str();

        let (format, payload) = match barcode.symbology() {
            Symbology::Ean13 => (LabelFormat::Ean13, digits[..12].to_string()),
            Symbology::UpcA => (LabelFormat::UpcA, format!("0{}", &digits[..11])),
        };

        let modules = EAN13::new(&payload)
            .map_err(|e| DomainError::validation(format!("cannot encode barcode {code:?}: {e}")))?
            .encode();

        Ok(Self {
            format,
            text: digits.to_string(),
            modules,
        })
    }

    /// Encode an internal code as Code 128.
    pub fn internal(code: &str) -> DomainResult<Self> {
        let code = code.trim();
        if !is_internal_code(code) {
            return Err(DomainError::validation(format!("internal code {code:?} is not valid")));
        }

        let modules = Code128::new(format!("{CODE_SET_B}{code}"))
            .map_err(|e| DomainError::validation(format!("cannot encode internal code {code:?}: {e}")))?
            .encode();

        Ok(Self {
            format: LabelFormat::Code128,
            text: code.to_string(),
            modules,
        })
    }

    /// Label for one of `item`'s codes.
    pub fn for_item(item: &InventoryItem, source: LabelSource) -> DomainResult<Self> {
        match source {
            LabelSource::Retail => match item.barcode.as_deref() {
                Some(code) => Self::retail(code),
                None => Err(DomainError::validation(format!(
                    "item {:?} has no retail barcode",
                    item.name
                ))),
            },
            LabelSource::Internal => match item.internal_code.as_deref() {
                Some(code) => Self::internal(code),
                None => Err(DomainError::validation(format!(
                    "item {:?} has no internal code",
                    item.name
                ))),
            },
        }
    }

    pub fn format(&self) -> LabelFormat {
        self.format
    }

    /// The encoded value, as printed under the bars.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn modules(&self) -> &[u8] {
        &self.modules
    }

    /// Render as a PNG image `height` pixels tall.
    pub fn to_png(&self, height: u32) -> DomainResult<Vec<u8>> {
        Image::png(height)
            .generate(&self.modules[..])
            .map_err(|e| DomainError::validation(format!("cannot render {:?}: {e}", self.text)))
    }
}
