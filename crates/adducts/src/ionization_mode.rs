// Standard Library Imports
use std::{
    fmt::{self, Display, Formatter},
    num::NonZeroU32,
    str::FromStr,
};

// Local Crate Imports
use crate::{AdductError, AdductTag, IonizationMode, Result};

// Public API ==========================================================================================================

/// The adduct assumed for positive-mode features when nothing better can be inferred
pub const DEFAULT_POSITIVE_ADDUCT: &str = "[M+H]+";
/// The adduct assumed for negative-mode features when nothing better can be inferred
///
/// NOTE: This ends in a U+2212 minus sign, not an ASCII hyphen, so it must match catalog keys byte-for-byte
pub const DEFAULT_NEGATIVE_ADDUCT: &str = "[M-H]−";

impl IonizationMode {
    /// The fallback adduct for this mode: a single protonated or deprotonated molecule
    #[must_use]
    pub fn default_adduct(self) -> AdductTag {
        let notation = match self {
            Self::Positive => DEFAULT_POSITIVE_ADDUCT,
            Self::Negative => DEFAULT_NEGATIVE_ADDUCT,
        };
        AdductTag {
            notation: notation.to_owned(),
            multimer: NonZeroU32::MIN,
            charge: NonZeroU32::MIN,
            mode: self,
        }
    }

    pub(crate) const fn from_sign(sign: char) -> Option<Self> {
        match sign {
            '+' => Some(Self::Positive),
            '-' | '−' => Some(Self::Negative),
            _ => None,
        }
    }
}

impl FromStr for IonizationMode {
    type Err = Box<AdductError>;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "positive" | "pos" | "+" => Ok(Self::Positive),
            "negative" | "neg" | "-" | "−" => Ok(Self::Negative),
            _ => Err(AdductError::unknown_ionization_mode(s).into()),
        }
    }
}

impl Display for IonizationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mode = match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        };
        write!(f, "{mode}")
    }
}

// Module Tests ========================================================================================================
