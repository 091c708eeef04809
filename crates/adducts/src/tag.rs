// Standard Library Imports
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

// Local Crate Imports
use crate::{AdductError, AdductTag, IonizationMode, Result, parsers::adduct_tag::parse_adduct_tag};

// Public API ==========================================================================================================

impl AdductTag {
    pub fn new(notation: impl AsRef<str>) -> Result<Self> {
        parse_adduct_tag(notation.as_ref()).map_err(|e| Box::new(AdductError::from(e)))
    }

    #[must_use]
    pub fn notation(&self) -> &str {
        &self.notation
    }

    /// The number of neutral molecules in the ion, like the 2 in `[2M+H]+`
    #[must_use]
    pub const fn multimer(&self) -> u32 {
        self.multimer.get()
    }

    /// The magnitude of the ion's charge, like the 2 in `[M+2H]2+`
    #[must_use]
    pub const fn charge(&self) -> u32 {
        self.charge.get()
    }

    #[must_use]
    pub const fn mode(&self) -> IonizationMode {
        self.mode
    }
}

impl FromStr for AdductTag {
    type Err = Box<AdductError>;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Display for AdductTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation)
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use crate::parsers::errors::AdductErrorKind;

    use super::*;

    #[test]
    fn new_and_getters() {
        let dimer = AdductTag::new("[2M+NH4]+").unwrap();
        assert_eq!(dimer.notation(), "[2M+NH4]+");
        assert_eq!(dimer.multimer(), 2);
        assert_eq!(dimer.charge(), 1);
        assert_eq!(dimer.mode(), IonizationMode::Positive);

        let doubly_deprotonated = AdductTag::new(String::from("[M-2H]2−")).unwrap();
        assert_eq!(doubly_deprotonated.multimer(), 1);
        assert_eq!(doubly_deprotonated.charge(), 2);
        assert_eq!(doubly_deprotonated.mode(), IonizationMode::Negative);
    }

    #[test]
    fn from_str() {
        let tag: AdductTag = "[M+K]+".parse().unwrap();
        assert_eq!(tag, AdductTag::new("[M+K]+").unwrap());

        let error = "[M+K]".parse::<AdductTag>().unwrap_err();
        let AdductError::Parse { error } = *error else {
            panic!("expected a parse error");
        };
        assert_eq!(error.kind(), AdductErrorKind::ExpectedPolarity);
    }

    #[test]
    fn display_keeps_the_original_notation() {
        // Only the sign is different, so these must stay distinct tags
        let ascii = AdductTag::new("[M-H]-").unwrap();
        let unicode = AdductTag::new("[M-H]−").unwrap();
        assert_eq!(ascii.to_string(), "[M-H]-");
        assert_eq!(unicode.to_string(), "[M-H]−");
        assert_ne!(ascii, unicode);
    }
}
