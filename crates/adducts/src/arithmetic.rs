// Standard Library Imports
use std::{num::NonZeroU32, sync::LazyLock};

// External Crate Imports
use regex::Regex;

// Local Crate Imports
use crate::{AdductCatalog, CatalogEntry, Result};

// Public API ==========================================================================================================

/// Reads the multimer count out of an adduct tag, like the 2 in `[2M+H]+`, defaulting to 1
///
/// Unlike [`AdductTag::new()`](crate::AdductTag::new), this never fails: any text without a count in front of an `M`
/// is treated as a single molecule.
#[must_use]
pub fn parse_multimer(tag: &str) -> u32 {
    static MULTIMER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)M").unwrap());
    leading_count(&MULTIMER, tag)
}

/// Reads the magnitude of the charge out of an adduct tag, like the 2 in `[M+2H]2+`, defaulting to 1
///
/// Only digits directly before the final `+`, `-`, or `−` count, so the multimer in `[2M+H]+` is never mistaken for a
/// charge.
#[must_use]
pub fn parse_charge(tag: &str) -> u32 {
    static CHARGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)[+\-−]$").unwrap());
    leading_count(&CHARGE, tag)
}

/// The deviation of `experimental` from `theoretical` in parts-per-million, rounded to the nearest whole ppm
///
/// A `theoretical` value of zero has no relative deviation, so that (like any other non-finite result) yields `None`.
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn ppm_increment(experimental: f64, theoretical: f64) -> Option<u32> {
    let ppm = ((experimental - theoretical) * 1e6 / theoretical).abs().round();
    // NOTE: Float to int `as` casts saturate, so huge deviations clamp to `u32::MAX`
    ppm.is_finite().then_some(ppm as u32)
}

/// The absolute mass difference equivalent to `ppm` parts-per-million of `mass`, rounded to a whole number
#[must_use]
pub fn ppm_tolerance_window(mass: f64, ppm: u32) -> f64 {
    (mass * f64::from(ppm) / 1e6).abs().round()
}

impl AdductCatalog {
    /// Computes the monoisotopic neutral mass of a molecule observed at `mz` as the adduct `tag`
    ///
    /// # Errors
    ///
    /// Returns [`AdductError::UnknownAdduct`](crate::AdductError::UnknownAdduct) if `tag` isn't in either the
    /// positive or negative adducts of this catalog.
    pub fn mass_from_mz(&self, mz: f64, tag: &str) -> Result<f64> {
        self.lookup(tag).map(|adduct| adduct.mass_from_mz(mz))
    }

    /// Computes the m/z at which a molecule of monoisotopic `mass` would be observed as the adduct `tag`
    ///
    /// # Errors
    ///
    /// Returns [`AdductError::UnknownAdduct`](crate::AdductError::UnknownAdduct) if `tag` isn't in either the
    /// positive or negative adducts of this catalog.
    pub fn mz_from_mass(&self, mass: f64, tag: &str) -> Result<f64> {
        self.lookup(tag).map(|adduct| adduct.mz_from_mass(mass))
    }
}

impl CatalogEntry {
    #[must_use]
    pub fn mass_from_mz(&self, mz: f64) -> f64 {
        let (multimer, charge) = self.counts();
        (mz * charge + self.mass_shift) / multimer
    }

    #[must_use]
    pub fn mz_from_mass(&self, mass: f64) -> f64 {
        let (multimer, charge) = self.counts();
        (mass * multimer - self.mass_shift) / charge
    }

    fn counts(&self) -> (f64, f64) {
        (
            f64::from(self.tag.multimer()),
            f64::from(self.tag.charge()),
        )
    }
}

// Private Helper Functions ============================================================================================

fn leading_count(pattern: &Regex, tag: &str) -> u32 {
    pattern
        .captures(tag)
        .and_then(|captures| captures[1].parse().ok())
        .map_or(1, NonZeroU32::get)
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use assert_float_eq::{assert_float_absolute_eq, assert_float_relative_eq};

    use crate::{AdductError, AdductTag};

    use super::*;

    static CATALOG: LazyLock<AdductCatalog> = LazyLock::new(AdductCatalog::default);

    #[test]
    fn test_parse_multimer() {
        assert_eq!(parse_multimer("[M+H]+"), 1);
        assert_eq!(parse_multimer("[2M+H]+"), 2);
        assert_eq!(parse_multimer("[2M+Na]+"), 2);
        assert_eq!(parse_multimer("[3M-H]−"), 3);
        assert_eq!(parse_multimer("[12M+2H]2+"), 12);
        assert_eq!(parse_multimer("[M+2H]2+"), 1);
        // Lenient inputs
        assert_eq!(parse_multimer(""), 1);
        assert_eq!(parse_multimer("not an adduct"), 1);
        assert_eq!(parse_multimer("[0M+H]+"), 1);
    }

    #[test]
    fn test_parse_charge() {
        assert_eq!(parse_charge("[M+H]+"), 1);
        assert_eq!(parse_charge("[M+2H]2+"), 2);
        assert_eq!(parse_charge("[M+3H]3+"), 3);
        assert_eq!(parse_charge("[M-2H]2−"), 2);
        assert_eq!(parse_charge("[M-2H]2-"), 2);
        // Multimer counts aren't charges
        assert_eq!(parse_charge("[2M+H]+"), 1);
        assert_eq!(parse_charge("[2M-H]−"), 1);
        // Lenient inputs
        assert_eq!(parse_charge(""), 1);
        assert_eq!(parse_charge("[M+2H]2"), 1);
        assert_eq!(parse_charge("[M+H]0+"), 1);
    }

    #[test]
    fn lenient_and_structured_parsing_agree() {
        for adduct in CATALOG.iter() {
            let tag = adduct.tag();
            assert_eq!(parse_multimer(tag.notation()), tag.multimer(), "{tag}");
            assert_eq!(parse_charge(tag.notation()), tag.charge(), "{tag}");
        }
    }

    #[test]
    fn test_ppm_increment() {
        assert_eq!(ppm_increment(105.0, 100.0), Some(50_000));
        assert_eq!(ppm_increment(95.0, 100.0), Some(50_000));
        assert_eq!(ppm_increment(100.0, 100.0), Some(0));
        assert_eq!(ppm_increment(700.5004, 700.5), Some(1));
        assert_eq!(ppm_increment(21.976, 21.9819), Some(268));
        // Undefined without a theoretical value to compare against
        assert_eq!(ppm_increment(1.0, 0.0), None);
        assert_eq!(ppm_increment(0.0, 0.0), None);
        assert_eq!(ppm_increment(f64::NAN, 100.0), None);
    }

    #[test]
    fn test_ppm_tolerance_window() {
        assert_float_absolute_eq!(ppm_tolerance_window(1_000_000.0, 10), 10.0);
        assert_float_absolute_eq!(ppm_tolerance_window(-1_000_000.0, 10), 10.0);
        assert_float_absolute_eq!(ppm_tolerance_window(250_000.0, 10), 3.0);
        assert_float_absolute_eq!(ppm_tolerance_window(700.5, 10), 0.0);
        assert_float_absolute_eq!(ppm_tolerance_window(700.5, 0), 0.0);
    }

    #[test]
    fn mass_from_mz() {
        // PC 34:1 has a monoisotopic mass of 759.577805
        let mass = CATALOG.mass_from_mz(760.585_081, "[M+H]+").unwrap();
        assert_float_absolute_eq!(mass, 759.577_805);
        let mass = CATALOG.mass_from_mz(782.567_023, "[M+Na]+").unwrap();
        assert_float_absolute_eq!(mass, 759.577_805);
        let mass = CATALOG.mass_from_mz(1_520.162_886, "[2M+H]+").unwrap();
        assert_float_absolute_eq!(mass, 759.577_805);
        let mass = CATALOG.mass_from_mz(380.796_178_5, "[M+2H]2+").unwrap();
        assert_float_absolute_eq!(mass, 759.577_805);
        let mass = CATALOG.mass_from_mz(758.570_529, "[M-H]−").unwrap();
        assert_float_absolute_eq!(mass, 759.577_805);
    }

    #[test]
    fn mz_from_mass() {
        let mz = CATALOG.mz_from_mass(759.577_805, "[M+H]+").unwrap();
        assert_float_absolute_eq!(mz, 760.585_081);
        let mz = CATALOG.mz_from_mass(759.577_805, "[2M+Na]+").unwrap();
        assert_float_absolute_eq!(mz, 1_542.144_828);
        let mz = CATALOG.mz_from_mass(759.577_805, "[M-2H]2−").unwrap();
        assert_float_absolute_eq!(mz, 378.781_626_5);
        let mz = CATALOG.mz_from_mass(759.577_805, "[M+Cl]−").unwrap();
        assert_float_absolute_eq!(mz, 794.547_207);
    }

    #[test]
    fn mass_and_mz_round_trip() {
        for adduct in CATALOG.iter() {
            let tag = adduct.tag().notation();
            for mass in [100.0, 500.25, 759.577_805, 1_500.0] {
                let mz = CATALOG.mz_from_mass(mass, tag).unwrap();
                let round_trip = CATALOG.mass_from_mz(mz, tag).unwrap();
                assert_float_relative_eq!(round_trip, mass, 1e-9);
            }
        }
    }

    #[test]
    fn unknown_adducts_are_errors() {
        let unknown = AdductError::UnknownAdduct {
            tag: "[M+Xe]+".to_owned(),
        };
        assert_eq!(*CATALOG.mass_from_mz(100.0, "[M+Xe]+").unwrap_err(), unknown);
        assert_eq!(*CATALOG.mz_from_mass(100.0, "[M+Xe]+").unwrap_err(), unknown);
        // Tags are catalog keys, so a well-formed tag can still be missing
        assert!(AdductTag::new("[M+Xe]+").is_ok());
    }
}
