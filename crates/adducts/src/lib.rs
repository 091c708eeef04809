//! Adduct arithmetic and adduct inference for lipid annotation

mod annotation;
mod arithmetic;
pub mod catalog;
pub mod errors;
mod inference;
mod ionization_mode;
pub mod parsers;
mod peak;
mod tag;

// Standard Library Imports
use std::{collections::BTreeSet, num::NonZeroU32};

// External Crate Imports
use derive_more::Constructor;
use indexmap::IndexMap;
use static_assertions::assert_impl_all;

// Public Re-exports
pub use annotation::dedup_annotations;
pub use arithmetic::{parse_charge, parse_multimer, ppm_increment, ppm_tolerance_window};
pub use errors::{AdductError, Result};
pub use ionization_mode::{DEFAULT_NEGATIVE_ADDUCT, DEFAULT_POSITIVE_ADDUCT};

// Public API ==========================================================================================================

/// An ionisation adduct, parsed from bracket notation like `[2M+H]+` or `[M-2H]2−`
///
/// The original notation is kept verbatim, since that is what the [`AdductCatalog`] is keyed by.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct AdductTag {
    notation: String,
    multimer: NonZeroU32,
    charge: NonZeroU32,
    mode: IonizationMode,
}

#[derive(Clone, PartialEq, Debug)]
pub struct CatalogEntry {
    tag: AdductTag,
    mass_shift: f64,
}

/// Signed adduct mass shifts, split by ionisation mode and kept in the order they were defined
#[derive(Clone, PartialEq, Debug)]
pub struct AdductCatalog {
    positive: Adducts,
    negative: Adducts,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum IonizationMode {
    Positive,
    Negative,
}

/// A centroided signal. Peaks are equal to, and ordered by, their m/z alone
#[derive(Copy, Clone, Debug, Constructor)]
pub struct Peak {
    mz: f64,
    intensity: f64,
}

/// A putative lipid identity for a feature, along with the peaks grouped with it and its running score
///
/// Two annotations are the same annotation when they share a lipid, m/z, and retention time. The assigned adduct and
/// score don't take part in equality or hashing.
#[derive(Clone, Debug)]
pub struct Annotation<L> {
    lipid: L,
    mz: f64,
    intensity: f64,
    retention_time: f64,
    ionization_mode: IonizationMode,
    adduct: Option<AdductTag>,
    grouped_signals: BTreeSet<Peak>,
    score: i32,
    evaluation_count: u32,
}

// ---------------------------------------------------------------------------------------------------------------------

type Adducts = IndexMap<String, CatalogEntry>;

// NOTE: A single catalog is built once and then shared between every worker running inference
assert_impl_all!(AdductCatalog: Send, Sync);
assert_impl_all!(Annotation<String>: Send);
