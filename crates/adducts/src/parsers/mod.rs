pub(crate) mod adduct_tag;
pub mod errors;

// Re-exports
pub use adduct_tag::adduct_tag;
