// External Crate Imports
use indexmap::{IndexMap, map::Entry};
use knus::{Decode, span::Span};
use miette::{Diagnostic, LabeledSpan, NamedSource, Result};
use thiserror::Error;
use tracing::debug;

// Local Crate Imports
use crate::{AdductCatalog, AdductError, AdductTag, Adducts, CatalogEntry, IonizationMode};

// Public API ==========================================================================================================

/// The bundled catalog of common lipid adducts, used by [`AdductCatalog::default()`]
pub const DEFAULT_KDL: &str = include_str!("../data/adduct_catalog.kdl");

impl AdductCatalog {
    pub fn new(file_name: impl AsRef<str>, kdl_text: impl AsRef<str>) -> Result<Self> {
        let parsed_catalog: AdductCatalogKdl = knus::parse(file_name.as_ref(), kdl_text.as_ref())?;
        let catalog = parsed_catalog
            .validate(())
            .map_err(|e| e.finalize(file_name, kdl_text))?;

        debug!(
            positive = catalog.positive.len(),
            negative = catalog.negative.len(),
            "loaded adduct catalog"
        );
        Ok(catalog)
    }

    /// Looks `notation` up in the positive adducts, then in the negative ones
    #[must_use]
    pub fn get(&self, notation: &str) -> Option<&CatalogEntry> {
        self.positive
            .get(notation)
            .or_else(|| self.negative.get(notation))
    }

    pub fn lookup(&self, notation: &str) -> crate::Result<&CatalogEntry> {
        self.get(notation)
            .ok_or_else(|| AdductError::unknown_adduct(notation).into())
    }

    /// The adducts of a single ionization mode, in the order they were defined
    pub fn adducts(&self, mode: IonizationMode) -> impl ExactSizeIterator<Item = &CatalogEntry> {
        self.mode_adducts(mode).values()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.positive.values().chain(self.negative.values())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) const fn mode_adducts(&self, mode: IonizationMode) -> &Adducts {
        match mode {
            IonizationMode::Positive => &self.positive,
            IonizationMode::Negative => &self.negative,
        }
    }
}

impl Default for AdductCatalog {
    fn default() -> Self {
        // NOTE: The bundled catalog is validated by the tests below
        Self::new("adduct_catalog.kdl", DEFAULT_KDL).unwrap()
    }
}

impl CatalogEntry {
    #[must_use]
    pub const fn tag(&self) -> &AdductTag {
        &self.tag
    }

    /// The signed mass shift, satisfying `M = (m/z * charge + shift) / multimer`
    #[must_use]
    pub const fn mass_shift(&self) -> f64 {
        self.mass_shift
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
#[knus(span_type=Span)]
struct AdductCatalogKdl {
    #[knus(child, unwrap(children))]
    positive: Vec<AdductKdl>,
    #[knus(child, unwrap(children))]
    negative: Vec<AdductKdl>,
}

#[derive(Debug, Decode)]
#[knus(span_type=Span)]
struct AdductKdl {
    #[knus(span)]
    span: Span,
    #[knus(node_name)]
    notation: String,
    #[knus(argument)]
    mass_shift: f64,
}

// Contextual Validation Trait =========================================================================================

type CatalogResult<T> = std::result::Result<T, CatalogErrorKind>;

trait ValidateInto<T> {
    type Context;

    fn validate(self, ctx: Self::Context) -> CatalogResult<T>;
}

// Adduct Catalog Validation ===========================================================================================

impl ValidateInto<AdductCatalog> for AdductCatalogKdl {
    type Context = ();

    fn validate(self, _ctx: Self::Context) -> CatalogResult<AdductCatalog> {
        Ok(AdductCatalog {
            positive: self.positive.validate(IonizationMode::Positive)?,
            negative: self.negative.validate(IonizationMode::Negative)?,
        })
    }
}

// NOTE: The context is the ionization mode of the section these adducts were listed under
impl ValidateInto<Adducts> for Vec<AdductKdl> {
    type Context = IonizationMode;

    fn validate(self, ctx: Self::Context) -> CatalogResult<Adducts> {
        let mut seen_adducts = IndexMap::with_capacity(self.len());

        for adduct in self {
            let (span, entry) = adduct.validate(ctx)?;

            match seen_adducts.entry(entry.tag.notation.clone()) {
                Entry::Occupied(e) => {
                    let (notation, (first_defined_at, _)) = e.shift_remove_entry();
                    return Err(CatalogErrorKind::DuplicateAdduct(
                        first_defined_at,
                        span,
                        notation,
                    ));
                }
                Entry::Vacant(e) => {
                    e.insert((span, entry));
                }
            }
        }

        Ok(seen_adducts
            .into_iter()
            .map(|(notation, (_, entry))| (notation, entry))
            .collect())
    }
}

type AdductEntry = (Span, CatalogEntry);

impl ValidateInto<AdductEntry> for AdductKdl {
    type Context = IonizationMode;

    fn validate(self, ctx: Self::Context) -> CatalogResult<AdductEntry> {
        let tag = AdductTag::new(&self.notation)
            .map_err(|e| CatalogErrorKind::InvalidTag(self.span, *e))?;

        if tag.mode() != ctx {
            return Err(CatalogErrorKind::PolarityMismatch(
                self.span,
                self.notation,
                ctx,
            ));
        }

        let entry = CatalogEntry {
            tag,
            mass_shift: self.mass_shift,
        };
        Ok((self.span, entry))
    }
}

// Validation Error Types and Trait Implementations ====================================================================

#[derive(Debug, Error)]
#[error("failed to validate adduct catalog file")]
struct CatalogError {
    kdl: NamedSource<String>,
    #[source]
    kind: CatalogErrorKind,
}

// NOTE: This is manually implemented because the list of labels is dynamic and needs to be extracted from `self.kind`
impl Diagnostic for CatalogError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.kdl)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(self.kind.labels().into_iter().map(|(s, l)| {
            LabeledSpan::new_with_span(Some(l.to_owned()), *s)
        })))
    }

    fn diagnostic_source(&self) -> Option<&dyn Diagnostic> {
        Some(&self.kind)
    }
}

#[derive(Clone, Debug, Diagnostic, Error)]
enum CatalogErrorKind {
    #[error("the adduct {2:?} has already been defined")]
    #[diagnostic(help("remove the duplicate entry, or double-check its notation for typos"))]
    DuplicateAdduct(Span, Span, String),

    #[error("the adduct {1:?} was listed with the {2} adducts, but its charge has the opposite sign")]
    #[diagnostic(help("move the adduct to the other section, or correct the sign that ends its notation"))]
    PolarityMismatch(Span, String, IonizationMode),

    #[error("adduct catalog file contained an invalid adduct tag")]
    InvalidTag(
        Span,
        #[source]
        #[diagnostic_source]
        AdductError,
    ),
}

impl CatalogErrorKind {
    fn labels(&self) -> Vec<(&Span, &'static str)> {
        match self {
            Self::DuplicateAdduct(s1, s2, _) => {
                vec![(s1, "first defined here"), (s2, "then again here")]
            }
            Self::PolarityMismatch(s, _, IonizationMode::Positive) => {
                vec![(s, "not a positive ion")]
            }
            Self::PolarityMismatch(s, _, IonizationMode::Negative) => {
                vec![(s, "not a negative ion")]
            }
            Self::InvalidTag(s, _) => vec![(s, "invalid adduct tag")],
        }
    }

    fn finalize(self, file_name: impl AsRef<str>, kdl: impl AsRef<str>) -> CatalogError {
        let kdl = NamedSource::new(file_name, kdl.as_ref().to_owned());
        CatalogError { kdl, kind: self }
    }
}

// Module Tests ========================================================================================================
