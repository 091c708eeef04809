use miette::Diagnostic;
use thiserror::Error;

use crate::parsers::errors::AdductParseError;

pub type Result<T, E = Box<AdductError>> = std::result::Result<T, E>;

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum AdductError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse {
        #[from]
        error: AdductParseError,
    },

    #[diagnostic(help("double-check for typos, or add a new entry to the adduct catalog"))]
    #[error("the adduct {tag:?} could not be found in either the positive or negative adduct catalog")]
    UnknownAdduct { tag: String },

    #[diagnostic(help("try one of \"positive\" (\"+\") or \"negative\" (\"-\")"))]
    #[error("{mode:?} is not a recognised ionization mode")]
    UnknownIonizationMode { mode: String },
}

impl AdductError {
    pub(crate) fn unknown_adduct(tag: &str) -> Self {
        let tag = tag.to_owned();

        Self::UnknownAdduct { tag }
    }

    pub(crate) fn unknown_ionization_mode(mode: &str) -> Self {
        let mode = mode.to_owned();

        Self::UnknownIonizationMode { mode }
    }
}
