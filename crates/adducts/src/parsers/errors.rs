// Standard Library Imports
use std::{fmt, iter};

// External Crate Imports
use miette::{Diagnostic, LabeledSpan, SourceSpan};
use nom::{
    IResult, Parser,
    error::{ErrorKind, ParseError},
};
use thiserror::Error;

// Public API ==========================================================================================================

pub type ParseResult<'a, O> = IResult<&'a str, O, TagParseError<'a>>;

/// A fully-rendered adduct tag parsing error, pointing back at the offending part of the notation
#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("{kind}")]
pub struct AdductParseError {
    input: String,
    span: SourceSpan,
    kind: AdductErrorKind,
}

impl AdductParseError {
    #[must_use]
    pub const fn kind(&self) -> AdductErrorKind {
        self.kind
    }

    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        self.span
    }
}

// NOTE: This is manually implemented so that the label text can be pulled from `self.kind`
impl Diagnostic for AdductParseError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.input)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind.help()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(Some(self.kind.label().to_owned()), self.span);
        Some(Box::new(iter::once(label)))
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
pub enum AdductErrorKind {
    #[error("expected '[' to open the adduct tag")]
    ExpectedOpenBracket,

    #[diagnostic(help(
        "a count of 0 doesn't make sense here, and a count of 1 is implied, so [M+H]+ is written \
        instead of [1M+H]1+"
    ))]
    #[error("counts cannot start with 0")]
    ExpectedNoLeadingZero,

    #[diagnostic(help("multimers are written with their count directly before the M, like [2M+H]+"))]
    #[error("expected 'M' to stand in for the neutral molecule")]
    ExpectedMolecule,

    #[error("expected the species being added or lost, like the H in [M+H]+")]
    ExpectedSpecies,

    #[diagnostic(help("you've probably forgotten to close the earlier '[' bracket"))]
    #[error("expected ']' to close the adduct tag")]
    ExpectedCloseBracket,

    #[diagnostic(help("positive ions end in '+', and negative ions in '-' or '−'"))]
    #[error("expected the adduct tag to end with the polarity of the ion")]
    ExpectedPolarity,

    #[diagnostic(help(
        "this is an internal error that you shouldn't ever see! If you have gotten this error, \
        then please report it as a bug!"
    ))]
    #[error("internal `nom` error: {0:?}")]
    NomError(ErrorKind),

    #[diagnostic(help("an adduct tag should end immediately after its polarity sign"))]
    #[error("could not interpret the full input as a valid adduct tag")]
    Incomplete,
}

impl AdductErrorKind {
    const fn label(self) -> &'static str {
        match self {
            Self::ExpectedOpenBracket => "expected '['",
            Self::ExpectedNoLeadingZero => "expected non-zero",
            Self::ExpectedMolecule => "expected 'M'",
            Self::ExpectedSpecies => "expected a species",
            Self::ExpectedCloseBracket => "expected ']'",
            Self::ExpectedPolarity => "expected '+' or '-'",
            Self::NomError(_) => "the region that triggered this bug!",
            Self::Incomplete => "input was valid up until this point",
        }
    }
}

impl From<ErrorKind> for AdductErrorKind {
    fn from(value: ErrorKind) -> Self {
        match value {
            ErrorKind::Eof => Self::Incomplete,
            kind => Self::NomError(kind),
        }
    }
}

// Intermediate Parser Errors ==========================================================================================

/// The error threaded through `nom` parsers. It borrows the remaining input until it's finalised
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TagParseError<'a> {
    input: &'a str,
    kind: AdductErrorKind,
}

impl<'a> TagParseError<'a> {
    pub(crate) const fn new(input: &'a str, kind: AdductErrorKind) -> Self {
        Self { input, kind }
    }

    // NOTE: `self.input` is always a suffix of `full_input`, since the parsers only ever slice off the front of it
    pub(crate) fn into_final_error(self, full_input: &str) -> AdductParseError {
        let start = full_input.len().saturating_sub(self.input.len());
        let length = self.input.chars().next().map_or(0, char::len_utf8);
        // NOTE: The additional space is added so that labels can point to the end of an input
        let input = format!("{full_input} ");
        AdductParseError {
            input,
            span: (start..start + length).into(),
            kind: self.kind,
        }
    }
}

impl<'a> ParseError<&'a str> for TagParseError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        Self::new(input, kind.into())
    }

    fn append(_input: &str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

/// Replaces any error from `parser` with one of the given `kind`, keeping failures fatal
pub(crate) fn expect<'a, O, F>(
    mut parser: F,
    kind: AdductErrorKind,
) -> impl FnMut(&'a str) -> ParseResult<'a, O>
where
    F: Parser<&'a str, O, TagParseError<'a>>,
{
    move |i| {
        parser
            .parse(i)
            .map_err(|e| e.map(|_| TagParseError::new(i, kind)))
    }
}
