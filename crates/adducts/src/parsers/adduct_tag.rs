// Standard Library Imports
use std::num::NonZeroU32;

// External Crate Imports
use nom::{
    Finish,
    bytes::complete::take_while1,
    character::complete::{char, one_of, u32},
    combinator::{all_consuming, consumed, cut, map, map_opt, not, opt},
    multi::many0_count,
    sequence::{preceded, tuple},
};

// Local Crate Imports
use super::errors::{AdductErrorKind, AdductParseError, ParseResult, expect};
use crate::{AdductTag, IonizationMode};

// Public API ==========================================================================================================

/// Adduct Tag = "[" , [ Count ] , "M" , { Offset } , "]" , [ Count ] , Polarity ;
pub fn adduct_tag(i: &str) -> ParseResult<AdductTag> {
    let parser = tuple((
        expect(char('['), AdductErrorKind::ExpectedOpenBracket),
        opt(count),
        expect(char('M'), AdductErrorKind::ExpectedMolecule),
        many0_count(offset),
        expect(char(']'), AdductErrorKind::ExpectedCloseBracket),
        opt(count),
        polarity,
    ));
    map(
        consumed(parser),
        |(notation, (_, multimer, _, _, _, charge, mode))| AdductTag {
            notation: notation.to_owned(),
            multimer: multimer.unwrap_or(NonZeroU32::MIN),
            charge: charge.unwrap_or(NonZeroU32::MIN),
            mode,
        },
    )(i)
}

pub(crate) fn parse_adduct_tag(notation: &str) -> Result<AdductTag, AdductParseError> {
    all_consuming(adduct_tag)(notation)
        .finish()
        .map(|(_, tag)| tag)
        .map_err(|e| e.into_final_error(notation))
}

// Private Sub-Parsers =================================================================================================

/// Count = digit - "0" , { digit } ;
fn count(i: &str) -> ParseResult<NonZeroU32> {
    let not_zero = expect(cut(not(char('0'))), AdductErrorKind::ExpectedNoLeadingZero);
    map_opt(preceded(not_zero, u32), NonZeroU32::new)(i)
}

/// Offset = Sign , Species ;
fn offset(i: &str) -> ParseResult<&str> {
    preceded(sign, cut(species))(i)
}

/// Species = { letter | digit }- ;
fn species(i: &str) -> ParseResult<&str> {
    let parser = take_while1(|c: char| c.is_ascii_alphanumeric());
    expect(parser, AdductErrorKind::ExpectedSpecies)(i)
}

/// Polarity = Sign ;
fn polarity(i: &str) -> ParseResult<IonizationMode> {
    let parser = map_opt(sign, IonizationMode::from_sign);
    expect(parser, AdductErrorKind::ExpectedPolarity)(i)
}

/// Sign = "+" | "-" | "−" ;
fn sign(i: &str) -> ParseResult<char> {
    one_of("+-−")(i)
}

// Module Tests ========================================================================================================
