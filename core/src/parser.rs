//! Flag location and value extraction.
//!
//! A command line is split on single spaces and the schema's flag tokens
//! are located by exact equality. Values are never quoted: each
//! value-taking flag owns every token between itself and the next located
//! flag (or the end of the line). This is what lets flags appear in any
//! order and values span several words.
//!
//! The stages run in a fixed order so that the reported error does not
//! depend on incidental details of the input:
//!
//! 1. [`check_unknown_flags`] rejects flag-shaped tokens the schema does
//!    not declare.
//! 2. [`locate_flags`] finds each declared flag and rejects repeats.
//! 3. [`extract_values`] slices the tokens into per-flag values and
//!    rejects empty values for value-taking flags.
//! 4. A supplied `-h` short-circuits to [`ParseOutcome::HelpRequested`].
//! 5. [`validate_required`] rejects missing required flags.
//!
//! A value that contains the literal text of another declared flag is split
//! at that token. `add -n A -r take -m daily` on a schema with `-m` treats
//! `-m` as a flag, not as part of the remarks.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{ArgumentName, ArgumentSchema, ArgumentSpec, ParsedArguments};

static FLAG_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-.+$").expect("static regex must compile"));

/// User input errors raised while parsing one line.
///
/// Every variant is line-scoped: the caller reports it and moves on to the
/// next line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A flag-shaped token that the command does not declare.
    #[error("unknown argument found: {0}")]
    UnknownArgument(String),
    /// A flag token that appears more than once.
    #[error("duplicate argument found: {0}")]
    DuplicateArgument(String),
    /// A value-taking flag followed directly by another flag or end of line.
    #[error("argument {0} requires a value")]
    ArgumentNoValue(String),
    /// A required flag that was not supplied.
    #[error("missing required argument: {0}")]
    ArgumentNotFound(String),
}

/// Successful result of [`parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The line was valid for the schema.
    Parsed(ParsedArguments),
    /// The user asked for usage text, either with `-h` or by supplying no
    /// flags at all.
    HelpRequested,
}

/// Flag positions keyed by token index, in line order.
pub type FlagPositions<'s> = BTreeMap<usize, &'s ArgumentSpec>;

/// Parses `raw` against `schema`.
///
/// # Errors
///
/// Returns the first [`ParseError`] raised by the stages listed in the
/// module documentation.
///
/// # Examples
///
/// ```
/// use medtrack_core::*;
///
/// let schema = ArgumentSchema::new([
///     ArgumentSpec::required(ArgumentName::Name, "-n"),
///     ArgumentSpec::optional(ArgumentName::Remarks, "-r"),
/// ]);
///
/// let outcome = parse(&schema, "-r after meals -n Vitamin C").unwrap();
/// let ParseOutcome::Parsed(args) = outcome else { panic!("expected arguments") };
/// assert_eq!(args.get(ArgumentName::Name), Some("Vitamin C"));
/// assert_eq!(args.get(ArgumentName::Remarks), Some("after meals"));
///
/// assert_eq!(parse(&schema, "").unwrap(), ParseOutcome::HelpRequested);
/// assert_eq!(
///     parse(&schema, "-r daily"),
///     Err(ParseError::ArgumentNotFound("-n".to_string()))
/// );
/// ```
pub fn parse(schema: &ArgumentSchema, raw: &str) -> Result<ParseOutcome, ParseError> {
    let tokens = tokenize(raw);
    trace!(?tokens, "tokenized input");

    check_unknown_flags(schema, &tokens)?;

    let positions = locate_flags(schema, &tokens)?;
    if positions.is_empty() {
        debug!("no flags supplied, requesting help");
        return Ok(ParseOutcome::HelpRequested);
    }

    let parsed = extract_values(&positions, &tokens)?;
    if parsed.contains(ArgumentName::Help) {
        debug!("help flag supplied");
        return Ok(ParseOutcome::HelpRequested);
    }

    validate_required(schema, &parsed)?;
    debug!(arguments = parsed.len(), "parsed arguments");
    Ok(ParseOutcome::Parsed(parsed))
}

/// Splits a line on single spaces.
///
/// Runs of spaces produce empty tokens, which are dropped again when
/// values are joined.
///
/// # Examples
///
/// ```
/// use medtrack_core::tokenize;
///
/// assert_eq!(tokenize("-n  Aspirin"), vec!["-n", "", "Aspirin"]);
/// assert_eq!(tokenize(""), vec![""]);
/// ```
pub fn tokenize(raw: &str) -> Vec<&str> {
    raw.split(' ').collect()
}

/// Returns `true` if `token` is a dash followed by at least one character.
pub fn is_flag_shaped(token: &str) -> bool {
    FLAG_SHAPE.is_match(token)
}

/// Rejects flag-shaped tokens that the schema does not declare.
///
/// Matching is exact, so `-re` is unknown even though `-rep` is declared.
///
/// # Errors
///
/// Returns [`ParseError::UnknownArgument`] for the first such token.
pub fn check_unknown_flags(schema: &ArgumentSchema, tokens: &[&str]) -> Result<(), ParseError> {
    match tokens
        .iter()
        .find(|token| is_flag_shaped(token) && !schema.is_known_flag(token))
    {
        Some(token) => Err(ParseError::UnknownArgument(token.to_string())),
        None => Ok(()),
    }
}

/// Finds the position of every declared flag present in `tokens`.
///
/// Flags that do not occur are left out of the result.
///
/// # Errors
///
/// Returns [`ParseError::DuplicateArgument`] if a flag occurs more than
/// once.
pub fn locate_flags<'s>(
    schema: &'s ArgumentSchema,
    tokens: &[&str],
) -> Result<FlagPositions<'s>, ParseError> {
    let mut positions = FlagPositions::new();

    for spec in schema.specs() {
        let first = tokens.iter().position(|token| *token == spec.flag);
        let last = tokens.iter().rposition(|token| *token == spec.flag);

        match (first, last) {
            (Some(first), Some(last)) if first != last => {
                return Err(ParseError::DuplicateArgument(spec.flag.to_string()));
            }
            (Some(index), _) => {
                trace!(flag = spec.flag, index, "located flag");
                positions.insert(index, spec);
            }
            _ => {}
        }
    }

    Ok(positions)
}

/// Slices `tokens` into one value per located flag.
///
/// The value of a flag is every non-empty token after it, up to the next
/// located flag, joined with single spaces. Presence-only flags are stored
/// with an empty value regardless of any text that follows them.
///
/// # Errors
///
/// Returns [`ParseError::ArgumentNoValue`] if a value-taking flag ends up
/// with an empty value.
pub fn extract_values(
    positions: &FlagPositions<'_>,
    tokens: &[&str],
) -> Result<ParsedArguments, ParseError> {
    let mut parsed = ParsedArguments::new();
    let mut located = positions.iter().peekable();

    while let Some((&index, spec)) = located.next() {
        let end = located
            .peek()
            .map_or(tokens.len(), |(next_index, _)| **next_index);

        if !spec.has_value {
            parsed.insert(spec.name, "");
            continue;
        }

        let value = join_tokens(&tokens[index + 1..end]);
        if value.is_empty() {
            return Err(ParseError::ArgumentNoValue(spec.flag.to_string()));
        }
        parsed.insert(spec.name, value);
    }

    Ok(parsed)
}

/// Checks that every required spec has a value.
///
/// # Errors
///
/// Returns [`ParseError::ArgumentNotFound`] for the first missing required
/// spec, in declaration order.
pub fn validate_required(
    schema: &ArgumentSchema,
    parsed: &ParsedArguments,
) -> Result<(), ParseError> {
    match schema
        .specs()
        .iter()
        .find(|spec| !spec.optional && !parsed.contains(spec.name))
    {
        Some(spec) => Err(ParseError::ArgumentNotFound(spec.flag.to_string())),
        None => Ok(()),
    }
}

fn join_tokens(tokens: &[&str]) -> String {
    tokens
        .iter()
        .map(|token| token.trim())
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
