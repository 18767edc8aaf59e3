//! Per-command argument schemas.

use std::collections::HashMap;

use crate::parser::{self, ParseError, ParseOutcome};
use crate::validate::{SchemaError, validate_specs};
use crate::{ArgumentName, ArgumentSpec};

/// Ordered set of flags accepted by one command.
///
/// The implicit help spec (`-h`) is always appended after the declared
/// specs. Flag tokens are indexed once at construction, so lookups during
/// parsing do not scan the spec list.
///
/// # Examples
///
/// ```
/// use medtrack_core::*;
///
/// let schema = ArgumentSchema::new([
///     ArgumentSpec::required(ArgumentName::ListIndex, "-l"),
///     ArgumentSpec::presence(ArgumentName::Morning, "-m"),
/// ]);
///
/// assert_eq!(schema.flags(), vec!["-l", "-m", "-h"]);
/// assert!(schema.find_by_flag("-m").is_some());
///
/// let outcome = schema.parse("-l 3 -m").unwrap();
/// let ParseOutcome::Parsed(args) = outcome else { panic!("expected arguments") };
/// assert_eq!(args.get(ArgumentName::ListIndex), Some("3"));
/// assert!(args.contains(ArgumentName::Morning));
/// ```
#[derive(Debug, Clone)]
pub struct ArgumentSchema {
    specs: Vec<ArgumentSpec>,
    by_flag: HashMap<&'static str, usize>,
}

impl ArgumentSchema {
    /// Builds a schema, appending the help spec.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found by
    /// [`validate_specs`](crate::validate_specs). Declaring `-h` yourself is
    /// a [`SchemaError::DuplicateFlag`].
    pub fn try_new(specs: impl IntoIterator<Item = ArgumentSpec>) -> Result<Self, SchemaError> {
        let mut specs: Vec<ArgumentSpec> = specs.into_iter().collect();
        specs.push(ArgumentSpec::help());

        if let Some(error) = validate_specs(&specs).into_iter().next() {
            return Err(error);
        }

        let by_flag = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| (spec.flag, index))
            .collect();

        Ok(Self { specs, by_flag })
    }

    /// Builds a schema, panicking on an invalid declaration.
    ///
    /// Schemas are declared once at startup, so a collision is a bug in the
    /// declaration rather than a runtime condition.
    ///
    /// # Panics
    ///
    /// Panics if [`try_new`](ArgumentSchema::try_new) fails.
    pub fn new(specs: impl IntoIterator<Item = ArgumentSpec>) -> Self {
        match Self::try_new(specs) {
            Ok(schema) => schema,
            Err(error) => panic!("invalid argument schema: {error}"),
        }
    }

    /// All specs in declaration order, help spec last.
    pub fn specs(&self) -> &[ArgumentSpec] {
        &self.specs
    }

    /// All flag tokens in declaration order.
    pub fn flags(&self) -> Vec<&'static str> {
        self.specs.iter().map(|spec| spec.flag).collect()
    }

    /// Finds a spec by its exact flag token.
    pub fn find_by_flag(&self, flag: &str) -> Option<&ArgumentSpec> {
        self.by_flag.get(flag).map(|&index| &self.specs[index])
    }

    /// Finds a spec by argument name.
    pub fn find_by_name(&self, name: ArgumentName) -> Option<&ArgumentSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Returns `true` if `token` is one of this schema's flags.
    pub fn is_known_flag(&self, token: &str) -> bool {
        self.by_flag.contains_key(token)
    }

    /// Parses the text that followed the command word.
    ///
    /// See [`parser::parse`] for the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for unknown, duplicate, valueless or
    /// missing flags.
    pub fn parse(&self, raw: &str) -> Result<ParseOutcome, ParseError> {
        parser::parse(self, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_spec_is_appended_last() {
        let schema = ArgumentSchema::new([ArgumentSpec::required(ArgumentName::Name, "-n")]);
        let last = schema.specs().last().unwrap();
        assert_eq!(last.name, ArgumentName::Help);
        assert_eq!(schema.specs().len(), 2);
    }

    #[test]
    fn test_try_new_rejects_flag_collision() {
        let result = ArgumentSchema::try_new([
            ArgumentSpec::required(ArgumentName::Name, "-n"),
            ArgumentSpec::optional(ArgumentName::Illness, "-n"),
        ]);
        assert_eq!(
            result.unwrap_err(),
            SchemaError::DuplicateFlag("-n".to_string())
        );
    }

    #[test]
    fn test_try_new_rejects_explicit_help_flag() {
        let result =
            ArgumentSchema::try_new([ArgumentSpec::optional(ArgumentName::Remarks, "-h")]);
        assert_eq!(
            result.unwrap_err(),
            SchemaError::DuplicateFlag("-h".to_string())
        );
    }

    #[test]
    #[should_panic(expected = "invalid argument schema")]
    fn test_new_panics_on_collision() {
        ArgumentSchema::new([
            ArgumentSpec::required(ArgumentName::ListIndex, "-l"),
            ArgumentSpec::required(ArgumentName::ListType, "-l"),
        ]);
    }

    #[test]
    fn test_lookup_is_exact() {
        let schema = ArgumentSchema::new([
            ArgumentSpec::optional(ArgumentName::Remarks, "-r"),
            ArgumentSpec::optional(ArgumentName::Repeat, "-rep"),
        ]);
        assert_eq!(
            schema.find_by_flag("-rep").map(|spec| spec.name),
            Some(ArgumentName::Repeat)
        );
        assert!(schema.find_by_flag("-re").is_none());
        assert!(schema.is_known_flag("-h"));
        assert_eq!(
            schema.find_by_name(ArgumentName::Remarks).map(|spec| spec.flag),
            Some("-r")
        );
    }
}
