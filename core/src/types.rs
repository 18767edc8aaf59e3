//! Argument type definitions for command flag modeling.
//!
//! This module defines the data model every command schema is built from:
//! the [`ArgumentName`] identifiers, the immutable [`ArgumentSpec`]
//! describing one flag, and the per-line [`ParsedArguments`] mapping that a
//! successful parse produces.

use std::collections::BTreeMap;
use std::fmt;

/// The flag token reserved for the implicit help argument.
pub const HELP_FLAG: &str = "-h";

/// Identifier for a parsed argument.
///
/// Names are unique within a schema and are the keys of
/// [`ParsedArguments`]. The same name may be bound to different flag tokens
/// by different commands (e.g. [`ArgumentName::Allergies`] is `-a` for
/// `search` while [`ArgumentName::Afternoon`] is `-a` for `take`).
///
/// # Examples
///
/// ```
/// use medtrack_core::ArgumentName;
///
/// assert_eq!(ArgumentName::DosageMorning.as_str(), "DOSAGE_MORNING");
/// assert_eq!(ArgumentName::DosageMorning.label(), "dosage");
/// assert_eq!(ArgumentName::Name.to_string(), "NAME");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArgumentName {
    /// Medication name.
    Name,
    /// Quantity in stock.
    Quantity,
    /// Dosage taken in the morning.
    DosageMorning,
    /// Dosage taken in the afternoon.
    DosageAfternoon,
    /// Dosage taken in the evening.
    DosageEvening,
    /// Expiration date.
    ExpirationDate,
    /// Free-form remarks.
    Remarks,
    /// Repeat cadence in days.
    Repeat,
    /// 1-based index into a displayed list.
    ListIndex,
    /// Morning selector (presence-only).
    Morning,
    /// Afternoon selector (presence-only).
    Afternoon,
    /// Evening selector (presence-only).
    Evening,
    /// Illness the medication treats.
    Illness,
    /// Known side effects.
    SideEffects,
    /// Allergies to watch for.
    Allergies,
    /// Which list to show (`all` or `today`).
    ListType,
    /// Name of a command, used by `help`.
    Command,
    /// The implicit help argument.
    Help,
}

impl ArgumentName {
    /// Returns the upper-case key used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "NAME",
            Self::Quantity => "QUANTITY",
            Self::DosageMorning => "DOSAGE_MORNING",
            Self::DosageAfternoon => "DOSAGE_AFTERNOON",
            Self::DosageEvening => "DOSAGE_EVENING",
            Self::ExpirationDate => "EXPIRATION_DATE",
            Self::Remarks => "REMARKS",
            Self::Repeat => "REPEAT",
            Self::ListIndex => "LIST_INDEX",
            Self::Morning => "MORNING",
            Self::Afternoon => "AFTERNOON",
            Self::Evening => "EVENING",
            Self::Illness => "ILLNESS",
            Self::SideEffects => "SIDE_EFFECTS",
            Self::Allergies => "ALLERGIES",
            Self::ListType => "LIST_TYPE",
            Self::Command => "COMMAND",
            Self::Help => "HELP",
        }
    }

    /// Returns the placeholder shown after the flag in help text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Quantity => "quantity",
            Self::DosageMorning | Self::DosageAfternoon | Self::DosageEvening => "dosage",
            Self::ExpirationDate => "expiry_date",
            Self::Remarks => "remarks",
            Self::Repeat => "repeat",
            Self::ListIndex => "index",
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Illness => "illness",
            Self::SideEffects => "side_effects",
            Self::Allergies => "allergies",
            Self::ListType => "type",
            Self::Command => "command",
            Self::Help => "help",
        }
    }
}

impl fmt::Display for ArgumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Description of one flag accepted by a command.
///
/// Specs are plain values: every command declares its flags as a literal
/// list of specs rather than as distinct types. Use the constructors
/// [`required`](ArgumentSpec::required), [`optional`](ArgumentSpec::optional)
/// and [`presence`](ArgumentSpec::presence), then chain
/// [`with_help`](ArgumentSpec::with_help) and
/// [`with_long_help`](ArgumentSpec::with_long_help).
///
/// # Examples
///
/// ```
/// use medtrack_core::{ArgumentName, ArgumentSpec};
///
/// let name = ArgumentSpec::required(ArgumentName::Name, "-n")
///     .with_help("Name of the medication");
/// assert!(!name.optional);
/// assert!(name.has_value);
/// assert_eq!(name.usage_token(), "-n name");
///
/// let morning = ArgumentSpec::presence(ArgumentName::Morning, "-m");
/// assert!(morning.optional);
/// assert!(!morning.has_value);
/// assert_eq!(morning.usage_token(), "-m");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    /// Key under which the value is stored.
    pub name: ArgumentName,
    /// Literal dash-prefixed token (e.g. `-n`).
    pub flag: &'static str,
    /// One-line description shown in the options table.
    pub short_help: &'static str,
    /// Longer description shown by `help <command>`.
    pub long_help: &'static str,
    /// Whether the flag may be omitted.
    pub optional: bool,
    /// Whether the flag consumes the text that follows it.
    pub has_value: bool,
}

impl ArgumentSpec {
    /// Creates a required flag that takes a value.
    pub const fn required(name: ArgumentName, flag: &'static str) -> Self {
        Self {
            name,
            flag,
            short_help: "",
            long_help: "",
            optional: false,
            has_value: true,
        }
    }

    /// Creates an optional flag that takes a value.
    pub const fn optional(name: ArgumentName, flag: &'static str) -> Self {
        Self {
            name,
            flag,
            short_help: "",
            long_help: "",
            optional: true,
            has_value: true,
        }
    }

    /// Creates an optional flag whose presence alone is the signal.
    pub const fn presence(name: ArgumentName, flag: &'static str) -> Self {
        Self {
            name,
            flag,
            short_help: "",
            long_help: "",
            optional: true,
            has_value: false,
        }
    }

    /// The implicit `-h` spec appended to every schema.
    pub const fn help() -> Self {
        Self::presence(ArgumentName::Help, HELP_FLAG)
            .with_help("Show this usage text")
            .with_long_help("Prints the usage line and the options of this command.")
    }

    /// Sets the one-line description.
    pub const fn with_help(mut self, short_help: &'static str) -> Self {
        self.short_help = short_help;
        self
    }

    /// Sets the longer description.
    pub const fn with_long_help(mut self, long_help: &'static str) -> Self {
        self.long_help = long_help;
        self
    }

    /// Returns the flag followed by its placeholder when it takes a value.
    pub fn usage_token(&self) -> String {
        if self.has_value {
            format!("{} {}", self.flag, self.name.label())
        } else {
            self.flag.to_string()
        }
    }
}

/// Name → value mapping produced by a successful parse.
///
/// A key is present only when the user supplied the corresponding flag.
/// Presence-only flags are stored with an empty value.
///
/// # Examples
///
/// ```
/// use medtrack_core::{ArgumentName, ParsedArguments};
///
/// let mut parsed = ParsedArguments::new();
/// parsed.insert(ArgumentName::Name, "Aspirin");
/// parsed.insert(ArgumentName::Morning, "");
///
/// assert_eq!(parsed.get(ArgumentName::Name), Some("Aspirin"));
/// assert!(parsed.contains(ArgumentName::Morning));
/// assert!(!parsed.contains(ArgumentName::Evening));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    values: BTreeMap<ArgumentName, String>,
}

impl ParsedArguments {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, replacing any previous one.
    pub fn insert(&mut self, name: ArgumentName, value: impl Into<String>) {
        self.values.insert(name, value.into());
    }

    /// Returns the value supplied for `name`.
    pub fn get(&self, name: ArgumentName) -> Option<&str> {
        self.values.get(&name).map(String::as_str)
    }

    /// Returns the value for `name`, treating an empty value as absent.
    pub fn value(&self, name: ArgumentName) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    /// Returns `true` if the flag for `name` was supplied.
    pub fn contains(&self, name: ArgumentName) -> bool {
        self.values.contains_key(&name)
    }

    /// Number of supplied flags.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no flag was supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over supplied names and values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (ArgumentName, &str)> {
        self.values.iter().map(|(name, value)| (*name, value.as_str()))
    }
}

impl FromIterator<(ArgumentName, String)> for ParsedArguments {
    fn from_iter<I: IntoIterator<Item = (ArgumentName, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
