//! Flag schemas, line parsing and command resolution for medtrack.
//!
//! This crate turns one line of free-form text into a validated,
//! name-keyed set of values:
//!
//! - [`ArgumentSpec`]: one flag with its token, help text, optionality
//!   and whether it takes a value.
//! - [`ArgumentSchema`]: the ordered flags of one command, always ending
//!   with the implicit `-h` spec.
//! - [`parse`]: locates flags, slices values and validates them,
//!   producing [`ParseOutcome::Parsed`] or [`ParseOutcome::HelpRequested`].
//! - [`render_help`]: usage line and options table from the same schema.
//! - [`CommandRegistry`]: maps command words to schemas and constructors.
//!
//! The schemas of the medtrack commands live in [`catalog`].
//!
//! # Example
//!
//! ```
//! use medtrack_core::*;
//!
//! let outcome = catalog::ADD
//!     .parse("-n Aspirin -dM 2 -q 30 -e 2025-01-01 -r take_with_food -rep 1")
//!     .unwrap();
//! let ParseOutcome::Parsed(args) = outcome else { panic!("expected arguments") };
//!
//! assert_eq!(args.get(ArgumentName::Name), Some("Aspirin"));
//! assert_eq!(args.get(ArgumentName::DosageMorning), Some("2"));
//! assert_eq!(args.get(ArgumentName::Repeat), Some("1"));
//! assert!(!args.contains(ArgumentName::DosageEvening));
//! ```

pub mod catalog;
mod help;
mod parser;
mod registry;
mod schema;
mod types;
mod validate;

pub use help::{OPTIONS_MARGIN, render_help, render_manual, render_options, render_usage};
pub use parser::{
    FlagPositions, ParseError, ParseOutcome, check_unknown_flags, extract_values,
    is_flag_shaped, locate_flags, parse, tokenize, validate_required,
};
pub use registry::{
    Arguments, CommandDescriptor, CommandFactory, CommandInfo, CommandRegistry, ResolveError, Resolution,
    split_command,
};
pub use schema::ArgumentSchema;
pub use types::*;
pub use validate::{SchemaError, validate_specs};
