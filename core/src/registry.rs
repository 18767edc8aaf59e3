//! Command-word dispatch.
//!
//! A [`CommandRegistry`] maps each command word to a [`CommandDescriptor`]
//! holding the command's schema and a constructor. [`CommandRegistry::resolve`]
//! drives one input line through the whole pipeline and returns either a
//! ready-to-run command or the text to show the user instead.
//!
//! The registry is generic over the command type `C`, so this crate never
//! depends on what a command does when it runs.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::help::{render_help, render_manual, render_options, render_usage};
use crate::parser::{ParseError, ParseOutcome, is_flag_shaped, tokenize};
use crate::{ArgumentName, ArgumentSchema, ArgumentSpec, HELP_FLAG, ParsedArguments};

/// Identity of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    /// Word typed by the user (e.g. `add`).
    pub word: &'static str,
    /// One-sentence description.
    pub description: &'static str,
}

/// Builds a command from parsed arguments.
pub type CommandFactory<C> = fn(ParsedArguments) -> C;

/// What a command accepts after its word.
///
/// Every kind understands `-h` and rejects undeclared flag-shaped tokens.
#[derive(Debug, Clone, Copy)]
pub enum Arguments {
    /// Flags declared by a schema.
    Flags(&'static ArgumentSchema),
    /// One free-text operand, passed as [`ArgumentName::Command`]
    /// (e.g. `help add`).
    Operand,
    /// Nothing at all.
    Nothing,
}

/// Everything needed to turn a line into a command of type `C`.
pub struct CommandDescriptor<C> {
    /// Identity of the command.
    pub info: CommandInfo,
    /// Text accepted after the command word.
    pub arguments: Arguments,
    /// Constructor invoked after a successful parse.
    pub factory: CommandFactory<C>,
}

impl<C> CommandDescriptor<C> {
    /// Creates a descriptor for a command that takes flags.
    pub fn new(
        info: CommandInfo,
        schema: &'static ArgumentSchema,
        factory: CommandFactory<C>,
    ) -> Self {
        Self {
            info,
            arguments: Arguments::Flags(schema),
            factory,
        }
    }

    /// Creates a descriptor for a command that takes one free-text operand.
    pub fn with_operand(info: CommandInfo, factory: CommandFactory<C>) -> Self {
        Self {
            info,
            arguments: Arguments::Operand,
            factory,
        }
    }

    /// Creates a descriptor for a command that takes nothing.
    pub fn without_arguments(info: CommandInfo, factory: CommandFactory<C>) -> Self {
        Self {
            info,
            arguments: Arguments::Nothing,
            factory,
        }
    }

    /// Usage and options text for this command.
    pub fn help_text(&self) -> String {
        let word = self.info.word;
        match self.arguments {
            Arguments::Flags(schema) => render_help(word, schema),
            Arguments::Operand => {
                let bare = bare_schema();
                format!(
                    "{} [{}]\n\n{}",
                    render_usage(word, &bare),
                    ArgumentName::Command.label(),
                    render_options(&bare)
                )
            }
            Arguments::Nothing => render_help(word, &bare_schema()),
        }
    }

    /// Description, usage, options and per-flag details.
    pub fn manual(&self) -> String {
        match self.arguments {
            Arguments::Flags(schema) => {
                render_manual(self.info.word, self.info.description, schema)
            }
            Arguments::Operand | Arguments::Nothing => format!(
                "{}: {}\n\n{}",
                self.info.word,
                self.info.description,
                self.help_text()
            ),
        }
    }

    fn parse(&self, remainder: &str) -> Result<ParseOutcome, ParseError> {
        match self.arguments {
            Arguments::Flags(schema) => schema.parse(remainder),
            Arguments::Operand => parse_operand(remainder, true),
            Arguments::Nothing => parse_operand(remainder, false),
        }
    }
}

impl<C> std::fmt::Debug for CommandDescriptor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("info", &self.info)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Schema holding only the implicit `-h` spec.
fn bare_schema() -> ArgumentSchema {
    ArgumentSchema::new(Vec::<ArgumentSpec>::new())
}

/// Parses the remainder of a command without a schema.
///
/// Checks run in the same order as for a schema: undeclared flags first,
/// then `-h`. Any remaining words form the operand, or are rejected when
/// `accepts_operand` is false.
fn parse_operand(remainder: &str, accepts_operand: bool) -> Result<ParseOutcome, ParseError> {
    let tokens = tokenize(remainder);
    if let Some(token) = tokens
        .iter()
        .find(|token| is_flag_shaped(token) && **token != HELP_FLAG)
    {
        return Err(ParseError::UnknownArgument(token.to_string()));
    }
    if tokens.contains(&HELP_FLAG) {
        return Ok(ParseOutcome::HelpRequested);
    }

    let words: Vec<&str> = tokens.into_iter().filter(|token| !token.is_empty()).collect();
    let mut parsed = ParsedArguments::new();
    match words.first() {
        None => {}
        Some(word) if !accepts_operand => {
            return Err(ParseError::UnknownArgument(word.to_string()));
        }
        Some(_) => parsed.insert(ArgumentName::Command, words.join(" ")),
    }
    Ok(ParseOutcome::Parsed(parsed))
}

/// Result of resolving one line.
#[derive(Debug)]
pub enum Resolution<C> {
    /// The line named a command and its arguments were valid.
    Command(C),
    /// The user asked for this usage text.
    Help(String),
}

/// Errors raised while resolving one line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The first word is not a registered command.
    #[error("unknown command: {0}")]
    CommandNotFound(String),
    /// The command's arguments were rejected.
    #[error("{source}")]
    Parse {
        /// Command word whose schema rejected the input.
        command: &'static str,
        /// Underlying parse error.
        source: ParseError,
    },
}

/// Lookup table from command word to descriptor.
///
/// Built once at startup and read-only afterwards.
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
/// use medtrack_core::*;
///
/// static VIEW: LazyLock<ArgumentSchema> = LazyLock::new(|| {
///     ArgumentSchema::new([ArgumentSpec::required(ArgumentName::ListIndex, "-l")])
/// });
///
/// let mut registry: CommandRegistry<String> = CommandRegistry::new();
/// registry.register(CommandDescriptor::new(
///     CommandInfo { word: "view", description: "Shows one medication" },
///     &VIEW,
///     |args| format!("view #{}", args.get(ArgumentName::ListIndex).unwrap_or_default()),
/// ));
///
/// match registry.resolve("view -l 2").unwrap() {
///     Resolution::Command(command) => assert_eq!(command, "view #2"),
///     Resolution::Help(_) => unreachable!(),
/// }
/// assert!(matches!(registry.resolve("view"), Ok(Resolution::Help(_))));
/// assert_eq!(
///     registry.resolve("vew -l 2").unwrap_err(),
///     ResolveError::CommandNotFound("vew".to_string())
/// );
/// ```
pub struct CommandRegistry<C> {
    order: Vec<&'static str>,
    descriptors: HashMap<&'static str, CommandDescriptor<C>>,
}

impl<C> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            descriptors: HashMap::new(),
        }
    }
}

impl<C> CommandRegistry<C> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor.
    ///
    /// # Panics
    ///
    /// Panics if the command word is already registered.
    pub fn register(&mut self, descriptor: CommandDescriptor<C>) -> &mut Self {
        let word = descriptor.info.word;
        assert!(
            !self.descriptors.contains_key(word),
            "command registered twice: {word}"
        );
        self.order.push(word);
        self.descriptors.insert(word, descriptor);
        self
    }

    /// Finds the descriptor for a command word.
    pub fn get(&self, word: &str) -> Option<&CommandDescriptor<C>> {
        self.descriptors.get(word)
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &CommandDescriptor<C>> {
        self.order.iter().filter_map(|word| self.descriptors.get(word))
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no command is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Turns one input line into a command or a help text.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::CommandNotFound`] for an unregistered word
    /// and [`ResolveError::Parse`] when the arguments are rejected.
    pub fn resolve(&self, line: &str) -> Result<Resolution<C>, ResolveError> {
        let (word, remainder) = split_command(line);
        let descriptor = self
            .get(word)
            .ok_or_else(|| ResolveError::CommandNotFound(word.to_string()))?;
        debug!(command = word, "resolved command word");

        match descriptor.parse(remainder) {
            Ok(ParseOutcome::Parsed(arguments)) => {
                Ok(Resolution::Command((descriptor.factory)(arguments)))
            }
            Ok(ParseOutcome::HelpRequested) => Ok(Resolution::Help(descriptor.help_text())),
            Err(source) => {
                debug!(command = word, error = %source, "rejected arguments");
                Err(ResolveError::Parse {
                    command: descriptor.info.word,
                    source,
                })
            }
        }
    }
}

/// Splits a line into its command word and the remaining text.
///
/// Only the first space separates; the remainder is returned untouched.
///
/// # Examples
///
/// ```
/// use medtrack_core::split_command;
///
/// assert_eq!(split_command("add -n A  -q 3"), ("add", "-n A  -q 3"));
/// assert_eq!(split_command("list"), ("list", ""));
/// ```
pub fn split_command(line: &str) -> (&str, &str) {
    line.split_once(' ').unwrap_or((line, ""))
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use super::*;

    static DELETE: LazyLock<ArgumentSchema> = LazyLock::new(|| {
        ArgumentSchema::new([ArgumentSpec::required(ArgumentName::ListIndex, "-l")])
    });

    const DELETE_INFO: CommandInfo = CommandInfo {
        word: "delete",
        description: "Removes a medication",
    };

    const EXIT_INFO: CommandInfo = CommandInfo {
        word: "exit",
        description: "Leaves the program",
    };

    const HELP_INFO: CommandInfo = CommandInfo {
        word: "help",
        description: "Explains a command",
    };

    fn registry() -> CommandRegistry<ParsedArguments> {
        let mut registry = CommandRegistry::new();
        registry
            .register(CommandDescriptor::new(DELETE_INFO, &DELETE, |args| args))
            .register(CommandDescriptor::with_operand(HELP_INFO, |args| args))
            .register(CommandDescriptor::without_arguments(EXIT_INFO, |args| args));
        registry
    }

    #[test]
    fn test_resolve_passes_remainder_to_schema() {
        let Resolution::Command(args) = registry().resolve("delete -l 4").unwrap() else {
            panic!("expected a command");
        };
        assert_eq!(args.get(ArgumentName::ListIndex), Some("4"));
    }

    #[test]
    fn test_resolve_unknown_word() {
        assert_eq!(
            registry().resolve("remove -l 4").unwrap_err(),
            ResolveError::CommandNotFound("remove".to_string())
        );
    }

    #[test]
    fn test_resolve_wraps_parse_errors() {
        let error = registry().resolve("delete -l 4 -x").unwrap_err();
        assert_eq!(
            error,
            ResolveError::Parse {
                command: "delete",
                source: ParseError::UnknownArgument("-x".to_string()),
            }
        );
        assert_eq!(error.to_string(), "unknown argument found: -x");
    }

    #[test]
    fn test_bare_command_renders_help() {
        let Resolution::Help(text) = registry().resolve("delete").unwrap() else {
            panic!("expected help");
        };
        assert_eq!(text, render_help("delete", &DELETE));
    }

    #[test]
    fn test_operand_command_takes_trailing_words() {
        let Resolution::Command(args) = registry().resolve("help").unwrap() else {
            panic!("expected a command");
        };
        assert!(args.is_empty());

        let Resolution::Command(args) = registry().resolve("help  take   dose ").unwrap() else {
            panic!("expected a command");
        };
        assert_eq!(args.get(ArgumentName::Command), Some("take dose"));
    }

    #[test]
    fn test_commands_without_schema_honour_help_flag() {
        for line in ["exit -h", "help -h", "help add -h"] {
            assert!(
                matches!(registry().resolve(line), Ok(Resolution::Help(_))),
                "line: {line}"
            );
        }
        let Resolution::Help(text) = registry().resolve("exit -h").unwrap() else {
            panic!("expected help");
        };
        assert_eq!(text, "Usage:\n\texit [-h]\n\nOptions:\n\t-h    Show this usage text");

        let Resolution::Help(text) = registry().resolve("help -h").unwrap() else {
            panic!("expected help");
        };
        assert!(text.starts_with("Usage:\n\thelp [-h] [command]\n\nOptions:"));
    }

    #[test]
    fn test_commands_without_schema_reject_unknown_flags() {
        for (line, token) in [("help -x", "-x"), ("exit -x", "-x"), ("help add -h -v", "-v")] {
            assert_eq!(
                registry().resolve(line).unwrap_err(),
                ResolveError::Parse {
                    command: line.split(' ').next().unwrap_or_default(),
                    source: ParseError::UnknownArgument(token.to_string()),
                },
                "line: {line}"
            );
        }
    }

    #[test]
    fn test_command_without_arguments_rejects_operand() {
        assert_eq!(
            registry().resolve("exit now").unwrap_err(),
            ResolveError::Parse {
                command: "exit",
                source: ParseError::UnknownArgument("now".to_string()),
            }
        );
        assert!(matches!(
            registry().resolve("exit  "),
            Ok(Resolution::Command(_))
        ));
    }

    #[test]
    fn test_descriptors_keep_registration_order() {
        let registry = registry();
        let words: Vec<&str> = registry.descriptors().map(|d| d.info.word).collect();
        assert_eq!(words, vec!["delete", "help", "exit"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    #[should_panic(expected = "command registered twice: exit")]
    fn test_register_twice_panics() {
        let mut registry = registry();
        registry.register(CommandDescriptor::without_arguments(EXIT_INFO, |args| args));
    }
}
