//! The medtrack commands and the registry that builds them.
//!
//! Factories only copy parsed strings into a [`Command`]; every value is
//! converted and checked when the command runs, so conversion failures come
//! back through the same error path as the medication rules.

use std::io::Write;

use chrono::{NaiveDateTime, Timelike};
use medtrack_core::catalog::{ADD, DELETE, LIST, MODIFY, SEARCH, TAKE, VIEW};
use medtrack_core::{ArgumentName, CommandDescriptor, CommandInfo, CommandRegistry, ParsedArguments};
use medtrack_db::{
    AppConfig, DatabaseError, MedicationDraft, MedicationManager, SearchCriteria, TimeOfDay,
    parse_index,
};
use tracing::debug;

use crate::error::CommandError;

const ADD_INFO: CommandInfo = CommandInfo {
    word: "add",
    description: "Adds a medication and schedules its doses.",
};

const DELETE_INFO: CommandInfo = CommandInfo {
    word: "delete",
    description: "Removes a medication and its doses for today.",
};

const VIEW_INFO: CommandInfo = CommandInfo {
    word: "view",
    description: "Shows every detail of one medication.",
};

const LIST_INFO: CommandInfo = CommandInfo {
    word: "list",
    description: "Lists all medications or the doses due today.",
};

const MODIFY_INFO: CommandInfo = CommandInfo {
    word: "modify",
    description: "Changes the supplied fields of a medication.",
};

const TAKE_INFO: CommandInfo = CommandInfo {
    word: "take",
    description: "Marks a dose in today's list as taken and deducts it from stock.",
};

const UNTAKE_INFO: CommandInfo = CommandInfo {
    word: "untake",
    description: "Reverts a taken dose and returns it to stock.",
};

const SEARCH_INFO: CommandInfo = CommandInfo {
    word: "search",
    description: "Finds medications by name, illness, side effects or allergies.",
};

const HELP_INFO: CommandInfo = CommandInfo {
    word: "help",
    description: "Lists the commands, or shows the manual of one command (help <command>).",
};

const EXIT_INFO: CommandInfo = CommandInfo {
    word: "exit",
    description: "Saves and leaves medtrack.",
};

/// Which list `list` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    All,
    Today,
}

/// A resolved command with its raw argument values.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(MedicationDraft),
    Delete { index: String },
    View { index: String },
    List { kind: String },
    Modify { index: String, patch: MedicationDraft },
    Take { index: String, periods: Vec<TimeOfDay> },
    Untake { index: String, periods: Vec<TimeOfDay> },
    Search(SearchCriteria),
    Help { topic: Option<String> },
    Exit,
}

/// What the session does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// State a command runs against.
pub struct Context<'a> {
    pub manager: &'a mut MedicationManager,
    pub registry: &'a CommandRegistry<Command>,
    pub config: &'a AppConfig,
    pub now: NaiveDateTime,
}

impl Command {
    /// Returns `true` if a successful run changes stored data.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::Add(_)
                | Self::Delete { .. }
                | Self::Modify { .. }
                | Self::Take { .. }
                | Self::Untake { .. }
        )
    }

    /// Runs the command, writing user-facing output to `out`.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] for the first rule or conversion that
    /// fails. Nothing is changed when an error is returned.
    pub fn execute(self, ctx: &mut Context<'_>, out: &mut impl Write) -> Result<Outcome, CommandError> {
        debug!(command = ?self, "executing");
        match self {
            Self::Add(draft) => {
                let medication = draft.build(ctx.now.date())?;
                let added = ctx.manager.add(medication)?;
                writeln!(out, "Added: {added}")?;
            }
            Self::Delete { index } => {
                let removed = ctx.manager.delete(parse_index(&index)?)?;
                writeln!(out, "Deleted: {}", removed.name)?;
            }
            Self::View { index } => {
                let medication = ctx.manager.get(parse_index(&index)?)?;
                writeln!(out, "{}", medication.details())?;
            }
            Self::List { kind } => match parse_list_kind(&kind)? {
                ListKind::All => print_medications(ctx.manager, out)?,
                ListKind::Today => print_daily(ctx.manager, out)?,
            },
            Self::Modify { index, patch } => {
                if patch.is_empty() {
                    return Err(CommandError::NothingToModify);
                }
                let updated = ctx.manager.modify(parse_index(&index)?, patch)?;
                writeln!(out, "Modified: {updated}")?;
            }
            Self::Take { index, periods } => {
                let period = select_period(&periods, ctx)?;
                let dose = ctx.manager.take(parse_index(&index)?, period)?;
                writeln!(out, "Taken ({period}): {dose}")?;
            }
            Self::Untake { index, periods } => {
                let period = select_period(&periods, ctx)?;
                let dose = ctx.manager.untake(parse_index(&index)?, period)?;
                writeln!(out, "Untaken ({period}): {dose}")?;
            }
            Self::Search(criteria) => {
                let found = ctx.manager.search(&criteria)?;
                if found.is_empty() {
                    writeln!(out, "No medication found.")?;
                }
                for (index, medication) in found {
                    writeln!(out, "{index}. {medication}")?;
                }
            }
            Self::Help { topic } => print_help(ctx.registry, topic.as_deref(), out)?,
            Self::Exit => {
                writeln!(out, "Goodbye.")?;
                return Ok(Outcome::Exit);
            }
        }
        Ok(Outcome::Continue)
    }
}

/// Builds the registry of every medtrack command.
pub fn registry() -> CommandRegistry<Command> {
    let mut registry = CommandRegistry::new();
    registry
        .register(CommandDescriptor::new(ADD_INFO, &ADD, add))
        .register(CommandDescriptor::new(DELETE_INFO, &DELETE, delete))
        .register(CommandDescriptor::new(VIEW_INFO, &VIEW, view))
        .register(CommandDescriptor::new(LIST_INFO, &LIST, list))
        .register(CommandDescriptor::new(MODIFY_INFO, &MODIFY, modify))
        .register(CommandDescriptor::new(TAKE_INFO, &TAKE, take))
        .register(CommandDescriptor::new(UNTAKE_INFO, &TAKE, untake))
        .register(CommandDescriptor::new(SEARCH_INFO, &SEARCH, search))
        .register(CommandDescriptor::with_operand(HELP_INFO, help))
        .register(CommandDescriptor::without_arguments(EXIT_INFO, |_| Command::Exit));
    registry
}

// ---- Factories ----

fn owned(args: &ParsedArguments, name: ArgumentName) -> Option<String> {
    args.value(name).map(str::to_string)
}

fn required(args: &ParsedArguments, name: ArgumentName) -> String {
    owned(args, name).unwrap_or_default()
}

fn draft(args: &ParsedArguments) -> MedicationDraft {
    MedicationDraft {
        name: owned(args, ArgumentName::Name),
        quantity: owned(args, ArgumentName::Quantity),
        dosage_morning: owned(args, ArgumentName::DosageMorning),
        dosage_afternoon: owned(args, ArgumentName::DosageAfternoon),
        dosage_evening: owned(args, ArgumentName::DosageEvening),
        expiration: owned(args, ArgumentName::ExpirationDate),
        remarks: owned(args, ArgumentName::Remarks),
        repeat: owned(args, ArgumentName::Repeat),
        illness: owned(args, ArgumentName::Illness),
        side_effects: owned(args, ArgumentName::SideEffects),
        allergies: owned(args, ArgumentName::Allergies),
    }
}

fn periods(args: &ParsedArguments) -> Vec<TimeOfDay> {
    [
        (ArgumentName::Morning, TimeOfDay::Morning),
        (ArgumentName::Afternoon, TimeOfDay::Afternoon),
        (ArgumentName::Evening, TimeOfDay::Evening),
    ]
    .into_iter()
    .filter(|(name, _)| args.contains(*name))
    .map(|(_, period)| period)
    .collect()
}

fn add(args: ParsedArguments) -> Command {
    Command::Add(draft(&args))
}

fn delete(args: ParsedArguments) -> Command {
    Command::Delete {
        index: required(&args, ArgumentName::ListIndex),
    }
}

fn view(args: ParsedArguments) -> Command {
    Command::View {
        index: required(&args, ArgumentName::ListIndex),
    }
}

fn list(args: ParsedArguments) -> Command {
    Command::List {
        kind: required(&args, ArgumentName::ListType),
    }
}

fn modify(args: ParsedArguments) -> Command {
    Command::Modify {
        index: required(&args, ArgumentName::ListIndex),
        patch: draft(&args),
    }
}

fn take(args: ParsedArguments) -> Command {
    Command::Take {
        index: required(&args, ArgumentName::ListIndex),
        periods: periods(&args),
    }
}

fn untake(args: ParsedArguments) -> Command {
    Command::Untake {
        index: required(&args, ArgumentName::ListIndex),
        periods: periods(&args),
    }
}

fn search(args: ParsedArguments) -> Command {
    Command::Search(SearchCriteria {
        name: owned(&args, ArgumentName::Name),
        illness: owned(&args, ArgumentName::Illness),
        side_effects: owned(&args, ArgumentName::SideEffects),
        allergies: owned(&args, ArgumentName::Allergies),
    })
}

fn help(args: ParsedArguments) -> Command {
    Command::Help {
        topic: owned(&args, ArgumentName::Command),
    }
}

// ---- Execution helpers ----

fn parse_list_kind(value: &str) -> Result<ListKind, CommandError> {
    match value.trim().to_lowercase().as_str() {
        "all" => Ok(ListKind::All),
        "today" => Ok(ListKind::Today),
        _ => Err(CommandError::InvalidListKind(value.to_string())),
    }
}

/// Picks the dose period: the single selected flag, or the current time.
fn select_period(periods: &[TimeOfDay], ctx: &Context<'_>) -> Result<TimeOfDay, DatabaseError> {
    match periods {
        [] => Ok(ctx.config.time_of_day(ctx.now.hour())),
        [period] => Ok(*period),
        _ => Err(DatabaseError::ConflictingTimeOfDay),
    }
}

fn print_medications(manager: &MedicationManager, out: &mut impl Write) -> std::io::Result<()> {
    if manager.is_empty() {
        return writeln!(out, "No medications.");
    }
    for (index, medication) in manager.medications().iter().enumerate() {
        writeln!(out, "{}. {medication}", index + 1)?;
    }
    Ok(())
}

fn print_daily(manager: &MedicationManager, out: &mut impl Write) -> std::io::Result<()> {
    let daily = manager.daily();
    writeln!(out, "Doses for {}:", daily.date)?;
    for period in TimeOfDay::ALL {
        let entries = daily.for_period(period);
        writeln!(out, "{period}:")?;
        if entries.is_empty() {
            writeln!(out, "\t(none)")?;
        }
        for (index, entry) in entries.iter().enumerate() {
            writeln!(out, "\t{}. {entry}", index + 1)?;
        }
    }
    Ok(())
}

fn print_help(
    registry: &CommandRegistry<Command>,
    topic: Option<&str>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    match topic {
        Some(word) => {
            let descriptor = registry
                .get(word)
                .ok_or_else(|| CommandError::UnknownTopic(word.to_string()))?;
            writeln!(out, "{}", descriptor.manual())?;
        }
        None => {
            let width = registry
                .descriptors()
                .map(|descriptor| descriptor.info.word.len())
                .max()
                .unwrap_or(0);
            writeln!(out, "Commands:")?;
            for descriptor in registry.descriptors() {
                writeln!(
                    out,
                    "\t{:<width$}  {}",
                    descriptor.info.word, descriptor.info.description
                )?;
            }
            writeln!(out, "\nType <command> -h for its options, or help <command> for details.")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use medtrack_core::Resolution;

    use super::*;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn resolve(registry: &CommandRegistry<Command>, line: &str) -> Command {
        match registry.resolve(line) {
            Ok(Resolution::Command(command)) => command,
            other => panic!("expected a command for {line:?}, got {other:?}"),
        }
    }

    fn run(
        manager: &mut MedicationManager,
        line: &str,
        hour: u32,
    ) -> Result<(Outcome, String), CommandError> {
        let registry = registry();
        let config = AppConfig::default();
        let command = resolve(&registry, line);
        let mut ctx = Context {
            manager,
            registry: &registry,
            config: &config,
            now: at(hour),
        };
        let mut out = Vec::new();
        let outcome = command.execute(&mut ctx, &mut out)?;
        Ok((outcome, String::from_utf8(out).unwrap()))
    }

    fn manager_with_aspirin() -> MedicationManager {
        let mut manager = MedicationManager::new(at(9).date());
        run(
            &mut manager,
            "add -n Aspirin -dM 2 -dE 1 -q 30 -e 2025-01-01 -r take_with_food",
            9,
        )
        .unwrap();
        manager
    }

    #[test]
    fn test_factories_copy_values() {
        let registry = registry();
        assert_eq!(
            resolve(&registry, "take -l 2 -m"),
            Command::Take {
                index: "2".into(),
                periods: vec![TimeOfDay::Morning],
            }
        );
        assert_eq!(
            resolve(&registry, "help add"),
            Command::Help {
                topic: Some("add".into())
            }
        );
        assert_eq!(resolve(&registry, "exit"), Command::Exit);
    }

    #[test]
    fn test_add_and_list() {
        let mut manager = manager_with_aspirin();
        let (_, out) = run(&mut manager, "list -t all", 9).unwrap();
        assert_eq!(
            out,
            "1. Aspirin | qty 30 | dosage 2/-/1 | exp 2025-01-01 | take_with_food\n"
        );
    }

    #[test]
    fn test_take_without_flag_uses_current_period() {
        let mut manager = manager_with_aspirin();
        let (_, out) = run(&mut manager, "take -l 1", 20).unwrap();
        assert_eq!(out, "Taken (evening): [X] Aspirin (1)\n");
        assert_eq!(manager.get(1).unwrap().quantity, 29.0);
    }

    #[test]
    fn test_take_with_two_periods_conflicts() {
        let mut manager = manager_with_aspirin();
        assert!(matches!(
            run(&mut manager, "take -l 1 -m -e", 9),
            Err(CommandError::Database(DatabaseError::ConflictingTimeOfDay))
        ));
        assert_eq!(manager.get(1).unwrap().quantity, 30.0);
    }

    #[test]
    fn test_list_today_groups_by_period() {
        let mut manager = manager_with_aspirin();
        run(&mut manager, "take -l 1 -m", 9).unwrap();
        let (_, out) = run(&mut manager, "list -t today", 9).unwrap();
        assert_eq!(
            out,
            "Doses for 2024-06-01:\nmorning:\n\t1. [X] Aspirin (2)\nafternoon:\n\t(none)\nevening:\n\t1. [ ] Aspirin (1)\n"
        );
    }

    #[test]
    fn test_list_rejects_unknown_kind() {
        let mut manager = manager_with_aspirin();
        assert!(matches!(
            run(&mut manager, "list -t weekly", 9),
            Err(CommandError::InvalidListKind(kind)) if kind == "weekly"
        ));
    }

    #[test]
    fn test_modify_requires_a_field() {
        let mut manager = manager_with_aspirin();
        assert!(matches!(
            run(&mut manager, "modify -l 1", 9),
            Err(CommandError::NothingToModify)
        ));
        let (_, out) = run(&mut manager, "modify -l 1 -q 12", 9).unwrap();
        assert!(out.starts_with("Modified: Aspirin | qty 12"));
    }

    #[test]
    fn test_invalid_index_is_reported() {
        let mut manager = manager_with_aspirin();
        assert!(matches!(
            run(&mut manager, "view -l first", 9),
            Err(CommandError::Database(DatabaseError::InvalidValue { field: "index", .. }))
        ));
        assert!(matches!(
            run(&mut manager, "delete -l 5", 9),
            Err(CommandError::Database(DatabaseError::IndexOutOfRange { index: 5, len: 1 }))
        ));
    }

    #[test]
    fn test_help_lists_every_command() {
        let mut manager = MedicationManager::new(at(9).date());
        let (outcome, out) = run(&mut manager, "help", 9).unwrap();
        assert_eq!(outcome, Outcome::Continue);
        for word in [
            "add", "delete", "view", "list", "modify", "take", "untake", "search", "help", "exit",
        ] {
            assert!(out.contains(&format!("\t{word}")), "missing {word}");
        }

        let (_, manual) = run(&mut manager, "help take", 9).unwrap();
        assert!(manual.starts_with("take: Marks a dose"));
        assert!(manual.contains("Details:"));
    }

    #[test]
    fn test_help_rejects_unknown_topic() {
        let mut manager = MedicationManager::new(at(9).date());
        let err = run(&mut manager, "help fly", 9).unwrap_err();
        assert!(matches!(&err, CommandError::UnknownTopic(word) if word == "fly"));
        assert_eq!(err.to_string(), "unknown command: fly");
    }

    #[test]
    fn test_help_and_exit_honour_flag_checks() {
        let registry = registry();
        let Ok(Resolution::Help(text)) = registry.resolve("exit -h") else {
            panic!("exit -h should print usage");
        };
        assert!(text.starts_with("Usage:\n\texit [-h]"));

        let err = registry.resolve("help -x").unwrap_err();
        assert_eq!(err.to_string(), "unknown argument found: -x");
        let err = registry.resolve("exit now").unwrap_err();
        assert_eq!(err.to_string(), "unknown argument found: now");
    }

    #[test]
    fn test_exit_stops_session() {
        let mut manager = MedicationManager::new(at(9).date());
        let (outcome, _) = run(&mut manager, "exit", 9).unwrap();
        assert_eq!(outcome, Outcome::Exit);
        assert!(!Command::Exit.is_mutating());
    }
}
