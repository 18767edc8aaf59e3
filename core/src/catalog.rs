//! Flag schemas for every medtrack command.
//!
//! Each schema is built on first use and shared for the rest of the
//! process. `take` and `untake` accept the same flags and share [`TAKE`].

use std::sync::LazyLock;

use crate::{ArgumentName, ArgumentSchema, ArgumentSpec};

const NAME: ArgumentSpec = ArgumentSpec::required(ArgumentName::Name, "-n")
    .with_help("Name of the medication")
    .with_long_help("Medication name; may contain spaces, e.g. -n Vitamin C.");

const QUANTITY: ArgumentSpec = ArgumentSpec::required(ArgumentName::Quantity, "-q")
    .with_help("Quantity in stock")
    .with_long_help("Amount currently in stock, a positive number. Taking a dose subtracts from it.");

const DOSAGE_MORNING: ArgumentSpec = ArgumentSpec::optional(ArgumentName::DosageMorning, "-dM")
    .with_help("Morning dosage")
    .with_long_help("Amount to take in the morning (before 12:00).");

const DOSAGE_AFTERNOON: ArgumentSpec =
    ArgumentSpec::optional(ArgumentName::DosageAfternoon, "-dA")
        .with_help("Afternoon dosage")
        .with_long_help("Amount to take in the afternoon (12:00 to 18:00).");

const DOSAGE_EVENING: ArgumentSpec = ArgumentSpec::optional(ArgumentName::DosageEvening, "-dE")
    .with_help("Evening dosage")
    .with_long_help("Amount to take in the evening (after 18:00).");

const EXPIRATION_DATE: ArgumentSpec = ArgumentSpec::required(ArgumentName::ExpirationDate, "-e")
    .with_help("Expiration date (yyyy-MM-dd)")
    .with_long_help("Date after which the medication must not be taken, e.g. 2025-01-01.");

const REMARKS: ArgumentSpec = ArgumentSpec::optional(ArgumentName::Remarks, "-r")
    .with_help("Remarks")
    .with_long_help("Free text shown next to the medication, e.g. take with food.");

const REPEAT: ArgumentSpec = ArgumentSpec::optional(ArgumentName::Repeat, "-rep")
    .with_help("Repeat every N days (default 1)")
    .with_long_help("The medication is due on the day it was added and every N days after.");

const LIST_INDEX: ArgumentSpec = ArgumentSpec::required(ArgumentName::ListIndex, "-l")
    .with_help("Index in the list")
    .with_long_help("1-based index as shown by the list command.");

const MORNING: ArgumentSpec = ArgumentSpec::presence(ArgumentName::Morning, "-m")
    .with_help("Morning dose")
    .with_long_help("Select the morning dose. Without -m, -a or -e the current time decides.");

const AFTERNOON: ArgumentSpec = ArgumentSpec::presence(ArgumentName::Afternoon, "-a")
    .with_help("Afternoon dose")
    .with_long_help("Select the afternoon dose. Without -m, -a or -e the current time decides.");

const EVENING: ArgumentSpec = ArgumentSpec::presence(ArgumentName::Evening, "-e")
    .with_help("Evening dose")
    .with_long_help("Select the evening dose. Without -m, -a or -e the current time decides.");

const ILLNESS: ArgumentSpec = ArgumentSpec::optional(ArgumentName::Illness, "-i")
    .with_help("Illness treated")
    .with_long_help("Illness or condition the medication treats.");

const SIDE_EFFECTS: ArgumentSpec = ArgumentSpec::optional(ArgumentName::SideEffects, "-s")
    .with_help("Side effects")
    .with_long_help("Known side effects.");

const ALLERGIES: ArgumentSpec = ArgumentSpec::optional(ArgumentName::Allergies, "-a")
    .with_help("Allergies")
    .with_long_help("Allergies to watch for.");

/// `add`: register a new medication.
pub static ADD: LazyLock<ArgumentSchema> = LazyLock::new(|| {
    ArgumentSchema::new([
        NAME,
        QUANTITY,
        DOSAGE_MORNING,
        DOSAGE_AFTERNOON,
        DOSAGE_EVENING,
        EXPIRATION_DATE,
        REMARKS,
        REPEAT,
    ])
});

/// `delete`: remove a medication by index.
pub static DELETE: LazyLock<ArgumentSchema> = LazyLock::new(|| ArgumentSchema::new([LIST_INDEX]));

/// `view`: show one medication by index.
pub static VIEW: LazyLock<ArgumentSchema> = LazyLock::new(|| ArgumentSchema::new([LIST_INDEX]));

/// `take` and `untake`: mark a dose in today's list.
pub static TAKE: LazyLock<ArgumentSchema> =
    LazyLock::new(|| ArgumentSchema::new([LIST_INDEX, MORNING, AFTERNOON, EVENING]));

/// `search`: filter medications by any combination of fields.
pub static SEARCH: LazyLock<ArgumentSchema> = LazyLock::new(|| {
    ArgumentSchema::new([
        ArgumentSpec::optional(ArgumentName::Name, "-n")
            .with_help("Name contains")
            .with_long_help("Case-insensitive text the medication name must contain."),
        ILLNESS,
        SIDE_EFFECTS,
        ALLERGIES,
    ])
});

/// `list`: show all medications or today's doses.
pub static LIST: LazyLock<ArgumentSchema> = LazyLock::new(|| {
    ArgumentSchema::new([ArgumentSpec::required(ArgumentName::ListType, "-t")
        .with_help("List to show: all or today")
        .with_long_help("`all` lists every medication, `today` lists the doses due today.")])
});

/// `modify`: change fields of an existing medication.
pub static MODIFY: LazyLock<ArgumentSchema> = LazyLock::new(|| {
    ArgumentSchema::new([
        LIST_INDEX,
        ArgumentSpec { optional: true, ..NAME },
        ArgumentSpec { optional: true, ..QUANTITY },
        DOSAGE_MORNING,
        DOSAGE_AFTERNOON,
        DOSAGE_EVENING,
        ArgumentSpec {
            optional: true,
            ..EXPIRATION_DATE
        },
        REMARKS,
        REPEAT,
        ILLNESS,
        SIDE_EFFECTS,
        ALLERGIES,
    ])
});
