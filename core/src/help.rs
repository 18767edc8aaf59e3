//! Usage and options text derived from a schema.
//!
//! The usage line and the options table are rendered from the same spec
//! list, in declaration order, so they cannot disagree about which flags a
//! command accepts.

use crate::{ArgumentSchema, ArgumentSpec};

/// Spaces between the widest flag token and the help column.
pub const OPTIONS_MARGIN: usize = 4;

/// Renders the usage block.
///
/// Required flags are wrapped in parentheses, optional flags in brackets.
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
/// assert_eq!(
///     render_usage("take", &schema),
///     "Usage:\n\ttake (-l index) [-m] [-h]"
/// );
/// ```
pub fn render_usage(command: &str, schema: &ArgumentSchema) -> String {
    let mut out = format!("Usage:\n\t{command}");
    for spec in schema.specs() {
        let token = spec.usage_token();
        if spec.optional {
            out.push_str(&format!(" [{token}]"));
        } else {
            out.push_str(&format!(" ({token})"));
        }
    }
    out
}

/// Renders the options block, one aligned line per spec.
///
/// # Examples
///
/// ```
/// use medtrack_core::*;
///
/// let schema = ArgumentSchema::new([
///     ArgumentSpec::required(ArgumentName::ListIndex, "-l").with_help("Index in the list"),
/// ]);
/// assert_eq!(
///     render_options(&schema),
///     "Options:\n\t-l index    Index in the list\n\t-h          Show this usage text"
/// );
/// ```
pub fn render_options(schema: &ArgumentSchema) -> String {
    let width = options_width(schema.specs());
    let mut out = String::from("Options:");
    for spec in schema.specs() {
        let line = format!("\t{:<width$}{}", spec.usage_token(), spec.short_help);
        out.push('\n');
        out.push_str(line.trim_end());
    }
    out
}

/// Renders the usage block followed by the options block.
pub fn render_help(command: &str, schema: &ArgumentSchema) -> String {
    format!(
        "{}\n\n{}",
        render_usage(command, schema),
        render_options(schema)
    )
}

/// Renders a command's description, its help and every flag's long help.
///
/// Used by the `help <command>` listing. Specs without long help fall back
/// to their short help.
pub fn render_manual(command: &str, description: &str, schema: &ArgumentSchema) -> String {
    let mut out = format!("{command}: {description}\n\n{}", render_help(command, schema));

    out.push_str("\n\nDetails:");
    for spec in schema.specs() {
        let text = if spec.long_help.is_empty() {
            spec.short_help
        } else {
            spec.long_help
        };
        out.push_str(&format!("\n\t{}\n\t\t{text}", spec.usage_token()));
    }
    out
}

fn options_width(specs: &[ArgumentSpec]) -> usize {
    specs
        .iter()
        .map(|spec| spec.usage_token().len())
        .max()
        .unwrap_or(0)
        + OPTIONS_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArgumentName;

    fn schema() -> ArgumentSchema {
        ArgumentSchema::new([
            ArgumentSpec::required(ArgumentName::Name, "-n").with_help("Medication name"),
            ArgumentSpec::optional(ArgumentName::Remarks, "-r")
                .with_help("Remarks")
                .with_long_help("Any free text, e.g. take with food."),
            ArgumentSpec::presence(ArgumentName::Evening, "-e").with_help("Evening dose"),
        ])
    }

    #[test]
    fn test_usage_keeps_declaration_order() {
        assert_eq!(
            render_usage("add", &schema()),
            "Usage:\n\tadd (-n name) [-r remarks] [-e] [-h]"
        );
    }

    #[test]
    fn test_options_align_to_widest_token() {
        let options = render_options(&schema());
        let lines: Vec<&str> = options.lines().collect();
        assert_eq!(lines[0], "Options:");
        assert_eq!(lines[1], "\t-n name       Medication name");
        assert_eq!(lines[2], "\t-r remarks    Remarks");
        assert_eq!(lines[3], "\t-e            Evening dose");
        assert_eq!(lines[4], "\t-h            Show this usage text");
    }

    #[test]
    fn test_help_joins_blocks() {
        let help = render_help("add", &schema());
        assert!(help.starts_with("Usage:\n\tadd (-n name)"));
        assert!(help.contains("\n\nOptions:\n"));
    }

    #[test]
    fn test_manual_prefers_long_help() {
        let manual = render_manual("add", "Adds a medication", &schema());
        assert!(manual.starts_with("add: Adds a medication\n\nUsage:"));
        assert!(manual.contains("\t-r remarks\n\t\tAny free text, e.g. take with food."));
        assert!(manual.contains("\t-n name\n\t\tMedication name"));
    }
}
