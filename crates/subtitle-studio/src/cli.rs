use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};

/// Which values were given on the command line (as opposed to defaulted),
/// so file config only fills in what the user left unset.
#[derive(Debug, Default)]
pub struct CliSources {
    pub format_from_cli: bool,
    pub offset_from_cli: bool,
    pub dedupe_from_cli: bool,
    pub merge_overlapping_from_cli: bool,
    pub clean_text_from_cli: bool,
}

impl CliSources {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            format_from_cli: value_from_cli(matches, "format"),
            offset_from_cli: value_from_cli(matches, "offset"),
            dedupe_from_cli: value_from_cli(matches, "dedupe"),
            merge_overlapping_from_cli: value_from_cli(matches, "merge_overlapping"),
            clean_text_from_cli: value_from_cli(matches, "clean_text"),
        }
    }
}

fn value_from_cli(matches: &ArgMatches, id: &str) -> bool {
    matches
        .value_source(id)
        .is_some_and(|source| matches!(source, ValueSource::CommandLine))
}

pub fn parse_cli() -> (CliArgs, CliSources) {
    let command = CliArgs::command();
    let matches = command.get_matches();
    let args = match CliArgs::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(err) => err.exit(),
    };
    let sources = CliSources::from_matches(&matches);
    (args, sources)
}

#[derive(Debug, Parser)]
#[command(
    name = "subtitle-studio",
    about = "Load, normalize, edit, and export subtitle files",
    disable_help_subcommand = true
)]
pub struct CliArgs {
    /// Override the configuration file path
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Print the list of supported subtitle formats
    #[arg(long = "list-formats")]
    pub list_formats: bool,

    /// Output format (srt, vtt, json, txt); inferred from the output path when omitted
    #[arg(short = 'f', long = "format", id = "format")]
    pub format: Option<String>,

    /// Output file path; stdout when omitted
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Edit script (JSON array of operations) replayed before export
    #[arg(long = "apply", value_name = "EDITS_JSON")]
    pub apply: Option<PathBuf>,

    /// Drop duplicate entries and sort by start time
    #[arg(long = "dedupe", id = "dedupe")]
    pub dedupe: bool,

    /// Merge entries whose time ranges overlap
    #[arg(long = "merge-overlapping", id = "merge_overlapping")]
    pub merge_overlapping: bool,

    /// Strip stray SRT scaffolding echoed into subtitle text
    #[arg(long = "clean-text", id = "clean_text")]
    pub clean_text: bool,

    /// Shift all timestamps by this many seconds (may be negative)
    #[arg(
        long = "offset",
        id = "offset",
        default_value_t = 0.0,
        allow_negative_numbers = true
    )]
    pub offset: f64,

    /// Save the edited list to the sidecar store next to the input
    #[arg(long = "save")]
    pub save: bool,

    /// Input subtitle file (.srt or .json)
    pub input: Option<PathBuf>,
}
