use std::path::PathBuf;

use clap::Parser;

/// Browse a student roster: filter by course, show high performers, sort by
/// marks.
#[derive(Debug, Parser)]
#[command(name = "student-roster", version, about)]
pub struct Cli {
    /// JSON roster to load instead of `~/.student-roster/students.json`.
    #[arg(long, value_name = "PATH", conflicts_with = "sample")]
    pub roster: Option<PathBuf>,

    /// Always use the built-in twelve-student sample.
    #[arg(long)]
    pub sample: bool,

    /// Write logs to this file. Without it, logs are only written when
    /// `RUST_LOG` is set, to `~/.student-roster/student-roster.log`.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn roster_and_sample_conflict() {
        let parsed = Cli::try_parse_from(["student-roster", "--roster", "a.json", "--sample"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn parses_roster_path() {
        let cli = Cli::try_parse_from(["student-roster", "--roster", "class.json"]).unwrap();
        assert_eq!(cli.roster, Some(PathBuf::from("class.json")));
        assert!(!cli.sample);
        assert!(cli.log_file.is_none());
    }
}
