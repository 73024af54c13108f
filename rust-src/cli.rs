//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::analyze;
use crate::config::Settings;
use crate::data::ParseOptions;
use crate::logging::init_logging;
use crate::report::RangePolicy;


/// Chat histogram - per-user activity breakdowns of a chat log export
#[derive(Parser)]
#[command(name = "chisto")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Chat export with one `D.M.Y H:M:S,User: message` record per line
    file: PathBuf,

    /// Directory the CSV tables are written to
    #[arg(short, long, default_value = ".", env = "CHISTO_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Include the last observed hour in the all-time hourly table
    #[arg(long)]
    include_last_hour: bool,

    /// Discard records whose datestamp cannot be read completely
    #[arg(long)]
    strict_timestamps: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Only print the summary, skip writing CSV tables
    #[arg(long)]
    no_export: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}


impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            output_dir: self.output_dir.clone(),
            range_policy: if self.include_last_hour {
                RangePolicy::Closed
            } else {
                RangePolicy::HalfOpen
            },
            parse_options: ParseOptions {
                strict_timestamps: self.strict_timestamps,
            },
            json: self.json,
            export: !self.no_export,
        }
    }
}


/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    analyze::run(&cli.file, &cli.settings())
}


#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_requires_exactly_one_file() {
        assert!(Cli::try_parse_from(["chisto"]).is_err());
        assert!(Cli::try_parse_from(["chisto", "a.txt", "b.txt"]).is_err());
        assert!(Cli::try_parse_from(["chisto", "a.txt"]).is_ok());
    }

    #[test]
    fn test_flags_map_to_settings() {
        let cli = Cli::try_parse_from([
            "chisto",
            "log.txt",
            "--include-last-hour",
            "--strict-timestamps",
            "--no-export",
            "-o",
            "out",
        ])
        .unwrap();
        let settings = cli.settings();

        assert_eq!(settings.range_policy, RangePolicy::Closed);
        assert!(settings.parse_options.strict_timestamps);
        assert!(!settings.export);
        assert_eq!(settings.output_dir, PathBuf::from("out"));
    }
}
