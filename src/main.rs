use clap::error::ErrorKind;
use clap::Parser;
use image_patcher::{Console, PatchError, Patcher, ReplacementList, USER_FAILURE};
use std::ffi::OsString;
use std::path::PathBuf;

const EXAMPLE: &str = "Example: bxhsed myfile.bin 'system|vendor'
  All occurrences of 'system' will be replaced with 'vendor'";

#[derive(Parser)]
#[command(name = "bxhsed")]
#[command(about = "Replace fixed-width byte sequences in a file or block device, in place", long_about = None)]
#[command(version)]
#[command(after_help = EXAMPLE)]
struct Cli {
    /// Suppress informational and diagnostic output (may appear anywhere)
    #[arg(short, long)]
    quiet: bool,

    /// File or block device to patch
    filename: PathBuf,

    /// Replacement as 'from|to'; both sides must have the same byte length
    #[arg(value_name = "from|to", required = true, allow_hyphen_values = true)]
    replacements: Vec<OsString>,
}

fn main() {
    let (quiet, args) = split_quiet(std::env::args_os());

    let mut cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                if !quiet {
                    let _ = e.print();
                }
                std::process::exit(USER_FAILURE);
            }
        },
    };
    cli.quiet |= quiet;

    let console = Console::new(cli.quiet);
    std::process::exit(run(&cli, &console));
}

/// Strip every `-q`/`--quiet` after the program name.
///
/// The flag may sit anywhere and repeat; the remaining arguments are handed
/// to clap, where replacement values may themselves start with `-`.
fn split_quiet(args: impl IntoIterator<Item = OsString>) -> (bool, Vec<OsString>) {
    let mut quiet = false;
    let mut rest = Vec::new();

    for (index, arg) in args.into_iter().enumerate() {
        if index > 0 && (arg == "-q" || arg == "--quiet") {
            quiet = true;
        } else {
            rest.push(arg);
        }
    }

    (quiet, rest)
}

/// Validate arguments, patch the target and map the outcome to an exit code.
fn run(cli: &Cli, console: &Console) -> i32 {
    let (replacements, rejected) = ReplacementList::from_args(&cli.replacements);
    for rejection in &rejected {
        console.notice(rejection);
    }

    if replacements.is_empty() {
        console.notice("Nothing to replace.");
        return USER_FAILURE;
    }

    match Patcher::new().patch(&cli.filename, &replacements) {
        Ok(report) => {
            for index in &report.skipped {
                console.notice(format!(
                    "Invalid replacement: '{}'",
                    replacements.pairs()[*index]
                ));
            }
            console.info(format!("Replaced {} occurrences.", report.replaced));
            i32::try_from(report.replaced).unwrap_or(i32::MAX)
        }
        Err(e) => {
            for line in failure_messages(&e) {
                console.error(line);
            }
            e.exit_code()
        }
    }
}

fn failure_messages(error: &PatchError) -> Vec<String> {
    let mut lines = vec![error.to_string()];

    let committed = error.committed();
    if committed > 0 {
        lines.push(format!(
            "{} replacements were already written; the target is partially patched",
            committed
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn os_args(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_split_quiet_anywhere_and_repeated() {
        let (quiet, rest) = split_quiet(os_args(&[
            "bxhsed",
            "-q",
            "a.img",
            "system|vendor",
            "--quiet",
            "-q",
        ]));
        assert!(quiet);
        assert_eq!(rest, os_args(&["bxhsed", "a.img", "system|vendor"]));
    }

    #[test]
    fn test_split_quiet_keeps_hyphen_patterns() {
        let (quiet, rest) = split_quiet(os_args(&[
            "bxhsed",
            "a.img",
            "-q|-x",
            "--quiet|--other",
        ]));
        assert!(!quiet);
        assert_eq!(rest.len(), 4);
    }

    #[test]
    fn test_cli_accepts_hyphen_leading_replacements() {
        let cli = Cli::try_parse_from(os_args(&[
            "bxhsed",
            "a.img",
            "-system|-vendor",
            "--foo|--bar",
        ]))
        .unwrap();
        assert!(!cli.quiet);
        assert_eq!(cli.filename, PathBuf::from("a.img"));
        assert_eq!(cli.replacements, os_args(&["-system|-vendor", "--foo|--bar"]));
    }

    #[test]
    fn test_failure_messages_report_partial_patch() {
        let err = PatchError::Write {
            path: PathBuf::from("system.img"),
            offset: 18,
            committed: 2,
            source: io::Error::from(io::ErrorKind::WriteZero),
        };
        let lines = failure_messages(&err);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Failed to write system.img at offset 18"));
        assert!(lines[1].contains("2 replacements were already written"));

        let err = PatchError::Allocation { len: 4 };
        assert_eq!(failure_messages(&err).len(), 1);
    }
}
