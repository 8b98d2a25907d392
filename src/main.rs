/*!
Main binary for jsonscan.
*/

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::io::{self, BufReader, IsTerminal, Write};
use std::{fs::File, path::PathBuf};

use jsonscan::scan_reader;
use jsonscan::utils::{Render, is_broken_pipe, write_object};

/// Recover the JSON objects from a stream of concatenated, possibly
/// pretty-printed JSON objects.
#[derive(Parser)]
#[command(name = "jscan", version, about, long_about = None)]
struct Args {
    #[arg(value_name = "FILE")]
    /// Optional path to the input. If omitted, reads from STDIN
    input: Option<PathBuf>,
    /// Field reported for each object
    #[arg(short, long, default_value = "type", value_name = "NAME")]
    field: String,
    /// Also display each object after its report line
    #[arg(short, long, action = ArgAction::SetTrue)]
    print: bool,
    /// With --print, display objects on a single line instead of
    /// pretty-printing them
    #[arg(long, action = ArgAction::SetTrue)]
    compact: bool,
    /// Stop after this many objects
    #[arg(short = 'n', long, value_name = "N")]
    limit: Option<usize>,
    /// Display the number of objects and decode errors at the end
    #[arg(long, action = ArgAction::SetTrue)]
    count: bool,
    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

/// Entry point for main binary.
///
/// Reads the input line by line and reports every recovered object on STDOUT
/// as soon as it is complete. Decode errors are written to STDERR and do not
/// stop the scan.
fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .parse_default_env()
        .init();

    let reader: Box<dyn io::BufRead> = if let Some(path) = &args.input {
        let file = File::open(path).with_context(|| {
            format!("Failed to read file {}", path.display())
        })?;
        Box::new(BufReader::new(file))
    } else {
        if io::stdin().is_terminal() {
            // No piped input and no file specified
            let mut cmd = Args::command();
            return Ok(cmd.print_help()?);
        }
        Box::new(io::stdin().lock())
    };

    let render = args.print.then(|| Render {
        pretty: !args.compact,
        color: io::stdout().is_terminal(),
    });

    let mut scanner = scan_reader(reader);
    let mut stdout = io::stdout().lock();

    for object in scanner.by_ref().take(args.limit.unwrap_or(usize::MAX)) {
        let object = object.with_context(|| "Failed to read input")?;
        match write_object(&mut stdout, &object, &args.field, render) {
            Ok(()) => {}
            Err(err) if is_broken_pipe(&err) => return Ok(()),
            Err(err) => return Err(err),
        }
    }

    if args.count {
        let stats = scanner.stats();
        let summary = writeln!(stdout, "Objects: {}", stats.objects)
            .and_then(|()| {
                writeln!(stdout, "Decode errors: {}", stats.decode_errors)
            });
        match summary {
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {}
            other => other?,
        }
    }

    Ok(())
}
