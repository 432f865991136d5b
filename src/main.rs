/*!
Main binary for jsonbind.
*/

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::generate;
use colored::Colorize;
use memmap2::Mmap;
use std::io::stdout;
use std::io::{self};
use std::{
    fs::{self},
    io::{IsTerminal, Read},
    path::PathBuf,
};

use jsonbind::{Json, JsonConfig, commands, line_col, utils};

/// Parse and reformat a JSON document.
#[derive(Parser)]
#[command(name = "jb", version, about, long_about = None, disable_help_subcommand = true)]
struct Args {
    /// Optional subcommands
    #[command(subcommand)]
    command: Option<Commands>,
    #[arg(value_name = "FILE")]
    /// Optional path to JSON file. If omitted, reads from STDIN
    input: Option<PathBuf>,
    /// Do not pretty-print the JSON output, instead use compact
    #[arg(long, action = ArgAction::SetTrue)]
    compact: bool,
    /// Display depth of the input document
    #[arg(long, action = ArgAction::SetTrue)]
    depth: bool,
    /// Validate only; exit code reports the result
    #[arg(long, action = ArgAction::SetTrue)]
    check: bool,
    /// Disable colorized output
    #[arg(long, action = ArgAction::SetTrue)]
    no_color: bool,
    #[command(flatten)]
    verbosity: clap_verbosity_flag::Verbosity<clap_verbosity_flag::WarnLevel>,
}

/// Available subcommands for `jb`
#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    /// Generate additional documentation and/or completions
    Generate(GenerateCommand),
}

/// Generate shell completions and man page
#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate shell completions for the given shell to stdout.
    Shell { shell: clap_complete::Shell },
    /// Generate a man page for jb to output directory if specified, else
    /// the current directory.
    Man {
        /// The output directory to write the man pages.
        #[clap(short, long)]
        output_dir: Option<PathBuf>,
    },
}

/// The document bytes, either memory-mapped or buffered from stdin.
enum Input {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

impl Input {
    fn bytes(&self) -> &[u8] {
        match self {
            Self::Mapped(map) => map,
            Self::Buffered(buffer) => buffer,
        }
    }
}

/// Entry point for main binary.
///
/// Reads the document from a file (memory-mapped) or from STDIN when piped,
/// parses it, and reformats to STDOUT. Parse failures report the byte
/// offset as a line and column on STDERR and exit nonzero.
fn main() -> Result<()> {
    let mut args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    if args.no_color || !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match args.command.take() {
        Some(Commands::Generate(cmd)) => match cmd {
            GenerateCommand::Shell { shell } => {
                let mut cmd = Args::command();
                generate(shell, &mut cmd, "jb", &mut stdout().lock());
                Ok(())
            }
            GenerateCommand::Man { output_dir } => {
                commands::generate::man_pages(&Args::command(), output_dir)
            }
        },
        None => run(&args),
    }
}

fn run(args: &Args) -> Result<()> {
    let input = if let Some(path) = &args.input {
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open file {path:?}"))?;
        // SAFETY: the map is dropped before the file handle and the
        // document is treated as immutable for the lifetime of the run.
        let map = unsafe { Mmap::map(&file) }
            .with_context(|| format!("Failed to map file {path:?}"))?;
        Input::Mapped(map)
    } else {
        if io::stdin().is_terminal() {
            // No piped input and no file specified
            let mut cmd = Args::command();
            return Ok(cmd.print_help()?);
        }
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        Input::Buffered(buffer)
    };

    log::debug!("parsing {} input bytes", input.bytes().len());
    let json = Json::new(JsonConfig::new());
    let value = match json.decode_from(input.bytes()) {
        Ok(value) => value,
        Err(err) => {
            if let Some(offset) = err.offset() {
                let source = String::from_utf8_lossy(input.bytes());
                let (line, column) = line_col(&source, offset);
                eprintln!(
                    "{} {err} at line {line}, column {column}",
                    "error:".red().bold()
                );
            } else {
                eprintln!("{} {err}", "error:".red().bold());
            }
            std::process::exit(1);
        }
    };

    if args.check {
        return Ok(());
    }

    if args.depth {
        println!("Depth: {}", value.depth());
    }

    let mut out = io::stdout().lock();
    utils::write_colored_value(&mut out, &value, !args.compact)
}
