//! Palaver CLI entry point.

use palaver_runtime::{Repl, World};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable read when `--log` is not given.
const LOG_ENV: &str = "PALAVER_LOG";

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    batch: Option<PathBuf>,
    log_filter: Option<String>,
    seed: u64,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();
    let mut args = args.into_iter().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => {
                let path = args.next().ok_or("--batch requires a file")?;
                config.batch = Some(PathBuf::from(path));
            }
            "--log" => {
                config.log_filter = Some(args.next().ok_or("--log requires a filter")?);
            }
            "--seed" => {
                let value = args.next().ok_or("--seed requires a value")?;
                config.seed = value
                    .parse()
                    .map_err(|_| format!("invalid --seed value: {value}"))?;
            }
            other => return Err(format!("unknown option: {other}").into()),
        }
    }

    Ok(config)
}

fn init_logging(filter: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()?;
    Ok(())
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("palaver {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_logging(config.log_filter.as_deref())?;

    let world = World::demo(config.seed)?;
    let mut repl = Repl::with_editor(palaver_runtime::RustylineEditor::new()?, world);

    if let Some(script) = &config.batch {
        repl.eval_file(script)?;
        return Ok(());
    }

    repl.run()?;
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mPalaver\x1b[0m - talk to the NPCs of a small demo world

\x1b[1mUSAGE:\x1b[0m
    palaver [OPTIONS]

\x1b[1mOPTIONS:\x1b[0m
    -h, --help           Print help information
    -V, --version        Print version information
    -b, --batch FILE     Run the lines of FILE and exit (no REPL)
    --log FILTER         Log filter, e.g. palaver_engine=debug (default: ${LOG_ENV} or warn)
    --seed N             Seed for random rewards (default: 0)

\x1b[1mEXAMPLES:\x1b[0m
    palaver                             Start interactive chat
    palaver --log palaver_engine=debug  Show every dispatch decision
    palaver -b harold.txt               Replay a scripted conversation

\x1b[1mCOMMANDS:\x1b[0m
    /talk <npc>          Turn to an NPC
    /leave               Walk away from the current NPC
    /npcs                List NPCs
    /state               Show the player and the conversation
    /tick [minutes]      Let game time pass
    /quit                Exit
    Ctrl+D               Exit"
    );
}
