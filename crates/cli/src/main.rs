mod commands;
mod spinner;

use anyhow::Result;
use dev_argparse::{Config, OptionKind, OptionSpec, ParseOutcome, ParseResult};
use tracing_subscriber::{EnvFilter, fmt};

fn top_level_config() -> Config {
    Config {
        prefix: "dev <command>".to_string(),
        options: vec![
            OptionSpec::new("help", OptionKind::Bool)
                .alias("h")
                .description("Displays help"),
            OptionSpec::new("global", OptionKind::Bool)
                .alias("g")
                .description("Use global configuration"),
        ],
        ..Default::default()
    }
}

fn help() {
    eprintln!("Usage: dev <command>\n");
    eprintln!("Available commands:");
    for name in commands::NAMES {
        eprintln!("   {name}");
    }
}

fn main() -> Result<()> {
    init_tracing();
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let config = top_level_config();
    let parsed: ParseResult = match dev_argparse::run(&argv, &config) {
        Ok(ParseOutcome::Matches(result)) => result,
        Ok(ParseOutcome::Help(text)) => {
            print!("{text}");
            return Ok(());
        }
        Err(err) => {
            eprintln!("{}\n", err.message());
            help();
            std::process::exit(1);
        }
    };

    if parsed.argv.is_empty() || parsed.flag("help") {
        help();
        std::process::exit(1);
    }

    let command = parsed.argv[0].clone();
    let mut rest: Vec<String> = parsed.argv[1..].to_vec();
    // `-g` ahead of the command name applies to the command itself.
    if parsed.flag("global") {
        rest.push("-g".to_string());
    }

    match commands::dispatch(&command, &rest) {
        Some(outcome) => outcome,
        None => {
            eprintln!("Unknown command: {command}\n");
            help();
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
