//! condswitch CLI
//!
//! A thin wrapper around the condswitch library.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use condswitch::{SwitchOptions, convert_to_match, convert_to_switch_with};

const DEMO_SOURCE: &str = r#"<?php
if ($x == 1 && $y > 0) {
    echo "One and positive";
} elseif ($x == 2 || $y < 0) {
    echo "Two or negative";
} elseif ($x >= 3 && $x <= 5) {
    echo "Between three and five";
} elseif ($x % 2 == 0) {
    echo "Even number";
} else {
    echo "Other cases";
}
"#;

#[derive(Parser, Debug)]
#[command(name = "condswitch")]
#[command(about = "Rewrite if/elseif/else chains as switch statements or match expressions")]
#[command(after_help = "\
EXAMPLES:
    # Rewrite the built-in demo chain
    condswitch

    # Rewrite every chain in a file
    condswitch src/dispatch.php

    # Read from stdin, emit a match expression for the first chain
    cat dispatch.php | condswitch --target match -
")]
struct Args {
    /// Source file to rewrite, `-` for stdin. Defaults to a built-in demo.
    input: Option<PathBuf>,

    /// Dispatch construct to emit
    #[arg(short, long, value_enum, default_value_t = Target::Switch)]
    target: Target,

    /// End every non-default case with `break;` unless it already ends in a jump
    #[arg(long)]
    terminate_cases: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Target {
    /// Rewrite every chain as `switch`
    Switch,
    /// Rewrite the first chain as `match (true)`
    Match,
}

fn read_source(input: Option<&PathBuf>) -> anyhow::Result<String> {
    match input {
        None => Ok(DEMO_SOURCE.to_string()),
        Some(path) if path.as_os_str() == "-" => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("failed to read stdin")?;
            Ok(source)
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
    }
}

fn run(args: &Args) -> anyhow::Result<String> {
    let source = read_source(args.input.as_ref())?;
    log::info!(
        "converting {} ({} bytes) to {:?}",
        args.input
            .as_ref()
            .map_or("demo source".to_string(), |p| p.display().to_string()),
        source.len(),
        args.target
    );

    let output = match args.target {
        Target::Switch => {
            let options = SwitchOptions::new().with_terminate_cases(args.terminate_cases);
            convert_to_switch_with(&source, &options)?
        }
        Target::Match => {
            if args.terminate_cases {
                log::warn!("--terminate-cases has no effect with --target match");
            }
            convert_to_match(&source)?
        }
    };
    Ok(output)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let output = run(&args)?;
    print!("{}", output);
    Ok(())
}
