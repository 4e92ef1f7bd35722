use clap::{Parser, Subcommand};
use eqsolve::{Engine, EngineConfig, Error, InternalResult};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "eqsolve.json")]
    config: PathBuf,

    /// Bind a variable to a value, e.g. `--bind a=2`
    #[arg(short, long, value_parser = parse_binding)]
    bind: Vec<(String, f64)>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Enable debug mode
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token stream
    Tokenize { input: String },
    /// Run the validation rules
    Validate { input: String },
    /// Parse into an AST
    Parse { input: String },
    /// Classify an equation
    Classify {
        input: String,
        #[arg(long = "var")]
        variables: Vec<String>,
    },
    /// Solve an equation
    Solve {
        input: String,
        #[arg(long = "var")]
        variable: Option<String>,
    },
    /// Evaluate an expression under the bindings
    Eval { input: String },
}

fn parse_binding(arg: &str) -> Result<(String, f64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{}`", arg))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for `{}`: {}", name, e))?;
    Ok((name.trim().to_string(), value))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> InternalResult<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| Error::Internal(format!("Failed to serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn run(cli: &Cli) -> InternalResult<()> {
    let config = if cli.config.exists() {
        EngineConfig::from_file(&cli.config)?
    } else {
        EngineConfig::default()
    };
    config.validate()?;
    info!("config loaded.");
    debug!("config: {:?}", config);

    let engine = cli
        .bind
        .iter()
        .fold(Engine::new(config), |engine, (name, value)| {
            engine.with_binding(name, *value)
        });

    match &cli.command {
        Command::Tokenize { input } => {
            for token in engine.tokenize(input)? {
                println!(
                    "{}:{}\t{:?}\t{}",
                    token.span.line,
                    token.span.column,
                    token.kind(),
                    token.text
                );
            }
            Ok(())
        }
        Command::Validate { input } => print_json(&engine.validate(input)?, cli.pretty),
        Command::Parse { input } => print_json(&engine.parse(input)?, cli.pretty),
        Command::Classify { input, variables } => {
            print_json(&engine.classify(input, variables)?, cli.pretty)
        }
        Command::Solve { input, variable } => {
            print_json(&engine.solve(input, variable.as_deref())?, cli.pretty)
        }
        Command::Eval { input } => {
            println!("{}", engine.evaluate(input)?);
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        for suggestion in e.suggestions() {
            eprintln!("  hint: {}", suggestion);
        }
        std::process::exit(1);
    }
}
