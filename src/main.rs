use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use miette::IntoDiagnostic;
use miette::WrapErr;
use polypen::Interpreter;
use polypen::Lexer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Expand a polynomial expression into canonical form")]
struct Args {
    /// Log more (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the canonical polynomial (default)
    Eval { filename: Option<PathBuf> },
    /// Print the raw lexer tokens
    Lex { filename: Option<PathBuf> },
    /// Print the nested token tree before resolution
    Tokenize { filename: Option<PathBuf> },
    /// Print the resolved sum-of-products tree
    Resolve { filename: Option<PathBuf> },
}

/// All input lines joined without separators.
fn read_input(filename: Option<&PathBuf>) -> miette::Result<String> {
    match filename {
        Some(filename) => {
            let file_contents = fs::read_to_string(filename)
                .into_diagnostic()
                .wrap_err_with(|| format!("reading `{}` failed", filename.display()))?;
            Ok(file_contents.lines().collect())
        }
        None => io::stdin()
            .lines()
            .collect::<Result<String, _>>()
            .into_diagnostic()
            .wrap_err("reading stdin failed"),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default.into())
                .from_env_lossy(),
        )
        .init();
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let command = args.command.unwrap_or(Commands::Eval { filename: None });
    let filename = match &command {
        Commands::Eval { filename }
        | Commands::Lex { filename }
        | Commands::Tokenize { filename }
        | Commands::Resolve { filename } => filename.clone(),
    };
    let input = read_input(filename.as_ref())?;
    let name = filename.as_deref().and_then(|f| f.to_str());

    match command {
        Commands::Eval { .. } => {
            let polynomial = Interpreter::new(name, &input).eval()?;
            println!("{polynomial}");
        }
        Commands::Lex { .. } => {
            for token in Lexer::new(name, &input) {
                println!("{}", token?);
            }
            println!("EOF  null");
        }
        Commands::Tokenize { .. } => {
            println!("{}", Interpreter::new(name, &input).tokenize()?);
        }
        Commands::Resolve { .. } => {
            println!("{}", Interpreter::new(name, &input).resolve()?);
        }
    }
    Ok(())
}
