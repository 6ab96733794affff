//! exprcalc CLI - evaluate and inspect expressions

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use exprcalc::prelude::*;
use exprcalc::{parse, parse_decimal, ExpressionTokenizer, TokenKind};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "exprcalc")]
#[command(author, version, about = "Expression evaluation and inspection tool")]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression and print the result
    Eval {
        /// Expression text
        expression: String,

        /// Define a variable (repeatable)
        #[arg(short = 'D', long = "define", value_name = "NAME=VALUE")]
        defines: Vec<String>,

        /// JSON object file with variable values
        #[arg(long, value_name = "FILE")]
        vars: Option<PathBuf>,

        /// Compare strings ignoring case
        #[arg(short, long)]
        ignore_case: bool,
    },

    /// Print the compiled postfix program
    #[command(alias = "rpn")]
    Postfix {
        /// Expression text
        expression: String,
    },

    /// Print the tokens of an expression with their positions
    Tokens {
        /// Expression text
        expression: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Eval {
            expression,
            defines,
            vars,
            ignore_case,
        } => eval(&expression, &defines, vars.as_deref(), ignore_case),
        Commands::Postfix { expression } => postfix(&expression),
        Commands::Tokens { expression } => tokens(&expression),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn eval(expression: &str, defines: &[String], vars: Option<&Path>, ignore_case: bool) -> Result<()> {
    let options = CalculatorOptions {
        string_comparison: if ignore_case {
            StringComparison::IgnoreCase
        } else {
            StringComparison::Ordinal
        },
        ..Default::default()
    };

    let mut calc = ExpressionCalculator::with_options(options);
    calc.set_expression(expression)
        .with_context(|| format!("Failed to parse '{}'", expression))?;

    if let Some(path) = vars {
        let values = load_variables(path)?;
        debug!(count = values.len(), file = %path.display(), "loaded variables");
        calc.variables_mut().extend(values);
    }
    for define in defines {
        let (name, value) = parse_define(define)?;
        calc.variables_mut().set(name, value);
    }

    let result = calc.evaluate().context("Evaluation failed")?;
    match result {
        Variant::Array(_) | Variant::Object(_) => {
            println!("{}", serde_json::to_string_pretty(&result.to_json())?)
        }
        other => println!("{}", other),
    }
    Ok(())
}

fn postfix(expression: &str) -> Result<()> {
    let program = parse(expression).with_context(|| format!("Failed to parse '{}'", expression))?;
    println!("{}", program);
    Ok(())
}

fn tokens(expression: &str) -> Result<()> {
    for token in ExpressionTokenizer::new().tokenize(expression) {
        println!(
            "{:>4}:{:<4} {:<9} {}",
            token.line,
            token.column,
            kind_label(&token.kind),
            token.kind
        );
    }
    Ok(())
}

fn kind_label(kind: &TokenKind) -> &'static str {
    match kind {
        TokenKind::Constant(_) => "constant",
        TokenKind::Variable(_) => "variable",
        TokenKind::Function { .. } => "function",
        TokenKind::Operator(_) => "operator",
        TokenKind::Unknown(_) => "unknown",
        TokenKind::Eof => "eof",
        _ => "symbol",
    }
}

/// Read a JSON object of variable values
fn load_variables(path: &Path) -> Result<Vec<(String, Variant)>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse '{}' as JSON", path.display()))?;

    match json {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(name, value)| (name, Variant::from(value)))
            .collect()),
        other => bail!(
            "'{}' must contain a JSON object, found {}",
            path.display(),
            json_kind(&other)
        ),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Parse a `NAME=VALUE` definition
fn parse_define(define: &str) -> Result<(String, Variant)> {
    let (name, value) = define
        .split_once('=')
        .with_context(|| format!("Invalid definition '{}': expected NAME=VALUE", define))?;

    let name = name.trim();
    if name.is_empty() {
        bail!("Invalid definition '{}': empty variable name", define);
    }
    Ok((name.to_string(), parse_value(value)))
}

/// Most specific value for command-line text
fn parse_value(text: &str) -> Variant {
    if let Ok(n) = text.parse::<i32>() {
        Variant::Integer(n)
    } else if let Ok(n) = text.parse::<i64>() {
        Variant::Long(n)
    } else if let Some(n) = parse_decimal(text) {
        Variant::Double(n)
    } else if text.eq_ignore_ascii_case("true") {
        Variant::Boolean(true)
    } else if text.eq_ignore_ascii_case("false") {
        Variant::Boolean(false)
    } else if text.eq_ignore_ascii_case("null") {
        Variant::Null
    } else {
        Variant::string(text)
    }
}
