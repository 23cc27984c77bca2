//! predsql CLI
//!
//! A thin wrapper around the predsql library: compiles one predicate function
//! and prints the SQL it renders to, with its parameter bindings.

use clap::Parser;
use predsql::{
    Command, Parameter, ParameterProvider, ParameterWriter, QueryStringBuilder, SelectQuery,
    compile_with,
};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "predsql")]
#[command(about = "Compile a predicate function to a parameterized SQL fragment")]
#[command(after_help = "\
EXAMPLES:
    # Print the WHERE fragment and its bindings
    predsql 'x => x.gold > 100 && x.kind == \"merchant\"'

    # Compose a full SELECT
    predsql --table entities --field name --field gold 'x => x.gold > 100'

    # Machine-readable output, with ':' placeholders
    predsql --json --prefix : 'function (x) { return x.id === 7 || x.id === 8; }'
")]
struct Args {
    /// Function source, e.g. `x => x.a == 1 && x.b != null`
    source: String,

    /// Wrap the predicate in `SELECT ... FROM <TABLE> WHERE ...`
    #[arg(long)]
    table: Option<String>,

    /// Column to select (repeatable). Selects `*` when omitted.
    #[arg(long = "field", requires = "table")]
    fields: Vec<String>,

    /// Placeholder prefix
    #[arg(long, default_value = predsql::DEFAULT_PREFIX)]
    prefix: String,

    /// Print `{"text": ..., "parameters": [...]}` instead of plain text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    text: &'a str,
    parameters: &'a [Parameter],
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut params = ParameterProvider::with_prefix(args.prefix.as_str());
    let predicate = compile_with(&args.source, &mut params)?;
    log::debug!("{} placeholder(s) reserved", params.reserved());

    let command = match &args.table {
        Some(table) => SelectQuery::new(table.as_str())
            .fields(args.fields.iter().map(String::as_str))
            .filter(predicate)
            .build(),
        None => Command {
            text: predicate.to_raw_string(),
            parameters: predicate.parameters(),
        },
    };

    if args.json {
        let output = Output {
            text: &command.text,
            parameters: &command.parameters,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", command.text);
        for parameter in &command.parameters {
            println!("  {} = {}", parameter.placeholder_name, parameter.value);
        }
    }

    Ok(())
}
