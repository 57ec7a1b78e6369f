use anyhow::{bail, Context};
use quest_core::{ClientConfig, Dispatcher, NormalizedResult, Params};
use serde_json::Value;

use crate::cli::args::{ClientArgs, RunArgs};
use crate::cli::table;
use crate::exit_codes;

pub async fn run(args: RunArgs, client: &ClientArgs) -> anyhow::Result<i32> {
    let params = parse_params(&args.params)?;
    let dispatcher = Dispatcher::new(client.apply(ClientConfig::from_env()))?;

    match dispatcher.run_cypher(&args.cypher, params).await {
        Ok(result) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", report(&result));
                if args.trace {
                    eprint!("\n{}", result.trace.render());
                }
            }
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => {
            eprintln!("error: {e}");
            if let Some(trace) = e.trace() {
                eprint!("\n{}", trace.render());
            }
            Ok(e.exit_code())
        }
    }
}

/// Banner, warning and table for a successful dispatch.
fn report(result: &NormalizedResult) -> String {
    let mut out = String::new();
    if result.mocked {
        out.push_str("(mock data)\n");
    } else if let Some(source) = &result.source_endpoint {
        out.push_str(&format!("(live: {source})\n"));
    }
    if let Some(warning) = &result.warning {
        out.push_str(&format!("warning: {warning}\n"));
    }
    out.push_str(&table::render(&result.columns(), &result.rows));
    out.push_str(&format!("{} row(s)\n", result.rows.len()));
    out
}

/// Parse `key=value` pairs; values are JSON when they parse, strings otherwise.
pub fn parse_params(raw: &[String]) -> anyhow::Result<Params> {
    let mut params = Params::new();
    for pair in raw {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("invalid --param {pair:?}: expected KEY=VALUE");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("invalid --param {pair:?}: empty key");
        }
        let value = serde_json::from_str::<Value>(value)
            .or_else(|_| serde_json::to_value(value))
            .with_context(|| format!("invalid --param value for {key}"))?;
        params.insert(key.to_string(), value);
    }
    Ok(params)
}
