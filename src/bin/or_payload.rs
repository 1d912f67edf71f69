//! or-payload: parse and check payload files against the API contract.
//!
//! Usage:
//!   or-payload config <file>       Chat config preset (.yaml/.yml/.json)
//!   or-payload request <file>      Request body (.json)
//!   or-payload response <file>     Completion response (.json)
//!   or-payload generation <file>   Generation stats (.json)

use ai_lib_openrouter::request::ConfigLoader;
use ai_lib_openrouter::{ChatRequest, ChatResponse, GenerationStats};
use anyhow::{bail, Context};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        "version" | "--version" | "-V" => {
            println!("or-payload {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        kind => match args.get(2) {
            Some(file) => check(kind, Path::new(file)),
            None => {
                eprintln!("missing <file> argument");
                print_usage();
                std::process::exit(1);
            }
        },
    };

    match result {
        Ok(summary) => println!("ok: {}", summary),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"or-payload: check chat-completion payload files

USAGE:
    or-payload <KIND> <FILE>

KINDS:
    config        Chat config preset (.yaml/.yml/.json)
    request       Request body (.json)
    response      Completion response (.json)
    generation    Generation stats (.json)

ENVIRONMENT:
    RUST_LOG      Log filter (default: warn)"#
    );
}

fn check(kind: &str, path: &Path) -> anyhow::Result<String> {
    match kind {
        "config" => {
            let config = ConfigLoader::new().load_file(path)?;
            Ok(format!(
                "config routes to {:?}{}",
                config.routing.candidates(),
                if config.routing.is_fallback() {
                    " (fallback)"
                } else {
                    ""
                }
            ))
        }
        "request" => {
            let request: ChatRequest = read_json(path)?;
            request.validate()?;
            Ok(format!(
                "request with {} message(s) for {:?}",
                request.messages.len(),
                request.config.routing.candidates()
            ))
        }
        "response" => {
            let response: ChatResponse = read_json(path)?;
            match response {
                ChatResponse::Success(success) => {
                    success.validate()?;
                    Ok(format!(
                        "success {} from {} with {} choice(s)",
                        success.id,
                        success.model,
                        success.choices.len()
                    ))
                }
                ChatResponse::Error(e) => Ok(format!(
                    "error envelope: HTTP {} {}",
                    e.error.status, e.error.message
                )),
            }
        }
        "generation" => {
            let stats: GenerationStats = read_json(path)?;
            Ok(format!(
                "generation {} on {}: {} tokens, {}",
                stats.data.id,
                stats.data.model,
                stats.data.total_tokens(),
                stats.data.format_cost()
            ))
        }
        other => bail!("unknown payload kind '{}'", other),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
