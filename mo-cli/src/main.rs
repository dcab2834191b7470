//! Search parameter command-line tool
//!
//! **Usage:**
//! ```bash
//! mo-search [--config <FILE>] fields <ENTITY>
//! mo-search [--config <FILE>] assemble <ENTITY> <PARAMS.json | ->
//! mo-search [--config <FILE>] check-import --username <NAME> [--ids <LIST>] [--all] [--consent] [--records <FILE>]
//! ```
//!
//! Results are printed as JSON. Rejected input exits with status 2.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mo_common::config::{load_config, ConfigResolver, TomlConfig};
use mo_inat::{ImportOutcome, ImportRequest, ImportValidator, InMemoryRecords};
use mo_search::{assemble_with, search_form, AssemblyOptions, Entity, RawParams};
use serde_json::json;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Search form and iNat import checker
#[derive(Parser, Debug)]
#[command(name = "mo-search", version)]
#[command(about = "Validate Mushroom Observer search parameters and iNat import requests")]
struct Args {
    /// Config file (overrides MO_SEARCH_CONFIG and the platform config file)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the attributes of an entity's search form
    Fields {
        /// names or observations
        entity: Entity,
    },

    /// Assemble a query filter from a JSON object of form parameters
    Assemble {
        /// names or observations
        entity: Entity,

        /// JSON file, or "-" for stdin
        params: PathBuf,
    },

    /// Check whether an iNat import request would be accepted
    CheckImport {
        #[arg(long, default_value = "")]
        username: String,

        /// Comma or space separated iNat observation ids
        #[arg(long, default_value = "")]
        ids: String,

        /// Import all of the user's observations
        #[arg(long)]
        all: bool,

        /// User consents to the import
        #[arg(long)]
        consent: bool,

        /// JSON array of existing observations ({id, inat_id, notes})
        #[arg(long, value_name = "FILE")]
        records: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let source = ConfigResolver::new().resolve(args.config.as_deref());
    let config = load_config(&source)
        .with_context(|| format!("Failed to load configuration ({:?})", source))?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();
    info!("Configuration source: {:?}", source);

    match args.command {
        Command::Fields { entity } => list_fields(entity),
        Command::Assemble { entity, params } => run_assemble(&config, entity, &params),
        Command::CheckImport {
            username,
            ids,
            all,
            consent,
            records,
        } => {
            let request = ImportRequest::new(&username, &ids, all, consent);
            run_check_import(&config, &request, records.as_deref())
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        return Ok(content);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn list_fields(entity: Entity) -> Result<ExitCode> {
    let form = search_form(entity)?;
    let fields: Vec<_> = form
        .fields()
        .iter()
        .map(|field| {
            json!({
                "key": field.key(),
                "kind": field.spec.kind,
                "default": field.spec.default,
                "yes_only": field.spec.yes_only,
                "attributes": field.attributes().collect::<Vec<_>>(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&fields)?);
    Ok(ExitCode::SUCCESS)
}

fn run_assemble(config: &TomlConfig, entity: Entity, path: &Path) -> Result<ExitCode> {
    let form = search_form(entity)?;
    let params: RawParams = serde_json::from_str(&read_input(path)?)
        .with_context(|| format!("Invalid parameter JSON in {}", path.display()))?;
    info!("Assembling {} search from {} parameters", entity, params.len());

    match assemble_with(form, &params, AssemblyOptions::from(&config.search)) {
        Ok(assembly) => {
            println!("{}", serde_json::to_string_pretty(&assembly)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            println!("{}", serde_json::to_string_pretty(&json!({ "errors": errors }))?);
            Ok(ExitCode::from(2))
        }
    }
}

fn run_check_import(
    config: &TomlConfig,
    request: &ImportRequest,
    records_path: Option<&Path>,
) -> Result<ExitCode> {
    let records: InMemoryRecords = match records_path {
        Some(path) => serde_json::from_str(&read_input(path)?)
            .with_context(|| format!("Invalid records JSON in {}", path.display()))?,
        None => InMemoryRecords::default(),
    };

    let validator = ImportValidator::from(&config.inat);
    let outcome = validator.validate(request, &records);
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(match outcome {
        ImportOutcome::Accepted => ExitCode::SUCCESS,
        ImportOutcome::Rejected(_) => ExitCode::from(2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assemble_args() {
        let args = Args::try_parse_from([
            "mo-search",
            "assemble",
            "observations",
            "params.json",
            "--config",
            "search.toml",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("search.toml")));
        match args.command {
            Command::Assemble { entity, params } => {
                assert_eq!(entity, Entity::Observations);
                assert_eq!(params, PathBuf::from("params.json"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_check_import_defaults() {
        let args = Args::try_parse_from(["mo-search", "check-import", "--username", "u"]).unwrap();
        match args.command {
            Command::CheckImport {
                username,
                ids,
                all,
                consent,
                records,
            } => {
                assert_eq!(username, "u");
                assert!(ids.is_empty());
                assert!(!all && !consent);
                assert!(records.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_entity_rejected() {
        assert!(Args::try_parse_from(["mo-search", "fields", "herbaria"]).is_err());
    }
}
