//! Inspector for saved entity API responses.
//!
//! Loads a `wbgetentities` response from disk, parses it and prints each
//! entity's terms, claim groups and identifier lists. Entity references are
//! labelled from the entities of the same file.
//!
//! ```text
//! wb-inspect <response.json> [--lang <code>] [--json]
//! ```
//!
//! `--json` prints the canonical serialization of every entity instead.
//! Set `RUST_LOG=wikibase_claims=debug` to see decoder diagnostics.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use thiserror::Error;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use wikibase_claims::{
    DocumentResolver, Entity, EntityDocument, ParseError, RenderedValue, ResolveError,
    DEFAULT_LANGUAGE,
};

#[derive(Debug, Error)]
enum InspectError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Print the claim tree of a saved entity API response.
#[derive(Parser, Debug)]
#[command(name = "wb-inspect", version)]
struct Options {
    /// `wbgetentities` response to read.
    path: PathBuf,

    /// Language for labels, descriptions and rendered values.
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    lang: String,

    /// Print the canonical serialization instead of the summary.
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn describe(value: &RenderedValue<'_>) -> String {
    match value {
        RenderedValue::Label(Some(label)) => label.clone(),
        RenderedValue::Label(None) => "(no label)".to_string(),
        RenderedValue::Absent => "(no value)".to_string(),
        other => other.to_json().to_string(),
    }
}

fn print_entity(entity: &Entity, lang: &str, labels: &DocumentResolver) -> Result<(), InspectError> {
    let id = entity.id().unwrap_or("(no id)");
    println!("{} [{}]", id, entity.entity_type().unwrap_or("?"));
    if let Some(label) = entity.label(lang) {
        println!("  label:       {}", label);
    }
    if let Some(description) = entity.description(lang) {
        println!("  description: {}", description);
    }
    if let Some(aliases) = entity.alias_values(lang) {
        println!("  aliases:     {}", aliases.join(", "));
    }

    for (pid, claims) in entity.properties().into_iter().flat_map(|c| c.iter()) {
        let values = entity.property_values(pid, lang, labels)?.unwrap_or_default();
        let rendered: Vec<String> = values.iter().map(describe).collect();
        let qualified = claims.iter().filter(|c| c.qualifiers().next().is_some()).count();
        let referenced = claims.iter().filter(|c| !c.references().is_empty()).count();
        println!(
            "  {:<8} {} claim(s), {} qualified, {} referenced: {}",
            pid,
            claims.len(),
            qualified,
            referenced,
            rendered.join(" | ")
        );
    }

    println!("  entity ids:   {}", entity.gather_entity_ids().join(" "));
    println!("  property ids: {}", entity.gather_property_ids().join(" "));
    Ok(())
}

fn run(options: &Options) -> Result<(), InspectError> {
    let text = fs::read_to_string(&options.path).map_err(|source| InspectError::Read {
        path: options.path.clone(),
        source,
    })?;

    let parse_start = Instant::now();
    let document = wikibase_claims::parse_document_str(&text)?;
    debug!(entities = document.len(), elapsed = ?parse_start.elapsed(), "parsed document");
    if document.success() == Some(false) {
        warn!("response is not marked successful");
    }

    if options.json {
        return print_json(&document);
    }

    let labels = DocumentResolver::from_document(document.clone());
    for (i, entity) in document.entities().values().enumerate() {
        if i > 0 {
            println!();
        }
        print_entity(entity, &options.lang, &labels)?;
    }
    Ok(())
}

fn print_json(document: &EntityDocument) -> Result<(), InspectError> {
    let out: serde_json::Map<String, serde_json::Value> = document
        .entities()
        .iter()
        .map(|(id, entity)| (id.to_string(), entity.serialize()))
        .collect();
    println!("{}", serde_json::Value::Object(out));
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let options = Options::parse();
    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
