//! `bentego`: command-line interface to the Bentego record store.
//!
//! Plays the caller role the original form UI had: it supplies collection
//! names, identifier strings and `field=value` attribute mappings to the
//! core, and renders the outcome that comes back. All store logic lives in
//! `bentego-core`.

use bentego_core::{
    DeleteOutcome, FetchOutcome, FieldValue, Fields, StoreConfig, StoreConnection, StoreError,
    UpdateOutcome,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bentego")]
#[command(about = "Bentego clinical record store CLI")]
struct Cli {
    /// Store endpoint (overrides BENTEGO_URI)
    #[arg(long, global = true)]
    uri: Option<String>,
    /// Database name (overrides BENTEGO_DB)
    #[arg(long, global = true)]
    database: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert a new record
    Insert {
        /// Collection name
        collection: String,
        /// Attributes as field=value (value read as integer, then float, then text)
        #[arg(required = true)]
        attributes: Vec<String>,
    },
    /// Fetch a record by identifier
    Fetch {
        /// Collection name
        collection: String,
        /// Record identifier (24 lowercase hex characters)
        id: String,
    },
    /// Merge fields into an existing record
    Update {
        /// Collection name
        collection: String,
        /// Record identifier (24 lowercase hex characters)
        id: String,
        /// Attributes as field=value (unlisted fields are left unchanged)
        #[arg(required = true)]
        attributes: Vec<String>,
    },
    /// Delete a record by identifier
    Delete {
        /// Collection name
        collection: String,
        /// Record identifier (24 lowercase hex characters)
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = StoreConfig::from_env_values(
        cli.uri.or_else(|| std::env::var("BENTEGO_URI").ok()),
        cli.database.or_else(|| std::env::var("BENTEGO_DB").ok()),
    )?;

    let mut connection = StoreConnection::open(&config).await?;
    let result = run(&connection, cli.command).await;
    // Release the handle on every exit path, including failed operations.
    connection.close().await;

    result.map_err(Into::into)
}

async fn run(connection: &StoreConnection, command: Commands) -> Result<(), StoreError> {
    match command {
        Commands::Insert {
            collection,
            attributes,
        } => {
            let fields = parse_attributes(&attributes)?;
            let id = connection.insert(&collection, fields).await?;
            println!("Inserted new document with _id: {id}");
        }
        Commands::Fetch { collection, id } => match connection.fetch(&collection, &id).await? {
            FetchOutcome::Found(record) => {
                let rendered = serde_json::to_string_pretty(&record)
                    .unwrap_or_else(|_| format!("{record:?}"));
                println!("{rendered}");
            }
            FetchOutcome::NotFound { .. } => {
                println!("No document found with _id: {id}");
            }
            FetchOutcome::InvalidIdentifier { reason, .. } => {
                eprintln!("Invalid identifier: {reason}");
            }
        },
        Commands::Update {
            collection,
            id,
            attributes,
        } => {
            let fields = parse_attributes(&attributes)?;
            match connection.update(&collection, &id, fields).await? {
                UpdateOutcome::Updated { .. } => {
                    println!("Document with _id: {id} has been updated.");
                }
                UpdateOutcome::NotFound { .. } => {
                    println!("No document found with _id: {id}");
                }
                UpdateOutcome::InvalidIdentifier { reason, .. } => {
                    eprintln!("Invalid identifier: {reason}");
                }
            }
        }
        Commands::Delete { collection, id } => {
            match connection.delete(&collection, &id).await? {
                DeleteOutcome::Deleted { .. } => {
                    println!("Document with _id: {id} has been deleted.");
                }
                DeleteOutcome::NotFound { .. } => {
                    println!("No document found with _id: {id}");
                }
                DeleteOutcome::InvalidIdentifier { reason, .. } => {
                    eprintln!("Invalid identifier: {reason}");
                }
            }
        }
    }
    Ok(())
}

/// Parses `field=value` pairs into a field map.
///
/// Values are read as integer first, then float, then plain text: the
/// three value shapes the record model supports.
fn parse_attributes(raw: &[String]) -> Result<Fields, StoreError> {
    raw.iter().map(|pair| parse_attribute(pair)).collect()
}

fn parse_attribute(raw: &str) -> Result<(String, FieldValue), StoreError> {
    let (name, value) = raw.split_once('=').ok_or_else(|| {
        StoreError::InvalidInput(format!("attribute '{raw}' must be of the form field=value"))
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::InvalidInput(format!(
            "attribute '{raw}' has an empty field name"
        )));
    }

    let value = value.trim();
    let value = if let Ok(int) = value.parse::<i64>() {
        FieldValue::Int(int)
    } else if let Ok(float) = value.parse::<f64>() {
        FieldValue::Float(float)
    } else {
        FieldValue::Text(value.to_string())
    };

    Ok((name.to_string(), value))
}
