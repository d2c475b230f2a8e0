use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;

use anthropic_client::{CompletionClient, CredentialStore, HttpTransport};
use widget_forge::generation::cli::GenerateArgs;
use widget_forge::generation::{ArtifactStore, GenerationPipeline};
use widget_forge::store::{KeyValueStore, SqliteStore};

/// Store key holding the persisted API key
const API_KEY_CONFIG_KEY: &str = "config_anthropic_api_key";

#[derive(Parser, Debug)]
#[command(
    name = "widget-forge",
    about = "AI widget generation pipeline: analyze a feature request, plan it, synthesize and validate source files, and record registry update plans"
)]
struct Cli {
    /// Path to the artifact store database (default: ~/.widget-forge/artifacts.db)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the generation pipeline for a feature request
    Generate(GenerateArgs),
    /// List all artifacts currently tracked by the manifest
    List,
    /// Remove all artifacts, the manifest, and pending update plans
    Clear,
    /// Persist the Anthropic API key in the store
    SetKey {
        /// The API key value
        key: String,
    },
}

fn default_store_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".widget-forge").join("artifacts.db"))
}

/// Resolve the API key: environment first, then the persisted config entry
fn load_credentials(store: &dyn KeyValueStore) -> Result<CredentialStore> {
    let credentials = CredentialStore::from_env();
    if !credentials.is_configured() {
        if let Some(key) = store.get(API_KEY_CONFIG_KEY)? {
            credentials.set(key);
        }
    }
    Ok(credentials)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let store_path = match cli.store {
        Some(path) => path,
        None => default_store_path()?,
    };
    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::new(store_path)?);

    match cli.command {
        Command::Generate(args) => {
            let credentials = load_credentials(store.as_ref())?;
            let client = Arc::new(CompletionClient::new(
                credentials,
                Arc::new(HttpTransport::new()),
            ));
            let pipeline = GenerationPipeline::new(client, store.clone())
                .with_concurrency(args.concurrency);

            let request = args.to_request();
            let report = pipeline.run(&request).await?;

            println!("\n{}", "=".repeat(80));
            println!(
                "Run {} finished: {:?}, widget '{}'",
                report.run.id, report.status, report.widget.widget_type
            );
            println!("{}", "=".repeat(80));
            for path in &report.written_files {
                println!("  written: {}", path);
            }
            for error in &report.errors {
                println!("  error:   {}: {}", error.path, error.reason);
            }
            if report.registry.is_some() {
                println!(
                    "  registry update plans recorded for '{}'",
                    report.widget.widget_type
                );
            }
        }
        Command::List => {
            let artifacts = ArtifactStore::new(store).list_all()?;
            if artifacts.is_empty() {
                println!("No artifacts stored.");
            }
            for artifact in artifacts {
                println!(
                    "{}  ({} bytes, {})",
                    artifact.path,
                    artifact.content.len(),
                    artifact.timestamp
                );
            }
        }
        Command::Clear => {
            ArtifactStore::new(store).clear_all()?;
            println!("Cleared all artifacts, manifest and update plans.");
        }
        Command::SetKey { key } => {
            store.set(API_KEY_CONFIG_KEY, &key)?;
            println!("API key saved.");
        }
    }

    Ok(())
}
