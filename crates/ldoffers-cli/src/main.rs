mod extract;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ldoffers-cli")]
#[command(about = "Extract ticket offers from schema.org JSON-LD")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a page and print its offers as JSON
    Scrape {
        /// Absolute http(s) URL of the event page
        url: String,
    },
    /// Extract offers from a saved HTML page (`-` reads stdin)
    Extract {
        path: PathBuf,
        /// Treat the input as a JSON array of raw script bodies instead of HTML
        #[arg(long)]
        scripts: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ldoffers_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let response = match cli.command {
        Commands::Scrape { url } => extract::scrape_url(&config, &url).await?,
        Commands::Extract { path, scripts } => {
            let input = extract::read_input(&path)?;
            if scripts {
                extract::offers_from_script_list(&input)?
            } else {
                extract::offers_from_html(&input)?
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
