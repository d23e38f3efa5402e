use clap::{Args, Parser, Subcommand};
use invoice_taskpane::api::{ApiClient, InvoiceImporter};
use invoice_taskpane::config::{self, Config};
use invoice_taskpane::error::SubmitError;
use invoice_taskpane::form::InvoiceForm;
use invoice_taskpane::host::{EmlHost, MailboxHost, StaticHost};
use invoice_taskpane::render::{render_outcome, render_pane};
use invoice_taskpane::{PaneState, Taskpane, payload};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskpane")]
#[command(about = "Invoice add-in taskpane for the terminal")]
struct Cli {
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct MessageSource {
    /// Internet message id, with or without angle brackets
    #[arg(long)]
    message_id: Option<String>,
    /// Saved message to read the Message-ID header from
    #[arg(long)]
    eml: Option<PathBuf>,
}

impl MessageSource {
    fn host(&self) -> Box<dyn MailboxHost> {
        match (&self.message_id, &self.eml) {
            (Some(id), _) => Box::new(StaticHost::new(id.clone())),
            (None, Some(path)) => Box::new(EmlHost::new(path)),
            (None, None) => Box::new(StaticHost::empty()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the classification and invoice details for a message
    Show {
        #[command(flatten)]
        source: MessageSource,
    },
    /// Write the import editor's form to a file for editing
    Stage {
        #[command(flatten)]
        source: MessageSource,
        #[arg(long)]
        out: PathBuf,
    },
    /// Submit an edited form to the import service
    Import {
        #[arg(long)]
        form: PathBuf,
    },
    /// Check that the backend is reachable
    Health,
    /// Save the backend URL in the config file
    SetBaseUrl { url: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = Config::load_or_default(&cli.config)?;

    // init tracing; stdout is the pane itself
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter));
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Show { source } => {
            let client = ApiClient::new(&cfg.api)?;
            let mut pane = Taskpane::new();
            pane.load(source.host().as_ref(), &client).await;
            render_pane(&pane, &mut stdout)?;
        }
        Commands::Stage { source, out } => {
            let client = ApiClient::new(&cfg.api)?;
            let mut pane = Taskpane::new();
            pane.load(source.host().as_ref(), &client).await;
            render_pane(&pane, &mut stdout)?;

            match pane.form() {
                Some(form) => {
                    fs::write(&out, toml::to_string_pretty(form)?)?;
                    info!(path = %out.display(), "Staged invoice form");
                    writeln!(stdout, "\nForm written to {}", out.display())?;
                }
                None if matches!(pane.state(), PaneState::Ready(_)) => {
                    writeln!(stdout, "\nThis email has nothing to import.")?;
                }
                None => {}
            }
        }
        Commands::Import { form } => {
            let form: InvoiceForm = toml::from_str(&fs::read_to_string(&form)?)?;
            let client = ApiClient::new(&cfg.api)?;

            let result = match payload::build_payload(&form) {
                Ok(payload) => client
                    .import_invoice(&payload)
                    .await
                    .map_err(SubmitError::from),
                Err(e) => Err(SubmitError::from(e)),
            };
            render_outcome(&result, &mut stdout)?;
        }
        Commands::Health => {
            let client = ApiClient::new(&cfg.api)?;
            if client.health().await {
                writeln!(stdout, "Backend at {} is up", cfg.api.base_url)?;
            } else {
                writeln!(stdout, "Backend at {} is not reachable", cfg.api.base_url)?;
            }
        }
        Commands::SetBaseUrl { url } => {
            Config::set_base_url(&cli.config, &url)?;
            info!(path = %cli.config.display(), url = %url, "Updated backend URL");
        }
    }

    Ok(())
}
