use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use leads_client::config::{AppConfig, API_URL_ENV, SESSION_PATH_ENV};
use leads_client::projector::{project, summarize};
use leads_client::{Filter, Lead, LeadDraft, LeadStatus, LeadsClient, LeadsError, SessionStore, StatusFilter};

#[derive(Parser)]
#[command(name = "leads-cli")]
#[command(about = "Manage sales leads from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL
    #[arg(short, long, env = API_URL_ENV)]
    url: Option<String>,

    /// Where the session (token + employee id) is kept
    #[arg(long, env = SESSION_PATH_ENV)]
    session: Option<String>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    Logout,
    List {
        /// all, hot, warm or cold
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,
        /// Only leads dated on this day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        phone: String,
        #[arg(short, long, default_value = "hot")]
        status: LeadStatus,
        #[arg(long, default_value = "")]
        notes: String,
        /// Defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(long)]
        pin: bool,
    },
    Delete {
        #[arg(short, long)]
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Dashboard counts
    Summary,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _log_guard = setup_logging(cli.verbose);

    let config = AppConfig::resolve(cli.url.as_deref(), cli.session.as_deref())?;
    info!(api = config.client.base_url(), session = %config.session_path, "starting");
    let session = SessionStore::open(&config.session_path)?;
    let client = LeadsClient::new(config.client.clone(), session.clone());

    // Returning (rather than exiting) lets the log guard flush on drop.
    if let Err(e) = run(cli.command, &client, &session).await {
        report(&e, &session);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr through a non-blocking writer; the guard flushes on drop.
fn setup_logging(verbose: bool) -> tracing_appender::non_blocking::WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(io::stderr());
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .init();
    guard
}

async fn run(command: Commands, client: &LeadsClient, session: &SessionStore) -> leads_client::Result<()> {
    match command {
        Commands::Login { email, password } => {
            let credentials = client.login(&email, &password).await?;
            // Without a stored session there is nothing to continue with.
            session.save(&credentials)?;
            println!("Logged in as employee {}.", credentials.employee_id);
        }
        Commands::Logout => {
            session.clear()?;
            println!("Logged out.");
        }
        Commands::List { status, date } => {
            let leads = client.list_own(status.status()).await?;
            let shown = project(&leads, &Filter::new(status, date));
            if shown.is_empty() {
                println!("No leads found.");
            }
            for lead in &shown {
                print_lead(lead);
            }
        }
        Commands::Create {
            name,
            email,
            phone,
            status,
            notes,
            date,
            pin,
        } => {
            let mut draft = LeadDraft::new(name, email, phone, status);
            draft.notes = notes;
            draft.pinned = pin;
            if let Some(date) = date {
                draft.date = date;
            }
            let lead = client.create(&draft).await?;
            println!("Lead created: {}", lead.id);
        }
        Commands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete lead {}? This cannot be undone.", id)) {
                println!("Cancelled.");
                return Ok(());
            }
            client.remove(&id).await?;
            println!("Lead {} deleted.", id);
        }
        Commands::Summary => {
            let summary = summarize(&client.list_own(None).await?);
            println!(
                "Total {} | Hot {} | Warm {} | Cold {} | Pinned {}",
                summary.total, summary.hot, summary.warm, summary.cold, summary.pinned
            );
        }
    }
    Ok(())
}

fn print_lead(lead: &Lead) {
    let marker = if lead.pinned { "*" } else { " " };
    println!(
        "{} {:<24} {:<5} {} | {}  [{}]",
        marker,
        lead.name,
        lead.status.map_or("-".to_string(), |s| s.as_str().to_uppercase()),
        lead.email,
        lead.phone,
        lead.id
    );
    if let Some(date) = &lead.date {
        println!("    Date: {}", date);
    }
    if !lead.notes.is_empty() {
        println!("    {}", lead.notes);
    }
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

/// One message per error kind; an expired session is also cleared.
fn report(err: &LeadsError, session: &SessionStore) {
    match err {
        LeadsError::Validation { field } => eprintln!("Validation: please provide a valid {}.", field),
        LeadsError::SessionExpired => {
            if let Err(e) = session.clear() {
                warn!(error = %e, "could not clear expired session");
            }
            eprintln!("Session expired. Please login again.");
        }
        LeadsError::Network(e) => {
            error!(error = %e, "request failed");
            eprintln!("Network error.");
        }
        LeadsError::Api { message, .. } => eprintln!("Error: {}", message),
        LeadsError::Session(e) => eprintln!("Failed to access the saved session: {}", e),
    }
}
