//! Seed a backend account with sample leads
//!
//! Logs in, keeps the session in a throwaway store, and creates a batch of
//! leads spread over the three statuses.
//! Run: cargo run --bin seed_leads -- <email> <password> [count]

use futures::future::join_all;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use leads_client::config::AppConfig;
use leads_client::projector::summarize;
use leads_client::{LeadDraft, LeadStatus, LeadsClient, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let (email, password) = match (args.next(), args.next()) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err("usage: seed_leads <email> <password> [count]".into()),
    };
    let count: usize = args.next().map(|c| c.parse::<usize>()).transpose()?.unwrap_or(10);

    let config = AppConfig::resolve(None, None)?;
    let session = SessionStore::temporary()?;
    let client = LeadsClient::new(config.client, session.clone());

    let credentials = client.login(&email, &password).await?;
    session.save(&credentials)?;
    info!(employee_id = %credentials.employee_id, count, "seeding leads");

    // Independent creates; each is a single request.
    let drafts: Vec<LeadDraft> = (0..count).map(sample_draft).collect();
    let results = join_all(drafts.iter().map(|draft| client.create(draft))).await;
    let mut created = 0;
    for (draft, result) in drafts.iter().zip(results) {
        match result {
            Ok(lead) => {
                created += 1;
                info!(id = %lead.id, name = %lead.name, "created");
            }
            Err(e) => warn!(name = %draft.name, error = %e, "create failed"),
        }
    }

    let summary = summarize(&client.list_own(None).await?);
    info!(
        created,
        total = summary.total,
        hot = summary.hot,
        warm = summary.warm,
        cold = summary.cold,
        "seeding done"
    );
    Ok(())
}

fn sample_draft(i: usize) -> LeadDraft {
    let tag = Uuid::new_v4().simple().to_string();
    let status = LeadStatus::ALL[i % LeadStatus::ALL.len()];
    let mut draft = LeadDraft::new(
        format!("Sample Lead {}", i + 1),
        format!("lead.{}@example.com", &tag[..8]),
        format!("555{:07}", i),
        status,
    );
    draft.notes = format!("Seeded {} lead", status);
    draft.pinned = i % 4 == 0;
    draft
}
