//! leads_client: session-gated client for a sales-leads backend
//!
//! Three collaborators make up the core:
//! - `session`: durable token + employee id pair (Sled), written atomically.
//! - `client`: typed wrapper over the REST API (login, list, create, delete).
//! - `projector`: pure filtering/ordering of a lead list for display.
//!
//! Presentation (screens, prompts, confirmation) lives outside the library;
//! `leads-cli` is one such front end.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod projector;
pub mod session;

pub use client::LeadsClient;
pub use error::{LeadsError, Result};
pub use models::{Credentials, Filter, Lead, LeadDraft, LeadStatus, LeadSummary, StatusFilter};
pub use session::SessionStore;
