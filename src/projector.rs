//! Lead list projection
//!
//! Turns the raw lead list plus the current filter into the sequence a list
//! view renders. Pure: no I/O, same input gives the same output.

use chrono::{DateTime, NaiveDate};

use crate::models::{Filter, Lead, LeadStatus, LeadSummary};

/// Filter by status, then by calendar day, then move pinned leads to the
/// front keeping relative order inside each group.
pub fn project(leads: &[Lead], filter: &Filter) -> Vec<Lead> {
    let status = filter.status.status();
    let mut shown: Vec<Lead> = leads
        .iter()
        .filter(|lead| status.is_none() || lead.status == status)
        .filter(|lead| match filter.date {
            Some(day) => lead_day(lead) == Some(day),
            None => true,
        })
        .cloned()
        .collect();
    pin_first(&mut shown);
    shown
}

/// Stable: `sort_by_key` keeps the original order among equal keys.
pub fn pin_first(leads: &mut [Lead]) {
    leads.sort_by_key(|lead| !lead.pinned);
}

/// Keep only leads of `status`, preserving order.
pub fn retain_status(leads: &mut Vec<Lead>, status: LeadStatus) {
    leads.retain(|lead| lead.status == Some(status));
}

/// Calendar day of a lead: plain `YYYY-MM-DD`, or an RFC 3339 timestamp
/// reduced to its date. `None` when missing or unreadable.
pub fn lead_day(lead: &Lead) -> Option<NaiveDate> {
    let raw = lead.date.as_deref()?.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Dashboard tile counts for a lead list.
pub fn summarize(leads: &[Lead]) -> LeadSummary {
    leads.iter().fold(LeadSummary::default(), |mut acc, lead| {
        acc.total += 1;
        match lead.status {
            Some(LeadStatus::Hot) => acc.hot += 1,
            Some(LeadStatus::Warm) => acc.warm += 1,
            Some(LeadStatus::Cold) => acc.cold += 1,
            None => {}
        }
        if lead.pinned {
            acc.pinned += 1;
        }
        acc
    })
}
