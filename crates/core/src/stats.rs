//! Headline figures shown above each page's table, computed over the
//! derived view.

use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::records::{Agent, Lead, Property};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSummary {
    pub total_agents: usize,
    pub total_leads: i64,
    pub total_deals: i64,
    /// Mean rating with one decimal, `"0.0"` for an empty view.
    pub average_rating: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadSummary {
    pub total: usize,
    pub qualified: usize,
    pub converted: usize,
    pub new_today: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySummary {
    pub total: usize,
    pub active: usize,
    pub pending: usize,
    /// `None` for an empty view.
    pub average_price: Option<f64>,
}

pub fn agents(view: &[Agent]) -> AgentSummary {
    let average = if view.is_empty() {
        0.0
    } else {
        view.iter().map(|a| a.rating).sum::<f64>() / view.len() as f64
    };
    AgentSummary {
        total_agents: view.len(),
        total_leads: view.iter().map(|a| a.leads).sum(),
        total_deals: view.iter().map(|a| a.deals).sum(),
        average_rating: format!("{average:.1}"),
    }
}

/// `today` is a UTC calendar date; leads whose `created_at` cannot be
/// parsed never count as new.
pub fn leads(view: &[Lead], today: Date) -> LeadSummary {
    let with_status = |status: &str| view.iter().filter(|l| l.lead_status == status).count();
    LeadSummary {
        total: view.len(),
        qualified: with_status("qualified"),
        converted: with_status("converted"),
        new_today: view
            .iter()
            .filter(|l| created_on(&l.created_at) == Some(today))
            .count(),
    }
}

pub fn properties(view: &[Property]) -> PropertySummary {
    let with_status = |status: &str| {
        view.iter()
            .filter(|p| p.listing_status == status)
            .count()
    };
    let average_price = if view.is_empty() {
        None
    } else {
        Some(view.iter().map(|p| p.listing_price).sum::<f64>() / view.len() as f64)
    };
    PropertySummary {
        total: view.len(),
        active: with_status("active"),
        pending: with_status("pending"),
        average_price,
    }
}

/// Today's date in UTC.
pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Calendar date (UTC) of an RFC 3339 timestamp or a bare `YYYY-MM-DD`.
fn created_on(raw: &str) -> Option<Date> {
    if let Ok(stamp) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(stamp.to_offset(time::UtcOffset::UTC).date());
    }
    let day = raw.get(..10)?;
    Date::parse(day, format_description!("[year]-[month]-[day]")).ok()
}
