//! Plain-text and JSON rendering of page contents.

use serde::Serialize;
use summer_core::stats::{AgentSummary, LeadSummary, PropertySummary};
use summer_core::{Agent, EnrichmentKey, EnrichmentPayload, Lead, Property};

pub(crate) fn print_json(value: &impl Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("failed to serialize output: {}", e),
    }
}

/// Whole US dollars with thousands separators, e.g. `$1,250,000`.
pub(crate) fn currency(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

pub(crate) fn agent_line(agent: &Agent) -> String {
    format!(
        "#{:<3} {:<22} {:<24} {:>4.1}  {:>4} leads  {:>4} deals",
        agent.id, agent.name, agent.specialty, agent.rating, agent.leads, agent.deals
    )
}

pub(crate) fn lead_line(lead: &Lead) -> String {
    let budget = match (lead.budget_min, lead.budget_max) {
        (Some(min), Some(max)) => format!("{} - {}", currency(min as f64), currency(max as f64)),
        (Some(min), None) => format!("from {}", currency(min as f64)),
        (None, Some(max)) => format!("up to {}", currency(max as f64)),
        (None, None) => "-".to_string(),
    };
    format!(
        "#{:<3} {:<24} {:<28} {:<10} {:<13} {}",
        lead.id,
        lead.full_name(),
        lead.email,
        lead.lead_status,
        lead.lead_source,
        budget
    )
}

pub(crate) fn property_line(property: &Property) -> String {
    let rooms = match (property.bedrooms, property.bathrooms) {
        (Some(bed), Some(bath)) => format!("{}bd/{}ba", bed, bath),
        (Some(bed), None) => format!("{}bd", bed),
        (None, Some(bath)) => format!("{}ba", bath),
        (None, None) => String::new(),
    };
    format!(
        "#{:<3} {}, {}, {} {}  {}  {}  {}",
        property.id,
        property.address,
        property.city,
        property.state,
        property.zip_code,
        property.listing_status,
        currency(property.listing_price),
        rooms
    )
    .trim_end()
    .to_string()
}

pub(crate) fn agent_summary(summary: &AgentSummary) -> String {
    format!(
        "{} agents, {} leads, {} deals, average rating {}",
        summary.total_agents, summary.total_leads, summary.total_deals, summary.average_rating
    )
}

pub(crate) fn lead_summary(summary: &LeadSummary) -> String {
    format!(
        "{} leads, {} qualified, {} converted, {} new today",
        summary.total, summary.qualified, summary.converted, summary.new_today
    )
}

pub(crate) fn property_summary(summary: &PropertySummary) -> String {
    let average = summary
        .average_price
        .map(currency)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} listings, {} active, {} pending, average price {}",
        summary.total, summary.active, summary.pending, average
    )
}

pub(crate) fn insight_lines(insights: &EnrichmentPayload) -> Vec<String> {
    EnrichmentKey::ALL
        .into_iter()
        .filter_map(|key| insights.get(key).map(|v| format!("{}: {}", key.field(), v)))
        .collect()
}
