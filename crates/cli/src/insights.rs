//! Page-independent views: the enrichment panel and the analytics page.

use serde_json::{json, Value};
use summer_core::stats::{self, AgentSummary, LeadSummary, PropertySummary};
use summer_core::{Agent, Criteria, CrmError, Lead, Property};
use summer_remote::EnrichmentAggregator;

use crate::pages;
use crate::render::{self, print_json};
use crate::{CliError, Context, OutputFormat};

pub(crate) async fn cmd_insights(ctx: &Context) -> Result<(), CliError> {
    let aggregator = EnrichmentAggregator::new(ctx.transport());
    let insights = aggregator
        .fetch_all(&ctx.config.enrichment_endpoints())
        .await;
    tracing::info!(keys = insights.keys().len(), "insights fetched");

    match ctx.output {
        OutputFormat::Json => print_json(&json!({
            "connected": insights.is_connected(),
            "insights": insights,
        })),
        OutputFormat::Text => {
            if !insights.is_connected() {
                println!("Offline: no insights available.");
            }
            for line in render::insight_lines(&insights) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Every page loads independently; one collection failing leaves the
/// others' figures intact.
pub(crate) async fn cmd_analytics(ctx: &Context) -> Result<(), CliError> {
    let aggregator = EnrichmentAggregator::new(ctx.transport());
    let endpoints = ctx.config.enrichment_endpoints();
    let (insights, agents, leads, properties) = tokio::join!(
        aggregator.fetch_all(&endpoints),
        pages::load::<Agent>(ctx, Criteria::new(), false),
        pages::load::<Lead>(ctx, Criteria::new(), false),
        pages::load::<Property>(ctx, Criteria::new(), false),
    );

    let agents: Result<AgentSummary, CliError> = agents.map(|p| stats::agents(&p.view()));
    let leads: Result<LeadSummary, CliError> =
        leads.map(|p| stats::leads(&p.view(), stats::today_utc()));
    let properties: Result<PropertySummary, CliError> =
        properties.map(|p| stats::properties(&p.view()));

    match ctx.output {
        OutputFormat::Json => print_json(&json!({
            "connected": insights.is_connected(),
            "fortune": insights.fortune,
            "agents": section(&agents),
            "leads": section(&leads),
            "properties": section(&properties),
        })),
        OutputFormat::Text => {
            match &insights.fortune {
                Some(fortune) => println!("Fortune: {}", fortune),
                None => println!("Offline: no fortune today."),
            }
            println!("Agents:     {}", text(&agents, render::agent_summary));
            println!("Leads:      {}", text(&leads, render::lead_summary));
            println!("Properties: {}", text(&properties, render::property_summary));
        }
    }

    let all_failed = agents.is_err() && leads.is_err() && properties.is_err();
    if all_failed {
        return Err(CliError::Crm(CrmError::transport(
            "Failed to connect to the server",
        )));
    }
    Ok(())
}

fn section<T: serde::Serialize>(result: &Result<T, CliError>) -> Value {
    match result {
        Ok(summary) => json!(summary),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

fn text<T>(result: &Result<T, CliError>, render: fn(&T) -> String) -> String {
    match result {
        Ok(summary) => render(summary),
        Err(e) => format!("unavailable ({})", e),
    }
}
