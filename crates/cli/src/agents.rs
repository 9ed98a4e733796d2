use clap::Args;
use summer_core::{derive_view, sample, stats, Agent, AgentSort, Criteria, EnrichmentPayload};

use crate::pages::{self, parse_sort};
use crate::render::{self, print_json};
use crate::{CliError, Context, OutputFormat};

#[derive(Args)]
pub(crate) struct AgentsArgs {
    /// Use the built-in roster instead of the API
    #[arg(long)]
    sample: bool,

    /// Case-insensitive text matched against name and specialty
    #[arg(long, default_value = "")]
    search: String,

    /// Sort order: rating, name, leads or deals
    #[arg(long, default_value = "rating", value_parser = parse_sort::<AgentSort>)]
    sort: AgentSort,

    /// Only agents with exactly this specialty
    #[arg(long)]
    specialty: Option<String>,

    /// Only agents rated at or above this value
    #[arg(long, value_name = "RATING")]
    min_rating: Option<f64>,

    /// Print the headline figures after the roster
    #[arg(long)]
    stats: bool,
}

pub(crate) async fn cmd_agents(ctx: &Context, args: AgentsArgs) -> Result<(), CliError> {
    let mut criteria = Criteria::new()
        .with_search(args.search)
        .with_sort(args.sort);
    if let Some(specialty) = args.specialty {
        criteria.set_filter("specialty", specialty);
    }
    if let Some(min) = args.min_rating {
        criteria.set_filter("min_rating", min.to_string());
    }

    let (view, insights) = if args.sample {
        (derive_view(&sample::agents(), &criteria), EnrichmentPayload::default())
    } else {
        let page = pages::load::<Agent>(ctx, criteria, true).await?;
        (page.view(), page.insights())
    };
    tracing::info!(count = view.len(), sample = args.sample, "agents loaded");

    let summary = stats::agents(&view);
    match ctx.output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "agents": view,
            "summary": summary,
            "insights": insights,
        })),
        OutputFormat::Text => {
            if let Some(quote) = &insights.quote {
                println!("\"{}\"", quote);
                println!();
            }
            if view.is_empty() {
                println!("No agents match.");
            }
            for agent in &view {
                println!("{}", render::agent_line(agent));
            }
            if args.stats {
                println!();
                println!("{}", render::agent_summary(&summary));
            }
        }
    }
    Ok(())
}
