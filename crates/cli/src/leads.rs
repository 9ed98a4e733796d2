use clap::{Args, Subcommand};
use summer_core::{stats, Criteria, Lead, LeadDraft, LeadSort};

use crate::pages::{self, parse_sort};
use crate::render::{self, print_json};
use crate::{CliError, Context, OutputFormat};

#[derive(Subcommand)]
pub(crate) enum LeadsCommand {
    /// List leads
    List {
        /// Case-insensitive text matched against name, email and source
        #[arg(long, default_value = "")]
        search: String,

        /// Sort order: received, name or budget
        #[arg(long, default_value = "received", value_parser = parse_sort::<LeadSort>)]
        sort: LeadSort,

        /// Only leads with this status (filtered by the server)
        #[arg(long)]
        status: Option<String>,

        /// Minimum budget (filtered by the server)
        #[arg(long)]
        budget_min: Option<i64>,

        /// Maximum budget (filtered by the server)
        #[arg(long)]
        budget_max: Option<i64>,

        /// Print the headline figures after the list
        #[arg(long)]
        stats: bool,
    },

    /// Create a lead
    Create(LeadFields),

    /// Edit an existing lead; omitted fields keep their current value
    Update {
        id: i64,

        #[command(flatten)]
        fields: LeadFields,
    },

    /// Delete a lead after confirmation
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Form fields. Values are passed through as typed; the form validates
/// them on submit.
#[derive(Args)]
pub(crate) struct LeadFields {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    /// website, referral, social_media, advertisement, cold_call or other
    #[arg(long)]
    source: Option<String>,
    /// new, contacted, qualified, converted or lost
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    budget_min: Option<String>,
    #[arg(long)]
    budget_max: Option<String>,
}

impl LeadFields {
    fn apply(self, draft: &mut LeadDraft) {
        let slots = [
            (self.first_name, &mut draft.first_name),
            (self.last_name, &mut draft.last_name),
            (self.email, &mut draft.email),
            (self.phone, &mut draft.phone),
            (self.source, &mut draft.lead_source),
            (self.status, &mut draft.lead_status),
            (self.budget_min, &mut draft.budget_min),
            (self.budget_max, &mut draft.budget_max),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

pub(crate) async fn cmd_leads(ctx: &Context, command: LeadsCommand) -> Result<(), CliError> {
    match command {
        LeadsCommand::List {
            search,
            sort,
            status,
            budget_min,
            budget_max,
            stats,
        } => {
            let criteria = Criteria::new()
                .with_search(search)
                .with_sort(sort)
                .with_filter("status", status.unwrap_or_default())
                .with_filter("budget_min", optional(budget_min))
                .with_filter("budget_max", optional(budget_max));
            list(ctx, criteria, stats).await
        }
        LeadsCommand::Create(fields) => pages::save::<Lead>(ctx, None, |d| fields.apply(d)).await,
        LeadsCommand::Update { id, fields } => {
            pages::save::<Lead>(ctx, Some(id), |d| fields.apply(d)).await
        }
        LeadsCommand::Delete { id, yes } => pages::delete::<Lead>(ctx, id, yes).await,
    }
}

async fn list(ctx: &Context, criteria: Criteria<LeadSort>, show_stats: bool) -> Result<(), CliError> {
    let page = pages::load::<Lead>(ctx, criteria, false).await?;
    let view = page.view();
    tracing::info!(count = view.len(), "leads loaded");

    let summary = stats::leads(&view, stats::today_utc());
    match ctx.output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "leads": view,
            "summary": summary,
        })),
        OutputFormat::Text => {
            if view.is_empty() {
                println!("No leads match.");
            }
            for lead in &view {
                println!("{}", render::lead_line(lead));
            }
            if show_stats {
                println!();
                println!("{}", render::lead_summary(&summary));
            }
        }
    }
    Ok(())
}

fn optional(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
