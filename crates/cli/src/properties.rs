use clap::{Args, Subcommand};
use summer_core::{stats, Criteria, Property, PropertyDraft, PropertySort};

use crate::pages::{self, parse_sort};
use crate::render::{self, print_json};
use crate::{CliError, Context, OutputFormat};

#[derive(Subcommand)]
pub(crate) enum PropertiesCommand {
    /// List property listings
    List {
        /// Case-insensitive text matched against address, city, state and type
        #[arg(long, default_value = "")]
        search: String,

        /// Sort order: listed, price or address
        #[arg(long, default_value = "listed", value_parser = parse_sort::<PropertySort>)]
        sort: PropertySort,

        /// Listing status (filtered by the server)
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        min_price: Option<f64>,

        #[arg(long)]
        max_price: Option<f64>,

        /// Property type (filtered by the server)
        #[arg(long = "type", value_name = "TYPE")]
        property_type: Option<String>,

        #[arg(long)]
        bedrooms: Option<i64>,

        #[arg(long)]
        bathrooms: Option<f64>,

        /// Print the headline figures after the list
        #[arg(long)]
        stats: bool,
    },

    /// Create a listing
    Create(PropertyFields),

    /// Edit an existing listing; omitted fields keep their current value
    Update {
        id: i64,

        #[command(flatten)]
        fields: PropertyFields,
    },

    /// Delete a listing after confirmation
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Args)]
pub(crate) struct PropertyFields {
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    city: Option<String>,
    /// Two-letter state code
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    zip_code: Option<String>,
    /// house, condo, townhouse, apartment, land, commercial or other
    #[arg(long = "type", value_name = "TYPE")]
    property_type: Option<String>,
    #[arg(long)]
    bedrooms: Option<String>,
    #[arg(long)]
    bathrooms: Option<String>,
    #[arg(long)]
    square_feet: Option<String>,
    #[arg(long = "price", value_name = "PRICE")]
    listing_price: Option<String>,
    /// active, pending, sold or withdrawn
    #[arg(long = "status", value_name = "STATUS")]
    listing_status: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

impl PropertyFields {
    fn apply(self, draft: &mut PropertyDraft) {
        let slots = [
            (self.address, &mut draft.address),
            (self.city, &mut draft.city),
            (self.state, &mut draft.state),
            (self.zip_code, &mut draft.zip_code),
            (self.property_type, &mut draft.property_type),
            (self.bedrooms, &mut draft.bedrooms),
            (self.bathrooms, &mut draft.bathrooms),
            (self.square_feet, &mut draft.square_feet),
            (self.listing_price, &mut draft.listing_price),
            (self.listing_status, &mut draft.listing_status),
            (self.description, &mut draft.description),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

pub(crate) async fn cmd_properties(
    ctx: &Context,
    command: PropertiesCommand,
) -> Result<(), CliError> {
    match command {
        PropertiesCommand::List {
            search,
            sort,
            status,
            min_price,
            max_price,
            property_type,
            bedrooms,
            bathrooms,
            stats,
        } => {
            let criteria = Criteria::new()
                .with_search(search)
                .with_sort(sort)
                .with_filter("status", status.unwrap_or_default())
                .with_filter("min_price", optional(min_price))
                .with_filter("max_price", optional(max_price))
                .with_filter("property_type", property_type.unwrap_or_default())
                .with_filter("bedrooms", optional(bedrooms))
                .with_filter("bathrooms", optional(bathrooms));
            list(ctx, criteria, stats).await
        }
        PropertiesCommand::Create(fields) => {
            pages::save::<Property>(ctx, None, |d| fields.apply(d)).await
        }
        PropertiesCommand::Update { id, fields } => {
            pages::save::<Property>(ctx, Some(id), |d| fields.apply(d)).await
        }
        PropertiesCommand::Delete { id, yes } => pages::delete::<Property>(ctx, id, yes).await,
    }
}

async fn list(
    ctx: &Context,
    criteria: Criteria<PropertySort>,
    show_stats: bool,
) -> Result<(), CliError> {
    let page = pages::load::<Property>(ctx, criteria, false).await?;
    let view = page.view();
    tracing::info!(count = view.len(), "properties loaded");

    let summary = stats::properties(&view);
    match ctx.output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "properties": view,
            "summary": summary,
        })),
        OutputFormat::Text => {
            if view.is_empty() {
                println!("No properties match.");
            }
            for property in &view {
                println!("{}", render::property_line(property));
            }
            if show_stats {
                println!();
                println!("{}", render::property_summary(&summary));
            }
        }
    }
    Ok(())
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
