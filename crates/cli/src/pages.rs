//! Flows shared by every page command: load, save through the form, delete.

use std::sync::Arc;

use summer_controller::{HostPrompt, LoadState, RemoveOutcome, SubmitOutcome, ViewStateController};
use summer_core::{Criteria, Resource, SortKey};
use summer_remote::CollectionClient;

use crate::prompt::TerminalPrompt;
use crate::render::print_json;
use crate::{CliError, Context, OutputFormat};

/// Builds a controller for `R`. Enrichment is fetched alongside loads only
/// when `with_insights` is set.
pub(crate) fn controller<R: Resource>(
    ctx: &Context,
    prompt: Arc<dyn HostPrompt>,
    with_insights: bool,
) -> ViewStateController<R> {
    let transport = ctx.transport();
    if with_insights {
        ViewStateController::from_config(&ctx.config, transport, prompt)
    } else {
        ViewStateController::new(CollectionClient::new(transport, &ctx.config.api_base), prompt)
    }
}

/// clap value parser for a resource's sort key.
pub(crate) fn parse_sort<K: SortKey>(value: &str) -> Result<K, String> {
    K::parse(value).ok_or_else(|| {
        let known: Vec<_> = K::all().iter().map(|k| k.as_str()).collect();
        format!("unknown sort key '{}' (expected one of: {})", value, known.join(", "))
    })
}

fn prompt(ctx: &Context, assume_yes: bool) -> Arc<dyn HostPrompt> {
    Arc::new(TerminalPrompt::new(assume_yes, ctx.output, ctx.quiet))
}

/// Loads `R` under `criteria`, failing when the page ends up in error.
pub(crate) async fn load<R: Resource>(
    ctx: &Context,
    criteria: Criteria<R::SortKey>,
    with_insights: bool,
) -> Result<ViewStateController<R>, CliError> {
    let page = controller::<R>(ctx, prompt(ctx, false), with_insights);
    page.load_with(criteria).await;
    match page.load_state() {
        LoadState::Error(e) => Err(e.into()),
        _ => Ok(page),
    }
}

/// Opens the create form (`id == None`) or the edit form for `id`, applies
/// `fill` to the draft and submits it.
pub(crate) async fn save<R: Resource>(
    ctx: &Context,
    id: Option<i64>,
    fill: impl FnOnce(&mut R::Draft),
) -> Result<(), CliError> {
    let page = match id {
        None => {
            let page = controller::<R>(ctx, prompt(ctx, false), false);
            page.open_create();
            page
        }
        Some(id) => {
            let page = load::<R>(ctx, Criteria::new(), false).await?;
            if !page.open_edit(id) {
                return Err(not_found::<R>(id));
            }
            page
        }
    };
    page.update_draft(fill);

    let verb = if id.is_some() { "Updated" } else { "Created" };
    match page.submit().await {
        SubmitOutcome::Saved(echo) => {
            match ctx.output {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "saved": true,
                    "record": echo,
                })),
                OutputFormat::Text => match echo {
                    Some(record) => {
                        println!("{} {} #{}: {}", verb, R::SINGULAR, record.id(), record.label())
                    }
                    None => println!("{} {}", verb, R::SINGULAR),
                },
            }
            Ok(())
        }
        SubmitOutcome::Invalid(e) | SubmitOutcome::Failed(e) => Err(e.into()),
        SubmitOutcome::Busy => Err(CliError::Usage(format!(
            "a {} is already being saved",
            R::SINGULAR
        ))),
        SubmitOutcome::NoForm | SubmitOutcome::Disposed => Err(CliError::Usage(format!(
            "the {} form is not open",
            R::SINGULAR
        ))),
    }
}

/// Confirms and deletes `id`. The record must be on the loaded page.
pub(crate) async fn delete<R: Resource>(
    ctx: &Context,
    id: i64,
    assume_yes: bool,
) -> Result<(), CliError> {
    let page = controller::<R>(ctx, prompt(ctx, assume_yes), false);
    page.load().await;
    if let LoadState::Error(e) = page.load_state() {
        return Err(e.into());
    }

    match page.remove(id).await {
        RemoveOutcome::Removed => {
            match ctx.output {
                OutputFormat::Json => print_json(&serde_json::json!({ "deleted": id })),
                OutputFormat::Text => println!("Deleted {} #{}", R::SINGULAR, id),
            }
            Ok(())
        }
        RemoveOutcome::Cancelled => Err(CliError::Aborted),
        RemoveOutcome::Failed(e) => Err(CliError::Alerted(e.message().to_string())),
        RemoveOutcome::NotFound => Err(not_found::<R>(id)),
        RemoveOutcome::Busy | RemoveOutcome::Disposed => Err(CliError::Usage(format!(
            "the {} page is busy",
            R::COLLECTION
        ))),
    }
}

fn not_found<R: Resource>(id: i64) -> CliError {
    CliError::Usage(format!("no {} with id {}", R::SINGULAR, id))
}
