/// Fetch one page of swaps and print it ranked for the configured user.
///
/// Usage:
///   SWAP_TARGETING__USER_ID=... SWAP_TARGETING__ACTIVE_SWAP_ID=... cargo run --bin swap-targeting -- [search text]
///
/// With an active swap configured the page is browsed in targeting mode and
/// sorted by targetability; otherwise it is sorted newest first.
use anyhow::{Context, Result};
use chrono::Utc;
use swap_targeting::{
    models::TargetingActivity,
    services::{FetchOutcome, SortField},
    telemetry, BrowsePipeline, BrowseQuery, Config, ListingFeed, SearchDebouncer,
    SwapApiClient, TargetingContext,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    telemetry::init_tracing(&config);
    info!(api = %config.api_base_url, "Starting swap-targeting browse");

    let client = SwapApiClient::from_config(&config).context("Failed to create API client")?;

    let active = match config.active_swap_id {
        Some(swap_id) => Some(
            client
                .get_swap(swap_id)
                .await
                .with_context(|| format!("Failed to load active swap {}", swap_id))?,
        ),
        None => None,
    };

    let activity = match config.user_id {
        Some(user_id) => client
            .targeting_activity(user_id)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Targeting activity unavailable: {}", e.user_message());
                TargetingActivity::default()
            }),
        None => TargetingActivity::default(),
    };

    let feed = ListingFeed::new(client, config.page_size);
    match feed.load_next_page().await {
        Ok(FetchOutcome::Loaded(count)) => info!(count = count, "Loaded listings"),
        Ok(outcome) => info!(?outcome, "No listings loaded"),
        Err(e) => {
            warn!("{}", e.user_message());
            return Err(e).context("Failed to load listings");
        }
    }

    let search = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let search = SearchDebouncer::new(config.search_debounce())
        .debounce(search)
        .await
        .unwrap_or_default();

    let targeting_mode = active.is_some();
    let query = BrowseQuery {
        search,
        sort_by: if targeting_mode {
            SortField::Targetability
        } else {
            SortField::Created
        },
        targeting_mode,
        ..Default::default()
    };

    let ctx = TargetingContext::new(
        config.user_id,
        active.as_ref(),
        activity.current_target.as_ref(),
    );
    let (entries, stats) =
        BrowsePipeline::default().run(feed.snapshot().await, &query, &ctx, Utc::now());

    info!(
        shown = entries.len(),
        filtered_own = stats.filtered_own,
        filtered_by_search = stats.filtered_by_search,
        "Browse complete"
    );

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
