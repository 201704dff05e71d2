//! What the bot does for each command and button, independent of how the
//! resulting screen is sent.

use nightleech_core::{
    aggregate, Conversation, Item, SearchQuery, SortMode, TransferStats, Transition,
    TransitionOutcome,
};
use tracing::{debug, info, warn};

use crate::render::{self, Screen};
use crate::state::BotState;

/// Transfers listed on the downloads screen.
pub const DOWNLOADS_LIMIT: usize = 10;

/// Result of a search request.
#[derive(Debug)]
pub enum SearchReply {
    Ready(Screen),
    /// A newer search in the same chat started meanwhile.
    Superseded,
}

pub async fn search(state: &BotState, chat_id: i64, query: &str) -> SearchReply {
    let generation = state.sessions.begin_search(chat_id).await;
    info!(chat_id = chat_id, query = query, "Search started");

    let outcome = match state.searcher.search(&SearchQuery::new(query)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(chat_id = chat_id, error = %e, "Search failed");
            return SearchReply::Ready(render::search_failed(&e.to_string()));
        }
    };

    let mut failed: Vec<String> = outcome.indexer_errors.keys().cloned().collect();
    failed.sort();

    let conversation = Conversation::new(query, aggregate(outcome.raw, SortMode::default()));
    let view = conversation.view(&state.config.navigation);
    let labels = state.indexer_labels().await;

    let mut screen = render::view(query, &view, &labels);
    screen
        .text
        .push_str(&render::indexer_failures(&failed, &labels));

    info!(
        chat_id = chat_id,
        results = conversation.results.len(),
        failed_indexers = failed.len(),
        duration_ms = outcome.duration_ms,
        "Search finished"
    );

    if !state
        .sessions
        .complete_search(chat_id, generation, conversation)
        .await
    {
        return SearchReply::Superseded;
    }
    SearchReply::Ready(screen)
}

/// Apply a navigation button to the chat's conversation.
pub async fn navigate(state: &BotState, chat_id: i64, transition: Transition) -> Screen {
    let config = state.config.navigation;
    let applied = state
        .sessions
        .with_conversation(chat_id, |conversation| {
            let outcome = conversation.apply(&transition);
            let view = conversation.view(&config);
            (outcome, conversation.query.clone(), view)
        })
        .await;

    let Some((outcome, query, view)) = applied else {
        debug!(chat_id = chat_id, payload = %transition, "No conversation for button");
        return match transition {
            Transition::Back => render::main_menu(None),
            _ => render::expired(),
        };
    };

    match outcome {
        TransitionOutcome::Render => {
            let labels = state.indexer_labels().await;
            render::view(&query, &view, &labels)
        }
        TransitionOutcome::Reset => {
            state.sessions.clear(chat_id).await;
            render::main_menu(None)
        }
        TransitionOutcome::Stale => {
            debug!(chat_id = chat_id, payload = %transition, "Stale button");
            render::not_found()
        }
        TransitionOutcome::Download(item) => add(state, &item).await,
    }
}

/// Hand an item to the download client.
pub async fn add(state: &BotState, item: &Item) -> Screen {
    let locator = match item.locator() {
        Ok(locator) => locator,
        Err(e) => {
            warn!(title = item.title(), error = %e, "Result has no usable link");
            return render::invalid_locator(&e);
        }
    };

    match state.client.add(&locator).await {
        Ok(result) => {
            info!(
                title = item.title(),
                hash = result.hash.as_deref().unwrap_or("-"),
                magnet = locator.is_magnet(),
                "Added to download client"
            );
            render::added(item)
        }
        Err(e) => {
            warn!(title = item.title(), error = %e, "Download client refused item");
            render::client_error(&e)
        }
    }
}

pub async fn downloads(state: &BotState) -> Screen {
    match state.client.list_transfers().await {
        Ok(transfers) => render::downloads(&transfers, DOWNLOADS_LIMIT),
        Err(e) => {
            warn!(error = %e, "Listing transfers failed");
            render::client_error(&e)
        }
    }
}

pub async fn transfer_detail(state: &BotState, hash: &str) -> Screen {
    let transfer = match state.client.get_transfer(hash).await {
        Ok(transfer) => transfer,
        Err(e) => return render::client_error(&e),
    };

    // A missing file list only costs the link.
    let files = if transfer.is_complete() {
        state.client.list_files(hash).await.unwrap_or_else(|e| {
            debug!(hash = hash, error = %e, "File list unavailable");
            Vec::new()
        })
    } else {
        Vec::new()
    };

    render::transfer_detail(&transfer, &files, state.public_url())
}

pub async fn delete(state: &BotState, hash: &str) -> Screen {
    match state.client.delete(hash, true).await {
        Ok(()) => {
            info!(hash = hash, "Transfer deleted");
            render::deleted()
        }
        Err(e) => {
            warn!(hash = hash, error = %e, "Delete failed");
            render::client_error(&e)
        }
    }
}

pub async fn status(state: &BotState) -> Screen {
    match state.client.list_transfers().await {
        Ok(transfers) => render::status(&TransferStats::from(transfers.as_slice())),
        Err(e) => render::client_error(&e),
    }
}
