//! Chat rendering.
//!
//! Every function here is pure: it turns core data into HTML text plus an
//! inline keyboard. Sending is left to the handlers.

use std::collections::HashMap;

use nightleech_core::format::{format_size, progress_bar, truncate};
use nightleech_core::{
    EpisodeTag, Item, LocatorError, PageInfo, Row, SortMode, TorrentClientError, Transition,
    TransferFile, TransferInfo, TransferStats, ViewDescriptor, ViewKind,
};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::html::escape;

use crate::callbacks::Callback;

const TITLE_CHARS: usize = 55;
const BUTTON_NAME_CHARS: usize = 20;
/// Telegram rejects longer message texts.
const MAX_MESSAGE_CHARS: usize = 4096;

/// A message body and its buttons.
#[derive(Debug, Clone)]
pub struct Screen {
    pub text: String,
    pub keyboard: InlineKeyboardMarkup,
}

impl Screen {
    fn new(text: impl Into<String>, rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self {
            text: fit(text.into()),
            keyboard: InlineKeyboardMarkup::new(rows),
        }
    }

    fn with_menu(text: impl Into<String>) -> Self {
        Self::new(text, menu_rows())
    }
}

/// Drop whole lines from the end until the text fits in one message.
/// Lines never split an HTML tag pair, so the result stays valid markup.
fn fit(text: String) -> String {
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        return text;
    }
    let mut out = String::new();
    let mut used = 0;
    for line in text.lines() {
        let len = line.chars().count() + 1;
        if used + len > MAX_MESSAGE_CHARS - 1 {
            break;
        }
        out.push_str(line);
        out.push('\n');
        used += len;
    }
    out.push('…');
    out
}

fn button(text: impl Into<String>, callback: impl ToString) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text.into(), callback.to_string())
}

fn menu_rows() -> Vec<Vec<InlineKeyboardButton>> {
    vec![
        vec![button("📥 Downloads", Callback::Downloads)],
        vec![button("⚙️ Status", Callback::Status)],
    ]
}

fn back_row() -> Vec<InlineKeyboardButton> {
    vec![button("◀️ Back", Transition::Back)]
}

pub fn main_menu(bot_username: Option<&str>) -> Screen {
    let inline_hint = match bot_username {
        Some(name) => format!("\n💡 Or type <code>@{} name</code> in any chat.", escape(name)),
        None => String::new(),
    };
    Screen::with_menu(format!(
        "🌙 <b>Night Leech</b>\n\n🔍 Send a title or use <code>/search name</code> to search.{}",
        inline_hint
    ))
}

pub fn help() -> Screen {
    Screen::with_menu(
        "🌙 <b>Night Leech</b>\n\n\
         /search <i>name</i> - search all indexers\n\
         /imdb <i>name</i> - same as /search\n\
         /downloads - active transfers\n\
         /status - download client totals\n\n\
         Plain text is treated as a search.",
    )
}

pub fn searching(query: &str) -> String {
    format!("🔍 Searching: <b>{}</b>…", escape(query))
}

pub fn not_allowed() -> String {
    "⛔ You are not allowed to use this bot.".to_string()
}

pub fn search_failed(reason: &str) -> Screen {
    Screen::with_menu(format!("❌ Search failed: {}", escape(reason)))
}

pub fn no_results(query: &str) -> Screen {
    Screen::with_menu(format!("❌ No results found for <b>{}</b>.", escape(query)))
}

/// Appended to a result screen when some indexers did not answer.
pub fn indexer_failures(failed: &[String], labels: &HashMap<String, String>) -> String {
    if failed.is_empty() {
        return String::new();
    }
    let names: Vec<String> = failed.iter().map(|id| escape(label(labels, id))).collect();
    format!("\n⚠️ No answer from: {}", names.join(", "))
}

/// Shown when a button points at results that no longer exist.
pub fn not_found() -> Screen {
    Screen::new(
        "⚠️ That selection is no longer available.",
        vec![vec![button("🏠 Menu", Transition::Back)]],
    )
}

pub fn expired() -> Screen {
    Screen::with_menu("⌛ This search has expired. Send a new one.")
}

fn label<'a>(labels: &'a HashMap<String, String>, id: &'a str) -> &'a str {
    labels.get(id).map(String::as_str).unwrap_or(id)
}

fn episode_tag(item: &Item) -> String {
    match item.parsed.episode_tags.first() {
        Some(EpisodeTag::Pack) => "📦 Pack".to_string(),
        Some(EpisodeTag::Number(n)) => format!("E{:02}", n),
        None => "🎬".to_string(),
    }
}

fn item_line(number: usize, item: &Item, labels: &HashMap<String, String>) -> String {
    format!(
        "<b>{}.</b> {} {} | 📦{} | 👤{}\n   {}\n",
        number,
        escape(label(labels, &item.raw.indexer)),
        item.parsed.quality.label(),
        format_size(item.raw.size_bytes),
        item.raw.seeders,
        escape(&truncate(item.title(), TITLE_CHARS))
    )
}

fn item_button(item: &Item, episodes: bool, transition: Transition) -> InlineKeyboardButton {
    let lead = if episodes {
        episode_tag(item)
    } else {
        item.parsed.quality.label().to_string()
    };
    button(
        format!(
            "{} {} 👤{}",
            lead,
            format_size(item.raw.size_bytes),
            item.raw.seeders
        ),
        transition,
    )
}

fn page_row(page: &PageInfo, to: fn(usize) -> Transition) -> Vec<InlineKeyboardButton> {
    let mut row = Vec::new();
    if page.has_prev() {
        row.push(button("◀️", to(page.index - 1)));
    }
    row.push(button(
        format!("{}/{}", page.index + 1, page.total_pages),
        Callback::Noop,
    ));
    if page.has_next() {
        row.push(button("▶️", to(page.index + 1)));
    }
    row
}

/// Rows of item buttons, paired with the download transition for each.
fn item_rows(
    view: &ViewDescriptor,
    episodes: bool,
) -> (Vec<(usize, &Item)>, Vec<Vec<InlineKeyboardButton>>) {
    let mut items = Vec::new();
    let mut rows = Vec::new();
    let downloads = view
        .transitions
        .iter()
        .filter(|t| matches!(t, Transition::Download { .. }));

    for (row, transition) in view.rows.iter().zip(downloads) {
        if let Row::Item { index, item } = row {
            items.push((*index, item));
            rows.push(vec![item_button(item, episodes, transition.clone())]);
        }
    }
    (items, rows)
}

/// Render a navigation view.
pub fn view(query: &str, view: &ViewDescriptor, labels: &HashMap<String, String>) -> Screen {
    match &view.kind {
        ViewKind::NotFound => not_found(),
        ViewKind::Seasons | ViewKind::Flat { .. } if view.is_empty() => no_results(query),
        ViewKind::Seasons => seasons(query, view),
        ViewKind::Qualities { season } => qualities(query, *season, view),
        ViewKind::Episodes { season, quality } => {
            episodes(query, *season, quality.label(), view, labels)
        }
        ViewKind::Flat {
            sort,
            indexer,
            indexers,
        } => flat(query, *sort, indexer.as_deref(), indexers, view, labels),
    }
}

fn seasons(query: &str, view: &ViewDescriptor) -> Screen {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = view
        .rows
        .iter()
        .filter_map(|row| match row {
            Row::Season {
                season,
                label,
                items,
            } => Some(vec![button(
                format!("📺 Season {} · {} ({})", season, label, items),
                Transition::Season(*season),
            )]),
            _ => None,
        })
        .collect();

    if view.transitions.contains(&Transition::AllRaw) {
        rows.push(vec![button("📋 All results", Transition::AllRaw)]);
    }
    rows.push(back_row());

    Screen::new(
        format!(
            "🔍 <b>{}</b>\n\n📺 {} season(s) found. Pick one:",
            escape(query),
            view.rows.len()
        ),
        rows,
    )
}

fn qualities(query: &str, season: u32, view: &ViewDescriptor) -> Screen {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = view
        .rows
        .iter()
        .filter_map(|row| match row {
            Row::Quality { quality, items } => Some(vec![button(
                format!("🎞️ {} ({})", quality.label(), items),
                Transition::Quality(*quality),
            )]),
            _ => None,
        })
        .collect();

    rows.push(vec![
        button("◀️ Seasons", Transition::BackSeasons),
        button("📋 All results", Transition::AllRaw),
    ]);
    rows.push(back_row());

    Screen::new(
        format!(
            "🔍 <b>{}</b>\n\n📺 Season {}: pick a quality",
            escape(query),
            season
        ),
        rows,
    )
}

fn episodes(
    query: &str,
    season: u32,
    quality: &str,
    view: &ViewDescriptor,
    labels: &HashMap<String, String>,
) -> Screen {
    let (items, mut rows) = item_rows(view, true);

    let mut text = format!(
        "🔍 <b>{}</b>\n📺 Season {} · {}\n\n",
        escape(query),
        season,
        quality
    );
    for (n, (_, item)) in items.iter().enumerate() {
        let offset = view.page.map(|p| p.index * p.page_size).unwrap_or(0);
        text.push_str(&item_line(offset + n + 1, item, labels));
    }

    if let Some(page) = &view.page {
        if page.total_pages > 1 {
            rows.push(page_row(page, Transition::EpisodePage));
        }
    }
    rows.push(vec![
        button("◀️ Qualities", Transition::BackQuality),
        button("◀️ Seasons", Transition::BackSeasons),
    ]);
    rows.push(back_row());

    Screen::new(text, rows)
}

fn flat(
    query: &str,
    sort: SortMode,
    current: Option<&str>,
    indexers: &[String],
    view: &ViewDescriptor,
    labels: &HashMap<String, String>,
) -> Screen {
    let (items, mut rows) = item_rows(view, false);

    let mut text = format!("🔍 <b>{}</b>\n\n", escape(query));
    if let Some(page) = &view.page {
        text.push_str(&format!(
            "📊 <b>{}</b> results | {} | Page {}/{}\n",
            page.total_items,
            sort_label(sort),
            page.index + 1,
            page.total_pages
        ));
    }
    if let Some(id) = current {
        text.push_str(&format!("🔎 Only {}\n", escape(label(labels, id))));
    }
    text.push('\n');

    let offset = view.page.map(|p| p.index * p.page_size).unwrap_or(0);
    for (n, (_, item)) in items.iter().enumerate() {
        text.push_str(&item_line(offset + n + 1, item, labels));
    }

    if let Some(page) = &view.page {
        rows.push(page_row(page, Transition::Page));
    }

    rows.push(
        [SortMode::SeedersDesc, SortMode::NewestDesc]
            .into_iter()
            .map(|mode| {
                let marker = if mode == sort { "✅ " } else { "" };
                button(
                    format!("{}{}", marker, sort_label(mode)),
                    Transition::Sort(mode),
                )
            })
            .collect(),
    );

    for id in indexers {
        let marker = if Some(id.as_str()) == current { "✅" } else { "🌐" };
        rows.push(vec![button(
            format!("{} {}", marker, label(labels, id)),
            Transition::Indexer(id.clone()),
        )]);
    }
    if view.transitions.contains(&Transition::IndexerAll) {
        rows.push(vec![button("🔄 All indexers", Transition::IndexerAll)]);
    }
    if view.transitions.contains(&Transition::BackSeasons) {
        rows.push(vec![button("📺 Seasons", Transition::BackSeasons)]);
    }
    rows.push(back_row());

    Screen::new(text, rows)
}

fn sort_label(sort: SortMode) -> &'static str {
    match sort {
        SortMode::SeedersDesc => "👤 Top seeders",
        SortMode::NewestDesc => "🆕 Newest",
    }
}

pub fn added(item: &Item) -> Screen {
    Screen::with_menu(format!(
        "✅ Added!\n\n🎬 {}\n📦 {}\n👤 {} seeders",
        escape(&truncate(item.title(), TITLE_CHARS)),
        format_size(item.raw.size_bytes),
        item.raw.seeders
    ))
}

pub fn invalid_locator(error: &LocatorError) -> Screen {
    let text = match error {
        LocatorError::Missing => "❌ This result has no valid download link.",
        LocatorError::Unsupported(_) => "❌ This result's download link is not supported.",
    };
    Screen::with_menu(text)
}

/// Download-client failures, telling "unreachable" apart from the rest.
pub fn client_error(error: &TorrentClientError) -> Screen {
    let text = if error.is_unreachable() {
        "❌ Download client unreachable. Try again later.".to_string()
    } else {
        match error {
            TorrentClientError::Rejected(_) => {
                "❌ The download client rejected this torrent.".to_string()
            }
            TorrentClientError::TorrentNotFound(_) => "❌ Transfer not found.".to_string(),
            other => format!("❌ Download client error: {}", escape(&other.to_string())),
        }
    };
    Screen::with_menu(text)
}

/// Up to `limit` transfers as buttons.
pub fn downloads(transfers: &[TransferInfo], limit: usize) -> Screen {
    if transfers.is_empty() {
        return Screen::with_menu("📥 No downloads.");
    }

    let mut rows: Vec<Vec<InlineKeyboardButton>> = transfers
        .iter()
        .take(limit)
        .map(|t| {
            let done = if t.is_complete() { "✅" } else { t.state.icon() };
            vec![button(
                format!(
                    "{} {} {} {:.0}%",
                    done,
                    truncate(&t.name, BUTTON_NAME_CHARS),
                    progress_bar(t.progress, 10),
                    t.progress * 100.0
                ),
                Callback::Transfer(t.hash.clone()),
            )]
        })
        .collect();
    rows.push(vec![button("🔄 Refresh", Callback::Downloads)]);
    rows.push(vec![button("◀️ Back", Callback::Menu)]);

    Screen::new(format!("📥 Downloads ({}):", transfers.len()), rows)
}

/// Detail of one transfer. `link_base` is the dashboard's public URL.
pub fn transfer_detail(
    transfer: &TransferInfo,
    files: &[TransferFile],
    link_base: Option<&str>,
) -> Screen {
    let mut text = format!(
        "🎬 {}\n\n📊 {} {:.1}%\n📦 {} / {}\n🔰 {}",
        escape(&truncate(&transfer.name, 50)),
        progress_bar(transfer.progress, 10),
        transfer.progress * 100.0,
        format_size(transfer.downloaded_bytes),
        format_size(transfer.size_bytes),
        transfer.state.as_str()
    );

    if transfer.is_complete() {
        if let (Some(base), Some(file)) = (link_base, files.first()) {
            text.push_str(&format!(
                "\n\n🔗 {}",
                escape(&download_link(base, &file.name))
            ));
        }
    }

    Screen::new(
        text,
        vec![
            vec![button("🗑️ Delete", Callback::Delete(transfer.hash.clone()))],
            vec![button("◀️ Back", Callback::Downloads)],
        ],
    )
}

/// `{base}/download/{path}` with each path segment percent-encoded.
pub fn download_link(base: &str, path: &str) -> String {
    let encoded: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect();
    format!("{}/download/{}", base.trim_end_matches('/'), encoded.join("/"))
}

pub fn deleted() -> Screen {
    Screen::with_menu("✅ Deleted!")
}

pub fn status(stats: &TransferStats) -> Screen {
    Screen::with_menu(format!(
        "⚙️ <b>Status</b>\n\n✅ Bot: Online\n📥 Torrents: {}\n⬇️ Downloading: {}\n⬆️ Seeding: {}\n💾 Total: {}",
        stats.total,
        stats.downloading,
        stats.seeding,
        format_size(stats.total_size_bytes)
    ))
}
