//! Page templates and the view models they render.

use askama::Template;
use axum::response::Html;

use nightleech_core::format::{format_eta, format_size, format_speed};
use nightleech_core::{TorrentState, TransferInfo, TransferStats};

use crate::error::DashboardError;
use crate::files::{encode_path, Crumb, Entry};

pub fn render<T: Template>(template: &T) -> Result<Html<String>, DashboardError> {
    Ok(Html(template.render()?))
}

#[derive(Template)]
#[template(path = "transfers.html")]
pub struct TransfersTemplate {
    pub refresh_secs: u32,
    pub stats: TransferStats,
    pub total_size: String,
    pub transfers: Vec<TransferView>,
}

#[derive(Template)]
#[template(path = "client_error.html")]
pub struct ClientErrorTemplate {
    pub refresh_secs: u32,
    pub message: String,
}

#[derive(Template)]
#[template(path = "files.html")]
pub struct FilesTemplate {
    pub crumbs: Vec<Crumb>,
    /// Counters from the download client, when it answered.
    pub stats: Option<TransferStats>,
    pub entries: Vec<EntryView>,
}

pub struct TransferView {
    pub name: String,
    pub icon: &'static str,
    pub state: &'static str,
    /// Whole percent, for the bar width.
    pub percent: u32,
    pub progress: String,
    pub size: String,
    pub downloaded: String,
    /// Speeds while active, the state label otherwise.
    pub activity: String,
    pub eta: String,
    pub peers: String,
    pub category: String,
}

impl From<&TransferInfo> for TransferView {
    fn from(t: &TransferInfo) -> Self {
        let activity = match t.state {
            TorrentState::Downloading | TorrentState::Seeding => format!(
                "⬇️ {} ⬆️ {}",
                format_speed(t.download_speed),
                format_speed(t.upload_speed)
            ),
            other => other.as_str().to_string(),
        };

        Self {
            name: t.name.clone(),
            icon: if t.is_complete() { "✅" } else { t.state.icon() },
            state: t.state.as_str(),
            percent: (t.progress.clamp(0.0, 1.0) * 100.0).round() as u32,
            progress: format!("{:.1}%", t.progress * 100.0),
            size: format_size(t.size_bytes),
            downloaded: format_size(t.downloaded_bytes),
            activity,
            eta: t.eta_secs.map(format_eta).unwrap_or_else(|| "∞".to_string()),
            peers: format!("{} / {}", t.seeders, t.leechers),
            category: t.category.clone().unwrap_or_default(),
        }
    }
}

pub struct EntryView {
    pub name: String,
    pub icon: &'static str,
    pub is_dir: bool,
    pub size: String,
    /// Browse link for directories, download link for files.
    pub href: String,
}

impl From<&Entry> for EntryView {
    fn from(e: &Entry) -> Self {
        let href = if e.is_dir {
            format!("/files?path={}", urlencoding::encode(&e.path))
        } else {
            format!("/download/{}", encode_path(&e.path))
        };
        Self {
            name: e.name.clone(),
            icon: e.icon(),
            is_dir: e.is_dir,
            size: if e.is_dir {
                String::new()
            } else {
                format_size(e.size_bytes)
            },
            href,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nightleech_core::testing::fixtures;

    #[test]
    fn test_transfer_view() {
        let mut t = fixtures::transfer("abc", "Show", TorrentState::Downloading);
        t.download_speed = 2048;
        t.eta_secs = Some(90);
        t.category = Some("tv".to_string());

        let view = TransferView::from(&t);
        assert_eq!(view.percent, 50);
        assert_eq!(view.progress, "50.0%");
        assert!(view.activity.contains("2.0 KB/s"));
        assert_eq!(view.category, "tv");
        assert_ne!(view.eta, "∞");

        t.state = TorrentState::Paused;
        t.eta_secs = None;
        let paused = TransferView::from(&t);
        assert_eq!(paused.activity, "paused");
        assert_eq!(paused.eta, "∞");
    }

    #[test]
    fn test_entry_links() {
        let dir = Entry {
            name: "Season 1".into(),
            path: "Show/Season 1".into(),
            is_dir: true,
            size_bytes: 0,
        };
        assert_eq!(
            EntryView::from(&dir).href,
            "/files?path=Show%2FSeason%201"
        );

        let file = Entry {
            name: "ep 1.mkv".into(),
            path: "Show/ep 1.mkv".into(),
            is_dir: false,
            size_bytes: 1536,
        };
        let view = EntryView::from(&file);
        assert_eq!(view.href, "/download/Show/ep%201.mkv");
        assert_eq!(view.size, "1.5 KB");
        assert_eq!(view.icon, "🎬");
    }
}
