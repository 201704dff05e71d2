//! Download directory access.
//!
//! Paths from requests are relative to the files root. They are resolved
//! to canonical paths and refused unless they stay under the root, which
//! also catches symlinks pointing elsewhere.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::DashboardError;

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    /// Path relative to the root, `/`-separated.
    pub path: String,
    pub is_dir: bool,
    pub size_bytes: u64,
}

impl Entry {
    pub fn icon(&self) -> &'static str {
        if self.is_dir {
            "📁"
        } else {
            icon_for(&self.name)
        }
    }
}

/// A link in the path trail above a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub name: String,
    pub path: String,
}

pub fn icon_for(name: &str) -> &'static str {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return "📄",
    };
    match ext.as_str() {
        "mkv" | "mp4" | "avi" | "mov" | "webm" | "m4v" => "🎬",
        "mp3" | "flac" | "wav" | "ogg" | "m4a" => "🎵",
        "jpg" | "jpeg" | "png" | "gif" | "webp" => "🖼️",
        "zip" | "rar" | "7z" | "tar" | "gz" => "📦",
        "srt" | "sub" | "ass" | "vtt" => "📝",
        _ => "📄",
    }
}

/// Resolve a request path under `root` (which must be canonical).
pub async fn resolve(root: &Path, relative: &str) -> Result<PathBuf, DashboardError> {
    let relative = relative.trim_start_matches('/');
    let candidate = if relative.is_empty() {
        root.to_path_buf()
    } else {
        root.join(relative)
    };

    let canonical = match tokio::fs::canonicalize(&candidate).await {
        Ok(path) => path,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if Path::new(relative)
                .components()
                .any(|c| matches!(c, Component::ParentDir))
            {
                return Err(DashboardError::Forbidden);
            }
            return Err(DashboardError::NotFound(relative.to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    if !canonical.starts_with(root) {
        return Err(DashboardError::Forbidden);
    }
    Ok(canonical)
}

/// Path of `path` relative to `root`, `/`-separated. Empty for the root.
pub fn relative_to(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .map(|rel| {
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}

/// Entries of `dir`: directories first, then by case-insensitive name.
pub async fn list_dir(root: &Path, dir: &Path) -> Result<Vec<Entry>, DashboardError> {
    let mut entries = Vec::new();
    let mut read = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = read.next_entry().await? {
        let path = entry.path();
        // Follows symlinks; dangling links are skipped.
        let Ok(meta) = tokio::fs::metadata(&path).await else {
            continue;
        };
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: relative_to(root, &path),
            is_dir: meta.is_dir(),
            size_bytes: if meta.is_dir() { 0 } else { meta.len() },
        });
    }

    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    Ok(entries)
}

pub fn breadcrumbs(relative: &str) -> Vec<Crumb> {
    let mut crumbs = Vec::new();
    let mut current = String::new();
    for part in relative.split('/').filter(|p| !p.is_empty()) {
        if !current.is_empty() {
            current.push('/');
        }
        current.push_str(part);
        crumbs.push(Crumb {
            name: part.to_string(),
            path: current.clone(),
        });
    }
    crumbs
}

/// Percent-encode each segment of a relative path.
pub fn encode_path(relative: &str) -> String {
    relative
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_for() {
        assert_eq!(icon_for("Show.S01E01.MKV"), "🎬");
        assert_eq!(icon_for("subs.srt"), "📝");
        assert_eq!(icon_for("README"), "📄");
        assert_eq!(icon_for("archive.unknown"), "📄");
    }

    #[test]
    fn test_breadcrumbs() {
        let crumbs = breadcrumbs("Show/Season 1/");
        assert_eq!(
            crumbs,
            vec![
                Crumb {
                    name: "Show".into(),
                    path: "Show".into()
                },
                Crumb {
                    name: "Season 1".into(),
                    path: "Show/Season 1".into()
                },
            ]
        );
        assert!(breadcrumbs("").is_empty());
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("Show S01/ep #1.mkv"), "Show%20S01/ep%20%231.mkv");
    }

    #[tokio::test]
    async fn test_resolve_and_list() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        std::fs::create_dir(root.join("zeta")).unwrap();
        std::fs::create_dir(root.join("Alpha")).unwrap();
        std::fs::write(root.join("b.mkv"), b"12345").unwrap();
        std::fs::write(root.join("A.txt"), b"1").unwrap();

        let dir = resolve(&root, "").await.unwrap();
        let names: Vec<String> = list_dir(&root, &dir)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "zeta", "A.txt", "b.mkv"]);

        let file = resolve(&root, "/b.mkv").await.unwrap();
        assert_eq!(relative_to(&root, &file), "b.mkv");

        assert!(matches!(
            resolve(&root, "missing").await,
            Err(DashboardError::NotFound(_))
        ));
        assert!(matches!(
            resolve(&root, "../../etc/nothing-here").await,
            Err(DashboardError::Forbidden)
        ));
        assert!(matches!(
            resolve(&root, "..").await,
            Err(DashboardError::Forbidden)
        ));
    }
}
