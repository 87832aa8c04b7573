//! Overlay catalog: named overlay folders, each holding one image per skin variant.
//!
//! A catalog can be built from an unpacked overlay bundle on disk, from the flat listing served
//! by the overlay proxy, or from GitHub contents API responses. Fetching is the caller's job;
//! this module only interprets what was fetched.

use std::{collections::BTreeMap, path::Path};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use walkdir::WalkDir;

use crate::foundation::error::{SkinMergeError, SkinMergeResult};

/// GitHub REST API root.
pub const GITHUB_API_BASE: &str = "https://api.github.com/repos";

/// Folder holding overlays at the repository root.
pub const OVERLAYS_DIR: &str = "Overlays";

/// Skin lookup service; `/<username>` serves the player's skin PNG.
pub const SKIN_SERVICE_BASE: &str = "https://mc-heads.net/skin";

const SAFE_PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

// Characters left alone by a browser's URI component encoder.
const URI_COMPONENT: &AsciiSet = &SAFE_PATH_SEGMENT
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One overlay image.
pub struct OverlayFile {
    /// File name, e.g. `slim.png`.
    pub name: String,
    /// Local path or download URL.
    pub location: String,
    /// Size in bytes.
    pub size: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A named overlay with its variant files.
pub struct OverlayFolder {
    /// Overlay name (the folder name).
    pub name: String,
    /// Files sorted by name.
    pub files: Vec<OverlayFile>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// All overlays available for selection.
pub struct OverlayCatalog {
    /// Folders sorted by name.
    pub folders: Vec<OverlayFolder>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Which files of an overlay bundle are eligible, and which variant is preferred.
pub struct CatalogRules {
    /// Lowercase extensions accepted as overlay images.
    pub allowed_extensions: Vec<String>,
    /// Path fragments that exclude a file (OS metadata, archive junk).
    pub ignored_names: Vec<String>,
    /// Per-file size limit in bytes.
    pub max_file_size: u64,
    /// Variant stems in preference order.
    pub preferred_variants: Vec<String>,
    /// Fall back to the first file when no preferred variant exists.
    pub fallback_to_first: bool,
}

impl Default for CatalogRules {
    fn default() -> Self {
        Self {
            allowed_extensions: ["png", "jpg", "jpeg", "gif", "webp"]
                .map(String::from)
                .to_vec(),
            ignored_names: [".DS_Store", "Thumbs.db", "__MACOSX"]
                .map(String::from)
                .to_vec(),
            max_file_size: 10 * 1024 * 1024,
            preferred_variants: ["slim", "normal"].map(String::from).to_vec(),
            fallback_to_first: true,
        }
    }
}

impl CatalogRules {
    /// Whether a bundle-relative path matches any ignored fragment.
    pub fn is_ignored(&self, rel_path: &str) -> bool {
        self.ignored_names.iter().any(|n| rel_path.contains(n.as_str()))
    }

    /// Whether `file_name` has an accepted image extension.
    pub fn is_allowed_image(&self, file_name: &str) -> bool {
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();
        self.allowed_extensions.iter().any(|a| *a == ext)
    }
}

impl OverlayFolder {
    /// File with exactly this name.
    pub fn file(&self, name: &str) -> Option<&OverlayFile> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Default file: the first preferred variant present, else the first file.
    pub fn default_file(&self, rules: &CatalogRules) -> Option<&OverlayFile> {
        rules
            .preferred_variants
            .iter()
            .find_map(|v| self.file(&format!("{v}.png")))
            .or_else(|| {
                if rules.fallback_to_first {
                    self.files.first()
                } else {
                    None
                }
            })
    }

    /// File for `variant` (e.g. `slim`), falling back to [`OverlayFolder::default_file`].
    pub fn preferred(&self, variant: &str, rules: &CatalogRules) -> Option<&OverlayFile> {
        self.file(&format!("{variant}.png"))
            .or_else(|| self.default_file(rules))
    }

    /// Variant name of the default file, or `unknown`.
    pub fn skin_type<'r>(&self, rules: &'r CatalogRules) -> &'r str {
        rules
            .preferred_variants
            .iter()
            .find(|v| self.file(&format!("{v}.png")).is_some())
            .map(String::as_str)
            .unwrap_or("unknown")
    }
}

impl OverlayCatalog {
    /// Scan an unpacked overlay bundle. Each image's parent folder names its overlay; files at
    /// the bundle root are ignored.
    #[tracing::instrument(skip(rules))]
    pub fn scan_dir(root: &Path, rules: &CatalogRules) -> SkinMergeResult<Self> {
        if !root.is_dir() {
            return Err(SkinMergeError::catalog(format!(
                "overlay directory '{}' not found",
                root.display()
            )));
        }

        let mut by_folder = BTreeMap::<String, Vec<OverlayFile>>::new();
        for entry in WalkDir::new(root).min_depth(2).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::warn!(%err, "skipping unreadable catalog entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let rel_str = rel.to_string_lossy().replace('\\', "/");
            if rules.is_ignored(&rel_str) {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !rules.is_allowed_image(&file_name) {
                continue;
            }
            let Some(folder) = rel
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
            else {
                continue;
            };

            let size = match entry.metadata() {
                Ok(m) => m.len(),
                Err(err) => {
                    tracing::warn!(%err, path = %rel_str, "skipping overlay without metadata");
                    continue;
                }
            };
            if size > rules.max_file_size {
                tracing::warn!(path = %rel_str, size, "skipping oversized overlay file");
                continue;
            }

            by_folder.entry(folder).or_default().push(OverlayFile {
                name: file_name,
                location: entry.path().to_string_lossy().into_owned(),
                size,
            });
        }

        Ok(Self::from_groups(by_folder))
    }

    /// Parse the proxy listing: `[{"name": "Folder/file.png", "url": "...", "size": 123}]`.
    pub fn from_listing_json(json: &str) -> SkinMergeResult<Self> {
        #[derive(serde::Deserialize)]
        struct ListingEntry {
            name: String,
            url: String,
            #[serde(default)]
            size: u64,
        }

        let entries: Vec<ListingEntry> = serde_json::from_str(json)
            .map_err(|e| SkinMergeError::catalog(format!("invalid overlay listing: {e}")))?;

        let mut by_folder = BTreeMap::<String, Vec<OverlayFile>>::new();
        for e in entries {
            let Some((folder, file)) = e.name.split_once('/') else {
                tracing::warn!(name = %e.name, "skipping listing entry outside a folder");
                continue;
            };
            by_folder
                .entry(folder.to_string())
                .or_default()
                .push(OverlayFile {
                    name: file.to_string(),
                    location: e.url,
                    size: e.size,
                });
        }
        Ok(Self::from_groups(by_folder))
    }

    /// Assemble a catalog from GitHub contents API responses.
    ///
    /// `root_json` lists the overlays directory; `fetch_folder` returns the listing of one
    /// sub-folder. Folders whose listing fails are skipped.
    pub fn from_contents(
        root_json: &str,
        mut fetch_folder: impl FnMut(&ContentsEntry) -> SkinMergeResult<String>,
    ) -> SkinMergeResult<Self> {
        let root = parse_contents(root_json)?;

        let mut by_folder = BTreeMap::<String, Vec<OverlayFile>>::new();
        for folder in root.iter().filter(|e| e.kind == "dir") {
            let listing = match fetch_folder(folder).and_then(|json| parse_contents(&json)) {
                Ok(l) => l,
                Err(err) => {
                    tracing::warn!(folder = %folder.name, %err, "skipping overlay folder");
                    continue;
                }
            };
            for file in listing {
                if file.kind != "file" || !file.name.ends_with(".png") {
                    continue;
                }
                let Some(url) = file.download_url else {
                    continue;
                };
                by_folder
                    .entry(folder.name.clone())
                    .or_default()
                    .push(OverlayFile {
                        name: file.name,
                        location: url,
                        size: file.size,
                    });
            }
        }
        Ok(Self::from_groups(by_folder))
    }

    fn from_groups(groups: BTreeMap<String, Vec<OverlayFile>>) -> Self {
        let folders = groups
            .into_iter()
            .filter(|(_, files)| !files.is_empty())
            .map(|(name, mut files)| {
                files.sort_by(|a, b| a.name.cmp(&b.name));
                OverlayFolder { name, files }
            })
            .collect();
        Self { folders }
    }

    /// Case-insensitive search over file and folder names. Folders left empty are dropped.
    pub fn filter(&self, term: &str) -> Self {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.clone();
        }

        let folders = self
            .folders
            .iter()
            .filter_map(|folder| {
                let folder_hit = folder.name.to_lowercase().contains(&term);
                let files: Vec<OverlayFile> = folder
                    .files
                    .iter()
                    .filter(|f| folder_hit || f.name.to_lowercase().contains(&term))
                    .cloned()
                    .collect();
                (!files.is_empty()).then(|| OverlayFolder {
                    name: folder.name.clone(),
                    files,
                })
            })
            .collect();
        Self { folders }
    }

    /// Folder with exactly this name.
    pub fn folder(&self, name: &str) -> Option<&OverlayFolder> {
        self.folders.iter().find(|f| f.name == name)
    }

    /// Number of overlay folders.
    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    /// Number of overlay files across all folders.
    pub fn file_count(&self) -> usize {
        self.folders.iter().map(|f| f.files.len()).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
/// One entry of a GitHub contents API directory listing.
pub struct ContentsEntry {
    /// Entry name.
    pub name: String,
    /// Repository-relative path.
    #[serde(default)]
    pub path: String,
    /// `file` or `dir`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Raw download URL (files only).
    #[serde(default)]
    pub download_url: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
}

fn parse_contents(json: &str) -> SkinMergeResult<Vec<ContentsEntry>> {
    #[derive(serde::Deserialize)]
    struct ApiMessage {
        message: String,
    }

    match serde_json::from_str::<Vec<ContentsEntry>>(json) {
        Ok(entries) => Ok(entries),
        Err(err) => match serde_json::from_str::<ApiMessage>(json) {
            Ok(m) => Err(SkinMergeError::catalog(format!(
                "repository listing failed: {}",
                m.message
            ))),
            Err(_) => Err(SkinMergeError::catalog(format!(
                "invalid repository listing: {err}"
            ))),
        },
    }
}

/// Owner and repository from a URL such as `https://github.com/owner/repo`.
pub fn parse_repo_url(url: &str) -> SkinMergeResult<(String, String)> {
    let invalid = || {
        SkinMergeError::catalog(format!(
            "invalid GitHub repository URL '{url}', expected https://github.com/owner/repo"
        ))
    };

    let (_, rest) = url.trim().split_once("://").ok_or_else(invalid)?;
    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    let mut parts = rest.split('/').skip(1).filter(|s| !s.is_empty());
    match (parts.next(), parts.next()) {
        (Some(owner), Some(repo)) => Ok((owner.to_string(), repo.to_string())),
        _ => Err(invalid()),
    }
}

/// GitHub contents API URL for `path` inside `owner/repo`.
pub fn contents_url(owner: &str, repo: &str, path: &str) -> String {
    let encoded: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| utf8_percent_encode(s, SAFE_PATH_SEGMENT).to_string())
        .collect();
    format!(
        "{GITHUB_API_BASE}/{owner}/{repo}/contents/{}",
        encoded.join("/")
    )
}

/// Skin PNG URL for a player name, trimmed and encoded as a single path component.
pub fn skin_url_for_username(username: &str) -> SkinMergeResult<String> {
    let name = username.trim();
    if name.is_empty() {
        return Err(SkinMergeError::validation("Please enter a valid username"));
    }
    Ok(format!(
        "{SKIN_SERVICE_BASE}/{}",
        utf8_percent_encode(name, URI_COMPONENT)
    ))
}

#[cfg(test)]
#[path = "../tests/unit/catalog.rs"]
mod tests;
