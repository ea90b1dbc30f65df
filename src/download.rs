//! Download planning: platform extensions, file names, stale-file cleanup.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local, Timelike};
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::release::ReleaseDetails;

/// Target platform of a release binary, derived from the API's `app_os`
/// field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    /// Case-insensitive mapping from the `app_os` value. Anything other
    /// than Android or iOS has no default file name and is rejected.
    pub fn from_os(os: &str) -> Result<Self> {
        if os.eq_ignore_ascii_case("android") {
            Ok(Platform::Android)
        } else if os.eq_ignore_ascii_case("ios") {
            Ok(Platform::Ios)
        } else {
            Err(Error::UnsupportedPlatform { os: os.to_string() })
        }
    }

    /// Binary file extension, dot included.
    pub fn extension(self) -> &'static str {
        match self {
            Platform::Android => ".apk",
            Platform::Ios => ".ipa",
        }
    }
}

/// Options for a download operation.
///
/// ```no_run
/// use appcenter_client::DownloadOptions;
///
/// let opts = DownloadOptions::new("/tmp/builds")
///     .file_name("nightly.apk")
///     .delete_existing(true);
/// ```
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub(crate) dir: PathBuf,
    pub(crate) file_name: Option<String>,
    pub(crate) delete_existing: bool,
}

impl DownloadOptions {
    /// Download into `dir` with the synthesized default file name, keeping
    /// any files already present.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: None,
            delete_existing: false,
        }
    }

    /// Use an explicit file name (extension included) instead of the
    /// synthesized `"{display_name}_v{short}_build{version}{ext}"`.
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.trim().to_string());
        self
    }

    /// Delete previously downloaded binaries with the same extension from
    /// the target directory before downloading.
    pub fn delete_existing(mut self, delete: bool) -> Self {
        self.delete_existing = delete;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.dir.as_os_str().is_empty() {
            return Err(Error::Validation(
                "download path must not be empty".into(),
            ));
        }
        if let Some(name) = &self.file_name {
            if name.is_empty() {
                return Err(Error::Validation("file name must not be empty".into()));
            }
        }
        Ok(())
    }
}

/// The file name a release downloads to when none is given explicitly:
/// `"{app_display_name}_v{short_version}_build{version}{ext}"`.
///
/// Fails with [`Error::UnsupportedPlatform`] for anything that is not an
/// Android or iOS release.
pub fn default_file_name(details: &ReleaseDetails) -> Result<String> {
    let platform = Platform::from_os(&details.app_os)?;
    Ok(format!(
        "{}_v{}_build{}{}",
        details.app_display_name,
        details.short_version,
        details.version,
        platform.extension()
    ))
}

/// The extension of a file name, dot included, when it has one. Used to
/// scope the stale-file sweep to the same kind of binary.
pub(crate) fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

/// Inserts the local-time `_{day}{month}{hour}{minute}{second}` suffix in
/// front of the extension, so a repeated download does not overwrite the
/// previous file.
pub(crate) fn timestamped(file_name: &str, now: DateTime<Local>) -> String {
    let suffix = format!(
        "_{}{}{}{}{}",
        now.day(),
        now.month(),
        now.hour(),
        now.minute(),
        now.second()
    );
    match file_name.rfind('.') {
        Some(dot) => format!("{}{}{}", &file_name[..dot], suffix, &file_name[dot..]),
        None => format!("{file_name}{suffix}"),
    }
}

/// Best-effort removal of previously downloaded binaries with the given
/// extension. Failures are logged and never propagated; a failed cleanup
/// must not block the download that follows.
pub(crate) fn delete_existing(dir: &Path, extension: &str) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Skipping cleanup of {:?}: {}", dir, e);
            return;
        }
    };

    let extension = extension.to_ascii_lowercase();
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_ascii_lowercase();
        if !name.ends_with(&extension) || !path.is_file() {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => debug!("Deleted existing app {:?}", path),
            Err(e) => warn!("Failed to delete {:?}: {}", path, e),
        }
    }
}
