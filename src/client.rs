//! The App Center client and its builder.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use log::{debug, info};
use reqwest::Client;

use crate::device::{self, Device, DeviceKey};
use crate::download::{self, DownloadOptions};
use crate::error::{Error, Result};
use crate::format::format_size;
use crate::http::HttpClient;
use crate::profile::{self, ProfileKey};
use crate::release::{ReleaseDetails, ReleaseRef, ReleaseResolver, ReleaseSummary};

/// Base URL of the hosted App Center API.
pub const DEFAULT_API_URL: &str = "https://api.appcenter.ms/v0.1";

/// Client for the App Center REST API.
///
/// Holds the two immutable configuration values, API token and owner name
/// (both trimmed at construction), for its lifetime. Calls are otherwise
/// stateless: every operation fetches fresh data, nothing is cached.
///
/// ```no_run
/// use appcenter_client::{AppCenter, ReleaseRef};
///
/// # async fn run() -> appcenter_client::Result<()> {
/// let client = AppCenter::new("api-token", "Microsoft")?;
/// let version = client.full_version("APIExample", ReleaseRef::Latest).await?;
/// println!("latest release is {version}");
/// # Ok(())
/// # }
/// ```
pub struct AppCenter {
    owner: String,
    api_url: String,
    http: HttpClient,
}

impl AppCenter {
    /// Creates a client for the hosted API.
    ///
    /// Token and owner are trimmed but not otherwise validated; bad values
    /// surface when a call is made.
    pub fn new(api_token: &str, owner_name: &str) -> Result<Self> {
        Self::builder(api_token, owner_name).build()
    }

    /// Starts a builder, for overriding the API URL (e.g. to point at a
    /// mock server in tests) or setting a request timeout.
    pub fn builder(api_token: &str, owner_name: &str) -> AppCenterBuilder {
        AppCenterBuilder {
            api_token: api_token.trim().to_string(),
            owner: owner_name.trim().to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }

    fn app_url(&self, app_name: &str, tail: &str) -> String {
        format!(
            "{}/apps/{}/{}/{}",
            self.api_url,
            self.owner,
            app_name.trim(),
            tail
        )
    }

    async fn release_details(
        &self,
        app_name: &str,
        release: ReleaseRef,
    ) -> Result<ReleaseDetails> {
        debug!(
            "Fetching release {} of {}/{}...",
            release,
            self.owner,
            app_name.trim()
        );
        self.http
            .get_json(&self.app_url(app_name, &format!("releases/{release}")))
            .await
    }

    /// The application's display name.
    pub async fn display_name(&self, app_name: &str) -> Result<String> {
        Ok(self
            .release_details(app_name, ReleaseRef::Latest)
            .await?
            .app_display_name)
    }

    /// The operating system the application targets.
    pub async fn supported_os(&self, app_name: &str) -> Result<String> {
        Ok(self
            .release_details(app_name, ReleaseRef::Latest)
            .await?
            .app_os)
    }

    /// The release's build number.
    pub async fn build_number(&self, app_name: &str, release: ReleaseRef) -> Result<String> {
        Ok(self.release_details(app_name, release).await?.version)
    }

    /// The release's human-facing short version.
    pub async fn short_version(&self, app_name: &str, release: ReleaseRef) -> Result<String> {
        Ok(self.release_details(app_name, release).await?.short_version)
    }

    /// The combined version string, e.g. `"2.3 (45)"`.
    pub async fn full_version(&self, app_name: &str, release: ReleaseRef) -> Result<String> {
        Ok(self.release_details(app_name, release).await?.full_version())
    }

    /// The release's binary size, formatted for humans (e.g. `"1.5KB"`).
    pub async fn size(&self, app_name: &str, release: ReleaseRef) -> Result<String> {
        Ok(format_size(self.release_details(app_name, release).await?.size))
    }

    /// The minimum OS version the release supports, prefixed with the OS
    /// name, e.g. `"iOS 11.0"`.
    pub async fn min_os_version(&self, app_name: &str, release: ReleaseRef) -> Result<String> {
        let details = self.release_details(app_name, release).await?;
        Ok(format!("{} {}", details.app_os, details.min_os))
    }

    /// The application's bundle identifier / package name.
    pub async fn bundle_id(&self, app_name: &str) -> Result<String> {
        Ok(self
            .release_details(app_name, ReleaseRef::Latest)
            .await?
            .bundle_identifier)
    }

    /// Basic information about every release of the app, newest first.
    pub async fn releases(&self, app_name: &str) -> Result<Vec<ReleaseSummary>> {
        debug!("Fetching releases of {}/{}...", self.owner, app_name.trim());
        self.http.get_json(&self.app_url(app_name, "releases")).await
    }

    /// The latest release from every distribution group of the app.
    pub async fn recent_releases(&self, app_name: &str) -> Result<Vec<ReleaseSummary>> {
        debug!(
            "Fetching recent releases of {}/{}...",
            self.owner,
            app_name.trim()
        );
        self.http
            .get_json(&self.app_url(app_name, "recent_releases"))
            .await
    }

    /// Id of the application's most recent release.
    pub async fn latest_release_id(&self, app_name: &str) -> Result<u64> {
        let releases = self.recent_releases(app_name).await?;
        releases.first().map(|r| r.id).ok_or_else(|| {
            Error::NotFound(format!("{} has no releases", app_name.trim()))
        })
    }

    /// Resolves a build number to a release id.
    ///
    /// See [`ReleaseResolver::by_build_number`] for the matching and
    /// ambiguity rules.
    pub async fn release_id_by_build_number(
        &self,
        app_name: &str,
        build_number: &str,
    ) -> Result<u64> {
        let build_number = build_number.trim();
        if build_number.is_empty() {
            return Err(Error::Validation("build number must not be empty".into()));
        }
        let releases = self.releases(app_name).await?;
        ReleaseResolver::by_build_number(&releases, build_number)
    }

    /// Resolves a short-version + build-number pair to a release id.
    pub async fn release_id_by_version(
        &self,
        app_name: &str,
        short_version: &str,
        build_number: &str,
    ) -> Result<u64> {
        let short_version = short_version.trim();
        let build_number = build_number.trim();
        if short_version.is_empty() || build_number.is_empty() {
            return Err(Error::Validation(
                "short version and build number must not be empty".into(),
            ));
        }
        let releases = self.releases(app_name).await?;
        ReleaseResolver::by_version(&releases, short_version, build_number)
    }

    /// Provisioning profile information for an iOS release: one field, or
    /// the whole response for [`ProfileKey::All`].
    ///
    /// The profile endpoint takes no `latest` path segment, so
    /// [`ReleaseRef::Latest`] is first resolved to a numeric id.
    pub async fn provisioning_profile(
        &self,
        app_name: &str,
        release: ReleaseRef,
        key: ProfileKey,
    ) -> Result<String> {
        let id = match release {
            ReleaseRef::Id(id) => id,
            ReleaseRef::Latest => self.latest_release_id(app_name).await?,
        };
        let body = self
            .http
            .get_text(&self.app_url(app_name, &format!("releases/{id}/provisioning_profile")))
            .await?;
        profile::project_field(&body, key)
    }

    /// One detail of a device registered with the account, or the whole
    /// response for [`DeviceKey::All`].
    pub async fn device(&self, udid: &str, key: DeviceKey) -> Result<String> {
        let udid = udid.trim();
        if udid.is_empty() {
            return Err(Error::Validation("device UDID must not be empty".into()));
        }
        let body = self
            .http
            .get_text(&format!("{}/user/devices/{}", self.api_url, udid))
            .await?;
        device::project_field(&body, key)
    }

    /// Every device registered with the account.
    pub async fn devices(&self) -> Result<Vec<Device>> {
        self.http
            .get_json(&format!("{}/user/devices", self.api_url))
            .await
    }

    /// Downloads a release binary into the directory given by `options`.
    /// Returns the full path of the downloaded file.
    ///
    /// Without an explicit file name only Android and iOS releases can be
    /// downloaded; the platform check happens before any binary transfer.
    #[tracing::instrument(skip(self, options))]
    pub async fn download(
        &self,
        app_name: &str,
        release: ReleaseRef,
        options: &DownloadOptions,
    ) -> Result<PathBuf> {
        options.validate()?;
        let details = self.release_details(app_name, release).await?;
        self.download_details(&details, options).await
    }

    /// Downloads the release carrying the given build number.
    pub async fn download_by_build_number(
        &self,
        app_name: &str,
        build_number: &str,
        options: &DownloadOptions,
    ) -> Result<PathBuf> {
        options.validate()?;
        let id = self.release_id_by_build_number(app_name, build_number).await?;
        let details = self.release_details(app_name, ReleaseRef::Id(id)).await?;
        self.download_details(&details, options).await
    }

    /// Downloads the release carrying the given short-version +
    /// build-number pair.
    pub async fn download_by_version(
        &self,
        app_name: &str,
        short_version: &str,
        build_number: &str,
        options: &DownloadOptions,
    ) -> Result<PathBuf> {
        options.validate()?;
        let id = self
            .release_id_by_version(app_name, short_version, build_number)
            .await?;
        let details = self.release_details(app_name, ReleaseRef::Id(id)).await?;
        self.download_details(&details, options).await
    }

    async fn download_details(
        &self,
        details: &ReleaseDetails,
        options: &DownloadOptions,
    ) -> Result<PathBuf> {
        let file_name = match &options.file_name {
            Some(name) => name.clone(),
            None => download::default_file_name(details)?,
        };

        let file_name = if options.delete_existing {
            if let Some(ext) = download::extension_of(&file_name) {
                download::delete_existing(&options.dir, &ext);
            }
            file_name
        } else {
            download::timestamped(&file_name, Local::now())
        };

        let dest = options.dir.join(&file_name);
        info!(
            "Downloading {} {} to {:?}...",
            details.app_display_name,
            details.full_version(),
            dest
        );
        self.http.download_file(&details.download_url, &dest).await?;
        info!("Download complete.");

        Ok(dest)
    }
}

/// Builder for [`AppCenter`].
pub struct AppCenterBuilder {
    api_token: String,
    owner: String,
    api_url: String,
    timeout: Option<Duration>,
}

impl AppCenterBuilder {
    /// Overrides the API base URL.
    pub fn api_url(mut self, url: &str) -> Self {
        self.api_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Applies a total timeout to every request. No timeout is set by
    /// default; callers may also cancel any operation by dropping its
    /// future.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client. Fails only if the underlying HTTP client cannot
    /// be constructed.
    pub fn build(self) -> Result<AppCenter> {
        let mut builder = Client::builder().user_agent(concat!(
            "appcenter-client/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(AppCenter {
            owner: self.owner,
            api_url: self.api_url,
            http: HttpClient::new(client, &self.api_token),
        })
    }
}
