//! Client library for the App Center REST API.
//!
//! Fetches release metadata, resolves human-readable versions to release
//! ids, and downloads application binaries.
//!
//! ```no_run
//! use appcenter_client::{AppCenter, DownloadOptions, ReleaseRef};
//!
//! # async fn run() -> appcenter_client::Result<()> {
//! let client = AppCenter::new("api-token", "Microsoft")?;
//!
//! let os = client.supported_os("APIExample").await?;
//! println!("APIExample targets {os}");
//!
//! let path = client
//!     .download(
//!         "APIExample",
//!         ReleaseRef::Latest,
//!         &DownloadOptions::new("./builds").delete_existing(true),
//!     )
//!     .await?;
//! println!("saved to {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod device;
pub mod download;
pub mod error;
pub mod format;
pub mod http;
pub mod profile;
pub mod release;

pub use client::{AppCenter, AppCenterBuilder, DEFAULT_API_URL};
pub use device::{Device, DeviceKey};
pub use download::{DownloadOptions, Platform};
pub use error::{Error, Result};
pub use profile::{ProfileKey, ProvisioningProfile};
pub use release::{ReleaseDetails, ReleaseRef, ReleaseResolver, ReleaseSummary};
