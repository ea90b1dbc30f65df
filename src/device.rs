//! Registered-device payload and field selection.

use serde::Deserialize;

use crate::error::Result;

/// A device registered with the account, as returned by
/// `/user/devices/{udid}` and the `/user/devices` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    /// Account id of the device's owner.
    pub owner_id: String,
    /// Unique device identifier.
    pub udid: String,
    /// IMEI, when the device reports one.
    #[serde(default)]
    pub imei: Option<String>,
    /// OS build identifier.
    pub os_build: String,
    /// OS version.
    pub os_version: String,
    /// Hardware model.
    pub model: String,
    /// Serial number, when the device reports one.
    #[serde(default)]
    pub serial: Option<String>,
    /// User-visible device name.
    pub device_name: String,
    /// Registration timestamp (ISO 8601).
    pub registered_at: String,
}

/// Selects what [`crate::AppCenter::device`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKey {
    /// The whole response body, verbatim.
    All,
    OwnerId,
    Udid,
    Imei,
    OsBuild,
    OsVersion,
    Model,
    Serial,
    DeviceName,
    RegisteredAt,
}

/// Projects the selected field out of a device response body; `All` passes
/// the body through verbatim. Fields the device did not report project as
/// an empty string.
pub(crate) fn project_field(body: &str, key: DeviceKey) -> Result<String> {
    let parse = || serde_json::from_str::<Device>(body);
    Ok(match key {
        DeviceKey::All => body.to_string(),
        DeviceKey::OwnerId => parse()?.owner_id,
        DeviceKey::Udid => parse()?.udid,
        DeviceKey::Imei => parse()?.imei.unwrap_or_default(),
        DeviceKey::OsBuild => parse()?.os_build,
        DeviceKey::OsVersion => parse()?.os_version,
        DeviceKey::Model => parse()?.model,
        DeviceKey::Serial => parse()?.serial.unwrap_or_default(),
        DeviceKey::DeviceName => parse()?.device_name,
        DeviceKey::RegisteredAt => parse()?.registered_at,
    })
}
