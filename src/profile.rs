//! Provisioning profile payload and field selection (iOS releases only).

use serde::Deserialize;

use crate::error::Result;

/// Provisioning profile info returned by
/// `/apps/{owner}/{app}/releases/{id}/provisioning_profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisioningProfile {
    /// Profile type (e.g. `"adhoc"`, `"enterprise"`).
    pub provisioning_profile_type: String,
    /// Profile name as registered with Apple.
    pub provisioning_profile_name: String,
    /// Bundle id the profile was issued for.
    pub provisioning_bundle_id: String,
    /// Apple team identifier.
    pub team_identifier: String,
}

/// Selects what [`crate::AppCenter::provisioning_profile`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKey {
    /// The whole response body, verbatim.
    All,
    /// Only the profile type.
    ProfileType,
    /// Only the profile name.
    ProfileName,
    /// Only the bundle id.
    BundleId,
    /// Only the team identifier.
    TeamIdentifier,
}

/// Projects the selected field out of a profile response body; `All`
/// passes the body through verbatim.
pub(crate) fn project_field(body: &str, key: ProfileKey) -> Result<String> {
    let parse = || serde_json::from_str::<ProvisioningProfile>(body);
    Ok(match key {
        ProfileKey::All => body.to_string(),
        ProfileKey::ProfileType => parse()?.provisioning_profile_type,
        ProfileKey::ProfileName => parse()?.provisioning_profile_name,
        ProfileKey::BundleId => parse()?.provisioning_bundle_id,
        ProfileKey::TeamIdentifier => parse()?.team_identifier,
    })
}
