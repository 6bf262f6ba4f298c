use serde::{Deserialize, Deserializer};

/// Deserializer for optional-nullable fields: a present `null` becomes
/// `Some(None)` (clear the column) while an absent field stays `None` via
/// `#[serde(default)]` (leave it unchanged).
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

pub mod attendance;
pub mod health;
pub mod insights;
pub mod issues;
pub mod materials;
pub mod organizations;
pub mod portal;
pub mod projects;
pub mod reports;
pub mod site_log;
pub mod tasks;
pub mod team_members;
pub mod workers;
