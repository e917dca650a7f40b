use contracts::shared::pagination::Envelope;

use crate::system::auth::api::fetch_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationLevel {
    Region,
    District,
    Facility,
}

impl LocationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationLevel::Region => "region",
            LocationLevel::District => "district",
            LocationLevel::Facility => "facility",
        }
    }
}

/// Lookup one level of the location hierarchy, scoped by its parent
/// (region id for districts, district id for facilities).
pub async fn fetch_locations(
    level: LocationLevel,
    parent: Option<&str>,
) -> Result<Vec<String>, String> {
    let mut path = format!("/api/locations?location={}", level.as_str());
    if let Some(parent) = parent {
        path.push_str(&format!("&parent={}", urlencoding::encode(parent)));
    }

    let envelope: Envelope<Vec<String>> = fetch_json(&path).await?;
    Ok(envelope.data)
}
