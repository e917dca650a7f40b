use contracts::dashboards::d100_satisfaction::{DataQuery, SatisfactionRow};
use contracts::shared::pagination::{Envelope, Paginated};

use crate::system::auth::api::fetch_json;

const API_BASE: &str = "/api/d100/satisfaction";

/// Fetch one page of the filtered satisfaction slice.
pub async fn fetch_satisfaction(query: &DataQuery) -> Result<Paginated<SatisfactionRow>, String> {
    let path = format!("{}?{}", API_BASE, query.to_query_string());
    let envelope: Envelope<Paginated<SatisfactionRow>> = fetch_json(&path).await?;
    Ok(envelope.data)
}
