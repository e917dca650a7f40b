use serde::{Deserialize, Serialize};

/// Pagination block of the remote response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub total_records: u64,
}

/// One page of rows plus its pagination block, as returned by the data
/// endpoint under the outer `data` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub pagination: PageInfo,
    pub data: Vec<T>,
}

/// Outer `{ "data": ... }` wrapper used by every remote endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}
