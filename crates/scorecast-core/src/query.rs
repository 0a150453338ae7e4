//! Filtered, paginated match listings.

use scorecast_types::{MatchStatus, MatchSummary};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Page size when the caller gives none.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page a caller may request.
pub const MAX_LIMIT: u32 = 100;

const fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Which matches to list, and which slice of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MatchQuery {
    /// Only matches in this status.
    #[serde(default)]
    pub status: Option<MatchStatus>,
    /// Page size.
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
    /// Matches to skip, in id order.
    #[serde(default)]
    pub offset: u32,
}

impl Default for MatchQuery {
    fn default() -> Self {
        Self {
            status: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl MatchQuery {
    /// Whether a match with this status belongs in the result.
    pub fn admits(&self, status: MatchStatus) -> bool {
        self.status.is_none_or(|wanted| wanted == status)
    }
}

/// One page of a match listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPage {
    /// Matches passing the filter, before pagination.
    pub total: usize,
    /// The requested slice, ordered by id.
    pub matches: Vec<MatchSummary>,
}

impl MatchPage {
    /// Filter `summaries` (already in id order) and cut out the page.
    pub fn build(query: &MatchQuery, summaries: impl IntoIterator<Item = MatchSummary>) -> Self {
        let filtered: Vec<MatchSummary> = summaries
            .into_iter()
            .filter(|s| query.admits(s.status))
            .collect();
        let total = filtered.len();
        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let matches = filtered.into_iter().skip(offset).take(limit).collect();
        Self { total, matches }
    }
}
