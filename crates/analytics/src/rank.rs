//! Generic top-N selection over a labelled numeric metric.

use serde::Serialize;

/// Row limit for vendor, item and dues rankings.
pub const SHORT_RANK_LIMIT: usize = 5;
/// Row limit for the tool-renewal leaderboard.
pub const LEADERBOARD_LIMIT: usize = 10;

/// One row of a ranking view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub label: String,
    pub value: f64,
}

/// Sort strictly descending by value and keep the first `n` entries.
///
/// Ties break ascending by label so the output is a deterministic function of
/// the input set, regardless of map iteration order upstream.
pub fn top_n<I>(entries: I, n: usize) -> Vec<RankingEntry>
where
    I: IntoIterator<Item = (String, f64)>,
{
    let mut ranked: Vec<RankingEntry> = entries
        .into_iter()
        .map(|(label, value)| RankingEntry { label, value })
        .collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
    ranked.truncate(n);
    ranked
}
