//! Codecs for the view-dedup cookies.
//!
//! `viewed_accs` holds `id:unix_ts` pairs (2-hour re-arm window, stale
//! entries pruned on every write). `viewed_shops` is a plain id set with
//! visited-once-per-cookie-lifetime semantics (the cookie itself expires
//! after 1 hour).

pub const VIEWED_ACCS_COOKIE: &str = "viewed_accs";
pub const VIEWED_SHOPS_COOKIE: &str = "viewed_shops";

/// Re-arm window for listing views, in seconds (2 hours).
pub const ACC_VIEW_WINDOW_SECS: i64 = 2 * 60 * 60;
/// Lifetime of the shop view cookie, in seconds (1 hour).
pub const SHOP_VIEW_WINDOW_SECS: i64 = 60 * 60;

pub fn parse_viewed_accs(raw: &str) -> Vec<(i32, i64)> {
    raw.split(',')
        .filter_map(|pair| {
            let (id, ts) = pair.split_once(':')?;
            Some((id.trim().parse().ok()?, ts.trim().parse().ok()?))
        })
        .collect()
}

pub fn encode_viewed_accs(entries: &[(i32, i64)]) -> String {
    entries
        .iter()
        .map(|(id, ts)| format!("{}:{}", id, ts))
        .collect::<Vec<_>>()
        .join(",")
}

/// Drop entries older than the re-arm window.
pub fn prune_viewed_accs(entries: Vec<(i32, i64)>, now: i64) -> Vec<(i32, i64)> {
    entries
        .into_iter()
        .filter(|(_, ts)| now - ts < ACC_VIEW_WINDOW_SECS)
        .collect()
}

pub fn parse_viewed_shops(raw: &str) -> Vec<i32> {
    raw.split(',')
        .filter_map(|id| id.trim().parse().ok())
        .collect()
}

pub fn encode_viewed_shops(ids: &[i32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
