//! Pluralization for log summaries.

/// Format count with noun, e.g. `plural_count(2, "rewrite")` -> `"2 rewrites"`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}
