//! Search-box matching. The widget only keeps the query; rendering decides
//! what to hide.

/// Case-insensitive substring match. An empty (or blank) query matches all.
pub fn matches(label: &str, query: &str) -> bool {
    let q = query.trim();
    if q.is_empty() {
        return true;
    }
    label.to_lowercase().contains(&q.to_lowercase())
}

/// Indices of `labels` matching `query`, in order.
pub fn visible_indices<S: AsRef<str>>(labels: &[S], query: &str) -> Vec<usize> {
    labels
        .iter()
        .enumerate()
        .filter(|(_, l)| matches(l.as_ref(), query))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_matches_everything() {
        assert_eq!(visible_indices(&["a", "b"], "  "), vec![0, 1]);
    }

    #[test]
    fn match_ignores_case() {
        assert_eq!(visible_indices(&["São Paulo", "Rio", "PAULISTA"], "paul"), vec![0, 2]);
        assert!(!matches("Rio", "sp"));
    }
}
