/// Marker appended to text cut down to a length limit.
const ELLIPSIS: char = '…';

/// Truncate `text` to at most `limit` characters (not bytes).
///
/// Text over the limit keeps its first `limit - 1` characters followed by an
/// ellipsis, so the result never exceeds `limit`.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    if limit == 0 {
        return String::new();
    }
    let mut truncated: String = text.chars().take(limit - 1).collect();
    truncated.push(ELLIPSIS);
    truncated
}
