/// Cuts `text` to `max_width` characters, ending in `...` when shortened.
pub(in crate::editor::ui) fn truncate_text(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_width.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
