//! Chat room names derived from the opening prompt.

/// Default number of prompt words used for a room name.
pub const DEFAULT_ROOM_NAME_WORDS: usize = 10;

/// Build a room name from the first `max_words` words of a prompt.
///
/// An ellipsis is appended when the prompt has at least `max_words` words.
pub fn room_name(prompt: &str, max_words: usize) -> String {
    let words: Vec<&str> = prompt.split_whitespace().collect();
    let take = words.len().min(max_words);
    let mut name = words[..take].join(" ");
    if max_words > 0 && words.len() >= max_words {
        name.push_str("...");
    }
    name
}
