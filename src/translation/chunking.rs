/*!
 * Splitting cue text into backend-sized chunks.
 *
 * Translation backends reject or truncate oversized inputs, so a cue body
 * longer than the configured limit is cut into consecutive slices. The
 * slices are never reordered or altered: joining them gives back the exact
 * input.
 */

/// Default maximum characters sent to the backend in one request
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 2500;

/// Split `text` into consecutive slices of at most `max_len` characters
///
/// Lengths count Unicode scalar values, not bytes. A slice ends after the
/// last whitespace inside its window when there is one, so words are only
/// cut when a single word exceeds the limit. `max_len` of zero is treated
/// as one.
pub fn chunk(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        // Byte offset just past the max_len-th character, or the whole rest
        let window_end = rest
            .char_indices()
            .nth(max_len)
            .map_or(rest.len(), |(idx, _)| idx);

        if window_end == rest.len() {
            chunks.push(rest.to_string());
            break;
        }

        let window = &rest[..window_end];
        let cut = window
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(idx, c)| idx + c.len_utf8())
            .unwrap_or(window_end);

        chunks.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }

    chunks
}
