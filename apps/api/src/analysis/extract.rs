//! Best-effort text extraction for uploaded resume files.
//!
//! Binary formats such as PDF are not parsed; their bytes are decoded as text and whatever
//! readable content survives is analyzed.

const PLAIN_TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown"];

pub const DEFAULT_UPLOAD_NAME: &str = "resume.txt";

pub fn extract_text(bytes: &[u8], filename: &str) -> String {
    if is_plain_text(filename) {
        return decode_utf8_dropping_invalid(bytes);
    }

    let text = decode_utf8_dropping_invalid(bytes);
    if !text.trim().is_empty() {
        return text;
    }
    decode_latin1(bytes)
}

fn is_plain_text(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            PLAIN_TEXT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// UTF-8 decoding that skips invalid sequences instead of substituting U+FFFD.
fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// One byte per character; cannot fail.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
