/// Default upper bound on characters per chunk.
pub const DEFAULT_MAX_CHARS: usize = 500;

/// Splits document text into chunks along line boundaries.
///
/// Lines are accumulated until adding the next one (plus its separating line
/// break) would exceed `max_chars`; the buffer is then emitted, trimmed, and a
/// new one started with that line. A single line longer than `max_chars` is
/// never split and becomes an oversized chunk of its own. Blank buffers are
/// dropped, so whitespace-only input yields no chunks.
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    max_chars: usize,
}

impl TextChunker {
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut buffer = String::new();
        // Lengths are counted in chars, not bytes.
        let mut buffer_chars = 0usize;

        for line in text.lines() {
            let line_chars = line.chars().count();

            if !buffer.is_empty() && buffer_chars + 1 + line_chars > self.max_chars {
                Self::flush(&mut chunks, &buffer);
                buffer.clear();
                buffer_chars = 0;
            }

            if !buffer.is_empty() {
                buffer.push('\n');
                buffer_chars += 1;
            }
            buffer.push_str(line);
            buffer_chars += line_chars;
        }

        Self::flush(&mut chunks, &buffer);
        chunks
    }

    fn flush(chunks: &mut Vec<String>, buffer: &str) {
        let trimmed = buffer.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}
