use crate::models::Chunk;

/// Split text into paragraphs separated by blank lines
///
/// A heading line (`#...`) is dropped only when it would open a new paragraph;
/// inside a paragraph it is kept as ordinary text.
pub fn split_into_paragraphs(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");

    let mut paragraphs = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();

    for line in normalized.split('\n') {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            flush_paragraph(&mut buffer, &mut paragraphs);
            continue;
        }

        if trimmed.starts_with('#') && buffer.is_empty() {
            continue;
        }

        buffer.push(line);
    }
    flush_paragraph(&mut buffer, &mut paragraphs);

    paragraphs
}

fn flush_paragraph(buffer: &mut Vec<&str>, paragraphs: &mut Vec<String>) {
    if buffer.is_empty() {
        return;
    }
    let paragraph = buffer.join("\n").trim().to_string();
    if !paragraph.is_empty() {
        paragraphs.push(paragraph);
    }
    buffer.clear();
}

/// Merge consecutive paragraphs until each chunk holds at least `min_chars`
///
/// Paragraphs are never split, so there is no upper bound on chunk size, and
/// the final chunk may be shorter than `min_chars`.
pub fn merge_short_paragraphs<I, S>(paragraphs: I, min_chars: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut merged = Vec::new();
    let mut buffer = String::new();
    let mut buffer_chars = 0;

    for paragraph in paragraphs {
        let paragraph = paragraph.as_ref();
        if !buffer.is_empty() {
            buffer.push_str("\n\n");
            buffer_chars += 2;
        }
        buffer.push_str(paragraph);
        buffer_chars += paragraph.chars().count();

        if buffer_chars >= min_chars {
            merged.push(std::mem::take(&mut buffer));
            buffer_chars = 0;
        }
    }

    if !buffer.is_empty() {
        merged.push(buffer);
    }

    merged
}

/// Split, merge and number chunks (1-based ids in output order)
pub fn make_chunks(text: &str, min_chars: usize) -> Vec<Chunk> {
    let paragraphs = split_into_paragraphs(text);
    merge_short_paragraphs(paragraphs, min_chars)
        .into_iter()
        .enumerate()
        .map(|(i, text)| Chunk::new(i + 1, text))
        .collect()
}
