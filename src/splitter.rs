use std::ops::Range;

use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

/// A group of words flashed together.
///
/// `start_offset` and `stop_offset` are [grapheme cluster](https://docs.rs/unicode-segmentation)
/// offsets into the source text. `stop_offset` points at the last grapheme of
/// the last word, so the span is inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextChunk {
    pub text: String,
    pub start_offset: usize,
    pub stop_offset: usize,
    pub word_count: usize,
}

/// Split `input` into chunks of `chunk_size` whitespace-delimited words.
///
/// A `chunk_size` of 0 is treated as 1. Blank input yields no chunks.
pub fn split(input: &str, chunk_size: usize) -> Vec<TextChunk> {
    split_spans(input, chunk_size)
        .into_iter()
        .map(|(chunk, _)| chunk)
        .collect()
}

/// Like [`split`], paired with each chunk's byte range in `input`.
pub fn split_spans(input: &str, chunk_size: usize) -> Vec<(TextChunk, Range<usize>)> {
    let words = scan_words(input);

    if chunk_size <= 1 {
        return words;
    }

    words
        .chunks(chunk_size)
        .filter_map(|group| {
            let ((first, first_bytes), (last, last_bytes)) = (group.first()?, group.last()?);
            let text = group
                .iter()
                .map(|(word, _)| word.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");

            let chunk = TextChunk {
                text,
                start_offset: first.start_offset,
                stop_offset: last.stop_offset,
                word_count: group.len(),
            };
            Some((chunk, first_bytes.start..last_bytes.end))
        })
        .collect()
}

/// Number of whitespace-delimited words in `input`.
pub fn word_count(input: &str) -> usize {
    input.split_whitespace().count()
}

/// Byte ranges of the maximal runs of non-whitespace chars.
fn word_ranges(input: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut open = None;

    for (index, c) in input.char_indices() {
        match (c.is_whitespace(), open) {
            (false, None) => open = Some(index),
            (true, Some(start)) => {
                ranges.push(start..index);
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        ranges.push(start..input.len());
    }

    ranges
}

// Words are found on chars; offsets count the graphemes of each gap and word.
fn scan_words(input: &str) -> Vec<(TextChunk, Range<usize>)> {
    let mut position = 0;
    let mut previous_end = 0;

    word_ranges(input)
        .into_iter()
        .map(|range| {
            position += input[previous_end..range.start].graphemes(true).count();
            let length = input[range.clone()].graphemes(true).count();
            let chunk = TextChunk {
                text: input[range.clone()].to_string(),
                start_offset: position,
                stop_offset: position + length - 1,
                word_count: 1,
            };
            position += length;
            previous_end = range.end;
            (chunk, range)
        })
        .collect()
}
