//! Recursive document splitting with size and overlap limits

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::types::{Document, TextSegment};

/// Granularity levels tried in order when a piece is too large
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Paragraph,
    Line,
    Sentence,
    Word,
    Character,
}

impl Level {
    fn next(self) -> Option<Level> {
        match self {
            Level::Paragraph => Some(Level::Line),
            Level::Line => Some(Level::Sentence),
            Level::Sentence => Some(Level::Word),
            Level::Word => Some(Level::Character),
            Level::Character => None,
        }
    }

    /// Separator used when re-joining pieces of this level
    fn joiner(self) -> &'static str {
        match self {
            Level::Paragraph => "\n\n",
            Level::Line => "\n",
            Level::Sentence | Level::Word => " ",
            Level::Character => "",
        }
    }
}

/// Splits documents into segments of at most `max_segment_size` characters.
///
/// Text is cut at paragraph boundaries first, then lines, sentences, words and
/// finally single characters, and adjacent pieces are merged greedily back up
/// to the size limit.
#[derive(Debug, Clone)]
pub struct DocumentSplitter {
    max_segment_size: usize,
    overlap: usize,
}

impl DocumentSplitter {
    /// Create a splitter; `overlap` must be smaller than `max_segment_size`
    pub fn new(max_segment_size: usize, overlap: usize) -> Self {
        let max_segment_size = max_segment_size.max(1);
        Self {
            max_segment_size,
            overlap: overlap.min(max_segment_size - 1),
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.max_segment_size, config.segment_overlap)
    }

    /// Split one document; segments inherit its metadata plus their `segment_index`
    pub fn split(&self, document: &Document) -> Vec<TextSegment> {
        self.split_text(&document.text)
            .into_iter()
            .enumerate()
            .map(|(index, text)| TextSegment::from_document(document, text, index))
            .collect()
    }

    /// Split every document, preserving document order
    pub fn split_all(&self, documents: &[Document]) -> Vec<TextSegment> {
        documents.iter().flat_map(|doc| self.split(doc)).collect()
    }

    /// Split raw text into segment strings
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        if char_len(trimmed) <= self.max_segment_size {
            return vec![trimmed.to_string()];
        }
        self.split_at_level(trimmed, Level::Paragraph)
    }

    fn split_at_level(&self, text: &str, level: Level) -> Vec<String> {
        let pieces = self.pieces(text, level);
        let joiner = level.joiner();

        let mut segments = Vec::new();
        let mut current = String::new();

        for piece in pieces {
            let piece = if level == Level::Character { piece } else { piece.trim() };
            if piece.is_empty() {
                continue;
            }

            if char_len(piece) > self.max_segment_size {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                match level.next() {
                    Some(next) => segments.extend(self.split_at_level(piece, next)),
                    None => segments.push(piece.to_string()),
                }
                continue;
            }

            if !current.is_empty()
                && char_len(&current) + char_len(joiner) + char_len(piece) > self.max_segment_size
            {
                let finished = std::mem::take(&mut current);
                current = self.overlap_tail(&finished, joiner, piece);
                segments.push(finished);
            }

            if !current.is_empty() {
                current.push_str(joiner);
            }
            current.push_str(piece);
        }

        if !current.is_empty() {
            segments.push(current);
        }

        segments
    }

    fn pieces<'a>(&self, text: &'a str, level: Level) -> Vec<&'a str> {
        match level {
            Level::Paragraph => text.split("\n\n").collect(),
            Level::Line => text.lines().collect(),
            Level::Sentence => text.split_sentence_bounds().collect(),
            Level::Word => text.split_whitespace().collect(),
            Level::Character => {
                // Character level only runs on pieces longer than the limit
                let mut chunks = Vec::new();
                let mut start = 0;
                let mut count = 0;
                for (idx, _) in text.char_indices() {
                    if count == self.max_segment_size {
                        chunks.push(&text[start..idx]);
                        start = idx;
                        count = 0;
                    }
                    count += 1;
                }
                chunks.push(&text[start..]);
                chunks
            }
        }
    }

    /// Tail of `finished` carried into the next segment, or empty when it would not fit
    fn overlap_tail(&self, finished: &str, joiner: &str, next_piece: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }

        let total = char_len(finished);
        let skip = total.saturating_sub(self.overlap);
        let tail: String = finished.chars().skip(skip).collect();

        // Prefer starting at a word boundary
        let tail = match tail.find(' ') {
            Some(pos) if skip > 0 => tail[pos + 1..].to_string(),
            _ => tail,
        };

        if char_len(&tail) + char_len(joiner) + char_len(next_piece) > self.max_segment_size {
            String::new()
        } else {
            tail
        }
    }
}

impl Default for DocumentSplitter {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Metadata, SEGMENT_INDEX_KEY};

    #[test]
    fn test_short_document_is_one_segment() {
        let doc = Document::new(
            "index:1\nmovie_name:The Godfather\ngenre:Crime",
            Metadata::new().with("row", "1"),
        );
        let segments = DocumentSplitter::default().split(&doc);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, doc.text);
        assert_eq!(segments[0].metadata.get("row"), Some("1"));
        assert_eq!(segments[0].metadata.get(SEGMENT_INDEX_KEY), Some("0"));
    }

    #[test]
    fn test_segments_respect_max_size() {
        let text = (0..40)
            .map(|i| format!("Sentence number {} talks about movies.", i))
            .collect::<Vec<_>>()
            .join(" ");
        let splitter = DocumentSplitter::new(120, 0);
        let segments = splitter.split_text(&text);

        assert!(segments.len() > 1);
        for segment in &segments {
            assert!(segment.chars().count() <= 120, "too long: {}", segment);
        }
    }

    #[test]
    fn test_lines_are_kept_whole_when_possible() {
        let text = "alpha:aaaaaaaaaa\nbeta:bbbbbbbbbb\ngamma:cccccccccc\ndelta:dddddddddd";
        let segments = DocumentSplitter::new(35, 0).split_text(text);

        assert_eq!(
            segments,
            vec![
                "alpha:aaaaaaaaaa\nbeta:bbbbbbbbbb",
                "gamma:cccccccccc\ndelta:dddddddddd"
            ]
        );
    }

    #[test]
    fn test_unbroken_text_falls_back_to_characters() {
        let text = "x".repeat(25);
        let segments = DocumentSplitter::new(10, 0).split_text(&text);
        assert_eq!(segments, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);
    }

    #[test]
    fn test_overlap_carries_tail_words() {
        let text = "one two three four five six seven eight nine ten";
        let segments = DocumentSplitter::new(20, 8).split_text(text);

        assert!(segments.len() > 1);
        for pair in segments.windows(2) {
            let last_word = pair[0].split_whitespace().last().unwrap();
            assert!(
                pair[1].starts_with(last_word),
                "{:?} should start with {:?}",
                pair[1],
                last_word
            );
        }
    }

    #[test]
    fn test_segment_indices_restart_per_document() {
        let docs = vec![
            Document::new("a ".repeat(30), Metadata::new().with("row", "1")),
            Document::new("b ".repeat(30), Metadata::new().with("row", "2")),
        ];
        let segments = DocumentSplitter::new(20, 0).split_all(&docs);

        let first_of_second = segments
            .iter()
            .find(|s| s.metadata.get("row") == Some("2"))
            .unwrap();
        assert_eq!(first_of_second.metadata.get(SEGMENT_INDEX_KEY), Some("0"));
    }

    #[test]
    fn test_empty_text_has_no_segments() {
        assert!(DocumentSplitter::default().split_text("   \n ").is_empty());
    }
}
