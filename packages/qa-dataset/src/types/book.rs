//! Part/chapter hierarchy recovered from the source book.

use serde::{Deserialize, Serialize};

/// The whole book: parts in reading order.
///
/// Serializes as a bare JSON array of parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub parts: Vec<Part>,
}

impl Document {
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    /// Number of chapters across all parts.
    pub fn chapter_count(&self) -> usize {
        self.parts.iter().map(|p| p.chapters.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Iterate `(part, chapter)` pairs in reading order.
    pub fn chapters(&self) -> impl Iterator<Item = (&Part, &Chapter)> {
        self.parts
            .iter()
            .flat_map(|part| part.chapters.iter().map(move |chapter| (part, chapter)))
    }
}

/// A part of the book. Never empty once stored in a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    #[serde(rename = "part")]
    pub name: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl Part {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chapters: Vec::new(),
        }
    }

    pub fn with_chapter(mut self, chapter: Chapter) -> Self {
        self.chapters.push(chapter);
        self
    }
}

/// A chapter with its newline-joined body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(rename = "chapter")]
    pub name: String,
    #[serde(default)]
    pub text: String,
}

impl Chapter {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_serializes_as_array() {
        let doc = Document::new(vec![
            Part::new("PART ONE").with_chapter(Chapter::new("Chapter 1", "Text."))
        ]);

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["part"], "PART ONE");
        assert_eq!(json[0]["chapters"][0]["chapter"], "Chapter 1");
        assert_eq!(json[0]["chapters"][0]["text"], "Text.");
    }

    #[test]
    fn test_chapters_iterates_in_order() {
        let doc = Document::new(vec![
            Part::new("A")
                .with_chapter(Chapter::new("1", "a1"))
                .with_chapter(Chapter::new("2", "a2")),
            Part::new("B").with_chapter(Chapter::new("3", "b3")),
        ]);

        let names: Vec<_> = doc
            .chapters()
            .map(|(p, c)| format!("{}/{}", p.name, c.name))
            .collect();
        assert_eq!(names, vec!["A/1", "A/2", "B/3"]);
        assert_eq!(doc.chapter_count(), 3);
    }
}
