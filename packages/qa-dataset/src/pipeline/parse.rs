//! Structural extraction: HTML book -> parts -> chapters -> text.
//!
//! The source is a single legacy-encoded HTML file. Markup is flattened to
//! lines, then a line scanner recognises part markers, chapter markers and
//! body text.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::{debug, info, warn};

use crate::error::{DatasetError, Result};
use crate::types::{BookConfig, BookLayout, Chapter, Document, Part};

/// Elements removed together with their text.
const SKIPPED_ELEMENTS: &[&str] = &["meta", "a", "script", "style"];

lazy_static! {
    static ref RESIDUAL_TAG: Regex = Regex::new(r"</?[^>]+>").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref RU_PART: Regex = Regex::new(r"^\* ЧАСТЬ [А-Я]+ \*$").unwrap();
    static ref RU_CHAPTER: Regex = Regex::new(r"(?i)^Глава\s+\d+\.?$").unwrap();
    static ref EN_PART: Regex = Regex::new(r"^\* PART [A-Z]+ \*$").unwrap();
    static ref EN_CHAPTER: Regex = Regex::new(r"(?i)^Chapter\s+\d+\.?$").unwrap();
}

impl BookLayout {
    /// Pattern of a line that opens a new part.
    pub fn part_marker(&self) -> &'static Regex {
        match self {
            Self::Russian => &RU_PART,
            Self::English => &EN_PART,
        }
    }

    /// Pattern of a line that opens a new chapter.
    pub fn chapter_marker(&self) -> &'static Regex {
        match self {
            Self::Russian => &RU_CHAPTER,
            Self::English => &EN_CHAPTER,
        }
    }

    /// Marker of the "original edition" notice line.
    pub fn original_marker(&self) -> &'static str {
        match self {
            Self::Russian => "Оригинал",
            Self::English => "Original",
        }
    }
}

/// Read and decode the book at `path`, then extract its structure.
///
/// A missing file is reported as [`DatasetError::InputNotFound`].
pub fn read_book(path: impl AsRef<Path>, config: &BookConfig) -> Result<Document> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| DatasetError::from_io(path, e))?;

    let encoding = encoding_rs::Encoding::for_label(config.encoding.as_bytes()).ok_or_else(|| {
        DatasetError::Encoding {
            label: config.encoding.clone(),
        }
    })?;

    let (html, used, had_errors) = encoding.decode(&bytes);
    if had_errors {
        warn!(path = %path.display(), encoding = used.name(), "Source contains undecodable bytes");
    }

    debug!(
        path = %path.display(),
        encoding = used.name(),
        bytes = bytes.len(),
        "Decoded source book"
    );

    let document = extract_book(&html, config);
    log_structure(&document);
    Ok(document)
}

/// Extract the part/chapter hierarchy from decoded HTML.
pub fn extract_book(html: &str, config: &BookConfig) -> Document {
    let lines = html_to_lines(html);
    assemble_document(&lines, config)
}

/// Flatten HTML to non-empty, whitespace-collapsed text lines.
///
/// Text nodes are joined with line breaks so block boundaries survive.
pub fn html_to_lines(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut fragments = Vec::new();
    collect_text(document.root_element(), &mut fragments);
    let text = fragments.join("\n");

    let text = RESIDUAL_TAG.replace_all(&text, "");
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    text.split('\n')
        .map(|line| WHITESPACE.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn collect_text(element: ElementRef<'_>, out: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push(text.to_string());
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !SKIPPED_ELEMENTS.contains(&child_element.value().name()) {
                collect_text(child_element, out);
            }
        }
    }
}

/// Scan text lines into a [`Document`].
///
/// Lines before the first part marker, or before the first chapter marker of
/// a part, are discarded. Chapters with empty text and parts with no chapters
/// are dropped.
pub fn assemble_document(lines: &[String], config: &BookConfig) -> Document {
    let layout = config.layout;
    let boilerplate: Vec<&str> = [
        config.author.as_str(),
        "Copyright",
        "http://",
        "Email:",
        layout.original_marker(),
        config.title.as_str(),
    ]
    .into_iter()
    .filter(|marker| !marker.is_empty())
    .collect();

    let mut scanner = Scanner::default();

    for line in lines {
        if layout.part_marker().is_match(line) {
            scanner.start_part(line.replace('*', "").trim());
        } else if layout.chapter_marker().is_match(line) {
            scanner.start_chapter(line);
        } else if scanner.in_chapter() {
            if boilerplate.iter().any(|marker| line.contains(marker)) {
                continue;
            }
            scanner.content.push(line.clone());
        }
    }

    scanner.finish()
}

#[derive(Default)]
struct Scanner {
    parts: Vec<Part>,
    part: Option<Part>,
    chapter: Option<String>,
    content: Vec<String>,
}

impl Scanner {
    fn in_chapter(&self) -> bool {
        self.part.is_some() && self.chapter.is_some()
    }

    fn start_part(&mut self, name: &str) {
        self.flush_chapter();
        self.flush_part();
        self.part = Some(Part::new(name));
    }

    fn start_chapter(&mut self, name: &str) {
        self.flush_chapter();
        self.chapter = Some(name.to_string());
    }

    fn flush_chapter(&mut self) {
        let name = self.chapter.take();
        let content = std::mem::take(&mut self.content);

        if let (Some(part), Some(name)) = (self.part.as_mut(), name) {
            let text = content.join("\n").trim().to_string();
            if !text.is_empty() {
                part.chapters.push(Chapter::new(name, text));
            }
        }
    }

    fn flush_part(&mut self) {
        if let Some(part) = self.part.take() {
            if !part.chapters.is_empty() {
                self.parts.push(part);
            }
        }
    }

    fn finish(mut self) -> Document {
        self.flush_chapter();
        self.flush_part();
        Document::new(self.parts)
    }
}

/// Log a per-part summary of an extracted document.
pub fn log_structure(document: &Document) {
    for (i, part) in document.parts.iter().enumerate() {
        debug!(index = i + 1, part = %part.name, chapters = part.chapters.len(), "Part");
        for chapter in &part.chapters {
            debug!(part = %part.name, chapter = %chapter.name, chars = chapter.text.chars().count(), "Chapter");
        }
    }

    info!(
        parts = document.parts.len(),
        chapters = document.chapter_count(),
        "Extracted book structure"
    );
}
