use crate::document::{DocumentInfo, PageContent, TextDocument, TextLine};
use crate::error::{FixtureError, Result};
use crate::generators::{FixtureGenerator, GenerationSummary};
use crate::layout::{wrap_paragraph, PageGeometry};
use crate::writer::PdfWriter;
use chrono::{DateTime, Utc};
use std::io::Write;

pub const MAX_PAGES: usize = 10_000;

pub const DOCUMENT_TITLE: &str = "Test Document for Page-Aware File Processing";

/// Chapter topics, cycled by page number.
pub const TOPICS: [&str; 20] = [
    "Artificial Intelligence and Machine Learning",
    "Cloud Computing Architecture",
    "Database Design Patterns",
    "Web Development Best Practices",
    "Cybersecurity Fundamentals",
    "Software Testing Strategies",
    "Agile Project Management",
    "Data Science and Analytics",
    "Mobile Application Development",
    "DevOps and CI/CD Pipelines",
    "Microservices Architecture",
    "Blockchain Technology",
    "Internet of Things (IoT)",
    "Virtual and Augmented Reality",
    "Quantum Computing Basics",
    "Natural Language Processing",
    "Computer Vision Applications",
    "Distributed Systems Design",
    "API Design and Documentation",
    "Performance Optimization Techniques",
];

pub fn topic(page: usize) -> &'static str {
    TOPICS[page % TOPICS.len()]
}

/// Strings that appear on content page `page` and on no other page.
pub fn page_markers(page: usize) -> Vec<String> {
    vec![
        format!("PAGE-{page:03}"),
        format!("MARKER-{}", page * 100),
        format!("Point A{page}"),
        format!("Unique ID: {}", page * 999),
    ]
}

enum Block {
    Heading(String),
    Paragraph(String),
    Bullet(String),
}

fn page_blocks(page: usize) -> Vec<Block> {
    let topic = topic(page);
    let id = format!("PAGE-{page:03}");
    vec![
        Block::Heading(format!("Chapter {page}: {topic}")),
        Block::Paragraph(format!(
            "This is page {page} of the test document. Each page contains unique and \
             identifiable content to verify that page-aware file processors correctly \
             extract and separate content by page boundaries."
        )),
        Block::Heading(format!("Page Identifier: {id}")),
        Block::Paragraph(format!(
            "On this page, we discuss {topic}. This topic is essential for understanding \
             modern software development practices and technologies. The content here is \
             designed to be distinct from other pages, making it easy to verify that \
             extraction tools properly maintain page boundaries."
        )),
        Block::Paragraph(format!("Key points for page {page}:")),
        Block::Bullet(format!("Point A{page}: First important concept")),
        Block::Bullet(format!("Point B{page}: Second critical idea")),
        Block::Bullet(format!("Point C{page}: Third essential principle")),
        Block::Paragraph(format!(
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod \
             tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, \
             quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo \
             consequat. Page {page} contains this unique marker: MARKER-{}.",
            page * 100
        )),
        Block::Paragraph(format!(
            "Duis aute irure dolor in reprehenderit in voluptate velit esse cillum dolore \
             eu fugiat nulla pariatur. Excepteur sint occaecat cupidatat non proident, \
             sunt in culpa qui officia deserunt mollit anim id est laborum. Remember, this \
             is page {page}, distinguished by its unique identifier {id}."
        )),
        Block::Heading(format!("Summary for Page {page}:")),
        Block::Paragraph(format!(
            "This page covered fundamental aspects of {topic}. When extracting this \
             document, tools should clearly indicate that this content belongs to page \
             {page}, separate from pages {} and {}.",
            page - 1,
            page + 1
        )),
        Block::Paragraph(format!("End of Page {page} - Unique ID: {}", page * 999)),
    ]
}

/// Turns blocks into display lines, one blank line between blocks except
/// inside a bullet list.
fn layout_blocks(blocks: &[Block], width: usize) -> Vec<TextLine> {
    let mut lines = Vec::new();
    let mut previous_bullet = false;
    for block in blocks {
        let is_bullet = matches!(block, Block::Bullet(_));
        let follows_list_intro = is_bullet && !previous_bullet && !lines.is_empty();
        if !lines.is_empty() && !(is_bullet && previous_bullet) && !follows_list_intro {
            lines.push(TextLine::blank());
        }
        match block {
            Block::Heading(text) => {
                lines.extend(wrap_paragraph(text, width).into_iter().map(TextLine::heading))
            }
            Block::Paragraph(text) => {
                lines.extend(wrap_paragraph(text, width).into_iter().map(TextLine::body))
            }
            Block::Bullet(text) => {
                // Continuation lines hang under the bullet text.
                let wrapped = wrap_paragraph(text, width.saturating_sub(2).max(1));
                for (i, line) in wrapped.into_iter().enumerate() {
                    let prefix = if i == 0 { "- " } else { "  " };
                    lines.push(TextLine::body(format!("{prefix}{line}")));
                }
            }
        }
        previous_bullet = is_bullet;
    }
    lines
}

/// A title page followed by `pages` content pages, each carrying markers
/// that identify it and no other page.
///
/// Every content page starts on a new physical page. Content longer than a
/// page (small geometries) continues on extra physical pages.
#[derive(Debug, Clone)]
pub struct MultipageGenerator {
    pages: usize,
    geometry: PageGeometry,
    title_page: bool,
    creation_date: Option<DateTime<Utc>>,
}

impl MultipageGenerator {
    pub fn new(pages: usize) -> Result<Self> {
        if pages == 0 {
            return Err(FixtureError::invalid("Number of pages must be at least 1"));
        }
        if pages > MAX_PAGES {
            return Err(FixtureError::invalid(format!(
                "Number of pages limit is {MAX_PAGES}, got {pages}"
            )));
        }
        Ok(Self {
            pages,
            geometry: PageGeometry::letter().with_font(11.0, 14.0),
            title_page: true,
            creation_date: None,
        })
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Result<Self> {
        geometry.validate()?;
        self.geometry = geometry;
        Ok(self)
    }

    pub fn without_title_page(mut self) -> Self {
        self.title_page = false;
        self
    }

    /// Stamps the date on the title page and in `/CreationDate`. Without a
    /// date, output is byte-identical across runs.
    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn has_title_page(&self) -> bool {
        self.title_page
    }

    fn title_lines(&self) -> Vec<TextLine> {
        let width = self.geometry.chars_per_line();
        let mut lines: Vec<TextLine> = wrap_paragraph(DOCUMENT_TITLE, width)
            .into_iter()
            .map(TextLine::heading)
            .collect();
        lines.push(TextLine::blank());
        if let Some(date) = self.creation_date {
            lines.push(TextLine::body(format!(
                "Generated on {}",
                date.format("%Y-%m-%d %H:%M:%S")
            )));
        }
        lines.push(TextLine::body(format!("Total Pages: {}", self.pages)));
        lines.push(TextLine::blank());
        let description = "This document contains unique content on each page to test \
                           page-aware extraction capabilities of file processors.";
        lines.extend(wrap_paragraph(description, width).into_iter().map(TextLine::body));
        lines
    }

    fn info(&self) -> DocumentInfo {
        let mut info = DocumentInfo::new()
            .with_title(DOCUMENT_TITLE)
            .with_creator("pdf-fixtures");
        if let Some(date) = self.creation_date {
            info = info.with_creation_date(date);
        }
        info
    }

    /// Lines of content page `page` (1-based), before pagination.
    pub fn content_lines(&self, page: usize) -> Vec<TextLine> {
        layout_blocks(&page_blocks(page), self.geometry.chars_per_line())
    }

    pub fn build_document(&self) -> TextDocument {
        let per_page = self.geometry.lines_per_page().max(1);
        let mut document = TextDocument::new(self.geometry).with_info(self.info());

        let mut add_lines = |lines: Vec<TextLine>| {
            for chunk in lines.chunks(per_page) {
                document.add_page(PageContent {
                    lines: chunk.to_vec(),
                    footer: None,
                });
            }
        };

        if self.title_page {
            add_lines(self.title_lines());
        }
        for page in 1..=self.pages {
            add_lines(self.content_lines(page));
        }

        tracing::debug!(
            content_pages = self.pages,
            physical_pages = document.page_count(),
            "multipage document laid out"
        );
        document
    }
}

impl FixtureGenerator for MultipageGenerator {
    const DEFAULT_FILENAME: &'static str = "multipage_test.pdf";

    fn write_to<W: Write>(&self, output: W) -> Result<GenerationSummary> {
        tracing::info!(pages = self.pages, "generating multipage document");
        let document = self.build_document();
        let mut writer = PdfWriter::new_with_writer(output);
        let bytes_written = document.write(&mut writer)?;
        Ok(GenerationSummary {
            bytes_written,
            pages: document.page_count(),
            words: None,
        })
    }
}
