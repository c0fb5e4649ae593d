//! Assembly of text documents into the catalog → pages → page → content
//! object graph.
//!
//! Objects are numbered in the order they are written: catalog (1), page
//! tree (2), one page object per page (3..), one content stream per page,
//! then the optional info dictionary.

use crate::error::Result;
use crate::layout::PageGeometry;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::text::ContentStream;
use crate::writer::{PdfWriter, WriterConfig};
use chrono::{DateTime, Utc};
use std::io::Write;

pub const CATALOG_ID: ObjectId = ObjectId::object(1);
pub const PAGES_ID: ObjectId = ObjectId::object(2);

/// Distance of the footer baseline from the bottom edge.
const FOOTER_BASELINE: f64 = 30.0;

/// Font resources available to content streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontResource {
    /// `/F1`, Helvetica
    Regular,
    /// `/F2`, Helvetica-Bold
    Bold,
}

impl FontResource {
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontResource::Regular => "F1",
            FontResource::Bold => "F2",
        }
    }

    pub fn base_font(&self) -> &'static str {
        match self {
            FontResource::Regular => "Helvetica",
            FontResource::Bold => "Helvetica-Bold",
        }
    }
}

/// One display line and the font it is set in.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub font: FontResource,
}

impl TextLine {
    pub fn body(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: FontResource::Regular,
        }
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: FontResource::Bold,
        }
    }

    pub fn blank() -> Self {
        Self::body(String::new())
    }
}

/// Lines placed on one physical page plus an optional footer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    pub lines: Vec<TextLine>,
    pub footer: Option<String>,
}

impl PageContent {
    pub fn from_lines(lines: impl IntoIterator<Item = String>) -> Self {
        Self {
            lines: lines.into_iter().map(TextLine::body).collect(),
            footer: None,
        }
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Renders the page's content stream for `geometry`.
    pub fn render(&self, geometry: &PageGeometry) -> Vec<u8> {
        let mut content = ContentStream::new();
        let mut active = FontResource::Regular;
        content
            .begin_text()
            .set_font(active.resource_name(), geometry.font_size)
            .move_text(geometry.margin, geometry.first_baseline());

        let mut baseline = geometry.first_baseline();
        for line in &self.lines {
            if line.font != active {
                active = line.font;
                content.set_font(active.resource_name(), geometry.font_size);
            }
            content
                .show_text(&line.text)
                .move_text(0.0, -geometry.line_height);
            baseline -= geometry.line_height;
        }

        if let Some(footer) = &self.footer {
            if active != FontResource::Regular {
                content.set_font(FontResource::Regular.resource_name(), geometry.font_size);
            }
            content
                .move_text(0.0, FOOTER_BASELINE - baseline)
                .show_text(footer);
        }

        content.end_text();
        content.into_bytes()
    }

    /// Text of every line, footer included.
    pub fn text(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .chain(self.footer.as_deref())
    }
}

/// Document information dictionary entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
}

impl DocumentInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = Some(producer.into());
        self
    }

    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.to_dictionary().is_empty()
    }

    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        let fields = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Keywords", &self.keywords),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                dict.set(key, value.as_str());
            }
        }
        if let Some(date) = self.creation_date {
            dict.set("CreationDate", format_pdf_date(date));
        }
        dict
    }
}

/// Format a DateTime as a PDF date string (D:YYYYMMDDHHmmSSOHH'mm)
pub fn format_pdf_date(date: DateTime<Utc>) -> String {
    let formatted = date.format("D:%Y%m%d%H%M%S");
    // For UTC, the offset is always +00'00
    format!("{formatted}+00'00")
}

pub fn catalog_dict(pages: ObjectId) -> Dictionary {
    Dictionary::new()
        .with("Type", Object::name("Catalog"))
        .with("Pages", pages)
}

pub fn pages_dict(kids: &[ObjectId]) -> Dictionary {
    Dictionary::new()
        .with("Type", Object::name("Pages"))
        .with(
            "Kids",
            kids.iter().copied().map(Object::Reference).collect::<Vec<_>>(),
        )
        .with("Count", kids.len())
}

pub fn font_resources(fonts: &[FontResource]) -> Dictionary {
    let mut font_dict = Dictionary::new();
    for font in fonts {
        font_dict.set(
            font.resource_name(),
            Dictionary::new()
                .with("Type", Object::name("Font"))
                .with("Subtype", Object::name("Type1"))
                .with("BaseFont", Object::name(font.base_font())),
        );
    }
    Dictionary::new().with("Font", font_dict)
}

pub fn media_box(geometry: &PageGeometry) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(geometry.width),
        Object::Real(geometry.height),
    ])
}

pub fn page_dict(
    parent: ObjectId,
    contents: ObjectId,
    geometry: &PageGeometry,
    fonts: &[FontResource],
) -> Dictionary {
    Dictionary::new()
        .with("Type", Object::name("Page"))
        .with("Parent", parent)
        .with("MediaBox", media_box(geometry))
        .with("Resources", font_resources(fonts))
        .with("Contents", contents)
}

/// Object ids of a written document body, needed to finish the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentBody {
    pub root: ObjectId,
    pub info: Option<ObjectId>,
}

/// Multi-page text document.
#[derive(Debug, Clone)]
pub struct TextDocument {
    config: WriterConfig,
    geometry: PageGeometry,
    pages: Vec<PageContent>,
    info: DocumentInfo,
}

impl TextDocument {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            config: WriterConfig::default(),
            geometry,
            pages: Vec::new(),
            info: DocumentInfo::default(),
        }
    }

    pub fn with_config(mut self, config: WriterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_info(mut self, info: DocumentInfo) -> Self {
        self.info = info;
        self
    }

    pub fn add_page(&mut self, page: PageContent) -> &mut Self {
        self.pages.push(page);
        self
    }

    pub fn pages(&self) -> &[PageContent] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len().max(1)
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    fn fonts(&self) -> Vec<FontResource> {
        let uses_bold = self
            .pages
            .iter()
            .flat_map(|page| &page.lines)
            .any(|line| line.font == FontResource::Bold);
        if uses_bold {
            vec![FontResource::Regular, FontResource::Bold]
        } else {
            vec![FontResource::Regular]
        }
    }

    /// Writes header and every object, leaving the index and trailer to the
    /// caller. A document without pages is written with one empty page.
    pub fn write_body<W: Write>(&self, writer: &mut PdfWriter<W>) -> Result<DocumentBody> {
        let empty = [PageContent::default()];
        let pages: &[PageContent] = if self.pages.is_empty() {
            &empty
        } else {
            &self.pages
        };
        let count = pages.len() as u32;
        let first_page = PAGES_ID.number() + 1;
        let page_ids: Vec<ObjectId> = (0..count).map(|i| ObjectId::object(first_page + i)).collect();
        let content_ids: Vec<ObjectId> = (0..count)
            .map(|i| ObjectId::object(first_page + count + i))
            .collect();
        let fonts = self.fonts();

        writer.write_header(&self.config)?;
        writer.write_object(CATALOG_ID, &Object::Dictionary(catalog_dict(PAGES_ID)))?;
        writer.write_object(PAGES_ID, &Object::Dictionary(pages_dict(&page_ids)))?;

        for (page_id, content_id) in page_ids.iter().zip(&content_ids) {
            let dict = page_dict(PAGES_ID, *content_id, &self.geometry, &fonts);
            writer.write_object(*page_id, &Object::Dictionary(dict))?;
        }

        for (page, content_id) in pages.iter().zip(&content_ids) {
            let payload = page.render(&self.geometry);
            writer.write_stream_object(*content_id, Dictionary::new(), &payload)?;
        }

        let info = if self.info.is_empty() {
            None
        } else {
            let info_id = ObjectId::object(first_page + 2 * count);
            writer.write_object(info_id, &Object::Dictionary(self.info.to_dictionary()))?;
            Some(info_id)
        };

        tracing::debug!(pages = count, objects = writer.offsets().len(), "document body written");
        Ok(DocumentBody {
            root: CATALOG_ID,
            info,
        })
    }

    /// Writes the complete document and returns the number of bytes written.
    pub fn write<W: Write>(&self, writer: &mut PdfWriter<W>) -> Result<u64> {
        let body = self.write_body(writer)?;
        writer.finish(body.root, body.info)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        self.write(&mut writer)?;
        Ok(writer.into_inner())
    }
}
