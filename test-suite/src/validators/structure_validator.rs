//! Strict structural validation of a complete PDF file.
//!
//! The file is read the way a conforming reader would: header, end marker,
//! `startxref`, cross-reference table, trailer, then every object through
//! its table offset. Nothing is recovered by scanning, so any offset that
//! is off by one byte fails validation.

use crate::parser::{extract_text_lines, parse_value, Dictionary, Lexer, ObjectRef, Token, Value};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Width of one cross-reference entry, line ending included.
const XREF_ENTRY_LEN: usize = 20;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported PDF version {0}")]
    UnsupportedVersion(String),

    #[error("unexpected end of file at byte {position}")]
    UnexpectedEof { position: usize },

    #[error("invalid xref at byte {offset}: {reason}")]
    InvalidXRef { offset: usize, reason: String },

    #[error("invalid trailer: {0}")]
    InvalidTrailer(String),

    #[error("object {number} is invalid: {reason}")]
    InvalidObject { number: u32, reason: String },

    #[error("unsupported encryption: {0}")]
    UnsupportedEncryption(String),

    #[error("stream length mismatch in object {number}: /Length {declared} but the data runs {actual} bytes")]
    StreamLengthMismatch {
        number: u32,
        declared: i64,
        actual: usize,
    },

    #[error("reference {reference} in object {from} does not resolve")]
    InvalidReference { from: u32, reference: ObjectRef },

    #[error("invalid page tree: {0}")]
    InvalidPageTree(String),
}

impl ValidationError {
    /// Kind name, as used by fixture manifests.
    pub fn error_type(&self) -> &'static str {
        match self {
            ValidationError::InvalidHeader(_) => "InvalidHeader",
            ValidationError::UnsupportedVersion(_) => "UnsupportedVersion",
            ValidationError::UnexpectedEof { .. } => "UnexpectedEof",
            ValidationError::InvalidXRef { .. } => "InvalidXRef",
            ValidationError::InvalidTrailer(_) => "InvalidTrailer",
            ValidationError::InvalidObject { .. } => "InvalidObject",
            ValidationError::UnsupportedEncryption(_) => "UnsupportedEncryption",
            ValidationError::StreamLengthMismatch { .. } => "StreamLengthMismatch",
            ValidationError::InvalidReference { .. } => "InvalidReference",
            ValidationError::InvalidPageTree(_) => "InvalidPageTree",
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Text shown on one page, one entry per text-showing operator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageText {
    pub lines: Vec<String>,
}

impl PageText {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Whether any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }

    /// Whether `token` appears as a whole whitespace-separated word.
    pub fn contains_word(&self, token: &str) -> bool {
        self.lines
            .iter()
            .any(|line| line.split_whitespace().any(|word| word == token))
    }
}

/// Everything a successful validation learned about the file.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDocument {
    pub version: String,
    pub file_size: usize,
    pub object_count: usize,
    pub pages: Vec<PageText>,
    /// Problems tolerated in lenient mode.
    pub warnings: Vec<ValidationError>,
}

impl ValidatedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// One-based page lookup.
    pub fn page(&self, number: usize) -> Option<&PageText> {
        number.checked_sub(1).and_then(|index| self.pages.get(index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct XrefEntry {
    offset: usize,
    generation: u16,
    in_use: bool,
}

#[derive(Debug, Clone)]
struct LoadedObject {
    value: Value,
    stream: Option<(usize, usize)>,
}

impl LoadedObject {
    fn stream_data<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
        self.stream.map(|(start, len)| &data[start..start + len])
    }
}

/// Checks a file against the structural rules fixtures must follow.
#[derive(Debug, Clone, Default)]
pub struct StructureValidator {
    lenient_version: bool,
}

impl StructureValidator {
    /// Rejects anything outside the rules, unknown versions included.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Accepts an unknown header version and reports it as a warning.
    pub fn lenient() -> Self {
        Self {
            lenient_version: true,
        }
    }

    pub fn validate_file(&self, path: impl AsRef<Path>) -> anyhow::Result<ValidatedDocument> {
        let data = std::fs::read(path.as_ref())?;
        Ok(self.validate(&data)?)
    }

    pub fn validate(&self, data: &[u8]) -> ValidationResult<ValidatedDocument> {
        let mut warnings = Vec::new();

        let version = read_header(data)?;
        if !is_supported_version(&version) {
            let problem = ValidationError::UnsupportedVersion(version.clone());
            if !self.lenient_version {
                return Err(problem);
            }
            tracing::warn!(%version, "accepting unsupported header version");
            warnings.push(problem);
        }

        check_end_marker(data)?;
        let xref_offset = read_startxref(data)?;
        let (entries, trailer_start) = read_xref_table(data, xref_offset)?;
        let trailer = read_trailer(data, trailer_start, entries.len())?;

        let mut document = Document {
            data,
            entries,
            cache: BTreeMap::new(),
        };
        document.check_introducers()?;

        if let Some(encrypt) = trailer.get("Encrypt") {
            let dict = document.resolve_dict(encrypt, 0)?;
            return Err(check_encryption(&dict));
        }

        document.load_all()?;
        document.check_references()?;

        let root = trailer
            .get("Root")
            .and_then(Value::as_reference)
            .ok_or_else(|| ValidationError::InvalidTrailer("/Root is not a reference".into()))?;
        let pages = document.page_texts(root)?;

        tracing::debug!(
            %version,
            pages = pages.len(),
            objects = document.cache.len(),
            "document validated"
        );

        Ok(ValidatedDocument {
            version,
            file_size: data.len(),
            object_count: document.cache.len(),
            pages,
            warnings,
        })
    }
}

/// Supported header versions: 1.0 through 1.7 and 2.0.
pub fn is_supported_version(version: &str) -> bool {
    let Some((major, minor)) = version.split_once('.') else {
        return false;
    };
    matches!(
        (major.parse::<u8>(), minor.parse::<u8>()),
        (Ok(1), Ok(0..=7)) | (Ok(2), Ok(0))
    )
}

fn read_header(data: &[u8]) -> ValidationResult<String> {
    let rest = data
        .strip_prefix(b"%PDF-")
        .ok_or_else(|| ValidationError::InvalidHeader("file does not start with %PDF-".into()))?;
    let end = rest
        .iter()
        .position(|&b| b == b'\n' || b == b'\r')
        .ok_or(ValidationError::UnexpectedEof {
            position: data.len(),
        })?;
    let version = std::str::from_utf8(&rest[..end])
        .map_err(|_| ValidationError::InvalidHeader("version is not text".into()))?
        .trim()
        .to_string();

    let well_formed = version
        .split_once('.')
        .map(|(major, minor)| {
            !major.is_empty()
                && !minor.is_empty()
                && major.bytes().all(|b| b.is_ascii_digit())
                && minor.bytes().all(|b| b.is_ascii_digit())
        })
        .unwrap_or(false);
    if !well_formed {
        return Err(ValidationError::InvalidHeader(format!(
            "malformed version '{version}'"
        )));
    }
    Ok(version)
}

fn check_end_marker(data: &[u8]) -> ValidationResult<()> {
    let trimmed_len = data
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |last| last + 1);
    if data[..trimmed_len].ends_with(b"%%EOF") {
        Ok(())
    } else {
        Err(ValidationError::UnexpectedEof {
            position: data.len(),
        })
    }
}

fn read_startxref(data: &[u8]) -> ValidationResult<usize> {
    let keyword = data
        .windows(b"startxref".len())
        .rposition(|window| window == b"startxref")
        .ok_or_else(|| ValidationError::InvalidXRef {
            offset: data.len(),
            reason: "no startxref keyword".into(),
        })?;

    let mut lexer = Lexer::at(data, keyword + b"startxref".len());
    match lexer.next_token() {
        Ok(Token::Integer(offset)) if offset >= 0 => {
            usize::try_from(offset).map_err(|_| ValidationError::InvalidXRef {
                offset: keyword,
                reason: format!("startxref offset {offset} is out of range"),
            })
        }
        _ => Err(ValidationError::InvalidXRef {
            offset: keyword,
            reason: "startxref is not followed by an offset".into(),
        }),
    }
}

fn parse_fixed_digits<T: std::str::FromStr>(bytes: &[u8]) -> Option<T> {
    if !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

fn parse_entry(entry: &[u8]) -> Option<XrefEntry> {
    let offset = parse_fixed_digits::<usize>(&entry[0..10])?;
    let generation = parse_fixed_digits::<u16>(&entry[11..16])?;
    let in_use = match entry[17] {
        b'n' => true,
        b'f' => false,
        _ => return None,
    };
    let separators = entry[10] == b' ' && entry[16] == b' ';
    let ending = matches!(&entry[18..20], b" \n" | b" \r" | b"\r\n");
    (separators && ending).then_some(XrefEntry {
        offset,
        generation,
        in_use,
    })
}

/// Reads every subsection of the table at `offset`. Returns the entries
/// indexed by object number and the position of the `trailer` keyword.
fn read_xref_table(
    data: &[u8],
    offset: usize,
) -> ValidationResult<(BTreeMap<u32, XrefEntry>, usize)> {
    let invalid = |at: usize, reason: String| ValidationError::InvalidXRef { offset: at, reason };

    if !data.get(offset..).is_some_and(|rest| rest.starts_with(b"xref")) {
        return Err(invalid(
            offset,
            "startxref does not point at an xref keyword".into(),
        ));
    }

    let mut lexer = Lexer::at(data, offset + b"xref".len());
    let mut entries = BTreeMap::new();

    loop {
        lexer.skip_whitespace();
        let subsection_at = lexer.position();
        let (first, count) = match (lexer.next_token(), lexer.next_token()) {
            (Ok(Token::Keyword(word)), _) if word == "trailer" => {
                return Ok((entries, subsection_at));
            }
            (Ok(Token::Integer(first)), Ok(Token::Integer(count))) if first >= 0 && count >= 0 => {
                (first as u64, count as usize)
            }
            _ => {
                return Err(invalid(
                    subsection_at,
                    "expected a subsection header or 'trailer'".into(),
                ))
            }
        };

        lexer.skip_whitespace();
        let mut position = lexer.position();
        for index in 0..count {
            let number = u32::try_from(first + index as u64)
                .map_err(|_| invalid(position, "object number out of range".into()))?;
            let entry = data
                .get(position..position + XREF_ENTRY_LEN)
                .ok_or(ValidationError::UnexpectedEof {
                    position: data.len(),
                })?;
            let parsed = parse_entry(entry)
                .ok_or_else(|| invalid(position, format!("malformed entry for object {number}")))?;
            if number == 0 && (parsed.in_use || parsed.generation != 65535) {
                return Err(invalid(
                    position,
                    "entry 0 must head the free list".into(),
                ));
            }
            entries.insert(number, parsed);
            position += XREF_ENTRY_LEN;
        }
        lexer.seek(position);
    }
}

fn read_trailer(data: &[u8], start: usize, entry_count: usize) -> ValidationResult<Dictionary> {
    let mut lexer = Lexer::at(data, start + b"trailer".len());
    let trailer = match parse_value(&mut lexer) {
        Ok(Value::Dictionary(dict)) => dict,
        Ok(_) => return Err(ValidationError::InvalidTrailer("not a dictionary".into())),
        Err(err) => return Err(ValidationError::InvalidTrailer(err.to_string())),
    };

    match trailer.get("Size").and_then(Value::as_integer) {
        Some(size) if size == entry_count as i64 => {}
        Some(size) => {
            return Err(ValidationError::InvalidTrailer(format!(
                "/Size {size} but the table has {entry_count} entries"
            )))
        }
        None => return Err(ValidationError::InvalidTrailer("missing /Size".into())),
    }
    if trailer.get("Root").and_then(Value::as_reference).is_none() {
        return Err(ValidationError::InvalidTrailer("missing /Root".into()));
    }
    Ok(trailer)
}

/// Describes why an encryption dictionary cannot be handled. Fixtures are
/// never decrypted, so every encrypted file ends up here.
fn check_encryption(dict: &Dictionary) -> ValidationError {
    let filter = dict.get("Filter").and_then(Value::as_name).unwrap_or("none");
    if filter != "Standard" {
        return ValidationError::UnsupportedEncryption(format!("security handler /{filter}"));
    }

    let v = dict.get("V").and_then(Value::as_integer).unwrap_or(0);
    let r = dict.get("R").and_then(Value::as_integer).unwrap_or(0);
    let length = dict.get("Length").and_then(Value::as_integer);

    let valid_length = match (v, length) {
        (1, None | Some(40)) => true,
        (2 | 3, None) => true,
        (2 | 3, Some(bits)) => (40..=128).contains(&bits) && bits % 8 == 0,
        (4, None | Some(128)) => true,
        (5, None | Some(256)) => true,
        _ => false,
    };

    match length {
        Some(bits) if !valid_length => ValidationError::UnsupportedEncryption(format!(
            "key length {bits} bits with /V {v} /R {r}"
        )),
        _ => ValidationError::UnsupportedEncryption(format!(
            "standard handler /V {v} /R {r} is not decrypted by this validator"
        )),
    }
}

struct Document<'a> {
    data: &'a [u8],
    entries: BTreeMap<u32, XrefEntry>,
    cache: BTreeMap<u32, LoadedObject>,
}

impl<'a> Document<'a> {
    fn in_use(&self) -> impl Iterator<Item = (u32, XrefEntry)> + '_ {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.in_use)
            .map(|(&number, &entry)| (number, entry))
    }

    /// Every in-use entry must land exactly on `number generation obj`.
    fn check_introducers(&self) -> ValidationResult<()> {
        for (number, entry) in self.in_use() {
            let mut lexer = Lexer::at(self.data, entry.offset);
            let found = (lexer.next_token(), lexer.next_token(), lexer.next_token());
            let matches = matches!(
                &found,
                (Ok(Token::Integer(n)), Ok(Token::Integer(g)), Ok(Token::Keyword(kw)))
                    if *n == i64::from(number) && *g == i64::from(entry.generation) && kw == "obj"
            );
            let starts_on_token = entry.offset == 0
                || self
                    .data
                    .get(entry.offset - 1)
                    .is_some_and(|b| b.is_ascii_whitespace());
            if !matches || !starts_on_token {
                return Err(ValidationError::InvalidXRef {
                    offset: entry.offset,
                    reason: format!(
                        "entry for object {number} does not point at '{number} {} obj'",
                        entry.generation
                    ),
                });
            }
        }
        Ok(())
    }

    fn load_all(&mut self) -> ValidationResult<()> {
        let numbers: Vec<u32> = self.in_use().map(|(number, _)| number).collect();
        for number in numbers {
            self.load(number, true)?;
        }
        Ok(())
    }

    fn entry(&self, reference: ObjectRef, from: u32) -> ValidationResult<XrefEntry> {
        self.entries
            .get(&reference.number)
            .copied()
            .filter(|entry| entry.in_use && entry.generation == reference.generation)
            .ok_or(ValidationError::InvalidReference { from, reference })
    }

    fn load(&mut self, number: u32, allow_stream: bool) -> ValidationResult<&LoadedObject> {
        if !self.cache.contains_key(&number) {
            let object = self.parse_object(number, allow_stream)?;
            self.cache.insert(number, object);
        }
        self.cache
            .get(&number)
            .ok_or(ValidationError::InvalidObject {
                number,
                reason: "not loaded".into(),
            })
    }

    fn parse_object(&mut self, number: u32, allow_stream: bool) -> ValidationResult<LoadedObject> {
        let invalid = |reason: String| ValidationError::InvalidObject { number, reason };
        let entry = self
            .entries
            .get(&number)
            .copied()
            .filter(|entry| entry.in_use)
            .ok_or_else(|| invalid("no in-use xref entry".into()))?;

        let data = self.data;
        let mut lexer = Lexer::at(data, entry.offset);
        for _ in 0..3 {
            lexer.next_token().map_err(|err| invalid(err.to_string()))?;
        }
        let value = parse_value(&mut lexer).map_err(|err| invalid(err.to_string()))?;

        match lexer.next_token().map_err(|err| invalid(err.to_string()))? {
            Token::Keyword(word) if word == "endobj" => Ok(LoadedObject {
                value,
                stream: None,
            }),
            Token::Keyword(word) if word == "stream" => {
                if !allow_stream {
                    return Err(invalid("stream used as a /Length value".into()));
                }
                let dict = value
                    .as_dict()
                    .ok_or_else(|| invalid("stream without a dictionary".into()))?;
                let declared = match dict.get("Length") {
                    Some(Value::Integer(length)) => *length,
                    Some(Value::Reference(reference)) => {
                        let reference = *reference;
                        self.entry(reference, number)?;
                        self.load(reference.number, false)?
                            .value
                            .as_integer()
                            .ok_or_else(|| invalid("/Length is not an integer".into()))?
                    }
                    _ => return Err(invalid("stream without /Length".into())),
                };
                let start = stream_data_start(data, lexer.position())
                    .ok_or_else(|| invalid("'stream' not followed by an end of line".into()))?;
                let length = check_stream_length(data, number, start, declared)?;

                let mut lexer = Lexer::at(data, start + length);
                match (lexer.next_token(), lexer.next_token()) {
                    (Ok(Token::Keyword(end)), Ok(Token::Keyword(obj)))
                        if end == "endstream" && obj == "endobj" =>
                    {
                        Ok(LoadedObject {
                            value,
                            stream: Some((start, length)),
                        })
                    }
                    _ => Err(invalid("stream object is not closed by endobj".into())),
                }
            }
            other => Err(invalid(format!("expected endobj, found {other:?}"))),
        }
    }

    fn check_references(&self) -> ValidationResult<()> {
        for (&number, object) in &self.cache {
            for reference in object.value.references() {
                self.entry(reference, number)?;
            }
        }
        Ok(())
    }

    fn resolve_dict(&mut self, value: &Value, from: u32) -> ValidationResult<Dictionary> {
        match value {
            Value::Dictionary(dict) => Ok(dict.clone()),
            Value::Reference(reference) => {
                self.entry(*reference, from)?;
                let object = self.load(reference.number, true)?;
                object
                    .value
                    .as_dict()
                    .cloned()
                    .ok_or(ValidationError::InvalidObject {
                        number: reference.number,
                        reason: "expected a dictionary".into(),
                    })
            }
            _ => Err(ValidationError::InvalidObject {
                number: from,
                reason: "expected a dictionary or reference".into(),
            }),
        }
    }

    fn cached_dict(&self, reference: ObjectRef, from: u32) -> ValidationResult<&Dictionary> {
        self.entry(reference, from)?;
        self.cache
            .get(&reference.number)
            .and_then(|object| object.value.as_dict())
            .ok_or(ValidationError::InvalidObject {
                number: reference.number,
                reason: "expected a dictionary".into(),
            })
    }

    fn page_texts(&self, root: ObjectRef) -> ValidationResult<Vec<PageText>> {
        let catalog = self.cached_dict(root, 0)?;
        if catalog.get("Type").and_then(Value::as_name) != Some("Catalog") {
            return Err(ValidationError::InvalidPageTree(
                "/Root is not a /Catalog".into(),
            ));
        }
        let pages_root = catalog
            .get("Pages")
            .and_then(Value::as_reference)
            .ok_or_else(|| ValidationError::InvalidPageTree("catalog has no /Pages".into()))?;

        let mut pages = Vec::new();
        let mut visited = HashSet::new();
        self.walk_pages(pages_root, None, &mut visited, &mut pages)?;
        Ok(pages)
    }

    fn walk_pages(
        &self,
        node: ObjectRef,
        parent: Option<ObjectRef>,
        visited: &mut HashSet<ObjectRef>,
        pages: &mut Vec<PageText>,
    ) -> ValidationResult<usize> {
        let tree_error = ValidationError::InvalidPageTree;
        if !visited.insert(node) {
            return Err(tree_error(format!("{node} appears twice")));
        }
        let dict = self.cached_dict(node, parent.map_or(0, |p| p.number))?;
        let declared_parent = dict.get("Parent").and_then(Value::as_reference);
        if declared_parent != parent {
            return Err(tree_error(format!("{node} has the wrong /Parent")));
        }

        match dict.get("Type").and_then(Value::as_name) {
            Some("Pages") => {
                let kids = dict
                    .get("Kids")
                    .and_then(Value::as_array)
                    .ok_or_else(|| tree_error(format!("{node} has no /Kids array")))?;
                let mut leaves = 0;
                for kid in kids {
                    let kid = kid
                        .as_reference()
                        .ok_or_else(|| tree_error(format!("{node} has a direct kid")))?;
                    leaves += self.walk_pages(kid, Some(node), visited, pages)?;
                }
                let count = dict.get("Count").and_then(Value::as_integer);
                if count != Some(leaves as i64) {
                    return Err(tree_error(format!(
                        "{node} declares /Count {count:?} but holds {leaves} pages"
                    )));
                }
                Ok(leaves)
            }
            Some("Page") => {
                self.check_media_box(node, dict)?;
                pages.push(self.page_text(node, dict)?);
                Ok(1)
            }
            other => Err(tree_error(format!("{node} has /Type {other:?}"))),
        }
    }

    fn check_media_box(&self, node: ObjectRef, page: &Dictionary) -> ValidationResult<()> {
        let valid = page
            .get("MediaBox")
            .and_then(Value::as_array)
            .map(|corners| {
                corners.len() == 4
                    && corners.iter().all(|c| c.as_number().is_some())
                    && corners[2].as_number() > corners[0].as_number()
                    && corners[3].as_number() > corners[1].as_number()
            })
            .unwrap_or(false);
        if valid {
            Ok(())
        } else {
            Err(ValidationError::InvalidPageTree(format!(
                "{node} has no usable /MediaBox"
            )))
        }
    }

    fn page_text(&self, node: ObjectRef, page: &Dictionary) -> ValidationResult<PageText> {
        let streams: Vec<ObjectRef> = match page.get("Contents") {
            Some(Value::Reference(reference)) => vec![*reference],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_reference).collect(),
            None => Vec::new(),
            Some(_) => {
                return Err(ValidationError::InvalidPageTree(format!(
                    "{node} has direct /Contents"
                )))
            }
        };

        let mut lines = Vec::new();
        for reference in streams {
            self.entry(reference, node.number)?;
            let data = self
                .cache
                .get(&reference.number)
                .and_then(|object| object.stream_data(self.data))
                .ok_or(ValidationError::InvalidObject {
                    number: reference.number,
                    reason: "page contents are not a stream".into(),
                })?;
            let extracted =
                extract_text_lines(data).map_err(|err| ValidationError::InvalidObject {
                    number: reference.number,
                    reason: err.to_string(),
                })?;
            lines.extend(extracted);
        }
        Ok(PageText { lines })
    }
}

/// Position of the first payload byte after the `stream` keyword, which
/// must be followed by CRLF or LF.
fn stream_data_start(data: &[u8], after_keyword: usize) -> Option<usize> {
    let rest = data.get(after_keyword..)?;
    if rest.starts_with(b"\r\n") {
        Some(after_keyword + 2)
    } else if rest.starts_with(b"\n") {
        Some(after_keyword + 1)
    } else {
        None
    }
}

const STREAM_CLOSINGS: [&[u8]; 4] = [
    b"endstream",
    b"\nendstream",
    b"\r\nendstream",
    b"\rendstream",
];

/// Verifies that `endstream` follows the declared payload, allowing one end
/// of line in between, and returns the payload length.
fn check_stream_length(
    data: &[u8],
    number: u32,
    start: usize,
    declared: i64,
) -> ValidationResult<usize> {
    let fits = usize::try_from(declared)
        .ok()
        .filter(|&length| {
            let tail = start
                .checked_add(length)
                .and_then(|end| data.get(end..))
                .unwrap_or_default();
            STREAM_CLOSINGS.iter().any(|closing| tail.starts_with(closing))
        });
    if let Some(length) = fits {
        return Ok(length);
    }

    let actual = data
        .get(start..)
        .unwrap_or_default()
        .windows(b"endstream".len())
        .position(|window| window == b"endstream")
        .ok_or(ValidationError::InvalidObject {
            number,
            reason: "stream has no endstream".into(),
        })?;
    let payload = &data[start..start + actual];
    let trimmed = payload
        .strip_suffix(b"\r\n")
        .or_else(|| payload.strip_suffix(b"\n"))
        .or_else(|| payload.strip_suffix(b"\r"))
        .unwrap_or(payload);
    Err(ValidationError::StreamLengthMismatch {
        number,
        declared,
        actual: trimmed.len(),
    })
}
