//! Cross-reference table and trailer serialization.
//!
//! Entries are fixed-width: `oooooooooo ggggg n \n` is exactly 20 bytes, a
//! byte-exact contract readers rely on to index into the table.

use super::PdfWriter;
use crate::error::Result;
use crate::objects::{Dictionary, Object, ObjectId};
use std::io::Write;

/// Width in bytes of every cross-reference entry, line ending included.
pub const XREF_ENTRY_LEN: usize = 20;

/// Entry 0: head of the free list.
pub const FREE_LIST_HEAD: &[u8; XREF_ENTRY_LEN] = b"0000000000 65535 f \n";

/// Formats one cross-reference entry.
pub fn format_xref_entry(offset: u64, generation: u16, in_use: bool) -> String {
    let flag = if in_use { 'n' } else { 'f' };
    format!("{offset:010} {generation:05} {flag} \n")
}

/// Trailer dictionary contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Trailer {
    pub size: u32,
    pub root: ObjectId,
    pub info: Option<ObjectId>,
    pub encrypt: Option<ObjectId>,
}

impl Trailer {
    pub fn new(size: u32, root: ObjectId) -> Self {
        Self {
            size,
            root,
            info: None,
            encrypt: None,
        }
    }

    pub fn with_info(mut self, info: ObjectId) -> Self {
        self.info = Some(info);
        self
    }

    pub fn with_encrypt(mut self, encrypt: ObjectId) -> Self {
        self.encrypt = Some(encrypt);
        self
    }

    fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new()
            .with("Size", self.size)
            .with("Root", self.root);
        if let Some(info) = self.info {
            dict.set("Info", info);
        }
        if let Some(encrypt) = self.encrypt {
            dict.set("Encrypt", encrypt);
        }
        dict
    }
}

impl<W: Write> PdfWriter<W> {
    /// Writes the cross-reference table for every object recorded so far and
    /// returns the offset of the `xref` keyword, the value `startxref` must
    /// carry.
    ///
    /// Object numbers missing from the recorded set are written as free
    /// entries so the table stays contiguous from 0.
    pub fn write_index(&mut self) -> Result<u64> {
        let index_offset = self.position();
        let size = self.index_size();
        let entries = self.offsets().clone();
        tracing::debug!(index_offset, size, "writing cross-reference table");

        self.write_bytes(b"xref\n")?;
        self.write_bytes(format!("0 {size}\n").as_bytes())?;
        self.write_bytes(FREE_LIST_HEAD)?;

        for obj_num in 1..size {
            let entry = match entries.get(&obj_num) {
                Some(&offset) => format_xref_entry(offset, 0, true),
                None => format_xref_entry(0, 0, false),
            };
            self.write_bytes(entry.as_bytes())?;
        }

        Ok(index_offset)
    }

    /// Writes `trailer`, its dictionary, `startxref`, the index offset and
    /// the end-of-file marker.
    pub fn write_trailer(&mut self, trailer: &Trailer, index_offset: u64) -> Result<()> {
        self.write_bytes(b"trailer\n")?;
        self.write_object_value(&Object::Dictionary(trailer.to_dictionary()))?;
        self.write_bytes(b"\nstartxref\n")?;
        self.write_bytes(index_offset.to_string().as_bytes())?;
        self.write_bytes(b"\n%%EOF\n")?;
        Ok(())
    }

    /// Index plus trailer for a document whose catalog is `root`.
    pub fn finish(&mut self, root: ObjectId, info: Option<ObjectId>) -> Result<u64> {
        let index_offset = self.write_index()?;
        let mut trailer = Trailer::new(self.index_size(), root);
        trailer.info = info;
        self.write_trailer(&trailer, index_offset)?;
        self.flush()?;
        Ok(self.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn object(writer: &mut PdfWriter<&mut Vec<u8>>, number: u32) {
        let dict = Dictionary::new().with("N", number);
        writer
            .write_object(ObjectId::object(number), &Object::Dictionary(dict))
            .unwrap();
    }

    #[test]
    fn test_entry_is_twenty_bytes() {
        let entry = format_xref_entry(1234, 0, true);
        assert_eq!(entry, "0000001234 00000 n \n");
        assert_eq!(entry.len(), XREF_ENTRY_LEN);
        assert_eq!(format_xref_entry(0, 65535, false).as_bytes(), FREE_LIST_HEAD);
        assert_eq!(format_xref_entry(9_999_999_999, 7, true).len(), XREF_ENTRY_LEN);
    }

    #[test]
    fn test_write_index_matches_offsets() {
        let mut buffer = Vec::new();
        let mut writer = PdfWriter::new_with_writer(&mut buffer);
        writer.write_raw(b"%PDF-1.4\n").unwrap();
        for n in 1..=3 {
            object(&mut writer, n);
        }
        let offsets = writer.offsets().clone();
        let index_offset = writer.write_index().unwrap();
        drop(writer);

        let table = &buffer[index_offset as usize..];
        let mut expected = String::from("xref\n0 4\n0000000000 65535 f \n");
        for offset in offsets.values() {
            expected.push_str(&format!("{offset:010} 00000 n \n"));
        }
        assert_eq!(String::from_utf8_lossy(table), expected);
        assert_eq!(offsets.get(&1), Some(&9));
    }

    #[test]
    fn test_write_index_fills_gaps_with_free_entries() {
        let mut buffer = Vec::new();
        let mut writer = PdfWriter::new_with_writer(&mut buffer);
        object(&mut writer, 1);
        object(&mut writer, 3);
        let index_offset = writer.write_index().unwrap();
        drop(writer);

        let table = String::from_utf8_lossy(&buffer[index_offset as usize..]).to_string();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[1], "0 4");
        assert_eq!(lines[3], "0000000000 00000 n ");
        assert_eq!(lines[4], "0000000000 00000 f ");
    }

    #[test]
    fn test_write_trailer() {
        let mut buffer = Vec::new();
        let mut writer = PdfWriter::new_with_writer(&mut buffer);
        let trailer = Trailer::new(6, ObjectId::object(1)).with_encrypt(ObjectId::object(5));
        writer.write_trailer(&trailer, 478).unwrap();
        drop(writer);

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "trailer\n<<\n/Size 6\n/Root 1 0 R\n/Encrypt 5 0 R\n>>\nstartxref\n478\n%%EOF\n"
        );
    }

    #[test]
    fn test_finish_points_startxref_at_table() {
        let mut buffer = Vec::new();
        let mut writer = PdfWriter::new_with_writer(&mut buffer);
        writer.write_raw(b"%PDF-1.4\n").unwrap();
        object(&mut writer, 1);
        object(&mut writer, 2);
        let total = writer.finish(ObjectId::object(1), Some(ObjectId::object(2))).unwrap();
        drop(writer);

        assert_eq!(total as usize, buffer.len());
        let text = String::from_utf8_lossy(&buffer).to_string();
        let xref_at = text.find("xref\n").unwrap();
        let startxref: usize = text
            .split("startxref\n")
            .nth(1)
            .and_then(|rest| rest.lines().next())
            .and_then(|n| n.parse().ok())
            .unwrap();
        assert_eq!(startxref, xref_at);
        assert!(text.contains("/Size 3\n/Root 1 0 R\n/Info 2 0 R"));
        assert!(text.ends_with("%%EOF\n"));
    }
}
