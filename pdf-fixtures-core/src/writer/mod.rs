//! PDF writing functionality

mod pdf_writer;
mod xref;

pub use pdf_writer::{
    format_number, PdfVersion, PdfWriter, WriterConfig, BINARY_MARKER, PADDING_CHUNK_SIZE,
};
pub use xref::{format_xref_entry, Trailer, FREE_LIST_HEAD, XREF_ENTRY_LEN};
