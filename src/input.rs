//! Document input module: turns an uploaded file into raw text.
//!
//! Plain-text-like files (.txt/.csv/.json/.md, plus anything unrecognised)
//! are read verbatim. PDFs are extracted page by page with pdf-extract.
//! DOCX files are unpacked with zip and their `word/document.xml` parsed
//! with quick-xml. Legacy binary .doc files are not a zip container and
//! fail extraction with a user-visible error.

use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to process PDF file ({0}); ensure the file is not corrupt or password protected")]
    PdfError(String),
    #[error("failed to process DOC file ({0})")]
    DocError(String),
}

/// Read a document file into raw text, dispatching on its extension.
pub fn read_document(path: &Path) -> Result<String, InputError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => read_pdf(path),
        "doc" | "docx" => read_docx(path),
        // .txt/.csv/.json/.md and anything else: read verbatim as text
        _ => Ok(std::fs::read_to_string(path)?),
    }
}

/// Extract text from a PDF, page by page.
///
/// Within a page, text fragments are normalised to single-space separation
/// (whitespace-only fragments disappear in the process); pages are joined
/// with a newline. A corrupt or password-protected file yields an error and
/// no partial text.
fn read_pdf(path: &Path) -> Result<String, InputError> {
    let pages = pdf_extract::extract_text_by_pages(path)
        .map_err(|e| InputError::PdfError(e.to_string()))?;

    let text = pages
        .iter()
        .map(|page| page.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(text.trim().to_string())
}

/// Extract raw text from a word-processor document.
fn read_docx(path: &Path) -> Result<String, InputError> {
    let file = std::fs::File::open(path)?;
    extract_docx_text(file)
}

/// Pull the text nodes out of a DOCX archive's `word/document.xml`,
/// emitting a newline at each paragraph boundary.
fn extract_docx_text<R: Read + Seek>(reader: R) -> Result<String, InputError> {
    let mut archive =
        zip::ZipArchive::new(reader).map_err(|e| InputError::DocError(e.to_string()))?;
    let document = archive
        .by_name("word/document.xml")
        .map_err(|e| InputError::DocError(e.to_string()))?;

    let mut xml = Reader::from_reader(BufReader::new(document));
    let mut buf = Vec::new();
    let mut text = String::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Text(t)) => {
                let fragment = t
                    .xml_content()
                    .map_err(|e| InputError::DocError(e.to_string()))?;
                text.push_str(&fragment);
            }
            // quick-xml emits entity references as their own events; resolve
            // them back into the characters they stand for
            Ok(Event::GeneralRef(r)) => {
                if let Some(ch) = r
                    .resolve_char_ref()
                    .map_err(|e| InputError::DocError(e.to_string()))?
                {
                    text.push(ch);
                } else {
                    let name = r
                        .xml_content()
                        .map_err(|e| InputError::DocError(e.to_string()))?;
                    if let Some(resolved) = resolve_xml_entity(&name) {
                        text.push_str(resolved);
                    }
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:p" => text.push('\n'),
            Ok(Event::Eof) => break,
            Err(e) => return Err(InputError::DocError(e.to_string())),
            Ok(_) => {}
        }
        buf.clear();
    }

    Ok(text.trim().to_string())
}
