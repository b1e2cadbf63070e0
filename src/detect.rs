//! PDF header sniffing, done before the document is handed to the backend.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Header information found at the start of a PDF file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
    /// Byte offset of `%PDF-` within the file
    pub offset: usize,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Readers accept the header anywhere within the first 1024 bytes.
const HEADER_WINDOW: usize = 1024;

/// Sniff the PDF header of a file on disk.
///
/// # Example
/// ```no_run
/// use letterpad::detect::sniff_path;
///
/// let header = sniff_path("letters.pdf").unwrap();
/// println!("PDF version: {}", header.version);
/// ```
pub fn sniff_path<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    let mut head = Vec::with_capacity(HEADER_WINDOW + PDF_MAGIC.len() + VERSION_LEN);
    File::open(path)?
        .take((HEADER_WINDOW + PDF_MAGIC.len() + VERSION_LEN) as u64)
        .read_to_end(&mut head)?;
    sniff_bytes(&head)
}

/// Sniff the PDF header from the leading bytes of a document.
///
/// Returns `Error::UnknownFormat` when no `%PDF-` marker appears in the
/// header window and `Error::UnsupportedVersion` when the version that
/// follows it is not of the form `d.d`.
pub fn sniff_bytes(data: &[u8]) -> Result<PdfHeader> {
    let window = &data[..data.len().min(HEADER_WINDOW + PDF_MAGIC.len())];
    let offset = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let start = offset + PDF_MAGIC.len();
    let version_bytes = data
        .get(start..start + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    match parse_version(&version) {
        Some((1, _)) | Some((2, 0)) => Ok(PdfHeader { version, offset }),
        _ => Err(Error::UnsupportedVersion(version)),
    }
}

/// Split a `d.d` version string into its major and minor digits.
fn parse_version(version: &str) -> Option<(u32, u32)> {
    let mut chars = version.chars();
    let major = chars.next()?.to_digit(10)?;
    if chars.next()? != '.' {
        return None;
    }
    let minor = chars.next()?.to_digit(10)?;
    chars.next().is_none().then_some((major, minor))
}

/// Check if a file looks like a PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    sniff_path(path).is_ok()
}

/// Check if bytes look like a PDF.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    sniff_bytes(data).is_ok()
}
