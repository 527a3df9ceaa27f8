//! PDF format sniffing.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
/// Version digits following the magic, e.g. "1.7".
const VERSION_LEN: usize = 3;

/// Read the PDF header version from a file (e.g. "1.7").
///
/// Returns `Error::UnknownFormat` if the file does not start with a
/// well-formed PDF header.
pub fn sniff_version_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut file = File::open(path)?;
    let mut header = [0u8; 16];
    let read = file.read(&mut header)?;
    sniff_version(&header[..read])
}

/// Read the PDF header version from a byte prefix.
pub fn sniff_version(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    let mut chars = version.chars();
    let well_formed = matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(major), Some('.'), Some(minor))
            if major.is_ascii_digit() && minor.is_ascii_digit()
    );
    if !well_formed {
        return Err(Error::UnknownFormat);
    }

    Ok(version)
}

/// Check whether bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    sniff_version(data).is_ok()
}

/// Check whether a file starts with a valid PDF header.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    sniff_version_from_path(path).is_ok()
}
