//! File type detection

use std::path::Path;
use tokio::io::AsyncReadExt;

const PDF_MAGIC: &[u8] = b"%PDF-";
const SNIFF_BYTES: u64 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "txt" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    /// Detect a PDF by its header; anything else is reported as `Unknown`
    pub fn sniff(bytes: &[u8]) -> Self {
        // Some generators emit a BOM or blank lines before the header
        let head = &bytes[..bytes.len().min(SNIFF_BYTES as usize)];
        if head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC) {
            FileType::Pdf
        } else {
            FileType::Unknown
        }
    }

    /// Sniff a file on disk, reading only its head
    pub async fn sniff_path(path: &Path) -> std::io::Result<Self> {
        let file = tokio::fs::File::open(path).await?;
        let mut head = Vec::with_capacity(SNIFF_BYTES as usize);
        file.take(SNIFF_BYTES).read_to_end(&mut head).await?;
        Ok(Self::sniff(&head))
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            FileType::Pdf => "application/pdf",
            FileType::Text => "text/plain",
            FileType::Markdown => "text/markdown",
            FileType::Unknown => "application/octet-stream",
        }
    }
}
