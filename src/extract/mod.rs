//! Text extraction from uploaded documents.
//!
//! Extracts text using:
//! - pdftotext (Poppler) for PDF text extraction, page by page
//! - Tesseract OCR for image uploads, after normalization and downscaling
//! - lossy UTF-8 decoding for plain text files
//!
//! Extraction is a one-shot best-effort operation per request; nothing in
//! this module retries.

mod extractor;

pub use extractor::{check_tools, ExtractionError, TextExtractor};
