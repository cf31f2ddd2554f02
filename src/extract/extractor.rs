//! Document-to-text extraction using pdftotext and Tesseract.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;
use thiserror::Error;

/// Longest edge allowed for OCR input images, in pixels. Larger uploads
/// are downscaled before Tesseract sees them.
const MAX_IMAGE_EDGE: u32 = 1800;

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The file parsed, but produced no text. Distinct from
    /// [`ExtractionError::ExtractionFailed`]: a scanned PDF with no OCR
    /// layer lands here, a corrupt file does not.
    #[error("No text found in document")]
    EmptyDocument,

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle command output, extracting stdout on success or returning an
/// appropriate error.
fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, ExtractionError> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ExtractionError::ExtractionFailed(format!(
                    "{}: {}",
                    error_prefix, stderr
                )))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ExtractionError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(ExtractionError::Io(e)),
    }
}

/// Text extractor for uploaded documents.
///
/// Uploaded bytes are materialized only inside a scoped temp directory
/// whose lifetime is one `extract` call; Drop removes it on every exit
/// path, including panics in the underlying decoders.
pub struct TextExtractor {
    /// Tesseract language setting.
    tesseract_lang: String,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self {
            tesseract_lang: "eng".to_string(),
        }
    }
}

impl TextExtractor {
    /// Create a new text extractor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Tesseract language.
    pub fn with_language(mut self, lang: &str) -> Self {
        self.tesseract_lang = lang.to_string();
        self
    }

    /// Extract text from an uploaded file, dispatching on its extension
    /// (case-insensitive).
    pub fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let text = match extension.as_str() {
            "pdf" => self.extract_pdf(bytes)?,
            "png" | "jpg" | "jpeg" | "tiff" => self.extract_image(bytes)?,
            "txt" => String::from_utf8_lossy(bytes).into_owned(),
            _ => {
                let shown = if extension.is_empty() {
                    file_name.to_string()
                } else {
                    format!(".{extension}")
                };
                return Err(ExtractionError::UnsupportedFormat(shown));
            }
        };

        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }
        Ok(text)
    }

    /// Extract a PDF page by page, skipping pages without a text layer.
    fn extract_pdf(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let scratch = TempDir::new()?;
        let pdf_path = scratch.path().join("upload.pdf");
        std::fs::write(&pdf_path, bytes)?;

        let page_count = pdf_page_count(&pdf_path).unwrap_or(1);

        let mut pages: Vec<String> = Vec::with_capacity(page_count as usize);
        for page in 1..=page_count {
            match pdf_page_text(&pdf_path, page) {
                Ok(text) if !text.trim().is_empty() => pages.push(text.trim_end().to_string()),
                // Pages without extractable text are skipped, never an error.
                Ok(_) => {}
                Err(e @ ExtractionError::ToolNotFound(_)) => return Err(e),
                Err(e) => {
                    tracing::debug!("pdftotext failed on page {page}: {e}");
                }
            }
        }

        Ok(pages.join("\n"))
    }

    /// OCR an uploaded image: normalize to RGB, downscale, run Tesseract.
    fn extract_image(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| ExtractionError::ExtractionFailed(format!("image decode: {e}")))?;

        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut prepared = image::DynamicImage::ImageRgb8(rgb);
        if width.max(height) > MAX_IMAGE_EDGE {
            prepared = prepared.resize(
                MAX_IMAGE_EDGE,
                MAX_IMAGE_EDGE,
                image::imageops::FilterType::Lanczos3,
            );
        }

        let scratch = TempDir::new()?;
        let image_path = scratch.path().join("page.png");
        prepared
            .save(&image_path)
            .map_err(|e| ExtractionError::ExtractionFailed(format!("image encode: {e}")))?;

        self.run_tesseract(&image_path)
    }

    /// Run Tesseract OCR on an image file.
    fn run_tesseract(&self, image_path: &Path) -> Result<String, ExtractionError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.tesseract_lang])
            .output();

        handle_cmd_output(output, "tesseract (install tesseract-ocr)", "tesseract failed")
    }
}

/// Run pdftotext on a single page of a PDF file.
fn pdf_page_text(file_path: &Path, page: u32) -> Result<String, ExtractionError> {
    let page_str = page.to_string();
    let output = Command::new("pdftotext")
        .args(["-layout", "-enc", "UTF-8", "-f", &page_str, "-l", &page_str])
        .arg(file_path)
        .arg("-") // Output to stdout
        .output();

    handle_cmd_output(
        output,
        "pdftotext (install poppler-utils)",
        &format!("pdftotext failed on page {}", page),
    )
}

/// Get the page count of a PDF via pdfinfo.
fn pdf_page_count(file_path: &Path) -> Option<u32> {
    let output = Command::new("pdfinfo").arg(file_path).output().ok()?;

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        if line.starts_with("Pages:") {
            return line.split_whitespace().nth(1).and_then(|s| s.parse().ok());
        }
    }
    None
}

/// Check if a binary is available in PATH.
fn check_binary(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Check whether the required external tools are available.
pub fn check_tools() -> Vec<(String, bool)> {
    ["pdftotext", "pdfinfo", "tesseract"]
        .iter()
        .map(|tool| (tool.to_string(), check_binary(tool)))
        .collect()
}
