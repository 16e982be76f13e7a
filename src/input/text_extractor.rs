//! Text extraction from various file formats

use crate::error::{CareerLensError, Result};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            CareerLensError::ExtractionFailure(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })?;
        Ok(text)
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        self.extract_from_bytes(&bytes).map_err(|e| match e {
            CareerLensError::ExtractionFailure(msg) => CareerLensError::ExtractionFailure(
                format!("Failed to extract text from DOCX '{}': {}", path.display(), msg),
            ),
            other => other,
        })
    }
}

impl DocxExtractor {
    /// Pull paragraph text out of the `word/document.xml` part of a DOCX archive
    pub fn extract_from_bytes(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| CareerLensError::ExtractionFailure(format!("not a DOCX archive: {}", e)))?;

        let mut document_xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| CareerLensError::ExtractionFailure(format!("missing document body: {}", e)))?
            .read_to_string(&mut document_xml)
            .map_err(|e| CareerLensError::ExtractionFailure(format!("unreadable document body: {}", e)))?;

        self.xml_to_text(&document_xml)
    }

    fn xml_to_text(&self, xml: &str) -> Result<String> {
        let text = xml
            .replace("</w:p>", "\n")
            .replace("<w:tab/>", "\t")
            .replace("<w:br/>", "\n");

        let re = Regex::new(r"<[^>]*>")
            .map_err(|e| CareerLensError::ExtractionFailure(e.to_string()))?;
        let stripped = re.replace_all(&text, "");

        let lines: Vec<String> = decode_entities(&stripped)
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}

async fn read_utf8(path: &Path) -> Result<String> {
    fs::read_to_string(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => CareerLensError::ExtractionFailure(format!(
            "Text file '{}' is not valid UTF-8",
            path.display()
        )),
        _ => CareerLensError::Io(e),
    })
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        read_utf8(path).await
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = read_utf8(path).await?;
        self.markdown_to_text(&markdown_content)
    }
}

impl MarkdownExtractor {
    pub fn markdown_to_text(&self, markdown: &str) -> Result<String> {
        let parser = Parser::new(markdown);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        self.html_to_text(&html_output)
    }

    fn html_to_text(&self, html: &str) -> Result<String> {
        let text = html
            .replace("<br>", "\n")
            .replace("<br />", "\n")
            .replace("</p>", "\n\n")
            .replace("</li>", "\n");

        let re = Regex::new(r"<[^>]*>")
            .map_err(|e| CareerLensError::ExtractionFailure(e.to_string()))?;
        let clean_text = re.replace_all(&text, "");

        let lines: Vec<String> = decode_entities(&clean_text)
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
