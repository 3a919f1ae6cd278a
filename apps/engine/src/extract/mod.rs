//! Plain-text extraction from uploaded resumes (PDF and DOCX).
//!
//! The extracted text is what gets fed to the language model, so fidelity of
//! reading order matters more than styling. DOCX tables are flattened
//! row-by-row with cells joined by spaces.

use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};

use crate::errors::EngineError;

/// Extracts plain text from an uploaded file, dispatching on the filename
/// extension. Only `.pdf` and `.docx` are supported.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, EngineError> {
    let lower = filename.to_lowercase();
    if lower.ends_with(".pdf") {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| EngineError::Extract(format!("Failed to read PDF: {e}")))
    } else if lower.ends_with(".docx") {
        docx_text(bytes)
    } else {
        Err(EngineError::Extract(format!(
            "Unsupported file type: '{filename}' (expected .pdf or .docx)"
        )))
    }
}

/// First non-empty line of the extracted text, as a guess at the candidate's
/// name. Returns `"Candidate"` when the text is blank.
pub fn candidate_name(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("Candidate")
        .to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// DOCX walking
// ────────────────────────────────────────────────────────────────────────────

fn docx_text(bytes: &[u8]) -> Result<String, EngineError> {
    let docx =
        read_docx(bytes).map_err(|e| EngineError::Extract(format!("Failed to read DOCX: {e}")))?;

    let mut out = String::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => push_line(&mut out, &paragraph_text(p)),
            DocumentChild::Table(t) => push_table(&mut out, t),
            _ => {}
        }
    }
    Ok(out)
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                if let RunChild::Text(t) = rc {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}

fn push_table(out: &mut String, table: &Table) {
    for TableChild::TableRow(row) in &table.rows {
        let mut cells: Vec<String> = Vec::new();
        for TableRowChild::TableCell(cell) in &row.cells {
            let mut cell_text = String::new();
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(p) => {
                        if !cell_text.is_empty() {
                            cell_text.push(' ');
                        }
                        cell_text.push_str(&paragraph_text(p));
                    }
                    TableCellContent::Table(nested) => push_table(out, nested),
                    _ => {}
                }
            }
            cells.push(cell_text);
        }
        push_line(out, &cells.join(" "));
    }
}

fn push_line(out: &mut String, line: &str) {
    let line = line.trim();
    if !line.is_empty() {
        out.push_str(line);
    }
    out.push('\n');
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
