//! Flowed DOCX backend.
//!
//! Emits the same information content as the PDF backend but as a reflowable
//! Word document: no manual pagination, Word lays pages out itself. Styling
//! follows the house template (Calibri body, blue section titles, bulleted
//! duty lists, two-column tables for projects and skills).

use std::io;

use docx_rs::{
    AbstractNumbering, AlignmentType, Docx, Header, IndentLevel, Level, LevelJc, LevelText,
    LineSpacing, NumberFormat, Numbering, NumberingId, Paragraph, Pic, Run, RunFonts, Start,
    Table, TableCell, TableRow, WidthType,
};

use crate::errors::EngineError;
use crate::models::resume::{
    ExperienceEntry, ProjectEntry, Section, SectionContent, SkillRow, StructuredResume,
};
use crate::render::branding::Branding;

// run sizes are half-points
const BODY_SIZE: usize = 24; // 12 pt
const NAME_SIZE: usize = 56; // 28 pt
const DESIGNATION_SIZE: usize = 26; // 13 pt
const CONTACT_SIZE: usize = 19; // 9.5 pt
const SECTION_TITLE_SIZE: usize = 28; // 14 pt

const TITLE_BLUE: &str = "2F5496";
const TEXT_GRAY: &str = "595959";

/// dxa widths of the two table columns (1.5" and 5.5").
const LABEL_COL_DXA: usize = 2160;
const VALUE_COL_DXA: usize = 7920;

const BULLET_NUMBERING_ID: usize = 1;

/// EMU per inch, for picture sizing.
const EMU_PER_INCH: f32 = 914_400.0;
/// Header logo height: half an inch, width follows the aspect ratio.
const LOGO_HEIGHT_IN: f32 = 0.5;

fn docx_err(e: impl std::fmt::Display) -> EngineError {
    EngineError::Render {
        format: "DOCX",
        message: e.to_string(),
    }
}

/// Renders a structured resume to DOCX bytes.
pub fn render(resume: &StructuredResume, branding: &Branding) -> Result<Vec<u8>, EngineError> {
    let mut docx = Docx::new()
        .default_fonts(RunFonts::new().ascii("Calibri"))
        .default_size(BODY_SIZE)
        .add_abstract_numbering(AbstractNumbering::new(BULLET_NUMBERING_ID).add_level(
            Level::new(
                0,
                Start::new(1),
                NumberFormat::new("bullet"),
                LevelText::new("\u{2022}"),
                LevelJc::new("left"),
            ),
        ))
        .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID));

    if let Some(logo) = branding.logo_bytes()? {
        docx = docx.header(logo_header(&logo)?);
    }

    docx = docx.add_paragraph(
        Paragraph::new().add_run(
            Run::new()
                .add_text(resume.candidate_name.as_str())
                .size(NAME_SIZE)
                .fonts(RunFonts::new().ascii("Calibri Light")),
        ),
    );
    docx = docx.add_paragraph(
        Paragraph::new()
            .add_run(
                Run::new()
                    .add_text(resume.designation_line.as_str())
                    .size(DESIGNATION_SIZE)
                    .color(TITLE_BLUE),
            )
            .line_spacing(LineSpacing::new().after(120)),
    );
    for (key, value) in &resume.contact_info {
        docx = docx.add_paragraph(
            Paragraph::new()
                .add_run(
                    Run::new()
                        .add_text(format!("{key}: {value}"))
                        .size(CONTACT_SIZE)
                        .color(TEXT_GRAY),
                )
                .align(AlignmentType::Right),
        );
    }

    for section in &resume.sections {
        docx = add_section(docx, section);
    }

    let mut buf = io::Cursor::new(Vec::new());
    docx.build().pack(&mut buf).map_err(docx_err)?;
    Ok(buf.into_inner())
}

/// Right-aligned logo in the page header, half an inch tall.
fn logo_header(logo_bytes: &[u8]) -> Result<Header, EngineError> {
    let img = image::load_from_memory(logo_bytes).map_err(docx_err)?;
    let (w_px, h_px) = (img.width() as f32, img.height() as f32);
    let height_emu = (LOGO_HEIGHT_IN * EMU_PER_INCH) as u32;
    let width_emu = (LOGO_HEIGHT_IN * (w_px / h_px) * EMU_PER_INCH) as u32;

    let pic = Pic::new(logo_bytes).size(width_emu, height_emu);
    Ok(Header::new().add_paragraph(
        Paragraph::new()
            .add_run(Run::new().add_image(pic))
            .align(AlignmentType::Right),
    ))
}

fn add_section(docx: Docx, section: &Section) -> Docx {
    let docx = docx.add_paragraph(
        Paragraph::new()
            .add_run(
                Run::new()
                    .add_text(section.title.to_uppercase())
                    .size(SECTION_TITLE_SIZE)
                    .bold()
                    .color(TITLE_BLUE)
                    .underline("single"),
            )
            .line_spacing(LineSpacing::new().before(240).after(120)),
    );

    match &section.content {
        SectionContent::Plain(text) => docx.add_paragraph(body_paragraph(text)),
        SectionContent::BulletList(items) => items
            .iter()
            .fold(docx, |d, item| d.add_paragraph(bullet_paragraph(item))),
        SectionContent::Experience(jobs) => jobs.iter().fold(docx, add_experience_entry),
        SectionContent::Projects(projects) => {
            projects.iter().fold(docx, |d, p| add_project_table(d, p))
        }
        SectionContent::Skills(rows) => add_skills_table(docx, rows),
    }
}

fn body_paragraph(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).color(TEXT_GRAY))
}

fn bullet_paragraph(text: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(text).color(TEXT_GRAY))
        .numbering(NumberingId::new(BULLET_NUMBERING_ID), IndentLevel::new(0))
}

fn add_experience_entry(docx: Docx, job: &ExperienceEntry) -> Docx {
    let mut docx = docx.add_paragraph(
        Paragraph::new()
            .add_run(Run::new().add_text(job.job_title.as_str()).bold())
            .line_spacing(LineSpacing::new().before(120)),
    );
    if let Some(company) = &job.company_and_date {
        docx = docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(company.as_str()).italic().color(TEXT_GRAY)),
        );
    }
    job.duties
        .iter()
        .fold(docx, |d, duty| d.add_paragraph(bullet_paragraph(duty)))
}

fn label_cell(label: &str) -> TableCell {
    TableCell::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(label).bold()))
        .width(LABEL_COL_DXA, WidthType::Dxa)
}

fn value_cell(value: &str) -> TableCell {
    TableCell::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(value).color(TEXT_GRAY)))
        .width(VALUE_COL_DXA, WidthType::Dxa)
}

fn two_column_table(rows: Vec<(&str, &str)>) -> Table {
    let rows = rows
        .into_iter()
        .map(|(label, value)| TableRow::new(vec![label_cell(label), value_cell(value)]))
        .collect();
    Table::new(rows).set_grid(vec![LABEL_COL_DXA, VALUE_COL_DXA])
}

/// One table per project; empty optional fields are omitted, matching the
/// fixed-canvas backend.
fn add_project_table(docx: Docx, project: &ProjectEntry) -> Docx {
    let mut rows = vec![("Project Name", project.project_name.as_str())];
    if let Some(description) = non_empty(project.description.as_deref()) {
        rows.push(("Description", description));
    }
    if let Some(tech) = non_empty(project.tech_stack.as_deref()) {
        rows.push(("Tech Stack", tech));
    }
    docx.add_table(two_column_table(rows))
        .add_paragraph(Paragraph::new())
}

fn add_skills_table(docx: Docx, skill_rows: &[SkillRow]) -> Docx {
    if skill_rows.is_empty() {
        return docx;
    }
    let rows = skill_rows
        .iter()
        .map(|row| (row.category.as_str(), row.skills.as_str()))
        .collect();
    docx.add_table(two_column_table(rows))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract;

    fn sample_resume() -> StructuredResume {
        StructuredResume::from_value(serde_json::json!({
            "candidate_name": "Jane Doe",
            "designation_line": "Senior AI Engineer",
            "contact_info": { "email": "jane.doe@example.com" },
            "sections": [
                { "title": "Summary", "content": "Ships reliable ML systems." },
                {
                    "title": "Experience",
                    "content": [{
                        "job_title": "Senior AI Engineer",
                        "company_and_date": "Acme Corp | 2021 - Present",
                        "duties": ["Built X", "Shipped Y"]
                    }]
                },
                {
                    "title": "Projects",
                    "content": [
                        { "project_name": "Project A", "description": "First", "tech_stack": "Rust" },
                        { "project_name": "Project B" }
                    ]
                },
                {
                    "title": "Skills",
                    "content": [{ "category": "Languages", "skills": "Rust, SQL" }]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_render_produces_zip_container() {
        let bytes = render(&sample_resume(), &Branding::plain()).unwrap();
        // DOCX is a zip archive
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_rendered_text_round_trips() {
        let bytes = render(&sample_resume(), &Branding::plain()).unwrap();
        let text = extract::extract_text("resume.docx", &bytes).unwrap();

        for needle in [
            "Jane Doe",
            "Senior AI Engineer",
            "SUMMARY",
            "Built X",
            "Shipped Y",
            "Project A",
            "Rust, SQL",
        ] {
            assert!(text.contains(needle), "missing {needle:?} in extracted text");
        }
    }

    #[test]
    fn test_duty_and_project_order_preserved() {
        let bytes = render(&sample_resume(), &Branding::plain()).unwrap();
        let text = extract::extract_text("resume.docx", &bytes).unwrap();
        assert!(text.find("Built X").unwrap() < text.find("Shipped Y").unwrap());
        assert!(text.find("Project A").unwrap() < text.find("Project B").unwrap());
    }

    #[test]
    fn test_empty_project_fields_are_omitted() {
        let bytes = render(&sample_resume(), &Branding::plain()).unwrap();
        let text = extract::extract_text("resume.docx", &bytes).unwrap();
        // Project B has no description or tech stack; only Project A's table
        // should carry those labels
        assert_eq!(text.matches("Description").count(), 1);
        assert_eq!(text.matches("Tech Stack").count(), 1);
    }
}
