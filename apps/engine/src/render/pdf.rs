//! Fixed-canvas PDF backend.
//!
//! Placement is measure-then-place: every block's height is computed with the
//! same wrapping math the draw pass uses, the cursor checks whether the block
//! fits before drawing, and a page break is taken when it does not. The
//! cursor tracks `y` top-down in points (0 = top edge) and converts to PDF's
//! bottom-up coordinates only at draw time.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point,
    Polygon, Px, Rgb as PdfRgb,
};

use crate::errors::EngineError;
use crate::layout::geometry::{
    COLOR_ACCENT, COLOR_LINE, COLOR_PRIMARY, COLOR_SECONDARY, COLOR_TABLE_HEADER_BG,
};
use crate::layout::{measure_width, wrap_lines, wrapped_height, FontStyle, PageSpec, Rgb};
use crate::models::resume::{
    ExperienceEntry, ProjectEntry, Section, SectionContent, SkillRow, StructuredResume,
};
use crate::render::branding::Branding;

const PT_TO_MM: f32 = 0.352_777_78;

/// Indent (pt) for bullet text relative to the left margin.
const BULLET_INDENT: f32 = 15.0;
/// Label-column width (pt) for the two-column tables.
const TABLE_LABEL_WIDTH: f32 = 120.0;
/// Horizontal padding (pt) inside a table cell.
const CELL_PAD: f32 = 5.0;
/// Minimum vertical headroom (pt) required before starting a section title.
const SECTION_HEADROOM: f32 = 80.0;
/// Footer page-number font size.
const FOOTER_SIZE: f32 = 9.0;

fn pdf_err(e: impl std::fmt::Display) -> EngineError {
    EngineError::Render {
        format: "PDF",
        message: e.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fonts and logo
// ────────────────────────────────────────────────────────────────────────────

struct FontSet {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

impl FontSet {
    fn load(doc: &PdfDocumentReference) -> Result<Self, EngineError> {
        Ok(FontSet {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(pdf_err)?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(pdf_err)?,
            oblique: doc
                .add_builtin_font(BuiltinFont::HelveticaOblique)
                .map_err(pdf_err)?,
        })
    }

    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Oblique => &self.oblique,
        }
    }
}

/// Decoded logo pixels, kept as raw RGB8 so a fresh XObject can be stamped
/// onto every page.
struct Logo {
    pixels: Vec<u8>,
    width_px: u32,
    height_px: u32,
}

impl Logo {
    fn decode(bytes: &[u8]) -> Result<Self, EngineError> {
        let img = image::load_from_memory(bytes).map_err(pdf_err)?;
        let rgb = img.to_rgb8();
        let (width_px, height_px) = rgb.dimensions();
        Ok(Logo {
            pixels: rgb.into_raw(),
            width_px,
            height_px,
        })
    }

    fn xobject(&self) -> ImageXObject {
        ImageXObject {
            width: Px(self.width_px as usize),
            height: Px(self.height_px as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: self.pixels.clone(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page cursor
// ────────────────────────────────────────────────────────────────────────────

/// Owns the document under construction and the write position on the
/// current page. `y` grows downward from the top edge.
struct PageCursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: FontSet,
    logo: Option<Logo>,
    spec: PageSpec,
    y: f32,
    page_number: u32,
}

impl PageCursor {
    fn new(spec: PageSpec, logo: Option<Logo>, title: &str) -> Result<Self, EngineError> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(spec.width * PT_TO_MM),
            Mm(spec.height * PT_TO_MM),
            "Layer 1",
        );
        let fonts = FontSet::load(&doc)?;
        let layer = doc.get_page(page).get_layer(layer);
        let top_margin = spec.top_margin;
        let mut cursor = PageCursor {
            doc,
            layer,
            fonts,
            logo,
            spec,
            y: top_margin,
            page_number: 1,
        };
        cursor.draw_logo();
        Ok(cursor)
    }

    /// Breaks to a new page if `required` points of content would cross the
    /// bottom margin. Runs at most one break per call.
    fn ensure_space(&mut self, required: f32) {
        if self.y + required > self.spec.max_y() {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        self.stamp_footer();
        let (page, layer) = self.doc.add_page(
            Mm(self.spec.width * PT_TO_MM),
            Mm(self.spec.height * PT_TO_MM),
            "Layer 1",
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = self.spec.top_margin;
        self.page_number += 1;
        self.draw_logo();
    }

    fn advance(&mut self, delta: f32) {
        self.y += delta;
    }

    /// Stamps the footer on the final page and serializes the document.
    fn finalize(self) -> Result<Vec<u8>, EngineError> {
        self.stamp_footer();
        self.doc.save_to_bytes().map_err(pdf_err)
    }

    // ── drawing primitives ──────────────────────────────────────────────────

    /// Converts a top-down y (points) to PDF's bottom-up Mm.
    fn pdf_y(&self, y_top_down: f32) -> Mm {
        Mm((self.spec.height - y_top_down) * PT_TO_MM)
    }

    fn text(&self, text: &str, x: f32, y: f32, style: FontStyle, size: f32, color: Rgb) {
        self.layer
            .set_fill_color(Color::Rgb(PdfRgb::new(color.r, color.g, color.b, None)));
        self.layer
            .use_text(text, size, Mm(x * PT_TO_MM), self.pdf_y(y), self.fonts.get(style));
    }

    fn line(&self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb, thickness: f32) {
        self.layer
            .set_outline_color(Color::Rgb(PdfRgb::new(color.r, color.g, color.b, None)));
        self.layer.set_outline_thickness(thickness);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1 * PT_TO_MM), self.pdf_y(y1)), false),
                (Point::new(Mm(x2 * PT_TO_MM), self.pdf_y(y2)), false),
            ],
            is_closed: false,
        });
    }

    /// Axis-aligned filled rectangle; `y` is the top edge (top-down).
    fn rect_filled(&self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.layer
            .set_fill_color(Color::Rgb(PdfRgb::new(color.r, color.g, color.b, None)));
        self.layer.add_polygon(Polygon {
            rings: vec![vec![
                (Point::new(Mm(x * PT_TO_MM), self.pdf_y(y)), false),
                (Point::new(Mm((x + w) * PT_TO_MM), self.pdf_y(y)), false),
                (Point::new(Mm((x + w) * PT_TO_MM), self.pdf_y(y + h)), false),
                (Point::new(Mm(x * PT_TO_MM), self.pdf_y(y + h)), false),
            ]],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    /// Rectangle outline; `y` is the top edge (top-down).
    fn rect_stroked(&self, x: f32, y: f32, w: f32, h: f32, color: Rgb, thickness: f32) {
        self.line(x, y, x + w, y, color, thickness);
        self.line(x + w, y, x + w, y + h, color, thickness);
        self.line(x + w, y + h, x, y + h, color, thickness);
        self.line(x, y + h, x, y, color, thickness);
    }

    /// Wraps `text` and draws every line, advancing the cursor one
    /// `line_height` per line. With `bullet`, a bold glyph is drawn at the
    /// left margin and the text is indented.
    fn draw_wrapped(
        &mut self,
        text: &str,
        indent: f32,
        bullet: bool,
        style: FontStyle,
        size: f32,
        color: Rgb,
    ) {
        let x = self.spec.left_margin + indent;
        let max_width = self.spec.usable_width() - indent;
        if bullet {
            self.text(
                "\u{2022}",
                self.spec.left_margin,
                self.y,
                FontStyle::Bold,
                self.spec.body_size + 2.0,
                COLOR_PRIMARY,
            );
        }
        for line in wrap_lines(text, max_width, style, size) {
            self.text(&line, x, self.y, style, size, color);
            self.advance(self.spec.line_height);
        }
    }

    // ── per-page chrome ─────────────────────────────────────────────────────

    /// Company logo in the top-right corner, fitted inside an 80 × 30 pt box
    /// just above the content area. Repeated on every page.
    fn draw_logo(&self) {
        let Some(logo) = &self.logo else { return };

        let box_w = 80.0;
        let box_h = 30.0;
        let box_right = self.spec.content_right();
        let box_bottom = self.spec.top_margin - 10.0;

        // at 72 dpi one pixel is one point; fit the image inside the box
        let natural_w = logo.width_px as f32;
        let natural_h = logo.height_px as f32;
        let scale = (box_w / natural_w).min(box_h / natural_h);
        let w = natural_w * scale;
        let h = natural_h * scale;

        let x = box_right - w;
        let y_bottom = box_bottom - (box_h - h) / 2.0;

        Image::from(logo.xobject()).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x * PT_TO_MM)),
                translate_y: Some(Mm((self.spec.height - y_bottom) * PT_TO_MM)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(72.0),
                ..Default::default()
            },
        );
    }

    fn stamp_footer(&self) {
        self.text(
            &self.page_number.to_string(),
            (self.spec.width - 10.0) / 2.0,
            self.spec.height - self.spec.bottom_margin / 2.0,
            FontStyle::Regular,
            FOOTER_SIZE,
            COLOR_SECONDARY,
        );
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document renderer
// ────────────────────────────────────────────────────────────────────────────

/// Renders a structured resume to PDF bytes.
pub fn render(resume: &StructuredResume, branding: &Branding) -> Result<Vec<u8>, EngineError> {
    let spec = PageSpec::default();
    let logo = match branding.logo_bytes()? {
        Some(bytes) => Some(Logo::decode(&bytes)?),
        None => None,
    };

    let title = format!("{} - Resume", resume.candidate_name);
    let mut cur = PageCursor::new(spec, logo, &title)?;

    draw_header(&mut cur, resume);

    for section in &resume.sections {
        draw_section(&mut cur, section);
    }

    cur.finalize()
}

/// Name, designation, right-aligned contact block, and the rule under them.
fn draw_header(cur: &mut PageCursor, resume: &StructuredResume) {
    let spec = cur.spec.clone();

    // contact block, right-aligned, independent of the main cursor
    let mut contact_y = spec.top_margin + 4.0;
    for (key, value) in &resume.contact_info {
        let text = format!("{key}: {value}");
        let width = measure_width(&text, FontStyle::Regular, 9.5);
        cur.text(
            &text,
            spec.content_right() - width,
            contact_y,
            FontStyle::Regular,
            9.5,
            COLOR_SECONDARY,
        );
        contact_y += 14.0;
    }

    cur.text(
        &resume.candidate_name,
        spec.left_margin,
        cur.y,
        FontStyle::Bold,
        26.0,
        COLOR_PRIMARY,
    );
    cur.advance(24.0);

    cur.text(
        &resume.designation_line,
        spec.left_margin,
        cur.y,
        FontStyle::Regular,
        13.0,
        COLOR_ACCENT,
    );
    cur.advance(22.0);

    // a long contact stack must not collide with the rule or first section
    if contact_y > cur.y {
        cur.y = contact_y;
    }

    cur.line(
        spec.left_margin,
        cur.y,
        spec.content_right(),
        cur.y,
        COLOR_LINE,
        1.0,
    );
    cur.advance(spec.line_height * 1.5);
}

fn draw_section(cur: &mut PageCursor, section: &Section) {
    draw_section_title(cur, &section.title);
    match &section.content {
        SectionContent::Plain(text) => draw_paragraph(cur, text),
        SectionContent::BulletList(items) => draw_bullets(cur, items),
        SectionContent::Experience(jobs) => draw_experience(cur, jobs),
        SectionContent::Projects(projects) => draw_projects(cur, projects),
        SectionContent::Skills(rows) => draw_skills(cur, rows),
    }
}

/// Uppercased title with an accent underline. Breaks first if fewer than
/// `SECTION_HEADROOM` points remain, so a title is never orphaned at the
/// bottom of a page.
fn draw_section_title(cur: &mut PageCursor, title: &str) {
    let spec = cur.spec.clone();
    cur.ensure_space(SECTION_HEADROOM);
    cur.advance(spec.line_height * 1.8);
    cur.text(
        &title.to_uppercase(),
        spec.left_margin,
        cur.y,
        FontStyle::Bold,
        14.0,
        COLOR_PRIMARY,
    );
    cur.advance(8.0);
    cur.line(
        spec.left_margin,
        cur.y,
        spec.content_right(),
        cur.y,
        COLOR_ACCENT,
        0.5,
    );
    cur.advance(spec.line_height);
}

// ────────────────────────────────────────────────────────────────────────────
// Block renderers
// ────────────────────────────────────────────────────────────────────────────

fn draw_paragraph(cur: &mut PageCursor, text: &str) {
    let spec = cur.spec.clone();
    let height = wrapped_height(
        text,
        spec.usable_width(),
        FontStyle::Regular,
        spec.body_size,
        spec.line_height,
    );
    cur.ensure_space(height);
    cur.draw_wrapped(
        text,
        0.0,
        false,
        FontStyle::Regular,
        spec.body_size,
        COLOR_SECONDARY,
    );
}

fn draw_bullets(cur: &mut PageCursor, items: &[String]) {
    let spec = cur.spec.clone();
    for item in items {
        let height = wrapped_height(
            item,
            spec.usable_width() - BULLET_INDENT,
            FontStyle::Regular,
            spec.body_size,
            spec.line_height,
        );
        cur.ensure_space(height);
        cur.draw_wrapped(
            item,
            BULLET_INDENT,
            true,
            FontStyle::Regular,
            spec.body_size,
            COLOR_SECONDARY,
        );
    }
}

/// One job: bold title line, oblique company/date line, bulleted duties, a
/// blank line after. The whole entry's height is estimated up front so a job
/// that fits on a fresh page is never started at the bottom of the current
/// one; each duty still re-checks, which covers entries taller than a page.
fn draw_experience(cur: &mut PageCursor, jobs: &[ExperienceEntry]) {
    let spec = cur.spec.clone();
    let duty_width = spec.usable_width() - BULLET_INDENT;

    for job in jobs {
        let mut estimate = spec.line_height; // title line
        if job.company_and_date.is_some() {
            estimate += spec.line_height * 1.2;
        }
        for duty in &job.duties {
            estimate += wrapped_height(
                duty,
                duty_width,
                FontStyle::Regular,
                spec.body_size,
                spec.line_height,
            );
        }
        estimate += spec.line_height; // trailing gap
        cur.ensure_space(estimate);

        cur.text(
            &job.job_title,
            spec.left_margin,
            cur.y,
            FontStyle::Bold,
            spec.body_size + 1.0,
            COLOR_PRIMARY,
        );
        cur.advance(spec.line_height);

        if let Some(company) = &job.company_and_date {
            cur.text(
                company,
                spec.left_margin,
                cur.y,
                FontStyle::Oblique,
                spec.body_size,
                COLOR_SECONDARY,
            );
            cur.advance(spec.line_height * 1.2);
        }

        for duty in &job.duties {
            let height = wrapped_height(
                duty,
                duty_width,
                FontStyle::Regular,
                spec.body_size,
                spec.line_height,
            );
            cur.ensure_space(height);
            cur.draw_wrapped(
                duty,
                BULLET_INDENT,
                true,
                FontStyle::Regular,
                spec.body_size,
                COLOR_SECONDARY,
            );
        }

        cur.advance(spec.line_height);
    }
}

/// A label/value row of a two-column table, already measured.
struct TableRowSpec<'a> {
    label: &'a str,
    value: &'a str,
    height: f32,
}

fn measure_row<'a>(cur: &PageCursor, label: &'a str, value: &'a str) -> TableRowSpec<'a> {
    let spec = &cur.spec;
    let value_width = spec.usable_width() - TABLE_LABEL_WIDTH - 2.0 * CELL_PAD;
    let content_h = wrapped_height(
        value,
        value_width,
        FontStyle::Regular,
        spec.body_size,
        spec.line_height,
    );
    TableRowSpec {
        label,
        value,
        height: content_h.max(spec.line_height * 1.5) + 10.0,
    }
}

/// Draws a bordered two-column table at the cursor. Every row is re-checked
/// against the page bottom: when the next row would cross it, the borders of
/// the rows placed so far are closed and the table continues on a new page,
/// so a table taller than one page never draws past the bottom margin.
fn draw_table(cur: &mut PageCursor, rows: &[TableRowSpec<'_>], fill_label_bg: bool) {
    let spec = cur.spec.clone();
    let left = spec.left_margin;
    let value_x = left + TABLE_LABEL_WIDTH + CELL_PAD;
    let value_width = spec.usable_width() - TABLE_LABEL_WIDTH - 2.0 * CELL_PAD;

    let mut segment_top = cur.y;
    let mut row_bottoms: Vec<f32> = Vec::new();

    for row in rows {
        if cur.y + row.height > spec.max_y() && cur.y > segment_top {
            close_table_segment(cur, segment_top, &row_bottoms);
            cur.break_page();
            segment_top = cur.y;
            row_bottoms.clear();
        }

        let row_top = cur.y;
        if fill_label_bg {
            cur.rect_filled(left, row_top, TABLE_LABEL_WIDTH, row.height, COLOR_TABLE_HEADER_BG);
        }

        let baseline = row_top + CELL_PAD + spec.body_size;
        cur.text(
            row.label,
            left + CELL_PAD,
            baseline,
            FontStyle::Bold,
            spec.body_size,
            COLOR_PRIMARY,
        );
        let mut line_y = baseline;
        for line in wrap_lines(row.value, value_width, FontStyle::Regular, spec.body_size) {
            cur.text(
                &line,
                value_x,
                line_y,
                FontStyle::Regular,
                spec.body_size,
                COLOR_SECONDARY,
            );
            line_y += spec.line_height;
        }

        cur.advance(row.height);
        row_bottoms.push(cur.y);
    }

    close_table_segment(cur, segment_top, &row_bottoms);
}

/// Outer border, column divider, and row separators for the rows placed
/// since `segment_top` (up to the cursor).
fn close_table_segment(cur: &PageCursor, segment_top: f32, row_bottoms: &[f32]) {
    if row_bottoms.is_empty() {
        return;
    }
    let spec = &cur.spec;
    let left = spec.left_margin;
    let height = cur.y - segment_top;
    cur.rect_stroked(left, segment_top, spec.usable_width(), height, COLOR_LINE, 1.0);
    cur.line(
        left + TABLE_LABEL_WIDTH,
        segment_top,
        left + TABLE_LABEL_WIDTH,
        segment_top + height,
        COLOR_LINE,
        1.0,
    );
    // separators between rows, not after the last
    for bottom in row_bottoms.iter().take(row_bottoms.len() - 1) {
        cur.line(left, *bottom, spec.content_right(), *bottom, COLOR_LINE, 1.0);
    }
}

/// One bordered table per project with Project Name / Description /
/// Tech Stack rows; empty optional fields are omitted rather than rendered
/// as blank rows.
fn draw_projects(cur: &mut PageCursor, projects: &[ProjectEntry]) {
    let spec = cur.spec.clone();
    for project in projects {
        let mut rows = vec![measure_row(cur, "Project Name", &project.project_name)];
        if let Some(description) = non_empty(project.description.as_deref()) {
            rows.push(measure_row(cur, "Description", description));
        }
        if let Some(tech) = non_empty(project.tech_stack.as_deref()) {
            rows.push(measure_row(cur, "Tech Stack", tech));
        }

        let table_h: f32 = rows.iter().map(|r| r.height).sum();
        cur.ensure_space(table_h);
        draw_table(cur, &rows, true);
        cur.advance(spec.line_height);
    }
}

/// All skill rows as one bordered table: bold category labels on the left,
/// the skill list on the right.
fn draw_skills(cur: &mut PageCursor, skill_rows: &[SkillRow]) {
    let spec = cur.spec.clone();
    let rows: Vec<TableRowSpec<'_>> = skill_rows
        .iter()
        .map(|row| measure_row(cur, &row.category, &row.skills))
        .collect();
    if rows.is_empty() {
        return;
    }
    let table_h: f32 = rows.iter().map(|r| r.height).sum();
    cur.ensure_space(table_h);
    draw_table(cur, &rows, false);
    cur.advance(spec.line_height);
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

    fn cursor() -> PageCursor {
        PageCursor::new(PageSpec::default(), None, "test").unwrap()
    }

    fn sample_resume() -> StructuredResume {
        StructuredResume::from_value(serde_json::json!({
            "candidate_name": "Jane Doe",
            "designation_line": "Senior AI Engineer",
            "contact_info": {
                "email": "jane.doe@example.com",
                "phone": "+1 555 0100"
            },
            "sections": [
                {
                    "title": "Summary",
                    "content": "Engineer with a decade of experience shipping ML systems."
                },
                {
                    "title": "Experience",
                    "content": [
                        {
                            "job_title": "Senior AI Engineer",
                            "company_and_date": "Acme Corp | 2021 - Present",
                            "duties": ["Built X", "Shipped Y"]
                        }
                    ]
                },
                {
                    "title": "Projects",
                    "content": [
                        { "project_name": "Project A", "description": "First", "tech_stack": "Rust" },
                        { "project_name": "Project B", "description": "Second", "tech_stack": "Go" },
                        { "project_name": "Project C", "description": "Third", "tech_stack": "Python" }
                    ]
                },
                {
                    "title": "Skills",
                    "content": [
                        { "category": "Languages", "skills": "Rust, Python, SQL" }
                    ]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_break_triggers_when_block_does_not_fit() {
        let mut cur = cursor();
        cur.y = cur.spec.max_y() - 5.0;
        cur.ensure_space(10.0);
        assert_eq!(cur.page_number, 2, "a 10pt block in 5pt of room must break");
        assert_eq!(cur.y, cur.spec.top_margin, "cursor resets to the top margin");
    }

    #[test]
    fn test_no_break_when_block_fits_exactly() {
        let mut cur = cursor();
        cur.y = cur.spec.max_y() - 5.0;
        cur.ensure_space(3.0);
        assert_eq!(cur.page_number, 1, "a 3pt block in 5pt of room must not break");
        cur.ensure_space(5.0);
        assert_eq!(cur.page_number, 1, "exactly-fitting content must not break");
    }

    #[test]
    fn test_drawing_advances_cursor_by_wrapped_height() {
        let mut cur = cursor();
        let text = "Led development of a distributed caching layer for production workloads \
                    across three regions with automated failover";
        let before = cur.y;
        let expected = wrapped_height(
            text,
            cur.spec.usable_width(),
            FontStyle::Regular,
            cur.spec.body_size,
            cur.spec.line_height,
        );
        draw_paragraph(&mut cur, text);
        assert_eq!(cur.y - before, expected);
    }

    #[test]
    fn test_empty_duty_still_consumes_one_line() {
        let mut cur = cursor();
        let before = cur.y;
        draw_bullets(&mut cur, &[String::new()]);
        assert_eq!(cur.y - before, cur.spec.line_height);
    }

    #[test]
    fn test_render_produces_valid_pdf_with_expected_text() {
        let resume = sample_resume();
        let bytes = render(&resume, &Branding::plain()).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "output must be a PDF");

        let text = pdf_extract::extract_text_from_mem(&bytes).unwrap();
        for needle in [
            "Jane Doe",
            "Senior AI Engineer",
            "EXPERIENCE",
            "Built X",
            "Shipped Y",
            "Project A",
            "Rust, Python, SQL",
        ] {
            assert!(text.contains(needle), "missing {needle:?} in extracted text");
        }

        // duties keep their authored order
        let built = text.find("Built X").unwrap();
        let shipped = text.find("Shipped Y").unwrap();
        assert!(built < shipped, "duty order must be preserved");
    }

    #[test]
    fn test_projects_render_in_input_order() {
        let resume = sample_resume();
        let bytes = render(&resume, &Branding::plain()).unwrap();
        let text = pdf_extract::extract_text_from_mem(&bytes).unwrap();
        let a = text.find("Project A").unwrap();
        let b = text.find("Project B").unwrap();
        let c = text.find("Project C").unwrap();
        assert!(a < b && b < c, "projects must appear in input order");
    }

    #[test]
    fn test_tall_skills_table_continues_across_pages() {
        let mut cur = cursor();
        let rows: Vec<SkillRow> = (0..60)
            .map(|i| SkillRow {
                category: format!("Category {i}"),
                skills: "Rust, Python, SQL".to_string(),
            })
            .collect();
        draw_skills(&mut cur, &rows);
        assert!(cur.page_number > 1, "60 rows cannot fit on a single page");
        assert!(
            cur.y <= cur.spec.max_y(),
            "cursor must never rest past the bottom margin, got y = {}",
            cur.y
        );
    }

    #[test]
    fn test_tall_skills_table_keeps_every_row() {
        let rows: Vec<serde_json::Value> = (0..40)
            .map(|i| serde_json::json!({"category": format!("Category {i}"), "skills": "Rust"}))
            .collect();
        let resume = StructuredResume::from_value(serde_json::json!({
            "candidate_name": "Jane Doe",
            "designation_line": "Engineer",
            "contact_info": {},
            "sections": [{"title": "Skills", "content": rows}]
        }))
        .unwrap();
        let bytes = render(&resume, &Branding::plain()).unwrap();
        let text = pdf_extract::extract_text_from_mem(&bytes).unwrap();
        assert!(
            text.contains("Category 39"),
            "rows past the first page must still be rendered"
        );
    }

    #[test]
    fn test_crowded_contact_stack_pushes_rule_down() {
        let mut cur = cursor();
        let resume = StructuredResume::from_value(serde_json::json!({
            "candidate_name": "Jane Doe",
            "designation_line": "Engineer",
            "contact_info": {
                "email": "jane@x.com",
                "phone": "555-0100",
                "site": "x.com",
                "github": "gh/jane",
                "linkedin": "in/jane",
                "location": "Berlin"
            }
        }))
        .unwrap();
        draw_header(&mut cur, &resume);
        let contacts_end = cur.spec.top_margin + 4.0 + 6.0 * 14.0;
        assert!(
            cur.y >= contacts_end,
            "section content must start below the contact stack (y = {}, contacts end {})",
            cur.y,
            contacts_end
        );
    }

    #[test]
    fn test_long_resume_spills_to_second_page() {
        let duties: Vec<String> = (0..80).map(|i| format!("Delivered milestone {i}")).collect();
        let resume = StructuredResume::from_value(serde_json::json!({
            "candidate_name": "Jane Doe",
            "designation_line": "Engineer",
            "contact_info": {},
            "sections": [{
                "title": "Experience",
                "content": [{
                    "job_title": "Engineer",
                    "company_and_date": "Acme | 2010 - Present",
                    "duties": duties
                }]
            }]
        }))
        .unwrap();

        let bytes = render(&resume, &Branding::plain()).unwrap();
        let text = pdf_extract::extract_text_from_mem(&bytes).unwrap();
        assert!(
            text.contains("Delivered milestone 79"),
            "content past the first page must still be rendered"
        );
    }
}
