//! Record → block-sequence assembly.
//!
//! Everything here is pure with respect to the package: the assembler turns
//! a validated [`EventRecord`] plus its attachments into an ordered list of
//! [`Block`]s, and the `docx` layer serializes them. Section order is fixed
//! and linear; there is no branching back.

pub mod narrative;
pub mod table;

use crate::error::Error;
use crate::model::{
    Alignment, Block, EmbeddedImage, EventRecord, ImageFormat, ImageResource, Paragraph,
    ReportImages, Run, Table, TableCell, TableRow, Warning,
};

use narrative::format_narrative;
use table::{build_detail_rows, pad_detail_rows};

/// Attributes applied to "Heading 1"/"Heading 2" by the style resolver.
pub(crate) const HEADING_STYLE_FONT: &str = "DIN Pro Regular";
pub(crate) const HEADING_STYLE_SIZE: f32 = 12.0;
pub(crate) const HEADING_STYLE_COLOR: [u8; 3] = [135, 206, 235];

const BODY_FONT: &str = "Times New Roman";
const BODY_SIZE: f32 = 11.0;
const HEADING_SIZE: f32 = 12.0;
const HEADING_COLOR: [u8; 3] = [79, 129, 189];

/// Bullet paragraphs are indented by this much, distinct from plain text.
const BULLET_INDENT_PT: f32 = 36.0;

// Fixed physical image sizes per category (width, height). The source
// aspect ratio is deliberately not preserved.
const INVITE_SIZE_CM: (f32, f32) = (9.0, 17.0);
const ACTION_SIZE_CM: (f32, f32) = (10.0, 10.0);
const ATTENDANCE_SIZE_CM: (f32, f32) = (9.0, 9.0);
const ANALYSIS_SIZE_CM: (f32, f32) = (9.0, 9.0);

const DETAILS_COL_CM: f32 = 8.0;
const SIGNATURE_COL_CM: f32 = 8.0;

/// The small set of named text treatments every run decomposes into.
#[derive(Clone, Copy)]
enum TextStyle {
    Heading,
    Body,
    BoldLabel,
}

fn styled_run(text: &str, style: TextStyle) -> Run {
    let (font_size, bold, color) = match style {
        TextStyle::Heading => (HEADING_SIZE, false, Some(HEADING_COLOR)),
        TextStyle::Body => (BODY_SIZE, false, None),
        TextStyle::BoldLabel => (BODY_SIZE, true, None),
    };
    Run {
        text: text.to_string(),
        font_name: BODY_FONT.to_string(),
        font_size,
        bold,
        underline: false,
        color,
        line_break_before: false,
        image: None,
    }
}

fn paragraph(runs: Vec<Run>, alignment: Alignment) -> Paragraph {
    Paragraph {
        runs,
        alignment,
        indent_left: 0.0,
        page_break_before: false,
    }
}

/// Centered paragraph holding exactly one image run at the given fixed size.
fn image_paragraph(img: EmbeddedImage) -> Paragraph {
    let run = Run {
        text: String::new(),
        font_name: BODY_FONT.to_string(),
        font_size: BODY_SIZE,
        bold: false,
        underline: false,
        color: None,
        line_break_before: false,
        image: Some(img),
    };
    paragraph(vec![run], Alignment::Center)
}

/// Decode-validate an attachment and pin it to the category's physical size.
fn embed_image(res: &ImageResource, size_cm: (f32, f32)) -> Result<EmbeddedImage, Error> {
    let unreadable = |reason: String| Error::ResourceUnreadable {
        name: res.name.clone(),
        reason,
    };

    let format = match image::guess_format(&res.data).map_err(|e| unreadable(e.to_string()))? {
        image::ImageFormat::Png => ImageFormat::Png,
        image::ImageFormat::Jpeg => ImageFormat::Jpeg,
        other => return Err(unreadable(format!("unsupported image format {other:?}"))),
    };
    let decoded = image::load_from_memory(&res.data).map_err(|e| unreadable(e.to_string()))?;

    Ok(EmbeddedImage {
        data: res.data.clone(),
        format,
        pixel_width: decoded.width(),
        pixel_height: decoded.height(),
        width_cm: size_cm.0,
        height_cm: size_cm.1,
    })
}

/// Map a record and its attachments to the fixed section order: department
/// header, title, details table, narrative sections, optional invite,
/// galleries, signature block.
pub fn assemble(
    record: &EventRecord,
    images: &ReportImages,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<Block>, Error> {
    let mut blocks = Vec::new();

    let mut dept = styled_run(
        &format!("Department of {}", record.department),
        TextStyle::Heading,
    );
    dept.underline = true;
    blocks.push(Block::Paragraph(paragraph(vec![dept], Alignment::Right)));

    blocks.push(Block::Paragraph(paragraph(
        vec![styled_run(
            record.event_type.display_name(),
            TextStyle::Heading,
        )],
        Alignment::Center,
    )));
    blocks.push(Block::Paragraph(Paragraph::empty()));

    let rows = pad_detail_rows(build_detail_rows(record), warnings);
    blocks.push(Block::Table(details_table(&rows)));

    for (heading, text) in [
        ("Summary of the Event:", &record.summary),
        ("Outcome of the Event:", &record.outcome),
    ] {
        blocks.push(Block::Paragraph(Paragraph::empty()));
        blocks.push(Block::Paragraph(paragraph(
            vec![styled_run(heading, TextStyle::Heading)],
            Alignment::Left,
        )));
        for line in format_narrative(text) {
            let mut para = paragraph(
                vec![styled_run(&line.content, TextStyle::Body)],
                Alignment::Left,
            );
            if line.bullet {
                para.indent_left = BULLET_INDENT_PT;
            }
            blocks.push(Block::Paragraph(para));
        }
    }

    if let Some(invite) = &images.invite {
        let mut heading = paragraph(
            vec![styled_run("Invite", TextStyle::Heading)],
            Alignment::Left,
        );
        heading.page_break_before = true;
        blocks.push(Block::Paragraph(heading));
        blocks.push(Block::Paragraph(image_paragraph(embed_image(
            invite,
            INVITE_SIZE_CM,
        )?)));
    }

    for (heading, photos, size_cm) in [
        ("Action Photos", &images.action, ACTION_SIZE_CM),
        ("Attendance Sheet", &images.attendance, ATTENDANCE_SIZE_CM),
        ("Analysis Report", &images.analysis, ANALYSIS_SIZE_CM),
    ] {
        if photos.is_empty() {
            continue;
        }
        let mut heading = paragraph(
            vec![styled_run(heading, TextStyle::Heading)],
            Alignment::Center,
        );
        heading.page_break_before = true;
        blocks.push(Block::Paragraph(heading));
        blocks.push(Block::Paragraph(Paragraph::empty()));
        for photo in photos {
            blocks.push(Block::Paragraph(image_paragraph(embed_image(
                photo, size_cm,
            )?)));
        }
    }

    // Signature block follows directly, no page break.
    blocks.push(Block::Paragraph(Paragraph::empty()));
    blocks.push(Block::Paragraph(Paragraph::empty()));
    blocks.push(Block::Table(signature_table(
        &record.faculty_in_charge,
        &record.hod_name,
    )));

    Ok(blocks)
}

fn text_cell(text: &str, style: TextStyle, alignment: Alignment) -> TableCell {
    let runs = if text.is_empty() {
        Vec::new()
    } else {
        vec![styled_run(text, style)]
    };
    TableCell {
        paragraphs: vec![paragraph(runs, alignment)],
    }
}

/// Fixed 7-row, 2-column key/value table: bold right-aligned labels,
/// left-aligned values, grid borders.
fn details_table(rows: &[crate::model::DetailRow]) -> Table {
    Table {
        style_id: Some("TableGrid"),
        grid_borders: true,
        col_widths_cm: vec![DETAILS_COL_CM, DETAILS_COL_CM],
        rows: rows
            .iter()
            .map(|row| TableRow {
                cells: vec![
                    text_cell(&row.label, TextStyle::BoldLabel, Alignment::Right),
                    text_cell(&row.value, TextStyle::Body, Alignment::Left),
                ],
            })
            .collect(),
    }
}

/// Two-column attribution block. Label and name share one cell paragraph,
/// separated by an in-cell line break; this compact layout is deliberate.
fn signature_table(faculty_name: &str, hod_name: &str) -> Table {
    let name_cell = |label: &str, name: &str, alignment: Alignment| {
        let mut name_run = styled_run(name, TextStyle::Body);
        name_run.line_break_before = true;
        TableCell {
            paragraphs: vec![paragraph(
                vec![styled_run(label, TextStyle::Body), name_run],
                alignment,
            )],
        }
    };

    Table {
        style_id: None,
        grid_borders: false,
        col_widths_cm: vec![SIGNATURE_COL_CM, SIGNATURE_COL_CM],
        rows: vec![
            TableRow {
                cells: vec![
                    text_cell("Name & Signature of the", TextStyle::Body, Alignment::Left),
                    text_cell("Name & Signature of", TextStyle::Body, Alignment::Right),
                ],
            },
            TableRow {
                cells: vec![
                    name_cell("Faculty-in-charge", faculty_name, Alignment::Left),
                    name_cell("HoD", hod_name, Alignment::Right),
                ],
            },
        ],
    }
}
