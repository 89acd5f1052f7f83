//! WordprocessingML serialization for generated blocks.
//!
//! The template's own parts are carried through untouched; only the content
//! this module emits is new XML, so it is built as escaped strings rather
//! than through a DOM.

use crate::error::Error;
use crate::model::{Alignment, Block, EmbeddedImage, Paragraph, Run, Table};

use super::MediaRef;

const WP_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const PIC_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub(crate) fn pt_to_half_points(pt: f32) -> i64 {
    (pt * 2.0).round() as i64
}

pub(crate) fn pt_to_twips(pt: f32) -> i64 {
    (pt * 20.0).round() as i64
}

pub(crate) fn cm_to_twips(cm: f32) -> i64 {
    (cm * 1440.0 / 2.54).round() as i64
}

pub(crate) fn cm_to_emu(cm: f32) -> i64 {
    (cm * 360_000.0).round() as i64
}

pub(crate) fn color_hex(color: [u8; 3]) -> String {
    format!("{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize the assembled blocks in order, registering each inline image
/// with the package through `media`.
pub(super) fn blocks_xml(
    blocks: &[Block],
    media: &mut dyn FnMut(&EmbeddedImage) -> Result<MediaRef, Error>,
) -> Result<String, Error> {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Paragraph(p) => paragraph_xml(&mut out, p, media)?,
            Block::Table(t) => table_xml(&mut out, t, media)?,
        }
    }
    Ok(out)
}

fn alignment_val(alignment: Alignment) -> Option<&'static str> {
    match alignment {
        Alignment::Left => None,
        Alignment::Center => Some("center"),
        Alignment::Right => Some("right"),
    }
}

fn paragraph_xml(
    out: &mut String,
    para: &Paragraph,
    media: &mut dyn FnMut(&EmbeddedImage) -> Result<MediaRef, Error>,
) -> Result<(), Error> {
    out.push_str("<w:p>");

    let jc = alignment_val(para.alignment);
    if para.page_break_before || para.indent_left > 0.0 || jc.is_some() {
        out.push_str("<w:pPr>");
        if para.page_break_before {
            out.push_str("<w:pageBreakBefore/>");
        }
        if para.indent_left > 0.0 {
            out.push_str(&format!(
                "<w:ind w:left=\"{}\"/>",
                pt_to_twips(para.indent_left)
            ));
        }
        if let Some(val) = jc {
            out.push_str(&format!("<w:jc w:val=\"{val}\"/>"));
        }
        out.push_str("</w:pPr>");
    }

    for run in &para.runs {
        run_xml(out, run, media)?;
    }

    out.push_str("</w:p>");
    Ok(())
}

fn run_props_xml(run: &Run) -> String {
    let mut rpr = String::from("<w:rPr>");
    rpr.push_str(&format!(
        "<w:rFonts w:ascii=\"{0}\" w:hAnsi=\"{0}\"/>",
        escape(&run.font_name)
    ));
    if run.bold {
        rpr.push_str("<w:b/>");
    }
    if let Some(color) = run.color {
        rpr.push_str(&format!("<w:color w:val=\"{}\"/>", color_hex(color)));
    }
    let hp = pt_to_half_points(run.font_size);
    rpr.push_str(&format!("<w:sz w:val=\"{hp}\"/><w:szCs w:val=\"{hp}\"/>"));
    if run.underline {
        rpr.push_str("<w:u w:val=\"single\"/>");
    }
    rpr.push_str("</w:rPr>");
    rpr
}

fn run_xml(
    out: &mut String,
    run: &Run,
    media: &mut dyn FnMut(&EmbeddedImage) -> Result<MediaRef, Error>,
) -> Result<(), Error> {
    if let Some(img) = &run.image {
        let media_ref = media(img)?;
        out.push_str("<w:r>");
        inline_image_xml(out, img, &media_ref);
        out.push_str("</w:r>");
        return Ok(());
    }

    out.push_str("<w:r>");
    out.push_str(&run_props_xml(run));
    if run.line_break_before {
        out.push_str("<w:br/>");
    }
    if !run.text.is_empty() {
        out.push_str(&format!(
            "<w:t xml:space=\"preserve\">{}</w:t>",
            escape(&run.text)
        ));
    }
    out.push_str("</w:r>");
    Ok(())
}

/// Inline picture drawing. Namespaces are declared locally so the markup is
/// valid regardless of what the template's root element declares.
fn inline_image_xml(out: &mut String, img: &EmbeddedImage, media_ref: &MediaRef) {
    let cx = cm_to_emu(img.width_cm);
    let cy = cm_to_emu(img.height_cm);
    let id = media_ref.drawing_id;
    let name = format!("image{}.{}", id, img.format.extension());
    out.push_str(&format!(
        concat!(
            "<w:drawing>",
            "<wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\" xmlns:wp=\"{wp}\">",
            "<wp:extent cx=\"{cx}\" cy=\"{cy}\"/>",
            "<wp:effectExtent l=\"0\" t=\"0\" r=\"0\" b=\"0\"/>",
            "<wp:docPr id=\"{id}\" name=\"{name}\"/>",
            "<a:graphic xmlns:a=\"{a}\">",
            "<a:graphicData uri=\"{uri}\">",
            "<pic:pic xmlns:pic=\"{pic}\">",
            "<pic:nvPicPr><pic:cNvPr id=\"{id}\" name=\"{name}\"/><pic:cNvPicPr/></pic:nvPicPr>",
            "<pic:blipFill><a:blip r:embed=\"{rid}\" xmlns:r=\"{r}\"/>",
            "<a:stretch><a:fillRect/></a:stretch></pic:blipFill>",
            "<pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>",
            "<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr>",
            "</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>",
        ),
        wp = WP_NS,
        a = A_NS,
        pic = PIC_NS,
        uri = PIC_NS,
        r = REL_NS,
        cx = cx,
        cy = cy,
        id = id,
        name = name,
        rid = media_ref.rel_id,
    ));
}

fn table_xml(
    out: &mut String,
    table: &Table,
    media: &mut dyn FnMut(&EmbeddedImage) -> Result<MediaRef, Error>,
) -> Result<(), Error> {
    out.push_str("<w:tbl><w:tblPr>");
    if let Some(style_id) = table.style_id {
        out.push_str(&format!("<w:tblStyle w:val=\"{style_id}\"/>"));
    }
    out.push_str("<w:tblW w:w=\"0\" w:type=\"auto\"/>");
    if table.grid_borders {
        out.push_str("<w:tblBorders>");
        for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
            out.push_str(&format!(
                "<w:{edge} w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>"
            ));
        }
        out.push_str("</w:tblBorders>");
    } else {
        // Explicit widths without autofit (signature block layout).
        out.push_str("<w:tblLayout w:type=\"fixed\"/>");
    }
    out.push_str("</w:tblPr><w:tblGrid>");
    for width in &table.col_widths_cm {
        out.push_str(&format!("<w:gridCol w:w=\"{}\"/>", cm_to_twips(*width)));
    }
    out.push_str("</w:tblGrid>");

    for row in &table.rows {
        out.push_str("<w:tr>");
        for (col, cell) in row.cells.iter().enumerate() {
            let width = table.col_widths_cm.get(col).copied().unwrap_or(0.0);
            out.push_str(&format!(
                "<w:tc><w:tcPr><w:tcW w:w=\"{}\" w:type=\"dxa\"/></w:tcPr>",
                cm_to_twips(width)
            ));
            // A table cell must close with a paragraph.
            if cell.paragraphs.is_empty() {
                out.push_str("<w:p/>");
            }
            for para in &cell.paragraphs {
                paragraph_xml(out, para, media)?;
            }
            out.push_str("</w:tc>");
        }
        out.push_str("</w:tr>");
    }

    out.push_str("</w:tbl>");
    Ok(())
}
