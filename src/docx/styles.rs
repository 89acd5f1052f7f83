//! Style resolver for the template's `word/styles.xml`.

use crate::error::Error;

use super::{Package, WML_NS, insert_as_last_child, wml};

const STYLES_PART: &str = "word/styles.xml";

/// Look up a paragraph style by its display name, creating it when absent,
/// and (re)apply font family, point size and RGB color. Only the style's
/// run properties are touched; everything else the template declares on the
/// style (`w:basedOn`, `w:next`, `w:pPr`, ...) stays in place. Idempotent:
/// calling twice with the same name replaces the run properties rather than
/// duplicating anything. Returns the resolved style id.
pub fn ensure_style(
    pkg: &mut Package,
    name: &str,
    font: &str,
    size_pt: f32,
    color: [u8; 3],
) -> Result<String, Error> {
    let text = pkg
        .part_text(STYLES_PART)?
        .ok_or_else(|| Error::Template(format!("template has no {STYLES_PART}")))?;

    // Locate an existing style carrying this w:name, remembering the byte
    // ranges needed to splice its run properties in place.
    let existing = {
        let xml = roxmltree::Document::parse(&text)?;
        xml.root_element()
            .children()
            .filter(|n| {
                n.tag_name().name() == "style" && n.tag_name().namespace() == Some(WML_NS)
            })
            .find(|n| {
                n.children().any(|c| {
                    c.tag_name().name() == "name"
                        && c.tag_name().namespace() == Some(WML_NS)
                        && c.attribute((WML_NS, "val")) == Some(name)
                })
            })
            .map(|n| {
                let id = n
                    .attribute((WML_NS, "styleId"))
                    .unwrap_or_default()
                    .to_string();
                let rpr = n
                    .children()
                    .find(|c| {
                        c.tag_name().name() == "rPr" && c.tag_name().namespace() == Some(WML_NS)
                    })
                    .map(|c| c.range());
                (n.range(), rpr, id)
            })
    };

    let style_id = match &existing {
        Some((_, _, id)) if !id.is_empty() => id.clone(),
        _ => name.replace(' ', ""),
    };
    let rpr = run_properties(font, size_pt, color);

    let out = match existing {
        Some((_, Some(rpr_range), _)) => {
            let mut out = text;
            out.replace_range(rpr_range, &rpr);
            out
        }
        // Style exists but carries no run properties yet: add them as the
        // last child, after any w:pPr.
        Some((style_range, None, _)) => {
            let close = text[style_range.clone()]
                .rfind("</w:style")
                .map(|p| style_range.start + p)
                .ok_or_else(|| Error::Template(format!("malformed {STYLES_PART}")))?;
            let mut out = text;
            out.insert_str(close, &rpr);
            out
        }
        None => {
            let definition = format!(
                concat!(
                    "<w:style w:type=\"paragraph\" w:styleId=\"{id}\">",
                    "<w:name w:val=\"{name}\"/>",
                    "<w:qFormat/>",
                    "{rpr}",
                    "</w:style>",
                ),
                id = wml::escape(&style_id),
                name = wml::escape(name),
                rpr = rpr,
            );
            insert_as_last_child(text, &definition, STYLES_PART)?
        }
    };
    pkg.set_part(STYLES_PART, out.into_bytes());
    Ok(style_id)
}

fn run_properties(font: &str, size_pt: f32, color: [u8; 3]) -> String {
    let hp = wml::pt_to_half_points(size_pt);
    format!(
        concat!(
            "<w:rPr>",
            "<w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\"/>",
            "<w:color w:val=\"{color}\"/>",
            "<w:sz w:val=\"{hp}\"/><w:szCs w:val=\"{hp}\"/>",
            "</w:rPr>",
        ),
        font = wml::escape(font),
        color = wml::color_hex(color),
        hp = hp,
    )
}
