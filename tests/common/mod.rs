use std::io::{Cursor, Read, Write};

use eventdocx::{EventRecord, EventType, ImageResource};
use zip::write::SimpleFileOptions;

pub const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
<Override PartName=\"/word/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>\
</Types>";

const ROOT_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
</Relationships>";

const DOC_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>\
</Relationships>";

const DOCUMENT: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
<w:body>\
<w:sectPr><w:pgSz w:w=\"11906\" w:h=\"16838\"/>\
<w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\" w:header=\"708\" w:footer=\"708\" w:gutter=\"0\"/>\
</w:sectPr>\
</w:body>\
</w:document>";

const STYLES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<w:styles xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
<w:docDefaults><w:rPrDefault><w:rPr>\
<w:rFonts w:ascii=\"Calibri\" w:hAnsi=\"Calibri\"/><w:sz w:val=\"22\"/>\
</w:rPr></w:rPrDefault></w:docDefaults>\
<w:style w:type=\"paragraph\" w:styleId=\"Normal\"><w:name w:val=\"Normal\"/></w:style>\
</w:styles>";

/// A bare but valid institutional template: default styles, A4 page, no
/// body content of its own.
pub fn minimal_template() -> Vec<u8> {
    template_with_styles(STYLES)
}

/// Same template, custom `word/styles.xml` (style-resolver tests).
pub fn template_with_styles(styles_xml: &str) -> Vec<u8> {
    template_with_parts(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("word/document.xml", DOCUMENT),
        ("word/styles.xml", styles_xml),
        ("word/_rels/document.xml.rels", DOC_RELS),
    ])
}

/// Same template, custom `word/document.xml`.
pub fn template_with_document(doc_xml: &str) -> Vec<u8> {
    template_with_parts(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("word/document.xml", doc_xml),
        ("word/styles.xml", STYLES),
        ("word/_rels/document.xml.rels", DOC_RELS),
    ])
}

/// Same template, custom `word/_rels/document.xml.rels`.
pub fn template_with_rels(rels_xml: &str) -> Vec<u8> {
    template_with_parts(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("word/document.xml", DOCUMENT),
        ("word/styles.xml", STYLES),
        ("word/_rels/document.xml.rels", rels_xml),
    ])
}

fn template_with_parts(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, data) in parts {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// The §8 reference scenario record.
pub fn workshop_record() -> EventRecord {
    EventRecord {
        event_type: EventType::Workshop,
        department: "CSE".to_string(),
        topic: "AI Trends".to_string(),
        expert: Some("Dr. X".to_string()),
        venue: "Hall A".to_string(),
        date: "01-01-2025".to_string(),
        time: "09:00".to_string(),
        coordinator: "Prof. Y".to_string(),
        participant_count: 40,
        summary: "- Point one\n- Point two".to_string(),
        outcome: "Great success".to_string(),
        faculty_in_charge: "Prof. Y".to_string(),
        hod_name: "Dr. Z".to_string(),
    }
}

pub fn png_image(name: &str) -> ImageResource {
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([40, 90, 160, 255]));
    let mut data = Cursor::new(Vec::new());
    img.write_to(&mut data, image::ImageFormat::Png).unwrap();
    ImageResource {
        name: name.to_string(),
        data: data.into_inner(),
    }
}

pub fn jpeg_image(name: &str) -> ImageResource {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 120, 40]));
    let mut data = Cursor::new(Vec::new());
    img.write_to(&mut data, image::ImageFormat::Jpeg).unwrap();
    ImageResource {
        name: name.to_string(),
        data: data.into_inner(),
    }
}

/// Extract one part of a generated package as text.
pub fn part_text(package: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(package)).unwrap();
    let mut file = archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("part {name} missing from package"));
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    text
}

pub fn has_part(package: &[u8], name: &str) -> bool {
    let mut archive = zip::ZipArchive::new(Cursor::new(package)).unwrap();
    archive.by_name(name).is_ok()
}

/// All visible text of a parsed `word/document.xml`, one entry per `w:t`.
pub fn document_texts(doc_xml: &str) -> Vec<String> {
    let xml = roxmltree::Document::parse(doc_xml).unwrap();
    xml.descendants()
        .filter(|n| n.tag_name().name() == "t" && n.tag_name().namespace() == Some(WML_NS))
        .map(|n| n.text().unwrap_or_default().to_string())
        .collect()
}

/// Count descendant WML elements with the given local name.
pub fn count_elements(doc_xml: &str, name: &str) -> usize {
    let xml = roxmltree::Document::parse(doc_xml).unwrap();
    xml.descendants()
        .filter(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(WML_NS))
        .count()
}
