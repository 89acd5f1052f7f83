//! DOCX package plumbing: load the institutional template, register media,
//! splice generated body content, and serialize the result.
//!
//! Every template part is carried through verbatim except the ones the
//! engine touches (`word/document.xml`, `word/styles.xml`, the document
//! relationships and `[Content_Types].xml`).

pub mod styles;
mod wml;

use std::io::{Cursor, Read, Write};
use std::path::Path;

use crate::error::Error;
use crate::model::{Block, EmbeddedImage};

pub(crate) const WML_NS: &str =
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const IMAGE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const DOCUMENT_PART: &str = "word/document.xml";
const DOC_RELS_PART: &str = "word/_rels/document.xml.rels";

const EMPTY_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
</Relationships>";

/// Handle to an image registered in the package.
pub struct MediaRef {
    pub rel_id: String,
    pub drawing_id: u32,
}

/// An open DOCX package, held fully in memory for the duration of one
/// assembly. Part order from the template is preserved on save.
pub struct Package {
    parts: Vec<(String, Vec<u8>)>,
    media_seq: u32,
    drawing_seq: u32,
}

impl Package {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let bytes = std::fs::read(path).map_err(|e| {
            Error::Template(format!("cannot read template {}: {e}", path.display()))
        })?;
        Self::load_bytes(&bytes)
    }

    pub fn load_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::Template(format!("not a DOCX package: {e}")))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data).map_err(Error::Io)?;
            parts.push((file.name().to_string(), data));
        }

        let mut pkg = Package {
            parts,
            media_seq: 0,
            drawing_seq: 0,
        };
        for required in [CONTENT_TYPES_PART, DOCUMENT_PART] {
            if pkg.part(required).is_none() {
                return Err(Error::Template(format!("missing part {required}")));
            }
        }
        // Templates may carry drawings of their own; new docPr ids must not
        // collide with them.
        pkg.drawing_seq = pkg.max_drawing_id()?;
        Ok(pkg)
    }

    fn max_drawing_id(&self) -> Result<u32, Error> {
        let text = self.part_text_required(DOCUMENT_PART)?;
        let xml = roxmltree::Document::parse(&text)?;
        Ok(xml
            .descendants()
            .filter(|n| n.tag_name().name() == "docPr")
            .filter_map(|n| n.attribute("id"))
            .filter_map(|id| id.parse::<u32>().ok())
            .max()
            .unwrap_or(0))
    }

    pub(crate) fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }

    pub(crate) fn part_text(&self, name: &str) -> Result<Option<String>, Error> {
        match self.part(name) {
            None => Ok(None),
            Some(data) => String::from_utf8(data.to_vec())
                .map(Some)
                .map_err(|_| Error::Template(format!("part {name} is not valid UTF-8"))),
        }
    }

    fn part_text_required(&self, name: &str) -> Result<String, Error> {
        self.part_text(name)?
            .ok_or_else(|| Error::Template(format!("missing part {name}")))
    }

    pub(crate) fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = data,
            None => self.parts.push((name.to_string(), data)),
        }
    }

    /// Serialize the assembled blocks, registering their images as media
    /// parts, and return the body XML ready for [`Package::splice_body`].
    pub fn render_blocks(&mut self, blocks: &[Block]) -> Result<String, Error> {
        let mut register = |img: &EmbeddedImage| self.add_image(img);
        wml::blocks_xml(blocks, &mut register)
    }

    /// Add one image part plus its relationship and content-type
    /// registration.
    pub fn add_image(&mut self, img: &EmbeddedImage) -> Result<MediaRef, Error> {
        self.ensure_default_content_type(img.format.extension(), img.format.content_type())?;

        let part_name = self.next_media_name(img.format.extension());
        let target = part_name.strip_prefix("word/").unwrap_or(&part_name).to_string();
        let rel_id = self.append_relationship(&target, IMAGE_REL_TYPE)?;

        self.parts.push((part_name, img.data.clone()));
        self.drawing_seq += 1;
        Ok(MediaRef {
            rel_id,
            drawing_id: self.drawing_seq,
        })
    }

    /// First free `word/media/imageN.<ext>` slot; templates may already
    /// carry media of their own.
    fn next_media_name(&mut self, ext: &str) -> String {
        loop {
            self.media_seq += 1;
            let name = format!("word/media/image{}.{ext}", self.media_seq);
            if self.part(&name).is_none() {
                return name;
            }
        }
    }

    fn append_relationship(&mut self, target: &str, rel_type: &str) -> Result<String, Error> {
        let text = match self.part_text(DOC_RELS_PART)? {
            Some(text) => text,
            None => EMPTY_RELS.to_string(),
        };

        let max_id = {
            let xml = roxmltree::Document::parse(&text)?;
            xml.root_element()
                .children()
                .filter(|n| n.tag_name().name() == "Relationship")
                .filter_map(|n| n.attribute("Id"))
                .filter_map(|id| id.strip_prefix("rId"))
                .filter_map(|n| n.parse::<u32>().ok())
                .max()
                .unwrap_or(0)
        };
        let rel_id = format!("rId{}", max_id + 1);

        let entry = format!(
            "<Relationship Id=\"{rel_id}\" Type=\"{rel_type}\" Target=\"{}\"/>",
            wml::escape(target)
        );
        let out = insert_as_last_child(text, &entry, DOC_RELS_PART)?;
        self.set_part(DOC_RELS_PART, out.into_bytes());
        Ok(rel_id)
    }

    fn ensure_default_content_type(&mut self, ext: &str, content_type: &str) -> Result<(), Error> {
        let text = self.part_text_required(CONTENT_TYPES_PART)?;

        let registered = {
            let xml = roxmltree::Document::parse(&text)?;
            xml.root_element().children().any(|n| {
                n.tag_name().name() == "Default"
                    && n.attribute("Extension")
                        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
            })
        };
        if registered {
            return Ok(());
        }

        let entry = format!("<Default Extension=\"{ext}\" ContentType=\"{content_type}\"/>");
        let out = insert_as_last_child(text, &entry, CONTENT_TYPES_PART)?;
        self.set_part(CONTENT_TYPES_PART, out.into_bytes());
        Ok(())
    }

    /// Insert generated body XML immediately before the body's trailing
    /// `w:sectPr`, preserving the template's page geometry. Templates
    /// without section properties get the content appended before the body
    /// close instead.
    pub fn splice_body(&mut self, body_xml: &str) -> Result<(), Error> {
        let text = self.part_text_required(DOCUMENT_PART)?;

        let insert_at = {
            let xml = roxmltree::Document::parse(&text)?;
            let body = xml
                .descendants()
                .find(|n| {
                    n.tag_name().name() == "body" && n.tag_name().namespace() == Some(WML_NS)
                })
                .ok_or_else(|| Error::Template(format!("{DOCUMENT_PART} has no w:body")))?;
            body.children()
                .find(|n| {
                    n.tag_name().name() == "sectPr" && n.tag_name().namespace() == Some(WML_NS)
                })
                .map(|n| n.range().start)
        };
        let insert_at = match insert_at {
            Some(pos) => pos,
            None => text
                .rfind("</w:body>")
                .ok_or_else(|| Error::Template(format!("malformed {DOCUMENT_PART}")))?,
        };

        let mut out = text;
        out.insert_str(insert_at, body_xml);
        self.set_part(DOCUMENT_PART, out.into_bytes());
        Ok(())
    }

    /// One serialization pass: every part, template order, Deflate.
    pub fn save(self) -> Result<Vec<u8>, Error> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        for (name, data) in &self.parts {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(data).map_err(Error::Io)?;
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}

/// Insert markup as the last child of a part's root element. An empty
/// self-closing root (`<Relationships/>`) is expanded into an open/close
/// pair around the new content.
pub(crate) fn insert_as_last_child(
    mut text: String,
    markup: &str,
    part: &str,
) -> Result<String, Error> {
    let range = roxmltree::Document::parse(&text)?.root_element().range();
    let qname_end = text[range.start + 1..]
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .map(|i| range.start + 1 + i)
        .ok_or_else(|| Error::Template(format!("malformed {part}")))?;
    let qname = text[range.start + 1..qname_end].to_string();

    if text[range.clone()].ends_with("/>") {
        text.replace_range(range.end - 2..range.end, &format!(">{markup}</{qname}>"));
    } else {
        let close = format!("</{qname}");
        let pos = text[range.clone()]
            .rfind(&close)
            .map(|p| range.start + p)
            .ok_or_else(|| Error::Template(format!("malformed {part}")))?;
        text.insert_str(pos, markup);
    }
    Ok(text)
}
