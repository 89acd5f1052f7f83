use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Workshop,
    FieldVisit,
    Masterclass,
}

impl EventType {
    pub fn display_name(self) -> &'static str {
        match self {
            EventType::Workshop => "Workshop",
            EventType::FieldVisit => "Field Visit",
            EventType::Masterclass => "Master Class",
        }
    }

    /// Lower-cased display name with spaces replaced by underscores,
    /// used in the output file name.
    pub fn slug(self) -> String {
        self.display_name().to_lowercase().replace(' ', "_")
    }
}

/// Validated input record. The form collaborator guarantees required fields
/// are non-empty and date/time strings are already in display form.
#[derive(Clone, Debug, Deserialize)]
pub struct EventRecord {
    pub event_type: EventType,
    pub department: String,
    pub topic: String,
    #[serde(default)]
    pub expert: Option<String>,
    pub venue: String,
    pub date: String,
    pub time: String,
    pub coordinator: String,
    pub participant_count: u32,
    pub summary: String,
    pub outcome: String,
    pub faculty_in_charge: String,
    pub hod_name: String,
}

impl EventRecord {
    /// `{event_type}_1_{department}.docx`, spaces flattened to underscores.
    pub fn output_filename(&self) -> String {
        format!(
            "{}_1_{}.docx",
            self.event_type.slug(),
            self.department.replace(' ', "_")
        )
    }
}

/// Raw uploaded image bytes, already materialized by the caller.
#[derive(Clone, Debug)]
pub struct ImageResource {
    pub name: String,
    pub data: Vec<u8>,
}

/// Attachments grouped by gallery. An empty category suppresses its whole
/// section, heading and page break included.
#[derive(Clone, Debug, Default)]
pub struct ReportImages {
    pub invite: Option<ImageResource>,
    pub action: Vec<ImageResource>,
    pub attendance: Vec<ImageResource>,
    pub analysis: Vec<ImageResource>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

/// A decoded, placement-ready image. Display size is forced to the gallery's
/// fixed physical dimensions; the source aspect ratio is intentionally ignored.
#[derive(Clone)]
pub struct EmbeddedImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub width_cm: f32,
    pub height_cm: f32,
}

/// The terminal unit every text-bearing element decomposes into: one text
/// fragment with full character formatting, or one inline image.
#[derive(Clone)]
pub struct Run {
    pub text: String,
    pub font_name: String,
    pub font_size: f32,
    pub bold: bool,
    pub underline: bool,
    pub color: Option<[u8; 3]>,
    /// Emit a `w:br` before the text so label and value share one paragraph
    /// (signature cells).
    pub line_break_before: bool,
    pub image: Option<EmbeddedImage>,
}

pub struct Paragraph {
    pub runs: Vec<Run>,
    pub alignment: Alignment,
    pub indent_left: f32, // points
    pub page_break_before: bool,
}

impl Paragraph {
    pub fn empty() -> Self {
        Paragraph {
            runs: Vec::new(),
            alignment: Alignment::Left,
            indent_left: 0.0,
            page_break_before: false,
        }
    }
}

pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
}

pub struct TableRow {
    pub cells: Vec<TableCell>,
}

pub struct Table {
    /// Style id referenced from the template, e.g. "TableGrid".
    pub style_id: Option<&'static str>,
    /// Emit explicit single borders on every edge and inside line.
    pub grid_borders: bool,
    pub col_widths_cm: Vec<f32>,
    pub rows: Vec<TableRow>,
}

pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// One semantic row of the details table before padding/truncation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailRow {
    pub label: String,
    pub value: String,
}

impl DetailRow {
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        DetailRow {
            label: label.to_string(),
            value: value.into(),
        }
    }

    pub fn padding() -> Self {
        DetailRow {
            label: String::new(),
            value: String::new(),
        }
    }
}

/// Recoverable conditions collected during assembly and returned alongside
/// the artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    RowOverflow { dropped: Vec<String> },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::RowOverflow { dropped } => write!(
                f,
                "details table overflow: dropped rows [{}]",
                dropped.join(", ")
            ),
        }
    }
}
