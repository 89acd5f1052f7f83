//! Details-table row staging: conditional inclusion first, then a separate
//! padding/truncation step so both stages stay independently testable.

use crate::model::{DetailRow, EventRecord, EventType, Warning};

/// The rendered details table always has exactly this many rows.
pub const DETAILS_ROW_COUNT: usize = 7;

/// Stage 1: the semantic rows that apply to this record. The "Expert" row
/// is excluded for field visits, and whenever no expert was recorded.
pub fn build_detail_rows(record: &EventRecord) -> Vec<DetailRow> {
    let mut rows = vec![DetailRow::new("Topic", record.topic.clone())];
    if record.event_type != EventType::FieldVisit
        && let Some(expert) = &record.expert
    {
        rows.push(DetailRow::new("Expert", expert.clone()));
    }
    rows.push(DetailRow::new("Venue", record.venue.clone()));
    rows.push(DetailRow::new("Date", record.date.clone()));
    rows.push(DetailRow::new("Time", record.time.clone()));
    rows.push(DetailRow::new("Faculty Coordinator", record.coordinator.clone()));
    rows.push(DetailRow::new(
        "Number of Participants",
        record.participant_count.to_string(),
    ));
    rows
}

/// Stage 2: force the candidate list to exactly [`DETAILS_ROW_COUNT`] rows.
/// Shortfall is padded with empty rows; overflow is truncated and reported
/// as a [`Warning::RowOverflow`], since it signals a config/content
/// mismatch rather than a fatal fault.
pub fn pad_detail_rows(mut rows: Vec<DetailRow>, warnings: &mut Vec<Warning>) -> Vec<DetailRow> {
    if rows.len() > DETAILS_ROW_COUNT {
        let dropped = rows
            .split_off(DETAILS_ROW_COUNT)
            .into_iter()
            .map(|row| row.label)
            .collect();
        warnings.push(Warning::RowOverflow { dropped });
    }
    while rows.len() < DETAILS_ROW_COUNT {
        rows.push(DetailRow::padding());
    }
    rows
}
