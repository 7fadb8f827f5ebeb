//! Persisted session records.
//!
//! A record is the durable artifact of a completed session. Stores own the
//! records; the session core only triggers create and update calls.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::FilterSpec;
use crate::layout::Layout;

/// Store-assigned record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(RecordId)
    }
}

/// Encoding of composite bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EncodedFormat {
    #[default]
    Png,
    Jpeg,
}

impl EncodedFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Accepts `png`, `jpg`, and `jpeg` (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// Encoded image bytes with their format.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub format: EncodedFormat,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            format: EncodedFormat::Png,
            bytes,
        }
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A completed session as persisted by a store.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: RecordId,

    /// Creation time.
    pub timestamp: DateTime<Utc>,

    /// Layout identifier. Kept as a string so records written by other
    /// versions still load.
    pub layout_id: String,

    /// Filter identifier at save time (or at the last update).
    pub filter_id: String,

    /// The rendered composite.
    pub composite: EncodedImage,
}

/// Fields an update may replace. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub composite: Option<EncodedImage>,
    pub filter_id: Option<String>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.composite.is_none() && self.filter_id.is_none()
    }
}

/// Records that share a calendar month.
#[derive(Debug, Clone)]
pub struct MonthGroup<'a> {
    /// e.g. `October 2026`.
    pub label: String,
    pub records: Vec<&'a SessionRecord>,
}

impl SessionRecord {
    /// Human-readable layout label, falling back to the raw id.
    pub fn layout_label(&self) -> &str {
        Layout::by_id(&self.layout_id)
            .map(|l| l.label)
            .unwrap_or(self.layout_id.as_str())
    }

    /// Human-readable filter label, falling back to the raw id.
    pub fn filter_label(&self) -> &str {
        FilterSpec::by_id(&self.filter_id)
            .map(|f| f.label)
            .unwrap_or(self.filter_id.as_str())
    }

    /// Detail line, e.g. `Classic Strip  ·  Sepia  ·  October 16, 2026 at 2:05 PM`.
    pub fn meta_line<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        let local = self.timestamp.with_timezone(tz);
        format!(
            "{}  \u{b7}  {}  \u{b7}  {}",
            self.layout_label(),
            self.filter_label(),
            local.format("%B %-d, %Y at %-I:%M %p")
        )
    }

    /// Short time of day for gallery tiles, e.g. `2:05 PM`.
    pub fn time_label<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        self.timestamp
            .with_timezone(tz)
            .format("%-I:%M %p")
            .to_string()
    }
}

/// Order records newest first. Ties fall back to the higher id.
pub fn sort_newest_first(records: &mut [SessionRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
}

/// Group records by `Month YYYY` in the given time zone, preserving the
/// incoming order both across and within groups.
pub fn group_by_month<'a, Tz: TimeZone>(
    records: &'a [SessionRecord],
    tz: &Tz,
) -> Vec<MonthGroup<'a>>
where
    Tz::Offset: fmt::Display,
{
    let mut groups: Vec<MonthGroup<'a>> = Vec::new();
    for record in records {
        let label = record
            .timestamp
            .with_timezone(tz)
            .format("%B %Y")
            .to_string();
        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.records.push(record),
            None => groups.push(MonthGroup {
                label,
                records: vec![record],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, rfc3339: &str, layout: &str, filter: &str) -> SessionRecord {
        SessionRecord {
            id: RecordId(id),
            timestamp: DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc),
            layout_id: layout.to_string(),
            filter_id: filter.to_string(),
            composite: EncodedImage::png(vec![]),
        }
    }

    #[test]
    fn test_sort_newest_first_with_id_tiebreak() {
        let mut records = vec![
            record(1, "2026-09-01T10:00:00Z", "strip3", "normal"),
            record(3, "2026-10-02T10:00:00Z", "grid4", "sepia"),
            record(2, "2026-10-02T10:00:00Z", "single", "fade"),
        ];
        sort_newest_first(&mut records);
        let ids: Vec<_> = records.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_group_by_month_keeps_order() {
        let records = vec![
            record(4, "2026-10-15T12:00:00Z", "strip3", "normal"),
            record(3, "2026-10-01T12:00:00Z", "strip3", "normal"),
            record(2, "2026-09-20T12:00:00Z", "strip3", "normal"),
        ];
        let groups = group_by_month(&records, &Utc);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "October 2026");
        assert_eq!(groups[0].records.len(), 2);
        assert_eq!(groups[1].label, "September 2026");
        assert_eq!(groups[1].records[0].id, RecordId(2));
    }

    #[test]
    fn test_meta_line_falls_back_to_raw_ids() {
        let known = record(1, "2026-10-16T14:05:00Z", "strip3", "sepia");
        assert_eq!(
            known.meta_line(&Utc),
            "Classic Strip  \u{b7}  Sepia  \u{b7}  October 16, 2026 at 2:05 PM"
        );
        assert_eq!(known.time_label(&Utc), "2:05 PM");

        let legacy = record(2, "2026-10-16T14:05:00Z", "strip9", "lomo");
        assert!(legacy.meta_line(&Utc).starts_with("strip9  \u{b7}  lomo"));
    }

    #[test]
    fn test_format_extensions() {
        assert_eq!(EncodedFormat::from_extension("JPEG"), Some(EncodedFormat::Jpeg));
        assert_eq!(EncodedFormat::from_extension("png"), Some(EncodedFormat::Png));
        assert_eq!(EncodedFormat::from_extension("gif"), None);
        assert_eq!(EncodedFormat::Jpeg.extension(), "jpg");
    }
}
