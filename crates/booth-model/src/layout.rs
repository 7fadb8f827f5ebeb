//! Layout registry.
//!
//! A layout fixes how many shots a session takes and how the composite
//! arranges them into columns and rows.

use std::fmt;
use std::str::FromStr;

use photobooth_common::error::BoothError;
use serde::{Deserialize, Serialize};

/// Identifier of a registered layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutId {
    Single,
    #[default]
    Strip3,
    Strip4,
    Grid4,
    Wide4,
}

/// An immutable, registry-defined arrangement of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub id: LayoutId,
    pub shot_count: u32,
    pub columns: u32,
    pub rows: u32,
    pub label: &'static str,
}

/// Every layout, in the order a picker shows them.
pub static LAYOUTS: [Layout; 5] = [
    Layout {
        id: LayoutId::Single,
        shot_count: 1,
        columns: 1,
        rows: 1,
        label: "Single Shot",
    },
    Layout {
        id: LayoutId::Strip3,
        shot_count: 3,
        columns: 1,
        rows: 3,
        label: "Classic Strip",
    },
    Layout {
        id: LayoutId::Strip4,
        shot_count: 4,
        columns: 1,
        rows: 4,
        label: "Tall Strip",
    },
    Layout {
        id: LayoutId::Grid4,
        shot_count: 4,
        columns: 2,
        rows: 2,
        label: "2×2 Grid",
    },
    Layout {
        id: LayoutId::Wide4,
        shot_count: 4,
        columns: 4,
        rows: 1,
        label: "Wide Strip",
    },
];

impl LayoutId {
    /// All layout identifiers.
    pub const ALL: [LayoutId; 5] = [
        LayoutId::Single,
        LayoutId::Strip3,
        LayoutId::Strip4,
        LayoutId::Grid4,
        LayoutId::Wide4,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Strip3 => "strip3",
            Self::Strip4 => "strip4",
            Self::Grid4 => "grid4",
            Self::Wide4 => "wide4",
        }
    }

    /// The registry entry for this identifier.
    pub fn layout(self) -> &'static Layout {
        LAYOUTS
            .iter()
            .find(|l| l.id == self)
            .unwrap_or(&LAYOUTS[1])
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutId {
    type Err = BoothError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s.trim())
            .ok_or_else(|| BoothError::unknown_layout(s))
    }
}

impl Layout {
    /// Look up a layout by its string identifier.
    pub fn by_id(id: &str) -> Result<&'static Layout, BoothError> {
        Ok(id.parse::<LayoutId>()?.layout())
    }

    /// Label shown while shooting: the shot about to be taken, one-based.
    ///
    /// Clamps to the last shot once the layout is full.
    pub fn counter_label(&self, shots_taken: usize) -> String {
        let next = (shots_taken + 1).min(self.shot_count as usize);
        format!("Shot {next} of {}", self.shot_count)
    }

    /// Label for previewing an existing shot at `index`.
    pub fn preview_label(&self, index: usize) -> String {
        format!("Shot {} of {}", index + 1, self.shot_count)
    }

    /// Picker caption, e.g. `Classic Strip · 3 photos`.
    pub fn caption(&self) -> String {
        let plural = if self.shot_count > 1 { "s" } else { "" };
        format!("{} \u{b7} {} photo{plural}", self.label, self.shot_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_layout_is_a_full_grid() {
        for layout in &LAYOUTS {
            assert!(layout.shot_count >= 1);
            assert_eq!(
                layout.columns * layout.rows,
                layout.shot_count,
                "{} grid does not match shot count",
                layout.id
            );
        }
    }

    #[test]
    fn test_lookup_by_string() {
        let layout = Layout::by_id("grid4").unwrap();
        assert_eq!(layout.columns, 2);
        assert_eq!(layout.rows, 2);
        assert!(matches!(
            Layout::by_id("strip9"),
            Err(BoothError::UnknownLayout { .. })
        ));
    }

    #[test]
    fn test_default_is_classic_strip() {
        assert_eq!(LayoutId::default().layout().label, "Classic Strip");
    }

    #[test]
    fn test_counter_labels() {
        let strip = LayoutId::Strip3.layout();
        assert_eq!(strip.counter_label(0), "Shot 1 of 3");
        assert_eq!(strip.counter_label(2), "Shot 3 of 3");
        assert_eq!(strip.counter_label(3), "Shot 3 of 3");
        assert_eq!(strip.preview_label(1), "Shot 2 of 3");
        assert_eq!(LayoutId::Single.layout().caption(), "Single Shot \u{b7} 1 photo");
    }

    #[test]
    fn test_serde_uses_registry_ids() {
        let json = serde_json::to_string(&LayoutId::Wide4).unwrap();
        assert_eq!(json, "\"wide4\"");
        let parsed: LayoutId = serde_json::from_str("\"strip4\"").unwrap();
        assert_eq!(parsed, LayoutId::Strip4);
    }
}
