//! Filter registry.
//!
//! Filters are a fixed, named set of color transforms. Each one is either an
//! ordered list of per-pixel operations or the duotone composite, which the
//! renderer handles as grayscale followed by a gradient multiply.

use std::fmt;
use std::str::FromStr;

use photobooth_common::error::BoothError;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Identifier of a registered filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterId {
    #[default]
    Normal,
    Grayscale,
    Sepia,
    Vivid,
    Cool,
    Warm,
    Vintage,
    Fade,
    Dramatic,
    Duotone,
}

/// A single pixel operation. Semantics follow the CSS filter functions of
/// the same names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorOpKind {
    Grayscale,
    Sepia,
    HueRotate,
    Saturate,
    Contrast,
    Brightness,
}

/// An operation with its intensity.
///
/// `amount` is a fraction (`1.0` = 100%) for every kind except
/// [`ColorOpKind::HueRotate`], where it is in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorOp {
    pub kind: ColorOpKind,
    pub amount: f32,
}

impl ColorOp {
    pub const fn new(kind: ColorOpKind, amount: f32) -> Self {
        Self { kind, amount }
    }

    /// CSS filter function, e.g. `sepia(60%)` or `hue-rotate(190deg)`.
    pub fn css(&self) -> String {
        let name = match self.kind {
            ColorOpKind::HueRotate => {
                return format!("hue-rotate({}deg)", self.amount.round() as i32);
            }
            ColorOpKind::Grayscale => "grayscale",
            ColorOpKind::Sepia => "sepia",
            ColorOpKind::Saturate => "saturate",
            ColorOpKind::Contrast => "contrast",
            ColorOpKind::Brightness => "brightness",
        };
        format!("{name}({}%)", (self.amount * 100.0).round() as i32)
    }
}

/// Two-color gradient multiplied over a desaturated cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duotone {
    /// Color at the cell's top-left corner.
    pub from: Rgb,
    /// Color at the cell's bottom-right corner.
    pub to: Rgb,
}

/// How a filter transforms a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformDescriptor {
    /// Apply operations in order. An empty list is the identity.
    Ops(&'static [ColorOp]),
    /// Grayscale base with a multiply-blended gradient.
    Duotone(Duotone),
}

impl TransformDescriptor {
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Ops(ops) if ops.is_empty())
    }
}

/// A registry-defined filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    pub id: FilterId,
    pub label: &'static str,
    pub transform: TransformDescriptor,
    /// Whether the live preview needs the duotone overlay instead of a plain
    /// CSS filter.
    pub is_duotone_live: bool,
    /// Operations a presentation layer can use for swatches and the live
    /// camera preview.
    pub preview: &'static [ColorOp],
}

use ColorOpKind::{Brightness, Contrast, Grayscale, HueRotate, Saturate, Sepia};

const fn op(kind: ColorOpKind, amount: f32) -> ColorOp {
    ColorOp::new(kind, amount)
}

const NONE: &[ColorOp] = &[];
const GRAYSCALE: &[ColorOp] = &[op(Grayscale, 1.0)];
const SEPIA: &[ColorOp] = &[op(Sepia, 1.0)];
const VIVID: &[ColorOp] = &[op(Saturate, 2.0), op(Contrast, 1.1)];
const COOL: &[ColorOp] = &[op(HueRotate, 190.0), op(Saturate, 1.3), op(Brightness, 1.05)];
const WARM: &[ColorOp] = &[op(Sepia, 0.4), op(Saturate, 1.5), op(Brightness, 1.1)];
const VINTAGE: &[ColorOp] = &[
    op(Sepia, 0.6),
    op(Contrast, 0.85),
    op(Brightness, 0.9),
    op(Saturate, 0.75),
];
const FADE: &[ColorOp] = &[op(Brightness, 1.15), op(Contrast, 0.8), op(Saturate, 0.8)];
const DRAMATIC: &[ColorOp] = &[op(Contrast, 1.5), op(Brightness, 0.9), op(Grayscale, 0.2)];
const DUOTONE_PREVIEW: &[ColorOp] = &[
    op(Grayscale, 1.0),
    op(Sepia, 1.0),
    op(HueRotate, 220.0),
    op(Saturate, 5.0),
];

const fn ops(id: FilterId, label: &'static str, list: &'static [ColorOp]) -> FilterSpec {
    FilterSpec {
        id,
        label,
        transform: TransformDescriptor::Ops(list),
        is_duotone_live: false,
        preview: list,
    }
}

/// Every filter, in the order a filter bar shows them.
pub static FILTERS: [FilterSpec; 10] = [
    ops(FilterId::Normal, "Normal", NONE),
    ops(FilterId::Grayscale, "Gray", GRAYSCALE),
    ops(FilterId::Sepia, "Sepia", SEPIA),
    ops(FilterId::Vivid, "Vivid", VIVID),
    ops(FilterId::Cool, "Cool", COOL),
    ops(FilterId::Warm, "Warm", WARM),
    ops(FilterId::Vintage, "Vintage", VINTAGE),
    ops(FilterId::Fade, "Fade", FADE),
    ops(FilterId::Dramatic, "Drama", DRAMATIC),
    FilterSpec {
        id: FilterId::Duotone,
        label: "Duotone",
        transform: TransformDescriptor::Duotone(Duotone {
            from: Rgb::new(0x0a, 0x1a, 0xff),
            to: Rgb::new(0xcc, 0x00, 0xff),
        }),
        is_duotone_live: true,
        preview: DUOTONE_PREVIEW,
    },
];

impl FilterId {
    /// All filter identifiers.
    pub const ALL: [FilterId; 10] = [
        FilterId::Normal,
        FilterId::Grayscale,
        FilterId::Sepia,
        FilterId::Vivid,
        FilterId::Cool,
        FilterId::Warm,
        FilterId::Vintage,
        FilterId::Fade,
        FilterId::Dramatic,
        FilterId::Duotone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Grayscale => "grayscale",
            Self::Sepia => "sepia",
            Self::Vivid => "vivid",
            Self::Cool => "cool",
            Self::Warm => "warm",
            Self::Vintage => "vintage",
            Self::Fade => "fade",
            Self::Dramatic => "dramatic",
            Self::Duotone => "duotone",
        }
    }

    /// The registry entry for this identifier.
    pub fn spec(self) -> &'static FilterSpec {
        FILTERS
            .iter()
            .find(|f| f.id == self)
            .unwrap_or(&FILTERS[0])
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterId {
    type Err = BoothError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s.trim())
            .ok_or_else(|| BoothError::unknown_filter(s))
    }
}

impl FilterSpec {
    /// Look up a filter by its string identifier.
    pub fn by_id(id: &str) -> Result<&'static FilterSpec, BoothError> {
        Ok(id.parse::<FilterId>()?.spec())
    }

    /// CSS filter string for the live preview (`none` for the identity).
    pub fn preview_css(&self) -> String {
        css_filter(self.preview)
    }
}

/// Join operations into a CSS filter value.
pub fn css_filter(ops: &[ColorOp]) -> String {
    if ops.is_empty() {
        return "none".to_string();
    }
    ops.iter().map(ColorOp::css).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_complete_and_ordered() {
        let ids: Vec<_> = FILTERS.iter().map(|f| f.id).collect();
        assert_eq!(ids, FilterId::ALL.to_vec());
        for id in FilterId::ALL {
            assert_eq!(id.spec().id, id);
        }
    }

    #[test]
    fn test_only_duotone_uses_live_overlay() {
        for spec in &FILTERS {
            let is_duotone = matches!(spec.transform, TransformDescriptor::Duotone(_));
            assert_eq!(spec.is_duotone_live, is_duotone, "{}", spec.id);
        }
    }

    #[test]
    fn test_preview_css_matches_filter_chain() {
        assert_eq!(FilterId::Normal.spec().preview_css(), "none");
        assert_eq!(
            FilterId::Vintage.spec().preview_css(),
            "sepia(60%) contrast(85%) brightness(90%) saturate(75%)"
        );
        assert_eq!(
            FilterId::Cool.spec().preview_css(),
            "hue-rotate(190deg) saturate(130%) brightness(105%)"
        );
        assert_eq!(
            FilterId::Duotone.spec().preview_css(),
            "grayscale(100%) sepia(100%) hue-rotate(220deg) saturate(500%)"
        );
    }

    #[test]
    fn test_normal_is_identity() {
        assert!(FilterId::Normal.spec().transform.is_identity());
        assert!(!FilterId::Sepia.spec().transform.is_identity());
        assert!(!FilterId::Duotone.spec().transform.is_identity());
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        assert!(matches!(
            FilterSpec::by_id("lomo"),
            Err(BoothError::UnknownFilter { .. })
        ));
        assert_eq!(FilterSpec::by_id("fade").unwrap().label, "Fade");
    }
}
