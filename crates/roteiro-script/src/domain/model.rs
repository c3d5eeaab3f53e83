//! The script graph data model.

use serde::{Deserialize, Serialize};

use super::annotations::{Alert, Tabulation};
use super::ids::{ButtonId, ProductId, SegmentId, StepId};

/// One screen of a script; a node in the traversal graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Stable identifier; buttons reference steps by this id.
    pub id: StepId,
    /// Title shown above the content.
    pub title: String,
    /// Plain text with embedded placeholder tokens and literal newlines.
    #[serde(default)]
    pub content: String,
    /// Ordered transitions out of this step.
    #[serde(default)]
    pub buttons: Vec<Button>,
    /// Ordered styled sub-ranges overlaid on the content at render time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<ContentSegment>,
    /// Advisory call-closing-code recommendations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tabulations: Vec<Tabulation>,
    /// Optional alert surfaced to the operator on arrival.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<Alert>,
    /// Step-level formatting applied when no segments exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatting: Option<StepFormatting>,
    /// Owning product; `None` means a standalone step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    /// Position in the admin listing. Not a traversal order.
    #[serde(default)]
    pub order: u32,
}

impl Step {
    /// Find a button on this step by id.
    #[must_use]
    pub fn button(&self, id: &ButtonId) -> Option<&Button> {
        self.buttons.iter().find(|button| &button.id == id)
    }
}

/// A labeled transition out of a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    /// Button identifier, unique within its step.
    pub id: ButtonId,
    /// Label the operator clicks.
    pub label: String,
    /// Destination step; `None` means end of script. May dangle — integrity
    /// is validated at traversal time, not at write time.
    #[serde(default)]
    pub next_step_id: Option<StepId>,
    /// Position among the step's buttons.
    #[serde(default)]
    pub order: u32,
    /// Visual emphasis only; no effect on traversal.
    #[serde(default)]
    pub primary: bool,
}

/// A styled sub-range of a step's content, matched by text rather than by
/// offset. Matching advances left-to-right, so a repeated substring is
/// styled only at its first unconsumed occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSegment {
    /// Segment identifier.
    pub id: SegmentId,
    /// Exact substring of the owning step's content.
    pub text: String,
    /// Formatting applied to the matched range.
    #[serde(default)]
    pub style: SegmentStyle,
}

/// Formatting record carried by a content segment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SegmentStyle {
    /// Bold text.
    pub bold: bool,
    /// Italic text.
    pub italic: bool,
    /// Foreground color (CSS color string).
    pub color: Option<String>,
    /// Background color (CSS color string).
    pub background: Option<String>,
    /// Size token scaling the operator's base size.
    pub size: Option<FontSize>,
    /// Horizontal alignment.
    pub alignment: Option<Alignment>,
    /// Font family name.
    pub font_family: Option<String>,
    /// Renders the range as a list item.
    pub list: Option<ListKind>,
    /// Text shadow.
    pub shadow: bool,
}

/// Relative size token. Scales a caller-supplied base pixel size so renderer
/// output stays consistent with the operator's accessibility scale control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontSize {
    /// Small.
    #[serde(rename = "sm")]
    Sm,
    /// The base size itself.
    #[serde(rename = "base")]
    Base,
    /// Large.
    #[serde(rename = "lg")]
    Lg,
    /// Extra large.
    #[serde(rename = "xl")]
    Xl,
    /// Double extra large.
    #[serde(rename = "2xl")]
    Xl2,
    /// Triple extra large.
    #[serde(rename = "3xl")]
    Xl3,
}

impl FontSize {
    /// Multiplier applied to the base pixel size.
    #[must_use]
    pub fn multiplier(self) -> f32 {
        match self {
            Self::Sm => 0.875,
            Self::Base => 1.0,
            Self::Lg => 1.125,
            Self::Xl => 1.25,
            Self::Xl2 => 1.5,
            Self::Xl3 => 1.875,
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left aligned.
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
    /// Justified.
    Justify,
}

/// List rendering for a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// Bulleted list item.
    Bullet,
    /// Numbered list item.
    Numbered,
}

/// Step-level formatting, used when the content has no segments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StepFormatting {
    /// Foreground color (CSS color string).
    pub color: Option<String>,
    /// Bold text.
    pub bold: bool,
    /// Italic text.
    pub italic: bool,
    /// Horizontal alignment.
    pub alignment: Option<Alignment>,
}

/// A named script an operator selects to start a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Grouping category for the product list.
    #[serde(default)]
    pub category: String,
    /// Inactive products are hidden from operators.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Entry step of the script.
    #[serde(default)]
    pub first_step_id: Option<StepId>,
    /// Discovery tag; never affects traversal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance_kind: Option<String>,
    /// Discovery tag; never affects traversal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_kind: Option<String>,
}

fn default_active() -> bool {
    true
}
