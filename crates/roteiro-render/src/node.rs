//! Render output nodes.

use roteiro_script::{Alignment, ListKind, SegmentStyle};
use serde::Serialize;

/// One node of rendered output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderNode {
    /// Unstyled text.
    Plain {
        /// The text.
        text: String,
    },
    /// Text carrying a resolved style.
    Styled {
        /// The text.
        text: String,
        /// The resolved style.
        style: NodeStyle,
    },
    /// A line break, from a literal newline in the content.
    Break,
}

impl RenderNode {
    /// The text this node contributes to the step content. Concatenating
    /// `text()` over a rendered sequence reproduces the input exactly when
    /// every segment matched.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain { text } | Self::Styled { text, .. } => text,
            Self::Break => "\n",
        }
    }
}

/// A segment style resolved against the operator's base pixel size.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    /// Bold text.
    pub bold: bool,
    /// Italic text.
    pub italic: bool,
    /// Foreground color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Background color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Absolute pixel size, already scaled from the segment's size token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_px: Option<f32>,
    /// Horizontal alignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    /// Font family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// List rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<ListKind>,
    /// Text shadow.
    pub shadow: bool,
}

impl NodeStyle {
    /// Resolve a segment style. The size token scales `base_px` rather than
    /// encoding an absolute size, so the operator's accessibility control
    /// keeps working.
    #[must_use]
    pub fn from_segment(style: &SegmentStyle, base_px: f32) -> Self {
        Self {
            bold: style.bold,
            italic: style.italic,
            color: style.color.clone(),
            background: style.background.clone(),
            size_px: style.size.map(|size| base_px * size.multiplier()),
            alignment: style.alignment,
            font_family: style.font_family.clone(),
            list: style.list,
            shadow: style.shadow,
        }
    }

    /// The style substituted placeholder values render with.
    #[must_use]
    pub fn emphasis() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }
}
