//! Visual markers for resource kinds.
//!
//! Each kind with a resolution rule gets its own shape; everything else,
//! placeholders included, shares the default.

use kubegraph_core::ResourceKind;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Marker {
    Dot,
    Diamond,
    Square,
    Triangle,
    TriangleDown,
}

impl Marker {
    pub fn for_kind(kind: &ResourceKind) -> Self {
        match kind {
            ResourceKind::Ingress => Self::Dot,
            ResourceKind::Service => Self::Diamond,
            ResourceKind::Deployment => Self::Square,
            ResourceKind::DaemonSet => Self::Triangle,
            ResourceKind::UnknownService | ResourceKind::Other(_) => Self::TriangleDown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Diamond => "diamond",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::TriangleDown => "triangleDown",
        }
    }

    /// Single-character glyph for terminal output.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Dot => "●",
            Self::Diamond => "◆",
            Self::Square => "■",
            Self::Triangle => "▲",
            Self::TriangleDown => "▼",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
