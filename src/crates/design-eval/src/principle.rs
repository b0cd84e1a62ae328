//! The built-in design principles.

use crate::error::EvalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named evaluative lens applied to a graphic design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignPrinciple {
    /// Horizontal/vertical alignment of text and graphic elements.
    Alignment,
    /// Overlap between text and graphics, and elements past the boundary.
    Overlap,
    /// Use of negative space, spacing and margins.
    #[serde(alias = "white_space", alias = "white-space")]
    Whitespace,
}

impl DesignPrinciple {
    /// All built-in principles.
    pub const ALL: [DesignPrinciple; 3] = [
        DesignPrinciple::Alignment,
        DesignPrinciple::Overlap,
        DesignPrinciple::Whitespace,
    ];

    /// Lowercase name, as used in prompts and config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            DesignPrinciple::Alignment => "alignment",
            DesignPrinciple::Overlap => "overlap",
            DesignPrinciple::Whitespace => "whitespace",
        }
    }
}

impl fmt::Display for DesignPrinciple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DesignPrinciple {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alignment" => Ok(DesignPrinciple::Alignment),
            "overlap" => Ok(DesignPrinciple::Overlap),
            "whitespace" | "white_space" | "white-space" => Ok(DesignPrinciple::Whitespace),
            _ => Err(EvalError::UnknownPrinciple(s.to_string())),
        }
    }
}
