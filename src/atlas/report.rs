use std::fmt;

use serde::{Serialize, Serializer};

use crate::matching::{AmbiguousShadow, ShadowMatches};

/// Why a sprite was left out of the atlas
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Pixel-identical to the previous decoded sprite
    Duplicate,
    /// No shadow image under the `ignoreSprite` policy
    MissingShadow,
    /// Processed size is not a whole number of tiles
    SizeAlignment,
    /// Footprint is wider than the atlas
    TooWide,
    /// Decoding or processing failed
    ProcessingError(String),
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::Duplicate => f.write_str("duplicate"),
            IgnoreReason::MissingShadow => f.write_str("missing shadow"),
            IgnoreReason::SizeAlignment => f.write_str("size alignment"),
            IgnoreReason::TooWide => f.write_str("too wide"),
            IgnoreReason::ProcessingError(cause) => write!(f, "processing error: {}", cause),
        }
    }
}

impl Serialize for IgnoreReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnoredSprite {
    pub name: String,
    pub reason: IgnoreReason,
}

impl IgnoredSprite {
    pub fn new(name: impl Into<String>, reason: IgnoreReason) -> Self {
        Self {
            name: name.into(),
            reason,
        }
    }
}

/// Diagnostics collected during one build, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub ignored: Vec<IgnoredSprite>,
    pub shadow_missing: Vec<String>,
    pub shadow_ambiguous: Vec<AmbiguousShadow>,
}

impl BuildReport {
    pub fn ignore(&mut self, sprite: IgnoredSprite) {
        self.ignored.push(sprite);
    }

    /// Copy the missing and ambiguous lists out of a shadow match run
    pub fn record_shadow_matches(&mut self, matches: &ShadowMatches) {
        self.shadow_missing.extend(matches.missing.iter().cloned());
        self.shadow_ambiguous
            .extend(matches.ambiguous.iter().cloned());
    }

    /// Reason a sprite was ignored, if it was
    pub fn reason_for(&self, name: &str) -> Option<&IgnoreReason> {
        self.ignored
            .iter()
            .find(|i| i.name == name)
            .map(|i| &i.reason)
    }

    /// True if nothing was ignored, missing or ambiguous
    pub fn is_clean(&self) -> bool {
        self.ignored.is_empty() && self.shadow_missing.is_empty() && self.shadow_ambiguous.is_empty()
    }
}
