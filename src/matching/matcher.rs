use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use super::{normalize_name, strip_shadow_suffix};

/// Shadow file names grouped by canonical key.
///
/// Candidates keep the order in which they were supplied.
#[derive(Debug, Clone, Default)]
pub struct ShadowCandidates {
    by_key: HashMap<String, Vec<String>>,
}

/// Outcome of looking up one sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus<'a> {
    /// Exactly one shadow reduces to the sprite's key
    Matched(&'a str),
    /// No shadow reduces to the sprite's key
    Missing,
    /// Several shadows reduce to the key; `resolved` is the tie-break winner
    Ambiguous {
        resolved: &'a str,
        candidates: &'a [String],
    },
}

impl MatchStatus<'_> {
    /// Shadow file to use, if any
    pub fn resolved(&self) -> Option<&str> {
        match *self {
            MatchStatus::Matched(name) => Some(name),
            MatchStatus::Missing => None,
            MatchStatus::Ambiguous { resolved, .. } => Some(resolved),
        }
    }
}

impl ShadowCandidates {
    pub fn build<S: AsRef<str>>(shadow_names: &[S]) -> Self {
        let mut by_key: HashMap<String, Vec<String>> = HashMap::new();
        for name in shadow_names {
            let name = name.as_ref();
            let normalized = normalize_name(name);
            let key = strip_shadow_suffix(&normalized).to_string();
            by_key.entry(key).or_default().push(name.to_string());
        }
        Self { by_key }
    }

    /// Candidates registered under a canonical key
    pub fn candidates(&self, key: &str) -> Option<&[String]> {
        self.by_key.get(key).map(Vec::as_slice)
    }

    /// Number of distinct canonical keys
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Look up the shadow for a sprite file name
    pub fn lookup(&self, sprite_name: &str) -> MatchStatus<'_> {
        let key = normalize_name(sprite_name);
        match self.candidates(&key) {
            None | Some([]) => MatchStatus::Missing,
            Some([single]) => MatchStatus::Matched(single),
            Some(candidates) => match resolve_ambiguous(candidates) {
                Some(resolved) => MatchStatus::Ambiguous {
                    resolved,
                    candidates,
                },
                None => MatchStatus::Missing,
            },
        }
    }
}

/// Pick one shadow out of several: shortest name first, then byte-wise order.
pub fn resolve_ambiguous(candidates: &[String]) -> Option<&str> {
    candidates
        .iter()
        .min_by(|a, b| {
            a.chars()
                .count()
                .cmp(&b.chars().count())
                .then_with(|| a.cmp(b))
        })
        .map(String::as_str)
}

/// A sprite with more than one shadow candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousShadow {
    pub sprite: String,
    pub candidates: Vec<String>,
}

/// Shadow resolution for a whole sprite set
#[derive(Debug, Clone, Default)]
pub struct ShadowMatches {
    /// Sprite name to resolved shadow name, ambiguous sprites included
    pub matches: HashMap<String, String>,
    /// Sprites without any candidate, in input order
    pub missing: Vec<String>,
    /// Sprites with several candidates, in input order
    pub ambiguous: Vec<AmbiguousShadow>,
}

impl ShadowMatches {
    pub fn shadow_for(&self, sprite_name: &str) -> Option<&str> {
        self.matches.get(sprite_name).map(String::as_str)
    }
}

/// Resolve a shadow for every sprite.
pub fn match_shadows<S: AsRef<str>, T: AsRef<str>>(
    sprite_names: &[S],
    shadow_names: &[T],
) -> ShadowMatches {
    let candidates = ShadowCandidates::build(shadow_names);
    let mut result = ShadowMatches::default();
    if candidates.is_empty() {
        debug!("No shadow images to match against");
    } else {
        debug!(
            "{} shadow images under {} keys",
            shadow_names.len(),
            candidates.len()
        );
    }

    for sprite in sprite_names {
        let sprite = sprite.as_ref();
        let status = candidates.lookup(sprite);

        if let MatchStatus::Ambiguous {
            resolved,
            candidates,
        } = status
        {
            debug!(
                "Ambiguous shadow for {}: {:?}, using {}",
                sprite, candidates, resolved
            );
            result.ambiguous.push(AmbiguousShadow {
                sprite: sprite.to_string(),
                candidates: candidates.to_vec(),
            });
        }

        match status.resolved() {
            Some(shadow) => {
                result
                    .matches
                    .insert(sprite.to_string(), shadow.to_string());
            }
            None => result.missing.push(sprite.to_string()),
        }
    }

    debug!(
        "Shadow matching: {} matched, {} missing, {} ambiguous",
        result.matches.len(),
        result.missing.len(),
        result.ambiguous.len()
    );

    result
}
