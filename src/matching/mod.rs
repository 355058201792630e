//! Filename-based association of sprites with shadow images.

mod matcher;
mod normalize;

pub use matcher::{
    AmbiguousShadow, MatchStatus, ShadowCandidates, ShadowMatches, match_shadows,
    resolve_ambiguous,
};
pub use normalize::{SHADOW_SUFFIXES, normalize_name, strip_shadow_suffix};
