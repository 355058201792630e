/// Shadow markers, tried in order. Only the first match is stripped.
///
/// `-shadow` can no longer occur after [`normalize_name`] folds dashes, but it
/// is kept so that un-normalized keys strip the same way.
pub const SHADOW_SUFFIXES: [&str; 5] = ["__shadow", "_shadow", "-shadow", "(shadow)", "shadow"];

/// Reduce a file name to its matching form.
///
/// Drops the extension, lower-cases, and folds spaces, dashes and any dots
/// left in the stem into underscores. Folding the stem's dots keeps the
/// function idempotent: a second pass finds no extension to drop.
pub fn normalize_name(filename: &str) -> String {
    strip_extension(filename)
        .to_lowercase()
        .chars()
        .map(|c| match c {
            // Dots fold too, so `hero.v2_shadow.png` pairs with `hero_v2.png`
            ' ' | '-' | '.' => '_',
            other => other,
        })
        .collect()
}

/// Remove at most one trailing shadow marker from a normalized name.
pub fn strip_shadow_suffix(name: &str) -> &str {
    SHADOW_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name)
}

/// Drop the last extension of the final path component.
///
/// Leading dots do not start an extension, so `.hidden` keeps its name.
fn strip_extension(filename: &str) -> &str {
    let base_start = filename.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let base = &filename[base_start..];
    let leading_dots = base.len() - base.trim_start_matches('.').len();

    match base.rfind('.') {
        Some(dot) if dot >= leading_dots => &filename[..base_start + dot],
        _ => filename,
    }
}
