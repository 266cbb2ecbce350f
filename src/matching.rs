use std::collections::HashSet;

/// Convert a team name to a URL-safe slug
/// - Lowercases the input
/// - Strips everything except ASCII letters, digits, spaces and hyphens
/// - Replaces whitespace runs with a single hyphen
/// - Collapses multiple hyphens
/// - Trims leading/trailing hyphens
pub fn slug(name: &str) -> String {
    // Pre-allocate with input length as estimate
    let mut result = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen {
                result.push('-');
                pending_hyphen = false;
            }
            result.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            // Separator runs collapse to one hyphen; leading separators drop
            if !result.is_empty() {
                pending_hyphen = true;
            }
        }
        // Everything else is stripped entirely
    }

    result
}

/// Normalize a team name for matching
/// - Convert to lowercase
/// - Remove special characters (keep only ASCII alphanumerics and spaces)
/// - Normalize whitespace (trim and collapse multiple spaces)
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_ascii_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Decide whether a logo filename stem plausibly names a known team.
///
/// Three cheap heuristics, tried in order, first hit wins:
/// 1. whole-string containment between the normalized forms
/// 2. slug containment against the raw lowercased stem
/// 3. at least two shared words between the normalized forms
///
/// Hyphens in the stem are word separators for the normalized checks; the
/// slug check sees the stem as-is. These thresholds are tuned to the logo
/// dataset at hand. Misses return false; nothing here fails.
pub fn matches(stem: &str, known_name: &str) -> bool {
    let team_norm = normalize(known_name);
    let base_norm = normalize(&stem.replace('-', " "));

    // Containment on normalized forms. Empty operands match everything
    // under contains(), so both sides must be non-empty.
    if !team_norm.is_empty()
        && !base_norm.is_empty()
        && (base_norm.contains(&team_norm) || team_norm.contains(&base_norm))
    {
        return true;
    }

    // Slug containment against the raw lowercased stem
    let team_slug = slug(known_name);
    let base = stem.to_lowercase();
    if !team_slug.is_empty()
        && !base.is_empty()
        && (base.contains(&team_slug) || team_slug.contains(&base))
    {
        return true;
    }

    // Word overlap. Two shared words required, so a lone "state" never
    // bridges two unrelated schools.
    let team_words: HashSet<&str> = team_norm.split_whitespace().collect();
    let base_words: HashSet<&str> = base_norm.split_whitespace().collect();
    team_words.intersection(&base_words).count() >= 2
}
