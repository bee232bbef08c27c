// Name <-> id conversion against the player register.

use tracing::warn;

use crate::error::ZoneError;
use crate::provider::{PlayerId, PlayerLookup, PlayerName};

/// Upper-case the first character, lower-case the rest ("o'neil" ->
/// "O'neil", "MCCUTCHEN" -> "Mccutchen").
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

/// "First Last" display name with both parts capitalized.
pub fn display_name(name: &PlayerName) -> String {
    format!("{} {}", capitalize(&name.first), capitalize(&name.last))
}

/// Split "First Last" on its single space.
pub fn split_full_name(full: &str) -> Result<(&str, &str), ZoneError> {
    let trimmed = full.trim();
    let mut parts = trimmed.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(last), None) if !first.is_empty() && !last.is_empty() => {
            Ok((first, last))
        }
        _ => Err(ZoneError::MalformedName(full.to_string())),
    }
}

/// Replace each player id with its display name. Ids the register cannot
/// resolve are dropped.
pub async fn ids_to_names<V>(
    lookup: &dyn PlayerLookup,
    entries: Vec<(PlayerId, V)>,
) -> Vec<(String, V)> {
    let mut named = Vec::with_capacity(entries.len());
    for (id, value) in entries {
        match lookup.reverse_lookup(id).await {
            Ok(Some(name)) => named.push((display_name(&name), value)),
            Ok(None) => warn!("No register entry for player id {}", id),
            Err(e) => warn!("Error looking up player id {}: {}", id, e),
        }
    }
    named
}

/// Resolve "First Last" names to player ids, skipping names that are
/// malformed or unknown.
pub async fn names_to_ids<S: AsRef<str>>(lookup: &dyn PlayerLookup, names: &[S]) -> Vec<PlayerId> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        let (first, last) = match split_full_name(name) {
            Ok(parts) => parts,
            Err(e) => {
                warn!("Error in names_to_ids for player {}: {}", name, e);
                continue;
            }
        };
        match lookup.forward_lookup(last, first).await {
            Ok(Some(id)) => ids.push(id),
            Ok(None) => warn!("No player id found for {}", name),
            Err(e) => warn!("Error in names_to_ids for player {}: {}", name, e),
        }
    }
    ids
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
