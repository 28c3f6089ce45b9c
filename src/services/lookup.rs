use crate::models::{IgnoreTable, NameIdIndex};

const ASCII_APOSTROPHE: char = '\'';
const TYPOGRAPHIC_APOSTROPHE: char = '’';

/// The same identifier written with the other apostrophe glyph.
///
/// Straight apostrophes are replaced when present, otherwise typographic
/// ones. `None` if the identifier has neither.
pub fn swap_apostrophes(identifier: &str) -> Option<String> {
    if identifier.contains(ASCII_APOSTROPHE) {
        Some(identifier.replace(ASCII_APOSTROPHE, &TYPOGRAPHIC_APOSTROPHE.to_string()))
    } else if identifier.contains(TYPOGRAPHIC_APOSTROPHE) {
        Some(identifier.replace(TYPOGRAPHIC_APOSTROPHE, &ASCII_APOSTROPHE.to_string()))
    } else {
        None
    }
}

/// Map a display name (in either apostrophe spelling) to its module ID.
///
/// Anything that is not a known display name is assumed to be an ID already.
pub fn resolve_module_id<'a>(index: &'a NameIdIndex, identifier: &'a str) -> &'a str {
    if let Some(id) = index.id_for_name(identifier) {
        return id;
    }

    if let Some(id) = swap_apostrophes(identifier)
        .as_deref()
        .and_then(|alternate| index.id_for_name(alternate))
    {
        return id;
    }

    identifier
}

/// Look up what a module ignores.
///
/// # Arguments
/// * `identifier` - display name or module ID
/// * `want_ids` - return module IDs instead of display names
///
/// # Returns
/// A fresh list, or `None` if the module has no entry. With `want_ids` false,
/// IDs without a known name are returned unchanged.
pub fn resolve_ignore_list(
    table: &IgnoreTable,
    index: &NameIdIndex,
    identifier: &str,
    want_ids: bool,
) -> Option<Vec<String>> {
    let id = resolve_module_id(index, identifier);
    let ignored = table.get(id)?;

    let list = if want_ids {
        ignored.clone()
    } else {
        ignored
            .iter()
            .map(|id| index.name_for_id(id).unwrap_or(id.as_str()).to_string())
            .collect()
    };

    Some(list)
}
