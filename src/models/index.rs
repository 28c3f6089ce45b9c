use std::collections::HashMap;

/// Bidirectional display name <-> module ID index.
///
/// Always rebuilt from scratch from a single feed; never merged with a
/// previous index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameIdIndex {
    id_to_name: HashMap<String, String>,
    name_to_id: HashMap<String, String>,
}

impl NameIdIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record both directions for one module. Later entries win.
    pub fn insert(&mut self, name: &str, id: &str) {
        self.id_to_name.insert(id.to_string(), name.to_string());
        self.name_to_id.insert(name.to_string(), id.to_string());
    }

    pub fn id_for_name(&self, name: &str) -> Option<&str> {
        self.name_to_id.get(name).map(String::as_str)
    }

    pub fn name_for_id(&self, id: &str) -> Option<&str> {
        self.id_to_name.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }
}
