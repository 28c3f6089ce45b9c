use serde_json::Value;

/// Top-level key of the feed document holding the module array.
pub const FEED_MODULES_KEY: &str = "KtaneModules";

/// State of a descriptor's ignore list as found in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreListField {
    /// Neither `IgnoreProcessed` nor `Ignore` is present.
    Missing,

    /// Present but not an array made exclusively of strings.
    Malformed,

    Valid(Vec<String>),
}

/// One entry of the feed's module array.
///
/// Descriptors are read leniently: a field of the wrong type is treated as
/// absent instead of failing the whole feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub name: Option<String>,
    pub module_id: Option<String>,
    pub ignore_list: IgnoreListField,
}

impl ModuleDescriptor {
    /// Read a descriptor from a raw feed entry.
    ///
    /// `IgnoreProcessed` wins over `Ignore` whenever it is present.
    pub fn from_value(value: &Value) -> Self {
        let name = value.get("Name").and_then(Value::as_str).map(str::to_string);
        let module_id = value
            .get("ModuleID")
            .and_then(Value::as_str)
            .map(str::to_string);

        let raw_list = match value.get("IgnoreProcessed") {
            Some(list) if !list.is_null() => Some(list),
            _ => value.get("Ignore").filter(|list| !list.is_null()),
        };

        let ignore_list = match raw_list {
            None => IgnoreListField::Missing,
            Some(list) => parse_ignore_list(list),
        };

        Self {
            name,
            module_id,
            ignore_list,
        }
    }
}

fn parse_ignore_list(list: &Value) -> IgnoreListField {
    let Some(entries) = list.as_array() else {
        return IgnoreListField::Malformed;
    };

    let mut parsed = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.as_str() {
            Some(s) => parsed.push(s.to_string()),
            None => return IgnoreListField::Malformed,
        }
    }

    IgnoreListField::Valid(parsed)
}
