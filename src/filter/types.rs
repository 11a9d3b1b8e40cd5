use serde_json::{Map, Value};

/// Translation table from client-facing field names to storage columns.
///
/// Names without an entry map to themselves. Columns listed as immutable
/// hold identity and may never appear in an update.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    renames: &'static [(&'static str, &'static str)],
    immutable: &'static [&'static str],
}

impl FieldMap {
    pub const fn new(renames: &'static [(&'static str, &'static str)]) -> Self {
        Self { renames, immutable: &[] }
    }

    pub const fn immutable(self, columns: &'static [&'static str]) -> Self {
        Self { renames: self.renames, immutable: columns }
    }

    /// Column name for an external field name.
    pub fn column<'a>(&self, field: &'a str) -> &'a str {
        self.renames
            .iter()
            .find(|(external, _)| *external == field)
            .map(|(_, column)| *column)
            .unwrap_or(field)
    }

    pub fn is_immutable(&self, column: &str) -> bool {
        self.immutable.contains(&column)
    }
}

/// Ordered field/value pairs for a partial update.
///
/// Placeholder numbering follows this order, so it is kept as a list rather
/// than a map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateFields(Vec<(String, Value)>);

impl UpdateFields {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, field: impl Into<String>, value: Value) -> &mut Self {
        self.0.push((field.into(), value));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(field, value)| (field.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Relies on serde_json's preserve_order so keys keep the order the client sent.
impl From<Map<String, Value>> for UpdateFields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for UpdateFields {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// How a recognized filter parameter constrains its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring match.
    Contains,
    /// `column >= value`
    AtLeast,
    /// `column <= value`
    AtMost,
    /// `column > 0`; the supplied value is ignored.
    NonZero,
}

#[derive(Debug, Clone, Copy)]
pub struct FilterField {
    pub param: &'static str,
    pub column: &'static str,
    pub predicate: Predicate,
}

impl FilterField {
    pub const fn new(param: &'static str, column: &'static str, predicate: Predicate) -> Self {
        Self { param, column, predicate }
    }
}

/// The whitelist of filter parameters one resource accepts.
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub resource: &'static str,
    pub fields: &'static [FilterField],
}

impl FilterSpec {
    pub const fn new(resource: &'static str, fields: &'static [FilterField]) -> Self {
        Self { resource, fields }
    }

    pub fn field(&self, param: &str) -> Option<&FilterField> {
        self.fields.iter().find(|f| f.param == param)
    }

    pub fn allowed(&self) -> String {
        self.fields.iter().map(|f| f.param).collect::<Vec<_>>().join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

impl SqlResult {
    /// Placeholder index for the first value appended after this fragment.
    pub fn next_param_index(&self) -> usize {
        self.params.len() + 1
    }
}

/// Plain SQL identifier: letters, digits and underscores, not starting with a digit.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLUMNS: FieldMap =
        FieldMap::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]).immutable(&["handle"]);

    #[test]
    fn translates_known_fields() {
        assert_eq!(COLUMNS.column("numEmployees"), "num_employees");
        assert_eq!(COLUMNS.column("logoUrl"), "logo_url");
    }

    #[test]
    fn passes_unknown_fields_through() {
        assert_eq!(COLUMNS.column("name"), "name");
        assert_eq!(COLUMNS.column("num_employees"), "num_employees");
    }

    #[test]
    fn update_fields_keep_insertion_order() {
        let mut map = Map::new();
        map.insert("zeta".into(), json!(1));
        map.insert("alpha".into(), json!(2));
        map.insert("mid".into(), Value::Null);

        let fields = UpdateFields::from(map);
        let names: Vec<&str> = fields.iter().map(|(f, _)| f).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("num_employees"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("name; DROP TABLE jobs"));
        assert!(!is_identifier("\"name\""));
    }
}
