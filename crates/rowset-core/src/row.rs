//! Row and schema types.
//!
//! This module defines the [`Row`] type, the immutable unit of result
//! data the cursor layer navigates over, and the [`Schema`] describing
//! its columns.

use std::collections::HashMap;
use std::sync::Arc;

use crate::value::Value;

/// A schema defines the column labels and their order in a row.
///
/// Schemas are shared across every row of one result via `Arc`, so the
/// per-row cost is one pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Column labels in order (`Arc<str>` to avoid cloning).
    columns: Vec<Arc<str>>,
    /// Map from column label to index for fast lookup.
    label_to_index: HashMap<Arc<str>, usize>,
}

impl Schema {
    /// Creates a new schema from column labels.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        let columns: Vec<Arc<str>> = columns.into_iter().map(|s| Arc::from(s.as_str())).collect();
        let label_to_index =
            columns.iter().enumerate().map(|(i, label)| (Arc::clone(label), i)).collect();
        Self { columns, label_to_index }
    }

    /// Creates an empty schema.
    #[must_use]
    pub fn empty() -> Self {
        Self { columns: Vec::new(), label_to_index: HashMap::new() }
    }

    /// Returns the column labels as string slices.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(AsRef::as_ref).collect()
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Gets the index for a column label.
    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.label_to_index.get(label).copied()
    }

    /// Gets the column label at an index.
    #[must_use]
    pub fn column_at(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(AsRef::as_ref)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<String>> for Schema {
    fn from(columns: Vec<String>) -> Self {
        Self::new(columns)
    }
}

impl From<Vec<&str>> for Schema {
    fn from(columns: Vec<&str>) -> Self {
        Self::new(columns.into_iter().map(String::from).collect())
    }
}

/// An immutable row of result values.
///
/// Identity is positional: the same content may occur at two positions of
/// a result and those are distinct rows. Rows are constructed once by the
/// producing source and only ever read afterwards; there are no mutating
/// accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// The schema describing the columns.
    schema: Arc<Schema>,
    /// The values in this row.
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row with the given schema and values.
    ///
    /// The number of values must match the schema's column count.
    #[must_use]
    pub fn new(schema: Arc<Schema>, values: Vec<Value>) -> Self {
        debug_assert_eq!(
            schema.len(),
            values.len(),
            "row value count must match schema column count"
        );
        Self { schema, values }
    }

    /// Creates a row with a single labelled value.
    #[must_use]
    pub fn single(label: impl Into<String>, value: Value) -> Self {
        let schema = Arc::new(Schema::new(vec![label.into()]));
        Self { schema, values: vec![value] }
    }

    /// Returns the schema of this row.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the shared schema reference.
    #[must_use]
    pub fn schema_arc(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    /// Returns the values in this row.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Gets a value by column index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Gets a value by column label.
    #[must_use]
    pub fn get_by_name(&self, label: &str) -> Option<&Value> {
        self.schema.index_of(label).and_then(|i| self.values.get(i))
    }

    /// Consumes the row and returns the values.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_basic() {
        let schema = Schema::new(vec!["id".to_string(), "name".to_string()]);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.index_of("id"), Some(0));
        assert_eq!(schema.index_of("name"), Some(1));
        assert_eq!(schema.index_of("unknown"), None);
        assert_eq!(schema.column_at(1), Some("name"));
        assert_eq!(schema.column_at(5), None);
    }

    #[test]
    fn schema_from_strs() {
        let schema: Schema = vec!["a", "b"].into();
        assert_eq!(schema.columns(), &["a", "b"]);
    }

    #[test]
    fn row_basic() {
        let schema = Arc::new(Schema::new(vec!["id".to_string(), "name".to_string()]));
        let row = Row::new(Arc::clone(&schema), vec![Value::Int(1), Value::from("Alice")]);

        assert_eq!(row.len(), 2);
        assert_eq!(row.get(0), Some(&Value::Int(1)));
        assert_eq!(row.get_by_name("name"), Some(&Value::from("Alice")));
        assert_eq!(row.get_by_name("missing"), None);
    }

    #[test]
    fn row_single() {
        let row = Row::single("flag", Value::Bool(true));
        assert_eq!(row.len(), 1);
        assert_eq!(row.schema().columns(), &["flag"]);
        assert_eq!(row.get_by_name("flag"), Some(&Value::Bool(true)));
    }

    #[test]
    fn rows_with_equal_content_compare_equal() {
        let schema = Arc::new(Schema::new(vec!["n".to_string()]));
        let a = Row::new(Arc::clone(&schema), vec![Value::Int(7)]);
        let b = Row::new(Arc::clone(&schema), vec![Value::Int(7)]);
        // Content equality; positional identity is the cursor's concern.
        assert_eq!(a, b);
    }
}
