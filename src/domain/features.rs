//! Feature schema and feature vectors.
//!
//! The schema is the ordered list of columns the model was fit on; a feature
//! vector always carries exactly those columns in exactly that order.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::clinical::ValidationError;

/// Error type for feature encoding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodingError {
    #[error("Feature schema is empty")]
    EmptySchema,

    #[error("Feature schema column {0} is blank")]
    BlankColumn(usize),

    #[error("Feature schema lists column {0:?} more than once")]
    DuplicateColumn(String),

    #[error("Invalid clinical input: {0}")]
    InvalidInput(#[from] ValidationError),
}

/// Ordered, non-empty, duplicate-free list of feature column names.
///
/// Cloning is cheap: the column list is shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    columns: Arc<[String]>,
}

impl FeatureSchema {
    /// Build a schema from column names in training order.
    ///
    /// # Errors
    /// Returns `EncodingError` if the list is empty, contains a blank name or
    /// repeats a name.
    pub fn new<I, S>(columns: I) -> Result<Self, EncodingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(EncodingError::EmptySchema);
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(EncodingError::BlankColumn(i));
            }
            if !seen.insert(name.as_str()) {
                return Err(EncodingError::DuplicateColumn(name.clone()));
            }
        }

        Ok(Self {
            columns: columns.into(),
        })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column in training order.
    #[must_use]
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    /// Columns of this schema that start with `<prefix>_`.
    pub fn group<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.columns.iter().map(String::as_str).filter(move |c| {
            c.strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('_'))
        })
    }
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = EncodingError;

    fn try_from(columns: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.columns.to_vec()
    }
}

/// Numeric feature values aligned with a [`FeatureSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    schema: FeatureSchema,
    values: Vec<f64>,
}

impl FeatureVector {
    /// A vector of zeros for `schema`.
    #[must_use]
    pub fn zeros(schema: &FeatureSchema) -> Self {
        Self {
            schema: schema.clone(),
            values: vec![0.0; schema.len()],
        }
    }

    pub(crate) fn set(&mut self, position: usize, value: f64) {
        self.values[position] = value;
    }

    #[must_use]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Column names in schema order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        self.schema.columns()
    }

    /// Values in schema order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.schema.position(column).map(|i| self.values[i])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.schema
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_rejects_empty() {
        assert_eq!(
            FeatureSchema::new(Vec::<String>::new()),
            Err(EncodingError::EmptySchema)
        );
    }

    #[test]
    fn test_schema_rejects_duplicates_and_blanks() {
        assert_eq!(
            FeatureSchema::new(["age", "sex", "age"]),
            Err(EncodingError::DuplicateColumn("age".into()))
        );
        assert_eq!(
            FeatureSchema::new(["age", "  "]),
            Err(EncodingError::BlankColumn(1))
        );
    }

    #[test]
    fn test_schema_deserializes_through_validation() {
        let schema: FeatureSchema =
            serde_json::from_str(r#"["age","sex","cp_asymptomatic"]"#).expect("valid");
        assert_eq!(schema.position("cp_asymptomatic"), Some(2));

        let empty: Result<FeatureSchema, _> = serde_json::from_str("[]");
        assert!(empty.is_err());
    }

    #[test]
    fn test_group_matches_whole_prefix() {
        let schema =
            FeatureSchema::new(["thal_normal", "thalch", "thal_fixed defect", "age"]).expect("ok");
        let group: Vec<_> = schema.group("thal").collect();
        assert_eq!(group, vec!["thal_normal", "thal_fixed defect"]);
    }

    #[test]
    fn test_vector_lookup() {
        let schema = FeatureSchema::new(["age", "sex"]).expect("ok");
        let mut v = FeatureVector::zeros(&schema);
        v.set(1, 1.0);

        assert_eq!(v.get("sex"), Some(1.0));
        assert_eq!(v.get("chol"), None);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![("age", 0.0), ("sex", 1.0)]);
    }
}
