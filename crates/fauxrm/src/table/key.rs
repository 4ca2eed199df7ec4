use fauxrm_core::{schema::TableSchema, stmt::Value, Error, Result};

/// Identifies one row by its primary key.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    /// The value of a single-column key
    Value(Value),

    /// Every column of a (usually composite) key, by name
    Fields(Vec<(String, Value)>),
}

impl Key {
    /// Checks the key against the table's primary key and returns it as
    /// column/value pairs in key order.
    pub(crate) fn resolve(self, schema: &TableSchema) -> Result<Vec<(String, Value)>> {
        let pk = &schema.primary_key;

        let Some(first) = pk.columns.first() else {
            return Err(Error::invalid_statement(format!(
                "`{}` has no primary key",
                schema.name
            )));
        };

        let fields = match self {
            Key::Value(value) if !pk.is_composite() => vec![(first.clone(), value)],
            Key::Value(_) => {
                return Err(Error::incomplete_key(format!(
                    "`{}` has the composite key {pk}; 1 field given",
                    schema.name
                )))
            }
            Key::Fields(fields) => {
                if fields.len() != pk.field_count() {
                    return Err(Error::incomplete_key(format!(
                        "`{}` has the key {pk}; {} field(s) given",
                        schema.name,
                        fields.len()
                    )));
                }

                let mut resolved = Vec::with_capacity(fields.len());

                for (field, value) in fields {
                    let column = schema.resolve(&field)?;

                    if !pk.contains(&column.name) {
                        return Err(Error::incomplete_key(format!(
                            "`{field}` is not part of the key {pk} of `{}`",
                            schema.name
                        )));
                    }

                    if resolved.iter().any(|(name, _)| *name == column.name) {
                        return Err(Error::incomplete_key(format!(
                            "`{field}` given more than once for the key {pk} of `{}`",
                            schema.name
                        )));
                    }

                    resolved.push((column.name.clone(), value));
                }

                resolved
            }
        };

        if let Some((name, _)) = fields.iter().find(|(_, value)| value.is_list()) {
            return Err(Error::incomplete_key(format!(
                "key field `{name}` must be a single value"
            )));
        }

        Ok(fields)
    }
}

impl From<Value> for Key {
    fn from(value: Value) -> Self {
        Key::Value(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Value(value.into())
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Value(value.into())
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Value(value.into())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Value(value.into())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Key
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(fields: [(K, V); N]) -> Self {
        Key::Fields(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl From<Vec<(String, Value)>> for Key {
    fn from(fields: Vec<(String, Value)>) -> Self {
        Key::Fields(fields)
    }
}
