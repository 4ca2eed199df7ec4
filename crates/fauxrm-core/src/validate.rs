//! Value checks run against a table's catalog before statements are built.

use crate::{
    schema::{Column, TableSchema},
    stmt::Value,
    Error, Result,
};

/// Checks a value about to be written to `field`.
///
/// Null is rejected for non-nullable columns unless the database generates
/// the column's value.
pub fn assignment<'a>(schema: &'a TableSchema, field: &str, value: &Value) -> Result<&'a Column> {
    let column = schema.resolve(field)?;

    if value.is_null() {
        if !column.nullable && !column.generated {
            return Err(Error::nullability_violation(&column.name));
        }
        return Ok(column);
    }

    check_type(column, value)?;
    Ok(column)
}

/// Checks every assignment in `fields`, stopping at the first failure.
pub fn assignments<'a, 'b>(
    schema: &TableSchema,
    fields: impl IntoIterator<Item = (&'a str, &'b Value)>,
) -> Result<()> {
    for (field, value) in fields {
        assignment(schema, field, value)?;
    }
    Ok(())
}

/// Checks a value used to filter on `field`.
///
/// Large-object columns cannot be filtered on. Lists are checked member by
/// member and null is always allowed.
pub fn filter<'a>(schema: &'a TableSchema, field: &str, value: &Value) -> Result<&'a Column> {
    let column = schema.resolve(field)?;

    if column.is_lob() {
        return Err(Error::unsupported_column(&column.name, column.ty));
    }

    match value {
        Value::List(items) => {
            for item in items {
                if !item.is_null() {
                    check_type(column, item)?;
                }
            }
        }
        Value::Null => {}
        value => check_type(column, value)?,
    }

    Ok(column)
}

fn check_type(column: &Column, value: &Value) -> Result<()> {
    if column.ty.accepts(value) {
        Ok(())
    } else {
        Err(Error::type_mismatch(&column.name, column.ty, value))
    }
}
