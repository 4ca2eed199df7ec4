use super::{Column, ColumnType, ObjectName, PrimaryKey};
use crate::{driver::Description, Error, Result};

use indexmap::IndexMap;

/// Whether a catalog entry describes a table or a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Table,
    View,
}

/// Catalog entry for a table or view.
///
/// Loaded once per handle from the driver's description of the object and
/// shared by every row the handle produces.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub name: ObjectName,

    pub kind: ObjectKind,

    /// Columns keyed by lower-cased name, in declaration order.
    pub columns: IndexMap<String, Column>,

    /// Always empty for views.
    pub primary_key: PrimaryKey,
}

impl TableSchema {
    pub fn from_description(name: ObjectName, description: Description) -> Result<TableSchema> {
        if description.columns.is_empty() {
            return Err(Error::invalid_schema(format!("`{name}` has no columns")));
        }

        let mut columns = IndexMap::with_capacity(description.columns.len());

        for info in description.columns {
            let Some(ty) = ColumnType::from_declared(&info.declared_type).ok() else {
                return Err(Error::invalid_schema(format!(
                    "unsupported type `{}` for column `{name}.{}`",
                    info.declared_type, info.name
                )));
            };
            let column_name = info.name.to_lowercase();

            columns.insert(
                column_name.clone(),
                Column {
                    name: column_name,
                    ty,
                    storage_ty: info.declared_type,
                    nullable: info.nullable,
                    generated: info.generated,
                },
            );
        }

        let primary_key = match description.kind {
            ObjectKind::View => PrimaryKey::default(),
            ObjectKind::Table => {
                let pk: Vec<_> = description
                    .primary_key
                    .iter()
                    .map(|column| column.to_lowercase())
                    .collect();

                if let Some(missing) = pk.iter().find(|column| !columns.contains_key(*column)) {
                    return Err(Error::invalid_schema(format!(
                        "primary key column `{missing}` is not a column of `{name}`"
                    )));
                }

                PrimaryKey::new(pk)
            }
        };

        Ok(TableSchema {
            name,
            kind: description.kind,
            columns,
            primary_key,
        })
    }

    pub fn is_view(&self) -> bool {
        self.kind == ObjectKind::View
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Resolves a caller-supplied field name to a column, matching the
    /// exact name first and falling back to a case-insensitive match.
    pub fn resolve(&self, field: &str) -> Result<&Column> {
        if let Some(column) = self.columns.get(field) {
            return Ok(column);
        }

        self.columns
            .get(&field.to_lowercase())
            .ok_or_else(|| Error::unknown_field(self.name.to_string(), field))
    }

    pub fn generated_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.columns.values().filter(|column| column.generated)
    }

    pub fn required_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.columns.values().filter(|column| column.is_required())
    }

    pub fn lob_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.columns.values().filter(|column| column.is_lob())
    }

    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.primary_key
            .columns
            .iter()
            .filter_map(|name| self.columns.get(name))
    }
}
