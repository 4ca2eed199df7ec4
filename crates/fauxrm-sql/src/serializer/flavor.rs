use super::Serializer;

use fauxrm_core::{driver::Flavor, schema::TableSchema};

impl<'a> Serializer<'a> {
    pub fn new(schema: &'a TableSchema, flavor: Flavor) -> Serializer<'a> {
        Serializer { schema, flavor }
    }

    pub fn oracle(schema: &'a TableSchema) -> Serializer<'a> {
        Serializer::new(schema, Flavor::Oracle)
    }

    pub fn sqlite(schema: &'a TableSchema) -> Serializer<'a> {
        Serializer::new(schema, Flavor::Sqlite)
    }
}
