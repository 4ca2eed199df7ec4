#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::Comma;

mod flavor;

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod expr;
mod statement;

use crate::stmt::Statement;

use fauxrm_core::{driver::Flavor, schema::TableSchema};

/// Serialize a statement to a SQL string
#[derive(Debug)]
pub struct Serializer<'a> {
    /// Table the statement targets
    schema: &'a TableSchema,

    /// The database flavor handles the differences between SQL dialects and
    /// supported features.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl<'a> Serializer<'a> {
    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        stmt.to_sql(&mut fmt);

        ret
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    fn is_oracle(&self) -> bool {
        self.flavor == Flavor::Oracle
    }
}
