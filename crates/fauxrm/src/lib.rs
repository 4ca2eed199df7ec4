mod config;
pub use config::Config;

pub mod cursor;
pub use cursor::Cursor;

pub mod db;
pub use db::Db;

pub mod driver;

mod filter;
pub use filter::Filter;

mod row;
pub use row::{Cell, Row};

pub mod table;
pub use table::{Key, Model, Table, View};

pub use fauxrm_core::{
    schema::{ObjectName, TableSchema},
    stmt::{Expr, Query, Value},
    Error, Result,
};
