mod column;
pub use column::Column;

mod column_type;
pub use column_type::ColumnType;

mod name;
pub use name::ObjectName;

mod pk;
pub use pk::PrimaryKey;

mod table;
pub use table::{ObjectKind, TableSchema};
