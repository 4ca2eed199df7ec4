mod clause;
pub use clause::{Clause, Predicate};

mod expr;
pub use expr::{Conj, Expr};

mod func;
pub use func::Func;

pub mod in_list;

mod op;
pub use op::Operator;

mod param;
pub use param::{ParamAllocator, Rename};

mod query;
pub use query::{Query, DEFAULT_IN_LIST_LIMIT};

mod row_stream;
pub use row_stream::RowStream;

mod token;
pub use token::FieldToken;

mod value;
pub use value::Value;

mod value_chrono;
