mod count;
pub use count::Count;

mod delete;
pub use delete::Delete;

mod insert;
pub use insert::Insert;

mod max_lookup;
pub use max_lookup::MaxLookup;

mod select;
pub use select::Select;

mod update;
pub use update::Update;

pub use fauxrm_core::stmt::*;

/// A statement against a single table or view.
#[derive(Debug, Clone)]
pub enum Statement {
    Count(Count),
    Delete(Delete),
    Insert(Insert),
    MaxLookup(MaxLookup),
    Select(Select),
    Update(Update),
}

impl Statement {
    /// True when executing the statement produces rows rather than an
    /// affected-row count.
    pub fn returns_rows(&self) -> bool {
        match self {
            Statement::Count(_) | Statement::MaxLookup(_) | Statement::Select(_) => true,
            Statement::Insert(insert) => insert.returning,
            Statement::Delete(_) | Statement::Update(_) => false,
        }
    }

    pub fn is_select(&self) -> bool {
        matches!(self, Statement::Select(_))
    }
}
