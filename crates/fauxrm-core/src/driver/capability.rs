use crate::stmt::DEFAULT_IN_LIST_LIMIT;

#[derive(Debug)]
pub struct Capability {
    /// SQL dialect statements are rendered in.
    pub flavor: Flavor,

    /// When true, updates lock the target row with `select ... for update`
    /// before writing it.
    pub select_for_update: bool,

    /// When true, inserts read generated values back with `returning *`.
    /// Otherwise they are recovered by probing for the column's maximum.
    pub returning: bool,

    /// The most values the database accepts in one `in (...)` list.
    pub max_in_list: usize,
}

impl Capability {
    pub const ORACLE: Self = Self {
        flavor: Flavor::Oracle,
        select_for_update: true,
        returning: false,
        max_in_list: DEFAULT_IN_LIST_LIMIT,
    };

    pub const SQLITE: Self = Self {
        flavor: Flavor::Sqlite,
        select_for_update: false,
        returning: true,
        max_in_list: DEFAULT_IN_LIST_LIMIT,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Oracle,
    Sqlite,
}
