use super::{Formatter, ToSql};

use fauxrm_core::stmt::Value;
use indexmap::IndexMap;

pub trait Params {
    /// Binds `value` under `name`, returning the placeholder to render.
    fn push(&mut self, name: &str, value: &Value) -> Placeholder;
}

/// A named bind placeholder, rendered `:name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder(pub String);

impl Params for IndexMap<String, Value> {
    fn push(&mut self, name: &str, value: &Value) -> Placeholder {
        debug_assert!(
            self.get(name).map_or(true, |bound| bound == value),
            "parameter `{name}` bound twice with different values"
        );
        self.insert(name.to_string(), value.clone());
        Placeholder(name.to_string())
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: super::Params>(self, f: &mut Formatter<'_, P>) {
        f.dst.push(':');
        f.dst.push_str(&self.0);
    }
}
