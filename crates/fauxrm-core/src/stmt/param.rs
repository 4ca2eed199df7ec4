use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// Hands out bind-parameter names for one expression.
///
/// The first scalar use of a column is named after the column itself. Later
/// scalar uses take the lowest free `<column>__<n>`, and in-lists continue
/// after the highest suffix handed out so far. No two columns ever share a
/// name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamAllocator {
    fields: IndexMap<String, FieldParams>,
    taken: IndexSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct FieldParams {
    names: Vec<String>,
    max_suffix: usize,
}

/// Parameter renames produced when one expression absorbs another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rename {
    map: HashMap<String, String>,
}

impl ParamAllocator {
    pub fn new() -> ParamAllocator {
        ParamAllocator::default()
    }

    /// Allocates the name for a single-valued comparison on `column`.
    pub fn scalar(&mut self, column: &str) -> String {
        let name = if self.taken.contains(column) {
            (1..)
                .map(|n| suffixed(column, n))
                .find(|name| !self.taken.contains(name))
                .unwrap_or_default()
        } else {
            column.to_string()
        };

        self.register(column, name)
    }

    /// Allocates `count` names for the members of an in-list on `column`.
    pub fn list(&mut self, column: &str, count: usize) -> Vec<String> {
        (0..count)
            .map(|_| {
                let name = self.next_suffixed(column);
                self.register(column, name)
            })
            .collect()
    }

    /// Parameter names handed out for `column`, in allocation order.
    pub fn names(&self, column: &str) -> &[String] {
        self.fields
            .get(column)
            .map(|field| &field.names[..])
            .unwrap_or_default()
    }

    /// Highest numeric suffix used for `column`, zero if none.
    pub fn max_suffix(&self, column: &str) -> usize {
        self.fields.get(column).map(|f| f.max_suffix).unwrap_or(0)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.fields
            .iter()
            .map(|(column, field)| (column.as_str(), &field.names[..]))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Merges another expression's allocations into this one.
    ///
    /// Every parameter of a column both sides use is renumbered, starting
    /// above the highest suffix either side has used for that column. Other
    /// columns are adopted as they are unless a name happens to be taken
    /// already. The returned [`Rename`] must be applied to the absorbed
    /// expression's clauses and bindings.
    pub fn absorb(&mut self, other: ParamAllocator) -> Rename {
        let mut rename = Rename::default();

        for (column, incoming) in other.fields {
            if self.fields.contains_key(&column) {
                let mut next = self.max_suffix(&column).max(incoming.max_suffix) + 1;

                for old in incoming.names {
                    let mut name = suffixed(&column, next);
                    while self.taken.contains(&name) {
                        next += 1;
                        name = suffixed(&column, next);
                    }
                    next += 1;

                    let name = self.register(&column, name);
                    rename.insert(old, name);
                }
            } else {
                let max_suffix = incoming.max_suffix;

                for old in incoming.names {
                    let name = if self.taken.contains(&old) {
                        self.next_suffixed(&column)
                    } else {
                        old.clone()
                    };

                    let name = self.register(&column, name);
                    if name != old {
                        rename.insert(old, name);
                    }
                }

                let field = self.fields.entry(column).or_default();
                field.max_suffix = field.max_suffix.max(max_suffix);
            }
        }

        rename
    }

    fn next_suffixed(&self, column: &str) -> String {
        (self.max_suffix(column) + 1..)
            .map(|n| suffixed(column, n))
            .find(|name| !self.taken.contains(name))
            .unwrap_or_default()
    }

    fn register(&mut self, column: &str, name: String) -> String {
        let field = self.fields.entry(column.to_string()).or_default();

        if let Some(n) = suffix_of(column, &name) {
            field.max_suffix = field.max_suffix.max(n);
        }

        field.names.push(name.clone());
        self.taken.insert(name.clone());
        name
    }
}

impl Rename {
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// The new name for `name`, or `name` itself if it was kept.
    pub fn apply<'a>(&'a self, name: &'a str) -> &'a str {
        self.map.get(name).map(String::as_str).unwrap_or(name)
    }

    fn insert(&mut self, old: String, new: String) {
        self.map.insert(old, new);
    }
}

fn suffixed(column: &str, n: usize) -> String {
    format!("{column}__{n}")
}

fn suffix_of(column: &str, name: &str) -> Option<usize> {
    name.strip_prefix(column)?.strip_prefix("__")?.parse().ok()
}
