use std::fmt;

/// The qualified name of a table or view: `owner.name`, or just `name`
/// when the object lives in the connection's default schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectName {
    pub owner: Option<String>,
    pub name: String,
}

impl ObjectName {
    pub fn new(owner: Option<&str>, name: &str) -> ObjectName {
        ObjectName {
            owner: owner.map(str::to_lowercase),
            name: name.to_lowercase(),
        }
    }

    /// Parses `owner.name` or `name`.
    pub fn parse(qualified: &str) -> ObjectName {
        match qualified.split_once('.') {
            Some((owner, name)) => ObjectName::new(Some(owner), name),
            None => ObjectName::new(None, qualified),
        }
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner {
            Some(owner) => write!(f, "{}.{}", owner, self.name),
            None => f.write_str(&self.name),
        }
    }
}
