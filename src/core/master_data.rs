use serde::{Deserialize, Serialize};

/// A team participants can belong to
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
}

/// A job designation participants can hold
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct Designation {
    pub id: String,
    pub name: String,
}

/// Admin-curated master data entry, identified by ID and referenced by name.
pub trait Label {
    fn new(id: String, name: String) -> Self;
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

impl Label for Team {
    fn new(id: String, name: String) -> Self {
        Team { id, name }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Label for Designation {
    fn new(id: String, name: String) -> Self {
        Designation { id, name }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Return if a label with `name` already exists, ignoring case.
pub fn name_taken<L: Label>(labels: &[L], name: &str) -> bool {
    let name = name.to_lowercase();
    labels.iter().any(|l| l.name().to_lowercase() == name)
}
