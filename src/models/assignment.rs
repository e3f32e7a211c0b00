use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Headcount per consultant role for one project.
///
/// Keys are free text captured when the project is saved. They are never
/// checked against the rate table, so a role may be renamed or deleted after
/// a project references it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Assignment(BTreeMap<String, i32>);

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: impl Into<String>, count: i32) -> Self {
        self.set(role, count);
        self
    }

    pub fn set(&mut self, role: impl Into<String>, count: i32) {
        self.0.insert(role.into(), count);
    }

    pub fn get(&self, role: &str) -> i32 {
        self.0.get(role).copied().unwrap_or(0)
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains_key(role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.0.iter().map(|(role, count)| (role.as_str(), *count))
    }

    /// Entries with a positive headcount, the only ones that are charged or displayed.
    pub fn staffed(&self) -> impl Iterator<Item = (&str, i32)> {
        self.iter().filter(|(_, count)| *count > 0)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl<S: Into<String>> FromIterator<(S, i32)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (S, i32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(role, count)| (role.into(), count)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_keeps_roles_without_rates() {
        let assignment = Assignment::new()
            .with("Strategy Consultant", 2)
            .with("Ghost Role", 5);

        let json = assignment.to_json().unwrap();
        assert_eq!(json, r#"{"Ghost Role":5,"Strategy Consultant":2}"#);
        assert_eq!(Assignment::from_json(&json).unwrap(), assignment);
    }

    #[test]
    fn reads_blobs_written_by_earlier_deployment() {
        let assignment =
            Assignment::from_json(r#"{"IT Consultant": 0, "Senior IT Consultant": 3}"#).unwrap();

        assert_eq!(assignment.get("Senior IT Consultant"), 3);
        assert_eq!(assignment.get("Unknown"), 0);
        assert_eq!(assignment.staffed().count(), 1);
    }

    #[test]
    fn rejects_malformed_blob() {
        assert!(Assignment::from_json("not json").is_err());
    }
}
