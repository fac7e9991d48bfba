//! Path tracking and violation collection for a single validation call.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::{FieldViolation, ViolationCode};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside the validated input, rendered as
/// `lits[0].numeroLit`. The root path renders as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// The last key segment, i.e. the field the violation belongs to.
    pub fn field(&self) -> Option<&str> {
        self.0.iter().rev().find_map(|segment| match segment {
            PathSegment::Key(key) => Some(key.as_str()),
            PathSegment::Index(_) => None,
        })
    }
}

impl FromIterator<PathSegment> for FieldPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Mutable state of one validation call: where we are and what failed so far.
#[derive(Debug, Default)]
pub struct ValidationContext {
    path: Vec<PathSegment>,
    violations: Vec<FieldViolation>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_key(&mut self, key: &str) {
        self.path.push(PathSegment::Key(key.to_string()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.path.push(PathSegment::Index(index));
    }

    pub fn pop(&mut self) {
        self.path.pop();
    }

    pub fn current_path(&self) -> FieldPath {
        FieldPath(self.path.clone())
    }

    /// Record a violation at the current path.
    pub fn add_violation(&mut self, code: ViolationCode, message: impl Into<String>) {
        let violation = FieldViolation::new(self.current_path(), code, message);
        tracing::trace!(path = %violation.path, code = ?code, "field violation");
        self.violations.push(violation);
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_rendering() {
        let path: FieldPath = vec![
            PathSegment::Key("lits".into()),
            PathSegment::Index(0),
            PathSegment::Key("numeroLit".into()),
        ]
        .into_iter()
        .collect();
        assert_eq!(path.to_string(), "lits[0].numeroLit");
        assert_eq!(path.field(), Some("numeroLit"));
        assert_eq!(FieldPath::root().to_string(), "");
    }

    #[test]
    fn test_push_and_pop() {
        let mut ctx = ValidationContext::new();
        ctx.push_key("services");
        ctx.push_index(2);
        assert_eq!(ctx.current_path().to_string(), "services[2]");
        ctx.pop();
        ctx.pop();
        assert!(ctx.current_path().is_root());
    }

    #[test]
    fn test_violations_carry_the_current_path() {
        let mut ctx = ValidationContext::new();
        ctx.push_key("email");
        ctx.add_violation(ViolationCode::InvalidEmail, "Invalid email");
        ctx.pop();
        assert!(ctx.has_violations());
        let violations = ctx.into_violations();
        assert_eq!(violations[0].path.to_string(), "email");
        assert_eq!(
            serde_json::to_value(&violations[0].path).unwrap(),
            serde_json::json!("email")
        );
    }
}
