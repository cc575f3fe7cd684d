//! Test subject references supplied by the host

use serde::{Deserialize, Serialize};
use std::fmt;

/// Narrows a subject request down to what should be checked
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// The whole subject
    Suite,
    /// One named property inside the subject
    Test(String),
}

impl Selector {
    pub fn test(name: impl Into<String>) -> Self {
        Selector::Test(name.into())
    }

    /// Property name, if this selector targets a single property
    pub fn test_name(&self) -> Option<&str> {
        match self {
            Selector::Test(name) => Some(name),
            Selector::Suite => None,
        }
    }
}

/// Superclass identity attached to a discovered subject by the host
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeMarker {
    pub superclass: String,
    /// Subject is a module-level singleton rather than a constructible type
    pub is_module: bool,
}

impl TypeMarker {
    pub fn new(superclass: impl Into<String>, is_module: bool) -> Self {
        Self {
            superclass: superclass.into(),
            is_module,
        }
    }
}

impl fmt::Display for TypeMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_module { "module" } else { "class" };
        write!(f, "{} ({kind})", self.superclass)
    }
}

/// Whether a subject holds one property or a named collection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Single,
    Collection,
}

/// How a subject instance is obtained
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instantiation {
    Singleton,
    Constructor,
}

/// Classification result for a type marker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectKind {
    pub shape: Shape,
    pub instantiation: Instantiation,
}

impl SubjectKind {
    pub fn new(shape: Shape, instantiation: Instantiation) -> Self {
        Self {
            shape,
            instantiation,
        }
    }
}

/// A definition discovered by the host
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSubjectRef {
    pub name: String,
    pub marker: TypeMarker,
    #[serde(default)]
    pub selectors: Vec<Selector>,
}

impl TestSubjectRef {
    pub fn new(name: impl Into<String>, marker: TypeMarker) -> Self {
        Self {
            name: name.into(),
            marker,
            selectors: Vec::new(),
        }
    }

    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selectors.push(selector);
        self
    }

    /// A request is bound when every selector names a single property
    pub fn is_bound(&self) -> bool {
        !self.selectors.is_empty() && self.selectors.iter().all(|s| s.test_name().is_some())
    }
}

impl fmt::Display for TestSubjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
