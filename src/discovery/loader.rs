//! Subject instantiation and property enumeration

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::engine::Property;
use crate::models::{Instantiation, Shape, SubjectKind, TestSubjectRef};

/// Failure to instantiate a classified subject
#[derive(Error, Debug, PartialEq)]
pub enum LoadError {
    #[error("No subject registered as {0}")]
    UnknownSubject(String),

    #[error("Subject {name} is registered as {registered:?} but classified as {expected:?}")]
    InstantiationMismatch {
        name: String,
        registered: Instantiation,
        expected: Instantiation,
    },

    #[error("Subject {name} exposes a {found:?} property set but was classified as {expected:?}")]
    ShapeMismatch {
        name: String,
        found: Shape,
        expected: Shape,
    },
}

/// One checkable property of a subject
#[derive(Clone)]
pub struct PropertyEntry {
    /// Empty for a lone unnamed property
    pub name: String,
    pub property: Arc<dyn Property>,
}

impl fmt::Debug for PropertyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyEntry")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// What a subject instance exposes
#[derive(Clone)]
pub enum PropertySet {
    Single(Arc<dyn Property>),
    Collection(Vec<(String, Arc<dyn Property>)>),
}

impl PropertySet {
    pub fn single(property: impl Property + 'static) -> Self {
        PropertySet::Single(Arc::new(property))
    }

    /// Empty named collection, filled with [`PropertySet::property`]
    pub fn collection() -> Self {
        PropertySet::Collection(Vec::new())
    }

    /// Append a named property; no-op on a single-property set
    pub fn property(mut self, name: impl Into<String>, property: impl Property + 'static) -> Self {
        if let PropertySet::Collection(entries) = &mut self {
            entries.push((name.into(), Arc::new(property)));
        }
        self
    }

    pub fn shape(&self) -> Shape {
        match self {
            PropertySet::Single(_) => Shape::Single,
            PropertySet::Collection(_) => Shape::Collection,
        }
    }

    fn into_entries(self) -> Vec<PropertyEntry> {
        match self {
            PropertySet::Single(property) => vec![PropertyEntry {
                name: String::new(),
                property,
            }],
            PropertySet::Collection(entries) => entries
                .into_iter()
                .map(|(name, property)| PropertyEntry { name, property })
                .collect(),
        }
    }
}

type Constructor = Arc<dyn Fn() -> PropertySet + Send + Sync>;

/// How the loader obtains a subject instance
#[derive(Clone)]
pub enum SubjectFactory {
    /// Shared instance returned on every access
    Singleton(PropertySet),
    /// Zero-argument constructor invoked on every access
    Constructor(Constructor),
}

impl SubjectFactory {
    fn instantiation(&self) -> Instantiation {
        match self {
            SubjectFactory::Singleton(_) => Instantiation::Singleton,
            SubjectFactory::Constructor(_) => Instantiation::Constructor,
        }
    }

    fn instantiate(&self) -> PropertySet {
        match self {
            SubjectFactory::Singleton(set) => set.clone(),
            SubjectFactory::Constructor(build) => build(),
        }
    }
}

/// Registry of subject factories keyed by fully-qualified name
///
/// Instances are never cached: every load goes back to the factory.
#[derive(Clone, Default)]
pub struct PropertyLoader {
    factories: HashMap<String, SubjectFactory>,
}

impl PropertyLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(mut self, name: impl Into<String>, set: PropertySet) -> Self {
        self.factories
            .insert(name.into(), SubjectFactory::Singleton(set));
        self
    }

    pub fn constructor<F>(mut self, name: impl Into<String>, build: F) -> Self
    where
        F: Fn() -> PropertySet + Send + Sync + 'static,
    {
        self.factories
            .insert(name.into(), SubjectFactory::Constructor(Arc::new(build)));
        self
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Instantiate the subject and list its properties in declaration order
    pub fn load(
        &self,
        kind: &SubjectKind,
        subject: &TestSubjectRef,
    ) -> Result<Vec<PropertyEntry>, LoadError> {
        let factory = self
            .factories
            .get(&subject.name)
            .ok_or_else(|| LoadError::UnknownSubject(subject.name.clone()))?;

        if factory.instantiation() != kind.instantiation {
            return Err(LoadError::InstantiationMismatch {
                name: subject.name.clone(),
                registered: factory.instantiation(),
                expected: kind.instantiation,
            });
        }

        let set = factory.instantiate();
        if set.shape() != kind.shape {
            return Err(LoadError::ShapeMismatch {
                name: subject.name.clone(),
                found: set.shape(),
                expected: kind.shape,
            });
        }

        let entries = set.into_entries();
        debug!("Loaded {} properties from {}", entries.len(), subject.name);
        Ok(entries)
    }
}
