//! Type marker classification

use thiserror::Error;

use crate::models::{Instantiation, Shape, SubjectKind, TypeMarker};

/// Superclass identity of subjects exposing a named collection of properties
pub const PROPERTIES_MARKER: &str = "prop_bridge::Properties";

/// Superclass identity of subjects that are a single property
pub const PROP_MARKER: &str = "prop_bridge::Prop";

/// Marker outside the known superclass identities
#[derive(Error, Debug, PartialEq)]
pub enum ClassificationError {
    #[error("Unknown type marker: {0}")]
    UnknownMarker(String),
}

/// Resolves what kind of subject a marker describes
pub trait SubjectClassifier: Send + Sync {
    fn classify(&self, marker: &TypeMarker) -> Result<SubjectKind, ClassificationError>;
}

/// Registry of the two known superclass identities
#[derive(Clone, Debug)]
pub struct MarkerRegistry {
    collection: String,
    single: String,
}

impl MarkerRegistry {
    pub fn new(collection: impl Into<String>, single: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            single: single.into(),
        }
    }

    /// Every marker the host should look for during discovery
    pub fn fingerprints(&self) -> Vec<TypeMarker> {
        [&self.collection, &self.single]
            .into_iter()
            .flat_map(|superclass| {
                [
                    TypeMarker::new(superclass.as_str(), true),
                    TypeMarker::new(superclass.as_str(), false),
                ]
            })
            .collect()
    }
}

impl Default for MarkerRegistry {
    fn default() -> Self {
        Self::new(PROPERTIES_MARKER, PROP_MARKER)
    }
}

impl SubjectClassifier for MarkerRegistry {
    fn classify(&self, marker: &TypeMarker) -> Result<SubjectKind, ClassificationError> {
        let shape = if marker.superclass == self.collection {
            Shape::Collection
        } else if marker.superclass == self.single {
            Shape::Single
        } else {
            return Err(ClassificationError::UnknownMarker(marker.to_string()));
        };

        let instantiation = if marker.is_module {
            Instantiation::Singleton
        } else {
            Instantiation::Constructor
        };

        Ok(SubjectKind::new(shape, instantiation))
    }
}
