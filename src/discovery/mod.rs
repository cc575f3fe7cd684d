//! Subject discovery
//!
//! Classifies host-supplied subjects, instantiates them, and plans the
//! execution units that check their properties.

mod classifier;
mod loader;
mod planner;

pub use classifier::{
    ClassificationError, MarkerRegistry, SubjectClassifier, PROPERTIES_MARKER, PROP_MARKER,
};
pub use loader::{LoadError, PropertyEntry, PropertyLoader, PropertySet, SubjectFactory};
pub use planner::TaskPlanner;

use std::sync::Arc;
use thiserror::Error;

use crate::models::TestSubjectRef;

/// Failure to obtain the properties of one subject
#[derive(Error, Debug, PartialEq)]
pub enum DiscoveryError {
    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Classifier and loader paired together
pub struct Discovery {
    classifier: Arc<dyn SubjectClassifier>,
    loader: PropertyLoader,
}

impl Discovery {
    pub fn new(classifier: Arc<dyn SubjectClassifier>, loader: PropertyLoader) -> Self {
        Self { classifier, loader }
    }

    /// Use the standard marker registry
    pub fn with_loader(loader: PropertyLoader) -> Self {
        Self::new(Arc::new(MarkerRegistry::default()), loader)
    }

    /// Classify and instantiate a subject, returning its properties
    pub fn entries(&self, subject: &TestSubjectRef) -> Result<Vec<PropertyEntry>, DiscoveryError> {
        let kind = self.classifier.classify(&subject.marker)?;
        Ok(self.loader.load(&kind, subject)?)
    }
}
