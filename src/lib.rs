//! prop-bridge - property-check bridge for external test hosts
//!
//! Connects a property-checking engine to a generic test-runner host.
//!
//! ## Flow
//!
//! 1. The host hands over discovered subjects ([`models::TestSubjectRef`])
//! 2. [`discovery::TaskPlanner`] expands each root request into one bound
//!    unit per property name
//! 3. [`executor::PropertyExecutor`] checks each bound unit through a
//!    [`engine::CheckEngine`] and translates the verdict into a host event
//! 4. [`results::Counters`] track totals for the session
//! 5. In distributed runs, workers send their totals to the coordinator as a
//!    single-line [`protocol::RunnerMessage`]
//!
//! ## Usage
//!
//! ```no_run
//! use prop_bridge::discovery::{PropertyLoader, PropertySet, PROPERTIES_MARKER};
//! use prop_bridge::engine::{Trial, TrialOutcome};
//! use prop_bridge::models::{TestSubjectRef, TypeMarker};
//! use prop_bridge::session::{CollectingSink, Role, Runner};
//!
//! let loader = PropertyLoader::new().singleton(
//!     "demo.ListSpec",
//!     PropertySet::collection()
//!         .property("reverse", |t: &mut Trial| TrialOutcome::from(t.size() < 1000)),
//! );
//! let runner = Runner::builder(Role::Coordinator, loader)
//!     .args(&["-minSuccessfulTests", "50"])
//!     .build()?;
//!
//! let sink = CollectingSink::new();
//! let subject = TestSubjectRef::new("demo.ListSpec", TypeMarker::new(PROPERTIES_MARKER, true));
//! for unit in runner.plan(&subject) {
//!     runner.run(&unit, &sink);
//! }
//! println!("{}", runner.done());
//! # Ok::<(), prop_bridge::config::ConfigError>(())
//! ```

pub mod config;
pub mod discovery;
pub mod engine;
pub mod executor;
pub mod models;
pub mod output;
pub mod protocol;
pub mod results;
pub mod session;
pub mod utils;
