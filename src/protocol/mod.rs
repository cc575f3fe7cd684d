//! Worker/coordinator aggregation protocol

mod message;

pub use message::{ProtocolError, RunnerMessage, COUNTER_DELTA_TAG};
