//! Short-term memory for the navigation controller.
//!
//! The controller only ever looks at the last few luminance samples, so memory is
//! a fixed-size ring buffer that is thrown away on every state transition.

mod ring_buffer;

pub use ring_buffer::RingBuffer;

use crate::simulation::params::HISTORY_CAPACITY;

/// Sampled center-luminance observations, oldest first.
pub type ObservationHistory = RingBuffer<f64, HISTORY_CAPACITY>;
