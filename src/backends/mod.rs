//! Biometric backends.
//!
//! - [`Biometric`]: the contract every backend satisfies;
//! - [`Sensor`]: the vendor seam, wrapped by [`SensorBackend`];
//! - [`PlaceholderBackend`]: the non-hardware stand-in;
//! - [`codes`]: vendor error-code classification.

mod backend;
pub mod codes;
mod placeholder;
mod sensor;
mod sensor_backend;

pub use backend::{Biometric, BiometricRef, Capabilities};
pub use placeholder::PlaceholderBackend;
pub(crate) use sensor::HelpSink;
pub use sensor::{Scan, ScanError, Sensor, SensorFn};
pub use sensor_backend::SensorBackend;
