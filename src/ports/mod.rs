//! Ports (trait boundaries) for external dependencies.
//!
//! The domain owns these traits; players, training observers and storage
//! backends implement them in the adapter and pipeline layers.

pub mod agent;
pub mod observer;
pub mod repository;

pub use agent::Agent;
pub use observer::Observer;
pub use repository::Repository;
