//! Application-level configuration.
//!
//! - [`SharedPolicy`]: runtime-adjustable voting policy shared by the
//!   engine and the host console

pub mod shared_policy;

pub use shared_policy::SharedPolicy;
