//! Environment abstraction layer
//!
//! The harness never reads ambient process state directly. Environment
//! variables, CPU count and the executable location come through
//! [`SystemEnv`]:
//!
//! - [`RealEnv`] queries the running process
//! - [`MockEnv`] is an in-memory description of a host for tests

mod mock;
mod real;
mod traits;

pub use mock::MockEnv;
pub use real::RealEnv;
pub use traits::SystemEnv;
