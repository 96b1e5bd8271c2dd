//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters.
//! Each trait exposes strongly typed errors so adapters map their failures
//! into predictable variants instead of returning opaque errors.

mod macros;
mod user_store;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{UserStore, UserStoreError};
