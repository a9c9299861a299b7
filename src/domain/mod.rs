//! Core vocabulary shared by the session, guard and view layers.

pub mod role;

pub use role::Role;
