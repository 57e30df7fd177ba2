// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod config;
pub mod odds;
pub mod optimizer;
pub mod player;
pub mod pool;
pub mod roster;
pub mod upstream;
