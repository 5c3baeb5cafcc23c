pub mod engine;
pub mod mappings;
pub mod result;
pub mod runner;

pub use engine::{needs_migration, remap};
pub use result::MigrationResult;
pub use runner::MigrationRunner;
