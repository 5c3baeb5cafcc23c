pub mod admin;
pub mod migration;

pub use admin::admin_router;
pub use migration::{migration_router, MigrationState};
