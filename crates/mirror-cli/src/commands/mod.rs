//! Command implementations

mod reconcile;
mod service;
mod translit;

pub use reconcile::run_reconcile;
pub use service::run_service;
pub use translit::run_translit;
