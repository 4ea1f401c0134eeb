//! Server-rendered admin panel.
//!
//! Provides:
//! - the public price page
//! - admin login / forgot-password flows
//! - the panel itself (price updates, password changes)
//!
//! Every route drives the per-session state machine in [`crate::panel`].

pub mod middleware;
pub mod routes;
pub mod templates;

pub use middleware::AdminState;
pub use routes::admin_router;
