//! Admin state and constants.

use rust_decimal::Decimal;
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::session::SessionRegistry;
use crate::settings::SettingsStore;

/// Cookie name for the panel session id
pub const SESSION_COOKIE: &str = "goldeneye_session";

/// State shared by the public page and admin routes
pub struct AdminState {
    /// Live panel sessions, one per browser
    pub sessions: SessionRegistry,
    /// Durable settings (gold price)
    pub settings: Arc<SettingsStore>,
    /// Credentials used to seed new panel sessions
    pub auth: AuthConfig,
    /// Price shown before any update has been stored
    pub default_price: Decimal,
}
