//! Price/auth state machine behind the admin panel.
//!
//! One `AdminPanel` exists per browser session and holds that session's
//! credentials, login state, and price history. Operations are synchronous;
//! the HTTP layer serializes access through the session mutex, so there is
//! exactly one writer per panel.
//!
//! Validation failures are `PanelError` values whose `Display` strings are
//! the user-facing messages; they never mutate panel state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::money;

/// The only account that can log in.
pub const ADMIN_USERNAME: &str = "admin";

/// Minimum length for a new admin password, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Which logged-out view the panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthView {
    Login,
    ForgotPassword,
}

/// A single recorded price update. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub price: Decimal,
    pub recorded_at: DateTime<Utc>,
}

/// Validation failure for a panel operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("Invalid username or password.")]
    BadCredentials,
    #[error("Old password is incorrect.")]
    IncorrectOldPassword,
    #[error("New password must be at least 6 characters long.")]
    PasswordTooShort,
    #[error("New passwords do not match.")]
    PasswordMismatch,
    #[error("Please enter a valid positive number.")]
    InvalidPrice,
    #[error("You must be logged in to update the price.")]
    NotLoggedIn,
}

/// Success notification from a panel operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub title: &'static str,
    pub message: String,
}

/// Per-session admin panel state.
pub struct AdminPanel {
    admin_password: String,
    master_password: String,
    logged_in: bool,
    auth_view: AuthView,
    show_password_change: bool,
    /// Newest first; seeded with one entry so it is never empty.
    history: Vec<PricePoint>,
}

impl AdminPanel {
    /// Create a panel seeded with one price entry.
    pub fn new(admin_password: &str, master_password: &str, initial_price: Decimal) -> Self {
        Self {
            admin_password: admin_password.to_string(),
            master_password: master_password.to_string(),
            logged_in: false,
            auth_view: AuthView::Login,
            show_password_change: false,
            history: vec![PricePoint {
                price: initial_price,
                recorded_at: Utc::now(),
            }],
        }
    }

    /// Log in. Succeeds iff the username is `admin` and the password matches
    /// the current admin password. Failure leaves all state unchanged.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Notice, PanelError> {
        if username != ADMIN_USERNAME || password != self.admin_password {
            return Err(PanelError::BadCredentials);
        }

        self.logged_in = true;
        Ok(Notice {
            title: "Login Successful",
            message: "Welcome, Admin!".to_string(),
        })
    }

    /// Log out. Always succeeds; clears the session flags and nothing else.
    pub fn logout(&mut self) -> Notice {
        self.logged_in = false;
        self.show_password_change = false;
        self.auth_view = AuthView::Login;
        Notice {
            title: "Logged Out",
            message: "You have been successfully logged out.".to_string(),
        }
    }

    /// Record a price update.
    ///
    /// The raw input must parse as a decimal and be strictly positive;
    /// anything else is rejected without touching the history.
    pub fn update_price(&mut self, raw: &str) -> Result<Notice, PanelError> {
        if !self.logged_in {
            return Err(PanelError::NotLoggedIn);
        }

        let price = money::parse_price(raw).ok_or(PanelError::InvalidPrice)?;
        self.history.insert(
            0,
            PricePoint {
                price,
                recorded_at: Utc::now(),
            },
        );

        Ok(Notice {
            title: "Price Updated",
            message: format!("Gold price is now {}.", money::format_inr(price)),
        })
    }

    /// Change the admin password.
    ///
    /// Checks run in order and the first failure wins: the old password must
    /// match the current admin password or the master password, the new
    /// password must be at least [`MIN_PASSWORD_LEN`] characters, and the
    /// confirmation must match. The master password itself is never changed.
    pub fn change_password(
        &mut self,
        old_password: &str,
        new_password: &str,
        confirm_new_password: &str,
    ) -> Result<Notice, PanelError> {
        if old_password != self.admin_password && old_password != self.master_password {
            return Err(PanelError::IncorrectOldPassword);
        }
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(PanelError::PasswordTooShort);
        }
        if new_password != confirm_new_password {
            return Err(PanelError::PasswordMismatch);
        }

        self.admin_password = new_password.to_string();
        self.show_password_change = false;
        if self.auth_view == AuthView::ForgotPassword {
            self.auth_view = AuthView::Login;
        }

        Ok(Notice {
            title: "Success",
            message: "Your password has been changed.".to_string(),
        })
    }

    /// Switch the logged-out view to the forgot-password flow.
    pub fn show_forgot_password(&mut self) {
        if !self.logged_in {
            self.auth_view = AuthView::ForgotPassword;
        }
    }

    /// Return from the forgot-password flow to the login view.
    pub fn back_to_login(&mut self) {
        if !self.logged_in {
            self.auth_view = AuthView::Login;
        }
    }

    /// Toggle the in-panel password change form.
    pub fn toggle_password_change(&mut self) {
        self.show_password_change = !self.show_password_change;
    }

    pub fn logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn auth_view(&self) -> AuthView {
        self.auth_view
    }

    pub fn show_password_change(&self) -> bool {
        self.show_password_change
    }

    /// Price history, newest first.
    pub fn history(&self) -> &[PricePoint] {
        &self.history
    }

    /// The most recent price, or zero if the history is empty.
    pub fn current_price(&self) -> Decimal {
        self.history
            .first()
            .map(|p| p.price)
            .unwrap_or(Decimal::ZERO)
    }

    /// When the most recent price was recorded.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.history.first().map(|p| p.recorded_at)
    }
}
