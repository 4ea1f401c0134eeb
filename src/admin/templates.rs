//! Askama templates for the public page and the admin panel.

use askama::Template;

use crate::panel::{Notice, PanelError};

/// Rendered notification banner (the original UI's toast).
pub struct NoticeView {
    /// CSS class: "success" or "error"
    pub kind: &'static str,
    pub title: &'static str,
    pub message: String,
}

impl NoticeView {
    pub fn success(notice: Notice) -> Self {
        Self {
            kind: "success",
            title: notice.title,
            message: notice.message,
        }
    }

    pub fn error(err: PanelError) -> Self {
        let title = match err {
            PanelError::BadCredentials => "Login Failed",
            PanelError::InvalidPrice => "Invalid Price",
            _ => "Error",
        };
        Self {
            kind: "error",
            title,
            message: err.to_string(),
        }
    }

    pub fn store_error() -> Self {
        Self {
            kind: "error",
            title: "Error",
            message: "Failed to save the price. Please try again.".to_string(),
        }
    }
}

/// Public price page
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub price: String,
    pub last_updated: Option<String>,
}

/// Admin login page
#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub notice: Option<NoticeView>,
}

/// Forgot-password page
#[derive(Template)]
#[template(path = "admin/forgot.html")]
pub struct ForgotTemplate {
    pub notice: Option<NoticeView>,
}

/// One row of the price history table
pub struct HistoryRow {
    pub price: String,
    pub recorded_at: String,
}

/// Admin panel page
#[derive(Template)]
#[template(path = "admin/panel.html")]
pub struct PanelTemplate {
    pub notice: Option<NoticeView>,
    pub price: String,
    pub last_updated: String,
    pub show_password_change: bool,
    pub history: Vec<HistoryRow>,
}
