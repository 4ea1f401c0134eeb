//! Route handlers for the public page and the admin panel.
//!
//! POST handlers re-render the target page directly with the outcome notice
//! rather than redirecting. Each handler locks the session's panel for the
//! duration of one state-machine operation.

use askama::Template;
use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use crate::admin::middleware::{AdminState, SESSION_COOKIE};
use crate::admin::templates::{
    ForgotTemplate, HistoryRow, IndexTemplate, LoginTemplate, NoticeView, PanelTemplate,
};
use crate::money;
use crate::panel::AdminPanel;
use crate::session::PanelSession;
use crate::settings::GOLD_PRICE_KEY;

/// Build the admin router.
pub fn admin_router(state: Arc<AdminState>) -> Router {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/forgot", get(forgot_page).post(forgot_submit))
        .route("/panel", get(panel_page))
        .route("/panel/price", post(price_update))
        .route("/panel/password", post(password_change))
        .route("/panel/password/toggle", post(password_toggle))
        .route("/logout", post(logout))
        .with_state(state)
}

/// Look up the caller's panel session, creating a fresh one if the cookie is
/// missing or expired. Returns the new session id when one was created so the
/// response can set the cookie.
async fn session_for(state: &AdminState, jar: &CookieJar) -> (Option<String>, Arc<PanelSession>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Some(session) = state.sessions.get(cookie.value()).await {
            return (None, session);
        }
    }

    // Fresh panels start from the durable price so the history seed matches
    // what visitors currently see.
    let initial_price = match state.settings.gold_price().await {
        Ok(Some(price)) => price,
        Ok(None) => state.default_price,
        Err(e) => {
            error!("Failed to load stored price for new session: {e:#}");
            state.default_price
        }
    };

    let panel = AdminPanel::new(
        &state.auth.admin_password,
        &state.auth.master_password,
        initial_price,
    );
    let (session_id, session) = state.sessions.create(panel).await;
    (Some(session_id), session)
}

fn attach_session_cookie(response: &mut Response, session_id: &str) {
    let cookie = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Strict");
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
}

/// Render a template, setting the session cookie when a session was created.
fn render<T: Template>(template: T, new_session: Option<String>) -> Response {
    let html = template
        .render()
        .unwrap_or_else(|e| format!("Template error: {e}"));
    let mut response = Html(html).into_response();
    if let Some(session_id) = new_session {
        attach_session_cookie(&mut response, &session_id);
    }
    response
}

fn redirect(to: &str, new_session: Option<String>) -> Response {
    let mut response = Redirect::to(to).into_response();
    if let Some(session_id) = new_session {
        attach_session_cookie(&mut response, &session_id);
    }
    response
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y %H:%M UTC").to_string()
}

fn panel_template(panel: &AdminPanel, notice: Option<NoticeView>) -> PanelTemplate {
    PanelTemplate {
        notice,
        price: money::format_inr(panel.current_price()),
        last_updated: panel
            .last_updated()
            .map(format_timestamp)
            .unwrap_or_else(|| "never".to_string()),
        show_password_change: panel.show_password_change(),
        history: panel
            .history()
            .iter()
            .map(|point| HistoryRow {
                price: money::format_inr(point.price),
                recorded_at: format_timestamp(point.recorded_at),
            })
            .collect(),
    }
}

/// Public price page handler.
pub async fn index(State(state): State<Arc<AdminState>>) -> Response {
    let (price, last_updated) = match state.settings.entry(GOLD_PRICE_KEY).await {
        Ok(Some(entry)) => (
            entry
                .value
                .trim()
                .parse::<Decimal>()
                .unwrap_or(state.default_price),
            Some(format_timestamp(entry.updated_at)),
        ),
        Ok(None) => (state.default_price, None),
        Err(e) => {
            error!("Failed to load gold price for public page: {e:#}");
            (state.default_price, None)
        }
    };

    render(
        IndexTemplate {
            price: money::format_inr(price),
            last_updated,
        },
        None,
    )
}

/// Login page handler.
async fn login_page(State(state): State<Arc<AdminState>>, jar: CookieJar) -> Response {
    let (new_session, session) = session_for(&state, &jar).await;
    let mut panel = session.panel.lock().await;

    if panel.logged_in() {
        return redirect("/admin/panel", new_session);
    }

    // Arriving here from the forgot-password page counts as going back.
    panel.back_to_login();
    render(LoginTemplate { notice: None }, new_session)
}

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

/// Login form submission handler.
async fn login_submit(
    State(state): State<Arc<AdminState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let (new_session, session) = session_for(&state, &jar).await;
    let mut panel = session.panel.lock().await;

    match panel.login(&form.username, &form.password) {
        Ok(notice) => render(
            panel_template(&panel, Some(NoticeView::success(notice))),
            new_session,
        ),
        Err(err) => render(
            LoginTemplate {
                notice: Some(NoticeView::error(err)),
            },
            new_session,
        ),
    }
}

/// Forgot-password page handler.
async fn forgot_page(State(state): State<Arc<AdminState>>, jar: CookieJar) -> Response {
    let (new_session, session) = session_for(&state, &jar).await;
    let mut panel = session.panel.lock().await;

    if panel.logged_in() {
        return redirect("/admin/panel", new_session);
    }

    panel.show_forgot_password();
    render(ForgotTemplate { notice: None }, new_session)
}

/// Password change form data (used by both reset flows).
#[derive(Deserialize)]
pub struct PasswordForm {
    old_password: String,
    new_password: String,
    confirm_new_password: String,
}

/// Forgot-password submission handler (reset via old or master password).
async fn forgot_submit(
    State(state): State<Arc<AdminState>>,
    jar: CookieJar,
    Form(form): Form<PasswordForm>,
) -> Response {
    let (new_session, session) = session_for(&state, &jar).await;
    let mut panel = session.panel.lock().await;

    match panel.change_password(
        &form.old_password,
        &form.new_password,
        &form.confirm_new_password,
    ) {
        Ok(notice) => {
            // The reset returns the panel to the login view.
            render(
                LoginTemplate {
                    notice: Some(NoticeView::success(notice)),
                },
                new_session,
            )
        }
        Err(err) => render(
            ForgotTemplate {
                notice: Some(NoticeView::error(err)),
            },
            new_session,
        ),
    }
}

/// Admin panel handler.
async fn panel_page(State(state): State<Arc<AdminState>>, jar: CookieJar) -> Response {
    let (new_session, session) = session_for(&state, &jar).await;
    let panel = session.panel.lock().await;

    if !panel.logged_in() {
        return redirect("/admin/login", new_session);
    }

    render(panel_template(&panel, None), new_session)
}

/// Price update form data.
#[derive(Deserialize)]
pub struct PriceForm {
    new_price: String,
}

/// Price update handler. Records the update in the session history and
/// persists the new price so the public page and JSON API reflect it.
async fn price_update(
    State(state): State<Arc<AdminState>>,
    jar: CookieJar,
    Form(form): Form<PriceForm>,
) -> Response {
    let (new_session, session) = session_for(&state, &jar).await;
    let mut panel = session.panel.lock().await;

    if !panel.logged_in() {
        return redirect("/admin/login", new_session);
    }

    let notice = match panel.update_price(&form.new_price) {
        Ok(notice) => match state.settings.set_gold_price(panel.current_price()).await {
            Ok(()) => NoticeView::success(notice),
            Err(e) => {
                error!("Failed to persist gold price: {e:#}");
                NoticeView::store_error()
            }
        },
        Err(err) => NoticeView::error(err),
    };

    render(panel_template(&panel, Some(notice)), new_session)
}

/// In-panel password change handler.
async fn password_change(
    State(state): State<Arc<AdminState>>,
    jar: CookieJar,
    Form(form): Form<PasswordForm>,
) -> Response {
    let (new_session, session) = session_for(&state, &jar).await;
    let mut panel = session.panel.lock().await;

    if !panel.logged_in() {
        return redirect("/admin/login", new_session);
    }

    let notice = match panel.change_password(
        &form.old_password,
        &form.new_password,
        &form.confirm_new_password,
    ) {
        Ok(notice) => NoticeView::success(notice),
        Err(err) => NoticeView::error(err),
    };

    render(panel_template(&panel, Some(notice)), new_session)
}

/// Toggle the in-panel password change form.
async fn password_toggle(State(state): State<Arc<AdminState>>, jar: CookieJar) -> Response {
    let (new_session, session) = session_for(&state, &jar).await;
    let mut panel = session.panel.lock().await;

    if !panel.logged_in() {
        return redirect("/admin/login", new_session);
    }

    panel.toggle_password_change();
    render(panel_template(&panel, None), new_session)
}

/// Logout handler. Clears the session flags; history and credentials survive
/// until the session itself expires.
async fn logout(State(state): State<Arc<AdminState>>, jar: CookieJar) -> Response {
    let (new_session, session) = session_for(&state, &jar).await;
    let mut panel = session.panel.lock().await;

    let notice = panel.logout();
    render(
        LoginTemplate {
            notice: Some(NoticeView::success(notice)),
        },
        new_session,
    )
}
