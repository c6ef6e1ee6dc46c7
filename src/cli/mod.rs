//! Interactive shell driving the client: login round-trip, capability-gated
//! commands, and tabular rendering of backend results. The shell plays the
//! role the browser navigation played in the web original: links (commands)
//! are shown per capability, and guarded pages print a forbidden message
//! without touching the network.

pub mod outputformatter;

use std::sync::Arc;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::Value;

use crate::api::{ApiClient, AuthBackend};
use crate::callback::{CallbackHandler, CallbackQuery, CallbackState};
use crate::config::AppConfig;
use crate::identity::{is_admin, is_member, SessionStore};
use crate::routes::{visible_routes, Access, Route};

pub struct App {
    pub api: ApiClient,
    pub session: Arc<SessionStore<ApiClient>>,
    pub config: AppConfig,
}

pub async fn run(app: App) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("spectre client. type 'help' for commands");
    loop {
        let prompt = match app.session.identity() {
            Some(id) => format!("{}> ", id.username),
            None => "guest> ".to_string(),
        };
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                if matches!(line, "quit" | "exit") {
                    break;
                }
                dispatch(&app, line).await;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("readline error: {}", e);
                break;
            }
        }
    }
    Ok(())
}

async fn dispatch(app: &App, line: &str) {
    let (cmd, rest) = match line.split_once(' ') {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };
    match cmd {
        "help" => print_help(app),
        "config" => print_config(&app.config),
        "login" => login(app).await,
        "callback" => callback(app, rest).await,
        "whoami" => whoami(app),
        "logout" => {
            app.session.set_credential(None).await;
            println!("logged out -> Home");
        }
        "refresh" => {
            app.session.refresh_identity().await;
            whoami(app);
        }
        "ships" => ships(app, rest).await,
        "posts" => show(app.api.posts(20, app.session.credential().as_deref()).await),
        "images" => show(app.api.images(30, app.session.credential().as_deref()).await),
        "compare" => compare(app, rest).await,
        "commodities" => commodities(app, rest).await,
        "earnings" => earnings(app, rest).await,
        "admin" => admin(app, rest).await,
        other => println!("unknown command: {} (try 'help')", other),
    }
}

fn print_help(app: &App) {
    let identity = app.session.identity();
    println!("commands: help, config, login, callback <redirect-url>, whoami, logout, refresh, quit");
    let mut pages: Vec<&'static str> = Vec::new();
    for r in visible_routes(identity.as_ref()) {
        match r {
            Route::Ships => pages.push("ships <name>"),
            Route::Posts => pages.push("posts"),
            Route::Images => pages.push("images"),
            Route::Compare => pages.push("compare <a> | <b>"),
            Route::Commodities => pages.push("commodities [query]"),
            Route::Earnings => pages.push("earnings [json payload]"),
            Route::AdminUsers => {
                pages.push("admin users|sync-ships|refresh-commodities|refresh-catalog")
            }
            _ => {}
        }
    }
    println!("pages:    {}", pages.join(", "));
}

fn print_config(cfg: &AppConfig) {
    println!("loginUrl: {}", cfg.login_url.as_deref().unwrap_or("<none>"));
    let mut names: Vec<&String> = cfg.features.keys().collect();
    names.sort();
    for n in names {
        println!("feature {}: {}", n, cfg.feature(n));
    }
}

/// Prefer the backend auth endpoint (mints a fresh state), fall back to the
/// config-provided URL, same order as the web navbar.
async fn login(app: &App) {
    let url = match app.api.login_url().await {
        Ok(u) => Some(u),
        Err(e) => {
            println!("login endpoint unavailable ({}), falling back to config", e);
            app.config.login_url.clone()
        }
    };
    match url {
        Some(u) => {
            println!("open this URL in a browser, then paste the redirect back:");
            println!("  {}", u);
            println!("complete with: callback <redirect-url>");
        }
        None => println!("no login URL available"),
    }
}

async fn callback(app: &App, rest: &str) {
    if rest.is_empty() {
        println!("usage: callback <redirect-url>");
        return;
    }
    let handler = CallbackHandler::new(app.session.clone());
    let query = CallbackQuery::from_url(rest);
    let (state, nav) = handler.activate(&query).await;
    match state {
        CallbackState::Resolved => println!("login complete -> {}", nav.label()),
        _ => println!("login failed -> {}", nav.label()),
    }
    whoami(app);
}

fn whoami(app: &App) {
    match app.session.identity() {
        Some(id) => {
            println!(
                "{} (id {}) roles={:?} member={} admin={}",
                id.username,
                id.id,
                id.roles,
                is_member(Some(&id)),
                is_admin(Some(&id))
            );
        }
        None => match app.session.credential() {
            Some(_) => println!("credential present, identity not resolved"),
            None => println!("not logged in"),
        },
    }
}

/// Page guard: short-circuit with a forbidden message, no network call.
fn gated(app: &App, route: Route) -> Option<String> {
    let identity = app.session.identity();
    if route.guard(identity.as_ref()) == Access::Forbidden {
        println!("forbidden: {} requires {}", route.label(), match route {
            Route::AdminUsers => "the admin role",
            _ => "guild membership",
        });
        return None;
    }
    app.session.credential()
}

async fn ships(app: &App, name: &str) {
    if name.is_empty() {
        println!("usage: ships <name>");
        return;
    }
    show(app.api.ship_info(name, app.session.credential().as_deref()).await);
}

async fn compare(app: &App, rest: &str) {
    let Some(tok) = gated(app, Route::Compare) else { return };
    let Some((a, b)) = rest.split_once('|') else {
        println!("usage: compare <ship a> | <ship b>");
        return;
    };
    show(app.api.compare(a.trim(), b.trim(), &tok).await);
}

async fn commodities(app: &App, rest: &str) {
    let Some(tok) = gated(app, Route::Commodities) else { return };
    let q = if rest.is_empty() { None } else { Some(rest) };
    show(app.api.commodities(q, &tok).await);
}

async fn earnings(app: &App, rest: &str) {
    let Some(tok) = gated(app, Route::Earnings) else { return };
    let payload: Value = if rest.is_empty() {
        serde_json::json!({})
    } else {
        match serde_json::from_str(rest) {
            Ok(v) => v,
            Err(e) => {
                println!("invalid payload: {}", e);
                return;
            }
        }
    };
    show(app.api.routes(&payload, &tok).await);
}

async fn admin(app: &App, rest: &str) {
    let Some(tok) = gated(app, Route::AdminUsers) else { return };
    match rest {
        "users" => show(app.api.admin_users(&tok).await),
        "sync-ships" => show(app.api.admin_sync_ships(&tok).await),
        "refresh-commodities" => show(app.api.admin_refresh_commodities(&tok).await),
        "refresh-catalog" => show(app.api.admin_refresh_catalog(&tok).await),
        _ => println!("usage: admin users|sync-ships|refresh-commodities|refresh-catalog"),
    }
}

/// Render a backend result: table when tabular, raw JSON otherwise. Errors
/// are surfaced inline to the command that issued them.
fn show(result: Result<Value, crate::error::ApiError>) {
    match result {
        Ok(val) => {
            if !outputformatter::print_value(&val) {
                match serde_json::to_string_pretty(&val) {
                    Ok(s) => println!("{}", s),
                    Err(_) => println!("{}", val),
                }
            }
        }
        Err(e) => println!("error: {}", e),
    }
}
