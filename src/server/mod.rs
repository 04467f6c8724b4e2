//! HTTP server: routes, handlers and shared state

pub mod flash;

use anyhow::Result;
use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use chrono::Datelike;
use std::net::SocketAddr;
use std::sync::Arc;
use tera::Context;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::contact::{self, ContactForm, MailRelay, MessageStore, Notifier};
use crate::content::DataLoader;
use crate::templates::{base_context, FlashData, TemplateRenderer};
use crate::Portfolio;
use flash::FlashSigner;

const SAVED: &str = "Thanks, your message was saved!";
const SAVED_NOT_EMAILED: &str =
    "Thanks, your message was saved, but the email notification could not be sent.";
const NOT_SAVED: &str = "Sorry, could not save your message. Try again.";
const UNREADABLE_FORM: &str = "Sorry, your message could not be read. Please submit the form again.";

/// Everything a request handler needs, built once at start-up
pub struct AppState {
    pub site: Portfolio,
    pub loader: DataLoader,
    pub renderer: TemplateRenderer,
    pub store: MessageStore,
    pub notifier: Option<Arc<dyn Notifier>>,
    pub flash: FlashSigner,
}

impl AppState {
    pub fn new(site: &Portfolio) -> Result<Self> {
        let notifier = MailRelay::from_config(&site.config.mail)?
            .map(|relay| Arc::new(relay) as Arc<dyn Notifier>);

        Ok(Self {
            site: site.clone(),
            loader: DataLoader::new(site),
            renderer: TemplateRenderer::new()?,
            store: MessageStore::new(site.messages_path()),
            notifier,
            flash: FlashSigner::new(&site.config.secret_key),
        })
    }

    fn context(&self, path: &str) -> Context {
        let year = chrono::Local::now().year();
        base_context(&self.site.config, path, year)
    }

    /// Render a page, turning template failures into a logged 500
    fn render(&self, template: &str, context: &Context) -> Response {
        match self.renderer.render(template, context) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!("Failed to render {}: {:#}", template, e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>Internal Server Error</h1>".to_string()),
                )
                    .into_response()
            }
        }
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.site.static_dir);

    Router::new()
        .route("/", get(home_handler))
        .route("/about", get(about_handler))
        .route("/contact", get(contact_page_handler).post(contact_submit_handler))
        .route("/projects", get(projects_handler))
        .route("/experiences", get(experiences_handler))
        .route("/experience", get(experiences_handler))
        .route("/api/projects", get(api_projects_handler))
        .route("/healthz", get(|| async { "ok" }))
        .nest_service("/static", static_files)
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: &Portfolio, ip: &str, port: u16, open: bool) -> Result<()> {
    if site.config.uses_default_secret() {
        tracing::warn!("SECRET_KEY is not set, flash cookies are signed with the development key");
    }
    if site.config.mail.is_enabled() {
        tracing::info!("Contact messages will be relayed by email");
    }

    let state = Arc::new(AppState::new(site)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn home_handler(State(state): State<Arc<AppState>>) -> Response {
    let projects = state.loader.load_projects().await;
    let mut context = state.context("/");
    context.insert("projects", &projects);
    state.render("index.html", &context)
}

async fn about_handler(State(state): State<Arc<AppState>>) -> Response {
    let context = state.context("/about");
    state.render("about.html", &context)
}

async fn projects_handler(State(state): State<Arc<AppState>>) -> Response {
    let projects = state.loader.load_projects().await;
    let mut context = state.context("/projects");
    context.insert("projects", &projects);
    state.render("projects.html", &context)
}

async fn experiences_handler(State(state): State<Arc<AppState>>) -> Response {
    let experiences = state.loader.load_experiences().await;
    let mut context = state.context("/experiences");
    context.insert("experiences", &experiences);
    state.render("experiences.html", &context)
}

async fn api_projects_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let projects = state.loader.load_projects().await;
    Json(serde_json::json!({ "projects": projects }))
}

/// Show the form along with any flash left by the previous submission
async fn contact_page_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let pending = flash::read_cookie(&headers);
    let flashes = pending
        .and_then(|value| state.flash.decode(value))
        .unwrap_or_default();

    let mut context = state.context("/contact");
    context.insert("form", &ContactForm::default());
    context.insert("flashes", &flashes);
    let page = state.render("contact.html", &context);

    if pending.is_some() {
        ([(header::SET_COOKIE, flash::clear_cookie())], page).into_response()
    } else {
        page
    }
}

/// Validate, store, then relay. Invalid input re-renders the form in place;
/// everything else redirects back with a flash.
async fn contact_submit_handler(
    State(state): State<Arc<AppState>>,
    submitted: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response {
    let form = match submitted {
        Ok(Form(pairs)) => ContactForm::from_pairs(pairs).trimmed(),
        Err(rejection) => {
            tracing::warn!("Rejected contact submission: {}", rejection);
            let mut context = state.context("/contact");
            context.insert("form", &ContactForm::default());
            context.insert("flashes", &[FlashData::error(UNREADABLE_FORM)]);
            let page = state.render("contact.html", &context);
            return (StatusCode::BAD_REQUEST, page).into_response();
        }
    };

    let valid = match contact::validate(&form) {
        Ok(valid) => valid,
        Err(errors) => {
            let flashes: Vec<FlashData> = errors.iter().map(|e| FlashData::error(e)).collect();
            let mut context = state.context("/contact");
            context.insert("form", &form);
            context.insert("flashes", &flashes);
            return state.render("contact.html", &context);
        }
    };

    let outcome = match state.store.append(&valid).await {
        Ok(message) => match &state.notifier {
            Some(notifier) => match notifier.notify(&message).await {
                Ok(()) => FlashData::success(SAVED),
                Err(e) => {
                    tracing::warn!("Message saved but relay failed: {}", e);
                    FlashData::warning(SAVED_NOT_EMAILED)
                }
            },
            None => FlashData::success(SAVED),
        },
        Err(e) => {
            tracing::error!("Failed to save message: {}", e);
            FlashData::error(NOT_SAVED)
        }
    };

    let redirect = Redirect::to("/contact");
    match state.flash.encode(&[outcome]) {
        Some(value) => ([(header::SET_COOKIE, flash::set_cookie(&value))], redirect).into_response(),
        None => {
            tracing::warn!("Failed to sign flash cookie");
            redirect.into_response()
        }
    }
}

async fn not_found_handler(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let context = state.context(uri.path());
    let page = state.render("404.html", &context);
    (StatusCode::NOT_FOUND, page).into_response()
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
