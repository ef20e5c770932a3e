//! HTTP server for the interactive query form
//!
//! `reelpick serve --catalog titles.csv` → starts server, opens browser, shows the form

use crate::catalog::Catalog;
use crate::error::Error;
use crate::recommend::{self, RecommendationQuery, RecommendationResult, GENRES};
use crate::report::{self, ExportedArtifacts};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{info, warn};

// Embed the UI directly in the binary
const UI_HTML: &str = include_str!("ui.html");

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }

    fn failure(message: String) -> Self {
        Self { ok: false, data: None, error: Some(message) }
    }
}

/// Raw form fields, all free text as typed
#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
pub struct RecommendParams {
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub year_min: String,
    #[serde(default)]
    pub year_max: String,
    #[serde(default)]
    pub mode: String,
}

impl RecommendParams {
    pub fn to_query(&self) -> crate::Result<RecommendationQuery> {
        RecommendationQuery::from_form(&self.genre, &self.year_min, &self.year_max, &self.mode)
    }
}

#[derive(Serialize)]
pub struct RecommendReport {
    pub generated: String,
    pub query: RecommendationQuery,
    pub summary: report::Summary,
    pub result: RecommendationResult,
    pub output: Option<ExportedArtifacts>,
}

/// Start server, open browser, serve UI
pub fn start(port: u16, catalog: &Catalog, output_dir: PathBuf) -> std::io::Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let url = format!("http://localhost:{}", port);

    eprintln!("\n\x1b[1;32m🎬 reelpick\x1b[0m");
    eprintln!("   {}", url);
    eprintln!("   Catalog: {} titles\n", catalog.len());
    info!(%url, titles = catalog.len(), "serving query form");

    // Open browser
    let _ = open::that(&url);

    // Handle requests
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, catalog, &output_dir) {
            warn!(error = %e, "request failed");
        }
    }

    Ok(())
}

fn handle_request(mut request: Request, catalog: &Catalog, output_dir: &Path) -> std::io::Result<()> {
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or("/");
    let method = request.method().clone();

    match (&method, path) {
        // Serve embedded UI
        (&Method::Get, "/") => {
            let response = Response::from_string(render_ui()).with_header(content_type("text/html"));
            request.respond(response)
        }

        // API: Recommend
        (&Method::Get, "/api/recommend") | (&Method::Post, "/api/recommend") => {
            let params = parse_params(&mut request)?;
            eprintln!("→ {} / {} / {}-{}", params.mode, params.genre, params.year_min, params.year_max);

            let json = match run_recommendation(&params, catalog, Some(output_dir)) {
                Ok(report) => serde_json::to_string(&ApiResponse::success(report))?,
                Err(e) => serde_json::to_string(&ApiResponse::<()>::failure(user_message(&e)))?,
            };
            let response = Response::from_string(json).with_header(content_type("application/json"));
            request.respond(response)
        }

        // API: Genre list
        (&Method::Get, "/api/genres") => {
            let json = serde_json::to_string(&ApiResponse::success(GENRES))?;
            let response = Response::from_string(json).with_header(content_type("application/json"));
            request.respond(response)
        }

        // 404
        _ => {
            let response = Response::from_string("Not found").with_status_code(404);
            request.respond(response)
        }
    }
}

fn content_type(value: &str) -> Header {
    Header::from_bytes(&b"Content-Type"[..], value.as_bytes()).expect("static header is valid")
}

/// Query string first, then JSON body, then empty fields
fn parse_params(request: &mut Request) -> std::io::Result<RecommendParams> {
    let url = request.url().to_string();

    // Try query string
    if let Some(query) = url.split('?').nth(1) {
        if let Ok(params) = serde_urlencoded::from_str::<RecommendParams>(query) {
            return Ok(params);
        }
    }

    // Try JSON body
    let mut body = String::new();
    request.as_reader().read_to_string(&mut body)?;
    if !body.is_empty() {
        if let Ok(params) = serde_json::from_str::<RecommendParams>(&body) {
            return Ok(params);
        }
    }

    Ok(RecommendParams::default())
}

/// Run one form submission; artifacts are only written on success
pub fn run_recommendation(
    params: &RecommendParams,
    catalog: &Catalog,
    output_dir: Option<&Path>,
) -> crate::Result<RecommendReport> {
    let query = params.to_query()?;
    let result = recommend::recommend(catalog, &query)?;

    let output = match output_dir {
        Some(base) => {
            let dir = report::create_run_directory(base)?;
            Some(report::export(&dir, &query, &result)?)
        }
        None => None,
    };

    Ok(RecommendReport {
        generated: chrono::Local::now().to_rfc3339(),
        summary: report::Summary::from_result(&result),
        query,
        result,
        output,
    })
}

/// Message shown in the form for a failed submission
pub fn user_message(error: &Error) -> String {
    match error {
        Error::ModeNotSelected => "Select a recommendation mode.".to_string(),
        Error::NoResults => "No titles match these filters.".to_string(),
        Error::InvalidYear(raw) => format!("'{}' is not a year.", raw),
        Error::UnknownGenre(raw) if raw.is_empty() => "Select a genre.".to_string(),
        Error::UnknownGenre(raw) => format!("'{}' is not a supported genre.", raw),
        other => format!("Something went wrong: {}", other),
    }
}

fn render_ui() -> String {
    let options: String = GENRES
        .iter()
        .map(|g| {
            let selected = if *g == "Drama" { " selected" } else { "" };
            format!("<option value=\"{g}\"{selected}>{g}</option>")
        })
        .collect();
    UI_HTML.replace("{{GENRE_OPTIONS}}", &options)
}
