use mime_guess::mime;
use rust_embed::RustEmbed;
use std::borrow::Cow;
use wry::http::{header::CONTENT_TYPE, Request, Response, StatusCode};

/// Name of the custom protocol the WebView loads the UI from.
pub const PROTOCOL: &str = "fileviewer";

/// The HTML/CSS/JS of the UI, embedded into the binary.
#[derive(RustEmbed)]
#[folder = "src/ui"]
#[include = "*.html"]
#[include = "*.css"]
#[include = "*.js"]
pub struct UiAssets;

/// The URL of the start page for the current platform.
///
/// WebView2 maps custom protocols to `http://<name>.localhost`.
pub fn start_url() -> String {
    if cfg!(windows) {
        format!("http://{PROTOCOL}.localhost/index.html")
    } else {
        format!("{PROTOCOL}://localhost/index.html")
    }
}

/// Provides (Bytes, Content-Type) for a requested resource.
pub fn load(path: &str) -> Option<(Cow<'static, [u8]>, String)> {
    let norm = normalize(path);
    UiAssets::get(&norm).map(|file| (file.data, content_type(&norm)))
}

/// Answers a request on the custom protocol.
pub fn respond(request: Request<Vec<u8>>) -> Response<Cow<'static, [u8]>> {
    let path = request.uri().path();
    let (status, content_type, body) = match load(path) {
        Some((data, ct)) => (StatusCode::OK, ct, data),
        None => {
            tracing::warn!("UI asset not found: {}", path);
            (
                StatusCode::NOT_FOUND,
                "text/plain; charset=utf-8".to_string(),
                Cow::Borrowed(&b"Not Found"[..]),
            )
        }
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, content_type)
        .body(body)
        .unwrap_or_else(|e| {
            tracing::error!("Failed to build asset response: {}", e);
            Response::new(Cow::Borrowed(&[][..]))
        })
}

fn normalize(raw: &str) -> String {
    let p = raw.trim_start_matches('/').trim();
    if p.is_empty() {
        "index.html".into()
    } else {
        p.to_string()
    }
}

fn content_type(path: &str) -> String {
    let guess = mime_guess::from_path(path).first_or(mime::APPLICATION_OCTET_STREAM);
    match guess.type_() {
        mime::TEXT | mime::APPLICATION if guess.subtype() == mime::JAVASCRIPT => {
            "application/javascript; charset=utf-8".into()
        }
        mime::TEXT if guess.subtype() == mime::HTML => "text/html; charset=utf-8".into(),
        mime::TEXT if guess.subtype() == mime::CSS => "text/css; charset=utf-8".into(),
        _ => guess.essence_str().to_string(),
    }
}
