use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;

/// The stylesheet (and any future static files) baked into the binary,
/// so a deployment is the one executable plus its data directory.
#[derive(Embed)]
#[folder = "assets/"]
#[include = "css/*.css"]
struct StaticFiles;

/// `GET /assets/{*path}`
pub async fn serve(Path(path): Path<String>) -> Response {
    let Some(file) = StaticFiles::get(&path) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    (
        [
            (header::CONTENT_TYPE, mime.as_ref().to_string()),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        file.data.to_vec(),
    )
        .into_response()
}
