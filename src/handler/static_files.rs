//! Static file serving module
//!
//! Serves the prebuilt frontend bundle: index document for `/`, assets by
//! relative path, MIME detection, and `ETag` revalidation.

use crate::config::FrontendConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve a frontend asset for the request path, falling back to 404.
pub async fn serve_frontend(
    ctx: &RequestContext<'_>,
    frontend: &FrontendConfig,
) -> Response<Full<Bytes>> {
    match load_asset(&frontend.dir, ctx.path, &frontend.index_files).await {
        Some((content, content_type)) => {
            if ctx.access_log {
                logger::log_response(content.len());
            }
            build_asset_response(
                &content,
                content_type,
                ctx.if_none_match.as_deref(),
                ctx.is_head,
            )
        }
        None => http::build_404_response(),
    }
}

/// Load an asset from the frontend directory with index file support
async fn load_asset(
    frontend_dir: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");

    let mut file_path = Path::new(frontend_dir).join(&clean_path);

    // Security: ensure file_path is within the frontend directory
    let frontend_dir_canonical = match Path::new(frontend_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Frontend directory not found or inaccessible '{frontend_dir}': {e}"
            ));
            return None;
        }
    };

    // The entry document and directory paths resolve through index files
    if file_path.is_dir() || clean_path.is_empty() || clean_path.ends_with('/') {
        for index_file in index_files {
            let index_path = file_path.join(index_file);
            if index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&frontend_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    // Determine content type from extension
    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

/// Build asset response with `ETag` revalidation
fn build_asset_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);

    // Check if client has cached version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    // build_cached_response drops the body for HEAD but keeps Content-Length
    http::response::build_cached_response(Bytes::from(data.to_owned()), content_type, &etag, is_head)
}
