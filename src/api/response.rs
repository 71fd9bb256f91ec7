// API response utility functions module

use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Build JSON response
pub fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    cors: bool,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", cors);
        }
    };

    let content_length = json.len();
    let payload = if is_head {
        Bytes::new()
    } else {
        Bytes::from(json)
    };

    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Content-Length", content_length);
    if cors {
        builder = builder.header("Access-Control-Allow-Origin", "*");
    }

    builder.body(Full::new(payload)).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to build response: {e}"));
        Response::new(Full::new(Bytes::from("Error")))
    })
}

/// 404 for a metric token absent from the metric map
pub fn metric_not_found(cors: bool) -> Response<Full<Bytes>> {
    error_body(StatusCode::NOT_FOUND, "Metric not found", cors)
}

/// 404 for a position matching no record
pub fn position_not_found(cors: bool) -> Response<Full<Bytes>> {
    error_body(StatusCode::NOT_FOUND, "Position not found", cors)
}

/// 404 for an unknown API route
pub fn not_found(cors: bool) -> Response<Full<Bytes>> {
    error_body(StatusCode::NOT_FOUND, "Not Found", cors)
}

/// 500 for a missing or unreadable dataset
pub fn internal_error(cors: bool) -> Response<Full<Bytes>> {
    error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", cors)
}

fn error_body(status: StatusCode, message: &str, cors: bool) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message });
    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "application/json");
    if cors {
        builder = builder.header("Access-Control-Allow-Origin", "*");
    }
    builder
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Error"))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn metric_error_body_is_exact() {
        let resp = metric_not_found(true);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(resp).await, r#"{"error":"Metric not found"}"#);
    }

    #[tokio::test]
    async fn position_error_body_is_exact() {
        let resp = position_not_found(false);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(resp).await, r#"{"error":"Position not found"}"#);
    }

    #[test]
    fn cors_header_follows_flag() {
        let with = metric_not_found(true);
        assert_eq!(
            with.headers()
                .get("Access-Control-Allow-Origin")
                .map(|v| v.to_str().unwrap()),
            Some("*")
        );

        let without = metric_not_found(false);
        assert!(without
            .headers()
            .get("Access-Control-Allow-Origin")
            .is_none());
    }

    #[tokio::test]
    async fn head_strips_body_but_keeps_length() {
        let resp = json_response(StatusCode::OK, &vec!["Mid", "Top"], true, true);
        let expected_len = r#"["Mid","Top"]"#.len().to_string();
        assert_eq!(
            resp.headers()
                .get("Content-Length")
                .map(|v| v.to_str().unwrap()),
            Some(expected_len.as_str())
        );
        assert!(body_string(resp).await.is_empty());
    }
}
