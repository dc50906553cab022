use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Response, StatusCode};
use serde::Serialize;
use sub_recoded_types::{ProxyError, DEFAULT_ASSET_CONTENT_TYPE, HTML_CONTENT_TYPE, TEXT_CONTENT_TYPE};

pub type ProxyResponse = Response<Full<Bytes>>;

pub fn text_response(status: u16, body: impl Into<String>) -> ProxyResponse {
    build(status, TEXT_CONTENT_TYPE, Bytes::from(body.into()))
}

pub fn html_response(html: String) -> ProxyResponse {
    build(200, HTML_CONTENT_TYPE, Bytes::from(html))
}

pub fn bytes_response(status: u16, content_type: &str, body: Vec<u8>) -> ProxyResponse {
    build(status, content_type, Bytes::from(body))
}

pub fn json_response<T: Serialize>(status: u16, value: &T) -> ProxyResponse {
    let json = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());
    build(status, "application/json", Bytes::from(json))
}

pub fn error_response(err: &ProxyError) -> ProxyResponse {
    text_response(err.status_code(), err.public_message())
}

fn build(status: u16, content_type: &str, body: Bytes) -> ProxyResponse {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    // Upstream content types are forwarded as-is; fall back when one is not a valid header value.
    let response = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, content_type)
        .body(Full::new(body.clone()));

    match response {
        Ok(response) => response,
        Err(_) => {
            let mut response = Response::new(Full::new(body));
            *response.status_mut() = status;
            response.headers_mut().insert(
                CONTENT_TYPE,
                hyper::header::HeaderValue::from_static(DEFAULT_ASSET_CONTENT_TYPE),
            );
            response
        }
    }
}
