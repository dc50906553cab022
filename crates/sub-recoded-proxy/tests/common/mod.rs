#![allow(dead_code)]

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use sub_recoded_proxy::HttpFetcher;
use tokio::net::TcpListener;

/// Host name the test clients resolve to the upstream fixture.
pub const UPSTREAM_HOST: &str = "upstream.test";

pub const PAGE_HTML: &str = r##"<html><head><title>Fixture</title></head><body><a href="next.html">next</a><img src="/logo.png"><a href="#top">top</a></body></html>"##;
pub const LANDING_HTML: &str = r#"<html><head></head><body><img src="pic.png"></body></html>"#;
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff, 0x10];

pub struct Upstream {
    pub addr: SocketAddr,
}

impl Upstream {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}:{}{}", UPSTREAM_HOST, self.addr.port(), path)
    }

    pub fn fetcher(&self) -> HttpFetcher {
        HttpFetcher::with_client(self.client())
    }

    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .resolve(UPSTREAM_HOST, self.addr)
            .no_proxy()
            .build()
            .expect("client")
    }
}

fn response(status: StatusCode, content_type: Option<&str>, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(status);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    builder.body(Full::new(body.into())).expect("response")
}

async fn route(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let res = match req.uri().path() {
        "/page.html" => response(StatusCode::OK, Some("text/html; charset=utf-8"), PAGE_HTML),
        "/landing/index.html" => response(StatusCode::OK, Some("text/html"), LANDING_HTML),
        "/moved" => Response::builder()
            .status(StatusCode::FOUND)
            .header("location", "/landing/index.html")
            .body(Full::new(Bytes::new()))
            .expect("redirect"),
        "/logo.png" => response(StatusCode::OK, Some("image/png"), PNG_BYTES),
        "/untyped" => response(StatusCode::OK, None, &b"raw bytes"[..]),
        "/broken" => response(StatusCode::INTERNAL_SERVER_ERROR, Some("text/plain"), "boom"),
        _ => response(StatusCode::NOT_FOUND, Some("text/plain"), "not here"),
    };
    Ok(res)
}

pub async fn spawn_upstream() -> Upstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind upstream");
    let addr = listener.local_addr().expect("upstream addr");

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service_fn(route))
                    .await;
            });
        }
    });

    Upstream { addr }
}
