//! Local upstream feed server for tests.

use axum::{extract::Path, http::StatusCode, routing::get, Router};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

pub const SAMPLE_ICS: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:1@example.com\r\n\
DTSTART:20260101T090000Z\r\n\
SUMMARY:Module 1\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

/// An axum server on an ephemeral port serving canned feed responses:
///
/// - `/ok.ics`: 200 with [`SAMPLE_ICS`]
/// - `/garbage.ics`: 200 with non-ICS text
/// - `/missing.ics`: 404
/// - `/broken.ics`: 503
/// - `/slow/:millis`: 200 with [`SAMPLE_ICS`] after a delay
pub struct Upstream {
    addr: SocketAddr,
}

impl Upstream {
    pub async fn spawn() -> Self {
        let app = Router::new()
            .route("/ok.ics", get(|| async { SAMPLE_ICS }))
            .route("/garbage.ics", get(|| async { "this is not a calendar" }))
            .route("/missing.ics", get(|| async { StatusCode::NOT_FOUND }))
            .route(
                "/broken.ics",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "upstream down") }),
            )
            .route(
                "/slow/:millis",
                get(|Path(millis): Path<u64>| async move {
                    tokio::time::sleep(Duration::from_millis(millis)).await;
                    SAMPLE_ICS
                }),
            );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind upstream listener");
        let addr = listener.local_addr().expect("should have local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { addr }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// A url on a port that was bound and then released, so connections are refused.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind probe listener");
    let addr = listener.local_addr().expect("should have local addr");
    drop(listener);
    format!("http://{}/gone.ics", addr)
}
