use std::net::{Ipv4Addr, SocketAddr};

use axum::Router;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::any;
use tower_http::cors::CorsLayer;

use super::PromptSender;

/// Single endpoint: any method on `/`, the raw body is the prompt
pub(crate) fn router(sender: PromptSender) -> Router {
    Router::new()
        .route("/", any(receive_prompt))
        .layer(DefaultBodyLimit::disable())
        .layer(CorsLayer::permissive())
        .with_state(sender)
}

async fn receive_prompt(
    State(sender): State<PromptSender>,
    body: Result<Bytes, BytesRejection>,
) -> (StatusCode, &'static str) {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("failed to read request body: {e}");
            return (StatusCode::BAD_REQUEST, "error reading request body\n");
        }
    };
    if body.is_empty() {
        return (StatusCode::BAD_REQUEST, "prompt empty\n");
    }

    let prompt = String::from_utf8_lossy(&body).into_owned();
    if sender.send(prompt).is_err() {
        return (StatusCode::SERVICE_UNAVAILABLE, "not accepting prompts\n");
    }
    (StatusCode::OK, "prompt received\n")
}

/// Serve the prompt endpoint on the loopback interface until the process ends
pub(crate) async fn serve(port: u16, sender: PromptSender) {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to listen on {addr}: {e}");
            return;
        }
    };
    tracing::debug!("listening for prompts on http://{addr}/");
    if let Err(e) = axum::serve(listener, router(sender)).await {
        tracing::error!("prompt listener stopped: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    fn request(method: Method, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri("/")
            .header(header::ORIGIN, "http://localhost")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn body_is_published_as_prompt() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let response = router(tx)
            .oneshot(request(Method::POST, "Explain ownership"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert_eq!(body_text(response).await, "prompt received\n");
        assert_eq!(rx.try_recv().unwrap(), "Explain ownership");
    }

    #[tokio::test]
    async fn empty_body_is_rejected() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let response = router(tx).oneshot(request(Method::POST, "")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "prompt empty\n");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn any_method_is_accepted() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let response = router(tx)
            .oneshot(request(Method::PUT, "via put"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(rx.try_recv().unwrap(), "via put");
    }
}
