use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::Value;

/// Path the platform delivers webhook events to
pub const CALLBACK_PATH: &str = "/2h/callback";

/// Acknowledgment body expected by the platform
pub const CALLBACK_ACK: &str = "OK";

/// Receives a pushed event, logs it and acknowledges with a fixed body.
///
/// The payload is logged as JSON when it parses, raw otherwise. Nothing is
/// correlated with the reconciliation runs.
pub async fn receive_callback(req: HttpRequest, body: web::Bytes) -> HttpResponse {
    let signature = req
        .headers()
        .get("x-hub-signature")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    match serde_json::from_slice::<Value>(&body) {
        Ok(event) => {
            let topic = event
                .get("topic")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            log::info!(
                "📨 Callback received (topic: {}, signature: {}): {}",
                topic,
                signature,
                event
            );
        }
        Err(_) => {
            log::info!(
                "📨 Callback received (non-JSON, {} bytes, signature: {}): {}",
                body.len(),
                signature,
                String::from_utf8_lossy(&body)
            );
        }
    }

    HttpResponse::Ok().body(CALLBACK_ACK)
}

/// Liveness probe
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

/// Registers the receiver routes on an actix app
pub fn configure_callback_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(CALLBACK_PATH, web::post().to(receive_callback))
        .route("/health", web::get().to(health));
}
