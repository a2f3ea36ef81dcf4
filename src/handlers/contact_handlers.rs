use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State, Json},
    http::StatusCode,
    response::Json as AxumJson,
};
use serde_json::json;
use crate::{
    AppState,
    handlers::contact_dtos::SendEmailRequest,
    models::lead_models::LeadSubmission,
};

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn send_email(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendEmailRequest>, JsonRejection>,
) -> Result<AxumJson<serde_json::Value>, (StatusCode, AxumJson<serde_json::Value>)> {
    let request = match payload {
        Ok(Json(request)) => request,
        // No JSON content type means no parsed body, so the required fields are absent.
        Err(JsonRejection::MissingJsonContentType(_)) => SendEmailRequest::default(),
        Err(rejection) => {
            tracing::warn!("Rejected contact request body: {}", rejection.body_text());
            return Err((
                StatusCode::BAD_REQUEST,
                AxumJson(json!({ "error": rejection.body_text() })),
            ));
        }
    };

    let lead = LeadSubmission::try_from(request).map_err(|e| {
        tracing::warn!("Contact request missing required fields");
        (
            StatusCode::BAD_REQUEST,
            AxumJson(json!({ "error": e.to_string() })),
        )
    })?;

    match state.relay.submit(&lead).await {
        Ok(()) => {
            tracing::info!("Lead email sent");
            tracing::debug!("Lead email sent for {}", lead.email);
            Ok(AxumJson(json!({ "message": "Email sent successfully" })))
        }
        Err(e) => {
            tracing::error!("Error sending email: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                AxumJson(json!({
                    "error": "Failed to send email",
                    "details": e.to_string()
                })),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        relay::SmtpRelay,
        router,
        utils::mailer::{MailError, MockMailer},
    };
    use axum::{body::Body, http::{header, HeaderValue, Method, Request}, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const ORIGIN: &str = "http://localhost:5173";

    fn app(mailer: MockMailer) -> Router {
        let relay = SmtpRelay::new(Arc::new(mailer), "site@x.com", "ops@x.com");
        router(
            Arc::new(AppState::new(Arc::new(relay))),
            HeaderValue::from_static(ORIGIN),
        )
    }

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/send-email")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn sends_with_placeholders() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .withf(|email| {
                email.to == "ops@x.com"
                    && email.subject == "Новая заявка с сайта Цифровой театр"
                    && email.html.contains("<strong>Имя:</strong> Ann")
                    && email.html.contains("<strong>Email:</strong> a@x.com")
                    && email.html.contains("<strong>Телефон:</strong> Не указан")
                    && email.html.contains("<strong>Сообщение:</strong> Не указано")
            })
            .returning(|_| Ok(()));

        let (status, body) = call(app(mailer), post(r#"{"name":"Ann","email":"a@x.com"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Email sent successfully" }));
    }

    #[tokio::test]
    async fn missing_name_and_email_is_rejected_without_sending() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let (status, body) = call(app(mailer), post(r#"{"phone":"123"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Name and email are required" }));
    }

    #[tokio::test]
    async fn empty_email_is_rejected_without_sending() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let (status, _) = call(app(mailer), post(r#"{"name":"Ann","email":""}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_is_a_structured_400() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let (status, body) = call(app(mailer), post("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn transport_failure_reports_details() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .returning(|_| Err(MailError::Smtp("535 Authentication failed".into())));

        let (status, body) = call(
            app(mailer),
            post(r#"{"name":"Ann","email":"a@x.com","phone":"123","message":"hi"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to send email");
        assert!(body["details"].as_str().unwrap().contains("535 Authentication failed"));
    }

    #[tokio::test]
    async fn cors_allows_only_configured_origin() {
        let preflight = |origin: &str| {
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/send-email")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap()
        };

        let response = app(MockMailer::new()).oneshot(preflight(ORIGIN)).await.unwrap();
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");

        let response = app(MockMailer::new())
            .oneshot(preflight("http://evil.example"))
            .await
            .unwrap();
        // The configured origin is always echoed; the browser rejects the mismatch.
        let allowed = &response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN];
        assert_eq!(allowed, ORIGIN);
        assert_ne!(allowed, "http://evil.example");
    }

    #[tokio::test]
    async fn numeric_phone_is_relayed_as_text() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .withf(|email| email.html.contains("<strong>Телефон:</strong> 79001234567"))
            .returning(|_| Ok(()));

        let (status, _) = call(
            app(mailer),
            post(r#"{"name":"Ann","email":"a@x.com","phone":79001234567}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn whitespace_name_is_still_sent() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(1).returning(|_| Ok(()));

        let (status, _) = call(app(mailer), post(r#"{"name":"  ","email":"a@x.com"}"#)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_content_type_reads_as_missing_fields() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/send-email")
            .body(Body::from(r#"{"name":"Ann","email":"a@x.com"}"#))
            .unwrap();
        let (status, body) = call(app(mailer), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Name and email are required" }));
    }
}
