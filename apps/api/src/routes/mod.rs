pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::resumes::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes",
            post(handlers::handle_create_resume).get(handlers::handle_list_resumes),
        )
        .route(
            "/api/v1/resumes/:id",
            get(handlers::handle_get_resume).delete(handlers::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/tailor",
            post(handlers::handle_tailor_resume),
        )
        .route(
            "/api/v1/resumes/:id/status",
            patch(handlers::handle_update_status),
        )
        .route(
            "/api/v1/resumes/:id/pdf",
            get(handlers::handle_download_pdf).post(handlers::handle_generate_pdf),
        )
        // Job postings
        .route("/api/v1/jobs/parse-url", post(handlers::handle_parse_job_url))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, HeaderMap, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::testing::Harness;

    async fn send(
        router: Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>, HeaderMap) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = router.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec(), headers)
    }

    fn json_of(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let h = Harness::new();
        let (status, body, _) = send(build_router(h.state()), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_then_tailor_then_download() {
        let h = Harness::new();
        h.add_bullet("Built Go services on PostgreSQL");
        let router = build_router(h.state());
        let user_id = h.user.id;

        let (status, body, _) = send(
            router.clone(),
            Method::POST,
            "/api/v1/resumes",
            Some(json!({
                "user_id": user_id,
                "job_description": "Senior Backend Engineer... Go, PostgreSQL"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created = json_of(&body);
        assert_eq!(created["status"], "draft");
        let id = created["id"].as_str().unwrap().to_string();

        let (status, _, _) = send(
            router.clone(),
            Method::GET,
            &format!("/api/v1/resumes/{id}/pdf?user_id={user_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body, _) = send(
            router.clone(),
            Method::POST,
            &format!("/api/v1/resumes/{id}/tailor"),
            Some(json!({ "user_id": user_id, "max_bullets": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let tailored = json_of(&body);
        assert_eq!(tailored["status"], "generated");
        assert_eq!(tailored["company_name"], "Acme");

        let (status, body, headers) = send(
            router,
            Method::GET,
            &format!("/api/v1/resumes/{id}/pdf?user_id={user_id}&template=modern&locale=de"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with(b"%PDF"));
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume_Acme.pdf\""
        );
        assert_eq!(headers["x-cache"], "MISS");
    }

    #[tokio::test]
    async fn test_invalid_create_lists_fields() {
        let h = Harness::new();
        let (status, body, _) = send(
            build_router(h.state()),
            Method::POST,
            "/api/v1/resumes",
            Some(json!({
                "user_id": h.user.id,
                "job_description": "",
                "target_language": "xx"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error = &json_of(&body)["error"];
        assert_eq!(error["code"], "VALIDATION_ERROR");
        assert_eq!(error["fields"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_bad_status_transition_is_conflict() {
        let h = Harness::new();
        let resume = h.draft().await;
        let (status, body, _) = send(
            build_router(h.state()),
            Method::PATCH,
            &format!("/api/v1/resumes/{}/status", resume.id),
            Some(json!({ "user_id": h.user.id, "status": "accepted" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json_of(&body)["error"]["code"], "INVALID_STATUS_TRANSITION");
    }

    #[tokio::test]
    async fn test_tailor_without_bullets_is_unprocessable() {
        let h = Harness::new();
        let resume = h.draft().await;
        let (status, body, _) = send(
            build_router(h.state()),
            Method::POST,
            &format!("/api/v1/resumes/{}/tailor", resume.id),
            Some(json!({ "user_id": h.user.id })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_of(&body)["error"]["code"], "NO_BULLETS_AVAILABLE");
    }

    #[tokio::test]
    async fn test_unknown_template_is_rejected() {
        let h = Harness::new();
        let resume = h.tailored().await;
        let (status, _, _) = send(
            build_router(h.state()),
            Method::GET,
            &format!("/api/v1/resumes/{}/pdf?user_id={}&template=fancy", resume.id, h.user.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(h.pdf.calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_returns_no_content() {
        let h = Harness::new();
        let resume = h.draft().await;
        let router = build_router(h.state());
        let uri = format!("/api/v1/resumes/{}?user_id={}", resume.id, h.user.id);

        let (status, _, _) = send(router.clone(), Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _, _) = send(router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_parse_url_rejects_non_http() {
        let h = Harness::new();
        let (status, _, _) = send(
            build_router(h.state()),
            Method::POST,
            "/api/v1/jobs/parse-url",
            Some(json!({ "url": "javascript:alert(1)" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
