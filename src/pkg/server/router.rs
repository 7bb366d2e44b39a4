use axum::routing::get;
use axum::Router;

use super::handlers::probes::{healthz, livez};
use super::handlers::{companies, jobs};
use super::state::AppState;
use crate::prelude::Result;

pub async fn build_routes() -> Result<Router> {
    let state = AppState::new().await?;
    let app = Router::new()
        .route("/companies", get(companies::list).post(companies::create))
        .route(
            "/companies/{handle}",
            get(companies::retrieve)
                .patch(companies::update)
                .delete(companies::remove),
        )
        .route("/jobs", get(jobs::list).post(jobs::create))
        .route(
            "/jobs/{id}",
            get(jobs::retrieve).patch(jobs::update).delete(jobs::remove),
        )
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .with_state(state);

    Ok(app)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    use super::build_routes;
    use crate::{prelude::Result, token::create_token};

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[traced_test]
    #[tokio::test]
    async fn mutation_without_token_is_unauthorized() -> Result<()> {
        let app = build_routes().await?;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/jobs")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"title":"job5","companyHandle":"c1"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[traced_test]
    #[tokio::test]
    async fn non_admin_token_is_unauthorized() -> Result<()> {
        let app = build_routes().await?;
        let token = create_token("u1", false)?;
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/jobs/1")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[traced_test]
    #[tokio::test]
    async fn unknown_filter_key_is_bad_request() -> Result<()> {
        let app = build_routes().await?;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/jobs?salaryFloor=10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[traced_test]
    #[tokio::test]
    async fn filter_coercion_failure_is_bad_request() -> Result<()> {
        let app = build_routes().await?;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/jobs?minSalary=lots")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[traced_test]
    #[tokio::test]
    async fn patch_with_immutable_field_is_bad_request() -> Result<()> {
        let app = build_routes().await?;
        let token = create_token("admin", true)?;
        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/jobs/1")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"companyHandle":"c2"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[traced_test]
    #[tokio::test]
    async fn patch_company_handle_is_immutable_too() -> Result<()> {
        let app = build_routes().await?;
        let token = create_token("admin", true)?;
        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/companies/c1")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"handle":"c2"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[traced_test]
    #[tokio::test]
    async fn invalid_create_payload_reports_every_violation() -> Result<()> {
        let app = build_routes().await?;
        let token = create_token("admin", true)?;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/jobs")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"title":"","salary":-5,"companyHandle":"c1"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["status"], 400);
        assert_eq!(body["error"]["message"].as_array().unwrap().len(), 2);
        Ok(())
    }

    #[traced_test]
    #[tokio::test]
    async fn non_numeric_job_id_is_bad_request() -> Result<()> {
        let app = build_routes().await?;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/jobs/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["status"], 400);
        assert!(body["error"]["message"].as_array().unwrap()[0]
            .as_str()
            .unwrap()
            .contains("Cannot parse"));
        Ok(())
    }

    #[traced_test]
    #[tokio::test]
    async fn livez_is_open() -> Result<()> {
        let app = build_routes().await?;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/livez")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }
}
