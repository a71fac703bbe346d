use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
///
/// Lookups take the full path as a multi-segment wildcard.
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route("/api/categories/{*path}", get(handlers::get_category))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{memory_category_service, seed_fixture_tree};
    use axum::http::{header, StatusCode};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server(service: Arc<CategoryService>) -> TestServer {
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_create_returns_201_with_location() {
        let server = server(memory_category_service());

        server
            .post("/api/categories")
            .json(&json!({ "slug": "electronics", "name": "Electronics" }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/api/categories")
            .json(&json!({
                "slug": "electronics/audio",
                "name": "Audio",
                "description": "Speakers and headphones",
                "sortOrder": 2
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        assert_eq!(
            response.header(header::LOCATION),
            "/api/categories/electronics/audio"
        );

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["slug"], "electronics/audio");
        assert_eq!(body["data"]["sortOrder"], 2);
    }

    #[tokio::test]
    async fn test_get_by_nested_path() {
        let service = memory_category_service();
        seed_fixture_tree(&service).await;
        let server = server(service);

        let response = server
            .get("/api/categories/category-2/category-2-1/category-2-1-2")
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(
            body["data"]["slug"],
            "category-2/category-2-1/category-2-1-2"
        );
        assert_eq!(body["data"]["sortOrder"], 2);
    }

    #[tokio::test]
    async fn test_get_unknown_path_is_404() {
        let server = server(memory_category_service());
        let response = server.get("/api/categories/nowhere").await;
        response.assert_status_not_found();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_create_rejections_are_400_with_messages() {
        let service = memory_category_service();
        seed_fixture_tree(&service).await;
        let server = server(service);

        let cases = [
            (json!({ "slug": "category-1", "name": "Other" }), "Slug already exists"),
            (
                json!({ "slug": "missing/child", "name": "Child" }),
                "Parent slug does not exist",
            ),
            (
                json!({ "slug": "category-1/new", "name": "category 1 1" }),
                "Name already exists",
            ),
        ];
        for (payload, message) in cases {
            let response = server.post("/api/categories").json(&payload).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: Value = response.json();
            assert_eq!(body["message"], message);
        }

        server
            .post("/api/categories")
            .json(&json!({ "slug": "Bad//Slug", "name": "Bad" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let server = server(memory_category_service());
        server
            .post("/api/categories")
            .json(&json!({ "name": "No slug" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_flat_and_tree() {
        let service = memory_category_service();
        seed_fixture_tree(&service).await;
        let server = server(service);

        let flat: Value = server.get("/api/categories").await.json();
        assert_eq!(flat["meta"]["total"], 7);
        assert_eq!(flat["data"][3]["slug"], "category-2");
        assert_eq!(flat["data"][3]["sortKey"], "002");

        let tree: Value = server
            .get("/api/categories")
            .add_query_param("tree", true)
            .await
            .json();
        assert_eq!(tree["meta"]["total"], 2);
        assert_eq!(
            tree["data"][1]["children"][0]["children"][1]["slug"],
            "category-2/category-2-1/category-2-1-2"
        );
    }
}
