//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::FromRef, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{ProductService, UserService};
use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::{ApiResponse, ListResponse, PaginationMeta};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::{health, metrics, products, users};

/// State shared by every route. Handlers extract their own slice via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub user_service: Arc<UserService>,
    pub product_service: Arc<ProductService>,
    pub metrics: PrometheusHandle,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(repos: Arc<dyn RepositoryProvider>, metrics: PrometheusHandle) -> Self {
        Self {
            user_service: Arc::new(UserService::new(repos.clone())),
            product_service: Arc::new(ProductService::new(repos.clone())),
            repos,
            metrics,
            started_at: Instant::now(),
        }
    }
}

impl FromRef<AppState> for users::UserHandlerState {
    fn from_ref(s: &AppState) -> Self {
        users::UserHandlerState {
            user_service: Arc::clone(&s.user_service),
        }
    }
}

impl FromRef<AppState> for products::ProductHandlerState {
    fn from_ref(s: &AppState) -> Self {
        products::ProductHandlerState {
            product_service: Arc::clone(&s.product_service),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            repos: Arc::clone(&s.repos),
            started_at: s.started_at,
        }
    }
}

impl FromRef<AppState> for metrics::MetricsState {
    fn from_ref(s: &AppState) -> Self {
        metrics::MetricsState {
            handle: s.metrics.clone(),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
    ),
    components(
        schemas(
            ApiResponse<users::UserDto>,
            ApiResponse<products::ProductDto>,
            ListResponse<users::UserDto>,
            ListResponse<products::ProductDto>,
            PaginationMeta,
            health::HealthResponse,
            health::ComponentHealth,
            users::UserDto,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            products::ProductDto,
            products::CreateProductRequest,
            products::UpdateProductRequest,
        )
    ),
    tags(
        (name = "Health", description = "Service and storage health"),
        (name = "Users", description = "User CRUD and search"),
        (name = "Products", description = "Product CRUD and search; each product belongs to one user"),
    ),
    info(
        title = "db-blueprints API",
        version = "0.1.0",
        description = "Users and Products CRUD over a pluggable storage backend",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(repos: Arc<dyn RepositoryProvider>, metrics: PrometheusHandle) -> Router {
    let state = AppState::new(repos, metrics);

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        );

    let product_routes = Router::new()
        .route("/", get(products::list_products).post(products::create_product))
        .route(
            "/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        );

    let api = Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/products", product_routes)
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(api)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::Service;

    use crate::infrastructure::InMemoryRepositoryProvider;

    fn app() -> Router {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        create_api_router(Arc::new(InMemoryRepositoryProvider::new()), handle)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };
        let mut svc = app.clone().into_service();
        svc.call(builder.body(body).unwrap()).await.unwrap()
    }

    async fn read_json(resp: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_user(app: &Router, name: &str) -> i64 {
        let resp = call(
            app,
            "POST",
            "/api/v1/users",
            Some(json!({"name": name, "email": format!("{}@example.com", name.to_lowercase())})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        read_json(resp).await["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn user_crud_round_trip() {
        let app = app();
        let id = create_user(&app, "Alice").await;

        let resp = call(&app, "GET", &format!("/api/v1/users/{}", id), None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["email"], "alice@example.com");

        let resp = call(
            &app,
            "PUT",
            &format!("/api/v1/users/{}", id),
            Some(json!({"name": "Alicia"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["data"]["name"], "Alicia");
        assert_eq!(body["data"]["email"], "alice@example.com");

        let resp = call(&app, "DELETE", &format!("/api/v1/users/{}", id), None).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = call(&app, "GET", &format!("/api/v1/users/{}", id), None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = read_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("User"));
    }

    #[tokio::test]
    async fn list_returns_items_and_metadata() {
        let app = app();
        for name in ["Carol", "Alice", "Bob"] {
            create_user(&app, name).await;
        }

        let resp = call(
            &app,
            "GET",
            "/api/v1/users?order_by=name&order_desc=true&size=2&page=9",
            None,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;

        let meta = &body["data"]["metadata"];
        assert_eq!(meta["page"], 2);
        assert_eq!(meta["size"], 2);
        assert_eq!(meta["total_count"], 3);
        assert_eq!(meta["total_pages"], 2);
        assert_eq!(meta["has_previous"], true);
        assert_eq!(meta["has_next"], false);
        assert_eq!(meta["take_all"], false);

        let items = body["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "Alice");
    }

    #[tokio::test]
    async fn malformed_ids_are_bad_requests() {
        let app = app();
        for uri in ["/api/v1/users/abc", "/api/v1/products/1.5"] {
            let resp = call(&app, "GET", uri, None).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
        let resp = call(&app, "DELETE", "/api/v1/users/zero", None).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bodies_are_validated() {
        let app = app();

        let resp = call(&app, "POST", "/api/v1/users", Some(json!({"name": "", "email": "x"}))).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let resp = call(&app, "POST", "/api/v1/users", Some(json!({"name": "Alice"}))).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let resp = call(&app, "POST", "/api/v1/users", Some(json!({"name": "   ", "email": "a@b.io"}))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn products_carry_their_owner() {
        let app = app();
        let owner = create_user(&app, "Alice").await;

        let resp = call(
            &app,
            "POST",
            "/api/v1/products",
            Some(json!({"name": "Lamp", "price": "19.99", "owner_id": owner})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = read_json(resp).await;
        let product_id = body["data"]["id"].as_i64().unwrap();
        assert_eq!(body["data"]["price"], "19.99");

        let resp = call(&app, "GET", &format!("/api/v1/products/{}", product_id), None).await;
        let body = read_json(resp).await;
        assert_eq!(body["data"]["owner"]["id"], owner);
        assert_eq!(body["data"]["owner"]["name"], "Alice");

        let resp = call(&app, "GET", "/api/v1/products?search=lam", None).await;
        let body = read_json(resp).await;
        assert_eq!(body["data"]["metadata"]["total_count"], 1);
        assert_eq!(body["data"]["items"][0]["owner"]["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn product_for_unknown_owner_is_rejected() {
        let app = app();
        let resp = call(
            &app,
            "POST",
            "/api/v1/products",
            Some(json!({"name": "Lamp", "price": "5.00", "owner_id": 42})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let owner = create_user(&app, "Bob").await;
        let resp = call(
            &app,
            "POST",
            "/api/v1/products",
            Some(json!({"name": "Lamp", "price": "-1", "owner_id": owner})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn every_response_has_a_request_id() {
        let app = app();

        let resp = call(&app, "GET", "/health", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
        let body = read_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"]["status"], "ok");

        let mut svc = app.clone().into_service();
        let resp = svc
            .call(
                Request::builder()
                    .uri("/api/v1/users/nope")
                    .header("x-request-id", "trace-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.headers()["x-request-id"], "trace-123");
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_prometheus_text() {
        let app = app();
        let resp = call(&app, "GET", "/metrics", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
    }

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/api/v1/users", "/api/v1/users/{id}", "/api/v1/products", "/api/v1/products/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "{}", path);
        }
    }
}
