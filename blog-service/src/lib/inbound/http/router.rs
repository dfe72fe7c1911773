use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::HeaderMap;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_post::create_post;
use super::handlers::create_user::create_user;
use super::handlers::current_user::delete_current_user;
use super::handlers::current_user::get_current_user;
use super::handlers::health::health;
use super::handlers::list_feed::list_feed;
use super::handlers::list_my_posts::list_my_posts;
use super::handlers::login::login;
use super::handlers::update_post::update_post;
use super::middleware::authenticate as auth_middleware;
use crate::domain::access::bearer::RequestAuthenticator;
use crate::domain::access::credentials::CredentialVerifier;
use crate::domain::access::gate::AuthorizationGate;
use crate::domain::access::models::LoginCredentials;
use crate::domain::access::ports::AuthStrategy;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::ports::PostServicePort;
use crate::domain::post::service::PostService;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::domain::user::service::UserService;

/// Login strategy: username and password
pub type LoginStrategy = dyn AuthStrategy<Credentials = LoginCredentials>;

/// Request strategy: bearer token in the headers
pub type BearerStrategy = dyn AuthStrategy<Credentials = HeaderMap>;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub post_service: Arc<dyn PostServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub credential_verifier: Arc<LoginStrategy>,
    pub gate: Arc<AuthorizationGate<BearerStrategy>>,
}

impl AppState {
    /// Wire services and authentication strategies over the given repositories.
    pub fn new<UR, PR>(
        user_repository: Arc<UR>,
        post_repository: Arc<PR>,
        authenticator: Arc<Authenticator>,
        feed_size: u32,
    ) -> Self
    where
        UR: UserRepository,
        PR: PostRepository,
    {
        let credential_verifier: Arc<LoginStrategy> = Arc::new(CredentialVerifier::new(
            Arc::clone(&user_repository),
            Arc::clone(&authenticator),
        ));
        let request_authenticator: Arc<BearerStrategy> = Arc::new(RequestAuthenticator::new(
            Arc::clone(&user_repository),
            Arc::clone(&authenticator),
        ));

        Self {
            user_service: Arc::new(UserService::new(
                Arc::clone(&user_repository),
                Arc::clone(&authenticator),
            )),
            post_service: Arc::new(PostService::new(
                post_repository,
                user_repository,
                feed_size,
            )),
            authenticator,
            credential_verifier,
            gate: Arc::new(AuthorizationGate::new(request_authenticator)),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    // The feed is readable without a token
    let public_routes = Router::new()
        .route("/api", get(health))
        .route("/api/login", post(login))
        .route("/api/users", post(create_user))
        .route("/api/blogs", get(list_feed));

    let protected_routes = Router::new()
        .route("/api/blogs", post(create_post))
        .route("/api/blogs/mine", get(list_my_posts))
        .route("/api/blogs/:post_id", put(update_post))
        .route(
            "/api/users/me",
            get(get_current_user).delete(delete_current_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers are left out of the span: they carry bearer tokens
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
