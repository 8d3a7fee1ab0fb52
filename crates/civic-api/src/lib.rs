pub mod handlers;
pub mod media;
pub mod middleware;
pub mod models;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use civic_auth::{AdminAllowList, IdentityVerifier};
use civic_db::entities::user::UserRole;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use media::{MediaKind, MediaStore};
use sea_orm::DatabaseConnection;

/// Multipart framing allowance on top of the file size limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across handlers
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: Vec<u8>,
    /// Session lifetime; `None` issues tokens without `exp`
    pub session_ttl: Option<chrono::Duration>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub media: Arc<dyn MediaStore>,
    pub admins: AdminAllowList,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Halisahar Connect API",
        version = "0.1.0",
        description = "REST API for reporting and resolving municipal civic issues",
        contact(
            name = "Halisahar Connect Team",
            email = "team@halisahar-connect.in"
        )
    ),
    paths(
        handlers::system::health_check,
        handlers::auth::google_auth,
        handlers::users::update_profile,
        handlers::users::get_current_user,
        handlers::users::list_users,
        handlers::users::delete_user,
        handlers::voters::get_voter,
        handlers::voters::seed_voters,
        handlers::voters::clear_voters,
        handlers::complaints::create_complaint,
        handlers::complaints::my_complaints,
        handlers::complaints::list_complaints,
        handlers::complaints::update_complaint,
        handlers::complaints::delete_complaint,
        handlers::alerts::send_alert,
        handlers::alerts::alerts_for_ward,
        handlers::alerts::list_alerts,
        handlers::alerts::delete_alert,
        handlers::media::upload_image,
        handlers::media::upload_audio,
    ),
    components(
        schemas(
            models::UserRole,
            models::User,
            models::GoogleAuthRequest,
            models::GoogleAuthResponse,
            models::UpdateProfileRequest,
            models::Voter,
            models::ComplaintStatus,
            models::ComplaintCategory,
            models::Complaint,
            models::CreateComplaintRequest,
            models::UpdateComplaintRequest,
            models::Alert,
            models::CreateAlertRequest,
            models::SendAlertResponse,
            models::SeedVotersResponse,
            models::ClearVotersResponse,
            models::UploadResponse,
            models::MessageResponse,
            models::HealthResponse,
            models::ErrorResponse,
        )
    ),
    tags(
        (name = "auth", description = "Google sign-in"),
        (name = "users", description = "Citizen profile endpoints"),
        (name = "voters", description = "Electoral roll lookup"),
        (name = "complaints", description = "Citizen complaint endpoints"),
        (name = "alerts", description = "Ward alert endpoints"),
        (name = "media", description = "Image and voice-note uploads"),
        (name = "admin", description = "Administrator endpoints"),
        (name = "system", description = "System health endpoints")
    )
)]
struct ApiDoc;

/// API server configuration
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
    /// Allowed CORS origins (if None, allows all)
    pub cors_origins: Option<Vec<String>>,
    /// HMAC secret for session tokens
    pub jwt_secret: Vec<u8>,
    /// Session lifetime; `None` issues tokens without expiry
    pub session_ttl: Option<chrono::Duration>,
    /// E-mails granted the admin role at sign-in
    pub admins: AdminAllowList,
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(
        config: ApiServerConfig,
        db: DatabaseConnection,
        identity: Arc<dyn IdentityVerifier>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        let state = Arc::new(AppState {
            db,
            jwt_secret: config.jwt_secret.clone(),
            session_ttl: config.session_ttl,
            identity,
            media,
            admins: config.admins.clone(),
        });

        Self { config, state }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let api_doc = ApiDoc::openapi();

        let jwt_state = Arc::new(middleware::JwtState::new(&self.config.jwt_secret));

        // Build PUBLIC routes (no authentication required)
        let public_router = Router::new()
            .route("/api/health", get(handlers::health_check))
            .route("/api/auth/google", post(handlers::google_auth))
            .route("/api/voter/{epic}", get(handlers::get_voter))
            .route("/api/alerts/{ward}", get(handlers::alerts_for_ward))
            .with_state(self.state.clone());

        // Build USER routes (any signed-in user)
        let user_router = Router::new()
            .route(
                "/api/upload",
                post(handlers::upload_image).layer(DefaultBodyLimit::max(
                    MediaKind::Image.max_bytes() + MULTIPART_OVERHEAD,
                )),
            )
            .route(
                "/api/upload-audio",
                post(handlers::upload_audio).layer(DefaultBodyLimit::max(
                    MediaKind::Audio.max_bytes() + MULTIPART_OVERHEAD,
                )),
            )
            .route("/api/user/profile", put(handlers::update_profile))
            .route("/api/user/me", get(handlers::get_current_user))
            .route("/api/complaints", post(handlers::create_complaint))
            .route("/api/complaints/me", get(handlers::my_complaints))
            .with_state(self.state.clone());

        // Build ADMIN routes; the role gate sits inside authentication
        let admin_router = Router::new()
            .route("/api/admin/users", get(handlers::list_users))
            .route("/api/admin/users/{id}", delete(handlers::delete_user))
            .route("/api/admin/complaints", get(handlers::list_complaints))
            .route(
                "/api/admin/complaints/{id}",
                put(handlers::update_complaint).delete(handlers::delete_complaint),
            )
            .route("/api/admin/send-alert", post(handlers::send_alert))
            .route("/api/admin/alerts", get(handlers::list_alerts))
            .route("/api/admin/alerts/{id}", delete(handlers::delete_alert))
            .route("/api/admin/seed-voters", post(handlers::seed_voters))
            .route("/api/admin/clear-voters", delete(handlers::clear_voters))
            .with_state(self.state.clone())
            .layer(axum_middleware::from_fn_with_state(
                UserRole::Admin,
                middleware::require_role,
            ));

        let protected_router = user_router
            .merge(admin_router)
            .layer(axum_middleware::from_fn_with_state(
                jwt_state,
                middleware::require_auth,
            ));

        let api_router = public_router.merge(protected_router);

        // SwaggerUi automatically creates a route for /api/openapi.json
        let router = Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", api_doc))
            .merge(api_router);

        router
            .layer(TraceLayer::new_for_http())
            .layer(self.cors_layer())
    }

    fn cors_layer(&self) -> CorsLayer {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        match &self.config.cors_origins {
            Some(origins) => {
                let origins: Vec<HeaderValue> = origins
                    .iter()
                    .filter_map(|o| match HeaderValue::from_str(o) {
                        Ok(value) => Some(value),
                        Err(_) => {
                            warn!("Ignoring invalid CORS origin '{}'", o);
                            None
                        }
                    })
                    .collect();
                cors.allow_origin(AllowOrigin::list(origins))
            }
            None => cors.allow_origin(Any),
        }
    }

    /// Start the API server
    pub async fn start(self) -> Result<(), anyhow::Error> {
        let router = self.build_router();

        info!("Starting API server on {}", self.config.bind_addr);
        info!(
            "OpenAPI spec: http://{}/api/openapi.json",
            self.config.bind_addr
        );
        info!("Swagger UI: http://{}/swagger-ui", self.config.bind_addr);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        axum::serve(listener, router)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        Ok(())
    }
}
