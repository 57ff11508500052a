use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use crate::{
    config::Config,
    handlers, middleware,
    services::{
        AuthService, EmployeeRepository, EmployeeService, ExportService, ImageStore,
        SqliteStore, TokenIssuer, UserRepository, IMAGE_URL_PREFIX,
    },
};

// Application state shared between handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub employees: EmployeeService,
    pub exports: ExportService,
    pub images: ImageStore,
}

impl AppState {
    pub fn new(config: &Config, store: SqliteStore) -> Self {
        let store = Arc::new(store);
        let users: Arc<dyn UserRepository> = store.clone();
        let records: Arc<dyn EmployeeRepository> = store;

        let images = ImageStore::new(&config.upload.image_dir, config.upload.max_image_size);
        let tokens = Arc::new(TokenIssuer::new(&config.auth));

        Self {
            auth: AuthService::new(users, tokens, config.auth.bcrypt_cost),
            employees: EmployeeService::new(records.clone(), images.clone()),
            exports: ExportService::new(records),
            images,
        }
    }
}

pub fn router(state: AppState, config: &Config) -> Router {
    let employee_routes = Router::new()
        .route(
            "/",
            get(handlers::list_employees).post(handlers::add_employee),
        )
        .route("/search", get(handlers::search_employees))
        .route("/export", get(handlers::export_employees))
        .route(
            "/:id",
            get(handlers::get_employee)
                .put(handlers::update_employee)
                .delete(handlers::delete_employee),
        )
        .route("/:id/upload-image", post(handlers::upload_image))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_auth));

    let auth_routes = Router::new()
        .route("/register", post(handlers::handle_register))
        .route("/login", post(handlers::handle_login));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/auth", auth_routes)
        .nest("/api/employees", employee_routes)
        .nest_service(IMAGE_URL_PREFIX, ServeDir::new(state.images.dir()))
        // Upload limits from config
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.upload.max_request_size))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}
