/*!
pengviz REST API Server

Hosting layer over the dashboard core: serves the current view outputs and
applies parameter updates over HTTP.

## Usage

```bash
pengviz-rest --host 127.0.0.1 --port 3000 --data penguins.csv
```

## Endpoints

- `GET  /api/v1/views` - All derived view outputs
- `GET  /api/v1/params` - Current parameter state
- `POST /api/v1/params` - Partial parameter update, returns refreshed views
- `GET  /api/v1/schema` - Declared parameter definitions
- `GET  /api/v1/health` - Health check
- `GET  /api/v1/version` - Version information
*/

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pengviz::dataset::{load_csv, sample_dataset, Island, Sex, Species};
use pengviz::params::ParamDef;
use pengviz::{
    CategoryField, Dashboard, NumericField, Outputs, ParamSchema, Parameters, PengvizError,
    PlotType, VERSION,
};

/// CLI arguments for the REST API server
#[derive(Parser)]
#[command(name = "pengviz-rest")]
#[command(about = "pengviz REST API Server")]
#[command(version = VERSION)]
struct Cli {
    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind to
    #[arg(long, default_value = "3334")]
    port: u16,

    /// CORS allowed origins (comma-separated)
    #[arg(long, default_value = "*")]
    cors_origin: String,

    /// CSV dataset path (built-in sample data when omitted)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Parameter surface: full or mass-only
    #[arg(long, default_value = "full")]
    variant: String,
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    /// The dashboard behind a mutex: updates are serialized, so each cycle
    /// runs to completion before the next parameter write is applied.
    dashboard: Arc<Mutex<Dashboard>>,
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Partial parameter update: absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
struct ParamsPatch {
    plot_type: Option<PlotType>,
    x_field: Option<NumericField>,
    y_field: Option<NumericField>,
    hue_field: Option<CategoryField>,
    bin_count: Option<u32>,
    filter_enabled: Option<bool>,
    mass_range: Option<(f64, f64)>,
    bill_depth_range: Option<(f64, f64)>,
    bill_length_range: Option<(f64, f64)>,
    sex_set: Option<BTreeSet<Sex>>,
    species_set: Option<BTreeSet<Species>>,
    island_set: Option<BTreeSet<Island>>,
    show_table: Option<bool>,
}

impl ParamsPatch {
    fn apply(self, params: &mut Parameters) {
        if let Some(v) = self.plot_type {
            params.plot_type = v;
        }
        if let Some(v) = self.x_field {
            params.x_field = v;
        }
        if let Some(v) = self.y_field {
            params.y_field = v;
        }
        if let Some(v) = self.hue_field {
            params.hue_field = v;
        }
        if let Some(v) = self.bin_count {
            params.bin_count = v;
        }
        if let Some(v) = self.filter_enabled {
            params.filter_enabled = v;
        }
        if let Some(v) = self.mass_range {
            params.mass_range = v;
        }
        if let Some(v) = self.bill_depth_range {
            params.bill_depth_range = Some(v);
        }
        if let Some(v) = self.bill_length_range {
            params.bill_length_range = Some(v);
        }
        if let Some(v) = self.sex_set {
            params.sex_set = v;
        }
        if let Some(v) = self.species_set {
            params.species_set = v;
        }
        if let Some(v) = self.island_set {
            params.island_set = v;
        }
        if let Some(v) = self.show_table {
            params.show_table = v;
        }
    }
}

/// Successful API response
#[derive(Debug, Serialize)]
struct ApiSuccess<T> {
    status: String,
    data: T,
}

impl<T> ApiSuccess<T> {
    fn new(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data,
        }
    }
}

/// Error API response
#[derive(Debug, Serialize)]
struct ApiError {
    status: String,
    error: ErrorDetails,
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
    message: String,
    #[serde(rename = "type")]
    error_type: String,
}

/// Views response: refreshed outputs plus the row count after filtering.
#[derive(Debug, Serialize)]
struct ViewsResult {
    outputs: Outputs,
    filtered_rows: usize,
}

/// Schema response
#[derive(Debug, Serialize)]
struct SchemaResult {
    params: Vec<ParamDef>,
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Version response
#[derive(Debug, Serialize)]
struct VersionResponse {
    version: String,
    dataset_rows: usize,
}

// ============================================================================
// Error Handling
// ============================================================================

/// Custom error type for API responses
struct ApiErrorResponse {
    status: StatusCode,
    error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let json = Json(self.error);
        (self.status, json).into_response()
    }
}

impl From<PengvizError> for ApiErrorResponse {
    fn from(err: PengvizError) -> Self {
        let (status, error_type) = match &err {
            PengvizError::ParamError(_) => (StatusCode::BAD_REQUEST, "ParamError"),
            PengvizError::DatasetError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DatasetError"),
            PengvizError::ViewError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ViewError"),
            PengvizError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
        };

        ApiErrorResponse {
            status,
            error: ApiError {
                status: "error".to_string(),
                error: ErrorDetails {
                    message: err.to_string(),
                    error_type: error_type.to_string(),
                },
            },
        }
    }
}

// ============================================================================
// Handler Functions
// ============================================================================

fn lock_dashboard(state: &AppState) -> Result<std::sync::MutexGuard<'_, Dashboard>, ApiErrorResponse> {
    state.dashboard.lock().map_err(|e| {
        ApiErrorResponse::from(PengvizError::InternalError(format!(
            "Failed to lock dashboard: {}",
            e
        )))
    })
}

/// GET /api/v1/views - All derived view outputs
async fn views_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiSuccess<ViewsResult>>, ApiErrorResponse> {
    let dash = lock_dashboard(&state)?;
    Ok(Json(ApiSuccess::new(ViewsResult {
        outputs: dash.outputs().clone(),
        filtered_rows: dash.filtered().len(),
    })))
}

/// GET /api/v1/params - Current parameter state
async fn get_params_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiSuccess<Parameters>>, ApiErrorResponse> {
    let dash = lock_dashboard(&state)?;
    Ok(Json(ApiSuccess::new(dash.params().clone())))
}

/// POST /api/v1/params - Partial parameter update
async fn post_params_handler(
    State(state): State<AppState>,
    Json(patch): Json<ParamsPatch>,
) -> Result<Json<ApiSuccess<ViewsResult>>, ApiErrorResponse> {
    let mut dash = lock_dashboard(&state)?;
    let mut next = dash.params().clone();
    patch.apply(&mut next);

    let plan = dash.update(next)?;
    info!(
        recomputed_views = plan.views.len(),
        filter = plan.recompute_filter,
        "applied parameter update"
    );

    Ok(Json(ApiSuccess::new(ViewsResult {
        outputs: dash.outputs().clone(),
        filtered_rows: dash.filtered().len(),
    })))
}

/// GET /api/v1/schema - Declared parameter definitions
async fn schema_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiSuccess<SchemaResult>>, ApiErrorResponse> {
    let dash = lock_dashboard(&state)?;
    Ok(Json(ApiSuccess::new(SchemaResult {
        params: dash.schema().defs(),
    })))
}

/// GET /api/v1/health - Health check
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
    })
}

/// GET /api/v1/version - Version information
async fn version_handler(State(state): State<AppState>) -> Json<VersionResponse> {
    let rows = state
        .dashboard
        .lock()
        .map(|d| d.dataset().len())
        .unwrap_or(0);
    Json(VersionResponse {
        version: VERSION.to_string(),
        dataset_rows: rows,
    })
}

/// Root handler
async fn root_handler() -> &'static str {
    "pengviz REST API Server - See /api/v1/health for status"
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pengviz_rest=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    let schema = match cli.variant.as_str() {
        "full" => ParamSchema::with_bill_filters(),
        "mass-only" => ParamSchema::mass_only(),
        other => anyhow::bail!("Unknown variant: '{}' (full, mass-only)", other),
    };

    let dataset = match &cli.data {
        Some(path) => {
            info!("Loading dataset from {}", path.display());
            load_csv(path)?
        }
        None => {
            info!("No dataset given, using built-in sample data");
            sample_dataset()
        }
    };
    info!("Dataset loaded: {} records", dataset.len());

    let dashboard = Dashboard::new(dataset, schema)?;
    let state = AppState {
        dashboard: Arc::new(Mutex::new(dashboard)),
    };

    // Configure CORS
    let cors = if cli.cors_origin == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(vec![header::CONTENT_TYPE])
    } else {
        let origins: Vec<_> = cli
            .cors_origin
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(vec![header::CONTENT_TYPE])
    };

    // Build router
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/api/v1/views", get(views_handler))
        .route("/api/v1/params", get(get_params_handler).post(post_params_handler))
        .route("/api/v1/schema", get(schema_handler))
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/version", get(version_handler))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state);

    // Parse bind address
    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid host or port: {}", e))?;

    info!("Starting pengviz REST API server on {}", addr);
    info!("API documentation:");
    info!("  GET  /api/v1/views   - Derived view outputs");
    info!("  GET  /api/v1/params  - Current parameters");
    info!("  POST /api/v1/params  - Apply parameter update");
    info!("  GET  /api/v1/schema  - Parameter definitions");
    info!("  GET  /api/v1/health  - Health check");
    info!("  GET  /api/v1/version - Version info");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
