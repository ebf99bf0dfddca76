use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, FromRequest, FromRequestParts, Path, Query, Request},
    http::{StatusCode, Uri, request::Parts},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Serialize, de::DeserializeOwned};
use tower_http::normalize_path::NormalizePath;
use tracing::warn;

mod server;

pub use server::{TestServer, serve, spawn};

use crate::{
    api::{DedicatedSubnetApi, PhyBackend, PrivateNetworkApi, ServerApi, ServiceApi},
    domain::{
        AssignNetworkParameter, ConfigureBondingParameter, DedicatedSubnet, DedicatedSubnets,
        EnableServerPortParameter, InterfacePort, ListParams, OsImage, OsInstallParameter,
        PortChannel, PowerControlParameter, PrivateNetwork, PrivateNetworks, RaidStatus,
        RaidStatusParams, Server, ServerPowerStatus, Servers, Service, Services, TrafficGraph,
        TrafficGraphParams, UpdateServerPortParameter, UpdateServiceParameter,
    },
    engine::{EngineError, ErrorKind},
};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn PhyBackend>,
}

#[derive(Debug)]
pub struct ApiError {
    code: &'static str,
    message: String,
    status: StatusCode,
}

impl ApiError {
    fn new(code: &'static str, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new("invalid_request", StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("conflict", StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal", StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<EngineError> for ApiError {
    fn from(value: EngineError) -> Self {
        match value.kind() {
            ErrorKind::NotFound => ApiError::not_found(value.to_string()),
            ErrorKind::Conflict => ApiError::conflict(value.to_string()),
            ErrorKind::InvalidRequest => ApiError::invalid_request(value.to_string()),
            ErrorKind::Internal => ApiError::internal(value.to_string()),
        }
    }
}

/// RFC 7807 body, the error format of the PHY API.
#[derive(Serialize)]
struct ProblemDetails {
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'static str,
    status: u16,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    invalid_parameters: Option<InvalidParameters>,
}

/// Carried by 400 responses only.
#[derive(Serialize)]
struct InvalidParameters {
    non_field_errors: Vec<InvalidParameterDetail>,
}

#[derive(Serialize)]
struct InvalidParameterDetail {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(code = self.code, message = %self.message, "request failed");
        }
        let invalid_parameters = (self.status == StatusCode::BAD_REQUEST).then(|| {
            InvalidParameters {
                non_field_errors: vec![InvalidParameterDetail {
                    code: self.code,
                    message: self.message.clone(),
                }],
            }
        });
        let body = ProblemDetails {
            kind: "about:blank",
            title: self.status.canonical_reason().unwrap_or("Error"),
            status: self.status.as_u16(),
            detail: self.message,
            invalid_parameters,
        };
        (self.status, Json(body)).into_response()
    }
}

pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    axum::Json<T>: FromRequest<S>,
    <axum::Json<T> as FromRequest<S>>::Rejection: std::fmt::Display,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_request(e.to_string()))?;
        Ok(Self(value))
    }
}

pub struct ApiQuery<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_request(e.body_text()))?;
        Ok(Self(value))
    }
}

pub struct ApiPath<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_request(e.body_text()))?;
        Ok(Self(value))
    }
}

pub fn build_router(backend: Arc<dyn PhyBackend>) -> Router {
    let app_state = AppState { backend };

    Router::new()
        .route("/ping", get(ping))
        .route("/services", get(list_services))
        .route("/services/:service_id", get(read_service).patch(update_service))
        .route("/dedicated_subnets", get(list_dedicated_subnets))
        .route("/dedicated_subnets/:dedicated_subnet_id", get(read_dedicated_subnet))
        .route("/private_networks", get(list_private_networks))
        .route("/private_networks/:private_network_id", get(read_private_network))
        .route("/servers", get(list_servers))
        .route("/servers/:server_id", get(read_server))
        .route("/servers/:server_id/os_images", get(list_os_images))
        .route("/servers/:server_id/os_install", post(os_install))
        .route(
            "/servers/:server_id/port_channels/:port_channel_id",
            get(read_port_channel),
        )
        .route(
            "/servers/:server_id/port_channels/:port_channel_id/configure_bonding",
            post(configure_bonding),
        )
        .route(
            "/servers/:server_id/ports/:port_id",
            get(read_port).patch(update_port),
        )
        .route(
            "/servers/:server_id/ports/:port_id/assign_network",
            post(assign_network),
        )
        .route("/servers/:server_id/ports/:port_id/enable", post(enable_port))
        .route(
            "/servers/:server_id/ports/:port_id/traffic_graph",
            get(read_traffic_by_port),
        )
        .route("/servers/:server_id/power_control", post(power_control))
        .route("/servers/:server_id/power_status", get(read_power_status))
        .route("/servers/:server_id/raid_status", get(read_raid_status))
        .fallback(fallback_not_found)
        .layer(Extension(app_state))
}

/// Wraps the router so `/servers/` and `/servers` hit the same route. Must sit
/// outside the router: a layer added with `Router::layer` runs after routing.
pub fn into_app(router: Router) -> NormalizePath<Router> {
    NormalizePath::trim_trailing_slash(router)
}

async fn ping() -> &'static str {
    "pong"
}

async fn fallback_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("no route for {}", uri.path()))
}

async fn list_services(
    Extension(state): Extension<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Services>, ApiError> {
    Ok(Json(state.backend.list_services(params).await?))
}

async fn read_service(
    Extension(state): Extension<AppState>,
    ApiPath(service_id): ApiPath<String>,
) -> Result<Json<Service>, ApiError> {
    Ok(Json(state.backend.read_service(service_id).await?))
}

async fn update_service(
    Extension(state): Extension<AppState>,
    ApiPath(service_id): ApiPath<String>,
    ApiJson(params): ApiJson<UpdateServiceParameter>,
) -> Result<Json<Service>, ApiError> {
    Ok(Json(state.backend.update_service(service_id, params).await?))
}

async fn list_dedicated_subnets(
    Extension(state): Extension<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<DedicatedSubnets>, ApiError> {
    Ok(Json(state.backend.list_dedicated_subnets(params).await?))
}

async fn read_dedicated_subnet(
    Extension(state): Extension<AppState>,
    ApiPath(subnet_id): ApiPath<String>,
) -> Result<Json<DedicatedSubnet>, ApiError> {
    Ok(Json(state.backend.read_dedicated_subnet(subnet_id).await?))
}

async fn list_private_networks(
    Extension(state): Extension<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<PrivateNetworks>, ApiError> {
    Ok(Json(state.backend.list_private_networks(params).await?))
}

async fn read_private_network(
    Extension(state): Extension<AppState>,
    ApiPath(network_id): ApiPath<String>,
) -> Result<Json<PrivateNetwork>, ApiError> {
    Ok(Json(state.backend.read_private_network(network_id).await?))
}

async fn list_servers(
    Extension(state): Extension<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Servers>, ApiError> {
    Ok(Json(state.backend.list_servers(params).await?))
}

async fn read_server(
    Extension(state): Extension<AppState>,
    ApiPath(server_id): ApiPath<String>,
) -> Result<Json<Server>, ApiError> {
    Ok(Json(state.backend.read_server(server_id).await?))
}

async fn list_os_images(
    Extension(state): Extension<AppState>,
    ApiPath(server_id): ApiPath<String>,
) -> Result<Json<Vec<OsImage>>, ApiError> {
    Ok(Json(state.backend.list_os_images(server_id).await?))
}

async fn os_install(
    Extension(state): Extension<AppState>,
    ApiPath(server_id): ApiPath<String>,
    ApiJson(params): ApiJson<OsInstallParameter>,
) -> Result<StatusCode, ApiError> {
    state.backend.os_install(server_id, params).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn read_port_channel(
    Extension(state): Extension<AppState>,
    ApiPath((server_id, port_channel_id)): ApiPath<(String, i64)>,
) -> Result<Json<PortChannel>, ApiError> {
    Ok(Json(
        state
            .backend
            .read_port_channel(server_id, port_channel_id)
            .await?,
    ))
}

async fn configure_bonding(
    Extension(state): Extension<AppState>,
    ApiPath((server_id, port_channel_id)): ApiPath<(String, i64)>,
    ApiJson(params): ApiJson<ConfigureBondingParameter>,
) -> Result<Json<PortChannel>, ApiError> {
    Ok(Json(
        state
            .backend
            .configure_bonding(server_id, port_channel_id, params)
            .await?,
    ))
}

async fn read_port(
    Extension(state): Extension<AppState>,
    ApiPath((server_id, port_id)): ApiPath<(String, i64)>,
) -> Result<Json<InterfacePort>, ApiError> {
    Ok(Json(state.backend.read_port(server_id, port_id).await?))
}

async fn update_port(
    Extension(state): Extension<AppState>,
    ApiPath((server_id, port_id)): ApiPath<(String, i64)>,
    ApiJson(params): ApiJson<UpdateServerPortParameter>,
) -> Result<Json<InterfacePort>, ApiError> {
    Ok(Json(
        state.backend.update_port(server_id, port_id, params).await?,
    ))
}

async fn assign_network(
    Extension(state): Extension<AppState>,
    ApiPath((server_id, port_id)): ApiPath<(String, i64)>,
    ApiJson(params): ApiJson<AssignNetworkParameter>,
) -> Result<Json<InterfacePort>, ApiError> {
    Ok(Json(
        state
            .backend
            .assign_network(server_id, port_id, params)
            .await?,
    ))
}

async fn enable_port(
    Extension(state): Extension<AppState>,
    ApiPath((server_id, port_id)): ApiPath<(String, i64)>,
    ApiJson(params): ApiJson<EnableServerPortParameter>,
) -> Result<Json<InterfacePort>, ApiError> {
    Ok(Json(
        state.backend.enable_port(server_id, port_id, params).await?,
    ))
}

async fn read_traffic_by_port(
    Extension(state): Extension<AppState>,
    ApiPath((server_id, port_id)): ApiPath<(String, i64)>,
    ApiQuery(params): ApiQuery<TrafficGraphParams>,
) -> Result<Json<TrafficGraph>, ApiError> {
    Ok(Json(
        state
            .backend
            .read_traffic_by_port(server_id, port_id, params)
            .await?,
    ))
}

async fn power_control(
    Extension(state): Extension<AppState>,
    ApiPath(server_id): ApiPath<String>,
    ApiJson(params): ApiJson<PowerControlParameter>,
) -> Result<StatusCode, ApiError> {
    state.backend.power_control(server_id, params).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn read_power_status(
    Extension(state): Extension<AppState>,
    ApiPath(server_id): ApiPath<String>,
) -> Result<Json<ServerPowerStatus>, ApiError> {
    Ok(Json(state.backend.read_power_status(server_id).await?))
}

async fn read_raid_status(
    Extension(state): Extension<AppState>,
    ApiPath(server_id): ApiPath<String>,
    ApiQuery(params): ApiQuery<RaidStatusParams>,
) -> Result<Json<RaidStatus>, ApiError> {
    Ok(Json(
        state.backend.read_raid_status(server_id, params).await?,
    ))
}
