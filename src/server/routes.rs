// src/server/routes.rs

//! HTTP handlers. Each one decodes its request, hands it to the
//! [`Orchestrator`] and turns the outcome into a status + JSON body.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::orchestrator::{
    ConnectionRequest, DeployRequest, Orchestrator, OutcomeKind, PackageRequest, PipelineOutcome,
    RunRequest,
};

#[derive(Serialize)]
pub(crate) struct Health {
    status: &'static str,
}

pub(crate) async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub(crate) async fn test_connection(
    State(orchestrator): State<Orchestrator>,
    Json(req): Json<ConnectionRequest>,
) -> Response {
    respond(orchestrator.test_connection(&req).await)
}

pub(crate) async fn deploy(
    State(orchestrator): State<Orchestrator>,
    multipart: Multipart,
) -> Response {
    let req = match read_deploy_form(multipart).await {
        Ok(req) => req,
        Err(e) => {
            warn!(error = %e, "rejecting malformed upload form");
            return respond(PipelineOutcome::invalid(format!("Invalid upload form: {e}")));
        }
    };

    match orchestrator.deploy(&req).await {
        Ok(outcome) => respond(outcome),
        Err(e) => {
            error!(error = %e, "deploy failed internally");
            respond(PipelineOutcome::internal("Error deploying application", e))
        }
    }
}

pub(crate) async fn generate_package(
    State(orchestrator): State<Orchestrator>,
    Json(req): Json<PackageRequest>,
) -> Response {
    respond(orchestrator.generate_package(&req).await)
}

pub(crate) async fn full_run(
    State(orchestrator): State<Orchestrator>,
    Json(req): Json<RunRequest>,
) -> Response {
    respond(orchestrator.full_run(&req).await)
}

pub(crate) async fn debug(
    State(orchestrator): State<Orchestrator>,
    Json(req): Json<PackageRequest>,
) -> Response {
    respond(orchestrator.debug(&req).await)
}

pub fn status_for(kind: OutcomeKind) -> StatusCode {
    match kind {
        OutcomeKind::Success => StatusCode::OK,
        OutcomeKind::Invalid => StatusCode::BAD_REQUEST,
        OutcomeKind::StepFailed | OutcomeKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond(outcome: PipelineOutcome) -> Response {
    (status_for(outcome.kind), Json(outcome)).into_response()
}

/// Multipart fields: `ipAddress`, `sdbPath`, `tizenPath`, `file`.
/// Unknown fields are ignored.
async fn read_deploy_form(mut multipart: Multipart) -> Result<DeployRequest, MultipartError> {
    let mut req = DeployRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "ipAddress" => req.ip_address = Some(field.text().await?),
            "sdbPath" | "bridgeToolPath" => req.sdb_path = Some(field.text().await?),
            "tizenPath" | "sdkToolPath" => req.tizen_path = Some(field.text().await?),
            "file" | "packageFile" => {
                req.file_name = field.file_name().map(str::to_string);
                req.file = Some(field.bytes().await?.to_vec());
            }
            _ => {}
        }
    }

    Ok(req)
}
