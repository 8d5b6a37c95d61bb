//! Villa services - Gestione delle ville

use crate::core::{APIResponse, AppError, AppState};
use crate::dtos::{CreateVillaDTO, UpdateVillaDTO, VillaDTO};
use crate::entities::Villa;
use crate::patch::{Patch, PatchOperation};
use crate::repositories::{Filter, Repository, VillaRepository};
use axum::{
    extract::{
        Json, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{Span, debug, info, instrument, warn};
use validator::Validate;

/// Rejects a name already used by another villa, ignoring case
///
/// # Arguments
/// * `nombre` - Candidate name
/// * `own_id` - Villa being rewritten, excluded from the check
async fn ensure_name_available(
    villas: &VillaRepository,
    nombre: &str,
    own_id: Option<i64>,
) -> Result<(), AppError> {
    let clash = villas
        .get_detached(Some(Filter::new(|v: &Villa| {
            Some(v.id) != own_id && v.has_name(nombre)
        })))
        .await?;
    if clash.is_some() {
        warn!(nombre, "Villa name already in use");
        return Err(AppError::duplicate_key(
            "ExistingName",
            "A villa with that name already exists",
        ));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_villas(
    State(state): State<Arc<AppState>>,
) -> Result<APIResponse<Vec<VillaDTO>>, AppError> {
    debug!("Listing villas");
    let villas = state.villas().list(None).await?;
    info!("Found {} villas", villas.len());

    Ok(APIResponse::ok(
        villas.into_iter().map(VillaDTO::from).collect(),
    ))
}

#[instrument(skip(state, path), fields(villa_id = tracing::field::Empty))]
pub async fn get_villa(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<APIResponse<VillaDTO>, AppError> {
    let Path(id) = path?;
    Span::current().record("villa_id", id);
    if id == 0 {
        warn!("Rejected villa lookup with sentinel id");
        return Err(AppError::bad_request("Villa id must not be 0"));
    }

    let villa = state
        .villas()
        .get_detached(Some(Filter::key(id)))
        .await?
        .ok_or_else(|| AppError::not_found("Villa not found"))?;

    Ok(APIResponse::ok(VillaDTO::from(villa)))
}

#[instrument(skip(state, body))]
pub async fn create_villa(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateVillaDTO>, JsonRejection>,
) -> Result<Response, AppError> {
    // 1. Validare il body (formato JSON e vincoli dei campi)
    // 2. Rifiutare nomi già esistenti (confronto case-insensitive)
    // 3. Mappare il DTO in entità con timestamp correnti e inserirla
    // 4. Ritornare 201 con Location verso GET /api/villa/{id}
    let Json(dto) = body?;
    dto.validate()?;

    let mut villas = state.villas();
    ensure_name_available(&villas, &dto.nombre, None).await?;

    let mut villa = dto.into_entity(Utc::now());
    villas.create(&mut villa).await?;
    info!(villa_id = villa.id, "Villa created");

    let location = format!("/api/villa/{}", villa.id);
    Ok((
        [(header::LOCATION, location)],
        APIResponse::created(villa),
    )
        .into_response())
}

#[instrument(skip(state, path, body), fields(villa_id = tracing::field::Empty))]
pub async fn update_villa(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateVillaDTO>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    Span::current().record("villa_id", id);
    let Json(dto) = body?;
    if dto.id != id {
        warn!(body_id = dto.id, "Villa id in body does not match path");
        return Err(AppError::bad_request("Villa id in body does not match path"));
    }
    dto.validate()?;

    let mut villas = state.villas();
    ensure_name_available(&villas, &dto.nombre, Some(id)).await?;

    villas.update(dto.into_entity(Utc::now())).await?;
    info!("Villa replaced");

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, path, body), fields(villa_id = tracing::field::Empty))]
pub async fn patch_villa(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<Vec<PatchOperation>>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    // 1. Rifiutare id sentinella e documenti di patch non leggibili
    // 2. Caricare la villa come copia detached (mai riscritta implicitamente)
    // 3. Applicare le operazioni allo snapshot DTO, validarlo e ricontrollare il nome
    // 4. Rimappare il DTO in entità e salvarla con timestamp aggiornato
    let Path(id) = path?;
    Span::current().record("villa_id", id);
    if id == 0 {
        return Err(AppError::bad_request("Villa id must not be 0"));
    }
    let Json(operations) = body?;

    let mut villas = state.villas();
    let villa = villas
        .get_detached(Some(Filter::key(id)))
        .await?
        .ok_or_else(|| {
            warn!("Patch target does not exist");
            AppError::bad_request("Villa not found")
        })?;

    let dto = Patch::load(UpdateVillaDTO::from(villa))
        .apply(&operations)?
        .validate()?
        .into_inner();
    if dto.id != id {
        return Err(AppError::bad_request(
            "MalformedPatch: the villa id cannot be changed",
        ));
    }
    ensure_name_available(&villas, &dto.nombre, Some(id)).await?;

    villas.update(dto.into_entity(Utc::now())).await?;
    info!("Applied {} patch operations", operations.len());

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, path), fields(villa_id = tracing::field::Empty))]
pub async fn delete_villa(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<APIResponse<()>, AppError> {
    let Path(id) = path?;
    Span::current().record("villa_id", id);
    if id == 0 {
        return Err(AppError::bad_request("Villa id must not be 0"));
    }

    let mut villas = state.villas();
    let villa = villas
        .get_tracked(Some(Filter::key(id)))
        .await?
        .ok_or_else(|| AppError::not_found("Villa not found"))?;

    villas.remove(&villa.get()).await?;
    info!("Villa deleted");

    Ok(APIResponse::ok(()))
}
