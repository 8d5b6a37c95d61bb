//! NumeroVilla services - Gestione dei numeri di villa

use crate::core::{APIResponse, AppError, AppState};
use crate::dtos::{CreateNumeroVillaDTO, NumeroVillaDTO, UpdateNumeroVillaDTO};
use crate::repositories::{Filter, Repository};
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

/// Checks that the villa a room number points at exists
async fn ensure_villa_exists(state: &AppState, villa_id: i64) -> Result<(), AppError> {
    let villa = state.villas().get_detached(Some(Filter::key(villa_id))).await?;
    if villa.is_none() {
        warn!(villa_id, "Referenced villa does not exist");
        return Err(AppError::foreign_key("The villa id does not exist"));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_numero_villas(
    State(state): State<Arc<AppState>>,
) -> Result<APIResponse<Vec<NumeroVillaDTO>>, AppError> {
    debug!("Listing villa numbers");
    let numeros = state.numero_villas().list(None).await?;
    info!("Found {} villa numbers", numeros.len());

    Ok(APIResponse::ok(
        numeros.into_iter().map(NumeroVillaDTO::from).collect(),
    ))
}

#[instrument(skip(state, path), fields(villa_no = tracing::field::Empty))]
pub async fn get_numero_villa(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<APIResponse<NumeroVillaDTO>, AppError> {
    let Path(id) = path?;
    Span::current().record("villa_no", id);
    if id == 0 {
        warn!("Rejected villa number lookup with sentinel id");
        return Err(AppError::bad_request("Villa number must not be 0"));
    }

    let numero = state
        .numero_villas()
        .get_detached(Some(Filter::key(id)))
        .await?
        .ok_or_else(|| AppError::not_found("Villa number not found"))?;

    Ok(APIResponse::ok(NumeroVillaDTO::from(numero)))
}

#[instrument(skip(state, body))]
pub async fn create_numero_villa(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateNumeroVillaDTO>, JsonRejection>,
) -> Result<Response, AppError> {
    // 1. Validare il body
    // 2. Rifiutare un numero di villa già esistente
    // 3. Verificare che la villa referenziata esista
    // 4. Inserire e ritornare 201 con Location
    let Json(dto) = body?;
    dto.validate()?;

    let mut numeros = state.numero_villas();
    if numeros
        .get_detached(Some(Filter::key(dto.villa_no)))
        .await?
        .is_some()
    {
        warn!(villa_no = dto.villa_no, "Villa number already in use");
        return Err(AppError::duplicate_key(
            "ExistingVillaNumber",
            "A record with that villa number already exists",
        ));
    }
    ensure_villa_exists(&state, dto.villa_id).await?;

    let mut numero = dto.into_entity(Utc::now());
    numeros.create(&mut numero).await?;
    info!(villa_no = numero.villa_no, "Villa number created");

    let location = format!("/api/numero-villa/{}", numero.villa_no);
    Ok((
        [(header::LOCATION, location)],
        APIResponse::created(numero),
    )
        .into_response())
}

#[instrument(skip(state, path, body), fields(villa_no = tracing::field::Empty))]
pub async fn update_numero_villa(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateNumeroVillaDTO>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    Span::current().record("villa_no", id);
    let Json(dto) = body?;
    if dto.villa_no != id {
        warn!(body_villa_no = dto.villa_no, "Villa number in body does not match path");
        return Err(AppError::bad_request(
            "Villa number in body does not match path",
        ));
    }
    dto.validate()?;
    // the repository does not re-check the reference
    ensure_villa_exists(&state, dto.villa_id).await?;

    state
        .numero_villas()
        .update(dto.into_entity(Utc::now()))
        .await?;
    info!("Villa number replaced");

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, path), fields(villa_no = tracing::field::Empty))]
pub async fn delete_numero_villa(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<APIResponse<()>, AppError> {
    let Path(id) = path?;
    Span::current().record("villa_no", id);
    if id == 0 {
        return Err(AppError::bad_request("Villa number must not be 0"));
    }

    let mut numeros = state.numero_villas();
    let numero = numeros
        .get_tracked(Some(Filter::key(id)))
        .await?
        .ok_or_else(|| AppError::not_found("Villa number not found"))?;

    numeros.remove(&numero.get()).await?;
    info!("Villa number deleted");

    Ok(APIResponse::ok(()))
}
