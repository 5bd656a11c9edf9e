//! # Rooms API
//!
//! The physical room registry. Offline approvals validate their assigned
//! room against this registry.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use tutorhub_core::Room;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Request to register a room.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRoomRequest {
    pub room_id: String,
    pub capacity: u32,
}

impl Validate for RegisterRoomRequest {
    fn validate(&self) -> Result<(), String> {
        if self.room_id.trim().is_empty() {
            return Err("room_id must not be empty".to_string());
        }
        if self.capacity == 0 {
            return Err("capacity must be positive".to_string());
        }
        Ok(())
    }
}

/// Request to change a room's capacity.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoomRequest {
    pub capacity: u32,
}

impl Validate for UpdateRoomRequest {
    fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be positive".to_string());
        }
        Ok(())
    }
}

/// Build the rooms router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/rooms", get(list_rooms).post(register_room))
        .route("/v1/rooms/:id", put(update_room))
}

/// GET /v1/rooms — All registered rooms.
#[utoipa::path(
    get,
    path = "/v1/rooms",
    responses(
        (status = 200, description = "Rooms ordered by id", body = Vec<Room>),
    ),
    tag = "rooms"
)]
pub(crate) async fn list_rooms(State(state): State<AppState>) -> Json<Vec<Room>> {
    Json(state.stores.rooms.list())
}

/// POST /v1/rooms — Register a room. Room ids are unique.
#[utoipa::path(
    post,
    path = "/v1/rooms",
    request_body = RegisterRoomRequest,
    responses(
        (status = 201, description = "Room registered", body = Room),
        (status = 409, description = "Room id already registered", body = crate::error::ErrorBody),
        (status = 422, description = "Empty id or zero capacity", body = crate::error::ErrorBody),
    ),
    tag = "rooms"
)]
pub(crate) async fn register_room(
    State(state): State<AppState>,
    body: Result<Json<RegisterRoomRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    let req = extract_validated_json(body)?;
    let room = Room {
        room_id: req.room_id,
        capacity: req.capacity,
    };
    let inserted = state
        .stores
        .rooms
        .update(|m| {
            if m.contains_key(&room.room_id) {
                false
            } else {
                m.insert(room.room_id.clone(), room.clone());
                true
            }
        })
        .map_err(|err| AppError::Internal(err.to_string()))?;
    if !inserted {
        return Err(AppError::State(format!(
            "room '{}' is already registered",
            room.room_id
        )));
    }
    Ok((StatusCode::CREATED, Json(room)))
}

/// PUT /v1/rooms/:id — Change a room's capacity.
#[utoipa::path(
    put,
    path = "/v1/rooms/{id}",
    params(("id" = String, Path, description = "Room id")),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Room updated", body = Room),
        (status = 404, description = "Unknown room", body = crate::error::ErrorBody),
        (status = 422, description = "Zero capacity", body = crate::error::ErrorBody),
    ),
    tag = "rooms"
)]
pub(crate) async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateRoomRequest>, JsonRejection>,
) -> Result<Json<Room>, AppError> {
    let req = extract_validated_json(body)?;
    let updated = state
        .stores
        .rooms
        .update(|m| {
            m.get_mut(&id).map(|room| {
                room.capacity = req.capacity;
                room.clone()
            })
        })
        .map_err(|err| AppError::Internal(err.to_string()))?;
    updated
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("room '{id}' not found")))
}
