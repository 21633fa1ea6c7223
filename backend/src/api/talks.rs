//! # Talk Endpoints
//!
//! CRUD for the talks of one camp, under `/api/camps/{moniker}/talks`.
//!
//! | Method | Path | Success | Failure |
//! |--------|------|---------|---------|
//! | GET | `/` | 200 + talks | 500 |
//! | GET | `/{id}` | 200 + talk | 404, 500 |
//! | POST | `/` | 201 + talk + `Location` | 400, 500 |
//! | PUT | `/{id}` | 200 + talk | 400, 404, 500 |
//! | DELETE | `/{id}` | 200 | 400, 404, 500 |
//!
//! Each handler extracts its inputs and hands an operation body to
//! [`boundary`], which owns the status-code policy. The bodies call the
//! repository strictly in sequence; nothing is kept between requests.

use std::sync::Arc;

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{info, warn};

use super::error::{boundary, EndpointError, TalkOperation};
use super::links::LinkBuilder;
use super::routes::GET_TALK_ROUTE;
use crate::db::{ChangeSet, DatabaseError, Talk};
use crate::mapper;
use crate::models::TalkModel;
use crate::AppState;

/// List every talk of a camp, speakers expanded.
///
/// ## Endpoint
///
/// `GET /api/camps/{moniker}/talks`
///
/// An unknown moniker yields an empty array.
pub async fn list_talks(
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> HttpResponse {
    let moniker = path.into_inner();
    boundary(TalkOperation::List, list(&state, &moniker)).await
}

async fn list(state: &AppState, moniker: &str) -> Result<HttpResponse, EndpointError> {
    info!("List talks for camp: {}", moniker);

    let talks = state.repository.get_talks_by_moniker(moniker, true).await?;
    let body: Vec<TalkModel> = talks.iter().map(TalkModel::from).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// Get one talk of a camp.
///
/// ## Endpoint
///
/// `GET /api/camps/{moniker}/talks/{id}`
///
/// ## Example
///
/// ```bash
/// curl http://127.0.0.1:8080/api/camps/ATL2018/talks/1
/// ```
pub async fn get_talk(
    state: web::Data<Arc<AppState>>,
    path: web::Path<(String, i32)>,
) -> HttpResponse {
    let (moniker, talk_id) = path.into_inner();
    boundary(TalkOperation::Get, get(&state, &moniker, talk_id)).await
}

async fn get(state: &AppState, moniker: &str, talk_id: i32) -> Result<HttpResponse, EndpointError> {
    info!("Get talk {} for camp: {}", talk_id, moniker);

    let talk = state
        .repository
        .get_talk_by_moniker(moniker, talk_id, true)
        .await?
        .ok_or_else(|| EndpointError::not_found("Talk does not exist."))?;

    Ok(HttpResponse::Ok().json(TalkModel::from(&talk)))
}

/// Create a talk in a camp.
///
/// ## Endpoint
///
/// `POST /api/camps/{moniker}/talks`
///
/// ## Example
///
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/camps/ATL2018/talks \
///   -H "Content-Type: application/json" \
///   -d '{
///     "title": "Async Rust in Practice",
///     "abstract": "Futures, executors and the things in between.",
///     "level": 300,
///     "speaker": { "speakerId": 1 }
///   }'
/// ```
///
/// Responds `201 Created` with `Location: /api/camps/ATL2018/talks/{id}`.
pub async fn create_talk(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    body: web::Json<TalkModel>,
) -> HttpResponse {
    let moniker = path.into_inner();
    let model = body.into_inner();
    boundary(TalkOperation::Create, create(&req, &state, moniker, model)).await
}

async fn create(
    links: &impl LinkBuilder,
    state: &AppState,
    moniker: String,
    model: TalkModel,
) -> Result<HttpResponse, EndpointError> {
    info!("Create talk for camp: {}", moniker);

    let camp = state
        .repository
        .get_camp(&moniker)
        .await?
        .ok_or_else(|| EndpointError::bad_request(format!("{} does not exist!", moniker)))?;

    let mut talk = Talk::try_from(&model)?;
    talk.camp = Some(camp);

    let speaker_ref = model
        .speaker
        .as_ref()
        .ok_or_else(|| EndpointError::bad_request("Speaker ID is required!"))?;
    let speaker = state
        .repository
        .get_speaker(speaker_ref.speaker_id)
        .await?
        .ok_or_else(|| EndpointError::bad_request("Speaker could not be found"))?;
    talk.speaker = Some(speaker);

    let mut changes = ChangeSet::new();
    changes.add(talk);

    if !state.repository.save_changes(&mut changes).await? {
        return Err(EndpointError::bad_request("Failed to save new Talk"));
    }

    let created = changes.into_added().pop().ok_or_else(|| {
        DatabaseError::InvalidChange("committed talk missing from change set".to_string())
    })?;

    let location = links.path_for(
        GET_TALK_ROUTE,
        &[moniker.clone(), created.talk_id.to_string()],
    )?;
    info!("Created talk {} for camp: {}", created.talk_id, moniker);

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(TalkModel::from(&created)))
}

/// Update some fields of a talk, optionally moving it to another speaker.
///
/// ## Endpoint
///
/// `PUT /api/camps/{moniker}/talks/{id}`
///
/// Only fields present in the body change. A `speaker.speakerId` that
/// does not resolve is ignored and the current speaker is kept.
pub async fn update_talk(
    state: web::Data<Arc<AppState>>,
    path: web::Path<(String, i32)>,
    body: web::Json<TalkModel>,
) -> HttpResponse {
    let (moniker, talk_id) = path.into_inner();
    let model = body.into_inner();
    boundary(TalkOperation::Update, update(&state, &moniker, talk_id, model)).await
}

async fn update(
    state: &AppState,
    moniker: &str,
    talk_id: i32,
    model: TalkModel,
) -> Result<HttpResponse, EndpointError> {
    info!("Update talk {} for camp: {}", talk_id, moniker);

    let mut talk = state
        .repository
        .get_talk_by_moniker(moniker, talk_id, true)
        .await?
        .ok_or_else(|| EndpointError::not_found("We could not find the Talk"))?;

    mapper::merge_into(&model, &mut talk);

    if let Some(speaker_ref) = &model.speaker {
        match state.repository.get_speaker(speaker_ref.speaker_id).await? {
            Some(speaker) => talk.speaker = Some(speaker),
            None => warn!(
                "Speaker {} not found, talk {} keeps its speaker",
                speaker_ref.speaker_id, talk_id
            ),
        }
    }

    let mut changes = ChangeSet::new();
    changes.update(talk.clone());

    if state.repository.save_changes(&mut changes).await? {
        Ok(HttpResponse::Ok().json(TalkModel::from(&talk)))
    } else {
        Err(EndpointError::bad_request("Failed to update database."))
    }
}

/// Delete a talk.
///
/// ## Endpoint
///
/// `DELETE /api/camps/{moniker}/talks/{id}`
pub async fn delete_talk(
    state: web::Data<Arc<AppState>>,
    path: web::Path<(String, i32)>,
) -> HttpResponse {
    let (moniker, talk_id) = path.into_inner();
    boundary(TalkOperation::Delete, delete(&state, &moniker, talk_id)).await
}

async fn delete(state: &AppState, moniker: &str, talk_id: i32) -> Result<HttpResponse, EndpointError> {
    info!("Delete talk {} for camp: {}", talk_id, moniker);

    let talk = state
        .repository
        .get_talk_by_moniker(moniker, talk_id, false)
        .await?
        .ok_or_else(|| EndpointError::not_found("Failed to find the talk to delete."))?;

    let mut changes = ChangeSet::new();
    changes.delete(talk);

    if state.repository.save_changes(&mut changes).await? {
        Ok(HttpResponse::Ok().finish())
    } else {
        Err(EndpointError::bad_request("Failed to delete talk"))
    }
}
