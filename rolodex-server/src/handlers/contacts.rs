use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;

use rolodex_core::pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use rolodex_model::{Contact, NewContact, Page};

use crate::infra::{app_state::AppState, errors::AppResult};

/// Query string for `GET /contacts`. Signed so negative values reach the
/// service and come back as a 400 with a useful message.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

pub async fn list_contacts_handler(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Page<Contact>>> {
    let page = state
        .contacts()
        .list_contacts(params.page, params.size)
        .await?;
    Ok(Json(page))
}

pub async fn get_contact_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Contact>> {
    let contact = state.contacts().get_contact(&id).await?;
    Ok(Json(contact))
}

pub async fn create_contact_handler(
    State(state): State<AppState>,
    Json(draft): Json<NewContact>,
) -> AppResult<impl IntoResponse> {
    let contact = state.contacts().create_contact(draft).await?;
    let location = format!("/contacts/{}", contact.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(contact),
    ))
}

pub async fn delete_contact_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<&'static str> {
    state.contacts().delete_contact(&id).await?;
    Ok("Deleted contact")
}
