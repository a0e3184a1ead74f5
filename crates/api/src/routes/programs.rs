//! Distribution program routes.

use axum::{Router, extract::State, response::Response, routing::get};
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    error::ApiError,
    extractors::{IdPath, Params, Payload, page_request},
    middleware::AuthUser,
    response,
};
use zakat_core::auth::{Action, Resource};
use zakat_core::validation::ProgramInput;
use zakat_db::repositories::ProgramFilter;

/// Creates the program routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/programs", get(list_programs).post(create_program))
        .route(
            "/programs/{id}",
            get(get_program).put(update_program).delete(delete_program),
        )
}

/// Query parameters for listing programs.
#[derive(Debug, Default, Deserialize)]
pub struct ListProgramsQuery {
    /// Search over name and description.
    pub q: Option<String>,
    /// Exact program type.
    pub program_type: Option<String>,
    /// Filter by active flag.
    pub active: Option<bool>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Rows per page.
    pub per_page: Option<u32>,
}

async fn list_programs(
    State(state): State<AppState>,
    auth: AuthUser,
    params: Params<ListProgramsQuery>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Program, Action::Read)?;
    let query = params.into_inner()?;

    let filter = ProgramFilter {
        q: query.q,
        program_type: query.program_type,
        active: query.active,
    };
    let page = state
        .programs()
        .list(&filter, page_request(query.page, query.per_page))
        .await?;
    Ok(response::page("Programs retrieved", page))
}

async fn create_program(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Payload<ProgramInput>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Program, Action::Create)?;
    let draft = payload.into_inner()?.into_draft()?;

    let program = state.programs().create(draft).await?;
    info!(program_id = %program.id, name = %program.name, "Program created");
    Ok(response::created("Program created", program))
}

async fn get_program(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Program, Action::Read)?;
    let program = state.programs().find_by_id(id.into_inner()?).await?;
    Ok(response::ok("Program retrieved", program))
}

async fn update_program(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
    payload: Payload<ProgramInput>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Program, Action::Update)?;
    let id = id.into_inner()?;
    let draft = payload.into_inner()?.into_draft()?;

    let program = state.programs().update(id, draft).await?;
    info!(program_id = %id, active = program.active, "Program updated");
    Ok(response::ok("Program updated", program))
}

async fn delete_program(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Program, Action::Delete)?;
    let id = id.into_inner()?;

    state.programs().delete(id).await?;
    info!(program_id = %id, user_id = %auth.user_id(), "Program deleted");
    Ok(response::deleted("Program deleted"))
}
