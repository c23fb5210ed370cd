//! Address directory handlers backing the admin form autofill.
//!
//! Thin wrappers over ViaCEP: one lookup by CEP, one street search inside
//! a city. The admin panel fills its street, neighborhood and city fields
//! from the answers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use forneria_core::{Cep, masks};
use serde::Deserialize;
use tracing::instrument;

use crate::clients::CepAddress;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Shortest street fragment worth sending to the directory.
const MIN_STREET_CHARS: usize = 3;

/// Look an address up by CEP.
///
/// GET /api/address/cep/{cep}
///
/// # Errors
///
/// Returns `400` for a malformed CEP and `404` when the directory does
/// not know it.
#[instrument(skip(state))]
pub async fn by_cep(
    State(state): State<AppState>,
    Path(cep): Path<String>,
) -> Result<Json<CepAddress>> {
    let cep = Cep::parse(&cep).map_err(|err| AppError::BadRequest(err.to_string()))?;

    let Some(mut entry) = state.viacep().lookup(cep.as_digits()).await? else {
        return Err(AppError::NotFound(format!("CEP {cep}")));
    };

    entry.cep = masks::cep(&entry.cep);
    Ok(Json(entry))
}

/// Street search parameters.
#[derive(Debug, Deserialize)]
pub struct StreetSearchQuery {
    pub uf: String,
    pub city: String,
    pub street: String,
}

/// Search the directory for a street inside a city.
///
/// GET /api/address/search?uf=SP&city=Sao+Paulo&street=Paulista
///
/// # Errors
///
/// Returns `400` when the street fragment is shorter than three
/// characters.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<StreetSearchQuery>,
) -> Result<Json<Vec<CepAddress>>> {
    if query.street.chars().count() < MIN_STREET_CHARS {
        return Err(AppError::BadRequest(
            "street needs at least 3 characters".to_owned(),
        ));
    }

    let mut entries = state
        .viacep()
        .search(&query.uf, &query.city, &query.street)
        .await?;

    for entry in &mut entries {
        entry.cep = masks::cep(&entry.cep);
    }

    Ok(Json(entries))
}
