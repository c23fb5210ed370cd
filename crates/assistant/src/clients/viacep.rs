//! ViaCEP postal directory client.
//!
//! Backs the address autofill endpoints: resolve a CEP to its street
//! and neighbourhood, or list the CEPs matching a street name inside a
//! city.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::config::GeocodeConfig;

#[derive(Debug, Error)]
pub enum ViaCepError {
    #[error("ViaCEP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ViaCEP returned status {0}")]
    Status(u16),
}

/// One address entry from the postal directory.
///
/// The `cep` field comes already masked, e.g. `01310-100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CepAddress {
    pub cep: String,
    #[serde(rename(deserialize = "logradouro"))]
    pub street: String,
    #[serde(rename(deserialize = "bairro"))]
    pub neighborhood: String,
    #[serde(rename(deserialize = "localidade"))]
    pub city: String,
    pub uf: String,
}

/// Client for the ViaCEP web service.
#[derive(Clone)]
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    /// Create a new ViaCEP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &GeocodeConfig, timeout: Duration) -> Result<Self, ViaCepError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: config.viacep_url.clone(),
        })
    }

    /// Look up a CEP. `Ok(None)` when the directory does not know it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service answers
    /// with a non-success status.
    #[instrument(skip(self), fields(cep = %cep))]
    pub async fn lookup(&self, cep: &str) -> Result<Option<CepAddress>, ViaCepError> {
        let url = format!("{}/{}/json/", self.base_url, urlencoding::encode(cep));

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ViaCepError::Status(status.as_u16()));
        }

        let entry: LookupResponse = response.json().await?;
        Ok(entry.into_address())
    }

    /// List the directory entries matching a street name inside a city.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service answers
    /// with a non-success status.
    #[instrument(skip(self), fields(uf = %uf, city = %city, street = %street))]
    pub async fn search(
        &self,
        uf: &str,
        city: &str,
        street: &str,
    ) -> Result<Vec<CepAddress>, ViaCepError> {
        let url = format!(
            "{}/{}/{}/{}/json/",
            self.base_url,
            urlencoding::encode(uf),
            urlencoding::encode(city),
            urlencoding::encode(street)
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ViaCepError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

/// Unknown CEPs come back as `{"erro": true}` with status 200, so every
/// field has to be optional until that flag is checked.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    erro: bool,
    cep: Option<String>,
    #[serde(rename = "logradouro")]
    street: Option<String>,
    #[serde(rename = "bairro")]
    neighborhood: Option<String>,
    #[serde(rename = "localidade")]
    city: Option<String>,
    uf: Option<String>,
}

impl LookupResponse {
    fn into_address(self) -> Option<CepAddress> {
        if self.erro {
            return None;
        }

        Some(CepAddress {
            cep: self.cep?,
            street: self.street.unwrap_or_default(),
            neighborhood: self.neighborhood.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            uf: self.uf.unwrap_or_default(),
        })
    }
}
