//! Blocking HTTP client for the mapping backend.
//!
//! Endpoints:
//!
//! | Method | Path | Body |
//! |---|---|---|
//! | GET | `/pipedrive-fields?company={scope}` | returns `FieldCatalog` |
//! | GET | `/{scope}/field-mappings` | returns `[MappingRow]` |
//! | POST | `/{scope}/field-mappings` | `[MappingRow]`, full replacement |
//! | POST | `/api/sync_settings` | `SyncSettings` |
//!
//! Every method performs exactly one request.

use reqwest::Url;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use fieldmap_editor::{ApiError, MappingApi};
use fieldmap_model::{FieldCatalog, MappingRow, SyncSettings};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result, api_error};

/// User agent string for backend requests.
const USER_AGENT_VALUE: &str = concat!("fieldmap/", env!("CARGO_PKG_VERSION"));

/// Client for the field catalog and mapping endpoints.
#[derive(Debug, Clone)]
pub struct MappingClient {
    client: Client,
    base_url: Url,
}

impl MappingClient {
    /// Creates a client for the backend described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the field catalog for `scope`.
    pub fn fields_url(&self, scope: &str) -> Url {
        let mut url = self.endpoint(&["pipedrive-fields"]);
        url.query_pairs_mut().append_pair("company", scope);
        url
    }

    /// URL of the persisted mapping set for `scope`.
    pub fn mappings_url(&self, scope: &str) -> Url {
        self.endpoint(&[scope, "field-mappings"])
    }

    /// URL of the sync settings endpoint.
    pub fn settings_url(&self) -> Url {
        self.endpoint(&["api", "sync_settings"])
    }

    /// Stores the sync settings.
    pub fn save_sync_settings(&self, settings: &SyncSettings) -> std::result::Result<(), ApiError> {
        let url = self.settings_url();
        debug!("Posting sync settings to {}", url);
        let response = self
            .client
            .post(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .json(settings)
            .send()
            .map_err(|e| api_error(&e))?;
        let outcome: SaveOutcome = decode_json(check_status(response)?)?;
        if outcome.success {
            return Ok(());
        }
        Err(ApiError::Rejected(
            outcome
                .error
                .unwrap_or_else(|| "no reason given".to_string()),
        ))
    }

    /// Base URL with `segments` appended as percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot-be-a-base URLs are rejected in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> std::result::Result<T, ApiError> {
        debug!("Fetching {}", url);
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| api_error(&e))?;
        decode_json(check_status(response)?)
    }
}

impl MappingApi for MappingClient {
    fn fetch_fields(&self, scope: &str) -> std::result::Result<FieldCatalog, ApiError> {
        self.get_json(self.fields_url(scope))
    }

    fn load_mappings(&self, scope: &str) -> std::result::Result<Vec<MappingRow>, ApiError> {
        self.get_json(self.mappings_url(scope))
    }

    fn save_mappings(&self, scope: &str, rows: &[MappingRow]) -> std::result::Result<(), ApiError> {
        let url = self.mappings_url(scope);
        debug!("Posting {} mappings to {}", rows.len(), url);
        let response = self
            .client
            .post(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .json(rows)
            .send()
            .map_err(|e| api_error(&e))?;
        check_status(response)?;
        Ok(())
    }
}

/// Reply of the settings endpoint, which reports failures with HTTP 200.
#[derive(Debug, Deserialize)]
struct SaveOutcome {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

fn decode_json<T: DeserializeOwned>(response: Response) -> std::result::Result<T, ApiError> {
    let body = response.text().map_err(|e| api_error(&e))?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Turns a non-success status into [`ApiError::Status`].
fn check_status(response: Response) -> std::result::Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> MappingClient {
        MappingClient::new(&ClientConfig::default().with_base_url(base_url)).unwrap()
    }

    #[test]
    fn test_fields_url() {
        let client = client("http://localhost:5000");
        assert_eq!(
            client.fields_url("uniska").as_str(),
            "http://localhost:5000/pipedrive-fields?company=uniska"
        );
        assert_eq!(
            client.fields_url("acme & co").as_str(),
            "http://localhost:5000/pipedrive-fields?company=acme+%26+co"
        );
    }

    #[test]
    fn test_mappings_url_encodes_scope() {
        let client = client("http://localhost:5000/");
        assert_eq!(
            client.mappings_url("novisol").as_str(),
            "http://localhost:5000/novisol/field-mappings"
        );
        assert_eq!(
            client.mappings_url("a/b c").as_str(),
            "http://localhost:5000/a%2Fb%20c/field-mappings"
        );
    }

    #[test]
    fn test_base_path_is_kept() {
        let client = client("https://tools.example.com/crm/");
        assert_eq!(
            client.mappings_url("uniska").as_str(),
            "https://tools.example.com/crm/uniska/field-mappings"
        );
        assert_eq!(
            client.settings_url().as_str(),
            "https://tools.example.com/crm/api/sync_settings"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = MappingClient::new(&ClientConfig::default().with_base_url("not a url"));
        assert!(matches!(err, Err(ClientError::InvalidBaseUrl { .. })));

        let err = MappingClient::new(&ClientConfig::default().with_base_url("mailto:ops@example.com"));
        assert!(matches!(err, Err(ClientError::InvalidBaseUrl { .. })));
    }
}
