use async_trait::async_trait;
use girder_core::models::{PortalData, PortalEnvelope};
use girder_core::AppError;
use reqwest::StatusCode;

const FUNCTION_NAME: &str = "client-portal";

/// Resolves a shareable portal token into a permission-scoped read-only slice
/// of one project.
#[async_trait]
pub trait PortalClient: Send + Sync {
    async fn resolve_token(&self, token: &str) -> Result<PortalData, AppError>;
}

#[derive(Clone)]
pub struct HttpPortalClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPortalClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl PortalClient for HttpPortalClient {
    /// The upstream 403 (expired link) and 404 (unknown or deactivated link)
    /// pass through unchanged; anything else is a 502. No project data leaks
    /// on any failure path.
    #[tracing::instrument(skip(self, token))]
    async fn resolve_token(&self, token: &str) -> Result<PortalData, AppError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("token", token)])
            .send()
            .await
            .map_err(|e| AppError::ExternalFunction {
                function: FUNCTION_NAME,
                status: 502,
                message: format!("Portal function unreachable: {}", e),
            })?;

        match response.status() {
            StatusCode::OK => {
                let envelope: PortalEnvelope =
                    response.json().await.map_err(|e| AppError::ExternalFunction {
                        function: FUNCTION_NAME,
                        status: 502,
                        message: format!("Invalid portal response: {}", e),
                    })?;
                envelope.data.ok_or_else(|| AppError::ExternalFunction {
                    function: FUNCTION_NAME,
                    status: 502,
                    message: envelope
                        .error
                        .unwrap_or_else(|| "Portal response carried no data".to_string()),
                })
            }
            StatusCode::FORBIDDEN => Err(AppError::ExternalFunction {
                function: FUNCTION_NAME,
                status: 403,
                message: "Portal link has expired".to_string(),
            }),
            StatusCode::NOT_FOUND => Err(AppError::ExternalFunction {
                function: FUNCTION_NAME,
                status: 404,
                message: "Portal link not found".to_string(),
            }),
            other => Err(AppError::ExternalFunction {
                function: FUNCTION_NAME,
                status: other.as_u16(),
                message: "Portal function failed".to_string(),
            }),
        }
    }
}
