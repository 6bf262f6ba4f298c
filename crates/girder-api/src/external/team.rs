use async_trait::async_trait;
use girder_core::models::{ProvisionTeamMemberRequest, ProvisionTeamMemberResponse};
use girder_core::AppError;
use reqwest::StatusCode;

const FUNCTION_NAME: &str = "create-team-member";

/// Provisions a new or existing account and attaches it to an organization
/// with a role. Account creation itself lives in the function; this side only
/// supplies the request and relays the outcome.
#[async_trait]
pub trait TeamProvisioner: Send + Sync {
    async fn provision(
        &self,
        request: &ProvisionTeamMemberRequest,
    ) -> Result<ProvisionTeamMemberResponse, AppError>;
}

#[derive(Clone)]
pub struct HttpTeamProvisioner {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTeamProvisioner {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl TeamProvisioner for HttpTeamProvisioner {
    /// A 400 from the function (unknown role, duplicate membership) comes
    /// back as BadRequest with the upstream message; other failures are 502.
    #[tracing::instrument(skip(self, request), fields(organization_id = %request.organization_id))]
    async fn provision(
        &self,
        request: &ProvisionTeamMemberRequest,
    ) -> Result<ProvisionTeamMemberResponse, AppError> {
        let response = self
            .http
            .post(&self.base_url)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::ExternalFunction {
                function: FUNCTION_NAME,
                status: 502,
                message: format!("Provisioning function unreachable: {}", e),
            })?;

        match response.status() {
            StatusCode::OK => {
                let body: ProvisionTeamMemberResponse =
                    response.json().await.map_err(|e| AppError::ExternalFunction {
                        function: FUNCTION_NAME,
                        status: 502,
                        message: format!("Invalid provisioning response: {}", e),
                    })?;
                if body.success {
                    Ok(body)
                } else {
                    Err(AppError::BadRequest(body.error.unwrap_or_else(|| {
                        "Team member provisioning failed".to_string()
                    })))
                }
            }
            StatusCode::BAD_REQUEST => {
                let message = response
                    .json::<ProvisionTeamMemberResponse>()
                    .await
                    .ok()
                    .and_then(|body| body.error)
                    .unwrap_or_else(|| "Invalid provisioning request".to_string());
                Err(AppError::BadRequest(message))
            }
            other => Err(AppError::ExternalFunction {
                function: FUNCTION_NAME,
                status: other.as_u16(),
                message: "Provisioning function failed".to_string(),
            }),
        }
    }
}
