use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCandidatePayload {
    pub user_id: i32,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub resume_url: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    #[validate(range(min = 0))]
    pub experience: Option<i32>,
    pub education: Option<String>,
}

impl CreateCandidatePayload {
    /// Bare profile created alongside a candidate-role user at registration.
    pub fn for_user(user_id: i32) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCandidatePayload {
    pub user_id: Option<i32>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub resume_url: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    #[validate(range(min = 0))]
    pub experience: Option<i32>,
    pub education: Option<String>,
}
