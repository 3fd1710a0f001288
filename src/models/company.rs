use serde::{Deserialize, Serialize};
use validator::Validate;

use super::not_blank;

/// The single company-settings record; never list-typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanySettings {
    #[serde(default)]
    #[validate(custom = "not_blank")]
    pub name: String,
    #[serde(default)]
    pub slogan: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub registration_number: String,
    #[serde(default)]
    pub certificates: Option<String>,
}
