use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{not_blank, CollectionKey, Record, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Management,
    Qc,
    Qa,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
    pub role: String,
    pub department: Department,
    pub joined_date: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Quality stamp image or code issued to the inspector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stamp_data: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForm {
    #[validate(custom = "not_blank")]
    pub name: String,
    pub employee_code: Option<String>,
    #[validate(custom = "not_blank")]
    pub role: String,
    pub department: Department,
    #[serde(default)]
    pub joined_date: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub image: Option<String>,
    pub stamp_data: Option<String>,
}

impl Record for Employee {
    const COLLECTION: CollectionKey = CollectionKey::Team;
    type Form = EmployeeForm;

    fn id(&self) -> &str {
        &self.id
    }

    fn list(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.team
    }

    fn list_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.team
    }

    fn from_form(id: String, form: EmployeeForm) -> Self {
        Self {
            id,
            name: form.name,
            employee_code: form.employee_code,
            role: form.role,
            department: form.department,
            joined_date: form.joined_date,
            email: form.email,
            phone: form.phone,
            image: form.image,
            stamp_data: form.stamp_data,
        }
    }
}
