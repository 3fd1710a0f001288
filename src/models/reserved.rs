use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{not_blank, CollectionKey, Record, Snapshot};

/// Inspector name recorded when the form leaves it empty.
pub const UNSPECIFIED_INSPECTOR: &str = "غير محدد";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservedStatus {
    Pending,
    Resolved,
    Scrapped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shift {
    #[default]
    A,
    B,
    C,
}

fn unspecified_inspector() -> String {
    UNSPECIFIED_INSPECTOR.to_string()
}

/// A defective batch held in quarantine until it is resolved or scrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedItem {
    pub id: String,
    pub product_name: String,
    pub quantity: f64,
    pub defects: String,
    pub action_taken: String,
    pub date: String,
    pub status: ReservedStatus,
    #[serde(default)]
    pub shift: Shift,
    #[serde(default = "unspecified_inspector")]
    pub inspector_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReservedForm {
    #[validate(custom = "not_blank")]
    pub product_name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub defects: String,
    #[serde(default)]
    pub action_taken: String,
    #[validate(custom = "not_blank")]
    pub date: String,
    pub status: Option<ReservedStatus>,
    pub shift: Option<Shift>,
    pub inspector_name: Option<String>,
}

impl Record for ReservedItem {
    const COLLECTION: CollectionKey = CollectionKey::ReservedItems;
    type Form = ReservedForm;

    fn id(&self) -> &str {
        &self.id
    }

    fn list(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.reserved_items
    }

    fn list_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.reserved_items
    }

    fn from_form(id: String, form: ReservedForm) -> Self {
        Self {
            id,
            product_name: form.product_name,
            quantity: form.quantity,
            defects: form.defects,
            action_taken: form.action_taken,
            date: form.date,
            status: form.status.unwrap_or(ReservedStatus::Pending),
            shift: form.shift.unwrap_or_default(),
            inspector_name: form
                .inspector_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(unspecified_inspector),
        }
    }
}
