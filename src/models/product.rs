use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{not_blank, CollectionKey, Record, Snapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub specs: String,
    pub defects: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    #[validate(custom = "not_blank")]
    pub name: String,
    #[serde(default)]
    pub specs: String,
    #[serde(default)]
    pub defects: String,
    #[serde(default)]
    pub image: String,
    pub manufacturer: Option<String>,
}

impl Record for Product {
    const COLLECTION: CollectionKey = CollectionKey::Products;
    type Form = ProductForm;

    fn id(&self) -> &str {
        &self.id
    }

    fn list(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.products
    }

    fn list_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.products
    }

    fn from_form(id: String, form: ProductForm) -> Self {
        Self {
            id,
            name: form.name,
            specs: form.specs,
            defects: form.defects,
            image: form.image,
            manufacturer: form.manufacturer.filter(|m| !m.is_empty()),
        }
    }
}
