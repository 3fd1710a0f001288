use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{not_blank, CollectionKey, Record, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Excel,
    Word,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentFile {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub size: String,
    pub date: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DocumentForm {
    #[validate(custom = "not_blank")]
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub date: String,
    #[validate(custom = "not_blank")]
    pub url: String,
}

impl Record for DocumentFile {
    const COLLECTION: CollectionKey = CollectionKey::Documents;
    type Form = DocumentForm;

    fn id(&self) -> &str {
        &self.id
    }

    fn list(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.documents
    }

    fn list_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.documents
    }

    fn from_form(id: String, form: DocumentForm) -> Self {
        Self {
            id,
            name: form.name,
            doc_type: form.doc_type,
            size: form.size,
            date: form.date,
            url: form.url,
        }
    }
}
