use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{not_blank, CollectionKey, Record, Snapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabDevice {
    pub id: String,
    pub name: String,
    pub image: String,
    /// Standard operating procedure, free text.
    pub sop: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LabDeviceForm {
    #[validate(custom = "not_blank")]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub sop: String,
}

impl Record for LabDevice {
    const COLLECTION: CollectionKey = CollectionKey::LabEquipment;
    type Form = LabDeviceForm;

    fn id(&self) -> &str {
        &self.id
    }

    fn list(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.lab_equipment
    }

    fn list_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.lab_equipment
    }

    fn from_form(id: String, form: LabDeviceForm) -> Self {
        Self {
            id,
            name: form.name,
            image: form.image,
            sop: form.sop,
        }
    }
}
