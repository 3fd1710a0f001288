pub mod company;
pub mod dashboard;
pub mod document;
pub mod employee;
pub mod kpi;
pub mod lab;
pub mod product;
pub mod reserved;
pub mod snapshot;

pub use company::CompanySettings;
pub use dashboard::DashboardSummary;
pub use document::DocumentFile;
pub use employee::Employee;
pub use kpi::KpiData;
pub use lab::LabDevice;
pub use product::Product;
pub use reserved::{ReservedItem, ReservedStatus};
pub use snapshot::Snapshot;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

/// Logical collections and the key each one is persisted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    Products,
    Team,
    Documents,
    KpiData,
    Company,
    ReservedItems,
    LabEquipment,
}

impl CollectionKey {
    pub const ALL: [CollectionKey; 7] = [
        CollectionKey::Products,
        CollectionKey::Team,
        CollectionKey::Documents,
        CollectionKey::KpiData,
        CollectionKey::Company,
        CollectionKey::ReservedItems,
        CollectionKey::LabEquipment,
    ];

    pub fn storage_key(self) -> &'static str {
        match self {
            CollectionKey::Products => "tqm_products",
            CollectionKey::Team => "tqm_team",
            CollectionKey::Documents => "tqm_documents",
            CollectionKey::KpiData => "tqm_kpiData",
            CollectionKey::Company => "tqm_company",
            CollectionKey::ReservedItems => "tqm_reserved",
            CollectionKey::LabEquipment => "tqm_lab_equipment",
        }
    }
}

/// A list-typed entity addressed by a client-generated id.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: CollectionKey;

    /// Every field except the id, as submitted by a form.
    type Form: Validate + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync + 'static;

    fn id(&self) -> &str;

    fn list(snapshot: &Snapshot) -> &Vec<Self>;

    fn list_mut(snapshot: &mut Snapshot) -> &mut Vec<Self>;

    fn from_form(id: String, form: Self::Form) -> Self;
}

/// Required text field: present and not only whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Treats an explicit `null` the same as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
