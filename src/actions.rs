//! Mutations that pass through the auth gate, as plain data.

use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::{
    CompanySettings, DocumentFile, Employee, KpiData, LabDevice, Product, Record, ReservedItem,
    Snapshot,
};
use crate::store::Store;

#[derive(Debug, Clone)]
pub enum RecordAction<F> {
    Add(F),
    Update { id: String, form: F },
    Delete { id: String },
}

#[derive(Debug, Clone)]
pub enum KpiAction {
    Add(KpiData),
    Update { index: usize, entry: KpiData },
    Delete { index: usize },
}

#[derive(Debug, Clone)]
pub enum PendingAction {
    Products(RecordAction<<Product as Record>::Form>),
    Team(RecordAction<<Employee as Record>::Form>),
    Documents(RecordAction<<DocumentFile as Record>::Form>),
    LabEquipment(RecordAction<<LabDevice as Record>::Form>),
    Reserved(RecordAction<<ReservedItem as Record>::Form>),
    Kpi(KpiAction),
    SaveSettings(CompanySettings),
    ExportSnapshot,
    ImportSnapshot(Snapshot),
    Reset,
}

/// Records whose mutations can be wrapped into a [`PendingAction`].
pub trait GatedRecord: Record {
    fn wrap(action: RecordAction<Self::Form>) -> PendingAction;
}

macro_rules! gated_record {
    ($record:ty, $variant:ident) => {
        impl GatedRecord for $record {
            fn wrap(action: RecordAction<Self::Form>) -> PendingAction {
                PendingAction::$variant(action)
            }
        }
    };
}

gated_record!(Product, Products);
gated_record!(Employee, Team);
gated_record!(DocumentFile, Documents);
gated_record!(LabDevice, LabEquipment);
gated_record!(ReservedItem, Reserved);

fn record_verb<F>(action: &RecordAction<F>) -> &'static str {
    match action {
        RecordAction::Add(_) => "add",
        RecordAction::Update { .. } => "update",
        RecordAction::Delete { .. } => "delete",
    }
}

impl PendingAction {
    pub fn label(&self) -> String {
        let (screen, verb) = match self {
            PendingAction::Products(a) => ("products", record_verb(a)),
            PendingAction::Team(a) => ("team", record_verb(a)),
            PendingAction::Documents(a) => ("documents", record_verb(a)),
            PendingAction::LabEquipment(a) => ("lab-equipment", record_verb(a)),
            PendingAction::Reserved(a) => ("reserved", record_verb(a)),
            PendingAction::Kpi(KpiAction::Add(_)) => ("kpi", "add"),
            PendingAction::Kpi(KpiAction::Update { .. }) => ("kpi", "update"),
            PendingAction::Kpi(KpiAction::Delete { .. }) => ("kpi", "delete"),
            PendingAction::SaveSettings(_) => ("settings", "save"),
            PendingAction::ExportSnapshot => ("database", "export"),
            PendingAction::ImportSnapshot(_) => ("database", "import"),
            PendingAction::Reset => ("database", "reset"),
        };
        format!("{}.{}", screen, verb)
    }

    /// Applies the action and returns what the screen shows afterwards.
    pub fn dispatch(self, store: &mut Store) -> Result<Value, AppError> {
        log::debug!("Dispatching {}", self.label());
        match self {
            PendingAction::Products(a) => apply_record::<Product>(store, a),
            PendingAction::Team(a) => apply_record::<Employee>(store, a),
            PendingAction::Documents(a) => apply_record::<DocumentFile>(store, a),
            PendingAction::LabEquipment(a) => apply_record::<LabDevice>(store, a),
            PendingAction::Reserved(a) => apply_record::<ReservedItem>(store, a),
            PendingAction::Kpi(KpiAction::Add(entry)) => {
                let index = store.add_kpi(entry.clone());
                Ok(json!({ "index": index, "entry": entry }))
            }
            PendingAction::Kpi(KpiAction::Update { index, entry }) => {
                let entry = store.update_kpi(index, entry)?;
                Ok(json!({ "index": index, "entry": entry }))
            }
            PendingAction::Kpi(KpiAction::Delete { index }) => {
                Ok(json!({ "deleted": store.delete_kpi(index) }))
            }
            PendingAction::SaveSettings(settings) => Ok(json!(store.save_settings(settings))),
            PendingAction::ExportSnapshot => Ok(json!(store.export())),
            PendingAction::ImportSnapshot(snapshot) => {
                store.import(snapshot);
                Ok(json!({ "imported": true }))
            }
            PendingAction::Reset => {
                store.reset();
                Ok(json!({ "reset": true }))
            }
        }
    }
}

fn apply_record<R: Record>(
    store: &mut Store,
    action: RecordAction<R::Form>,
) -> Result<Value, AppError> {
    match action {
        RecordAction::Add(form) => Ok(json!(store.add::<R>(form))),
        RecordAction::Update { id, form } => {
            let record = store.update::<R>(&id, form)?;
            Ok(json!(record))
        }
        RecordAction::Delete { id } => Ok(json!({ "deleted": store.delete::<R>(&id) })),
    }
}
