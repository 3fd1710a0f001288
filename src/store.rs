//! In-memory mirror of every collection with write-behind persistence.
//!
//! The store is the single authority for collection data. Each mutation
//! replaces the in-memory value and queues a full-collection write on one
//! background task; callers never wait for the write.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::errors::AppError;
use crate::models::{
    dashboard::RECENT_PRODUCTS, CollectionKey, CompanySettings, DashboardSummary, DocumentFile,
    Employee, KpiData, LabDevice, Product, Record, ReservedItem, ReservedStatus, Snapshot,
};
use crate::storage::Storage;

enum WriteOp {
    Set(CollectionKey, Value),
    Flush(oneshot::Sender<()>),
}

/// Millisecond timestamps, bumped when two ids land in the same millisecond.
#[derive(Debug, Default)]
struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    fn next(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        let id = now.max(self.last + 1);
        self.last = id;
        id.to_string()
    }
}

pub struct Store {
    data: Snapshot,
    ids: IdGenerator,
    writes: mpsc::UnboundedSender<WriteOp>,
}

impl Store {
    /// Reads every collection concurrently. Keys that are absent, unreadable
    /// or undecodable keep their built-in default.
    pub async fn load(storage: Arc<dyn Storage>) -> Self {
        let s = storage.as_ref();
        let (products, team, documents, kpi_data, company, reserved_items, lab_equipment) =
            tokio::join!(
                read::<Vec<Product>>(s, CollectionKey::Products),
                read::<Vec<Employee>>(s, CollectionKey::Team),
                read::<Vec<DocumentFile>>(s, CollectionKey::Documents),
                read::<Vec<KpiData>>(s, CollectionKey::KpiData),
                read::<CompanySettings>(s, CollectionKey::Company),
                read::<Vec<ReservedItem>>(s, CollectionKey::ReservedItems),
                read::<Vec<LabDevice>>(s, CollectionKey::LabEquipment),
            );

        let data = Snapshot {
            products: products.unwrap_or_default(),
            team: team.unwrap_or_default(),
            documents: documents.unwrap_or_default(),
            kpi_data: kpi_data.unwrap_or_default(),
            company_settings: company.unwrap_or_default(),
            reserved_items: reserved_items.unwrap_or_default(),
            lab_equipment: lab_equipment.unwrap_or_default(),
        };

        log::info!(
            "Loaded {} products, {} team members, {} documents, {} KPI entries, \
             {} reserved items, {} lab devices from {} storage",
            data.products.len(),
            data.team.len(),
            data.documents.len(),
            data.kpi_data.len(),
            data.reserved_items.len(),
            data.lab_equipment.len(),
            storage.backend_name(),
        );

        Self {
            data,
            ids: IdGenerator::default(),
            writes: spawn_writer(storage),
        }
    }

    /// Resolves once every write queued before this call has been attempted.
    /// The returned future does not borrow the store.
    pub fn flush(&self) -> impl Future<Output = ()> + Send + 'static {
        let (done, wait) = oneshot::channel();
        let queued = self.writes.send(WriteOp::Flush(done)).is_ok();
        async move {
            if queued {
                let _ = wait.await;
            }
        }
    }

    fn persist(&self, key: CollectionKey) {
        let value = match key {
            CollectionKey::Products => serde_json::to_value(&self.data.products),
            CollectionKey::Team => serde_json::to_value(&self.data.team),
            CollectionKey::Documents => serde_json::to_value(&self.data.documents),
            CollectionKey::KpiData => serde_json::to_value(&self.data.kpi_data),
            CollectionKey::Company => serde_json::to_value(&self.data.company_settings),
            CollectionKey::ReservedItems => serde_json::to_value(&self.data.reserved_items),
            CollectionKey::LabEquipment => serde_json::to_value(&self.data.lab_equipment),
        };

        match value {
            Ok(value) => {
                if self.writes.send(WriteOp::Set(key, value)).is_err() {
                    log::error!("Storage writer stopped, dropping write of {}", key.storage_key());
                }
            }
            Err(e) => log::error!("Failed to serialize {}: {}", key.storage_key(), e),
        }
    }

    // --- Id-addressed collections ---

    pub fn list<R: Record>(&self) -> &[R] {
        R::list(&self.data)
    }

    pub fn find<R: Record>(&self, id: &str) -> Option<&R> {
        R::list(&self.data).iter().find(|r| r.id() == id)
    }

    /// New records get a fresh id and go first.
    pub fn add<R: Record>(&mut self, form: R::Form) -> R {
        let record = R::from_form(self.ids.next(), form);
        R::list_mut(&mut self.data).insert(0, record.clone());
        self.persist(R::COLLECTION);
        record
    }

    /// Replaces the record in place, keeping its id and position.
    pub fn update<R: Record>(&mut self, id: &str, form: R::Form) -> Result<R, AppError> {
        let slot = R::list_mut(&mut self.data)
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("{} {}", R::COLLECTION.storage_key(), id)))?;
        *slot = R::from_form(id.to_string(), form);
        let record = slot.clone();
        self.persist(R::COLLECTION);
        Ok(record)
    }

    /// Returns whether a record was removed. Unknown ids are a no-op.
    pub fn delete<R: Record>(&mut self, id: &str) -> bool {
        let list = R::list_mut(&mut self.data);
        let before = list.len();
        list.retain(|r| r.id() != id);
        let removed = list.len() != before;
        if removed {
            self.persist(R::COLLECTION);
        }
        removed
    }

    // --- KPI entries, addressed by position ---

    pub fn kpi_entries(&self) -> &[KpiData] {
        &self.data.kpi_data
    }

    /// KPI entries form a time series, so new months are appended.
    pub fn add_kpi(&mut self, entry: KpiData) -> usize {
        self.data.kpi_data.push(entry);
        self.persist(CollectionKey::KpiData);
        self.data.kpi_data.len() - 1
    }

    pub fn update_kpi(&mut self, index: usize, entry: KpiData) -> Result<KpiData, AppError> {
        let slot = self
            .data
            .kpi_data
            .get_mut(index)
            .ok_or_else(|| AppError::NotFound(format!("KPI entry {}", index)))?;
        *slot = entry.clone();
        self.persist(CollectionKey::KpiData);
        Ok(entry)
    }

    pub fn delete_kpi(&mut self, index: usize) -> bool {
        if index >= self.data.kpi_data.len() {
            return false;
        }
        self.data.kpi_data.remove(index);
        self.persist(CollectionKey::KpiData);
        true
    }

    // --- Company settings ---

    pub fn settings(&self) -> &CompanySettings {
        &self.data.company_settings
    }

    pub fn save_settings(&mut self, settings: CompanySettings) -> CompanySettings {
        self.data.company_settings = settings.clone();
        self.persist(CollectionKey::Company);
        settings
    }

    // --- Database screen ---

    pub fn export(&self) -> Snapshot {
        self.data.clone()
    }

    /// Total overwrite of every collection, settings included.
    pub fn import(&mut self, snapshot: Snapshot) {
        self.data = snapshot;
        for key in CollectionKey::ALL {
            self.persist(key);
        }
    }

    /// Empties every list; settings are kept.
    pub fn reset(&mut self) {
        let settings = std::mem::take(&mut self.data.company_settings);
        self.data = Snapshot {
            company_settings: settings,
            ..Snapshot::default()
        };
        for key in CollectionKey::ALL {
            if key != CollectionKey::Company {
                self.persist(key);
            }
        }
    }

    pub fn summary(&self) -> DashboardSummary {
        let count = |status: ReservedStatus| {
            self.data
                .reserved_items
                .iter()
                .filter(|item| item.status == status)
                .count()
        };

        DashboardSummary {
            total_products: self.data.products.len(),
            total_kpis: self.data.kpi_data.len(),
            last_quality_rate: self
                .data
                .kpi_data
                .last()
                .map(|entry| entry.quality_rate)
                .unwrap_or(0.0),
            reserved_pending: count(ReservedStatus::Pending),
            reserved_resolved: count(ReservedStatus::Resolved),
            reserved_scrapped: count(ReservedStatus::Scrapped),
            recent_products: self
                .data
                .products
                .iter()
                .take(RECENT_PRODUCTS)
                .cloned()
                .collect(),
        }
    }
}

async fn read<T: DeserializeOwned>(storage: &dyn Storage, key: CollectionKey) -> Option<T> {
    match storage.get(key.storage_key()).await {
        Ok(Some(Value::Null)) | Ok(None) => None,
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::error!("Ignoring stored {}: {}", key.storage_key(), e);
                None
            }
        },
        Err(e) => {
            log::error!("{} ({})", AppError::StorageRead(e), key.storage_key());
            None
        }
    }
}

fn spawn_writer(storage: Arc<dyn Storage>) -> mpsc::UnboundedSender<WriteOp> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(op) = rx.recv().await {
            match op {
                WriteOp::Set(key, value) => {
                    if let Err(e) = storage.set(key.storage_key(), value).await {
                        log::error!("{} ({})", AppError::StorageWrite(e), key.storage_key());
                    }
                }
                WriteOp::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
    });

    tx
}
