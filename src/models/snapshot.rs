use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    null_as_default, CompanySettings, DocumentFile, Employee, KpiData, LabDevice, Product,
    ReservedItem,
};
use crate::errors::AppError;

/// Every collection at once, as exported from and imported into the
/// Database screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<Product>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team: Vec<Employee>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub documents: Vec<DocumentFile>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub kpi_data: Vec<KpiData>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_settings: CompanySettings,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reserved_items: Vec<ReservedItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lab_equipment: Vec<LabDevice>,
}

impl Snapshot {
    /// Checks every field against its record schema. Missing or `null`
    /// fields become empty; anything of the wrong shape rejects the whole
    /// snapshot.
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        if !value.is_object() {
            return Err(AppError::ImportValidation(
                "snapshot must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| AppError::ImportValidation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_and_null_fields_become_defaults() {
        let snapshot = Snapshot::from_value(json!({
            "products": null,
            "team": []
        }))
        .unwrap();
        assert!(snapshot.products.is_empty());
        assert!(snapshot.lab_equipment.is_empty());
        assert_eq!(snapshot.company_settings, CompanySettings::default());
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let err = Snapshot::from_value(json!({
            "products": [{"id": "1", "name": 42}]
        }))
        .unwrap_err();
        assert!(matches!(err, AppError::ImportValidation(_)));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(matches!(
            Snapshot::from_value(json!([1, 2, 3])),
            Err(AppError::ImportValidation(_))
        ));
    }

    #[test]
    fn exported_keys_use_collection_names() {
        let value = serde_json::to_value(Snapshot::default()).unwrap();
        for key in [
            "products",
            "team",
            "documents",
            "kpiData",
            "companySettings",
            "reservedItems",
            "labEquipment",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
    }
}
