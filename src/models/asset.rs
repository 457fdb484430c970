use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use crate::models::fields::{array, count, pick_f64, pick_str, pick_strict_str, str_or};

/// CMDB asset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub kode_bmd: String,
    /// `nama_aset`, falling back to `name`
    pub name: String,
    pub category: String,
    pub sub_category: String,
    /// `nomor_seri`, falling back to `serial_number`
    pub serial_number: String,
    pub condition: String,
    pub status: String,
    /// `penanggung_jawab`, falling back to `dinas`
    pub dinas: String,
    pub location: String,
    pub simara_id: Option<i64>,
    pub nilai_perolehan: Option<f64>,
    pub tanggal_perolehan: Option<String>,
    pub merk: Option<String>,
    pub model: Option<String>,
    pub ruangan: Option<String>,
    pub category_type: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Asset {
    pub fn from_json(v: &Value) -> Self {
        Self {
            id: str_or(v, &["id"], ""),
            kode_bmd: str_or(v, &["kode_bmd"], ""),
            name: str_or(v, &["nama_aset", "name"], ""),
            category: str_or(v, &["kategori", "category"], ""),
            sub_category: str_or(v, &["sub_kategori", "sub_category"], ""),
            serial_number: str_or(v, &["nomor_seri", "serial_number"], ""),
            condition: str_or(v, &["kondisi", "condition"], ""),
            status: str_or(v, &["status"], ""),
            dinas: str_or(v, &["penanggung_jawab", "dinas"], ""),
            location: str_or(v, &["lokasi", "location"], ""),
            simara_id: v.get("simara_id").and_then(Value::as_i64),
            nilai_perolehan: pick_f64(v, &["nilai_perolehan"]),
            tanggal_perolehan: pick_str(v, &["tanggal_perolehan"]),
            merk: pick_str(v, &["merk"]),
            model: pick_str(v, &["model"]),
            ruangan: pick_str(v, &["ruangan"]),
            category_type: pick_str(v, &["category_type"]),
            created_at: pick_str(v, &["created_at"]),
            updated_at: pick_str(v, &["updated_at"]),
        }
    }
}

/// Assets grouped by category or type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetGroup {
    pub name: String,
    pub count: i64,
    pub assets: Vec<Asset>,
}

impl AssetGroup {
    /// Accepts either a map of group name to assets (or to a count), or a
    /// list of `{category|type|name, count|total, assets|items}` objects.
    pub fn list_from_json(v: &Value) -> Vec<Self> {
        match v {
            Value::Object(map) => map
                .iter()
                .map(|(name, value)| match value {
                    Value::Array(items) => Self {
                        name: name.clone(),
                        count: items.len() as i64,
                        assets: items.iter().map(Asset::from_json).collect(),
                    },
                    Value::Object(_) => Self::from_entry(value, name),
                    other => Self {
                        name: name.clone(),
                        count: other
                            .as_i64()
                            .or_else(|| other.as_str().and_then(|s| s.trim().parse().ok()))
                            .unwrap_or(0),
                        assets: Vec::new(),
                    },
                })
                .collect(),
            Value::Array(items) => items
                .iter()
                .filter(|item| item.is_object())
                .map(|item| Self::from_entry(item, "-"))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn from_entry(v: &Value, default_name: &str) -> Self {
        let assets: Vec<Asset> = ["assets", "items", "data"]
            .iter()
            .map(|key| array(v, key))
            .find(|items| !items.is_empty())
            .unwrap_or(&[])
            .iter()
            .map(Asset::from_json)
            .collect();
        let reported = ["count", "total", "jumlah"]
            .iter()
            .map(|key| count(v, key))
            .find(|n| *n > 0);
        Self {
            name: str_or(v, &["category", "kategori", "type", "category_type", "name"], default_name),
            count: reported.unwrap_or(assets.len() as i64),
            assets,
        }
    }
}

/// Dependency between two CMDB items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRelation {
    pub asset_id: Option<String>,
    pub bmd_id: String,
    pub nama: String,
    pub kategori: Option<String>,
    pub sub_kategori: Option<String>,
    pub relasi: Option<String>,
    pub keterangan: Option<String>,
}

impl AssetRelation {
    /// Relations without a string `bmd_id` and `nama` are unusable and dropped.
    pub fn from_json(v: &Value) -> Option<Self> {
        if !v.is_object() {
            return None;
        }
        Some(Self {
            bmd_id: pick_strict_str(v, &["bmd_id"])?,
            nama: pick_strict_str(v, &["nama"])?,
            asset_id: pick_strict_str(v, &["asset_id"]),
            kategori: pick_strict_str(v, &["kategori"]),
            sub_kategori: pick_strict_str(v, &["sub_kategori"]),
            relasi: pick_strict_str(v, &["relasi"]),
            keterangan: pick_strict_str(v, &["keterangan"]),
        })
    }
}

/// Free-form technical specification of an asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetSpecification {
    pub entries: BTreeMap<String, String>,
}

impl AssetSpecification {
    /// Accepts an object, or the first object of an array. `id` and
    /// `asset_id` are bookkeeping, not specification entries.
    pub fn from_json(v: &Value) -> Self {
        let object = match v {
            Value::Object(map) => Some(map),
            Value::Array(items) => items.first().and_then(Value::as_object),
            _ => None,
        };
        let entries = object
            .map(|map| {
                map.iter()
                    .filter(|(k, _)| k.as_str() != "id" && k.as_str() != "asset_id")
                    .filter_map(|(k, v)| spec_value(v).map(|s| (k.clone(), s)))
                    .collect()
            })
            .unwrap_or_default();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn spec_value(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// One field change in an asset's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetHistoryEntry {
    pub id: String,
    pub change_type: String,
    pub before: String,
    pub after: String,
    pub changed_by: String,
    pub changed_at: String,
}

impl AssetHistoryEntry {
    /// `index` numbers entries the API left without an id (`HST-001`, ...).
    pub fn from_json(v: &Value, index: usize) -> Self {
        Self {
            id: pick_str(v, &["id", "history_id"]).unwrap_or_else(|| format!("HST-{:03}", index + 1)),
            change_type: str_or(v, &["change_type", "changeType", "field_changed", "field"], "Unknown"),
            before: str_or(v, &["before_value", "beforeValue", "old_value"], "-"),
            after: str_or(v, &["after_value", "afterValue", "new_value"], "-"),
            changed_by: str_or(v, &["changed_by", "changedBy", "user"], "System"),
            changed_at: str_or(v, &["changed_at", "changedAt", "change_date", "created_at"], "-"),
        }
    }
}

/// Editable asset fields; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nama_aset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nomor_seri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kategori: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_kategori: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lokasi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ruangan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penanggung_jawab: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kondisi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nilai_perolehan: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl AssetUpdate {
    /// Field names accepted by `set`
    pub const FIELDS: &'static [&'static str] = &[
        "nama_aset", "nomor_seri", "kategori", "sub_kategori", "lokasi", "ruangan",
        "penanggung_jawab", "kondisi", "status", "nilai_perolehan", "merk", "model",
    ];

    /// Set one field from a `key=value` pair given on the command line.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let text = Some(value.to_string());
        match key {
            "nama_aset" => self.nama_aset = text,
            "nomor_seri" => self.nomor_seri = text,
            "kategori" => self.kategori = text,
            "sub_kategori" => self.sub_kategori = text,
            "lokasi" => self.lokasi = text,
            "ruangan" => self.ruangan = text,
            "penanggung_jawab" => self.penanggung_jawab = text,
            "kondisi" => self.kondisi = text,
            "status" => self.status = text,
            "merk" => self.merk = text,
            "model" => self.model = text,
            "nilai_perolehan" => {
                let parsed = value.trim().parse::<f64>()
                    .map_err(|_| format!("Invalid nilai_perolehan: '{}'. Expected a number.", value))?;
                self.nilai_perolehan = Some(parsed);
            }
            "kode_bmd" => return Err("kode_bmd cannot be edited".to_string()),
            other => return Err(format!("Unknown asset field: '{}'", other)),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}
