use anyhow::{Context, Result};
use crate::api::{envelope, ApiClient};
use crate::models::{Asset, AssetGroup, AssetHistoryEntry, AssetRelation, AssetSpecification};

/// How the server groups assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetGrouping {
    Category,
    Type,
}

impl AssetGrouping {
    fn path(&self) -> &'static str {
        match self {
            AssetGrouping::Category => "/cmdb/assets/category",
            AssetGrouping::Type => "/cmdb/assets/type",
        }
    }
}

pub struct AssetRepo;

impl AssetRepo {
    pub fn list_all(client: &ApiClient) -> Result<Vec<Asset>> {
        let body = client.get("/cmdb/assets").context("Failed to fetch assets")?;
        let assets: Vec<Asset> = envelope::items(&body).iter().map(Asset::from_json).collect();
        log::debug!("Fetched {} assets", assets.len());
        Ok(assets)
    }

    pub fn get(client: &ApiClient, id: &str) -> Result<Option<Asset>> {
        let body = client.get(&format!("/cmdb/assets/{}", id))
            .with_context(|| format!("Failed to fetch asset {}", id))?;
        let payload = envelope::payload(&body);
        Ok(envelope::is_present(payload).then(|| Asset::from_json(payload)))
    }

    pub fn grouped(client: &ApiClient, grouping: AssetGrouping) -> Result<Vec<AssetGroup>> {
        let body = client.get(grouping.path())
            .with_context(|| format!("Failed to fetch {}", grouping.path()))?;
        Ok(AssetGroup::list_from_json(envelope::payload(&body)))
    }

    /// Related CMDB items; unusable records are dropped
    pub fn relations(client: &ApiClient, id: &str) -> Result<Vec<AssetRelation>> {
        let body = client.get(&format!("/cmdb/assets/{}/relations", id))
            .with_context(|| format!("Failed to fetch relations for asset {}", id))?;
        let items = envelope::items(&body);
        let relations: Vec<AssetRelation> = items.iter().filter_map(AssetRelation::from_json).collect();
        if relations.len() < items.len() {
            log::warn!("Dropped {} relation(s) without bmd_id or nama", items.len() - relations.len());
        }
        Ok(relations)
    }

    pub fn history(client: &ApiClient, id: &str) -> Result<Vec<AssetHistoryEntry>> {
        let body = client.get(&format!("/cmdb/assets/{}/history", id))
            .with_context(|| format!("Failed to fetch history for asset {}", id))?;
        Ok(envelope::items(&body)
            .iter()
            .enumerate()
            .map(|(index, entry)| AssetHistoryEntry::from_json(entry, index))
            .collect())
    }

    pub fn specifications(client: &ApiClient, id: &str) -> Result<AssetSpecification> {
        let body = client.get(&format!("/cmdb/assets/{}/specifications", id))
            .with_context(|| format!("Failed to fetch specifications for asset {}", id))?;
        Ok(AssetSpecification::from_json(envelope::payload(&body)))
    }
}
