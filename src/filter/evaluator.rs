// Client-side list filtering.
//
// Every list is fetched whole and narrowed here. Free text is a
// case-insensitive substring match over the entity's search fields;
// categorical filters are ANDed, each with its own comparison rule.

use crate::access;
use crate::filter::parser::{FilterKey, ListQuery};
use crate::models::{Asset, AssetHistoryEntry, ChangeRequest, EmergencyTicket, PatchJob, Role};

/// Filters accepted by each list
pub const CHANGE_KEYS: &[FilterKey] = &[FilterKey::Status, FilterKey::Type];
pub const APPROVAL_KEYS: &[FilterKey] = &[FilterKey::Approval, FilterKey::Status, FilterKey::Type];
pub const EMERGENCY_KEYS: &[FilterKey] = &[FilterKey::Status];
pub const PATCH_JOB_KEYS: &[FilterKey] = &[FilterKey::Status, FilterKey::Dinas];
pub const PATCH_RESULT_KEYS: &[FilterKey] = &[FilterKey::Status];
pub const ASSET_KEYS: &[FilterKey] = &[FilterKey::Status];
pub const HISTORY_KEYS: &[FilterKey] = &[FilterKey::Change, FilterKey::By];

/// Case-insensitive substring match of the query text against any field.
/// No text matches everything.
fn text_matches(query: &ListQuery, fields: &[Option<&str>]) -> bool {
    let Some(text) = query.text.as_deref() else {
        return true;
    };
    let needle = text.to_lowercase();
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

fn exact(filter: Option<&str>, value: &str) -> bool {
    filter.map_or(true, |f| f == value)
}

fn lower_eq(filter: Option<&str>, value: &str) -> bool {
    filter.map_or(true, |f| f.to_lowercase() == value.to_lowercase())
}

fn upper_eq(filter: Option<&str>, value: &str) -> bool {
    filter.map_or(true, |f| f.to_uppercase() == value.to_uppercase())
}

fn change_matches(cr: &ChangeRequest, query: &ListQuery) -> bool {
    text_matches(query, &[cr.cr_id.as_deref(), Some(&cr.title), Some(&cr.id)])
        && exact(query.status.as_deref(), &cr.status)
        && lower_eq(query.change_type.as_deref(), &cr.change_type)
}

pub fn filter_changes(items: Vec<ChangeRequest>, query: &ListQuery) -> Vec<ChangeRequest> {
    items.into_iter().filter(|cr| change_matches(cr, query)).collect()
}

/// Approval queue: the role's type gate first, then the query.
pub fn filter_approvals(items: Vec<ChangeRequest>, role: Role, query: &ListQuery) -> Vec<ChangeRequest> {
    items
        .into_iter()
        .filter(|cr| access::can_view_change(role, cr))
        .filter(|cr| {
            text_matches(query, &[cr.cr_id.as_deref(), Some(&cr.title)])
                && exact(query.approval.as_deref(), &cr.approval_status)
                && exact(query.status.as_deref(), &cr.status)
                && lower_eq(query.change_type.as_deref(), &cr.change_type)
        })
        .collect()
}

/// Finished change requests (completed, failed, ended)
pub fn filter_change_results(items: Vec<ChangeRequest>, query: &ListQuery) -> Vec<ChangeRequest> {
    items
        .into_iter()
        .filter(ChangeRequest::is_result)
        .filter(|cr| {
            text_matches(query, &[cr.tiket_id.as_deref(), cr.cr_id.as_deref(), Some(&cr.title)])
                && upper_eq(query.status.as_deref(), &cr.status)
                && lower_eq(query.change_type.as_deref(), &cr.change_type)
        })
        .collect()
}

pub fn filter_emergencies(items: Vec<EmergencyTicket>, query: &ListQuery) -> Vec<EmergencyTicket> {
    items
        .into_iter()
        .filter(|t| {
            text_matches(query, &[Some(&t.id), Some(&t.title), t.emergency_code.as_deref()])
                && exact(query.status.as_deref(), &t.status)
        })
        .collect()
}

pub fn filter_patch_jobs(items: Vec<PatchJob>, query: &ListQuery) -> Vec<PatchJob> {
    items
        .into_iter()
        .filter(|job| {
            text_matches(query, &[Some(&job.id), Some(&job.scope)])
                && lower_eq(query.status.as_deref(), &job.status)
                && exact(query.dinas.as_deref(), &job.dinas)
        })
        .collect()
}

/// Patch jobs that reached an outcome (succeeded, failed, partially failed)
pub fn filter_patch_results(items: Vec<PatchJob>, query: &ListQuery) -> Vec<PatchJob> {
    items
        .into_iter()
        .filter(PatchJob::is_result)
        .filter(|job| {
            text_matches(
                query,
                &[job.job_id.as_deref(), job.patch_id.as_deref(), job.title.as_deref(), Some(&job.scope)],
            ) && exact(query.status.as_deref(), &job.status)
        })
        .collect()
}

pub fn filter_assets(items: Vec<Asset>, query: &ListQuery) -> Vec<Asset> {
    items
        .into_iter()
        .filter(|asset| {
            text_matches(query, &[Some(&asset.kode_bmd), Some(&asset.name), Some(&asset.serial_number)])
                && lower_eq(query.status.as_deref(), &asset.status)
        })
        .collect()
}

pub fn filter_history(items: Vec<AssetHistoryEntry>, query: &ListQuery) -> Vec<AssetHistoryEntry> {
    items
        .into_iter()
        .filter(|entry| {
            text_matches(query, &[Some(&entry.id), Some(&entry.before), Some(&entry.after)])
                && exact(query.change.as_deref(), &entry.change_type)
                && exact(query.changed_by.as_deref(), &entry.changed_by)
        })
        .collect()
}
