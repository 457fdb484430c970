// Output formatting utilities

use std::io::IsTerminal;
use serde_json::Value;
use crate::access::{self, ApprovalGate};
use crate::models::{
    Asset, AssetGroup, AssetHistoryEntry, AssetRelation, AssetSpecification, AssetUpdate, ChangeRequest,
    DashboardSummary, EmergencyTicket, PatchJob, PatchJobOptions, PatchSchedule, Role, UserProfile,
    WeeklyTrendPoint,
};
use crate::utils::date::{format_date, format_opt, format_timestamp};
use crate::workflow::{self, tone, EntityKind, Progress, Tone};

// ANSI escape codes for terminal formatting
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";

const ANSI_FG_RED: &str = "\x1b[31m";
const ANSI_FG_GREEN: &str = "\x1b[32m";
const ANSI_FG_YELLOW: &str = "\x1b[33m";
const ANSI_FG_BLUE: &str = "\x1b[34m";
const ANSI_FG_MAGENTA: &str = "\x1b[35m";
const ANSI_FG_BRIGHT_BLACK: &str = "\x1b[90m";

/// Narrowest a shrinkable column gets before the table overflows instead
const MIN_FLEX_WIDTH: usize = 12;

/// Check if stdout is a terminal (TTY)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width dynamically
///
/// Uses the `terminal_size` crate for reliable detection, with fallback to
/// COLUMNS environment variable and a sensible default.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        if w > 0 {
            return w as usize;
        }
    }

    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 && width < 10000 {
                return width;
            }
        }
    }

    120
}

/// Rendering settings: colors on a TTY, width from the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Render {
    pub color: bool,
    pub width: usize,
}

impl Render {
    pub fn detect() -> Self {
        Self {
            color: is_tty(),
            width: get_terminal_width(),
        }
    }

    /// No colors, fixed width
    pub fn plain(width: usize) -> Self {
        Self { color: false, width }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            format!("{}{}{}", ANSI_BOLD, text, ANSI_RESET)
        } else {
            text.to_string()
        }
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        match tone_color(tone) {
            Some(code) if self.color => format!("{}{}{}", code, text, ANSI_RESET),
            _ => text.to_string(),
        }
    }
}

fn tone_color(tone: Tone) -> Option<&'static str> {
    match tone {
        Tone::Neutral => None,
        Tone::Info => Some(ANSI_FG_BLUE),
        Tone::Success => Some(ANSI_FG_GREEN),
        Tone::Warning => Some(ANSI_FG_YELLOW),
        Tone::Danger => Some(ANSI_FG_RED),
        Tone::Accent => Some(ANSI_FG_MAGENTA),
    }
}

/// Table cell: plain text plus an optional tone
struct Cell {
    text: String,
    tone: Tone,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            text: if text.is_empty() { "-".to_string() } else { text },
            tone: Tone::Neutral,
        }
    }

    fn toned(text: impl Into<String>, kind: EntityKind) -> Self {
        let mut cell = Self::plain(text);
        cell.tone = tone(kind, &cell.text);
        cell
    }
}

fn truncate(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let mut out: String = text.chars().take(width - 3).collect();
    out.push_str("...");
    out
}

/// Lay out a table. `flex` names the column that shrinks when the table is
/// wider than the terminal.
fn format_table(render: &Render, headers: &[&str], rows: &[Vec<Cell>], flex: Option<usize>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.text.chars().count());
        }
    }

    let gaps = widths.len().saturating_sub(1);
    let total: usize = widths.iter().sum::<usize>() + gaps;
    if let Some(f) = flex {
        if total > render.width {
            let excess = total - render.width;
            let floor = MIN_FLEX_WIDTH.min(widths[f]);
            widths[f] = widths[f].saturating_sub(excess).max(floor);
        }
    }
    let total: usize = widths.iter().sum::<usize>() + gaps;

    let mut output = String::new();
    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<w$}", h, w = *w))
        .collect::<Vec<_>>()
        .join(" ");
    output.push_str(&render.bold(header_line.trim_end()));
    output.push('\n');
    output.push_str(&"-".repeat(total));
    output.push('\n');

    for row in rows {
        let last = row.len().saturating_sub(1);
        let line = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                let text = truncate(&cell.text, *w);
                let padding = if i == last { 0 } else { w - text.chars().count() };
                format!("{}{}", render.paint(&text, cell.tone), " ".repeat(padding))
            })
            .collect::<Vec<_>>()
            .join(" ");
        output.push_str(&line);
        output.push('\n');
    }
    output
}

fn heading(render: &Render, title: &str) -> String {
    let mut output = render.bold(title);
    output.push('\n');
    output.push_str(&"=".repeat(title.chars().count().max(60)));
    output.push_str("\n\n");
    output
}

fn field(output: &mut String, label: &str, value: &str) {
    let value = if value.trim().is_empty() { "-" } else { value };
    output.push_str(&format!("  {:<20} {}\n", format!("{}:", label), value));
}

fn opt_field(output: &mut String, label: &str, value: Option<&str>) {
    field(output, label, value.unwrap_or("-"));
}

fn num(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{}", v as i64),
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Lists

pub fn format_change_table(render: &Render, items: &[ChangeRequest]) -> String {
    let rows: Vec<Vec<Cell>> = items
        .iter()
        .map(|cr| {
            vec![
                Cell::plain(cr.id.as_str()),
                Cell::plain(cr.title.as_str()),
                Cell::toned(cr.change_type.as_str(), EntityKind::ChangeType),
                Cell::toned(cr.status.as_str(), EntityKind::ChangeRequest),
                Cell::plain(num(cr.risk_score)),
                Cell::plain(cr.dinas.clone().unwrap_or_default()),
                Cell::plain(format_opt(cr.created_at.as_deref())),
            ]
        })
        .collect();
    format_table(render, &["ID", "Title", "Type", "Status", "Risk", "Dinas", "Created"], &rows, Some(1))
}

pub fn format_approval_table(render: &Render, items: &[ChangeRequest]) -> String {
    let rows: Vec<Vec<Cell>> = items
        .iter()
        .map(|cr| {
            vec![
                Cell::plain(cr.id.as_str()),
                Cell::plain(cr.title.as_str()),
                Cell::toned(cr.change_type.as_str(), EntityKind::ChangeType),
                Cell::toned(cr.approval_status.as_str(), EntityKind::Approval),
                Cell::plain(cr.risk_level.clone().unwrap_or_default()),
                Cell::plain(cr.dinas.clone().unwrap_or_default()),
            ]
        })
        .collect();
    format_table(render, &["ID", "Title", "Type", "Approval", "Risk", "Dinas"], &rows, Some(1))
}

pub fn format_change_result_table(render: &Render, items: &[ChangeRequest]) -> String {
    let rows: Vec<Vec<Cell>> = items
        .iter()
        .map(|cr| {
            vec![
                Cell::plain(cr.tiket_id.clone().unwrap_or_default()),
                Cell::plain(cr.id.as_str()),
                Cell::plain(cr.title.as_str()),
                Cell::toned(cr.change_type.as_str(), EntityKind::ChangeType),
                Cell::toned(cr.status.as_str(), EntityKind::ChangeResult),
                Cell::plain(format_opt(cr.schedule_end.as_deref())),
            ]
        })
        .collect();
    format_table(render, &["Ticket", "CR", "Title", "Type", "Status", "Ended"], &rows, Some(2))
}

pub fn format_emergency_table(render: &Render, items: &[EmergencyTicket]) -> String {
    let rows: Vec<Vec<Cell>> = items
        .iter()
        .map(|t| {
            vec![
                Cell::plain(t.code.as_str()),
                Cell::plain(t.title.as_str()),
                Cell::toned(t.status.as_str(), EntityKind::Emergency),
                Cell::plain(t.impacted_asset_id.clone().unwrap_or_default()),
                Cell::plain(format_opt(t.created_at.as_deref())),
            ]
        })
        .collect();
    format_table(render, &["Code", "Title", "Status", "Asset", "Reported"], &rows, Some(1))
}

/// Patch job list; the last column shows what the role can do next
pub fn format_patch_job_table(render: &Render, items: &[PatchJob], role: Role) -> String {
    let rows: Vec<Vec<Cell>> = items
        .iter()
        .map(|job| {
            let action = access::patch_action(role, &job.status)
                .map(|a| a.label().to_string())
                .unwrap_or_default();
            vec![
                Cell::plain(job.id.as_str()),
                Cell::plain(job.scope.as_str()),
                Cell::plain(job.asset_code.as_str()),
                Cell::plain(job.version_change()),
                Cell::plain(format_date(&job.estimated_time)),
                Cell::plain(job.dinas.as_str()),
                Cell::toned(job.status.as_str(), EntityKind::PatchJob),
                Cell::plain(action),
            ]
        })
        .collect();
    format_table(
        render,
        &["ID", "Scope", "Asset", "Version", "Deadline", "Dinas", "Status", "Action"],
        &rows,
        Some(1),
    )
}

pub fn format_patch_result_table(render: &Render, items: &[PatchJob]) -> String {
    let rows: Vec<Vec<Cell>> = items
        .iter()
        .map(|job| {
            let done = job.results.iter().filter(|r| r.state == "Complete").count();
            vec![
                Cell::plain(job.id.as_str()),
                Cell::plain(job.scope.as_str()),
                Cell::plain(job.version_change()),
                Cell::plain(job.technician_name.clone().unwrap_or_default()),
                Cell::plain(format!("{}/{}", done, job.results.len())),
                Cell::toned(job.status.as_str(), EntityKind::PatchResult),
            ]
        })
        .collect();
    format_table(render, &["ID", "Scope", "Version", "Technician", "Assets", "Status"], &rows, Some(1))
}

pub fn format_schedule_table(render: &Render, items: &[PatchSchedule]) -> String {
    let rows: Vec<Vec<Cell>> = items
        .iter()
        .map(|s| {
            vec![
                Cell::plain(s.id.as_str()),
                Cell::plain(s.patch_id.as_str()),
                Cell::plain(s.title.as_str()),
                Cell::plain(format_date(&s.date)),
                Cell::plain(s.time.as_str()),
                Cell::plain(s.assignee.as_str()),
                Cell::toned(s.status.as_str(), EntityKind::Schedule),
            ]
        })
        .collect();
    format_table(render, &["ID", "Patch", "Title", "Date", "Time", "Assignee", "Status"], &rows, Some(2))
}

pub fn format_asset_table(render: &Render, items: &[Asset]) -> String {
    let rows: Vec<Vec<Cell>> = items
        .iter()
        .map(|a| {
            vec![
                Cell::plain(a.id.as_str()),
                Cell::plain(a.kode_bmd.as_str()),
                Cell::plain(a.name.as_str()),
                Cell::plain(a.category.as_str()),
                Cell::plain(a.serial_number.as_str()),
                Cell::toned(a.condition.as_str(), EntityKind::AssetCondition),
                Cell::toned(a.status.as_str(), EntityKind::Asset),
                Cell::plain(a.dinas.as_str()),
            ]
        })
        .collect();
    format_table(
        render,
        &["ID", "Kode BMD", "Name", "Category", "Serial", "Condition", "Status", "Dinas"],
        &rows,
        Some(2),
    )
}

pub fn format_asset_groups(render: &Render, groups: &[AssetGroup], label: &str) -> String {
    let mut output = String::new();
    for group in groups {
        output.push_str(&render.bold(&format!("{} {} ({})", label, group.name, group.count)));
        output.push('\n');
        if !group.assets.is_empty() {
            output.push_str(&format_asset_table(render, &group.assets));
        }
        output.push('\n');
    }
    output
}

pub fn format_history_table(render: &Render, items: &[AssetHistoryEntry]) -> String {
    let rows: Vec<Vec<Cell>> = items
        .iter()
        .map(|h| {
            vec![
                Cell::plain(h.id.as_str()),
                Cell::plain(h.change_type.as_str()),
                Cell::plain(h.before.as_str()),
                Cell::plain(h.after.as_str()),
                Cell::plain(h.changed_by.as_str()),
                Cell::plain(format_timestamp(&h.changed_at)),
            ]
        })
        .collect();
    format_table(render, &["ID", "Change", "Before", "After", "By", "When"], &rows, Some(3))
}

pub fn format_relation_table(render: &Render, items: &[AssetRelation]) -> String {
    let rows: Vec<Vec<Cell>> = items
        .iter()
        .map(|r| {
            vec![
                Cell::plain(r.bmd_id.as_str()),
                Cell::plain(r.nama.as_str()),
                Cell::plain(r.kategori.clone().unwrap_or_default()),
                Cell::plain(r.relasi.clone().unwrap_or_default()),
                Cell::plain(r.keterangan.clone().unwrap_or_default()),
            ]
        })
        .collect();
    format_table(render, &["BMD", "Name", "Category", "Relation", "Note"], &rows, Some(4))
}

pub fn format_specification(render: &Render, spec: &AssetSpecification) -> String {
    let mut output = heading(render, "Specifications");
    for (key, value) in &spec.entries {
        field(&mut output, key, value);
    }
    output
}

pub fn format_patch_options(render: &Render, options: &PatchJobOptions) -> String {
    let mut output = render.bold("Agencies");
    output.push('\n');
    for agency in &options.agencies {
        output.push_str(&format!("  {}\n", agency));
    }
    output.push('\n');
    let rows: Vec<Vec<Cell>> = options
        .assets
        .iter()
        .map(|(id, label)| vec![Cell::plain(id.as_str()), Cell::plain(label.as_str())])
        .collect();
    output.push_str(&format_table(render, &["Asset", "Name"], &rows, Some(1)));
    output
}

// ---------------------------------------------------------------------------
// Details

/// Stage checklist for a workflow record
pub fn format_progress(render: &Render, progress: &Progress) -> String {
    let mut output = String::from("Workflow:\n");
    for stage in &progress.stages {
        let mark = if stage.complete { "[x]" } else { "[ ]" };
        let line = if stage.current {
            format!("  {} {}  <- current", mark, stage.label)
        } else {
            format!("  {} {}", mark, stage.label)
        };
        if stage.current {
            output.push_str(&render.paint(&line, Tone::Success));
        } else if !stage.complete && render.color {
            output.push_str(&format!("{}{}{}", ANSI_FG_BRIGHT_BLACK, line, ANSI_RESET));
        } else {
            output.push_str(&line);
        }
        output.push('\n');
    }
    if let Some(note) = &progress.note {
        output.push_str(&format!("  Note: {}\n", note));
    }
    output
}

pub fn format_change_detail(render: &Render, cr: &ChangeRequest, gate: Option<&ApprovalGate>) -> String {
    let mut output = heading(render, &format!("Change Request {}: {}", cr.id, cr.title));

    output.push_str("Summary:\n");
    field(&mut output, "Status", &render.paint(&cr.status, tone(EntityKind::ChangeRequest, &cr.status)));
    field(&mut output, "Approval", &render.paint(cr.decision_label(), tone(EntityKind::Approval, cr.decision_label())));
    field(&mut output, "Type", &cr.change_type);
    opt_field(&mut output, "Ticket", cr.tiket_id.as_deref());
    opt_field(&mut output, "Dinas", cr.dinas.as_deref());
    opt_field(&mut output, "Asset", cr.asset_id.as_deref());
    opt_field(&mut output, "CI", cr.ci_id.as_deref());
    opt_field(&mut output, "Catalog", cr.katalog_permintaan.as_deref());
    opt_field(&mut output, "Source", cr.source.as_deref());
    field(&mut output, "Created", &format_opt(cr.created_at.as_deref()));
    output.push('\n');

    if let Some(description) = &cr.description {
        output.push_str("Description:\n");
        output.push_str(&format!("  {}\n\n", description));
    }

    output.push_str("Plan:\n");
    opt_field(&mut output, "Reason", cr.alasan.as_deref());
    opt_field(&mut output, "Goal", cr.tujuan.as_deref());
    opt_field(&mut output, "Implementation", cr.rencana_implementasi.as_deref());
    opt_field(&mut output, "Rollback", cr.rencana_rollback.as_deref());
    opt_field(&mut output, "Proposed schedule", cr.usulan_jadwal.as_deref());
    opt_field(&mut output, "Estimated cost", cr.estimasi_biaya.as_deref());
    opt_field(&mut output, "Estimated time", cr.estimasi_waktu.as_deref());
    field(&mut output, "Schedule start", &format_opt(cr.schedule_start.as_deref()));
    field(&mut output, "Schedule end", &format_opt(cr.schedule_end.as_deref()));
    opt_field(&mut output, "PIC", cr.pic_implementation.as_deref());
    output.push('\n');

    output.push_str("Risk:\n");
    field(&mut output, "Score", &num(cr.risk_score));
    opt_field(&mut output, "Level", cr.risk_level.as_deref());
    field(&mut output, "Impact", &num(cr.skor_dampak));
    field(&mut output, "Likelihood", &num(cr.skor_kemungkinan));
    field(&mut output, "Exposure", &num(cr.skor_exposure));
    opt_field(&mut output, "Impact description", cr.impact_desc.as_deref());
    opt_field(&mut output, "Existing control", cr.control_existing.as_deref());
    opt_field(&mut output, "Control effectiveness", cr.control_effectiveness.as_deref());
    opt_field(&mut output, "Mitigation", cr.mitigation_plan.as_deref());
    output.push('\n');

    output.push_str(&format_progress(render, &workflow::progress(&workflow::CHANGE_REQUEST, &cr.status)));

    if let Some(gate) = gate {
        output.push('\n');
        match gate {
            ApprovalGate::Open(actions) => {
                let names: Vec<&str> = actions.iter().map(|a| a.endpoint()).collect();
                output.push_str(&format!("Actions: {}\n", names.join(", ")));
                output.push_str(&format!("  changedesk approvals <action> {} [--note <text>]\n", cr.id));
            }
            ApprovalGate::Processed(status) => {
                output.push_str(&format!("This request was already processed with status: {}\n", status));
            }
            ApprovalGate::NotPermitted => {
                output.push_str("Your role cannot decide on this change request.\n");
            }
        }
    }
    output
}

pub fn format_emergency_detail(render: &Render, ticket: &EmergencyTicket) -> String {
    let mut output = heading(render, &format!("Emergency {}: {}", ticket.code, ticket.title));
    field(&mut output, "Status", &render.paint(&ticket.status, tone(EntityKind::Emergency, &ticket.status)));
    opt_field(&mut output, "Impacted asset", ticket.impacted_asset_id.as_deref());
    opt_field(&mut output, "Reporter", ticket.reporter_id.as_deref());
    field(&mut output, "Reported", &format_opt(ticket.created_at.as_deref()));
    field(&mut output, "Updated", &format_opt(ticket.updated_at.as_deref()));
    opt_field(&mut output, "Photo", ticket.photo_url.as_deref());
    output.push('\n');
    if let Some(description) = &ticket.description {
        output.push_str("Description:\n");
        output.push_str(&format!("  {}\n\n", description));
    }
    if let Some(note) = &ticket.note {
        output.push_str("Note:\n");
        output.push_str(&format!("  {}\n\n", note));
    }
    if !ticket.impacted_assets.is_empty() {
        output.push_str("Impacted assets:\n");
        for asset in &ticket.impacted_assets {
            output.push_str(&format!("  - {}\n", asset));
        }
    }
    output
}

pub fn format_patch_job_detail(render: &Render, job: &PatchJob, role: Role) -> String {
    let mut output = heading(render, &format!("Patch Job {}: {}", job.id, job.scope));
    let parsed = job.parsed_status();
    field(&mut output, "Status", &render.paint(&job.status, tone(EntityKind::PatchJob, &job.status)));
    if let Some(status) = parsed {
        let (title, description) = status.describe();
        field(&mut output, "Stage", &format!("{}. {}", title, description));
    }
    field(&mut output, "Asset", &job.asset_code);
    field(&mut output, "Category", &job.type_category);
    field(&mut output, "Sub-category", &job.sub_category);
    field(&mut output, "Version", &job.version_change());
    opt_field(&mut output, "Patch version", job.patch_version.as_deref());
    opt_field(&mut output, "Target group", job.target_group.as_deref());
    field(&mut output, "Deadline", &format_timestamp(&job.estimated_time));
    field(&mut output, "Dinas", &job.dinas);
    opt_field(&mut output, "Technician", job.technician_name.as_deref());
    field(&mut output, "Start", &format_opt(job.start_date.as_deref()));
    field(&mut output, "End", &format_opt(job.end_date.as_deref()));
    output.push('\n');

    if let Some(description) = &job.description {
        output.push_str("Description:\n");
        output.push_str(&format!("  {}\n\n", description));
    }

    // Progress uses the canonical label so `Deploy` lands on `Deploying`
    let status_label = parsed.map(|s| s.label()).unwrap_or(job.status.as_str());
    output.push_str(&format_progress(render, &workflow::progress(&workflow::PATCH_JOB, status_label)));

    if !job.results.is_empty() {
        output.push_str("\nResults:\n");
        let rows: Vec<Vec<Cell>> = job
            .results
            .iter()
            .map(|r| vec![Cell::plain(r.asset_id.as_str()), Cell::toned(r.state.as_str(), EntityKind::ExecutionState)])
            .collect();
        output.push_str(&format_table(render, &["Asset", "State"], &rows, None));
    }

    if let Some(action) = access::patch_action(role, &job.status) {
        output.push_str(&format!("\nNext action: {}\n", action.label()));
    }
    output
}

pub fn format_asset_detail(render: &Render, asset: &Asset, role: Role) -> String {
    let title = if asset.name.is_empty() { asset.kode_bmd.as_str() } else { asset.name.as_str() };
    let mut output = heading(render, &format!("Asset {}: {}", asset.kode_bmd, title));
    field(&mut output, "ID", &asset.id);
    field(&mut output, "Name", &asset.name);
    field(&mut output, "Category", &asset.category);
    field(&mut output, "Sub-category", &asset.sub_category);
    opt_field(&mut output, "Type", asset.category_type.as_deref());
    field(&mut output, "Serial", &asset.serial_number);
    opt_field(&mut output, "Brand", asset.merk.as_deref());
    opt_field(&mut output, "Model", asset.model.as_deref());
    field(&mut output, "Condition", &render.paint(&asset.condition, tone(EntityKind::AssetCondition, &asset.condition)));
    field(&mut output, "Status", &render.paint(&asset.status, tone(EntityKind::Asset, &asset.status)));
    field(&mut output, "Location", &asset.location);
    opt_field(&mut output, "Room", asset.ruangan.as_deref());
    field(&mut output, "Dinas", &asset.dinas);
    field(&mut output, "Acquisition value", &num(asset.nilai_perolehan));
    field(&mut output, "Acquired", &format_opt(asset.tanggal_perolehan.as_deref()));
    field(&mut output, "SIMARA ID", &asset.simara_id.map(|id| id.to_string()).unwrap_or_default());
    field(&mut output, "Updated", &format_opt(asset.updated_at.as_deref()));

    if access::can_edit_asset(role) {
        output.push_str(&format!("\nEditable fields: {}\n", AssetUpdate::FIELDS.join(", ")));
    }
    output
}

/// Key/value listing of an arbitrary JSON object (profile, approval role)
pub fn format_object(render: &Render, title: &str, value: &Value) -> String {
    let mut output = heading(render, title);
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                let text = match v {
                    Value::String(s) => s.clone(),
                    Value::Null => "-".to_string(),
                    other => other.to_string(),
                };
                field(&mut output, key, &text);
            }
        }
        Value::Null => output.push_str("  (empty)\n"),
        other => output.push_str(&format!("  {}\n", other)),
    }
    output
}

pub fn format_user(render: &Render, user: &UserProfile) -> String {
    let mut output = heading(render, &format!("Signed in as {}", user.username));
    field(&mut output, "Name", &user.name);
    field(&mut output, "Role", user.role.as_str());
    opt_field(&mut output, "API role", user.api_role.as_deref());
    opt_field(&mut output, "Email", user.email.as_deref());
    opt_field(&mut output, "Instansi", user.instansi.as_deref());
    output
}

/// Role summary: approval types and capabilities
pub fn format_role(render: &Render, role: Role) -> String {
    let mut output = render.bold(role.as_str());
    output.push('\n');
    let types: Vec<&str> = access::accessible_types(role).iter().map(|t| t.as_str()).collect();
    let types = if types.is_empty() { "none".to_string() } else { types.join(", ") };
    field(&mut output, "Approval types", &types);
    let caps: Vec<&str> = access::capabilities(role).iter().map(|c| c.as_str()).collect();
    field(&mut output, "Capabilities", &caps.join(", "));
    output
}

pub fn format_dashboard(render: &Render, summary: &DashboardSummary, trend: &[WeeklyTrendPoint]) -> String {
    let mut output = heading(render, "Dashboard");
    field(&mut output, "Submitted today", &summary.total_today.to_string());
    field(&mut output, "Pending inspection", &summary.pending_inspection.to_string());
    field(&mut output, "Awaiting schedule", &summary.approved_waiting_schedule.to_string());
    field(&mut output, "Scheduled today", &summary.today_schedules.to_string());
    output.push('\n');

    if trend.is_empty() {
        output.push_str("No weekly trend data.\n");
        return output;
    }
    output.push_str("Weekly trend:\n");
    let rows: Vec<Vec<Cell>> = trend
        .iter()
        .map(|p| {
            vec![
                Cell::plain(p.day.as_str()),
                Cell::plain(format_date(&p.date)),
                Cell::plain(p.submitted.to_string()),
                Cell::plain(p.inspected.to_string()),
                Cell::plain(p.implemented.to_string()),
            ]
        })
        .collect();
    output.push_str(&format_table(render, &["Day", "Date", "Submitted", "Inspected", "Implemented"], &rows, None));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long title here", 10), "a long ...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_table_layout_plain() {
        let render = Render::plain(120);
        let rows = vec![vec![Cell::plain("1"), Cell::plain("Alpha")], vec![Cell::plain("22"), Cell::plain("")]];
        let table = format_table(&render, &["ID", "Name"], &rows, Some(1));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID Name");
        assert_eq!(lines[1], "--------");
        assert_eq!(lines[2], "1  Alpha");
        assert_eq!(lines[3], "22 -");
    }

    #[test]
    fn test_flex_column_shrinks_to_width() {
        let render = Render::plain(30);
        let rows = vec![vec![Cell::plain("CR-1"), Cell::plain("x".repeat(60)), Cell::plain("Approved")]];
        let table = format_table(&render, &["ID", "Title", "Status"], &rows, Some(1));
        for line in table.lines() {
            assert!(line.chars().count() <= 30, "{}", line);
        }
        assert!(table.contains("..."));
    }

    #[test]
    fn test_no_ansi_without_color() {
        let render = Render::plain(120);
        let cr = ChangeRequest::from_json(&json!({"cr_id": "CR-1", "title": "t", "status": "Approved", "type": "major"}));
        let table = format_change_table(&render, &[cr]);
        assert!(!table.contains('\x1b'));
        let colored = Render { color: true, width: 120 };
        let cr = ChangeRequest::from_json(&json!({"cr_id": "CR-1", "title": "t", "status": "Approved"}));
        assert!(format_change_table(&colored, &[cr]).contains(ANSI_FG_GREEN));
    }

    #[test]
    fn test_progress_rendering() {
        let render = Render::plain(80);
        let text = format_progress(&render, &workflow::progress(&workflow::CHANGE_REQUEST, "Approved"));
        assert!(text.contains("[x] Submitted"));
        assert!(text.contains("[x] Approved  <- current"));
        assert!(text.contains("[ ] Scheduled"));

        let text = format_progress(&render, &workflow::progress(&workflow::CHANGE_REQUEST, "Cancelled"));
        assert!(text.contains("Note: status 'Cancelled' is not part of this workflow"));
    }

    #[test]
    fn test_patch_detail_maps_deploy_to_deploying() {
        let render = Render::plain(100);
        let job = PatchJob::from_json(&json!({"job_id": "J1", "scope_asset": "Web", "status": "Deploy"}));
        let text = format_patch_job_detail(&render, &job, Role::Teknisi);
        assert!(text.contains("[x] Deploying  <- current"));
        assert!(text.contains("Next action: Finish"));
    }

    #[test]
    fn test_change_detail_gate_messages() {
        let render = Render::plain(100);
        let cr = ChangeRequest::from_json(&json!({"cr_id": "CR-9", "title": "t", "approval_status": "APPROVED"}));
        let text = format_change_detail(&render, &cr, Some(&ApprovalGate::Processed("APPROVED".to_string())));
        assert!(text.contains("already processed with status: APPROVED"));

        let pending = ChangeRequest::from_json(&json!({"cr_id": "CR-9", "title": "t", "approval_status": "PENDING"}));
        let open = ApprovalGate::Open(access::ApprovalAction::ALL.to_vec());
        let text = format_change_detail(&render, &pending, Some(&open));
        assert!(text.contains("Actions: approve, reject, need-info"));
        assert!(text.contains("changedesk approvals <action> CR-9 [--note <text>]"));
    }

    #[test]
    fn test_finished_patch_job_has_no_stage() {
        let render = Render::plain(100);
        let job = PatchJob::from_json(&json!({"job_id": "J1", "status": "completed"}));
        let text = format_patch_job_detail(&render, &job, Role::Teknisi);
        assert!(text.contains("[ ] Created"));
        assert!(text.contains("status 'Finished' is not part of this workflow"));
        assert!(text.contains("Next action: Completed"));
    }

    #[test]
    fn test_role_summary_without_approval_types() {
        let text = format_role(&Render::plain(80), Role::Teknisi);
        assert!(text.lines().any(|l| l.contains("Approval types:") && l.ends_with(" none")));
        assert!(!text.contains("view-approvals"));
        assert!(text.contains("edit-asset"));
    }

    #[test]
    fn test_role_summary() {
        let text = format_role(&Render::plain(80), Role::Kabid);
        assert!(text.contains("standard, major"));
        assert!(text.contains("view-approvals"));
    }
}
