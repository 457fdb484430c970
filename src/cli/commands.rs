use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use crate::access::{self, ApprovalAction};
use crate::actions::{self, ActionError};
use crate::api::{envelope, ApiClient, ClientConfig};
use crate::cli::abbrev;
use crate::cli::error::{user_error, validate_non_empty, validate_record_id};
use crate::cli::output::{self, Render};
use crate::filter::{self, parse_query, FilterKey, ListQuery};
use crate::models::fields::pick_str;
use crate::models::{AssetUpdate, NewPatchJob, PatchStatus, Role, UserProfile};
use crate::repo::{AssetGrouping, AssetRepo, ChangeRequestRepo, DashboardRepo, EmergencyRepo, PatchJobRepo, ScheduleRepo};
use crate::session::{self, SessionStore};
use crate::workflow::{self, StatusSequence};
use anyhow::Result;

#[derive(Parser)]
#[command(name = "changedesk")]
#[command(about = "Change Desk - IT change, patch and CMDB management from the command line")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        /// Username (a role name such as "kasi" signs in with that role)
        username: String,
        /// Password; prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and remove the stored session
    Logout,
    /// Show the signed-in user without contacting the server
    Whoami {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show the server-side profile of the signed-in user
    Profile {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Request a password reset message
    ForgotPassword {
        /// Email address or username of the account
        email: String,
    },
    /// Show today's counters and the weekly trend
    Dashboard {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Emergency tickets
    Emergency {
        #[command(subcommand)]
        subcommand: EmergencyCommands,
    },
    /// Change requests and their results
    Changes {
        #[command(subcommand)]
        subcommand: ChangeCommands,
    },
    /// Approval queue and decisions
    Approvals {
        #[command(subcommand)]
        subcommand: ApprovalCommands,
    },
    /// Patch jobs and their results
    PatchJobs {
        #[command(subcommand)]
        subcommand: PatchJobCommands,
    },
    /// Patch schedules
    Schedules {
        #[command(subcommand)]
        subcommand: ScheduleCommands,
    },
    /// CMDB assets
    Assets {
        #[command(subcommand)]
        subcommand: AssetCommands,
    },
    /// Show the stage checklist for a status
    Workflow {
        /// Workflow name: change-request or patch-job
        sequence: String,
        /// Status to place on the workflow (e.g. "Approved", "Partially Failed")
        #[arg(required = true)]
        status: Vec<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show approval types and capabilities per role
    Roles {
        /// Role name (teknisi, kasi, kabid, diskominfo); all roles when omitted
        role: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum EmergencyCommands {
    /// List emergency tickets
    List {
        /// Search text and filters (e.g. "status:Open router")
        filter: Vec<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show one emergency ticket
    Show {
        id: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ChangeCommands {
    /// List change requests
    List {
        /// Search text and filters (e.g. "type:major status:Approved")
        filter: Vec<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show one change request
    Show {
        id: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// List completed, failed and ended change requests
    Results {
        /// Search text and filters (e.g. "status:failed")
        filter: Vec<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show the result of one change request
    #[command(name = "result")]
    ShowResult {
        id: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ApprovalCommands {
    /// List change requests in your approval queue
    List {
        /// Search text and filters (e.g. "approval:PENDING type:major")
        filter: Vec<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show a change request with the decisions available to you
    Show {
        id: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Approve a change request
    Approve {
        id: String,
        /// Optional note
        #[arg(long)]
        note: Option<String>,
    },
    /// Reject a change request (note required)
    Reject {
        id: String,
        /// Reason for rejection
        #[arg(long)]
        note: Option<String>,
    },
    /// Ask the requester for more information (note required)
    NeedInfo {
        id: String,
        /// What information is needed
        #[arg(long)]
        note: Option<String>,
    },
    /// Show the approval role the server assigns to you
    Role {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum PatchJobCommands {
    /// List patch jobs
    List {
        /// Search text and filters (e.g. "status:assigned dinas:Diskominfo")
        filter: Vec<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show one patch job
    Show {
        id: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Create a patch job
    Create {
        /// Asset ID to patch
        #[arg(long)]
        asset: Option<String>,
        /// Current version
        #[arg(long)]
        before: Option<String>,
        /// Target version
        #[arg(long)]
        after: Option<String>,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
        /// Owning agency
        #[arg(long)]
        dinas: Option<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Send a created patch job to its technician
    Assign {
        id: String,
    },
    /// Show the agencies and assets a patch job can target
    Options {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// List finished patch jobs
    Results {
        /// Search text and filters (e.g. "status:Failed")
        filter: Vec<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show the result of one patch job
    #[command(name = "result")]
    ShowResult {
        id: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ScheduleCommands {
    /// List patch schedules
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum AssetCommands {
    /// List CMDB assets
    List {
        /// Search text over kode BMD, name and serial number; "status:<v>" filter
        filter: Vec<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show one asset
    Show {
        id: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show the change history of an asset
    History {
        id: String,
        /// Search text and filters (e.g. "change:lokasi by:budi")
        filter: Vec<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show items related to an asset
    Relations {
        id: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show the specifications of an asset
    Specs {
        id: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Update asset fields (e.g. "lokasi=Gedung B" "kondisi=Baik")
    Update {
        id: String,
        /// Field assignments as key=value
        #[arg(required = true)]
        fields: Vec<String>,
    },
    /// Show assets grouped by category
    ByCategory {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show assets grouped by type
    ByType {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

pub fn run() -> Result<()> {
    // Get raw args
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    // Check for version flag early (before any processing)
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("changedesk {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Expand command abbreviations before processing
    args = match abbrev::expand_command_abbreviations(args) {
        Ok(expanded) => expanded,
        Err(e) => {
            user_error(&e);
        }
    };

    // Build args vector with program name for clap
    let clap_args = std::iter::once("changedesk".to_string())
        .chain(args)
        .collect::<Vec<_>>();
    let cli = match Cli::try_parse_from(clap_args) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    handle_command(cli)
}

fn handle_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { username, password } => handle_login(username, password),
        Commands::Logout => handle_logout(),
        Commands::Whoami { json } => handle_whoami(json),
        Commands::Profile { json } => handle_profile(json),
        Commands::ForgotPassword { email } => handle_forgot_password(email),
        Commands::Dashboard { json } => handle_dashboard(json),
        Commands::Emergency { subcommand } => match subcommand {
            EmergencyCommands::List { filter, json } => handle_emergency_list(filter, json),
            EmergencyCommands::Show { id, json } => handle_emergency_show(id, json),
        },
        Commands::Changes { subcommand } => match subcommand {
            ChangeCommands::List { filter, json } => handle_changes_list(filter, json),
            ChangeCommands::Show { id, json } => handle_changes_show(id, json, false),
            ChangeCommands::Results { filter, json } => handle_change_results(filter, json),
            ChangeCommands::ShowResult { id, json } => handle_changes_show(id, json, true),
        },
        Commands::Approvals { subcommand } => match subcommand {
            ApprovalCommands::List { filter, json } => handle_approvals_list(filter, json),
            ApprovalCommands::Show { id, json } => handle_approvals_show(id, json),
            ApprovalCommands::Approve { id, note } => handle_decision(id, ApprovalAction::Approve, note),
            ApprovalCommands::Reject { id, note } => handle_decision(id, ApprovalAction::Reject, note),
            ApprovalCommands::NeedInfo { id, note } => handle_decision(id, ApprovalAction::NeedInfo, note),
            ApprovalCommands::Role { json } => handle_approval_role(json),
        },
        Commands::PatchJobs { subcommand } => match subcommand {
            PatchJobCommands::List { filter, json } => handle_patch_jobs_list(filter, json),
            PatchJobCommands::Show { id, json } => handle_patch_job_show(id, json, false),
            PatchJobCommands::Create { asset, before, after, deadline, dinas, json } => {
                let new_job = NewPatchJob {
                    asset_id: asset.unwrap_or_default(),
                    version_before: before.unwrap_or_default(),
                    version_after: after.unwrap_or_default(),
                    deadline: deadline.unwrap_or_default(),
                    dinas: dinas.unwrap_or_default(),
                };
                handle_patch_job_create(new_job, json)
            }
            PatchJobCommands::Assign { id } => handle_patch_job_assign(id),
            PatchJobCommands::Options { json } => handle_patch_job_options(json),
            PatchJobCommands::Results { filter, json } => handle_patch_results(filter, json),
            PatchJobCommands::ShowResult { id, json } => handle_patch_job_show(id, json, true),
        },
        Commands::Schedules { subcommand } => match subcommand {
            ScheduleCommands::List { json } => handle_schedules_list(json),
        },
        Commands::Assets { subcommand } => match subcommand {
            AssetCommands::List { filter, json } => handle_assets_list(filter, json),
            AssetCommands::Show { id, json } => handle_asset_show(id, json),
            AssetCommands::History { id, filter, json } => handle_asset_history(id, filter, json),
            AssetCommands::Relations { id, json } => handle_asset_relations(id, json),
            AssetCommands::Specs { id, json } => handle_asset_specs(id, json),
            AssetCommands::Update { id, fields } => handle_asset_update(id, fields),
            AssetCommands::ByCategory { json } => handle_asset_groups(AssetGrouping::Category, json),
            AssetCommands::ByType { json } => handle_asset_groups(AssetGrouping::Type, json),
        },
        Commands::Workflow { sequence, status, json } => handle_workflow(sequence, status, json),
        Commands::Roles { role } => handle_roles(role),
    }
}

/// Authenticated client plus the signed-in user
struct Desk {
    client: ApiClient,
    user: UserProfile,
}

impl Desk {
    fn connect() -> Result<Self> {
        let config = ClientConfig::resolve()?;
        let store = SessionStore::new(&config.session_path);
        let session = store.require()?;
        let client = ApiClient::connect(&config, Some(session.token))?;
        Ok(Self { client, user: session.user })
    }

    fn role(&self) -> Role {
        self.user.role
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse filter tokens and check them against the list's supported keys
fn parse_filters(tokens: &[String], allowed: &[FilterKey], list_name: &str) -> ListQuery {
    let query = parse_query(tokens).unwrap_or_else(|e| user_error(&e));
    query.ensure_keys(allowed, list_name).unwrap_or_else(|e| user_error(&e));
    query
}

/// List fetch failures are logged and shown as an empty list
fn fetch_or_empty<T>(result: Result<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        log::error!("{:#}", e);
        Vec::new()
    })
}

/// Detail fetch failures are logged and treated as not found
fn fetch_detail<T>(result: Result<Option<T>>) -> Option<T> {
    result.unwrap_or_else(|e| {
        log::error!("{:#}", e);
        None
    })
}

fn record_id(id: &str, what: &str) -> String {
    validate_record_id(id, what).unwrap_or_else(|e| user_error(&e))
}

fn action_failed(e: ActionError) -> ! {
    user_error(&e.to_string())
}

// ---------------------------------------------------------------------------
// Session

fn prompt_password() -> Result<String> {
    eprint!("Password: ");
    std::io::Write::flush(&mut std::io::stderr())
        .map_err(|e| anyhow::anyhow!("Failed to flush stderr: {}", e))?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)
        .map_err(|e| anyhow::anyhow!("Failed to read input: {}", e))?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

fn handle_login(username: String, password: Option<String>) -> Result<()> {
    validate_non_empty(&username, "Username").unwrap_or_else(|e| user_error(&e));
    let password = match password {
        Some(p) => p,
        None => prompt_password()?,
    };
    validate_non_empty(&password, "Password").unwrap_or_else(|e| user_error(&e));

    let config = ClientConfig::resolve()?;
    let store = SessionStore::new(&config.session_path);
    let client = ApiClient::connect(&config, None)?;

    match session::login(&client, &store, username.trim(), &password) {
        Ok(session) => {
            println!("Logged in as {} ({}).", session.user.name, session.user.role);
            Ok(())
        }
        Err(e) if !e.is_internal() => user_error(&e.to_string()),
        Err(e) => Err(e.into()),
    }
}

fn handle_logout() -> Result<()> {
    let config = ClientConfig::resolve()?;
    let store = SessionStore::new(&config.session_path);
    let Some(existing) = store.load()? else {
        println!("Not logged in.");
        return Ok(());
    };

    match ApiClient::connect(&config, Some(existing.token)) {
        Ok(client) => session::logout(&client, &store)?,
        Err(e) => {
            log::warn!("Could not reach the server, clearing local session anyway: {}", e);
            store.clear()?;
        }
    }
    println!("Logged out.");
    Ok(())
}

fn handle_whoami(json: bool) -> Result<()> {
    let config = ClientConfig::resolve()?;
    let store = SessionStore::new(&config.session_path);
    let session = store.require()?;
    if json {
        print_json(&session.user)
    } else {
        print!("{}", output::format_user(&Render::detect(), &session.user));
        Ok(())
    }
}

fn handle_profile(json: bool) -> Result<()> {
    let desk = Desk::connect()?;
    let profile = session::profile(&desk.client).unwrap_or_else(|e| user_error(&e.to_string()));
    if json {
        print_json(&profile)
    } else {
        print!("{}", output::format_object(&Render::detect(), "Profile", &profile));
        Ok(())
    }
}

fn handle_forgot_password(email: String) -> Result<()> {
    validate_non_empty(&email, "Email").unwrap_or_else(|e| user_error(&e));
    let config = ClientConfig::resolve()?;
    let client = ApiClient::connect(&config, None)?;
    session::forgot_password(&client, email.trim()).unwrap_or_else(|e| user_error(&e.to_string()));
    println!("Password reset instructions sent to {}.", email.trim());
    Ok(())
}

// ---------------------------------------------------------------------------
// Dashboard

fn handle_dashboard(json: bool) -> Result<()> {
    let desk = Desk::connect()?;
    let summary = DashboardRepo::summary(&desk.client).unwrap_or_else(|e| {
        log::error!("{:#}", e);
        Default::default()
    });
    let trend = fetch_or_empty(DashboardRepo::weekly_trend(&desk.client));

    if json {
        return print_json(&json!({ "summary": summary, "weekly_trend": trend }));
    }
    print!("{}", output::format_dashboard(&Render::detect(), &summary, &trend));
    Ok(())
}

// ---------------------------------------------------------------------------
// Emergency

fn handle_emergency_list(filter_args: Vec<String>, json: bool) -> Result<()> {
    let query = parse_filters(&filter_args, filter::EMERGENCY_KEYS, "emergency tickets");
    let desk = Desk::connect()?;
    let tickets = filter::filter_emergencies(fetch_or_empty(EmergencyRepo::list_all(&desk.client)), &query);

    if json {
        return print_json(&tickets);
    }
    if tickets.is_empty() {
        println!("No emergency tickets found.");
        return Ok(());
    }
    print!("{}", output::format_emergency_table(&Render::detect(), &tickets));
    Ok(())
}

fn handle_emergency_show(id: String, json: bool) -> Result<()> {
    let id = record_id(&id, "Emergency");
    let desk = Desk::connect()?;
    let Some(ticket) = fetch_detail(EmergencyRepo::get(&desk.client, &id)) else {
        user_error(&format!("Emergency ticket {} not found", id));
    };
    if json {
        return print_json(&ticket);
    }
    print!("{}", output::format_emergency_detail(&Render::detect(), &ticket));
    Ok(())
}

// ---------------------------------------------------------------------------
// Change requests

fn handle_changes_list(filter_args: Vec<String>, json: bool) -> Result<()> {
    let query = parse_filters(&filter_args, filter::CHANGE_KEYS, "change requests");
    let desk = Desk::connect()?;
    let changes = filter::filter_changes(fetch_or_empty(ChangeRequestRepo::list_all(&desk.client)), &query);

    if json {
        return print_json(&changes);
    }
    if changes.is_empty() {
        println!("No change requests found.");
        return Ok(());
    }
    print!("{}", output::format_change_table(&Render::detect(), &changes));
    Ok(())
}

fn handle_change_results(filter_args: Vec<String>, json: bool) -> Result<()> {
    let query = parse_filters(&filter_args, filter::CHANGE_KEYS, "change results");
    let desk = Desk::connect()?;
    let results = filter::filter_change_results(fetch_or_empty(ChangeRequestRepo::list_all(&desk.client)), &query);

    if json {
        return print_json(&results);
    }
    if results.is_empty() {
        println!("No change results found.");
        return Ok(());
    }
    print!("{}", output::format_change_result_table(&Render::detect(), &results));
    Ok(())
}

fn handle_changes_show(id: String, json: bool, result_only: bool) -> Result<()> {
    let id = record_id(&id, "Change request");
    let desk = Desk::connect()?;
    let Some(cr) = fetch_detail(ChangeRequestRepo::get(&desk.client, &id)) else {
        user_error(&format!("Change request {} not found", id));
    };
    if result_only && !cr.is_result() {
        user_error(&format!("Change request {} has no result yet (status: {})", id, cr.status));
    }
    if json {
        return print_json(&cr);
    }
    print!("{}", output::format_change_detail(&Render::detect(), &cr, None));
    Ok(())
}

// ---------------------------------------------------------------------------
// Approvals

fn handle_approvals_list(filter_args: Vec<String>, json: bool) -> Result<()> {
    let query = parse_filters(&filter_args, filter::APPROVAL_KEYS, "approvals");
    let desk = Desk::connect()?;
    let queue = filter::filter_approvals(
        fetch_or_empty(ChangeRequestRepo::list_all(&desk.client)),
        desk.role(),
        &query,
    );

    if json {
        return print_json(&queue);
    }
    if queue.is_empty() {
        println!("No change requests awaiting your approval found.");
        return Ok(());
    }
    print!("{}", output::format_approval_table(&Render::detect(), &queue));
    Ok(())
}

fn handle_approvals_show(id: String, json: bool) -> Result<()> {
    let id = record_id(&id, "Change request");
    let desk = Desk::connect()?;
    let Some(cr) = fetch_detail(ChangeRequestRepo::get(&desk.client, &id)) else {
        user_error(&format!("Change request {} not found", id));
    };
    if !access::can_view_change(desk.role(), &cr) {
        user_error(&format!("Change request {} is not in the {} approval queue", id, desk.role()));
    }
    if json {
        return print_json(&cr);
    }
    let gate = access::approval_gate(desk.role(), &cr);
    print!("{}", output::format_change_detail(&Render::detect(), &cr, Some(&gate)));
    Ok(())
}

fn handle_decision(id: String, action: ApprovalAction, note: Option<String>) -> Result<()> {
    let id = record_id(&id, "Change request");
    let note = note.unwrap_or_default();
    // A missing note is reported even when offline or signed out
    actions::validate_note(action, &note).unwrap_or_else(|e| action_failed(e));

    let desk = Desk::connect()?;
    actions::decide(&desk.client, desk.role(), &id, action, &note).unwrap_or_else(|e| action_failed(e));
    let verb = match action {
        ApprovalAction::Approve => "Approved",
        ApprovalAction::Reject => "Rejected",
        ApprovalAction::NeedInfo => "Requested more information on",
    };
    println!("{} change request {}.", verb, id);
    Ok(())
}

fn handle_approval_role(json: bool) -> Result<()> {
    let desk = Desk::connect()?;
    let role = ChangeRequestRepo::approval_role(&desk.client).unwrap_or_else(|e| user_error(&format!("{:#}", e)));
    if json {
        return print_json(&role);
    }
    print!("{}", output::format_object(&Render::detect(), "Approval role", &role));
    Ok(())
}

// ---------------------------------------------------------------------------
// Patch jobs

fn handle_patch_jobs_list(filter_args: Vec<String>, json: bool) -> Result<()> {
    let query = parse_filters(&filter_args, filter::PATCH_JOB_KEYS, "patch jobs");
    let desk = Desk::connect()?;
    let jobs = filter::filter_patch_jobs(fetch_or_empty(PatchJobRepo::list_all(&desk.client)), &query);

    if json {
        return print_json(&jobs);
    }
    if jobs.is_empty() {
        println!("No patch jobs found.");
        return Ok(());
    }
    print!("{}", output::format_patch_job_table(&Render::detect(), &jobs, desk.role()));
    Ok(())
}

fn handle_patch_results(filter_args: Vec<String>, json: bool) -> Result<()> {
    let query = parse_filters(&filter_args, filter::PATCH_RESULT_KEYS, "patch results");
    let desk = Desk::connect()?;
    let jobs = filter::filter_patch_results(fetch_or_empty(PatchJobRepo::list_all(&desk.client)), &query);

    if json {
        return print_json(&jobs);
    }
    if jobs.is_empty() {
        println!("No patch results found.");
        return Ok(());
    }
    print!("{}", output::format_patch_result_table(&Render::detect(), &jobs));
    Ok(())
}

fn handle_patch_job_show(id: String, json: bool, result_only: bool) -> Result<()> {
    let id = record_id(&id, "Patch job");
    let desk = Desk::connect()?;
    let Some(job) = fetch_detail(PatchJobRepo::get(&desk.client, &id)) else {
        user_error(&format!("Patch job {} not found", id));
    };
    if result_only && !job.is_result() {
        user_error(&format!("Patch job {} has no result yet (status: {})", id, job.status));
    }
    if json {
        return print_json(&job);
    }
    print!("{}", output::format_patch_job_detail(&Render::detect(), &job, desk.role()));
    Ok(())
}

fn handle_patch_job_create(new_job: NewPatchJob, json: bool) -> Result<()> {
    let desk = Desk::connect()?;
    let created = actions::create_patch_job(&desk.client, desk.role(), &new_job)
        .unwrap_or_else(|e| action_failed(e));

    if json {
        return print_json(&created.response);
    }
    match pick_str(envelope::payload(&created.response), &["job_id", "patch_id", "id"]) {
        Some(job_id) => println!("Created patch job {} for asset {}.", job_id, new_job.asset_id.trim()),
        None => println!("Created patch job for asset {}.", new_job.asset_id.trim()),
    }
    if !created.jobs.is_empty() {
        println!();
        print!("{}", output::format_patch_job_table(&Render::detect(), &created.jobs, desk.role()));
    }
    Ok(())
}

fn handle_patch_job_assign(id: String) -> Result<()> {
    let id = record_id(&id, "Patch job");
    let desk = Desk::connect()?;
    actions::assign_patch_job(&desk.client, desk.role(), &id).unwrap_or_else(|e| action_failed(e));
    println!("Sent patch job {} to the technician.", id);
    Ok(())
}

fn handle_patch_job_options(json: bool) -> Result<()> {
    let desk = Desk::connect()?;
    let options = PatchJobRepo::options(&desk.client).unwrap_or_else(|e| user_error(&format!("{:#}", e)));
    if json {
        return print_json(&options);
    }
    print!("{}", output::format_patch_options(&Render::detect(), &options));
    Ok(())
}

fn handle_schedules_list(json: bool) -> Result<()> {
    let desk = Desk::connect()?;
    let schedules = fetch_or_empty(ScheduleRepo::list_all(&desk.client));

    if json {
        return print_json(&schedules);
    }
    if schedules.is_empty() {
        println!("No patch schedules found.");
        return Ok(());
    }
    print!("{}", output::format_schedule_table(&Render::detect(), &schedules));
    Ok(())
}

// ---------------------------------------------------------------------------
// Assets

fn handle_assets_list(filter_args: Vec<String>, json: bool) -> Result<()> {
    let query = parse_filters(&filter_args, filter::ASSET_KEYS, "assets");
    let desk = Desk::connect()?;
    let assets = filter::filter_assets(fetch_or_empty(AssetRepo::list_all(&desk.client)), &query);

    if json {
        return print_json(&assets);
    }
    if assets.is_empty() {
        println!("No assets found.");
        return Ok(());
    }
    print!("{}", output::format_asset_table(&Render::detect(), &assets));
    Ok(())
}

fn handle_asset_show(id: String, json: bool) -> Result<()> {
    let id = record_id(&id, "Asset");
    let desk = Desk::connect()?;
    let Some(asset) = fetch_detail(AssetRepo::get(&desk.client, &id)) else {
        user_error(&format!("Asset {} not found", id));
    };
    if json {
        return print_json(&asset);
    }
    print!("{}", output::format_asset_detail(&Render::detect(), &asset, desk.role()));
    Ok(())
}

fn handle_asset_history(id: String, filter_args: Vec<String>, json: bool) -> Result<()> {
    let id = record_id(&id, "Asset");
    let query = parse_filters(&filter_args, filter::HISTORY_KEYS, "asset history");
    let desk = Desk::connect()?;
    let entries = filter::filter_history(fetch_or_empty(AssetRepo::history(&desk.client, &id)), &query);

    if json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No history found for asset {}.", id);
        return Ok(());
    }
    print!("{}", output::format_history_table(&Render::detect(), &entries));
    Ok(())
}

fn handle_asset_relations(id: String, json: bool) -> Result<()> {
    let id = record_id(&id, "Asset");
    let desk = Desk::connect()?;
    let relations = fetch_or_empty(AssetRepo::relations(&desk.client, &id));

    if json {
        return print_json(&relations);
    }
    if relations.is_empty() {
        println!("No relations found for asset {}.", id);
        return Ok(());
    }
    print!("{}", output::format_relation_table(&Render::detect(), &relations));
    Ok(())
}

fn handle_asset_specs(id: String, json: bool) -> Result<()> {
    let id = record_id(&id, "Asset");
    let desk = Desk::connect()?;
    let spec = AssetRepo::specifications(&desk.client, &id).unwrap_or_else(|e| {
        log::error!("{:#}", e);
        Default::default()
    });

    if json {
        return print_json(&spec);
    }
    if spec.is_empty() {
        println!("No specifications found for asset {}.", id);
        return Ok(());
    }
    print!("{}", output::format_specification(&Render::detect(), &spec));
    Ok(())
}

fn handle_asset_update(id: String, fields: Vec<String>) -> Result<()> {
    let id = record_id(&id, "Asset");
    let mut update = AssetUpdate::default();
    for assignment in &fields {
        let Some((key, value)) = assignment.split_once('=') else {
            user_error(&format!("Expected key=value, got '{}'", assignment));
        };
        update.set(key.trim(), value.trim()).unwrap_or_else(|e| user_error(&e));
    }

    let desk = Desk::connect()?;
    actions::update_asset(&desk.client, desk.role(), &id, &update).unwrap_or_else(|e| action_failed(e));
    println!("Updated asset {}.", id);
    Ok(())
}

fn handle_asset_groups(grouping: AssetGrouping, json: bool) -> Result<()> {
    let desk = Desk::connect()?;
    let groups = fetch_or_empty(AssetRepo::grouped(&desk.client, grouping));

    if json {
        return print_json(&groups);
    }
    if groups.is_empty() {
        println!("No assets found.");
        return Ok(());
    }
    let label = match grouping {
        AssetGrouping::Category => "Category",
        AssetGrouping::Type => "Type",
    };
    print!("{}", output::format_asset_groups(&Render::detect(), &groups, label));
    Ok(())
}

// ---------------------------------------------------------------------------
// Offline reference commands

fn handle_workflow(sequence: String, status: Vec<String>, json: bool) -> Result<()> {
    let Some(seq) = StatusSequence::by_name(&sequence) else {
        let names: Vec<&str> = StatusSequence::ALL.iter().map(|s| s.name).collect();
        user_error(&format!("Unknown workflow '{}'. Valid workflows: {}", sequence, names.join(", ")));
    };
    let status = status.join(" ");
    // Patch jobs are matched on the canonical label, as in the detail view
    let status = if seq == workflow::PATCH_JOB {
        PatchStatus::parse(&status).map(|s| s.label().to_string()).unwrap_or(status)
    } else {
        status
    };

    let progress = workflow::progress(&seq, &status);
    if json {
        return print_json(&progress);
    }
    print!("{}", output::format_progress(&Render::detect(), &progress));
    Ok(())
}

fn handle_roles(role: Option<String>) -> Result<()> {
    let render = Render::detect();
    let roles: Vec<Role> = match role {
        Some(name) => {
            let Some(role) = Role::from_str(&name) else {
                let names: Vec<&str> = Role::ALL.iter().map(Role::as_str).collect();
                user_error(&format!("Unknown role '{}'. Valid roles: {}", name, names.join(", ")));
            };
            vec![role]
        }
        None => Role::ALL.to_vec(),
    };
    let blocks: Vec<String> = roles.iter().map(|r| output::format_role(&render, *r)).collect();
    print!("{}", blocks.join("\n"));
    Ok(())
}
