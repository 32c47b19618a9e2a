use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};

use crate::config::StoreMode;
use crate::filter::Choice;
use crate::models::{
    CallOutcome, EntityId, FollowUpStatus, FollowUpType, LeadStatus, Priority, UserStatus,
};
use ui::{parse_date, parse_time};

pub mod calls;
pub mod dashboard;
pub mod display;
pub mod follow_ups;
pub mod leads;
pub mod menu;
pub mod session;
pub mod settings;
pub mod ui;
pub mod users;

pub use calls::run_calls;
pub use dashboard::run_dashboard;
pub use follow_ups::run_follow_ups;
pub use leads::run_leads;
pub use menu::run_menu;
pub use session::{Session, View};
pub use settings::run_config;
pub use users::run_users;

#[derive(Parser)]
#[command(name = "leadmgr")]
#[command(about = "Sales leads, follow-ups and team tracking for the command line")]
#[command(version)]
pub struct Cli {
    /// Store mode: mock (sample data in memory) or live (users from the backend)
    #[arg(long, global = true, value_name = "MODE")]
    pub mode: Option<StoreMode>,
    /// Backend URL without the API prefix, e.g. http://localhost:5000
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Headline figures across leads, follow-ups, calls and the team
    Dashboard,
    /// Manage sales leads
    #[command(subcommand)]
    Leads(LeadCommand),
    /// Manage the sales team
    #[command(subcommand)]
    Users(UserCommand),
    /// Manage follow-up reminders
    #[command(subcommand)]
    FollowUps(FollowUpCommand),
    /// Call history
    #[command(subcommand)]
    Calls(CallCommand),
    /// Show or change persisted settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

// ============================================================================
// Leads
// ============================================================================

#[derive(Subcommand)]
pub enum LeadCommand {
    /// List leads matching a search and filters
    List(LeadListArgs),
    /// Add a lead (prompts when no fields are given)
    Add(LeadAddArgs),
    /// Change fields of a lead (prompts when no fields are given)
    Update(LeadUpdateArgs),
    /// Delete a lead
    Delete(DeleteArgs),
    /// Log a call with a lead and update its last contact date
    Call(LeadCallArgs),
}

#[derive(Args, Default)]
pub struct LeadListArgs {
    /// Match company or contact name
    #[arg(short, long, default_value = "")]
    pub search: String,
    #[arg(long, default_value = "all")]
    pub status: Choice<LeadStatus>,
    #[arg(long, default_value = "all")]
    pub priority: Choice<Priority>,
    #[arg(long, default_value = "all")]
    pub assignee: Choice<String>,
}

#[derive(Args, Default)]
pub struct LeadAddArgs {
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub status: Option<LeadStatus>,
    #[arg(long)]
    pub priority: Option<Priority>,
    #[arg(long)]
    pub assignee: Option<String>,
    /// YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    pub next_follow_up: Option<NaiveDate>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl LeadAddArgs {
    pub fn is_empty(&self) -> bool {
        self.company.is_none()
            && self.contact.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.next_follow_up.is_none()
            && self.notes.is_none()
    }
}

#[derive(Args)]
pub struct LeadUpdateArgs {
    pub id: EntityId,
    #[command(flatten)]
    pub fields: LeadAddArgs,
}

#[derive(Args)]
pub struct LeadCallArgs {
    pub id: EntityId,
    #[arg(long, default_value = "connected")]
    pub outcome: CallOutcome,
    /// Call length in minutes
    #[arg(long, default_value_t = 0)]
    pub duration: u32,
    #[arg(long, default_value = "")]
    pub notes: String,
}

// ============================================================================
// Users
// ============================================================================

#[derive(Subcommand)]
pub enum UserCommand {
    /// List team members matching a search and filters
    List(UserListArgs),
    /// Add a team member (prompts when no fields are given)
    Add(UserAddArgs),
    /// Change fields of a team member (prompts when no fields are given)
    Update(UserUpdateArgs),
    /// Remove a team member
    Delete(DeleteArgs),
    /// Team counts by status and role
    Stats,
}

#[derive(Args, Default)]
pub struct UserListArgs {
    /// Match name or email
    #[arg(short, long, default_value = "")]
    pub search: String,
    #[arg(long, default_value = "all")]
    pub role: Choice<String>,
    #[arg(long, default_value = "all")]
    pub status: Choice<UserStatus>,
}

#[derive(Args, Default)]
pub struct UserAddArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub status: Option<UserStatus>,
}

impl UserAddArgs {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.role.is_none()
            && self.department.is_none()
            && self.status.is_none()
    }
}

#[derive(Args)]
pub struct UserUpdateArgs {
    pub id: EntityId,
    #[command(flatten)]
    pub fields: UserAddArgs,
    #[arg(long)]
    pub leads_assigned: Option<u32>,
    #[arg(long)]
    pub leads_converted: Option<u32>,
}

// ============================================================================
// Follow-ups
// ============================================================================

#[derive(Subcommand)]
pub enum FollowUpCommand {
    /// List follow-ups matching a search and filters
    List(FollowUpListArgs),
    /// Schedule a follow-up (prompts when no fields are given)
    Add(FollowUpAddArgs),
    /// Mark a follow-up as completed today
    Complete(IdArgs),
    /// Cancel a follow-up
    Cancel(IdArgs),
    /// Delete a follow-up
    Delete(DeleteArgs),
    /// Due today, overdue, pending and recently completed counts
    Stats,
}

#[derive(Args, Default)]
pub struct FollowUpListArgs {
    /// Match lead name or assignee
    #[arg(short, long, default_value = "")]
    pub search: String,
    /// Status as of today; past pending follow-ups count as overdue
    #[arg(long, default_value = "all")]
    pub status: Choice<FollowUpStatus>,
    #[arg(long, default_value = "all")]
    pub priority: Choice<Priority>,
    #[arg(long, default_value = "all")]
    pub assignee: Choice<String>,
}

#[derive(Args, Default)]
pub struct FollowUpAddArgs {
    /// Lead id; fills in the lead name
    #[arg(long)]
    pub lead: Option<EntityId>,
    #[arg(long)]
    pub lead_name: Option<String>,
    #[arg(long)]
    pub assignee: Option<String>,
    #[arg(long = "type")]
    pub kind: Option<FollowUpType>,
    #[arg(long)]
    pub priority: Option<Priority>,
    /// YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
    /// HH:MM
    #[arg(long, value_parser = parse_time)]
    pub time: Option<NaiveTime>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl FollowUpAddArgs {
    pub fn is_empty(&self) -> bool {
        self.lead.is_none()
            && self.lead_name.is_none()
            && self.assignee.is_none()
            && self.kind.is_none()
            && self.priority.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.description.is_none()
            && self.notes.is_none()
    }
}

// ============================================================================
// Calls
// ============================================================================

#[derive(Subcommand)]
pub enum CallCommand {
    /// List calls matching a search and outcome
    List(CallListArgs),
}

#[derive(Args, Default)]
pub struct CallListArgs {
    /// Match lead name or caller
    #[arg(short, long, default_value = "")]
    pub search: String,
    #[arg(long, default_value = "all")]
    pub outcome: Choice<CallOutcome>,
}

// ============================================================================
// Config and shared
// ============================================================================

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show effective configuration and stored settings
    Show,
    /// Store a setting (mode, api_url, api_prefix)
    Set { key: String, value: String },
    /// Remove a stored setting
    Unset { key: String },
}

#[derive(Args)]
pub struct IdArgs {
    pub id: EntityId,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: EntityId,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}
