//! Command-line surface for `datamgr-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use datamgr::config::ConfigArgs;

#[derive(Parser, Debug)]
#[command(
    name = "datamgr-cli",
    version,
    about = "Multi-cloud data manager console CLI",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Form fields as the console would submit them.
#[derive(Args, Debug, Clone, Default)]
pub struct FormArgs {
    /// Form field `name=value`; `name=@path` attaches a file. Repeatable.
    #[arg(short = 'f', long = "field", value_name = "NAME=VALUE")]
    pub fields: Vec<String>,

    /// File with one `name=value` per line, read before `--field` values
    #[arg(long, value_name = "PATH")]
    pub fields_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate test data (linux, windows, s3, gcp, ncp, mysql, dynamodb, firestore, mongodb)
    Generate {
        target: String,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Migrate between storage services (objectstorage, rdbms, nrdbms)
    Migrate {
        service: String,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Per-pair migration route, e.g. `migration s3 ncp`
    Migration {
        source: String,
        dest: Option<String>,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Back up a service to local storage (objectstorage, rdbms, nrdbms)
    Backup {
        service: String,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Restore a service from a backup (objectstorage, rdb, nrdb)
    Restore {
        service: String,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Stored cloud credentials
    Credentials(CredentialsArgs),
    /// Server-side tasks
    Tasks(TasksArgs),
    /// Test infrastructure provisioning
    Service(ServiceArgs),
}

#[derive(Parser, Debug)]
pub struct CredentialsArgs {
    #[command(subcommand)]
    pub action: CredentialsCmd,
}

#[derive(Subcommand, Debug)]
pub enum CredentialsCmd {
    /// Register a credential
    Create {
        #[arg(long)]
        csp_type: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        credential_json: Option<String>,
        #[arg(long)]
        credential_json_file: Option<PathBuf>,
    },
    /// List credentials, optionally for one provider
    List {
        #[arg(long)]
        csp_type: Option<String>,
        /// Print `id<TAB>label` lines instead of JSON
        #[arg(long, default_value_t = false)]
        labels: bool,
    },
    /// Get a credential by id
    Get { id: u64 },
    /// Update fields of a credential
    Update {
        id: u64,
        #[arg(long)]
        csp_type: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        credential_json: Option<String>,
        #[arg(long)]
        credential_json_file: Option<PathBuf>,
    },
    /// Delete a credential
    Delete { id: u64 },
}

#[derive(Parser, Debug)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub action: TasksCmd,
}

#[derive(Subcommand, Debug)]
pub enum TasksCmd {
    /// List tasks
    List,
    /// Get a task by id
    Get { id: String },
    /// Delete a task
    Delete { id: String },
}

#[derive(Parser, Debug)]
pub struct ServiceArgs {
    #[command(subcommand)]
    pub action: ServiceCmd,
}

#[derive(Subcommand, Debug)]
pub enum ServiceCmd {
    /// Provision test infrastructure
    Apply,
    /// Tear down test infrastructure
    Destroy,
    /// Remove every provisioned resource and local state
    ClearAll,
}
