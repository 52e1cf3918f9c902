use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use periop_core::models::patient::PatientQuery;
use periop_core::models::status::ScaleKind;
use periop_core::models::timepoint::Timepoint;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "periop",
    about = "Perioperative risk scales and physiological records",
    version
)]
pub struct Cli {
    /// Record directory. Overrides PERIOP_DATA_DIR and the configured directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the scale catalogue
    Scales,
    /// List timepoints T0 through T12 with their clinical meaning
    Timepoints,
    /// Score a scale payload without storing it
    Score(ScoreArgs),
    /// Register, inspect and remove patients
    Patient {
        #[command(subcommand)]
        command: PatientCommand,
    },
    /// Save, show and clear scale results
    Scale {
        #[command(subcommand)]
        command: ScaleCommand,
    },
    /// Show which scales and slices are filled for a patient
    Status { patient: Uuid },
    /// Save, show and clear physiological slices
    Slice {
        #[command(subcommand)]
        command: SliceCommand,
    },
    /// Summarise every stored result for a patient
    Summary { patient: Uuid },
    /// Create or inspect the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Scale id, e.g. stop_bang
    pub scale: String,
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// JSON payload file, or `-` for stdin
    #[arg(long, short)]
    pub input: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum PatientCommand {
    /// Register a patient from a JSON payload
    Register(InputArgs),
    Show { patient: Uuid },
    List,
    /// Change selected fields from a partial JSON payload
    Update {
        patient: Uuid,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Find patients by name, card number, age or inclusion date
    Search(SearchArgs),
    /// Remove a patient and every record filed under them
    Remove { patient: Uuid },
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub patronymic: Option<String>,
    /// Age in completed years at inclusion
    #[arg(long)]
    pub age: Option<i16>,
    #[arg(long)]
    pub card_number: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub inclusion_date: Option<jiff::civil::Date>,
    #[arg(long, default_value_t = PatientQuery::DEFAULT_LIMIT)]
    pub limit: usize,
    #[arg(long, default_value_t = 0)]
    pub offset: usize,
}

impl From<SearchArgs> for PatientQuery {
    fn from(args: SearchArgs) -> Self {
        Self {
            last_name: args.last_name,
            first_name: args.first_name,
            patronymic: args.patronymic,
            age: args.age,
            card_number: args.card_number,
            inclusion_date: args.inclusion_date,
            limit: args.limit,
            offset: args.offset,
        }
    }
}

#[derive(Args, Debug)]
pub struct ScaleTarget {
    pub patient: Uuid,
    pub scale: ScaleKind,
    /// Required for scales recorded per timepoint (MMSE), e.g. T10
    #[arg(long, short)]
    pub timepoint: Option<Timepoint>,
}

#[derive(Subcommand, Debug)]
pub enum ScaleCommand {
    Save {
        #[command(flatten)]
        target: ScaleTarget,
        #[command(flatten)]
        input: InputArgs,
    },
    Show {
        #[command(flatten)]
        target: ScaleTarget,
    },
    Clear {
        #[command(flatten)]
        target: ScaleTarget,
    },
}

#[derive(Args, Debug)]
pub struct SliceTarget {
    pub patient: Uuid,
    /// T0 through T12
    pub timepoint: Timepoint,
}

#[derive(Subcommand, Debug)]
pub enum SliceCommand {
    Save {
        #[command(flatten)]
        target: SliceTarget,
        #[command(flatten)]
        input: InputArgs,
    },
    Show {
        #[command(flatten)]
        target: SliceTarget,
    },
    Clear {
        #[command(flatten)]
        target: SliceTarget,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a new configuration file
    Init {
        /// Name recorded as the actor on audit events
        #[arg(long)]
        operator: String,
        /// Replace an existing configuration
        #[arg(long)]
        force: bool,
    },
    Show,
}
