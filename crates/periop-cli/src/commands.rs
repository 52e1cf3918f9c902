use std::io::Read;
use std::path::{Path, PathBuf};

use eyre::Result;
use periop_core::models::patient::{NewPatient, PatientQuery, PatientUpdate};
use periop_core::models::slice::SliceRecord;
use periop_core::models::status::ScaleKey;
use periop_core::models::timepoint::Timepoint;
use periop_records::{Missing, RecordError, Records};
use periop_scales::{ScaleInfo, all_scales, get_scale, score_json};
use periop_storage::SqliteStore;
use serde::Serialize;
use serde_json::json;

use crate::cli::{
    Cli, Command, ConfigCommand, PatientCommand, ScaleCommand, ScaleTarget, ScoreArgs,
    SliceCommand,
};
use crate::config::{self, DATA_DIR_ENV, PeriopConfig};

pub fn run(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir;
    match cli.command {
        Command::Scales => list_scales(),
        Command::Timepoints => list_timepoints(),
        Command::Score(args) => score(args),
        Command::Config { command } => config_command(command, data_dir.as_deref()),
        Command::Patient { command } => {
            patient_command(&open_records(data_dir.as_deref())?, command)
        }
        Command::Scale { command } => scale_command(&open_records(data_dir.as_deref())?, command),
        Command::Status { patient } => {
            let records = open_records(data_dir.as_deref())?;
            print_json(&json!({
                "scales": absent_aggregate(records.scale_status(patient))?,
                "slices": absent_aggregate(records.slice_status(patient))?,
                "airway": records.airway_status(patient)?,
                "soba_ready": records.soba_ready(patient)?,
            }))
        }
        Command::Slice { command } => slice_command(&open_records(data_dir.as_deref())?, command),
        Command::Summary { patient } => {
            print_json(&open_records(data_dir.as_deref())?.summary(patient)?)
        }
    }
}

fn list_scales() -> Result<()> {
    let catalogue: Vec<ScaleInfo> = all_scales()
        .iter()
        .map(|scale| ScaleInfo::of(scale.as_ref()))
        .collect();
    print_json(&catalogue)
}

fn list_timepoints() -> Result<()> {
    let timepoints: Vec<_> = Timepoint::all()
        .map(|tp| json!({ "timepoint": tp.to_string(), "description": tp.description() }))
        .collect();
    print_json(&timepoints)
}

fn score(args: ScoreArgs) -> Result<()> {
    let scale = get_scale(&args.scale)?;
    let input = read_json(&args.input.input)?;
    print_json(&score_json(scale.kind(), input)?)
}

fn patient_command(records: &Records<SqliteStore>, command: PatientCommand) -> Result<()> {
    match command {
        PatientCommand::Register(input) => {
            let new: NewPatient = serde_json::from_value(read_json(&input.input)?)?;
            print_json(&records.register_patient(new)?)
        }
        PatientCommand::Show { patient } => print_json(&records.patient(patient)?),
        PatientCommand::List => print_json(&records.patients()?),
        PatientCommand::Update { patient, input } => {
            let update: PatientUpdate = serde_json::from_value(read_json(&input.input)?)?;
            print_json(&records.update_patient(patient, update)?)
        }
        PatientCommand::Search(args) => {
            print_json(&records.search_patients(&PatientQuery::from(args))?)
        }
        PatientCommand::Remove { patient } => {
            let removed = records.remove_patient(patient)?;
            print_json(&json!({ "patient_id": patient, "removed": removed }))
        }
    }
}

fn scale_command(records: &Records<SqliteStore>, command: ScaleCommand) -> Result<()> {
    match command {
        ScaleCommand::Save { target, input } => {
            let ScaleTarget {
                patient,
                scale,
                timepoint,
            } = target;
            let input = read_json(&input.input)?;
            print_json(&records.save_scale_json(scale, patient, timepoint, input)?)
        }
        ScaleCommand::Show { target } => {
            let key = ScaleKey::new(target.scale, target.timepoint)?;
            print_json(&records.scale_result_json(target.patient, key)?)
        }
        ScaleCommand::Clear { target } => {
            let key = ScaleKey::new(target.scale, target.timepoint)?;
            let cleared = records.clear_scale(target.patient, key)?;
            print_json(&json!({ "scale": key.slug(), "cleared": cleared }))
        }
    }
}

fn slice_command(records: &Records<SqliteStore>, command: SliceCommand) -> Result<()> {
    match command {
        SliceCommand::Save { target, input } => {
            let record: SliceRecord = serde_json::from_value(read_json(&input.input)?)?;
            print_json(&records.save_slice(target.patient, target.timepoint, &record)?)
        }
        SliceCommand::Show { target } => {
            print_json(&records.slice(target.patient, target.timepoint)?)
        }
        SliceCommand::Clear { target } => {
            let cleared = records.clear_slice(target.patient, target.timepoint)?;
            print_json(&json!({ "timepoint": target.timepoint, "cleared": cleared }))
        }
    }
}

fn config_command(command: ConfigCommand, data_dir: Option<&Path>) -> Result<()> {
    match command {
        ConfigCommand::Init { operator, force } => {
            let path = config::config_path()?;
            if !force && path.exists() {
                return Err(eyre::eyre!(
                    "config already exists at {}; pass --force to replace it",
                    path.display()
                ));
            }
            let dir = config::resolve_data_dir(data_dir, env_data_dir(), None)?;
            let config = PeriopConfig::new(dir, operator);
            config::save_config_to(&path, &config)?;
            print_json(&json!({ "path": path, "config": config }))
        }
        ConfigCommand::Show => {
            let path = config::config_path()?;
            let config = config::load_config_from(&path)?;
            let effective = config::resolve_data_dir(data_dir, env_data_dir(), config.as_ref())?;
            print_json(&json!({
                "path": path,
                "config": config,
                "effective_data_dir": effective,
            }))
        }
    }
}

fn env_data_dir() -> Option<PathBuf> {
    std::env::var_os(DATA_DIR_ENV).map(Into::into)
}

fn open_records(data_dir: Option<&Path>) -> Result<Records<SqliteStore>> {
    let config = config::load_config()?;
    let dir = config::resolve_data_dir(data_dir, env_data_dir(), config.as_ref())?;
    let actor = config.as_ref().map_or("unknown", |c| c.actor()).to_string();

    tracing::debug!(data_dir = %dir.display(), %actor, "Opening records");
    let store = SqliteStore::open_dir(&dir)?;
    Ok(Records::new(store, actor))
}

/// A patient without any saved records has no status aggregate yet.
fn absent_aggregate<T>(result: Result<T, RecordError>) -> Result<Option<T>, RecordError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(RecordError::NotFound(Missing::Aggregate { .. })) => Ok(None),
        Err(e) => Err(e),
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?
    };
    Ok(serde_json::from_str(&contents)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
