use std::{
    env::{self, VarError},
    path::PathBuf,
    str::FromStr,
};
use tracing::Level;

use crate::sss::{
    Mode, ReconstructionSettings, Rounding,
    field::{DEFAULT_PRIME, PrimeField},
};

pub mod batch;
pub mod input;
pub mod sss;

const DEFAULT_SHARES_FILE: &str = "input.json";
const DEFAULT_BATCH_CONCURRENCY: usize = 4;

// ############################################
// ################## CONFIG ##################
// ############################################

#[derive(Debug)]
pub struct Config {
    pub log_level: Level,
    pub field: PrimeField,
    pub mode: Mode,
    pub rounding: Rounding,
    pub batch_concurrency: usize,
    /// Used when no share file is given on the command line.
    pub shares_file: PathBuf,
}

impl Config {
    pub fn parse_environment() -> Result<Config, anyhow::Error> {
        Self::parse_variables(|key| env::var(key))
    }

    /// Builds the configuration from `var`, which resolves a variable name like `env::var`.
    fn parse_variables<F>(var: F) -> Result<Config, anyhow::Error>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let mut errors: Vec<String> = vec![];
        // `LOG_LEVEL` has priority over `RUST_LOG`
        let log_level = match parse_env_variable::<Level, _>(&var, "LOG_LEVEL") {
            Ok(v) => v
                .or_else(|| parse_env_variable::<Level, _>(&var, "RUST_LOG").unwrap_or(None))
                .unwrap_or(Level::INFO),
            Err(e) => {
                errors.push(e.to_string());
                Level::INFO
            }
        };

        let field = match parse_field(&var) {
            Ok(v) => v,
            Err(e) => {
                errors.push(e.to_string());
                PrimeField::default()
            }
        };

        let mode = match parse_env_variable::<Mode, _>(&var, "RECONSTRUCTION_MODE") {
            Ok(v) => v.unwrap_or_default(),
            Err(e) => {
                errors.push(e.to_string());
                Mode::default()
            }
        };

        let rounding = match parse_env_variable::<Rounding, _>(&var, "ROUNDING") {
            Ok(v) => v.unwrap_or_default(),
            Err(e) => {
                errors.push(e.to_string());
                Rounding::default()
            }
        };

        let batch_concurrency = match parse_env_variable::<usize, _>(&var, "BATCH_CONCURRENCY") {
            Ok(Some(0)) => {
                errors.push("[BATCH_CONCURRENCY]: must be at least 1".to_string());
                DEFAULT_BATCH_CONCURRENCY
            }
            Ok(v) => v.unwrap_or(DEFAULT_BATCH_CONCURRENCY),
            Err(e) => {
                errors.push(e.to_string());
                DEFAULT_BATCH_CONCURRENCY
            }
        };

        let shares_file = match parse_env_variable::<PathBuf, _>(&var, "SHARES_FILE") {
            Ok(v) => v.unwrap_or_else(|| PathBuf::from(DEFAULT_SHARES_FILE)),
            Err(e) => {
                errors.push(e.to_string());
                PathBuf::from(DEFAULT_SHARES_FILE)
            }
        };

        if !errors.is_empty() {
            return Err(anyhow::anyhow!(errors.join(", ")));
        }

        Ok(Config {
            log_level,
            field,
            mode,
            rounding,
            batch_concurrency,
            shares_file,
        })
    }

    pub fn settings(&self) -> ReconstructionSettings {
        ReconstructionSettings {
            field: self.field,
            mode: self.mode,
            rounding: self.rounding,
        }
    }
}

fn parse_field<F>(var: &F) -> Result<PrimeField, anyhow::Error>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let modulus = parse_env_variable::<u64, _>(var, "MODULUS")?.unwrap_or(DEFAULT_PRIME);
    PrimeField::new(modulus).map_err(|e| anyhow::anyhow!("[MODULUS]: {e}"))
}

fn parse_env_variable<T, F>(var: &F, key: &str) -> Result<Option<T>, anyhow::Error>
where
    F: Fn(&str) -> Result<String, VarError>,
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    fn map_err<E>(key: &str, e: E) -> anyhow::Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        anyhow::anyhow!("[{key}]: {e}")
    }

    let env_value = match var(key) {
        Ok(v) => {
            if v.is_empty() {
                Ok(None)
            } else {
                Ok(Some(v))
            }
        }
        Err(e) => {
            if e == VarError::NotPresent {
                Ok(None)
            } else {
                Err(map_err(key, e))
            }
        }
    }?;
    env_value
        .map(|v| v.parse::<T>().map_err(|e| map_err(key, e)))
        .transpose()
}
