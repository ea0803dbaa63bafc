//! Run inputs
//!
//! Every input can be given as a command-line flag or, on a GitHub runner,
//! as an `INPUT_<NAME>` environment variable. Flags take precedence. Values
//! are trimmed and an empty value counts as not supplied.

use crate::cli::args::InputArgs;
use crate::error::{SetupError, SetupResult};
use std::path::PathBuf;

/// String-keyed source of input values
pub trait InputSource {
    /// Trimmed, non-empty value of `name`
    fn get(&self, name: &str) -> Option<String>;
}

/// Inputs passed by the Actions runner as environment variables
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvInputs;

impl EnvInputs {
    /// Variable name for an input, e.g. `cache_version` -> `INPUT_CACHE_VERSION`
    pub fn variable(name: &str) -> String {
        format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
    }
}

impl InputSource for EnvInputs {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(Self::variable(name))
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Inputs of one run after merging flags and the input source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInputs {
    pub repository: Option<String>,
    pub package_file: Option<PathBuf>,
    pub packages: Option<String>,
    pub cache_version: String,
    pub texlive_version: Option<u32>,
    pub accept_stale: bool,
}

impl RunInputs {
    pub fn resolve(args: &InputArgs, source: &dyn InputSource) -> SetupResult<Self> {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());

        let cache_version = non_empty(&args.cache_version)
            .or_else(|| source.get("cache_version"))
            .ok_or_else(|| SetupError::MissingInput("cache_version".to_string()))?;

        let texlive_version = match args.texlive_version {
            Some(v) => Some(v),
            None => source
                .get("texlive_version")
                .map(|v| parse_version("texlive_version", &v))
                .transpose()?,
        };

        let accept_stale = args.accept_stale
            || source
                .get("accept-stale")
                .map(|v| parse_bool("accept-stale", &v))
                .transpose()?
                .unwrap_or(false);

        Ok(Self {
            repository: non_empty(&args.repository).or_else(|| source.get("repository")),
            package_file: args
                .package_file
                .clone()
                .or_else(|| source.get("package_file").map(PathBuf::from)),
            packages: non_empty(&args.packages).or_else(|| source.get("packages")),
            cache_version,
            texlive_version,
            accept_stale,
        })
    }
}

/// Boolean in the YAML 1.2 core schema spellings
fn parse_bool(name: &str, value: &str) -> SetupResult<bool> {
    match value {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        _ => Err(SetupError::InvalidInput {
            name: name.to_string(),
            reason: format!("{:?} is not one of true/True/TRUE/false/False/FALSE", value),
        }),
    }
}

fn parse_version(name: &str, value: &str) -> SetupResult<u32> {
    value.parse().map_err(|_| SetupError::InvalidInput {
        name: name.to_string(),
        reason: format!("{:?} is not a release year", value),
    })
}
