//! Key command - print the cache key a run would use

use crate::cli::args::KeyArgs;
use crate::cli::commands::run::plan;
use crate::cli::inputs::{EnvInputs, RunInputs};
use crate::config::Config;
use crate::error::SetupResult;
use crate::http::UreqClient;

/// Execute the key command
pub async fn execute(args: KeyArgs, config: &Config) -> SetupResult<()> {
    let inputs = RunInputs::resolve(&args.inputs, &EnvInputs)?;
    let request = plan(&inputs, config, &UreqClient::new(), !args.no_mirror).await?;

    println!("prefix={}", request.key.prefix);
    println!("key={}", request.key.full);
    Ok(())
}
