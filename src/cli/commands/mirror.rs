//! Mirror command - resolve and print the selected mirror

use crate::cli::args::{MirrorArgs, OutputFormat};
use crate::config::Config;
use crate::error::SetupResult;
use crate::http::UreqClient;
use crate::mirror::{resolve_repository, ResolvedRepository, CTAN_AUTO};
use console::style;

/// Execute the mirror command
pub async fn execute(args: MirrorArgs, config: &Config) -> SetupResult<()> {
    let repository =
        resolve_repository(None, args.texlive_version, &config.mirror, &UreqClient::new()).await?;

    match args.format {
        OutputFormat::Plain => print_plain(&repository),
        OutputFormat::Json => print_json(&repository)?,
    }
    Ok(())
}

fn print_plain(repository: &ResolvedRepository) {
    match (&repository.url, repository.version, repository.revision) {
        (Some(url), Some(version), Some(revision)) => {
            println!("{}", url);
            println!(
                "{} TeX Live {}, revision {}",
                style("Serving").dim(),
                version,
                revision
            );
        }
        _ => {
            println!("{}", CTAN_AUTO);
            println!(
                "{}",
                style("Mirror catalog unavailable, tlmgr picks a CTAN mirror").dim()
            );
        }
    }
}

fn print_json(repository: &ResolvedRepository) -> SetupResult<()> {
    let value = serde_json::json!({
        "repository": repository.url,
        "texlive_version": repository.version,
        "revision": repository.revision,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
