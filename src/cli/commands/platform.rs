//! Platform command - print the detected TeX Live platform

use crate::error::SetupResult;
use crate::platform::TlPlatform;

/// Execute the platform command
pub async fn execute() -> SetupResult<()> {
    println!("{}", TlPlatform::detect()?);
    Ok(())
}
