//! CLI command implementations

pub mod config;
pub mod key;
pub mod mirror;
pub mod platform;
pub mod run;

pub use config::execute as config;
pub use key::execute as key;
pub use mirror::execute as mirror;
pub use platform::execute as platform;
pub use run::execute as run;
