//! Config file naming, hierarchical resolution and updates.
//!
//! Stage configs live in `<configs_dir>/<stage>[/configs]/` and are looked up
//! by name, from the most specific qualifier chain down to the bare
//! `config.<ext>`:
//!
//! ```text
//! config_some_profile_name|variant.yaml
//! config_some_profile|variant.yaml
//! config_some|variant.yaml
//! config|variant.yaml
//! config_some_profile_name.yaml
//! config_some_profile.yaml
//! config_some.yaml
//! config.yaml
//! ```

mod name;
mod resolver;
mod update;

pub use name::ConfigName;
pub use resolver::{ConfigResolver, Resolution, CONFIGS_SUBDIR};
pub use update::update_config;
