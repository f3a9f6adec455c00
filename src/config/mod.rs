//! `.modreloc.toml` configuration.

mod core;
mod loader;

pub use self::core::{ModrelocConfig, RelocateSettings, ResolveSettings};
pub use loader::{
    directory_ancestors, load_config, load_config_from_path, parse_and_validate_config,
    CONFIG_FILE_NAME,
};
