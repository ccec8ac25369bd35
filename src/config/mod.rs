//! Configuration: types, default paths, XML loading and validation.
//!
//! Precedence: built-in defaults < XML file < CLI flags.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{CONFIG_ENV, default_config_path, default_log_path, default_storage_dir, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{load_config, load_config_from_xml_path, parse_config_xml, render_config_xml};
