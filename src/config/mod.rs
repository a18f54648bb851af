//! Layered configuration.
//!
//! Consolidates configuration from four tiers with field-by-field YAML merging:
//! 1. **Defaults** - compiled in
//! 2. **Project** - `$CWD/tasks-api/config.yaml`
//! 3. **User** - `~/.tasks-api/config.yaml`
//! 4. **Environment** - variables below
//!
//! CLI flags are applied on top by the binary.
//!
//! ## Environment Variables
//! - `TASKS_API_CONFIG_PATH` - Explicit config file (replaces the file tiers)
//! - `TASKS_API_DB_PATH` - Database path
//! - `TASKS_API_HOST` / `TASKS_API_PORT` - Listen address
//! - `TASKS_API_KEYS` - Comma-separated API keys
//! - `TASKS_API_USER_DIR` - User config dir (default: `~/.tasks-api`)
//! - `TASKS_API_PROJECT_DIR` - Project config dir (default: `./tasks-api`)

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier, parse_key_list};
pub use merge::{deep_merge, deep_merge_all};
pub use types::*;
