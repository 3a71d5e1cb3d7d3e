/* crates/clinic-cli/src/config/tests/mod.rs */

use super::*;
use super::loader::{CONFIG_FILE, find_clinic_config, load_clinic_config};
