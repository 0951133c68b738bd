mod tables;

pub use self::tables::{
    confirm as print_confirm, history as print_history, import_summary as print_import_summary,
    phase1 as print_phase1, phase2 as print_phase2, recent as print_recent,
};

use std::path::Path;

/// The line scripts look for to chain phases.
pub fn print_saved(path: &Path) {
    println!("saved: {}", path.display());
}
