//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod inspect_content;
mod simulate;

pub use inspect_content::InspectContent;
pub use simulate::Simulate;

use std::path::PathBuf;

use arena_content::ContentFactory;

/// Content directory from the command line, or the bundled data files.
fn content_factory(data_dir: Option<PathBuf>) -> ContentFactory {
    match data_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    }
}
