//! Stored data management commands.

use std::sync::Arc;

use clap::Subcommand;
use studytrack_core::store::data_dir;
use studytrack_core::{FileMedium, StorageMedium, DATA_KEY};

#[derive(Subcommand)]
pub enum DataAction {
    /// Print the data directory path
    Path,
    /// Remove the stored aggregate; the next command reseeds defaults
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DataAction::Path => {
            println!("{}", data_dir()?.display());
        }
        DataAction::Reset { yes } => {
            if !yes {
                return Err("refusing to reset without --yes".into());
            }
            let medium: Arc<dyn StorageMedium> = Arc::new(FileMedium::open(data_dir()?)?);
            medium.remove(DATA_KEY)?;
            log::info!("removed stored aggregate '{DATA_KEY}'");
            println!("Stored data removed; defaults will be reseeded on next use.");
        }
    }

    Ok(())
}
