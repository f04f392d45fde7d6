pub mod data;
pub mod goal;
pub mod note;
pub mod session;
pub mod subject;
pub mod task;
pub mod timer;
pub mod user;

use std::sync::Arc;

use studytrack_core::store::data_dir;
use studytrack_core::{ChangeBus, FileMedium, StudyRepository};

/// Open the repository over the file medium in the data directory.
pub fn open_repository() -> Result<StudyRepository, Box<dyn std::error::Error>> {
    let dir = data_dir()?;
    log::debug!("opening repository at {}", dir.display());
    let medium = Arc::new(FileMedium::open(dir)?);
    Ok(StudyRepository::open(medium, &ChangeBus::new()))
}

/// Parse an `--subject` argument: a subject id, or "none" to clear.
pub fn parse_subject(arg: &str) -> Result<Option<u32>, Box<dyn std::error::Error>> {
    if arg.eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        Ok(Some(arg.parse::<u32>()?))
    }
}
