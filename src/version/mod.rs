//! Development version stamping
//!
//! While a package is built from a git checkout, a dev version such as
//! `1.3+dev` is temporarily replaced in the version file by one that names
//! the exact revision (`1.3+git12-gabc1234`). The original line is restored
//! when packaging ends, however it ends.

pub mod record;
pub mod stamper;
pub mod store;

pub use record::{DEFAULT_DEV_MARKER, PROVENANCE_MARKER, VersionLine, VersionRecord};
pub use stamper::{
    StampError, StampGuard, StampSettings, preview_version, read_branch_hash, read_record,
    run_stamped,
};
pub use store::{FileVersionStore, MemoryVersionStore, VersionStore};
