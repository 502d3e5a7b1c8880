//! Buildstamp internal library code

pub mod config;
pub mod debug;
pub mod diagnostics;
pub mod env_vars;
pub mod extensions;
pub mod git;
pub mod package;
pub mod version;

// Re-export common types for convenience
pub use config::{CONFIG_FILE, Config};
pub use debug::{debug_log, debug_logf, init_debug, is_debug_enabled};
pub use diagnostics::{DiagnosticSink, RecordingDiagnostics, StderrDiagnostics};
pub use extensions::{
    BuildStrategy, CleanupManifest, CythonCompiler, ExtensionTarget, GenerateError,
    IntermediateCompiler, Language, ResolvedExtensions, count_already_generated, generate,
    regenerate, resolve_extensions, select_build_strategy, use_existing,
};
pub use git::{DescribeError, GitCli, HookError, SourceControl, install_post_checkout_hook};
pub use package::{BuildPlan, discover_packages};
pub use version::{
    FileVersionStore, MemoryVersionStore, StampError, StampGuard, StampSettings, VersionRecord,
    VersionStore, preview_version, run_stamped,
};
