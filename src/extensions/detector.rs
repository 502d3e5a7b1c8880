//! Native sibling detection
//!
//! Decides whether the intermediate compiler is needed at all. When every
//! target already has a `.c` or `.cpp` file next to its first source (checked
//! in, or shipped in a source distribution), the build can go ahead without
//! the compiler installed.

use super::types::{BuildStrategy, ExtensionTarget, NATIVE_EXTENSIONS};
use std::path::Path;

/// Check whether a `.c` or `.cpp` sibling of `source` exists under `root`
///
/// The sibling language is not taken from the target here: any native file
/// means the source was already translated.
#[must_use]
pub fn has_native_sibling(root: &Path, source: &Path) -> bool {
    NATIVE_EXTENSIONS
        .iter()
        .any(|ext| root.join(source.with_extension(ext)).exists())
}

/// Count targets whose first source already has a native sibling
///
/// Targets without any source count as not generated.
#[must_use]
pub fn count_already_generated(root: &Path, targets: &[ExtensionTarget]) -> usize {
    targets
        .iter()
        .filter_map(ExtensionTarget::primary_source)
        .filter(|source| has_native_sibling(root, source))
        .count()
}

/// Pick between running the intermediate compiler and reusing native sources
///
/// # Example
///
/// ```rust,ignore
/// use buildstamp::extensions::{select_build_strategy, BuildStrategy};
///
/// // fast.c sits next to fast.pyx, so no compiler is needed
/// let strategy = select_build_strategy(Path::new("."), &targets);
/// assert_eq!(strategy, BuildStrategy::UseExisting);
/// ```
#[must_use]
pub fn select_build_strategy(root: &Path, targets: &[ExtensionTarget]) -> BuildStrategy {
    if targets.len() > count_already_generated(root, targets) {
        BuildStrategy::Generate
    } else {
        BuildStrategy::UseExisting
    }
}
