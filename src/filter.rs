/*!
 * Inclusion rules for filesystem entries
 */

use crate::config::Config;
use crate::types::Entry;

/// Why an entry was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// The entry is the artifact being written
    OutputArtifact,
    /// Name starts with a dot
    Hidden,
    /// Directory name is in the exclude list
    ExcludedDirectory,
    /// Outside the include-only directory
    OutsideIncludeDir,
    /// File name or extension is in an ignore list
    IgnoredFile,
    /// Extension is a settings-file extension
    SettingsFile,
}

/// Decide whether `entry` is excluded, checking the rules in precedence
/// order. The first matching rule is returned.
pub fn exclusion(entry: &Entry, config: &Config) -> Option<Exclusion> {
    if entry.path == config.output_file {
        return Some(Exclusion::OutputArtifact);
    }

    if entry.name.starts_with('.') {
        return Some(Exclusion::Hidden);
    }

    if entry.is_dir() && config.exclude_dirs.contains(&entry.name) {
        return Some(Exclusion::ExcludedDirectory);
    }

    if let Some(include_dir) = &config.include_dir {
        let inside = entry.path.starts_with(include_dir);
        // Ancestors stay walkable so the include directory can be reached
        let ancestor = entry.is_dir() && include_dir.starts_with(&entry.path);
        if !inside && !ancestor {
            return Some(Exclusion::OutsideIncludeDir);
        }
    }

    if entry.is_file()
        && (config.ignore_files.contains(&entry.name)
            || config.ignore_types.contains(&entry.extension))
    {
        return Some(Exclusion::IgnoredFile);
    }

    if config.ignore_settings && config.settings_extensions.contains(&entry.extension) {
        return Some(Exclusion::SettingsFile);
    }

    None
}

/// Whether `entry` appears in the artifact
pub fn included(entry: &Entry, config: &Config) -> bool {
    exclusion(entry, config).is_none()
}
