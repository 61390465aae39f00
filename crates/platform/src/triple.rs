//! OS/architecture identification and the asset lookup table

use std::fmt;

use yedctl_errors::{Error, PlatformError};

/// The (operating system, CPU architecture) pair the process is running on.
///
/// Used only as a lookup key into the asset table; construction from
/// arbitrary strings exists so the table stays testable off-target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformTriple {
    pub os: String,
    pub arch: String,
}

impl PlatformTriple {
    /// The triple of the running process, from the compile-time constants.
    #[must_use]
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    #[must_use]
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Look up the release asset shipped for this triple.
    ///
    /// The table is exact and closed: every supported pair maps to exactly
    /// one asset, and anything outside it is an unsupported platform, not a
    /// guess. Windows, macOS and Linux each ship a single asset regardless
    /// of architecture, so both 64-bit arches share an entry.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::UnsupportedPlatform` when no asset exists for
    /// this OS/architecture pair.
    pub fn asset_name(&self) -> Result<&'static str, Error> {
        match (self.os.as_str(), self.arch.as_str()) {
            ("windows", "x86_64" | "aarch64") => Ok("yed.exe"),
            ("macos", "x86_64" | "aarch64") => Ok("yed.darwin"),
            ("linux", "x86_64" | "aarch64") => Ok("yed.linux"),
            _ => Err(PlatformError::UnsupportedPlatform {
                os: self.os.clone(),
                arch: self.arch.clone(),
            }
            .into()),
        }
    }
}

impl fmt::Display for PlatformTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// Resolve the asset name for the running platform.
///
/// # Errors
///
/// Returns `PlatformError::UnsupportedPlatform` when the current triple is
/// not in the supported set.
pub fn resolve_asset() -> Result<&'static str, Error> {
    PlatformTriple::current().asset_name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_triples_map_to_assets() {
        let cases = [
            (("windows", "x86_64"), "yed.exe"),
            (("windows", "aarch64"), "yed.exe"),
            (("macos", "x86_64"), "yed.darwin"),
            (("macos", "aarch64"), "yed.darwin"),
            (("linux", "x86_64"), "yed.linux"),
            (("linux", "aarch64"), "yed.linux"),
        ];
        for ((os, arch), expected) in cases {
            let triple = PlatformTriple::new(os, arch);
            assert_eq!(triple.asset_name().unwrap(), expected, "{triple}");
        }
    }

    #[test]
    fn unsupported_triples_are_rejected() {
        for (os, arch) in [
            ("freebsd", "x86_64"),
            ("linux", "riscv64"),
            ("macos", "powerpc"),
            ("solaris", "sparc"),
        ] {
            let err = PlatformTriple::new(os, arch).asset_name().unwrap_err();
            assert!(matches!(
                err,
                Error::Platform(PlatformError::UnsupportedPlatform { .. })
            ));
        }
    }

    #[test]
    fn current_triple_is_supported_on_tier1_targets() {
        // CI runs on linux/macos/windows x86_64 or aarch64, all of which
        // appear in the table.
        assert!(resolve_asset().is_ok());
    }
}
