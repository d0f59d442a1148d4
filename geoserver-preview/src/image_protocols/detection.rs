// ABOUTME: Terminal capability detection for map image rendering
// ABOUTME: Picks the best graphics tier from environment signals and helper executables

use crate::constants::{env as env_keys, helpers};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Graphics tier, in order of preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Terminal-native graphics (kitty protocol), drawn by chafa
    Native,
    /// Sixel output from img2sixel
    SixelHelper,
    /// Colour symbol output from chafa
    GeneralHelper,
    /// Built-in glyph renderer, always available
    Ascii,
}

impl Protocol {
    /// Name used in configuration, flags, and the preview header.
    pub fn name(&self) -> &'static str {
        match self {
            Protocol::Native => "native",
            Protocol::SixelHelper => "sixel",
            Protocol::GeneralHelper => "chafa",
            Protocol::Ascii => "ascii",
        }
    }

    pub const VALID_NAMES: &'static [&'static str] = &["native", "sixel", "chafa", "ascii"];
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "native" => Ok(Protocol::Native),
            "sixel" => Ok(Protocol::SixelHelper),
            "chafa" => Ok(Protocol::GeneralHelper),
            "ascii" => Ok(Protocol::Ascii),
            other => Err(format!(
                "Unknown protocol '{}'. Valid values: {}",
                other,
                Protocol::VALID_NAMES.join(", ")
            )),
        }
    }
}

/// Environment signals the detector reads.
pub trait DetectionEnv {
    fn var(&self, key: &str) -> Option<String>;
    fn has_executable(&self, name: &str) -> bool;
}

/// Reads the process environment and searches `PATH`.
pub struct SystemEnv;

impl DetectionEnv for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.is_empty())
    }

    fn has_executable(&self, name: &str) -> bool {
        find_executable(name).is_some()
    }
}

/// Locate an executable `name` in the directories listed in `PATH`.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Chosen tier and the signal that chose it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub protocol: Protocol,
    pub reason: String,
    /// Set when an override was present but unusable, for the user to see.
    pub warning: Option<String>,
}

impl Detection {
    fn new(protocol: Protocol, reason: impl Into<String>) -> Self {
        Self {
            protocol,
            reason: reason.into(),
            warning: None,
        }
    }
}

/// Resolve the tier for this session.
///
/// An explicit flag wins, then `GSPREVIEW_FORCE_PROTOCOL`, then the
/// configured value, then environment signals.
pub fn resolve_protocol(
    flag: Option<Protocol>,
    configured: Option<Protocol>,
    env: &dyn DetectionEnv,
) -> Detection {
    let forced = match flag {
        Some(_) => Ok(None),
        None => forced_protocol(env),
    };
    let warning = forced
        .as_ref()
        .err()
        .map(|e| format!("Ignoring {}: {}", env_keys::FORCE_PROTOCOL, e));

    let mut detection = if let Some(protocol) = flag {
        Detection::new(protocol, "--protocol flag")
    } else if let Ok(Some(forced)) = forced {
        forced
    } else if let Some(protocol) = configured {
        Detection::new(protocol, "config file")
    } else {
        detect_protocol(env)
    };

    if let Some(warning) = &warning {
        log::warn!("{}", warning);
    }
    detection.warning = warning;

    log::debug!(
        "Using {} protocol ({})",
        detection.protocol,
        detection.reason
    );
    detection
}

/// `Ok(None)` when unset or `auto`, `Err` when the value names no tier.
fn forced_protocol(env: &dyn DetectionEnv) -> Result<Option<Detection>, String> {
    let Some(value) = env.var(env_keys::FORCE_PROTOCOL) else {
        return Ok(None);
    };
    if value.trim().eq_ignore_ascii_case("auto") {
        return Ok(None);
    }

    let protocol = value.parse::<Protocol>()?;
    Ok(Some(Detection::new(
        protocol,
        format!("{}={}", env_keys::FORCE_PROTOCOL, value),
    )))
}

/// Pick a tier from environment signals alone, first match wins.
pub fn detect_protocol(env: &dyn DetectionEnv) -> Detection {
    if let Some(term) = env.var("TERM").filter(|t| t.contains("kitty")) {
        return Detection::new(Protocol::Native, format!("TERM={}", term));
    }

    if env.var("KITTY_WINDOW_ID").is_some() {
        return Detection::new(Protocol::Native, "KITTY_WINDOW_ID is set");
    }

    if env.has_executable(helpers::SIXEL) {
        return Detection::new(
            Protocol::SixelHelper,
            format!("{} found on PATH", helpers::SIXEL),
        );
    }

    if env.has_executable(helpers::CHAFA) {
        return Detection::new(
            Protocol::GeneralHelper,
            format!("{} found on PATH", helpers::CHAFA),
        );
    }

    Detection::new(Protocol::Ascii, "no graphics signals or helpers found")
}
