//! Build targets and target groups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Platform a build is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildTarget {
    /// Apple iOS.
    Ios,
    /// Google Android.
    Android,
    /// 32-bit Windows standalone.
    StandaloneWindows,
    /// 64-bit Windows standalone.
    StandaloneWindows64,
    /// macOS standalone.
    StandaloneOsx,
    /// 32-bit Linux standalone.
    StandaloneLinux,
    /// 64-bit Linux standalone.
    StandaloneLinux64,
    /// Universal Linux standalone.
    StandaloneLinuxUniversal,
    /// WebGL.
    #[serde(rename = "webgl")]
    WebGl,
}

impl BuildTarget {
    /// Every known target, in declaration order.
    pub const ALL: [BuildTarget; 9] = [
        Self::Ios,
        Self::Android,
        Self::StandaloneWindows,
        Self::StandaloneWindows64,
        Self::StandaloneOsx,
        Self::StandaloneLinux,
        Self::StandaloneLinux64,
        Self::StandaloneLinuxUniversal,
        Self::WebGl,
    ];

    /// Returns the snake-case identifier used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::StandaloneWindows => "standalone_windows",
            Self::StandaloneWindows64 => "standalone_windows64",
            Self::StandaloneOsx => "standalone_osx",
            Self::StandaloneLinux => "standalone_linux",
            Self::StandaloneLinux64 => "standalone_linux64",
            Self::StandaloneLinuxUniversal => "standalone_linux_universal",
            Self::WebGl => "webgl",
        }
    }

    /// Returns the name the editor uses for this target on its command line
    /// and in player output directories.
    pub fn editor_name(&self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::StandaloneWindows => "StandaloneWindows",
            Self::StandaloneWindows64 => "StandaloneWindows64",
            Self::StandaloneOsx => "StandaloneOSX",
            Self::StandaloneLinux => "StandaloneLinux",
            Self::StandaloneLinux64 => "StandaloneLinux64",
            Self::StandaloneLinuxUniversal => "StandaloneLinuxUniversal",
            Self::WebGl => "WebGL",
        }
    }

    /// Returns the group this target belongs to.
    pub fn group(&self) -> TargetGroup {
        match self {
            Self::Ios => TargetGroup::Ios,
            Self::Android => TargetGroup::Android,
            Self::WebGl => TargetGroup::WebGl,
            _ => TargetGroup::Standalone,
        }
    }

    /// Returns whether this is one of the desktop standalone targets.
    pub fn is_standalone(&self) -> bool {
        self.group() == TargetGroup::Standalone
    }

    /// Returns the standalone target matching the host operating system.
    pub fn host_standalone() -> Self {
        if cfg!(target_os = "macos") {
            Self::StandaloneOsx
        } else if cfg!(all(target_os = "windows", target_pointer_width = "64")) {
            Self::StandaloneWindows64
        } else if cfg!(target_os = "windows") {
            Self::StandaloneWindows
        } else {
            Self::StandaloneLinux
        }
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.editor_name())
    }
}

impl FromStr for BuildTarget {
    type Err = AppError;

    /// Accepts the snake-case identifier, the editor spelling (any case), or
    /// `standalone` for the host's standalone target.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        if needle.eq_ignore_ascii_case("standalone") {
            return Ok(Self::host_standalone());
        }

        Self::ALL
            .into_iter()
            .find(|t| {
                t.as_str().eq_ignore_ascii_case(needle) || t.editor_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| AppError::validation(format!("Unknown build target '{s}'")))
    }
}

/// Coarse platform family of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetGroup {
    /// iOS.
    Ios,
    /// Android.
    Android,
    /// Desktop standalone players.
    Standalone,
    /// WebGL.
    #[serde(rename = "webgl")]
    WebGl,
}

impl TargetGroup {
    /// Returns the string name of this group.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Standalone => "standalone",
            Self::WebGl => "webgl",
        }
    }
}

impl fmt::Display for TargetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
