//! Target kinds, source languages, and host platforms.
//!
//! These tags drive target naming; parsing them is where an unrecognized
//! value is reported, so the naming rules themselves stay total.

use serde::{Deserialize, Serialize};

/// The kind of artifact a package builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    /// Console executable
    #[default]
    #[serde(alias = "exe")]
    ConsoleExe,

    /// Windowed (GUI) executable
    #[serde(alias = "winexe")]
    WindowedExe,

    /// Shared/dynamic library (.so / .dylib / .dll)
    #[serde(alias = "dll")]
    SharedLib,

    /// Static library (.a / .lib)
    #[serde(alias = "lib")]
    StaticLib,

    /// Web application library
    #[serde(alias = "aspnet")]
    WebLib,
}

impl TargetKind {
    /// Get the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::ConsoleExe => "console-exe",
            TargetKind::WindowedExe => "windowed-exe",
            TargetKind::SharedLib => "shared-lib",
            TargetKind::StaticLib => "static-lib",
            TargetKind::WebLib => "web-lib",
        }
    }

    /// Check if this kind produces a library artifact.
    pub fn is_library(&self) -> bool {
        matches!(
            self,
            TargetKind::SharedLib | TargetKind::StaticLib | TargetKind::WebLib
        )
    }

    /// Check if this kind produces an executable.
    pub fn is_executable(&self) -> bool {
        matches!(self, TargetKind::ConsoleExe | TargetKind::WindowedExe)
    }
}

impl std::str::FromStr for TargetKind {
    type Err = TargetKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "console-exe" | "exe" => Ok(TargetKind::ConsoleExe),
            "windowed-exe" | "winexe" => Ok(TargetKind::WindowedExe),
            "shared-lib" | "dll" => Ok(TargetKind::SharedLib),
            "static-lib" | "lib" => Ok(TargetKind::StaticLib),
            "web-lib" | "aspnet" => Ok(TargetKind::WebLib),
            _ => Err(TargetKindParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid target kind string.
#[derive(Debug, Clone)]
pub struct TargetKindParseError(pub String);

impl std::fmt::Display for TargetKindParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid target kind '{}', valid values: exe, winexe, dll, lib, aspnet",
            self.0
        )
    }
}

impl std::error::Error for TargetKindParseError {}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source language for a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C language
    C,
    /// C++ language (default)
    #[default]
    #[serde(alias = "cpp", alias = "cxx", alias = "c++")]
    Cxx,
    /// C# language
    #[serde(alias = "c#", alias = "cs")]
    CSharp,
}

impl Language {
    /// Get the language name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "c++",
            Language::CSharp => "c#",
        }
    }

    /// Managed/VM languages name their outputs the same on every platform.
    pub fn is_managed(&self) -> bool {
        matches!(self, Language::CSharp)
    }

    /// Check if this is a natively compiled language.
    pub fn is_native(&self) -> bool {
        matches!(self, Language::C | Language::Cxx)
    }
}

impl std::str::FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" => Ok(Language::C),
            "c++" | "cpp" | "cxx" => Ok(Language::Cxx),
            "c#" | "cs" | "csharp" => Ok(Language::CSharp),
            _ => Err(LanguageParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid language string.
#[derive(Debug, Clone)]
pub struct LanguageParseError(pub String);

impl std::fmt::Display for LanguageParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid language '{}', valid values: c, c++, c#", self.0)
    }
}

impl std::error::Error for LanguageParseError {}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Host platform family for target naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Windows
    Windows,
    /// macOS and friends
    #[serde(alias = "macos", alias = "darwin")]
    MacOsx,
    /// Everything else POSIX-like
    #[serde(alias = "linux", alias = "bsd")]
    Posix,
}

impl Platform {
    /// Get the platform identifier as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::MacOsx => "macosx",
            Platform::Posix => "posix",
        }
    }

    /// The platform the generator itself is running on.
    pub fn host() -> Platform {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOsx
        } else {
            Platform::Posix
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = PlatformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "windows" | "win32" => Ok(Platform::Windows),
            "macosx" | "macos" | "darwin" => Ok(Platform::MacOsx),
            "posix" | "linux" | "bsd" | "solaris" => Ok(Platform::Posix),
            _ => Err(PlatformParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid platform identifier.
#[derive(Debug, Clone)]
pub struct PlatformParseError(pub String);

impl std::fmt::Display for PlatformParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid platform '{}', valid values: windows, macosx, linux, bsd, posix",
            self.0
        )
    }
}

impl std::error::Error for PlatformParseError {}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("exe".parse::<TargetKind>().unwrap(), TargetKind::ConsoleExe);
        assert_eq!("dll".parse::<TargetKind>().unwrap(), TargetKind::SharedLib);
        assert_eq!(
            "static-lib".parse::<TargetKind>().unwrap(),
            TargetKind::StaticLib
        );
        assert!("plugin".parse::<TargetKind>().is_err());
    }

    #[test]
    fn test_kind_predicates() {
        assert!(TargetKind::StaticLib.is_library());
        assert!(TargetKind::WebLib.is_library());
        assert!(TargetKind::WindowedExe.is_executable());
        assert!(!TargetKind::SharedLib.is_executable());
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("c++".parse::<Language>().unwrap(), Language::Cxx);
        assert_eq!("c#".parse::<Language>().unwrap(), Language::CSharp);
        assert!("fortran".parse::<Language>().is_err());
    }

    #[test]
    fn test_platform_parsing() {
        assert_eq!("darwin".parse::<Platform>().unwrap(), Platform::MacOsx);
        assert_eq!("linux".parse::<Platform>().unwrap(), Platform::Posix);
        let err = "beos".parse::<Platform>().unwrap_err();
        assert!(err.to_string().contains("beos"));
    }
}
