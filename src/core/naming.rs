//! Target naming: logical target name to concrete output filename.
//!
//! The rules depend on the package kind and language, the host platform,
//! and the active configuration's overrides. Managed languages name their
//! outputs the same everywhere; native code follows platform convention.
//! A windowed executable on macOS becomes a bundle-relative path of the
//! form `Name.app/Contents/MacOS/Name`.

use crate::core::config::{ResolvedConfig, FLAG_DYLIB};
use crate::core::kind::{Language, Platform, TargetKind};
use crate::util::path;

/// Compute the output filename for one (package, configuration) pair.
///
/// The returned path is relocatable: it carries no directory other than
/// the bundle layout in the macOS windowed-executable case. A custom
/// prefix replaces the computed prefix in every branch; a custom extension
/// replaces the computed extension but never suppresses the prefix rule.
pub fn target_file(
    kind: TargetKind,
    language: Language,
    platform: Platform,
    config: &ResolvedConfig,
) -> String {
    let name = path::base_name(&config.target);
    let custom = config.prefix.as_deref();

    let (prefix, mut ext) = if language.is_managed() {
        let ext = if kind.is_library() { "dll" } else { "exe" };
        (custom.unwrap_or(""), ext)
    } else {
        match platform {
            Platform::Windows => {
                let ext = match kind {
                    TargetKind::StaticLib => "lib",
                    TargetKind::SharedLib => "dll",
                    _ => "exe",
                };
                (custom.unwrap_or(""), ext)
            }

            Platform::MacOsx => match kind {
                TargetKind::WindowedExe => {
                    // Bundle layout; the prefix lands on both the bundle
                    // directory and the inner executable.
                    let p = custom.unwrap_or("");
                    let mut out = format!("{p}{name}.app/Contents/MacOS/{p}{name}");
                    if let Some(ext) = config.extension.as_deref() {
                        if !ext.is_empty() {
                            out.push('.');
                            out.push_str(ext);
                        }
                    }
                    return out;
                }
                TargetKind::ConsoleExe => (custom.unwrap_or(""), ""),
                TargetKind::SharedLib => {
                    if config.has_flag(FLAG_DYLIB) {
                        (custom.unwrap_or(""), "dylib")
                    } else {
                        (custom.unwrap_or("lib"), "so")
                    }
                }
                // Static and web libraries take the archive convention.
                _ => (custom.unwrap_or("lib"), "a"),
            },

            Platform::Posix => match kind {
                TargetKind::StaticLib => (custom.unwrap_or("lib"), "a"),
                TargetKind::SharedLib => (custom.unwrap_or("lib"), "so"),
                _ => (custom.unwrap_or(""), ""),
            },
        }
    };

    if let Some(over) = config.extension.as_deref() {
        ext = over;
    }

    if ext.is_empty() {
        format!("{prefix}{name}")
    } else {
        format!("{prefix}{name}.{ext}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(target: &str) -> ResolvedConfig {
        ResolvedConfig {
            name: "Debug".to_string(),
            target: target.to_string(),
            prefix: None,
            extension: None,
            bin_dir: ".".to_string(),
            lib_dir: ".".to_string(),
            obj_dir: "obj".to_string(),
            build_flags: Vec::new(),
            build_options: Vec::new(),
            defines: Vec::new(),
            include_paths: Vec::new(),
            library_paths: Vec::new(),
            link_options: Vec::new(),
            links: Vec::new(),
        }
    }

    #[test]
    fn test_posix_shared_library() {
        let cfg = config("foo");
        assert_eq!(
            target_file(TargetKind::SharedLib, Language::C, Platform::Posix, &cfg),
            "libfoo.so"
        );
    }

    #[test]
    fn test_posix_static_and_exe() {
        let cfg = config("foo");
        assert_eq!(
            target_file(TargetKind::StaticLib, Language::Cxx, Platform::Posix, &cfg),
            "libfoo.a"
        );
        assert_eq!(
            target_file(TargetKind::ConsoleExe, Language::C, Platform::Posix, &cfg),
            "foo"
        );
    }

    #[test]
    fn test_windows_extensions() {
        let cfg = config("foo");
        assert_eq!(
            target_file(TargetKind::StaticLib, Language::C, Platform::Windows, &cfg),
            "foo.lib"
        );
        assert_eq!(
            target_file(TargetKind::SharedLib, Language::C, Platform::Windows, &cfg),
            "foo.dll"
        );
        assert_eq!(
            target_file(TargetKind::WindowedExe, Language::Cxx, Platform::Windows, &cfg),
            "foo.exe"
        );
    }

    #[test]
    fn test_managed_ignores_platform() {
        let cfg = config("foo");
        for platform in [Platform::Windows, Platform::MacOsx, Platform::Posix] {
            assert_eq!(
                target_file(TargetKind::SharedLib, Language::CSharp, platform, &cfg),
                "foo.dll"
            );
            assert_eq!(
                target_file(TargetKind::ConsoleExe, Language::CSharp, platform, &cfg),
                "foo.exe"
            );
        }
    }

    #[test]
    fn test_macosx_dylib_flag() {
        let mut cfg = config("foo");
        assert_eq!(
            target_file(TargetKind::SharedLib, Language::Cxx, Platform::MacOsx, &cfg),
            "libfoo.so"
        );
        cfg.build_flags.push(FLAG_DYLIB.to_string());
        assert_eq!(
            target_file(TargetKind::SharedLib, Language::Cxx, Platform::MacOsx, &cfg),
            "foo.dylib"
        );
    }

    #[test]
    fn test_macosx_bundle() {
        let cfg = config("MyGame");
        assert_eq!(
            target_file(TargetKind::WindowedExe, Language::Cxx, Platform::MacOsx, &cfg),
            "MyGame.app/Contents/MacOS/MyGame"
        );
    }

    #[test]
    fn test_extension_override_wins_everywhere() {
        let mut cfg = config("foo");
        cfg.extension = Some("bin".to_string());
        for (kind, language, platform) in [
            (TargetKind::SharedLib, Language::C, Platform::Posix),
            (TargetKind::StaticLib, Language::Cxx, Platform::Windows),
            (TargetKind::ConsoleExe, Language::CSharp, Platform::MacOsx),
        ] {
            let name = target_file(kind, language, platform, &cfg);
            assert!(name.ends_with(".bin"), "{name}");
        }
        // The override never suppresses the prefix rule.
        assert_eq!(
            target_file(TargetKind::SharedLib, Language::C, Platform::Posix, &cfg),
            "libfoo.bin"
        );
    }

    #[test]
    fn test_custom_prefix_replaces_default() {
        let mut cfg = config("foo");
        cfg.prefix = Some("my".to_string());
        assert_eq!(
            target_file(TargetKind::SharedLib, Language::C, Platform::Posix, &cfg),
            "myfoo.so"
        );
        assert_eq!(
            target_file(TargetKind::ConsoleExe, Language::C, Platform::Windows, &cfg),
            "myfoo.exe"
        );
    }

    #[test]
    fn test_target_with_directory_part() {
        // The base name is extracted; output dirs are handled elsewhere.
        let cfg = config("../bin/mygame");
        assert_eq!(
            target_file(TargetKind::ConsoleExe, Language::C, Platform::Posix, &cfg),
            "mygame"
        );
    }
}
