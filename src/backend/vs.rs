//! Visual Studio 2003 backend.
//!
//! Emits a solution file plus one XML project file per package. Packages
//! are addressed by GUID; the identities are generated once per run and
//! stashed in each package's extension slot so the solution and project
//! files agree.

use std::fmt::Write;

use anyhow::{anyhow, bail, Result};

use crate::backend::Backend;
use crate::core::config::{FLAG_NO_SYMBOLS, FLAG_OPTIMIZE, FLAG_OPTIMIZE_SIZE};
use crate::core::kind::{Platform, TargetKind};
use crate::core::project::Project;
use crate::core::query::Scope;
use crate::core::sourcetree::TreeEvent;
use crate::util::{guid, path};

/// The C++ project tool GUID, fixed across all VS installations.
const VC_TOOL_GUID: &str = "8BC9CEB8-8B4A-11D0-8D11-00A0C91BC942";

/// Per-package identity for the solution and project files.
#[derive(Debug, Clone)]
pub struct VsIdentity {
    /// Project GUID, unique per package per run
    pub project_guid: String,

    /// Tool GUID identifying the project flavor
    pub tool_guid: String,

    /// Project file extension
    pub extension: &'static str,
}

/// Solution/project generator for Visual Studio 2003.
pub struct VsBackend;

impl VsBackend {
    /// Create the backend.
    pub fn new() -> Self {
        VsBackend
    }

    fn identity<'p>(package: &'p crate::core::Package) -> Result<&'p VsIdentity> {
        package.backend_data::<VsIdentity>().ok_or_else(|| {
            anyhow!(
                "no identity assigned for package `{}`; run assign_identities first",
                package.name
            )
        })
    }

    fn write_compiler_tool(out: &mut String, scope: &Scope<'_>) -> Result<()> {
        let config = scope.config();

        writeln!(out, "\t\t\t<Tool")?;
        writeln!(out, "\t\t\t\tName=\"VCCLCompilerTool\"")?;

        let optimization = if config.has_flag(FLAG_OPTIMIZE) {
            "2"
        } else if config.has_flag(FLAG_OPTIMIZE_SIZE) {
            "1"
        } else {
            "0"
        };
        writeln!(out, "\t\t\t\tOptimization=\"{}\"", optimization)?;

        if !config.defines.is_empty() {
            writeln!(
                out,
                "\t\t\t\tPreprocessorDefinitions=\"{}\"",
                config.defines.join(";")
            )?;
        }
        if !config.include_paths.is_empty() {
            let dirs: Vec<String> = config
                .include_paths
                .iter()
                .map(|d| path::translate(d, crate::util::PathStyle::Windows))
                .collect();
            writeln!(
                out,
                "\t\t\t\tAdditionalIncludeDirectories=\"{}\"",
                dirs.join(";")
            )?;
        }
        if !config.build_options.is_empty() {
            writeln!(
                out,
                "\t\t\t\tAdditionalOptions=\"{}\"",
                config.build_options.join(" ")
            )?;
        }

        let debug_format = if config.has_flag(FLAG_NO_SYMBOLS) { "0" } else { "4" };
        writeln!(out, "\t\t\t\tDebugInformationFormat=\"{}\"/>", debug_format)?;
        Ok(())
    }

    fn write_linker_tool(out: &mut String, scope: &Scope<'_>) -> Result<()> {
        let package = scope.package();
        let config = scope.config();

        if package.kind == TargetKind::StaticLib {
            writeln!(out, "\t\t\t<Tool")?;
            writeln!(out, "\t\t\t\tName=\"VCLibrarianTool\"")?;
            writeln!(
                out,
                "\t\t\t\tOutputFile=\"$(OutDir)/{}\"/>",
                scope.target_name(Platform::Windows)
            )?;
            return Ok(());
        }

        writeln!(out, "\t\t\t<Tool")?;
        writeln!(out, "\t\t\t\tName=\"VCLinkerTool\"")?;
        writeln!(
            out,
            "\t\t\t\tOutputFile=\"$(OutDir)/{}\"",
            scope.target_name(Platform::Windows)
        )?;

        // Sibling packages become link inputs by their Windows target
        // name; system links get the .lib extension appended.
        let mut deps: Vec<String> = Vec::new();
        for name in &config.links {
            match scope.project().package_index(name) {
                Some(index) => {
                    let sibling =
                        Scope::select(scope.project(), index)?.with_config(scope.config_index())?;
                    if sibling.package().language.is_native() {
                        deps.push(sibling.target_name(Platform::Windows));
                    }
                }
                None => deps.push(format!("{}.lib", name)),
            }
        }
        if !deps.is_empty() {
            writeln!(out, "\t\t\t\tAdditionalDependencies=\"{}\"", deps.join(" "))?;
        }

        let mut lib_dirs: Vec<String> = vec!["$(OutDir)".to_string()];
        for dir in &config.library_paths {
            lib_dirs.push(path::translate(dir, crate::util::PathStyle::Windows));
        }
        writeln!(
            out,
            "\t\t\t\tAdditionalLibraryDirectories=\"{}\"",
            lib_dirs.join(";")
        )?;

        if !config.link_options.is_empty() {
            writeln!(
                out,
                "\t\t\t\tAdditionalOptions=\"{}\"",
                config.link_options.join(" ")
            )?;
        }

        // Subsystem: 1 = console, 2 = windows.
        let subsystem = match package.kind {
            TargetKind::WindowedExe => "2",
            _ => "1",
        };
        writeln!(out, "\t\t\t\tSubSystem=\"{}\"", subsystem)?;

        if let Some(def) = scope.find_file_with_extension("def") {
            writeln!(
                out,
                "\t\t\t\tModuleDefinitionFile=\"{}\"",
                path::translate(def, crate::util::PathStyle::Windows)
            )?;
        }

        writeln!(
            out,
            "\t\t\t\tGenerateDebugInformation=\"{}\"/>",
            if scope.config().has_flag(FLAG_NO_SYMBOLS) {
                "FALSE"
            } else {
                "TRUE"
            }
        )?;
        Ok(())
    }

    fn write_files(out: &mut String, scope: &Scope<'_>) -> Result<()> {
        let mut error = None;
        scope.walk_sources(|event| {
            if error.is_some() {
                return;
            }
            let result = match event {
                TreeEvent::OpenGroup(dir) => {
                    let name = dir.rsplit('/').next().unwrap_or(dir);
                    let indent = group_indent(dir);
                    writeln!(out, "{}<Filter", indent)
                        .and_then(|_| writeln!(out, "{}\tName=\"{}\"", indent, name))
                        .and_then(|_| writeln!(out, "{}\tFilter=\"\">", indent))
                }
                TreeEvent::CloseGroup(dir) => {
                    writeln!(out, "{}</Filter>", group_indent(dir))
                }
                TreeEvent::SourceFile(file) => {
                    let indent = file_indent(file);
                    let rel = if file.starts_with('.') {
                        path::translate(file, crate::util::PathStyle::Windows)
                    } else {
                        format!(".\\{}", path::translate(file, crate::util::PathStyle::Windows))
                    };
                    writeln!(out, "{}<File", indent)
                        .and_then(|_| writeln!(out, "{}\tRelativePath=\"{}\">", indent, rel))
                        .and_then(|_| writeln!(out, "{}</File>", indent))
                }
            };
            if let Err(e) = result {
                error = Some(e);
            }
        });
        match error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

impl Default for VsBackend {
    fn default() -> Self {
        VsBackend::new()
    }
}

/// Nesting depth of a group, ignoring leading parent hops.
fn group_indent(dir: &str) -> String {
    let trimmed = trim_parent_hops(dir);
    let depth = trimmed.matches('/').count() + 2;
    "\t".repeat(depth)
}

/// Files indent one level deeper than their containing group.
fn file_indent(file: &str) -> String {
    let trimmed = trim_parent_hops(file);
    let depth = trimmed.matches('/').count() + 2;
    "\t".repeat(depth)
}

fn trim_parent_hops(p: &str) -> &str {
    let mut rest = p;
    while let Some(r) = rest.strip_prefix("../") {
        rest = r;
    }
    rest
}

impl Backend for VsBackend {
    fn name(&self) -> &'static str {
        "vs2003"
    }

    fn assign_identities(&self, project: &Project) -> Result<()> {
        // Reject unsupported packages before touching any extension slot.
        for package in &project.packages {
            if !package.language.is_native() {
                bail!(
                    "the vs2003 backend only handles C/C++ packages; `{}` is {}",
                    package.name,
                    package.language
                );
            }
        }
        for package in &project.packages {
            package.attach_backend_data(VsIdentity {
                project_guid: guid::generate_upper(),
                tool_guid: VC_TOOL_GUID.to_string(),
                extension: "vcproj",
            });
        }
        Ok(())
    }

    fn target_script(&self, project: &Project, package_index: usize) -> String {
        let package = &project.packages[package_index];
        path::join(&package.path, &package.name, "vcproj")
    }

    fn render_target(&self, project: &Project, package_index: usize) -> Result<String> {
        let scope = Scope::select(project, package_index)?;
        let package = scope.package();
        Self::identity(package)?;

        if package.kind == TargetKind::WebLib {
            bail!(
                "the vs2003 backend cannot build web library `{}`",
                package.name
            );
        }

        let mut out = String::new();
        writeln!(out, "<?xml version=\"1.0\" encoding=\"Windows-1252\"?>")?;
        writeln!(out, "<VisualStudioProject")?;
        writeln!(out, "\tProjectType=\"Visual C++\"")?;
        writeln!(out, "\tVersion=\"7.10\"")?;
        writeln!(out, "\tName=\"{}\"", package.name)?;
        writeln!(
            out,
            "\tProjectGUID=\"{{{}}}\"",
            Self::identity(package)?.project_guid
        )?;
        writeln!(out, "\tKeyword=\"Win32Proj\">")?;
        writeln!(out, "\t<Platforms>")?;
        writeln!(out, "\t\t<Platform")?;
        writeln!(out, "\t\t\tName=\"Win32\"/>")?;
        writeln!(out, "\t</Platforms>")?;

        writeln!(out, "\t<Configurations>")?;
        for index in 0..project.configs.len() {
            let config_scope = scope.with_config(index)?;
            let config = config_scope.config();

            // 1 = exe, 2 = dll, 4 = static lib.
            let config_type = match package.kind {
                TargetKind::SharedLib => "2",
                TargetKind::StaticLib => "4",
                _ => "1",
            };

            let out_dir = path::translate(
                &config_scope.out_dir_from_package(),
                crate::util::PathStyle::Windows,
            );
            let obj_dir = path::translate(
                &path::join(config_scope.obj_dir(), &config.name, ""),
                crate::util::PathStyle::Windows,
            );

            writeln!(out, "\t\t<Configuration")?;
            writeln!(out, "\t\t\tName=\"{}|Win32\"", config.name)?;
            writeln!(out, "\t\t\tOutputDirectory=\"{}\"", out_dir)?;
            writeln!(out, "\t\t\tIntermediateDirectory=\"{}\"", obj_dir)?;
            writeln!(out, "\t\t\tConfigurationType=\"{}\"", config_type)?;
            writeln!(out, "\t\t\tCharacterSet=\"2\">")?;
            Self::write_compiler_tool(&mut out, &config_scope)?;
            Self::write_linker_tool(&mut out, &config_scope)?;
            writeln!(out, "\t\t</Configuration>")?;
        }
        writeln!(out, "\t</Configurations>")?;

        writeln!(out, "\t<Files>")?;
        Self::write_files(&mut out, &scope)?;
        writeln!(out, "\t</Files>")?;
        writeln!(out, "\t<Globals>")?;
        writeln!(out, "\t</Globals>")?;
        writeln!(out, "</VisualStudioProject>")?;

        Ok(out)
    }

    fn aggregate_script(&self, project: &Project) -> String {
        path::join("", &project.name, "sln")
    }

    fn render_aggregate(&self, project: &Project) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "Microsoft Visual Studio Solution File, Format Version 8.00")?;

        for (index, package) in project.packages.iter().enumerate() {
            let identity = Self::identity(package)?;
            let script =
                path::translate(&self.target_script(project, index), crate::util::PathStyle::Windows);
            writeln!(
                out,
                "Project(\"{{{}}}\") = \"{}\", \"{}\", \"{{{}}}\"",
                identity.tool_guid, package.name, script, identity.project_guid
            )?;
            writeln!(out, "\tProjectSection(ProjectDependencies) = postProject")?;
            writeln!(out, "\tEndProjectSection")?;
            writeln!(out, "EndProject")?;
        }

        writeln!(out, "Global")?;
        writeln!(out, "\tGlobalSection(SolutionConfiguration) = preSolution")?;
        for config in &project.configs {
            writeln!(out, "\t\t{} = {}", config.name, config.name)?;
        }
        writeln!(out, "\tEndGlobalSection")?;

        writeln!(out, "\tGlobalSection(ProjectConfiguration) = postSolution")?;
        for package in &project.packages {
            let identity = Self::identity(package)?;
            for config in &package.configs {
                writeln!(
                    out,
                    "\t\t{{{}}}.{}.ActiveCfg = {}|Win32",
                    identity.project_guid, config.name, config.name
                )?;
                writeln!(
                    out,
                    "\t\t{{{}}}.{}.Build.0 = {}|Win32",
                    identity.project_guid, config.name, config.name
                )?;
            }
        }
        writeln!(out, "\tEndGlobalSection")?;

        writeln!(out, "\tGlobalSection(ExtensibilityGlobals) = postSolution")?;
        writeln!(out, "\tEndGlobalSection")?;
        writeln!(out, "\tGlobalSection(ExtensibilityAddIns) = postSolution")?;
        writeln!(out, "\tEndGlobalSection")?;
        writeln!(out, "EndGlobal")?;

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{ConfigBlock, SettingsBlock};
    use crate::core::kind::Language;
    use crate::core::project::ProjectConfig;
    use crate::core::Package;

    fn fixture() -> Project {
        let mut project = Project::new("Demo", ".");
        project.configs = vec![
            ProjectConfig::new("Debug").with_bin_dir("bin"),
            ProjectConfig::new("Release").with_bin_dir("bin"),
        ];

        let mut game = Package::new("game", "game")
            .with_kind(TargetKind::WindowedExe)
            .with_language(Language::Cxx)
            .with_files(["src/main.cpp", "src/sub/util.cpp", "src/game.def"]);
        game.settings = SettingsBlock {
            links: vec!["user32".to_string()],
            ..SettingsBlock::default()
        };
        game.configs = vec![ConfigBlock::new("Debug"), ConfigBlock::new("Release")];
        project.packages.push(game);
        project
    }

    #[test]
    fn test_identities_assigned_once() {
        let project = fixture();
        let backend = VsBackend::new();
        backend.assign_identities(&project).unwrap();

        let identity = project.packages[0].backend_data::<VsIdentity>().unwrap();
        assert_eq!(identity.project_guid.len(), 36);
        assert_eq!(identity.project_guid, identity.project_guid.to_uppercase());
        assert_eq!(identity.extension, "vcproj");
    }

    #[test]
    fn test_render_without_identity_fails() {
        let project = fixture();
        let backend = VsBackend::new();
        assert!(backend.render_target(&project, 0).is_err());
    }

    #[test]
    fn test_project_file_shape() {
        let project = fixture();
        let backend = VsBackend::new();
        backend.assign_identities(&project).unwrap();
        let text = backend.render_target(&project, 0).unwrap();

        assert!(text.contains("Name=\"game\""));
        assert!(text.contains("Name=\"Debug|Win32\""));
        assert!(text.contains("OutputFile=\"$(OutDir)/game.exe\""));
        // GUI executable links with the windows subsystem.
        assert!(text.contains("SubSystem=\"2\""));
        // The module-definition file is picked up by extension.
        assert!(text.contains("ModuleDefinitionFile=\"src\\game.def\""));
        // File groups nest: src opens, the sub filter sits inside it.
        let src_pos = text.find("Name=\"src\"").unwrap();
        let sub_pos = text.find("Name=\"sub\"").unwrap();
        assert!(src_pos < sub_pos);
        assert!(text.contains("RelativePath=\".\\src\\sub\\util.cpp\""));
        assert!(text.contains("AdditionalDependencies=\"user32.lib\""));
    }

    #[test]
    fn test_solution_references_project_guids() {
        let project = fixture();
        let backend = VsBackend::new();
        backend.assign_identities(&project).unwrap();
        let sln = backend.render_aggregate(&project).unwrap();

        let identity = project.packages[0].backend_data::<VsIdentity>().unwrap();
        assert!(sln.contains(&identity.project_guid));
        assert!(sln.contains("game\\game.vcproj"));
        assert!(sln.contains("Debug = Debug"));
        assert!(sln.contains(&format!(
            "{{{}}}.Release.Build.0 = Release|Win32",
            identity.project_guid
        )));
    }

    #[test]
    fn test_managed_package_is_rejected() {
        let mut project = fixture();
        project.packages[0].language = Language::CSharp;
        let backend = VsBackend::new();
        let err = backend.assign_identities(&project).unwrap_err();
        assert!(err.to_string().contains("game"));
    }
}
