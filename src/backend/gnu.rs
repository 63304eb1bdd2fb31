//! GNU makefile backend.
//!
//! Emits one makefile per package plus a master makefile that dispatches
//! into each package directory. A package whose directory is all its own
//! gets a plain `Makefile`; packages sharing a directory (or sitting at
//! the project root, next to the master makefile) get `<name>.make`.

use std::fmt::Write;

use anyhow::{bail, Result};

use crate::backend::{Backend, BackendOptions};
use crate::core::config::{FLAG_DYLIB, FLAG_NO_SYMBOLS, FLAG_OPTIMIZE, FLAG_OPTIMIZE_SIZE};
use crate::core::kind::{Language, Platform, TargetKind};
use crate::core::project::Project;
use crate::core::query::Scope;
use crate::util::path;

/// Makefile generator for GNU make.
pub struct GnuBackend {
    options: BackendOptions,
}

impl GnuBackend {
    /// Create the backend with the given platform and compiler family.
    pub fn new(options: BackendOptions) -> Self {
        GnuBackend { options }
    }

    /// A package owns its directory when no other package, and not the
    /// project itself, writes scripts there.
    fn owns_path(project: &Project, index: usize) -> bool {
        let pkg = &project.packages[index];
        if pkg.path.is_empty() || pkg.path == "." {
            return false;
        }
        !project
            .packages
            .iter()
            .enumerate()
            .any(|(i, other)| i != index && other.path == pkg.path)
    }

    fn compilers(&self) -> (&str, &str) {
        match self.options.cc.as_str() {
            "gcc" => ("gcc", "g++"),
            "dmc" => ("dmc", "dmc"),
            other => (other, other),
        }
    }

    fn write_config_block(&self, out: &mut String, scope: &Scope<'_>) -> Result<()> {
        let package = scope.package();
        let config = scope.config();
        let platform = self.options.platform;

        let bin_dir = scope.dir_from_package(scope.bin_dir());
        let lib_dir = scope.dir_from_package(scope.lib_dir());
        let out_dir = scope.dir_from_package(scope.out_dir());
        let obj_dir = path::join(scope.obj_dir(), &config.name, "");

        writeln!(out, "ifeq ($(CONFIG),{})", config.name)?;
        writeln!(out, "  BINDIR := {}", bin_dir)?;
        writeln!(out, "  LIBDIR := {}", lib_dir)?;
        writeln!(out, "  OBJDIR := {}", obj_dir)?;
        writeln!(out, "  OUTDIR := {}", out_dir)?;
        writeln!(out, "  TARGET := {}", scope.target_name(platform))?;

        if package.language.is_managed() {
            self.write_managed_flags(out, scope)?;
        } else {
            self.write_native_flags(out, scope)?;
        }

        writeln!(out, "endif")?;
        writeln!(out)?;
        Ok(())
    }

    fn write_native_flags(&self, out: &mut String, scope: &Scope<'_>) -> Result<()> {
        let config = scope.config();
        let platform = self.options.platform;

        write!(out, "  CPPFLAGS :=")?;
        if self.options.cc != "dmc" {
            write!(out, " -MD")?;
        }
        for define in &config.defines {
            write!(out, " -D \"{}\"", define)?;
        }
        for include in &config.include_paths {
            write!(out, " -I \"{}\"", include)?;
        }
        writeln!(out)?;

        write!(out, "  CFLAGS := $(CPPFLAGS)")?;
        if !config.has_flag(FLAG_NO_SYMBOLS) {
            write!(out, " -g")?;
        }
        if config.has_flag(FLAG_OPTIMIZE) {
            write!(out, " -O2")?;
        }
        if config.has_flag(FLAG_OPTIMIZE_SIZE) {
            write!(out, " -Os")?;
        }
        for option in &config.build_options {
            write!(out, " {}", option)?;
        }
        writeln!(out)?;
        writeln!(out, "  CXXFLAGS := $(CFLAGS)")?;

        write!(out, "  LDFLAGS :=")?;
        if config.has_flag(FLAG_NO_SYMBOLS) {
            write!(out, " -s")?;
        }
        for dir in &config.library_paths {
            write!(out, " -L \"{}\"", dir)?;
        }
        write!(out, " -L \"$(BINDIR)\" -L \"$(LIBDIR)\"")?;
        for option in &config.link_options {
            write!(out, " {}", option)?;
        }
        writeln!(out)?;

        if scope.package().kind == TargetKind::SharedLib {
            let soflag = if platform == Platform::MacOsx
                && config.has_flag(FLAG_DYLIB)
            {
                "-dynamiclib"
            } else {
                "-shared"
            };
            writeln!(out, "  SOFLAGS := {}", soflag)?;
        }

        // Siblings link by target file path so make can track them as
        // dependencies; only natively compiled siblings qualify here.
        write!(out, "  LIBS :=")?;
        for name in &config.links {
            match scope.project().package_index(name) {
                Some(index) => {
                    let sibling = Scope::select(scope.project(), index)?
                        .with_config(scope.config_index())?;
                    if !sibling.package().language.is_native() {
                        continue;
                    }
                    let target = path::join(
                        &scope.dir_from_package(sibling.out_dir()),
                        &sibling.target_name(platform),
                        "",
                    );
                    write!(out, " {}", target)?;
                }
                None => write!(out, " -l{}", name)?,
            }
        }
        writeln!(out)?;
        Ok(())
    }

    fn write_managed_flags(&self, out: &mut String, scope: &Scope<'_>) -> Result<()> {
        let config = scope.config();
        let platform = self.options.platform;

        write!(out, "  CSCFLAGS := /nologo")?;
        for define in &config.defines {
            write!(out, " /d:{}", define)?;
        }
        if config.has_flag(FLAG_OPTIMIZE) {
            write!(out, " /optimize")?;
        }
        if !config.has_flag(FLAG_NO_SYMBOLS) {
            write!(out, " /debug")?;
        }
        for option in &config.build_options {
            write!(out, " {}", option)?;
        }
        writeln!(out)?;

        write!(out, "  REFS :=")?;
        for name in &config.links {
            match scope.project().package_index(name) {
                Some(index) => {
                    let sibling = Scope::select(scope.project(), index)?
                        .with_config(scope.config_index())?;
                    let target = path::join(
                        &scope.dir_from_package(sibling.out_dir()),
                        &sibling.target_name(platform),
                        "",
                    );
                    write!(out, " /r:{}", target)?;
                }
                None => write!(out, " /r:{}.dll", name)?,
            }
        }
        writeln!(out)?;
        Ok(())
    }

    fn write_native_rules(&self, out: &mut String, scope: &Scope<'_>) -> Result<()> {
        let package = scope.package();
        let (cc, cxx) = self.compilers();
        let linker = match package.language {
            Language::C => "$(CC)",
            _ => "$(CXX)",
        };

        let sources: Vec<&str> = package
            .files
            .iter()
            .filter(|f| is_compilable(f))
            .filter(|f| {
                package
                    .file_config(f)
                    .and_then(|fc| fc.build_action.as_deref())
                    .map(|action| action == "Compile")
                    .unwrap_or(true)
            })
            .map(String::as_str)
            .collect();

        writeln!(out, "CC := {}", cc)?;
        writeln!(out, "CXX := {}", cxx)?;
        writeln!(out)?;

        writeln!(out, "OBJECTS := \\")?;
        for source in &sources {
            writeln!(out, "\t$(OBJDIR)/{}.o \\", path::base_name(source))?;
        }
        writeln!(out)?;

        writeln!(out, ".PHONY: all dirs clean")?;
        writeln!(out)?;
        writeln!(out, "all: dirs $(OUTDIR)/$(TARGET)")?;
        writeln!(out)?;
        writeln!(out, "dirs:")?;
        writeln!(out, "\t@mkdir -p $(OBJDIR) $(dir $(OUTDIR)/$(TARGET))")?;
        writeln!(out)?;

        writeln!(out, "$(OUTDIR)/$(TARGET): $(OBJECTS)")?;
        writeln!(out, "\t@echo Linking {}", package.name)?;
        match package.kind {
            TargetKind::StaticLib => {
                writeln!(out, "\t@ar -rcs $@ $(OBJECTS)")?;
            }
            TargetKind::SharedLib => {
                writeln!(
                    out,
                    "\t@{} $(SOFLAGS) -o $@ $(OBJECTS) $(LDFLAGS) $(LIBS)",
                    linker
                )?;
            }
            _ => {
                writeln!(out, "\t@{} -o $@ $(OBJECTS) $(LDFLAGS) $(LIBS)", linker)?;
            }
        }
        writeln!(out)?;

        for source in &sources {
            let compiler = if is_cpp(source) {
                "$(CXX) $(CXXFLAGS)"
            } else {
                "$(CC) $(CFLAGS)"
            };
            writeln!(out, "$(OBJDIR)/{}.o: {}", path::base_name(source), source)?;
            writeln!(out, "\t@echo $<")?;
            writeln!(out, "\t@{} -o $@ -c $<", compiler)?;
            writeln!(out)?;
        }

        self.write_clean_rule(out, scope)?;
        Ok(())
    }

    fn write_managed_rules(&self, out: &mut String, scope: &Scope<'_>) -> Result<()> {
        let package = scope.package();
        let csc = if self.options.platform == Platform::Windows {
            "csc"
        } else {
            "mcs"
        };
        let target_flag = match package.kind {
            TargetKind::WindowedExe => "winexe",
            kind if kind.is_library() => "library",
            _ => "exe",
        };

        writeln!(out, "CSC := {}", csc)?;
        writeln!(out)?;

        writeln!(out, "SOURCES := \\")?;
        for file in &package.files {
            let action = package
                .file_config(file)
                .and_then(|fc| fc.build_action.as_deref());
            if action.map(|a| a == "Compile").unwrap_or(is_csharp(file)) {
                writeln!(out, "\t{} \\", file)?;
            }
        }
        writeln!(out)?;

        writeln!(out, ".PHONY: all dirs clean")?;
        writeln!(out)?;
        writeln!(out, "all: dirs $(OUTDIR)/$(TARGET)")?;
        writeln!(out)?;
        writeln!(out, "dirs:")?;
        writeln!(out, "\t@mkdir -p $(OUTDIR)")?;
        writeln!(out)?;
        writeln!(out, "$(OUTDIR)/$(TARGET): $(SOURCES)")?;
        writeln!(out, "\t@echo Building {}", package.name)?;
        writeln!(
            out,
            "\t@$(CSC) /target:{} /out:$@ $(CSCFLAGS) $(REFS) $(SOURCES)",
            target_flag
        )?;
        writeln!(out)?;

        self.write_clean_rule(out, scope)?;
        Ok(())
    }

    fn write_clean_rule(&self, out: &mut String, scope: &Scope<'_>) -> Result<()> {
        let package = scope.package();
        writeln!(out, "clean:")?;
        writeln!(out, "\t@echo Cleaning {}", package.name)?;
        // The bundle case removes the whole .app tree, not just the inner
        // executable.
        let target = scope.target_name(self.options.platform);
        if let Some(bundle) = target.split(".app/").next().filter(|_| target.contains(".app/")) {
            writeln!(out, "\t@rm -rf $(OUTDIR)/{}.app $(OBJDIR)", bundle)?;
        } else {
            writeln!(out, "\t@rm -rf $(OUTDIR)/$(TARGET) $(OBJDIR)")?;
        }
        Ok(())
    }
}

impl Backend for GnuBackend {
    fn name(&self) -> &'static str {
        "gnu"
    }

    fn assign_identities(&self, _project: &Project) -> Result<()> {
        // Makefiles address packages by path; nothing to attach.
        Ok(())
    }

    fn target_script(&self, project: &Project, package_index: usize) -> String {
        let package = &project.packages[package_index];
        if Self::owns_path(project, package_index) {
            path::join(&package.path, "Makefile", "")
        } else {
            path::join(&package.path, &package.name, "make")
        }
    }

    fn render_target(&self, project: &Project, package_index: usize) -> Result<String> {
        let scope = Scope::select(project, package_index)?;
        let package = scope.package();

        if package.kind == TargetKind::WebLib {
            bail!(
                "the gnu backend cannot build web library `{}`",
                package.name
            );
        }

        let mut out = String::new();
        let kind_desc = match package.kind {
            TargetKind::ConsoleExe => "Console Executable",
            TargetKind::WindowedExe => "Windowed Executable",
            TargetKind::SharedLib => "Shared Library",
            TargetKind::StaticLib => "Static Library",
            TargetKind::WebLib => "Web Library",
        };
        writeln!(
            out,
            "# {} {} Makefile autogenerated by slipway",
            package.language,
            kind_desc
        )?;
        writeln!(
            out,
            "# Don't edit this file! Instead edit `Slipway.toml` then rerun `slipway generate`"
        )?;
        writeln!(out)?;

        writeln!(out, "ifndef CONFIG")?;
        writeln!(out, "  CONFIG={}", project.configs[0].name)?;
        writeln!(out, "endif")?;
        writeln!(out)?;

        for index in 0..project.configs.len() {
            let config_scope = scope.with_config(index)?;
            self.write_config_block(&mut out, &config_scope)?;
        }

        if package.language.is_managed() {
            self.write_managed_rules(&mut out, &scope)?;
        } else {
            self.write_native_rules(&mut out, &scope)?;
        }

        Ok(out)
    }

    fn aggregate_script(&self, _project: &Project) -> String {
        "Makefile".to_string()
    }

    fn render_aggregate(&self, project: &Project) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "# Master Makefile autogenerated by slipway")?;
        writeln!(
            out,
            "# Don't edit this file! Instead edit `Slipway.toml` then rerun `slipway generate`"
        )?;
        writeln!(out)?;

        if let Some(first) = project.configs.first() {
            writeln!(out, "ifndef CONFIG")?;
            writeln!(out, "  CONFIG={}", first.name)?;
            writeln!(out, "endif")?;
            writeln!(out)?;
        }

        let names: Vec<&str> = project.packages.iter().map(|p| p.name.as_str()).collect();
        writeln!(out, ".PHONY: all clean {}", names.join(" "))?;
        writeln!(out)?;
        writeln!(out, "all: {}", names.join(" "))?;
        writeln!(out)?;

        for (index, package) in project.packages.iter().enumerate() {
            // Build sibling dependencies first so link inputs exist.
            let scope = Scope::select(project, index)?;
            let deps: Vec<&str> = scope
                .sibling_packages()
                .iter()
                .map(|p| p.name.as_str())
                .collect();

            if deps.is_empty() {
                writeln!(out, "{}:", package.name)?;
            } else {
                writeln!(out, "{}: {}", package.name, deps.join(" "))?;
            }
            writeln!(out, "\t{}", self.dispatch(project, index, None))?;
            writeln!(out)?;
        }

        writeln!(out, "clean:")?;
        for index in 0..project.packages.len() {
            writeln!(out, "\t{}", self.dispatch(project, index, Some("clean")))?;
        }

        Ok(out)
    }
}

impl GnuBackend {
    fn dispatch(&self, project: &Project, package_index: usize, goal: Option<&str>) -> String {
        let package = &project.packages[package_index];
        let dir = if package.path.is_empty() {
            "."
        } else {
            package.path.as_str()
        };
        let script = path::file_name(&self.target_script(project, package_index));

        let mut cmd = format!("@$(MAKE) --no-print-directory -C {}", dir);
        if script != "Makefile" {
            cmd.push_str(&format!(" -f {}", script));
        }
        cmd.push_str(" CONFIG=$(CONFIG)");
        if let Some(goal) = goal {
            cmd.push(' ');
            cmd.push_str(goal);
        }
        cmd
    }
}

fn is_cpp(file: &str) -> bool {
    matches!(
        path::split_extension(file).1.as_str(),
        "cc" | "cpp" | "cxx" | "C"
    )
}

fn is_csharp(file: &str) -> bool {
    path::split_extension(file).1 == "cs"
}

fn is_compilable(file: &str) -> bool {
    matches!(
        path::split_extension(file).1.as_str(),
        "c" | "cc" | "cpp" | "cxx" | "C" | "s"
    )
}
