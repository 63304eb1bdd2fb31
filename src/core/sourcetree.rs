//! Source tree grouping: a flat file list as a nested directory traversal.
//!
//! Hierarchical formats want files nested under directory groups. This
//! walk derives the nesting from the paths alone: one Open/Close pair per
//! directory level actually present in the list (not a filesystem walk),
//! each directory visited exactly once, subgroups before files.

/// One step of the grouped traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent<'a> {
    /// Entering a directory group
    OpenGroup(&'a str),
    /// A file directly inside the current group
    SourceFile(&'a str),
    /// Leaving a directory group
    CloseGroup(&'a str),
}

/// Walk a package's file list in nested, directory-grouped order.
///
/// Files keep their relative order within each directory. Groups are not
/// emitted for the root or for `..` directories, but their contents are
/// still walked.
pub fn walk_sources<F>(files: &[String], mut visit: F)
where
    F: FnMut(TreeEvent<'_>),
{
    walk(files, "", &mut visit);
}

fn walk<F>(files: &[String], dir: &str, visit: &mut F)
where
    F: FnMut(TreeEvent<'_>),
{
    let grouped = !dir.is_empty() && last_segment(dir) != "..";
    if grouped {
        visit(TreeEvent::OpenGroup(dir));
    }

    let prefix = if dir.is_empty() {
        String::new()
    } else {
        format!("{}/", dir)
    };

    // Recurse into each child directory the first time it appears.
    let mut seen: Vec<&str> = Vec::new();
    for file in files {
        let Some(rest) = file.strip_prefix(&prefix) else {
            continue;
        };
        if let Some(pos) = rest.find('/') {
            let child = &rest[..pos];
            if !seen.contains(&child) {
                seen.push(child);
                let sub = format!("{}{}", prefix, child);
                walk(files, &sub, visit);
            }
        }
    }

    // Then the files that live directly in this directory.
    for file in files {
        if let Some(rest) = file.strip_prefix(&prefix) {
            if !rest.is_empty() && !rest.contains('/') {
                visit(TreeEvent::SourceFile(file));
            }
        }
    }

    if grouped {
        visit(TreeEvent::CloseGroup(dir));
    }
}

fn last_segment(dir: &str) -> &str {
    dir.rsplit('/').next().unwrap_or(dir)
}
