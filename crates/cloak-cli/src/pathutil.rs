//! Path helpers for naming output files next to their inputs.

/// Final path component, or the whole path if it has no separators.
pub fn file_name(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(index) => &path[index + 1..],
        None => path,
    }
}

/// Extension including the dot, or "" when there is none.
pub fn file_extension(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(index) => &name[index..],
        None => "",
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Name for the edited copy of `path`: the original name with
/// `_modified` before the extension.
///
/// Protected-file wrappers keep their inner extension, so
/// `report.docx.pfile` becomes `report_modified.docx.pfile` rather than
/// `report.docx_modified.pfile`.
pub fn output_path(path: &str) -> String {
    let mut extension = file_extension(path).to_owned();
    let mut stem = &path[..path.len() - extension.len()];

    if eq_ignore_case(&extension, ".pfile") {
        let inner = file_extension(stem).to_owned();
        stem = &path[..path.len() - extension.len() - inner.len()];
        extension = format!("{inner}{extension}");
    }

    format!("{stem}_modified{extension}")
}
