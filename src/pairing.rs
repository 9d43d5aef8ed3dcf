// WHY: every method's output sits next to its source as `<stem>_<method>.txt`; these helpers are
// the only place that naming rule is spelled out

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Output file of `method` for a source document: `book-0.txt` → `book-0_<method>.txt`
pub fn method_file_path(source_path: &Path, method: &str) -> PathBuf {
    let mut method_path = source_path.to_path_buf();
    let file_stem = method_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();
    method_path.set_file_name(format!("{file_stem}_{method}.txt"));
    method_path
}

/// Source document a method file belongs to, if the name carries the method suffix
pub fn source_path_for(method_file: &Path, method: &str) -> Option<PathBuf> {
    let file_name = method_file.file_name()?.to_str()?;
    let stem = file_name.strip_suffix(&format!("_{method}.txt"))?;
    if stem.is_empty() {
        return None;
    }
    Some(method_file.with_file_name(format!("{stem}.txt")))
}

/// Write a method's tagged-sentence output next to its source, ending with a newline
///
/// # Example
/// ```no_run
/// use seams_gold::pairing::write_method_file;
/// let content = "0\tSample sentence.\t(1,1,1,17)\n";
/// write_method_file("path/to/book-0.txt", "seams", content).expect("Failed to write method file");
/// ```
pub fn write_method_file<P: AsRef<Path>>(source_path: P, method: &str, content: &str) -> io::Result<PathBuf> {
    let method_path = method_file_path(source_path.as_ref(), method);
    let content_with_newline = if content.ends_with('\n') {
        content.to_string()
    } else {
        format!("{content}\n")
    };
    fs::write(&method_path, content_with_newline)?;
    Ok(method_path)
}
