use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Writes one accepted link per line, replacing any previous list
///
/// Parent directories are created as needed. An empty list leaves an empty
/// file behind.
pub fn write_accepted_links(path: &Path, links: &[String]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut buffer = String::new();
    for link in links {
        buffer.push_str(link);
        buffer.push('\n');
    }

    let mut file = fs::File::create(path)?;
    file.write_all(buffer.as_bytes())?;
    file.flush()
}
