//! The crash record: a plain text file that collects the reason whenever
//! the process has to stop.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Appends one timestamped entry to the crash record at `path`.
pub fn record(path: &Path, context: &str, err: &dyn std::fmt::Display) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(
        file,
        "[{}] {}: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        context,
        err
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server_crash.log");

        record(&path, "Startup failed", &"environment variable SPREADSHEET_ID is not set").unwrap();
        record(&path, "Server error", &"address in use").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Startup failed: environment variable SPREADSHEET_ID is not set"));
        assert!(lines[1].ends_with("Server error: address in use"));
    }
}
