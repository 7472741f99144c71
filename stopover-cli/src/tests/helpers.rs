//! Test helpers for writing catalogs and requests into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Catalog where the budget of 3 seconds fits A, B, C exactly.
pub(super) const TRIANGLE_CATALOG: &str = r#"{
  "stops": [
    { "id": "A", "value": 0.0 },
    { "id": "B", "value": 1.0 },
    { "id": "C", "value": 1.0 }
  ],
  "durations": [[0.0, 2.0, 3.0], [2.0, 0.0, 1.0], [3.0, 1.0, 0.0]]
}"#;

/// Catalog where B and C both sit one second from A but C is worth more.
pub(super) const WEIGHTED_CATALOG: &str = r#"{
  "stops": [
    { "id": "A", "value": 0.0 },
    { "id": "B", "value": 1.0 },
    { "id": "C", "value": 3.0 }
  ],
  "durations": [[0.0, 1.0, 1.0], [1.0, 0.0, 5.0], [1.0, 5.0, 0.0]]
}"#;

pub(super) const TRIANGLE_REQUEST: &str = r#"{"start":"A","candidates":["B","C"],"budget":3.0}"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write fixture file");
}

/// A temporary directory with a UTF-8 root path.
pub(super) fn workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// Write `contents` to `root/name` and return the path.
pub(super) fn write_file(root: &Utf8Path, name: &str, contents: &str) -> Utf8PathBuf {
    let path = root.join(name);
    write_utf8(&path, contents.as_bytes());
    path
}

/// Parse every output line as JSON.
pub(super) fn reply_lines(output: &[u8]) -> Vec<serde_json::Value> {
    std::str::from_utf8(output)
        .expect("stdout utf-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("reply line is JSON"))
        .collect()
}
