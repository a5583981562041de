//! Frame-hash regression helpers.
//!
//! Headless runs render into an RGBA buffer; hashing those buffers per frame gives a compact,
//! diffable record of what a timeline looked like. Goldens are stored as JSON next to the tests
//! that own them.

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Environment flag helper: accepts `1/true/yes/on` (case-insensitive).
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// If set, regression tests may rewrite golden files in place.
pub fn update_goldens_enabled() -> bool {
    env_flag("SHOWCASE_UPDATE_GOLDENS")
}

/// Keeps golden names filesystem-safe: anything outside `[A-Za-z0-9_-]` becomes `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// `<crate>/tests/goldens/<name>.json` for the crate invoking the macro.
#[macro_export]
macro_rules! regression_golden_path {
    ($name:expr) => {{
        let base = $crate::regression::sanitize_filename($name);
        ::std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("goldens")
            .join(format!("{base}.json"))
    }};
}

pub fn rgba_sha256_hex(rgba: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rgba);
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameHashGolden {
    pub version: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub hash_alg: String,
    /// One hash per sampled frame, in timeline order.
    pub hashes: Vec<String>,
}

impl FrameHashGolden {
    pub fn new(name: impl Into<String>, width: u32, height: u32, hashes: Vec<String>) -> Self {
        Self {
            version: 1,
            name: name.into(),
            width,
            height,
            hash_alg: "sha256".to_string(),
            hashes,
        }
    }

    /// Index of the first frame whose hash differs, comparing metadata first.
    pub fn first_mismatch(&self, actual: &FrameHashGolden) -> Option<usize> {
        if self.width != actual.width || self.height != actual.height || self.hash_alg != actual.hash_alg {
            return Some(0);
        }
        self.hashes
            .iter()
            .zip(actual.hashes.iter())
            .position(|(a, b)| a != b)
            .or_else(|| (self.hashes.len() != actual.hashes.len()).then(|| self.hashes.len().min(actual.hashes.len())))
    }
}

pub fn load_golden_json(path: impl AsRef<Path>) -> io::Result<FrameHashGolden> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("failed parsing golden json {}: {e}", path.display()),
        )
    })
}

pub fn save_golden_json(path: impl AsRef<Path>, golden: &FrameHashGolden) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, golden).map_err(io::Error::other)?;
    writer.flush()
}

/// Compares `actual` with the golden at `path`, writing it when missing or when `update` is set.
pub fn assert_or_update_golden_json(
    path: impl AsRef<Path>,
    actual: &FrameHashGolden,
    update: bool,
) -> io::Result<()> {
    let path = path.as_ref();
    let exists = path.exists();
    if update || !exists {
        save_golden_json(path, actual)?;
        log::info!(
            "{} golden: {}",
            if exists { "updated" } else { "wrote" },
            path.display()
        );
        return Ok(());
    }

    let expected = load_golden_json(path)?;
    match expected.first_mismatch(actual) {
        None => Ok(()),
        Some(frame) => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "golden mismatch at {} (frame {frame}): expected {} hashes at {}x{}, got {} at {}x{}\n(hint: set SHOWCASE_UPDATE_GOLDENS=1 to rewrite)",
                path.display(),
                expected.hashes.len(),
                expected.width,
                expected.height,
                actual.hashes.len(),
                actual.width,
                actual.height,
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_golden(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir()
            .join(format!("showcase_engine_goldens_{nanos}"))
            .join(format!("{name}.json"))
    }

    #[test]
    fn sha256_of_empty_input_is_well_known() {
        assert_eq!(
            rgba_sha256_hex(&[]),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn missing_golden_is_written_then_compared() {
        let path = temp_golden("write_then_compare");
        let golden = FrameHashGolden::new("g", 4, 4, vec!["a".into(), "b".into()]);

        assert_or_update_golden_json(&path, &golden, false).expect("first run writes the golden");
        assert_eq!(load_golden_json(&path).expect("golden readable"), golden);
        assert_or_update_golden_json(&path, &golden, false).expect("identical hashes match");

        let drifted = FrameHashGolden::new("g", 4, 4, vec!["a".into(), "c".into()]);
        let err = assert_or_update_golden_json(&path, &drifted, false).expect_err("drift detected");
        assert!(err.to_string().contains("frame 1"));
    }

    #[test]
    fn golden_names_become_safe_file_names() {
        assert_eq!(sanitize_filename("showcase timeline/v1"), "showcase_timeline_v1");
        let path = crate::regression_golden_path!("a b");
        assert!(path.ends_with("tests/goldens/a_b.json"));
    }

    #[test]
    fn unset_flags_read_as_off() {
        assert!(!env_flag("SHOWCASE_FLAG_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn first_mismatch_reports_length_differences() {
        let a = FrameHashGolden::new("g", 1, 1, vec!["x".into()]);
        let b = FrameHashGolden::new("g", 1, 1, vec!["x".into(), "y".into()]);
        assert_eq!(a.first_mismatch(&b), Some(1));
        assert_eq!(a.first_mismatch(&a.clone()), None);
        let resized = FrameHashGolden::new("g", 2, 1, vec!["x".into()]);
        assert_eq!(a.first_mismatch(&resized), Some(0));
    }
}
