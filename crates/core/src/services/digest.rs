use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// Release-binary fingerprint: lowercase hex SHA-256 of the file contents,
/// printed alongside the size so a shipped artifact can be matched to the
/// audited one.
pub fn binary_fingerprint(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .with_context(|| format!("Cannot fingerprint {}: open failed", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("Cannot fingerprint {}: read failed", path.display()))?;
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_of_known_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runner");
        std::fs::write(&path, b"abc").unwrap();
        assert_eq!(
            binary_fingerprint(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn missing_binary_names_the_path() {
        let err = binary_fingerprint(Path::new("/nonexistent/runner")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/runner"));
    }
}
