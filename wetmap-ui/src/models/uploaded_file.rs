//! Uploaded file types

/// A candidate file as picked by the user: name and size are known up
/// front, the payload is opaque.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    pub name: String,
    pub payload: Vec<u8>,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Read a candidate from disk, taking the file name from the path
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let payload = std::fs::read(path)?;
        Ok(Self { name, payload })
    }
}

/// A validated upload, immutable once selected
#[derive(Debug, Clone)]
pub struct UploadedFile {
    name: String,
    payload: Vec<u8>,
}

impl UploadedFile {
    /// Construct from a candidate that already passed validation.
    /// Only the validator calls this.
    pub(crate) fn from_validated(candidate: FileCandidate) -> Self {
        Self {
            name: candidate.name,
            payload: candidate.payload,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.payload.len() as u64
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Format bytes for human-readable display
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn test_candidate_from_path() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("tile.npz");
        std::fs::write(&path, b"not really numpy").expect("write file");

        let candidate = FileCandidate::from_path(&path).expect("read candidate");
        assert_eq!(candidate.name, "tile.npz");
        assert_eq!(candidate.payload, b"not really numpy");
    }
}
