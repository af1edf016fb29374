use std::fs;
use std::io;
use std::path::Path;

/// Returns true when `path` exists and is a regular file (not a directory)
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).map(|m| !m.is_dir()).unwrap_or(false)
}

/// Returns true when `path` exists and is a directory
pub fn directory_exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Creates `path` (and missing parents) with the given unix permission bits
pub fn create_directory(path: impl AsRef<Path>, mode: u32) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder.create(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_and_directory_checks() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.pdf");
        fs::write(&file, b"%PDF").unwrap();

        assert!(file_exists(&file));
        assert!(!directory_exists(&file));
        assert!(directory_exists(dir.path()));
        assert!(!file_exists(dir.path()));
        assert!(!file_exists(dir.path().join("missing.pdf")));
    }

    #[test]
    fn test_create_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("PDFs").join("nested");

        create_directory(&target, 0o755).unwrap();
        assert!(directory_exists(&target));

        // Existing directory is not an error
        create_directory(&target, 0o755).unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&target).unwrap().permissions().mode();
            // umask can only clear bits
            assert_eq!(mode & 0o700, 0o700);
            assert_eq!(mode & 0o022, 0);
        }
    }
}
