/* 📖 # PAL consistency tests

The same scenarios run against MockPal and RealPal so the mock cannot drift away
from what the real filesystem reports.
*/

#[cfg(test)]
mod pal_trait_tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::pal::{FilePath, FileType, MockPal, Pal, PalHandle, RealPal};

    fn mock_tree() -> PalHandle {
        let mock = MockPal::new();
        mock.add_file(FilePath::from("dir1/dir2/test.txt"), b"nested".to_vec());
        mock.add_file(FilePath::from("x.txt"), b"x".to_vec());
        PalHandle::new(mock)
    }

    fn real_tree() -> (TempDir, PalHandle) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        fs::create_dir_all(temp_dir.path().join("dir1/dir2")).unwrap();
        fs::write(temp_dir.path().join("dir1/dir2/test.txt"), "nested").unwrap();
        fs::write(temp_dir.path().join("x.txt"), "x").unwrap();
        let pal = PalHandle::new(RealPal::new(temp_dir.path().to_path_buf()));
        (temp_dir, pal)
    }

    fn check_tree(pal: &PalHandle) {
        let nested = FilePath::from_segments(["dir1", "dir2", "test.txt"]);
        assert!(pal.entry_exists(&nested).unwrap());
        assert_eq!(pal.read_file(&nested).unwrap(), b"nested");
        assert_eq!(pal.symlink_metadata(&nested).unwrap().st_size, 6);
        assert_eq!(
            pal.symlink_metadata(&FilePath::from("dir1")).unwrap().file_type,
            FileType::Directory
        );

        let mut names = pal.list_directory(&FilePath::root()).unwrap();
        names.sort();
        assert_eq!(names, vec!["dir1", "x.txt"]);

        assert!(!pal.entry_exists(&FilePath::from("dir1/missing")).unwrap());
        assert!(pal.list_directory(&FilePath::from("x.txt")).is_err());
        assert!(pal.symlink_metadata(&FilePath::from("missing")).is_err());
    }

    #[test]
    fn test_mock_pal_tree() {
        check_tree(&mock_tree());
    }

    #[test]
    fn test_real_pal_tree() {
        let (_temp_dir, pal) = real_tree();
        check_tree(&pal);
    }

    #[test]
    fn test_pal_handle_deref() {
        let pal = mock_tree();
        let clone = pal.clone();
        assert!(clone.is_directory(&FilePath::from("dir1/dir2")).unwrap());
    }
}
