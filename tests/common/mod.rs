// Test utility module for modreloc integration tests
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

use modreloc::resolver::SearchPath;
use modreloc::Resolver;

/// A throwaway Python project under `<temp>/src`.
pub struct Project {
    pub temp: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// The `pkg.sub.main` layout used across the relocation tests.
    pub fn sample() -> Self {
        Self::new()
            .with_file("pkg/__init__.py", "")
            .with_file("pkg/sub/__init__.py", "")
            .with_file("pkg/sub/helper_a.py", "def run():\n    return 'a'\n")
            .with_file("pkg/util/__init__.py", "")
            .with_file(
                "pkg/util/helper_b.py",
                "import json\n\ndef run():\n    return json.dumps('b')\n",
            )
            .with_file(
                "pkg/sub/main.py",
                "import os\nfrom pkg.sub.helper_a import run\nimport pkg.util.helper_b\n\nrun()\n",
            )
    }

    pub fn with_file(self, relative: &str, content: &str) -> Self {
        self.write(relative, content);
        self
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.src().join(relative);
        fs::create_dir_all(path.parent().expect("file has a parent"))
            .expect("Failed to create dirs");
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    pub fn root(&self) -> PathBuf {
        self.temp
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp dir")
    }

    pub fn src(&self) -> PathBuf {
        self.root().join("src")
    }

    pub fn dest(&self) -> PathBuf {
        self.root().join("dist")
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(SearchPath::new(vec![self.src()]))
    }
}

/// Every file under `dir`, keyed by relative path, with its contents.
pub fn snapshot(dir: &Path) -> BTreeMap<PathBuf, String> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(dir)
                .expect("walked path is under dir")
                .to_path_buf();
            let content = fs::read_to_string(entry.path()).expect("Failed to read file");
            (relative, content)
        })
        .collect()
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}
