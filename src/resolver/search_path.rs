//! Module location on a list of root directories.
//!
//! This is the native counterpart of the interpreter's `sys.path` lookup:
//! a dotted name is located component by component, the first component on
//! the search roots and every following one inside the directory of the
//! package located before it.

use crate::errors::{Error, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const PACKAGE_INIT: &str = "__init__.py";
const SOURCE_SUFFIX: &str = "py";
const BYTECODE_SUFFIX: &str = "pyc";
const EXTENSION_SUFFIXES: [&str; 2] = ["so", "pyd"];

/// Where a module was found and what kind of file backs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleLocation {
    /// `name.py`
    Source(PathBuf),
    /// `name/__init__.py`; holds the initializer path
    Package(PathBuf),
    /// `name/` without an initializer
    NamespacePackage(PathBuf),
    /// `name.pyc` with no `name.py` next to it
    Bytecode(PathBuf),
    /// Compiled extension such as `name.cpython-312-x86_64-linux-gnu.so`
    Extension(PathBuf),
}

impl ModuleLocation {
    /// The Python source file, when the module has one.
    pub fn source_file(&self) -> Option<&Path> {
        match self {
            Self::Source(path) | Self::Package(path) => Some(path),
            Self::NamespacePackage(_) | Self::Bytecode(_) | Self::Extension(_) => None,
        }
    }

    /// Directory submodules are searched in, for packages.
    pub fn package_dir(&self) -> Option<&Path> {
        match self {
            Self::Package(init) => init.parent(),
            Self::NamespacePackage(dir) => Some(dir),
            _ => None,
        }
    }

    pub fn is_package(&self) -> bool {
        self.package_dir().is_some()
    }

    /// Short description used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Source(_) => "source module",
            Self::Package(_) => "package",
            Self::NamespacePackage(_) => "namespace package",
            Self::Bytecode(_) => "bytecode-only module",
            Self::Extension(_) => "compiled extension module",
        }
    }
}

/// Ordered list of directories searched for top-level modules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    roots: Vec<PathBuf>,
}

impl SearchPath {
    /// Build a search path from candidate roots. Roots are made absolute;
    /// roots that do not exist are skipped and duplicates are dropped.
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut search_path = Self::default();
        for root in roots {
            search_path.push_root(root);
        }
        search_path
    }

    /// Explicit roots first, then `PYTHONPATH`, then the current directory.
    pub fn from_env(explicit: &[PathBuf]) -> Self {
        let python_path = std::env::var_os("PYTHONPATH")
            .map(|value| std::env::split_paths(&value).collect::<Vec<_>>())
            .unwrap_or_default();
        let current = std::env::current_dir().ok();

        Self::new(
            explicit
                .iter()
                .cloned()
                .chain(python_path)
                .chain(current),
        )
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Copy of this search path with `root` moved to the front.
    pub fn with_leading_root(&self, root: &Path) -> Self {
        let mut roots = vec![root.to_path_buf()];
        roots.extend(self.roots.iter().cloned());
        Self::new(roots)
    }

    fn push_root(&mut self, root: PathBuf) {
        if root.as_os_str().is_empty() {
            return;
        }
        match root.canonicalize() {
            Ok(absolute) if absolute.is_dir() => {
                if !self.roots.contains(&absolute) {
                    self.roots.push(absolute);
                }
            }
            Ok(_) => debug!("Skipping search root {} (not a directory)", root.display()),
            Err(e) => debug!("Skipping search root {}: {}", root.display(), e),
        }
    }

    /// Locate a top-level module on the roots. Regular modules and packages
    /// win over namespace portions found in earlier roots.
    pub fn find_top_level(&self, name: &str) -> Option<ModuleLocation> {
        let mut namespace = None;
        for root in &self.roots {
            match find_in_dir(root, name) {
                Some(ModuleLocation::NamespacePackage(dir)) => {
                    namespace.get_or_insert(ModuleLocation::NamespacePackage(dir));
                }
                Some(found) => return Some(found),
                None => {}
            }
        }
        namespace
    }

    /// Locate a fully-qualified dotted module name.
    pub fn locate(&self, dotted_name: &str) -> Option<ModuleLocation> {
        let mut parts = dotted_name.split('.');
        let mut current = self.find_top_level(parts.next()?)?;
        for part in parts {
            let dir = current.package_dir()?.to_path_buf();
            current = find_in_dir(&dir, part)?;
        }
        Some(current)
    }
}

/// Look for module `name` directly inside `dir`.
pub fn find_in_dir(dir: &Path, name: &str) -> Option<ModuleLocation> {
    if name.is_empty() {
        return None;
    }

    let package_dir = dir.join(name);
    let init = package_dir.join(PACKAGE_INIT);
    if init.is_file() {
        return Some(ModuleLocation::Package(init));
    }

    if let Some(extension) = find_extension(dir, name) {
        return Some(ModuleLocation::Extension(extension));
    }

    let source = dir.join(format!("{}.{}", name, SOURCE_SUFFIX));
    if source.is_file() {
        return Some(ModuleLocation::Source(source));
    }

    let bytecode = dir.join(format!("{}.{}", name, BYTECODE_SUFFIX));
    if bytecode.is_file() {
        return Some(ModuleLocation::Bytecode(bytecode));
    }

    if package_dir.is_dir() {
        return Some(ModuleLocation::NamespacePackage(package_dir));
    }

    None
}

fn find_extension(dir: &Path, name: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| path.is_file() && is_extension_for(path, name))
}

fn is_extension_for(path: &Path, name: &str) -> bool {
    let Some(file_name) = path.file_name().and_then(OsStr::to_str) else {
        return false;
    };
    EXTENSION_SUFFIXES.iter().any(|suffix| {
        file_name == format!("{}.{}", name, suffix)
            || (file_name.starts_with(&format!("{}.", name))
                && file_name.ends_with(&format!(".{}", suffix)))
    })
}

/// Names of the modules directly inside a package directory, as used by
/// `from package import *`.
pub fn list_submodules(package_dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(package_dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| submodule_name(&path))
        .filter(|name| name != "__init__")
        .collect();
    names.sort();
    names.dedup();
    names
}

fn submodule_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let (stem, suffix) = file_name.split_once('.')?;
    let suffix = suffix.rsplit('.').next()?;
    let known = suffix == SOURCE_SUFFIX
        || suffix == BYTECODE_SUFFIX
        || EXTENSION_SUFFIXES.contains(&suffix);
    known.then(|| stem.to_string())
}

/// Map a compiled-bytecode path to its source path by stripping the
/// trailing `c` of `.pyc`. Other paths are returned unchanged.
pub fn normalize_source_path(path: &Path) -> PathBuf {
    if path.extension() == Some(OsStr::new(BYTECODE_SUFFIX)) {
        path.with_extension(SOURCE_SUFFIX)
    } else {
        path.to_path_buf()
    }
}

/// Whether a path names a package initializer file.
pub fn is_package_init(path: &Path) -> bool {
    matches!(
        path.file_name().and_then(OsStr::to_str),
        Some("__init__.py") | Some("__init__.pyc")
    )
}

/// Infer the dotted name of the module defined by `file`, walking up through
/// parent directories for as long as they are packages.
///
/// Returns the dotted name and the absolute source path.
pub fn locate_defining_module(file: &Path) -> Result<(String, PathBuf)> {
    let entry = file.display().to_string();
    let source = normalize_source_path(file);
    if !source.is_file() {
        return Err(Error::resolution(
            entry,
            format!("no source file at {}", source.display()),
        ));
    }
    let source = source
        .canonicalize()
        .map_err(|e| Error::file_system("Failed to resolve path", &source, e))?;

    let stem = source
        .file_stem()
        .and_then(OsStr::to_str)
        .ok_or_else(|| Error::resolution(&entry, "file name is not valid UTF-8"))?;

    let mut parts = Vec::new();
    let mut dir = source.parent();
    if stem == "__init__" {
        let package = dir.ok_or_else(|| Error::resolution(&entry, "package has no directory"))?;
        parts.push(dir_name(package, &entry)?);
        dir = package.parent();
    } else {
        parts.push(stem.to_string());
    }

    while let Some(current) = dir {
        if !current.join(PACKAGE_INIT).is_file() {
            break;
        }
        parts.push(dir_name(current, &entry)?);
        dir = current.parent();
    }

    parts.reverse();
    Ok((parts.join("."), source))
}

fn dir_name(dir: &Path, entry: &str) -> Result<String> {
    dir.file_name()
        .and_then(OsStr::to_str)
        .map(str::to_string)
        .ok_or_else(|| Error::resolution(entry, "directory name is not valid UTF-8"))
}

/// Directory that must be on the search path for `module_name` defined in
/// `source` to be importable.
pub fn import_root(module_name: &str, source: &Path) -> Option<PathBuf> {
    let depth = module_name.split('.').count() + usize::from(is_package_init(source));
    source.ancestors().nth(depth).map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("pkg/__init__.py"));
        touch(&root.join("pkg/sub/__init__.py"));
        touch(&root.join("pkg/sub/main.py"));
        touch(&root.join("pkg/fast.cpython-312-x86_64-linux-gnu.so"));
        touch(&root.join("pkg/legacy.pyc"));
        touch(&root.join("nspkg/inner.py"));
        temp
    }

    #[test]
    fn test_locate_source_module() {
        let temp = project();
        let search = SearchPath::new(vec![temp.path().to_path_buf()]);
        let location = search.locate("pkg.sub.main").unwrap();
        assert!(matches!(location, ModuleLocation::Source(_)));
        assert!(location.source_file().unwrap().ends_with("pkg/sub/main.py"));
    }

    #[test]
    fn test_locate_package_returns_initializer() {
        let temp = project();
        let search = SearchPath::new(vec![temp.path().to_path_buf()]);
        let location = search.locate("pkg.sub").unwrap();
        assert!(location.is_package());
        assert!(location.source_file().unwrap().ends_with("pkg/sub/__init__.py"));
    }

    #[test]
    fn test_locate_non_source_modules() {
        let temp = project();
        let search = SearchPath::new(vec![temp.path().to_path_buf()]);
        assert!(matches!(
            search.locate("pkg.fast"),
            Some(ModuleLocation::Extension(_))
        ));
        assert!(matches!(
            search.locate("pkg.legacy"),
            Some(ModuleLocation::Bytecode(_))
        ));
        assert!(matches!(
            search.locate("nspkg"),
            Some(ModuleLocation::NamespacePackage(_))
        ));
        assert!(search.locate("nspkg.inner").unwrap().source_file().is_some());
        assert!(search.locate("pkg.missing").is_none());
        assert!(search.locate("pkg.sub.main.deeper").is_none());
    }

    #[test]
    fn test_missing_roots_are_skipped() {
        let temp = project();
        let search = SearchPath::new(vec![
            temp.path().join("does-not-exist"),
            temp.path().to_path_buf(),
            temp.path().to_path_buf(),
        ]);
        assert_eq!(search.roots().len(), 1);
    }

    #[test]
    fn test_normalize_source_path() {
        assert_eq!(
            normalize_source_path(Path::new("/a/b/mod.pyc")),
            PathBuf::from("/a/b/mod.py")
        );
        assert_eq!(
            normalize_source_path(Path::new("/a/b/mod.py")),
            PathBuf::from("/a/b/mod.py")
        );
    }

    #[test]
    fn test_is_package_init() {
        assert!(is_package_init(Path::new("/a/__init__.py")));
        assert!(is_package_init(Path::new("/a/__init__.pyc")));
        assert!(!is_package_init(Path::new("/a/init.py")));
    }

    #[test]
    fn test_locate_defining_module_walks_packages() {
        let temp = project();
        let (name, source) =
            locate_defining_module(&temp.path().join("pkg/sub/main.py")).unwrap();
        assert_eq!(name, "pkg.sub.main");
        assert!(source.is_absolute());

        let (name, _) = locate_defining_module(&temp.path().join("pkg/sub/__init__.py")).unwrap();
        assert_eq!(name, "pkg.sub");
    }

    #[test]
    fn test_locate_defining_module_normalizes_bytecode_path() {
        let temp = project();
        let (name, source) =
            locate_defining_module(&temp.path().join("pkg/sub/main.pyc")).unwrap();
        assert_eq!(name, "pkg.sub.main");
        assert_eq!(source.extension(), Some(OsStr::new("py")));
    }

    #[test]
    fn test_locate_defining_module_missing_file() {
        let temp = project();
        let err = locate_defining_module(&temp.path().join("pkg/nope.py")).unwrap_err();
        assert!(matches!(err, Error::Resolution { .. }));
    }

    #[test]
    fn test_import_root() {
        assert_eq!(
            import_root("pkg.sub.main", Path::new("/p/pkg/sub/main.py")),
            Some(PathBuf::from("/p"))
        );
        assert_eq!(
            import_root("pkg.sub", Path::new("/p/pkg/sub/__init__.py")),
            Some(PathBuf::from("/p"))
        );
    }

    #[test]
    fn test_list_submodules() {
        let temp = project();
        let names = list_submodules(&temp.path().join("pkg"));
        assert_eq!(names, vec!["fast".to_string(), "legacy".to_string()]);
    }
}
