//! Breadth-first import graph walker.
//!
//! Loading a dotted name loads every package on the way to it, `from`
//! imports try their imported names as submodules of package targets, and
//! every located source file is parsed exactly once.

use super::python::{extract_imports, ImportStatement};
use super::{ImportScanner, ScannedModule};
use crate::errors::{Error, Result};
use crate::observability::{set_current_file, set_phase, RelocationPhase};
use crate::resolver::search_path::{find_in_dir, is_package_init, list_submodules, SearchPath};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, debug_span, trace};

/// Static import scanner over a search path.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModuleFinder;

impl ModuleFinder {
    pub fn new() -> Self {
        Self
    }
}

impl ImportScanner for ModuleFinder {
    fn scan(
        &self,
        script: &Path,
        module_name: &str,
        search_path: &SearchPath,
    ) -> Result<BTreeMap<String, ScannedModule>> {
        let _phase = set_phase(RelocationPhase::Scanning);
        let _span = debug_span!("scan", module = module_name).entered();

        let mut walk = FinderWalk::new(search_path);
        walk.scan_file(module_name, script, is_package_init(script))?;
        while let Some(pending) = walk.queue.pop_front() {
            walk.scan_file(&pending.name, &pending.file, pending.is_package)?;
        }

        debug!(
            "Scanned {} files, {} modules reachable, {} names unresolved",
            walk.scanned.len(),
            walk.modules.len(),
            walk.missing.len()
        );
        Ok(walk.modules)
    }
}

struct PendingScan {
    name: String,
    file: PathBuf,
    is_package: bool,
}

struct FinderWalk<'a> {
    search_path: &'a SearchPath,
    modules: BTreeMap<String, ScannedModule>,
    package_dirs: HashMap<String, PathBuf>,
    missing: HashSet<String>,
    scanned: HashSet<PathBuf>,
    queue: VecDeque<PendingScan>,
}

impl<'a> FinderWalk<'a> {
    fn new(search_path: &'a SearchPath) -> Self {
        Self {
            search_path,
            modules: BTreeMap::new(),
            package_dirs: HashMap::new(),
            missing: HashSet::new(),
            scanned: HashSet::new(),
            queue: VecDeque::new(),
        }
    }

    fn scan_file(&mut self, name: &str, file: &Path, is_package: bool) -> Result<()> {
        if !self.scanned.insert(file.to_path_buf()) {
            return Ok(());
        }
        let _file = set_current_file(file);

        let bytes =
            fs::read(file).map_err(|e| Error::file_system("Failed to read module", file, e))?;
        let content = String::from_utf8_lossy(&bytes);

        for statement in extract_imports(&content, file)? {
            trace!("{}:{} {:?}", file.display(), statement.line(), statement);
            self.process_statement(name, is_package, statement);
        }
        Ok(())
    }

    fn process_statement(
        &mut self,
        caller: &str,
        caller_is_package: bool,
        statement: ImportStatement,
    ) {
        match statement {
            ImportStatement::Import { module, .. } => {
                self.import_module(&module);
            }
            ImportStatement::From {
                module,
                level,
                names,
                line,
            } => {
                let base = if level == 0 {
                    module
                } else {
                    match resolve_relative(caller, caller_is_package, level, &module) {
                        Some(base) => base,
                        None => {
                            debug!(
                                "Relative import beyond top-level package in {} (line {})",
                                caller, line
                            );
                            return;
                        }
                    }
                };

                if self.import_module(&base) == Some(true) {
                    self.ensure_fromlist(&base, &names);
                }
            }
        }
    }

    /// Try each name imported from a package as one of its submodules.
    fn ensure_fromlist(&mut self, package: &str, names: &[String]) {
        for name in names {
            if name == "*" {
                let Some(dir) = self.package_dirs.get(package).cloned() else {
                    continue;
                };
                for submodule in list_submodules(&dir) {
                    self.import_module(&format!("{}.{}", package, submodule));
                }
            } else {
                self.import_module(&format!("{}.{}", package, name));
            }
        }
    }

    /// Load a dotted name and every package leading to it. Returns whether
    /// the final module is a package, or `None` if any part is missing.
    fn import_module(&mut self, fqname: &str) -> Option<bool> {
        if fqname.is_empty() {
            return None;
        }

        let mut parent: Option<String> = None;
        let mut is_package = false;
        for part in fqname.split('.') {
            let name = match &parent {
                Some(parent) => format!("{}.{}", parent, part),
                None => part.to_string(),
            };
            is_package = self.load(&name, parent.as_deref(), part)?;
            parent = Some(name);
        }
        Some(is_package)
    }

    fn load(&mut self, name: &str, parent: Option<&str>, part: &str) -> Option<bool> {
        if let Some(module) = self.modules.get(name) {
            return Some(module.is_package);
        }
        if self.missing.contains(name) {
            return None;
        }

        let location = match parent {
            None => self.search_path.find_top_level(part),
            Some(parent) => self
                .package_dirs
                .get(parent)
                .and_then(|dir| find_in_dir(dir, part)),
        };
        let Some(location) = location else {
            debug!("Module {} not found on search path", name);
            self.missing.insert(name.to_string());
            return None;
        };

        let is_package = location.is_package();
        if let Some(dir) = location.package_dir() {
            self.package_dirs.insert(name.to_string(), dir.to_path_buf());
        }

        let file = location.source_file().map(Path::to_path_buf);
        match &file {
            Some(file) => self.queue.push_back(PendingScan {
                name: name.to_string(),
                file: file.clone(),
                is_package,
            }),
            None => debug!("Module {} is a {} without source", name, location.kind()),
        }

        self.modules.insert(
            name.to_string(),
            ScannedModule {
                name: name.to_string(),
                file,
                is_package,
            },
        );
        Some(is_package)
    }
}

/// Absolute name of a relative import made from module `caller`.
fn resolve_relative(
    caller: &str,
    caller_is_package: bool,
    level: usize,
    module: &str,
) -> Option<String> {
    let mut package: Vec<&str> = caller.split('.').collect();
    if !caller_is_package {
        package.pop();
    }
    let keep = package.len().checked_sub(level.saturating_sub(1))?;
    package.truncate(keep);
    if package.is_empty() {
        return None;
    }

    let package = package.join(".");
    if module.is_empty() {
        Some(package)
    } else {
        Some(format!("{}.{}", package, module))
    }
}
