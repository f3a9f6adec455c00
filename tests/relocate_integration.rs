mod common;

use common::{read, snapshot, Project};
use modreloc::io::RealFileSystem;
use modreloc::{relocate, EntryPoint, Error, RelocateOptions, Scope};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

fn package_scope(project: &Project) -> RelocateOptions {
    let mut options = RelocateOptions::new(project.dest(), "out");
    options.scope = Scope::Package;
    options
}

#[test]
fn test_end_to_end_flattens_into_helpers() {
    let project = Project::sample();
    let options = package_scope(&project);

    let report = relocate(
        &project.resolver(),
        &RealFileSystem::new(),
        &["pkg.sub.main".into()],
        &options,
    )
    .unwrap();

    let out = project.dest().join("out");
    let files: Vec<PathBuf> = snapshot(&out).into_keys().collect();
    assert_eq!(
        files,
        vec![
            PathBuf::from("__init__.py"),
            PathBuf::from("helpers/__init__.py"),
            PathBuf::from("helpers/helper_a.py"),
            PathBuf::from("helpers/helper_b.py"),
            PathBuf::from("main.py"),
        ]
    );

    assert_eq!(
        read(&out.join("main.py")),
        "import os\nfrom out.helpers.helper_a import run\nimport out.helpers.helper_b\n\nrun()\n"
    );
    assert_eq!(
        read(&out.join("helpers/helper_b.py")),
        "import json\n\ndef run():\n    return json.dumps('b')\n"
    );

    let main = report
        .modules
        .iter()
        .find(|m| m.old_name == "pkg.sub.main")
        .unwrap();
    assert!(main.primary);
    assert_eq!(main.new_name, "out.main");
    assert!(report
        .modules
        .iter()
        .filter(|m| !m.primary)
        .all(|m| m.new_name.starts_with("out.helpers.")));
}

#[test]
fn test_code_subpackage_holds_the_entry_module() {
    let project = Project::sample();
    let mut options = package_scope(&project);
    options.code_subpackage = Some("app".to_string());

    relocate(
        &project.resolver(),
        &RealFileSystem::new(),
        &["pkg.sub.main".into()],
        &options,
    )
    .unwrap();

    let out = project.dest().join("out");
    assert!(out.join("__init__.py").is_file());
    assert!(out.join("app/__init__.py").is_file());
    assert!(!out.join("main.py").exists());
    assert_eq!(
        read(&out.join("app/main.py")),
        "import os\nfrom out.helpers.helper_a import run\nimport out.helpers.helper_b\n\nrun()\n"
    );
}

#[test]
fn test_flat_helpers_live_in_the_root_package() {
    let project = Project::sample();
    let mut options = package_scope(&project);
    options.helper_subpackage = None;

    relocate(
        &project.resolver(),
        &RealFileSystem::new(),
        &["pkg.sub.main".into()],
        &options,
    )
    .unwrap();

    let out = project.dest().join("out");
    assert!(!out.join("helpers").exists());
    assert!(out.join("helper_a.py").is_file());
    assert!(read(&out.join("main.py")).contains("from out.helper_a import run"));
}

#[test]
fn test_file_entry_point_matches_module_entry_point() {
    let by_name = Project::sample();
    relocate(
        &by_name.resolver(),
        &RealFileSystem::new(),
        &["pkg.sub.main".into()],
        &package_scope(&by_name),
    )
    .unwrap();

    let by_file = Project::sample();
    let entry = EntryPoint::File(by_file.src().join("pkg/sub/main.py"));
    relocate(
        &by_file.resolver(),
        &RealFileSystem::new(),
        &[entry],
        &package_scope(&by_file),
    )
    .unwrap();

    assert_eq!(
        snapshot(&by_name.dest().join("out")),
        snapshot(&by_file.dest().join("out"))
    );
}

#[test]
fn test_every_entry_point_goes_to_the_code_package() {
    let project = Project::sample()
        .with_file("pkg/tools/__init__.py", "")
        .with_file("pkg/tools/cli.py", "from pkg.util.helper_b import run\n");
    let mut options = package_scope(&project);
    options.code_subpackage = Some("app".to_string());

    let report = relocate(
        &project.resolver(),
        &RealFileSystem::new(),
        &["pkg.sub.main".into(), "pkg.tools.cli".into()],
        &options,
    )
    .unwrap();

    let out = project.dest().join("out");
    assert!(out.join("app/main.py").is_file());
    assert_eq!(
        read(&out.join("app/cli.py")),
        "from out.helpers.helper_b import run\n"
    );
    let primaries: Vec<&str> = report
        .modules
        .iter()
        .filter(|m| m.primary)
        .map(|m| m.new_name.as_str())
        .collect();
    assert_eq!(primaries, vec!["out.app.main", "out.app.cli"]);
}

#[test]
fn test_collision_leaves_destination_untouched() {
    let project = Project::new()
        .with_file("pkg/__init__.py", "")
        .with_file("pkg/a/__init__.py", "")
        .with_file("pkg/a/util.py", "A = 1\n")
        .with_file("pkg/b/__init__.py", "")
        .with_file("pkg/b/util.py", "B = 2\n")
        .with_file("pkg/main.py", "import pkg.a.util\nimport pkg.b.util\n");

    let out = project.dest().join("out");
    fs::create_dir_all(out.join("helpers")).unwrap();
    fs::write(out.join("keep.txt"), "precious\n").unwrap();
    fs::write(out.join("helpers/util.py"), "OLD = 0\n").unwrap();
    let before = snapshot(&out);

    let mut options = package_scope(&project);
    options.clear_existing = true;
    let err = relocate(
        &project.resolver(),
        &RealFileSystem::new(),
        &["pkg.main".into()],
        &options,
    )
    .unwrap_err();

    match &err {
        Error::Collision { pairs } => {
            let olds: Vec<&str> = pairs.iter().map(|p| p.old_name.as_str()).collect();
            assert!(olds.contains(&"pkg.a.util"));
            assert!(olds.contains(&"pkg.b.util"));
            assert!(pairs.iter().all(|p| p.new_name == "out.helpers.util"));
        }
        other => panic!("expected a collision, got {:?}", other),
    }
    assert!(err.is_pre_mutation());
    assert!(err.to_string().contains("rename these modules"));
    assert_eq!(snapshot(&out), before);
}

#[test]
fn test_repeated_runs_with_clear_are_identical() {
    let project = Project::sample();
    let mut options = package_scope(&project);
    options.clear_existing = true;
    let out = project.dest().join("out");

    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("stale.py"), "x = 1\n").unwrap();

    relocate(
        &project.resolver(),
        &RealFileSystem::new(),
        &["pkg.sub.main".into()],
        &options,
    )
    .unwrap();
    let first = snapshot(&out);
    assert!(!first.contains_key(&PathBuf::from("stale.py")));

    relocate(
        &project.resolver(),
        &RealFileSystem::new(),
        &["pkg.sub.main".into()],
        &options,
    )
    .unwrap();
    assert_eq!(snapshot(&out), first);
}

#[test]
fn test_unknown_entry_point_creates_nothing() {
    let project = Project::sample();
    let err = relocate(
        &project.resolver(),
        &RealFileSystem::new(),
        &["pkg.missing".into()],
        &package_scope(&project),
    )
    .unwrap_err();

    assert!(matches!(err, Error::Resolution { .. }));
    assert!(!project.dest().exists());
}

#[test]
fn test_package_initializers_share_one_destination() {
    let project = Project::sample();
    let report = relocate(
        &project.resolver(),
        &RealFileSystem::new(),
        &["pkg.sub.main".into()],
        &package_scope(&project),
    )
    .unwrap();

    let init = project.dest().join("out/helpers/__init__.py");
    assert_eq!(report.overwritten, vec![init]);
    assert!(report.distinct_destinations() < report.modules.len());
}

#[test]
fn test_dropping_package_initializers_keeps_helpers_init_empty() {
    let project = Project::sample().with_file("pkg/__init__.py", "VERSION = '1'\n");
    let mut options = package_scope(&project);
    options.drop_package_init_files = true;

    let report = relocate(
        &project.resolver(),
        &RealFileSystem::new(),
        &["pkg.sub.main".into()],
        &options,
    )
    .unwrap();

    assert!(report.overwritten.is_empty());
    assert_eq!(read(&project.dest().join("out/helpers/__init__.py")), "");
}

#[test]
fn test_concurrent_relocations_stay_separate() {
    let first = Project::sample();
    let second = Project::new()
        .with_file("app/__init__.py", "")
        .with_file("app/core/__init__.py", "")
        .with_file("app/core/run.py", "import app.lib.tool\n")
        .with_file("app/lib/__init__.py", "")
        .with_file("app/lib/tool.py", "import os\n");

    let run = |project: &Project, entry: &str, root_package: &str| {
        let mut options = RelocateOptions::new(project.dest(), root_package);
        options.scope = Scope::Package;
        options.clear_existing = true;
        (0..5)
            .map(|_| {
                let report = relocate(
                    &project.resolver(),
                    &RealFileSystem::new(),
                    &[entry.into()],
                    &options,
                )
                .unwrap();
                report
                    .modules
                    .into_iter()
                    .map(|m| m.new_name)
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>()
    };

    let (first_runs, second_runs) = std::thread::scope(|s| {
        let a = s.spawn(|| run(&first, "pkg.sub.main", "alpha"));
        let b = s.spawn(|| run(&second, "app.core.run", "beta"));
        (a.join().unwrap(), b.join().unwrap())
    });

    assert!(first_runs.iter().all(|names| names == &first_runs[0]));
    assert!(second_runs.iter().all(|names| names == &second_runs[0]));
    assert!(first_runs[0].contains(&"alpha.helpers.helper_b".to_string()));
    assert!(first_runs[0].iter().all(|name| name.starts_with("alpha.")));
    assert!(second_runs[0].contains(&"beta.run".to_string()));
    assert!(second_runs[0].iter().all(|name| name.starts_with("beta.")));

    let main = read(&first.dest().join("alpha/main.py"));
    assert!(main.contains("from alpha.helpers.helper_a import run\n"));
    assert!(main.contains("import alpha.helpers.helper_b\n"));
    assert_eq!(
        read(&second.dest().join("beta/run.py")),
        "import beta.helpers.tool\n"
    );
    assert!(!first.dest().join("beta").exists());
    assert!(!second.dest().join("alpha").exists());
}
