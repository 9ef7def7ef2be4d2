//! Compiles every project under `test-projects` and multi-file projects built
//! on the fly

use integration_tests::{LijsProject, TestFixture, check_names};
use lj_lower::{TemporaryNames, TemporaryPrefix};
use std::fs;
use std::path::{Path, PathBuf};

fn test_projects() -> Vec<PathBuf> {
    let test_projects_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-projects");
    let mut projects: Vec<_> = fs::read_dir(&test_projects_dir)
        .expect("Failed to read test-projects directory")
        .map(|entry| entry.expect("Failed to read directory entry").path())
        .filter(|path| path.is_dir())
        .collect();
    projects.sort();
    projects
}

fn project_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("unknown")
}

#[test]
fn test_all_projects() {
    let projects = test_projects();
    assert!(!projects.is_empty(), "No test projects found");

    let mut failed_projects = Vec::new();
    for project_path in &projects {
        let name = project_name(project_path);
        let fixture = TestFixture::from_dir(project_path).unwrap();
        assert!(!fixture.files.is_empty(), "{name} has no sources");

        match fixture.compile() {
            Ok(files) => {
                for file in &files {
                    let path = file.path.display();
                    assert!(
                        file.compilation.warnings.is_empty(),
                        "{name}/{path}: {}",
                        file.compilation.render_warnings().unwrap()
                    );
                    if let Err(problem) = check_names(&file.compilation.names) {
                        failed_projects.push(format!("{name}/{path}: {problem}"));
                    }
                    file.compilation.to_json().unwrap();
                }
            }
            Err(error) => failed_projects.push(format!("{name}: {error:#}")),
        }
    }

    assert!(failed_projects.is_empty(), "Failed projects: {failed_projects:#?}");
}

#[test]
fn test_project_config_is_loaded() {
    let project_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-projects/03-modules");
    let fixture = TestFixture::from_dir(&project_path).unwrap();
    assert_eq!(fixture.config.lowering.exports_target, "exports");
    assert_eq!(
        fixture.config.lowering.temporaries,
        TemporaryNames::Counter {
            prefix: TemporaryPrefix::new("tmp").unwrap()
        }
    );

    let files = fixture.compile().unwrap();
    let paths: Vec<_> = files.iter().map(|file| file.path.clone()).collect();
    assert_eq!(paths, [Path::new("lib/math.lijs"), Path::new("main.lijs")]);

    let main = &files[1].compilation;
    assert_eq!(main.names, ["math", "total", "tmp0"]);
    let json = main.to_json().unwrap();
    assert!(json.contains(r#""object":{"type":"Identifier","name":"exports"}"#));
    assert!(json.contains(r#""callee":{"type":"Identifier","name":"require"}"#));
}

#[test]
fn test_nested_loops_use_distinct_indices() {
    let project_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-projects/04-iterators");
    let files = TestFixture::from_dir(&project_path).unwrap().compile().unwrap();
    let compilation = &files[0].compilation;

    assert_eq!(compilation.names, ["_t0", "_t1", "counts", "first"]);
    let json = compilation.to_json().unwrap();
    assert!(json.contains(r#""name":"_i0""#));
    assert!(json.contains(r#""name":"_i1""#));
}

#[test]
fn test_multi_file_project() {
    let mut project = LijsProject::new("shapes");
    project.add_file("main.lijs", "use './area' as area\n(console.log (area.square 3))\n");
    project.add_file("area.lijs", "def square [ side ] (mul side side)\nexport square\n");

    let files = project.compile().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].path, Path::new("area.lijs"));
    assert_eq!(files[0].compilation.names, ["square", "side"]);
    assert_eq!(files[1].compilation.names, ["area"]);
}

#[test]
fn test_project_with_random_temporaries() {
    let mut project = LijsProject::new("random");
    project.with_config("[lowering.temporaries]\nstrategy = \"random\"\nlength = 6\nseed = 3\n");
    project.add_file("main.lijs", "@ [ 1 ] (f item)\n@ [ 2 ] (g item)\n");

    let files = project.compile().unwrap();
    let names = &files[0].compilation.names;
    assert_eq!(names.len(), 2);
    check_names(names).unwrap();
    assert!(names.iter().all(|name| name.len() == 6));
}

#[test]
fn test_project_compile_error_names_file() {
    let mut project = LijsProject::new("broken");
    project.add_file("main.lijs", "(echo hello)\n");
    project.add_file("bad.lijs", "$ a $ b 1\n");

    let error = project.compile().unwrap_err();
    let message = format!("{error:#}");
    assert!(message.contains("Failed to compile bad.lijs"), "{message}");
    assert!(message.contains("value cannot be assignment"), "{message}");
}

#[test]
fn test_project_invalid_config() {
    let mut project = LijsProject::new("misconfigured");
    project.with_config("[lowering.temporaries]\nstrategy = \"counter\"\nprefix = \"1x\"\n");
    project.add_file("main.lijs", "(echo hello)\n");

    let error = project.compile().unwrap_err();
    assert!(format!("{error:#}").contains("Failed to parse config file"));
}
