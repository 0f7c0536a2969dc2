use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, create_dir_all};
use std::path::Path;
use tempfile::tempdir;

fn write_script(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn build_cli_happy_flow_writes_bundle_and_confirms() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("scripts");
    write_script(&root, "core/init.lua", "print('init')");
    write_script(&root, "main.lua", "print('main')");
    write_script(&root, "README.md", "# not bundled");
    let output = tmp.path().join("_mission.lua");

    let mut cmd = Command::cargo_bin("lua-bundler").expect("Binary exists");
    cmd.arg("--input-root")
        .arg(&root)
        .arg("--output")
        .arg(&output);

    cmd.assert().success().stdout(
        predicate::str::contains("All .lua files have been concatenated into")
            .and(predicate::str::contains("_mission.lua")),
    );

    let bundle = fs::read_to_string(&output).unwrap();
    assert!(bundle.starts_with("-- Build Date and Time: "));
    let init = bundle.find("-- Start of init.lua --").unwrap();
    let main = bundle.find("-- Start of main.lua --").unwrap();
    assert!(init < main, "core/init.lua sorts before main.lua");
    assert!(!bundle.contains("not bundled"));
    assert!(bundle.ends_with("print('main')\n-- End of main.lua --\n\n"));
}

#[test]
fn build_cli_reads_yaml_config_relative_to_its_location() {
    let tmp = tempdir().unwrap();
    write_script(&tmp.path().join("src"), "a.luau", "return 'a'");
    write_script(&tmp.path().join("src"), "b.lua", "return 'b'");
    create_dir_all(tmp.path().join("dist")).unwrap();
    let config = tmp.path().join("bundle.yaml");
    fs::write(
        &config,
        "input_root: src\noutput_path: dist/bundle.luau\nsource_extension: luau\nreplace: atomic\n",
    )
    .unwrap();

    Command::cargo_bin("lua-bundler")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("All .luau files"));

    let bundle = fs::read_to_string(tmp.path().join("dist/bundle.luau")).unwrap();
    assert!(bundle.contains("-- Start of a.luau --\nreturn 'a'\n-- End of a.luau --\n\n"));
    assert!(!bundle.contains("b.lua"));
}

#[test]
fn build_cli_empty_input_produces_header_only() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("scripts");
    create_dir_all(&root).unwrap();
    let output = tmp.path().join("_mission.lua");
    fs::write(&output, "old content").unwrap();

    Command::cargo_bin("lua-bundler")
        .unwrap()
        .arg("--input-root")
        .arg(&root)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("concatenated into"));

    let bundle = fs::read_to_string(&output).unwrap();
    assert_eq!(bundle.lines().count(), 2);
    assert!(bundle.ends_with(" --\n\n"));
    assert!(!bundle.contains("old content"));
}

#[test]
fn build_cli_fails_with_nonzero_exit_for_missing_input_root() {
    let tmp = tempdir().unwrap();

    Command::cargo_bin("lua-bundler")
        .unwrap()
        .arg("--input-root")
        .arg(tmp.path().join("missing"))
        .arg("--output")
        .arg(tmp.path().join("_mission.lua"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("is not an accessible directory"));
}

#[test]
fn build_cli_honours_rust_log_from_dotenv() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("scripts");
    write_script(&root, "a.lua", "a()");
    create_dir_all(tmp.path().join("build")).unwrap();
    fs::write(tmp.path().join(".env"), "RUST_LOG=debug\n").unwrap();

    Command::cargo_bin("lua-bundler")
        .unwrap()
        .current_dir(tmp.path())
        .env_remove("RUST_LOG")
        .arg("--input-root")
        .arg("scripts")
        .assert()
        .success()
        .stderr(predicate::str::contains("Bundle build complete"));

    // Output defaults to `<input root>/../build/_mission.lua`.
    assert!(tmp.path().join("build/_mission.lua").is_file());
}

use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*; // needed for .with()
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut msg = String::new();
        use std::fmt::Write as FmtWrite;
        let _ = write!(&mut msg, "{:?}", event);
        self.events.lock().unwrap().push(msg);
    }
}

#[test]
fn emits_trace_initialised_and_completion_events() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    let tmp = tempdir().unwrap();
    let root = tmp.path().join("scripts");
    write_script(&root, "a.lua", "a()");
    let cli = lua_bundler::Cli {
        input_root: Some(root),
        output: Some(tmp.path().join("out.lua")),
        ..Default::default()
    };
    lua_bundler::run(cli).expect("run should succeed");

    let events = events.lock().unwrap();
    assert!(
        events.iter().any(|e| e.contains("trace_initialised")),
        "No trace_initialised event in {events:?}"
    );
    assert!(
        events.iter().any(|e| e.contains("Bundle build complete")),
        "No completion event in {events:?}"
    );
}
