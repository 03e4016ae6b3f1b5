//! Scenario: server mode picks up edits while running

use std::thread;
use std::time::{Duration, Instant};

use mason::{BuildServer, BuilderParams};

use crate::common::*;

fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    condition()
}

/// SCENARIO: a file created while the server runs is compiled
#[test]
fn scenario_new_file_is_compiled_while_watching() {
    let env = TestEnv::with_settings(BUILDER_SETTINGS);
    env.write_source("docs/readme.txt", "hello");

    let params = BuilderParams {
        source_path: env.source(),
        target_path: env.target(),
        server: true,
        force_recompile: false,
    };
    let mut server = BuildServer::open(&params).unwrap();
    assert!(server.watched_root().is_some());
    let handle = server.handle();
    let worker = thread::spawn(move || server.run());

    assert!(wait_for(Duration::from_secs(10), || env.target_exists("docs/readme.txt")));

    env.write_source("docs/notes.txt", "written later");
    let compiled = wait_for(Duration::from_secs(10), || {
        env.target_exists("docs/notes.txt") && env.read_target("docs/notes.txt") == "written later"
    });

    handle.stop();
    worker.join().unwrap().unwrap();
    assert!(compiled, "new file was not compiled while watching");
    assert!(env.source().join(".builder/string_id_repository").exists());
}
