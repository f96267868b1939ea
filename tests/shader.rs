use glint::prelude::*;

const VS: &str = "#version 330 core\nvoid main(){}\n";
const FS: &str = "#version 330 core\nvoid main(){}\n";

#[test]
fn link_and_bind() {
    let mut device = HeadlessDevice::new();

    let program = ShaderProgram::link(&mut device, VS, FS).unwrap();
    program.bind(&mut device).unwrap();

    // Both stages were compiled in order and deleted after the link.
    assert_eq!(
        device.compiled_stages(),
        &[ShaderStage::Vertex, ShaderStage::Fragment]
    );
    assert_eq!(device.live_stages(), 0);
    assert_eq!(device.live_programs(), 1);

    program.dispose(&mut device).unwrap();
    assert_eq!(device.live_objects(), 0);
}

#[test]
fn vertex_failure_short_circuits() {
    let mut device = HeadlessDevice::new();
    device.reject_stage(ShaderStage::Vertex);

    let err = ShaderProgram::link(&mut device, VS, FS).unwrap_err();
    match err {
        Error::CompileFailure { stage, log, .. } => {
            assert_eq!(stage, ShaderStage::Vertex);
            assert!(!log.is_empty());
        }
        other => panic!("unexpected error: {}", other),
    }

    // The fragment stage is never even submitted to the compiler.
    assert_eq!(device.compiled_stages(), &[ShaderStage::Vertex]);
    assert_eq!(device.live_objects(), 0);
}

#[test]
fn fragment_failure_reports_stage_and_log() {
    let mut device = HeadlessDevice::new();
    device.reject_stage(ShaderStage::Fragment);

    let err = ShaderProgram::link(&mut device, VS, FS).unwrap_err();
    match err {
        Error::CompileFailure {
            stage,
            log,
            excerpt,
        } => {
            assert_eq!(stage, ShaderStage::Fragment);
            assert!(!log.is_empty());
            assert!(excerpt.starts_with("#version 330 core"));
        }
        other => panic!("unexpected error: {}", other),
    }

    // The successfully compiled vertex stage was cleaned up.
    assert_eq!(device.live_stages(), 0);
    assert_eq!(device.live_objects(), 0);
}

#[test]
fn link_failure_deletes_both_stages() {
    let mut device = HeadlessDevice::new();
    device.fail_next_link("fragment output never written");

    let err = ShaderProgram::link(&mut device, VS, FS).unwrap_err();
    match err {
        Error::LinkFailure { log } => assert_eq!(log, "fragment output never written"),
        other => panic!("unexpected error: {}", other),
    }

    assert_eq!(device.live_stages(), 0);
    assert_eq!(device.live_programs(), 0);
}

#[test]
fn uniform_location_cached_per_name() {
    let mut device = HeadlessDevice::new();
    let mut program = ShaderProgram::link(&mut device, VS, FS).unwrap();

    program
        .set_uniform_4f(&mut device, "u_tint", [1.0, 0.0, 0.0, 1.0])
        .unwrap();
    program
        .set_uniform_4f(&mut device, "u_tint", [0.0, 1.0, 0.0, 1.0])
        .unwrap();
    program
        .set_uniform_4f(&mut device, "u_other", [0.0, 0.0, 0.0, 0.0])
        .unwrap();

    // One driver query per distinct name, regardless of write count.
    assert_eq!(device.uniform_lookups(), 2);
    assert_eq!(device.uniform_writes().len(), 3);

    program.dispose(&mut device).unwrap();
}

#[test]
fn unknown_uniform_is_silent_noop() {
    let mut device = HeadlessDevice::new();
    device.miss_uniform("u_missing");

    let mut program = ShaderProgram::link(&mut device, VS, FS).unwrap();
    program
        .set_uniform_4f(&mut device, "u_missing", [1.0, 1.0, 1.0, 1.0])
        .unwrap();
    program
        .set_uniform_4f(&mut device, "u_missing", [1.0, 1.0, 1.0, 1.0])
        .unwrap();

    // Nothing was written, and the NotFound result was cached too.
    assert!(device.uniform_writes().is_empty());
    assert_eq!(device.uniform_lookups(), 1);

    program.dispose(&mut device).unwrap();
}

#[test]
fn from_files_reports_unreadable_source() {
    let mut device = HeadlessDevice::new();

    let err =
        ShaderProgram::from_files(&mut device, "no/such/dir/quad.vs", "no/such/dir/quad.fs")
            .unwrap_err();
    match err {
        Error::SourceRead { path, .. } => {
            assert!(path.ends_with("quad.vs"));
        }
        other => panic!("unexpected error: {}", other),
    }

    assert_eq!(device.live_objects(), 0);
}

#[test]
fn from_files_links_readable_sources() {
    use std::fs;

    let dir = std::env::temp_dir().join("glint-shader-test");
    fs::create_dir_all(&dir).unwrap();
    let vs = dir.join("quad.vs");
    let fs_path = dir.join("quad.fs");
    fs::write(&vs, VS).unwrap();
    fs::write(&fs_path, FS).unwrap();

    let mut device = HeadlessDevice::new();
    let program = ShaderProgram::from_files(&mut device, &vs, &fs_path).unwrap();
    assert_eq!(device.live_programs(), 1);

    program.dispose(&mut device).unwrap();
}
