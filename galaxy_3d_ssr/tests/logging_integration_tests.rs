//! Integration tests for ReflectionFeature diagnostics
//!
//! These tests capture the engine log while frames are recorded.
//! No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests


use std::sync::{Arc, Mutex};
use galaxy_3d_ssr::galaxy3d::log::{LogEntry, LogSeverity, Logger};
use galaxy_3d_ssr::galaxy3d::render::ShaderMaterial;
use galaxy_3d_ssr::galaxy3d::Engine;
use serial_test::serial;
use test_utils::{mirror_config, Harness};

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        let mut entries = self.entries.lock().unwrap();
        entries.push(LogEntry {
            severity: entry.severity,
            timestamp: entry.timestamp,
            source: entry.source.clone(),
            message: entry.message.clone(),
            file: entry.file,
            line: entry.line,
        });
    }
}

fn count(entries: &Arc<Mutex<Vec<LogEntry>>>, severity: LogSeverity) -> usize {
    entries
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.severity == severity && e.source == "galaxy3d::ssr::ReflectionFeature")
        .count()
}

// ============================================================================
// DIAGNOSTICS TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_missing_material_logged_once() {
    let mut harness = Harness::new();
    harness.feature.clear_material();

    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);
    for _ in 0..5 {
        let schedule = harness.render_frame(&mirror_config()).unwrap();
        assert!(schedule.is_empty());
    }
    assert_eq!(count(&entries, LogSeverity::Error), 1);

    // Restoring the material re-arms the notice
    harness.feature.set_material(Arc::new(ShaderMaterial::reflection())).unwrap();
    harness.render_frame(&mirror_config()).unwrap();
    harness.feature.clear_material();
    harness.render_frame(&mirror_config()).unwrap();
    assert_eq!(count(&entries, LogSeverity::Error), 2);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_debugger_notice_logged_once() {
    let mut harness = Harness::new();
    harness.host.debug_overlay_active = true;

    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);
    for _ in 0..3 {
        assert!(harness.render_frame(&mirror_config()).unwrap().is_empty());
    }
    assert_eq!(count(&entries, LogSeverity::Info), 1);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_foreign_shader_rejected_with_error() {
    let mut harness = Harness::new();

    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);
    let result = harness.feature.set_material(Arc::new(ShaderMaterial::new("Custom/Unlit")));
    assert!(result.is_err());
    assert_eq!(count(&entries, LogSeverity::Error), 1);

    // The previous material is still used
    assert!(!harness.render_frame(&mirror_config()).unwrap().is_empty());

    Engine::reset_logger();
}
