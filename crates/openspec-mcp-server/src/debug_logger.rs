// ABOUTME: JSONL trace of MCP tool calls, enabled with OPENSPEC_DEBUG=1
// ABOUTME: Finish records carry the domain outcome (project type, score, endpoint count) per tool

use chrono::Utc;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

static DEBUG_LOG: Mutex<Option<DebugLog>> = Mutex::new(None);

const DEFAULT_DEBUG_DIR: &str = ".openspec/debug";

struct DebugLog {
    file: File,
    path: PathBuf,
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ToolEvent<'a> {
    ToolStart {
        tool: &'a str,
        parameters: &'a JsonValue,
    },
    ToolFinish {
        tool: &'a str,
        outcome: &'a JsonValue,
        elapsed_ms: u64,
    },
    ToolError {
        tool: &'a str,
        parameters: &'a JsonValue,
        error: &'a str,
    },
}

#[derive(Serialize)]
struct Record<'a> {
    timestamp: String,
    #[serde(flatten)]
    event: ToolEvent<'a>,
}

pub struct DebugLogger;

impl DebugLogger {
    /// Enable logging from `OPENSPEC_DEBUG` / `OPENSPEC_DEBUG_DIR`. No-op when unset.
    pub fn init() {
        let enabled = std::env::var("OPENSPEC_DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if !enabled {
            return;
        }

        let dir = std::env::var("OPENSPEC_DEBUG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DEBUG_DIR));

        match Self::enable_in(&dir) {
            Ok(path) => eprintln!("🐛 Debug logging enabled: {}", path.display()),
            Err(e) => eprintln!("Failed to enable debug logging in {}: {}", dir.display(), e),
        }
    }

    /// Start a fresh `tool_debug_<ts>.jsonl` under `dir`, replacing any open log.
    pub fn enable_in(dir: &Path) -> io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!(
            "tool_debug_{}.jsonl",
            Utc::now().format("%Y%m%d_%H%M%S")
        ));
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        if let Ok(mut guard) = DEBUG_LOG.lock() {
            *guard = Some(DebugLog {
                file,
                path: path.clone(),
            });
        }
        Ok(path)
    }

    pub fn disable() {
        if let Ok(mut guard) = DEBUG_LOG.lock() {
            *guard = None;
        }
    }

    pub fn is_enabled() -> bool {
        DEBUG_LOG
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    pub fn current_log_path() -> Option<PathBuf> {
        DEBUG_LOG
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|log| log.path.clone()))
    }

    pub fn log_tool_start(tool: &str, parameters: &JsonValue) {
        Self::write(ToolEvent::ToolStart { tool, parameters });
    }

    pub fn log_tool_finish(tool: &str, outcome: &JsonValue, elapsed: Duration) {
        Self::write(ToolEvent::ToolFinish {
            tool,
            outcome,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        });
    }

    pub fn log_tool_error(tool: &str, parameters: &JsonValue, error: &str) {
        Self::write(ToolEvent::ToolError {
            tool,
            parameters,
            error,
        });
    }

    fn write(event: ToolEvent<'_>) {
        let Ok(mut guard) = DEBUG_LOG.lock() else {
            return;
        };
        let Some(log) = guard.as_mut() else {
            return;
        };
        let record = Record {
            timestamp: Utc::now().to_rfc3339(),
            event,
        };
        if let Ok(line) = serde_json::to_string(&record) {
            let _ = writeln!(log.file, "{}", line);
            let _ = log.file.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use tempfile::TempDir;

    fn read_events(path: &Path) -> Vec<JsonValue> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    #[serial]
    fn finish_record_carries_outcome_and_elapsed() {
        let dir = TempDir::new().unwrap();
        let path = DebugLogger::enable_in(dir.path()).unwrap();

        DebugLogger::log_tool_start("optimize_code_by_spec", &json!({"code": "x();"}));
        DebugLogger::log_tool_finish(
            "optimize_code_by_spec",
            &json!({"compliance_score": 45, "spec_endpoints": 0}),
            Duration::from_millis(12),
        );
        DebugLogger::disable();

        let events = read_events(&path);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["event"], "tool_start");
        assert_eq!(events[0]["parameters"]["code"], "x();");
        assert_eq!(events[1]["event"], "tool_finish");
        assert_eq!(events[1]["outcome"]["compliance_score"], 45);
        assert_eq!(events[1]["elapsed_ms"], 12);
        assert!(events[1]["timestamp"].is_string());
    }

    #[test]
    #[serial]
    fn error_record_keeps_parameters() {
        let dir = TempDir::new().unwrap();
        let path = DebugLogger::enable_in(dir.path()).unwrap();
        let params = json!({"projectName": "../x"});

        DebugLogger::log_tool_error("create_openspec_project", &params, "bad name");
        DebugLogger::disable();

        let events = read_events(&path);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["event"], "tool_error");
        assert_eq!(events[0]["error"], "bad name");
        assert_eq!(events[0]["parameters"]["projectName"], "../x");
    }

    #[test]
    #[serial]
    fn disabled_logger_writes_nothing() {
        DebugLogger::disable();
        std::env::remove_var("OPENSPEC_DEBUG");
        DebugLogger::init();
        assert!(!DebugLogger::is_enabled());
        assert!(DebugLogger::current_log_path().is_none());
        DebugLogger::log_tool_start("generate_openspec_spec", &json!({}));
    }
}
