//! Logging setup emitting JSON lines through `env_logger`.
//!
//! Every record is rendered as `{"ts":..,"level":..,"mod":..,"msg":..}` so the
//! output stays machine parsable regardless of which module logs.

use std::io::Write;

use serde_json::json;

use crate::common::time;

/// Install the global logger. Calling it more than once is a no-op.
pub fn init(filter: &str) {
    let _ = env_logger::Builder::new()
        .parse_filters(filter)
        .format(|buf, record| {
            let line = render(
                time::now_ms(),
                record.level().as_str(),
                record.target(),
                &record.args().to_string(),
            );
            writeln!(buf, "{line}")
        })
        .try_init();
}

/// Render a single log line.
pub fn render(ts: u128, level: &str, module: &str, msg: &str) -> String {
    json!({
        "ts": u64::try_from(ts).unwrap_or(u64::MAX),
        "level": level.to_ascii_lowercase(),
        "mod": module,
        "msg": msg,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_produces_one_json_object() {
        let line = render(42, "WARN", "heartrisk::artifacts", "Scaler not found at \"x\"");
        let value: serde_json::Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(value["ts"], 42);
        assert_eq!(value["level"], "warn");
        assert_eq!(value["mod"], "heartrisk::artifacts");
        assert_eq!(value["msg"], "Scaler not found at \"x\"");
        assert!(!line.contains('\n'));
    }
}
