//! Shell and subprocess handlers.

use serde_json::{json, Map, Value};
use tokio::process::Command;

use super::{opt_str_arg, opt_u64_arg, str_arg};

type HandlerResult = std::result::Result<Value, String>;

/// Run a shell command, capturing stdout, stderr, and the exit code.
///
/// The child is spawned with `kill_on_drop`: when the gateway's timeout
/// drops this future, the process is terminated rather than left detached.
pub(super) async fn exec_command(args: Map<String, Value>) -> HandlerResult {
    let command = str_arg(&args, "command")?;

    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).kill_on_drop(true);
    if let Some(workdir) = opt_str_arg(&args, "workdir") {
        cmd.current_dir(workdir);
    }

    let output = cmd
        .output()
        .await
        .map_err(|e| format!("spawn failed: {e}"))?;

    Ok(json!({
        "stdout": String::from_utf8_lossy(&output.stdout),
        "stderr": String::from_utf8_lossy(&output.stderr),
        "exit_code": output.status.code(),
    }))
}

/// Ping a host a bounded number of times.
pub(super) async fn ping(args: Map<String, Value>) -> HandlerResult {
    let host = str_arg(&args, "host")?;
    let count = opt_u64_arg(&args, "count").unwrap_or(4).min(16);

    let output = Command::new("ping")
        .arg("-c")
        .arg(count.to_string())
        .arg(host)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| format!("ping unavailable: {e}"))?;

    let text = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        String::from_utf8_lossy(&output.stdout).into_owned()
    };
    Ok(json!(text))
}
