use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;

use crate::status::BatteryStatus;

#[derive(Debug, Deserialize)]
#[serde(tag = "cmd", rename_all = "kebab-case")]
pub enum IpcCommand {
    SetFontSize { size: f32 },
    ScaleBy { delta: i32 },
    SetLocked { locked: bool },
    ToggleLocked,
    MoveToOutput { name: String },
    ReloadConfig,
    GetState,
    Quit,
}

#[derive(Debug, Default, Serialize)]
pub struct IpcResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    // State fields (only for get-state)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chemistry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_saving: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_charge_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl IpcResponse {
    pub fn ok() -> Self {
        Self { ok: true, ..Self::default() }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self { ok: false, error: Some(msg.into()), ..Self::default() }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn state(
        status: &BatteryStatus,
        width: u32,
        height: u32,
        font_size: f32,
        config_path: &str,
        locked: bool,
        output: Option<&str>,
    ) -> Self {
        Self {
            ok: true,
            error: None,
            power_source: Some(status.power_supply_type.into()),
            chemistry: Some(status.chemistry.clone()),
            charge: Some(status.battery_life_percent.clone()),
            power_saving: Some(status.power_saving_mode.into()),
            full_charge_time: Some(status.battery_full_life_time.clone()),
            remaining_time: Some(status.battery_life_time.clone()),
            width: Some(width),
            height: Some(height),
            font_size: Some(font_size),
            config_path: Some(config_path.into()),
            locked: Some(locked),
            output: output.map(|s| s.into()),
        }
    }
}

pub fn socket_path(override_path: Option<&PathBuf>) -> PathBuf {
    if let Some(p) = override_path {
        return p.clone();
    }
    if let Ok(dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(dir).join("voltie.sock")
    } else {
        let uid = unsafe { libc::getuid() };
        PathBuf::from(format!("/tmp/voltie-{}.sock", uid))
    }
}

pub fn create_listener(path: &PathBuf) -> Result<UnixListener> {
    // Remove stale socket
    if path.exists() {
        // Check if another instance is running
        if UnixStream::connect(path).is_ok() {
            anyhow::bail!("Another voltie instance is already running (socket {} is active)", path.display());
        }
        std::fs::remove_file(path)?;
    }

    let listener = UnixListener::bind(path)?;
    listener.set_nonblocking(true)?;
    log::info!("IPC listening on {}", path.display());
    Ok(listener)
}

pub fn cleanup_socket(path: &PathBuf) {
    if path.exists() {
        let _ = std::fs::remove_file(path);
        log::info!("Removed socket {}", path.display());
    }
}

pub fn read_command(stream: &UnixStream) -> Result<IpcCommand> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let cmd: IpcCommand = serde_json::from_str(line.trim())?;
    Ok(cmd)
}

pub fn write_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
    let json = serde_json::to_string(response)?;
    stream.write_all(json.as_bytes())?;
    stream.write_all(b"\n")?;
    stream.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_from_tagged_json() {
        let cmd: IpcCommand = serde_json::from_str(r#"{"cmd": "set-locked", "locked": true}"#).unwrap();
        assert!(matches!(cmd, IpcCommand::SetLocked { locked: true }));

        let cmd: IpcCommand = serde_json::from_str(r#"{"cmd": "get-state"}"#).unwrap();
        assert!(matches!(cmd, IpcCommand::GetState));
    }

    #[test]
    fn state_response_carries_snapshot_fields() {
        let status = BatteryStatus::placeholder();
        let resp = IpcResponse::state(&status, 200, 120, 16.0, "/tmp/config.toml", false, None);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"power_source\":\"status unavailable\""));
        assert!(json.contains("\"charge\":\"unknown\""));
        // Absent optional fields are skipped entirely
        assert!(!json.contains("\"output\""));
    }
}
