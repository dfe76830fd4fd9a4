use crate::chemistry::{self, Chemistry};
use crate::power::{PowerQueryError, PowerSupplyClass, RawPowerStatus, PERCENT_UNKNOWN, TIME_UNKNOWN};

/// Immutable battery snapshot, one per poll tick.
///
/// All fields are derived once from a single power-status read; a fresh
/// reading produces a new snapshot rather than mutating this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatteryStatus {
    pub power_supply_type: &'static str,
    pub chemistry: String,
    pub battery_life_percent: String,
    pub power_saving_mode: &'static str,
    pub battery_full_life_time: String,
    pub battery_life_time: String,
}

impl BatteryStatus {
    /// Take one snapshot of the ambient power state.
    ///
    /// Issues exactly one power-status query; its failure is the only fatal
    /// one. The chemistry lookup is best-effort and folds its failures into
    /// the display text.
    pub fn sample() -> Result<Self, PowerQueryError> {
        let raw = PowerSupplyClass::new().query()?;
        Ok(Self::from_parts(&raw, &chemistry::lookup()))
    }

    pub fn from_parts(raw: &RawPowerStatus, chemistry: &Chemistry) -> Self {
        Self {
            power_supply_type: classify_power_source(raw.ac_line_status),
            chemistry: chemistry.display().to_string(),
            battery_life_percent: format_percent(raw.battery_life_percent),
            power_saving_mode: saving_label(raw.power_saving),
            battery_full_life_time: format_life_time(raw.battery_full_life_time),
            battery_life_time: format_life_time(raw.battery_life_time),
        }
    }

    /// Shown until the first successful sample.
    pub fn placeholder() -> Self {
        Self {
            power_supply_type: "status unavailable",
            chemistry: "unknown".into(),
            battery_life_percent: "unknown".into(),
            power_saving_mode: "off",
            battery_full_life_time: "unknown".into(),
            battery_life_time: "unknown".into(),
        }
    }
}

/// Four-way mapping of the AC line status code. Codes outside {0, 1, 255}
/// fall back to "unknown status".
pub fn classify_power_source(code: u8) -> &'static str {
    match code {
        0 => "on battery",
        1 => "connected to power source",
        255 => "status unavailable",
        _ => "unknown status",
    }
}

/// Decimal charge percentage, or "unknown" for the 255 sentinel.
/// Out-of-range readings are passed through as-is, not corrected.
pub fn format_percent(percent: u8) -> String {
    if percent == PERCENT_UNKNOWN {
        "unknown".into()
    } else {
        percent.to_string()
    }
}

/// Render a life time in seconds as "<H> h <M> min", truncating the seconds
/// component. The -1 sentinel renders as "unknown".
pub fn format_life_time(seconds: i32) -> String {
    if seconds == TIME_UNKNOWN {
        return "unknown".into();
    }
    let minutes = seconds / 60;
    let hours = minutes / 60;
    format!("{} h {} min", hours, minutes % 60)
}

pub fn saving_label(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::power::AC_UNKNOWN;

    #[test]
    fn power_source_classification() {
        assert_eq!(classify_power_source(0), "on battery");
        assert_eq!(classify_power_source(1), "connected to power source");
        assert_eq!(classify_power_source(255), "status unavailable");
        assert_eq!(classify_power_source(2), "unknown status");
        assert_eq!(classify_power_source(128), "unknown status");
    }

    #[test]
    fn percent_formatting() {
        assert_eq!(format_percent(255), "unknown");
        assert_eq!(format_percent(0), "0");
        assert_eq!(format_percent(7), "7");
        assert_eq!(format_percent(100), "100");
        // Out-of-range readings pass through untouched.
        assert_eq!(format_percent(130), "130");
    }

    #[test]
    fn life_time_formatting() {
        assert_eq!(format_life_time(-1), "unknown");
        assert_eq!(format_life_time(3725), "1 h 2 min");
        assert_eq!(format_life_time(59), "0 h 0 min");
        assert_eq!(format_life_time(3600), "1 h 0 min");
        assert_eq!(format_life_time(0), "0 h 0 min");
    }

    #[test]
    fn saving_labels() {
        assert_eq!(saving_label(true), "on");
        assert_eq!(saving_label(false), "off");
    }

    #[test]
    fn snapshot_on_ac_with_sentinels() {
        let raw = RawPowerStatus {
            ac_line_status: 1,
            battery_life_percent: 255,
            power_saving: false,
            battery_life_time: -1,
            battery_full_life_time: -1,
        };
        let status = BatteryStatus::from_parts(&raw, &Chemistry::NotPresent);
        assert_eq!(status.power_supply_type, "connected to power source");
        assert_eq!(status.battery_life_percent, "unknown");
        assert_eq!(status.battery_full_life_time, "unknown");
        assert_eq!(status.battery_life_time, "unknown");
        assert_eq!(status.power_saving_mode, "off");
        assert_eq!(status.chemistry, "unknown");
    }

    #[test]
    fn snapshot_discharging() {
        let raw = RawPowerStatus {
            ac_line_status: 0,
            battery_life_percent: 42,
            power_saving: true,
            battery_life_time: 3725,
            battery_full_life_time: 7200,
        };
        let status = BatteryStatus::from_parts(&raw, &Chemistry::Found("Li-ion".into()));
        assert_eq!(status.power_supply_type, "on battery");
        assert_eq!(status.battery_life_percent, "42");
        assert_eq!(status.power_saving_mode, "on");
        assert_eq!(status.battery_life_time, "1 h 2 min");
        assert_eq!(status.battery_full_life_time, "2 h 0 min");
        assert_eq!(status.chemistry, "Li-ion");
    }

    #[test]
    fn placeholder_reads_as_unavailable() {
        let status = BatteryStatus::placeholder();
        assert_eq!(status.power_supply_type, classify_power_source(AC_UNKNOWN));
        assert_eq!(status.battery_life_percent, "unknown");
    }
}
