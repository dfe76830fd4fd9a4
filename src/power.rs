use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const POWER_SUPPLY_CLASS: &str = "/sys/class/power_supply";
const PLATFORM_PROFILE: &str = "/sys/firmware/acpi/platform_profile";
const CPU0_GOVERNOR: &str = "/sys/devices/system/cpu/cpu0/cpufreq/scaling_governor";

/// Sentinel: charge percentage not reported.
pub const PERCENT_UNKNOWN: u8 = 255;
/// Sentinel: AC line state not reported.
pub const AC_UNKNOWN: u8 = 255;
/// Sentinel: life time in seconds not reported.
pub const TIME_UNKNOWN: i32 = -1;

/// One consistent read of the system power state.
///
/// Field encodings follow the classic power-status record: `ac_line_status`
/// is 0 (on battery), 1 (on AC) or 255 (unavailable); percent 255 and
/// time -1 mean "not reported" rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPowerStatus {
    pub ac_line_status: u8,
    pub battery_life_percent: u8,
    pub power_saving: bool,
    pub battery_life_time: i32,
    pub battery_full_life_time: i32,
}

/// The power-supply device class could not be queried at all.
///
/// This is the only fatal failure in a sample cycle; everything below the
/// class directory degrades to sentinel values instead.
#[derive(Debug)]
pub struct PowerQueryError {
    code: i32,
    source: std::io::Error,
}

impl PowerQueryError {
    fn new(source: std::io::Error) -> Self {
        let code = source.raw_os_error().unwrap_or(libc::EIO);
        Self { code, source }
    }

    /// Underlying OS error code (always non-zero).
    pub fn os_code(&self) -> i32 {
        self.code
    }
}

impl fmt::Display for PowerQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "power status query failed (os error {}): {}", self.code, self.source)
    }
}

impl std::error::Error for PowerQueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Reader over the power-supply device class.
///
/// Paths are injectable so tests can point it at a fixture tree. Handles
/// are scoped to a single `query()` call; nothing is cached across calls.
pub struct PowerSupplyClass {
    root: PathBuf,
    profile_path: PathBuf,
    governor_path: PathBuf,
}

impl Default for PowerSupplyClass {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerSupplyClass {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from(POWER_SUPPLY_CLASS),
            profile_path: PathBuf::from(PLATFORM_PROFILE),
            governor_path: PathBuf::from(CPU0_GOVERNOR),
        }
    }

    #[cfg(test)]
    pub fn with_root(root: PathBuf) -> Self {
        let profile_path = root.join("platform_profile");
        let governor_path = root.join("scaling_governor");
        Self { root, profile_path, governor_path }
    }

    /// Query the system power state once.
    ///
    /// Fails only if the class directory itself cannot be enumerated; a
    /// missing mains or battery supply yields sentinel values.
    pub fn query(&self) -> Result<RawPowerStatus, PowerQueryError> {
        let supplies = enumerate_supplies(&self.root).map_err(PowerQueryError::new)?;

        let mut status = RawPowerStatus {
            ac_line_status: AC_UNKNOWN,
            battery_life_percent: PERCENT_UNKNOWN,
            power_saving: self.power_saving_active(),
            battery_life_time: TIME_UNKNOWN,
            battery_full_life_time: TIME_UNKNOWN,
        };

        if let Some(mains) = first_of_type(&supplies, "Mains") {
            status.ac_line_status = match read_attr(mains, "online").as_deref() {
                Some("1") => 1,
                Some("0") => 0,
                _ => AC_UNKNOWN,
            };
        }

        if let Some(battery) = first_of_type(&supplies, "Battery") {
            if let Some(percent) = read_attr(battery, "capacity").and_then(|s| s.parse::<u8>().ok()) {
                status.battery_life_percent = percent;
            }
            let (remaining, full) = life_times(battery);
            status.battery_life_time = remaining;
            status.battery_full_life_time = full;
        }

        Ok(status)
    }

    fn power_saving_active(&self) -> bool {
        if let Ok(profile) = fs::read_to_string(&self.profile_path) {
            return profile.trim() == "low-power";
        }
        fs::read_to_string(&self.governor_path)
            .map(|g| g.trim() == "powersave")
            .unwrap_or(false)
    }
}

/// List supply directories sorted by name, so "first enumerated" is stable.
pub fn enumerate_supplies(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    dirs.sort();
    Ok(dirs)
}

pub fn first_of_type<'a>(supplies: &'a [PathBuf], kind: &str) -> Option<&'a Path> {
    supplies
        .iter()
        .find(|dir| read_attr(dir, "type").as_deref() == Some(kind))
        .map(PathBuf::as_path)
}

pub fn read_attr(dir: &Path, name: &str) -> Option<String> {
    fs::read_to_string(dir.join(name))
        .ok()
        .map(|s| s.trim().to_string())
}

fn read_attr_u64(dir: &Path, name: &str) -> Option<u64> {
    read_attr(dir, name).and_then(|s| s.parse().ok())
}

/// Derive (remaining, full-charge) life times in seconds from the battery's
/// energy or charge counters. Both are -1 unless the battery is actively
/// discharging with a non-zero drain rate.
fn life_times(battery: &Path) -> (i32, i32) {
    if read_attr(battery, "status").as_deref() != Some("Discharging") {
        return (TIME_UNKNOWN, TIME_UNKNOWN);
    }

    // Prefer energy_* (uWh against uW); fall back to charge_* (uAh against uA).
    let (now, full, rate) = match (
        read_attr_u64(battery, "energy_now"),
        read_attr_u64(battery, "energy_full"),
        read_attr_u64(battery, "power_now"),
    ) {
        (Some(now), full, Some(rate)) => (Some(now), full, Some(rate)),
        _ => (
            read_attr_u64(battery, "charge_now"),
            read_attr_u64(battery, "charge_full"),
            read_attr_u64(battery, "current_now"),
        ),
    };

    let Some(rate) = rate.filter(|&r| r > 0) else {
        return (TIME_UNKNOWN, TIME_UNKNOWN);
    };

    let to_secs = |amount: u64| -> i32 { (amount.saturating_mul(3600) / rate).min(i32::MAX as u64) as i32 };

    (
        now.map_or(TIME_UNKNOWN, to_secs),
        full.map_or(TIME_UNKNOWN, to_secs),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_supply(root: &Path, name: &str, attrs: &[(&str, &str)]) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        for (attr, value) in attrs {
            fs::write(dir.join(attr), format!("{}\n", value)).unwrap();
        }
    }

    #[test]
    fn query_discharging_battery() {
        let td = TempDir::new().unwrap();
        write_supply(td.path(), "AC", &[("type", "Mains"), ("online", "0")]);
        write_supply(
            td.path(),
            "BAT0",
            &[
                ("type", "Battery"),
                ("capacity", "73"),
                ("status", "Discharging"),
                ("energy_now", "36000000"),
                ("energy_full", "50000000"),
                ("power_now", "10000000"),
            ],
        );

        let status = PowerSupplyClass::with_root(td.path().to_path_buf()).query().unwrap();
        assert_eq!(status.ac_line_status, 0);
        assert_eq!(status.battery_life_percent, 73);
        // 36 Wh at 10 W -> 3.6 h
        assert_eq!(status.battery_life_time, 3600 * 36 / 10);
        assert_eq!(status.battery_full_life_time, 3600 * 5);
        assert!(!status.power_saving);
    }

    #[test]
    fn query_on_ac_reports_time_sentinels() {
        let td = TempDir::new().unwrap();
        write_supply(td.path(), "AC", &[("type", "Mains"), ("online", "1")]);
        write_supply(
            td.path(),
            "BAT0",
            &[
                ("type", "Battery"),
                ("capacity", "100"),
                ("status", "Full"),
                ("energy_now", "50000000"),
                ("power_now", "0"),
            ],
        );

        let status = PowerSupplyClass::with_root(td.path().to_path_buf()).query().unwrap();
        assert_eq!(status.ac_line_status, 1);
        assert_eq!(status.battery_life_time, TIME_UNKNOWN);
        assert_eq!(status.battery_full_life_time, TIME_UNKNOWN);
    }

    #[test]
    fn query_empty_class_yields_sentinels() {
        let td = TempDir::new().unwrap();
        let status = PowerSupplyClass::with_root(td.path().to_path_buf()).query().unwrap();
        assert_eq!(status.ac_line_status, AC_UNKNOWN);
        assert_eq!(status.battery_life_percent, PERCENT_UNKNOWN);
        assert_eq!(status.battery_life_time, TIME_UNKNOWN);
    }

    #[test]
    fn query_missing_class_is_fatal_with_os_code() {
        let td = TempDir::new().unwrap();
        let missing = td.path().join("no_such_class");
        let err = PowerSupplyClass::with_root(missing).query().unwrap_err();
        assert_ne!(err.os_code(), 0);
        assert_eq!(err.os_code(), libc::ENOENT);
    }

    #[test]
    fn charge_counters_used_when_energy_missing() {
        let td = TempDir::new().unwrap();
        write_supply(
            td.path(),
            "BAT0",
            &[
                ("type", "Battery"),
                ("capacity", "50"),
                ("status", "Discharging"),
                ("charge_now", "2000000"),
                ("charge_full", "4000000"),
                ("current_now", "1000000"),
            ],
        );

        let status = PowerSupplyClass::with_root(td.path().to_path_buf()).query().unwrap();
        assert_eq!(status.battery_life_time, 7200);
        assert_eq!(status.battery_full_life_time, 14400);
    }

    #[test]
    fn power_saving_from_platform_profile() {
        let td = TempDir::new().unwrap();
        fs::write(td.path().join("platform_profile"), "low-power\n").unwrap();

        let status = PowerSupplyClass::with_root(td.path().to_path_buf()).query().unwrap();
        assert!(status.power_saving);
    }

    #[test]
    fn first_battery_wins_by_name_order() {
        let td = TempDir::new().unwrap();
        write_supply(td.path(), "BAT1", &[("type", "Battery"), ("capacity", "11")]);
        write_supply(td.path(), "BAT0", &[("type", "Battery"), ("capacity", "99")]);

        let status = PowerSupplyClass::with_root(td.path().to_path_buf()).query().unwrap();
        assert_eq!(status.battery_life_percent, 99);
    }
}
