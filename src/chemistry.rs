use std::path::Path;

use crate::power::{self, POWER_SUPPLY_CLASS};

/// Outcome of the battery chemistry lookup.
///
/// Kept as a tagged result so callers can tell "no battery installed" apart
/// from "the device class could not be read".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chemistry {
    /// Technology string reported by the first enumerated battery.
    Found(String),
    /// No battery supply is enumerable, or it reports no technology.
    NotPresent,
    /// The device class itself could not be read (OS error code).
    QueryFailed(i32),
}

impl Chemistry {
    /// Display form; every non-`Found` case collapses to "unknown".
    pub fn display(&self) -> &str {
        match self {
            Chemistry::Found(text) => text,
            Chemistry::NotPresent | Chemistry::QueryFailed(_) => "unknown",
        }
    }
}

pub fn lookup() -> Chemistry {
    lookup_in(Path::new(POWER_SUPPLY_CLASS))
}

/// Read the chemistry of the first enumerated battery supply.
///
/// Only the first battery is reported; additional batteries on multi-battery
/// systems are ignored. Trailing whitespace and NUL padding are trimmed
/// before the text is exposed, and an empty or "Unknown" technology string
/// is treated as not present rather than passed through.
pub fn lookup_in(root: &Path) -> Chemistry {
    let supplies = match power::enumerate_supplies(root) {
        Ok(supplies) => supplies,
        Err(e) => return Chemistry::QueryFailed(e.raw_os_error().unwrap_or(libc::EIO)),
    };

    let Some(battery) = power::first_of_type(&supplies, "Battery") else {
        return Chemistry::NotPresent;
    };

    match power::read_attr(battery, "technology") {
        Some(raw) => {
            let text = raw.trim_end_matches(['\0', ' ']).to_string();
            if text.is_empty() || text == "Unknown" {
                Chemistry::NotPresent
            } else {
                Chemistry::Found(text)
            }
        }
        None => Chemistry::NotPresent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reports_first_battery_technology() {
        let td = TempDir::new().unwrap();
        let bat = td.path().join("BAT0");
        fs::create_dir_all(&bat).unwrap();
        fs::write(bat.join("type"), "Battery\n").unwrap();
        fs::write(bat.join("technology"), "Li-ion\n").unwrap();

        assert_eq!(lookup_in(td.path()), Chemistry::Found("Li-ion".into()));
    }

    #[test]
    fn trims_nul_padding() {
        let td = TempDir::new().unwrap();
        let bat = td.path().join("BAT0");
        fs::create_dir_all(&bat).unwrap();
        fs::write(bat.join("type"), "Battery").unwrap();
        fs::write(bat.join("technology"), "LiP\0\0\0").unwrap();

        assert_eq!(lookup_in(td.path()), Chemistry::Found("LiP".into()));
    }

    #[test]
    fn no_battery_is_not_present_and_displays_unknown() {
        let td = TempDir::new().unwrap();
        let ac = td.path().join("AC");
        fs::create_dir_all(&ac).unwrap();
        fs::write(ac.join("type"), "Mains").unwrap();

        let chem = lookup_in(td.path());
        assert_eq!(chem, Chemistry::NotPresent);
        assert_eq!(chem.display(), "unknown");
    }

    #[test]
    fn unknown_technology_short_circuits_to_not_present() {
        let td = TempDir::new().unwrap();
        let bat = td.path().join("BAT0");
        fs::create_dir_all(&bat).unwrap();
        fs::write(bat.join("type"), "Battery").unwrap();
        fs::write(bat.join("technology"), "Unknown\n").unwrap();

        assert_eq!(lookup_in(td.path()), Chemistry::NotPresent);
    }

    #[test]
    fn unreadable_class_is_query_failed() {
        let td = TempDir::new().unwrap();
        let chem = lookup_in(&td.path().join("missing"));
        assert!(matches!(chem, Chemistry::QueryFailed(code) if code != 0));
        assert_eq!(chem.display(), "unknown");
    }
}
