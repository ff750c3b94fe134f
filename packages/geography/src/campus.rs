//! Campus location registry.
//!
//! The default campus is compiled in from `campus/iridm.toml`. A different
//! site can be supplied as a TOML file with the same layout.

use std::collections::BTreeSet;
use std::path::Path;

use iridm_geography_models::Campus;

use crate::CampusError;

/// Embedded default campus definition.
const DEFAULT_CAMPUS_TOML: &str = include_str!("../campus/iridm.toml");

/// Returns the built-in IRIDM campus.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse or validate. It is a
/// compile-time constant, so a failure is a development error caught by
/// the tests below.
#[must_use]
pub fn default_campus() -> Campus {
    parse_campus("iridm.toml", DEFAULT_CAMPUS_TOML)
        .unwrap_or_else(|e| panic!("Failed to load embedded campus definition: {e}"))
}

/// Loads the campus from `path`, or the built-in campus when `path` is
/// `None`.
///
/// # Errors
///
/// Returns a [`CampusError`] if the override file cannot be read, parsed,
/// or validated.
pub fn load_campus(path: Option<&Path>) -> Result<Campus, CampusError> {
    let Some(path) = path else {
        return Ok(default_campus());
    };

    let content = std::fs::read_to_string(path).map_err(|e| CampusError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let campus = parse_campus(&path.display().to_string(), &content)?;
    log::info!(
        "Loaded campus '{}' with {} locations from {}",
        campus.name,
        campus.locations.len(),
        path.display()
    );
    Ok(campus)
}

/// Parses and validates a campus TOML document.
///
/// # Errors
///
/// Returns [`CampusError::Parse`] on malformed TOML and
/// [`CampusError::Invalid`] when names are blank or duplicated, or a
/// coordinate is out of range.
pub fn parse_campus(name: &str, content: &str) -> Result<Campus, CampusError> {
    let campus: Campus = toml::from_str(content).map_err(|e| CampusError::Parse {
        name: name.to_string(),
        source: e,
    })?;
    validate_campus(&campus).map_err(|reason| CampusError::Invalid {
        name: name.to_string(),
        reason,
    })?;
    Ok(campus)
}

fn validate_campus(campus: &Campus) -> Result<(), String> {
    campus
        .center
        .validate()
        .map_err(|e| format!("campus center: {e}"))?;

    let mut seen = BTreeSet::new();
    for location in &campus.locations {
        if location.name.trim().is_empty() {
            return Err("location with empty name".to_string());
        }
        if !seen.insert(location.name.as_str()) {
            return Err(format!("duplicate location name '{}'", location.name));
        }
        location
            .coordinate()
            .validate()
            .map_err(|e| format!("{}: {e}", location.name))?;
        for point in location.evac_path.iter().chain(&location.extinguishers) {
            point
                .validate()
                .map_err(|e| format!("{} overlay point: {e}", location.name))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_embedded_campus() {
        let campus = default_campus();
        assert_eq!(campus.location_names(), vec!["Admin Block", "Hostel"]);

        let admin = campus.location("Admin Block").unwrap();
        assert_eq!(admin.evac_path.len(), 3);
        assert_eq!(admin.extinguishers.len(), 2);
        assert!((campus.center.latitude - 12.9076).abs() < f64::EPSILON);
    }

    #[test]
    fn none_path_uses_default() {
        assert_eq!(load_campus(None).unwrap(), default_campus());
    }

    #[test]
    fn rejects_duplicate_location_names() {
        let err = parse_campus(
            "dup",
            r#"
            name = "Dup"
            center = [12.9, 77.4]

            [[locations]]
            name = "Hostel"
            latitude = 12.9
            longitude = 77.4

            [[locations]]
            name = "Hostel"
            latitude = 12.91
            longitude = 77.41
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CampusError::Invalid { .. }));
    }

    #[test]
    fn rejects_out_of_range_overlay_point() {
        let err = parse_campus(
            "range",
            r#"
            name = "Range"
            center = [12.9, 77.4]

            [[locations]]
            name = "Library"
            latitude = 12.9
            longitude = 77.4
            extinguishers = [[12.9, 277.4]]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CampusError::Invalid { .. }));
    }

    #[test]
    fn reports_parse_errors() {
        assert!(matches!(
            parse_campus("bad", "name = "),
            Err(CampusError::Parse { .. })
        ));
    }

    #[test]
    fn reads_override_file() {
        let dir = std::env::temp_dir().join("iridm_campus_override");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("campus.toml");
        std::fs::write(
            &path,
            "name = \"Annex\"\ncenter = [12.95, 77.45]\n\n[[locations]]\nname = \"Workshop\"\nlatitude = 12.951\nlongitude = 77.451\n",
        )
        .unwrap();

        let campus = load_campus(Some(&path)).unwrap();
        assert_eq!(campus.name, "Annex");
        assert_eq!(campus.location_names(), vec!["Workshop"]);

        let missing = load_campus(Some(&dir.join("nope.toml"))).unwrap_err();
        assert!(matches!(missing, CampusError::Io { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
