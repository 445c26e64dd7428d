//! Property — an estate whose devices the simulator manages.
//!
//! Properties are defined by an external directory (a JSON file in the
//! reference deployment); the simulator only uses their ids to scope device
//! generation and filtering. Parsing lives here, file IO stays in the binary.

use serde::{Deserialize, Serialize};

/// One estate entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// On-disk directory format: `{"estates": [...]}`.
///
/// The estates list may contain category-header entries without an `id`;
/// those are not properties and are filtered out.
#[derive(Debug, Default, Deserialize)]
struct PropertyFile {
    #[serde(default)]
    estates: Vec<PropertyEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropertyEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

/// Parse a property directory from its JSON representation, keeping only
/// entries that have both an id and a name.
///
/// # Errors
///
/// Returns the underlying parse error when the document is not valid JSON.
pub fn parse_directory(json: &str) -> Result<Vec<Property>, serde_json::Error> {
    let file: PropertyFile = serde_json::from_str(json)?;
    Ok(file
        .estates
        .into_iter()
        .filter_map(|entry| {
            let id = entry.id?;
            let name = entry.name?;
            Some(Property {
                id,
                name,
                location: entry.location,
            })
        })
        .collect())
}

/// Built-in demo set used when no directory file is available, so the
/// simulator is usable out of the box.
#[must_use]
pub fn demo_properties() -> Vec<Property> {
    [
        ("prop-001", "Main Residence", "Lakeside"),
        ("prop-002", "Guest House", "Lakeside"),
        ("prop-003", "City Apartment", "Downtown"),
    ]
    .into_iter()
    .map(|(id, name, location)| Property {
        id: id.to_string(),
        name: name.to_string(),
        location: Some(location.to_string()),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_directory_and_skip_category_headers() {
        let json = r#"{
            "estates": [
                {"category": "Residential"},
                {"id": "p1", "name": "Main Residence"},
                {"id": "p2", "name": "Guest House", "location": "Lakeside"}
            ]
        }"#;

        let properties = parse_directory(json).unwrap();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0].id, "p1");
        assert_eq!(properties[1].location.as_deref(), Some("Lakeside"));
    }

    #[test]
    fn should_parse_empty_document() {
        let properties = parse_directory("{}").unwrap();
        assert!(properties.is_empty());
    }

    #[test]
    fn should_report_error_for_invalid_json() {
        assert!(parse_directory("{oops").is_err());
    }

    #[test]
    fn should_provide_demo_properties_with_unique_ids() {
        let demo = demo_properties();
        assert_eq!(demo.len(), 3);
        assert_ne!(demo[0].id, demo[1].id);
    }
}
