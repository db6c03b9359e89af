//! Source type → warehouse type mapping.

/// Known source type patterns, checked in declaration order.
///
/// A raw type matching several patterns takes the first one listed.
pub const TYPE_MAPPINGS: &[(&str, &str)] = &[
    ("VARCHAR2", "string"),
    ("NUMBER", "decimal(38,0)"),
    ("DATE", "date"),
];

/// Type used when no pattern matches.
pub const DEFAULT_TYPE: &str = "string";

/// Map a raw catalog type such as `VARCHAR2(50)` to its warehouse type.
pub fn map_data_type(data_type: &str) -> &'static str {
    TYPE_MAPPINGS
        .iter()
        .find(|(pattern, _)| data_type.contains(pattern))
        .map(|(_, standard)| *standard)
        .unwrap_or(DEFAULT_TYPE)
}

/// Printable description of the mapping table.
pub fn mappings_description() -> String {
    let mut out = String::from("Type mapping (first match wins):\n");
    for (pattern, standard) in TYPE_MAPPINGS {
        out.push_str(&format!("  *{}*  ->  {}\n", pattern, standard));
    }
    out.push_str(&format!("  (other) ->  {}\n", DEFAULT_TYPE));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types() {
        assert_eq!(map_data_type("VARCHAR2(50)"), "string");
        assert_eq!(map_data_type("NUMBER(10,2)"), "decimal(38,0)");
        assert_eq!(map_data_type("NUMBER"), "decimal(38,0)");
        assert_eq!(map_data_type("DATE"), "date");
    }

    #[test]
    fn test_unknown_types_default_to_string() {
        assert_eq!(map_data_type("CLOB"), "string");
        assert_eq!(map_data_type("CHAR(1)"), "string");
        assert_eq!(map_data_type(""), "string");
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(map_data_type("TIMESTAMP_DATE"), "date");
        assert_eq!(map_data_type("NVARCHAR2(20)"), "string");
    }

    #[test]
    fn test_first_declared_pattern_wins() {
        assert_eq!(map_data_type("NUMBER_DATE"), "decimal(38,0)");
        assert_eq!(map_data_type("DATE_NUMBER"), "decimal(38,0)");
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert_eq!(map_data_type("number"), "string");
        assert_eq!(map_data_type("date"), "string");
    }

    #[test]
    fn test_description_lists_all_patterns() {
        let desc = mappings_description();
        for (pattern, standard) in TYPE_MAPPINGS {
            assert!(desc.contains(pattern));
            assert!(desc.contains(standard));
        }
    }
}
