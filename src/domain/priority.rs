use std::fmt;

use serde::{Deserialize, Serialize};

/// Announcement priority. The three known levels are matched ignoring case,
/// anything else is carried through as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Other(String),
}

impl Priority {
    pub const ALL: [Priority; 3] =
        [Priority::Low, Priority::Normal, Priority::High];

    /// Blank input means `Normal`.
    pub fn parse(priority: &str) -> Self {
        let trimmed = priority.trim();
        match trimmed.to_lowercase().as_str() {
            "" | "normal" => Priority::Normal,
            "low" => Priority::Low,
            "high" => Priority::High,
            _ => Priority::Other(trimmed.to_owned()),
        }
    }

    /// Reads a stored value. Only a missing field falls back to `Normal`.
    pub fn from_stored(priority: Option<&str>) -> Self {
        priority.map(Self::parse).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Priority::Low => "Low",
            Priority::Normal => "Normal",
            Priority::High => "High",
            Priority::Other(priority) => priority,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[test]
fn test_parse_priorities() {
    for (input, expected) in [
        ("Low", Priority::Low),
        ("normal", Priority::Normal),
        (" HIGH ", Priority::High),
        ("", Priority::Normal),
        ("Urgent", Priority::Other("Urgent".to_owned())),
    ] {
        assert_eq!(Priority::parse(input), expected);
    }
}

#[test]
fn test_stored_priorities_are_kept() {
    assert_eq!(Priority::from_stored(Some("High")), Priority::High);
    assert_eq!(
        Priority::from_stored(Some("whenever")).as_str(),
        "whenever"
    );
    assert_eq!(Priority::from_stored(None), Priority::Normal);
}
