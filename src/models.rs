use serde::{Deserialize, Serialize};

/// Visual mode applied to the page root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn flip(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn parse(value: &str) -> Option<Theme> {
        match value.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// Outcome of one remote stat sync, kept after injection for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRecord {
    pub key: String,
    pub raw_value: Option<u64>,
    pub display_value: String,
}

/// Numeric animation target parsed once from a node's text at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountTarget {
    pub magnitude: u64,
    pub percent: bool,
    pub plus: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatItem {
    pub number: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileData {
    pub name: String,
    pub role: String,
    pub location: String,
    pub about: Vec<String>,
    pub skills: Vec<Skill>,
    pub social: Vec<SocialLink>,
    pub stats: Vec<StatItem>,
}

/// Stored profile override. Only these fields may be overridden; anything
/// else in the stored payload rejects the whole override.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileOverride {
    pub name: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub about: Option<Vec<String>>,
}

impl ProfileData {
    pub fn merge(&mut self, over: ProfileOverride) {
        if let Some(name) = over.name {
            self.name = name;
        }
        if let Some(role) = over.role {
            self.role = role;
        }
        if let Some(location) = over.location {
            self.location = location;
        }
        if let Some(about) = over.about {
            self.about = about;
        }
    }
}
