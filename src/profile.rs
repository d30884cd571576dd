use crate::models::{ProfileData, ProfileOverride, Skill, SocialLink, StatItem};
use crate::state::PageState;
use crate::stats::PROJECTS_STAT_ID;
use crate::storage::{KeyValueStore, PROFILE_KEY};
use tracing::warn;

pub const NAME_ID: &str = "profile-name";
pub const ROLE_ID: &str = "profile-role";
pub const LOCATION_ID: &str = "profile-location";

pub fn about_id(index: usize) -> String {
    format!("about-{index}")
}

/// Baked-in profile rendered when no stored override exists.
pub fn default_profile() -> ProfileData {
    ProfileData {
        name: "Jordan Avila".to_string(),
        role: "Front End Developer".to_string(),
        location: "Porto Alegre, Brazil".to_string(),
        about: vec![
            "Developer focused on the web platform, with four years of building \
             interfaces people actually enjoy using."
                .to_string(),
            "Always looking for the next challenge and a new corner of the stack \
             to learn."
                .to_string(),
        ],
        skills: vec![
            Skill {
                name: "JavaScript".to_string(),
                icon: "JS".to_string(),
            },
            Skill {
                name: "React".to_string(),
                icon: "⚛".to_string(),
            },
            Skill {
                name: "Rust".to_string(),
                icon: "🦀".to_string(),
            },
            Skill {
                name: "TypeScript".to_string(),
                icon: "TS".to_string(),
            },
            Skill {
                name: "CSS".to_string(),
                icon: "🎨".to_string(),
            },
        ],
        social: vec![
            SocialLink {
                label: "GitHub".to_string(),
                url: "https://github.com/jordanavila".to_string(),
            },
            SocialLink {
                label: "LinkedIn".to_string(),
                url: "https://linkedin.com".to_string(),
            },
        ],
        stats: vec![
            StatItem {
                number: "4".to_string(),
                label: "Years of Experience".to_string(),
                id: None,
            },
            StatItem {
                number: "20+".to_string(),
                label: "Completed Projects".to_string(),
                id: Some(PROJECTS_STAT_ID.to_string()),
            },
            StatItem {
                number: "100%".to_string(),
                label: "Dedication".to_string(),
                id: None,
            },
        ],
    }
}

/// Loads the defaults and shallow-merges the stored override on top.
/// Malformed payloads and unknown keys reject the override as a whole; the
/// defaults stand.
pub async fn load_stored(store: &dyn KeyValueStore) -> ProfileData {
    let mut profile = default_profile();
    if let Some(raw) = store.get(PROFILE_KEY).await {
        match serde_json::from_str::<ProfileOverride>(&raw) {
            Ok(over) => profile.merge(over),
            Err(err) => warn!("ignoring malformed stored profile override: {err}"),
        }
    }
    profile
}

/// Writes the profile text region into the surface. Missing nodes are
/// tolerated; the text region is cosmetic.
pub async fn apply_profile(state: &PageState) {
    let profile = state.profile.lock().await.clone();
    let mut surface = state.surface.lock().await;
    surface.set_text(NAME_ID, &profile.name);
    surface.set_text(ROLE_ID, &profile.role);
    surface.set_text(LOCATION_ID, &profile.location);
    for (index, paragraph) in profile.about.iter().enumerate() {
        surface.set_text(&about_id(index), paragraph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn override_merges_over_defaults() {
        let store = MemoryStore::new();
        store
            .set(PROFILE_KEY, r#"{"name":"Riley Sato","role":"Platform Engineer"}"#)
            .await
            .unwrap();

        let profile = load_stored(&store).await;
        assert_eq!(profile.name, "Riley Sato");
        assert_eq!(profile.role, "Platform Engineer");
        // untouched fields keep their defaults
        assert_eq!(profile.location, default_profile().location);
        assert_eq!(profile.stats.len(), 3);
    }

    #[tokio::test]
    async fn malformed_override_keeps_defaults() {
        let store = MemoryStore::new();
        store.set(PROFILE_KEY, "{not json").await.unwrap();

        let profile = load_stored(&store).await;
        assert_eq!(profile.name, default_profile().name);
    }

    #[tokio::test]
    async fn unknown_keys_reject_the_override() {
        let store = MemoryStore::new();
        store
            .set(PROFILE_KEY, r#"{"name":"Riley Sato","admin":true}"#)
            .await
            .unwrap();

        let profile = load_stored(&store).await;
        assert_eq!(profile.name, default_profile().name);
    }
}
