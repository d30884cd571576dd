use crate::models::ProfileData;
use crate::profile::{LOCATION_ID, NAME_ID, ROLE_ID, about_id};
use crate::surface::{Node, Surface};
use crate::theme::{THUMB_ID, TOGGLE_ID};

pub const SKILL_CLASS: &str = "skill-item";
pub const SOCIAL_CLASS: &str = "social-btn";
pub const STAT_ITEM_CLASS: &str = "stat-item";
pub const COUNTER_CLASS: &str = "stat-number";

/// Height of the visible window the viewport model scrolls over.
pub const VIEWPORT_HEIGHT: f64 = 600.0;

/// Seeds the surface the engine runs against: the theme toggle, the profile
/// text region, and the reveal-animated skill/social/stat elements, stacked
/// vertically so the stat row starts below the initial window.
pub fn build_surface(profile: &ProfileData) -> Surface {
    let mut surface = Surface::default();

    surface.insert(Node::new(TOGGLE_ID).at(10.0, 40.0));
    surface.insert(Node::new(THUMB_ID).at(10.0, 24.0));

    surface.insert(Node::new(NAME_ID).with_text(&profile.name).at(80.0, 32.0));
    surface.insert(Node::new(ROLE_ID).with_text(&profile.role).at(120.0, 24.0));
    surface.insert(
        Node::new(LOCATION_ID)
            .with_text(&profile.location)
            .at(150.0, 20.0),
    );

    let mut cursor = 190.0;
    for (index, paragraph) in profile.about.iter().enumerate() {
        surface.insert(Node::new(about_id(index)).with_text(paragraph).at(cursor, 48.0));
        cursor += 56.0;
    }

    cursor += 20.0;
    for (index, skill) in profile.skills.iter().enumerate() {
        surface.insert(
            Node::new(format!("skill-{index}"))
                .with_class(SKILL_CLASS)
                .with_text(format!("{} {}", skill.icon, skill.name))
                .at(cursor, 36.0),
        );
        cursor += 44.0;
    }

    cursor += 20.0;
    for (index, link) in profile.social.iter().enumerate() {
        surface.insert(
            Node::new(format!("social-{index}"))
                .with_class(SOCIAL_CLASS)
                .with_text(link.label.clone())
                .at(cursor, 36.0),
        );
        cursor += 44.0;
    }

    // stat row sits below the initial window so its reveal is scroll-driven
    cursor = cursor.max(VIEWPORT_HEIGHT + 40.0);
    for (index, stat) in profile.stats.iter().enumerate() {
        surface.insert(
            Node::new(format!("stat-{index}"))
                .with_class(STAT_ITEM_CLASS)
                .with_text(stat.label.clone())
                .at(cursor, 72.0),
        );
        let number_id = stat
            .id
            .clone()
            .unwrap_or_else(|| format!("stat-number-{index}"));
        surface.insert(
            Node::new(number_id)
                .with_class(COUNTER_CLASS)
                .with_text(stat.number.clone())
                .at(cursor + 8.0, 30.0),
        );
        cursor += 80.0;
    }

    surface
}
