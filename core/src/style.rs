//! Visual decoration for people holding multiple credited roles.
//!
//! Multi-role people are rare, so their bubbles escalate in visual weight:
//! most people hold one role, two-role people are noteworthy, and a person
//! credited as lyricist, composer, and arranger warrants the most distinct
//! shape on screen.

use strum::{Display, EnumIter, EnumString};

use shabon_types::person::{ConsolidatedPerson, Role, RoleCredit};

/// Visual complexity tier, keyed purely off how many roles a person holds.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Complexity {
    Simple,
    Complex,
    Advanced,
}

/// Shape of a rendered bubble.
///
/// `RoundedSquare` is the baseline for songs and single-role people; tags
/// render as plain circles (`Normal`).
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum BubbleShape {
    Normal,
    RoundedSquare,
    Star,
    Diamond,
}

/// Marker rendered on multi-role bubbles.
pub const MULTI_ROLE_ICON: &str = "✦";

/// Fixed base color for each role; composite gradients are built from these.
#[must_use]
pub const fn role_base_color(role: Role) -> &'static str {
    match role {
        Role::Lyricist => "#f291b5",
        Role::Composer => "#7fb8e6",
        Role::Arranger => "#8fd6a8",
    }
}

/// Same semantics as [`ConsolidatedPerson::is_multi_role`], usable on a bare
/// role set.
#[must_use]
pub const fn is_multi_role(roles: &[RoleCredit]) -> bool {
    roles.len() > 1
}

#[must_use]
pub const fn complexity_for(roles: &[RoleCredit]) -> Complexity {
    match roles.len() {
        0 | 1 => Complexity::Simple,
        2 => Complexity::Complex,
        _ => Complexity::Advanced,
    }
}

/// Role count alone drives the shape; which roles, and how many songs back
/// them, do not matter.
#[must_use]
pub const fn shape_for_role_count(count: usize) -> BubbleShape {
    match count {
        0 | 1 => BubbleShape::RoundedSquare,
        2 => BubbleShape::Star,
        _ => BubbleShape::Diamond,
    }
}

/// Composite color gradient for a role set, colors in role order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompositeColors {
    pub colors: Vec<&'static str>,
    pub primary: Option<&'static str>,
    pub secondary: Option<&'static str>,
}

/// Map each role to its base color. An empty role list yields empty colors
/// and `None` primaries rather than an error.
#[must_use]
pub fn composite_colors(roles: &[RoleCredit]) -> CompositeColors {
    let colors: Vec<&'static str> = roles
        .iter()
        .map(|credit| role_base_color(credit.role))
        .collect();
    let primary = colors.first().copied();
    let secondary = colors.get(1).copied().or(primary);

    CompositeColors {
        colors,
        primary,
        secondary,
    }
}

/// The merged decoration applied to a bubble: shape, gradient, icon marker,
/// and emphasis parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeStyle {
    pub shape: BubbleShape,
    pub colors: CompositeColors,
    pub icon: Option<&'static str>,
    pub stroke_width: f32,
    pub shadow_blur: f32,
}

/// Compose the full style for a role set.
///
/// Multi-role bubbles come back visually heavier (icon marker, thicker
/// stroke, larger shadow); single-role callers receive a plain style.
#[must_use]
pub fn composite_style(roles: &[RoleCredit]) -> CompositeStyle {
    let (stroke_width, shadow_blur) = match complexity_for(roles) {
        Complexity::Simple => (1.5, 4.0),
        Complexity::Complex => (2.5, 8.0),
        Complexity::Advanced => (3.5, 12.0),
    };

    CompositeStyle {
        shape: shape_for_role_count(roles.len()),
        colors: composite_colors(roles),
        icon: if is_multi_role(roles) {
            Some(MULTI_ROLE_ICON)
        } else {
            None
        },
        stroke_width,
        shadow_blur,
    }
}

/// Sanity check applied before a person reaches the render stream: every role
/// must be backed by at least one song, and the person must relate to at
/// least one song overall. Malformed upstream data is dropped, not rendered.
#[must_use]
pub fn validate_multi_role_person(person: &ConsolidatedPerson) -> bool {
    person.total_related_count > 0
        && !person.roles.is_empty()
        && person.roles.iter().all(|credit| credit.song_count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::Arc;

    fn credits(roles: &[Role]) -> Vec<RoleCredit> {
        roles
            .iter()
            .map(|&role| RoleCredit {
                role,
                song_count: 1,
            })
            .collect()
    }

    #[rstest]
    #[case(0, BubbleShape::RoundedSquare)]
    #[case(1, BubbleShape::RoundedSquare)]
    #[case(2, BubbleShape::Star)]
    #[case(3, BubbleShape::Diamond)]
    fn test_shape_for_role_count(#[case] count: usize, #[case] expected: BubbleShape) {
        assert_eq!(shape_for_role_count(count), expected);
    }

    #[rstest]
    #[case(&[Role::Composer], Complexity::Simple)]
    #[case(&[Role::Lyricist, Role::Composer], Complexity::Complex)]
    #[case(&[Role::Lyricist, Role::Composer, Role::Arranger], Complexity::Advanced)]
    fn test_complexity_tiers(#[case] roles: &[Role], #[case] expected: Complexity) {
        assert_eq!(complexity_for(&credits(roles)), expected);
    }

    #[test]
    fn test_composite_colors_follow_role_order() {
        let colors = composite_colors(&credits(&[Role::Composer, Role::Lyricist]));
        assert_eq!(
            colors.colors,
            vec![role_base_color(Role::Composer), role_base_color(Role::Lyricist)]
        );
        assert_eq!(colors.primary, Some(role_base_color(Role::Composer)));
        assert_eq!(colors.secondary, Some(role_base_color(Role::Lyricist)));
    }

    #[test]
    fn test_composite_colors_single_role_secondary_falls_back() {
        let colors = composite_colors(&credits(&[Role::Arranger]));
        assert_eq!(colors.primary, colors.secondary);
    }

    #[test]
    fn test_composite_colors_empty_roles() {
        let colors = composite_colors(&[]);
        assert_eq!(colors, CompositeColors::default());
        assert_eq!(colors.primary, None);
        assert_eq!(colors.secondary, None);
    }

    #[test]
    fn test_composite_style_escalates_with_complexity() {
        let simple = composite_style(&credits(&[Role::Lyricist]));
        let complex = composite_style(&credits(&[Role::Lyricist, Role::Composer]));
        let advanced =
            composite_style(&credits(&[Role::Lyricist, Role::Composer, Role::Arranger]));

        assert_eq!(simple.icon, None);
        assert_eq!(complex.icon, Some(MULTI_ROLE_ICON));
        assert_eq!(advanced.shape, BubbleShape::Diamond);
        assert!(simple.stroke_width < complex.stroke_width);
        assert!(complex.shadow_blur < advanced.shadow_blur);
    }

    #[rstest]
    #[case(&[(Role::Lyricist, 1), (Role::Composer, 2)], 3, true)]
    #[case(&[(Role::Lyricist, 0)], 1, false)]
    #[case(&[(Role::Lyricist, 1)], 0, false)]
    #[case(&[], 1, false)]
    fn test_validate_multi_role_person(
        #[case] roles: &[(Role, usize)],
        #[case] total: usize,
        #[case] expected: bool,
    ) {
        let person = ConsolidatedPerson {
            name: Arc::from("山田花子"),
            roles: roles
                .iter()
                .map(|&(role, song_count)| RoleCredit { role, song_count })
                .collect(),
            total_related_count: total,
            songs: Vec::new(),
        };
        assert_eq!(validate_multi_role_person(&person), expected);
    }
}
