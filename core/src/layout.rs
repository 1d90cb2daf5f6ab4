//! Maps viewport class and canvas area to a target bubble population and
//! on-screen canvas dimensions.
//!
//! Smaller screens get fewer, relatively larger bubbles so they stay legible
//! and touch-targetable; larger screens support a denser field.

use strum::{Display, EnumIter, EnumString};

/// Device class derived by the (excluded) responsive-layout hook.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ScreenSizeClass {
    MobileSmall,
    Mobile,
    Tablet,
    Desktop,
    DesktopLarge,
}

impl ScreenSizeClass {
    /// Inclusive bounds on the target bubble population for this class.
    #[must_use]
    pub const fn population_bounds(self) -> (usize, usize) {
        match self {
            Self::MobileSmall => (6, 10),
            Self::Mobile => (8, 12),
            Self::Tablet => (10, 15),
            Self::Desktop => (12, 20),
            Self::DesktopLarge => (15, 25),
        }
    }

    // canvas area (px²) budgeted per bubble before clamping
    const fn density_divisor(self) -> f32 {
        match self {
            Self::MobileSmall => 11_000.0,
            Self::Mobile => 12_500.0,
            Self::Tablet => 24_000.0,
            Self::Desktop => 36_000.0,
            Self::DesktopLarge => 42_000.0,
        }
    }

    /// Hard cap on canvas dimensions for this class.
    #[must_use]
    pub const fn canvas_cap(self) -> (f32, f32) {
        match self {
            Self::MobileSmall => (300.0, 380.0),
            Self::Mobile => (320.0, 400.0),
            Self::Tablet => (760.0, 560.0),
            Self::Desktop => (1000.0, 680.0),
            Self::DesktopLarge => (1200.0, 800.0),
        }
    }

    #[must_use]
    pub const fn is_mobile(self) -> bool {
        matches!(self, Self::MobileSmall | Self::Mobile)
    }
}

/// Absolute floor below which the canvas is unusable.
pub const MIN_CANVAS_WIDTH: f32 = 280.0;
pub const MIN_CANVAS_HEIGHT: f32 = 250.0;

// landscape phones keep a tighter height so surrounding chrome still fits
const LANDSCAPE_MOBILE_MAX_HEIGHT: f32 = 300.0;

/// Target bubble population for a canvas:
/// `clamp(area / density, class bounds)`.
#[must_use]
pub fn optimal_bubble_count(
    canvas_width: f32,
    canvas_height: f32,
    class: ScreenSizeClass,
) -> usize {
    let (min, max) = class.population_bounds();
    let area = (canvas_width * canvas_height).max(0.0);
    let target = (area / class.density_divisor()) as usize;
    target.clamp(min, max)
}

/// On-screen size of the container the canvas must fit inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerRect {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

/// Canvas dimensions for a container: per-class caps, the actual container
/// bounds and viewport height, and the absolute 280x250 floor.
#[must_use]
pub fn optimal_canvas_size(
    container: ContainerRect,
    viewport_height: f32,
    class: ScreenSizeClass,
) -> CanvasSize {
    let (cap_width, cap_height) = class.canvas_cap();
    let width = container.width.min(cap_width);
    let mut height = container.height.min(cap_height).min(viewport_height);

    if class.is_mobile() && container.width > container.height {
        height = height.min(LANDSCAPE_MOBILE_MAX_HEIGHT);
    }

    CanvasSize {
        width: width.max(MIN_CANVAS_WIDTH),
        height: height.max(MIN_CANVAS_HEIGHT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rstest_reuse;
    use rstest_reuse::{apply, template};
    use strum::IntoEnumIterator;

    #[template]
    #[rstest]
    #[case::zero(0.0, 0.0)]
    #[case::tiny(120.0, 90.0)]
    #[case::phone(320.0, 400.0)]
    #[case::tablet(760.0, 560.0)]
    #[case::desktop(1000.0, 680.0)]
    #[case::huge(4000.0, 3000.0)]
    pub fn canvas_case_template(#[case] width: f32, #[case] height: f32) {}

    #[apply(canvas_case_template)]
    fn test_bubble_count_respects_class_bounds(width: f32, height: f32) {
        for class in ScreenSizeClass::iter() {
            let (min, max) = class.population_bounds();
            let count = optimal_bubble_count(width, height, class);
            assert!(
                (min..=max).contains(&count),
                "{class}: count {count} outside {min}..={max} for {width}x{height}"
            );
        }
    }

    #[test]
    fn test_bubble_count_scales_with_area() {
        let small = optimal_bubble_count(320.0, 400.0, ScreenSizeClass::Desktop);
        let large = optimal_bubble_count(1000.0, 680.0, ScreenSizeClass::Desktop);
        assert!(small <= large);
    }

    #[apply(canvas_case_template)]
    fn test_canvas_size_floor_and_caps(width: f32, height: f32) {
        for class in ScreenSizeClass::iter() {
            let (cap_width, cap_height) = class.canvas_cap();
            let size = optimal_canvas_size(ContainerRect { width, height }, height, class);
            assert!(size.width >= MIN_CANVAS_WIDTH && size.height >= MIN_CANVAS_HEIGHT);
            assert!(size.width <= cap_width.max(MIN_CANVAS_WIDTH));
            assert!(size.height <= cap_height.max(MIN_CANVAS_HEIGHT));
        }
    }

    #[test]
    fn test_desktop_large_cap() {
        let size = optimal_canvas_size(
            ContainerRect {
                width: 2560.0,
                height: 1440.0,
            },
            1440.0,
            ScreenSizeClass::DesktopLarge,
        );
        assert_eq!(
            size,
            CanvasSize {
                width: 1200.0,
                height: 800.0
            }
        );
    }

    #[test]
    fn test_landscape_mobile_caps_height_tighter() {
        let landscape = optimal_canvas_size(
            ContainerRect {
                width: 700.0,
                height: 360.0,
            },
            360.0,
            ScreenSizeClass::Mobile,
        );
        let portrait = optimal_canvas_size(
            ContainerRect {
                width: 360.0,
                height: 700.0,
            },
            700.0,
            ScreenSizeClass::Mobile,
        );
        assert!(landscape.height <= LANDSCAPE_MOBILE_MAX_HEIGHT);
        assert!(landscape.height < portrait.height);
    }

    #[test]
    fn test_viewport_height_is_respected() {
        let size = optimal_canvas_size(
            ContainerRect {
                width: 900.0,
                height: 680.0,
            },
            500.0,
            ScreenSizeClass::Desktop,
        );
        assert_eq!(size.height, 500.0);
    }

    #[rstest]
    #[case("mobile-small", ScreenSizeClass::MobileSmall)]
    #[case("desktop-large", ScreenSizeClass::DesktopLarge)]
    fn test_class_parses_from_kebab_case(#[case] input: &str, #[case] expected: ScreenSizeClass) {
        assert_eq!(input.parse::<ScreenSizeClass>().unwrap(), expected);
    }
}
