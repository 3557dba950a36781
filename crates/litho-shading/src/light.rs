//! Backlight color selection.

use std::str::FromStr;

use glam::Vec3;

/// The three selectable backlight colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LightColor {
    #[default]
    Warm,
    Cool,
    /// The multicolor mode previews as a single warm-neutral tint; cycling
    /// through its physical color program is not simulated.
    Multi,
}

impl LightColor {
    pub const ALL: [LightColor; 3] = [LightColor::Warm, LightColor::Cool, LightColor::Multi];

    /// Linear RGB of the backlight.
    pub fn rgb(self) -> Vec3 {
        match self {
            LightColor::Warm => Vec3::new(1.0, 0.88, 0.65),
            LightColor::Cool => Vec3::new(0.85, 0.92, 1.0),
            LightColor::Multi => Vec3::new(1.0, 0.9, 0.75),
        }
    }

    /// The next color in the cycle order used by the color toggle.
    pub fn next(self) -> Self {
        match self {
            LightColor::Warm => LightColor::Cool,
            LightColor::Cool => LightColor::Multi,
            LightColor::Multi => LightColor::Warm,
        }
    }
}

impl FromStr for LightColor {
    type Err = String;

    /// Parses the lowercase color names used in config files.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warm" => Ok(LightColor::Warm),
            "cool" => Ok(LightColor::Cool),
            "multi" => Ok(LightColor::Multi),
            other => Err(format!("unknown light color \"{other}\"")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warm_is_the_default() {
        assert_eq!(LightColor::default(), LightColor::Warm);
    }

    #[test]
    fn test_colors_are_distinct_and_bounded() {
        for color in LightColor::ALL {
            let rgb = color.rgb();
            assert!(rgb.min_element() > 0.0 && rgb.max_element() <= 1.0, "{color:?}: {rgb}");
        }
        assert_ne!(LightColor::Warm.rgb(), LightColor::Cool.rgb());
        assert_ne!(LightColor::Warm.rgb(), LightColor::Multi.rgb());
    }

    #[test]
    fn test_parses_config_names() {
        assert_eq!("warm".parse::<LightColor>(), Ok(LightColor::Warm));
        assert_eq!("cool".parse::<LightColor>(), Ok(LightColor::Cool));
        assert_eq!("multi".parse::<LightColor>(), Ok(LightColor::Multi));
        assert!("neon".parse::<LightColor>().is_err());
    }

    #[test]
    fn test_cycle_visits_all_colors() {
        let mut color = LightColor::Warm;
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(color);
            color = color.next();
        }
        assert_eq!(color, LightColor::Warm, "cycle length is three");
        assert_eq!(seen.len(), 3);
        assert!(seen.contains(&LightColor::Cool) && seen.contains(&LightColor::Multi));
    }
}
