//! Closed effect vocabularies used by scene effect configuration.
//!
//! Every kind has a `None` variant. Parsing comes in two flavours:
//! [`FromStr`] is strict and reports unknown values, while `parse_lenient`
//! maps anything it does not recognise to `None` so that records written by
//! newer clients still render.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned by strict parsing of an effect kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} value: {value}")]
pub struct EffectParseError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! effect_kind {
    (
        $(#[$meta:meta])*
        $name:ident as $label:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $canon:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
        )]
        pub enum $name {
            #[default]
            #[serde(rename = "none")]
            None,
            $(
                $(#[$vmeta])*
                #[serde(rename = $canon $(, alias = $alias)*)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, `None` first.
            pub const ALL: &'static [$name] = &[$name::None, $($name::$variant),+];

            /// Canonical name as stored in scene records.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $name::None => "none",
                    $($name::$variant => $canon,)+
                }
            }

            pub fn is_none(&self) -> bool {
                matches!(self, $name::None)
            }

            /// Parse, treating unknown or empty values as `None`.
            pub fn parse_lenient(s: &str) -> Self {
                s.parse().unwrap_or_default()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = EffectParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    "" | "none" => Ok($name::None),
                    $($canon $(| $alias)* => Ok($name::$variant),)+
                    _ => Err(EffectParseError {
                        kind: $label,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

effect_kind! {
    /// Animated zoom trajectory.
    Zoom as "zoom" {
        ZoomIn => "zoom_in",
        ZoomOut => "zoom_out",
        /// Slow zoom in with a gentle horizontal drift
        KenBurns => "ken_burns",
        /// Two full in/out cycles over the clip
        Pulse => "pulse",
    }
}

effect_kind! {
    /// Direction the crop window travels.
    Pan as "pan" {
        Left => "left",
        Right => "right",
        Up => "up",
        Down => "down",
    }
}

effect_kind! {
    Fade as "fade" {
        In => "in",
        Out => "out",
        Both => "both" | "in_out",
    }
}

effect_kind! {
    /// Continuous, oscillating, or fixed-angle rotation.
    Rotate as "rotate" {
        Clockwise => "clockwise",
        CounterClockwise => "counter_clockwise",
        Wobble => "wobble",
        Rotate90 => "rotate_90" | "90",
        Rotate180 => "rotate_180" | "180",
        Rotate270 => "rotate_270" | "270",
    }
}

effect_kind! {
    /// Perspective tilt. The `tilt_*` names are accepted for older records.
    Tilt as "3d tilt" {
        Left => "left" | "tilt_left",
        Right => "right" | "tilt_right",
        Forward => "forward" | "tilt_forward",
        Backward => "backward" | "tilt_backward",
    }
}

effect_kind! {
    Blur as "blur" {
        Gaussian => "gaussian",
        /// Horizontal box blur
        Motion => "motion",
        /// Slow zoom blur from the center
        Radial => "radial",
    }
}

effect_kind! {
    Vignette as "vignette" {
        /// Darken the edges
        Dark => "dark",
        /// Brighten the edges
        Light => "light",
    }
}

effect_kind! {
    ColorTemp as "color temperature" {
        Warm => "warm",
        Cool => "cool",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_parse() {
        assert_eq!("zoom_in".parse::<Zoom>().unwrap(), Zoom::ZoomIn);
        assert_eq!(" Ken_Burns ".parse::<Zoom>().unwrap(), Zoom::KenBurns);
        assert_eq!("none".parse::<Pan>().unwrap(), Pan::None);

        let err = "sideways".parse::<Pan>().unwrap_err();
        assert_eq!(err.kind, "pan");
        assert_eq!(err.to_string(), "Unknown pan value: sideways");
    }

    #[test]
    fn test_lenient_parse_defaults_to_none() {
        assert_eq!(Zoom::parse_lenient("spiral"), Zoom::None);
        assert_eq!(Blur::parse_lenient(""), Blur::None);
        assert_eq!(Vignette::parse_lenient("dark"), Vignette::Dark);
    }

    #[test]
    fn test_aliases_normalize() {
        assert_eq!(Fade::parse_lenient("in_out"), Fade::Both);
        assert_eq!(Tilt::parse_lenient("tilt_left"), Tilt::Left);
        assert_eq!(Tilt::parse_lenient("tilt_backward"), Tilt::Backward);
        assert_eq!(Rotate::parse_lenient("rotate_90"), Rotate::Rotate90);
        assert_eq!(Rotate::parse_lenient("270"), Rotate::Rotate270);

        // Canonical name wins on output
        assert_eq!(Tilt::parse_lenient("tilt_right").as_str(), "right");
        assert_eq!(Fade::parse_lenient("in_out").to_string(), "both");
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&Rotate::CounterClockwise).unwrap();
        assert_eq!(json, "\"counter_clockwise\"");

        let tilt: Tilt = serde_json::from_str("\"tilt_forward\"").unwrap();
        assert_eq!(tilt, Tilt::Forward);
    }

    #[test]
    fn test_all_round_trips_through_as_str() {
        for zoom in Zoom::ALL {
            assert_eq!(Zoom::parse_lenient(zoom.as_str()), *zoom);
        }
        for rotate in Rotate::ALL {
            assert_eq!(Rotate::parse_lenient(rotate.as_str()), *rotate);
        }
    }
}
