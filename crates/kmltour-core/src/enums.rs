//! Restricted-value fields
//!
//! Each enum renders as its KML spelling and parses from it; parsing any
//! other string fails with [`KmlError::InvalidValue`].

use crate::error::{KmlError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! kml_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted value, in declaration order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// KML spelling of the value
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = KmlError;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim() {
                    $($text => Ok(Self::$variant),)+
                    other => Err(KmlError::InvalidValue(format!(
                        "{} must be one of {}, got {other:?}",
                        stringify!($name),
                        [$($text),+].join(", "),
                    ))),
                }
            }
        }
    };
}

kml_enum! {
    /// Color mode of a color style; KML allows exactly these two
    ColorMode {
        /// Use the color as given
        Normal => "normal",
        /// Randomize the color within the given channel ranges
        Random => "random",
    }
}

kml_enum! {
    /// Transition used when flying to a view
    FlyToMode {
        /// Fly out, across, and back in
        Bounce => "bounce",
        /// Continuous motion through successive views
        Smooth => "smooth",
    }
}

kml_enum! {
    /// Time-based refresh behavior of a link
    RefreshMode {
        OnChange => "onChange",
        OnInterval => "onInterval",
        OnExpire => "onExpire",
    }
}

kml_enum! {
    /// View-based refresh behavior of a link
    ViewRefreshMode {
        Never => "never",
        OnStop => "onStop",
        OnRequest => "onRequest",
        OnRegion => "onRegion",
    }
}

kml_enum! {
    /// Units of an `XY` coordinate
    Units {
        Fraction => "fraction",
        Pixels => "pixels",
        InsetPixels => "insetPixels",
    }
}

kml_enum! {
    /// Whether a balloon is drawn
    DisplayMode {
        Default => "default",
        Hide => "hide",
    }
}

kml_enum! {
    /// How a container's children appear in the list view
    ListItemType {
        Check => "check",
        CheckOffOnly => "checkOffOnly",
        CheckHideChildren => "checkHideChildren",
        RadioFolder => "radioFolder",
    }
}

kml_enum! {
    /// State of a list item icon
    ItemIconState {
        Open => "open",
        Closed => "closed",
        Error => "error",
        Fetching0 => "fetching0",
        Fetching1 => "fetching1",
        Fetching2 => "fetching2",
    }
}

kml_enum! {
    /// Projection surface of a photo overlay
    Shape {
        Rectangle => "rectangle",
        Cylinder => "cylinder",
        Sphere => "sphere",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mode_accepts_only_two_values() {
        assert_eq!("normal".parse::<ColorMode>().unwrap(), ColorMode::Normal);
        assert_eq!("random".parse::<ColorMode>().unwrap(), ColorMode::Random);
        let err = "something_wrong".parse::<ColorMode>().unwrap_err();
        assert!(matches!(err, KmlError::InvalidValue(_)));
        assert!(err.to_string().contains("ColorMode must be one of normal, random"));
    }

    #[test]
    fn test_display_matches_kml_spelling() {
        assert_eq!(ViewRefreshMode::OnRegion.to_string(), "onRegion");
        assert_eq!(ListItemType::CheckHideChildren.as_str(), "checkHideChildren");
        assert_eq!(Units::InsetPixels.to_string(), "insetPixels");
    }

    #[test]
    fn test_all_round_trips_through_parse() {
        for mode in RefreshMode::ALL {
            assert_eq!(mode.as_str().parse::<RefreshMode>().unwrap(), *mode);
        }
    }

    #[test]
    fn test_serde_uses_kml_spelling() {
        let json = serde_json::to_string(&FlyToMode::Smooth).unwrap();
        assert_eq!(json, "\"smooth\"");
    }
}
