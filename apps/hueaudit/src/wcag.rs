//! WCAG 2.1 reference table and derived thresholds.
//!
//! The table covers the success criteria the analyzers cite. Threshold
//! helpers encode the "large text" definition (18pt, or 14pt bold) and the
//! per-platform minimum touch target sizes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// WCAG conformance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Level {
    A,
    #[default]
    AA,
    AAA,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::A => "A",
            Level::AA => "AA",
            Level::AAA => "AAA",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Level::A),
            "AA" => Ok(Level::AA),
            "AAA" => Ok(Level::AAA),
            other => Err(format!("unknown WCAG level '{}' (expected A|AA|AAA)", other)),
        }
    }
}

/// Target platform for size thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Web,
    Ios,
    Android,
    Windows,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Web => "web",
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" => Ok(Platform::Web),
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            "windows" => Ok(Platform::Windows),
            other => Err(format!(
                "unknown platform '{}' (expected web|ios|android|windows)",
                other
            )),
        }
    }
}

/// A single WCAG success criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Guideline {
    pub id: &'static str,
    pub name: &'static str,
    pub level: Level,
    pub summary: &'static str,
    pub details: &'static str,
    pub url: &'static str,
}

impl Guideline {
    /// Citation text, e.g. `1.4.3 Contrast (Minimum)`.
    pub fn citation(&self) -> String {
        format!("{} {}", self.id, self.name)
    }
}

pub const NON_TEXT_CONTENT: &str = "1.1.1";
pub const INFO_AND_RELATIONSHIPS: &str = "1.3.1";
pub const MEANINGFUL_SEQUENCE: &str = "1.3.2";
pub const USE_OF_COLOR: &str = "1.4.1";
pub const CONTRAST_MINIMUM: &str = "1.4.3";
pub const RESIZE_TEXT: &str = "1.4.4";
pub const CONTRAST_ENHANCED: &str = "1.4.6";
pub const VISUAL_PRESENTATION: &str = "1.4.8";
pub const NON_TEXT_CONTRAST: &str = "1.4.11";
pub const KEYBOARD: &str = "2.1.1";
pub const FOCUS_ORDER: &str = "2.4.3";
pub const LINK_PURPOSE: &str = "2.4.4";
pub const FOCUS_VISIBLE: &str = "2.4.7";
pub const TARGET_SIZE: &str = "2.5.5";
pub const NAME_ROLE_VALUE: &str = "4.1.2";

pub static GUIDELINES: &[Guideline] = &[
    Guideline {
        id: NON_TEXT_CONTENT,
        name: "Non-text Content",
        level: Level::A,
        summary: "All non-text content has a text alternative.",
        details: "All non-text content that is presented to the user has a text alternative that serves the equivalent purpose, except for specific situations.",
        url: "https://www.w3.org/WAI/WCAG21/Understanding/non-text-content.html",
    },
    Guideline {
        id: INFO_AND_RELATIONSHIPS,
        name: "Info and Relationships",
        level: Level::A,
        summary: "Information, structure, and relationships can be programmatically determined.",
        details: "Information, structure, and relationships conveyed through presentation can be programmatically determined or are available in text.",
        url: "https://www.w3.org/WAI/WCAG21/Understanding/info-and-relationships.html",
    },
    Guideline {
        id: MEANINGFUL_SEQUENCE,
        name: "Meaningful Sequence",
        level: Level::A,
        summary: "The reading order of content is logical and intuitive.",
        details: "When the sequence in which content is presented affects its meaning, a correct reading sequence can be programmatically determined.",
        url: "https://www.w3.org/WAI/WCAG21/Understanding/meaningful-sequence.html",
    },
    Guideline {
        id: USE_OF_COLOR,
        name: "Use of Color",
        level: Level::A,
        summary: "Color is not the only visual means of conveying information.",
        details: "Color is not used as the only visual means of conveying information, indicating an action, prompting a response, or distinguishing a visual element.",
        url: "https://www.w3.org/WAI/WCAG21/Understanding/use-of-color.html",
    },
    Guideline {
        id: CONTRAST_MINIMUM,
        name: "Contrast (Minimum)",
        level: Level::AA,
        summary: "Text has sufficient contrast against its background.",
        details: "The visual presentation of text and images of text has a contrast ratio of at least 4.5:1, except for large text (3:1), incidental text, or logotypes.",
        url: "https://www.w3.org/WAI/WCAG21/Understanding/contrast-minimum.html",
    },
    Guideline {
        id: RESIZE_TEXT,
        name: "Resize Text",
        level: Level::AA,
        summary: "Text can be resized without loss of content or functionality.",
        details: "Except for captions and images of text, text can be resized without assistive technology up to 200 percent without loss of content or functionality.",
        url: "https://www.w3.org/WAI/WCAG21/Understanding/resize-text.html",
    },
    Guideline {
        id: CONTRAST_ENHANCED,
        name: "Contrast (Enhanced)",
        level: Level::AAA,
        summary: "Text has enhanced contrast against its background.",
        details: "The visual presentation of text and images of text has a contrast ratio of at least 7:1, except for large text (4.5:1), incidental text, or logotypes.",
        url: "https://www.w3.org/WAI/WCAG21/Understanding/contrast-enhanced.html",
    },
    Guideline {
        id: VISUAL_PRESENTATION,
        name: "Visual Presentation",
        level: Level::AAA,
        summary: "Text is presented in a way that is easy to read.",
        details: "For blocks of text, users can select foreground and background colors, width is no more than 80 characters, text is not fully justified, line spacing is at least 1.5, and text can be resized without requiring horizontal scrolling.",
        url: "https://www.w3.org/WAI/WCAG21/Understanding/visual-presentation.html",
    },
    Guideline {
        id: NON_TEXT_CONTRAST,
        name: "Non-text Contrast",
        level: Level::AA,
        summary: "User interface components and graphical objects have sufficient contrast.",
        details: "The visual presentation of UI components and graphical objects have a contrast ratio of at least 3:1 against adjacent colors.",
        url: "https://www.w3.org/WAI/WCAG21/Understanding/non-text-contrast.html",
    },
    Guideline {
        id: KEYBOARD,
        name: "Keyboard",
        level: Level::A,
        summary: "All functionality is available from a keyboard.",
        details: "All functionality of the content is operable through a keyboard interface without requiring specific timings for individual keystrokes.",
        url: "https://www.w3.org/WAI/WCAG21/Understanding/keyboard.html",
    },
    Guideline {
        id: FOCUS_ORDER,
        name: "Focus Order",
        level: Level::A,
        summary: "Focus moves in a logical order when navigating with a keyboard.",
        details: "If a web page can be navigated sequentially and the navigation sequences affect meaning or operation, focusable components receive focus in an order that preserves meaning and operability.",
        url: "https://www.w3.org/WAI/WCAG21/Understanding/focus-order.html",
    },
    Guideline {
        id: LINK_PURPOSE,
        name: "Link Purpose (In Context)",
        level: Level::A,
        summary: "The purpose of each link can be determined from its text.",
        details: "The purpose of each link can be determined from the link text alone or from the link text together with its programmatically determined link context.",
        url: "https://www.w3.org/WAI/WCAG21/Understanding/link-purpose-in-context.html",
    },
    Guideline {
        id: FOCUS_VISIBLE,
        name: "Focus Visible",
        level: Level::AA,
        summary: "Keyboard focus is visible.",
        details: "Any keyboard operable user interface has a mode of operation where the keyboard focus indicator is visible.",
        url: "https://www.w3.org/WAI/WCAG21/Understanding/focus-visible.html",
    },
    Guideline {
        id: TARGET_SIZE,
        name: "Target Size",
        level: Level::AAA,
        summary: "Touch targets are large enough to interact with.",
        details: "The size of the target for pointer inputs is at least 44 by 44 CSS pixels, except when the target is available through an equivalent link or control on the same page.",
        url: "https://www.w3.org/WAI/WCAG21/Understanding/target-size.html",
    },
    Guideline {
        id: NAME_ROLE_VALUE,
        name: "Name, Role, Value",
        level: Level::A,
        summary: "Interface components expose an accessible name and role.",
        details: "For all user interface components, the name and role can be programmatically determined; states, properties, and values can be programmatically set.",
        url: "https://www.w3.org/WAI/WCAG21/Understanding/name-role-value.html",
    },
];

/// Look up a guideline by id; `None` when the id is not in the table.
pub fn guideline(id: &str) -> Option<&'static Guideline> {
    GUIDELINES.iter().find(|g| g.id == id)
}

/// All guidelines at exactly `level`.
pub fn guidelines_by_level(level: Level) -> Vec<&'static Guideline> {
    GUIDELINES.iter().filter(|g| g.level == level).collect()
}

/// 18pt in CSS pixels.
pub const LARGE_TEXT_PX: f64 = 24.0;
/// 14pt in CSS pixels (14 * 96 / 72).
pub const LARGE_BOLD_TEXT_PX: f64 = 14.0 * 4.0 / 3.0;
/// Weight at or above which text counts as bold.
pub const BOLD_WEIGHT: u16 = 700;

/// Whether text qualifies as "large" under WCAG 1.4.3.
pub fn is_large_text(font_size_px: f64, is_bold: bool) -> bool {
    // 0.01px slack: hosts report 14pt as 18.66 or 18.67.
    font_size_px >= LARGE_TEXT_PX || (is_bold && font_size_px >= LARGE_BOLD_TEXT_PX - 0.01)
}

/// Minimum contrast ratio for text of the given size and weight.
///
/// Level A has no text contrast criterion; it is treated like AA so callers
/// always get a usable floor.
pub fn required_contrast_ratio(font_size_px: f64, is_bold: bool, level: Level) -> f64 {
    let large = is_large_text(font_size_px, is_bold);
    match level {
        Level::AAA => {
            if large {
                4.5
            } else {
                7.0
            }
        }
        Level::A | Level::AA => {
            if large {
                3.0
            } else {
                4.5
            }
        }
    }
}

/// Contrast guideline applied at `level`.
pub fn contrast_guideline(level: Level) -> &'static str {
    match level {
        Level::AAA => CONTRAST_ENHANCED,
        Level::A | Level::AA => CONTRAST_MINIMUM,
    }
}

/// Minimum touch target edge in px for a platform.
pub fn required_touch_target_size(platform: Platform) -> f64 {
    match platform {
        Platform::Ios => 44.0,
        Platform::Android => 48.0,
        Platform::Windows => 40.0,
        Platform::Web => 44.0,
    }
}

/// Smallest text size considered legible on a platform, in px.
pub fn minimum_text_size(platform: Platform) -> f64 {
    match platform {
        Platform::Ios => 11.0,
        Platform::Android | Platform::Windows | Platform::Web => 12.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_contrast_boundaries() {
        assert_eq!(required_contrast_ratio(24.0, false, Level::AA), 3.0);
        assert_eq!(required_contrast_ratio(16.0, false, Level::AA), 4.5);
        assert_eq!(required_contrast_ratio(18.67, true, Level::AA), 3.0);
        assert_eq!(required_contrast_ratio(18.67, false, Level::AA), 4.5);
        assert_eq!(required_contrast_ratio(16.0, false, Level::AAA), 7.0);
        assert_eq!(required_contrast_ratio(30.0, false, Level::AAA), 4.5);
    }

    #[test]
    fn test_bold_threshold_is_fourteen_points() {
        assert!(is_large_text(18.66, true));
        assert!(!is_large_text(18.0, true));
        assert!(!is_large_text(23.9, false));
    }

    #[test]
    fn test_touch_target_sizes() {
        assert_eq!(required_touch_target_size(Platform::Web), 44.0);
        assert_eq!(required_touch_target_size(Platform::Ios), 44.0);
        assert_eq!(required_touch_target_size(Platform::Android), 48.0);
        assert_eq!(required_touch_target_size(Platform::Windows), 40.0);
        assert_eq!(Platform::default(), Platform::Web);
    }

    #[test]
    fn test_lookup() {
        let g = guideline("1.4.3").unwrap();
        assert_eq!(g.level, Level::AA);
        assert_eq!(g.citation(), "1.4.3 Contrast (Minimum)");
        assert!(guideline("9.9.9").is_none());
        assert!(guidelines_by_level(Level::AAA)
            .iter()
            .any(|g| g.id == TARGET_SIZE));
    }

    #[test]
    fn test_every_cited_id_is_in_the_table() {
        for id in [
            NON_TEXT_CONTENT,
            INFO_AND_RELATIONSHIPS,
            MEANINGFUL_SEQUENCE,
            USE_OF_COLOR,
            CONTRAST_MINIMUM,
            RESIZE_TEXT,
            CONTRAST_ENHANCED,
            VISUAL_PRESENTATION,
            NON_TEXT_CONTRAST,
            KEYBOARD,
            FOCUS_ORDER,
            LINK_PURPOSE,
            FOCUS_VISIBLE,
            TARGET_SIZE,
            NAME_ROLE_VALUE,
        ] {
            assert!(guideline(id).is_some(), "missing {}", id);
        }
    }

    #[test]
    fn test_parse_level_and_platform() {
        assert_eq!("aaa".parse::<Level>().unwrap(), Level::AAA);
        assert!("B".parse::<Level>().is_err());
        assert_eq!("Android".parse::<Platform>().unwrap(), Platform::Android);
        assert!("tv".parse::<Platform>().is_err());
    }
}
