// ABOUTME: CSS3 named color lookup for tag colors
// ABOUTME: Normalizes #RGB/#RRGGBB hex values and maps them to their CSS3 color name
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::sync::LazyLock;

use regex::Regex;

use foodgram_core::constants::tags::COLOR_PATTERN;

/// CSS3 named colors sorted by hex value
///
/// Where CSS3 defines two spellings for one value, the `gray`, `aqua` and
/// `fuchsia` spellings are used.
static CSS3_COLORS: &[(&str, &str)] = &[
    ("#000000", "black"),
    ("#000080", "navy"),
    ("#00008b", "darkblue"),
    ("#0000cd", "mediumblue"),
    ("#0000ff", "blue"),
    ("#006400", "darkgreen"),
    ("#008000", "green"),
    ("#008080", "teal"),
    ("#008b8b", "darkcyan"),
    ("#00bfff", "deepskyblue"),
    ("#00ced1", "darkturquoise"),
    ("#00fa9a", "mediumspringgreen"),
    ("#00ff00", "lime"),
    ("#00ff7f", "springgreen"),
    ("#00ffff", "aqua"),
    ("#191970", "midnightblue"),
    ("#1e90ff", "dodgerblue"),
    ("#20b2aa", "lightseagreen"),
    ("#228b22", "forestgreen"),
    ("#2e8b57", "seagreen"),
    ("#2f4f4f", "darkslategray"),
    ("#32cd32", "limegreen"),
    ("#3cb371", "mediumseagreen"),
    ("#40e0d0", "turquoise"),
    ("#4169e1", "royalblue"),
    ("#4682b4", "steelblue"),
    ("#483d8b", "darkslateblue"),
    ("#48d1cc", "mediumturquoise"),
    ("#4b0082", "indigo"),
    ("#556b2f", "darkolivegreen"),
    ("#5f9ea0", "cadetblue"),
    ("#6495ed", "cornflowerblue"),
    ("#66cdaa", "mediumaquamarine"),
    ("#696969", "dimgray"),
    ("#6a5acd", "slateblue"),
    ("#6b8e23", "olivedrab"),
    ("#708090", "slategray"),
    ("#778899", "lightslategray"),
    ("#7b68ee", "mediumslateblue"),
    ("#7cfc00", "lawngreen"),
    ("#7fff00", "chartreuse"),
    ("#7fffd4", "aquamarine"),
    ("#800000", "maroon"),
    ("#800080", "purple"),
    ("#808000", "olive"),
    ("#808080", "gray"),
    ("#87ceeb", "skyblue"),
    ("#87cefa", "lightskyblue"),
    ("#8a2be2", "blueviolet"),
    ("#8b0000", "darkred"),
    ("#8b008b", "darkmagenta"),
    ("#8b4513", "saddlebrown"),
    ("#8fbc8f", "darkseagreen"),
    ("#90ee90", "lightgreen"),
    ("#9370db", "mediumpurple"),
    ("#9400d3", "darkviolet"),
    ("#98fb98", "palegreen"),
    ("#9932cc", "darkorchid"),
    ("#9acd32", "yellowgreen"),
    ("#a0522d", "sienna"),
    ("#a52a2a", "brown"),
    ("#a9a9a9", "darkgray"),
    ("#add8e6", "lightblue"),
    ("#adff2f", "greenyellow"),
    ("#afeeee", "paleturquoise"),
    ("#b0c4de", "lightsteelblue"),
    ("#b0e0e6", "powderblue"),
    ("#b22222", "firebrick"),
    ("#b8860b", "darkgoldenrod"),
    ("#ba55d3", "mediumorchid"),
    ("#bc8f8f", "rosybrown"),
    ("#bdb76b", "darkkhaki"),
    ("#c0c0c0", "silver"),
    ("#c71585", "mediumvioletred"),
    ("#cd5c5c", "indianred"),
    ("#cd853f", "peru"),
    ("#d2691e", "chocolate"),
    ("#d2b48c", "tan"),
    ("#d3d3d3", "lightgray"),
    ("#d8bfd8", "thistle"),
    ("#da70d6", "orchid"),
    ("#daa520", "goldenrod"),
    ("#db7093", "palevioletred"),
    ("#dc143c", "crimson"),
    ("#dcdcdc", "gainsboro"),
    ("#dda0dd", "plum"),
    ("#deb887", "burlywood"),
    ("#e0ffff", "lightcyan"),
    ("#e6e6fa", "lavender"),
    ("#e9967a", "darksalmon"),
    ("#ee82ee", "violet"),
    ("#eee8aa", "palegoldenrod"),
    ("#f08080", "lightcoral"),
    ("#f0e68c", "khaki"),
    ("#f0f8ff", "aliceblue"),
    ("#f0fff0", "honeydew"),
    ("#f0ffff", "azure"),
    ("#f4a460", "sandybrown"),
    ("#f5deb3", "wheat"),
    ("#f5f5dc", "beige"),
    ("#f5f5f5", "whitesmoke"),
    ("#f5fffa", "mintcream"),
    ("#f8f8ff", "ghostwhite"),
    ("#fa8072", "salmon"),
    ("#faebd7", "antiquewhite"),
    ("#faf0e6", "linen"),
    ("#fafad2", "lightgoldenrodyellow"),
    ("#fdf5e6", "oldlace"),
    ("#ff0000", "red"),
    ("#ff00ff", "fuchsia"),
    ("#ff1493", "deeppink"),
    ("#ff4500", "orangered"),
    ("#ff6347", "tomato"),
    ("#ff69b4", "hotpink"),
    ("#ff7f50", "coral"),
    ("#ff8c00", "darkorange"),
    ("#ffa07a", "lightsalmon"),
    ("#ffa500", "orange"),
    ("#ffb6c1", "lightpink"),
    ("#ffc0cb", "pink"),
    ("#ffd700", "gold"),
    ("#ffdab9", "peachpuff"),
    ("#ffdead", "navajowhite"),
    ("#ffe4b5", "moccasin"),
    ("#ffe4c4", "bisque"),
    ("#ffe4e1", "mistyrose"),
    ("#ffebcd", "blanchedalmond"),
    ("#ffefd5", "papayawhip"),
    ("#fff0f5", "lavenderblush"),
    ("#fff5ee", "seashell"),
    ("#fff8dc", "cornsilk"),
    ("#fffacd", "lemonchiffon"),
    ("#fffaf0", "floralwhite"),
    ("#fffafa", "snow"),
    ("#ffff00", "yellow"),
    ("#ffffe0", "lightyellow"),
    ("#fffff0", "ivory"),
    ("#ffffff", "white"),
];

static HEX_COLOR: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(COLOR_PATTERN).ok());

/// Whether a value is a `#RGB` or `#RRGGBB` hex color
#[must_use]
pub fn is_valid_hex(value: &str) -> bool {
    HEX_COLOR.as_ref().is_some_and(|re| re.is_match(value))
}

/// Lowercase `#rrggbb` form of a valid hex color
#[must_use]
pub fn normalize_hex(value: &str) -> Option<String> {
    if !is_valid_hex(value) {
        return None;
    }
    let digits = value[1..].to_ascii_lowercase();
    if digits.len() == 3 {
        Some(digits.chars().fold(String::from("#"), |mut out, c| {
            out.push(c);
            out.push(c);
            out
        }))
    } else {
        Some(format!("#{digits}"))
    }
}

/// CSS3 name of a hex color, if it has one
#[must_use]
pub fn color_name(value: &str) -> Option<&'static str> {
    let hex = normalize_hex(value)?;
    CSS3_COLORS
        .binary_search_by(|(candidate, _)| (*candidate).cmp(hex.as_str()))
        .ok()
        .map(|idx| CSS3_COLORS[idx].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        assert!(CSS3_COLORS.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn test_color_name_lookup() {
        assert_eq!(color_name("#FF0000"), Some("red"));
        assert_eq!(color_name("#49B64E"), None);
        assert_eq!(color_name("#fff"), Some("white"));
        assert_eq!(color_name("#808080"), Some("gray"));
        assert_eq!(color_name("red"), None);
    }

    #[test]
    fn test_hex_validation_and_normalization() {
        assert!(is_valid_hex("#E26C2D"));
        assert!(is_valid_hex("#abc"));
        assert!(!is_valid_hex("#abcd"));
        assert!(!is_valid_hex("E26C2D"));
        assert_eq!(normalize_hex("#AbC").as_deref(), Some("#aabbcc"));
    }
}
