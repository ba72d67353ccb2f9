//! Color parsing and text-contrast selection.

/// Text color used on light backgrounds.
pub const DARK_TEXT: &str = "#333333";
/// Text color used on dark backgrounds.
pub const LIGHT_TEXT: &str = "#ffffff";

/// WCAG crossover point: above this luminance dark text has the better contrast ratio.
const LUMINANCE_CROSSOVER: f64 = 0.179;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb01 {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

fn parse_hex_rgb01(s: &str) -> Option<Rgb01> {
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let (r, g, b) = match hex.len() {
        3 | 4 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            (r, g, b)
        }
        6 | 8 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            (r, g, b)
        }
        _ => return None,
    };
    Some(Rgb01 {
        r: (r as f64) / 255.0,
        g: (g as f64) / 255.0,
        b: (b as f64) / 255.0,
    })
}

fn parse_rgb_fn_rgb01(s: &str) -> Option<Rgb01> {
    let inner = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let mut channels = inner
        .split([',', ' ', '/'])
        .filter(|t| !t.is_empty())
        .map(|t| match t.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok().map(|v| v / 100.0),
            None => t.parse::<f64>().ok().map(|v| v / 255.0),
        });
    let r = channels.next()??;
    let g = channels.next()??;
    let b = channels.next()??;
    Some(Rgb01 {
        r: r.clamp(0.0, 1.0),
        g: g.clamp(0.0, 1.0),
        b: b.clamp(0.0, 1.0),
    })
}

fn named_rgb01(s: &str) -> Option<Rgb01> {
    let hex = match s {
        "white" => "#ffffff",
        "black" => "#000000",
        "red" => "#ff0000",
        "green" => "#008000",
        "blue" => "#0000ff",
        "yellow" => "#ffff00",
        "orange" => "#ffa500",
        "purple" => "#800080",
        "gray" | "grey" => "#808080",
        "lightgray" | "lightgrey" => "#d3d3d3",
        "darkgray" | "darkgrey" => "#a9a9a9",
        "silver" => "#c0c0c0",
        "navy" => "#000080",
        "teal" => "#008080",
        "maroon" => "#800000",
        "olive" => "#808000",
        "lime" => "#00ff00",
        "aqua" | "cyan" => "#00ffff",
        "fuchsia" | "magenta" => "#ff00ff",
        "whitesmoke" => "#f5f5f5",
        "ivory" => "#fffff0",
        "beige" => "#f5f5dc",
        _ => return None,
    };
    parse_hex_rgb01(hex)
}

/// Parses the CSS color forms that show up in exported diagrams: `#rgb`, `#rrggbb` (with
/// optional alpha digits, ignored), `rgb()`/`rgba()`, and a small set of named colors.
pub fn parse_color(s: &str) -> Option<Rgb01> {
    let s = s.trim().to_ascii_lowercase();
    if s.starts_with('#') {
        return parse_hex_rgb01(&s);
    }
    if s.starts_with("rgb") {
        return parse_rgb_fn_rgb01(&s);
    }
    named_rgb01(&s)
}

fn linearize(channel: f64) -> f64 {
    if channel <= 0.03928 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG 2.x relative luminance in `[0, 1]`.
pub fn relative_luminance(rgb: Rgb01) -> f64 {
    0.2126 * linearize(rgb.r) + 0.7152 * linearize(rgb.g) + 0.0722 * linearize(rgb.b)
}

/// Picks a readable text color for `background`.
///
/// Colors that cannot be parsed (gradients via `url(#...)`, `none`, unknown names) get dark
/// text, matching the light canvas they end up on.
pub fn contrast_text_color(background: &str) -> &'static str {
    match parse_color(background) {
        Some(rgb) if relative_luminance(rgb) <= LUMINANCE_CROSSOVER => LIGHT_TEXT,
        _ => DARK_TEXT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(parse_color("#fff"), parse_color("#ffffff"));
        assert_eq!(
            parse_color("#FF0000"),
            Some(Rgb01 {
                r: 1.0,
                g: 0.0,
                b: 0.0
            })
        );
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("url(#grad)"), None);
    }

    #[test]
    fn parses_rgb_functions() {
        let c = parse_color("rgb(255, 255, 255)").unwrap();
        assert_eq!(c.r, 1.0);
        let c = parse_color("rgba(0 0 0 / 0.5)").unwrap();
        assert_eq!(c.g, 0.0);
        assert!(parse_color("rgb(1,2)").is_none());
    }

    #[test]
    fn contrast_keeps_white_and_black_behavior() {
        assert_eq!(contrast_text_color("#ffffff"), DARK_TEXT);
        assert_eq!(contrast_text_color("white"), DARK_TEXT);
        assert_eq!(contrast_text_color("#000000"), LIGHT_TEXT);
        assert_eq!(contrast_text_color("black"), LIGHT_TEXT);
    }

    #[test]
    fn contrast_uses_luminance_not_letters() {
        // Neither hex contains an `f`.
        assert_eq!(contrast_text_color("#1a237e"), LIGHT_TEXT);
        assert_eq!(contrast_text_color("#eeee88"), DARK_TEXT);
        // Saturated blue has an `f` but is dark.
        assert_eq!(contrast_text_color("#0000ff"), LIGHT_TEXT);
        assert_eq!(contrast_text_color("#e3f2fd"), DARK_TEXT);
        assert_eq!(contrast_text_color("none"), DARK_TEXT);
    }
}
