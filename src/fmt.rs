use crate::error::PlotError;
use crate::style::Marker;

pub struct PlotFmt;

impl PlotFmt {
    /// Formats `value` with a printf-style format string, e.g. `"%d ms"`.
    ///
    /// Supported conversions: `%d`/`%i` (truncated toward zero), `%f`, `%g`,
    /// `%s`, and `%%`, each with an optional width and `%f` with an optional
    /// precision (`%8.2f`).
    pub fn value(format: &str, value: f64) -> Result<String, PlotError> {
        let mut out = String::with_capacity(format.len() + 8);
        let mut chars = format.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }

            // parse width and precision
            let mut width = String::new();
            while let Some(digit) =
                chars.peek().filter(|c| c.is_ascii_digit())
            {
                width.push(*digit);
                chars.next();
            }
            let mut precision = None;
            if chars.peek() == Some(&'.') {
                chars.next();
                let mut digits = String::new();
                while let Some(digit) =
                    chars.peek().filter(|c| c.is_ascii_digit())
                {
                    digits.push(*digit);
                    chars.next();
                }
                precision = Some(digits.parse::<usize>().unwrap_or(0));
            }
            let width = width.parse::<usize>().unwrap_or(0);

            let formatted = match chars.next() {
                Some('%') => String::from("%"),
                Some('d') | Some('i') => {
                    if value.is_finite() {
                        format!("{}", value.trunc() as i64)
                    } else {
                        format!("{}", value)
                    }
                }
                Some('f') => {
                    let precision = precision.unwrap_or(6);
                    format!("{:.*}", precision, value)
                }
                Some('g') | Some('s') => format!("{}", value),
                Some(other) => {
                    return Err(PlotError::usage(format!(
                        "unsupported conversion %{} in format {:?}",
                        other, format
                    )));
                }
                None => {
                    return Err(PlotError::usage(format!(
                        "dangling % in format {:?}",
                        format
                    )));
                }
            };
            out.push_str(&format!("{:>width$}", formatted, width = width));
        }
        Ok(out)
    }

    /// Parses a `#rrggbb` color.
    pub fn rgb(color: &str) -> Result<(u8, u8, u8), PlotError> {
        let invalid = || PlotError::usage(format!("invalid color {:?}", color));
        let hex = color.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    // Possible values: https://matplotlib.org/stable/api/markers_api.html
    pub fn marker(marker: Marker) -> &'static str {
        match marker {
            Marker::Square => "s",
            Marker::TriangleDown => "v",
            Marker::Diamond => "D",
            Marker::Circle => "o",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value() {
        assert_eq!(PlotFmt::value("%d units", 12.0).unwrap(), "12 units");
        assert_eq!(PlotFmt::value("%d ms", 1234.9).unwrap(), "1234 ms");
        assert_eq!(PlotFmt::value("%d KB", -3.7).unwrap(), "-3 KB");
        assert_eq!(PlotFmt::value("%.2f s", 1.234).unwrap(), "1.23 s");
        assert_eq!(PlotFmt::value("%f", 0.5).unwrap(), "0.500000");
        assert_eq!(PlotFmt::value("%5d|", 42.0).unwrap(), "   42|");
        assert_eq!(PlotFmt::value("%d%%", 51.0).unwrap(), "51%");
        assert_eq!(PlotFmt::value("max", 51.0).unwrap(), "max");
    }

    #[test]
    fn invalid_value_format() {
        assert!(PlotFmt::value("%x", 1.0).is_err());
        assert!(PlotFmt::value("100%", 1.0).is_err());
    }

    #[test]
    fn rgb() {
        assert_eq!(PlotFmt::rgb("#557555").unwrap(), (0x55, 0x75, 0x55));
        assert_eq!(PlotFmt::rgb("#C5E1C5").unwrap(), (0xc5, 0xe1, 0xc5));
        assert!(PlotFmt::rgb("557555").is_err());
        assert!(PlotFmt::rgb("#5575").is_err());
        assert!(PlotFmt::rgb("#55755g").is_err());
    }
}
