//! core::format
//!
//! Numeric display formats for incoming values.
//!
//! Formats are written printf-style in configuration (`"%.2f"`, `"%d"`, ...)
//! and parsed once into a [`NumberFormat`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::value::format_number;

/// The format used when none is configured.
pub const DEFAULT_NUMBER_FORMAT: &str = "%.2f";

/// Largest precision accepted for `%.Nf` and `%.Ne`.
///
/// An f64 carries at most 17 significant decimal digits.
pub const MAX_PRECISION: usize = 17;

/// Errors from parsing a format string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("unsupported number format '{0}' (expected %.Nf, %f, %d, %i, %e, %g or %s)")]
    Unsupported(String),

    #[error("precision {precision} in number format '{input}' exceeds {}", MAX_PRECISION)]
    PrecisionTooLarge { input: String, precision: usize },
}

/// How numeric values are rendered into placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NumberFormat {
    /// Fixed-point with the given number of decimals (`%.Nf`; `%f` is 6).
    Fixed(usize),
    /// Rounded to an integer (`%d`, `%i`).
    Integer,
    /// Scientific notation (`%e`, `%.Ne`).
    Exponent(Option<usize>),
    /// Shortest plain rendering (`%g`, `%s`).
    Plain,
}

impl NumberFormat {
    /// Render a number.
    ///
    /// # Example
    ///
    /// ```
    /// use rosdesk::core::format::NumberFormat;
    ///
    /// assert_eq!(NumberFormat::default().render(1.5), "1.50");
    /// assert_eq!(NumberFormat::Integer.render(2.6), "3");
    /// assert_eq!(NumberFormat::Plain.render(0.25), "0.25");
    /// ```
    pub fn render(&self, n: f64) -> String {
        match self {
            NumberFormat::Fixed(decimals) => format!("{:.*}", (*decimals).min(MAX_PRECISION), n),
            NumberFormat::Integer => format!("{}", n.round() as i64),
            NumberFormat::Exponent(Some(decimals)) => {
                format!("{:.*e}", (*decimals).min(MAX_PRECISION), n)
            }
            NumberFormat::Exponent(None) => format!("{:e}", n),
            NumberFormat::Plain => format_number(n),
        }
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::Fixed(2)
    }
}

impl FromStr for NumberFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || FormatError::Unsupported(s.to_string());
        let spec = s.trim().strip_prefix('%').ok_or_else(unsupported)?;

        match spec {
            "f" => return Ok(NumberFormat::Fixed(6)),
            "d" | "i" => return Ok(NumberFormat::Integer),
            "e" => return Ok(NumberFormat::Exponent(None)),
            "g" | "s" => return Ok(NumberFormat::Plain),
            _ => {}
        }

        let precision = spec.strip_prefix('.').ok_or_else(unsupported)?;
        let (digits, fixed) = if let Some(digits) = precision.strip_suffix('f') {
            (digits, true)
        } else if let Some(digits) = precision.strip_suffix('e') {
            (digits, false)
        } else {
            return Err(unsupported());
        };

        let precision: usize = digits.parse().map_err(|_| unsupported())?;
        if precision > MAX_PRECISION {
            return Err(FormatError::PrecisionTooLarge {
                input: s.to_string(),
                precision,
            });
        }
        Ok(if fixed {
            NumberFormat::Fixed(precision)
        } else {
            NumberFormat::Exponent(Some(precision))
        })
    }
}

impl TryFrom<String> for NumberFormat {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NumberFormat> for String {
    fn from(format: NumberFormat) -> Self {
        format.to_string()
    }
}

impl std::fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberFormat::Fixed(d) => write!(f, "%.{}f", d),
            NumberFormat::Integer => write!(f, "%d"),
            NumberFormat::Exponent(Some(d)) => write!(f, "%.{}e", d),
            NumberFormat::Exponent(None) => write!(f, "%e"),
            NumberFormat::Plain => write!(f, "%g"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_two_decimals() {
        assert_eq!(
            DEFAULT_NUMBER_FORMAT.parse::<NumberFormat>().unwrap(),
            NumberFormat::default()
        );
        assert_eq!(NumberFormat::default().render(3.14159), "3.14");
        assert_eq!(NumberFormat::default().render(0.0), "0.00");
    }

    #[test]
    fn parse_variants() {
        assert_eq!("%.4f".parse(), Ok(NumberFormat::Fixed(4)));
        assert_eq!("%f".parse(), Ok(NumberFormat::Fixed(6)));
        assert_eq!("%d".parse(), Ok(NumberFormat::Integer));
        assert_eq!("%i".parse(), Ok(NumberFormat::Integer));
        assert_eq!("%e".parse(), Ok(NumberFormat::Exponent(None)));
        assert_eq!("%.3e".parse(), Ok(NumberFormat::Exponent(Some(3))));
        assert_eq!("%g".parse(), Ok(NumberFormat::Plain));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<NumberFormat>().is_err());
        assert!(".2f".parse::<NumberFormat>().is_err());
        assert!("%.xf".parse::<NumberFormat>().is_err());
        assert!("%q".parse::<NumberFormat>().is_err());
        assert!("%.99999999999999999999999f".parse::<NumberFormat>().is_err());
    }

    #[test]
    fn parse_limits_precision() {
        assert_eq!("%.17f".parse(), Ok(NumberFormat::Fixed(MAX_PRECISION)));
        assert_eq!(
            "%.18f".parse::<NumberFormat>(),
            Err(FormatError::PrecisionTooLarge {
                input: "%.18f".into(),
                precision: 18
            })
        );
        assert!("%.100000000f".parse::<NumberFormat>().is_err());
        assert!("%.70000e".parse::<NumberFormat>().is_err());
    }

    #[test]
    fn render_clamps_oversized_precision() {
        assert_eq!(
            NumberFormat::Fixed(100_000_000).render(1.0),
            NumberFormat::Fixed(MAX_PRECISION).render(1.0)
        );
        assert_eq!(
            NumberFormat::Exponent(Some(70_000)).render(2.0),
            NumberFormat::Exponent(Some(MAX_PRECISION)).render(2.0)
        );
    }

    #[test]
    fn display_roundtrips() {
        for format in [
            NumberFormat::Fixed(3),
            NumberFormat::Integer,
            NumberFormat::Exponent(Some(2)),
            NumberFormat::Exponent(None),
            NumberFormat::Plain,
        ] {
            assert_eq!(format.to_string().parse::<NumberFormat>(), Ok(format));
        }
    }

    #[test]
    fn render_exponent() {
        assert_eq!(NumberFormat::Exponent(Some(2)).render(1234.5), "1.23e3");
    }
}
