//! Currency formatting
//!
//! Turns prices coming out of the market-data API into display strings.
//! Missing or non-finite input never errors; it renders as the configured
//! fallback instead.
//!
//! Rounding is half away from zero, applied to the shortest decimal form of
//! the input (`1.005` rounds to `1.01`, not `1.00`).

use crate::models::coingecko::NumberOrString;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

const NBSP: char = '\u{a0}';
const NARROW_NBSP: char = '\u{202f}';
const COMPACT_MIN_GROUPED_DIGITS: usize = 5;

/// Upper bound on fraction digits a caller may request
pub const MAX_FRACTION_DIGITS: u8 = 20;

/// Value handed to [`format_currency`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount<'a> {
    Missing,
    Number(f64),
    /// Numeric text such as `"42.5"`; coerced before formatting
    Text(&'a str),
}

impl Amount<'_> {
    /// Numeric value, `None` when missing or not a number at all.
    ///
    /// Blank text coerces to zero, as numeric coercion of an empty string does.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Amount::Missing => None,
            Amount::Number(n) => Some(*n),
            Amount::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    trimmed.parse().ok()
                }
            }
        }
    }
}

impl From<f64> for Amount<'_> {
    fn from(value: f64) -> Self {
        Amount::Number(value)
    }
}

impl From<f32> for Amount<'_> {
    fn from(value: f32) -> Self {
        Amount::Number(value as f64)
    }
}

impl From<i32> for Amount<'_> {
    fn from(value: i32) -> Self {
        Amount::Number(value as f64)
    }
}

impl From<i64> for Amount<'_> {
    fn from(value: i64) -> Self {
        Amount::Number(value as f64)
    }
}

impl From<u32> for Amount<'_> {
    fn from(value: u32) -> Self {
        Amount::Number(value as f64)
    }
}

impl From<u64> for Amount<'_> {
    fn from(value: u64) -> Self {
        Amount::Number(value as f64)
    }
}

impl<'a> From<&'a str> for Amount<'a> {
    fn from(value: &'a str) -> Self {
        Amount::Text(value)
    }
}

impl<'a> From<&'a String> for Amount<'a> {
    fn from(value: &'a String) -> Self {
        Amount::Text(value.as_str())
    }
}

impl<'a> From<&'a NumberOrString> for Amount<'a> {
    fn from(value: &'a NumberOrString) -> Self {
        match value {
            NumberOrString::Number(n) => Amount::Number(*n),
            NumberOrString::Text(s) => Amount::Text(s.as_str()),
        }
    }
}

impl<'a, T: Into<Amount<'a>>> From<Option<T>> for Amount<'a> {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Amount::Missing)
    }
}

/// Display options for [`format_currency`]
#[derive(Debug, Clone, PartialEq)]
pub struct FormatOptions {
    /// ISO 4217 code such as `USD` or `EUR`
    pub currency: String,
    /// BCP 47 tag such as `en-US`
    pub locale: String,
    /// Applied only when set; otherwise the currency's own digits are used
    pub minimum_fraction_digits: Option<u8>,
    pub maximum_fraction_digits: Option<u8>,
    /// Abbreviate large values (`$1.2K`, `$3.4M`)
    pub compact: bool,
    /// Returned for missing or non-finite input
    pub fallback: String,
    /// Prefix strictly positive values with `+`
    pub show_sign: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            locale: "en-US".to_string(),
            minimum_fraction_digits: None,
            maximum_fraction_digits: None,
            compact: false,
            fallback: "-".to_string(),
            show_sign: false,
        }
    }
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_minimum_fraction_digits(mut self, digits: u8) -> Self {
        self.minimum_fraction_digits = Some(digits);
        self
    }

    pub fn with_maximum_fraction_digits(mut self, digits: u8) -> Self {
        self.maximum_fraction_digits = Some(digits);
        self
    }

    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn with_show_sign(mut self, show_sign: bool) -> Self {
        self.show_sign = show_sign;
        self
    }
}

/// Separators, symbol placement and compact units for one locale
#[derive(Debug)]
struct LocaleSpec {
    tag: &'static str,
    group: char,
    decimal: char,
    symbol_after: bool,
    /// `(power of ten, suffix)`, ascending
    compact_units: &'static [(u32, &'static str)],
    compact_gap: bool,
    symbols: &'static [(&'static str, &'static str)],
}

impl LocaleSpec {
    fn symbol_for(&self, currency: &str) -> String {
        self.symbols
            .iter()
            .find(|(code, _)| *code == currency)
            .map(|(_, symbol)| symbol.to_string())
            .unwrap_or_else(|| currency.to_string())
    }
}

const EN_UNITS: &[(u32, &str)] = &[(3, "K"), (6, "M"), (9, "B"), (12, "T")];

static LOCALES: &[LocaleSpec] = &[
    LocaleSpec {
        tag: "en-US",
        group: ',',
        decimal: '.',
        symbol_after: false,
        compact_units: EN_UNITS,
        compact_gap: false,
        symbols: &[
            ("USD", "$"),
            ("EUR", "€"),
            ("GBP", "£"),
            ("JPY", "¥"),
            ("CNY", "CN¥"),
            ("INR", "₹"),
            ("KRW", "₩"),
            ("CAD", "CA$"),
            ("AUD", "A$"),
            ("HKD", "HK$"),
            ("BRL", "R$"),
            ("MXN", "MX$"),
        ],
    },
    LocaleSpec {
        tag: "en-GB",
        group: ',',
        decimal: '.',
        symbol_after: false,
        compact_units: EN_UNITS,
        compact_gap: false,
        symbols: &[
            ("USD", "US$"),
            ("EUR", "€"),
            ("GBP", "£"),
            ("JPY", "JP¥"),
            ("CNY", "CN¥"),
            ("INR", "₹"),
            ("KRW", "₩"),
            ("CAD", "CA$"),
            ("AUD", "A$"),
        ],
    },
    LocaleSpec {
        tag: "de-DE",
        group: '.',
        decimal: ',',
        symbol_after: true,
        // German currency amounts stay unabbreviated below a million
        compact_units: &[(6, "Mio."), (9, "Mrd."), (12, "Bio.")],
        compact_gap: true,
        symbols: &[
            ("USD", "$"),
            ("EUR", "€"),
            ("GBP", "£"),
            ("JPY", "¥"),
            ("CNY", "CN¥"),
            ("INR", "₹"),
            ("CAD", "CA$"),
            ("AUD", "AU$"),
        ],
    },
    LocaleSpec {
        tag: "fr-FR",
        group: NARROW_NBSP,
        decimal: ',',
        symbol_after: true,
        compact_units: &[(3, "k"), (6, "M"), (9, "Md"), (12, "Bn")],
        compact_gap: true,
        symbols: &[
            ("USD", "$US"),
            ("EUR", "€"),
            ("GBP", "£GB"),
            ("CAD", "$CA"),
            ("AUD", "$AU"),
        ],
    },
    LocaleSpec {
        tag: "ja-JP",
        group: ',',
        decimal: '.',
        symbol_after: false,
        compact_units: &[(4, "万"), (8, "億"), (12, "兆")],
        compact_gap: false,
        symbols: &[
            ("USD", "$"),
            ("EUR", "€"),
            ("GBP", "£"),
            ("JPY", "￥"),
            ("CNY", "元"),
            ("KRW", "₩"),
            ("CAD", "CA$"),
            ("AUD", "A$"),
        ],
    },
];

/// Exact tag first, then language subtag, then `en-US`
fn resolve_locale(tag: &str) -> &'static LocaleSpec {
    let wanted = tag.trim();
    let language = wanted.split(['-', '_']).next().unwrap_or_default();

    LOCALES
        .iter()
        .find(|spec| spec.tag.eq_ignore_ascii_case(wanted))
        .or_else(|| {
            LOCALES.iter().find(|spec| {
                spec.tag
                    .split('-')
                    .next()
                    .is_some_and(|lang| lang.eq_ignore_ascii_case(language))
            })
        })
        .unwrap_or(&LOCALES[0])
}

/// Uppercased code, `None` unless it is three ASCII letters
fn normalize_currency(code: &str) -> Option<String> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}

/// ISO 4217 minor units
fn currency_digits(code: &str) -> u32 {
    match code {
        "BIF" | "CLP" | "DJF" | "GNF" | "ISK" | "JPY" | "KMF" | "KRW" | "PYG" | "RWF" | "UGX"
        | "VND" | "VUV" | "XAF" | "XOF" | "XPF" => 0,
        "BHD" | "IQD" | "JOD" | "KWD" | "LYD" | "OMR" | "TND" => 3,
        _ => 2,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Rounding {
    Fraction { min: u32, max: u32 },
    /// Compact default: at least two significant digits, integer once the
    /// abbreviated value reaches two integer digits
    Significant,
}

fn rounding_for(options: &FormatOptions, currency_digits: u32) -> Rounding {
    let clamp = |d: u8| d.min(MAX_FRACTION_DIGITS) as u32;
    let min = options.minimum_fraction_digits.map(clamp);
    let max = options.maximum_fraction_digits.map(clamp);
    let default = if options.compact { 0 } else { currency_digits };

    match (min, max) {
        (None, None) if options.compact => Rounding::Significant,
        (None, None) => Rounding::Fraction {
            min: default,
            max: default,
        },
        (Some(min), None) => Rounding::Fraction {
            min,
            max: default.max(min),
        },
        (None, Some(max)) => Rounding::Fraction {
            min: default.min(max),
            max,
        },
        (Some(min), Some(max)) => Rounding::Fraction {
            min,
            max: max.max(min),
        },
    }
}

/// Shortest decimal form of a non-negative finite float
fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
}

fn pow10(exp: u32) -> Decimal {
    Decimal::from_i128_with_scale(10i128.pow(exp), 0)
}

/// Integer and fraction digits of `value` after rounding
fn round_digits(value: Decimal, rounding: Rounding) -> (String, String) {
    let (dp, min) = match rounding {
        Rounding::Fraction { min, max } => (max, min),
        Rounding::Significant => {
            let dp = if value >= Decimal::TEN || value.is_zero() {
                0
            } else if value >= Decimal::ONE {
                1
            } else {
                let tenth = Decimal::new(1, 1);
                let mut scaled = value;
                let mut leading_zeros = 0;
                while scaled < tenth {
                    scaled *= Decimal::TEN;
                    leading_zeros += 1;
                }
                leading_zeros + 2
            };
            (dp, 0)
        }
    };

    let rounded = value
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string();

    split_digits(&rounded, min)
}

/// Fallback for magnitudes `Decimal` cannot hold.
///
/// Floats this large are whole numbers, so the shortest representation
/// has no fraction to round.
fn round_digits_f64(value: f64, rounding: Rounding) -> (String, String) {
    let min = match rounding {
        Rounding::Fraction { min, .. } => min,
        Rounding::Significant => 0,
    };
    let shortest = value.to_string();
    let int_part = shortest.split('.').next().unwrap_or_default();
    split_digits(int_part, min)
}

/// Split `"123.4"` into `("123", "4")`, padding the fraction to `min` digits
fn split_digits(rendered: &str, min: u32) -> (String, String) {
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered, ""));
    let mut frac = frac_part.to_string();
    while frac.len() < min as usize {
        frac.push('0');
    }
    (int_part.to_string(), frac)
}

fn group_integer(digits: &str, separator: char) -> String {
    let len = digits.chars().count();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }
    grouped
}

fn render_digits(int_part: &str, frac_part: &str, locale: &LocaleSpec) -> String {
    join_fraction(group_integer(int_part, locale.group), frac_part, locale)
}

/// Compact mantissas are grouped only from five integer digits (`1000T`, `12,345T`)
fn render_compact_digits(int_part: &str, frac_part: &str, locale: &LocaleSpec) -> String {
    if int_part.len() < COMPACT_MIN_GROUPED_DIGITS {
        join_fraction(int_part.to_string(), frac_part, locale)
    } else {
        render_digits(int_part, frac_part, locale)
    }
}

fn join_fraction(mut number: String, frac_part: &str, locale: &LocaleSpec) -> String {
    if !frac_part.is_empty() {
        number.push(locale.decimal);
        number.push_str(frac_part);
    }
    number
}

fn standard_number(abs: f64, rounding: Rounding, locale: &LocaleSpec) -> String {
    let (int_part, frac_part) = match to_decimal(abs) {
        Some(value) => round_digits(value, rounding),
        None => round_digits_f64(abs, rounding),
    };
    render_digits(&int_part, &frac_part, locale)
}

fn compact_number(abs: f64, rounding: Rounding, locale: &LocaleSpec) -> String {
    let units = locale.compact_units;

    let Some(value) = to_decimal(abs) else {
        // Beyond Decimal range; express in the largest unit
        let Some(&(exp, suffix)) = units.last() else {
            return standard_number(abs, rounding, locale);
        };
        let (int_part, frac_part) = round_digits_f64(abs / 10f64.powi(exp as i32), rounding);
        return with_suffix(render_compact_digits(&int_part, &frac_part, locale), suffix, locale);
    };

    let mut unit = units.iter().rposition(|(exp, _)| value >= pow10(*exp));
    loop {
        let base_exp = unit.map(|i| units[i].0).unwrap_or(0);
        let (int_part, frac_part) = round_digits(value / pow10(base_exp), rounding);

        // Rounding can carry into the next unit (999_999 -> 1M)
        let next = unit.map(|i| i + 1).unwrap_or(0);
        if let Some(&(next_exp, _)) = units.get(next) {
            if int_part.len() as u32 > next_exp - base_exp {
                unit = Some(next);
                continue;
            }
        }

        let number = render_compact_digits(&int_part, &frac_part, locale);
        return match unit {
            Some(i) => with_suffix(number, units[i].1, locale),
            None => number,
        };
    }
}

fn with_suffix(mut number: String, suffix: &str, locale: &LocaleSpec) -> String {
    if locale.compact_gap {
        number.push(NBSP);
    }
    number.push_str(suffix);
    number
}

/// Format `value` as a localized currency string.
///
/// Returns `options.fallback` when the value is missing, not a number, not
/// finite, or the currency code is not three letters.
pub fn format_currency<'a>(value: impl Into<Amount<'a>>, options: &FormatOptions) -> String {
    let Some(num) = value.into().to_number().filter(|n| n.is_finite()) else {
        return options.fallback.clone();
    };
    let Some(currency) = normalize_currency(&options.currency) else {
        return options.fallback.clone();
    };

    let locale = resolve_locale(&options.locale);
    let rounding = rounding_for(options, currency_digits(&currency));
    let abs = num.abs();

    let number = if options.compact {
        compact_number(abs, rounding, locale)
    } else {
        standard_number(abs, rounding, locale)
    };

    let symbol = locale.symbol_for(&currency);
    let mut formatted = String::new();

    // Negative zero keeps its sign
    if num.is_sign_negative() {
        formatted.push('-');
    } else if options.show_sign && num > 0.0 {
        formatted.push('+');
    }

    if locale.symbol_after {
        formatted.push_str(&number);
        formatted.push(NBSP);
        formatted.push_str(&symbol);
    } else {
        formatted.push_str(&symbol);
        if symbol.chars().all(|c| c.is_ascii_alphabetic()) {
            formatted.push(NBSP);
        }
        formatted.push_str(&number);
    }

    formatted
}

/// Format as US dollars with default options
pub fn format_usd<'a>(value: impl Into<Amount<'a>>) -> String {
    format_currency(value, &FormatOptions::default())
}
