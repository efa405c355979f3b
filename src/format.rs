//! Number, currency and duration formatting
//!
//! Locale conventions (separators, symbol placement) and the currency being
//! shown are independent: the default pairs Colombian Spanish conventions
//! with US dollars.

/// Digits after the decimal separator for quantities and money
pub const FRACTION_DIGITS: usize = 2;

/// Locale-aware rendering of plain numbers and money amounts
pub trait NumberFormat {
    fn format_decimal(&self, value: f64, fraction_digits: usize) -> String;
    fn format_currency(&self, value: f64, currency: &Currency) -> String;
}

/// Separator and symbol placement rules for one locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleConventions {
    pub tag: &'static str,
    pub group_separator: char,
    pub decimal_separator: char,
    pub currency_spacing: &'static str, // between symbol and digits
    pub symbol_first: bool,
}

/// Colombian Spanish: `1.234,50`, `US$ 1.234,50` (no-break space)
pub const ES_CO: LocaleConventions = LocaleConventions {
    tag: "es-CO",
    group_separator: '.',
    decimal_separator: ',',
    currency_spacing: "\u{a0}",
    symbol_first: true,
};

/// US English: `1,234.50`, symbol attached to the digits
pub const EN_US: LocaleConventions = LocaleConventions {
    tag: "en-US",
    group_separator: ',',
    decimal_separator: '.',
    currency_spacing: "",
    symbol_first: true,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
}

pub const USD: Currency = Currency {
    code: "USD",
    symbol: "US$",
};

pub const COP: Currency = Currency {
    code: "COP",
    symbol: "$",
};

impl LocaleConventions {
    /// Look up a built-in locale by its tag
    pub fn by_tag(tag: &str) -> Option<LocaleConventions> {
        [ES_CO, EN_US]
            .into_iter()
            .find(|l| l.tag.eq_ignore_ascii_case(tag))
    }

    fn digits(&self, value: f64, fraction_digits: usize) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return "∞".to_string();
        }

        let (int_part, frac_part) = round_half_up(&value.abs().to_string(), fraction_digits);

        let mut output = group_digits(&int_part, self.group_separator);
        if !frac_part.is_empty() {
            output.push(self.decimal_separator);
            output.push_str(&frac_part);
        }
        output
    }
}

impl Currency {
    pub fn by_code(code: &str) -> Option<Currency> {
        [USD, COP]
            .into_iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }
}

fn sign(value: f64) -> &'static str {
    if value.is_sign_negative() && !value.is_nan() {
        "-"
    } else {
        ""
    }
}

/// Round a plain decimal string to `fraction_digits`, ties away from zero.
///
/// Works on the shortest round-trip text of the float, so 2.675 rounds to
/// 2.68 even though its binary value sits just below the midpoint.
fn round_half_up(decimal: &str, fraction_digits: usize) -> (String, String) {
    let (int_part, frac_part) = decimal.split_once('.').unwrap_or((decimal, ""));

    if frac_part.len() <= fraction_digits {
        return (
            int_part.to_string(),
            format!("{:0<width$}", frac_part, width = fraction_digits),
        );
    }

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part[..fraction_digits].bytes())
        .collect();

    if frac_part.as_bytes()[fraction_digits] >= b'5' {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, b'1');
                break;
            }
            i -= 1;
            if digits[i] == b'9' {
                digits[i] = b'0';
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let split = digits.len() - fraction_digits;
    let int_part = digits[..split].iter().map(|&b| char::from(b)).collect();
    let frac_part = digits[split..].iter().map(|&b| char::from(b)).collect();
    (int_part, frac_part)
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut output = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            output.push(separator);
        }
        output.push(ch);
    }
    output
}

impl NumberFormat for LocaleConventions {
    fn format_decimal(&self, value: f64, fraction_digits: usize) -> String {
        format!("{}{}", sign(value), self.digits(value, fraction_digits))
    }

    fn format_currency(&self, value: f64, currency: &Currency) -> String {
        let digits = self.digits(value, FRACTION_DIGITS);
        if self.symbol_first {
            format!(
                "{}{}{}{}",
                sign(value),
                currency.symbol,
                self.currency_spacing,
                digits
            )
        } else {
            format!(
                "{}{}{}{}",
                sign(value),
                digits,
                self.currency_spacing,
                currency.symbol
            )
        }
    }
}

/// A locale paired with the currency to show amounts in
#[derive(Debug, Clone, Copy)]
pub struct Formatter<L = LocaleConventions> {
    pub locale: L,
    pub currency: Currency,
}

impl Default for Formatter<LocaleConventions> {
    fn default() -> Self {
        Self {
            locale: ES_CO,
            currency: USD,
        }
    }
}

impl<L: NumberFormat> Formatter<L> {
    pub fn new(locale: L, currency: Currency) -> Self {
        Self { locale, currency }
    }

    pub fn currency(&self, value: f64) -> String {
        self.locale.format_currency(value, &self.currency)
    }

    pub fn quantity(&self, value: f64) -> String {
        self.locale.format_decimal(value, FRACTION_DIGITS)
    }

    pub fn time(&self, minutes: f64) -> String {
        format_time(minutes)
    }
}

/// Money in es-CO conventions with the USD symbol, two decimals
pub fn format_currency(value: f64) -> String {
    Formatter::new(ES_CO, USD).currency(value)
}

/// Plain number in es-CO conventions, two decimals
pub fn format_quantity(value: f64) -> String {
    Formatter::new(ES_CO, USD).quantity(value)
}

/// Whole hours plus rounded remaining minutes.
///
/// The remainder is rounded half toward +∞ after the hours are floored, so
/// 119.6 renders as "1 h 60 min".
pub fn format_time(minutes: f64) -> String {
    if !minutes.is_finite() {
        return format!("{} min", minutes);
    }

    let hours = (minutes / 60.0).floor() as i64;
    let mins = round_half_toward_positive(minutes % 60.0) as i64;

    if hours > 0 {
        format!("{} h {} min", hours, mins)
    } else {
        format!("{} min", mins)
    }
}

/// `f64::round` breaks ties away from zero; move negative ties up instead
fn round_half_toward_positive(x: f64) -> f64 {
    let r = x.round();
    if x - r == 0.5 { r + 1.0 } else { r }
}
