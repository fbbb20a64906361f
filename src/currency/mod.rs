//! Locale-aware rendering of amounts. Purely presentational: the engine
//! works with plain numbers and never calls into this module.

use crate::config::Config;
use crate::domain::amount_or_zero;

/// Symbol and separators used to render money.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::brl()
    }
}

impl CurrencyFormat {
    /// Brazilian real: `R$ 1.234,56`.
    pub fn brl() -> Self {
        Self {
            symbol: "R$".into(),
            decimal_separator: ',',
            grouping_separator: '.',
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            symbol: config.currency_symbol.clone(),
            decimal_separator: config.decimal_separator,
            grouping_separator: config.grouping_separator,
        }
    }

    /// Two decimals, grouped thousands, sign after the symbol.
    pub fn format(&self, amount: f64) -> String {
        let fixed = format!("{:.2}", amount_or_zero(amount));
        let (sign, digits) = match fixed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", fixed.as_str()),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));
        let grouped = group_thousands(whole, self.grouping_separator);
        // "-0,00" reads as noise.
        let sign = if grouped.chars().all(|c| c == '0' || c == self.grouping_separator)
            && fraction == "00"
        {
            ""
        } else {
            sign
        };
        format!(
            "{} {}{}{}{}",
            self.symbol, sign, grouped, self.decimal_separator, fraction
        )
    }

    /// One decimal place followed by `%`.
    pub fn percent(&self, value: f64) -> String {
        let fixed = format!("{:.1}", amount_or_zero(value));
        format!("{}%", fixed.replace('.', &self.decimal_separator.to_string()))
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_brazilian_reais() {
        let brl = CurrencyFormat::brl();
        assert_eq!(brl.format(0.0), "R$ 0,00");
        assert_eq!(brl.format(1234.5), "R$ 1.234,50");
        assert_eq!(brl.format(1234567.891), "R$ 1.234.567,89");
        assert_eq!(brl.format(-1800.0), "R$ -1.800,00");
        assert_eq!(brl.format(999.999), "R$ 1.000,00");
    }

    #[test]
    fn non_finite_values_render_as_zero() {
        assert_eq!(CurrencyFormat::brl().format(f64::NAN), "R$ 0,00");
        assert_eq!(CurrencyFormat::brl().format(-0.001), "R$ 0,00");
    }

    #[test]
    fn percent_uses_decimal_separator() {
        assert_eq!(CurrencyFormat::brl().percent(55.17), "55,2%");
        let us = CurrencyFormat {
            symbol: "$".into(),
            decimal_separator: '.',
            grouping_separator: ',',
        };
        assert_eq!(us.percent(50.0), "50.0%");
        assert_eq!(us.format(2500.0), "$ 2,500.00");
    }
}
