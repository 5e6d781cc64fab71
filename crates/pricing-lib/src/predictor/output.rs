//! Prediction output formatting and currency conversion
//!
//! The model predicts prices in Pakistani rupees. Estimates are converted
//! to US dollars with a fixed rate and rounded to cents.

use crate::error::{PricingError, Result};
use crate::models::{PredictionResult, CURRENCY};

/// Rupees per US dollar used for conversion
pub const PKR_PER_USD: f64 = 280.0;

/// Converts raw model outputs into a PredictionResult
#[derive(Debug, Clone, Default)]
pub struct PriceFormatter;

impl PriceFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Format a raw model output
    ///
    /// Non-finite outputs are rejected since they cannot be represented
    /// in the JSON response.
    pub fn format(&self, raw_prediction: f64) -> Result<PredictionResult> {
        if !raw_prediction.is_finite() {
            return Err(PricingError::Inference(format!(
                "model produced non-finite value {}",
                raw_prediction
            )));
        }

        let cents = cents_string(to_usd(raw_prediction));
        let usd = parse_cents(&cents)?;
        Ok(PredictionResult {
            estimated_price_usd: usd,
            currency: CURRENCY.to_string(),
            formatted_price: dollar_string(&cents),
        })
    }
}

/// Convert a rupee amount to dollars
pub fn to_usd(pkr: f64) -> f64 {
    pkr / PKR_PER_USD
}

/// Round to two decimal places
///
/// Rounds the exact binary value, so `0.075` (stored just below) becomes
/// `0.07` and exact ties such as `0.125` go to the even cent.
pub fn round_cents(amount: f64) -> Result<f64> {
    parse_cents(&cents_string(amount))
}

/// Format as `$12,345.60`: leading dollar sign, comma grouping, two decimals
pub fn format_usd(amount: f64) -> String {
    dollar_string(&cents_string(amount))
}

fn cents_string(amount: f64) -> String {
    format!("{:.2}", amount)
}

fn parse_cents(cents: &str) -> Result<f64> {
    cents
        .parse::<f64>()
        .map_err(|e| PricingError::Inference(format!("unparseable price {:?}: {}", cents, e)))
}

fn dollar_string(fixed: &str) -> String {
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (whole, cents) = unsigned.split_once('.').unwrap_or((unsigned, "00"));
    format!("${}{}.{}", sign, group_thousands(whole), cents)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
