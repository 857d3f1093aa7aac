//! Tick label formatting

const SI_PREFIXES: [&str; 7] = ["", "k", "M", "G", "T", "P", "E"];

/// SI-prefixed rendering (`1.5k`, `12M`, `340`) with up to two decimals.
/// The prefix is picked after rounding, so `999.999` reads `1k`.
pub fn format_si(value: f64) -> String {
    if !value.is_finite() {
        return non_finite(value).to_string();
    }
    let mut group = 0;
    let mut scaled = round_2dp(value);
    while scaled.abs() >= 1000.0 && group + 1 < SI_PREFIXES.len() {
        group += 1;
        scaled = round_2dp(value / 1000f64.powi(group as i32));
    }
    format!("{}{}", two_decimals(scaled), SI_PREFIXES[group])
}

/// Default axis tick format: SI-prefixed for magnitudes of at least one,
/// the raw value otherwise.
pub fn default_tick_format(value: f64) -> String {
    if value.abs() >= 1.0 {
        format_si(value)
    } else {
        format!("{value}")
    }
}

fn non_finite(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value > 0.0 {
        "Inf"
    } else {
        "-Inf"
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// At most two decimals, without trailing zeroes
fn two_decimals(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
