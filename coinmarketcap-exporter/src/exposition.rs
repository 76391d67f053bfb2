//! Prometheus text exposition formatting.

use std::fmt::Write;

/// Meta-metric reporting whether the last fetch succeeded.
pub const UP_METRIC: &str = "coinmarketcap_up";

/// Number of lines emitted per coin.
pub const COIN_METRIC_COUNT: usize = 14;

/// Per-coin metric names, in emission order.
pub const COIN_METRICS: [&str; COIN_METRIC_COUNT] = [
    "coinmarketcap_rank",
    "coinmarketcap_price_usd",
    "coinmarketcap_price_btc",
    "coinmarketcap_price_eur",
    "coinmarketcap_24h_volume_usd",
    "coinmarketcap_24h_volume_eur",
    "coinmarketcap_market_cap_usd",
    "coinmarketcap_market_cap_eur",
    "coinmarketcap_available_supply",
    "coinmarketcap_total_supply",
    "coinmarketcap_percent_change_1h",
    "coinmarketcap_percent_change_24h",
    "coinmarketcap_percent_change_7d",
    "coinmarketcap_last_updated",
];

/// Render a single exposition line.
///
/// Produces `name{k1="v1",k2="v2"} value\n`, or `name value\n` when
/// `labels` is empty. Labels keep the order they are given in.
pub fn format_line(name: &str, labels: &[(&str, &str)], value: &str) -> String {
    let mut line = String::with_capacity(name.len() + value.len() + 64);
    write_line(&mut line, name, labels, value);
    line
}

/// Append a single exposition line to `out`.
pub fn write_line(out: &mut String, name: &str, labels: &[(&str, &str)], value: &str) {
    out.push_str(name);

    if !labels.is_empty() {
        out.push('{');
        for (i, (key, val)) in labels.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write!(out, "{}=\"{}\"", key, escape_label_value(val)).ok();
        }
        out.push('}');
    }

    out.push(' ');
    out.push_str(value);
    out.push('\n');
}

/// Escape special characters in label values.
pub fn escape_label_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            _ => result.push(c),
        }
    }
    result
}
