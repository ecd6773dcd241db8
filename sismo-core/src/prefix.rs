/// Engineering prefix keeping a displayed magnitude within `[1, 1000)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricPrefix {
    Pico,
    Nano,
    Micro,
    Milli,
    None,
    Kilo,
    Mega,
    Giga,
}

const PREFIXES: [MetricPrefix; 8] = [
    MetricPrefix::Pico,
    MetricPrefix::Nano,
    MetricPrefix::Micro,
    MetricPrefix::Milli,
    MetricPrefix::None,
    MetricPrefix::Kilo,
    MetricPrefix::Mega,
    MetricPrefix::Giga,
];

impl MetricPrefix {
    /// Zero and non-finite values get no prefix. Magnitudes outside the
    /// table clamp to its ends.
    pub fn for_value(value: f64) -> Self {
        let magnitude = value.abs();
        if magnitude == 0.0 || !magnitude.is_finite() {
            return Self::None;
        }
        PREFIXES
            .iter()
            .rev()
            .copied()
            .find(|prefix| magnitude >= prefix.multiplier() * (1.0 - 1e-12))
            .unwrap_or(Self::Pico)
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::Pico => 1e-12,
            Self::Nano => 1e-9,
            Self::Micro => 1e-6,
            Self::Milli => 1e-3,
            Self::None => 1.0,
            Self::Kilo => 1e3,
            Self::Mega => 1e6,
            Self::Giga => 1e9,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Pico => "p",
            Self::Nano => "n",
            Self::Micro => "µ",
            Self::Milli => "m",
            Self::None => "",
            Self::Kilo => "k",
            Self::Mega => "M",
            Self::Giga => "G",
        }
    }
}

/// Renders `value` scaled to its prefix, e.g. `12.345 mV`.
pub fn format_value(value: f64, precision: usize, symbol: &str) -> String {
    if !value.is_finite() {
        return format!("{value} {symbol}");
    }
    let prefix = MetricPrefix::for_value(value);
    let scaled = value / prefix.multiplier();
    format!("{scaled:.precision$} {}{symbol}", prefix.symbol())
}

#[cfg(test)]
mod tests {
    use super::{format_value, MetricPrefix};

    #[test]
    fn picks_prefix_by_magnitude() {
        assert_eq!(MetricPrefix::for_value(0.0), MetricPrefix::None);
        assert_eq!(MetricPrefix::for_value(0.034), MetricPrefix::Milli);
        assert_eq!(MetricPrefix::for_value(-0.034), MetricPrefix::Milli);
        assert_eq!(MetricPrefix::for_value(345.0), MetricPrefix::None);
        assert_eq!(MetricPrefix::for_value(1000.0), MetricPrefix::Kilo);
        assert_eq!(MetricPrefix::for_value(2.5e-6), MetricPrefix::Micro);
        assert_eq!(MetricPrefix::for_value(1e-15), MetricPrefix::Pico);
        assert_eq!(MetricPrefix::for_value(5e12), MetricPrefix::Giga);
    }

    #[test]
    fn formats_readout() {
        assert_eq!(format_value(0.012345, 3, "V"), "12.345 mV");
        assert_eq!(format_value(1500.0, 1, "Hz"), "1.5 kHz");
        assert_eq!(format_value(0.0, 2, "V"), "0.00 V");
    }
}
