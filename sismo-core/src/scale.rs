use serde::{Deserialize, Serialize};

/// Power-of-ten exponent of the smallest decade bound that holds `value`.
///
/// Magnitudes of one or more count their integer digits (`345` gives 3).
/// Magnitudes below one count the zeros after the decimal point and negate
/// (`0.034` gives -1, `0.5` gives 0). Zero and non-finite input give 0.
pub fn scale_digits(value: f64) -> i32 {
    if value == 0.0 || !value.is_finite() {
        return 0;
    }
    let mut num = value.abs();
    let mut digits = 0;
    if num.trunc() == 0.0 {
        while num.trunc() == 0.0 {
            num *= 10.0;
            digits += 1;
        }
        -(digits - 1)
    } else {
        while num.trunc() != 0.0 {
            num /= 10.0;
            digits += 1;
        }
        digits
    }
}

pub fn scale_for(value: f64) -> f64 {
    10f64.powi(scale_digits(value))
}

/// Axis interval with its major and minor tick positions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScaleDiv {
    pub lower: f64,
    pub upper: f64,
    pub major: Vec<f64>,
    pub minor: Vec<f64>,
}

impl ScaleDiv {
    /// Divides `[lower, upper]` into at most `max_major` major steps, each
    /// split into at most `max_minor` minor steps. Step sizes are rounded up to
    /// 1, 2 or 5 times a power of ten.
    pub fn divide(lower: f64, upper: f64, max_major: usize, max_minor: usize) -> Self {
        let (lower, upper) = if lower <= upper {
            (lower, upper)
        } else {
            (upper, lower)
        };
        let mut div = Self {
            lower,
            upper,
            major: Vec::new(),
            minor: Vec::new(),
        };
        let major_step = step_size(upper - lower, max_major);
        if major_step <= 0.0 {
            div.major.push(lower);
            return div;
        }
        div.major = ticks(lower, upper, major_step);

        let minor_step = step_size(major_step, max_minor);
        if minor_step > 0.0 {
            let first = div.major.first().copied().unwrap_or(lower) - major_step;
            let last = div.major.last().copied().unwrap_or(upper) + major_step;
            div.minor = ticks(first.max(lower), last.min(upper), minor_step)
                .into_iter()
                .filter(|tick| {
                    !div.major
                        .iter()
                        .any(|major| (major - tick).abs() < minor_step * 1e-6)
                })
                .collect();
        }
        div
    }

    pub fn span(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

fn step_size(span: f64, max_steps: usize) -> f64 {
    if max_steps == 0 || !(span.is_finite() && span > 0.0) {
        return 0.0;
    }
    let raw = span / max_steps as f64;
    let base = 10f64.powf(raw.log10().floor());
    let fraction = raw / base;
    let nice = if fraction <= 1.0 + 1e-9 {
        1.0
    } else if fraction <= 2.0 + 1e-9 {
        2.0
    } else if fraction <= 5.0 + 1e-9 {
        5.0
    } else {
        10.0
    };
    nice * base
}

fn ticks(lower: f64, upper: f64, step: f64) -> Vec<f64> {
    let eps = step * 1e-6;
    let first = ((lower - eps) / step).ceil() as i64;
    let last = ((upper + eps) / step).floor() as i64;
    (first..=last)
        .map(|idx| {
            let tick = idx as f64 * step;
            if tick.abs() < eps {
                0.0
            } else {
                tick
            }
        })
        .collect()
}
