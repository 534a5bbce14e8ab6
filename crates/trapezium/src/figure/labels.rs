//! Point-label bookkeeping and `%g` number formatting for figure annotations.

use nalgebra::Vector2;

/// Significant digits used by `format_g`.
const SIG_DIGITS: usize = 6;

/// Remembers labelled points; a point within `tol` of an earlier one on both
/// axes is considered already labelled.
#[derive(Clone, Debug, Default)]
pub struct LabelRegistry {
    tol: f64,
    placed: Vec<Vector2<f64>>,
}

impl LabelRegistry {
    pub fn new(tol: f64) -> Self {
        Self {
            tol,
            placed: Vec::new(),
        }
    }

    pub fn seen(&self, p: Vector2<f64>) -> bool {
        self.placed
            .iter()
            .any(|q| (q.x - p.x).abs() <= self.tol && (q.y - p.y).abs() <= self.tol)
    }

    /// Record `p`; returns false (and records nothing) if it was already labelled.
    pub fn place(&mut self, p: Vector2<f64>) -> bool {
        if self.seen(p) {
            return false;
        }
        self.placed.push(p);
        true
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }
}

/// Render `v` like C's `%g`: six significant digits, trailing zeros trimmed,
/// exponent form when the decimal exponent is below -4 or at least 6.
pub fn format_g(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return String::from(if v > 0.0 { "inf" } else { "-inf" });
    }
    if v == 0.0 {
        return String::from(if v.is_sign_negative() { "-0" } else { "0" });
    }
    // Round first so that e.g. 999999.5 picks up the carried exponent.
    let sci = format!("{:.*e}", SIG_DIGITS - 1, v);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if exp < -4 || exp >= SIG_DIGITS as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (SIG_DIGITS as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, v)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_g_matches_printf() {
        assert_eq!(format_g(0.0), "0");
        assert_eq!(format_g(120.0), "120");
        assert_eq!(format_g(0.5), "0.5");
        assert_eq!(format_g(-2.5), "-2.5");
        assert_eq!(format_g(40.0 / 3.0), "13.3333");
        assert_eq!(format_g(80.0 / 3.0), "26.6667");
        assert_eq!(format_g(123456.7), "123457");
        assert_eq!(format_g(999999.5), "1e+06");
        assert_eq!(format_g(1e6), "1e+06");
        assert_eq!(format_g(1.5e-5), "1.5e-05");
        assert_eq!(format_g(0.0001), "0.0001");
        assert_eq!(format_g(f64::INFINITY), "inf");
    }

    #[test]
    fn registry_dedups_within_tol() {
        let mut reg = LabelRegistry::new(1e-4);
        assert!(reg.place(Vector2::new(10.0, 0.0)));
        assert!(!reg.place(Vector2::new(10.00005, 0.00005)));
        assert!(reg.place(Vector2::new(10.0, 0.001)));
        assert_eq!(reg.len(), 2);
        assert!(reg.seen(Vector2::new(10.0, 0.0)));
        assert!(!reg.seen(Vector2::new(11.0, 0.0)));
    }
}
