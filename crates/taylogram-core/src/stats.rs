//! Elementary statistics behind the diagram: sample standard deviation,
//! Pearson correlation and the polar mapping derived from them.
//!
//! Standard deviation uses the n-1 denominator (sample stddev). That matches
//! pandas' `Series.std()` default, which the reference outputs were produced
//! with.

/// Tolerated floating drift when clamping a correlation into [-1, 1].
pub const CORRELATION_DRIFT: f64 = 1e-9;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 denominator). Returns 0.0 for a
/// single-element series.
pub fn stddev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return if n == 1 { 0.0 } else { f64::NAN };
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Pearson correlation of two index-aligned, equal-length series.
///
/// Returns NaN when either side has zero variance; callers validate that
/// case before plotting.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n != y.len() || n < 2 {
        return f64::NAN;
    }
    let mx = mean(x);
    let my = mean(y);
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for i in 0..n {
        let dx = x[i] - mx;
        let dy = y[i] - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }
    if vx == 0.0 || vy == 0.0 {
        return f64::NAN;
    }
    // (vx * vy).sqrt() rather than vx.sqrt() * vy.sqrt(): for identical
    // (or negated) series cov^2 == vx * vy bit-for-bit, so r is exactly
    // +/-1 and acos lands exactly on 0 or pi.
    cov / (vx * vy).sqrt()
}

/// Clamps a correlation into [-1, 1], absorbing floating drift up to
/// [`CORRELATION_DRIFT`]. Values further out are passed through for the
/// caller to reject.
pub fn clamp_correlation(r: f64) -> f64 {
    if r > 1.0 && r <= 1.0 + CORRELATION_DRIFT {
        1.0
    } else if r < -1.0 && r >= -1.0 - CORRELATION_DRIFT {
        -1.0
    } else {
        r
    }
}

/// Polar coordinates of a sample relative to the reference:
/// angle = acos(correlation), radius = sample stddev.
pub fn polar_coords(reference: &[f64], sample: &[f64]) -> (f64, f64) {
    let r = clamp_correlation(pearson(reference, sample));
    (r.acos(), stddev(sample))
}

/// Centered RMS difference at a grid point, by the law of cosines:
/// `sqrt(refstd^2 + r^2 - 2*refstd*r*cos(theta))`.
///
/// Zero exactly at (theta = 0, r = refstd), the reference point.
pub fn rms_difference(refstd: f64, radius: f64, theta: f64) -> f64 {
    (refstd * refstd + radius * radius - 2.0 * refstd * radius * theta.cos())
        .max(0.0)
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stddev_matches_pandas_default() {
        // pandas Series.std() of [1..5] is sqrt(2.5).
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((stddev(&v) - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn pearson_of_identical_series_is_exactly_one() {
        // Exactly 1.0, not 1.0 - 1 ulp: the derived angle must be exactly
        // zero so an identical sample lands on the reference point.
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        let r = pearson(&v, &v);
        assert_eq!(r, 1.0);
        assert_eq!(r.acos(), 0.0);
    }

    #[test]
    fn pearson_of_reversed_series_is_exactly_minus_one() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [5.0, 4.0, 3.0, 2.0, 1.0];
        assert_eq!(pearson(&x, &y), -1.0);
    }

    #[test]
    fn pearson_of_constant_series_is_nan() {
        let x = [1.0, 2.0, 3.0];
        let y = [4.0, 4.0, 4.0];
        assert!(pearson(&x, &y).is_nan());
    }

    #[test]
    fn clamp_absorbs_drift_but_not_real_excursions() {
        assert_eq!(clamp_correlation(1.0 + 1e-12), 1.0);
        assert_eq!(clamp_correlation(-1.0 - 1e-12), -1.0);
        assert_eq!(clamp_correlation(0.5), 0.5);
        // A value genuinely outside [-1, 1] is not silently repaired.
        assert_eq!(clamp_correlation(1.5), 1.5);
    }

    #[test]
    fn polar_coords_identical_sample_sits_on_reference() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        let (theta, radius) = polar_coords(&v, &v);
        assert_eq!(theta, 0.0);
        assert!((radius - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn polar_coords_anticorrelated_sample_maps_to_pi() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [5.0, 4.0, 3.0, 2.0, 1.0];
        let (theta, _) = polar_coords(&x, &y);
        assert!((theta - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn polar_coords_uncorrelated_sample_maps_near_half_pi() {
        // Orthogonal to [-1, 0, 1] around its mean.
        let x = [1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 1.0];
        let (theta, _) = polar_coords(&x, &y);
        assert!((theta - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn rms_is_zero_at_the_reference_point() {
        assert_eq!(rms_difference(1.5, 1.5, 0.0), 0.0);
    }

    #[test]
    fn rms_at_right_angle_is_hypotenuse() {
        let rms = rms_difference(3.0, 4.0, std::f64::consts::FRAC_PI_2);
        assert!((rms - 5.0).abs() < 1e-12);
    }
}
