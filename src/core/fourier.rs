//! Truncated harmonic (sine-series) estimator over a byte time-domain buffer.

/// coefficients[k-1] = (1/N) · Σ_i v_i · sin(2π·k·i/N), v_i = (s_i-128)/128.
///
/// Pure and deterministic, O(harmonics · N). A pure sinusoid at harmonic `k`
/// puts its energy into coefficient `k-1` and (near) nothing elsewhere.
pub fn estimate(time_domain: &[u8], harmonics: usize) -> Vec<f32> {
    let n = time_domain.len();
    let mut coeffs = vec![0.0f32; harmonics];
    if n == 0 {
        return coeffs;
    }
    let two_pi = std::f32::consts::PI * 2.0;
    for (ki, c) in coeffs.iter_mut().enumerate() {
        let k = (ki + 1) as f32;
        let mut sum = 0.0f32;
        for (i, &s) in time_domain.iter().enumerate() {
            let t = i as f32 / n as f32;
            let v = (s as f32 - 128.0) / 128.0;
            sum += v * (two_pi * k * t).sin();
        }
        *c = sum / n as f32;
    }
    coeffs
}

/// Radial offset of the reconstructed shape:
/// Σ_k coefficients[k-1] · (base_radius · contribution) / k.
pub fn radial_offset(coeffs: &[f32], base_radius: f32, contribution: f32) -> f32 {
    let mut r = 0.0f32;
    for (ki, &c) in coeffs.iter().enumerate() {
        r += c * (base_radius * contribution) / (ki + 1) as f32;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sinusoid(harmonic: usize, n: usize) -> Vec<u8> {
        let two_pi = std::f32::consts::PI * 2.0;
        (0..n)
            .map(|i| {
                let v = (two_pi * harmonic as f32 * i as f32 / n as f32).sin();
                (128.0 + 127.0 * v).round() as u8
            })
            .collect()
    }

    #[test]
    fn pure_third_harmonic_concentrates_in_coefficient_two() {
        let buf = sinusoid(3, 2048);
        let coeffs = estimate(&buf, 8);
        // Theoretical peak: (127/128) · 1/2.
        let expected = 127.0 / 128.0 * 0.5;
        assert_relative_eq!(coeffs[2], expected, epsilon = 5e-3);
        for (i, &c) in coeffs.iter().enumerate() {
            if i != 2 {
                assert!(c.abs() < 5e-3, "leak at {i}: {c}");
            }
        }
    }

    #[test]
    fn silent_buffer_estimates_zero() {
        let coeffs = estimate(&[128u8; 1024], 16);
        assert!(coeffs.iter().all(|&c| c.abs() < 1e-2));
    }

    #[test]
    fn empty_buffer_is_tolerated() {
        let coeffs = estimate(&[], 4);
        assert_eq!(coeffs, vec![0.0; 4]);
    }

    #[test]
    fn radial_offset_divides_by_harmonic_index() {
        let r = radial_offset(&[1.0, 1.0], 100.0, 0.5);
        assert_relative_eq!(r, 50.0 + 25.0);
    }
}
