//! Piecewise gamma curve used by the grade.
//!
//! Matches the Grade node behaviour:
//!
//! - `[0, 1)` follows the power curve,
//! - values at or above 1 continue on a linear tail with slope `1/gamma`
//!   (forward) or `gamma` (reverse), so the curve is continuous at 1,
//! - negatives pass through unchanged.
//!
//! A gamma of exactly 1 is the identity. A gamma at or below zero
//! degenerates into a step: forward sends negatives to 0 and values above 1
//! to [`GAMMA_ZERO_WHITE`]; reverse maps anything positive to 1 and the rest
//! to 0.
//!
//! For any gamma in `(0, inf)` [`forward`] and [`reverse`] are exact inverses.
//!
//! # Example
//!
//! ```rust
//! use aovgrade_ops::gamma_curve::{forward, reverse};
//!
//! let g = [2.2; 3];
//! let inv_g = g.map(|g| 1.0 / g);
//! let x = [0.18, 1.5, -0.2];
//! let back = reverse(forward(x, g, inv_g), g);
//! assert!((back[0] - 0.18).abs() < 1e-5);
//! assert_eq!(back[2], -0.2);
//! ```

/// Forward output for values above 1 when gamma is not positive.
///
/// Large but finite, so blends and the beauty merge stay finite.
pub const GAMMA_ZERO_WHITE: f32 = 1e30;

/// Forward gamma for one channel.
#[inline]
pub fn forward_channel(x: f32, gamma: f32, inv_gamma: f32) -> f32 {
    if gamma <= 0.0 {
        if x < 0.0 {
            0.0
        } else if x > 1.0 {
            GAMMA_ZERO_WHITE
        } else {
            x
        }
    } else if gamma == 1.0 || x < 0.0 {
        x
    } else if x < 1.0 {
        x.powf(inv_gamma)
    } else {
        1.0 + (x - 1.0) * inv_gamma
    }
}

/// Reverse gamma for one channel.
#[inline]
pub fn reverse_channel(x: f32, gamma: f32) -> f32 {
    if gamma <= 0.0 {
        if x > 0.0 { 1.0 } else { 0.0 }
    } else if gamma == 1.0 || x <= 0.0 {
        x
    } else if x < 1.0 {
        x.powf(gamma)
    } else {
        1.0 + (x - 1.0) * gamma
    }
}

/// Forward gamma, per channel.
///
/// `inv_gamma` is the precomputed `1 / gamma`; it is never read for channels
/// whose gamma is not positive.
#[inline]
pub fn forward(rgb: [f32; 3], gamma: [f32; 3], inv_gamma: [f32; 3]) -> [f32; 3] {
    [
        forward_channel(rgb[0], gamma[0], inv_gamma[0]),
        forward_channel(rgb[1], gamma[1], inv_gamma[1]),
        forward_channel(rgb[2], gamma[2], inv_gamma[2]),
    ]
}

/// Reverse gamma, per channel.
#[inline]
pub fn reverse(rgb: [f32; 3], gamma: [f32; 3]) -> [f32; 3] {
    [
        reverse_channel(rgb[0], gamma[0]),
        reverse_channel(rgb[1], gamma[1]),
        reverse_channel(rgb[2], gamma[2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn unit_gamma_is_identity() {
        for x in [-3.0, -0.5, 0.0, 0.25, 1.0, 7.5] {
            assert_eq!(forward_channel(x, 1.0, 1.0), x);
            assert_eq!(reverse_channel(x, 1.0), x);
        }
    }

    #[test]
    fn power_segment() {
        let y = forward_channel(0.25, 2.0, 0.5);
        assert!((y - 0.5).abs() < EPSILON, "got {}", y);
        let x = reverse_channel(0.5, 2.0);
        assert!((x - 0.25).abs() < EPSILON, "got {}", x);
    }

    #[test]
    fn linear_tail_continuous_at_one() {
        let g = 2.2;
        assert_eq!(forward_channel(1.0, g, 1.0 / g), 1.0);
        assert_eq!(reverse_channel(1.0, g), 1.0);

        let below = forward_channel(1.0 - 1e-4, g, 1.0 / g);
        assert!((below - 1.0).abs() < 1e-3);

        // 1 + (3 - 1) / 2
        assert!((forward_channel(3.0, 2.0, 0.5) - 2.0).abs() < EPSILON);
        // 1 + (2 - 1) * 2
        assert!((reverse_channel(2.0, 2.0) - 3.0).abs() < EPSILON);
    }

    #[test]
    fn negatives_pass_through() {
        assert_eq!(forward_channel(-0.4, 2.0, 0.5), -0.4);
        assert_eq!(reverse_channel(-0.4, 2.0), -0.4);
        assert_eq!(reverse_channel(0.0, 2.0), 0.0);
        assert_eq!(forward_channel(0.0, 2.0, 0.5), 0.0);
    }

    #[test]
    fn zero_gamma_forward_step() {
        let inf = f32::INFINITY;
        assert_eq!(forward_channel(-0.5, 0.0, inf), 0.0);
        assert_eq!(forward_channel(0.5, 0.0, inf), 0.5);
        assert_eq!(forward_channel(1.0, 0.0, inf), 1.0);
        assert_eq!(forward_channel(1.5, 0.0, inf), GAMMA_ZERO_WHITE);
        assert!(forward_channel(1.5, -2.0, -0.5).is_finite());
    }

    #[test]
    fn zero_gamma_reverse_step() {
        assert_eq!(reverse_channel(0.3, 0.0), 1.0);
        assert_eq!(reverse_channel(0.0, 0.0), 0.0);
        assert_eq!(reverse_channel(-1.0, -1.0), 0.0);
    }

    #[test]
    fn per_channel_gamma() {
        let g = [1.0, 2.0, 0.0];
        let inv = [1.0, 0.5, f32::INFINITY];
        let out = forward([0.25, 0.25, 2.0], g, inv);
        assert_eq!(out[0], 0.25);
        assert!((out[1] - 0.5).abs() < EPSILON);
        assert_eq!(out[2], GAMMA_ZERO_WHITE);
    }

    #[test]
    fn roundtrip_sweep() {
        let gammas = [0.1, 0.45, 1.0, 1.8, 2.2, 4.0, 10.0];
        for &g in &gammas {
            let gv = [g; 3];
            let inv = [1.0 / g; 3];
            let mut x = -2.0f32;
            while x <= 5.0 {
                let rgb = [x; 3];
                let back = reverse(forward(rgb, gv, inv), gv);
                assert!((back[0] - x).abs() < EPSILON, "gamma {} x {} -> {}", g, x, back[0]);
                let fwd = forward(reverse(rgb, gv), gv, inv);
                assert!((fwd[0] - x).abs() < EPSILON, "gamma {} x {} -> {}", g, x, fwd[0]);
                x += 0.125;
            }
        }
    }
}
