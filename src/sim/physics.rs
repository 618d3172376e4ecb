pub const G: f32 = 9.8;
pub const EPSILON: f32 = 1.192_093e-7;

/// Speed from energy conservation for a car released at rest at `peak_height`.
///
/// `v = sqrt(2 * g * (peak_height - height))`, clamped to zero at or above the
/// peak so the radicand never goes negative.
pub fn energy_speed(gravity: f32, peak_height: f32, height: f32) -> f32 {
    let drop = peak_height - height;
    if !drop.is_finite() || !gravity.is_finite() {
        return 0.0;
    }
    (2.0 * gravity * drop).max(0.0).sqrt()
}

/// Arc-length budget for one simulation step.
///
/// `damping` is a feel parameter that slows the ride down; it is not
/// physically derived. Non-positive or non-finite inputs yield no budget.
pub fn distance_budget(speed: f32, dt: f32, damping: f32) -> f32 {
    let budget = speed * dt / damping;
    if budget.is_finite() && budget > 0.0 {
        budget
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-4;

    #[test]
    fn energy_speed_matches_free_fall() {
        // Dropping 5m under g=9.8 gives sqrt(98)
        let v = energy_speed(G, 25.0, 20.0);
        assert_relative_eq!(v, 98.0_f32.sqrt(), epsilon = TOLERANCE);
    }

    #[test]
    fn energy_speed_zero_at_peak() {
        assert_relative_eq!(energy_speed(G, 25.0, 25.0), 0.0, epsilon = TOLERANCE);
    }

    #[test]
    fn energy_speed_clamps_above_peak() {
        let v = energy_speed(G, 25.0, 40.0);
        assert_eq!(v, 0.0);
        assert!(!v.is_nan());
    }

    #[test]
    fn energy_speed_increases_going_downhill() {
        let high = energy_speed(G, 25.0, 10.0);
        let low = energy_speed(G, 25.0, 0.0);
        assert!(low > high);
    }

    #[test]
    fn energy_speed_non_finite_height_is_zero() {
        assert_eq!(energy_speed(G, 25.0, f32::NAN), 0.0);
        assert_eq!(energy_speed(G, f32::INFINITY, 0.0), 0.0);
    }

    #[test]
    fn distance_budget_scales_with_damping() {
        assert_relative_eq!(distance_budget(8.0, 0.5, 4.0), 1.0, epsilon = TOLERANCE);
        assert_relative_eq!(distance_budget(8.0, 0.5, 2.0), 2.0, epsilon = TOLERANCE);
    }

    #[test]
    fn distance_budget_rejects_degenerate_inputs() {
        assert_eq!(distance_budget(10.0, 0.0, 4.0), 0.0);
        assert_eq!(distance_budget(10.0, -1.0, 4.0), 0.0);
        assert_eq!(distance_budget(10.0, 1.0, 0.0), 0.0);
        assert_eq!(distance_budget(f32::NAN, 1.0, 4.0), 0.0);
    }
}
