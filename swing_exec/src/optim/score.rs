//! Swing scoring

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::ScoreWeights;
use crate::swing::SimResult;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Score a simulated swing, higher is better.
///
/// - A miss or ground strike scores negative infinity.
/// - A hit with the hands behind the club head (negative shaft lean) scores
///   far below any forward leaning hit, closer to zero lean being better.
/// - Otherwise the score is the total distance plus a bonus per degree of
///   forward lean.
pub fn score(result: &SimResult, weights: &ScoreWeights) -> f64 {
    if !result.hit_ball {
        return f64::NEG_INFINITY;
    }

    if result.shaft_lean_deg < 0.0 {
        weights.hands_behind_base + result.shaft_lean_deg
    } else {
        result.ball_distance_m + weights.lean_weight * result.shaft_lean_deg
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::swing::Termination;

    fn result(hit_ball: bool, distance: f64, lean: f64) -> SimResult {
        SimResult {
            history: Vec::new(),
            max_speed_ms: 30.0,
            impact_speed_ms: 30.0,
            hit_ball,
            ground_strike: false,
            impact: None,
            termination: Termination::FollowThrough,
            ball_trajectory: Vec::new(),
            ball_distance_m: distance,
            carry_distance_m: distance,
            run_distance_m: 0.0,
            attack_angle_deg: 0.0,
            launch_angle_deg: 0.0,
            shaft_lean_deg: lean,
            ball_speed_ms: 0.0,
            smash_factor: 0.0,
            apex_height_m: 0.0,
            flight_time_s: 0.0,
        }
    }

    #[test]
    fn test_score_rules() {
        let w = ScoreWeights::default();

        assert_eq!(score(&result(false, 100.0, 10.0), &w), f64::NEG_INFINITY);
        assert_eq!(score(&result(true, 100.0, -5.0), &w), -1005.0);
        assert_eq!(score(&result(true, 100.0, 10.0), &w), 120.0);
        assert_eq!(score(&result(true, 80.0, 0.0), &w), 80.0);
    }

    #[test]
    fn test_forward_lean_beats_any_hands_behind() {
        let w = ScoreWeights::default();

        let behind = score(&result(true, 200.0, -0.1), &w);
        let forward = score(&result(true, 1.0, 0.0), &w);
        let miss = score(&result(false, 0.0, 0.0), &w);

        assert!(forward > behind);
        assert!(behind > miss);
    }
}
