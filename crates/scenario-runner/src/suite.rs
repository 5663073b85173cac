//! The built-in scenario suite.

use crate::scenario::{Outcome, Scenario};

/// The standard suite: interior, exterior, center and boundary points
/// against the origin zone, plus an offset zone exercised from both sides.
/// The boundary case is inclusive: a squared distance equal to the bound is
/// inside.
pub fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "within-zone".into(),
            user_x: 100,
            user_y: 100,
            center_x: 0,
            center_y: 0,
            max_distance_squared: 50_000,
            expected: Outcome::Pass,
        },
        Scenario {
            name: "outside-zone".into(),
            user_x: 300,
            user_y: 300,
            center_x: 0,
            center_y: 0,
            max_distance_squared: 50_000,
            expected: Outcome::Fail,
        },
        Scenario {
            name: "at-center".into(),
            user_x: 0,
            user_y: 0,
            center_x: 0,
            center_y: 0,
            max_distance_squared: 50_000,
            expected: Outcome::Pass,
        },
        Scenario {
            name: "on-boundary".into(),
            user_x: 223,
            user_y: 0,
            center_x: 0,
            center_y: 0,
            max_distance_squared: 50_000,
            expected: Outcome::Pass,
        },
        Scenario {
            name: "offset-zone-within".into(),
            user_x: 120,
            user_y: 80,
            center_x: 100,
            center_y: 100,
            max_distance_squared: 2_500,
            expected: Outcome::Pass,
        },
        Scenario {
            name: "offset-zone-outside".into(),
            user_x: 200,
            user_y: 200,
            center_x: 100,
            center_y: 100,
            max_distance_squared: 2_500,
            expected: Outcome::Fail,
        },
    ]
}
