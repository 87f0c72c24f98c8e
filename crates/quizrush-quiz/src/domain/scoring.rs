//! Answer scoring.
//!
//! Computed by the submit-answer handler before the answer reaches the
//! session: 100 base points for a correct answer, plus a time bonus of
//! `floor(50 * (1 - time_spent / 5000))` when answered in under five seconds.

/// Base points for a correct answer.
pub const BASE_POINTS: u32 = 100;
/// Largest possible time bonus.
pub const MAX_TIME_BONUS: u32 = 50;
/// Answers at or beyond this many milliseconds earn no bonus.
pub const TIME_BONUS_THRESHOLD_MS: u64 = 5000;

/// Points awarded for a single answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerScore {
    /// Base points.
    pub points_earned: u32,
    /// Speed bonus.
    pub time_bonus: u32,
}

impl AnswerScore {
    /// Base points plus bonus.
    #[must_use]
    pub fn total(self) -> u32 {
        self.points_earned + self.time_bonus
    }
}

/// Scores one answer.
#[must_use]
pub fn score_answer(is_correct: bool, time_spent_ms: u64) -> AnswerScore {
    if !is_correct {
        return AnswerScore {
            points_earned: 0,
            time_bonus: 0,
        };
    }

    AnswerScore {
        points_earned: BASE_POINTS,
        time_bonus: time_bonus(time_spent_ms),
    }
}

/// `floor(50 * (1 - t / 5000))` in floating point, 0 at or past the threshold.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn time_bonus(time_spent_ms: u64) -> u32 {
    if time_spent_ms >= TIME_BONUS_THRESHOLD_MS {
        return 0;
    }
    let Ok(spent) = u32::try_from(time_spent_ms) else {
        return 0;
    };
    let fraction = f64::from(spent) / f64::from(TIME_BONUS_THRESHOLD_MS as u32);
    let bonus = (f64::from(MAX_TIME_BONUS) * (1.0 - fraction)).floor();
    if (0.0..=f64::from(MAX_TIME_BONUS)).contains(&bonus) {
        bonus as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incorrect_answer_scores_nothing_even_when_fast() {
        assert_eq!(
            score_answer(false, 100),
            AnswerScore {
                points_earned: 0,
                time_bonus: 0
            }
        );
    }

    #[test]
    fn test_instant_correct_answer_earns_full_bonus() {
        assert_eq!(score_answer(true, 0).total(), 150);
    }

    #[test]
    fn test_bonus_is_floored() {
        // 50 * (1 - 1234/5000) = 37.66
        assert_eq!(score_answer(true, 1234).time_bonus, 37);
        // 50 * (1 - 2500/5000) = 25
        assert_eq!(score_answer(true, 2500).time_bonus, 25);
        // 50 * (1 - 4999/5000) = 0.01
        assert_eq!(score_answer(true, 4999).time_bonus, 0);
    }

    #[test]
    fn test_bonus_floors_in_floating_point_like_the_client_formula() {
        // 50 * (1 - 4000/5000) evaluates to 9.999999999999998
        assert_eq!(score_answer(true, 4000).time_bonus, 9);
        assert_eq!(score_answer(true, 1700).time_bonus, 32);
        assert_eq!(score_answer(true, 4600).time_bonus, 3);
    }

    #[test]
    fn test_bonus_matches_float_formula_across_the_window() {
        for t in 0..TIME_BONUS_THRESHOLD_MS {
            let expected = (50.0 * (1.0 - f64::from(u32::try_from(t).unwrap()) / 5000.0)).floor();
            assert!(
                (f64::from(score_answer(true, t).time_bonus) - expected).abs() < f64::EPSILON,
                "bonus mismatch at {t} ms"
            );
        }
    }

    #[test]
    fn test_no_bonus_at_or_after_threshold() {
        assert_eq!(score_answer(true, 5000).time_bonus, 0);
        assert_eq!(score_answer(true, 60_000).points_earned, BASE_POINTS);
    }
}
