// Confidence scoring - heuristic 0-10 rating, not a probability
use crate::context::{ContextInfo, ContextKind};
use crate::scanner::digit_len;
use crate::settings::{Settings, MAX_RAW_LENGTH_BONUS};
use serde::{Deserialize, Serialize};

pub const MAX_SCORE: u8 = 10;
const LENGTH_BONUS: u8 = 4;
const STRUCTURED_BONUS: u8 = 3;
const PATH_BONUS: u8 = 2;
const BAR_CELLS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confidence {
    pub score: u8,
    pub percent: u8,
}

impl Confidence {
    pub fn from_score(score: u8) -> Self {
        let score = score.min(MAX_SCORE);
        Self {
            score,
            percent: (f64::from(score) / f64::from(MAX_SCORE) * 100.0).round() as u8,
        }
    }

    /// Gate check against `Settings::min_confidence`
    pub fn passes(&self, min_confidence: u8) -> bool {
        self.percent >= min_confidence
    }
}

pub fn compute_confidence(value: u64, context: &ContextInfo, settings: &Settings) -> Confidence {
    let mut score = 0u8;

    let len = digit_len(value);
    if len == 10 || len == 13 {
        score += LENGTH_BONUS;
    }

    score += match context.kind() {
        ContextKind::Raw => settings.raw_length_bonus.min(MAX_RAW_LENGTH_BONUS),
        ContextKind::Json | ContextKind::Log | ContextKind::Sql => STRUCTURED_BONUS,
    };

    if context.has_path() {
        score += PATH_BONUS;
    }

    Confidence::from_score(score)
}

/// `███████░░░ 70%`
pub fn render_bar(percent: u8) -> String {
    let filled = ((f64::from(percent) / 100.0) * BAR_CELLS as f64).round() as usize;
    let filled = filled.min(BAR_CELLS);
    format!(
        "{}{} {}%",
        "█".repeat(filled),
        "░".repeat(BAR_CELLS - filled),
        percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_bonus(bonus: u8) -> Settings {
        Settings {
            raw_length_bonus: bonus,
            ..Settings::default()
        }
    }

    #[test]
    fn test_json_with_path_is_capped() {
        let ctx = ContextInfo::json(Some("$.createdAt".to_string()));
        let c = compute_confidence(1_704_067_200, &ctx, &Settings::default());
        // 4 + 3 + 2
        assert_eq!(c.score, 9);
        assert_eq!(c.percent, 90);
    }

    #[test]
    fn test_structured_contexts_score_alike() {
        let s = Settings::default();
        for kind in [ContextKind::Log, ContextKind::Sql] {
            let c = compute_confidence(1_704_067_200_000, &ContextInfo::plain(kind), &s);
            assert_eq!(c.score, 7);
        }
        let c = compute_confidence(1_704_067_200, &ContextInfo::json(None), &s);
        assert_eq!(c.score, 7);
    }

    #[test]
    fn test_raw_bonus_is_capped() {
        let ctx = ContextInfo::raw();
        assert_eq!(compute_confidence(1_704_067_200, &ctx, &settings_with_bonus(0)).score, 4);
        assert_eq!(compute_confidence(1_704_067_200, &ctx, &settings_with_bonus(6)).score, 10);
        assert_eq!(compute_confidence(1_704_067_200, &ctx, &settings_with_bonus(9)).score, 10);
        assert_eq!(compute_confidence(170_406_720, &ctx, &settings_with_bonus(9)).score, 6);
    }

    #[test]
    fn test_odd_lengths_get_no_length_bonus() {
        let ctx = ContextInfo::plain(ContextKind::Log);
        let s = Settings::default();
        assert_eq!(compute_confidence(170_406_720, &ctx, &s).score, 3);
        assert_eq!(compute_confidence(17_040_672_000, &ctx, &s).score, 3);
    }

    #[test]
    fn test_monotonic_in_contributors() {
        let raw = ContextInfo::raw();
        let mut last = 0;
        for bonus in 0..=MAX_RAW_LENGTH_BONUS {
            let score = compute_confidence(1_704_067_200, &raw, &settings_with_bonus(bonus)).score;
            assert!(score >= last);
            assert!(score <= MAX_SCORE);
            last = score;
        }

        let s = Settings::default();
        let without = compute_confidence(1_704_067_200, &ContextInfo::json(None), &s);
        let with = compute_confidence(1_704_067_200, &ContextInfo::json(Some("$.ts".into())), &s);
        assert!(with.score >= without.score);
    }

    #[test]
    fn test_percent_and_gate() {
        let c = Confidence::from_score(7);
        assert_eq!(c.percent, 70);
        assert!(c.passes(70));
        assert!(!c.passes(71));
        assert_eq!(Confidence::from_score(15).score, 10);
        assert_eq!(Confidence::from_score(15).percent, 100);
    }

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar(70), "███████░░░ 70%");
        assert_eq!(render_bar(0), "░░░░░░░░░░ 0%");
        assert_eq!(render_bar(100), "██████████ 100%");
    }
}
