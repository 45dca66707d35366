//! Air comfort scoring from a temperature/humidity pair.

use serde::Serialize;

const NEUTRAL: &str = "😐";
const PLACEHOLDER: &str = "—";

/// Derived score/label/icon summarizing perceived air quality.
///
/// `score` is `None` when either input was missing or NaN; label and icon
/// fall back to a placeholder in that case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComfortAssessment {
    pub score: Option<u8>,
    pub label: String,
    pub icon: String,
}

impl ComfortAssessment {
    fn absent() -> Self {
        ComfortAssessment {
            score: None,
            label: PLACEHOLDER.to_string(),
            icon: PLACEHOLDER.to_string(),
        }
    }
}

/// Scores a (temperature °C, humidity %RH) pair on a 0–10 comfort scale.
///
/// Ideal conditions are humidity 35–50% at 18–24 °C. The baseline comes
/// from five humidity bands with linear interpolation inside each; a
/// temperature override may then lower the score and replace the label.
/// Pure and deterministic; identical inputs always produce identical
/// output.
pub fn assess(temperature: Option<f64>, humidity: Option<f64>) -> ComfortAssessment {
    let (t, h) = match (temperature, humidity) {
        (Some(t), Some(h)) if !t.is_nan() && !h.is_nan() => (t, h),
        _ => return ComfortAssessment::absent(),
    };

    let (mut score, mut label, mut icon) = if h < 15.0 {
        let score = (2.0 - (15.0 - h) / 5.0).max(0.0);
        if h < 8.0 {
            (score, "dangerously dry", "⚠️")
        } else if h < 12.0 {
            (score, "extremely dry", "😟")
        } else {
            (score, "dry", "😕")
        }
    } else if h < 30.0 {
        let score = 2.0 + (h - 15.0) / 5.0;
        if h < 22.0 {
            (score, "extremely dry", "😕")
        } else {
            (score, "dry", NEUTRAL)
        }
    } else if h <= 55.0 {
        let mut score = 6.0 + 4.0 * (1.0 - (h - 42.0).abs() / 20.0);
        if (18.0..=24.0).contains(&t) {
            score = (score + 1.0).min(10.0);
        } else if (15.0..=27.0).contains(&t) {
            score = (score + 0.5).min(10.0);
        } else if t < 10.0 || t > 30.0 {
            score = (score - 1.5).max(0.0);
        }
        // label resolved from the post-bonus score
        if score >= 8.5 {
            (score, "pleasant", "😊")
        } else if score >= 7.0 {
            (score, "pleasant", "🙂")
        } else {
            (score, "moderate", NEUTRAL)
        }
    } else if h <= 75.0 {
        let score = 6.0 - (h - 55.0) / 10.0;
        if h <= 62.0 {
            (score, "humid", NEUTRAL)
        } else {
            (score, "extremely humid", "😕")
        }
    } else {
        let score = (3.0 - (h - 75.0) / 15.0).max(0.0);
        if h > 85.0 {
            (score, "dangerously humid", "⚠️")
        } else {
            (score, "extremely humid", "😟")
        }
    };

    // Temperature override: too hot / cold wins over the humidity label
    // and can only lower the score. First match applies.
    if t >= 35.0 {
        (label, icon) = ("too hot", "🔥");
        score = score.min(1.0);
    } else if t >= 30.0 {
        (label, icon) = ("too hot", "🔥");
        score = score.min(3.0);
    } else if t >= 28.0 {
        (label, icon) = ("hot", "🌡️");
        score = score.min(5.0);
    } else if t <= -5.0 {
        (label, icon) = ("extremely cold", "❄️");
        score = score.min(1.0);
    } else if t <= 5.0 {
        (label, icon) = ("cold", "❄️");
        score = score.min(4.0);
    } else if t <= 10.0 {
        (label, icon) = ("mildly cold", "🥶");
        score = score.min(6.0);
    }

    let rounded = score.clamp(0.0, 10.0).round() as u8;
    if rounded <= 2 && icon == NEUTRAL {
        icon = "😟";
    }

    ComfortAssessment {
        score: Some(rounded),
        label: label.to_string(),
        icon: icon.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_of(t: f64, h: f64) -> u8 {
        assess(Some(t), Some(h)).score.unwrap()
    }

    #[test]
    fn test_ideal_conditions() {
        let a = assess(Some(21.0), Some(42.0));
        assert_eq!(a.score, Some(10));
        assert_eq!(a.label, "pleasant");
        assert_eq!(a.icon, "😊");
    }

    #[test]
    fn test_missing_inputs_soft_fail() {
        let a = assess(None, Some(50.0));
        assert_eq!(a.score, None);
        assert_eq!(a.label, "—");
        assert_eq!(a.icon, "—");

        assert_eq!(assess(Some(20.0), None).score, None);
        assert_eq!(assess(Some(f64::NAN), Some(50.0)).score, None);
        assert_eq!(assess(Some(20.0), Some(f64::NAN)).score, None);
    }

    #[test]
    fn test_heat_override_dominates() {
        let a = assess(Some(36.0), Some(42.0));
        assert_eq!(a.label, "too hot");
        assert_eq!(a.icon, "🔥");
        assert!(a.score.unwrap() <= 1);

        let a = assess(Some(31.0), Some(42.0));
        assert_eq!(a.label, "too hot");
        assert!(a.score.unwrap() <= 3);

        let a = assess(Some(28.5), Some(42.0));
        assert_eq!(a.label, "hot");
        assert!(a.score.unwrap() <= 5);
    }

    #[test]
    fn test_cold_overrides() {
        let a = assess(Some(-10.0), Some(42.0));
        assert_eq!(a.label, "extremely cold");
        assert!(a.score.unwrap() <= 1);

        let a = assess(Some(2.0), Some(42.0));
        assert_eq!(a.label, "cold");
        assert!(a.score.unwrap() <= 4);

        let a = assess(Some(8.0), Some(42.0));
        assert_eq!(a.label, "mildly cold");
        assert!(a.score.unwrap() <= 6);
    }

    #[test]
    fn test_dry_bands() {
        let a = assess(Some(20.0), Some(5.0));
        assert_eq!(a.label, "dangerously dry");
        assert!(a.score.unwrap() <= 2);

        let a = assess(Some(20.0), Some(10.0));
        assert_eq!(a.label, "extremely dry");

        let a = assess(Some(20.0), Some(13.0));
        assert_eq!(a.label, "dry");

        let a = assess(Some(20.0), Some(18.0));
        assert_eq!(a.label, "extremely dry");
        // 2 + 3/5 = 2.6, rounds to 3
        assert_eq!(a.score, Some(3));

        let a = assess(Some(20.0), Some(25.0));
        assert_eq!(a.label, "dry");
    }

    #[test]
    fn test_humid_bands() {
        let a = assess(Some(20.0), Some(60.0));
        assert_eq!(a.label, "humid");
        // 6 - 0.5 = 5.5, rounds to 6
        assert_eq!(a.score, Some(6));

        let a = assess(Some(20.0), Some(70.0));
        assert_eq!(a.label, "extremely humid");

        let a = assess(Some(20.0), Some(80.0));
        assert_eq!(a.label, "extremely humid");
        // max(0, 3 - 5/15) ≈ 2.67, rounds to 3
        assert_eq!(a.score, Some(3));

        let a = assess(Some(20.0), Some(95.0));
        assert_eq!(a.label, "dangerously humid");
        assert_eq!(a.icon, "⚠️");
    }

    #[test]
    fn test_humidity_55_uses_comfort_band() {
        // h = 55 resolves via 6 + 4*(1 - 13/20) = 7.4, not the humid ramp
        // (which would give 6.0); with the +1 bonus at 20 °C that is 8.4.
        let a = assess(Some(20.0), Some(55.0));
        assert_eq!(a.score, Some(8));
        assert_eq!(a.label, "pleasant");
        assert_eq!(a.icon, "🙂");
    }

    #[test]
    fn test_temperature_bonus_in_comfort_band() {
        for h in [30, 36, 42, 48, 55] {
            let h = h as f64;
            let baseline = 6.0 + 4.0 * (1.0 - (h - 42.0).abs() / 20.0);
            for t in [18.0, 20.0, 24.0] {
                let expected = (baseline + 1.0).min(10.0);
                assert_eq!(score_of(t, h), expected.clamp(0.0, 10.0).round() as u8);
            }
        }
    }

    #[test]
    fn test_comfort_band_penalty() {
        // t = 12: no bonus, no penalty, no override
        assert_eq!(score_of(12.0, 42.0), 10);
        // t = 9: -1.5 penalty, then the mildly-cold cap of 6
        assert_eq!(score_of(9.0, 42.0), 6);
    }

    #[test]
    fn test_low_scores_never_show_neutral_icon() {
        // Sweep the grid; a score of 2 or less must not pair with 😐.
        for t in -20..=45 {
            for h in 0..=100 {
                let a = assess(Some(t as f64), Some(h as f64));
                if a.score.unwrap() <= 2 {
                    assert_ne!(a.icon, "😐", "t={t} h={h}");
                }
            }
        }
    }

    #[test]
    fn test_cold_override_in_humid_band() {
        let a = assess(Some(-6.0), Some(58.0));
        assert_eq!(a.label, "extremely cold");
        assert_eq!(a.icon, "❄️");
        assert!(a.score.unwrap() <= 1);
    }

    #[test]
    fn test_scoring_is_pure() {
        let a = assess(Some(23.3), Some(47.7));
        let b = assess(Some(23.3), Some(47.7));
        assert_eq!(a, b);
    }
}
