//! Property-based tests for reading preferences.
//!
//! These tests verify that the font size stays inside the selectable
//! range no matter how it was constructed or how many stepper presses
//! are applied to it.

use proptest::prelude::*;
use readstash::types::reader::{
    ReaderPrefs, ReaderTheme, FONT_SIZE_STEP, MAX_FONT_SIZE, MIN_FONT_SIZE,
};

fn arb_theme() -> impl Strategy<Value = ReaderTheme> {
    prop_oneof![
        Just(ReaderTheme::Light),
        Just(ReaderTheme::Sepia),
        Just(ReaderTheme::Dark),
    ]
}

// **Property: construction clamps into the selectable range**
//
// *For any* requested font size, `ReaderPrefs::new` produces a size
// inside `[MIN_FONT_SIZE, MAX_FONT_SIZE]`, keeping in-range requests
// unchanged.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn construction_clamps_font_size(theme in arb_theme(), requested in any::<u32>()) {
        let prefs = ReaderPrefs::new(theme, requested);

        prop_assert!(
            (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&prefs.font_size_px),
            "Constructed font size {} must be inside the selectable range",
            prefs.font_size_px
        );
        prop_assert_eq!(prefs.theme, theme);

        if (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&requested) {
            prop_assert_eq!(prefs.font_size_px, requested, "In-range sizes pass through");
        } else if requested < MIN_FONT_SIZE {
            prop_assert_eq!(prefs.font_size_px, MIN_FONT_SIZE);
        } else {
            prop_assert_eq!(prefs.font_size_px, MAX_FONT_SIZE);
        }
    }

    #[test]
    fn steppers_never_leave_range(
        theme in arb_theme(),
        start in 0u32..=64,
        presses in proptest::collection::vec(any::<bool>(), 0..30),
    ) {
        let mut prefs = ReaderPrefs::new(theme, start);

        for increase in presses {
            if increase {
                prefs.increase_font();
            } else {
                prefs.decrease_font();
            }
            prop_assert!(
                (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&prefs.font_size_px),
                "Stepper left the range: {}",
                prefs.font_size_px
            );
        }
    }

    #[test]
    fn stepper_flags_match_effect(theme in arb_theme(), start in 0u32..=64) {
        let mut prefs = ReaderPrefs::new(theme, start);

        let could_increase = prefs.can_increase();
        let before = prefs.font_size_px;
        prefs.increase_font();
        if !could_increase {
            prop_assert_eq!(prefs.font_size_px, before, "Saturated increase is a no-op");
        } else if before + FONT_SIZE_STEP <= MAX_FONT_SIZE {
            prop_assert_eq!(
                prefs.font_size_px,
                before + FONT_SIZE_STEP,
                "An unsaturated increase moves exactly one step"
            );
        } else {
            prop_assert_eq!(prefs.font_size_px, MAX_FONT_SIZE);
        }

        let could_decrease = prefs.can_decrease();
        let before = prefs.font_size_px;
        prefs.decrease_font();
        if !could_decrease {
            prop_assert_eq!(prefs.font_size_px, before, "Saturated decrease is a no-op");
        } else if before >= MIN_FONT_SIZE + FONT_SIZE_STEP {
            prop_assert_eq!(
                prefs.font_size_px,
                before - FONT_SIZE_STEP,
                "An unsaturated decrease moves exactly one step"
            );
        } else {
            prop_assert_eq!(prefs.font_size_px, MIN_FONT_SIZE);
        }
    }

    #[test]
    fn prefs_serialization_roundtrip(theme in arb_theme(), size in MIN_FONT_SIZE..=MAX_FONT_SIZE) {
        let prefs = ReaderPrefs::new(theme, size);

        let json = serde_json::to_string(&prefs)
            .expect("Serialization should succeed for any valid prefs");
        let back: ReaderPrefs = serde_json::from_str(&json)
            .expect("Deserialization should succeed for serializer output");

        prop_assert_eq!(back, prefs, "Round-tripped prefs must equal the original");
    }
}

// The exact boundary cases, pinned deterministically.

#[test]
fn decrease_at_minimum_holds() {
    let mut prefs = ReaderPrefs::new(ReaderTheme::Light, MIN_FONT_SIZE);
    prefs.decrease_font();
    assert_eq!(prefs.font_size_px, MIN_FONT_SIZE);
    assert!(!prefs.can_decrease());
}

#[test]
fn increase_at_maximum_holds() {
    let mut prefs = ReaderPrefs::new(ReaderTheme::Light, MAX_FONT_SIZE);
    prefs.increase_font();
    assert_eq!(prefs.font_size_px, MAX_FONT_SIZE);
    assert!(!prefs.can_increase());
}
