//! Property-based tests for highlight markup editing.
//!
//! These tests verify that wrapping a quoted word in a highlight span and
//! unwrapping it again restores the document byte for byte, and that
//! disjoint highlights coexist without disturbing each other or the
//! spoken text derived from the document.

use proptest::prelude::*;
use proptest::sample::Index;
use readstash::services::highlighter::{
    count, find_text, highlight_quote, list, remove_at, HIGHLIGHT_OPEN,
};
use readstash::services::speech::speech_text;
use readstash::types::errors::HighlightError;

/// Paragraph of distinct words. The numeric suffix and `x` sentinel keep
/// any word from appearing inside another, so quote lookup is unambiguous.
fn arb_words() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-w]{3,8}", 3..12).prop_map(|words| {
        words
            .into_iter()
            .enumerate()
            .map(|(i, w)| format!("{}{}x", w, i))
            .collect()
    })
}

fn paragraph(words: &[String]) -> String {
    format!("<p>{}</p>", words.join(" "))
}

// **Property: highlight-then-remove is the identity**
//
// *For any* paragraph of distinct words and any word in it, highlighting
// the word and removing the highlight again SHALL restore the original
// document exactly.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn highlight_then_remove_restores_document(words in arb_words(), pick in any::<Index>()) {
        let html = paragraph(&words);
        let word = &words[pick.index(words.len())];

        let marked = highlight_quote(&html, word)
            .expect("highlighting a present word should succeed");
        prop_assert_eq!(count(&marked), 1);
        prop_assert_eq!(list(&marked), vec![word.clone()]);

        let restored = remove_at(&marked, 0)
            .expect("removing the only highlight should succeed");
        prop_assert_eq!(
            restored,
            html,
            "Removing the highlight must restore the original document"
        );
    }

    #[test]
    fn disjoint_highlights_coexist(words in arb_words()) {
        let html = paragraph(&words);
        let first = words.first().cloned().unwrap();
        let last = words.last().cloned().unwrap();

        let one = highlight_quote(&html, &first)
            .expect("first highlight should succeed");
        let two = highlight_quote(&one, &last)
            .expect("second, disjoint highlight should succeed");

        prop_assert_eq!(count(&two), 2);
        prop_assert_eq!(
            list(&two),
            vec![first.clone(), last.clone()],
            "Listing reports highlights in document order"
        );

        // The same word again lands inside the existing span
        let again = highlight_quote(&two, &first);
        prop_assert!(
            matches!(again, Err(HighlightError::OverlapsExisting)),
            "Re-highlighting an already highlighted word must be rejected, got {:?}",
            again
        );

        // Unwinding both spans front to back restores the original
        let partial = remove_at(&two, 0).expect("removing the first span should succeed");
        let restored = remove_at(&partial, 0).expect("removing the last span should succeed");
        prop_assert_eq!(restored, html);
    }

    #[test]
    fn highlights_never_change_spoken_text(words in arb_words()) {
        let html = paragraph(&words);
        let first = words.first().cloned().unwrap();
        let last = words.last().cloned().unwrap();

        let one = highlight_quote(&html, &first).expect("first highlight should succeed");
        let two = highlight_quote(&one, &last).expect("second highlight should succeed");

        prop_assert_eq!(
            speech_text(&two),
            speech_text(&html),
            "Highlight markup must not leak into the read-aloud text"
        );
    }

    #[test]
    fn found_range_covers_exact_quote(words in arb_words(), pick in any::<Index>()) {
        let html = paragraph(&words);
        let word = &words[pick.index(words.len())];

        let range = find_text(&html, word).expect("present word should be found");
        prop_assert_eq!(
            &html[range.start..range.end],
            word.as_str(),
            "Resolved range must cover exactly the quoted text"
        );

        let marked = highlight_quote(&html, word).expect("highlighting should succeed");
        prop_assert!(
            marked.contains(&format!("{}{}", HIGHLIGHT_OPEN, word)),
            "The highlight span must open immediately before the quote"
        );
    }
}
