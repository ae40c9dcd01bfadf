//! Normalization pipeline tests.

use palaver_parser::{ExpressionKind, SentenceNormalizer};
use proptest::prelude::*;

#[test]
fn primary_phrase_and_objects() {
    let normalizer = SentenceNormalizer::standard();
    let sentence = normalizer.normalize("Prolong 3, please!");

    assert_eq!(sentence.original(), "Prolong 3, please!");
    assert_eq!(sentence.primary_phrase(), "prolong");
    assert_eq!(sentence.objects().len(), 1);
    assert_eq!(sentence.objects()[0].kind, ExpressionKind::Number);
    assert_eq!(sentence.number(), Some(3));
    assert!(!sentence.has_error());
}

#[test]
fn number_as_trigger_is_not_an_object() {
    let normalizer = SentenceNormalizer::standard();
    let sentence = normalizer.normalize("3");
    assert_eq!(sentence.primary_phrase(), "3");
    assert_eq!(sentence.number(), None);
}

#[test]
fn plural_and_spelling_variants_fold() {
    let normalizer = SentenceNormalizer::standard();
    assert_eq!(normalizer.normalize("Favours?").primary_phrase(), "favor");
    assert_eq!(normalizer.normalize("TASKS").primary_phrase(), "task");
    assert_eq!(normalizer.normalize("okay").primary_phrase(), "ok");
}

#[test]
fn empty_input_yields_empty_sentence() {
    let normalizer = SentenceNormalizer::standard();
    for raw in ["", "   ", "?!.", "the"] {
        let sentence = normalizer.normalize(raw);
        assert!(sentence.is_empty(), "{raw:?}");
        assert_eq!(sentence.primary_phrase(), "");
        assert!(!sentence.has_error());
    }
}

#[test]
fn unterminated_quote_sets_the_error() {
    let normalizer = SentenceNormalizer::standard();
    let sentence = normalizer.normalize("prolong \"1");
    assert!(sentence.has_error());
    assert_eq!(sentence.error_message(), Some("missing closing quote"));
    assert_eq!(sentence.primary_phrase(), "prolong");
    assert_eq!(sentence.objects()[0].kind, ExpressionKind::Quoted);
}

#[test]
fn huge_numbers_set_the_error() {
    let normalizer = SentenceNormalizer::standard();
    let sentence = normalizer.normalize("prolong 99999999999999999999999");
    assert!(sentence.has_error());
    assert!(sentence.error_message().unwrap().starts_with("number too large"));
    assert_eq!(sentence.number(), None);
}

#[test]
fn canonical_trigger_requires_one_expression() {
    let normalizer = SentenceNormalizer::standard();
    assert_eq!(normalizer.canonical_trigger("Quests").unwrap(), "quest");
    assert!(normalizer.canonical_trigger("the").is_err());
    assert!(normalizer.canonical_trigger("two words").is_err());
    assert!(normalizer.canonical_trigger("\"open").is_err());
}

proptest! {
    #[test]
    fn normalization_is_deterministic(input in "\\PC{0,48}") {
        let normalizer = SentenceNormalizer::standard();
        prop_assert_eq!(normalizer.normalize(&input), normalizer.normalize(&input));
    }

    #[test]
    fn punctuation_does_not_change_the_trigger(word in "[a-z]{1,10}", mark in "[.,!?]") {
        let normalizer = SentenceNormalizer::standard();
        let plain = normalizer.normalize(&word);
        let marked = normalizer.normalize(&format!("{word}{mark}"));
        prop_assert_eq!(plain.primary_phrase(), marked.primary_phrase());
    }

    #[test]
    fn quoting_does_not_change_the_trigger(word in "[a-zA-Z]{1,10}") {
        let normalizer = SentenceNormalizer::standard();
        prop_assume!(!normalizer.vocabulary().is_filler(&word.to_lowercase()));
        let plain = normalizer.normalize(&word);
        let quoted = normalizer.normalize(&format!("\"{word}\""));
        prop_assert_eq!(plain.primary_phrase(), quoted.primary_phrase());
    }
}
