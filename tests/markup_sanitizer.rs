//! Cleaning article markup with the default and configured rule sets.

use cms_reader::{PhraseRule, Sanitizer};
use pretty_assertions::assert_eq;

const SAMPLES: &[&str] = &[
    "",
    "<p>Nichts zu tun</p>",
    "<p>I am text block. Click edit button to change this text.</p><p>Echt</p>",
    "<div><p>[Werbung]</p></div><p>Rest</p>",
    "<p>(Sponsored) Ein Bericht</p><div>&nbsp;<br/></div>",
    "<p>Add Your <b>Heading</b> Text Here</p>",
    "<div class=\"a\"><div class=\"b\"><p> </p></div></div>",
    "[[Anzeige]]",
    "<P>add your heading text here</P>",
];

#[test]
fn test_default_rules_strip_placeholders_and_markers() {
    let sanitizer = Sanitizer::default();

    assert_eq!(
        sanitizer.clean("<p>I am text block. Click edit button to change this text.</p><p>Echt</p>"),
        "<p>Echt</p>"
    );
    assert_eq!(
        sanitizer.clean("<div><p>[Werbung]</p></div><p>Rest</p>"),
        "<p>Rest</p>"
    );
    assert_eq!(
        sanitizer.clean("<p>(Sponsored) Ein Bericht</p><div>&nbsp;<br/></div>"),
        "<p> Ein Bericht</p>"
    );
    assert_eq!(sanitizer.clean("<P>add your heading text here</P>"), "");
}

#[test]
fn test_markers_in_running_text_survive() {
    let sanitizer = Sanitizer::default();
    let text = "<p>Die Werbung für das Fest war sponsored by nobody.</p>";

    assert_eq!(sanitizer.clean(text), text);
}

#[test]
fn test_placeholder_split_by_markup_is_left_alone() {
    let sanitizer = Sanitizer::default();
    let text = "<p>Add Your <b>Heading</b> Text Here</p>";

    assert_eq!(sanitizer.clean(text), text);
}

#[test]
fn test_clean_is_idempotent() {
    let sanitizer = Sanitizer::with_extra_rules(vec![
        PhraseRule::Phrase("Mehr lesen".to_string()),
        PhraseRule::Marker("Promo".to_string()),
    ])
    .unwrap();

    for sample in SAMPLES {
        let once = sanitizer.clean(sample);
        assert_eq!(sanitizer.clean(&once), once, "input: {sample}");
    }
}

#[test]
fn test_extra_rules_follow_the_defaults() {
    let sanitizer =
        Sanitizer::with_extra_rules(vec![PhraseRule::Phrase("Mehr lesen".to_string())]).unwrap();

    assert_eq!(sanitizer.rules().len(), Sanitizer::default_rules().len() + 1);
    assert_eq!(
        sanitizer.rules().last(),
        Some(&PhraseRule::Phrase("Mehr lesen".to_string()))
    );
    assert_eq!(
        sanitizer.clean("<p>Ende.</p><p>[Mehr  lesen]</p>"),
        "<p>Ende.</p>"
    );
}

#[test]
fn test_blank_rules_are_ignored() {
    let sanitizer = Sanitizer::new(vec![
        PhraseRule::Phrase("   ".to_string()),
        PhraseRule::Marker(String::new()),
    ])
    .unwrap();

    assert!(sanitizer.rules().is_empty());
    assert_eq!(sanitizer.clean("<p>x</p><p></p>"), "<p>x</p>");
}

#[test]
fn test_rule_text_is_matched_literally() {
    let sanitizer = Sanitizer::new(vec![PhraseRule::Phrase("a.b (c)".to_string())]).unwrap();

    assert_eq!(sanitizer.clean("<p>axb (c) a.b (c)</p>"), "<p>axb (c) </p>");
}
