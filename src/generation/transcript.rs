//! Transcript normalization before generation

use std::collections::BTreeSet;

const PUNCTUATION: [(char, &str); 20] = [
    ('，', ", "),
    ('。', "."),
    ('：', ":"),
    ('；', ";"),
    ('？', "?"),
    ('！', "!"),
    ('（', "("),
    ('）', ")"),
    ('【', "["),
    ('】', "]"),
    ('《', "<"),
    ('》', ">"),
    ('“', "\""),
    ('”', "\""),
    ('‘', "'"),
    ('’', "'"),
    ('、', ","),
    ('—', "-"),
    ('…', "..."),
    ('·', "."),
];

const SOUND_EFFECTS: [(&str, &str); 11] = [
    ("[laugh]", "<SE>[Laughter]</SE>"),
    ("[humming start]", "<SE_s>[Humming]</SE_s>"),
    ("[humming end]", "<SE_e>[Humming]</SE_e>"),
    ("[music start]", "<SE_s>[Music]</SE_s>"),
    ("[music end]", "<SE_e>[Music]</SE_e>"),
    ("[music]", "<SE>[Music]</SE>"),
    ("[sing start]", "<SE_s>[Singing]</SE_s>"),
    ("[sing end]", "<SE_e>[Singing]</SE_e>"),
    ("[applause]", "<SE>[Applause]</SE>"),
    ("[cheering]", "<SE>[Cheering]</SE>"),
    ("[cough]", "<SE>[Cough]</SE>"),
];

const TERMINATORS: [&str; 9] = [".", "!", "?", ",", ";", "\"", "'", "</SE_e>", "</SE>"];

/// Replace full-width punctuation with ASCII equivalents
pub fn normalize_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match PUNCTUATION.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

/// Distinct `[SPEAKERn]` tags, sorted
pub fn speaker_tags(text: &str) -> Vec<String> {
    let mut tags = BTreeSet::new();
    let mut rest = text;
    while let Some(start) = rest.find("[SPEAKER") {
        let candidate = &rest[start + 1..];
        let digits = candidate["SPEAKER".len()..]
            .chars()
            .take_while(char::is_ascii_digit)
            .count();
        let end = "SPEAKER".len() + digits;
        if digits > 0 && candidate[end..].starts_with(']') {
            tags.insert(candidate[..end].to_string());
        }
        rest = candidate;
    }
    tags.into_iter().collect()
}

/// Prepare a transcript for the model.
///
/// Punctuation is normalized, parentheses dropped, temperature units
/// spelled out and sound-effect tags rewritten to model markup. Whitespace
/// collapses within lines, blank lines go, and a final period is added
/// when the text does not already end in punctuation or an effect tag.
pub fn normalize_transcript(text: &str) -> String {
    let mut text = normalize_punctuation(text)
        .replace(['(', ')'], " ")
        .replace("°F", " degrees Fahrenheit")
        .replace("°C", " degrees Celsius");

    for (tag, markup) in SOUND_EFFECTS {
        text = text.replace(tag, markup);
    }

    let mut text = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    if !TERMINATORS.iter().any(|t| text.ends_with(t)) {
        text.push('.');
    }
    text
}
