use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Nutritional rating attached to a feedback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    Alta,
    #[default]
    Media,
    Baja,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Alta => "Alta",
            Rating::Media => "Media",
            Rating::Baja => "Baja",
        }
    }

    /// Parses a stored label. `Medio` is accepted for `Media`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "ALTA" => Some(Rating::Alta),
            "MEDIA" | "MEDIO" => Some(Rating::Media),
            "BAJA" => Some(Rating::Baja),
            _ => None,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turns a model response into a rating. Implementations never fail.
pub trait RatingStrategy: Send + Sync {
    fn extract(&self, text: &str) -> Rating;
}

/// Token scan over free text, see [`extract_rating`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenRatingExtractor;

impl RatingStrategy for TokenRatingExtractor {
    fn extract(&self, text: &str) -> Rating {
        extract_rating(text)
    }
}

/// Ratings are expected on the last line; fallbacks only look this far back.
const TAIL_CHARS: usize = 200;

// Low is checked first: "ALTA" and "MEDIA" turn up inside ordinary words
// far more often than "BAJA" does.
const BRACKETED: [(&str, Rating); 3] = [
    ("[BAJA]", Rating::Baja),
    ("[ALTA]", Rating::Alta),
    ("[MEDIA]", Rating::Media),
];

const BARE: [(&str, Rating); 4] = [
    ("BAJA", Rating::Baja),
    ("ALTA", Rating::Alta),
    ("MEDIA", Rating::Media),
    ("MEDIO", Rating::Media),
];

fn tail(text: &str, n: usize) -> &str {
    match text.char_indices().rev().nth(n.saturating_sub(1)) {
        Some((idx, _)) if n > 0 => &text[idx..],
        _ if n == 0 => "",
        _ => text,
    }
}

/// Recovers the rating from a feedback text.
///
/// 1. bracketed `[BAJA]`, `[ALTA]`, `[MEDIA]` anywhere in the text;
/// 2. `CALIFICACIÓN: [X]` (colon and brackets optional) in the last 200 chars;
/// 3. bare `BAJA`, `ALTA`, `MEDIA`/`MEDIO` in the same tail;
/// 4. [`Rating::Media`].
///
/// Matching is case-insensitive; `MEDIO` counts as `Media`.
pub fn extract_rating(text: &str) -> Rating {
    lazy_static! {
        static ref RATING_LINE_RE: Regex =
            Regex::new(r"CALIFICACI[OÓ]N\s*:?\s*\[?\s*(BAJA|ALTA|MEDIA|MEDIO)\s*\]?").unwrap();
    }

    let upper = text.to_uppercase();
    if let Some((_, rating)) = BRACKETED.iter().find(|(token, _)| upper.contains(token)) {
        return *rating;
    }

    let window = tail(text, TAIL_CHARS).to_uppercase();
    if let Some(caps) = RATING_LINE_RE.captures(&window) {
        if let Some(rating) = caps.get(1).and_then(|m| Rating::from_label(m.as_str())) {
            return rating;
        }
    }

    BARE.iter()
        .find(|(token, _)| window.contains(token))
        .map(|(_, rating)| *rating)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filler(n: usize) -> String {
        "x".repeat(n)
    }

    #[test]
    fn empty_text_defaults_to_media() {
        assert_eq!(extract_rating(""), Rating::Media);
        assert_eq!(extract_rating("sin calificación"), Rating::Media);
    }

    #[test]
    fn bracketed_tokens_anywhere_in_text() {
        let text = format!("Muy buena opción [ALTA] {}", filler(500));
        assert_eq!(extract_rating(&text), Rating::Alta);
        assert_eq!(extract_rating("... [baja] ..."), Rating::Baja);
        assert_eq!(extract_rating("CALIFICACIÓN: [Media]"), Rating::Media);
    }

    #[test]
    fn bracketed_baja_wins_over_other_brackets() {
        assert_eq!(extract_rating("[ALTA] o [BAJA]"), Rating::Baja);
        assert_eq!(extract_rating("[MEDIA] ... [ALTA]"), Rating::Alta);
    }

    #[test]
    fn final_marker_beats_earlier_incidental_word() {
        let text = format!(
            "La comida tiene una alta cantidad de fibra. {}\n**Calificación:** [BAJA]",
            filler(50)
        );
        assert_eq!(extract_rating(&text), Rating::Baja);
    }

    #[test]
    fn bare_word_in_tail_ignores_body_words() {
        let text = format!(
            "Una porción media de arroz. {}\nCalificación: alta",
            filler(400)
        );
        assert_eq!(extract_rating(&text), Rating::Alta);

        let text = format!("Aporte de grasa media. {}\nalta", filler(400));
        assert_eq!(extract_rating(&text), Rating::Alta);
    }

    #[test]
    fn rating_line_round_trip_for_every_value() {
        for (label, expected) in [
            ("BAJA", Rating::Baja),
            ("ALTA", Rating::Alta),
            ("MEDIA", Rating::Media),
            ("MEDIO", Rating::Media),
        ] {
            let bracketed = format!("Texto del feedback.\nCalificación: [{label}]");
            assert_eq!(extract_rating(&bracketed), expected, "{bracketed}");
            let plain = format!("Texto del feedback.\nCALIFICACION {label}");
            assert_eq!(extract_rating(&plain), expected, "{plain}");
        }
    }

    #[test]
    fn rating_line_takes_priority_over_bare_words_in_tail() {
        // "FALTA" contains "ALTA"; the rating line still decides.
        let text = "Falta proteína.\nCalificación: Media";
        assert_eq!(extract_rating(text), Rating::Media);
    }

    #[test]
    fn bare_scan_order_is_baja_alta_media() {
        assert_eq!(extract_rating("media y alta y baja"), Rating::Baja);
        assert_eq!(extract_rating("media y alta"), Rating::Alta);
        assert_eq!(extract_rating("algo medio"), Rating::Media);
    }

    #[test]
    fn tail_counts_characters_not_bytes() {
        let accented = "ó".repeat(300);
        assert_eq!(tail(&accented, 200).chars().count(), 200);
        assert_eq!(tail("abc", 200), "abc");
        assert_eq!(tail("abc", 0), "");
    }

    #[test]
    fn label_parsing_and_display() {
        assert_eq!(Rating::from_label("alta"), Some(Rating::Alta));
        assert_eq!(Rating::from_label("Medio"), Some(Rating::Media));
        assert_eq!(Rating::from_label("Alto"), None);
        assert_eq!(Rating::Baja.to_string(), "Baja");
        assert_eq!(TokenRatingExtractor.extract("[ALTA]"), Rating::Alta);
    }
}
