//! # Languages and Phrasebooks
//!
//! The chatbot answers in English, Tamil, Hindi or Telugu. The language is
//! either requested explicitly by code or detected from the script of the
//! message.
//!
//! Data reports stay in English; only the conversational phrases
//! (greeting, thanks, help, fallback) and the suggestion chips are localized.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// LANGUAGE
// =============================================================================

/// A supported chat language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ta,
    Hi,
    Te,
}

impl Language {
    pub const ALL: [Language; 4] = [Self::En, Self::Ta, Self::Hi, Self::Te];

    /// Two-letter code used on the wire.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ta => "ta",
            Self::Hi => "hi",
            Self::Te => "te",
        }
    }

    /// Language for a wire code; `None` for anything unsupported.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code.trim()))
    }

    /// Detect the language from the script used in `text`.
    ///
    /// Scripts are checked Tamil, then Devanagari, then Telugu; text in none
    /// of them is English.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let has = |lo: char, hi: char| text.chars().any(|c| (lo..=hi).contains(&c));
        if has('\u{0B80}', '\u{0BFF}') {
            Self::Ta
        } else if has('\u{0900}', '\u{097F}') {
            Self::Hi
        } else if has('\u{0C00}', '\u{0C7F}') {
            Self::Te
        } else {
            Self::En
        }
    }

    /// Localized text for `phrase`, falling back to English.
    #[must_use]
    pub fn phrase(self, phrase: Phrase) -> &'static str {
        lookup(self.phrasebook().phrases, phrase)
            .or_else(|| lookup(EN.phrases, phrase))
            .unwrap_or_default()
    }

    /// Topics listed in the help reply.
    #[must_use]
    pub fn help_topics(self) -> &'static [&'static str] {
        self.phrasebook().help_topics
    }

    /// Follow-up prompts for `topic`, falling back to the language's default set.
    #[must_use]
    pub fn suggestions(self, topic: Topic) -> &'static [&'static str] {
        let book = self.phrasebook();
        lookup(book.suggestions, topic)
            .or_else(|| lookup(book.suggestions, Topic::General))
            .unwrap_or_default()
    }

    fn phrasebook(self) -> &'static Phrasebook {
        match self {
            Self::En => &EN,
            Self::Ta => &TA,
            Self::Hi => &HI,
            Self::Te => &TE,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

fn lookup<K: PartialEq + Copy, V: Copy>(entries: &[(K, V)], key: K) -> Option<V> {
    entries.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

// =============================================================================
// PHRASES
// =============================================================================

/// Conversational phrase keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phrase {
    Greeting,
    /// Takes `{count}`.
    DataLoaded,
    AskAbout,
    NotSure,
    TryAsking,
    Thanks,
    Help,
    ContactSupport,
    MunicipalityInfo,
    StateHelplines,
}

/// Suggestion chip topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Tds,
    Risk,
    Yield,
    District,
    Contact,
    General,
}

struct Phrasebook {
    phrases: &'static [(Phrase, &'static str)],
    help_topics: &'static [&'static str],
    suggestions: &'static [(Topic, &'static [&'static str])],
}

const EN: Phrasebook = Phrasebook {
    phrases: &[
        (Phrase::Greeting, "Hey there! 👋 I'm your INGRES groundwater assistant."),
        (Phrase::DataLoaded, "Got data on {count} wells across Tamil Nadu."),
        (Phrase::AskAbout, "What would you like to know?"),
        (Phrase::NotSure, "I'm not quite sure what you're asking about."),
        (
            Phrase::TryAsking,
            "Try asking about TDS, water quality, specific wells, or districts.",
        ),
        (Phrase::Thanks, "You're welcome! Happy to help. Anything else?"),
        (Phrase::Help, "I can help you with:"),
        (Phrase::ContactSupport, "Contact Support"),
        (Phrase::MunicipalityInfo, "Municipality Contact"),
        (Phrase::StateHelplines, "State Helplines"),
    ],
    help_topics: &[
        "TDS/Water Quality",
        "pH Levels",
        "Well Yields",
        "Water Levels",
        "Risk Assessment",
        "District Data",
        "Specific Wells",
        "Contact Support",
    ],
    suggestions: &[
        (
            Topic::Tds,
            &["Show high-risk sites", "Yield analysis", "Contact support", "District comparison"],
        ),
        (
            Topic::Risk,
            &["TDS breakdown", "Show declining wells", "Contact municipality", "Best performing wells"],
        ),
        (
            Topic::Yield,
            &["Low yield wells", "High performers", "Contact support", "Water quality"],
        ),
        (
            Topic::District,
            &["Overall summary", "Risk assessment", "Contact local office", "TDS analysis"],
        ),
        (
            Topic::Contact,
            &["Show overview", "High risk areas", "Check my district", "Water quality"],
        ),
        (
            Topic::General,
            &["Give me an overview", "Show TDS levels", "High risk areas", "Contact support", "Help"],
        ),
    ],
};

const TA: Phrasebook = Phrasebook {
    phrases: &[
        (Phrase::Greeting, "வணக்கம்! 👋 நான் உங்கள் INGRES நிலத்தடி நீர் உதவியாளர்."),
        (Phrase::DataLoaded, "தமிழ்நாடு முழுவதும் {count} கிணறுகளின் தரவு உள்ளது."),
        (Phrase::AskAbout, "என்ன தெரிந்துகொள்ள விரும்புகிறீர்கள்?"),
        (
            Phrase::NotSure,
            "நீங்கள் என்ன கேட்கிறீர்கள் என்று எனக்கு உறுதியாக தெரியவில்லை.",
        ),
        (
            Phrase::TryAsking,
            "TDS, நீர் தரம், குறிப்பிட்ட கிணறுகள் அல்லது மாவட்டங்களைப் பற்றி கேளுங்கள்.",
        ),
        (Phrase::Thanks, "நன்றி! உதவ மகிழ்ச்சி. வேறு ஏதாவது?"),
        (Phrase::Help, "நான் உதவ முடியும்:"),
        (Phrase::ContactSupport, "தொடர்பு ஆதரவு"),
        (Phrase::MunicipalityInfo, "நகராட்சி தொடர்பு"),
        (Phrase::StateHelplines, "மாநில உதவி எண்கள்"),
    ],
    help_topics: &[
        "TDS/நீர் தரம்",
        "pH அளவுகள்",
        "கிணறு விளைச்சல்",
        "நீர் மட்டங்கள்",
        "ஆபத்து மதிப்பீடு",
        "மாவட்ட தரவு",
        "குறிப்பிட்ட கிணறுகள்",
        "தொடர்பு ஆதரவு",
    ],
    suggestions: &[(
        Topic::General,
        &["கண்ணோட்டம்", "TDS நிலை", "ஆபத்து பகுதிகள்", "தொடர்பு ஆதரவு", "உதவி"],
    )],
};

const HI: Phrasebook = Phrasebook {
    phrases: &[
        (Phrase::Greeting, "नमस्ते! 👋 मैं आपका INGRES भूजल सहायक हूं।"),
        (Phrase::DataLoaded, "तमिलनाडु में {count} कुओं का डेटा है।"),
        (Phrase::AskAbout, "आप क्या जानना चाहते हैं?"),
        (Phrase::NotSure, "मुझे समझ नहीं आया आप क्या पूछ रहे हैं।"),
        (
            Phrase::TryAsking,
            "TDS, जल गुणवत्ता, विशिष्ट कुओं या जिलों के बारे में पूछें।",
        ),
        (Phrase::Thanks, "आपका स्वागत है! मदद करके खुशी हुई। कुछ और?"),
        (Phrase::Help, "मैं मदद कर सकता हूं:"),
        (Phrase::ContactSupport, "संपर्क सहायता"),
        (Phrase::MunicipalityInfo, "नगर पालिका संपर्क"),
        (Phrase::StateHelplines, "राज्य हेल्पलाइन"),
    ],
    help_topics: &[
        "TDS/जल गुणवत्ता",
        "pH स्तर",
        "कुआं उपज",
        "जल स्तर",
        "जोखिम मूल्यांकन",
        "जिला डेटा",
        "विशिष्ट कुएं",
        "संपर्क सहायता",
    ],
    suggestions: &[(
        Topic::General,
        &["अवलोकन दें", "TDS स्तर", "उच्च जोखिम क्षेत्र", "संपर्क सहायता", "मदद"],
    )],
};

const TE: Phrasebook = Phrasebook {
    phrases: &[
        (Phrase::Greeting, "నమస్కారం! 👋 నేను మీ INGRES భూగర్భజల సహాయకుడిని."),
        (Phrase::DataLoaded, "తమిళనాడు అంతటా {count} బావుల డేటా ఉంది."),
        (Phrase::AskAbout, "మీరు ఏమి తెలుసుకోవాలనుకుంటున్నారు?"),
        (Phrase::NotSure, "మీరు ఏమి అడుగుతున్నారో నాకు అర్థం కాలేదు."),
        (
            Phrase::TryAsking,
            "TDS, నీటి నాణ్యత, నిర్దిష్ట బావులు లేదా జిల్లాల గురించి అడగండి.",
        ),
        (Phrase::Thanks, "స్వాగతం! సహాయం చేయడం సంతోషం. మరేదైనా?"),
        (Phrase::Help, "నేను సహాయం చేయగలను:"),
        (Phrase::ContactSupport, "సంప్రదింపు మద్దతు"),
        (Phrase::MunicipalityInfo, "మున్సిపాలిటీ సంప్రదింపు"),
        (Phrase::StateHelplines, "రాష్ట్ర హెల్ప్‌లైన్‌లు"),
    ],
    help_topics: &[
        "TDS/నీటి నాణ్యత",
        "pH స్థాయిలు",
        "బావి దిగుబడి",
        "నీటి స్థాయిలు",
        "ప్రమాద అంచనా",
        "జిల్లా డేటా",
        "నిర్దిష్ట బావులు",
        "సంప్రదింపు మద్దతు",
    ],
    suggestions: &[(
        Topic::General,
        &["అవలోకనం", "TDS స్థాయిలు", "అధిక ప్రమాద ప్రాంతాలు", "సంప్రదింపు మద్దతు", "సహాయం"],
    )],
};

// =============================================================================
// TEMPLATES
// =============================================================================

/// Substitute `{name}` placeholders in `template`.
///
/// Placeholders without a value render as empty. Braces that do not enclose
/// a word are copied through.
#[must_use]
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close)
                if close > 0
                    && after[..close]
                        .chars()
                        .all(|c| c.is_alphanumeric() || c == '_') =>
            {
                let name = &after[..close];
                out.push_str(lookup(vars, name).unwrap_or_default());
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render a phrase in `lang`.
#[must_use]
pub fn translate(lang: Language, phrase: Phrase, vars: &[(&str, &str)]) -> String {
    render(lang.phrase(phrase), vars)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn detects_scripts_in_priority_order() {
        assert_eq!(Language::detect("வணக்கம்"), Language::Ta);
        assert_eq!(Language::detect("नमस्ते"), Language::Hi);
        assert_eq!(Language::detect("హలో"), Language::Te);
        assert_eq!(Language::detect("hello"), Language::En);
        // Tamil wins over Devanagari when both appear
        assert_eq!(Language::detect("नमस्ते வணக்கம்"), Language::Ta);
    }

    #[test]
    fn codes() {
        assert_eq!(Language::from_code("TA"), Some(Language::Ta));
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(serde_json::to_string(&Language::Hi).unwrap(), "\"hi\"");
        assert_eq!(Language::Te.to_string(), "te");
    }

    #[test]
    fn every_language_has_every_phrase() {
        let keys = [
            Phrase::Greeting,
            Phrase::DataLoaded,
            Phrase::AskAbout,
            Phrase::NotSure,
            Phrase::TryAsking,
            Phrase::Thanks,
            Phrase::Help,
            Phrase::ContactSupport,
            Phrase::MunicipalityInfo,
            Phrase::StateHelplines,
        ];
        for lang in Language::ALL {
            for key in keys {
                assert!(lookup(lang.phrasebook().phrases, key).is_some(), "{lang} {key:?}");
            }
            assert_eq!(lang.help_topics().len(), 8);
        }
    }

    #[test]
    fn native_suggestions_fall_back_to_defaults() {
        assert_eq!(Language::Ta.suggestions(Topic::Tds), Language::Ta.suggestions(Topic::General));
        assert_eq!(Language::En.suggestions(Topic::Tds)[0], "Show high-risk sites");
        assert_eq!(Language::En.suggestions(Topic::General).len(), 5);
    }

    #[test]
    fn render_substitutes_known_and_blanks_unknown() {
        assert_eq!(render("{count} wells", &[("count", "12")]), "12 wells");
        assert_eq!(render("a{missing}b", &[]), "ab");
        assert_eq!(render("{not closed", &[]), "{not closed");
        assert_eq!(render("{ } {}", &[]), "{ } {}");
    }

    #[test]
    fn translate_in_tamil() {
        let text = translate(Language::Ta, Phrase::DataLoaded, &[("count", "5")]);
        assert!(text.contains("5 கிணறுகளின்"));
    }
}
