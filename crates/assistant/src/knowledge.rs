//! Small-talk knowledge base.
//!
//! A JSON file maps regex patterns to canned answers; the first
//! matching pattern wins, in file order. Values may be a single string,
//! an array (one picked at random) or an object with a `default` key.
//! Patterns that fail to compile are skipped so one bad entry cannot
//! take the whole chat down.

use std::path::Path;

use rand::seq::IndexedRandom;
use regex::RegexBuilder;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Answer given when no pattern matches and the engine has nothing
/// better to say.
const DEFAULT_FALLBACK: &str = "Desculpe, não entendi.";

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("could not read knowledge file: {0}")]
    Io(#[from] std::io::Error),

    #[error("knowledge file is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Compiled pattern table plus the fallback answer.
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    entries: Vec<(regex::Regex, KnowledgeReply)>,
    fallback: Option<String>,
}

#[derive(Debug, Clone)]
enum KnowledgeReply {
    Single(String),
    Variants(Vec<String>),
}

impl KnowledgeBase {
    /// An empty base: every question falls through to the fallback.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and compile a knowledge file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or is not valid
    /// JSON. Individual bad patterns are skipped, not errors.
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        let raw = std::fs::read_to_string(path)?;
        let file: KnowledgeFile = serde_json::from_str(&raw)?;
        Ok(Self::compile(file))
    }

    fn compile(file: KnowledgeFile) -> Self {
        let mut entries = Vec::with_capacity(file.keywords.len());

        for (pattern, value) in file.keywords {
            let regex = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
                Ok(regex) => regex,
                Err(err) => {
                    warn!(pattern = %pattern, error = %err, "Skipping bad knowledge pattern");
                    continue;
                }
            };

            let reply = match value {
                KnowledgeValue::Text(text) => KnowledgeReply::Single(text),
                KnowledgeValue::Variants(variants) => KnowledgeReply::Variants(variants),
                KnowledgeValue::Keyed { default } => KnowledgeReply::Single(default),
                KnowledgeValue::Other(value) => KnowledgeReply::Single(value.to_string()),
            };

            entries.push((regex, reply));
        }

        Self {
            entries,
            fallback: file.fallback,
        }
    }

    /// Answer for `text`, or the fallback when nothing matches.
    #[must_use]
    pub fn reply(&self, text: &str) -> String {
        for (regex, reply) in &self.entries {
            if regex.is_match(text) {
                return match reply {
                    KnowledgeReply::Single(answer) => answer.clone(),
                    KnowledgeReply::Variants(variants) => variants
                        .choose(&mut rand::rng())
                        .cloned()
                        .unwrap_or_else(|| self.fallback_reply()),
                };
            }
        }

        self.fallback_reply()
    }

    fn fallback_reply(&self) -> String {
        self.fallback
            .clone()
            .unwrap_or_else(|| DEFAULT_FALLBACK.to_owned())
    }
}

/// On-disk shape of the knowledge file.
///
/// Keywords keep file order; a map would reorder them and change which
/// pattern wins when several match.
#[derive(Debug, Deserialize)]
struct KnowledgeFile {
    #[serde(deserialize_with = "ordered_keywords")]
    keywords: Vec<(String, KnowledgeValue)>,
    fallback: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KnowledgeValue {
    Text(String),
    Variants(Vec<String>),
    Keyed { default: String },
    Other(serde_json::Value),
}

fn ordered_keywords<'de, D>(deserializer: D) -> Result<Vec<(String, KnowledgeValue)>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct KeywordsVisitor;

    impl<'de> serde::de::Visitor<'de> for KeywordsVisitor {
        type Value = Vec<(String, KnowledgeValue)>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a map of pattern to answer")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::MapAccess<'de>,
        {
            let mut entries = Vec::new();
            while let Some(entry) = access.next_entry()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(KeywordsVisitor)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base_from(json: &str) -> KnowledgeBase {
        KnowledgeBase::compile(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        let base = base_from(
            r#"{
                "keywords": {
                    "rod[ií]zio": "Rodízio todos os dias a partir das 18h!",
                    "horário|abre": "Abrimos às 18:00."
                },
                "fallback": "Desculpe, não entendi."
            }"#,
        );

        assert_eq!(
            base.reply("Que horas abre o rodízio?"),
            "Rodízio todos os dias a partir das 18h!"
        );
        assert_eq!(base.reply("qual o horário?"), "Abrimos às 18:00.");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let base = base_from(
            r#"{"keywords": {"estacionamento": "Temos convênio na rua ao lado."}, "fallback": "?"}"#,
        );

        assert_eq!(
            base.reply("Tem ESTACIONAMENTO?"),
            "Temos convênio na rua ao lado."
        );
    }

    #[test]
    fn test_variant_answers_come_from_the_list() {
        let base = base_from(
            r#"{"keywords": {"obrigad[oa]": ["De nada! 🍕", "Imagina!"]}, "fallback": "?"}"#,
        );

        let answer = base.reply("obrigado!");
        assert!(answer == "De nada! 🍕" || answer == "Imagina!");
    }

    #[test]
    fn test_keyed_answer_uses_default() {
        let base = base_from(
            r#"{"keywords": {"wifi": {"default": "A senha está no balcão.", "note": "x"}}, "fallback": "?"}"#,
        );

        assert_eq!(base.reply("tem wifi?"), "A senha está no balcão.");
    }

    #[test]
    fn test_bad_pattern_is_skipped() {
        let base = base_from(
            r#"{
                "keywords": {
                    "[unclosed": "nunca",
                    "pizza": "Temos mais de 30 sabores."
                },
                "fallback": "Desculpe, não entendi."
            }"#,
        );

        assert_eq!(base.reply("pizza"), "Temos mais de 30 sabores.");
        assert_eq!(base.reply("[unclosed"), "Desculpe, não entendi.");
    }

    #[test]
    fn test_empty_base_falls_back() {
        assert_eq!(KnowledgeBase::empty().reply("oi"), DEFAULT_FALLBACK);
    }
}
