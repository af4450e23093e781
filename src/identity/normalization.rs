use anyhow::{Context, Result};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::config::MatchingSettings;

/// A name reduced to comparable tokens.
///
/// `joined` removes joining punctuation ("jan-krzysztof" → "jankrzysztof"),
/// `split` treats it as a separator ("jan", "krzysztof"). Both are sorted and
/// deduplicated so they compare as sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    pub joined: Vec<String>,
    pub split: Vec<String>,
}

impl NormalizedName {
    pub fn is_empty(&self) -> bool {
        self.joined.is_empty() && self.split.is_empty()
    }

    /// Distinct token sets worth comparing
    pub fn variants(&self) -> Vec<&[String]> {
        let mut variants = vec![self.joined.as_slice()];
        if self.split != self.joined {
            variants.push(self.split.as_slice());
        }
        variants.retain(|tokens| !tokens.is_empty());
        variants
    }

    pub fn all_tokens(&self) -> impl Iterator<Item = &String> {
        self.joined.iter().chain(self.split.iter())
    }
}

/// Normalization rules compiled from `MatchingSettings`
pub struct NormalizationRules {
    honorifics: HashSet<String>,
    strip_patterns: Vec<Regex>,
    joining_punctuation: Vec<char>,
    spellings: HashMap<String, String>,
}

impl NormalizationRules {
    pub fn from_settings(settings: &MatchingSettings) -> Result<Self> {
        let strip_patterns = settings
            .strip_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .with_context(|| format!("Invalid name strip pattern: {}", pattern))
            })
            .collect::<Result<Vec<_>>>()?;

        let spellings = settings
            .name_variants
            .iter()
            .flat_map(|(canonical, alternatives)| {
                alternatives
                    .iter()
                    .map(move |alt| (alt.to_string(), canonical.to_string()))
            })
            .collect();

        Ok(Self {
            honorifics: settings.honorifics.iter().map(|h| h.to_string()).collect(),
            strip_patterns,
            joining_punctuation: settings.joining_punctuation.clone(),
            spellings,
        })
    }

    /// The spelling a name variant is compared under ("aleksei" → "alexey")
    pub fn canonical_token(&self, token: &str) -> String {
        self.spellings
            .get(token)
            .cloned()
            .unwrap_or_else(|| token.to_string())
    }

    pub fn normalize(&self, text: &str) -> NormalizedName {
        let folded = self.strip(&fold(text));

        NormalizedName {
            joined: self.tokens(&folded, true),
            split: self.tokens(&folded, false),
        }
    }

    fn strip(&self, text: &str) -> String {
        self.strip_patterns
            .iter()
            .fold(text.to_string(), |acc, re| re.replace_all(&acc, " ").into_owned())
    }

    fn tokens(&self, text: &str, remove_joining: bool) -> Vec<String> {
        let cleaned: String = text
            .chars()
            .filter_map(|c| {
                if c.is_alphanumeric() {
                    Some(c)
                } else if remove_joining && self.joining_punctuation.contains(&c) {
                    None
                } else {
                    Some(' ')
                }
            })
            .collect();

        let mut tokens: Vec<String> = cleaned
            .split_whitespace()
            .filter(|token| !self.honorifics.contains(*token))
            .map(|token| self.canonical_token(token))
            .collect();
        tokens.sort();
        tokens.dedup();
        tokens
    }
}

/// Lowercase and strip diacritics, including letters NFD leaves intact
fn fold(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(fold_letter)
        .collect()
}

fn fold_letter(c: char) -> Vec<char> {
    match c {
        'ł' => vec!['l'],
        'ø' => vec!['o'],
        'đ' | 'ð' => vec!['d'],
        'ı' => vec!['i'],
        'ß' => vec!['s', 's'],
        'æ' => vec!['a', 'e'],
        'œ' => vec!['o', 'e'],
        'þ' => vec!['t', 'h'],
        other => vec![other],
    }
}
