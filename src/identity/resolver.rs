use anyhow::Result;
use log::debug;
use std::collections::{BTreeSet, HashMap};

use crate::config::MatchingSettings;
use crate::domain::ReferenceRecord;
use crate::reference::ReferenceStore;

use super::cache::NormalizationCache;
use super::normalization::{NormalizationRules, NormalizedName};
use super::scoring::TokenScorer;

/// Which matching step produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    Exact,
    Normalized,
    TokenOverlap,
    UsernameFragments,
}

impl MatchMethod {
    pub fn as_str(&self) -> &str {
        match self {
            MatchMethod::Exact => "exact",
            MatchMethod::Normalized => "normalized",
            MatchMethod::TokenOverlap => "token_overlap",
            MatchMethod::UsernameFragments => "username_fragments",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub record: ReferenceRecord,
    pub method: MatchMethod,
}

struct Candidate {
    record: ReferenceRecord,
    name: NormalizedName,
    name_len: usize,
}

/// Matches platform players to reference entries.
///
/// Canonical names are normalized once into an inverted token index; only
/// candidates sharing at least one token with the query are ever scored.
pub struct IdentityResolver {
    rules: NormalizationRules,
    scorer: TokenScorer,
    acceptance_threshold: f64,
    min_shared_tokens: usize,
    min_fragment_len: usize,
    candidates: Vec<Candidate>,
    exact: HashMap<String, usize>,
    index: HashMap<String, Vec<usize>>,
    cache: NormalizationCache,
}

impl IdentityResolver {
    pub fn new(store: &ReferenceStore, settings: &MatchingSettings) -> Result<Self> {
        let rules = NormalizationRules::from_settings(settings)?;
        let mut resolver = Self {
            scorer: TokenScorer::from_settings(settings),
            acceptance_threshold: settings.acceptance_threshold,
            min_shared_tokens: settings.min_shared_tokens,
            min_fragment_len: settings.min_fragment_len,
            candidates: Vec::with_capacity(store.len()),
            exact: HashMap::new(),
            index: HashMap::new(),
            cache: NormalizationCache::new(),
            rules,
        };

        for record in store.records() {
            resolver.add_candidate(record);
        }

        debug!(
            "Identity index built: {} names, {} tokens",
            resolver.candidates.len(),
            resolver.index.len()
        );
        Ok(resolver)
    }

    /// Resolve an opponent, trying exact, normalized, token-overlap and
    /// username-fragment matching in that order
    pub fn resolve(
        &mut self,
        platform_identifier: &str,
        display_name: Option<&str>,
    ) -> Option<Resolution> {
        let display_name = display_name.map(str::trim).filter(|name| !name.is_empty());

        if let Some(name) = display_name {
            if let Some(idx) = self.exact.get(&name.to_lowercase()).copied() {
                return Some(self.resolution(idx, MatchMethod::Exact));
            }

            let query = self.cache.normalize(&self.rules, name);
            if let Some(idx) = self.normalized_match(&query) {
                return Some(self.resolution(idx, MatchMethod::Normalized));
            }
            if let Some(idx) = self.best_overlap(&query.variants()) {
                return Some(self.resolution(idx, MatchMethod::TokenOverlap));
            }
        }

        let fragments = self.username_fragments(platform_identifier);
        self.best_overlap(&[fragments.as_slice()])
            .map(|idx| self.resolution(idx, MatchMethod::UsernameFragments))
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    fn add_candidate(&mut self, record: ReferenceRecord) {
        let idx = self.candidates.len();
        let name = self.rules.normalize(&record.canonical_name);

        self.exact
            .entry(record.canonical_name.trim().to_lowercase())
            .or_insert(idx);

        let tokens: BTreeSet<&String> = name.all_tokens().collect();
        for token in tokens {
            self.index.entry(token.clone()).or_default().push(idx);
        }

        self.candidates.push(Candidate {
            name_len: record.canonical_name.chars().count(),
            record,
            name,
        });
    }

    fn resolution(&self, idx: usize, method: MatchMethod) -> Resolution {
        Resolution {
            record: self.candidates[idx].record.clone(),
            method,
        }
    }

    fn sharing_candidates<'a, I>(&self, tokens: I) -> BTreeSet<usize>
    where
        I: IntoIterator<Item = &'a String>,
    {
        tokens
            .into_iter()
            .filter_map(|token| self.index.get(token))
            .flatten()
            .copied()
            .collect()
    }

    /// Identical token sets win over subsets; then shorter, then lexicographic name
    fn normalized_match(&self, query: &NormalizedName) -> Option<usize> {
        self.sharing_candidates(query.all_tokens())
            .into_iter()
            .filter_map(|idx| {
                let candidate = &self.candidates[idx];
                self.set_match_rank(query, &candidate.name)
                    .map(|rank| (rank, candidate.name_len, idx))
            })
            .min_by(|a, b| {
                a.0.cmp(&b.0)
                    .then(a.1.cmp(&b.1))
                    .then_with(|| self.name_of(a.2).cmp(self.name_of(b.2)))
            })
            .map(|(_, _, idx)| idx)
    }

    fn set_match_rank(&self, query: &NormalizedName, candidate: &NormalizedName) -> Option<u8> {
        let pairs = || {
            query
                .variants()
                .into_iter()
                .flat_map(|q| candidate.variants().into_iter().map(move |c| (q, c)))
        };

        if pairs().any(|(q, c)| q == c) {
            return Some(0);
        }
        if pairs().any(|(q, c)| self.is_subset_match(q, c)) {
            return Some(1);
        }
        None
    }

    fn is_subset_match(&self, a: &[String], b: &[String]) -> bool {
        let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
        small.len() >= self.min_shared_tokens && small.iter().all(|token| large.contains(token))
    }

    /// Highest-scoring candidate at or above the acceptance threshold
    fn best_overlap(&self, queries: &[&[String]]) -> Option<usize> {
        self.sharing_candidates(queries.iter().flat_map(|q| q.iter()))
            .into_iter()
            .map(|idx| (self.overlap_score(queries, &self.candidates[idx].name), idx))
            .filter(|(score, _)| *score >= self.acceptance_threshold)
            .min_by(|a, b| {
                b.0.total_cmp(&a.0)
                    .then(self.candidates[a.1].name_len.cmp(&self.candidates[b.1].name_len))
                    .then_with(|| self.name_of(a.1).cmp(self.name_of(b.1)))
            })
            .map(|(_, idx)| idx)
    }

    fn overlap_score(&self, queries: &[&[String]], candidate: &NormalizedName) -> f64 {
        queries
            .iter()
            .flat_map(|q| {
                candidate
                    .variants()
                    .into_iter()
                    .map(move |c| self.scorer.candidate_score(q, c))
            })
            .fold(0.0, f64::max)
    }

    /// Name fragments hidden in a username: "magnus_carlsen99" and
    /// "magnuscarlsen" both yield ["carlsen", "magnus"]
    fn username_fragments(&self, identifier: &str) -> Vec<String> {
        let lowered = identifier.to_lowercase();
        let mut fragments: Vec<String> = lowered
            .split(|c: char| c.is_ascii_digit() || matches!(c, '_' | '-' | '.'))
            .filter(|fragment| fragment.chars().count() >= self.min_fragment_len)
            .flat_map(|fragment| match self.split_compact(fragment) {
                Some((first, second)) => vec![first, second],
                None => vec![self.rules.canonical_token(fragment)],
            })
            .collect();
        fragments.sort();
        fragments.dedup();
        fragments
    }

    /// Splits a compact fragment into two indexed names, compared under
    /// their canonical spellings
    fn split_compact(&self, fragment: &str) -> Option<(String, String)> {
        if self.index.contains_key(&self.rules.canonical_token(fragment)) {
            return None;
        }

        fragment
            .char_indices()
            .map(|(i, _)| i)
            .filter(|&i| i > 0)
            .map(|i| fragment.split_at(i))
            .filter(|(first, second)| {
                first.chars().count() >= self.min_fragment_len
                    && second.chars().count() >= self.min_fragment_len
            })
            .map(|(first, second)| {
                (
                    self.rules.canonical_token(first),
                    self.rules.canonical_token(second),
                )
            })
            .find(|(first, second)| {
                self.index.contains_key(first) && self.index.contains_key(second)
            })
    }

    fn name_of(&self, idx: usize) -> &str {
        &self.candidates[idx].record.canonical_name
    }
}
