//! Keyword table and substring scorer.

use std::collections::BTreeMap;

use atelier_core::{AgentId, ScoreMap};

/// Static keyword→weight table per persona.
///
/// Matching is literal substring containment over the lowercased input:
/// no tokenization, no stemming. Every phrase that occurs in the text
/// adds its weight; a phrase listed under several personas contributes
/// to each of them.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    entries: BTreeMap<AgentId, Vec<(String, f64)>>,
}

impl KeywordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a weighted phrase for a persona. Phrases are stored lowercased.
    pub fn add(&mut self, agent: impl Into<AgentId>, phrase: &str, weight: f64) {
        self.entries
            .entry(agent.into())
            .or_default()
            .push((phrase.to_lowercase(), weight));
    }

    pub fn agents(&self) -> impl Iterator<Item = &AgentId> {
        self.entries.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Score lowercased text against the table.
    ///
    /// The caller lowercases once; this method does plain `contains`
    /// checks so overlapping phrases each contribute independently.
    pub fn score(&self, text_lower: &str) -> ScoreMap {
        let mut scores = ScoreMap::new();
        for (agent, phrases) in &self.entries {
            for (phrase, weight) in phrases {
                if text_lower.contains(phrase.as_str()) {
                    *scores.entry(agent.clone()).or_insert(0.0) += weight;
                }
            }
        }
        scores
    }

    /// The built-in table for the five shipped personas.
    pub fn builtin() -> Self {
        let mut t = Self::new();

        t.add("tta", "trend", 1.0);
        t.add("tta", "future", 1.0);
        t.add("tta", "absurd", 1.5);
        t.add("tta", "presentism", 1.0);
        t.add("tta", "disruption", 0.8);

        t.add("jtbd", "customer", 1.0);
        t.add("jtbd", "job", 1.0);
        t.add("jtbd", "hire", 1.2);
        t.add("jtbd", "progress", 0.8);
        t.add("jtbd", "interview", 0.6);
        t.add("jtbd", "validation", 0.8);

        t.add("scurve", "s-curve", 1.5);
        t.add("scurve", "technology", 0.8);
        t.add("scurve", "adoption", 1.0);
        t.add("scurve", "dominant design", 1.2);
        t.add("scurve", "lifecycle", 0.8);

        t.add("redteam", "challenge", 1.0);
        t.add("redteam", "assumption", 1.2);
        t.add("redteam", "stress test", 1.2);
        t.add("redteam", "weakness", 0.8);
        t.add("redteam", "devil", 1.0);
        t.add("redteam", "debate", 0.8);
        t.add("redteam", "pivot", 0.6);

        t.add("larry", "think", 0.5);
        t.add("larry", "problem", 0.5);
        t.add("larry", "framework", 0.5);

        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_phrases_sum_per_agent() {
        let table = KeywordTable::builtin();
        let scores = table.score("i'm worried about future trends and disruption");
        assert_eq!(scores.get(&AgentId::from("tta")), Some(&2.8));
    }

    #[test]
    fn no_match_means_no_entry() {
        let table = KeywordTable::builtin();
        let scores = table.score("hello there");
        assert!(scores.is_empty());
    }

    #[test]
    fn substring_containment_not_word_boundary() {
        let table = KeywordTable::builtin();
        // "jobs" contains "job"
        let scores = table.score("jobs report");
        assert_eq!(scores.get(&AgentId::from("jtbd")), Some(&1.0));
    }

    #[test]
    fn shared_phrase_contributes_to_every_agent() {
        let mut table = KeywordTable::new();
        table.add("a", "shared", 1.0);
        table.add("b", "shared", 0.5);
        let scores = table.score("the shared word");
        assert_eq!(scores.get(&AgentId::from("a")), Some(&1.0));
        assert_eq!(scores.get(&AgentId::from("b")), Some(&0.5));
    }

    #[test]
    fn multi_word_phrases_match() {
        let table = KeywordTable::builtin();
        let scores = table.score("a stress test of the dominant design");
        assert_eq!(scores.get(&AgentId::from("redteam")), Some(&1.2));
        assert_eq!(scores.get(&AgentId::from("scurve")), Some(&1.2));
    }

    #[test]
    fn builtin_covers_all_five_personas() {
        let table = KeywordTable::builtin();
        let agents: Vec<&str> = table.agents().map(|a| a.as_str()).collect();
        assert_eq!(agents, vec!["jtbd", "larry", "redteam", "scurve", "tta"]);
    }
}
