//! Relevance-ranked exercise search
//!
//! Scores are TF-IDF weights computed over the passed-in candidates on every call. Narrow the
//! candidates with an [`ExerciseFilter`](crate::ExerciseFilter) first when a structural filter
//! is active.

use std::collections::HashMap;

use crate::{Exercise, Property};

const NAME_BOOST: usize = 3;
const INSTRUCTION_LIMIT: usize = 3;
const MIN_TOKEN_LEN: usize = 3;
const PHRASE_MULTIPLIER: f64 = 1.5;
const NAME_TOKEN_BONUS: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a> {
    pub exercise: &'a Exercise,
    pub score: f64,
}

/// Returns at most `limit` exercises, most relevant first.
///
/// A blank query returns the first `limit` candidates in input order.
#[must_use]
pub fn search<'a>(
    exercises: impl IntoIterator<Item = &'a Exercise>,
    query: &str,
    limit: usize,
) -> Vec<&'a Exercise> {
    if query.trim().is_empty() {
        return exercises.into_iter().take(limit).collect();
    }

    rank(exercises, query)
        .into_iter()
        .take(limit)
        .map(|hit| hit.exercise)
        .collect()
}

/// Scores all candidates against `query` and returns those with a positive score.
///
/// Equal scores keep the input order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rank<'a>(
    exercises: impl IntoIterator<Item = &'a Exercise>,
    query: &str,
) -> Vec<SearchHit<'a>> {
    let phrase = query.to_lowercase();
    let query_tokens = tokenize(&phrase);

    let documents = exercises
        .into_iter()
        .map(Document::new)
        .collect::<Vec<_>>();

    let mut document_frequency: HashMap<&str, usize> = HashMap::new();
    for token in &query_tokens {
        document_frequency.entry(token.as_str()).or_insert_with(|| {
            documents
                .iter()
                .filter(|d| d.tokens.iter().any(|t| t == token))
                .count()
        });
    }

    let total_documents = documents.len() as f64;

    let mut hits = documents
        .iter()
        .filter_map(|document| {
            let mut score = 0.0;

            if !document.tokens.is_empty() {
                let token_count = document.tokens.len() as f64;

                for token in &query_tokens {
                    let occurrences = document.tokens.iter().filter(|t| *t == token).count();
                    if occurrences == 0 {
                        continue;
                    }
                    let tf = occurrences as f64 / token_count;
                    let idf = (total_documents / document_frequency[token.as_str()] as f64).ln();
                    score += tf * idf;
                }
            }

            if document.text.contains(&phrase) {
                score *= PHRASE_MULTIPLIER;
            }

            let name_matches = query_tokens
                .iter()
                .filter(|t| document.name.contains(t.as_str()))
                .count();
            score += NAME_TOKEN_BONUS * name_matches as f64;

            (score > 0.0).then_some(SearchHit {
                exercise: document.exercise,
                score,
            })
        })
        .collect::<Vec<_>>();

    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits
}

/// Lower-cases `text`, drops everything except ASCII word characters and whitespace, and keeps
/// the whitespace-separated tokens longer than two characters.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .filter(|t| t.len() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

struct Document<'a> {
    exercise: &'a Exercise,
    name: String,
    text: String,
    tokens: Vec<String>,
}

impl<'a> Document<'a> {
    fn new(exercise: &'a Exercise) -> Self {
        let name = exercise.name.as_ref().to_lowercase();
        let text = searchable_text(exercise);
        let tokens = tokenize(&text);
        Self {
            exercise,
            name,
            text,
            tokens,
        }
    }
}

fn searchable_text(exercise: &Exercise) -> String {
    let name = exercise.name.as_ref().as_str();
    let mut parts = vec![name; NAME_BOOST];

    let category = exercise.category.name();
    let level = exercise.level.name();
    let primary_muscles = join_names(exercise.primary_muscles.iter());
    let secondary_muscles = exercise
        .secondary_muscles
        .as_ref()
        .map(|muscles| join_names(muscles.iter()))
        .unwrap_or_default();
    let equipment = exercise.equipment.map(Property::name).unwrap_or_default();
    let mechanic = exercise.mechanic.map(Property::name).unwrap_or_default();
    let instructions = exercise
        .instructions
        .iter()
        .take(INSTRUCTION_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    parts.extend([
        category,
        level,
        primary_muscles.as_str(),
        secondary_muscles.as_str(),
        equipment,
        mechanic,
        instructions.as_str(),
    ]);

    parts.join(" ").to_lowercase()
}

fn join_names<'a, P: Property>(properties: impl Iterator<Item = &'a P>) -> String {
    properties
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(" ")
}
