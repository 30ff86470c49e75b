//! Question assembler.
//!
//! Builds one playable [`Question`]: a random correct species, a set of
//! plausible wrong choices (similar species first, random species of the same
//! iconic taxon as fallback), a uniform shuffle, and the media URL for the
//! requested quiz type.

use std::collections::HashSet;
use std::sync::Arc;

use naturieux_domain::{
    Choice, Difficulty, IconicTaxon, Question, QuestionId, QuizType, Species, SpeciesId,
    MIN_CHOICES,
};

use crate::infrastructure::ports::{RandomPort, SpeciesCatalog, SpeciesFilter};

use super::error::QuizError;

/// Extra random candidates requested on top of the needed count, to absorb
/// duplicates with the similarity results.
const RANDOM_CANDIDATE_BUFFER: usize = 5;

pub struct QuestionAssembler {
    catalog: Arc<dyn SpeciesCatalog>,
    random: Arc<dyn RandomPort>,
    taxon_filter: Option<IconicTaxon>,
    place_id: Option<u32>,
}

impl QuestionAssembler {
    pub fn new(catalog: Arc<dyn SpeciesCatalog>, random: Arc<dyn RandomPort>) -> Self {
        Self {
            catalog,
            random,
            taxon_filter: None,
            place_id: None,
        }
    }

    pub fn with_taxon_filter(mut self, taxon: Option<IconicTaxon>) -> Self {
        self.taxon_filter = taxon;
        self
    }

    pub fn with_place_filter(mut self, place_id: Option<u32>) -> Self {
        self.place_id = place_id;
        self
    }

    pub fn taxon_filter(&self) -> Option<IconicTaxon> {
        self.taxon_filter
    }

    pub fn place_id(&self) -> Option<u32> {
        self.place_id
    }

    /// Build a question using the configured taxon and place filters.
    pub async fn create_question(
        &self,
        quiz_type: QuizType,
        difficulty: Difficulty,
    ) -> Result<Question, QuizError> {
        self.create_question_for_taxon(quiz_type, difficulty, self.taxon_filter)
            .await
    }

    /// Build a question with `taxon` in place of the configured taxon filter.
    pub async fn create_question_for_taxon(
        &self,
        quiz_type: QuizType,
        difficulty: Difficulty,
        taxon: Option<IconicTaxon>,
    ) -> Result<Question, QuizError> {
        let correct = self.pick_correct_species(taxon).await?;

        let needed = difficulty.config().choices_count.saturating_sub(1);
        let wrong = self.wrong_choices(&correct, needed).await?;

        let mut choices = Vec::with_capacity(wrong.len() + 1);
        choices.push(Choice::correct(correct.clone()));
        choices.extend(wrong.into_iter().map(Choice::wrong));
        self.shuffle(&mut choices);

        let media_url = select_media_url(&correct, quiz_type);

        tracing::debug!(
            quiz_type = %quiz_type,
            difficulty = %difficulty,
            species_id = %correct.id(),
            choices = choices.len(),
            "Assembled question"
        );

        let question = Question::new(
            QuestionId::new(),
            quiz_type,
            difficulty,
            correct,
            choices,
            media_url,
        )?;
        Ok(question)
    }

    async fn pick_correct_species(&self, taxon: Option<IconicTaxon>) -> Result<Species, QuizError> {
        let filter = SpeciesFilter::new(1)
            .with_iconic_taxon(taxon)
            .with_place_id(self.place_id)
            .with_photos();

        let candidates = self
            .catalog
            .random(&filter)
            .await
            .map_err(|e| QuizError::upstream("fetching correct species", e))?;

        let correct = candidates
            .into_iter()
            .next()
            .ok_or_else(|| QuizError::InsufficientData("No species found matching criteria".into()))?;

        if !correct.has_photos() {
            return Err(QuizError::InsufficientData(format!(
                "Species {} has no photos",
                correct.id()
            )));
        }
        Ok(correct)
    }

    /// Up to `needed` distinct species other than `correct`.
    async fn wrong_choices(&self, correct: &Species, needed: usize) -> Result<Vec<Species>, QuizError> {
        let similar = self.similar_species(correct, needed).await;

        // Similar results that repeat or include the correct species never count.
        let mut seen: HashSet<SpeciesId> = HashSet::from([correct.id()]);
        let mut result = Vec::with_capacity(needed);
        collect_unique(&mut result, similar, &mut seen, needed);

        if result.len() < needed {
            let filter = SpeciesFilter::new(needed + RANDOM_CANDIDATE_BUFFER)
                .with_iconic_taxon(correct.iconic_taxon())
                .with_photos()
                .excluding(correct.id());

            let random = self
                .catalog
                .random(&filter)
                .await
                .map_err(|e| QuizError::upstream("fetching random species", e))?;

            collect_unique(&mut result, random, &mut seen, needed);
        }

        if result.len() + 1 < MIN_CHOICES {
            return Err(QuizError::InsufficientData(format!(
                "Not enough species for choices: needed {}, found {}",
                needed,
                result.len()
            )));
        }
        Ok(result)
    }

    /// Similarity lookup. A failed lookup counts as zero similar species.
    async fn similar_species(&self, correct: &Species, limit: usize) -> Vec<Species> {
        match self.catalog.similar(correct.id(), limit).await {
            Ok(similar) => similar,
            Err(e) => {
                tracing::warn!(
                    species_id = %correct.id(),
                    error = %e,
                    "Similar species lookup failed, falling back to random species"
                );
                Vec::new()
            }
        }
    }

    /// Fisher-Yates shuffle driven by the random port.
    fn shuffle<T>(&self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let upper = i32::try_from(i).unwrap_or(i32::MAX);
            let j = usize::try_from(self.random.gen_range(0, upper))
                .unwrap_or(0)
                .min(i);
            items.swap(i, j);
        }
    }
}

fn collect_unique(
    result: &mut Vec<Species>,
    candidates: Vec<Species>,
    seen: &mut HashSet<SpeciesId>,
    max: usize,
) {
    for species in candidates {
        if result.len() >= max {
            break;
        }
        if seen.insert(species.id()) {
            result.push(species);
        }
    }
}

/// Media URL for `quiz_type`, taken from the species' first photo.
fn select_media_url(species: &Species, quiz_type: QuizType) -> String {
    let Some(photo) = species.primary_photo() else {
        return String::new();
    };

    let url = match quiz_type {
        QuizType::Image => pick(&photo.large_url).or_else(|| pick(&photo.medium_url)),
        QuizType::Flash => pick(&photo.medium_url),
        QuizType::Partial | QuizType::Silhouette => {
            pick(&photo.original_url).or_else(|| pick(&photo.large_url))
        }
        // Audio is not served from the photo pipeline
        QuizType::Sound => None,
    };
    url.unwrap_or_default().to_string()
}

fn pick(url: &Option<String>) -> Option<&str> {
    url.as_deref().filter(|u| !u.is_empty())
}
