use std::time::Duration;

use async_trait::async_trait;
use tracing::info;
use tutor_common::Result;

use super::schema::{
    ConceptExplainerRequest, ConceptExplainerResponse, Flashcard, FlashcardRequest,
    FlashcardResponse, NoteMakerRequest, NoteMakerResponse, NoteSection,
};
use super::ToolClient;

/// Returns canned, request-shaped responses without any network access.
///
/// Used for local development and the CLI demo.
#[derive(Debug, Clone, Default)]
pub struct MockToolClient {
    delay: Duration,
}

impl MockToolClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate API latency on every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

fn when(flag: bool, item: String) -> Vec<String> {
    if flag { vec![item] } else { Vec::new() }
}

#[async_trait]
impl ToolClient for MockToolClient {
    fn client_id(&self) -> &str {
        "mock"
    }

    async fn create_notes(&self, request: &NoteMakerRequest) -> Result<NoteMakerResponse> {
        info!(topic = %request.topic, "[mock] generating notes");
        self.simulate_latency().await;

        let topic = &request.topic;
        Ok(NoteMakerResponse {
            topic: topic.clone(),
            title: format!("Study Notes: {topic}"),
            summary: format!(
                "Notes on {topic} tailored for {}",
                request.user_info.name
            ),
            note_sections: vec![
                NoteSection {
                    title: "Introduction".to_string(),
                    content: format!("This section covers the basics of {topic}."),
                    key_points: vec![
                        format!("What {topic} is"),
                        format!("Why {topic} matters"),
                    ],
                    examples: when(request.include_examples, format!("A simple example of {topic}")),
                    analogies: when(request.include_analogies, format!("{topic} works a bit like...")),
                },
                NoteSection {
                    title: "Core Concepts".to_string(),
                    content: format!("The fundamentals of {topic} in {}.", request.subject),
                    key_points: vec![format!("Key ideas of {topic}")],
                    examples: when(request.include_examples, format!("{topic} in practice")),
                    analogies: Vec::new(),
                },
            ],
            key_concepts: vec![topic.clone(), format!("{topic} applications")],
            connections_to_prior_learning: vec![format!("Builds on earlier {} lessons", request.subject)],
            practice_suggestions: vec![
                "Try a few practice problems".to_string(),
                "Review the examples".to_string(),
            ],
            source_references: Vec::new(),
            note_taking_style: request.note_taking_style.as_str().to_string(),
        })
    }

    async fn generate_flashcards(&self, request: &FlashcardRequest) -> Result<FlashcardResponse> {
        info!(topic = %request.topic, count = request.count.get(), "[mock] generating flashcards");
        self.simulate_latency().await;

        let topic = &request.topic;
        let flashcards = (1..=request.count.get())
            .map(|i| Flashcard {
                title: format!("{topic} - Card {i}"),
                question: format!("What is an important aspect of {topic}? (Question {i})"),
                answer: format!("An answer about {topic} covering point {i}"),
                example: request
                    .include_examples
                    .then(|| format!("Example: {topic} in practice")),
            })
            .collect();

        Ok(FlashcardResponse {
            flashcards,
            topic: topic.clone(),
            adaptation_details: format!(
                "Adapted for {} at {} difficulty",
                request.user_info.name,
                request.difficulty.as_str()
            ),
            difficulty: request.difficulty.as_str().to_string(),
        })
    }

    async fn explain_concept(
        &self,
        request: &ConceptExplainerRequest,
    ) -> Result<ConceptExplainerResponse> {
        info!(concept = %request.concept_to_explain, "[mock] explaining concept");
        self.simulate_latency().await;

        let concept = &request.concept_to_explain;
        Ok(ConceptExplainerResponse {
            explanation: format!(
                "Here's a {} explanation of {concept}: it is a core idea in {}.",
                request.desired_depth.as_str(),
                request.current_topic
            ),
            examples: vec![
                format!("A first example of {concept}"),
                format!("{concept} in a real-world setting"),
            ],
            related_concepts: vec![request.current_topic.clone()],
            visual_aids: vec![format!("Diagram of {concept}")],
            practice_questions: vec![format!("How would you apply {concept}?")],
            source_references: Vec::new(),
        })
    }
}
