use anyhow::Result;
use dialoguer::Input;
use serde_json::Value;
use tutor_agents::{Orchestrator, OrchestratorResponse, ToolKind};
use tutor_common::{ConversationTurn, LearnerProfile, recent_turns};

const RULE: &str = "======================================================================";

pub struct Scenario {
    pub name: &'static str,
    pub profile: LearnerProfile,
    pub message: &'static str,
    pub history: Vec<ConversationTurn>,
    pub expected_tool: ToolKind,
}

fn profile(
    user_id: &str,
    name: &str,
    grade_level: &str,
    learning_style: &str,
    emotional_state: &str,
    mastery: &str,
) -> LearnerProfile {
    LearnerProfile {
        user_id: user_id.to_string(),
        name: name.to_string(),
        grade_level: grade_level.to_string(),
        learning_style_summary: learning_style.to_string(),
        emotional_state_summary: emotional_state.to_string(),
        mastery_level_summary: mastery.to_string(),
    }
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "Student needs practice (flashcards)",
            profile: profile(
                "student001",
                "Alice",
                "10",
                "Kinesthetic learner, learns best through practice",
                "Slightly anxious but motivated",
                "Level 5 - Developing competence",
            ),
            message: "I'm struggling with calculus derivatives and need some practice problems",
            history: vec![
                ConversationTurn::user("Hi, I need help with math"),
                ConversationTurn::assistant("Of course! What topic are you working on?"),
            ],
            expected_tool: ToolKind::FlashcardGenerator,
        },
        Scenario {
            name: "Visual learner requests notes",
            profile: profile(
                "student002",
                "Bob",
                "11",
                "Visual learner, prefers diagrams and structured notes",
                "Focused and ready to learn",
                "Level 7 - Proficient",
            ),
            message: "Can you help me create notes on photosynthesis for biology?",
            history: Vec::new(),
            expected_tool: ToolKind::NoteMaker,
        },
        Scenario {
            name: "Confused student needs an explanation",
            profile: profile(
                "student003",
                "Charlie",
                "9",
                "Auditory learner, prefers simple explanations",
                "Confused and needs clarification",
                "Level 3 - Building foundation",
            ),
            message: "I don't understand what mitosis is, can you explain it?",
            history: vec![
                ConversationTurn::user("We're learning about cell division in class"),
                ConversationTurn::assistant(
                    "That's an important topic! What specifically are you having trouble with?",
                ),
            ],
            expected_tool: ToolKind::ConceptExplainer,
        },
        Scenario {
            name: "High-achieving student",
            profile: profile(
                "student004",
                "Diana",
                "12",
                "Advanced learner, enjoys challenges",
                "Confident and seeking deeper knowledge",
                "Level 9 - Advanced understanding",
            ),
            message: "I want to dive deep into quantum mechanics, specifically wave-particle duality",
            history: Vec::new(),
            expected_tool: ToolKind::ConceptExplainer,
        },
        Scenario {
            name: "General conversation (no tool)",
            profile: profile(
                "student005",
                "Eve",
                "8",
                "Balanced learner",
                "Friendly and curious",
                "Level 5 - Developing competence",
            ),
            message: "Hello! How are you doing today?",
            history: Vec::new(),
            expected_tool: ToolKind::NoTool,
        },
    ]
}

fn print_preview(response: &OrchestratorResponse) {
    let tool = &response.tool_response;
    match response.tool_used.as_str() {
        "flashcard_generator" => {
            let cards = tool.get("flashcards").and_then(Value::as_array);
            println!("  Generated {} flashcards", cards.map_or(0, Vec::len));
            if let Some(question) = cards
                .and_then(|c| c.first())
                .and_then(|c| c.get("question"))
                .and_then(Value::as_str)
            {
                println!("  Sample: {question}");
            }
        }
        "note_maker" => {
            let sections = tool
                .get("note_sections")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            println!("  Generated {sections} note sections");
        }
        "concept_explainer" => {
            let explanation = tool
                .get("explanation")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let preview: String = explanation.chars().take(100).collect();
            println!("  Preview: {preview}");
        }
        _ => {}
    }
}

/// Returns whether the selected tool matched the expectation.
async fn run_scenario(orchestrator: &Orchestrator, index: usize, scenario: &Scenario) -> bool {
    let p = &scenario.profile;
    println!("\n{RULE}\nScenario {index}: {}\n{RULE}", scenario.name);
    println!("Student:         {} (grade {})", p.name, p.grade_level);
    println!("Learning style:  {}", p.learning_style_summary);
    println!("Emotional state: {}", p.emotional_state_summary);
    println!("Mastery:         {}", p.mastery_level_summary);
    println!("\nMessage: \"{}\"\n", scenario.message);

    let response = orchestrator
        .orchestrate(scenario.message, p, &scenario.history)
        .await;

    let expected = scenario.expected_tool.as_str();
    let matched = response.tool_used == expected;
    println!("Success:       {}", response.success);
    println!("Tool used:     {}", response.tool_used);
    println!(
        "Expected tool: {expected} ({})",
        if matched { "match" } else { "different" }
    );
    println!("\nReply: {}", response.message);

    println!("\nExtracted parameters:");
    for (key, value) in &response.extracted_parameters {
        if !value.is_null() && key != "reasoning" && key != "missing_parameters" {
            println!("  {key}: {value}");
        }
    }

    if response.needs_clarification {
        println!("\nClarification needed:");
        for question in &response.clarification_questions {
            println!("  - {question}");
        }
    }

    if response.success && !response.tool_response.is_empty() {
        println!("\nTool response:");
        print_preview(&response);
    }

    matched
}

pub async fn run_all(orchestrator: &Orchestrator) {
    let scenarios = scenarios();
    let mut matched = 0;
    for (i, scenario) in scenarios.iter().enumerate() {
        if run_scenario(orchestrator, i + 1, scenario).await {
            matched += 1;
        }
    }

    println!("\n{RULE}");
    println!(
        "Completed {} scenarios, {matched} selected the expected tool",
        scenarios.len()
    );
    println!("{RULE}");
}

pub async fn run_interactive(orchestrator: &Orchestrator) -> Result<()> {
    println!("Interactive demo. Type your messages as a student, or 'quit' to exit.\n");

    let profile = profile(
        "demo_user",
        "Demo Student",
        "10",
        "Balanced learner",
        "Engaged and ready to learn",
        "Level 5 - Developing competence",
    );
    let mut history: Vec<ConversationTurn> = Vec::new();

    loop {
        let input: String = Input::new()
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()?;
        let message = input.trim();

        if matches!(message.to_lowercase().as_str(), "quit" | "exit" | "q") {
            println!("Thanks for trying the demo!");
            return Ok(());
        }
        if message.is_empty() {
            continue;
        }

        history.push(ConversationTurn::user(message));
        let response = orchestrator
            .orchestrate(message, &profile, recent_turns(&history))
            .await;

        println!("\nTutor: {}", response.message);
        println!("  (tool: {})\n", response.tool_used);
        for question in &response.clarification_questions {
            println!("  - {question}");
        }

        history.push(ConversationTurn::assistant(response.message));
    }
}
