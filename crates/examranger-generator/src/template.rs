//! Template question generator.
//!
//! Each question is built from one of five fixed templates filled in with a
//! syllabus topic and the subject name. Topics and templates both cycle by
//! question index, so question `i` always uses topic `i % topics` and
//! template `i % 5`. Only the answer key is random, drawn from a seeded RNG.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use examranger_core::model::{split_topics, Question};
use examranger_core::traits::{
    Availability, GenerateRequest, QuestionGenerator, ServiceStatus,
};

const OPTIONS_PER_QUESTION: usize = 4;
const TEMPLATE_COUNT: usize = 5;

struct Rendered {
    text: String,
    options: [String; OPTIONS_PER_QUESTION],
    explanation: String,
}

fn render(template: usize, topic: &str, subject: &str) -> Rendered {
    match template % TEMPLATE_COUNT {
        0 => Rendered {
            text: format!("What is the primary purpose of {topic}?"),
            options: [
                format!("To enhance {topic} functionality"),
                format!("To improve {topic} performance"),
                format!("To provide {topic} solutions"),
                format!("To optimize {topic} processes"),
            ],
            explanation: format!(
                "{topic} serves multiple purposes including functionality enhancement, \
                 performance improvement, and process optimization."
            ),
        },
        1 => Rendered {
            text: format!("Which of the following best describes {topic}?"),
            options: [
                format!("A fundamental concept in {subject}"),
                format!("An advanced technique in {subject}"),
                format!("A basic principle of {subject}"),
                format!("A complex methodology in {subject}"),
            ],
            explanation: format!(
                "{topic} represents a fundamental concept that forms the basis \
                 for understanding {subject}."
            ),
        },
        2 => Rendered {
            text: format!("How does {topic} contribute to {subject}?"),
            options: fixed([
                "By providing essential knowledge",
                "Through practical applications",
                "Via theoretical frameworks",
                "All of the above",
            ]),
            explanation: format!(
                "{topic} contributes to {subject} through multiple avenues including \
                 theoretical understanding and practical applications."
            ),
        },
        3 => Rendered {
            text: format!("What are the key components of {topic}?"),
            options: fixed([
                "Core elements and principles",
                "Basic structures and functions",
                "Fundamental concepts and methods",
                "Essential features and characteristics",
            ]),
            explanation: format!(
                "{topic} consists of various key components that work together \
                 to form a comprehensive understanding."
            ),
        },
        _ => Rendered {
            text: format!("When would you typically use {topic}?"),
            options: fixed([
                "In basic applications",
                "For advanced scenarios",
                "During problem-solving",
                "Throughout the learning process",
            ]),
            explanation: format!(
                "{topic} is used in various contexts depending on the specific \
                 requirements and complexity of the situation."
            ),
        },
    }
}

fn fixed(options: [&str; OPTIONS_PER_QUESTION]) -> [String; OPTIONS_PER_QUESTION] {
    options.map(str::to_string)
}

/// Build `count` questions from a syllabus.
///
/// Returns an empty list when the syllabus has no topics. Question ids are
/// `"1"` through `count`. The same inputs always give the same questions.
pub fn generate_questions(subject_name: &str, syllabus: &str, count: usize, seed: u64) -> Vec<Question> {
    let topics = split_topics(syllabus);
    if topics.is_empty() {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let topic = topics[i % topics.len()];
            let rendered = render(i, topic, subject_name);
            Question {
                id: (i + 1).to_string(),
                text: rendered.text,
                options: rendered.options.into(),
                correct_answer: rng.gen_range(0..OPTIONS_PER_QUESTION),
                explanation: Some(rendered.explanation),
            }
        })
        .collect()
}

/// [`QuestionGenerator`] backed by [`generate_questions`].
///
/// Waits `delay` plus a random share of `jitter` before answering, standing in
/// for the latency of a remote generation service.
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    delay: Duration,
    jitter: Duration,
    seed: Option<u64>,
    available: bool,
}

impl TemplateGenerator {
    pub fn new(delay: Duration, jitter: Duration) -> Self {
        Self {
            delay,
            jitter,
            seed: None,
            available: true,
        }
    }

    /// A generator with no artificial delay.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Seed used when a request does not carry its own.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    fn latency(&self, rng: &mut StdRng) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.delay;
        }
        self.delay + Duration::from_millis(rng.gen_range(0..=jitter_ms))
    }
}

#[async_trait]
impl QuestionGenerator for TemplateGenerator {
    fn name(&self) -> &str {
        "template"
    }

    async fn status(&self) -> ServiceStatus {
        if self.available {
            ServiceStatus {
                status: Availability::Online,
                message: "question generator is available".into(),
            }
        } else {
            ServiceStatus {
                status: Availability::Offline,
                message: "question generator is disabled".into(),
            }
        }
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<Question>> {
        let seed = request
            .seed
            .or(self.seed)
            .unwrap_or_else(rand::random::<u64>);

        let latency = self.latency(&mut StdRng::seed_from_u64(seed));
        if !latency.is_zero() {
            tracing::debug!(latency_ms = latency.as_millis() as u64, "simulating generation latency");
            tokio::time::sleep(latency).await;
        }

        let questions = generate_questions(&request.subject_name, &request.syllabus, request.count, seed);
        if questions.is_empty() && request.count > 0 {
            anyhow::bail!("syllabus for {} has no topics", request.subject_name);
        }
        Ok(questions)
    }
}
