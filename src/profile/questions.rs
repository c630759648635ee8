//! Profile questions and answer clean-up

use crate::profile::DocumentSummarizer;
use std::collections::HashSet;

/// A profile field filled in by the summarizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileQuestion {
    Products,
    Customers,
    Pricing,
    Founders,
}

impl ProfileQuestion {
    /// All questions, in the order they are asked
    pub const ALL: [ProfileQuestion; 4] = [
        ProfileQuestion::Products,
        ProfileQuestion::Customers,
        ProfileQuestion::Pricing,
        ProfileQuestion::Founders,
    ];

    /// Output column the answer is written to
    pub fn column(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Customers => "customer_partners",
            Self::Pricing => "pricings",
            Self::Founders => "founders",
        }
    }

    /// The question itself
    pub fn question(&self, company: &str, website: &str) -> String {
        match self {
            Self::Products => format!(
                "What are the main products or services offered by the company {} with website {}?",
                company, website
            ),
            Self::Customers => format!(
                "Who are the key customers or clients currently engaged with products from the company {} with website {}?",
                company, website
            ),
            Self::Pricing => format!(
                "What is the pricing structure for products and services from the company {} with website {}?",
                company, website
            ),
            Self::Founders => format!(
                "Who are the founders of the company {} with website {}?",
                company, website
            ),
        }
    }

    /// Instructions that steer the summarizer towards a useful answer
    pub fn prompt(&self, company: &str) -> String {
        match self {
            Self::Products => format!(
                "Please provide a detailed overview of the main products and services offered by {}, \
                 as found on their website. Avoid repeating information and answer in full sentences \
                 and paragraphs. Focus on highlighting the unique aspects and benefits of these offerings.",
                company
            ),
            Self::Customers => format!(
                "List the main customer segments or industries that {0} serves. Provide specific \
                 examples of key clients, if available, and describe how {0} meets their needs. \
                 Offer a concise summary, avoiding repetition, for clarity and brevity.",
                company
            ),
            Self::Pricing => format!(
                "Explain the pricing structure for the products and services provided by {}. \
                 Avoid repeating information and answer in full sentences and paragraphs. \
                 Include any tiers, discounts, or subscription models that apply.",
                company
            ),
            Self::Founders => format!(
                "Who are the founders of {}, as stated on their website? Avoid repeating \
                 information and answer in full sentences and paragraphs. Provide brief \
                 biographies and describe their vision for founding the company.",
                company
            ),
        }
    }

    /// Full request text: tailored instructions followed by the question
    pub fn request(&self, company: &str, website: &str) -> String {
        format!(
            "{}\n\nQuestion: {}",
            self.prompt(company),
            self.question(company, website)
        )
    }
}

/// Summarizer answers for one company; empty when unanswered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileAnswers {
    pub products: String,
    pub customer_partners: String,
    pub pricings: String,
    pub founders: String,
}

impl ProfileAnswers {
    pub fn get(&self, question: ProfileQuestion) -> &str {
        match question {
            ProfileQuestion::Products => &self.products,
            ProfileQuestion::Customers => &self.customer_partners,
            ProfileQuestion::Pricing => &self.pricings,
            ProfileQuestion::Founders => &self.founders,
        }
    }

    fn set(&mut self, question: ProfileQuestion, answer: String) {
        let slot = match question {
            ProfileQuestion::Products => &mut self.products,
            ProfileQuestion::Customers => &mut self.customer_partners,
            ProfileQuestion::Pricing => &mut self.pricings,
            ProfileQuestion::Founders => &mut self.founders,
        };
        *slot = answer;
    }
}

/// Asks every profile question over the crawled documents
///
/// A failed question is logged and left empty; the remaining questions are still
/// asked. With no documents nothing is asked.
pub async fn answer_profile_questions(
    summarizer: &dyn DocumentSummarizer,
    company: &str,
    website: &str,
    documents: &[String],
) -> ProfileAnswers {
    let mut answers = ProfileAnswers::default();
    if documents.is_empty() {
        tracing::debug!("No page text for {}, skipping profile questions", company);
        return answers;
    }

    for question in ProfileQuestion::ALL {
        let request = question.request(company, website);
        match summarizer.answer(documents, &request).await {
            Ok(answer) => answers.set(question, dedupe_sentences(&answer)),
            Err(e) => tracing::warn!(
                "Summarizer failed on {} for {}: {}",
                question.column(),
                company,
                e
            ),
        }
    }

    answers
}

/// Drops repeated sentences, keeping the first occurrence of each
///
/// Sentences are split on `.` and compared after trimming; empty fragments are
/// dropped. The result is re-joined with `". "` and ends with a period.
///
/// # Example
///
/// ```
/// use portfolio_crawler::profile::dedupe_sentences;
///
/// assert_eq!(
///     dedupe_sentences("Acme builds rockets. It is fast. Acme builds rockets."),
///     "Acme builds rockets. It is fast."
/// );
/// ```
pub fn dedupe_sentences(text: &str) -> String {
    let mut seen = HashSet::new();
    let unique: Vec<&str> = text
        .split('.')
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .filter(|sentence| seen.insert(*sentence))
        .collect();

    if unique.is_empty() {
        return String::new();
    }
    format!("{}.", unique.join(". "))
}
