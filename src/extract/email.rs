//! Contact email discovery
//!
//! Picks one "best" contact address out of the text of every crawled page. The
//! policy is heuristic; see [`extract_emails`] for the exact order of rules.

use crate::url::email_matches_domain;
use lazy_static::lazy_static;
use regex::Regex;

/// Value recorded when a site could not be resolved at all
pub const EMAIL_NOT_FOUND: &str = "Email not found";

/// Phrases that usually sit next to a contact address
pub const CONTACT_KEYWORDS: [&str; 4] = ["contact us", "email us", "reach out", "get in touch"];

/// Local-part fragments that mark an address as the preferred contact
pub const PRIORITY_LOCAL_PARTS: [&str; 2] = ["contact", "partner"];

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    static ref KEYWORD_RES: Vec<Regex> = CONTACT_KEYWORDS
        .iter()
        .map(|k| Regex::new(&format!("(?i){}", regex::escape(k))).unwrap())
        .collect();
}

/// Finds every email-like substring, in order of appearance, duplicates included
pub fn find_emails(text: &str) -> Vec<String> {
    EMAIL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Proximity pass over the contact keywords
///
/// For every occurrence of every keyword, the email whose first occurrence is nearest
/// to the keyword's start is selected, and each selection replaces the previous one.
/// The result is the pick for the last keyword occurrence processed, which is not
/// necessarily the nearest pair overall. Distances are counted in characters.
pub fn keyword_proximity_email(text: &str, emails: &[String]) -> Option<String> {
    let positions: Vec<(usize, &String)> = emails
        .iter()
        .filter_map(|email| {
            text.find(email.as_str())
                .map(|pos| (char_offset(text, pos), email))
        })
        .collect();

    let mut best = None;
    for keyword in KEYWORD_RES.iter() {
        for occurrence in keyword.find_iter(text) {
            let start = char_offset(text, occurrence.start());
            // Strict comparison keeps the earliest email on ties
            let mut closest: Option<(usize, &String)> = None;
            for (pos, email) in &positions {
                let distance = pos.abs_diff(start);
                if closest.map_or(true, |(d, _)| distance < d) {
                    closest = Some((distance, *email));
                }
            }
            if let Some((_, email)) = closest {
                best = Some(email.clone());
            }
        }
    }

    best
}

fn char_offset(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}

/// First email whose local part contains a priority fragment
pub fn prioritized_email(emails: &[String]) -> Option<&String> {
    emails.iter().find(|email| {
        let local = email.split('@').next().unwrap_or_default();
        PRIORITY_LOCAL_PARTS
            .iter()
            .any(|fragment| local.contains(fragment))
    })
}

/// Chooses the best contact email from aggregated page text
///
/// # Selection Order
///
/// 1. No email-like substrings: empty string
/// 2. An email whose local part contains `contact` or `partner` (first in text order)
/// 3. The keyword-proximity pick, see [`keyword_proximity_email`]
/// 4. The first email on the company's own domain
/// 5. The first email found
///
/// # Arguments
///
/// * `text` - Concatenated text of every crawled page
/// * `company_domain` - The company's known domain (e.g. `acme.com`), may be empty
///
/// # Example
///
/// ```
/// use portfolio_crawler::extract_emails;
///
/// let text = "Contact us at contact@example.com or info@example.com";
/// assert_eq!(extract_emails(text, "example.com"), "contact@example.com");
/// assert_eq!(extract_emails("no addresses here", "example.com"), "");
/// ```
pub fn extract_emails(text: &str, company_domain: &str) -> String {
    let emails = find_emails(text);
    if emails.is_empty() {
        return String::new();
    }
    tracing::debug!("Found {} email candidates", emails.len());

    let proximity = keyword_proximity_email(text, &emails);

    if let Some(email) = prioritized_email(&emails) {
        return email.clone();
    }

    if let Some(email) = proximity.filter(|e| !e.is_empty()) {
        return email;
    }

    emails
        .iter()
        .find(|email| email_matches_domain(email, company_domain))
        .unwrap_or(&emails[0])
        .clone()
}
