//! Contact and social link extraction
//!
//! This module turns crawled page data into the two fields a crawl reports:
//! - The best contact email, chosen from aggregated page text
//! - One social profile link per platform, merged across pages

mod email;
mod social;

pub use email::{
    extract_emails, find_emails, keyword_proximity_email, prioritized_email, CONTACT_KEYWORDS,
    EMAIL_NOT_FOUND, PRIORITY_LOCAL_PARTS,
};
pub use social::{aggregate_social_links, Platform, SocialLinks, SocialMap, NO_SOCIAL_LINKS};
