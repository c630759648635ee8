//! Social media profile links

use std::collections::BTreeMap;
use std::fmt;

/// Key used in the sentinel map returned when a site could not be resolved
pub const NO_SOCIAL_LINKS: &str = "No social media links found";

/// Social platforms recognized in anchor hrefs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Facebook,
    Twitter,
    Linkedin,
    Instagram,
}

impl Platform {
    /// All platforms, in the order anchors are searched for them
    pub const ALL: [Platform; 4] = [
        Platform::Facebook,
        Platform::Twitter,
        Platform::Linkedin,
        Platform::Instagram,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Twitter => "twitter",
            Self::Linkedin => "linkedin",
            Self::Instagram => "instagram",
        }
    }

    /// Substring an href must contain to count as a link to this platform
    pub fn domain(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook.com",
            Self::Twitter => "twitter.com",
            Self::Linkedin => "linkedin.com",
            Self::Instagram => "instagram.com",
        }
    }

    /// Returns true if the href points at this platform (case-sensitive substring)
    pub fn matches(&self, href: &str) -> bool {
        href.contains(self.domain())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Platform to profile URL; platforms without a link are absent
pub type SocialMap = BTreeMap<Platform, String>;

/// Social links for one company
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocialLinks {
    /// The site was crawled; holds whatever was found (possibly nothing)
    Found(SocialMap),
    /// The site never resolved, so nothing was looked for
    NotFound,
}

impl SocialLinks {
    pub fn get(&self, platform: Platform) -> Option<&str> {
        match self {
            Self::Found(map) => map.get(&platform).map(String::as_str),
            Self::NotFound => None,
        }
    }

    /// String-keyed view, with the single-entry sentinel map for `NotFound`
    pub fn to_map(&self) -> BTreeMap<String, String> {
        match self {
            Self::Found(map) => map
                .iter()
                .map(|(platform, url)| (platform.to_string(), url.clone()))
                .collect(),
            Self::NotFound => BTreeMap::from([(
                NO_SOCIAL_LINKS.to_string(),
                NO_SOCIAL_LINKS.to_string(),
            )]),
        }
    }
}

impl Default for SocialLinks {
    fn default() -> Self {
        Self::Found(SocialMap::new())
    }
}

/// Merges per-page social maps, keeping the first URL seen for each platform
///
/// A later page that reports a different URL for an already recorded platform is
/// logged and otherwise ignored.
pub fn aggregate_social_links<'a, I>(pages: I) -> SocialMap
where
    I: IntoIterator<Item = &'a SocialMap>,
{
    let mut merged = SocialMap::new();

    for page in pages {
        for (platform, link) in page {
            match merged.get(platform) {
                None => {
                    merged.insert(*platform, link.clone());
                }
                Some(existing) if existing != link => {
                    tracing::debug!(
                        "Multiple links found for {}: keeping {}, ignoring {}",
                        platform,
                        existing,
                        link
                    );
                }
                Some(_) => {}
            }
        }
    }

    merged
}
