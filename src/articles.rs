//! Article list filtering and fetch-source selection.

use crate::api::types::Article;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Topic {
    #[default]
    All,
    Ai,
    Ml,
    Blockchain,
    Hardware,
    Software,
    Security,
    Startups,
    Research,
}

impl Topic {
    pub const ALL: [Topic; 9] = [
        Topic::All,
        Topic::Ai,
        Topic::Ml,
        Topic::Blockchain,
        Topic::Hardware,
        Topic::Software,
        Topic::Security,
        Topic::Startups,
        Topic::Research,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Topic::All => "All",
            Topic::Ai => "AI",
            Topic::Ml => "ML",
            Topic::Blockchain => "Blockchain",
            Topic::Hardware => "Hardware",
            Topic::Software => "Software",
            Topic::Security => "Security",
            Topic::Startups => "Startups",
            Topic::Research => "Research",
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Topic::All => &[],
            Topic::Ai => &["artificial intelligence", "ai ", "machine learning", "neural", "deep learning"],
            Topic::Ml => &["machine learning", "ml ", "algorithm", "model", "training"],
            Topic::Blockchain => &["blockchain", "crypto", "bitcoin", "ethereum", "web3"],
            Topic::Hardware => &["chip", "processor", "gpu", "hardware", "semiconductor"],
            Topic::Software => &["software", "app", "development", "code", "programming"],
            Topic::Security => &["security", "hack", "breach", "vulnerability", "cyber"],
            Topic::Startups => &["startup", "founder", "funding", "venture", "investment"],
            Topic::Research => &["research", "study", "paper", "discovery", "breakthrough"],
        }
    }

    /// Keyword match against title and summary, case-insensitive.
    pub fn matches(self, article: &Article) -> bool {
        if self == Topic::All {
            return true;
        }
        let content = format!("{} {}", article.title, article.summary).to_lowercase();
        self.keywords().iter().any(|k| content.contains(k))
    }
}

/// Indices of the articles shown under `topic`, in list order.
pub fn visible_indices(articles: &[Article], topic: Topic) -> Vec<usize> {
    articles
        .iter()
        .enumerate()
        .filter(|(_, a)| topic.matches(a))
        .map(|(i, _)| i)
        .collect()
}

pub fn showing_label(count: usize) -> String {
    format!("Showing {} articles", count)
}

/// Checkbox chips for the sources a fetch should cover.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSelection {
    sources: Vec<(String, bool)>,
}

impl SourceSelection {
    /// Every source starts checked.
    pub fn new(sources: &[String]) -> Self {
        Self { sources: sources.iter().map(|s| (s.clone(), true)).collect() }
    }

    pub fn toggle(&mut self, index: usize) {
        if let Some((_, checked)) = self.sources.get_mut(index) {
            *checked = !*checked;
        }
    }

    pub fn selected(&self) -> Vec<String> {
        self.sources.iter().filter(|(_, c)| *c).map(|(s, _)| s.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.sources.iter().map(|(s, c)| (s.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn add(&mut self, url: &str) {
        if !self.sources.iter().any(|(s, _)| s == url) {
            self.sources.push((url.to_string(), true));
        }
    }

    pub fn remove(&mut self, url: &str) {
        self.sources.retain(|(s, _)| s != url);
    }
}
