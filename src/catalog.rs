//! Help article catalog
//!
//! An immutable, ordered collection of help articles with the derived
//! views the help panel needs: category listing, per-category counts and
//! case-insensitive search.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// A single help article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpArticle {
    pub id: String,
    pub title: String,
    pub category: String,
    pub body: String,
}

impl HelpArticle {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            body: body.into(),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.category.to_lowercase().contains(needle)
    }
}

/// Category name with the number of articles filed under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub article_count: usize,
}

/// Errors raised while building a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Duplicate article id: {0}")]
    DuplicateId(String),
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fixed set of help articles, in insertion order
#[derive(Debug, Clone, Default)]
pub struct ArticleCatalog {
    articles: Vec<HelpArticle>,
}

impl ArticleCatalog {
    /// Build a catalog, rejecting duplicate ids
    pub fn new(articles: Vec<HelpArticle>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(articles.len());
        for article in &articles {
            if !seen.insert(article.id.as_str()) {
                return Err(CatalogError::DuplicateId(article.id.clone()));
            }
        }
        Ok(Self { articles })
    }

    /// Parse a JSON array of articles
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let articles: Vec<HelpArticle> = serde_json::from_str(json)?;
        Self::new(articles)
    }

    /// Load a JSON array of articles from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn articles(&self) -> &[HelpArticle] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HelpArticle> {
        self.articles.iter().find(|a| a.id == id)
    }

    /// Distinct categories in first-seen order
    pub fn list_categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.articles
            .iter()
            .filter(|a| seen.insert(a.category.as_str()))
            .map(|a| a.category.clone())
            .collect()
    }

    /// Number of articles whose category equals `category` exactly
    pub fn count_by_category(&self, category: &str) -> usize {
        self.articles
            .iter()
            .filter(|a| a.category == category)
            .count()
    }

    pub fn category_summaries(&self) -> Vec<CategorySummary> {
        self.list_categories()
            .into_iter()
            .map(|name| {
                let article_count = self.count_by_category(&name);
                CategorySummary {
                    name,
                    article_count,
                }
            })
            .collect()
    }

    /// Articles whose title or category contains `query`, ignoring case.
    ///
    /// An empty query matches everything. Results keep catalog order.
    pub fn search(&self, query: &str) -> Vec<HelpArticle> {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return self.articles.clone();
        }
        self.articles
            .iter()
            .filter(|a| a.matches(&needle))
            .cloned()
            .collect()
    }
}
