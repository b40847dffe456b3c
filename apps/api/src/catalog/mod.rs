//! Catalog: the corpus of job postings and skill definitions the ranker scores.
//!
//! Ranking never mutates a catalog. Handlers take a snapshot via `Catalog::query`
//! and hand the slice to the ranker, so concurrent requests share nothing mutable.
//! Entries are added through the `/jobs` and `/skills` endpoints in `handlers`,
//! which embed them with the same provider the ranker queries with.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::embedding::SkillVector;
use crate::models::job::JobPosting;
use crate::models::skill::SkillDefinition;

pub mod handlers;
pub mod postgres;
pub mod store;

pub use postgres::{PgJobCatalog, PgSkillCatalog};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Entries
// ────────────────────────────────────────────────────────────────────────────

/// An entity paired with the one vector it is ranked by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry<T> {
    pub entity: T,
    pub vector: SkillVector,
}

impl<T> CatalogEntry<T> {
    pub fn new(entity: T, vector: SkillVector) -> Self {
        Self { entity, vector }
    }
}

/// Structured attributes the ranker filters on. Attributes an entity does not
/// carry default to "absent", which fails any filter set on them.
pub trait Listing {
    fn id(&self) -> i64;
    fn title(&self) -> &str;

    fn salary_min(&self) -> Option<f64> {
        None
    }
    fn experience_level(&self) -> Option<&str> {
        None
    }
    fn remote_type(&self) -> Option<&str> {
        None
    }
    fn category(&self) -> Option<&str> {
        None
    }
    fn required_skills(&self) -> &[String] {
        &[]
    }
    fn preferred_skills(&self) -> &[String] {
        &[]
    }
}

impl Listing for JobPosting {
    fn id(&self) -> i64 {
        self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn salary_min(&self) -> Option<f64> {
        self.salary_min
    }
    fn experience_level(&self) -> Option<&str> {
        self.experience_level.as_deref()
    }
    fn remote_type(&self) -> Option<&str> {
        self.remote_type.as_deref()
    }
    fn required_skills(&self) -> &[String] {
        &self.required_skills
    }
    fn preferred_skills(&self) -> &[String] {
        &self.preferred_skills
    }
}

impl Listing for SkillDefinition {
    fn id(&self) -> i64 {
        self.id
    }
    fn title(&self) -> &str {
        &self.name
    }
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// Text a job posting is embedded from: required then preferred skills joined
/// with ", ", or the title when it lists none.
pub fn job_embedding_text(title: &str, required: &[String], preferred: &[String]) -> String {
    let skills: Vec<&str> = required
        .iter()
        .chain(preferred.iter())
        .map(String::as_str)
        .collect();

    if skills.is_empty() {
        title.to_string()
    } else {
        skills.join(", ")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Filters
// ────────────────────────────────────────────────────────────────────────────

/// Conjunctive hard filters. Every `Some` field must hold for an entry to survive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Entry's `salary_min` must be at least this value.
    pub min_salary: Option<f64>,
    pub experience_level: Option<String>,
    pub remote_type: Option<String>,
    pub category: Option<String>,
    /// Case-insensitive substring of the entry title.
    pub title_contains: Option<String>,
}

impl CatalogFilter {
    pub fn for_title(role: &str) -> Self {
        Self {
            title_contains: Some(role.to_string()),
            ..Self::default()
        }
    }

    pub fn matches<T: Listing>(&self, item: &T) -> bool {
        if let Some(floor) = self.min_salary {
            match item.salary_min() {
                Some(salary) if salary >= floor => {}
                _ => return false,
            }
        }
        if let Some(level) = &self.experience_level {
            if item.experience_level() != Some(level.as_str()) {
                return false;
            }
        }
        if let Some(remote) = &self.remote_type {
            if item.remote_type() != Some(remote.as_str()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if item.category() != Some(category.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.title_contains {
            if !item
                .title()
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog capability
// ────────────────────────────────────────────────────────────────────────────

/// Read-only source of catalog entries, in insertion order.
#[async_trait]
pub trait Catalog<T>: Send + Sync {
    async fn query(&self, filter: &CatalogFilter) -> Result<Vec<CatalogEntry<T>>, CatalogError>;
}

/// Catalog held entirely in memory, for fixtures.
#[cfg(test)]
pub struct InMemoryCatalog<T> {
    entries: Vec<CatalogEntry<T>>,
}

#[cfg(test)]
impl<T> InMemoryCatalog<T> {
    pub fn new(entries: Vec<CatalogEntry<T>>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
#[async_trait]
impl<T> Catalog<T> for InMemoryCatalog<T>
where
    T: Listing + Clone + Send + Sync,
{
    async fn query(&self, filter: &CatalogFilter) -> Result<Vec<CatalogEntry<T>>, CatalogError> {
        Ok(self
            .entries
            .iter()
            .filter(|e| filter.matches(&e.entity))
            .cloned()
            .collect())
    }
}
