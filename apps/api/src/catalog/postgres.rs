//! PostgreSQL-backed catalogs. Filters are pushed into SQL; rows come back in
//! insertion (id) order so the ranker's stable tie-break stays meaningful.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use super::{Catalog, CatalogEntry, CatalogError, CatalogFilter};
use crate::models::job::{JobPosting, JobPostingRow};
use crate::models::skill::{SkillDefinition, SkillDefinitionRow};

const JOB_COLUMNS: &str = "SELECT id, title, company, location, salary_min, salary_max, description, \
    COALESCE(required_skills, '{}') AS required_skills, \
    COALESCE(preferred_skills, '{}') AS preferred_skills, \
    experience_level, remote_type, skills_embedding \
    FROM job_postings WHERE skills_embedding IS NOT NULL";

const SKILL_COLUMNS: &str = "SELECT id, name, category, description, demand_score, embedding \
    FROM skills WHERE embedding IS NOT NULL";

#[derive(Clone)]
pub struct PgJobCatalog {
    pool: PgPool,
}

impl PgJobCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Catalog<JobPosting> for PgJobCatalog {
    async fn query(
        &self,
        filter: &CatalogFilter,
    ) -> Result<Vec<CatalogEntry<JobPosting>>, CatalogError> {
        // Jobs carry no category; a category filter can never match.
        if filter.category.is_some() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Postgres>::new(JOB_COLUMNS);
        push_job_filters(&mut qb, filter);
        qb.push(" ORDER BY id");

        let rows: Vec<JobPostingRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        debug!("Job catalog query returned {} rows", rows.len());

        Ok(rows
            .into_iter()
            .map(|row| CatalogEntry::new(row.posting, row.skills_embedding))
            .collect())
    }
}

#[derive(Clone)]
pub struct PgSkillCatalog {
    pool: PgPool,
}

impl PgSkillCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Catalog<SkillDefinition> for PgSkillCatalog {
    async fn query(
        &self,
        filter: &CatalogFilter,
    ) -> Result<Vec<CatalogEntry<SkillDefinition>>, CatalogError> {
        // Skills carry no salary, level or remote attributes.
        if filter.min_salary.is_some()
            || filter.experience_level.is_some()
            || filter.remote_type.is_some()
        {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Postgres>::new(SKILL_COLUMNS);
        push_skill_filters(&mut qb, filter);
        qb.push(" ORDER BY id");

        let rows: Vec<SkillDefinitionRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        debug!("Skill catalog query returned {} rows", rows.len());

        Ok(rows
            .into_iter()
            .map(|row| CatalogEntry::new(row.skill, row.embedding))
            .collect())
    }
}

/// Appends ` AND ...` clauses for the job attributes set in `filter`.
/// The query must already contain a `WHERE`.
pub(super) fn push_job_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &CatalogFilter) {
    if let Some(floor) = filter.min_salary {
        qb.push(" AND salary_min >= ").push_bind(floor);
    }
    if let Some(level) = &filter.experience_level {
        qb.push(" AND experience_level = ").push_bind(level.clone());
    }
    if let Some(remote) = &filter.remote_type {
        qb.push(" AND remote_type = ").push_bind(remote.clone());
    }
    push_title_filter(qb, "title", filter.title_contains.as_deref());
}

pub(super) fn push_skill_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &CatalogFilter) {
    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    push_title_filter(qb, "name", filter.title_contains.as_deref());
}

fn push_title_filter(qb: &mut QueryBuilder<'_, Postgres>, column: &str, needle: Option<&str>) {
    if let Some(needle) = needle {
        qb.push(format!(" AND {column} ILIKE "))
            .push_bind(ilike_pattern(needle))
            .push(" ESCAPE '\\'");
    }
}

/// `%needle%` with LIKE metacharacters escaped.
fn ilike_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ilike_pattern_wraps_needle() {
        assert_eq!(ilike_pattern("AI Engineer"), "%AI Engineer%");
    }

    #[test]
    fn test_ilike_pattern_escapes_metacharacters() {
        assert_eq!(ilike_pattern("100%_sure"), "%100\\%\\_sure%");
    }

    #[test]
    fn test_job_filters_bind_in_order() {
        let mut qb = QueryBuilder::<Postgres>::new(JOB_COLUMNS);
        push_job_filters(
            &mut qb,
            &CatalogFilter {
                min_salary: Some(80_000.0),
                remote_type: Some("Remote".to_string()),
                ..Default::default()
            },
        );
        let sql = qb.sql();
        assert!(
            sql.ends_with("AND salary_min >= $1 AND remote_type = $2"),
            "sql was {sql}"
        );
    }

    #[test]
    fn test_title_filter_sql() {
        let mut qb = QueryBuilder::<Postgres>::new(SKILL_COLUMNS);
        push_title_filter(&mut qb, "name", Some("rust"));
        let sql = qb.sql();
        assert!(sql.ends_with("AND name ILIKE $1 ESCAPE '\\'"), "sql was {sql}");
    }
}
