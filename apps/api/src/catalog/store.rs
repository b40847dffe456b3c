//! Catalog reads and writes behind the `/jobs` and `/skills` endpoints.
//! Ranking reads go through the `Catalog` trait instead.

use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use super::postgres::{push_job_filters, push_skill_filters};
use super::CatalogFilter;
use crate::errors::AppError;
use crate::models::job::{JobPostingRecord, NewJobPosting};
use crate::models::skill::{NewSkill, SkillRecord};

const JOB_RECORD_COLUMNS: &str = "id, title, company, location, salary_min, salary_max, description, \
    COALESCE(required_skills, '{}') AS required_skills, \
    COALESCE(preferred_skills, '{}') AS preferred_skills, \
    experience_level, remote_type, created_at";

const SKILL_RECORD_COLUMNS: &str = "id, name, category, description, demand_score, created_at";

/// Label for rows whose grouped attribute is NULL.
const UNSPECIFIED: &str = "Unspecified";

/// Offset pagination for the list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 200;

    pub fn resolve(skip: Option<i64>, limit: Option<i64>) -> Result<Self, AppError> {
        let skip = skip.unwrap_or(0);
        if skip < 0 {
            return Err(AppError::Validation("skip cannot be negative".to_string()));
        }
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);
        if !(1..=Self::MAX_LIMIT).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {}, got {limit}",
                Self::MAX_LIMIT
            )));
        }
        Ok(Self { skip, limit })
    }

    fn push(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" OFFSET ")
            .push_bind(self.skip)
            .push(" LIMIT ")
            .push_bind(self.limit);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job postings
// ────────────────────────────────────────────────────────────────────────────

pub async fn insert_job(
    pool: &PgPool,
    job: &NewJobPosting,
    embedding: &[f32],
) -> Result<JobPostingRecord, AppError> {
    let sql = format!(
        "INSERT INTO job_postings \
            (title, company, location, salary_min, salary_max, description, required_skills, \
             preferred_skills, experience_level, remote_type, skills_embedding) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {JOB_RECORD_COLUMNS}"
    );

    let record = sqlx::query_as::<_, JobPostingRecord>(&sql)
        .bind(job.title.trim())
        .bind(&job.company)
        .bind(&job.location)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.description)
        .bind(&job.required_skills)
        .bind(&job.preferred_skills)
        .bind(&job.experience_level)
        .bind(&job.remote_type)
        .bind(embedding)
        .fetch_one(pool)
        .await?;

    info!(
        "Created job posting {} - {}",
        record.posting.id, record.posting.title
    );
    Ok(record)
}

fn list_jobs_query(filter: &CatalogFilter, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {JOB_RECORD_COLUMNS} FROM job_postings WHERE TRUE"
    ));
    push_job_filters(&mut qb, filter);
    qb.push(" ORDER BY created_at DESC, id DESC");
    page.push(&mut qb);
    qb
}

/// Newest first.
pub async fn list_jobs(
    pool: &PgPool,
    filter: &CatalogFilter,
    page: Page,
) -> Result<Vec<JobPostingRecord>, AppError> {
    let rows = list_jobs_query(filter, page)
        .build_query_as()
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn get_job(pool: &PgPool, id: i64) -> Result<Option<JobPostingRecord>, AppError> {
    let sql = format!("SELECT {JOB_RECORD_COLUMNS} FROM job_postings WHERE id = $1");
    let row = sqlx::query_as::<_, JobPostingRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobStats {
    pub total_jobs: i64,
    pub by_experience_level: BTreeMap<String, i64>,
    pub by_remote_type: BTreeMap<String, i64>,
    pub average_salary_range: SalaryRange,
}

pub async fn job_stats(pool: &PgPool) -> Result<JobStats, AppError> {
    let (total_jobs,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM job_postings")
        .fetch_one(pool)
        .await?;

    let by_level: Vec<(Option<String>, i64)> = sqlx::query_as(
        "SELECT experience_level, COUNT(*) FROM job_postings GROUP BY experience_level",
    )
    .fetch_all(pool)
    .await?;

    let by_remote: Vec<(Option<String>, i64)> =
        sqlx::query_as("SELECT remote_type, COUNT(*) FROM job_postings GROUP BY remote_type")
            .fetch_all(pool)
            .await?;

    let (avg_min, avg_max): (Option<f64>, Option<f64>) =
        sqlx::query_as("SELECT AVG(salary_min), AVG(salary_max) FROM job_postings")
            .fetch_one(pool)
            .await?;

    Ok(JobStats {
        total_jobs,
        by_experience_level: count_map(by_level),
        by_remote_type: count_map(by_remote),
        average_salary_range: SalaryRange {
            min: avg_min.map(round2),
            max: avg_max.map(round2),
        },
    })
}

fn count_map(rows: Vec<(Option<String>, i64)>) -> BTreeMap<String, i64> {
    let mut counts = BTreeMap::new();
    for (key, count) in rows {
        *counts
            .entry(key.unwrap_or_else(|| UNSPECIFIED.to_string()))
            .or_insert(0) += count;
    }
    counts
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// Inserts a skill unless one with the same name exists, which is a validation error.
pub async fn insert_skill(
    pool: &PgPool,
    skill: &NewSkill,
    embedding: &[f32],
) -> Result<SkillRecord, AppError> {
    let name = skill.name.trim();
    let sql = format!(
        "INSERT INTO skills (name, category, description, embedding) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (name) DO NOTHING \
         RETURNING {SKILL_RECORD_COLUMNS}"
    );

    let record = sqlx::query_as::<_, SkillRecord>(&sql)
        .bind(name)
        .bind(&skill.category)
        .bind(&skill.description)
        .bind(embedding)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Skill '{name}' already exists")))?;

    info!("Created skill {} - {}", record.skill.id, record.skill.name);
    Ok(record)
}

fn list_skills_query(filter: &CatalogFilter, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {SKILL_RECORD_COLUMNS} FROM skills WHERE TRUE"
    ));
    push_skill_filters(&mut qb, filter);
    qb.push(" ORDER BY id");
    page.push(&mut qb);
    qb
}

pub async fn list_skills(
    pool: &PgPool,
    filter: &CatalogFilter,
    page: Page,
) -> Result<Vec<SkillRecord>, AppError> {
    let rows = list_skills_query(filter, page)
        .build_query_as()
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn get_skill(pool: &PgPool, id: i64) -> Result<Option<SkillRecord>, AppError> {
    let sql = format!("SELECT {SKILL_RECORD_COLUMNS} FROM skills WHERE id = $1");
    let row = sqlx::query_as::<_, SkillRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Distinct non-null categories, alphabetical.
pub async fn list_categories(pool: &PgPool) -> Result<Vec<String>, AppError> {
    let categories = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT category FROM skills WHERE category IS NOT NULL ORDER BY category",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

/// Skills with a demand score, highest first.
pub async fn trending_skills(pool: &PgPool, limit: i64) -> Result<Vec<SkillRecord>, AppError> {
    let sql = format!(
        "SELECT {SKILL_RECORD_COLUMNS} FROM skills \
         WHERE demand_score IS NOT NULL \
         ORDER BY demand_score DESC, id \
         LIMIT $1"
    );
    let rows = sqlx::query_as::<_, SkillRecord>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        assert_eq!(
            Page::resolve(None, None).unwrap(),
            Page {
                skip: 0,
                limit: Page::DEFAULT_LIMIT
            }
        );
    }

    #[test]
    fn test_page_rejects_out_of_range() {
        assert!(matches!(Page::resolve(Some(-1), None), Err(AppError::Validation(_))));
        assert!(matches!(Page::resolve(None, Some(0)), Err(AppError::Validation(_))));
        assert!(matches!(
            Page::resolve(None, Some(Page::MAX_LIMIT + 1)),
            Err(AppError::Validation(_))
        ));
        assert!(Page::resolve(Some(100), Some(Page::MAX_LIMIT)).is_ok());
    }

    #[test]
    fn test_list_jobs_sql_filters_then_pages() {
        let filter = CatalogFilter {
            experience_level: Some("Senior".to_string()),
            remote_type: Some("Remote".to_string()),
            ..Default::default()
        };
        let qb = list_jobs_query(&filter, Page { skip: 0, limit: 50 });
        let sql = qb.sql();
        assert!(sql.contains("FROM job_postings WHERE TRUE"), "sql was {sql}");
        assert!(
            sql.ends_with(
                "AND experience_level = $1 AND remote_type = $2 \
                 ORDER BY created_at DESC, id DESC OFFSET $3 LIMIT $4"
            ),
            "sql was {sql}"
        );
    }

    #[test]
    fn test_list_skills_sql_without_filter() {
        let qb = list_skills_query(&CatalogFilter::default(), Page { skip: 10, limit: 5 });
        let sql = qb.sql();
        assert!(
            sql.ends_with("FROM skills WHERE TRUE ORDER BY id OFFSET $1 LIMIT $2"),
            "sql was {sql}"
        );
    }

    #[test]
    fn test_count_map_labels_missing_values() {
        let counts = count_map(vec![
            (Some("Senior".to_string()), 4),
            (None, 2),
            (Some("Mid".to_string()), 3),
        ]);
        assert_eq!(counts.get("Senior"), Some(&4));
        assert_eq!(counts.get("Mid"), Some(&3));
        assert_eq!(counts.get(UNSPECIFIED), Some(&2));
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(95_123.456), 95_123.46);
        assert_eq!(round2(80_000.0), 80_000.0);
    }
}
