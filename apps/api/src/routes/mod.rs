pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::catalog::handlers as catalog;
use crate::matching::handlers as matching;
use crate::roadmap::handlers as roadmap;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog API
        .route(
            "/api/v1/jobs",
            get(catalog::handle_list_jobs).post(catalog::handle_create_job),
        )
        .route("/api/v1/jobs/:id", get(catalog::handle_get_job))
        .route("/api/v1/jobs/stats/summary", get(catalog::handle_job_stats))
        .route(
            "/api/v1/skills",
            get(catalog::handle_list_skills).post(catalog::handle_create_skill),
        )
        .route("/api/v1/skills/:id", get(catalog::handle_get_skill))
        .route(
            "/api/v1/skills/categories/list",
            get(catalog::handle_list_categories),
        )
        .route(
            "/api/v1/skills/trending/top",
            get(catalog::handle_trending_skills),
        )
        // Matching API
        .route("/api/v1/jobs/match", post(matching::handle_match_jobs))
        .route("/api/v1/skills/search", post(matching::handle_search_skills))
        .route("/api/v1/skills/gap", post(matching::handle_skill_gap))
        // Roadmap API
        .route(
            "/api/v1/roadmaps/generate",
            post(roadmap::handle_generate_roadmap),
        )
        .route("/api/v1/roadmaps/:id", get(roadmap::handle_get_roadmap))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::catalog::{job_embedding_text, CatalogEntry, InMemoryCatalog};
    use crate::config::Config;
    use crate::embedding::{EmbeddingProvider, HashingEmbedder};
    use crate::llm_client::{GenerationError, TextGenerator};
    use crate::models::job::{test_posting, JobPosting};
    use crate::models::skill::SkillDefinition;
    use crate::roadmap::synthesizer::{RoadmapSynthesizer, SynthesisSettings};

    struct SilentGenerator;

    #[async_trait]
    impl TextGenerator for SilentGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _temperature: f32,
            _max_tokens: Option<u32>,
        ) -> Result<String, GenerationError> {
            Err(GenerationError::GenerationFailed("offline".to_string()))
        }
    }

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/skillbridge_test".to_string(),
            anthropic_api_key: "test-key".to_string(),
            embedding_url: None,
            embedding_dimensions: 64,
            roadmap_temperature: 0.7,
            roadmap_max_tokens: None,
            title_match_limit: 10,
            fallback_match_limit: 5,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn skill(id: i64, name: &str, category: Option<&str>) -> SkillDefinition {
        SkillDefinition {
            id,
            name: name.to_string(),
            category: category.map(str::to_string),
            description: None,
            demand_score: Some(0.8),
        }
    }

    async fn test_state() -> AppState {
        let config = test_config();
        let embedder = HashingEmbedder::new(config.embedding_dimensions);

        let mut rust_job = test_posting(2, "Backend Engineer");
        rust_job.required_skills = vec!["Rust".to_string(), "Tokio".to_string()];
        rust_job.preferred_skills = vec![];
        rust_job.salary_min = Some(150_000.0);

        let mut jobs = Vec::new();
        for posting in [test_posting(1, "Data Analyst"), rust_job] {
            let text = job_embedding_text(
                &posting.title,
                &posting.required_skills,
                &posting.preferred_skills,
            );
            let vector = embedder.embed(&text).await.unwrap();
            jobs.push(CatalogEntry::new(posting, vector));
        }

        let mut skills = Vec::new();
        for definition in [
            skill(1, "PostgreSQL", Some("Databases")),
            skill(2, "Kubernetes", None),
        ] {
            let vector = embedder.embed(&definition.name).await.unwrap();
            skills.push(CatalogEntry::new(definition, vector));
        }

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(embedder);
        let synthesizer = RoadmapSynthesizer::new(
            embedder.clone(),
            Arc::new(SilentGenerator),
            SynthesisSettings::default(),
        );

        AppState {
            db: PgPoolOptions::new()
                .connect_lazy(&config.database_url)
                .unwrap(),
            jobs: Arc::new(InMemoryCatalog::<JobPosting>::new(jobs)),
            skills: Arc::new(InMemoryCatalog::<SkillDefinition>::new(skills)),
            embedder,
            synthesizer,
        }
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let app = build_router(test_state().await);
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state().await);
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["service"], "skillbridge-api");
    }

    #[tokio::test]
    async fn test_match_jobs_ranks_nearest_posting_first() {
        let (status, body) = post_json(
            "/api/v1/jobs/match",
            json!({"skills": ["rust", "Tokio"], "limit": 2}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0]["job_id"], 2);
        assert_eq!(matches[0]["missing_skills"], json!([]));
        assert_eq!(matches[1]["missing_skills"], json!(["Python", "SQL"]));
    }

    #[tokio::test]
    async fn test_match_jobs_applies_salary_floor() {
        let (status, body) = post_json(
            "/api/v1/jobs/match",
            json!({"skills": ["Python"], "min_salary": 100000}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["title"], "Backend Engineer");
    }

    #[tokio::test]
    async fn test_match_jobs_rejects_empty_skills() {
        let (status, body) = post_json("/api/v1/jobs/match", json!({"skills": ["  "]})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_match_jobs_rejects_zero_limit() {
        let (status, _) =
            post_json("/api/v1/jobs/match", json!({"skills": ["Python"], "limit": 0})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_skills_defaults_missing_category() {
        let (status, body) = post_json(
            "/api/v1/skills/search",
            json!({"query": "kubernetes", "limit": 1}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let skills = body["skills"].as_array().unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0]["skill_name"], "Kubernetes");
        assert_eq!(skills[0]["category"], "Uncategorized");
    }

    #[tokio::test]
    async fn test_search_skills_category_filter() {
        let (status, body) = post_json(
            "/api/v1/skills/search",
            json!({"query": "kubernetes", "category": "Databases"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let skills = body["skills"].as_array().unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0]["skill_name"], "PostgreSQL");
    }

    #[tokio::test]
    async fn test_skill_gap_endpoint() {
        let (status, body) = post_json(
            "/api/v1/skills/gap",
            json!({
                "current_skills": ["Python"],
                "required_skills": ["python", "Spark"],
                "preferred_skills": ["Airflow"]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["gap"], json!(["Spark"]));
        assert_eq!(body["recommended"], json!(["Airflow"]));
        assert_eq!(body["confidence"], 0.5);
    }

    #[tokio::test]
    async fn test_generate_roadmap_rejects_blank_role() {
        let (status, body) = post_json(
            "/api/v1/roadmaps/generate",
            json!({"current_skills": ["Python"], "target_role": "   "}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_job_rejects_blank_title() {
        let (status, body) = post_json(
            "/api/v1/jobs",
            json!({"title": " ", "required_skills": ["Rust"]}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_skill_rejects_blank_name() {
        let (status, body) = post_json("/api/v1/skills", json!({"name": ""})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_list_jobs_rejects_zero_limit() {
        let (status, body) = get_json("/api/v1/jobs?limit=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_list_skills_rejects_negative_skip() {
        let (status, _) = get_json("/api/v1/skills?skip=-1&category=Databases").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_trending_skills_rejects_oversized_limit() {
        let (status, body) = get_json("/api/v1/skills/trending/top?limit=500").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
