use std::sync::Arc;

use serde_json::{json, Map};

use edututor_server::{
    db::{InMemoryVectorStore, MetadataFilter, VectorRecord, VectorStore},
    errors::AppError,
    models::domain::{HistoryScore, QuizAttempt, UserProfile},
    repositories::{
        QuizAttemptRepository, UserProfileRepository, VectorQuizAttemptRepository,
        VectorUserProfileRepository,
    },
};

const DIMENSION: usize = 8;

fn store() -> Arc<dyn VectorStore> {
    Arc::new(InMemoryVectorStore::new(DIMENSION))
}

fn attempt(user_id: &str, topic: &str, score: i64) -> QuizAttempt {
    QuizAttempt::new(
        user_id,
        topic,
        score,
        vec![0.0; DIMENSION],
        vec!["Q1".to_string(), "Q2".to_string(), "Q3".to_string()],
        vec!["A".to_string(), "B".to_string(), "C".to_string()],
    )
}

fn record(id: &str, user_id: &str, values: Vec<f32>) -> VectorRecord {
    let mut metadata = Map::new();
    metadata.insert("user_id".to_string(), json!(user_id));
    VectorRecord {
        id: id.to_string(),
        values,
        metadata,
    }
}

#[tokio::test]
async fn upserting_same_id_twice_keeps_second_write() {
    let store = store();
    store
        .upsert(record("quiz_u1_t", "u1", vec![1.0; DIMENSION]))
        .await
        .unwrap();

    let mut second = record("quiz_u1_t", "u1", vec![0.5; DIMENSION]);
    second.metadata.insert("topic".to_string(), json!("Physics"));
    store.upsert(second.clone()).await.unwrap();

    let fetched = store.fetch("quiz_u1_t").await.unwrap().unwrap();
    assert_eq!(fetched, second);

    let matches = store
        .query(&[0.0; DIMENSION], &MetadataFilter::new(), 10)
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);
}

#[tokio::test]
async fn query_only_returns_records_matching_the_filter() {
    let store = store();
    for (id, user) in [("a", "u1"), ("b", "u2"), ("c", "u1"), ("d", "u3")] {
        store
            .upsert(record(id, user, vec![1.0; DIMENSION]))
            .await
            .unwrap();
    }

    let filter = MetadataFilter::new().equals("user_id", "u1");
    let matches = store.query(&[1.0; DIMENSION], &filter, 10).await.unwrap();

    let mut ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["a", "c"]);
    assert!(matches.iter().all(|m| m.metadata["user_id"] == "u1"));
}

#[tokio::test]
async fn fetch_of_unknown_id_is_none() {
    assert!(store().fetch("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_with_wrong_dimension_is_rejected() {
    let result = store().upsert(record("x", "u1", vec![1.0; 3])).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn attempt_history_round_trips_every_field() {
    let repository = VectorQuizAttemptRepository::new(store());
    let stored = repository.create(attempt("u1", "Math", 3)).await.unwrap();

    let history = repository.find_by_user("u1", 50).await.unwrap();
    assert_eq!(history.len(), 1);

    let entry = &history[0];
    assert_eq!(entry.topic, "Math");
    assert_eq!(entry.score, HistoryScore::Points(3));
    assert_eq!(entry.timestamp, stored.timestamp);
    assert_eq!(entry.questions, stored.questions);
    assert_eq!(entry.answers, stored.answers);
}

#[tokio::test]
async fn attempt_history_belongs_to_queried_user() {
    let repository = VectorQuizAttemptRepository::new(store());
    repository.create(attempt("u1", "Math", 1)).await.unwrap();
    repository.create(attempt("u2", "Art", 2)).await.unwrap();
    repository.create(attempt("u1", "Biology", 3)).await.unwrap();

    let history = repository.find_by_user("u1", 50).await.unwrap();
    let mut topics: Vec<&str> = history.iter().map(|h| h.topic.as_str()).collect();
    topics.sort();
    assert_eq!(topics, vec!["Biology", "Math"]);

    assert!(repository.find_by_user("nobody", 50).await.unwrap().is_empty());
}

#[tokio::test]
async fn attempts_with_same_user_never_share_an_id() {
    let repository = VectorQuizAttemptRepository::new(store());
    let first = repository.create(attempt("u1", "Math", 1)).await.unwrap();
    let second = repository.create(attempt("u1", "Math", 1)).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(repository.find_by_user("u1", 50).await.unwrap().len(), 2);
}

#[tokio::test]
async fn profile_upsert_is_last_write_wins() {
    let repository = VectorUserProfileRepository::new(store());

    let mut metadata = Map::new();
    metadata.insert("role".to_string(), json!("Student"));
    repository
        .upsert(UserProfile {
            user_id: "u1".to_string(),
            embedding: vec![0.1; DIMENSION],
            metadata,
        })
        .await
        .unwrap();

    let mut metadata = Map::new();
    metadata.insert("role".to_string(), json!("Educator"));
    repository
        .upsert(UserProfile {
            user_id: "u1".to_string(),
            embedding: vec![0.2; DIMENSION],
            metadata,
        })
        .await
        .unwrap();

    let profile = repository.find_by_user_id("u1").await.unwrap().unwrap();
    assert_eq!(profile.metadata["role"], "Educator");
    assert_eq!(profile.embedding, vec![0.2; DIMENSION]);
}

#[tokio::test]
async fn profiles_and_attempts_share_a_store_without_mixing() {
    let store = store();
    let attempts = VectorQuizAttemptRepository::new(store.clone());
    let profiles = VectorUserProfileRepository::new(store);

    profiles
        .upsert(UserProfile {
            user_id: "u1".to_string(),
            embedding: vec![0.3; DIMENSION],
            metadata: Map::new(),
        })
        .await
        .unwrap();
    attempts.create(attempt("u1", "Math", 2)).await.unwrap();

    let history = attempts.find_by_user("u1", 50).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].topic, "Math");
}
