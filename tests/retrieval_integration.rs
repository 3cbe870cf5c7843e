//! Retrieval integration tests
//!
//! Exercises both retrievers through the exercise pipelines without a
//! running Ollama server.

mod common;

use common::ConceptEmbedder;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use ragworkshop::llm::CachedEmbedder;
use ragworkshop::rag::retrieval::{cosine_similarity, LexicalRetriever, Retriever, VectorRetriever};
use ragworkshop::rag::{EmbeddingPipeline, KnowledgeStore, RagPipeline, WordOverlapPipeline};
use ragworkshop::types::RawChunk;
use ragworkshop::RagError;
use std::sync::Arc;

fn chunks_from(texts: &[String]) -> Vec<RawChunk> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| RawChunk::new(i.to_string(), text.clone()))
        .collect()
}

#[tokio::test]
async fn test_lexical_cats_mammals() {
    let pipeline = WordOverlapPipeline::new();
    let chunks = vec![
        RawChunk::new("1", "cats are mammals"),
        RawChunk::new("2", "dogs are pets"),
    ];

    let store = pipeline.preprocess(&chunks).await.unwrap();
    let result = pipeline.retrieve("cats mammals", &store, 1).await.unwrap();

    assert_eq!(result.sources, vec!["1"]);
    assert_eq!(result.metadata["strategy"], "lexical");
}

#[tokio::test]
async fn test_vector_matches_without_word_overlap() {
    let pipeline = EmbeddingPipeline::new(Arc::new(ConceptEmbedder::pets()));
    let chunks = vec![
        RawChunk::new("1", "The feline is a type of mammal"),
        RawChunk::new("2", "Rockets use combustion"),
    ];

    let store = pipeline.preprocess(&chunks).await.unwrap();
    assert!(store.is_embedded());

    // Zero lexical overlap between query and the winning chunk
    let lexical = LexicalRetriever::new().search("cats", &store, 2).unwrap();
    assert_eq!(lexical.metadata["scores"], serde_json::json!([0.0, 0.0]));

    let result = pipeline.retrieve("cats", &store, 1).await.unwrap();
    assert_eq!(result.sources, vec!["1"]);
    assert_eq!(result.metadata["strategy"], "vector");
}

#[tokio::test]
async fn test_top_k_at_least_store_size_returns_everything() {
    let embedder = Arc::new(ConceptEmbedder::pets());
    let chunks = common::pets();
    let store = KnowledgeStore::embedded(&chunks, embedder.as_ref(), 2).await.unwrap();

    let vector = VectorRetriever::new(embedder);
    for top_k in [3, 4, 100] {
        let result = vector.retrieve("kitten", &store, top_k).await.unwrap();
        assert_eq!(result.len(), 3);

        let result = LexicalRetriever::new().retrieve("kitten", &store, top_k).await.unwrap();
        assert_eq!(result.len(), 3);
    }
}

#[tokio::test]
async fn test_invalid_input_policies() {
    let pipeline = WordOverlapPipeline::new();
    let store = pipeline.preprocess(&common::pets()).await.unwrap();

    assert!(pipeline.retrieve("cats", &store, 0).await.unwrap().is_empty());
    assert!(matches!(
        pipeline.retrieve("   ", &store, 3).await,
        Err(RagError::InvalidInput(_))
    ));

    let empty = pipeline.preprocess(&[]).await.unwrap();
    assert!(pipeline.retrieve("cats", &empty, 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_vector_retriever_needs_embedded_store() {
    let lexical_store = WordOverlapPipeline::new().preprocess(&common::pets()).await.unwrap();
    let retriever = VectorRetriever::new(Arc::new(ConceptEmbedder::pets()));

    let result = retriever.retrieve("cats", &lexical_store, 1).await;
    assert!(matches!(result, Err(RagError::InvalidInput(_))));
}

#[tokio::test]
async fn test_duplicate_chunk_ids_rejected() {
    let mut chunks = common::pets();
    chunks.push(RawChunk::new("1", "a second chunk one"));

    let lexical = WordOverlapPipeline::new().preprocess(&chunks).await;
    assert!(matches!(lexical, Err(RagError::DuplicateChunk(id)) if id == "1"));

    let embedding = EmbeddingPipeline::new(Arc::new(ConceptEmbedder::pets()))
        .preprocess(&chunks)
        .await;
    assert!(matches!(embedding, Err(RagError::DuplicateChunk(_))));
}

#[tokio::test]
async fn test_embedding_failure_fails_preprocessing() {
    let embedder = Arc::new(ConceptEmbedder::pets().failing_on("rocket"));
    let result = EmbeddingPipeline::new(embedder).preprocess(&common::pets()).await;
    assert!(matches!(result, Err(RagError::Embedding(_))));
}

#[tokio::test]
async fn test_preprocessing_is_idempotent() {
    let concept = Arc::new(ConceptEmbedder::pets());
    let cached = Arc::new(CachedEmbedder::new(concept.clone()));
    let pipeline = EmbeddingPipeline::new(cached);
    let chunks = common::pets();

    let first = pipeline.preprocess(&chunks).await.unwrap();
    let second = pipeline.preprocess(&chunks).await.unwrap();

    // Second pass served entirely from the cache
    assert_eq!(concept.calls(), chunks.len());
    assert_eq!(first.ids(), second.ids());
    for id in first.ids() {
        assert_eq!(first.get(id).unwrap().embedding, second.get(id).unwrap().embedding);
    }

    for query in ["cats", "puppy", "orbit launch"] {
        let a = pipeline.retrieve(query, &first, 2).await.unwrap();
        let b = pipeline.retrieve(query, &second, 2).await.unwrap();
        assert_eq!(a.sources, b.sources);
    }
}

#[tokio::test]
async fn test_self_cosine_of_stored_embeddings() {
    let embedder = ConceptEmbedder::pets();
    let store = KnowledgeStore::embedded(&common::pets(), &embedder, 4).await.unwrap();

    for chunk in store.iter() {
        let embedding = chunk.embedding.as_deref().unwrap();
        let similarity = cosine_similarity(embedding, embedding).unwrap();
        assert!((similarity - 1.0).abs() < 1e-6, "chunk {}: {}", chunk.id, similarity);
    }
}

#[quickcheck]
fn prop_lexical_never_exceeds_top_k(texts: Vec<String>, query: String, top_k: u8) -> TestResult {
    if query.trim().is_empty() {
        return TestResult::discard();
    }

    let store = KnowledgeStore::lexical(&chunks_from(&texts)).unwrap();
    let result = LexicalRetriever::new().search(&query, &store, top_k as usize).unwrap();

    TestResult::from_bool(result.len() == (top_k as usize).min(texts.len()))
}

#[quickcheck]
fn prop_lexical_is_deterministic(texts: Vec<String>, query: String) -> TestResult {
    if query.trim().is_empty() {
        return TestResult::discard();
    }

    let store = KnowledgeStore::lexical(&chunks_from(&texts)).unwrap();
    let retriever = LexicalRetriever::new();
    let first = retriever.search(&query, &store, 5).unwrap();
    let second = retriever.search(&query, &store, 5).unwrap();

    TestResult::from_bool(first == second)
}

#[quickcheck]
fn prop_vector_never_exceeds_top_k(texts: Vec<String>, top_k: u8) -> bool {
    let embedder = Arc::new(ConceptEmbedder::pets());
    let chunks = chunks_from(&texts);

    tokio_test::block_on(async {
        let store = KnowledgeStore::embedded(&chunks, embedder.as_ref(), 4).await.unwrap();
        let result = VectorRetriever::new(embedder.clone())
            .retrieve("cat or dog", &store, top_k as usize)
            .await
            .unwrap();
        result.len() == (top_k as usize).min(texts.len())
    })
}
