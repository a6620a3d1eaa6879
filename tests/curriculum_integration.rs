use curriculum_rag::{
    BatchOptions, CurriculumError, RagieConfig, curriculum_rag_with_config,
    curriculum_rag_with_options,
};
use httpmock::{Method::POST, MockServer};
use serde_json::json;

fn config_for(server: &MockServer, partition: Option<&str>) -> RagieConfig {
    let mut config = RagieConfig::new("integration-key");
    config.endpoint = server.base_url();
    config.partition = partition.map(str::to_string);
    config
}

#[tokio::test]
async fn one_failing_query_does_not_sink_the_batch() {
    let server = MockServer::start_async().await;
    let failing = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/retrievals")
                .body_contains("\"query\":\"broken\"");
            then.status(500).body("internal error");
        })
        .await;
    let succeeding = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/retrievals")
                .body_contains("\"query\":\"fractions\"");
            then.status(200).json_body(json!({
                "scored_chunks": [
                    { "document_id": "math-101", "text": "A fraction is part of a whole." }
                ]
            }));
        })
        .await;

    let result = curriculum_rag_with_config(
        vec!["broken", "fractions"],
        20,
        &config_for(&server, None),
    )
    .await
    .expect("batch should not fail");

    failing.assert_hits_async(1).await;
    succeeding.assert_hits_async(1).await;
    assert_eq!(result.queries, vec!["broken", "fractions"]);
    assert_eq!(result.results.len(), 2);
    assert_eq!(result.results[0].query, "broken");
    assert!(result.results[0].data.is_empty());
    assert_eq!(result.results[1].query, "fractions");
    assert_eq!(result.results[1].data[0].source, "math-101");
}

#[tokio::test]
async fn single_string_behaves_like_one_element_list() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/retrievals");
            then.status(200).json_body(json!({
                "chunks": [{ "source_url": "https://example.org/x", "text": "x" }]
            }));
        })
        .await;
    let config = config_for(&server, None);

    let single = curriculum_rag_with_config("x", 20, &config)
        .await
        .expect("single");
    let listed = curriculum_rag_with_config(vec!["x".to_string()], 20, &config)
        .await
        .expect("listed");

    mock.assert_hits_async(2).await;
    assert_eq!(single, listed);
    assert_eq!(single.results.len(), 1);
    assert_eq!(
        serde_json::to_value(&single).expect("serialize"),
        json!({
            "queries": ["x"],
            "results": [{
                "query": "x",
                "data": [{ "source": "https://example.org/x", "text": "x" }]
            }]
        })
    );
}

#[tokio::test]
async fn configured_partition_is_sent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/retrievals")
                .header("authorization", "Bearer integration-key")
                .json_body(json!({ "query": "cells", "top_k": 5, "partition": "teamA" }));
            then.status(200).json_body(json!({ "results": [{ "text": "Cells." }] }));
        })
        .await;

    let result = curriculum_rag_with_config("cells", 5, &config_for(&server, Some("teamA")))
        .await
        .expect("batch");

    mock.assert_async().await;
    assert_eq!(result.results[0].data[0].source, "unknown");
    assert_eq!(result.results[0].data[0].text, "Cells.");
}

#[tokio::test]
async fn partition_none_is_omitted_in_any_case() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/retrievals")
                .json_body(json!({ "query": "cells", "top_k": 20 }));
            then.status(200).json_body(json!({ "chunks": [] }));
        })
        .await;

    for partition in [None, Some("none"), Some("NONE"), Some("None")] {
        let result = curriculum_rag_with_config("cells", 20, &config_for(&server, partition))
            .await
            .expect("batch");
        assert!(result.results[0].data.is_empty());
    }

    mock.assert_hits_async(4).await;
}

#[tokio::test]
async fn missing_credential_makes_no_calls() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/retrievals");
            then.status(200).json_body(json!({ "chunks": [] }));
        })
        .await;
    let mut config = config_for(&server, None);
    config.api_key = String::new();

    let err = curriculum_rag_with_config(vec!["a", "b"], 20, &config)
        .await
        .unwrap_err();

    assert!(matches!(err, CurriculumError::Config(_)));
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn concurrent_batch_preserves_order() {
    let server = MockServer::start_async().await;
    for topic in ["algebra", "geometry", "calculus"] {
        server
            .mock_async(move |when, then| {
                when.method(POST)
                    .path("/retrievals")
                    .body_contains(format!("\"query\":\"{topic}\""));
                then.status(200).json_body(json!({
                    "chunks": [{ "document_id": topic, "text": topic }]
                }));
            })
            .await;
    }

    let options = BatchOptions::new(20).with_max_concurrency(3);
    let result = curriculum_rag_with_options(
        vec!["calculus", "algebra", "geometry"],
        &config_for(&server, None),
        &options,
    )
    .await
    .expect("batch");

    let sources: Vec<_> = result
        .results
        .iter()
        .map(|entry| entry.data[0].source.as_str())
        .collect();
    assert_eq!(sources, vec!["calculus", "algebra", "geometry"]);
}
