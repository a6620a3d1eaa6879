use curriculum_rag::{CurriculumError, curriculum_rag};

#[tokio::test]
async fn unset_api_key_is_a_configuration_error() {
    // SAFETY: This is the only test in this binary and it is the sole reader of process env.
    unsafe {
        std::env::remove_var("RAGIE_API_KEY");
        std::env::set_var("RAGIE_API_ENDPOINT", "http://127.0.0.1:1");
    }

    let err = curriculum_rag(vec!["photosynthesis"], 20).await.unwrap_err();
    assert!(matches!(err, CurriculumError::Config(_)));
    assert!(err.to_string().contains("RAGIE_API_KEY"));
}
