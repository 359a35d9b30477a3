use ragline::infrastructure::llm::{ClientFactory, ClientFactoryError};
use ragline::presentation::Settings;

#[test]
fn given_missing_api_key_when_creating_clients_then_returns_missing_api_key() {
    let settings = Settings::from_toml_str("").unwrap();

    assert!(matches!(
        ClientFactory::create_embedder(&settings),
        Err(ClientFactoryError::MissingApiKey)
    ));
    assert!(matches!(
        ClientFactory::create_llm_client(&settings),
        Err(ClientFactoryError::MissingApiKey)
    ));
}

#[test]
fn given_api_key_when_creating_clients_then_succeeds() {
    let settings = Settings::from_toml_str(
        r#"
        [openai]
        api_key = "sk-test"
        base_url = "http://localhost:1234/v1"
        "#,
    )
    .unwrap();

    assert!(ClientFactory::create_embedder(&settings).is_ok());
    assert!(ClientFactory::create_llm_client(&settings).is_ok());
}
