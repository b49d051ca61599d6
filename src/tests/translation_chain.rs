use super::helpers::*;
use crate::backend::TranslateResponse;
use crate::dictionary::Dictionary;
use crate::error::StudyError;
use crate::session::{Session, TranslationPreference};
use crate::status::ServiceChoice;
use crate::translate::TranslationService;
use std::sync::Arc;

fn service(backend: MockBackend) -> (TranslationService, Arc<MockBackend>) {
    let backend = Arc::new(backend);
    (
        TranslationService::new(backend.clone(), Dictionary::builtin()),
        backend,
    )
}

// ── Remote Tier ─────────────────────────────────────────────

#[tokio::test]
async fn test_remote_translation_wins() {
    let (svc, backend) = service(MockBackend::offline().with_translation("안녕하세요 세계", "groq"));

    let t = svc.translate(&Session::guest(), "Hello World").await.unwrap();
    assert_eq!(t.text, "안녕하세요 세계");
    assert_eq!(t.choice, ServiceChoice::Groq);
    assert!(!t.fell_back);
    assert_eq!(backend.calls_to("translate"), 1);
}

#[tokio::test]
async fn test_guest_requests_auto_service() {
    let (svc, backend) = service(MockBackend::offline().with_translation("네", "google"));

    svc.translate(&Session::guest(), "yes").await.unwrap();
    assert_eq!(
        *backend.last_translation_service.lock().unwrap(),
        Some(TranslationPreference::Auto)
    );
    assert_eq!(*backend.last_token.lock().unwrap(), None);
}

#[tokio::test]
async fn test_authenticated_requests_preferred_service() {
    let (svc, backend) = service(MockBackend::offline().with_translation("네", "google_official"));
    let mut session = crate::session::tests::authenticated_session();
    session.profile_mut().unwrap().preferred_translation_service = TranslationPreference::Google;

    let t = svc.translate(&session, "yes").await.unwrap();
    assert_eq!(t.choice, ServiceChoice::GoogleOfficial);
    assert_eq!(
        *backend.last_translation_service.lock().unwrap(),
        Some(TranslationPreference::Google)
    );
    assert_eq!(backend.last_token.lock().unwrap().as_deref(), Some("token_7"));
}

// ── Dictionary Fallback ─────────────────────────────────────

#[tokio::test]
async fn test_offline_falls_back_to_dictionary() {
    let (svc, _backend) = service(MockBackend::offline());

    let t = svc.translate(&Session::guest(), "Good morning").await.unwrap();
    assert_eq!(t.text, "좋은 아침");
    assert_eq!(t.choice, ServiceChoice::Basic);
    assert!(t.fell_back);
}

#[tokio::test]
async fn test_empty_remote_translation_falls_back() {
    let backend = MockBackend::offline();
    MockBackend::set(
        &backend.translate,
        Ok(TranslateResponse {
            success: true,
            translation: Some("  ".to_string()),
            service: Some("groq".to_string()),
        }),
    );
    let (svc, _backend) = service(backend);

    let t = svc.translate(&Session::guest(), "thank you").await.unwrap();
    assert_eq!(t.choice, ServiceChoice::Basic);
    assert_eq!(t.text, "감사합니다");
}

#[tokio::test]
async fn test_unsuccessful_remote_falls_back() {
    let backend = MockBackend::offline();
    MockBackend::set(&backend.translate, Ok(TranslateResponse::default()));
    let (svc, _backend) = service(backend);

    let t = svc.translate(&Session::guest(), "the a an").await.unwrap();
    assert_eq!(t.text, "");
    assert_eq!(t.choice, ServiceChoice::Basic);
}

#[tokio::test]
async fn test_offline_translation_is_idempotent() {
    let (svc, backend) = service(MockBackend::offline());

    let first = svc.translate(&Session::guest(), "Hello World").await.unwrap();
    let second = svc.translate(&Session::guest(), "Hello World").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(backend.calls_to("translate"), 2);
}

#[tokio::test]
async fn test_empty_text_is_rejected_before_remote() {
    let (svc, backend) = service(MockBackend::offline());

    let err = svc.translate(&Session::guest(), "").await.unwrap_err();
    assert!(matches!(err, StudyError::Validation(_)));
    assert!(backend.calls().is_empty());
}
