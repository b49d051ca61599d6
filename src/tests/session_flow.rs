use super::helpers::*;
use crate::backend::ProfileResponse;
use crate::error::StudyError;
use crate::session::{
    AccountService, Credentials, Profile, ProfilePatch, ProfileSettings, Registration, Session,
    TranslationPreference,
};
use crate::speech::Speed;
use crate::storage::{KeyValueStore, MemoryStore, TOKEN_KEY, USER_KEY};
use std::sync::Arc;

fn accounts(backend: MockBackend) -> (AccountService, Arc<MockBackend>, Arc<MemoryStore>) {
    let backend = Arc::new(backend);
    let store = Arc::new(MemoryStore::new());
    (
        AccountService::new(backend.clone(), store.clone()),
        backend,
        store,
    )
}

// ── Login / Register / Logout ───────────────────────────────

#[tokio::test]
async fn test_login_establishes_and_persists_session() {
    let (accounts, _backend, store) = accounts(MockBackend::offline().with_login());
    let mut session = Session::guest();

    accounts
        .login(&mut session, &Credentials::new("jisoo", "pw"))
        .await
        .unwrap();

    assert!(session.is_authenticated());
    assert_eq!(session.token(), Some("token_42"));
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("token_42"));
    assert_eq!(Session::restore(store.as_ref()), session);
}

#[tokio::test]
async fn test_login_rejection_keeps_guest() {
    let backend = MockBackend::offline();
    MockBackend::set(
        &backend.login,
        Err(StudyError::rejected(Some(400), "Invalid credentials")),
    );
    let (accounts, _backend, store) = accounts(backend);
    let mut session = Session::guest();

    let err = accounts
        .login(&mut session, &Credentials::new("jisoo", "bad"))
        .await
        .unwrap_err();

    assert_eq!(err, StudyError::rejected(Some(400), "Invalid credentials"));
    assert!(!session.is_authenticated());
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let (accounts, backend, _store) = accounts(MockBackend::offline().with_login());
    let mut session = Session::guest();

    let err = accounts
        .login(&mut session, &Credentials::new("jisoo", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, StudyError::Validation(_)));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_register_does_not_log_in() {
    let backend = MockBackend::offline();
    MockBackend::set(&backend.register, Ok(()));
    let (accounts, backend, store) = accounts(backend);

    accounts
        .register(&Registration {
            username: "newbie".into(),
            email: "newbie@example.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();

    assert_eq!(backend.calls(), vec!["register"]);
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_register_requires_email() {
    let (accounts, backend, _store) = accounts(MockBackend::offline());
    let err = accounts
        .register(&Registration {
            username: "newbie".into(),
            email: " ".into(),
            password: "secret".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StudyError::Validation(_)));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_logout_clears_persisted_identity() {
    let (accounts, _backend, store) = accounts(MockBackend::offline().with_login());
    let mut session = Session::guest();
    accounts
        .login(&mut session, &Credentials::new("jisoo", "pw"))
        .await
        .unwrap();

    accounts.logout(&mut session).unwrap();

    assert!(!session.is_authenticated());
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(store.get(USER_KEY).unwrap(), None);
}

// ── Profile ─────────────────────────────────────────────────

#[tokio::test]
async fn test_profile_operations_require_login() {
    let (accounts, backend, _store) = accounts(MockBackend::offline());
    let mut session = Session::guest();

    assert_eq!(
        accounts.load_profile(&mut session).await.unwrap_err(),
        StudyError::NotAuthenticated
    );
    assert_eq!(
        accounts
            .update_preferences(&mut session, &ProfileSettings::voice_speed(Speed::Fast))
            .await
            .unwrap_err(),
        StudyError::NotAuthenticated
    );
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_load_profile_replaces_cache() {
    let backend = MockBackend::offline();
    MockBackend::set(
        &backend.profile,
        Ok(ProfileResponse {
            user: None,
            profile: Profile {
                has_google_key: true,
                total_usage: 120,
                ..Profile::default()
            },
        }),
    );
    let (accounts, _backend, store) = accounts(backend);
    let mut session = crate::session::tests::authenticated_session();

    let profile = accounts.load_profile(&mut session).await.unwrap();
    assert_eq!(profile.total_usage, 120);
    assert!(session.profile().unwrap().has_google_key);
    assert!(store
        .get(USER_KEY)
        .unwrap()
        .unwrap()
        .contains("\"has_google_key\":true"));
}

#[tokio::test]
async fn test_update_preferences_merges_partial_profile() {
    let backend = MockBackend::offline();
    MockBackend::set(
        &backend.put_profile,
        Ok(ProfilePatch {
            preferred_translation_service: Some(TranslationPreference::Groq),
            has_groq_key: Some(true),
            ..ProfilePatch::default()
        }),
    );
    let (accounts, backend, store) = accounts(backend);
    seed_login(&store);
    let mut session = Session::restore(store.as_ref());

    let settings = ProfileSettings {
        groq_api_key: Some("gsk_live".into()),
        preferred_translation_service: Some(TranslationPreference::Groq),
        ..ProfileSettings::default()
    };
    let profile = accounts
        .update_preferences(&mut session, &settings)
        .await
        .unwrap();

    assert_eq!(profile.preferred_translation_service, TranslationPreference::Groq);
    assert!(profile.can_use_ai);
    assert_eq!(*backend.last_settings.lock().unwrap(), Some(settings));
    assert_eq!(
        Session::restore(store.as_ref())
            .preferences()
            .translation_service,
        TranslationPreference::Groq
    );
}

#[tokio::test]
async fn test_remember_speed_is_best_effort() {
    let (accounts, backend, _store) = accounts(MockBackend::offline());
    let mut session = crate::session::tests::authenticated_session();

    accounts.remember_speed(&mut session, Speed::Slow).await;

    assert_eq!(backend.calls_to("put_profile"), 1);
    assert_eq!(session.preferences().voice_speed, Speed::Normal);
}

#[tokio::test]
async fn test_remember_speed_skips_guests_and_unchanged() {
    let (accounts, backend, _store) = accounts(MockBackend::offline());

    let mut guest = Session::guest();
    accounts.remember_speed(&mut guest, Speed::Fast).await;

    let mut session = crate::session::tests::authenticated_session();
    accounts.remember_speed(&mut session, Speed::Normal).await;

    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_speed_update_skips_a_different_session() {
    let backend = MockBackend::offline();
    MockBackend::set(
        &backend.put_profile,
        Ok(ProfilePatch {
            preferred_voice_speed: Some(Speed::Fast),
            ..ProfilePatch::default()
        }),
    );
    let (accounts, _backend, _store) = accounts(backend);
    let session = crate::session::tests::authenticated_session();

    let update = accounts.send_speed(&session, Speed::Fast).await.unwrap();

    let mut guest = Session::guest();
    accounts.apply_speed(&mut guest, &update);
    assert!(!guest.is_authenticated());

    let mut same = session.clone();
    accounts.apply_speed(&mut same, &update);
    assert_eq!(same.preferences().voice_speed, Speed::Fast);
}
