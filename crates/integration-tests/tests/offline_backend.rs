//! Integration tests against a backend that cannot be reached.
//!
//! Credentials live in a file store in a temporary directory, so a second
//! client on the same directory plays the part of the next app launch.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use secrecy::SecretString;
use warung_client::home::HomeFeed;
use warung_client::location::StaticLocation;
use warung_client::models::{Coordinates, CreateOrderRequest};
use warung_client::services::{
    AuthService, MenuService, OrderGateway, OrderService, PaymentService, ProfileService,
    StoreService,
};
use warung_client::session::Session;
use warung_client::storage::{self, KeyValueStore};
use warung_client::{ClientError, Route};
use warung_core::{CASH_CODE, PaymentMethod, StoreId};
use warung_integration_tests::offline_api;

fn sign_in_offline(store: &dyn KeyValueStore) {
    storage::save_token(store, &SecretString::from("7|persisted")).unwrap();
}

// =============================================================================
// Session
// =============================================================================

#[tokio::test]
async fn test_login_failure_persists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (api, store) = offline_api(dir.path());
    let auth = AuthService::new(&api);
    let mut session = Session::new(&auth);

    let err = session
        .login("0812-3456-7890", &SecretString::from("rahasia123"))
        .await
        .unwrap_err();

    assert!(err.is_network());
    assert!(!session.is_authenticated());
    assert!(storage::load_token(store.as_ref()).unwrap().is_none());
}

#[tokio::test]
async fn test_token_survives_relaunch() {
    let dir = tempfile::tempdir().unwrap();
    {
        let (_api, store) = offline_api(dir.path());
        sign_in_offline(store.as_ref());
    }

    let (api, store) = offline_api(dir.path());
    let auth = AuthService::new(&api);
    let session = Session::restore(&auth, store.as_ref()).unwrap();
    assert_eq!(session.entry_route(), Route::Home);
}

#[tokio::test]
async fn test_logout_clears_credentials_without_server() {
    let dir = tempfile::tempdir().unwrap();
    let (api, store) = offline_api(dir.path());
    sign_in_offline(store.as_ref());

    let auth = AuthService::new(&api);
    let mut session = Session::restore(&auth, store.as_ref()).unwrap();
    let outcome = session.logout().await;

    assert_eq!(outcome.route, Route::Login);
    assert!(outcome.server_error.unwrap().is_network());
    assert!(storage::load_token(store.as_ref()).unwrap().is_none());

    let (api, store) = offline_api(dir.path());
    let auth = AuthService::new(&api);
    let relaunched = Session::restore(&auth, store.as_ref()).unwrap();
    assert_eq!(relaunched.entry_route(), Route::Login);
}

// =============================================================================
// Services
// =============================================================================

#[tokio::test]
async fn test_signed_out_screens_need_login() {
    let dir = tempfile::tempdir().unwrap();
    let (api, _store) = offline_api(dir.path());

    let err = ProfileService::new(&api).profile().await.unwrap_err();
    assert!(matches!(err, ClientError::MissingToken));
    assert!(err.requires_login());

    let err = OrderService::new(&api).orders().await.unwrap_err();
    assert!(matches!(err, ClientError::MissingToken));

    let err = StoreService::new(&api).stores().await.unwrap_err();
    assert!(matches!(err, ClientError::MissingToken));
}

#[tokio::test]
async fn test_payment_channels_fall_back_to_cash() {
    let dir = tempfile::tempdir().unwrap();
    let (api, store) = offline_api(dir.path());
    sign_in_offline(store.as_ref());

    let channels = PaymentService::new(&api).payment_channels().await;
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].code, CASH_CODE);
    assert!(channels[0].method().is_cash());
}

#[tokio::test]
async fn test_invalid_order_is_rejected_before_sending() {
    let dir = tempfile::tempdir().unwrap();
    let (api, _store) = offline_api(dir.path());

    let request = CreateOrderRequest {
        store_id: StoreId::new("3"),
        items: Vec::new(),
        payment_method: PaymentMethod::Cash,
        notes: None,
    };
    let err = OrderService::new(&api)
        .create_order(&request)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest(_)));
    assert_eq!(err.to_string(), "Order must contain at least one item");
}

#[tokio::test]
async fn test_home_feed_reports_each_source() {
    let dir = tempfile::tempdir().unwrap();
    let (api, store) = offline_api(dir.path());
    sign_in_offline(store.as_ref());
    let location = StaticLocation::new(Some(Coordinates {
        latitude: -7.797,
        longitude: 110.370,
    }));

    let feed = HomeFeed::load(
        &ProfileService::new(&api),
        &StoreService::new(&api),
        &MenuService::new(&api),
        &location,
        5.0,
    )
    .await;

    assert!(feed.location.is_ok());
    assert!(feed.profile.as_ref().unwrap_err().is_network());
    assert!(feed.nearby.as_ref().unwrap_err().is_network());
    assert!(feed.recommendations.as_ref().unwrap_err().is_network());
    assert!(feed.is_complete_failure());
    assert!(!feed.requires_login());
}
