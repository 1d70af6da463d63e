//! WebDriver over HTTP
//!
//! Drives the reqwest transport and the typed session client against the
//! mock Appium server.

mod common;

use droid_pilot::gestures::swipe_until_element_appears;
use droid_pilot::harness::{RemoteSessionFactory, SessionFixture};
use droid_pilot::webdriver::{
    HttpTransport, Locator, MockDevice, MockElement, RemoteSession, WebDriverClient, WindowSize,
};
use droid_pilot::Error;
use mock_appium::{ElementFormat, MockAppiumServer};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

async fn open_session(server: &MockAppiumServer) -> RemoteSession {
    let transport = Arc::new(HttpTransport::new(server.url(), Duration::from_secs(5)).unwrap());
    RemoteSession::create(transport, Map::new()).await.unwrap()
}

fn single_button() -> MockDevice {
    MockDevice::new(WindowSize::new(720.0, 1280.0), "main")
        .with_element(MockElement::new(Locator::id("go"), "main").text("  Go  "))
}

#[tokio::test]
async fn test_fixture_negotiates_isolated_session() {
    let server = MockAppiumServer::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::fast_config(server.url(), dir.path());
    config
        .capabilities
        .insert("appium:noReset".to_string(), Value::Bool(true));

    let fixture = SessionFixture::open(&RemoteSessionFactory, &config).await.unwrap();

    let created = server.calls_to("POST", "/session");
    assert_eq!(created.len(), 1);
    let caps = &created[0].body["capabilities"]["alwaysMatch"];
    assert_eq!(caps["appium:noReset"], false);
    assert_eq!(caps["platformName"], "Android");

    let timeouts = server.calls_to("POST", "/timeouts");
    assert_eq!(timeouts.len(), 1);
    assert_eq!(timeouts[0].body["implicit"], 2000);

    fixture.close().await.unwrap();
    assert!(server.devices()[0].is_quit());
}

#[tokio::test]
async fn test_scroll_search_over_http() {
    let server = MockAppiumServer::start().await.unwrap();
    let session = open_session(&server).await;

    let found = swipe_until_element_appears(
        &session,
        &Locator::accessibility_id("Views"),
        10,
        "up",
        Duration::from_millis(500),
        Duration::ZERO,
    )
    .await
    .unwrap();
    assert!(found.is_some());

    let device = server.devices()[0].clone();
    let swipes = device.swipes();
    assert_eq!(swipes.len(), 2);
    assert_eq!((swipes[0].start.x, swipes[0].start.y), (540.0, 1536.0));
    assert_eq!((swipes[0].end.x, swipes[0].end.y), (540.0, 384.0));
    assert_eq!(swipes[0].duration, Duration::from_millis(500));

    // the viewport is measured once per search
    assert_eq!(server.calls_to("GET", "/window/rect").len(), 1);
}

#[tokio::test]
async fn test_invalid_direction_sends_nothing() {
    let server = MockAppiumServer::start().await.unwrap();
    let session = open_session(&server).await;
    let before = server.calls().len();

    let result = swipe_until_element_appears(
        &session,
        &Locator::accessibility_id("Views"),
        10,
        "sideways",
        Duration::from_millis(500),
        Duration::ZERO,
    )
    .await;

    assert!(matches!(result, Err(Error::InvalidDirection(_))));
    assert_eq!(server.calls().len(), before);
}

#[tokio::test]
async fn test_missing_element_maps_to_not_found() {
    let server = MockAppiumServer::start().await.unwrap();
    let session = open_session(&server).await;

    let err = session
        .find_element(&Locator::id("nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ElementNotFound(ref m) if m.contains("nope")));
    assert!(err.is_absence());
}

#[tokio::test]
async fn test_element_reference_formats() {
    for format in [ElementFormat::W3c, ElementFormat::Legacy, ElementFormat::Raw] {
        let server = MockAppiumServer::start_with(single_button, format).await.unwrap();
        let session = open_session(&server).await;

        let go = session.find_element(&Locator::id("go")).await.unwrap();
        assert!(session.is_displayed(&go).await.unwrap(), "{:?}", format);
        assert_eq!(session.text(&go).await.unwrap(), "  Go  ");

        let all = session.find_elements(&Locator::id("go")).await.unwrap();
        assert_eq!(all, vec![go]);
    }
}

#[tokio::test]
async fn test_text_geometry_and_screenshot() {
    let server = MockAppiumServer::start().await.unwrap();
    let session = open_session(&server).await;

    assert_eq!(
        session.window_size().await.unwrap(),
        WindowSize::new(1080.0, 1920.0)
    );

    let png = session.screenshot().await.unwrap();
    assert_eq!(&png[..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);

    let source = session.page_source().await.unwrap();
    assert!(source.contains("screen=\"home\""));

    let app = session.find_element(&Locator::accessibility_id("App")).await.unwrap();
    session.click(&app).await.unwrap();
    assert!(matches!(
        session.is_displayed(&app).await,
        Err(Error::StaleElement(_))
    ));

    session.back().await.unwrap();
    assert!(session.is_displayed(&app).await.unwrap());
}

#[tokio::test]
async fn test_quit_invalidates_session() {
    let server = MockAppiumServer::start().await.unwrap();
    let session = open_session(&server).await;

    session.quit().await.unwrap();
    let err = session.window_size().await.unwrap_err();
    assert!(matches!(err, Error::SessionNotFound(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    // bind then drop to get a port nobody listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let transport = Arc::new(
        HttpTransport::new(format!("http://127.0.0.1:{}", port), Duration::from_secs(2)).unwrap(),
    );

    let err = RemoteSession::create(transport, Map::new()).await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}
