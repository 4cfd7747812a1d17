//! Session lifecycle against a stub WebDriver endpoint.

mod common;

use std::time::Duration;

use authcheck::{BrowserLike, DriverEndpoint, Error, ErrorCode, LaunchConfig, LaunchOptions, Locator, Session, SessionProvider, Wait, WaitOutcome, scoped};
use common::{StubDriver, StubState};

fn remote(url: &str) -> LaunchConfig {
	LaunchConfig {
		driver: DriverEndpoint::Remote(url.to_string()),
		request_timeout: Duration::from_secs(5),
		..LaunchConfig::default()
	}
}

#[tokio::test]
async fn acquire_creates_session_and_maximises() {
	let stub = StubDriver::start().await;
	let session = Session::acquire(&remote(&stub.url)).await.unwrap();

	assert_eq!(session.id(), "stub-1");
	{
		let state = stub.state.lock();
		assert_eq!(state.created, 1);
		assert_eq!(state.maximized, 1);
		let args = &state.capabilities[0]["capabilities"]["alwaysMatch"]["goog:chromeOptions"]["args"];
		assert!(args.as_array().unwrap().iter().any(|a| a == "--headless"));
		assert!(args.as_array().unwrap().iter().any(|a| a == "--window-size=1920,1080"));
	}
	session.release().await.unwrap();
}

#[tokio::test]
async fn maximise_can_be_disabled() {
	let stub = StubDriver::start().await;
	let mut config = remote(&stub.url);
	config.maximize = false;
	config.options = LaunchOptions::headed();

	let session = Session::acquire(&config).await.unwrap();
	assert_eq!(stub.state.lock().maximized, 0);
	assert!(stub.state.lock().capabilities[0]["capabilities"]["alwaysMatch"]["goog:chromeOptions"].get("args").is_none());
	session.release().await.unwrap();
}

#[tokio::test]
async fn release_twice_deletes_once() {
	let stub = StubDriver::start().await;
	let session = Session::acquire(&remote(&stub.url)).await.unwrap();

	session.release().await.unwrap();
	session.release().await.unwrap();

	assert!(session.is_released());
	assert_eq!(stub.state.lock().deleted, 1);
	assert!(stub.state.lock().live.is_empty());
}

#[tokio::test]
async fn operations_after_release_fail_locally() {
	let stub = StubDriver::start().await;
	let session = Session::acquire(&remote(&stub.url)).await.unwrap();
	session.release().await.unwrap();

	let err = session.title().await.unwrap_err();
	assert!(matches!(err, Error::SessionClosed(ref op) if op == "title"));
}

#[tokio::test]
async fn commands_round_trip_through_driver() {
	let stub = StubDriver::start().await;
	let session = Session::acquire(&remote(&stub.url)).await.unwrap();

	session.goto("http://localhost:3000/signin").await.unwrap();
	assert_eq!(session.current_url().await.unwrap(), "http://localhost:3000/signin");
	assert_eq!(session.title().await.unwrap(), "MERN Auth App");

	let email = session.find_elements(&Locator::name("email")).await.unwrap().remove(0);
	assert!(session.is_displayed(&email).await.unwrap());
	assert!(session.is_enabled(&email).await.unwrap());
	session.clear(&email).await.unwrap();
	session.send_keys(&email, "user@example.com").await.unwrap();
	assert_eq!(session.text(&email).await.unwrap(), "user@example.com");
	session.click(&email).await.unwrap();
	assert_eq!(stub.state.lock().clicks, vec!["email-1".to_string()]);

	assert!(session.find_elements(&Locator::class_name("error-message")).await.unwrap().is_empty());
	session.release().await.unwrap();
}

#[tokio::test]
async fn driver_errors_are_typed() {
	let stub = StubDriver::start().await;
	let session = Session::acquire(&remote(&stub.url)).await.unwrap();

	let button = session.find_elements(&Locator::xpath("//button")).await.unwrap().remove(0);
	let err = session.click(&button).await.unwrap_err();
	assert!(err.is_stale_element());

	let err = session.find_elements(&Locator::xpath("//*[")).await.unwrap_err();
	assert_eq!(err.remote_code(), Some(ErrorCode::InvalidSelector));
	assert_eq!(err.to_string(), "invalid selector: invalid xpath");

	// Stack trace is empty in the stub and should not be kept.
	assert!(err.stack_trace().is_none());
	session.release().await.unwrap();
}

#[tokio::test]
async fn waits_run_against_live_sessions() {
	let stub = StubDriver::start().await;
	let session = Session::acquire(&remote(&stub.url)).await.unwrap();
	let wait = Wait::new(Duration::from_millis(200)).with_poll_interval(Duration::from_millis(50));

	let outcome = wait.visible(&session, &Locator::name("email")).await.unwrap();
	assert!(outcome.is_met());

	let outcome = wait.visible(&session, &Locator::name("missing")).await.unwrap();
	assert!(matches!(outcome, WaitOutcome::Absent { .. }));

	let outcome = wait.visible(&session, &Locator::xpath("//button")).await.unwrap();
	assert!(matches!(outcome, WaitOutcome::TimedOut { .. }));
	session.release().await.unwrap();
}

#[tokio::test]
async fn session_not_created_is_a_launch_error() {
	let stub = StubDriver::start_with(StubState {
		fail_sessions: true,
		..StubState::default()
	})
	.await;

	let err = Session::acquire(&remote(&stub.url)).await.unwrap_err();
	assert!(err.is_launch_error());
	assert_eq!(err.remote_code(), Some(ErrorCode::SessionNotCreated));
}

#[tokio::test]
async fn unready_driver_is_a_launch_error() {
	let stub = StubDriver::start_with(StubState {
		not_ready: true,
		..StubState::default()
	})
	.await;

	let err = Session::acquire(&remote(&stub.url)).await.unwrap_err();
	assert!(err.is_launch_error());
	assert!(err.to_string().contains("not ready"));
}

#[tokio::test]
async fn unreachable_remote_is_a_launch_error() {
	let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
	let Err(err) = remote(&format!("http://127.0.0.1:{port}")).acquire().await else {
		panic!("acquire should fail");
	};
	assert!(err.is_launch_error());
}

#[tokio::test]
async fn missing_driver_executable_is_a_launch_error() {
	let config = LaunchConfig {
		driver: DriverEndpoint::Spawn {
			executable: Some("/nonexistent/chromedriver".into()),
			port: None,
		},
		..LaunchConfig::default()
	};
	let Err(err) = config.acquire().await else {
		panic!("acquire should fail");
	};
	assert!(err.is_launch_error());
	assert!(err.to_string().contains("does not exist"), "{err}");
}

#[tokio::test]
async fn scoped_session_is_released_through_provider() {
	let stub = StubDriver::start().await;
	let config = remote(&stub.url);

	let title = scoped(&config, |browser| Box::pin(async move { browser.title().await })).await.unwrap().unwrap();

	assert_eq!(title, "MERN Auth App");
	assert_eq!(stub.state.lock().created, 1);
	assert_eq!(stub.state.lock().deleted, 1);
}
