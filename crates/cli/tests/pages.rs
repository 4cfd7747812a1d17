//! Page facades against the in-memory application.

use std::time::Duration;

use authcheck::testing::{MockAction, MockBrowser};
use authcheck::{BrowserLike, Wait, WaitOutcome};
use authcheck_cli::pages::{HomePage, SignInPage, SignUpPage, WelcomePage};
use authcheck_cli::testing::{
	FixtureApp, MSG_INVALID_CREDENTIALS, MSG_PASSWORD_MISMATCH, MSG_PASSWORD_TOO_SHORT, MSG_SIGN_IN_REQUIRED,
};

const BASE: &str = "http://localhost:3000";

async fn open(app: &FixtureApp, path: &str) -> MockBrowser {
	let browser = app.browser();
	browser.goto(&format!("{BASE}{path}")).await.unwrap();
	browser
}

#[tokio::test(start_paused = true)]
async fn home_is_displayed_once_rendered_within_budget() {
	let app = FixtureApp::new().with_render_delay(Duration::from_secs(3));
	let browser = open(&app, "/").await;
	let home = HomePage::new(&browser);

	let start = tokio::time::Instant::now();
	assert!(home.is_displayed().await);
	assert!(start.elapsed() >= Duration::from_secs(3));
	assert!(start.elapsed() < Duration::from_secs(10));
	assert_eq!(home.heading_text().await.unwrap(), "MERN Auth App");
}

#[tokio::test(start_paused = true)]
async fn home_is_not_displayed_when_render_exceeds_budget() {
	let app = FixtureApp::new().with_render_delay(Duration::from_secs(30));
	let browser = open(&app, "/").await;
	let home = HomePage::new(&browser);

	let start = tokio::time::Instant::now();
	assert!(!home.is_displayed().await);
	assert!(start.elapsed() >= Duration::from_secs(10));
	assert!(start.elapsed() < Duration::from_secs(11));

	let state = HomePage::with_wait(&browser, Wait::new(Duration::from_secs(2))).is_displayed_state().await.unwrap();
	assert!(matches!(state, WaitOutcome::Absent { .. }));
}

#[tokio::test(start_paused = true)]
async fn every_screen_reports_not_displayed_on_the_wrong_route() {
	let app = FixtureApp::new();
	let browser = open(&app, "/").await;
	let short = Wait::new(Duration::from_secs(1));

	assert!(HomePage::with_wait(&browser, short).is_displayed().await);
	assert!(!SignInPage::with_wait(&browser, short).is_displayed().await);
	assert!(!SignUpPage::with_wait(&browser, short).is_displayed().await);
	assert!(!WelcomePage::with_wait(&browser, short).is_displayed().await);
}

#[tokio::test(start_paused = true)]
async fn home_buttons_navigate() {
	let app = FixtureApp::new();
	let browser = open(&app, "/").await;

	HomePage::new(&browser).click_sign_in().await.unwrap();
	assert_eq!(browser.path(), "/signin");
	assert!(SignInPage::new(&browser).is_displayed().await);

	browser.goto(&format!("{BASE}/")).await.unwrap();
	HomePage::new(&browser).click_sign_up().await.unwrap();
	assert_eq!(browser.path(), "/signup");
	assert!(SignUpPage::new(&browser).is_displayed().await);
}

#[tokio::test(start_paused = true)]
async fn forms_expose_all_fields() {
	let app = FixtureApp::new().with_render_delay(Duration::from_millis(800));
	let browser = open(&app, "/signup").await;
	assert!(SignUpPage::new(&browser).has_all_fields().await);

	let browser = open(&app, "/signin").await;
	assert!(SignInPage::new(&browser).has_all_fields().await);
}

#[tokio::test(start_paused = true)]
async fn sign_in_with_invalid_credentials_shows_error() {
	let app = FixtureApp::new().with_error_delay(Duration::from_secs(2));
	let browser = open(&app, "/signin").await;
	let page = SignInPage::new(&browser);

	page.sign_in("invalid@email.com", "wrongpassword").await.unwrap();
	assert!(page.is_error_message_displayed().await);
	assert_eq!(page.error_message().await, MSG_INVALID_CREDENTIALS);
	assert_eq!(browser.path(), "/signin");
}

#[tokio::test(start_paused = true)]
async fn sign_in_with_empty_fields_shows_required_error() {
	let app = FixtureApp::new();
	let browser = open(&app, "/signin").await;
	let page = SignInPage::new(&browser);

	page.click_sign_in().await.unwrap();
	assert_eq!(page.error_message().await, MSG_SIGN_IN_REQUIRED);
}

#[tokio::test(start_paused = true)]
async fn sign_in_with_valid_credentials_reaches_welcome() {
	let app = FixtureApp::new().with_profile_delay(Duration::from_secs(1));
	app.add_account("Test User", "user@example.com", "password123");
	let browser = open(&app, "/signin").await;

	SignInPage::new(&browser).sign_in("user@example.com", "password123").await.unwrap();
	let welcome = WelcomePage::new(&browser);
	assert!(welcome.is_displayed().await);
	assert_eq!(welcome.welcome_message().await.unwrap(), "Welcome Test User!");
	assert!(welcome.welcome_message_contains_name("Test User").await.unwrap());
	assert_eq!(welcome.user_name().await, "Test User");
	assert_eq!(welcome.user_name_state().await.unwrap(), WaitOutcome::Met("Test User".to_string()));
	assert_eq!(welcome.user_email().await, "user@example.com");
}

#[tokio::test(start_paused = true)]
async fn sign_in_fills_fields_in_order() {
	let app = FixtureApp::new();
	let browser = open(&app, "/signin").await;

	SignInPage::new(&browser).sign_in("a@b.c", "secret").await.unwrap();
	let typed: Vec<_> = browser
		.actions()
		.into_iter()
		.filter_map(|a| match a {
			MockAction::SendKeys { key, text } => Some((key, text)),
			_ => None,
		})
		.collect();
	assert_eq!(
		typed,
		vec![("email".to_string(), "a@b.c".to_string()), ("password".to_string(), "secret".to_string())]
	);
	assert_eq!(browser.actions().last(), Some(&MockAction::Click("submit".into())));
}

#[tokio::test(start_paused = true)]
async fn sign_up_validation_errors() {
	let app = FixtureApp::new();

	let browser = open(&app, "/signup").await;
	let page = SignUpPage::new(&browser);
	page.sign_up("Test User", "test@example.com", "password123", "password456").await.unwrap();
	assert!(page.is_error_message_displayed().await);
	assert_eq!(page.error_message().await, MSG_PASSWORD_MISMATCH);

	let browser = open(&app, "/signup").await;
	let page = SignUpPage::new(&browser);
	page.sign_up("Test User", "test@example.com", "123", "123").await.unwrap();
	assert_eq!(page.error_message().await, MSG_PASSWORD_TOO_SHORT);
	assert_eq!(app.account_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn error_message_is_empty_when_no_error_appears() {
	let app = FixtureApp::new();
	let browser = open(&app, "/signin").await;
	let page = SignInPage::with_wait(&browser, Wait::new(Duration::from_secs(2)));

	assert!(!page.is_error_message_displayed().await);
	assert_eq!(page.error_message().await, "");
	assert!(matches!(page.error_message_state().await.unwrap(), WaitOutcome::Absent { .. }));
}

#[tokio::test(start_paused = true)]
async fn error_after_budget_is_not_seen() {
	let app = FixtureApp::new().with_error_delay(Duration::from_secs(20));
	let browser = open(&app, "/signin").await;
	let page = SignInPage::new(&browser);

	page.sign_in("invalid@email.com", "wrongpassword").await.unwrap();
	assert!(!page.is_error_message_displayed().await);
}

#[tokio::test(start_paused = true)]
async fn links_between_forms() {
	let app = FixtureApp::new();
	let browser = open(&app, "/signin").await;

	SignInPage::new(&browser).click_sign_up_link().await.unwrap();
	assert!(SignUpPage::new(&browser).is_displayed().await);

	SignUpPage::new(&browser).click_sign_in_link().await.unwrap();
	assert!(SignInPage::new(&browser).is_displayed().await);
}

#[tokio::test(start_paused = true)]
async fn titles_contain_app_name() {
	let app = FixtureApp::new();
	for path in ["/", "/signin", "/signup"] {
		let browser = open(&app, path).await;
		assert!(browser.title().await.unwrap().contains("MERN"), "title on {path}");
	}
	let browser = open(&app, "/").await;
	assert!(HomePage::new(&browser).title().await.unwrap().contains("MERN"));
	let browser = open(&app, "/signin").await;
	assert!(SignInPage::new(&browser).title().await.unwrap().contains("MERN"));
	let browser = open(&app, "/signup").await;
	assert!(SignUpPage::new(&browser).title().await.unwrap().contains("MERN"));

	app.add_account("Test User", "user@example.com", "password123");
	let browser = open(&app, "/signin").await;
	SignInPage::new(&browser).sign_in("user@example.com", "password123").await.unwrap();
	let welcome = WelcomePage::new(&browser);
	assert!(welcome.is_displayed().await);
	assert!(welcome.title().await.unwrap().contains("MERN"), "title on /welcome");
}

#[tokio::test(start_paused = true)]
async fn fill_on_missing_field_times_out() {
	let app = FixtureApp::new();
	let browser = open(&app, "/").await;
	let page = SignInPage::with_wait(&browser, Wait::new(Duration::from_secs(1)));

	let err = page.enter_email("user@example.com").await.unwrap_err();
	assert!(err.is_timeout());
	assert_eq!(err.to_string(), "Element not found within 1000ms: name=email");
}

#[tokio::test(start_paused = true)]
async fn welcome_without_token_redirects_to_sign_in() {
	let app = FixtureApp::new();
	let browser = open(&app, "/welcome").await;

	assert_eq!(browser.path(), "/signin");
	assert!(SignInPage::new(&browser).is_displayed().await);
	assert_eq!(WelcomePage::with_wait(&browser, Wait::new(Duration::from_secs(1))).user_name().await, "");
}

#[tokio::test(start_paused = true)]
async fn logout_lands_on_sign_in() {
	let app = FixtureApp::new();
	let browser = open(&app, "/signup").await;

	SignUpPage::new(&browser)
		.sign_up("Test User", "new@example.com", "password123", "password123")
		.await
		.unwrap();
	let welcome = WelcomePage::new(&browser);
	assert!(welcome.is_displayed().await);

	welcome.click_logout().await.unwrap();
	assert!(SignInPage::new(&browser).is_displayed().await);
	assert_eq!(browser.path(), "/signin");
}
