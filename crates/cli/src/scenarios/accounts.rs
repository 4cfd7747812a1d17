//! Flows that register real accounts in the application under test.

use authcheck::BoxFut;

use super::{ScenarioCtx, ScenarioResult, unique_email};

const NAME: &str = "Test User";
const PASSWORD: &str = "password123";

/// Registers a fresh account and checks Welcome greets it. Returns the email.
async fn register(ctx: &ScenarioCtx<'_>) -> Result<String, super::ScenarioError> {
	let email = unique_email();
	ctx.open("/signup").await?;
	ctx.sign_up().sign_up(NAME, &email, PASSWORD, PASSWORD).await?;

	let welcome = ctx.welcome();
	check!(welcome.is_displayed().await, "Welcome page should be displayed after registration");
	check!(
		welcome.welcome_message_contains_name(NAME).await?,
		"Welcome message should greet {NAME:?}"
	);
	Ok(email)
}

pub(super) fn register_lands_on_welcome(ctx: ScenarioCtx<'_>) -> BoxFut<'_, ScenarioResult> {
	Box::pin(async move {
		let email = register(&ctx).await?;
		let welcome = ctx.welcome();

		check_eq!(welcome.user_name().await, NAME, "Displayed user name");
		check_eq!(welcome.user_email().await, email, "Displayed user email");
		Ok(())
	})
}

pub(super) fn logout_then_sign_in(ctx: ScenarioCtx<'_>) -> BoxFut<'_, ScenarioResult> {
	Box::pin(async move {
		let email = register(&ctx).await?;

		ctx.welcome().click_logout().await?;
		let sign_in = ctx.sign_in();
		check!(sign_in.is_displayed().await, "Logout should land on the Sign In page");

		sign_in.sign_in(&email, PASSWORD).await?;
		let welcome = ctx.welcome();
		check!(welcome.is_displayed().await, "Signing back in should land on the Welcome page");
		check!(
			welcome.welcome_message_contains_name(NAME).await?,
			"Welcome message should greet {NAME:?} after signing back in"
		);
		Ok(())
	})
}
