//! Form validation errors.

use authcheck::BoxFut;

use super::{ScenarioCtx, ScenarioResult};

pub(super) fn sign_in_invalid_credentials(ctx: ScenarioCtx<'_>) -> BoxFut<'_, ScenarioResult> {
	Box::pin(async move {
		ctx.open("/signin").await?;
		let page = ctx.sign_in();
		page.sign_in("invalid@email.com", "wrongpassword").await?;

		check!(
			page.is_error_message_displayed().await,
			"Error message should be displayed for invalid credentials"
		);
		Ok(())
	})
}

pub(super) fn sign_up_mismatched_passwords(ctx: ScenarioCtx<'_>) -> BoxFut<'_, ScenarioResult> {
	Box::pin(async move {
		ctx.open("/signup").await?;
		let page = ctx.sign_up();
		page.sign_up("Test User", "test@example.com", "password123", "password456").await?;

		check!(
			page.is_error_message_displayed().await,
			"Error message should be displayed for mismatched passwords"
		);
		let message = page.error_message().await;
		check!(!message.is_empty(), "Error message for mismatched passwords should not be empty");
		Ok(())
	})
}

pub(super) fn sign_up_short_password(ctx: ScenarioCtx<'_>) -> BoxFut<'_, ScenarioResult> {
	Box::pin(async move {
		ctx.open("/signup").await?;
		let page = ctx.sign_up();
		page.sign_up("Test User", "test@example.com", "123", "123").await?;

		check!(page.is_error_message_displayed().await, "Error message should be displayed for short password");
		let message = page.error_message().await;
		check!(!message.is_empty(), "Error message for short password should not be empty");
		Ok(())
	})
}
