//! Screen rendering and navigation between unauthenticated screens.

use authcheck::BoxFut;

use super::{ScenarioCtx, ScenarioResult};

pub(super) fn home_page_displayed(ctx: ScenarioCtx<'_>) -> BoxFut<'_, ScenarioResult> {
	Box::pin(async move {
		ctx.open("/").await?;
		let home = ctx.home();

		check!(home.is_displayed().await, "Home page should be displayed");
		check_eq!(home.heading_text().await?, "MERN Auth App", "Heading should match");
		let title = home.title().await?;
		check!(title.contains("MERN"), "Page title should contain MERN, got {title:?}");
		Ok(())
	})
}

pub(super) fn sign_in_button_navigation(ctx: ScenarioCtx<'_>) -> BoxFut<'_, ScenarioResult> {
	Box::pin(async move {
		ctx.open("/").await?;
		ctx.home().click_sign_in().await?;

		check!(ctx.sign_in().is_displayed().await, "Sign In page should be displayed");
		Ok(())
	})
}

pub(super) fn sign_up_button_navigation(ctx: ScenarioCtx<'_>) -> BoxFut<'_, ScenarioResult> {
	Box::pin(async move {
		ctx.open("/").await?;
		ctx.home().click_sign_up().await?;

		check!(ctx.sign_up().is_displayed().await, "Sign Up page should be displayed");
		Ok(())
	})
}

pub(super) fn sign_up_page_fields(ctx: ScenarioCtx<'_>) -> BoxFut<'_, ScenarioResult> {
	Box::pin(async move {
		ctx.open("/signup").await?;
		let page = ctx.sign_up();

		check!(page.is_displayed().await, "Sign Up page should be displayed");
		check!(page.has_all_fields().await, "Sign Up page should show name, email, password, confirm password and submit");
		Ok(())
	})
}

pub(super) fn sign_in_page_fields(ctx: ScenarioCtx<'_>) -> BoxFut<'_, ScenarioResult> {
	Box::pin(async move {
		ctx.open("/signin").await?;
		let page = ctx.sign_in();

		check!(page.is_displayed().await, "Sign In page should be displayed");
		check!(page.has_all_fields().await, "Sign In page should show email, password and submit");
		Ok(())
	})
}

pub(super) fn sign_in_links_to_sign_up(ctx: ScenarioCtx<'_>) -> BoxFut<'_, ScenarioResult> {
	Box::pin(async move {
		ctx.open("/signin").await?;
		ctx.sign_in().click_sign_up_link().await?;

		check!(ctx.sign_up().is_displayed().await, "Should navigate to Sign Up page from Sign In page");
		Ok(())
	})
}

pub(super) fn sign_up_links_to_sign_in(ctx: ScenarioCtx<'_>) -> BoxFut<'_, ScenarioResult> {
	Box::pin(async move {
		ctx.open("/signup").await?;
		ctx.sign_up().click_sign_in_link().await?;

		check!(ctx.sign_in().is_displayed().await, "Should navigate to Sign In page from Sign Up page");
		Ok(())
	})
}

pub(super) fn sign_in_page_title(ctx: ScenarioCtx<'_>) -> BoxFut<'_, ScenarioResult> {
	Box::pin(async move {
		ctx.open("/signin").await?;
		let title = ctx.sign_in().title().await?;

		check!(title.contains("MERN"), "Page title should contain MERN, got {title:?}");
		Ok(())
	})
}

pub(super) fn sign_up_page_title(ctx: ScenarioCtx<'_>) -> BoxFut<'_, ScenarioResult> {
	Box::pin(async move {
		ctx.open("/signup").await?;
		let title = ctx.sign_up().title().await?;

		check!(title.contains("MERN"), "Page title should contain MERN, got {title:?}");
		Ok(())
	})
}
