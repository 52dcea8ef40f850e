//! Terminal front-end: renders the active screen and feeds line-based input
//! into the screen controllers.

use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::admin::AdminSettingsForm;
use crate::app::controller::SCHOOL_URL;
use crate::app::{AppController, AppEvent, Screen};
use crate::chat::models::Role;
use crate::chat::screen::{NO_TOKENS_BODY, NO_TOKENS_TITLE};
use crate::chat::{ChatScreen, SendError};
use crate::common::AppContext;
use crate::screens::{
    summary_rows, AuthForm, OnboardingScreen, PaywallScreen, ProfileSetupForm, CLASSES, HEARD_FROM,
};
use crate::theme::{TokenBand, DARK};

type Input = Lines<BufReader<Stdin>>;

const RESET: &str = "\x1b[0m";

/// Truecolor escape for a `#RRGGBB` palette entry.
fn ansi_fg(hex: &str) -> String {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 {
        return String::new();
    }
    let r = u8::from_str_radix(&h[0..2], 16).unwrap_or(255);
    let g = u8::from_str_radix(&h[2..4], 16).unwrap_or(255);
    let b = u8::from_str_radix(&h[4..6], 16).unwrap_or(255);
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

async fn prompt(input: &mut Input, label: &str) -> io::Result<Option<String>> {
    print!("{}: ", label);
    io::stdout().flush()?;
    input.next_line().await
}

/// Run the app: restore the session, then loop over the screen machine until
/// the user quits or stdin closes.
pub async fn run(ctx: AppContext) -> io::Result<()> {
    let mut controller = AppController::new();
    controller.load_website_url(&ctx.store).await;
    ctx.auth.restore().await;
    controller.sync_with_session(&ctx.auth.state());

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let quit = match controller.screen {
            Screen::Onboarding => run_onboarding(&mut controller, &mut input).await?,
            Screen::Auth => run_auth(&ctx, &mut controller, &mut input).await?,
            Screen::ProfileSetup => run_profile_setup(&ctx, &mut controller, &mut input).await?,
            Screen::Paywall => run_paywall(&ctx, &mut controller, &mut input).await?,
            Screen::Main => run_chat(&ctx, &mut controller, &mut input).await?,
        };
        if quit {
            return Ok(());
        }
        controller.sync_with_session(&ctx.auth.state());
    }
}

async fn run_onboarding(controller: &mut AppController, input: &mut Input) -> io::Result<bool> {
    let mut screen = OnboardingScreen::new();
    loop {
        let page = screen.current();
        println!("\n{}{}{}", ansi_fg(DARK.primary), page.title, RESET);
        println!("{}", page.description);
        let Some(line) = prompt(input, "[enter] next, 'skip' to skip").await? else {
            return Ok(true);
        };
        if line.trim() == "skip" || screen.next() {
            controller.handle(AppEvent::OnboardingComplete);
            return Ok(false);
        }
    }
}

async fn run_auth(
    ctx: &AppContext,
    controller: &mut AppController,
    input: &mut Input,
) -> io::Result<bool> {
    let mut form = AuthForm::new();
    loop {
        println!("\n{}{}{}", ansi_fg(DARK.primary), form.title(), RESET);
        let Some(email) = prompt(input, "Email ('switch' to toggle sign-in/sign-up)").await?
        else {
            return Ok(true);
        };
        if email.trim() == "switch" {
            form.toggle_mode();
            continue;
        }
        form.email = email.trim().to_string();
        let Some(password) = prompt(input, "Password").await? else {
            return Ok(true);
        };
        form.password = password;

        match form.submit(&ctx.auth).await {
            Ok(()) => {
                controller.handle(AppEvent::AuthComplete);
                return Ok(false);
            }
            Err(e) => println!("{}Error: {}{}", ansi_fg(DARK.error), e, RESET),
        }
    }
}

async fn run_profile_setup(
    ctx: &AppContext,
    controller: &mut AppController,
    input: &mut Input,
) -> io::Result<bool> {
    let mut form = ProfileSetupForm::new();
    loop {
        println!("\n{}Set up your profile{}", ansi_fg(DARK.primary), RESET);
        let Some(name) = prompt(input, "Full name").await? else {
            return Ok(true);
        };
        form.full_name = name;
        form.class_index = pick(input, "Class", &CLASSES).await?.unwrap_or(0);
        form.heard_from_index = pick(input, "How did you hear about us", &HEARD_FROM)
            .await?
            .unwrap_or(0);

        match form.submit(&ctx.auth).await {
            Ok(()) => {
                controller.handle(AppEvent::ProfileSaved);
                return Ok(false);
            }
            Err(e) => println!("{}Error: {}{}", ansi_fg(DARK.error), e, RESET),
        }
    }
}

async fn pick(input: &mut Input, label: &str, options: &[&str]) -> io::Result<Option<usize>> {
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }
    let Some(line) = prompt(input, label).await? else {
        return Ok(None);
    };
    let index = line
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .filter(|n| *n < options.len());
    Ok(index)
}

async fn run_paywall(
    ctx: &AppContext,
    controller: &mut AppController,
    input: &mut Input,
) -> io::Result<bool> {
    let paywall = PaywallScreen;
    loop {
        println!("\n{}Choose a plan{}", ansi_fg(DARK.primary), RESET);
        println!("  1. Unlock Unlimited Access");
        println!("  2. Try for Free (10 tokens/day)");
        let Some(choice) = prompt(input, "Plan").await? else {
            return Ok(true);
        };
        let result = match choice.trim() {
            "1" => paywall.unlock_access(&ctx.auth).await.map(|notice| {
                println!("{}", notice);
            }),
            "2" => paywall.choose_free(&ctx.auth).await,
            _ => continue,
        };
        match result {
            Ok(()) => {
                controller.handle(AppEvent::PlanChosen);
                return Ok(false);
            }
            Err(e) => println!("{}Error: {}{}", ansi_fg(DARK.error), e, RESET),
        }
    }
}

fn print_message(message: &crate::chat::ChatMessage) {
    let (color, label) = match message.role {
        Role::User => (DARK.user_bubble, "you"),
        Role::Assistant => (DARK.accent, "ai"),
    };
    println!("{}[{}]{} {}", ansi_fg(color), label, RESET, message.text);
    if let Some(youtube) = &message.youtube {
        println!("    video: {}", youtube);
    }
    if let Some(source) = &message.source_url {
        println!("    source: {}", source);
    }
}

fn print_token_balance(ctx: &AppContext) {
    let tokens = ctx.auth.state().user.map(|u| u.tokens_day).unwrap_or(0);
    let band = TokenBand::for_balance(tokens);
    println!(
        "{}Tokens remaining: {}{}",
        ansi_fg(band.color(&DARK)),
        tokens,
        RESET
    );
}

async fn run_chat(
    ctx: &AppContext,
    controller: &mut AppController,
    input: &mut Input,
) -> io::Result<bool> {
    let mut screen = ChatScreen::new(ctx.clone());
    screen.load_history().await;

    if screen.messages.is_empty() {
        println!("\nHi, I'm SauvonsTonExam AI");
        println!("How can I help you today?");
    } else {
        for message in &screen.messages {
            print_message(message);
        }
    }
    print_token_balance(ctx);
    println!("Commands: /profile /admin /site /school /logout /quit");

    loop {
        let Some(line) = prompt(input, ">").await? else {
            return Ok(true);
        };
        match line.trim() {
            "/quit" => return Ok(true),
            "/logout" => {
                ctx.auth.sign_out().await;
                controller.handle(AppEvent::LoggedOut);
                return Ok(false);
            }
            "/profile" => {
                if run_profile_overlay(ctx, controller, input).await? {
                    return Ok(false);
                }
            }
            "/admin" => {
                let user = ctx.auth.state().user;
                if controller.open_admin(user.as_ref()) {
                    run_admin_overlay(ctx, input).await?;
                    controller.handle(AppEvent::CloseAdmin);
                } else {
                    println!("Admin access required.");
                }
            }
            "/site" => {
                controller.handle(AppEvent::OpenWebsite);
                println!("Embedded site: {}", controller.website_url);
                controller.handle(AppEvent::CloseWebsite);
            }
            "/school" => println!("Open in browser: {}", SCHOOL_URL),
            text => match screen.send_message(text).await {
                Ok(()) => {
                    if let Some(reply) = screen.messages.last() {
                        print_message(reply);
                    }
                    print_token_balance(ctx);
                }
                Err(SendError::EmptyInput) => {}
                Err(SendError::NoTokens) => {
                    println!(
                        "{}{}{}: {}",
                        ansi_fg(DARK.error),
                        NO_TOKENS_TITLE,
                        RESET,
                        NO_TOKENS_BODY
                    );
                }
                Err(e) => println!("{}Error: {}{}", ansi_fg(DARK.error), e, RESET),
            },
        }
    }
}

/// Returns true when the user logged out from the overlay.
async fn run_profile_overlay(
    ctx: &AppContext,
    controller: &mut AppController,
    input: &mut Input,
) -> io::Result<bool> {
    controller.handle(AppEvent::OpenProfile);
    if let Some(user) = ctx.auth.state().user {
        println!();
        for (label, value) in summary_rows(&user) {
            println!("  {:<17} {}", label, value);
        }
    }
    let answer = prompt(input, "Log out? (y/N)").await?.unwrap_or_default();
    controller.handle(AppEvent::CloseProfile);
    if answer.trim().eq_ignore_ascii_case("y") {
        ctx.auth.sign_out().await;
        controller.handle(AppEvent::LoggedOut);
        return Ok(true);
    }
    Ok(false)
}

async fn run_admin_overlay(ctx: &AppContext, input: &mut Input) -> io::Result<()> {
    let mut form = AdminSettingsForm::load(&ctx.store).await;
    println!("\n{}Admin Settings{} (enter keeps the current value)", ansi_fg(DARK.primary), RESET);

    edit(input, "Chat Webhook URL", &mut form.webhook_url).await?;
    edit(input, "Headers (JSON)", &mut form.webhook_headers).await?;
    edit(input, "NotchPay Public Key", &mut form.notchpay_public_key).await?;
    edit(input, "NotchPay Private Key", &mut form.notchpay_private_key).await?;
    if let Some(answer) = prompt(input, &format!("Test Mode [{}] (y/n)", form.test_mode)).await? {
        match answer.trim() {
            "y" => form.test_mode = true,
            "n" => form.test_mode = false,
            _ => {}
        }
    }
    edit(input, "Callback URL", &mut form.callback_url).await?;
    edit(input, "Webhook Secret", &mut form.webhook_secret).await?;
    edit(input, "Embedded Website URL", &mut form.iframe_url).await?;

    match form.save(&ctx.store).await {
        Ok(()) => println!("Settings saved successfully"),
        Err(e) => println!("{}Error: {}{}", ansi_fg(DARK.error), e, RESET),
    }
    Ok(())
}

async fn edit(input: &mut Input, label: &str, field: &mut String) -> io::Result<()> {
    let shown = if field.is_empty() { "unset" } else { field.as_str() };
    if let Some(line) = prompt(input, &format!("{} [{}]", label, shown)).await? {
        let line = line.trim();
        if !line.is_empty() {
            *field = line.to_string();
        }
    }
    Ok(())
}
