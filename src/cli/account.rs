use super::ui;
use crate::App;
use anyhow::Result;

pub fn login(app: &App, email: &str, password: &str) -> Result<()> {
    let user = app.session.login(email, password)?;
    println!(
        "Welcome, {}!",
        ui::style_text(&user.name, ui::StyleType::TotalLabel)
    );
    Ok(())
}

pub fn logout(app: &App) -> Result<()> {
    app.session.logout()?;
    println!("Logged out");
    Ok(())
}

pub fn whoami(app: &App) -> Result<()> {
    match app.session.current_user() {
        Some(user) => println!("[{}] {} <{}>", user.initials(), user.name, user.email),
        None => println!(
            "{}",
            ui::style_text("Not logged in", ui::StyleType::Subtle)
        ),
    }
    Ok(())
}
