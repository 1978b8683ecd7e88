use crate::app::App;
use crate::error::ActionError;
use crate::session::AuthField;
use crate::view::View;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    let result = match app.view() {
        View::Auth => handle_auth_key(app, key),
        View::Composer => handle_composer_key(app, key),
        View::List => handle_list_key(app, key),
    };

    if let Err(e) = result {
        report(app, e);
    }
}

/// Refusals the user should hear about become error toasts; the rest
/// correspond to inert buttons and are dropped.
fn report(app: &mut App, error: ActionError) {
    match error {
        ActionError::EmptyEntry => app.toasts.error("Nothing to save yet"),
        ActionError::NotFound(e) => app.toasts.error(e.to_string()),
        other => debug!(error = %other, "Ignored key action"),
    }
}

fn handle_auth_key(app: &mut App, key: KeyEvent) -> Result<(), ActionError> {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::Down => app.auth_form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.auth_form.focus_prev(),
        KeyCode::Enter => return activate_auth_field(app),
        KeyCode::Char(c) => {
            if let Some(text) = app.auth_form.focused_text_mut() {
                text.push(c);
            }
        }
        KeyCode::Backspace => {
            if let Some(text) = app.auth_form.focused_text_mut() {
                text.pop();
            }
        }
        _ => {}
    }
    Ok(())
}

fn activate_auth_field(app: &mut App) -> Result<(), ActionError> {
    // Buttons are inert while a sign-in is pending.
    if app.is_authenticating() {
        return Ok(());
    }
    match app.auth_form.focus {
        field if field.is_text() => app.auth_form.focus_next(),
        AuthField::Submit if app.auth_form.sign_up => {
            let details = app.auth_form.sign_up_details();
            app.sign_up(details)?;
        }
        AuthField::Submit => {
            let credentials = app.auth_form.credentials();
            app.login(credentials)?;
        }
        AuthField::Google => app.login_with_google()?,
        AuthField::Guest => app.login_as_guest()?,
        AuthField::SwitchMode => app.auth_form.toggle_mode(),
        _ => {}
    }
    Ok(())
}

fn handle_composer_key(app: &mut App, key: KeyEvent) -> Result<(), ActionError> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') => app.save(false)?,
            KeyCode::Char('a') => app.analyze()?,
            KeyCode::Char('e') => app.export_entry()?,
            _ => {}
        }
        return Ok(());
    }

    if key.code == KeyCode::Esc {
        return app.close_composer();
    }

    let editor = app.editor_mut();
    match key.code {
        KeyCode::Char(c) => editor.insert_char(c),
        KeyCode::Enter => editor.insert_newline(),
        KeyCode::Backspace => editor.backspace(),
        KeyCode::Delete => editor.delete(),
        KeyCode::Left => editor.move_left(),
        KeyCode::Right => editor.move_right(),
        KeyCode::Up => editor.move_up(),
        KeyCode::Down => editor.move_down(),
        KeyCode::Home => editor.move_home(),
        KeyCode::End => editor.move_end(),
        _ => {}
    }
    Ok(())
}

fn handle_list_key(app: &mut App, key: KeyEvent) -> Result<(), ActionError> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('n') | KeyCode::Char('w') => app.start_new_entry()?,
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Enter => {
            if let Some(id) = app.selected_entry().map(|e| e.id.clone()) {
                app.open_entry(&id)?;
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = app.selected_entry().map(|e| e.id.clone()) {
                app.delete_entry(&id)?;
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::diary_state::DiaryState;
    use crate::services::Services;
    use std::time::Duration;
    use tokio::time::Instant;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key_event(app, key(KeyCode::Char(c)));
        }
    }

    fn new_app() -> (App, crate::app::CompletionReceiver) {
        let config = Config::instant();
        App::new(&config, Services::simulated(&config), DiaryState::new())
    }

    #[tokio::test(start_paused = true)]
    async fn guest_button_signs_in() {
        let (mut app, _rx) = new_app();
        for _ in 0..4 {
            handle_key_event(&mut app, key(KeyCode::Tab));
        }
        assert_eq!(app.auth_form.focus, AuthField::Guest);
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.view(), View::List);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_fills_focused_auth_field() {
        let (mut app, _rx) = new_app();
        type_text(&mut app, "me@example.com");
        handle_key_event(&mut app, key(KeyCode::Enter));
        type_text(&mut app, "pw");
        handle_key_event(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.auth_form.email, "me@example.com");
        assert_eq!(app.auth_form.password, "p");
        assert_eq!(app.auth_form.focus, AuthField::Password);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_uses_sign_up_when_toggled() {
        let (mut app, mut rx) = new_app();
        app.auth_form.focus = AuthField::SwitchMode;
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(app.auth_form.sign_up);

        app.auth_form.focus = AuthField::Submit;
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(app.is_authenticating());

        let completion = rx.recv().await.unwrap();
        app.apply(completion);
        assert_eq!(
            app.toasts.latest().unwrap().message,
            "Account created successfully!"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn list_to_composer_and_back() {
        let (mut app, _rx) = new_app();
        app.login_as_guest().unwrap();

        handle_key_event(&mut app, key(KeyCode::Char('n')));
        assert_eq!(app.view(), View::Composer);
        type_text(&mut app, "q is just text here");
        assert_eq!(app.editor().content(), "q is just text here");

        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.view(), View::List);
        assert!(!app.should_quit);
    }

    #[tokio::test(start_paused = true)]
    async fn ctrl_s_on_empty_entry_warns() {
        let (mut app, _rx) = new_app();
        app.login_as_guest().unwrap();
        handle_key_event(&mut app, key(KeyCode::Char('n')));
        handle_key_event(&mut app, ctrl('s'));
        assert_eq!(app.toasts.latest().unwrap().message, "Nothing to save yet");
        assert!(!app.is_saving());
    }

    #[tokio::test(start_paused = true)]
    async fn ctrl_s_during_autosave_still_saves_and_closes() {
        let config = Config {
            autosave_interval_secs: Some(30),
            ..Config::instant()
        };
        let (mut app, mut rx) =
            App::new(&config, Services::simulated(&config), DiaryState::new());
        app.login_as_guest().unwrap();
        handle_key_event(&mut app, key(KeyCode::Char('n')));
        type_text(&mut app, "dear diary");

        app.tick(Instant::now() + Duration::from_secs(31));
        assert!(app.is_saving());
        handle_key_event(&mut app, ctrl('s'));

        let completion = rx.recv().await.unwrap();
        app.apply(completion);
        assert_eq!(app.view(), View::List);
        assert_eq!(app.entries().len(), 1);
        assert_eq!(
            app.toasts.latest().unwrap().message,
            "Entry saved successfully!"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn ctrl_c_quits_anywhere() {
        let (mut app, _rx) = new_app();
        handle_key_event(&mut app, ctrl('c'));
        assert!(app.should_quit);
    }
}
