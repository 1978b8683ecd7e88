/// Whether the user is signed in. Starts signed out; there is no sign-out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    authenticated: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn authenticate(&mut self) {
        self.authenticated = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Login,
    SignUp,
    Google,
    Guest,
}

impl AuthMethod {
    pub fn success_message(&self) -> &'static str {
        match self {
            AuthMethod::Login | AuthMethod::Google => "Welcome back!",
            AuthMethod::SignUp => "Account created successfully!",
            AuthMethod::Guest => "Welcome, Guest!",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            AuthMethod::Login | AuthMethod::Guest => "Login failed",
            AuthMethod::SignUp => "Sign up failed",
            AuthMethod::Google => "Google login failed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpDetails {
    pub name: String,
    pub credentials: Credentials,
}

/// Focusable elements of the sign-in screen, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Name,
    Email,
    Password,
    Submit,
    Google,
    Guest,
    SwitchMode,
}

impl AuthField {
    pub fn is_text(&self) -> bool {
        matches!(self, AuthField::Name | AuthField::Email | AuthField::Password)
    }
}

/// What the user has typed on the sign-in screen.
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub sign_up: bool,
    pub name: String,
    pub email: String,
    pub password: String,
    pub focus: AuthField,
}

impl Default for AuthForm {
    fn default() -> Self {
        AuthForm {
            sign_up: false,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            focus: AuthField::Email,
        }
    }
}

impl AuthForm {
    pub fn fields(&self) -> Vec<AuthField> {
        let mut fields = Vec::with_capacity(7);
        if self.sign_up {
            fields.push(AuthField::Name);
        }
        fields.extend([
            AuthField::Email,
            AuthField::Password,
            AuthField::Submit,
            AuthField::Google,
            AuthField::Guest,
            AuthField::SwitchMode,
        ]);
        fields
    }

    pub fn focus_next(&mut self) {
        self.shift_focus(1);
    }

    pub fn focus_prev(&mut self) {
        let len = self.fields().len();
        self.shift_focus(len - 1);
    }

    fn shift_focus(&mut self, step: usize) {
        let fields = self.fields();
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(current + step) % fields.len()];
    }

    pub fn toggle_mode(&mut self) {
        self.sign_up = !self.sign_up;
        if !self.sign_up && self.focus == AuthField::Name {
            self.focus = AuthField::Email;
        }
    }

    pub fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            AuthField::Name => Some(&mut self.name),
            AuthField::Email => Some(&mut self.email),
            AuthField::Password => Some(&mut self.password),
            _ => None,
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }

    pub fn sign_up_details(&self) -> SignUpDetails {
        SignUpDetails {
            name: self.name.clone(),
            credentials: self.credentials(),
        }
    }
}
