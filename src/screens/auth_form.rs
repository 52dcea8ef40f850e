//! Sign-up / sign-in form.

use crate::auth::models::AuthError;
use crate::auth::AuthContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignUp,
    SignIn,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthFormError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error(transparent)]
    Auth(#[from] AuthError),
}

#[derive(Debug)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            mode: AuthMode::SignUp,
            email: String::new(),
            password: String::new(),
        }
    }
}

impl AuthForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::SignUp => AuthMode::SignIn,
            AuthMode::SignIn => AuthMode::SignUp,
        };
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            AuthMode::SignUp => "Create Account",
            AuthMode::SignIn => "Welcome Back",
        }
    }

    /// Both fields are required before any network call.
    pub async fn submit(&self, auth: &AuthContext) -> Result<(), AuthFormError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(AuthFormError::MissingFields);
        }
        match self.mode {
            AuthMode::SignUp => auth.sign_up(&self.email, &self.password).await?,
            AuthMode::SignIn => auth.sign_in(&self.email, &self.password).await?,
        }
        Ok(())
    }
}
