//! Profile setup form: display name plus two fixed pick lists.

use crate::auth::models::{ProfileUpdate, ProfileUpdateError};
use crate::auth::AuthContext;

pub const CLASSES: [&str; 8] = [
    "Grade 7",
    "Grade 8",
    "Grade 9",
    "Grade 10",
    "Grade 11",
    "Grade 12",
    "University",
    "Other",
];

pub const HEARD_FROM: [&str; 6] = [
    "Social Media",
    "Friend or Family",
    "Search Engine",
    "School",
    "Advertisement",
    "Other",
];

#[derive(Debug, thiserror::Error)]
pub enum ProfileSetupError {
    #[error("Please enter your name")]
    MissingName,

    #[error(transparent)]
    Update(#[from] ProfileUpdateError),
}

#[derive(Debug, Default)]
pub struct ProfileSetupForm {
    pub full_name: String,
    pub class_index: usize,
    pub heard_from_index: usize,
}

impl ProfileSetupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class_level(&self) -> &'static str {
        CLASSES[self.class_index.min(CLASSES.len() - 1)]
    }

    pub fn heard_from(&self) -> &'static str {
        HEARD_FROM[self.heard_from_index.min(HEARD_FROM.len() - 1)]
    }

    pub async fn submit(&self, auth: &AuthContext) -> Result<(), ProfileSetupError> {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(ProfileSetupError::MissingName);
        }
        auth.update_user_profile(ProfileUpdate {
            full_name: Some(full_name.to_string()),
            class_level: Some(self.class_level().to_string()),
            heard_from: Some(self.heard_from().to_string()),
            ..Default::default()
        })
        .await?;
        Ok(())
    }
}
