//! Read-only rows for the profile overlay.

use crate::auth::models::{PlanStatus, UserProfile};

pub fn summary_rows(user: &UserProfile) -> Vec<(&'static str, String)> {
    vec![
        ("Name", user.full_name.clone()),
        ("Email", user.email.clone()),
        ("Class", user.class_level.clone()),
        (
            "Status",
            match user.status {
                PlanStatus::Free => "free".to_string(),
                PlanStatus::Paid => "paid".to_string(),
            },
        ),
        ("Tokens (Daily)", user.tokens_day.to_string()),
        ("Tokens (Monthly)", user.tokens_month.to_string()),
    ]
}
