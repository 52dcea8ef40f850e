//! Onboarding pager: three fixed pages, next/skip.

pub struct OnboardingPage {
    pub title: &'static str,
    pub description: &'static str,
}

pub static ONBOARDING_PAGES: [OnboardingPage; 3] = [
    OnboardingPage {
        title: "Empower Yourself With Quick Knowledge",
        description: "Get instant answers to your exam questions with AI-powered assistance",
    },
    OnboardingPage {
        title: "Elevate Your Reading With Quick Insights",
        description: "Access comprehensive study materials and explanations",
    },
    OnboardingPage {
        title: "Stay Motivated And Achieve Goals",
        description: "Track your progress and reach your academic targets",
    },
];

#[derive(Debug, Default)]
pub struct OnboardingScreen {
    page: usize,
}

impl OnboardingScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &'static OnboardingPage {
        &ONBOARDING_PAGES[self.page]
    }

    pub fn page_index(&self) -> usize {
        self.page
    }

    pub fn is_last(&self) -> bool {
        self.page + 1 == ONBOARDING_PAGES.len()
    }

    /// Advance one page; returns true when onboarding is complete.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            true
        } else {
            self.page += 1;
            false
        }
    }
}
