pub mod onboarding_email;

pub use onboarding_email::OnboardingEmailService;
