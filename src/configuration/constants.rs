pub mod cargo_env {
    pub const CARGO_PKG_NAME: &'static str = env!("CARGO_PKG_NAME");
}

pub mod common {
    pub const RESULT_FILE_SUFFIX: &'static str = "-result.json";
}

pub mod defaults {
    pub const SERVER_URL: &'static str = "https://github.com";
    pub const SMTP_HOST: &'static str = "smtp.gmail.com";
    pub const SENDER_NAME: &'static str = "Playwright CI/CD";
    pub const REPORT_TITLE: &'static str = "Playwright Test Report";
    pub const PAGES_HOST: &'static str = "github.io";
}

pub mod variables {
    pub const USER: &'static str = "GMAIL_USER";
    pub const PASSWORD: &'static str = "GMAIL_PASSWORD";
    pub const RECIPIENT: &'static str = "RECIPIENT_EMAIL";
    pub const STAKEHOLDER: &'static str = "STAKEHOLDER_EMAIL";
    pub const RECIPIENT_OR_STAKEHOLDER: &'static str = "RECIPIENT_EMAIL or STAKEHOLDER_EMAIL";
}
