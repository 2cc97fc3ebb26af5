use crate::app::error::ConfigurationError;
use crate::configuration::constants::{defaults, variables};
use crate::reporter::context::RunContext;
use config::{Config, Environment, File};
use derivative::*;
use lettre::message::Mailbox;
use lettre::Address;
use serde_derive::Deserialize;
use std::path::Path;

/// Raw settings as they come from the settings file and the environment
#[derive(Deserialize, Derivative, Default)]
#[derivative(Debug)]
pub struct Settings {
    #[serde(default, with = "crate::configuration::deserialize::optional_string")]
    pub gmail_user: Option<String>,
    #[derivative(Debug = "ignore")]
    #[serde(default, with = "crate::configuration::deserialize::optional_string")]
    pub gmail_password: Option<String>,
    #[serde(default, with = "crate::configuration::deserialize::optional_string")]
    pub recipient_email: Option<String>,
    #[serde(default, with = "crate::configuration::deserialize::optional_string")]
    pub stakeholder_email: Option<String>,
    #[serde(default, with = "crate::configuration::deserialize::optional_string")]
    pub github_server_url: Option<String>,
    #[serde(default, with = "crate::configuration::deserialize::optional_string")]
    pub github_repository: Option<String>,
    #[serde(default, with = "crate::configuration::deserialize::optional_string")]
    pub github_run_id: Option<String>,
    #[serde(default, with = "crate::configuration::deserialize::optional_string")]
    pub smtp_host: Option<String>,
    #[serde(default, with = "crate::configuration::deserialize::optional_string")]
    pub mail_sender_name: Option<String>,
    #[serde(default, with = "crate::configuration::deserialize::optional_string")]
    pub report_title: Option<String>,
    #[serde(default, with = "crate::configuration::deserialize::optional_string")]
    pub pages_host: Option<String>,
}

#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Relay {
    pub host: String,
    pub user: String,
    #[derivative(Debug = "ignore")]
    pub password: String,
}

/// Validated configuration, built once at start and shared by reference
#[derive(Debug, Clone)]
pub struct Configuration {
    pub relay: Relay,
    pub sender: Mailbox,
    pub recipients: Vec<Mailbox>,
    pub context: RunContext,
}

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut config = Config::new();
        if let Some(file) = file {
            config.merge(File::from(file))?;
        }
        config.merge(Environment::new())?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self, ConfigurationError> {
        Ok(config.try_into()?)
    }

    pub fn validate(self) -> Result<Configuration, ConfigurationError> {
        let has_recipient = self.recipient_email.is_some() || self.stakeholder_email.is_some();
        let (user, password) = match (self.gmail_user, self.gmail_password) {
            (Some(user), Some(password)) if has_recipient => (user, password),
            (user, password) => {
                let mut missing = Vec::new();
                if user.is_none() {
                    missing.push(variables::USER);
                }
                if password.is_none() {
                    missing.push(variables::PASSWORD);
                }
                if !has_recipient {
                    missing.push(variables::RECIPIENT_OR_STAKEHOLDER);
                }
                return Err(ConfigurationError::Missing(missing));
            }
        };

        let address = user
            .parse::<Address>()
            .map_err(|source| ConfigurationError::InvalidAddress {
                variable: variables::USER,
                source,
            })?;
        let sender_name = self
            .mail_sender_name
            .unwrap_or_else(|| defaults::SENDER_NAME.to_owned());
        let sender = Mailbox::new(Some(sender_name), address);

        let mut recipients: Vec<Mailbox> = Vec::new();
        for (variable, value) in vec![
            (variables::RECIPIENT, self.recipient_email),
            (variables::STAKEHOLDER, self.stakeholder_email),
        ] {
            if let Some(value) = value {
                let mailbox = value
                    .parse::<Mailbox>()
                    .map_err(|source| ConfigurationError::InvalidAddress { variable, source })?;
                if !recipients.iter().any(|known| known.email == mailbox.email) {
                    recipients.push(mailbox);
                }
            }
        }

        let mut context = RunContext::builder();
        context
            .server_url(
                self.github_server_url
                    .unwrap_or_else(|| defaults::SERVER_URL.to_owned()),
            )
            .repository(self.github_repository)
            .run_id(self.github_run_id);
        if let Some(title) = self.report_title {
            context.title(title);
        }
        if let Some(pages_host) = self.pages_host {
            context.pages_host(pages_host);
        }

        Ok(Configuration {
            relay: Relay {
                host: self
                    .smtp_host
                    .unwrap_or_else(|| defaults::SMTP_HOST.to_owned()),
                user,
                password,
            },
            sender,
            recipients,
            context: context.build()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            gmail_user: Some("ci@example.com".to_owned()),
            gmail_password: Some("app-password".to_owned()),
            recipient_email: Some("qa@example.com".to_owned()),
            ..Settings::default()
        }
    }

    #[test]
    fn test_missing_everything_lists_all_variables() {
        let result = Settings::default().validate();

        match result {
            Err(ConfigurationError::Missing(missing)) => assert_eq!(
                missing,
                vec![
                    variables::USER,
                    variables::PASSWORD,
                    variables::RECIPIENT_OR_STAKEHOLDER
                ]
            ),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_no_recipient_is_fatal() {
        let result = Settings {
            recipient_email: None,
            ..settings()
        }
        .validate();

        match result {
            Err(ConfigurationError::Missing(missing)) => {
                assert_eq!(missing, vec![variables::RECIPIENT_OR_STAKEHOLDER])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_stakeholder_alone_is_enough() {
        let configuration = Settings {
            recipient_email: None,
            stakeholder_email: Some("lead@example.com".to_owned()),
            ..settings()
        }
        .validate()
        .unwrap();

        assert_eq!(configuration.recipients.len(), 1);
        assert_eq!(configuration.recipients[0].email.to_string(), "lead@example.com");
    }

    #[test]
    fn test_recipients_are_joined_without_duplicates() {
        let both = Settings {
            stakeholder_email: Some("lead@example.com".to_owned()),
            ..settings()
        }
        .validate()
        .unwrap();
        let same = Settings {
            stakeholder_email: Some("qa@example.com".to_owned()),
            ..settings()
        }
        .validate()
        .unwrap();

        assert_eq!(both.recipients.len(), 2);
        assert_eq!(same.recipients.len(), 1);
    }

    #[test]
    fn test_invalid_recipient_is_rejected() {
        let result = Settings {
            recipient_email: Some("not an address".to_owned()),
            ..settings()
        }
        .validate();

        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidAddress {
                variable: variables::RECIPIENT,
                ..
            })
        ));
    }

    #[test]
    fn test_defaults_are_applied() {
        let configuration = settings().validate().unwrap();

        assert_eq!(configuration.relay.host, defaults::SMTP_HOST);
        assert_eq!(configuration.sender.name.as_deref(), Some(defaults::SENDER_NAME));
        assert_eq!(configuration.context.server_url, defaults::SERVER_URL);
        assert_eq!(configuration.context.title, defaults::REPORT_TITLE);
        assert_eq!(configuration.context.run_id, None);
    }

    #[test]
    fn test_password_is_hidden_from_debug_output() {
        let configuration = settings().validate().unwrap();

        assert!(!format!("{:?}", configuration).contains("app-password"));
        assert!(!format!("{:?}", settings()).contains("app-password"));
    }

    #[test]
    fn test_blank_values_read_as_absent() {
        let mut config = Config::new();
        config.set("gmail_user", "ci@example.com").unwrap();
        config.set("gmail_password", "secret").unwrap();
        config.set("recipient_email", "   ").unwrap();
        config.set("github_run_id", "42").unwrap();
        let settings = Settings::from_config(config).unwrap();

        assert_eq!(settings.recipient_email, None);
        assert_eq!(settings.github_run_id.as_deref(), Some("42"));
        assert!(settings.validate().is_err());
    }
}
