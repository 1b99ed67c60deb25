//! Errors specific to the `sdnac` command line.

/// The command needs a policy dataset but none was given.
#[derive(Debug, thiserror::Error)]
#[error("the '{command}' command requires a policy dataset")]
pub struct DatasetNotConfigured {
    pub command: String,
}

impl DatasetNotConfigured {
    pub fn new<S: Into<String>>(command: S) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Interaction with the user through the terminal failed.
#[derive(Debug, thiserror::Error)]
#[error("unable to interact with the user through the terminal")]
pub struct PromptFailed;

/// The selected menu does not exist.
#[derive(Debug, thiserror::Error)]
#[error("no shell menu named '{token}' (known menus: {known})")]
pub struct UnknownMenu {
    pub known: String,
    pub token: String,
}

impl UnknownMenu {
    pub fn new<S: Into<String>>(token: S, known: Vec<&str>) -> Self {
        Self {
            known: known.join(", "),
            token: token.into(),
        }
    }
}
