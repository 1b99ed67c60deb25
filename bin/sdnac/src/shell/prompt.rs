//! Blocking terminal prompts, run off the async runtime.
use anyhow::Context;
use anyhow::Result;
use dialoguer::Confirm;
use dialoguer::Input;
use dialoguer::MultiSelect;
use dialoguer::Select;

use crate::errors::PromptFailed;

/// Validate user input, returning a message to display on invalid values.
pub type Validator = fn(&str) -> Result<(), String>;

/// Pick one value from a list of labelled options.
///
/// Returns `None` without prompting when there is nothing to choose from.
pub async fn choose<T>(prompt: &str, options: Vec<(String, T)>) -> Result<Option<T>> {
    if options.is_empty() {
        println!("Nothing to choose from");
        return Ok(None);
    }
    let (labels, mut values): (Vec<String>, Vec<T>) = options.into_iter().unzip();
    let choice = select(prompt, labels).await?;
    Ok(Some(values.swap_remove(choice)))
}

/// Ask a yes or no question.
pub async fn confirm(prompt: &str, default: bool) -> Result<bool> {
    let prompt = prompt.to_string();
    tokio::task::spawn_blocking(move || {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
    })
    .await?
    .context(PromptFailed)
}

/// Ask for a line of text, optionally suggesting a default value.
pub async fn input(prompt: &str, default: Option<String>) -> Result<String> {
    input_inner(prompt, default, None).await
}

/// Ask for a line of text, repeating the question until the validator accepts it.
pub async fn input_valid(prompt: &str, validator: Validator) -> Result<String> {
    input_inner(prompt, None, Some(validator)).await
}

async fn input_inner(
    prompt: &str,
    default: Option<String>,
    validator: Option<Validator>,
) -> Result<String> {
    let prompt = prompt.to_string();
    let value = tokio::task::spawn_blocking(move || {
        let mut input = Input::<String>::new();
        input.with_prompt(prompt);
        if let Some(default) = default {
            input.default(default);
        }
        if let Some(validator) = validator {
            input.validate_with(move |value: &String| validator(value));
        }
        input.interact_text()
    })
    .await?
    .context(PromptFailed)?;
    Ok(value.trim().to_string())
}

/// Pick any number of items from a list.
pub async fn multi_select(prompt: &str, items: Vec<String>) -> Result<Vec<usize>> {
    let prompt = prompt.to_string();
    tokio::task::spawn_blocking(move || {
        MultiSelect::new()
            .with_prompt(prompt)
            .items(&items)
            .interact()
    })
    .await?
    .context(PromptFailed)
}

/// Pick one item from a list, returning its index.
pub async fn select(prompt: &str, items: Vec<String>) -> Result<usize> {
    let prompt = prompt.to_string();
    tokio::task::spawn_blocking(move || {
        Select::new()
            .with_prompt(prompt)
            .items(&items)
            .default(0)
            .interact()
    })
    .await?
    .context(PromptFailed)
}

/// Accept IPv4 addresses only.
pub fn valid_ipv4(value: &str) -> Result<(), String> {
    value
        .trim()
        .parse::<std::net::Ipv4Addr>()
        .map(|_| ())
        .map_err(|_| format!("'{}' is not a valid IPv4 address", value.trim()))
}

/// Accept hardware addresses in any of the supported notations.
pub fn valid_mac(value: &str) -> Result<(), String> {
    value
        .trim()
        .parse::<sdnac_policy::MacAddress>()
        .map(|_| ())
        .map_err(|error| error.to_string())
}

/// Accept non-empty values only.
pub fn valid_non_empty(value: &str) -> Result<(), String> {
    match value.trim().is_empty() {
        true => Err("a value is required".to_string()),
        false => Ok(()),
    }
}

/// Accept TCP/UDP port numbers in the range 1-65535.
pub fn valid_port(value: &str) -> Result<(), String> {
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(()),
        _ => Err(format!("'{}' is not a port in the range 1-65535", value.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::valid_ipv4;
    use super::valid_mac;
    use super::valid_non_empty;
    use super::valid_port;

    #[test]
    fn validators() {
        assert!(valid_ipv4("10.0.0.5").is_ok());
        assert!(valid_ipv4("10.0.0.256").is_err());
        assert!(valid_mac("aa-bb-cc-dd-ee-ff").is_ok());
        assert!(valid_mac("aa:bb:cc").is_err());
        assert!(valid_non_empty("  ").is_err());
        assert!(valid_port("22").is_ok());
        assert!(valid_port("0").is_err());
        assert!(valid_port("65536").is_err());
    }

    #[tokio::test]
    async fn choose_from_nothing() {
        let choice = super::choose::<u32>("Pick", Vec::new()).await.unwrap();
        assert_eq!(choice, None);
    }
}
