use sdnac::run;

#[tokio::main]
async fn main() {
    let result = run().await;
    let error = match result {
        Err(error) => error,
        Ok(0) => return,
        Ok(num) => std::process::exit(num),
    };

    // Provide better error messages for cases where we can provide suggestions to the user.
    if let Some(error) = error.downcast_ref::<sdnac::ControllerUnreachable>() {
        eprintln!("{}", error);
        eprintln!("Below is a PARTIAL list of likely causes for this error:");
        eprintln!("  * The SDN controller is not running or not listening on the configured URL");
        eprintln!("  * The controller URL is wrong (set it with --controller or SDNAC_CONTROLLER)");
        eprintln!("  * The controller is too slow to respond within the configured timeouts");
        std::process::exit(1);
    }
    if let Some(error) = error.downcast_ref::<sdnac::ControllerRejected>() {
        eprintln!("{}", error);
        eprintln!("The SDN controller refused the request, check its logs for details");
        std::process::exit(1);
    }
    if error.downcast_ref::<sdnac::DatasetError>().is_some() {
        eprintln!("{:?}", error);
        eprintln!("Check the dataset path (--dataset or SDNAC_DATASET) and its YAML content");
        std::process::exit(1);
    }
    if let Some(sdnac::ConfError::PathNotFound(path)) = error.downcast_ref() {
        eprintln!("Configuration file not found at '{}'", path);
        eprintln!("Omit --config (or SDNAC_CONFIG) to run with the default configuration");
        std::process::exit(1);
    }
    if let Some(error) = error.downcast_ref::<sdnac::errors::DatasetNotConfigured>() {
        eprintln!("{}", error);
        eprintln!("Provide a dataset with --dataset, SDNAC_DATASET or the policy.dataset option");
        std::process::exit(1);
    }

    // Print the error in detailed format for all other cases.
    eprintln!("{:?}", error);
    std::process::exit(1);
}

