//! Import, export and review the policy dataset.
use anyhow::Result;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use sdnac_policy::PolicyStore;

use super::prompt;
use super::Next;
use super::Session;

pub fn export(session: &mut Session) -> BoxFuture<'_, Result<Next>> {
    export_dataset(session).boxed()
}

pub fn import(session: &mut Session) -> BoxFuture<'_, Result<Next>> {
    import_dataset(session).boxed()
}

pub fn report(session: &mut Session) -> BoxFuture<'_, Result<Next>> {
    async move {
        print_report(&session.policy);
        Ok(Next::Stay)
    }
    .boxed()
}

async fn export_dataset(session: &mut Session) -> Result<Next> {
    let path = prompt::input("Export dataset to", session.dataset.clone()).await?;
    session.policy.save(&path)?;
    slog::info!(session.logger, "Policy dataset exported"; "path" => &path);
    println!("Dataset exported to {}", path);
    session.dataset = Some(path);
    Ok(Next::Stay)
}

/// Replace the whole policy with the content of a dataset file.
///
/// Connections already provisioned are kept, even if the new policy no longer grants them.
async fn import_dataset(session: &mut Session) -> Result<Next> {
    let path = prompt::input("Import dataset from", session.dataset.clone()).await?;
    let policy = PolicyStore::load(&path)?;
    let provisioned = session.manager.connections().count();
    if provisioned > 0 {
        println!(
            "{} provisioned connection(s) are kept and not checked against the new policy",
            provisioned
        );
    }
    session.policy = policy;
    slog::info!(session.logger, "Policy dataset imported"; "path" => &path);
    println!("Dataset imported from {}", path);
    session.dataset = Some(path);
    Ok(Next::Stay)
}

/// Show granted accesses and any course reference that does not resolve.
pub fn print_report(policy: &PolicyStore) {
    let grants = policy.report();
    match grants.is_empty() {
        true => println!("The policy grants no access"),
        false => println!("{}", crate::formatter::grants(&grants)),
    }
    let dangling = policy.check();
    if !dangling.is_empty() {
        println!("The following course references do not resolve and grant nothing:");
        println!("{}", crate::formatter::dangling(&dangling));
    }
}
