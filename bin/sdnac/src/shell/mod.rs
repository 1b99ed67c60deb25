//! Interactive menus to manage the access policy and student connections.
//!
//! Every menu is a static table of entries: a token to select the menu from the command line,
//! a label shown to users and the action to invoke when the entry is picked.
use anyhow::Result;
use clap::Args;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use slog::Logger;

use sdnac_connections::ConnectionManager;
use sdnac_policy::PolicyStore;

use crate::errors::PromptFailed;
use crate::errors::UnknownMenu;
use crate::Globals;

mod catalog;
mod connections;
mod dataset;
mod prompt;


/// Manage policies and connections through an interactive menu.
#[derive(Args, Debug)]
pub struct ShellCli {
    /// Open the named menu (for example `connections`) instead of the main menu.
    pub menu: Option<String>,
}

/// State shared by all menus for the duration of the shell.
pub struct Session {
    /// Path of the last dataset imported or exported, suggested as the default.
    pub dataset: Option<String>,
    pub logger: Logger,
    pub manager: ConnectionManager,
    pub policy: PolicyStore,
}

/// What the shell should do once a menu action completes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Next {
    /// Return to the menu the current one was opened from.
    Back,

    /// Exit the shell.
    Quit,

    /// Show the current menu again.
    Stay,
}

/// Action invoked when a menu entry is picked.
pub type Action = for<'a> fn(&'a mut Session) -> BoxFuture<'a, Result<Next>>;

/// Entry in a shell menu.
pub struct MenuEntry {
    pub action: Action,
    pub label: &'static str,
    pub token: &'static str,
}

/// Top level menu of the shell.
pub static MAIN_MENU: &[MenuEntry] = &[
    MenuEntry {
        action: dataset::import,
        label: "Import dataset",
        token: "import",
    },
    MenuEntry {
        action: dataset::export,
        label: "Export dataset",
        token: "export",
    },
    MenuEntry {
        action: catalog::courses,
        label: "Courses",
        token: "courses",
    },
    MenuEntry {
        action: catalog::students,
        label: "Students",
        token: "students",
    },
    MenuEntry {
        action: catalog::servers,
        label: "Servers",
        token: "servers",
    },
    MenuEntry {
        action: dataset::report,
        label: "Policy report",
        token: "report",
    },
    MenuEntry {
        action: connections::menu,
        label: "Connections",
        token: "connections",
    },
    MenuEntry {
        action: quit,
        label: "Quit",
        token: "quit",
    },
];

/// Run the interactive shell until the user quits.
pub async fn run(globals: &Globals, cmd: &ShellCli) -> Result<i32> {
    let dataset = globals.conf.policy.dataset.clone();
    let policy = globals.policy()?.unwrap_or_default();
    let mut session = Session {
        dataset,
        logger: globals.logger.clone(),
        manager: globals.manager()?,
        policy,
    };

    let next = match &cmd.menu {
        Some(token) => {
            let entry = lookup(MAIN_MENU, token)?;
            invoke(&mut session, entry).await?
        }
        None => Next::Stay,
    };
    if next != Next::Quit {
        open(&mut session, "SDN access control", MAIN_MENU).await?;
    }

    let provisioned = session.manager.connections().count();
    if provisioned > 0 {
        eprintln!(
            "Leaving {} connection(s) provisioned on the network",
            provisioned
        );
    }
    Ok(0)
}

/// Find a menu entry by token.
pub fn lookup(menu: &'static [MenuEntry], token: &str) -> Result<&'static MenuEntry> {
    match menu.iter().find(|entry| entry.token == token) {
        Some(entry) => Ok(entry),
        None => {
            let known = menu.iter().map(|entry| entry.token).collect();
            anyhow::bail!(UnknownMenu::new(token, known))
        }
    }
}

/// Show a menu and dispatch picked entries until the user goes back or quits.
pub async fn open(session: &mut Session, title: &str, menu: &'static [MenuEntry]) -> Result<Next> {
    let labels: Vec<String> = menu.iter().map(|entry| entry.label.to_string()).collect();
    loop {
        let choice = prompt::select(title, labels.clone()).await?;
        match invoke(session, &menu[choice]).await? {
            Next::Back => return Ok(Next::Stay),
            Next::Quit => return Ok(Next::Quit),
            Next::Stay => (),
        }
    }
}

/// Invoke a menu action, reporting operator errors without leaving the shell.
async fn invoke(session: &mut Session, entry: &MenuEntry) -> Result<Next> {
    match (entry.action)(session).await {
        Ok(next) => Ok(next),
        Err(error) if error.downcast_ref::<PromptFailed>().is_some() => Err(error),
        Err(error) => {
            slog::debug!(
                session.logger, "Shell action failed";
                "action" => entry.token,
                "error" => format!("{:#}", error),
            );
            eprintln!("Error: {:#}", error);
            Ok(Next::Stay)
        }
    }
}

/// Open a sub-menu from a menu entry.
fn submenu<'a>(
    session: &'a mut Session,
    title: &'static str,
    menu: &'static [MenuEntry],
) -> BoxFuture<'a, Result<Next>> {
    open(session, title, menu).boxed()
}

/// Return to the previous menu.
pub fn back(_: &mut Session) -> BoxFuture<'_, Result<Next>> {
    async { Ok(Next::Back) }.boxed()
}

/// Exit the shell from any menu.
pub fn quit(_: &mut Session) -> BoxFuture<'_, Result<Next>> {
    async { Ok(Next::Quit) }.boxed()
}
