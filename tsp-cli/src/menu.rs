use crate::agent::{IssuerAgent, Settings};
use crate::commands::{connection, issue, records, revocation, wallet};
use crate::prompt::Prompter;

/// An operator's choice at the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    IssueCredential,
    CredentialRequests,
    SendMessage,
    NewInvitation,
    Revoke,
    PublishRevocations,
    SetEndorser,
    Wallet,
    Exit,
    /// Unknown, or not enabled for this session.
    Ignored,
}

/// End of input, a blank line, or `x`/`X`.
pub fn is_exit(option: Option<&str>) -> bool {
    matches!(option.map(str::trim), None | Some("") | Some("x") | Some("X"))
}

/// Main menu text for the features enabled in `settings`.
pub fn menu_text(settings: &Settings) -> String {
    let mut options = String::from(concat!(
        "    (1) Issue Credential\n",
        "    (2) See Credential requests\n",
        "    (3) Send Message\n",
        "    (4) Create New Invitation\n",
    ));
    if settings.revocation {
        options.push_str("    (5) Revoke Credential\n    (6) Publish Revocations\n");
    }
    if settings.is_author() {
        options.push_str("    (D) Set Endorser's DID\n");
    }
    if settings.multitenant {
        options.push_str("    (W) Create and/or Enable Wallet\n");
    }
    options.push_str(&format!(
        "    (X) Exit?\n[1/2/3/4/{}{}X] ",
        if settings.revocation { "5/6/" } else { "" },
        if settings.multitenant { "W/" } else { "" },
    ));
    options
}

pub fn parse_option(input: Option<&str>, settings: &Settings) -> MenuOption {
    if is_exit(input) {
        return MenuOption::Exit;
    }
    match input.map(str::trim).unwrap_or_default() {
        "1" => MenuOption::IssueCredential,
        "2" => MenuOption::CredentialRequests,
        "3" => MenuOption::SendMessage,
        "4" => MenuOption::NewInvitation,
        "5" if settings.revocation => MenuOption::Revoke,
        "6" if settings.revocation => MenuOption::PublishRevocations,
        "d" | "D" if settings.endorser_role.is_some() => MenuOption::SetEndorser,
        "w" | "W" if settings.multitenant => MenuOption::Wallet,
        _ => MenuOption::Ignored,
    }
}

/// Read options until the operator exits, running each one to completion.
pub async fn run_menu(
    agent: &mut IssuerAgent,
    prompter: &mut dyn Prompter,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = menu_text(&agent.settings);
    loop {
        let input = prompter.prompt(&options)?;
        match parse_option(input.as_deref(), &agent.settings) {
            MenuOption::Exit => return Ok(()),
            MenuOption::Ignored => {}
            MenuOption::IssueCredential => issue::cmd_issue_credential(agent, prompter).await?,
            MenuOption::CredentialRequests => {
                records::cmd_credential_requests(agent, prompter).await?
            }
            MenuOption::SendMessage => connection::cmd_send_message(agent, prompter).await?,
            MenuOption::NewInvitation => connection::cmd_new_invitation(agent).await?,
            MenuOption::Revoke => revocation::cmd_revoke(agent, prompter).await?,
            MenuOption::PublishRevocations => revocation::cmd_publish_revocations(agent).await?,
            MenuOption::SetEndorser => connection::cmd_set_endorser(agent, prompter).await?,
            MenuOption::Wallet => wallet::cmd_wallet(agent, prompter).await?,
        }
    }
}

/// Provision the agent, connect to a holder, then hand over to the operator.
pub async fn run_session(
    agent: &mut IssuerAgent,
    prompter: &mut dyn Prompter,
) -> Result<(), Box<dyn std::error::Error>> {
    agent.provision().await?;
    agent.generate_invitation(true).await?;

    run_menu(agent, prompter).await?;

    if agent.settings.timing {
        agent.show_timing().await?;
    }
    Ok(())
}
