use crate::agent::IssuerAgent;
use crate::prompt::Prompter;

/// Create or switch to a sub-wallet. A newly created wallet gets its own
/// schema and credential definition; a switched-to wallet reuses its own.
pub async fn cmd_wallet(
    agent: &mut IssuerAgent,
    prompter: &mut dyn Prompter,
) -> Result<(), Box<dyn std::error::Error>> {
    let wallet_name = prompter.prompt_text("Enter wallet name: ")?;
    let webhook = prompter.prompt_text("(Y/N) Create sub-wallet webhook target: ")?;
    let webhook = webhook.trim().eq_ignore_ascii_case("y");

    let created = agent
        .register_or_switch_wallet(wallet_name.trim(), webhook)
        .await?;
    if created {
        agent.create_schema_and_cred_def().await?;
    } else {
        agent.load_cred_def().await?;
    }
    Ok(())
}
