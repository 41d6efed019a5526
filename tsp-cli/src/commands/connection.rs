use crate::agent::IssuerAgent;
use crate::prompt::Prompter;
use crate::render::log_msg;

pub async fn cmd_send_message(
    agent: &mut IssuerAgent,
    prompter: &mut dyn Prompter,
) -> Result<(), Box<dyn std::error::Error>> {
    let msg = prompter.prompt_text("Enter message: ")?;
    let connection_id = agent.require_connection()?;
    agent.client.send_message(connection_id, &msg).await?;
    Ok(())
}

pub async fn cmd_new_invitation(agent: &mut IssuerAgent) -> Result<(), Box<dyn std::error::Error>> {
    log_msg("Creating a new invitation, please receive and accept this invitation using Student agent");
    agent.generate_invitation(true).await?;
    Ok(())
}

pub async fn cmd_set_endorser(
    agent: &mut IssuerAgent,
    prompter: &mut dyn Prompter,
) -> Result<(), Box<dyn std::error::Error>> {
    let endorser_did = prompter.prompt_text("Enter Endorser's DID: ")?;
    let connection_id = agent.require_connection()?;
    agent
        .client
        .set_endorser_info(connection_id, endorser_did.trim())
        .await?;
    Ok(())
}
