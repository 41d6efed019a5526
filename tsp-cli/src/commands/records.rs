use crate::agent::IssuerAgent;
use crate::menu::is_exit;
use crate::prompt::Prompter;
use crate::render::{log_json, log_msg, log_status};

const RECORDS_MENU: &str = concat!(
    "    (2a) Delete a credential proposal\n",
    "    (2b) Accept a credential proposal\n",
    "    (X)  Exit?\n",
);

/// List credential exchange records and let the operator drop or accept one.
pub async fn cmd_credential_requests(
    agent: &mut IssuerAgent,
    prompter: &mut dyn Prompter,
) -> Result<(), Box<dyn std::error::Error>> {
    let proposals = agent.client.credential_exchanges().await?;
    log_status("Proposal list");
    log_json(&proposals);

    let option = prompter.prompt(RECORDS_MENU)?;
    let option = option.as_deref().map(str::trim);
    if is_exit(option) {
        return Ok(());
    }
    match option.unwrap_or_default() {
        "2a" => {
            let cred_ex_id = prompter.prompt_text("Proposal ID (cred_ex_id index): ")?;
            agent
                .client
                .delete_credential_exchange(cred_ex_id.trim())
                .await?;
            log_msg("Proposal deleted!");
        }
        "2b" => {
            let cred_ex_id = prompter.prompt_text("Proposal ID (cred_ex_id index): ")?;
            let cred_ex_id = cred_ex_id.trim();
            agent.client.send_offer_for_exchange(cred_ex_id).await?;
            log_msg("Credential send!");

            tokio::time::sleep(agent.settings.record_cleanup_delay).await;

            agent.client.delete_credential_exchange(cred_ex_id).await?;
            log_msg("Deleted from the memory");
        }
        other => return Err(format!("Invalid option: {other}").into()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_menu_layout() {
        let lines: Vec<&str> = RECORDS_MENU.lines().collect();
        assert_eq!(
            lines,
            vec![
                "    (2a) Delete a credential proposal",
                "    (2b) Accept a credential proposal",
                "    (X)  Exit?",
            ]
        );
    }
}
