use tracing::debug;
use tsp_sdk::offers::{DegreeInput, Moment, OfferContext, generate_credential_offer};

use crate::agent::IssuerAgent;
use crate::prompt::Prompter;
use crate::render::log_status;

/// Ask for the holder's details and send them a degree credential offer.
pub async fn cmd_issue_credential(
    agent: &mut IssuerAgent,
    prompter: &mut dyn Prompter,
) -> Result<(), Box<dyn std::error::Error>> {
    log_status("#13 Issue credential offer to X");
    let input = DegreeInput {
        name: prompter.prompt_text("Fullname: ")?,
        age: prompter.prompt_text("Age: ")?,
        degree: prompter.prompt_text("Degree: ")?,
    };

    let ctx = OfferContext {
        aip: agent.settings.aip,
        format: agent.settings.offer_format(),
        cred_def_id: agent.cred_def_id.as_deref().unwrap_or_default(),
        connection_id: agent.connection_id.as_deref(),
        exchange_tracing: agent.settings.exchange_tracing,
    };
    let offer = generate_credential_offer(&mut agent.cred_attrs, &ctx, &input, Moment::now())?;
    debug!(attributes = ?agent.cred_attrs.get(ctx.cred_def_id), "offering");

    agent.client.send_offer(agent.settings.aip, &offer).await?;
    Ok(())
}
