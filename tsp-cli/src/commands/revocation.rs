use tsp_sdk::AdminError;
use tsp_sdk::client::RevokeRequest;

use crate::agent::IssuerAgent;
use crate::prompt::Prompter;
use crate::render::{log_msg, log_warn, published_revocations_message};

const REVOCATION_COMMENT: &str = "Revocation reason goes here ...";

/// Agent-side failures are reported and the menu carries on; anything else
/// still aborts.
fn swallow_client_error<T>(result: Result<T, AdminError>) -> Result<Option<T>, AdminError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_client_error() => {
            log_warn(&format!("Request failed: {e}"));
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

pub async fn cmd_revoke(
    agent: &mut IssuerAgent,
    prompter: &mut dyn Prompter,
) -> Result<(), Box<dyn std::error::Error>> {
    let rev_reg_id = prompter.prompt_text("Enter revocation registry ID: ")?;
    let cred_rev_id = prompter.prompt_text("Enter credential revocation ID: ")?;
    let publish = prompter
        .prompt_with_default("Publish now? [Y/N]: ", Some("N"))?
        .is_some_and(|answer| matches!(answer.trim(), "y" | "Y"));

    // thread_id is left to the agent
    let req = RevokeRequest {
        rev_reg_id: rev_reg_id.trim().to_string(),
        cred_rev_id: cred_rev_id.trim().to_string(),
        publish,
        connection_id: agent.connection_id.clone(),
        comment: REVOCATION_COMMENT.to_string(),
    };
    swallow_client_error(agent.client.revoke(&req).await)?;
    Ok(())
}

pub async fn cmd_publish_revocations(
    agent: &mut IssuerAgent,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(resp) = swallow_client_error(agent.client.publish_revocations().await)? {
        log_msg(&published_revocations_message(resp.rrid2crid.keys()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_client_errors_are_swallowed() {
        let result: Result<(), AdminError> = Err(AdminError::Status {
            status: StatusCode::NOT_FOUND,
            body: "missing".into(),
        });
        assert!(matches!(swallow_client_error(result), Ok(None)));
    }

    #[test]
    fn test_other_errors_propagate() {
        let result: Result<(), AdminError> = Err(AdminError::UnexpectedResponse("x".into()));
        assert!(swallow_client_error(result).is_err());
    }

    #[test]
    fn test_success_passes_through() {
        assert!(matches!(swallow_client_error(Ok(5)), Ok(Some(5))));
    }
}
