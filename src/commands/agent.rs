//! Agent command handler.

use super::{open_provider, parse_assignments, print_json};
use leadflow::agents::AgentRole;
use leadflow::config::LeadflowConfig;
use leadflow::models::Request;
use leadflow::pipeline::Pipeline;

/// Call command.
///
/// Dispatches on a fresh agent with the semantic table loaded, so only
/// the memory written by this one call is visible.
pub fn cmd_call(
    config: &LeadflowConfig,
    agent: &str,
    method: &str,
    params: &[String],
    episodes: Option<usize>,
) -> anyhow::Result<()> {
    let role = AgentRole::parse(agent).ok_or_else(|| {
        let known: Vec<String> = AgentRole::all()
            .iter()
            .map(|role| format!("{role} ({})", role.registry().methods().join(", ")))
            .collect();
        anyhow::anyhow!("unknown agent '{agent}', expected one of: {}", known.join("; "))
    })?;
    let params = parse_assignments(params)?;

    let pipeline = Pipeline::new(open_provider(config)?, config.clone());
    pipeline.load_semantic()?;
    let Some(agent) = pipeline.agents().into_iter().find(|a| a.role() == role) else {
        anyhow::bail!("no agent for role {role}");
    };

    let reply = agent.handle(&Request {
        method: method.to_string(),
        params,
    })?;
    print_json(&reply)?;

    if let Some(n) = episodes {
        print_json(&agent.memory().episodic.recent(n))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_agent_lists_roles_and_methods() {
        let err = cmd_call(&LeadflowConfig::new(), "sales", "classify_lead", &[], None).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("unknown agent 'sales'"));
        assert!(message.contains("LeadTriage (classify_lead)"));
        assert!(message.contains("Engagement (prepare_outreach, send_outreach)"));
        assert!(message.contains("CampaignOpt (evaluate_campaigns)"));
    }
}
