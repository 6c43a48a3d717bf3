use super::format_remaining;
use rota_core::{ProviderStatus, RotationEngine};

pub fn run(engine: &RotationEngine, json: bool) -> anyhow::Result<()> {
    let statuses = engine.status();
    if json {
        println!("{}", serde_json::to_string_pretty(&to_json(&statuses))?);
    } else {
        print_table(&statuses);
    }
    Ok(())
}

pub fn print_table(statuses: &[ProviderStatus]) {
    println!(
        "{:<12} {:<5} {:>4}  {:<18} {:<28} STATE",
        "PROVIDER", "TIER", "PRIO", "FAMILY", "MODEL"
    );
    for s in statuses {
        println!(
            "{:<12} {:<5} {:>4}  {:<18} {:<28} {}",
            s.name,
            s.tier,
            s.priority,
            s.family,
            s.model,
            state_label(s)
        );
    }
}

fn state_label(status: &ProviderStatus) -> String {
    match (status.available, status.cooldown_remaining) {
        (false, _) => "not configured".to_string(),
        (true, Some(remaining)) => format!("cooling down ({})", format_remaining(remaining)),
        (true, None) => "ready".to_string(),
    }
}

fn to_json(statuses: &[ProviderStatus]) -> serde_json::Value {
    statuses
        .iter()
        .map(|s| {
            serde_json::json!({
                "name": s.name,
                "tier": s.tier,
                "priority": s.priority,
                "family": s.family,
                "model": s.model,
                "available": s.available,
                "cooldown_secs": s.cooldown_remaining.map(|r| r.as_secs()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rota_provider::{Tier, WireFamily};
    use std::time::Duration;

    fn status(available: bool, cooldown: Option<u64>) -> ProviderStatus {
        ProviderStatus {
            name: "groq".to_string(),
            tier: Tier::Free,
            priority: 30,
            family: WireFamily::OpenAiCompatible,
            model: "llama3-70b-8192".to_string(),
            available,
            cooldown_remaining: cooldown.map(Duration::from_secs),
        }
    }

    #[test]
    fn test_state_label() {
        assert_eq!(state_label(&status(true, None)), "ready");
        assert_eq!(state_label(&status(true, Some(42))), "cooling down (42s)");
        assert_eq!(state_label(&status(false, None)), "not configured");
    }

    #[test]
    fn test_to_json() {
        let value = to_json(&[status(true, Some(5))]);
        assert_eq!(value[0]["name"], "groq");
        assert_eq!(value[0]["tier"], "free");
        assert_eq!(value[0]["family"], "openai-compatible");
        assert_eq!(value[0]["cooldown_secs"], 5);
    }
}
