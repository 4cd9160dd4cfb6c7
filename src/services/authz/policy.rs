/*
 * Responsibility
 * - The decision structure the enforcement point (API gateway) consumes
 * - Coarse policy: one statement, execute-api:Invoke over "*"
 */
use serde::Serialize;

const POLICY_VERSION: &str = "2012-10-17";
const INVOKE_ACTION: &str = "execute-api:Invoke";
const ALL_RESOURCES: &str = "*";

/// Principal attached to a denial, where no verified identity exists.
pub const ANONYMOUS_PRINCIPAL: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyStatement {
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Effect")]
    pub effect: Effect,
    #[serde(rename = "Resource")]
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statement: Vec<PolicyStatement>,
}

/// An allow/deny verdict for one request. Construct via `allow`/`deny`
/// only, so the effect and the principal always agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizerDecision {
    #[serde(rename = "principalId")]
    principal_id: String,
    #[serde(rename = "policyDocument")]
    policy_document: PolicyDocument,
}

impl AuthorizerDecision {
    pub fn allow(principal_id: impl Into<String>) -> Self {
        Self::with_effect(principal_id.into(), Effect::Allow)
    }

    /// Denials carry a fixed placeholder principal: there is no verified
    /// identity to attach.
    pub fn deny() -> Self {
        Self::with_effect(ANONYMOUS_PRINCIPAL.to_string(), Effect::Deny)
    }

    fn with_effect(principal_id: String, effect: Effect) -> Self {
        Self {
            principal_id,
            policy_document: PolicyDocument {
                version: POLICY_VERSION.to_string(),
                statement: vec![PolicyStatement {
                    action: INVOKE_ACTION.to_string(),
                    effect,
                    resource: ALL_RESOURCES.to_string(),
                }],
            },
        }
    }

    pub fn principal_id(&self) -> &str {
        &self.principal_id
    }

    pub fn effect(&self) -> Effect {
        // constructed with exactly one statement
        self.policy_document.statement[0].effect
    }

    pub fn is_allowed(&self) -> bool {
        self.effect() == Effect::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_wire_shape() {
        let decision = AuthorizerDecision::allow("user-123");
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "principalId": "user-123",
                "policyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [{
                        "Action": "execute-api:Invoke",
                        "Effect": "Allow",
                        "Resource": "*"
                    }]
                }
            })
        );
    }

    #[test]
    fn deny_uses_placeholder_principal() {
        let decision = AuthorizerDecision::deny();
        assert_eq!(decision.principal_id(), ANONYMOUS_PRINCIPAL);
        assert_eq!(decision.effect(), Effect::Deny);
        assert!(!decision.is_allowed());
    }
}
