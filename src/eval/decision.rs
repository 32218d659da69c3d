/// Outcome severity, ordered `Allow < Ask < Block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Decision {
    Allow,
    Ask,
    Block,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Ask => "ask",
            Decision::Block => "block",
        }
    }

    /// Value for the flat `{"decision": ...}` response shape.
    pub fn flat_str(self) -> &'static str {
        match self {
            Decision::Allow => "approve",
            Decision::Ask => "ask",
            Decision::Block => "block",
        }
    }

    /// Value for the nested `permissionDecision` response field.
    pub fn permission_str(self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Ask => "ask",
            Decision::Block => "deny",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Decision::Allow => "ALLOW",
            Decision::Ask => "ASK",
            Decision::Block => "BLOCK",
        }
    }
}

/// One checker's verdict on one segment or file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub decision: Decision,
    pub reason: String,
}

impl CheckResult {
    pub fn allow() -> Self {
        Self {
            decision: Decision::Allow,
            reason: String::new(),
        }
    }

    pub fn ask(reason: impl Into<String>) -> Self {
        Self {
            decision: Decision::Ask,
            reason: reason.into(),
        }
    }

    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            decision: Decision::Block,
            reason: reason.into(),
        }
    }

    pub fn is_allow(&self) -> bool {
        self.decision == Decision::Allow
    }
}

/// The merged verdict for a whole command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalDecision {
    pub decision: Decision,
    /// Reasons of every result at the winning severity, newline-joined.
    pub reason: String,
    /// Checkers that produced the winning severity, in first-seen order.
    pub triggered: Vec<&'static str>,
}

impl FinalDecision {
    pub fn allow(reason: impl Into<String>) -> Self {
        Self {
            decision: Decision::Allow,
            reason: reason.into(),
            triggered: Vec::new(),
        }
    }
}

impl From<CheckResult> for FinalDecision {
    fn from(result: CheckResult) -> Self {
        Self {
            decision: result.decision,
            reason: result.reason,
            triggered: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Decision::Block > Decision::Ask);
        assert!(Decision::Ask > Decision::Allow);
        assert_eq!(
            [Decision::Ask, Decision::Block, Decision::Allow]
                .into_iter()
                .max(),
            Some(Decision::Block)
        );
    }

    #[test]
    fn wire_strings() {
        assert_eq!(Decision::Allow.flat_str(), "approve");
        assert_eq!(Decision::Block.flat_str(), "block");
        assert_eq!(Decision::Block.permission_str(), "deny");
        assert_eq!(Decision::Allow.permission_str(), "allow");
        assert_eq!(Decision::Ask.permission_str(), "ask");
    }
}
