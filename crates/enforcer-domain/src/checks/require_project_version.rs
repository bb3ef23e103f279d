use super::utils::with_headline;
use super::{RuleConfigError, compile_regex};
use crate::context::RuleExecutionContext;
use crate::policy::RuleSpec;
use crate::rule::{Rule, RuleError, RuleOutcome};
use regex::Regex;

const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// Constrains `${project.version}`. Without a pattern it rejects snapshot versions.
#[derive(Clone, Debug)]
pub struct RequireProjectVersion {
    id: String,
    message: Option<String>,
    regex: Option<Regex>,
    no_snapshots: bool,
}

impl RequireProjectVersion {
    pub fn from_spec(spec: &RuleSpec) -> Result<Self, RuleConfigError> {
        let regex = spec
            .regex
            .as_deref()
            .map(|r| compile_regex(&spec.id, r))
            .transpose()?;
        let no_snapshots = spec.no_snapshots || regex.is_none();

        Ok(Self {
            id: spec.id.clone(),
            message: spec.message.clone(),
            regex,
            no_snapshots,
        })
    }
}

impl Rule for RequireProjectVersion {
    fn id(&self) -> &str {
        &self.id
    }

    fn execute(&self, ctx: &RuleExecutionContext) -> Result<RuleOutcome, RuleError> {
        let version = match ctx.evaluate("${project.version}") {
            Ok(v) => v,
            Err(err) => {
                return Ok(RuleOutcome::Failed(with_headline(
                    self.message.as_deref(),
                    vec![format!("project version cannot be determined: {err}")],
                )));
            }
        };

        let mut messages = Vec::new();
        if self.no_snapshots && version.ends_with(SNAPSHOT_SUFFIX) {
            messages.push(format!("project version {version} is a snapshot"));
        }
        if let Some(re) = &self.regex
            && !re.is_match(&version)
        {
            messages.push(format!(
                "project version {version} does not match /{}/",
                re.as_str()
            ));
        }

        Ok(RuleOutcome::failed_if_any(with_headline(
            self.message.as_deref(),
            messages,
        )))
    }
}
