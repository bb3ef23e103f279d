use super::utils::with_headline;
use super::{RuleConfigError, compile_regex};
use crate::context::RuleExecutionContext;
use crate::policy::RuleSpec;
use crate::rule::{Rule, RuleError, RuleOutcome};
use regex::Regex;

/// A property must resolve, and optionally match a pattern.
#[derive(Clone, Debug)]
pub struct RequireProperty {
    id: String,
    message: Option<String>,
    property: String,
    regex: Option<Regex>,
}

impl RequireProperty {
    pub fn from_spec(spec: &RuleSpec) -> Result<Self, RuleConfigError> {
        let property = spec
            .property
            .clone()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| RuleConfigError::MissingParameter {
                rule_id: spec.id.clone(),
                parameter: "property",
            })?;
        let regex = spec
            .regex
            .as_deref()
            .map(|r| compile_regex(&spec.id, r))
            .transpose()?;

        Ok(Self {
            id: spec.id.clone(),
            message: spec.message.clone(),
            property,
            regex,
        })
    }

    /// A bare name is looked up as `${name}`; anything already holding a reference is
    /// evaluated as written.
    fn expression(&self) -> String {
        if self.property.contains("${") {
            self.property.clone()
        } else {
            format!("${{{}}}", self.property)
        }
    }
}

impl Rule for RequireProperty {
    fn id(&self) -> &str {
        &self.id
    }

    fn execute(&self, ctx: &RuleExecutionContext) -> Result<RuleOutcome, RuleError> {
        let failure = match ctx.evaluate(&self.expression()) {
            Err(err) => {
                ctx.log().debug(&err.to_string());
                Some(format!("property '{}' is required but not set", self.property))
            }
            Ok(value) => match &self.regex {
                Some(re) if !re.is_match(&value) => Some(format!(
                    "property '{}' is '{value}', which does not match /{}/",
                    self.property,
                    re.as_str()
                )),
                _ => None,
            },
        };

        Ok(RuleOutcome::failed_if_any(with_headline(
            self.message.as_deref(),
            failure.into_iter().collect(),
        )))
    }
}
