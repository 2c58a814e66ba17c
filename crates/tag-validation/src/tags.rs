//! Tag string parsing
//!
//! A tag is a comma-separated list of rules, e.g. `required,min=6,email|numeric`.
//! Directives shape traversal instead of checking values:
//!
//! - `-` skips the field entirely
//! - `omitempty` skips all rules when the value is its zero value
//! - `dive` applies the rest of the tag to each element of a sequence or map
//! - `keys,...,endkeys` directly after `dive` applies the enclosed rules to map keys
//!
//! Literal `,` and `|` inside a parameter are written `0x2C` and `0x7C`.

use crate::error::ConfigError;
use crate::registry::{Rule, RuleRegistry};

pub const SKIP: &str = "-";
pub const OMIT_EMPTY: &str = "omitempty";
pub const DIVE: &str = "dive";
pub const KEYS: &str = "keys";
pub const END_KEYS: &str = "endkeys";

pub(crate) const DIRECTIVES: &[&str] = &[SKIP, OMIT_EMPTY, DIVE, KEYS, END_KEYS];

/// One atomic check
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub name: String,
    pub param: Option<String>,
    /// Alias this rule was expanded from
    pub alias: Option<String>,
    pub rule: Rule,
}

impl RuleSpec {
    /// The rule as the user wrote it
    pub fn tag(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// One comma-separated slot: a single rule or an alternation
#[derive(Debug, Clone)]
pub struct RuleGroup {
    /// Token text, e.g. `email|numeric`
    pub text: String,
    pub alternatives: Vec<RuleSpec>,
}

impl RuleGroup {
    pub fn is_alternation(&self) -> bool {
        self.alternatives.len() > 1
    }

    /// A lone `required`, which stops the field when it fails
    pub fn is_required(&self) -> bool {
        matches!(self.alternatives.as_slice(), [only] if only.rule.is_required())
    }
}

/// Parsed tag of one field, element or map key
#[derive(Debug, Clone, Default)]
pub struct FieldTagSet {
    pub skip: bool,
    pub omit_empty: bool,
    pub groups: Vec<RuleGroup>,
    pub dive: Option<Box<DiveSpec>>,
}

impl FieldTagSet {
    pub fn is_empty(&self) -> bool {
        !self.skip && !self.omit_empty && self.groups.is_empty() && self.dive.is_none()
    }
}

/// What `dive` applies to each entry of a collection
#[derive(Debug, Clone, Default)]
pub struct DiveSpec {
    /// Rules for map keys, from `keys,...,endkeys`
    pub keys: Option<FieldTagSet>,
    /// Rules for elements or map values
    pub elements: FieldTagSet,
}

#[derive(Debug, Clone)]
struct Token {
    text: String,
    alias: Option<String>,
}

/// Parse a tag string against the rules and aliases of `registry`
pub fn parse_tag(
    tag: &str,
    registry: &RuleRegistry,
    max_alias_depth: usize,
) -> Result<FieldTagSet, ConfigError> {
    if tag.is_empty() {
        return Ok(FieldTagSet::default());
    }

    let mut stack = Vec::new();
    let tokens = expand(tag, tag, registry, &mut stack, max_alias_depth)?;
    build(&tokens, tag, registry)
}

/// Split on commas and replace alias tokens with their expansions, recursively
fn expand(
    text: &str,
    tag: &str,
    registry: &RuleRegistry,
    stack: &mut Vec<String>,
    max_depth: usize,
) -> Result<Vec<Token>, ConfigError> {
    let mut tokens = Vec::new();

    for raw in text.split(',') {
        if raw.is_empty() {
            return Err(ConfigError::malformed(tag, "empty rule"));
        }

        let Some(expansion) = registry.alias(raw) else {
            tokens.push(Token {
                text: raw.to_string(),
                alias: None,
            });
            continue;
        };

        if stack.iter().any(|seen| seen == raw) {
            let mut chain = stack.clone();
            chain.push(raw.to_string());
            return Err(ConfigError::AliasCycle {
                chain: chain.join(" -> "),
            });
        }
        if stack.len() >= max_depth {
            return Err(ConfigError::malformed(
                tag,
                format!("alias expansion deeper than {} levels", max_depth),
            ));
        }

        stack.push(raw.to_string());
        let expanded = expand(expansion, tag, registry, stack, max_depth)?;
        stack.pop();

        // Failures are reported under the outermost alias the user wrote
        tokens.extend(expanded.into_iter().map(|token| Token {
            alias: Some(raw.to_string()),
            ..token
        }));
    }

    Ok(tokens)
}

fn build(tokens: &[Token], tag: &str, registry: &RuleRegistry) -> Result<FieldTagSet, ConfigError> {
    let mut set = FieldTagSet::default();

    for (i, token) in tokens.iter().enumerate() {
        match token.text.as_str() {
            SKIP => {
                if tokens.len() != 1 {
                    return Err(ConfigError::malformed(tag, "'-' must be the only rule"));
                }
                set.skip = true;
            }
            OMIT_EMPTY => set.omit_empty = true,
            DIVE => {
                set.dive = Some(Box::new(build_dive(&tokens[i + 1..], tag, registry)?));
                return Ok(set);
            }
            KEYS => {
                return Err(ConfigError::malformed(tag, "'keys' must directly follow 'dive'"));
            }
            END_KEYS => {
                return Err(ConfigError::malformed(tag, "'endkeys' without matching 'keys'"));
            }
            _ => set.groups.push(parse_group(token, tag, registry)?),
        }
    }

    Ok(set)
}

fn build_dive(rest: &[Token], tag: &str, registry: &RuleRegistry) -> Result<DiveSpec, ConfigError> {
    match rest.first() {
        Some(first) if first.text == KEYS => {
            let end = rest
                .iter()
                .position(|t| t.text == END_KEYS)
                .ok_or_else(|| ConfigError::malformed(tag, "'keys' without matching 'endkeys'"))?;
            Ok(DiveSpec {
                keys: Some(build(&rest[1..end], tag, registry)?),
                elements: build(&rest[end + 1..], tag, registry)?,
            })
        }
        _ => Ok(DiveSpec {
            keys: None,
            elements: build(rest, tag, registry)?,
        }),
    }
}

fn parse_group(token: &Token, tag: &str, registry: &RuleRegistry) -> Result<RuleGroup, ConfigError> {
    let parts: Vec<&str> = token.text.split('|').collect();
    let mut alternatives = Vec::with_capacity(parts.len());

    for part in &parts {
        let (name, param) = match part.split_once('=') {
            Some((name, param)) => (name, Some(unescape(param))),
            None => (*part, None),
        };

        if name.is_empty() {
            return Err(ConfigError::malformed(tag, format!("missing rule name in '{}'", part)));
        }
        if DIRECTIVES.contains(&name) {
            return Err(ConfigError::malformed(
                tag,
                format!("'{}' cannot be used with a parameter or inside an alternation", name),
            ));
        }

        let rule = registry.resolve(name, param.as_deref(), tag)?;
        alternatives.push(RuleSpec {
            name: name.to_string(),
            param,
            alias: token.alias.clone(),
            rule,
        });
    }

    Ok(RuleGroup {
        text: token.text.clone(),
        alternatives,
    })
}

fn unescape(param: &str) -> String {
    param.replace("0x2C", ",").replace("0x7C", "|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FieldContext;
    use crate::validators::{BuiltinRule, Comparison, CustomRule, Num};

    fn parse(tag: &str) -> Result<FieldTagSet, ConfigError> {
        parse_tag(tag, &RuleRegistry::new(), 16)
    }

    fn names(set: &FieldTagSet) -> Vec<&str> {
        set.groups.iter().map(|g| g.text.as_str()).collect()
    }

    #[test]
    fn test_parse_ordered_rules_with_params() {
        let set = parse("required,numeric,min=5,max=20").unwrap();
        assert_eq!(names(&set), vec!["required", "numeric", "min=5", "max=20"]);
        assert!(set.groups[0].is_required());

        let min = &set.groups[2].alternatives[0];
        assert_eq!(min.name, "min");
        assert_eq!(min.param.as_deref(), Some("5"));
        assert!(matches!(
            min.rule,
            Rule::Builtin(BuiltinRule::Size(Comparison::Min, limit)) if limit == Num::Int(5)
        ));
    }

    #[test]
    fn test_parse_empty_tag() {
        let set = parse("").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_parse_alternation() {
        let set = parse("email|numeric").unwrap();
        assert_eq!(set.groups.len(), 1);
        assert!(set.groups[0].is_alternation());
        assert!(!set.groups[0].is_required());
        assert_eq!(set.groups[0].alternatives[1].name, "numeric");
    }

    #[test]
    fn test_parse_dive_for_sequences() {
        let set = parse("required,dive,required,min=4").unwrap();
        assert_eq!(names(&set), vec!["required"]);
        let dive = set.dive.as_ref().unwrap();
        assert!(dive.keys.is_none());
        assert_eq!(names(&dive.elements), vec!["required", "min=4"]);
    }

    #[test]
    fn test_parse_nested_dive() {
        let set = parse("min=1,dive,max=3,dive,alpha").unwrap();
        let outer = set.dive.as_ref().unwrap();
        assert_eq!(names(&outer.elements), vec!["max=3"]);
        let inner = outer.elements.dive.as_ref().unwrap();
        assert_eq!(names(&inner.elements), vec!["alpha"]);
    }

    #[test]
    fn test_parse_dive_keys_for_maps() {
        let set = parse("required,dive,keys,required,min=3,endkeys,required,gt=100").unwrap();
        let dive = set.dive.as_ref().unwrap();
        assert_eq!(names(dive.keys.as_ref().unwrap()), vec!["required", "min=3"]);
        assert_eq!(names(&dive.elements), vec!["required", "gt=100"]);
    }

    #[test]
    fn test_parse_directive_errors() {
        assert!(matches!(parse("keys,required"), Err(ConfigError::MalformedTag { .. })));
        assert!(matches!(parse("dive,keys,required"), Err(ConfigError::MalformedTag { .. })));
        assert!(matches!(parse("required,endkeys"), Err(ConfigError::MalformedTag { .. })));
        assert!(matches!(parse("required,,min=1"), Err(ConfigError::MalformedTag { .. })));
        assert!(matches!(parse("email|dive"), Err(ConfigError::MalformedTag { .. })));
        assert!(matches!(parse("-,required"), Err(ConfigError::MalformedTag { .. })));
        assert!(matches!(parse("=5"), Err(ConfigError::MalformedTag { .. })));
    }

    #[test]
    fn test_parse_missing_and_invalid_params() {
        assert!(matches!(parse("min"), Err(ConfigError::MissingParameter { .. })));
        assert!(matches!(parse("max=abc"), Err(ConfigError::InvalidParameter { .. })));
        assert!(matches!(parse("nope"), Err(ConfigError::UnknownRule { .. })));
    }

    #[test]
    fn test_parse_skip_and_omitempty() {
        assert!(parse("-").unwrap().skip);
        let set = parse("omitempty,email").unwrap();
        assert!(set.omit_empty);
        assert_eq!(names(&set), vec!["email"]);
    }

    #[test]
    fn test_escaped_params() {
        let set = parse("oneof=a0x2Cb c0x7Cd").unwrap();
        assert_eq!(
            set.groups[0].alternatives[0].param.as_deref(),
            Some("a,b c|d")
        );
    }

    #[test]
    fn test_alias_expansion() {
        let mut registry = RuleRegistry::new();
        registry.register_alias("varchar", "min=5").unwrap();
        registry.register_alias("login", "required,varchar").unwrap();

        let set = parse_tag("varchar", &registry, 16).unwrap();
        assert_eq!(names(&set), vec!["min=5"]);
        assert_eq!(set.groups[0].alternatives[0].tag(), "varchar");

        let set = parse_tag("login,max=10", &registry, 16).unwrap();
        assert_eq!(names(&set), vec!["required", "min=5", "max=10"]);
        assert_eq!(set.groups[1].alternatives[0].tag(), "login");
        assert_eq!(set.groups[2].alternatives[0].tag(), "max");
    }

    #[test]
    fn test_alias_cycle_detected() {
        let mut registry = RuleRegistry::new();
        registry.register_alias("a", "required,b").unwrap();
        registry.register_alias("b", "a").unwrap();

        let err = parse_tag("a", &registry, 16).unwrap_err();
        match err {
            ConfigError::AliasCycle { chain } => assert_eq!(chain, "a -> b -> a"),
            other => panic!("expected alias cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_alias_depth_limit() {
        let mut registry = RuleRegistry::new();
        registry.register_alias("a1", "a2").unwrap();
        registry.register_alias("a2", "a3").unwrap();
        registry.register_alias("a3", "required").unwrap();

        assert!(parse_tag("a1", &registry, 3).is_ok());
        assert!(matches!(
            parse_tag("a1", &registry, 2),
            Err(ConfigError::MalformedTag { .. })
        ));
    }

    #[test]
    fn test_custom_rules_resolve_with_params() {
        let mut registry = RuleRegistry::new();
        registry
            .register(CustomRule::new("pin", |ctx: &FieldContext<'_>| ctx.param().is_some()))
            .unwrap();

        let set = parse_tag("pin=5,required", &registry, 16).unwrap();
        let pin = &set.groups[0].alternatives[0];
        assert!(matches!(pin.rule, Rule::Custom(_)));
        assert_eq!(pin.param.as_deref(), Some("5"));
    }
}
