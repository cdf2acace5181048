
use super::{Rule, RuleSet, RuleToken};

fn rule_set(classes: Vec<(&str, Vec<Rule>)>) -> RuleSet {
    classes
        .into_iter()
        .map(|(name, rules)| (name.to_string(), rules))
        .collect()
}

fn class(name: &str) -> RuleToken {
    RuleToken::Class(name.into())
}

fn input(text: &str) -> RuleToken {
    RuleToken::Input(text.into())
}

fn output(word: &str) -> RuleToken {
    RuleToken::Output(word.into())
}

fn sym(text: &str) -> RuleToken {
    RuleToken::Symbol(text.into())
}
