use tracing::{debug, debug_span};

use super::{GrammarError, Rule, RuleFlag, RuleSet, RuleToken};
use crate::fst::FstWriter;
use crate::symbol::{escape, Symbol};

/// Compiles a [`RuleSet`] into a transducer rooted at one class.
///
/// Each class gets a fresh exit state joined by an epsilon arc from the end
/// of every alternative. A repeated rule loops through its own start state.
/// The class graph must be acyclic; repetition is expressed with `*`.
pub struct GrammarCompiler<'a> {
    rules: &'a RuleSet,
}

impl<'a> GrammarCompiler<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Compile the class `root` starting at state 0, mark its exit state
    /// final and finish `writer`.
    pub fn compile(&self, root: &str, writer: &mut dyn FstWriter) -> Result<(), GrammarError> {
        let _span = debug_span!("compile_grammar", root, classes = self.rules.len()).entered();

        let mut history = Vec::new();
        let final_state = self.class(root, &mut history, 0, writer)?;
        writer.set_final(final_state, 0.0)?;
        writer.finish()?;

        debug!(final_state, "grammar compiled");
        Ok(())
    }

    fn alternatives(&self, name: &str) -> Result<&'a [Rule], GrammarError> {
        self.rules
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| GrammarError::UndefinedClass(name.to_string()))
    }

    fn class(
        &self,
        name: &str,
        history: &mut Vec<String>,
        src: u32,
        writer: &mut dyn FstWriter,
    ) -> Result<u32, GrammarError> {
        if history.iter().any(|c| c == name) {
            let mut cycle = history.clone();
            cycle.push(name.to_string());
            return Err(GrammarError::ReferenceCycle(cycle));
        }
        let rules = self.alternatives(name)?;

        history.push(name.to_string());
        let dest = writer.create_state();
        for rule in rules {
            let end = self.rule(name, rule, history, src, writer)?;
            writer.add_arc(end, dest, &Symbol::Eps, &Symbol::Eps, rule.weight)?;
        }
        history.pop();
        Ok(dest)
    }

    fn rule(
        &self,
        class: &str,
        rule: &Rule,
        history: &mut Vec<String>,
        src: u32,
        writer: &mut dyn FstWriter,
    ) -> Result<u32, GrammarError> {
        let start = if rule.flag == RuleFlag::Repeat {
            if !self.always_consumes(&rule.tokens, &mut vec![class.to_string()])? {
                return Err(GrammarError::EmptyRepeat {
                    class: class.to_string(),
                });
            }
            let start = writer.create_state();
            writer.add_arc(src, start, &Symbol::Eps, &Symbol::Eps, 0.0)?;
            start
        } else {
            src
        };

        let mut state = start;
        for token in &rule.tokens {
            state = self.token(class, token, history, state, writer)?;
        }

        match rule.flag {
            RuleFlag::Once => Ok(state),
            RuleFlag::Optional => {
                if state != src {
                    writer.add_arc(src, state, &Symbol::Eps, &Symbol::Eps, 0.0)?;
                }
                Ok(state)
            }
            RuleFlag::Repeat => {
                writer.add_arc(state, start, &Symbol::Eps, &Symbol::Eps, 0.0)?;
                Ok(start)
            }
        }
    }

    fn token(
        &self,
        class: &str,
        token: &RuleToken,
        history: &mut Vec<String>,
        src: u32,
        writer: &mut dyn FstWriter,
    ) -> Result<u32, GrammarError> {
        let empty = || GrammarError::EmptySymbol {
            class: class.to_string(),
        };

        let mut state = src;
        match token {
            RuleToken::Symbol(text) | RuleToken::Input(text) => {
                if text.is_empty() {
                    return Err(empty());
                }
                for ch in text.chars() {
                    let isymbol = Symbol::Text(escape(ch.encode_utf8(&mut [0; 4])));
                    let osymbol = match token {
                        RuleToken::Input(_) => Symbol::Eps,
                        _ => isymbol.clone(),
                    };
                    let next = writer.create_state();
                    writer.add_arc(state, next, &isymbol, &osymbol, 0.0)?;
                    state = next;
                }
            }
            RuleToken::Output(word) => {
                if word.is_empty() {
                    return Err(empty());
                }
                let next = writer.create_state();
                writer.add_arc(state, next, &Symbol::Eps, &Symbol::Text(escape(word)), 0.0)?;
                state = next;
            }
            RuleToken::Class(name) => {
                state = self.class(name, history, state, writer)?;
            }
            RuleToken::Epsilon => {}
        }
        Ok(state)
    }

    /// True if every match of `tokens` reads at least one input symbol.
    fn always_consumes(
        &self,
        tokens: &[RuleToken],
        visiting: &mut Vec<String>,
    ) -> Result<bool, GrammarError> {
        for token in tokens {
            let consumes = match token {
                RuleToken::Symbol(text) | RuleToken::Input(text) => !text.is_empty(),
                RuleToken::Output(_) | RuleToken::Epsilon => false,
                // cycles are reported by the compiler itself
                RuleToken::Class(name) if visiting.contains(name) => false,
                RuleToken::Class(name) => {
                    visiting.push(name.clone());
                    let mut all = true;
                    for rule in self.alternatives(name)? {
                        if rule.flag != RuleFlag::Once
                            || !self.always_consumes(&rule.tokens, visiting)?
                        {
                            all = false;
                            break;
                        }
                    }
                    visiting.pop();
                    all
                }
            };
            if consumes {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
