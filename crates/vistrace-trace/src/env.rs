//! Value environment: run-global variable bindings plus the nesting-depth
//! counter used for step indentation.
//!
//! The subset has no lexical scoping, so `enter_scope`/`exit_scope` only
//! move the depth counter; bindings created inside a block stay visible
//! after it.

use std::collections::HashMap;

use crate::error::TraceError;
use crate::value::Value;

#[derive(Debug, Default)]
pub struct Env {
    vars: HashMap<String, Value>,
    depth: u32,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a binding; unbound names abort the run.
    pub fn get(&self, name: &str) -> Result<&Value, TraceError> {
        self.vars
            .get(name)
            .ok_or_else(|| TraceError::UndefinedVariable(name.to_string()))
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Create or overwrite a binding, visible to all later evaluations.
    pub fn set(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_string(), value);
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn enter_scope(&mut self) {
        self.depth += 1;
    }

    pub fn exit_scope(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_and_get_sees_it() {
        let mut env = Env::new();
        env.set("a", Value::Int(1));
        env.set("a", Value::Int(2));
        assert_eq!(env.get("a").unwrap(), &Value::Int(2));
    }

    #[test]
    fn get_unbound_fails() {
        let env = Env::new();
        assert!(matches!(
            env.get("missing"),
            Err(TraceError::UndefinedVariable(name)) if name == "missing"
        ));
    }

    #[test]
    fn scopes_only_move_depth() {
        let mut env = Env::new();
        env.enter_scope();
        env.set("a", Value::Int(1));
        env.enter_scope();
        assert_eq!(env.depth(), 2);
        env.exit_scope();
        env.exit_scope();
        assert_eq!(env.depth(), 0);
        // binding survives scope exit
        assert!(env.is_bound("a"));
    }
}
