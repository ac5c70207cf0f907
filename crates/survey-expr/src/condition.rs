//! Boolean condition expressions over answer values.
//!
//! A condition is a Rhai expression in which `{name}` stands for the answer stored under `name`:
//!
//! ```text
//! {age} >= 18 && {country} == "NZ"
//! notempty({email}) || {contact.phone} != ""
//! ```
//!
//! Dotted names reach into object answers. Object-map literals (`#{...}`) are left untouched.
//! `empty(x)` and `notempty(x)` apply [`is_value_empty`] to any value. Missing answers are `()`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use rhai::{
    AST, Dynamic, Engine, Scope,
    serde::{from_dynamic, to_dynamic},
};
use serde_json::Value;
use tracing::{debug, trace};

use crate::{ExprError, ValueMap, is_value_empty, lookup};

/// Matches `{name}` references; the optional leading `#` identifies map literals to skip.
static REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(#?)\{([^{}]+)\}").expect("reference pattern is valid"));

/// A compiled expression plus the answers bound to its variables.
struct Compiled {
    /// Expression text the AST was compiled from.
    source: String,
    /// Compiled Rhai expression.
    ast: AST,
    /// `(variable, answer name)` pairs in first-use order.
    bindings: Vec<(String, String)>,
}

/// Evaluates a boolean expression against a flat answer mapping.
///
/// The runner is created once per owner. Its expression text may be replaced at any time; the
/// compiled form is rebuilt on the next run whenever the text differs from what was compiled.
pub struct ConditionRunner {
    /// Current expression text.
    expression: String,
    /// Sandboxed engine with the helper functions registered.
    engine: Engine,
    /// Cached compilation of the most recently evaluated text.
    compiled: Option<Compiled>,
}

impl fmt::Debug for ConditionRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionRunner")
            .field("expression", &self.expression)
            .field("compiled", &self.compiled.as_ref().map(|c| c.source.as_str()))
            .finish()
    }
}

impl ConditionRunner {
    /// Create a runner for `expression`. Nothing is compiled until the first run.
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            engine: build_engine(),
            compiled: None,
        }
    }

    /// Current expression text.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Replace the expression text.
    pub fn set_expression(&mut self, expression: impl Into<String>) {
        self.expression = expression.into();
    }

    /// Evaluate against `values`, treating every failure as `false`.
    pub fn run(&mut self, values: &ValueMap) -> bool {
        match self.try_run(values) {
            Ok(result) => result,
            Err(err) => {
                debug!(expression = %self.expression, error = %err, "condition_failed");
                false
            }
        }
    }

    /// Evaluate against `values`, surfacing compile and evaluation failures.
    pub fn try_run(&mut self, values: &ValueMap) -> Result<bool, ExprError> {
        let compiled = compiled_for(&mut self.compiled, &self.engine, &self.expression)?;

        let mut scope = Scope::new();
        for (var, name) in &compiled.bindings {
            let value = lookup(values, name).unwrap_or(&Value::Null);
            scope.push_dynamic(var.clone(), to_rhai(value));
        }

        let result = self
            .engine
            .eval_ast_with_scope::<Dynamic>(&mut scope, &compiled.ast)
            .map_err(|err| ExprError::Eval {
                expression: self.expression.clone(),
                message: err.to_string(),
            })?;

        let outcome = result.as_bool().map_err(|type_name| ExprError::NotBoolean {
            expression: self.expression.clone(),
            type_name: type_name.to_string(),
        })?;
        trace!(expression = %self.expression, outcome, "condition_evaluated");
        Ok(outcome)
    }
}

/// Return the compilation of `expression`, recompiling when the cached one is stale.
fn compiled_for<'a>(
    slot: &'a mut Option<Compiled>,
    engine: &Engine,
    expression: &str,
) -> Result<&'a Compiled, ExprError> {
    let compiled = match slot.take() {
        Some(compiled) if compiled.source == expression => compiled,
        _ => compile(engine, expression)?,
    };
    Ok(slot.insert(compiled))
}

/// Rewrite `{name}` references into variables and compile the result.
fn compile(engine: &Engine, expression: &str) -> Result<Compiled, ExprError> {
    let mut bindings: Vec<(String, String)> = Vec::new();
    let rewritten = REFERENCE.replace_all(expression, |caps: &Captures<'_>| {
        if !caps[1].is_empty() {
            return caps[0].to_string();
        }
        let name = caps[2].trim();
        if let Some((var, _)) = bindings.iter().find(|(_, bound)| bound == name) {
            return var.clone();
        }
        let var = format!("v{}", bindings.len());
        bindings.push((var.clone(), name.to_string()));
        var
    });

    let ast = engine
        .compile_expression(rewritten.as_ref())
        .map_err(|err| ExprError::Parse {
            expression: expression.to_string(),
            message: err.to_string(),
        })?;
    debug!(expression, bindings = bindings.len(), "condition_compiled");

    Ok(Compiled {
        source: expression.to_string(),
        ast,
        bindings,
    })
}

/// Convert an answer into a Rhai value; anything unrepresentable becomes `()`.
fn to_rhai(value: &Value) -> Dynamic {
    to_dynamic(value).unwrap_or(Dynamic::UNIT)
}

/// Emptiness check for Rhai values, mirroring [`is_value_empty`].
fn dynamic_is_empty(value: &Dynamic) -> bool {
    from_dynamic::<Value>(value).is_ok_and(|v| is_value_empty(&v))
}

/// Build a sandboxed engine for condition evaluation.
fn build_engine() -> Engine {
    let mut engine = Engine::new();
    engine.on_print(|s| debug!(target: "survey_expr::rhai", "{}", s));
    engine.on_debug(|s, src, pos| {
        debug!(target: "survey_expr::rhai", "{} @ {:?}:{:?}", s, src, pos);
    });

    // Conditions run on every answer change; keep them cheap.
    engine.set_max_operations(10_000);
    engine.set_max_call_levels(16);
    engine.set_max_expr_depths(64, 32);

    engine.register_fn("empty", |value: Dynamic| dynamic_is_empty(&value));
    engine.register_fn("notempty", |value: Dynamic| !dynamic_is_empty(&value));
    engine
}
