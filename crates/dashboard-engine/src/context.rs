//! Shared state for one evaluation run.

use serde_json::Value as JsonValue;

use crate::error::EvaluateResult;
use crate::query::{self, ItemSearcher, QueryCache, QueryResults, QueryType};
use crate::script::{self, Scope, ScriptHost, Value};

/// Everything a widget needs to evaluate itself: the searcher, the
/// script host, the per-run query cache and the `userdata` object that
/// setup scripts populate for later widgets.
///
/// One context lives for exactly one [`Dashboard::evaluate`] run.
///
/// [`Dashboard::evaluate`]: crate::widget::Dashboard::evaluate
pub struct EvaluationContext<'a> {
    searcher: &'a dyn ItemSearcher,
    host: &'a dyn ScriptHost,
    query_cache: QueryCache,
    user_data: Value,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(searcher: &'a dyn ItemSearcher, host: &'a dyn ScriptHost) -> Self {
        Self {
            searcher,
            host,
            query_cache: QueryCache::new(),
            user_data: Value::Object(Default::default()),
        }
    }

    /// The `userdata` object as left by any scripts run so far.
    pub fn user_data(&self) -> &Value {
        &self.user_data
    }

    /// Scope for templates with no widget value in flight: `userdata`
    /// only.
    fn base_scope(&self) -> Scope {
        let mut scope = Scope::new();
        // `userdata` is not a builtin name, so binding cannot fail.
        scope
            .bind("userdata", self.user_data.clone())
            .expect("userdata binding");
        scope
    }

    /// Resolves every `{{ ... }}` span in a template.
    pub fn resolve(&self, template: &str) -> EvaluateResult<String> {
        Ok(script::resolve_template(
            self.host,
            template,
            &self.base_scope(),
        )?)
    }

    /// Resolves an optional template, passing `None` through.
    pub fn resolve_optional(&self, template: Option<&str>) -> EvaluateResult<Option<String>> {
        template.map(|t| self.resolve(t)).transpose()
    }

    /// Resolves widget metadata (title, url, color, align) with the
    /// widget's computed value bound as `value`.
    pub fn resolve_metadata(
        &self,
        template: Option<&str>,
        value: &Value,
    ) -> EvaluateResult<Option<String>> {
        let template = match template {
            Some(template) => template,
            None => return Ok(None),
        };

        let mut scope = self.base_scope();
        scope.bind("value", value.clone())?;

        Ok(Some(script::resolve_template(self.host, template, &scope)?))
    }

    /// Resolves a table field template with one query result bound as
    /// `item`.
    pub fn resolve_item_value(&self, template: &str, item: &JsonValue) -> EvaluateResult<String> {
        let mut scope = self.base_scope();
        scope.bind("item", Value::from(item))?;

        Ok(script::resolve_template(self.host, template, &scope)?)
    }

    /// Resolves a query template and runs it through the cache.
    pub async fn run_query(
        &mut self,
        query_type: QueryType,
        query: &str,
        limit: usize,
    ) -> EvaluateResult<QueryResults> {
        let resolved = self.resolve(query)?;

        Ok(query::evaluate_query(
            self.searcher,
            &mut self.query_cache,
            query_type,
            &resolved,
            limit,
        )
        .await?)
    }

    /// Runs a setup, shutdown or widget script. Changes the script makes
    /// to `userdata` persist into later evaluation.
    pub fn run_script(&mut self, source: &str) -> EvaluateResult<Value> {
        let mut scope = self.base_scope();
        let result = self.host.eval_script(source, &mut scope)?;

        if let Some(user_data) = scope.get("userdata") {
            self.user_data = user_data.clone();
        }

        Ok(result)
    }
}
