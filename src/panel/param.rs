//! panel::param
//!
//! Read and write a single parameter.
//!
//! Edited text is coerced the same way primitive fields are: a number if it
//! parses as one, otherwise the literal string.

use async_trait::async_trait;

use super::{Panel, PanelError, PanelSettings};
use crate::catalog::Catalog;
use crate::core::types::ScalarTag;
use crate::core::value::Value;
use crate::core::value_tree::{Liveness, ValueTreeError};

#[derive(Debug)]
pub struct ParamPanel {
    name: String,
    settings: PanelSettings,
    liveness: Liveness,
    value: Option<Value>,
    text: String,
}

impl ParamPanel {
    pub const KIND: &'static str = "param";

    pub fn new(name: impl Into<String>, settings: PanelSettings) -> Self {
        Self {
            name: name.into(),
            settings,
            liveness: Liveness::new(),
            value: None,
            text: String::new(),
        }
    }

    /// Last value read from or written to the catalog.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Current display text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Edit the display text.
    pub fn set_text(&mut self, text: &str) -> Result<(), PanelError> {
        self.check_alive()?;
        self.text = text.to_string();
        Ok(())
    }

    /// The value the current text would be written as.
    ///
    /// In strict mode a parameter that currently holds a number only
    /// accepts numeric text.
    pub fn pending_value(&self) -> Result<Value, PanelError> {
        let value = Value::coerce(&self.text);
        let was_number = matches!(self.value, Some(Value::Number(_)));
        if self.settings.strict_input && was_number && !matches!(value, Value::Number(_)) {
            return Err(ValueTreeError::InvalidInput {
                path: self.name.clone(),
                text: self.text.clone(),
                tag: ScalarTag::Float64,
            }
            .into());
        }
        Ok(value)
    }

    /// Write the current text to the catalog.
    pub async fn commit(&mut self, catalog: &dyn Catalog) -> Result<Value, PanelError> {
        self.check_alive()?;
        let value = self.pending_value()?;
        catalog.set_param(&self.name, &value).await?;
        self.check_alive()?;

        tracing::debug!(param = %self.name, "parameter written");
        self.value = Some(value.clone());
        Ok(value)
    }

    /// Remove the parameter from the catalog.
    pub async fn delete(&mut self, catalog: &dyn Catalog) -> Result<(), PanelError> {
        self.check_alive()?;
        catalog.delete_param(&self.name).await?;
        self.check_alive()?;

        tracing::debug!(param = %self.name, "parameter deleted");
        self.value = None;
        self.text.clear();
        Ok(())
    }

    fn display(value: &Value) -> String {
        match value {
            Value::List(items) => {
                let inner: Vec<String> = items.iter().map(Value::to_plain_string).collect();
                format!("[{}]", inner.join(","))
            }
            other => other.to_plain_string(),
        }
    }

    fn check_alive(&self) -> Result<(), PanelError> {
        if self.liveness.is_alive() {
            Ok(())
        } else {
            Err(ValueTreeError::Detached.into())
        }
    }
}

#[async_trait]
impl Panel for ParamPanel {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn target(&self) -> &str {
        &self.name
    }

    async fn attach(&mut self, catalog: &dyn Catalog) -> Result<(), PanelError> {
        self.check_alive()?;
        let value = catalog.get_param(&self.name).await?;
        self.check_alive()?;

        self.text = Self::display(&value);
        self.value = Some(value);
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.value.is_some() && self.liveness.is_alive()
    }

    fn entries(&self) -> Result<Vec<(String, String)>, PanelError> {
        self.check_alive()?;
        if self.value.is_none() {
            return Err(ValueTreeError::NotReady.into());
        }
        Ok(vec![(self.name.clone(), self.text.clone())])
    }

    fn teardown(&mut self) {
        self.liveness.revoke();
        self.value = None;
    }
}
