//! panel::monitor
//!
//! Display-only view of a topic's messages.

use async_trait::async_trait;

use super::{bind_tree, Panel, PanelError, PanelSettings};
use crate::catalog::{Catalog, DescriptorRole, EntityKind};
use crate::core::types::TypeName;
use crate::core::value::Value;
use crate::core::value_tree::{BoundTree, Liveness, TextFactory};

/// Shows each incoming message of a topic.
#[derive(Debug)]
pub struct MonitorPanel {
    topic: String,
    settings: PanelSettings,
    type_name: Option<TypeName>,
    tree: BoundTree<TextFactory>,
}

impl MonitorPanel {
    pub const KIND: &'static str = "monitor";

    pub fn new(topic: impl Into<String>, settings: PanelSettings) -> Self {
        Self {
            topic: topic.into(),
            settings,
            type_name: None,
            tree: BoundTree::new(Liveness::new()),
        }
    }

    /// The topic's message type, once attached.
    pub fn type_name(&self) -> Option<&TypeName> {
        self.type_name.as_ref()
    }

    /// Display an incoming message.
    pub fn on_message(&mut self, message: &Value) -> Result<(), PanelError> {
        self.tree.refresh(message)?;
        Ok(())
    }

    /// Displayed text of one field.
    pub fn text(&self, path: &str) -> Result<Option<String>, PanelError> {
        Ok(self.tree.tree()?.text(path))
    }
}

#[async_trait]
impl Panel for MonitorPanel {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn target(&self) -> &str {
        &self.topic
    }

    async fn attach(&mut self, catalog: &dyn Catalog) -> Result<(), PanelError> {
        let type_name = catalog.entity_type(EntityKind::Topics, &self.topic).await?;
        tracing::debug!(topic = %self.topic, type_name = %type_name, "attaching monitor");

        bind_tree(
            &mut self.tree,
            catalog,
            &self.settings,
            &type_name,
            DescriptorRole::Message,
            None,
        )
        .await?;
        self.type_name = Some(type_name);
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.tree.is_ready()
    }

    fn entries(&self) -> Result<Vec<(String, String)>, PanelError> {
        Ok(self.tree.tree()?.entries())
    }

    fn teardown(&mut self) {
        self.tree.teardown();
    }
}
