//! panel::publisher
//!
//! Message composer for a topic.
//!
//! The user edits placeholders; [`PublisherPanel::message`] collects them
//! into the message to publish. The collected values double as the panel's
//! saved state, so a restored panel shows what was last composed.

use async_trait::async_trait;

use super::{bind_tree, Panel, PanelError, PanelSettings, SavedPanel};
use crate::catalog::{Catalog, DescriptorRole, EntityKind};
use crate::core::types::TypeName;
use crate::core::value::Value;
use crate::core::value_tree::{BoundTree, Liveness, TextFactory};

#[derive(Debug)]
pub struct PublisherPanel {
    topic: String,
    settings: PanelSettings,
    saved: Option<Value>,
    type_name: Option<TypeName>,
    tree: BoundTree<TextFactory>,
}

impl PublisherPanel {
    pub const KIND: &'static str = "publisher";

    pub fn new(topic: impl Into<String>, settings: PanelSettings) -> Self {
        Self {
            topic: topic.into(),
            settings,
            saved: None,
            type_name: None,
            tree: BoundTree::new(Liveness::new()),
        }
    }

    /// Recreate a panel from saved state. Values show up once attached.
    pub fn restore(saved: SavedPanel, settings: PanelSettings) -> Result<Self, PanelError> {
        if saved.kind != Self::KIND {
            return Err(PanelError::KindMismatch {
                expected: Self::KIND,
                found: saved.kind,
            });
        }
        let mut panel = Self::new(saved.target, settings);
        panel.saved = Some(saved.values).filter(|v| !v.is_undefined());
        Ok(panel)
    }

    pub fn type_name(&self) -> Option<&TypeName> {
        self.type_name.as_ref()
    }

    /// Edit one field.
    pub fn set_text(&mut self, path: &str, text: &str) -> Result<(), PanelError> {
        self.tree.set_text(path, text)?;
        Ok(())
    }

    /// Grow a composite array by one blank element.
    pub fn append(&mut self, path: &str) -> Result<usize, PanelError> {
        Ok(self.tree.append(path)?)
    }

    /// The message as currently composed.
    pub fn message(&self) -> Result<Value, PanelError> {
        Ok(self.tree.collect()?)
    }

    /// State to persist for [`restore`](Self::restore).
    pub fn saved(&self) -> Result<SavedPanel, PanelError> {
        Ok(SavedPanel {
            kind: Self::KIND.to_string(),
            target: self.topic.clone(),
            values: self.message()?,
        })
    }
}

#[async_trait]
impl Panel for PublisherPanel {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn target(&self) -> &str {
        &self.topic
    }

    async fn attach(&mut self, catalog: &dyn Catalog) -> Result<(), PanelError> {
        let type_name = catalog.entity_type(EntityKind::Topics, &self.topic).await?;
        tracing::debug!(topic = %self.topic, type_name = %type_name, "attaching publisher");

        bind_tree(
            &mut self.tree,
            catalog,
            &self.settings,
            &type_name,
            DescriptorRole::Message,
            self.saved.as_ref(),
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
