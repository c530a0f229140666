//! panel::service
//!
//! Request composer and response view for a service.
//!
//! The request and response are separate trees: the request is resolved with
//! the service-request descriptor and collected, the response is resolved
//! with the service-response descriptor and only ever refreshed.
//!
//! [`ServicePanel::call`] ties the two together: collect the request, send
//! it, display the reply.

use async_trait::async_trait;

use super::{bind_tree, Panel, PanelError, PanelSettings};
use crate::catalog::{Catalog, DescriptorRole, EntityKind};
use crate::core::types::TypeName;
use crate::core::value::Value;
use crate::core::value_tree::{BoundTree, Liveness, TextFactory};

#[derive(Debug)]
pub struct ServicePanel {
    service: String,
    settings: PanelSettings,
    type_name: Option<TypeName>,
    request: BoundTree<TextFactory>,
    response: BoundTree<TextFactory>,
}

impl ServicePanel {
    pub const KIND: &'static str = "service";

    pub fn new(service: impl Into<String>, settings: PanelSettings) -> Self {
        // Both trees share one token so teardown covers either.
        let liveness = Liveness::new();
        Self {
            service: service.into(),
            settings,
            type_name: None,
            request: BoundTree::new(liveness.clone()),
            response: BoundTree::new(liveness),
        }
    }

    pub fn type_name(&self) -> Option<&TypeName> {
        self.type_name.as_ref()
    }

    /// Edit one request field.
    pub fn set_text(&mut self, path: &str, text: &str) -> Result<(), PanelError> {
        self.request.set_text(path, text)?;
        Ok(())
    }

    /// Grow a composite array in the request by one blank element.
    pub fn append(&mut self, path: &str) -> Result<usize, PanelError> {
        Ok(self.request.append(path)?)
    }

    /// The request as currently composed.
    pub fn request(&self) -> Result<Value, PanelError> {
        Ok(self.request.collect()?)
    }

    /// Send the composed request and display the reply.
    ///
    /// Returns the reply as received. A reply arriving after teardown is
    /// dropped with `Detached`.
    pub async fn call(&mut self, catalog: &dyn Catalog) -> Result<Value, PanelError> {
        let request = self.request()?;
        tracing::debug!(service = %self.service, "calling service");
        let reply = catalog.call_service(&self.service, &request).await?;

        self.on_response(&reply)?;
        Ok(reply)
    }

    /// Display a call's response.
    pub fn on_response(&mut self, response: &Value) -> Result<(), PanelError> {
        self.response.refresh(response)?;
        Ok(())
    }

    /// Displayed response fields as `(path, text)`.
    pub fn response_entries(&self) -> Result<Vec<(String, String)>, PanelError> {
        Ok(self.response.tree()?.entries())
    }
}

#[async_trait]
impl Panel for ServicePanel {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn target(&self) -> &str {
        &self.service
    }

    async fn attach(&mut self, catalog: &dyn Catalog) -> Result<(), PanelError> {
        let type_name = catalog
            .entity_type(EntityKind::Services, &self.service)
            .await?;
        tracing::debug!(service = %self.service, type_name = %type_name, "attaching service panel");

        bind_tree(
            &mut self.request,
            catalog,
            &self.settings,
            &type_name,
            DescriptorRole::ServiceRequest,
            None,
        )
        .await?;
        bind_tree(
            &mut self.response,
            catalog,
            &self.settings,
            &type_name,
            DescriptorRole::ServiceResponse,
            None,
        )
        .await?;
        self.type_name = Some(type_name);
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.request.is_ready() && self.response.is_ready()
    }

    /// Request fields; see [`ServicePanel::response_entries`] for the response.
    fn entries(&self) -> Result<Vec<(String, String)>, PanelError> {
        Ok(self.request.tree()?.entries())
    }

    fn teardown(&mut self) {
        self.request.teardown();
        self.response.teardown();
    }
}
