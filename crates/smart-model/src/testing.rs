//! Fixtures shared by the unit tests

use std::sync::Arc;

use async_trait::async_trait;

use crate::collaborators::{PersistOptions, Persistence};
use crate::context::ModelContext;
use crate::error::ModelResult;
use crate::model::ModelDefinition;
use crate::Attributes;

pub(crate) struct Widget;

impl ModelDefinition for Widget {
    fn model_name() -> &'static str {
        "Widget"
    }

    fn table_name() -> &'static str {
        "widgets"
    }
}

/// Accepts every write
pub(crate) struct AcceptAll;

#[async_trait]
impl Persistence for AcceptAll {
    async fn save(&self, _table: &str, _attributes: &mut Attributes, _options: &PersistOptions) -> ModelResult<bool> {
        Ok(true)
    }
}

pub(crate) fn context_for<M: ModelDefinition>() -> Arc<ModelContext<M>> {
    ModelContext::new(Arc::new(AcceptAll)).shared()
}

pub(crate) fn context() -> Arc<ModelContext<Widget>> {
    context_for::<Widget>()
}
