//! Lazy schema holder.
//!
//! `LazySchema` defers synthesis until first access and supports replacing
//! the content model at runtime. Each rebuild is an independent synthesis
//! pass over the current model.

use std::sync::Arc;

use async_graphql::dynamic::Schema;
use contentgraph_model::ContentModel;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use super::ContentSchemaBuilder;
use crate::error::GraphQLError;

/// State of the lazy schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    /// Schema has not been built yet.
    Uninitialized,
    /// Schema is currently being built.
    Building,
    /// Schema is ready for use.
    Ready,
    /// Schema build failed.
    Failed,
}

/// Thread-safe lazy schema holder.
///
/// # Example
///
/// ```ignore
/// let lazy = LazySchema::new(ContentSchemaBuilder::default(), model);
///
/// // First access triggers the build
/// let schema = lazy.get_or_build().await?;
///
/// // New content model: rebuilt on next access
/// lazy.reload(new_model).await;
/// ```
pub struct LazySchema {
    /// The cached schema (None if not built yet or invalidated).
    schema: RwLock<Option<Arc<Schema>>>,

    /// Build lock to ensure only one build at a time.
    build_lock: Mutex<()>,

    /// Current state of the schema.
    state: RwLock<SchemaState>,

    /// The schema builder.
    builder: ContentSchemaBuilder,

    /// The content model the next build uses.
    model: RwLock<Arc<ContentModel>>,

    /// Last build error message (for diagnostics).
    last_error: RwLock<Option<String>>,
}

impl LazySchema {
    /// Creates a new lazy schema over a content model.
    #[must_use]
    pub fn new(builder: ContentSchemaBuilder, model: impl Into<Arc<ContentModel>>) -> Self {
        Self {
            schema: RwLock::new(None),
            build_lock: Mutex::new(()),
            state: RwLock::new(SchemaState::Uninitialized),
            builder,
            model: RwLock::new(model.into()),
            last_error: RwLock::new(None),
        }
    }

    /// Returns the current state of the schema.
    pub async fn state(&self) -> SchemaState {
        *self.state.read().await
    }

    /// Gets the schema, building it if necessary.
    ///
    /// Concurrent callers get `SchemaInitializing` while a build is running;
    /// use [`LazySchema::get_or_build_wait`] to wait instead.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::SchemaInitializing` if another build is in progress.
    /// Returns `GraphQLError::SchemaBuildFailed` if the build fails.
    pub async fn get_or_build(&self) -> Result<Arc<Schema>, GraphQLError> {
        if let Some(schema) = self.get().await {
            return Ok(schema);
        }

        if *self.state.read().await == SchemaState::Building {
            return Err(GraphQLError::SchemaInitializing);
        }

        let Ok(_guard) = self.build_lock.try_lock() else {
            return Err(GraphQLError::SchemaInitializing);
        };

        // Double-check after acquiring lock
        if let Some(schema) = self.get().await {
            return Ok(schema);
        }

        self.build_locked().await
    }

    /// Gets the schema, building it if necessary, waiting for a running build.
    ///
    /// A previous failure is reported without rebuilding until the model is
    /// reloaded or the schema invalidated.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::SchemaBuildFailed` if the build fails.
    pub async fn get_or_build_wait(&self) -> Result<Arc<Schema>, GraphQLError> {
        if let Some(schema) = self.get().await {
            return Ok(schema);
        }

        let _guard = self.build_lock.lock().await;

        if let Some(schema) = self.get().await {
            return Ok(schema);
        }

        if *self.state.read().await == SchemaState::Failed
            && let Some(err) = self.last_error.read().await.as_ref()
        {
            return Err(GraphQLError::SchemaBuildFailed(err.clone()));
        }

        self.build_locked().await
    }

    /// Runs a build. The caller holds `build_lock`.
    async fn build_locked(&self) -> Result<Arc<Schema>, GraphQLError> {
        *self.state.write().await = SchemaState::Building;
        let model = Arc::clone(&*self.model.read().await);
        info!(content_types = model.len(), "Building GraphQL schema...");

        match self.builder.build(model) {
            Ok(schema) => {
                let schema = Arc::new(schema);
                *self.schema.write().await = Some(Arc::clone(&schema));
                *self.state.write().await = SchemaState::Ready;
                *self.last_error.write().await = None;
                info!("GraphQL schema built successfully");
                Ok(schema)
            }
            Err(e) => {
                let error_msg = e.to_string();
                warn!(error = %error_msg, "Failed to build GraphQL schema");
                *self.state.write().await = SchemaState::Failed;
                *self.last_error.write().await = Some(error_msg.clone());
                Err(GraphQLError::SchemaBuildFailed(error_msg))
            }
        }
    }

    /// Gets the schema if it's already built, without triggering a build.
    pub async fn get(&self) -> Option<Arc<Schema>> {
        self.schema.read().await.clone()
    }

    /// Drops the cached schema; the next access rebuilds it.
    pub async fn invalidate(&self) {
        let _guard = self.build_lock.lock().await;
        self.reset().await;
        info!("GraphQL schema invalidated - will rebuild on next request");
    }

    /// Replaces the content model; the next access synthesizes a fresh schema.
    pub async fn reload(&self, model: impl Into<Arc<ContentModel>>) {
        let model = model.into();
        let _guard = self.build_lock.lock().await;
        let content_types = model.len();
        *self.model.write().await = model;
        self.reset().await;
        info!(content_types, "Content model reloaded - will rebuild on next request");
    }

    async fn reset(&self) {
        *self.schema.write().await = None;
        *self.state.write().await = SchemaState::Uninitialized;
        *self.last_error.write().await = None;
    }

    /// Returns the last build error, if any.
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    /// Returns whether the schema is ready for use.
    pub async fn is_ready(&self) -> bool {
        *self.state.read().await == SchemaState::Ready
    }
}
