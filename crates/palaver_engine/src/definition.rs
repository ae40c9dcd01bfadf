//! Data-driven NPC definitions.
//!
//! An [`NpcDefinition`] describes one character: where it stands, how it
//! walks, and which dialogue it speaks. [`NpcBuilder::build`] turns any
//! definition into a live [`Npc`], so characters differ only in data.

use std::collections::BTreeMap;
use std::fmt;

use palaver_foundation::{ErrorContext, NpcId, Result};
use tracing::debug;

use crate::builder::DialogueBuilder;
use crate::config::{EngineConfig, NpcConfig};
use crate::engine::DialogueEngine;
use crate::npc::Npc;
use crate::path::{PatrolPath, Position};

/// Produces the patrol path of an NPC.
pub type PathFn = Box<dyn Fn() -> Result<PatrolPath> + Send + Sync>;

/// Registers the dialogue of an NPC.
pub type DialogueFn<A> = Box<dyn Fn(&mut DialogueBuilder<'_, A>) -> Result<()> + Send + Sync>;

/// Construction-time description of an NPC.
pub struct NpcDefinition<A> {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) position: Position,
    pub(crate) path: Option<PathFn>,
    pub(crate) dialogue: Option<DialogueFn<A>>,
    pub(crate) engine: EngineConfig,
    pub(crate) config: NpcConfig,
    pub(crate) attributes: BTreeMap<String, String>,
}

impl<A> NpcDefinition<A> {
    /// Creates a definition with no path and no dialogue.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            position: Position::default(),
            path: None,
            dialogue: None,
            engine: EngineConfig::default(),
            config: NpcConfig::default(),
            attributes: BTreeMap::new(),
        }
    }

    /// Sets the description shown when players look at the NPC.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the start position (used when there is no path).
    #[must_use]
    pub fn at(mut self, position: impl Into<Position>) -> Self {
        self.position = position.into();
        self
    }

    /// Sets the path producer.
    #[must_use]
    pub fn with_path<F>(mut self, path: F) -> Self
    where
        F: Fn() -> Result<PatrolPath> + Send + Sync + 'static,
    {
        self.path = Some(Box::new(path));
        self
    }

    /// Sets the dialogue registration function.
    #[must_use]
    pub fn with_dialogue<F>(mut self, dialogue: F) -> Self
    where
        F: Fn(&mut DialogueBuilder<'_, A>) -> Result<()> + Send + Sync + 'static,
    {
        self.dialogue = Some(Box::new(dialogue));
        self
    }

    /// Sets the engine configuration.
    #[must_use]
    pub fn with_engine_config(mut self, config: EngineConfig) -> Self {
        self.engine = config;
        self
    }

    /// Sets the NPC configuration.
    #[must_use]
    pub fn with_config(mut self, config: NpcConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets a free-form attribute (outfit, hit points, ...).
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The NPC name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<A> fmt::Debug for NpcDefinition<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NpcDefinition")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("path", &self.path.is_some())
            .field("dialogue", &self.dialogue.is_some())
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

/// Builds live NPCs from definitions.
pub struct NpcBuilder;

impl NpcBuilder {
    /// Builds an NPC.
    ///
    /// # Errors
    ///
    /// Returns the path or registration error, with the NPC name and the
    /// failing construction stage attached as context.
    pub fn build<A>(definition: &NpcDefinition<A>, id: NpcId) -> Result<Npc<A>> {
        let context = || ErrorContext::new().with_npc(definition.name.clone());

        let path = match &definition.path {
            Some(path) => path().map_err(|e| e.with_context(context().with_frame("path")))?,
            None => PatrolPath::stationary(definition.position),
        };

        let mut engine = DialogueEngine::new(definition.engine.clone());
        if let Some(dialogue) = &definition.dialogue {
            let mut builder = DialogueBuilder::new(&mut engine);
            dialogue(&mut builder).map_err(|e| e.with_context(context().with_frame("dialogue")))?;
        }
        debug!(npc = %definition.name, rules = engine.table().len(), "npc built");

        Ok(Npc::new(
            id,
            definition.name.clone(),
            definition.description.clone(),
            engine,
            path,
            definition.attributes.clone(),
            definition.config.clone(),
        ))
    }
}
