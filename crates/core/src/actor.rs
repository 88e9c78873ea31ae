//! Annotation authors ("actors") and their display colors

use crate::error::{AnnotatorError, AnnotatorResult};
use crate::geometry::Color;
use std::fmt;
use std::sync::Arc;

/// Unique identifier for an actor
///
/// Names are not unique, so identity is carried by this ID instead.
pub type ActorId = uuid::Uuid;

/// Name of the actor every registry starts with
pub const DEFAULT_ACTOR_NAME: &str = "Default";

/// Color for kinds outside the fixed palette
pub const FALLBACK_COLOR: Color = Color::RED;

/// Category of an actor, which determines its color
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Business,
    Government,
    Gym,
    /// Any other label; always drawn with [`FALLBACK_COLOR`]
    Custom(String),
}

impl ActorKind {
    /// Parse a kind label; unrecognized labels become `Custom`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "business" => ActorKind::Business,
            "government" => ActorKind::Government,
            "gym" => ActorKind::Gym,
            _ => ActorKind::Custom(label.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ActorKind::Business => "Business",
            ActorKind::Government => "Government",
            ActorKind::Gym => "Gym",
            ActorKind::Custom(label) => label,
        }
    }

    /// Palette color for this kind
    pub fn color(&self) -> Color {
        match self {
            ActorKind::Business => Color::rgb(0, 102, 204),
            ActorKind::Government => Color::rgb(0, 153, 0),
            ActorKind::Gym => Color::rgb(204, 102, 0),
            ActorKind::Custom(_) => FALLBACK_COLOR,
        }
    }

    /// The kinds that have a dedicated palette entry
    pub fn palette() -> [ActorKind; 3] {
        [ActorKind::Business, ActorKind::Government, ActorKind::Gym]
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An annotation author
///
/// Immutable once created. Shapes hold it through an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    id: ActorId,
    name: String,
    kind: ActorKind,
    color: Color,
}

impl Actor {
    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ActorKind {
        &self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// Session-wide list of actors in creation order
#[derive(Debug, Clone)]
pub struct ActorRegistry {
    actors: Vec<Arc<Actor>>,
}

impl ActorRegistry {
    /// Create a registry seeded with the default actor
    pub fn new() -> Self {
        let default = Actor {
            id: ActorId::new_v4(),
            name: DEFAULT_ACTOR_NAME.to_string(),
            kind: ActorKind::Custom(DEFAULT_ACTOR_NAME.to_string()),
            color: FALLBACK_COLOR,
        };
        Self {
            actors: vec![Arc::new(default)],
        }
    }

    /// Register a new actor
    ///
    /// Duplicate names are accepted; the returned actor's ID tells them apart.
    pub fn create(&mut self, name: &str, kind: ActorKind) -> AnnotatorResult<Arc<Actor>> {
        if name.trim().is_empty() {
            return Err(AnnotatorError::invalid("actor name must not be empty"));
        }

        let actor = Arc::new(Actor {
            id: ActorId::new_v4(),
            name: name.to_string(),
            color: kind.color(),
            kind,
        });
        tracing::debug!(name = %actor.name, kind = %actor.kind, "actor created");
        self.actors.push(Arc::clone(&actor));
        Ok(actor)
    }

    /// All actors in insertion order
    pub fn list(&self) -> &[Arc<Actor>] {
        &self.actors
    }

    pub fn get(&self, id: ActorId) -> Option<&Arc<Actor>> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    /// First actor with the given name
    pub fn find_by_name(&self, name: &str) -> Option<&Arc<Actor>> {
        self.actors.iter().find(|actor| actor.name == name)
    }

    /// The actor seeded at construction
    pub fn default_actor(&self) -> &Arc<Actor> {
        &self.actors[0]
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Always false: the default actor cannot be removed
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl Default for ActorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
