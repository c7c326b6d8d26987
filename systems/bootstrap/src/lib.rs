#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a Cannonade session.

use cannonade_core::{Command, FieldSize};
use cannonade_world::{query, World};

/// Produces data required to greet the players and open the match.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the session starts.
    #[must_use]
    pub fn welcome_banner(&self, world: &World) -> &'static str {
        query::welcome_banner(world)
    }

    /// Exposes the field configuration required for rendering.
    #[must_use]
    pub fn field(&self, world: &World) -> FieldSize {
        query::field(world)
    }

    /// Shapes the command that opens a match on a field of the given size.
    #[must_use]
    pub fn open_field(&self, size: FieldSize) -> Command {
        Command::ConfigureField { size }
    }
}
