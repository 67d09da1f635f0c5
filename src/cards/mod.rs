//! Card definitions, live instances, and stat modifiers.

pub mod instance;
pub mod modifiers;
pub mod registry;
pub mod template;

pub use instance::CardInstance;
pub use modifiers::{Lifetime, ModifierKind, ModifierStore};
pub use registry::CardRegistry;
pub use template::{CardTemplate, CardTrait, Rarity};
