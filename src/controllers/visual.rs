//! Which visuals follow a gravity flip.
//!
//! Read by the built-in visual step of a flip and by the refresh that runs
//! after every room change, so entities always match the active settings.
use crate::controllers::ControllerConfig;
use crate::resources::mapdata::EntityData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualController {
    /// Draw inverted entities upside down.
    pub flip_sprite: bool,
    /// Mirror attached lights with the entity.
    pub flip_light: bool,
}

impl Default for VisualController {
    fn default() -> Self {
        Self {
            flip_sprite: true,
            flip_light: true,
        }
    }
}

impl ControllerConfig for VisualController {
    const NAME: &'static str = "gravityVisualController";

    fn from_attributes(data: &EntityData) -> Self {
        let defaults = Self::default();
        Self {
            flip_sprite: data.bool("flip_sprite", defaults.flip_sprite),
            flip_light: data.bool("flip_light", defaults.flip_light),
        }
    }
}
